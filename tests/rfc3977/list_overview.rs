//! RFC 3977 Section 8.4 - LIST OVERVIEW.FMT

use super::mock::{FMT_WITH_XREF, Mock, block};
use nntp_overview::{FieldKind, NntpError, OverviewFormat};

#[tokio::test]
async fn test_initialize_overview_format() {
    let (client, server) = Mock::new()
        .on("LIST OVERVIEW.FMT", FMT_WITH_XREF)
        .start()
        .await;

    assert!(client.overview_format().await.is_none());
    client.initialize_overview_format().await.unwrap();

    let format = client.overview_format().await.unwrap();
    assert_eq!(format.len(), 8);
    let kinds: Vec<FieldKind> = format.fields().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FieldKind::Subject,
            FieldKind::Author,
            FieldKind::Date,
            FieldKind::MessageId,
            FieldKind::References,
            FieldKind::ByteCount,
            FieldKind::LineCount,
            FieldKind::Extension { full: true },
        ]
    );
    assert_eq!(format.fields()[7].name(), "Xref:full");
    assert_eq!(format.fields()[7].extension_key(), "Xref");

    drop(client);
    assert_eq!(server.commands().await, vec!["LIST OVERVIEW.FMT"]);
}

#[tokio::test]
async fn test_rfc_style_metadata_labels() {
    let (client, _server) = Mock::new()
        .on(
            "LIST OVERVIEW.FMT",
            block(
                "215 Order of fields in overview database.",
                &["Subject:", "From:", "Date:", "Message-ID:", "References:", ":bytes", ":lines"],
            ),
        )
        .start()
        .await;

    client.initialize_overview_format().await.unwrap();
    let format = client.overview_format().await.unwrap();
    assert_eq!(*format, OverviewFormat::default());
}

#[tokio::test]
async fn test_refused_keeps_previous_format() {
    let (client, _server) = Mock::new()
        .on("LIST OVERVIEW.FMT", "503 not supported\r\n")
        .start()
        .await;

    let custom = OverviewFormat::new(["Subject:", "From:"]);
    client.set_overview_format(custom.clone()).await;

    let err = client.initialize_overview_format().await.unwrap_err();
    assert!(matches!(err, NntpError::Protocol { code: 503, .. }));
    assert_eq!(*client.overview_format().await.unwrap(), custom);
    assert!(!client.is_broken());
}

#[tokio::test]
async fn test_set_overview_format_replaces() {
    let (client, _server) = Mock::new()
        .on("LIST OVERVIEW.FMT", FMT_WITH_XREF)
        .start()
        .await;

    client.initialize_overview_format().await.unwrap();
    client.set_overview_format(OverviewFormat::default()).await;
    assert_eq!(client.overview_format().await.unwrap().len(), 7);
}
