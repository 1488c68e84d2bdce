//! RFC 3977 Section 6.1.1 - GROUP

use super::mock::Mock;
use nntp_overview::{NewsgroupDetail, NntpError};

#[tokio::test]
async fn test_group_selected() {
    let (client, server) = Mock::new()
        .on("GROUP group1", "211 491902 1 491902 group1\r\n")
        .start()
        .await;

    let detail = client.group("group1").await.unwrap();
    assert_eq!(
        detail,
        NewsgroupDetail {
            name: "group1".to_string(),
            number: 491902,
            low: 1,
            high: 491902,
        }
    );

    drop(client);
    assert_eq!(server.commands().await, vec!["GROUP group1"]);
}

#[tokio::test]
async fn test_group_invalid_numbers() {
    for (reply, field) in [
        ("211 y 1 491902 group1\r\n", "number"),
        ("211 491902 y 491902 group1\r\n", "low"),
        ("211 491902 1 y group1\r\n", "high"),
    ] {
        let (client, _server) = Mock::new().on("GROUP group1", reply).start().await;

        let err = client.group("group1").await.unwrap_err();
        match err {
            NntpError::InvalidNumber { field: got, value, .. } => {
                assert_eq!(got, field);
                assert_eq!(value, "y");
            }
            other => panic!("unexpected error for {reply:?}: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_group_wrong_part_count() {
    let (client, _server) = Mock::new()
        .on("GROUP group1", "211 491902 1 491902\r\n")
        .start()
        .await;

    let err = client.group("group1").await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_no_such_group() {
    let (client, _server) = Mock::new()
        .on("GROUP nope", "411 no such news group\r\n")
        .start()
        .await;

    let err = client.group("nope").await.unwrap_err();
    match err {
        NntpError::NoSuchGroup(name) => assert_eq!(name, "nope"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!client.is_broken());
}

#[tokio::test]
async fn test_group_unexpected_code() {
    let (client, _server) = Mock::new()
        .on("GROUP group1", "480 authentication required\r\n")
        .start()
        .await;

    let err = client.group("group1").await.unwrap_err();
    assert!(matches!(err, NntpError::Protocol { code: 480, .. }));
}
