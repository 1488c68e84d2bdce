//! Streaming XOVER: decoding while the response arrives

use super::mock::{FMT_WITH_XREF, Mock, block, overview_line};
use nntp_overview::{NntpError, OverviewFormat};

#[tokio::test]
async fn test_stream_skips_malformed_line() {
    let lines = [
        overview_line(1, "first"),
        overview_line(2, "second"),
        "3\tthird\tauthor\tnot-a-date\t<3@x>\t\t1\t1".to_string(),
        overview_line(4, "fourth"),
        overview_line(5, "fifth"),
    ];
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (client, server) = Mock::new()
        .on("XOVER 1-5", block("224 data follows", &lines))
        .on("GROUP alt.test", "211 5 1 5 alt.test\r\n")
        .start()
        .await;
    client.set_overview_format(OverviewFormat::default()).await;

    let stream = client.xover_stream("1-5").await.unwrap();
    let (headers, errors) = stream.collect_all().await;

    let numbers: Vec<u64> = headers.iter().map(|h| h.message_number).collect();
    assert_eq!(numbers, vec![1, 2, 4, 5]);
    assert_eq!(headers[3].subject, "fifth");

    assert_eq!(errors.len(), 1);
    match &errors[0] {
        NntpError::Line { line, .. } => assert!(line.starts_with("3\tthird")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(errors[0].root_cause(), NntpError::InvalidDate { .. }));

    // Terminator consumed, connection still usable
    assert!(!client.is_broken());
    assert_eq!(client.group("alt.test").await.unwrap().high, 5);

    drop(client);
    assert_eq!(server.commands().await, vec!["XOVER 1-5", "GROUP alt.test"]);
}

#[tokio::test]
async fn test_stream_negotiates_format() {
    let (client, server) = Mock::new()
        .on("LIST OVERVIEW.FMT", FMT_WITH_XREF)
        .on(
            "XOVER 10",
            block(
                "224 data follows",
                &[&format!("{}\tXref: host grp:10", overview_line(10, "x"))],
            ),
        )
        .start()
        .await;

    let mut stream = client.xover_stream("10").await.unwrap();
    let header = stream.next().await.unwrap().unwrap();
    assert_eq!(header.message_number, 10);
    assert_eq!(header.extensions["Xref"], "host grp:10");
    assert!(stream.next().await.is_none());

    drop(client);
    assert_eq!(
        server.commands().await,
        vec!["LIST OVERVIEW.FMT", "XOVER 10"]
    );
}

#[tokio::test]
async fn test_stream_keeps_wire_order_past_queue_capacity() {
    const COUNT: u64 = 3000;
    let lines: Vec<String> = (1..=COUNT).map(|n| overview_line(n, "bulk")).collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (client, _server) = Mock::new()
        .on("XOVER 1-3000", block("224 data follows", &lines))
        .start()
        .await;
    client.set_overview_format(OverviewFormat::default()).await;

    let mut stream = client.xover_stream("1-3000").await.unwrap();
    let mut expected = 1;
    while let Some(item) = stream.next().await {
        let header = item.unwrap();
        assert_eq!(header.message_number, expected);
        expected += 1;
        if expected % 500 == 0 {
            tokio::task::yield_now().await;
        }
    }
    assert_eq!(expected, COUNT + 1);
    assert!(!client.is_broken());
}

#[tokio::test]
async fn test_stream_dots_inside_line_untouched() {
    let (client, _server) = Mock::new()
        .on(
            "XOVER 1",
            block("224 data follows", &[&overview_line(1, "..leading dot")]),
        )
        .start()
        .await;
    client.set_overview_format(OverviewFormat::default()).await;

    // Stuffing only applies to the start of the line
    let (headers, errors) = client.xover_stream("1").await.unwrap().collect_all().await;
    assert!(errors.is_empty());
    assert_eq!(headers[0].subject, "..leading dot");
}

#[tokio::test]
async fn test_stream_connection_closed() {
    let reply = format!(
        "224 data follows\r\n{}\r\n{}\r\n",
        overview_line(1, "a"),
        overview_line(2, "b")
    );
    let (client, _server) = Mock::new().on("XOVER 1-10", reply).hangup().start().await;
    client.set_overview_format(OverviewFormat::default()).await;

    let stream = client.xover_stream("1-10").await.unwrap();
    let (headers, errors) = stream.collect_all().await;

    assert_eq!(headers.len(), 2);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], NntpError::ConnectionClosed));
    assert!(!errors[0].is_decode_error());
    assert!(client.is_broken());
}

#[tokio::test]
async fn test_stream_cancel() {
    // No terminator; the server keeps the connection open
    let reply = format!("224 data follows\r\n{}\r\n", overview_line(1, "a"));
    let (client, _server) = Mock::new().on("XOVER 1-", reply).start().await;
    client.set_overview_format(OverviewFormat::default()).await;

    let mut stream = client.xover_stream("1-").await.unwrap();
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.message_number, 1);

    stream.cancel();
    let (headers, errors) = stream.collect_all().await;
    assert!(headers.is_empty());
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], NntpError::Cancelled));

    assert!(client.is_broken());
    let err = client.group("alt.test").await.unwrap_err();
    assert!(matches!(err, NntpError::Broken));
}

#[tokio::test]
async fn test_dropped_stream_stops_producer() {
    let lines = [overview_line(1, "a"), overview_line(2, "b")];
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (client, _server) = Mock::new()
        .on("XOVER 1-2", block("224 data follows", &lines))
        .start()
        .await;
    client.set_overview_format(OverviewFormat::default()).await;

    let stream = client.xover_stream("1-2").await.unwrap();
    drop(stream);

    // Waits for the producer to give the connection back
    let err = client.group("alt.test").await.unwrap_err();
    assert!(matches!(err, NntpError::Broken));
}

#[tokio::test]
async fn test_stream_refused_before_first_line() {
    let (client, _server) = Mock::new()
        .on("XOVER 1-10", "412 no newsgroup selected\r\n")
        .on("GROUP alt.test", "211 1 1 1 alt.test\r\n")
        .start()
        .await;
    client.set_overview_format(OverviewFormat::default()).await;

    let err = client.xover_stream("1-10").await.unwrap_err();
    assert!(matches!(err, NntpError::Protocol { code: 412, .. }));

    // Lock released on failure
    assert!(client.group("alt.test").await.is_ok());
}

#[tokio::test]
async fn test_stream_non_ascii_date_is_a_line_error() {
    let lines = [
        overview_line(1, "a"),
        "2\tb\tsome author\tWed, 01 Jan 2020 12:34:56 +1\u{e9}1\t<2@x>\t\t1\t1".to_string(),
        overview_line(3, "c"),
    ];
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (client, _server) = Mock::new()
        .on("XOVER 1-3", block("224 data follows", &lines))
        .on("GROUP alt.test", "211 3 1 3 alt.test\r\n")
        .start()
        .await;
    client.set_overview_format(OverviewFormat::default()).await;

    let (headers, errors) = client.xover_stream("1-3").await.unwrap().collect_all().await;

    let numbers: Vec<u64> = headers.iter().map(|h| h.message_number).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].root_cause(), NntpError::InvalidDate { .. }));

    assert!(!client.is_broken());
    assert_eq!(client.group("alt.test").await.unwrap().name, "alt.test");
}

#[tokio::test]
async fn test_dropped_error_queue_discards_decode_errors() {
    let lines = [
        overview_line(1, "a"),
        "2\tb\tsome author\tnot-a-date\t<2@x>\t\t1\t1".to_string(),
        overview_line(3, "c"),
    ];
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let (client, _server) = Mock::new()
        .on("XOVER 1-3", block("224 data follows", &lines))
        .on("GROUP alt.test", "211 3 1 3 alt.test\r\n")
        .start()
        .await;
    client.set_overview_format(OverviewFormat::default()).await;

    let stream = client.xover_stream("1-3").await.unwrap();
    let mut headers = stream.headers;
    drop(stream.errors);

    let mut numbers = Vec::new();
    while let Some(header) = headers.recv().await {
        numbers.push(header.message_number);
    }
    assert_eq!(numbers, vec![1, 3]);

    assert!(!client.is_broken());
    assert!(client.group("alt.test").await.is_ok());
}
