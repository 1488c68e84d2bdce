//! RFC 3977 Section 7.1 - DATE

use super::mock::Mock;
use chrono::{TimeZone, Utc};
use nntp_overview::NntpError;
use std::time::Duration;

#[tokio::test]
async fn test_date() {
    let (client, _server) = Mock::new()
        .on("DATE", "111 19990623135624\r\n")
        .start()
        .await;

    let date = client.date().await.unwrap();
    assert_eq!(date, Utc.with_ymd_and_hms(1999, 6, 23, 13, 56, 24).unwrap());
}

#[tokio::test]
async fn test_date_malformed_timestamp() {
    let (client, _server) = Mock::new()
        .on("DATE", "111 yesterday\r\n")
        .start()
        .await;

    let err = client.date().await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidResponse(_)));
}

#[tokio::test(start_paused = true)]
async fn test_late_reply_breaks_session() {
    let (client, server) = Mock::new()
        .read_timeout(Duration::from_millis(100))
        .on_delayed("DATE", Duration::from_millis(300), "111 20200101000000\r\n")
        .on("GROUP alt.test", "211 1 1 1 alt.test\r\n")
        .start()
        .await;

    let err = client.date().await.unwrap_err();
    assert!(matches!(err, NntpError::Timeout));
    assert!(client.is_broken());

    // The late 111 must never be read as the GROUP reply
    let err = client.group("alt.test").await.unwrap_err();
    assert!(matches!(err, NntpError::Broken));

    drop(client);
    assert_eq!(server.commands().await, vec!["DATE"]);
}

#[tokio::test]
async fn test_write_to_closed_connection_breaks_session() {
    let (client, _server) = Mock::new().hangup().start().await;

    let err = client.date().await.unwrap_err();
    assert!(
        matches!(err, NntpError::Io(_) | NntpError::ConnectionClosed),
        "{err:?}"
    );
    assert!(client.is_broken());
}
