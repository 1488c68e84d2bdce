//! RFC 3977 Section 7.3 - NEWGROUPS

use super::mock::{Mock, block};
use chrono::{FixedOffset, TimeZone, Utc};
use nntp_overview::{NewsgroupOverview, NewsgroupStatus, NntpError};

const COMMAND: &str = "NEWGROUPS 200510 003222 GMT";

fn since() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 5, 10, 0, 32, 22).unwrap()
}

#[tokio::test]
async fn test_newgroups() {
    let (client, server) = Mock::new()
        .on(
            COMMAND,
            block(
                "231 list of new newsgroups follows",
                &["group1 4 1 y", "group2 89 56 n", "group3 99 80 m"],
            ),
        )
        .start()
        .await;

    let groups = client.newgroups(since()).await.unwrap();
    assert_eq!(
        groups,
        vec![
            NewsgroupOverview {
                name: "group1".to_string(),
                low: 1,
                high: 4,
                status: NewsgroupStatus::PostingPermitted,
            },
            NewsgroupOverview {
                name: "group2".to_string(),
                low: 56,
                high: 89,
                status: NewsgroupStatus::PostingProhibited,
            },
            NewsgroupOverview {
                name: "group3".to_string(),
                low: 80,
                high: 99,
                status: NewsgroupStatus::PostingModerated,
            },
        ]
    );

    drop(client);
    assert_eq!(server.commands().await, vec![COMMAND]);
}

#[tokio::test]
async fn test_newgroups_sends_gmt() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let local = offset.with_ymd_and_hms(2020, 5, 10, 2, 32, 22).unwrap();

    let (client, _server) = Mock::new()
        .on(COMMAND, block("231 none", &[]))
        .start()
        .await;

    assert!(client.newgroups(local).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_newgroups_invalid_status() {
    let (client, _server) = Mock::new()
        .on(COMMAND, block("231 list follows", &["group3 99 80 zzz"]))
        .start()
        .await;

    let err = client.newgroups(since()).await.unwrap_err();
    match err {
        NntpError::InvalidResponse(message) => assert!(message.contains("'zzz'")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_newgroups_invalid_numbers() {
    for (line, field) in [("group3 a 80 y", "high"), ("group3 99 a y", "low")] {
        let (client, _server) = Mock::new()
            .on(COMMAND, block("231 list follows", &[line]))
            .start()
            .await;

        let err = client.newgroups(since()).await.unwrap_err();
        assert!(
            matches!(err, NntpError::InvalidNumber { field: f, .. } if f == field),
            "{line}: {err:?}"
        );
    }
}

#[tokio::test]
async fn test_newgroups_wrong_code() {
    let (client, _server) = Mock::new()
        .on(COMMAND, "502 permission denied\r\n")
        .start()
        .await;

    let err = client.newgroups(since()).await.unwrap_err();
    assert!(matches!(err, NntpError::Protocol { code: 502, .. }));
}
