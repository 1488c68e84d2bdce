//! Stream overview data for the newest articles of a group
//!
//! Run with: cargo run --example overview
//!
//! Set RUST_LOG=nntp_overview=debug to see the exchanges.

use nntp_overview::{NntpClient, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = std::env::var("NNTP_HOST").unwrap_or_else(|_| "news.example.com".to_string());
    let port = std::env::var("NNTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(563);
    let config = ServerConfig::new(
        host,
        port,
        port != 119,
        std::env::var("NNTP_USER").unwrap_or_else(|_| "user".to_string()),
        std::env::var("NNTP_PASS").unwrap_or_else(|_| "pass".to_string()),
    )
    .with_read_timeout(Duration::from_secs(60));

    println!("Connecting to {}:{}...", config.host, config.port);
    let client = NntpClient::connect(Arc::new(config)).await?;
    client.authenticate().await?;
    println!("Server time: {}", client.date().await?);

    let group = std::env::var("NNTP_GROUP").unwrap_or_else(|_| "alt.test".to_string());
    let detail = client.group(&group).await?;
    println!(
        "Selected group '{}': {} articles ({}-{})",
        detail.name, detail.number, detail.low, detail.high
    );
    if detail.number == 0 {
        return Ok(());
    }

    client.initialize_overview_format().await?;
    if let Some(format) = client.overview_format().await {
        println!("Overview format: {:?}", format);
    }

    let start = detail.high.saturating_sub(99).max(detail.low);
    let mut stream = client
        .xover_stream(&format!("{}-{}", start, detail.high))
        .await?;

    let mut skipped = 0;
    while let Some(item) = stream.next().await {
        match item {
            Ok(header) => {
                let date = header
                    .date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>10} {} {:>8}B  {}",
                    header.message_number, date, header.bytes, header.subject
                );
            }
            Err(e) if e.is_decode_error() => {
                skipped += 1;
                eprintln!("Skipped: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!("{} lines could not be decoded", skipped);

    client.quit().await?;
    Ok(())
}
