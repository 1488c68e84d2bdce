//! Server query commands: HELP and DATE (RFC 3977 §7.1, §7.2)

use super::NntpClient;
use crate::commands;
use crate::error::Result;
use crate::response::codes;
use chrono::{DateTime, Utc};
use tracing::debug;

impl NntpClient {
    /// Request help text from the server (RFC 3977 §7.2)
    ///
    /// Returns the help block with every line terminated by `\n`.
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`](crate::NntpError::Protocol) unless the
    /// server answers 100.
    pub async fn help(&self) -> Result<String> {
        debug!("Requesting help text");

        let mut session = self.exchange().await?;
        session.send_command(commands::help()).await?;
        let response = session
            .read_multiline_response(&[codes::HELP_TEXT_FOLLOWS])
            .await?;

        debug!("Received help text ({} lines)", response.lines.len());
        Ok(commands::help_text(&response.lines))
    }

    /// Get the server clock (RFC 3977 §7.1)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_overview::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = ServerConfig::tls("news.example.com", "user", "pass");
    /// # let client = NntpClient::connect(Arc::new(config)).await?;
    /// let server_time = client.date().await?;
    /// println!("Server time: {}", server_time.to_rfc3339());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - [`NntpError::Protocol`](crate::NntpError::Protocol) - reply is not 111
    /// - [`NntpError::InvalidResponse`](crate::NntpError::InvalidResponse) -
    ///   timestamp is not `yyyymmddhhmmss`
    pub async fn date(&self) -> Result<DateTime<Utc>> {
        debug!("Requesting server date/time");

        let response = {
            let mut session = self.exchange().await?;
            session.send_command(commands::date()).await?;
            session.expect_response(&[codes::SERVER_DATE]).await?
        };

        let date = commands::parse_server_date(&response.message)?;
        debug!("Server date/time: {}", date);
        Ok(date)
    }
}
