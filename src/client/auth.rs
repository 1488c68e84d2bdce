//! NNTP authentication (AUTHINFO USER/PASS, RFC 4643) and session teardown

use super::NntpClient;
use super::state::ConnectionState;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::codes;
use tracing::debug;

impl NntpClient {
    /// Authenticate with the credentials from the client configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_overview::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ServerConfig::tls("news.example.com", "user", "pass");
    /// let client = NntpClient::connect(Arc::new(config)).await?;
    /// client.authenticate().await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::AuthFailed`] - Invalid credentials, or the client was
    ///   built from a raw stream without configuration
    /// - [`NntpError::ConnectionClosed`] - Server closed the connection
    pub async fn authenticate(&self) -> Result<()> {
        let Some(config) = self.config.clone() else {
            return Err(NntpError::AuthFailed(
                "no credentials configured, use authenticate_with".to_string(),
            ));
        };
        self.authenticate_with(&config.username, &config.password)
            .await
    }

    /// Authenticate with explicit credentials (AUTHINFO USER/PASS)
    ///
    /// The server normally answers USER with 381 and PASS with 281; a 281
    /// straight after USER is accepted too.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Protocol`] - Already authenticated
    /// - [`NntpError::AuthFailed`] - Credentials rejected
    pub async fn authenticate_with(&self, username: &str, password: &str) -> Result<()> {
        debug!("Authenticating as {}", username);

        let mut session = self.exchange().await?;
        if matches!(session.state, ConnectionState::Authenticated) {
            return Err(NntpError::Protocol {
                code: codes::ACCESS_DENIED,
                message: "Already authenticated".to_string(),
            });
        }

        session.send_command(&commands::authinfo_user(username)).await?;
        let response = session.read_response().await?;

        if response.code == codes::AUTH_CONTINUE {
            session.send_command(&commands::authinfo_pass(password)).await?;
            let response = session.read_response().await?;
            if response.code != codes::AUTH_ACCEPTED {
                return Err(NntpError::AuthFailed(response.message));
            }
        } else if response.code != codes::AUTH_ACCEPTED {
            return Err(NntpError::AuthFailed(response.message));
        }

        session.state = ConnectionState::Authenticated;
        debug!("Authentication successful");
        Ok(())
    }

    /// Close the session (QUIT, expects 205)
    ///
    /// Later exchanges on this client, or its clones, fail with
    /// [`NntpError::ConnectionClosed`].
    pub async fn quit(&self) -> Result<()> {
        debug!("Closing NNTP connection");

        let mut session = self.exchange().await?;
        session.send_command(commands::quit()).await?;
        session.expect_response(&[codes::CLOSING_CONNECTION]).await?;

        session.state = ConnectionState::Closed;
        Ok(())
    }
}
