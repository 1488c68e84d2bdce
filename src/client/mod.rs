//! NNTP client implementation
//!
//! One [`NntpClient`] wraps one server connection. Clones share that
//! connection; every request/response exchange holds the session lock from
//! the command write until its reply has been read, and the lock is
//! FIFO-fair, so concurrent callers are served in the order they asked.

mod auth;
mod connection;
mod group_ops;
mod io;
mod metadata;
mod server;
mod state;

use crate::config::ServerConfig;
use crate::error::{NntpError, Result};
use crate::overview::OverviewFormat;
use state::ConnectionState;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};
use tracing::debug;

/// Byte stream an NNTP session can run over (TCP, TLS, in-memory pipe, ...)
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> AsyncStream for T {}

/// Connection state guarded by the exchange lock
pub(crate) struct Session {
    /// Buffered stream (both reader and writer)
    stream: BufReader<Box<dyn AsyncStream>>,
    /// Deadline for each read, `None` for no deadline
    read_timeout: Option<Duration>,
    /// Overview format for XOVER decoding, negotiated lazily
    format: Option<Arc<OverviewFormat>>,
    /// Authentication progress
    state: ConnectionState,
    /// Shared with [`NntpClient::is_broken`]
    broken: Arc<AtomicBool>,
}

impl Session {
    /// Mark this connection as broken
    fn mark_broken(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }
}

/// Async NNTP client focused on overview (XOVER) retrieval
///
/// # Example
///
/// ```no_run
/// use nntp_overview::{NntpClient, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
/// let client = NntpClient::connect(Arc::new(config)).await?;
/// client.authenticate().await?;
///
/// let group = client.group("alt.test").await?;
/// let headers = client.xover(&format!("{}-{}", group.low, group.high)).await?;
/// println!("Fetched {} overview entries", headers.len());
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Clone)]
pub struct NntpClient {
    session: Arc<Mutex<Session>>,
    /// Server configuration, absent for clients built from a raw stream
    config: Option<Arc<ServerConfig>>,
    /// Whether the greeting was 200 (posting allowed) rather than 201
    posting_allowed: bool,
    broken: Arc<AtomicBool>,
}

impl std::fmt::Debug for NntpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NntpClient")
            .field("host", &self.config.as_ref().map(|c| c.host.as_str()))
            .field("posting_allowed", &self.posting_allowed)
            .field("broken", &self.is_broken())
            .finish_non_exhaustive()
    }
}

impl NntpClient {
    /// Check if this connection is broken and should be discarded
    ///
    /// Set after a garbled or failed status line read, a failed command
    /// write, a failed read in the middle of a response, or a streaming XOVER
    /// that stopped before its terminator.
    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::SeqCst)
    }

    /// Whether the server greeting allowed posting
    pub fn posting_allowed(&self) -> bool {
        self.posting_allowed
    }

    /// Check if the client is currently authenticated
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.session.lock().await.state, ConnectionState::Authenticated)
    }

    /// Wait for this caller's turn on the connection
    async fn exchange(&self) -> Result<MutexGuard<'_, Session>> {
        let session = self.session.lock().await;
        Self::check_usable(&session)?;
        Ok(session)
    }

    /// Like [`exchange`](Self::exchange), for a guard that outlives `self`
    async fn exchange_owned(&self) -> Result<OwnedMutexGuard<Session>> {
        let session = self.session.clone().lock_owned().await;
        Self::check_usable(&session)?;
        Ok(session)
    }

    fn check_usable(session: &Session) -> Result<()> {
        if matches!(session.state, ConnectionState::Closed) {
            return Err(NntpError::ConnectionClosed);
        }
        if session.broken.load(Ordering::SeqCst) {
            return Err(NntpError::Broken);
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("NNTP session dropped");
    }
}
