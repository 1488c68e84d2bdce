//! Article overview retrieval (LIST OVERVIEW.FMT, XOVER)
//!
//! XOVER lines are decoded against the session's [`OverviewFormat`], which
//! is negotiated on first use unless the caller installs one. Responses can
//! be read whole ([`NntpClient::xover`]) or decoded while they arrive
//! ([`NntpClient::xover_stream`]).

use std::sync::Arc;

use tokio::sync::{Notify, OwnedMutexGuard, mpsc};
use tracing::{debug, trace, warn};

use super::io::{BlockLine, unstuff};
use super::{NntpClient, Session};
use crate::commands;
use crate::error::{NntpError, Result};
use crate::overview::{
    ERROR_QUEUE_CAPACITY, HEADER_QUEUE_CAPACITY, Header, OverviewFormat, OverviewStream,
};
use crate::response::codes;

/// Why a streaming producer stopped before the terminator
enum Stop {
    Cancelled,
    ConsumerGone,
}

impl Session {
    /// Ask the server for its overview format (LIST OVERVIEW.FMT)
    async fn negotiate_overview_format(&mut self) -> Result<OverviewFormat> {
        self.send_command(commands::list_overview_fmt()).await?;
        let response = self
            .read_multiline_response(&[codes::LIST_INFORMATION_FOLLOWS])
            .await?;
        let format = commands::parse_overview_fmt(&response.lines);
        debug!("Overview format: {:?}", format);
        Ok(format)
    }

    /// Installed overview format, negotiating one if there is none yet
    async fn active_overview_format(&mut self) -> Result<Arc<OverviewFormat>> {
        if let Some(format) = &self.format {
            return Ok(format.clone());
        }
        let format = Arc::new(self.negotiate_overview_format().await.inspect_err(|e| {
            debug!("Failed to initialize overview format: {}", e);
        })?);
        self.format = Some(format.clone());
        Ok(format)
    }

    /// Send XOVER and consume its 224 status line
    async fn start_xover(&mut self, range: &str) -> Result<Arc<OverviewFormat>> {
        let format = self.active_overview_format().await?;
        self.send_command(&commands::xover(range)).await?;
        self.expect_response(&[codes::OVERVIEW_INFO_FOLLOWS]).await?;
        Ok(format)
    }
}

impl NntpClient {
    /// Overview format currently used to decode XOVER lines, if any
    pub async fn overview_format(&self) -> Option<Arc<OverviewFormat>> {
        self.session.lock().await.format.clone()
    }

    /// Replace the overview format used to decode XOVER lines
    ///
    /// Use [`OverviewFormat::default()`] for servers without LIST OVERVIEW.FMT.
    pub async fn set_overview_format(&self, format: OverviewFormat) {
        self.session.lock().await.format = Some(Arc::new(format));
    }

    /// Fetch the server's overview format and install it (RFC 3977 §8.4)
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`] unless the server answers 215; the
    /// previously installed format is kept in that case.
    pub async fn initialize_overview_format(&self) -> Result<()> {
        let mut session = self.exchange().await?;
        let format = session.negotiate_overview_format().await?;
        session.format = Some(Arc::new(format));
        Ok(())
    }

    /// Fetch and decode overview data for `range` (XOVER)
    ///
    /// The whole response is read before anything is returned. A single bad
    /// line fails the call; use [`xover_stream`](Self::xover_stream) to keep
    /// the good lines.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_overview::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = ServerConfig::plain("news.example.com", "user", "pass");
    /// # let client = NntpClient::connect(Arc::new(config)).await?;
    /// client.group("comp.lang.rust").await?;
    /// for header in client.xover("1-100").await? {
    ///     println!("{}: {}", header.message_number, header.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Protocol`] - Format negotiation or XOVER was refused
    ///   (e.g. 412 no newsgroup selected)
    /// - [`NntpError::Line`] - A line failed to decode
    /// - [`NntpError::ConnectionClosed`] - Server closed the connection mid-response
    pub async fn xover(&self, range: &str) -> Result<Vec<Header>> {
        trace!("Fetching XOVER: {}", range);

        let (format, lines) = {
            let mut session = self.exchange().await?;
            let format = session.start_xover(range).await?;
            (format, session.read_block().await?)
        };

        let headers = commands::parse_xover_lines(&format, &lines)?;
        debug!("Decoded {} overview entries", headers.len());
        Ok(headers)
    }

    /// Fetch overview data for `range`, decoding lines as they arrive
    ///
    /// Returns once the server has accepted the command. A background task
    /// then owns the connection until the response ends, so other exchanges
    /// on this client wait until then. See [`OverviewStream`] for how results
    /// and errors are delivered.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_overview::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = ServerConfig::plain("news.example.com", "user", "pass");
    /// # let client = NntpClient::connect(Arc::new(config)).await?;
    /// client.group("alt.binaries.test").await?;
    /// let mut stream = client.xover_stream("1-").await?;
    /// while let Some(item) = stream.next().await {
    ///     match item {
    ///         Ok(header) => println!("{}", header.subject),
    ///         Err(e) => eprintln!("skipped: {e}"),
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Errors before the first overview line (format negotiation, a non-224
    /// reply, transport failure) are returned directly.
    pub async fn xover_stream(&self, range: &str) -> Result<OverviewStream> {
        trace!("Streaming XOVER: {}", range);

        let mut session = self.exchange_owned().await?;
        let format = session.start_xover(range).await?;

        let (header_tx, header_rx) = mpsc::channel(HEADER_QUEUE_CAPACITY);
        let (error_tx, error_rx) = mpsc::channel(ERROR_QUEUE_CAPACITY);
        let cancel = Arc::new(Notify::new());

        tokio::spawn(produce_overview(
            session,
            format,
            header_tx,
            error_tx,
            cancel.clone(),
        ));

        Ok(OverviewStream::new(header_rx, error_rx, cancel))
    }
}

/// Send `item`, unless the stream is cancelled first
async fn deliver<T>(
    tx: &mpsc::Sender<T>,
    item: T,
    cancel: &Notify,
) -> std::result::Result<(), Stop> {
    tokio::select! {
        biased;
        _ = cancel.notified() => Err(Stop::Cancelled),
        sent = tx.send(item) => sent.map_err(|_| Stop::ConsumerGone),
    }
}

/// Read loop of a streamed XOVER response
///
/// Owns the session until the terminator, a read error, cancellation or
/// consumer loss. Dropping the senders on return closes both queues.
async fn produce_overview(
    mut session: OwnedMutexGuard<Session>,
    format: Arc<OverviewFormat>,
    header_tx: mpsc::Sender<Header>,
    error_tx: mpsc::Sender<NntpError>,
    cancel: Arc<Notify>,
) {
    let mut decoded = 0usize;
    let mut failed = 0usize;

    let stop = loop {
        let read = tokio::select! {
            biased;
            _ = cancel.notified() => None,
            line = session.read_line() => Some(line),
        };

        let line = match read {
            None => break Some(Stop::Cancelled),
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!("XOVER stream read failed after {} lines: {}", decoded + failed, e);
                session.mark_broken();
                // Terminal entry; nothing left to do if the consumer is gone
                let _ = deliver(&error_tx, e, &cancel).await;
                return;
            }
        };

        let data = match unstuff(&line) {
            BlockLine::End => break None,
            BlockLine::Data(data) => data,
        };

        let delivered = match commands::parse_xover_line(&format, data) {
            Ok(header) => {
                decoded += 1;
                deliver(&header_tx, header, &cancel).await
            }
            Err(e) => {
                failed += 1;
                trace!("Skipping overview line: {}", e);
                match deliver(&error_tx, e, &cancel).await {
                    // Nobody reads decode errors; keep serving headers
                    Err(Stop::ConsumerGone) => Ok(()),
                    delivered => delivered,
                }
            }
        };
        if let Err(stop) = delivered {
            break Some(stop);
        }
    };

    match stop {
        None => debug!(
            "XOVER stream complete: {} decoded, {} failed",
            decoded, failed
        ),
        Some(Stop::Cancelled) => {
            debug!("XOVER stream cancelled after {} lines", decoded + failed);
            session.mark_broken();
            // Queue may be full; the closure alone still ends the stream
            let _ = error_tx.try_send(NntpError::Cancelled);
        }
        Some(Stop::ConsumerGone) => {
            debug!("XOVER stream consumer gone after {} lines", decoded + failed);
            session.mark_broken();
        }
    }
}
