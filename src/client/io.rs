//! Low-level I/O operations for NNTP protocol communication
//!
//! This module provides the I/O primitives used by all client operations:
//! - Command transmission with logging
//! - Single-line status parsing
//! - Dot-terminated block reading, whole or one raw line at a time
//! - Optional read deadline and connection error detection

use super::Session;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::NntpResponse;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{trace, warn};

/// Initial capacity for one wire line
const LINE_CAPACITY: usize = 512;

/// One line of a dot-terminated block after unstuffing
#[derive(Debug, PartialEq, Eq)]
pub(super) enum BlockLine<'a> {
    /// Data line with one leading dot removed if it had one
    Data(&'a str),
    /// The lone "." terminator
    End,
}

/// Classify a raw block line (RFC 3977 §3.1.1)
///
/// A leading "." on a data line is stuffing and is removed once.
pub(super) fn unstuff(line: &str) -> BlockLine<'_> {
    match line.strip_prefix('.') {
        Some("") => BlockLine::End,
        Some(rest) => BlockLine::Data(rest),
        None => BlockLine::Data(line),
    }
}

/// Strip the line terminator (CRLF or bare LF) and nothing else
///
/// Overview lines may legitimately end in a tab, so `trim_end` is not safe.
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

impl Session {
    /// Send a command to the server
    pub(super) async fn send_command(&mut self, command: &str) -> Result<()> {
        trace!("Sending command: {}", command.trim());
        let stream = self.stream.get_mut();
        let written = match stream.write_all(command.as_bytes()).await {
            Ok(()) => stream.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!("Command write failed, marking connection broken: {}", e);
            self.mark_broken();
            return Err(e.into());
        }
        Ok(())
    }

    /// Read one raw line, without its line ending
    ///
    /// A closed connection is [`NntpError::ConnectionClosed`].
    pub(super) async fn read_line(&mut self) -> Result<String> {
        let deadline = self.read_timeout;
        let read = async {
            let mut line_bytes = Vec::with_capacity(LINE_CAPACITY);
            self.stream.read_until(b'\n', &mut line_bytes).await?;

            if line_bytes.is_empty() {
                return Err(NntpError::ConnectionClosed);
            }

            // Servers do send invalid UTF-8 in headers
            let line = String::from_utf8_lossy(&line_bytes);
            Ok(strip_line_ending(&line).to_string())
        };

        match deadline {
            Some(deadline) => timeout(deadline, read).await.map_err(|_| NntpError::Timeout)?,
            None => read.await,
        }
    }

    /// Read a single-line response
    ///
    /// Any failure leaves the reply unread or half read, so the connection
    /// is marked broken.
    pub(super) async fn read_response(&mut self) -> Result<NntpResponse> {
        let line = match self.read_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!("Status line read failed, marking connection broken: {}", e);
                self.mark_broken();
                return Err(e);
            }
        };
        trace!("Received: {}", line);

        let result = commands::parse_single_response(line.trim_end());
        if let Err(NntpError::InvalidResponse(_)) = &result {
            warn!("Unparseable status line, marking connection broken");
            self.mark_broken();
        }
        result
    }

    /// Read a single-line response and require one of `expected`
    pub(super) async fn expect_response(&mut self, expected: &[u16]) -> Result<NntpResponse> {
        let response = self.read_response().await?;
        commands::expect_code(response, expected)
    }

    /// Read the data lines of a dot-terminated block, unstuffed
    pub(super) async fn read_block(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(64);
        loop {
            let line = match self.read_line().await {
                Ok(line) => line,
                Err(e) => {
                    self.mark_broken();
                    return Err(e);
                }
            };
            match unstuff(&line) {
                BlockLine::End => break,
                BlockLine::Data(data) => lines.push(data.to_string()),
            }
        }
        trace!("Received block of {} lines", lines.len());
        Ok(lines)
    }

    /// Read a status line that must be one of `expected`, then its block
    ///
    /// No block is read when the status is unexpected.
    pub(super) async fn read_multiline_response(
        &mut self,
        expected: &[u16],
    ) -> Result<NntpResponse> {
        let mut response = self.expect_response(expected).await?;
        response.lines = self.read_block().await?;
        Ok(response)
    }
}
