//! Consumer side of a streamed XOVER response

use std::sync::Arc;

use tokio::sync::{Notify, mpsc};

use super::header::Header;
use crate::error::{NntpError, Result};

/// Capacity of the decoded header queue
pub const HEADER_QUEUE_CAPACITY: usize = 1024;

/// Capacity of the error queue
pub const ERROR_QUEUE_CAPACITY: usize = 16;

/// Overview entries decoded while the response is still arriving
///
/// Returned by [`NntpClient::xover_stream`](crate::NntpClient::xover_stream).
/// A background task reads the response and pushes each decoded [`Header`]
/// onto `headers` in wire order. Lines that fail to decode go to `errors`
/// and the stream carries on; a connection failure is pushed to `errors` as
/// the last entry. Both queues close when the response ends.
///
/// The two queues are independent: drain both (or use [`next`](Self::next))
/// or the producer will stall once the unread queue is full. Dropping
/// `errors` discards decode errors; dropping `headers` stops the stream and
/// leaves the connection broken.
#[derive(Debug)]
pub struct OverviewStream {
    /// Decoded headers in the order the server sent them
    pub headers: mpsc::Receiver<Header>,
    /// Per-line decode failures, plus at most one terminal connection error
    pub errors: mpsc::Receiver<NntpError>,
    cancel: Arc<Notify>,
    headers_done: bool,
    errors_done: bool,
}

impl OverviewStream {
    pub(crate) fn new(
        headers: mpsc::Receiver<Header>,
        errors: mpsc::Receiver<NntpError>,
        cancel: Arc<Notify>,
    ) -> Self {
        Self {
            headers,
            errors,
            cancel,
            headers_done: false,
            errors_done: false,
        }
    }

    /// Next header or error from either queue, `None` once both are closed
    ///
    /// No ordering between a header and an error is implied.
    pub async fn next(&mut self) -> Option<Result<Header>> {
        loop {
            if self.headers_done && self.errors_done {
                return None;
            }
            tokio::select! {
                header = self.headers.recv(), if !self.headers_done => match header {
                    Some(header) => return Some(Ok(header)),
                    None => self.headers_done = true,
                },
                err = self.errors.recv(), if !self.errors_done => match err {
                    Some(err) => return Some(Err(err)),
                    None => self.errors_done = true,
                },
            }
        }
    }

    /// Drain both queues until the response ends
    pub async fn collect_all(mut self) -> (Vec<Header>, Vec<NntpError>) {
        let mut headers = Vec::new();
        let mut errors = Vec::new();
        while let Some(item) = self.next().await {
            match item {
                Ok(header) => headers.push(header),
                Err(err) => errors.push(err),
            }
        }
        (headers, errors)
    }

    /// Ask the producer to stop before its next read
    ///
    /// Entries already queued stay readable. The rest of the response is
    /// left unread, so the connection is marked broken.
    pub fn cancel(&self) {
        self.cancel.notify_one();
    }
}
