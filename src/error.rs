//! NNTP error types

use std::num::ParseIntError;
use thiserror::Error;

/// NNTP protocol, connection and overview decoding errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during secure connection
    #[error("TLS error: {0}")]
    Tls(String),

    /// Configured read timeout elapsed
    #[error("Connection timeout")]
    Timeout,

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Status code outside the set expected for the exchange
    #[error("NNTP error {code}: {message}")]
    Protocol {
        /// NNTP response code (e.g., 411, 480, 502)
        code: u16,
        /// Error message from server
        message: String,
    },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// No such newsgroup
    #[error("No such newsgroup: {0}")]
    NoSuchGroup(String),

    /// Connection closed unexpectedly
    #[error("Connection closed")]
    ConnectionClosed,

    /// Connection lost sync with the server earlier and must be discarded
    #[error("Connection is broken")]
    Broken,

    /// Streaming read stopped on request before the end of the block
    #[error("Overview stream cancelled")]
    Cancelled,

    /// Overview line carries more columns than the overview format describes
    #[error("overview format only knows about {known} field(s), field {given} given")]
    FieldCount {
        /// Number of descriptors in the active format
        known: usize,
        /// 1-based position of the first undescribed column
        given: usize,
    },

    /// A column expected to hold an unsigned integer does not
    #[error("failed to parse {field} '{value}': {source}")]
    InvalidNumber {
        /// Which value was being parsed ("message number", "bytes", "lines")
        field: &'static str,
        /// Offending raw text
        value: String,
        /// Underlying integer parse failure
        source: ParseIntError,
    },

    /// No known date layout matched
    #[error("invalid date format '{value}': does not match known format. Known formats: {layouts:?}")]
    InvalidDate {
        /// Offending raw text
        value: String,
        /// Every layout that was attempted, in order
        layouts: Vec<&'static str>,
    },

    /// Decoding one column of an overview line failed
    #[error("failed to map field {index} ('{value}'): {source}")]
    Field {
        /// 0-based column index, not counting the message number
        index: usize,
        /// Raw column text
        value: String,
        /// Underlying failure
        source: Box<NntpError>,
    },

    /// Decoding an overview line failed
    #[error("failed to parse line '{line}': {source}")]
    Line {
        /// Raw overview line
        line: String,
        /// Underlying failure
        source: Box<NntpError>,
    },
}

impl NntpError {
    /// Whether this error only affects a single overview line
    ///
    /// Decode errors never end an overview stream; everything else
    /// (transport, protocol, cancellation) is fatal to the exchange.
    pub fn is_decode_error(&self) -> bool {
        match self {
            NntpError::FieldCount { .. }
            | NntpError::InvalidNumber { .. }
            | NntpError::InvalidDate { .. } => true,
            NntpError::Field { source, .. } | NntpError::Line { source, .. } => {
                source.is_decode_error()
            }
            _ => false,
        }
    }

    /// Innermost error, looking through the `Field` and `Line` wrappers
    pub fn root_cause(&self) -> &NntpError {
        match self {
            NntpError::Field { source, .. } | NntpError::Line { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;
