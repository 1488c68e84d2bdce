//! NNTP command builders and response parsers

// Module declarations
pub mod group;
pub mod over;
pub mod response;

pub use group::*;
pub use over::*;
pub use response::*;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{NntpError, Result};

/// Layout of the DATE reply timestamp (RFC 3977 §7.1)
const SERVER_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

// Authentication and connection management commands

/// Build AUTHINFO USER command
pub fn authinfo_user(username: &str) -> String {
    format!("AUTHINFO USER {}\r\n", username)
}

/// Build AUTHINFO PASS command
pub fn authinfo_pass(password: &str) -> String {
    format!("AUTHINFO PASS {}\r\n", password)
}

/// Build QUIT command
pub fn quit() -> &'static str {
    "QUIT\r\n"
}

// Server information

/// Build HELP command (RFC 3977 §7.2)
pub fn help() -> &'static str {
    "HELP\r\n"
}

/// Build DATE command (RFC 3977 §7.1)
pub fn date() -> &'static str {
    "DATE\r\n"
}

/// Parse the timestamp of a DATE reply ("111 yyyymmddhhmmss")
///
/// The server clock is always reported in UTC.
pub fn parse_server_date(message: &str) -> Result<DateTime<Utc>> {
    let timestamp = message.split_whitespace().next().unwrap_or_default();
    NaiveDateTime::parse_from_str(timestamp, SERVER_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            NntpError::InvalidResponse(format!("failed to parse returned date '{message}': {e}"))
        })
}

/// Join HELP text lines, each followed by a newline
pub fn help_text(lines: &[String]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}
