//! Group selection and newsgroup listing

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{NntpError, Result};

/// Build GROUP command
pub fn group(newsgroup: &str) -> String {
    format!("GROUP {}\r\n", newsgroup)
}

/// Build NEWGROUPS command (RFC 3977 §7.3) for groups created after `since`
///
/// The two-digit year form is used because every server understands it.
pub fn newgroups(since: DateTime<Utc>) -> String {
    format!("NEWGROUPS {} GMT\r\n", since.format("%y%m%d %H%M%S"))
}

/// Posting status of a newsgroup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsgroupStatus {
    /// "y": posting is permitted
    PostingPermitted,
    /// "n": posting is not permitted
    PostingProhibited,
    /// "m": postings are forwarded to the moderator
    PostingModerated,
}

impl NewsgroupStatus {
    /// Status flag as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsgroupStatus::PostingPermitted => "y",
            NewsgroupStatus::PostingProhibited => "n",
            NewsgroupStatus::PostingModerated => "m",
        }
    }
}

impl FromStr for NewsgroupStatus {
    type Err = NntpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "y" => Ok(NewsgroupStatus::PostingPermitted),
            "n" => Ok(NewsgroupStatus::PostingProhibited),
            "m" => Ok(NewsgroupStatus::PostingModerated),
            _ => Err(NntpError::InvalidResponse(format!(
                "invalid newsgroup status '{s}', allowed: y, n, m"
            ))),
        }
    }
}

/// One line of a NEWGROUPS listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsgroupOverview {
    /// Newsgroup name
    pub name: String,
    /// Lowest article number
    pub low: u64,
    /// Highest article number
    pub high: u64,
    /// Posting status
    pub status: NewsgroupStatus,
}

/// Reply to GROUP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsgroupDetail {
    /// Newsgroup name
    pub name: String,
    /// Estimated number of articles
    pub number: u64,
    /// Lowest article number
    pub low: u64,
    /// Highest article number
    pub high: u64,
}

fn parse_number(field: &'static str, value: &str) -> Result<u64> {
    value.parse().map_err(|source| NntpError::InvalidNumber {
        field,
        value: value.to_string(),
        source,
    })
}

fn four_parts<'a>(what: &str, line: &'a str) -> Result<[&'a str; 4]> {
    let parts: Vec<&str> = line.split(' ').collect();
    <[&str; 4]>::try_from(parts).map_err(|parts| {
        NntpError::InvalidResponse(format!(
            "invalid {what} line '{line}': must consist of 4 parts separated by space, got {}",
            parts.len()
        ))
    })
}

/// Parse one NEWGROUPS line
///
/// Format: "name high low status"
pub fn parse_newsgroup_overview(line: &str) -> Result<NewsgroupOverview> {
    let [name, high, low, status] = four_parts("newsgroup", line)?;

    Ok(NewsgroupOverview {
        name: name.to_string(),
        status: status.parse()?,
        high: parse_number("high", high)?,
        low: parse_number("low", low)?,
    })
}

/// Parse the text of a 211 GROUP reply
///
/// Format: "number low high name"
pub fn parse_group_response(message: &str) -> Result<NewsgroupDetail> {
    let [number, low, high, name] = four_parts("group", message)?;

    Ok(NewsgroupDetail {
        name: name.to_string(),
        number: parse_number("number", number)?,
        low: parse_number("low", low)?,
        high: parse_number("high", high)?,
    })
}
