//! Overview line decoding
//!
//! Format: "message-number\tfield-1\t...\tfield-N" where the fields are
//! described by an [`OverviewFormat`].

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use super::date::parse_date;
use super::format::{FieldDescriptor, FieldKind, OverviewFormat};
use crate::error::{NntpError, Result};

/// Writes one decoded column into a [`Header`]
pub(super) type ApplyFn = fn(&FieldDescriptor, &str, &mut Header) -> Result<()>;

/// Article metadata decoded from one overview line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Article number within the newsgroup (always the first column)
    pub message_number: u64,
    /// Article subject line
    pub subject: String,
    /// Article author (From header)
    pub author: String,
    /// Article date, `None` if the format has no `Date:` field
    pub date: Option<DateTime<FixedOffset>>,
    /// Unique message ID
    pub message_id: String,
    /// References to parent articles, verbatim (may be empty)
    pub references: String,
    /// Article size in bytes
    pub bytes: u64,
    /// Number of lines in the article
    pub lines: u64,
    /// Fields beyond the standard seven, keyed by header name without colon
    ///
    /// A column the server sent empty is present with an empty value; a
    /// column the server omitted is absent.
    pub extensions: BTreeMap<String, String>,
}

impl Header {
    /// Decode one overview line against `format`
    ///
    /// # Errors
    ///
    /// - [`NntpError::FieldCount`] - more columns than `format` describes
    /// - [`NntpError::InvalidNumber`] - bad message number
    /// - [`NntpError::Field`] - a described column failed to decode
    ///
    /// # Example
    ///
    /// ```
    /// use nntp_overview::{Header, OverviewFormat};
    ///
    /// let format = OverviewFormat::default();
    /// let line = "1\tA\tB\t1 Jan 2020 12:34:56 +0100\t<id>\t\t100\t50";
    /// let header = Header::decode(&format, line).unwrap();
    /// assert_eq!(header.message_number, 1);
    /// assert_eq!(header.bytes, 100);
    /// assert!(header.extensions.is_empty());
    /// ```
    pub fn decode(format: &OverviewFormat, line: &str) -> Result<Header> {
        let mut columns = line.split('\t');
        let number = columns.next().unwrap_or_default();
        let columns: Vec<&str> = columns.collect();

        if columns.len() > format.len() {
            return Err(NntpError::FieldCount {
                known: format.len(),
                given: format.len() + 1,
            });
        }

        let mut header = Header {
            message_number: parse_count("message number", number)?,
            ..Header::default()
        };

        for (idx, value) in columns.into_iter().enumerate() {
            let Some((descriptor, apply)) = format.descriptor(idx) else {
                return Err(NntpError::FieldCount {
                    known: format.len(),
                    given: idx + 1,
                });
            };
            apply(descriptor, value, &mut header).map_err(|e| NntpError::Field {
                index: idx,
                value: value.to_string(),
                source: Box::new(e),
            })?;
        }

        Ok(header)
    }
}

/// Pick the column transform for a field kind
pub(super) fn applier(kind: FieldKind) -> ApplyFn {
    match kind {
        FieldKind::Subject => |_, value, header| {
            header.subject = value.to_string();
            Ok(())
        },
        FieldKind::Author => |_, value, header| {
            header.author = value.to_string();
            Ok(())
        },
        FieldKind::Date => |_, value, header| {
            header.date = Some(parse_date(value)?);
            Ok(())
        },
        FieldKind::MessageId => |_, value, header| {
            header.message_id = value.to_string();
            Ok(())
        },
        FieldKind::References => |_, value, header| {
            header.references = value.to_string();
            Ok(())
        },
        FieldKind::ByteCount => |_, value, header| {
            header.bytes = parse_optional_count("bytes", value)?;
            Ok(())
        },
        FieldKind::LineCount => |_, value, header| {
            header.lines = parse_optional_count("lines", value)?;
            Ok(())
        },
        FieldKind::Extension { .. } => apply_extension,
    }
}

fn apply_extension(descriptor: &FieldDescriptor, value: &str, header: &mut Header) -> Result<()> {
    let prefix = descriptor.full_prefix();
    let value = if prefix.is_empty() {
        value
    } else {
        value.strip_prefix(prefix).unwrap_or(value)
    };
    header
        .extensions
        .insert(descriptor.extension_key().to_string(), value.trim().to_string());
    Ok(())
}

fn parse_count(field: &'static str, value: &str) -> Result<u64> {
    value.parse().map_err(|source| NntpError::InvalidNumber {
        field,
        value: value.to_string(),
        source,
    })
}

// Some servers send the tab but no value
fn parse_optional_count(field: &'static str, value: &str) -> Result<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    parse_count(field, trimmed)
}
