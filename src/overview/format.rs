//! Overview format (LIST OVERVIEW.FMT, RFC 3977 §8.4)
//!
//! The server reports which fields it puts in an overview line and in which
//! order. Each label is classified once, when the format is built, so decoding
//! a column is a table lookup rather than a string comparison.

use std::fmt;

use super::header::{self, ApplyFn, Header};
use crate::error::Result;

/// Labels used when the server cannot report its overview format
///
/// RFC 3977 §8.4.2 requires these seven fields, in this order, first in
/// every overview line.
pub const DEFAULT_FIELDS: [&str; 7] = [
    "Subject:",
    "From:",
    "Date:",
    "Message-ID:",
    "References:",
    ":bytes",
    ":lines",
];

/// Semantic role of one overview column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `Subject:`
    Subject,
    /// `From:`
    Author,
    /// `Date:`
    Date,
    /// `Message-ID:`
    MessageId,
    /// `References:`
    References,
    /// `:bytes` or `Bytes:`
    ByteCount,
    /// `:lines` or `Lines:`
    LineCount,
    /// Any other header
    Extension {
        /// Whether the column repeats the header name (`Xref:full`)
        full: bool,
    },
}

impl FieldKind {
    /// Classify a server-reported label, ignoring case
    ///
    /// Never fails: unknown labels are extensions.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_ascii_lowercase();
        match lower.as_str() {
            "subject:" => FieldKind::Subject,
            "from:" => FieldKind::Author,
            "date:" => FieldKind::Date,
            "message-id:" => FieldKind::MessageId,
            "references:" => FieldKind::References,
            "bytes:" | ":bytes" => FieldKind::ByteCount,
            "lines:" | ":lines" => FieldKind::LineCount,
            _ => FieldKind::Extension {
                full: lower.ends_with(":full"),
            },
        }
    }
}

/// One entry of an [`OverviewFormat`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    key: String,
    prefix: String,
}

impl FieldDescriptor {
    /// Build a descriptor from the label the server reported
    pub fn new(label: impl Into<String>) -> Self {
        let name = label.into();
        let kind = FieldKind::classify(&name);

        // "Xref:full" -> prefix "Xref:", key "Xref"
        let prefix = match kind {
            FieldKind::Extension { full: true } => name[..name.len() - "full".len()].to_string(),
            _ => String::new(),
        };
        let base = if prefix.is_empty() { name.as_str() } else { prefix.as_str() };
        let key = base.strip_suffix(':').unwrap_or(base).to_string();

        Self {
            name,
            kind,
            key,
            prefix,
        }
    }

    /// Label exactly as reported by the server
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic role of the column
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Key used in [`Header::extensions`] (label without its trailing colon)
    pub fn extension_key(&self) -> &str {
        &self.key
    }

    /// Literal text a `full` column starts with (empty otherwise)
    pub(super) fn full_prefix(&self) -> &str {
        &self.prefix
    }
}

/// Ordered field layout of overview lines
///
/// The message number is always the first column and is not part of the
/// format; descriptor `i` describes column `i + 1`.
///
/// # Example
///
/// ```
/// use nntp_overview::{FieldKind, OverviewFormat};
///
/// let format = OverviewFormat::new(["Subject:", "From:", "Xref:full"]);
/// assert_eq!(format.len(), 3);
/// assert_eq!(format.fields()[2].kind(), FieldKind::Extension { full: true });
/// ```
#[derive(Clone)]
pub struct OverviewFormat {
    fields: Vec<FieldDescriptor>,
    appliers: Vec<ApplyFn>,
}

impl OverviewFormat {
    /// Build a format from the labels returned by LIST OVERVIEW.FMT
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<FieldDescriptor> = labels.into_iter().map(FieldDescriptor::new).collect();
        let appliers = fields.iter().map(|f| header::applier(f.kind)).collect();
        Self { fields, appliers }
    }

    /// Descriptors in column order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of described columns (excluding the message number)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no columns are described
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode one overview line, see [`Header::decode`]
    pub fn parse_line(&self, line: &str) -> Result<Header> {
        Header::decode(self, line)
    }

    pub(super) fn descriptor(&self, idx: usize) -> Option<(&FieldDescriptor, ApplyFn)> {
        Some((self.fields.get(idx)?, *self.appliers.get(idx)?))
    }
}

impl Default for OverviewFormat {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS)
    }
}

impl PartialEq for OverviewFormat {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for OverviewFormat {}

impl fmt::Debug for OverviewFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|d| d.name()))
            .finish()
    }
}
