//! XOVER command and overview format negotiation

use crate::error::{NntpError, Result};
use crate::overview::{Header, OverviewFormat};

/// Build XOVER command for fetching article overview data
///
/// `range` is e.g. "100-200", "100-" or a single article number.
pub fn xover(range: &str) -> String {
    format!("XOVER {}\r\n", range)
}

/// Build LIST OVERVIEW.FMT command (RFC 3977 §8.4)
pub fn list_overview_fmt() -> &'static str {
    "LIST OVERVIEW.FMT\r\n"
}

/// Build an [`OverviewFormat`] from the LIST OVERVIEW.FMT block
///
/// Each line is a field label such as "Subject:", ":bytes" or "Xref:full".
pub fn parse_overview_fmt(lines: &[String]) -> OverviewFormat {
    OverviewFormat::new(lines.iter().map(|l| l.trim()))
}

/// Decode every line of an XOVER block, failing on the first bad line
pub fn parse_xover_lines(
    format: &OverviewFormat,
    lines: &[String],
) -> Result<Vec<Header>> {
    lines
        .iter()
        .map(|line| parse_xover_line(format, line))
        .collect()
}

/// Decode one XOVER line, naming the line on failure
pub fn parse_xover_line(format: &OverviewFormat, line: &str) -> Result<Header> {
    format.parse_line(line).map_err(|e| NntpError::Line {
        line: line.to_string(),
        source: Box::new(e),
    })
}
