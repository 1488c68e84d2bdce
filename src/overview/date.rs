//! Date parsing for overview `Date:` columns
//!
//! News servers are loose about RFC 5322 dates. Each layout below is tried in
//! order and the first match wins.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::error::{NntpError, Result};

const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Zone abbreviations and their UTC offsets in minutes. Ambiguous names
/// resolve to the first entry.
const ZONES: &[(&str, i32)] = &[
    ("UT", 0),
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("WET", 0),
    ("WEST", 60),
    ("BST", 60),
    ("CET", 60),
    ("CEST", 120),
    ("MET", 60),
    ("MEST", 120),
    ("EET", 120),
    ("EEST", 180),
    ("MSK", 180),
    ("IST", 330),
    ("JST", 540),
    ("AEST", 600),
    ("AEDT", 660),
    ("NZST", 720),
    ("NZDT", 780),
    ("EST", -300),
    ("EDT", -240),
    ("CST", -360),
    ("CDT", -300),
    ("MST", -420),
    ("MDT", -360),
    ("PST", -480),
    ("PDT", -420),
    ("AKST", -540),
    ("AKDT", -480),
    ("HST", -600),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Year {
    Full,
    TwoDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// `+hhmm` / `-hhmm`
    Numeric,
    /// `CEST`, `GMT`, ...
    Abbreviation,
    /// `+hhmm (CET)`; the comment is ignored
    NumericWithComment,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    pattern: &'static str,
    weekday: bool,
    year: Year,
    zone: Zone,
}

const LAYOUTS: [Layout; 7] = [
    Layout {
        pattern: "%a, %d %b %Y %H:%M:%S %z",
        weekday: true,
        year: Year::Full,
        zone: Zone::Numeric,
    },
    Layout {
        pattern: "%a, %d %b %Y %H:%M:%S %Z",
        weekday: true,
        year: Year::Full,
        zone: Zone::Abbreviation,
    },
    Layout {
        pattern: "%d %b %Y %H:%M:%S %z",
        weekday: false,
        year: Year::Full,
        zone: Zone::Numeric,
    },
    Layout {
        pattern: "%a, %d %b %Y %H:%M:%S %z (%Z)",
        weekday: true,
        year: Year::Full,
        zone: Zone::NumericWithComment,
    },
    Layout {
        pattern: "%a, %d %b %y %H:%M:%S %Z",
        weekday: true,
        year: Year::TwoDigit,
        zone: Zone::Abbreviation,
    },
    Layout {
        pattern: "%d %b %y %H:%M:%S %Z",
        weekday: false,
        year: Year::TwoDigit,
        zone: Zone::Abbreviation,
    },
    Layout {
        pattern: "%d %b %Y %H:%M:%S %Z",
        weekday: false,
        year: Year::Full,
        zone: Zone::Abbreviation,
    },
];

/// Every layout [`parse_date`] attempts, in order
pub fn date_layouts() -> Vec<&'static str> {
    LAYOUTS.iter().map(|layout| layout.pattern).collect()
}

/// Parse an overview date into an absolute instant
///
/// # Examples
///
/// ```
/// use nntp_overview::parse_overview_date;
///
/// let a = parse_overview_date("1 Jan 2020 12:34:56 +0100").unwrap();
/// let b = parse_overview_date("Wed, 01 Jan 2020 12:34:56 +0100 (CET)").unwrap();
/// assert_eq!(a, b);
/// ```
///
/// # Errors
///
/// Returns [`NntpError::InvalidDate`] naming every attempted layout when none
/// of them matches.
pub fn parse_date(s: &str) -> Result<DateTime<FixedOffset>> {
    let s = s.trim();
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(s))
        .ok_or_else(|| NntpError::InvalidDate {
            value: s.to_string(),
            layouts: date_layouts(),
        })
}

impl Layout {
    fn parse(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        let rest = if self.weekday {
            let (weekday, rest) = s.split_once(',')?;
            if !WEEKDAYS.contains(&weekday.to_ascii_lowercase().as_str()) {
                return None;
            }
            rest
        } else {
            s
        };

        let tokens: Vec<&str> = rest.split_whitespace().collect();
        let expected = match self.zone {
            Zone::NumericWithComment => 6,
            _ => 5,
        };
        if tokens.len() != expected {
            return None;
        }

        let day = parse_digits(tokens[0], 1, 2)?;
        let month = month_number(tokens[1])?;
        let year = match self.year {
            Year::Full => parse_digits(tokens[2], 4, 4)? as i32,
            Year::TwoDigit => expand_year(parse_digits(tokens[2], 2, 2)?),
        };
        let (hour, minute, second) = parse_time(tokens[3])?;

        let offset_minutes = match self.zone {
            Zone::Numeric => numeric_offset(tokens[4])?,
            Zone::Abbreviation => abbreviation_offset(tokens[4])?,
            Zone::NumericWithComment => {
                if !is_zone_comment(tokens[5]) {
                    return None;
                }
                numeric_offset(tokens[4])?
            }
        };

        let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        let offset = FixedOffset::east_opt(offset_minutes * 60)?;
        offset.from_local_datetime(&naive).single()
    }
}

fn parse_digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn expand_year(yy: u32) -> i32 {
    if yy >= 69 {
        1900 + yy as i32
    } else {
        2000 + yy as i32
    }
}

fn month_number(s: &str) -> Option<u32> {
    let lower = s.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|idx| idx as u32 + 1)
}

fn parse_time(s: &str) -> Option<(u32, u32, u32)> {
    let mut parts = s.split(':');
    let hour = parse_digits(parts.next()?, 2, 2)?;
    let minute = parse_digits(parts.next()?, 2, 2)?;
    let second = parse_digits(parts.next()?, 2, 2)?;
    if parts.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}

fn numeric_offset(s: &str) -> Option<i32> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, s.get(1..)?),
        b'-' => (-1, s.get(1..)?),
        _ => return None,
    };
    if digits.len() != 4 {
        return None;
    }
    // Byte length alone does not rule out multi-byte characters
    let hours = parse_digits(digits.get(..2)?, 2, 2)? as i32;
    let minutes = parse_digits(digits.get(2..)?, 2, 2)? as i32;
    if minutes >= 60 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

fn abbreviation_offset(s: &str) -> Option<i32> {
    if s.is_empty() || s.len() > 5 || !s.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let upper = s.to_ascii_uppercase();
    // Unknown names get a zero offset, as a host zone lookup would
    Some(
        ZONES
            .iter()
            .find(|(name, _)| *name == upper)
            .map_or(0, |(_, minutes)| *minutes),
    )
}

fn is_zone_comment(s: &str) -> bool {
    s.len() > 2 && s.starts_with('(') && s.ends_with(')')
}
