//! Status line parsing and status-code checks

use crate::error::{NntpError, Result};
use crate::response::NntpResponse;

/// Parse NNTP status line into code and message
///
/// Format: "ddd text" where ddd is a 3-digit code.
pub fn parse_response_line(line: &str) -> Result<(u16, String)> {
    // Some broken servers/proxies prepend a UTF-8 BOM
    let line = line.trim_start_matches('\u{FEFF}');
    let invalid = || NntpError::InvalidResponse(line.chars().take(100).collect());

    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    // "2000 text" is not code 200
    if bytes.get(3).is_some_and(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let code = line[..3].parse::<u16>().map_err(|_| invalid())?;
    let rest = &line[3..];
    let message = rest.strip_prefix(' ').unwrap_or(rest).to_string();

    Ok((code, message))
}

/// Parse single-line NNTP response
pub fn parse_single_response(line: &str) -> Result<NntpResponse> {
    let (code, message) = parse_response_line(line)?;

    Ok(NntpResponse {
        code,
        message,
        lines: vec![],
    })
}

/// Fail with [`NntpError::Protocol`] unless the response code is in `expected`
pub fn expect_code(response: NntpResponse, expected: &[u16]) -> Result<NntpResponse> {
    if expected.contains(&response.code) {
        Ok(response)
    } else {
        Err(NntpError::Protocol {
            code: response.code,
            message: response.message,
        })
    }
}
