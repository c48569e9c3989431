use crate::http::request::{Method, Request};
use std::collections::HashMap;

/// Marks the end of a request header block.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

const LINE_TERMINATOR: &str = "\r\n";

/// Why a header block was rejected.
///
/// Any of these makes the whole request malformed; the connection that
/// produced it is closed without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Header block is not valid UTF-8
    InvalidEncoding,
    /// No request line followed by a blank line
    InvalidRequest,
    /// Request line has the wrong shape
    InvalidRequestLine,
    /// Method token is not `GET`
    InvalidMethod,
    /// A header line without a `": "` separator
    InvalidHeader,
}

/// Parses exactly one header block (request line, header lines, blank line).
///
/// The block is expected to run up to and including the `\r\n\r\n`
/// terminator; anything after it belongs to the next request and must not
/// be passed in.
pub fn parse_http_request(block: &[u8]) -> Result<Request, ParseError> {
    let text = std::str::from_utf8(block).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines: Vec<&str> = text.split(LINE_TERMINATOR).map(str::trim_end).collect();

    // The terminator splits into two trailing empty lines; keep one as the blank line.
    if lines.len() > 2 && lines[lines.len() - 1].is_empty() && lines[lines.len() - 2].is_empty() {
        lines.pop();
    }

    if lines.len() < 2 {
        return Err(ParseError::InvalidRequest);
    }

    let uri = parse_request_line(lines[0])?;

    // Headers
    let mut headers = HashMap::new();

    for line in &lines[1..lines.len() - 1] {
        let (key, value) = line.split_once(": ").ok_or(ParseError::InvalidHeader)?;

        headers.insert(key.to_ascii_lowercase(), value.to_string());
    }

    Ok(Request {
        method: Method::GET,
        uri: uri.unwrap_or("/").to_string(),
        headers,
    })
}

/// Validates the request line. Returns the URI only for the
/// `GET <uri> HTTP/x` shape; the shorter shapes leave the default in place.
fn parse_request_line(line: &str) -> Result<Option<&str>, ParseError> {
    let parts: Vec<&str> = line.split(' ').filter(|p| !p.is_empty()).collect();

    let method = parts.first().ok_or(ParseError::InvalidRequestLine)?;
    if Method::from_str(method).is_none() {
        return Err(ParseError::InvalidMethod);
    }

    match parts.as_slice() {
        [_] => Ok(None),
        [_, target] if target.starts_with('/') || target.contains("HTTP/") => Ok(None),
        [_, uri, version] if uri.starts_with('/') && version.contains("HTTP/") => Ok(Some(*uri)),
        _ => Err(ParseError::InvalidRequestLine),
    }
}

/// Returns the offset of the first header terminator in `buf`.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}
