use crate::http::request::{Method, ParsedRequest};
use thiserror::Error;

/// Largest request head (request line plus headers) the server accepts.
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Largest request body the server is willing to buffer and discard.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line")]
    Malformed,

    #[error("method {0} is not supported")]
    MethodNotSupported(String),

    #[error("request head is not valid UTF-8")]
    InvalidEncoding,

    #[error("invalid Content-Length header")]
    InvalidContentLength,

    #[error("request exceeds the size limit")]
    TooLarge,
}

/// Parses the request line at the start of `request`.
///
/// The line must split on whitespace into exactly method, target and
/// version.
pub fn parse_request_line(request: &str) -> Result<ParsedRequest, ParseError> {
    let line = match request.split_once("\r\n") {
        Some((line, _)) => line,
        None => request,
    };

    let mut parts = line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::Malformed);
    };

    Ok(ParsedRequest {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
    })
}

/// Parses a GET request and returns its target unmodified.
pub fn parse_request(request: &str) -> Result<String, ParseError> {
    let parsed = parse_request_line(request)?;

    if parsed.method != Method::GET {
        return Err(ParseError::MethodNotSupported(parsed.method.to_string()));
    }

    Ok(parsed.target)
}

/// Position of the `\r\n\r\n` that ends the request head, if buffered yet.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Decodes the request head, which must be UTF-8.
pub fn decode_head(head: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(head).map_err(|_| ParseError::InvalidEncoding)
}

/// Reads the `Content-Length` header of a request head, 0 when absent.
///
/// Header names are matched case-insensitively.
pub fn declared_content_length(head: &str) -> Result<usize, ParseError> {
    for line in head.split("\r\n").skip(1) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };

        if name.trim().eq_ignore_ascii_case("Content-Length") {
            return value
                .trim()
                .parse()
                .map_err(|_| ParseError::InvalidContentLength);
        }
    }

    Ok(0)
}
