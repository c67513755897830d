use thiserror::Error;

use crate::http::request::{Method, Request};

const VERSION: &str = "HTTP/1.1";
const HOST_PREFIX: &str = "Host: ";

/// Stage at which a request failed the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("request head is not valid UTF-8")]
    InvalidEncoding,
    #[error("malformed request line")]
    InvalidRequestLine,
    #[error("unknown method")]
    InvalidMethod,
    #[error("request target must start with '/' and contain no whitespace")]
    InvalidPath,
    #[error("only HTTP/1.1 is accepted")]
    UnsupportedVersion,
    #[error("header line {line} is not of the form `name:value`")]
    InvalidHeader { line: usize },
    #[error("missing or mismatched Host header")]
    MissingHost,
    #[error("header block is not terminated by a blank line")]
    MissingBlankLine,
    #[error("body contains a carriage return")]
    InvalidBody,
}

/// Host header accepted by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRule {
    /// `Host: <host:port>` must match exactly
    Exact(String),
    /// Bound to every interface: any non-empty host, but the port must match
    AnyHost { port: u16 },
}

impl HostRule {
    /// Checks a header line (without its CRLF).
    pub fn matches(&self, line: &str) -> bool {
        let Some(value) = line.strip_prefix(HOST_PREFIX) else {
            return false;
        };
        match self {
            HostRule::Exact(expected) => value == expected,
            HostRule::AnyHost { port } => {
                let suffix = format!(":{}", port);
                value.len() > suffix.len() && value.ends_with(&suffix)
            }
        }
    }
}

/// Parses a raw request buffer.
///
/// The buffer is treated as the complete request; nothing is buffered
/// across calls.
pub fn parse_http_request(buf: &[u8], host: &HostRule) -> Request {
    Request {
        method: parse_method(buf),
        path: parse_path(buf),
        verdict: validate_request(buf, host),
    }
}

/// Method token at the start of the buffer, followed by a space.
pub fn parse_method(buf: &[u8]) -> Option<Method> {
    let (method, _) = split_method(buf)?;
    Some(method)
}

/// Request target following the method: `/` plus the longest run of
/// non-whitespace, which must itself be followed by a space.
pub fn parse_path(buf: &[u8]) -> Option<String> {
    let (_, rest) = split_method(buf)?;
    let text = utf8_prefix(rest);
    let end = text.find(is_space)?;
    let path = &text[..end];
    if !path.starts_with('/') || !text[end..].starts_with(' ') {
        return None;
    }
    Some(path.to_string())
}

/// Runs the request through the grammar stage by stage:
/// request line, header lines, blank line, body.
pub fn validate_request(buf: &[u8], host: &HostRule) -> Result<(), ParseError> {
    let mut lines = Lines::new(buf);

    let request_line = lines.next_line().ok_or(ParseError::InvalidRequestLine)?;
    let request_line = request_line
        .strip_suffix(b"\r")
        .ok_or(ParseError::InvalidRequestLine)?;
    check_request_line(as_text(request_line)?)?;

    let mut host_seen = false;
    let mut line_no = 1;
    loop {
        let raw = lines.next_line().ok_or(ParseError::MissingBlankLine)?;
        if raw == b"\r" {
            break;
        }
        let line = raw
            .strip_suffix(b"\r")
            .ok_or(ParseError::InvalidHeader { line: line_no })?;
        let line = as_text(line)?;
        if !is_header_line(line) {
            return Err(ParseError::InvalidHeader { line: line_no });
        }
        host_seen |= host.matches(line);
        line_no += 1;
    }

    if !host_seen {
        return Err(ParseError::MissingHost);
    }

    if lines.rest().contains(&b'\r') {
        return Err(ParseError::InvalidBody);
    }

    Ok(())
}

fn check_request_line(line: &str) -> Result<(), ParseError> {
    let (method, rest) = line.split_once(' ').ok_or(ParseError::InvalidRequestLine)?;
    Method::from_str(method).ok_or(ParseError::InvalidMethod)?;

    let (path, version) = rest.split_once(' ').ok_or(ParseError::InvalidRequestLine)?;
    if !path.starts_with('/') || path.contains(is_space) {
        return Err(ParseError::InvalidPath);
    }

    if version == VERSION {
        Ok(())
    } else if version.starts_with("HTTP/") && !version.contains(is_space) {
        Err(ParseError::UnsupportedVersion)
    } else {
        Err(ParseError::InvalidRequestLine)
    }
}

/// Unicode whitespace plus the ASCII separators U+001C..U+001F, which the
/// request grammar also counts as blanks.
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Non-empty text, a colon, non-empty text.
fn is_header_line(line: &str) -> bool {
    line.char_indices()
        .any(|(i, c)| c == ':' && i > 0 && i + 1 < line.len())
}

fn split_method(buf: &[u8]) -> Option<(Method, &[u8])> {
    let space = buf.iter().position(|b| *b == b' ')?;
    let method = std::str::from_utf8(&buf[..space]).ok()?;
    Some((Method::from_str(method)?, &buf[space + 1..]))
}

/// Longest valid UTF-8 prefix of `bytes`.
fn utf8_prefix(bytes: &[u8]) -> &str {
    match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let valid = &bytes[..e.valid_up_to()];
            // valid_up_to guarantees this slice is UTF-8
            std::str::from_utf8(valid).unwrap_or_default()
        }
    }
}

fn as_text(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidEncoding)
}

/// Splits on `\n`, leaving any `\r` on the line for the caller to check.
struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn next_line(&mut self) -> Option<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        let end = rest.iter().position(|b| *b == b'\n')?;
        self.pos += end + 1;
        Some(&rest[..end])
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
