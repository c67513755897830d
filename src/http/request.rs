use std::fmt;

use crate::http::parser::ParseError;

/// HTTP request methods recognised by the request grammar.
///
/// Only GET and HEAD are served; the rest parse but are answered with
/// 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// TRACE - Loop the request back
    TRACE,
    /// CONNECT - Open a tunnel
    CONNECT,
}

impl Method {
    pub const ALL: [Method; 8] = [
        Method::OPTIONS,
        Method::GET,
        Method::HEAD,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::TRACE,
        Method::CONNECT,
    ];

    /// Parses an HTTP method token.
    ///
    /// # Arguments
    ///
    /// * `s` - Method token (case-sensitive)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the token is one of the eight canonical methods, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use rootserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("PATCH"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::OPTIONS => "OPTIONS",
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::TRACE => "TRACE",
            Method::CONNECT => "CONNECT",
        }
    }

    /// GET and HEAD are the only methods the server answers with content.
    pub fn is_servable(&self) -> bool {
        matches!(self, Method::GET | Method::HEAD)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of parsing one raw request.
///
/// Method and path are extracted independently of the overall verdict, so an
/// invalid request may still report both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method token at the very start of the request, if any
    pub method: Option<Method>,
    /// Request target following the method, always beginning with `/`
    pub path: Option<String>,
    /// `Ok(())` when the whole request matches the grammar
    pub verdict: Result<(), ParseError>,
}

impl Request {
    pub fn is_valid(&self) -> bool {
        self.verdict.is_ok()
    }

    /// Method and path of a structurally valid request.
    pub fn target(&self) -> Option<(Method, &str)> {
        if !self.is_valid() {
            return None;
        }
        Some((self.method?, self.path.as_deref()?))
    }
}
