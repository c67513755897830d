use crate::error::ServeError;

/// HTTP status codes the server can produce.
///
/// - `Ok` (200): File or directory index served
/// - `BadRequest` (400): Request failed the grammar
/// - `NotFound` (404): Missing resource or parent-directory path
/// - `MethodNotAllowed` (405): Method other than GET/HEAD
/// - `InternalServerError` (500): Read or listing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rootserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rootserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Headers keep insertion order; they are written exactly as listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Header name/value pairs in wire order
    pub headers: Vec<(String, String)>,
    /// Body bytes; `None` for error responses and HEAD requests
    pub body: Option<Vec<u8>>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use rootserve::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"abc\n".to_vec())
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("4"));
/// assert_eq!(response.header("Connection"), Some("close"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    head_only: bool,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
            head_only: false,
        }
    }

    /// Appends a header; order is preserved on the wire.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Keeps Content-Length for the body but drops the body itself.
    pub fn head_only(mut self) -> Self {
        self.head_only = true;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds Content-Length when a body was set and always finishes with
    /// `Connection: close`.
    pub fn build(mut self) -> Response {
        if let Some(body) = &self.body {
            let len = body.len().to_string();
            self.headers.push(("Content-Length".to_string(), len));
        }
        self.headers
            .push(("Connection".to_string(), "close".to_string()));

        Response {
            status: self.status,
            headers: self.headers,
            body: if self.head_only { None } else { self.body },
        }
    }
}

impl Response {
    /// 200 OK carrying `body`; for HEAD the body is left off.
    pub fn ok(content_type: &str, body: Vec<u8>, send_body: bool) -> Self {
        let builder = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", content_type)
            .body(body);
        if send_body {
            builder.build()
        } else {
            builder.head_only().build()
        }
    }

    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest).build()
    }

    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound).build()
    }

    pub fn method_not_allowed() -> Self {
        ResponseBuilder::new(StatusCode::MethodNotAllowed)
            .header("Allow", "GET, HEAD")
            .build()
    }

    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError).build()
    }

    /// Maps a request failure to its fixed-shape response.
    pub fn from_error(err: &ServeError) -> Self {
        match err.status() {
            StatusCode::BadRequest => Self::bad_request(),
            StatusCode::NotFound => Self::not_found(),
            StatusCode::MethodNotAllowed => Self::method_not_allowed(),
            StatusCode::Ok | StatusCode::InternalServerError => Self::internal_error(),
        }
    }

    /// First header value with the given name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
