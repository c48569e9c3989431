use bytes::BytesMut;
use std::collections::HashMap;

/// Protocol string used on every status line.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): Request successful
/// - `NotFound` (404): Static file not found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use searchd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use searchd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// An HTTP response under construction or ready to be sent.
///
/// The body is built incrementally with [`Response::append_to_body`].
/// `Content-Length` is derived from the body when the response is
/// serialized, so it never needs to be set by hand.
#[derive(Debug, Clone)]
pub struct Response {
    /// Protocol string for the status line
    pub protocol: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: BytesMut,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use searchd::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<html></html>".to_vec())
///     .build();
/// assert_eq!(response.content_type(), Some("text/html"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    body: BytesMut,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: BytesMut::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl AsRef<[u8]>) -> Self {
        self.body = BytesMut::from(body.as_ref());
        self
    }

    /// Builds the final Response.
    pub fn build(self) -> Response {
        Response {
            protocol: HTTP_VERSION.to_string(),
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl AsRef<[u8]>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// Appends a fragment to the body.
    pub fn append_to_body(&mut self, fragment: impl AsRef<[u8]>) {
        self.body.extend_from_slice(fragment.as_ref());
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.headers
            .insert("Content-Type".to_string(), content_type.to_string());
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type").map(|v| v.as_str())
    }

    /// Status message for the status line.
    pub fn message(&self) -> &'static str {
        self.status.reason_phrase()
    }
}
