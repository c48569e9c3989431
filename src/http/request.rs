use std::collections::HashMap;

/// HTTP request methods.
///
/// The server only answers `GET`; any other method token makes the whole
/// request malformed, so it never reaches this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

/// Represents a parsed HTTP request from a client.
///
/// Header names are stored lowercased. When a header name repeats, the last
/// occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method (always GET)
    pub method: Method,
    /// The request URI (e.g. "/static/index.html"); always starts with '/'
    pub uri: String,
    /// Request headers keyed by lowercase name
    pub headers: HashMap<String, String>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    uri: Option<String>,
    headers: HashMap<String, String>,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use searchd::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            uri: None,
            headers: HashMap::new(),
        }
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Adds a header; the name is lowercased and later values overwrite earlier ones.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Builds the request. The URI defaults to "/".
    pub fn build(self) -> Request {
        Request {
            method: Method::GET,
            uri: self.uri.unwrap_or_else(|| "/".to_string()),
            headers: self.headers,
        }
    }
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the header value if present, `None` otherwise.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// Only an explicit `Connection: close` ends the connection.
    pub fn keep_alive(&self) -> bool {
        !self
            .header("connection")
            .map(|v| v.trim().eq_ignore_ascii_case("close"))
            .unwrap_or(false)
    }
}
