//! Response assembly: the `(status, headers, body)` triple handed back to the host.

use crate::request::HeaderVec;
use bytes::Bytes;
use std::sync::Arc;

/// Reason phrase for the status line
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Body as a controller holds it while handling a request.
///
/// Whatever form it takes, it is normalized into a sequence of chunks when
/// the response is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Full(Bytes),
    Chunked(Vec<Bytes>),
}

impl Body {
    #[must_use]
    pub fn into_chunks(self) -> Vec<Bytes> {
        match self {
            Body::Empty => Vec::new(),
            Body::Full(bytes) => vec![bytes],
            Body::Chunked(chunks) => chunks,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Full(bytes) => bytes.is_empty(),
            Body::Chunked(chunks) => chunks.iter().all(Bytes::is_empty),
        }
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Body::Full(Bytes::from_static(value.as_bytes()))
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Full(Bytes::from(value))
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Full(Bytes::from(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Full(value)
    }
}

impl From<Vec<String>> for Body {
    fn from(value: Vec<String>) -> Self {
        Body::Chunked(value.into_iter().map(Bytes::from).collect())
    }
}

impl From<Vec<Bytes>> for Body {
    fn from(value: Vec<Bytes>) -> Self {
        Body::Chunked(value)
    }
}

/// Final response. `body` is always a sequence, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderVec,
    pub body: Vec<Bytes>,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: impl Into<Body>) -> Self {
        Self {
            status,
            headers,
            body: body.into().into_chunks(),
        }
    }

    /// Plain-text response
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "text/plain".to_string()));
        let body: String = body.into();
        Self::new(status, headers, body)
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Concatenated body, lossily decoded as UTF-8
    #[must_use]
    pub fn body_string(&self) -> String {
        let bytes: Vec<u8> = self.body.iter().flat_map(|c| c.iter().copied()).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        status_reason(self.status)
    }

    #[must_use]
    pub fn into_parts(self) -> (u16, HeaderVec, Vec<Bytes>) {
        (self.status, self.headers, self.body)
    }
}
