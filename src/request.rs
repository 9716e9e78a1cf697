//! Per-dispatch request context.
//!
//! A [`Request`] is created fresh for every inbound request, carries the
//! captures the router extracted, and is discarded once the response exists.

use crate::error::{Error, Result};
use crate::ids::RequestId;
use bytes::Bytes;
use http::{Extensions, Method};
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::io::Read;
use std::sync::Arc;

/// Maximum number of path params before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Named captures. Names are shared with the route table, values are
/// per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Positional captures, in group order.
pub type PositionalVec = SmallVec<[String; MAX_INLINE_PARAMS]>;

/// Header storage. Lookups are case-insensitive per RFC 7230.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Captures attached by the router. The two capture forms never coexist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Params {
    /// The matched pattern had no capture groups (or nothing matched yet)
    #[default]
    None,
    Named(ParamVec),
    Positional(PositionalVec),
}

impl Params {
    /// Named capture by name. If a name repeats, the last occurrence wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Params::Named(params) => params
                .iter()
                .rfind(|(k, _)| k.as_ref() == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn positional(&self, idx: usize) -> Option<&str> {
        match self {
            Params::Positional(values) => values.get(idx).map(String::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Named(params) => params.is_empty(),
            Params::Positional(values) => values.is_empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    request_id: RequestId,
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderVec,
    body: Bytes,
    params: Params,
    extensions: Extensions,
}

impl Request {
    /// Build a request from a raw method string and request target.
    ///
    /// The method is upper-cased before parsing, so `"delete"` is `DELETE`.
    /// Anything after `?` in `target` is kept as the raw query string; the
    /// path itself is used exactly as the transport delivered it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMethod`] if the method is not a valid HTTP token.
    pub fn new(method: &str, target: &str) -> Result<Self> {
        let normalized = method.trim().to_ascii_uppercase();
        let method = Method::from_bytes(normalized.as_bytes())
            .map_err(|_| Error::InvalidMethod(method.to_string()))?;
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };
        Ok(Self {
            request_id: RequestId::new(),
            method,
            path,
            query,
            headers: HeaderVec::new(),
            body: Bytes::new(),
            params: Params::None,
            extensions: Extensions::new(),
        })
    }

    /// Add a header. An `x-request-id` carrying a valid ULID becomes the
    /// request's correlation id.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if name.eq_ignore_ascii_case("x-request-id") {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        self.headers.push((Arc::from(name), value));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Drain a transport body reader into the request.
    pub fn read_body<R: Read>(mut self, mut reader: R) -> std::io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.body = Bytes::from(buf);
        Ok(self)
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Decoded query parameter. If a name repeats, the last occurrence wins.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(k, _)| k == name)
            .last()
            .map(|(_, v)| v.into_owned())
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the body as JSON. An empty body is `null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Parse the body as a JSON object. An empty body is an empty object.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedBody`] if the body is not JSON or not an object.
    pub fn json_object(&self) -> Result<Map<String, Value>> {
        match self.json()? {
            Value::Null => Ok(Map::new()),
            Value::Object(map) => Ok(map),
            _ => Err(Error::MalformedBody(serde::de::Error::custom(
                "expected a JSON object",
            ))),
        }
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Environment-style extension map for host and router data.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}
