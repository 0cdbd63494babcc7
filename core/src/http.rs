//! Plain-data HTTP request and response types.
//!
//! # Design
//! The connection shapes every call into an `HttpRequest` before any I/O
//! happens, so URL and body construction stay testable without a server.
//! The executor turns an `HttpRequest` into an `HttpResponse` whose body is
//! left undecoded; decoding is the caller's job.

use std::fmt;
use std::io::Read;

use bytes::{Buf, Bytes};

/// HTTP method for a request. Only the four verbs of the CRUD surface exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    /// Whether the verb must carry a JSON body.
    pub fn requires_body(self) -> bool {
        matches!(self, HttpMethod::Put | HttpMethod::Post)
    }

    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// An HTTP request described as plain data.
///
/// `body` holds already-serialized UTF-8 JSON. It is `None` for GET and
/// DELETE, and also for PUT/POST when the model serialized to nothing, in
/// which case the executor refuses to send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }
}

/// A successful response whose payload has not been decoded yet.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    /// The raw payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// A reader over the payload for callers that want a stream.
    pub fn reader(&self) -> impl Read {
        self.body.clone().reader()
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}
