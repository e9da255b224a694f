//! Incoming HTTP request type.
//!
//! A thin wrapper over the engine's parsed request: [`http::request::Parts`]
//! plus a fully collected body. breeze does not interpret the body bytes —
//! parse them with whatever serialiser your application uses.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request.
pub struct Request {
    method: Method,
    parts: http::request::Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, parts, body, params }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The full header map, as parsed by the engine.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// Returns a header value as a string.
    ///
    /// `None` means the header is absent *or* carries bytes that are not
    /// valid UTF-8. A present-but-empty header returns `Some("")` — use
    /// [`contains_header`](Request::contains_header) when the distinction
    /// between "absent" and "present but empty" matters.
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Whether the request carries the named header at all, empty or not.
    pub fn contains_header(&self, name: impl http::header::AsHeaderName) -> bool {
        self.parts.headers.contains_key(name)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::ORIGIN;

    fn request_with(headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri("/things");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        Request::new(Method::Get, parts, Bytes::new(), HashMap::new())
    }

    #[test]
    fn absent_header_is_distinguished_from_empty() {
        let absent = request_with(&[]);
        assert_eq!(absent.header(ORIGIN), None);
        assert!(!absent.contains_header(ORIGIN));

        let empty = request_with(&[("origin", "")]);
        assert_eq!(empty.header(ORIGIN), Some(""));
        assert!(empty.contains_header(ORIGIN));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = request_with(&[("Origin", "https://a.example")]);
        assert_eq!(req.header(ORIGIN), Some("https://a.example"));
    }
}
