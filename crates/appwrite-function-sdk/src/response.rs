//! HTTP Response representation for functions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents the response an invocation hands back to the host.
///
/// # Quick Reference
///
/// | Method | Status | Use Case |
/// |--------|--------|----------|
/// | `send(body, status)` | any | Plain text body |
/// | `json(value, status)` | any | JSON body |
/// | `empty()` | 204 | No body |
/// | `redirect(url, status)` | 3xx | `Location` redirect |
/// | `text(body)` / `ok(value)` | 200 | Shorthands for `send` / `json` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: Option<String>,
}

impl Response {
    /// Create a new response with the given status code (no body).
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Send a plain text body.
    ///
    /// # Example
    /// ```ignore
    /// Response::send("Hello, World!", 200)
    /// ```
    pub fn send(body: impl Into<String>, status: u16) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// Send a JSON body.
    ///
    /// # Example
    /// ```ignore
    /// Response::json(json!({"id": "new-id"}), 201)
    /// ```
    pub fn json<T: Serialize>(body: T, status: u16) -> Self {
        Self {
            status,
            headers: HashMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
            body: serde_json::to_string(&body).ok(),
        }
    }

    /// A 204 response without a body.
    pub fn empty() -> Self {
        Self::new(204)
    }

    /// Redirect to `url`.
    ///
    /// # Example
    /// ```ignore
    /// Response::redirect("https://appwrite.io/docs", 301)
    /// ```
    pub fn redirect(url: impl Into<String>, status: u16) -> Self {
        Self::new(status).with_header("Location", url)
    }

    /// 200 OK with a text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::send(body, 200)
    }

    /// 200 OK with a JSON body.
    pub fn ok<T: Serialize>(body: T) -> Self {
        Self::json(body, 200)
    }

    /// Add a header to the response (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merge a set of headers, overriding existing keys.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Header lookup, case-insensitive.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}
