//! HTTP Request representation for functions

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Represents the request that triggered an invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: String,

    /// URL scheme ("http" or "https")
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Hostname the request was addressed to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the request was addressed to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request path (e.g., "/items/123")
    #[serde(default = "default_path")]
    pub path: String,

    /// Raw query string without the leading '?'
    #[serde(default)]
    pub query_string: String,

    /// Query parameters
    #[serde(default)]
    pub query: HashMap<String, String>,

    /// HTTP headers, lowercased by the host
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Raw request body
    #[serde(default)]
    pub body_raw: String,

    /// Full request URL
    #[serde(default)]
    pub url: String,
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_path() -> String {
    "/".to_string()
}

impl Request {
    /// Build a request for the given method and path on the default host.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        let mut req = Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        };
        req.url = req.build_url();
        req
    }

    /// Reassemble the full URL from scheme, host, port, path and query string.
    pub fn build_url(&self) -> String {
        let default_port = matches!(
            (self.scheme.as_str(), self.port),
            ("http", 80) | ("https", 443)
        );
        let mut url = if default_port {
            format!("{}://{}{}", self.scheme, self.host, self.path)
        } else {
            format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
        };
        if !self.query_string.is_empty() {
            url.push('?');
            url.push_str(&self.query_string);
        }
        url
    }

    /// Parse the body as JSON into a typed struct.
    ///
    /// An empty body is treated as JSON `null`.
    ///
    /// # Example
    /// ```ignore
    /// #[derive(Deserialize)]
    /// struct CreateUser { name: String, email: String }
    ///
    /// let user: CreateUser = ctx.req.body_json()?;
    /// ```
    pub fn body_json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, HandlerError> {
        let raw = if self.body_raw.is_empty() { "null" } else { self.body_raw.as_str() };
        serde_json::from_str(raw)
            .map_err(|e| HandlerError::BadRequest(format!("Invalid JSON: {}", e)))
    }

    /// The body as the host presents it: parsed JSON for JSON requests,
    /// otherwise the raw text.
    pub fn body(&self) -> Value {
        if self.is_json() {
            if let Ok(value) = serde_json::from_str(&self.body_raw) {
                return value;
            }
        }
        Value::String(self.body_raw.clone())
    }

    /// Get a query parameter as a string reference.
    pub fn query_param(&self, key: &str) -> Option<&String> {
        self.query.get(key)
    }

    /// Get a header value (case-insensitive lookup).
    ///
    /// # Example
    /// ```ignore
    /// let auth = req.header("Authorization"); // Works with any case
    /// ```
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Check if request method matches (case-insensitive).
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// Get the Content-Type header value.
    pub fn content_type(&self) -> Option<&String> {
        self.header("Content-Type")
    }

    /// Check if the request has a JSON content type.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            scheme: default_scheme(),
            host: default_host(),
            port: default_port(),
            path: default_path(),
            query_string: String::new(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body_raw: String::new(),
            url: "http://localhost:3000/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let mut req = Request::default();
        req.headers.insert("content-type".into(), "application/json".into());
        assert_eq!(req.header("Content-Type").map(String::as_str), Some("application/json"));
        assert!(req.is_json());
    }

    #[test]
    fn body_parses_json_only_for_json_requests() {
        let mut req = Request::new("POST", "/");
        req.body_raw = r#"{"a":1}"#.into();
        assert_eq!(req.body(), json!(r#"{"a":1}"#));

        req.headers.insert("content-type".into(), "application/json; charset=utf-8".into());
        assert_eq!(req.body(), json!({"a": 1}));
    }

    #[test]
    fn empty_body_is_null_json() {
        let req = Request::default();
        let value: Option<i32> = req.body_json().unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn invalid_json_is_bad_request() {
        let mut req = Request::new("POST", "/");
        req.body_raw = "{not json".into();
        let err = req.body_json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn url_omits_default_port() {
        let mut req = Request::new("GET", "/ping");
        req.scheme = "https".into();
        req.host = "cloud.appwrite.io".into();
        req.port = 443;
        req.query_string = "a=1".into();
        assert_eq!(req.build_url(), "https://cloud.appwrite.io/ping?a=1");
        assert_eq!(Request::new("GET", "/x").url, "http://localhost:3000/x");
    }

    #[test]
    fn deserializes_with_defaults() {
        let req: Request = serde_json::from_value(json!({"method": "POST"})).unwrap();
        assert_eq!(req.path, "/");
        assert_eq!(req.port, 3000);
        assert!(req.is_method("post"));
    }
}
