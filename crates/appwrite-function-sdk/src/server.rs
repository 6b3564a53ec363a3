//! Local HTTP runtime
//!
//! Serves a [`Function`] over plain HTTP so it can be exercised with curl while
//! developing, outside the platform. Every request path reaches the function.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, Request as HttpRequest, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handler::{invoke, Function, InvocationResult};
use crate::Request;

/// Largest request body the local runtime accepts.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Header carrying the invocation id; generated when absent.
pub const TRIGGER_ID_HEADER: &str = "x-appwrite-trigger-id";

/// Build a router that forwards every request to `function`.
pub fn router<F>(function: Arc<F>) -> Router
where
    F: Function + 'static,
{
    Router::new()
        .route("/", any(handle_invocation::<F>))
        .route("/{*path}", any(handle_invocation::<F>))
        .with_state(function)
}

/// Bind `addr` and serve `function` until the process is stopped.
pub async fn serve<F>(addr: SocketAddr, function: Arc<F>) -> std::io::Result<()>
where
    F: Function + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Function runtime listening on {}", listener.local_addr()?);

    let app = router(function).layer(TraceLayer::new_for_http());
    axum::serve(listener, app).await
}

async fn handle_invocation<F>(
    State(function): State<Arc<F>>,
    request: HttpRequest<Body>,
) -> HttpResponse
where
    F: Function + 'static,
{
    let trigger_id = request
        .headers()
        .get(TRIGGER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(trigger_id = %trigger_id, "Failed to read body: {}", e);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Failed to read body").into_response();
        }
    };

    let sdk_request = to_sdk_request(&parts, &body_bytes);
    tracing::debug!(
        trigger_id = %trigger_id,
        method = %sdk_request.method,
        path = %sdk_request.path,
        "Incoming invocation"
    );

    let result = invoke(function.as_ref(), sdk_request).await;
    for line in &result.logs {
        tracing::info!(trigger_id = %trigger_id, "log: {}", line);
    }
    for line in &result.errors {
        tracing::warn!(trigger_id = %trigger_id, "error: {}", line);
    }

    into_http_response(result, &trigger_id)
}

fn to_sdk_request(parts: &axum::http::request::Parts, body: &bytes::Bytes) -> Request {
    let query_string = parts.uri.query().unwrap_or_default().to_string();
    let query: HashMap<String, String> = url::form_urlencoded::parse(query_string.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let headers: HashMap<String, String> = parts
        .headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let authority = parts
        .headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let (host, port) = split_authority(authority);

    let mut req = Request {
        method: parts.method.to_string(),
        scheme: "http".to_string(),
        host,
        port,
        path: parts.uri.path().to_string(),
        query_string,
        query,
        headers,
        body_raw: String::from_utf8_lossy(body).to_string(),
        url: String::new(),
    };
    req.url = req.build_url();
    req
}

/// Split a Host header into host and port, keeping `[...]` IPv6 literals whole.
fn split_authority(authority: &str) -> (String, u16) {
    const DEFAULT_PORT: u16 = 80;

    let (host, port) = match authority.strip_prefix('[') {
        Some(bracketed) => match bracketed.find(']') {
            Some(end) => (&authority[..end + 2], bracketed[end + 1..].strip_prefix(':')),
            None => (authority, None),
        },
        None => match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        },
    };

    let port = port.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);
    (host.to_string(), port)
}

fn into_http_response(result: InvocationResult, trigger_id: &str) -> HttpResponse {
    let response = result.response;
    let status = StatusCode::from_u16(response.status).unwrap_or_else(|_| {
        tracing::warn!(
            trigger_id = %trigger_id,
            status = response.status,
            "Function returned an invalid status, answering 500"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    });
    let mut builder = HttpResponse::builder()
        .status(status)
        .header(TRIGGER_ID_HEADER, trigger_id)
        .header("x-function-logs", result.logs.len().to_string())
        .header("x-function-errors", result.errors.len().to_string());

    for (key, value) in &response.headers {
        builder = builder.header(key, value);
    }

    match builder.body(Body::from(response.body.unwrap_or_default())) {
        Ok(response) => response,
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxFuture, Context, HandlerError, Response};
    use tower::ServiceExt;

    struct Inspect;

    impl Function for Inspect {
        fn call<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<Response, HandlerError>> {
            Box::pin(async move {
                ctx.log("seen");
                ctx.error("complaint");
                Ok(Response::ok(serde_json::json!({
                    "method": ctx.req.method,
                    "path": ctx.req.path,
                    "q": ctx.req.query_param("q"),
                    "body": ctx.req.body_raw,
                    "url": ctx.req.url,
                })))
            })
        }
    }

    #[test]
    fn authority_keeps_ipv6_literals_whole() {
        assert_eq!(split_authority("localhost:3000"), ("localhost".to_string(), 3000));
        assert_eq!(split_authority("example.com"), ("example.com".to_string(), 80));
        assert_eq!(split_authority("[::1]"), ("[::1]".to_string(), 80));
        assert_eq!(split_authority("[::1]:8080"), ("[::1]".to_string(), 8080));
        assert_eq!(split_authority("[fe80::1"), ("[fe80::1".to_string(), 80));
    }

    #[test]
    fn invalid_status_becomes_500() {
        let mut response = Response::text("odd").with_header("x-kept", "yes");
        response.status = 1000;
        let result = InvocationResult {
            response,
            logs: Vec::new(),
            errors: Vec::new(),
            duration_ms: 0,
        };

        let response = into_http_response(result, "trigger-2");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["x-kept"], "yes");
    }

    #[tokio::test]
    async fn bracketed_host_reaches_the_function() {
        let app = router(Arc::new(Inspect));
        let request = HttpRequest::builder()
            .uri("/")
            .header("host", "[::1]")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["url"], "http://[::1]/");
    }

    #[tokio::test]
    async fn forwards_request_and_reports_counts() {
        let app = router(Arc::new(Inspect));
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/items/1?q=rust%20lang")
            .header("host", "localhost:3000")
            .header(TRIGGER_ID_HEADER, "trigger-1")
            .body(Body::from("payload"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[TRIGGER_ID_HEADER], "trigger-1");
        assert_eq!(response.headers()["x-function-logs"], "1");
        assert_eq!(response.headers()["x-function-errors"], "1");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["path"], "/items/1");
        assert_eq!(value["q"], "rust lang");
        assert_eq!(value["body"], "payload");
        assert_eq!(value["url"], "http://localhost:3000/items/1?q=rust%20lang");
    }
}
