//! Minimal Appwrite REST client
//!
//! Covers the one call this function makes: listing the documents of a
//! collection. Requests carry the project id, and the API key when one is
//! configured, as `X-Appwrite-*` headers.

use appwrite_function_sdk::BoxFuture;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Response format the document payloads are decoded against.
pub const RESPONSE_FORMAT: &str = "1.4.0";

#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Appwrite returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Result of a list documents call
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    #[serde(default)]
    pub documents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Connection settings shared by every service.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    project: String,
    key: Option<String>,
}

impl Client {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project: String::new(),
            key: None,
        }
    }

    pub fn set_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn set_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn set_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .get(format!("{}{}", self.endpoint, path))
            .header("X-Appwrite-Project", &self.project)
            .header("X-Appwrite-Response-Format", RESPONSE_FORMAT);
        if let Some(key) = &self.key {
            request = request.header("X-Appwrite-Key", key);
        }
        request
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to a document collection.
pub trait DocumentStore: Send + Sync {
    fn list_documents<'a>(
        &'a self,
        database_id: &'a str,
        collection_id: &'a str,
    ) -> BoxFuture<'a, Result<DocumentList, AppwriteError>>;
}

/// The Databases service
#[derive(Debug, Clone)]
pub struct Databases {
    client: Client,
}

impl Databases {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_documents(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> Result<DocumentList, AppwriteError> {
        let path = format!(
            "/databases/{}/collections/{}/documents",
            database_id, collection_id
        );
        tracing::debug!(endpoint = %self.client.endpoint(), %path, "Listing documents");

        let response = self.client.get(&path).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(AppwriteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

impl DocumentStore for Databases {
    fn list_documents<'a>(
        &'a self,
        database_id: &'a str,
        collection_id: &'a str,
    ) -> BoxFuture<'a, Result<DocumentList, AppwriteError>> {
        Box::pin(self.fetch_documents(database_id, collection_id))
    }
}

/// In-process stand-in for the Appwrite documents endpoint.
#[cfg(test)]
pub(crate) mod stub {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    /// Headers of one request the stub answered.
    #[derive(Debug, Clone)]
    pub struct Seen {
        pub project: Option<String>,
        pub key: Option<String>,
        pub response_format: Option<String>,
    }

    #[derive(Clone, Default)]
    pub struct Recorded(Arc<Mutex<Vec<Seen>>>);

    impl Recorded {
        pub fn requests(&self) -> Vec<Seen> {
            self.0.lock().unwrap().clone()
        }
    }

    fn header(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn documents(
        State(recorded): State<Recorded>,
        Path((db, col)): Path<(String, String)>,
        headers: HeaderMap,
    ) -> (StatusCode, Json<Value>) {
        let seen = Seen {
            project: header(&headers, "x-appwrite-project"),
            key: header(&headers, "x-appwrite-key"),
            response_format: header(&headers, "x-appwrite-response-format"),
        };
        recorded.0.lock().unwrap().push(seen.clone());

        if seen.project.as_deref() != Some("project") {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Project is not accessible", "code": 401})),
            );
        }
        if db != "db" || col != "col" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "Collection not found", "code": 404})),
            );
        }
        let key = seen.key.unwrap_or_else(|| "none".to_string());
        (
            StatusCode::OK,
            Json(json!({"total": 2, "documents": [{"$id": "a", "key": key}, {"$id": "b"}]})),
        )
    }

    /// Start the stub; returns its `/v1/` endpoint and the request log.
    pub async fn spawn() -> (String, Recorded) {
        let recorded = Recorded::default();
        let app = Router::new()
            .route(
                "/v1/databases/{db}/collections/{col}/documents",
                get(documents),
            )
            .with_state(recorded.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1/", addr), recorded)
    }
}
