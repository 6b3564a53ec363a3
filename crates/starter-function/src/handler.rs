//! The starter function
//!
//! Per invocation: print sample console lines, list the configured collection,
//! log a few messages, then greet GET requests with text and everything else
//! with a small JSON document.

use appwrite_function_sdk::prelude::*;

use crate::appwrite::{Client, Databases, DocumentStore};
use crate::config::FunctionConfig;
use crate::diagnostics::Console;

pub const GREETING: &str = "Hello, World!";

/// Body returned to every non-GET request.
pub fn welcome() -> JsonValue {
    json!({
        "motto": "Build like a team of hundreds_",
        "learn": "https://appwrite.io/docs",
        "connect": "https://appwrite.io/discord",
        "getInspired": "https://builtwith.appwrite.io",
    })
}

#[derive(Debug)]
pub struct StarterFunction {
    config: FunctionConfig,
    console: Console,
}

impl StarterFunction {
    pub fn new(config: FunctionConfig) -> Self {
        Self::with_console(config, Console::stderr())
    }

    pub fn with_console(config: FunctionConfig, console: Console) -> Self {
        Self { config, console }
    }

    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    /// Build the Databases service for this invocation.
    pub fn connect(&self) -> Result<Databases, HandlerError> {
        let mut client = Client::new()
            .set_endpoint(&self.config.endpoint)
            .set_project(&self.config.project_id);

        let key = self
            .config
            .api_key_for_mode()
            .map_err(|e| HandlerError::Configuration(e.to_string()))?;
        if let Some(key) = key {
            client = client.set_key(key);
        }

        Ok(Databases::new(client))
    }

    /// Everything after the client is built, against any document store.
    pub async fn respond(
        &self,
        ctx: &Context,
        store: &dyn DocumentStore,
    ) -> Result<Response, HandlerError> {
        let list = store
            .list_documents(&self.config.database_id, &self.config.collection_id)
            .await
            .map_err(|e| HandlerError::Upstream(e.to_string()))?;
        ctx.log(format!("Found {} documents in the collection", list.total));

        ctx.log(format!(
            "{} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));

        ctx.error("Hello, Errors!");

        if ctx.req.is_method("GET") {
            return Ok(Response::text(GREETING));
        }

        Ok(Response::ok(welcome()))
    }
}

impl Function for StarterFunction {
    fn call<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<Response, HandlerError>> {
        Box::pin(async move {
            self.console.emit_samples();
            let databases = self.connect()?;
            self.respond(ctx, &databases).await
        })
    }
}
