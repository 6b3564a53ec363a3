//! Function trait and invocation driver
//!
//! A function is anything implementing [`Function`]. The host side of the
//! contract lives in [`invoke`]: it wraps the request in a [`Context`], runs the
//! function, and turns an `Err` into an error response the same way the host
//! reports an exception thrown from a function.
//!
//! # Example
//!
//! ```ignore
//! use appwrite_function_sdk::prelude::*;
//!
//! struct Hello;
//!
//! impl Function for Hello {
//!     fn call<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<Response, HandlerError>> {
//!         Box::pin(async move {
//!             ctx.log("called");
//!             Ok(Response::text("Hello!"))
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{Context, HandlerError, Request, Response};

/// Type alias for boxed future returned by functions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A function the host can invoke once per request.
pub trait Function: Send + Sync {
    fn call<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<Response, HandlerError>>;
}

/// Everything one invocation reports back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResult {
    pub response: Response,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

/// Run `function` against `req`.
///
/// An `Err` from the function is recorded in the error buffer and replaced by
/// [`HandlerError::to_response`].
pub async fn invoke<F>(function: &F, req: Request) -> InvocationResult
where
    F: Function + ?Sized,
{
    let started = Instant::now();
    let ctx = Context::new(req);

    let response = match function.call(&ctx).await {
        Ok(response) => response,
        Err(err) => {
            ctx.error(err.to_string());
            err.to_response()
        }
    };

    let (logs, errors) = ctx.into_buffers();
    let duration_ms = started.elapsed().as_millis() as u64;

    tracing::debug!(
        status = response.status,
        logs = logs.len(),
        errors = errors.len(),
        duration_ms,
        "Invocation finished"
    );

    InvocationResult {
        response,
        logs,
        errors,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Function for Echo {
        fn call<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<Response, HandlerError>> {
            Box::pin(async move {
                ctx.log(format!("method={}", ctx.req.method));
                Ok(Response::text(ctx.req.path.clone()))
            })
        }
    }

    struct Failing;

    impl Function for Failing {
        fn call<'a>(&'a self, ctx: &'a Context) -> BoxFuture<'a, Result<Response, HandlerError>> {
            Box::pin(async move {
                ctx.log("before failure");
                Err(HandlerError::Configuration("missing key".into()))
            })
        }
    }

    #[tokio::test]
    async fn test_invoke_collects_logs() {
        let result = invoke(&Echo, Request::new("POST", "/echo")).await;
        assert_eq!(result.response.status, 200);
        assert_eq!(result.response.body.as_deref(), Some("/echo"));
        assert_eq!(result.logs, vec!["method=POST"]);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_invoke_reports_errors() {
        let result = invoke(&Failing, Request::default()).await;
        assert_eq!(result.response.status, 500);
        assert_eq!(result.logs, vec!["before failure"]);
        assert_eq!(result.errors, vec!["missing key"]);
    }
}
