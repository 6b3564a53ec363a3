//! Appwrite Function SDK - Types and utilities for writing Appwrite functions in Rust
//!
//! This crate models the contract the function host hands to every invocation:
//! the inbound request, the response helpers, and the `log`/`error` callables.

pub mod request;
pub mod response;
pub mod context;
pub mod handler;
pub mod ipc;
pub mod error;

#[cfg(feature = "server")]
pub mod server;

pub mod prelude {
    //! Common imports for Appwrite functions
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::context::Context;
    pub use crate::handler::{BoxFuture, Function, InvocationResult};
    pub use crate::error::HandlerError;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value as JsonValue};
}

// Re-export key types at crate root
pub use request::Request;
pub use response::Response;
pub use context::Context;
pub use handler::{invoke, BoxFuture, Function, InvocationResult};
pub use error::HandlerError;
