//! Per-invocation context
//!
//! The host gives every invocation a request plus two logging callables.
//! Messages passed to [`Context::log`] and [`Context::error`] are collected and
//! returned to the host alongside the response, and mirrored to `tracing` so
//! they also show up in the process output.

use std::sync::Mutex;

use crate::Request;

/// Context passed to every function invocation
#[derive(Debug)]
pub struct Context {
    /// The request that triggered this invocation
    pub req: Request,
    logs: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl Context {
    pub fn new(req: Request) -> Self {
        Self {
            req,
            logs: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    /// Record an informational message for this invocation.
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "function", "{}", message);
        push(&self.logs, message);
    }

    /// Record an error message for this invocation.
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "function", "{}", message);
        push(&self.errors, message);
    }

    /// Messages recorded through [`Context::log`] so far.
    pub fn logs(&self) -> Vec<String> {
        snapshot(&self.logs)
    }

    /// Messages recorded through [`Context::error`] so far.
    pub fn errors(&self) -> Vec<String> {
        snapshot(&self.errors)
    }

    /// Consume the context and return its `(logs, errors)` buffers.
    pub fn into_buffers(self) -> (Vec<String>, Vec<String>) {
        (into_inner(self.logs), into_inner(self.errors))
    }
}

// A poisoned buffer still holds every message pushed before the panic.
fn push(buffer: &Mutex<Vec<String>>, message: String) {
    match buffer.lock() {
        Ok(mut guard) => guard.push(message),
        Err(poisoned) => poisoned.into_inner().push(message),
    }
}

fn snapshot(buffer: &Mutex<Vec<String>>) -> Vec<String> {
    match buffer.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn into_inner(buffer: Mutex<Vec<String>>) -> Vec<String> {
    buffer.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
}
