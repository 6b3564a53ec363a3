//! IPC protocol for running as a host-managed worker.
//!
//! The host and the function exchange length-prefixed JSON frames over
//! stdin/stdout: a 4-byte big-endian length followed by that many bytes of JSON.
//! The host writes one [`Request`] per frame; the function answers each with one
//! [`InvocationResult`] frame. Stdout carries nothing but frames, so all logging
//! must go to stderr.
//!
//! # Example
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     let rt = tokio::runtime::Runtime::new()?;
//!     appwrite_function_sdk::ipc::run_loop(&rt, &MyFunction);
//!     Ok(())
//! }
//! ```

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::handler::{invoke, Function, InvocationResult};
use crate::{HandlerError, Request};

/// Upper bound on a single inbound frame.
pub const MAX_FRAME_BYTES: usize = 32 * 1024 * 1024;

/// Read one length-prefixed JSON frame from `reader`.
pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, HandlerError> {
    // Read length prefix (4 bytes, big-endian)
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .map_err(|e| HandlerError::Ipc(format!("Failed to read length prefix: {}", e)))?;

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(HandlerError::Ipc(format!(
            "Frame of {} bytes exceeds limit of {} bytes",
            len, MAX_FRAME_BYTES
        )));
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .map_err(|e| HandlerError::Ipc(format!("Failed to read payload: {}", e)))?;

    serde_json::from_slice(&payload)
        .map_err(|e| HandlerError::Ipc(format!("Failed to parse frame: {}", e)))
}

/// Write one length-prefixed JSON frame to `writer` and flush it.
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<(), HandlerError> {
    let payload = serde_json::to_vec(value)
        .map_err(|e| HandlerError::Ipc(format!("Failed to serialize frame: {}", e)))?;

    let len = u32::try_from(payload.len())
        .map_err(|_| HandlerError::Ipc("Frame too large".into()))?;
    writer
        .write_all(&len.to_be_bytes())
        .map_err(|e| HandlerError::Ipc(format!("Failed to write length: {}", e)))?;
    writer
        .write_all(&payload)
        .map_err(|e| HandlerError::Ipc(format!("Failed to write payload: {}", e)))?;
    writer
        .flush()
        .map_err(|e| HandlerError::Ipc(format!("Failed to flush: {}", e)))?;

    Ok(())
}

/// Read a request from stdin (sent by the host)
pub fn read_request() -> Result<Request, HandlerError> {
    read_frame(&mut io::stdin().lock())
}

/// Send an invocation result to stdout (received by the host)
pub fn send_result(result: &InvocationResult) -> Result<(), HandlerError> {
    write_frame(&mut io::stdout().lock(), result)
}

/// Serve invocations from `reader`, answering on `writer`, until the input ends.
///
/// A failed write is reported and the loop moves on to the next request; a
/// failed read (including EOF) ends the loop.
pub fn serve<F, R, W>(rt: &tokio::runtime::Runtime, function: &F, reader: &mut R, writer: &mut W)
where
    F: Function + ?Sized,
    R: Read,
    W: Write,
{
    loop {
        match read_frame::<_, Request>(reader) {
            Ok(req) => {
                tracing::debug!(method = %req.method, path = %req.path, "Invocation received");
                let result = rt.block_on(invoke(function, req));
                if let Err(e) = write_frame(writer, &result) {
                    tracing::error!("Failed to send response: {}", e);
                }
            }
            Err(e) => {
                tracing::info!("Request stream closed: {}", e);
                break;
            }
        }
    }
}

/// Serve invocations over stdin/stdout until the host closes stdin.
pub fn run_loop<F>(rt: &tokio::runtime::Runtime, function: &F)
where
    F: Function + ?Sized,
{
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(rt, function, &mut stdin.lock(), &mut stdout.lock());
}
