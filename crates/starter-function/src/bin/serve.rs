//! Local development runtime: serves the function over HTTP on `PORT` (default 3000).

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use appwrite_function_sdk::server;
use starter_function::{init_tracing, load_config_or_exit, StarterFunction};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config_or_exit();

    let port: u16 = match std::env::var("PORT") {
        Ok(value) => value.parse().with_context(|| format!("invalid PORT: {}", value))?,
        Err(_) => 3000,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    server::serve(addr, Arc::new(StarterFunction::new(config))).await?;
    Ok(())
}
