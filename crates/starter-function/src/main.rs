//! Worker entry point: serves invocations over the host's stdin/stdout protocol.

use anyhow::Result;
use appwrite_function_sdk::ipc;
use starter_function::{init_tracing, load_config_or_exit, StarterFunction};

fn main() -> Result<()> {
    init_tracing();

    let config = load_config_or_exit();
    let function = StarterFunction::new(config);

    let rt = tokio::runtime::Runtime::new()?;
    tracing::info!("Starter function ready");
    ipc::run_loop(&rt, &function);

    Ok(())
}
