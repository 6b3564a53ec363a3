//! Starter Appwrite function
//!
//! Shared by the two entry points: `starter-function` speaks the host's
//! stdin/stdout protocol, `starter-function-serve` runs a local HTTP runtime.

pub mod appwrite;
pub mod config;
pub mod diagnostics;
pub mod handler;

pub use config::FunctionConfig;
pub use handler::StarterFunction;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,starter_function=debug,appwrite_function_sdk=debug";

/// Install the tracing subscriber. Output goes to stderr.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Read the configuration, or terminate before any request is served.
pub fn load_config_or_exit() -> FunctionConfig {
    match FunctionConfig::from_env() {
        Ok(config) => {
            tracing::info!(
                endpoint = %config.endpoint,
                project = %config.project_id,
                environment = ?config.environment,
                "Configuration loaded"
            );
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("appwrite envs not configured!");
            std::process::exit(1);
        }
    }
}
