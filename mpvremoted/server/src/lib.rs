pub mod api_error;
pub mod context;
pub mod host;
pub mod server;
mod services;
pub mod settings;

use tracing_subscriber::EnvFilter;

/// Logs to stdout. `RUST_LOG` takes precedence over `--verbose`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .ok();
}
