pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod repository;
pub mod server;
pub mod signals;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for process diagnostics
///
/// `RUST_LOG` wins over `default_level`. Call once per process.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
