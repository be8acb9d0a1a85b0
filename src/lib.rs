pub mod cli;
pub mod config;
pub mod date;
pub mod enrich;
pub mod error;
pub mod model;
pub mod prompt;
pub mod store;

pub use error::{Error, Result};

/// Install the stderr `tracing` subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}
