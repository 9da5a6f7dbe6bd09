pub mod config;
pub mod error;

pub use config::{Config, ValidationResult};
pub use error::ConfigError;

use anyhow::Result;

/// Initialize tracing for the whole application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("intrasync core initialized");
    Ok(())
}
