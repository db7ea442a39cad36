//! Tracing subscriber initialisation.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{EncryptorConfig, LogFormat};

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG`, when set, takes precedence over `log_level`.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init(log_level: &str, format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    }
    .context("failed to initialise tracing subscriber")
}

/// [`init`] using the level and format from `cfg`.
pub fn init_from_config(cfg: &EncryptorConfig) -> Result<()> {
    init(&cfg.log_level, cfg.log_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let _ = init_from_config(&EncryptorConfig::default());
        assert!(init("debug", LogFormat::Text).is_err());
    }
}
