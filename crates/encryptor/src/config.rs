//! Configuration loading and validation for the embedding encryptor.
//!
//! Values are read from environment variables. Loading fails with a clear
//! error message if a variable is present but invalid.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::DEFAULT_ITERATIONS;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

/// Validated encryptor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EncryptorConfig {
    /// PBKDF2 work factor for password-mode envelopes.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Structured (`json`) or human-readable (`text`) log lines.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Upper bound for offloaded operations, in milliseconds. Unset means no
    /// limit.
    #[serde(default)]
    pub task_timeout_ms: Option<u64>,
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for EncryptorConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            task_timeout_ms: None,
        }
    }
}

impl EncryptorConfig {
    /// Load and validate configuration from environment variables
    /// (`KDF_ITERATIONS`, `LOG_LEVEL`, `LOG_FORMAT`, `TASK_TIMEOUT_MS`).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Config::builder().add_source(config::Environment::default()))
    }

    fn load(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build encryptor configuration")?;

        let c: EncryptorConfig = cfg
            .try_deserialize()
            .context("failed to deserialise encryptor configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The offload timeout as a [`Duration`], if one is configured.
    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_ms.map(Duration::from_millis)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.kdf_iterations == 0 {
            anyhow::bail!("KDF_ITERATIONS must be > 0");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        if self.task_timeout_ms == Some(0) {
            anyhow::bail!("TASK_TIMEOUT_MS must be > 0 when set");
        }
        Ok(())
    }
}
