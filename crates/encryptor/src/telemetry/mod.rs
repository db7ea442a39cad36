//! Structured logging setup.
//!
//! The encryptor itself only emits `tracing` events; whoever embeds it decides
//! where they go by installing a subscriber, here or elsewhere.
//!
//! # Telemetry invariants
//!
//! - **No passwords, key material, salts, plaintext or embedding values** may
//!   appear in any span field or log event.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::{init, init_from_config};
