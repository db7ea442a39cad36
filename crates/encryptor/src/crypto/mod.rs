//! Cryptographic building blocks: PBKDF2 key derivation, AES-256-GCM and the
//! entropy source.
//!
//! This module is free of encoding and envelope concerns; it works on raw
//! bytes only.

pub mod cipher;
pub mod entropy;
pub mod kdf;
pub mod key;

pub use cipher::{KEY_LEN, NONCE_LEN, TAG_LEN};
pub use entropy::{EntropySource, OsEntropy};
pub use kdf::{DEFAULT_ITERATIONS, SALT_LEN};
pub use key::EncryptionKey;
