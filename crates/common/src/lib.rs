//! Shared types and errors for the `embedding-enc` crates.

pub mod embedding;
pub mod error;

pub use embedding::{Embedding, EMBEDDING_BYTES, EMBEDDING_DIM};
pub use error::{EncryptorError, ErrorKind, Result, ValidationError};
