//! Error taxonomy shared by every embedding-encryption entry point.

use thiserror::Error;

use crate::embedding::EMBEDDING_DIM;

/// A caller mistake detected before any cryptographic operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The embedding does not have exactly [`EMBEDDING_DIM`] elements.
    #[error("embedding must have exactly {EMBEDDING_DIM} values, got {0}")]
    WrongLength(usize),

    /// An element is NaN or infinite.
    #[error("embedding value at index {index} is not a finite number")]
    NonFinite { index: usize },

    /// The hex key is the wrong length or contains non-hex characters.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The envelope string is not valid standard base64.
    #[error("envelope is not valid base64")]
    InvalidBase64,

    /// The decoded envelope cannot hold the fixed header plus a tag.
    #[error("envelope too short: need at least {min} bytes, got {actual}")]
    EnvelopeTooShort { min: usize, actual: usize },

    /// The authenticated plaintext is not a packed embedding.
    #[error("decrypted payload has {actual} bytes, expected {expected}")]
    PayloadLength { expected: usize, actual: usize },

    /// A key-derivation work factor of zero was requested.
    #[error("key derivation iterations must be greater than zero")]
    ZeroIterations,
}

/// Coarse classification of an [`EncryptorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Internal,
}

/// Top-level error returned by the embedding encryptor.
///
/// Variants map to HTTP status codes a calling service would return:
/// - [`EncryptorError::Validation`] → 400
/// - [`EncryptorError::Authentication`] → 401
/// - [`EncryptorError::Internal`] → 500
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncryptorError {
    /// Malformed input; fix the request and try again.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Tag verification failed.
    ///
    /// Deliberately identical for a wrong password, a wrong key and tampered
    /// ciphertext so the error cannot be used as an oracle.
    #[error("decryption failed")]
    Authentication,

    /// A cryptographic primitive or the entropy source failed unexpectedly.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EncryptorError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncryptorError::Validation(_) => ErrorKind::Validation,
            EncryptorError::Authentication => ErrorKind::Authentication,
            EncryptorError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Authentication => 401,
            ErrorKind::Internal => 500,
        }
    }

    /// Always `false`: the same inputs fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, EncryptorError>;
