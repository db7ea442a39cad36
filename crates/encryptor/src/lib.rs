//! Authenticated encryption of 128-dimensional face embeddings.
//!
//! Two envelope flavours are supported:
//!
//! - **Password mode**: PBKDF2-HMAC-SHA256 (default 100 000 iterations) over a
//!   fresh 32-byte salt derives the AES-256-GCM key; the salt travels in the
//!   envelope.
//! - **Direct-key mode**: the caller supplies a 64-hex-character key.
//!
//! Either way the output is a single base64 string that can be stored or
//! shipped as an opaque blob. See [`envelope`] for the byte layouts.
//!
//! ```no_run
//! use embedding_encryptor::EmbeddingEncryptor;
//!
//! let encryptor = EmbeddingEncryptor::new();
//! let values: Vec<f64> = (0..128).map(|i| i as f64).collect();
//! let envelope = encryptor.encrypt_embeddings(&values, "correct-horse-battery-staple")?;
//! let restored = encryptor.decrypt_embeddings(&envelope, "correct-horse-battery-staple")?;
//! assert_eq!(restored.as_slice(), values.as_slice());
//! # Ok::<(), embedding_encryptor::EncryptorError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod encryptor;
pub mod envelope;
pub mod task;
pub mod telemetry;

pub use common::{Embedding, EncryptorError, ErrorKind, Result, ValidationError, EMBEDDING_DIM};
pub use config::{EncryptorConfig, LogFormat};
pub use crypto::{EncryptionKey, EntropySource, OsEntropy};
pub use encryptor::EmbeddingEncryptor;
pub use task::{OffloadedEncryptor, TaskError};

/// Build an encryptor with a custom PBKDF2 work factor.
///
/// # Errors
///
/// Returns [`ValidationError::ZeroIterations`] if `iterations` is zero.
pub fn create_embedding_encryptor(iterations: u32) -> Result<EmbeddingEncryptor> {
    EmbeddingEncryptor::with_iterations(iterations)
}

/// Generate a random 64-hex-character key for direct-key mode.
pub fn generate_embedding_key() -> Result<String> {
    EmbeddingEncryptor::new().generate_key()
}

/// [`EmbeddingEncryptor::encrypt_embeddings`] with default settings.
pub fn encrypt_embeddings(embeddings: &[f64], password: &str) -> Result<String> {
    EmbeddingEncryptor::new().encrypt_embeddings(embeddings, password)
}

/// [`EmbeddingEncryptor::decrypt_embeddings`] with default settings.
pub fn decrypt_embeddings(envelope: &str, password: &str) -> Result<Embedding> {
    EmbeddingEncryptor::new().decrypt_embeddings(envelope, password)
}

/// [`EmbeddingEncryptor::encrypt_embeddings_with_key`] with default settings.
pub fn encrypt_embeddings_with_key(embeddings: &[f64], key_hex: &str) -> Result<String> {
    EmbeddingEncryptor::new().encrypt_embeddings_with_key(embeddings, key_hex)
}

/// [`EmbeddingEncryptor::decrypt_embeddings_with_key`] with default settings.
pub fn decrypt_embeddings_with_key(envelope: &str, key_hex: &str) -> Result<Embedding> {
    EmbeddingEncryptor::new().decrypt_embeddings_with_key(envelope, key_hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<f64> {
        (0..EMBEDDING_DIM).map(|i| i as f64).collect()
    }

    #[test]
    fn factory_sets_iterations() {
        assert_eq!(create_embedding_encryptor(50_000).unwrap().iterations(), 50_000);
        assert!(create_embedding_encryptor(0).is_err());
    }

    #[test]
    fn key_helpers_round_trip() {
        let key = generate_embedding_key().unwrap();
        assert_eq!(key.len(), 64);
        let envelope = encrypt_embeddings_with_key(&ramp(), &key).unwrap();
        let decrypted = decrypt_embeddings_with_key(&envelope, &key).unwrap();
        assert_eq!(decrypted.as_slice(), ramp().as_slice());
    }

    #[test]
    fn password_helpers_round_trip() {
        let envelope = encrypt_embeddings(&ramp(), "test_password").unwrap();
        let decrypted = decrypt_embeddings(&envelope, "test_password").unwrap();
        assert_eq!(decrypted.as_slice(), ramp().as_slice());
    }

    #[test]
    fn helpers_interoperate_with_a_default_encryptor() {
        let envelope = EmbeddingEncryptor::default()
            .encrypt_embeddings(&ramp(), "shared")
            .unwrap();
        assert!(decrypt_embeddings(&envelope, "shared").is_ok());
    }

    #[test]
    fn json_embedding_from_a_calling_service() {
        // The shape a request handler would receive and hand over.
        let body = serde_json::to_string(&ramp()).unwrap();
        let embedding: Embedding = serde_json::from_str(&body).unwrap();

        let encryptor = create_embedding_encryptor(1_000).unwrap();
        let envelope = encryptor.encrypt_embedding(&embedding, "pw").unwrap();
        let restored = encryptor.decrypt_embeddings(&envelope, "pw").unwrap();
        assert_eq!(serde_json::to_string(&restored).unwrap(), body);
    }

    #[test]
    fn errors_map_to_http_statuses() {
        let encryptor = create_embedding_encryptor(1_000).unwrap();
        let envelope = encryptor.encrypt_embeddings(&ramp(), "pw").unwrap();

        let bad_input = encryptor.encrypt_embeddings(&ramp()[..64], "pw").unwrap_err();
        let wrong_pw = encryptor.decrypt_embeddings(&envelope, "nope").unwrap_err();
        assert_eq!(bad_input.http_status(), 400);
        assert_eq!(wrong_pw.http_status(), 401);
    }
}
