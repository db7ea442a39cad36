//! [`EmbeddingEncryptor`]: password- and key-based authenticated encryption
//! of face embeddings.
//!
//! # Pipeline
//!
//! 1. Validate the embedding (length, finiteness). Nothing cryptographic runs
//!    for invalid input: no entropy is drawn and no key is derived.
//! 2. Pack it into the 1024-byte little-endian layout.
//! 3. Draw a fresh salt (password mode only) and nonce.
//! 4. Derive the key with PBKDF2-HMAC-SHA256, or use the supplied key.
//! 5. Seal with AES-256-GCM and emit the base64 envelope.
//!
//! Every tag failure surfaces as [`EncryptorError::Authentication`], whatever
//! the cause. The cause is logged at `warn` for operators.

use common::{Embedding, EncryptorError, Result, ValidationError};
use tracing::{debug, instrument, warn};

use crate::config::EncryptorConfig;
use crate::crypto::cipher::{self, CipherError};
use crate::crypto::entropy::random_bytes;
use crate::crypto::{
    kdf, EncryptionKey, EntropySource, OsEntropy, DEFAULT_ITERATIONS, NONCE_LEN, SALT_LEN,
};
use crate::envelope::{KeyEnvelope, PasswordEnvelope};

/// Stateless embedding encryptor.
///
/// Holds only its configuration and entropy source, so one instance can be
/// shared freely between threads.
#[derive(Debug, Clone)]
pub struct EmbeddingEncryptor<R = OsEntropy> {
    iterations: u32,
    entropy: R,
}

impl EmbeddingEncryptor<OsEntropy> {
    /// An encryptor using the default work factor and the OS CSPRNG.
    pub fn new() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            entropy: OsEntropy,
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroIterations`] if `iterations` is zero.
    pub fn with_iterations(iterations: u32) -> Result<Self> {
        Self::with_entropy(iterations, OsEntropy)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroIterations`] if the configured count is
    /// zero.
    pub fn from_config(cfg: &EncryptorConfig) -> Result<Self> {
        Self::with_iterations(cfg.kdf_iterations)
    }
}

impl Default for EmbeddingEncryptor<OsEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: EntropySource> EmbeddingEncryptor<R> {
    /// An encryptor drawing salts, nonces and keys from `entropy`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroIterations`] if `iterations` is zero.
    pub fn with_entropy(iterations: u32, entropy: R) -> Result<Self> {
        if iterations == 0 {
            return Err(ValidationError::ZeroIterations.into());
        }
        Ok(Self {
            iterations,
            entropy,
        })
    }

    /// PBKDF2 work factor used for password-mode envelopes.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Generate a random 256-bit key as 64 lowercase hex characters.
    pub fn generate_key(&self) -> Result<String> {
        Ok(EncryptionKey::generate(&self.entropy)?.to_hex())
    }

    // -----------------------------------------------------------------------
    // Password mode
    // -----------------------------------------------------------------------

    /// Validate `embeddings` and encrypt them under `password`.
    ///
    /// # Errors
    ///
    /// [`EncryptorError::Validation`] for a wrong length or a NaN/infinite
    /// value; [`EncryptorError::Internal`] if entropy or the cipher fails.
    pub fn encrypt_embeddings(&self, embeddings: &[f64], password: &str) -> Result<String> {
        let embedding = Embedding::from_slice(embeddings)?;
        self.encrypt_embedding(&embedding, password)
    }

    /// Encrypt an already-validated embedding under `password`.
    ///
    /// Returns `base64(salt ‖ nonce ‖ ciphertext+tag)`. A fresh salt and nonce
    /// are drawn on every call, so identical inputs never repeat an envelope.
    #[instrument(skip_all, fields(mode = "password", iterations = self.iterations))]
    pub fn encrypt_embedding(&self, embedding: &Embedding, password: &str) -> Result<String> {
        let plaintext = embedding.to_bytes();
        let salt: [u8; SALT_LEN] = random_bytes(&self.entropy)?;
        let nonce: [u8; NONCE_LEN] = random_bytes(&self.entropy)?;
        let key = kdf::derive_key(password.as_bytes(), &salt, self.iterations)?;

        let ciphertext = cipher::seal(&plaintext[..], key.expose(), &nonce).map_err(seal_error)?;
        let envelope = PasswordEnvelope {
            salt,
            nonce,
            ciphertext,
        }
        .encode();

        debug!(envelope_len = envelope.len(), "embedding encrypted");
        Ok(envelope)
    }

    /// Decrypt a password-mode envelope.
    ///
    /// # Errors
    ///
    /// [`EncryptorError::Validation`] for malformed base64, a short envelope
    /// or a malformed payload; [`EncryptorError::Authentication`] for a wrong
    /// password or tampered data, indistinguishably.
    #[instrument(skip_all, fields(mode = "password", iterations = self.iterations))]
    pub fn decrypt_embeddings(&self, envelope: &str, password: &str) -> Result<Embedding> {
        let parsed = PasswordEnvelope::decode(envelope)?;
        let key = kdf::derive_key(password.as_bytes(), &parsed.salt, self.iterations)?;

        let plaintext =
            cipher::open(&parsed.ciphertext, key.expose(), &parsed.nonce).map_err(open_error)?;
        let embedding = decode_payload(&plaintext)?;

        debug!("embedding decrypted");
        Ok(embedding)
    }

    /// Re-encrypt an envelope under a new password.
    ///
    /// The source envelope is untouched; the caller replaces it with the
    /// returned one. The result carries a fresh salt and nonce.
    ///
    /// # Errors
    ///
    /// Any error from decrypting with `old_password` is returned unchanged.
    #[instrument(skip_all)]
    pub fn change_password(
        &self,
        envelope: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<String> {
        let embedding = self.decrypt_embeddings(envelope, old_password)?;
        let rotated = self.encrypt_embedding(&embedding, new_password)?;
        debug!("envelope password changed");
        Ok(rotated)
    }

    /// Returns `true` if `password` opens `envelope`.
    ///
    /// Every failure, validation included, reads as `false`.
    pub fn verify_password(&self, envelope: &str, password: &str) -> bool {
        self.decrypt_embeddings(envelope, password).is_ok()
    }

    // -----------------------------------------------------------------------
    // Direct-key mode
    // -----------------------------------------------------------------------

    /// Validate `embeddings` and `key_hex`, then encrypt without key derivation.
    ///
    /// # Errors
    ///
    /// [`EncryptorError::Validation`] for a bad embedding or a key that is not
    /// 64 hex characters.
    pub fn encrypt_embeddings_with_key(&self, embeddings: &[f64], key_hex: &str) -> Result<String> {
        let embedding = Embedding::from_slice(embeddings)?;
        let key = EncryptionKey::from_hex(key_hex)?;
        self.encrypt_embedding_with_key(&embedding, &key)
    }

    /// Returns `base64(nonce ‖ ciphertext+tag)`.
    #[instrument(skip_all, fields(mode = "key"))]
    pub fn encrypt_embedding_with_key(
        &self,
        embedding: &Embedding,
        key: &EncryptionKey,
    ) -> Result<String> {
        let plaintext = embedding.to_bytes();
        let nonce: [u8; NONCE_LEN] = random_bytes(&self.entropy)?;

        let ciphertext = cipher::seal(&plaintext[..], key.expose(), &nonce).map_err(seal_error)?;
        let envelope = KeyEnvelope { nonce, ciphertext }.encode();

        debug!(envelope_len = envelope.len(), "embedding encrypted");
        Ok(envelope)
    }

    /// Decrypt a direct-key envelope with a hex key.
    ///
    /// # Errors
    ///
    /// [`EncryptorError::Validation`] for a malformed key or envelope;
    /// [`EncryptorError::Authentication`] for a wrong key or tampered data.
    pub fn decrypt_embeddings_with_key(&self, envelope: &str, key_hex: &str) -> Result<Embedding> {
        let key = EncryptionKey::from_hex(key_hex)?;
        self.decrypt_embedding_with_key(envelope, &key)
    }

    #[instrument(skip_all, fields(mode = "key"))]
    pub fn decrypt_embedding_with_key(
        &self,
        envelope: &str,
        key: &EncryptionKey,
    ) -> Result<Embedding> {
        let parsed = KeyEnvelope::decode(envelope)?;

        let plaintext =
            cipher::open(&parsed.ciphertext, key.expose(), &parsed.nonce).map_err(open_error)?;
        let embedding = decode_payload(&plaintext)?;

        debug!("embedding decrypted");
        Ok(embedding)
    }
}

fn decode_payload(plaintext: &[u8]) -> Result<Embedding> {
    Embedding::from_bytes(plaintext).map_err(|e| {
        // Authenticated, so the producer held the key but wrote something else.
        warn!(error = %e, "authenticated payload is not a valid embedding");
        EncryptorError::from(e)
    })
}

fn seal_error(e: CipherError) -> EncryptorError {
    warn!(error = %e, "embedding encryption failed");
    EncryptorError::Internal(e.to_string())
}

fn open_error(e: CipherError) -> EncryptorError {
    match e {
        CipherError::AeadFailure => {
            warn!(
                cause = "authentication tag mismatch: wrong password/key or modified envelope",
                "embedding decryption failed"
            );
            EncryptorError::Authentication
        }
        CipherError::InvalidKeyLength => EncryptorError::Internal(e.to_string()),
    }
}
