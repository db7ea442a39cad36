//! AES-256-GCM sealing and opening of packed embeddings.
//!
//! **Nonce discipline:** GCM nonce reuse under one key is catastrophic; it
//! breaks both confidentiality and authentication. Callers pass a nonce drawn
//! fresh from the entropy source for every [`seal`]; nothing here caches or
//! derives nonces.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use thiserror::Error;
use zeroize::Zeroizing;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// Encryption failed, or the tag did not verify on decryption.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Encrypt `plaintext` under `key` and `nonce` with no associated data.
///
/// The result is `ciphertext ‖ tag`, exactly [`TAG_LEN`] bytes longer than
/// the input.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (unreachable
/// for embedding-sized inputs).
pub fn seal(plaintext: &[u8], key: &[u8], nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CipherError::AeadFailure)
}

/// Verify and decrypt `ciphertext ‖ tag`.
///
/// No plaintext is returned unless the tag verifies. The plaintext buffer is
/// wiped when dropped.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] if authentication fails (wrong key or
/// tampered data).
pub fn open(
    ciphertext: &[u8],
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let cipher = build_cipher(key)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| CipherError::AeadFailure)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}
