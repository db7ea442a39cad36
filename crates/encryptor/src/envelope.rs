//! Envelope layouts: the self-contained, base64-encoded unit of storage.
//!
//! # Formats
//!
//! ```text
//! password mode:   base64( salt[32] ‖ nonce[12] ‖ ciphertext+tag )
//! direct-key mode: base64( nonce[12] ‖ ciphertext+tag )
//! ```
//!
//! Standard alphabet with padding. There is no header or version byte; all
//! offsets are fixed, so the layout must never change without a new format.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::ValidationError;

use crate::crypto::{NONCE_LEN, SALT_LEN, TAG_LEN};

/// Smallest decodable password-mode envelope (salt + nonce + bare tag).
pub const PASSWORD_ENVELOPE_MIN_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Smallest decodable direct-key envelope (nonce + bare tag).
pub const KEY_ENVELOPE_MIN_LEN: usize = NONCE_LEN + TAG_LEN;

/// A parsed password-mode envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordEnvelope {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext followed by the 16-byte tag.
    pub ciphertext: Vec<u8>,
}

impl PasswordEnvelope {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split raw envelope bytes at the fixed offsets.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EnvelopeTooShort`] below
    /// [`PASSWORD_ENVELOPE_MIN_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        ensure_min_len(bytes, PASSWORD_ENVELOPE_MIN_LEN)?;
        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
        Ok(Self {
            salt: to_array(salt),
            nonce: to_array(nonce),
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parse the base64 string form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBase64`] or
    /// [`ValidationError::EnvelopeTooShort`].
    pub fn decode(envelope: &str) -> Result<Self, ValidationError> {
        Self::from_bytes(&decode_base64(envelope)?)
    }
}

/// A parsed direct-key envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEnvelope {
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext followed by the 16-byte tag.
    pub ciphertext: Vec<u8>,
}

impl KeyEnvelope {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EnvelopeTooShort`] below
    /// [`KEY_ENVELOPE_MIN_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        ensure_min_len(bytes, KEY_ENVELOPE_MIN_LEN)?;
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        Ok(Self {
            nonce: to_array(nonce),
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBase64`] or
    /// [`ValidationError::EnvelopeTooShort`].
    pub fn decode(envelope: &str) -> Result<Self, ValidationError> {
        Self::from_bytes(&decode_base64(envelope)?)
    }
}

fn decode_base64(envelope: &str) -> Result<Vec<u8>, ValidationError> {
    STANDARD
        .decode(envelope)
        .map_err(|_| ValidationError::InvalidBase64)
}

fn ensure_min_len(bytes: &[u8], min: usize) -> Result<(), ValidationError> {
    if bytes.len() < min {
        return Err(ValidationError::EnvelopeTooShort {
            min,
            actual: bytes.len(),
        });
    }
    Ok(())
}

// Callers split at exactly N bytes, so the conversion cannot fail.
fn to_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_lengths() {
        assert_eq!(PASSWORD_ENVELOPE_MIN_LEN, 60);
        assert_eq!(KEY_ENVELOPE_MIN_LEN, 28);
    }

    #[test]
    fn password_layout_is_salt_nonce_ciphertext() {
        let env = PasswordEnvelope {
            salt: [1u8; SALT_LEN],
            nonce: [2u8; NONCE_LEN],
            ciphertext: vec![3u8; 20],
        };
        let bytes = env.to_bytes();
        assert_eq!(&bytes[..32], &[1u8; 32]);
        assert_eq!(&bytes[32..44], &[2u8; 12]);
        assert_eq!(&bytes[44..], &[3u8; 20]);
        assert_eq!(PasswordEnvelope::decode(&env.encode()).unwrap(), env);
    }

    #[test]
    fn key_layout_is_nonce_ciphertext() {
        let env = KeyEnvelope {
            nonce: [9u8; NONCE_LEN],
            ciphertext: vec![8u8; TAG_LEN],
        };
        let bytes = env.to_bytes();
        assert_eq!(bytes.len(), 28);
        assert_eq!(&bytes[..12], &[9u8; 12]);
        assert_eq!(KeyEnvelope::decode(&env.encode()).unwrap(), env);
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_eq!(
            PasswordEnvelope::decode("invalid_base64!"),
            Err(ValidationError::InvalidBase64)
        );
        assert_eq!(
            KeyEnvelope::decode("%%%%"),
            Err(ValidationError::InvalidBase64)
        );
    }

    #[test]
    fn rejects_short_envelopes() {
        assert_eq!(
            PasswordEnvelope::decode(""),
            Err(ValidationError::EnvelopeTooShort { min: 60, actual: 0 })
        );
        let short = STANDARD.encode(b"too_short");
        assert_eq!(
            PasswordEnvelope::decode(&short),
            Err(ValidationError::EnvelopeTooShort { min: 60, actual: 9 })
        );
        assert!(PasswordEnvelope::from_bytes(&[0u8; 59]).is_err());
        assert!(PasswordEnvelope::from_bytes(&[0u8; 60]).is_ok());
        assert!(KeyEnvelope::from_bytes(&[0u8; 27]).is_err());
        assert!(KeyEnvelope::from_bytes(&[0u8; 28]).is_ok());
    }
}
