//! [`EncryptionKey`]: 256-bit key material with a hex external form.

use common::{Result, ValidationError};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::cipher::KEY_LEN;
use super::entropy::{random_bytes, EntropySource};

/// Length of the hex representation of a key.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// The memory is overwritten with zeroes when the key is dropped, and the
/// bytes never appear in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Draw a fresh random key from `source`.
    ///
    /// # Errors
    ///
    /// Propagates entropy-source failures.
    pub fn generate(source: &impl EntropySource) -> Result<Self> {
        Ok(Self(random_bytes(source)?))
    }

    /// Parse a 64-character hex string. Upper- and lowercase digits are both
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidKey`] if the string has the wrong
    /// length or contains a non-hex character.
    pub fn from_hex(key_hex: &str) -> std::result::Result<Self, ValidationError> {
        if key_hex.len() != KEY_HEX_LEN {
            return Err(ValidationError::InvalidKey(format!(
                "expected {KEY_HEX_LEN} hex characters, got {}",
                key_hex.len()
            )));
        }
        let mut key = Self([0u8; KEY_LEN]);
        hex::decode_to_slice(key_hex, &mut key.0)
            .map_err(|e| ValidationError::InvalidKey(e.to_string()))?;
        Ok(key)
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub(crate) fn expose(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("EncryptionKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::entropy::{MockEntropySource, OsEntropy};

    #[test]
    fn generated_keys_are_64_hex_chars_and_distinct() {
        let k1 = EncryptionKey::generate(&OsEntropy).unwrap().to_hex();
        let k2 = EncryptionKey::generate(&OsEntropy).unwrap().to_hex();
        assert_eq!(k1.len(), KEY_HEX_LEN);
        assert!(k1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(k1, k2);
    }

    #[test]
    fn generate_uses_the_injected_source() {
        let mut mock = MockEntropySource::new();
        mock.expect_fill().times(1).returning(|dest| {
            dest.fill(0xAB);
            Ok(())
        });
        let key = EncryptionKey::generate(&mock).unwrap();
        assert_eq!(key.to_hex(), "ab".repeat(KEY_LEN));
    }

    #[test]
    fn hex_parsing_is_case_insensitive() {
        let lower = "00ff".repeat(16);
        let upper = "00FF".repeat(16);
        let a = EncryptionKey::from_hex(&lower).unwrap();
        let b = EncryptionKey::from_hex(&upper).unwrap();
        assert_eq!(a.expose(), b.expose());
        assert_eq!(b.to_hex(), lower);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            EncryptionKey::from_hex("short_key"),
            Err(ValidationError::InvalidKey(_))
        ));
        assert!(EncryptionKey::from_hex(&"a".repeat(63)).is_err());
        assert!(EncryptionKey::from_hex(&"a".repeat(66)).is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        assert!(matches!(
            EncryptionKey::from_hex(&"g".repeat(KEY_HEX_LEN)),
            Err(ValidationError::InvalidKey(_))
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let key = EncryptionKey::from_bytes([0x42; KEY_LEN]);
        let shown = format!("{key:?}");
        assert!(shown.contains("REDACTED"));
        assert!(!shown.contains("42"));
    }
}
