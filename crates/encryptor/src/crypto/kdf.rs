//! PBKDF2-HMAC-SHA256 password-to-key derivation.

use common::{Result, ValidationError};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::cipher::KEY_LEN;
use super::key::EncryptionKey;

/// Default PBKDF2 work factor.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Byte length of a password-mode salt.
pub const SALT_LEN: usize = 32;

/// Derive a [`KEY_LEN`]-byte key from `password` and `salt`.
///
/// Deterministic for identical inputs; cost grows linearly with `iterations`.
///
/// # Errors
///
/// Returns [`ValidationError::ZeroIterations`] if `iterations` is zero.
pub fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Result<EncryptionKey> {
    if iterations == 0 {
        return Err(ValidationError::ZeroIterations.into());
    }
    let mut out = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    let key = EncryptionKey::from_bytes(out);
    zeroize::Zeroize::zeroize(&mut out);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answer_one_iteration() {
        let key = derive_key(b"password", b"salt", 1).unwrap();
        assert_eq!(
            key.to_hex(),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn known_answer_4096_iterations() {
        let key = derive_key(b"password", b"salt", 4096).unwrap();
        assert_eq!(
            key.to_hex(),
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"
        );
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key(b"correct-horse-battery-staple", &salt, 1000).unwrap();
        let k2 = derive_key(b"correct-horse-battery-staple", &salt, 1000).unwrap();
        assert_eq!(k1.to_hex(), k2.to_hex());
    }

    #[test]
    fn salt_password_and_iterations_all_matter() {
        let hex = |pw: &[u8], salt: u8, iterations| {
            derive_key(pw, &[salt; SALT_LEN], iterations).unwrap().to_hex()
        };
        let base = hex(b"pw", 1, 1000);
        assert_ne!(base, hex(b"pw", 2, 1000));
        assert_ne!(base, hex(b"pw2", 1, 1000));
        assert_ne!(base, hex(b"pw", 1, 1001));
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = derive_key(b"pw", &[0u8; SALT_LEN], 0).unwrap_err();
        assert_eq!(
            err,
            common::EncryptorError::Validation(ValidationError::ZeroIterations)
        );
    }
}
