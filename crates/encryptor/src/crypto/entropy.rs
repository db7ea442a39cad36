//! Source of salts, nonces and generated keys.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::{EncryptorError, Result};

/// Fills buffers with cryptographically secure random bytes.
#[cfg_attr(test, mockall::automock)]
pub trait EntropySource: Send + Sync {
    /// Overwrite all of `dest` with fresh random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EncryptorError::Internal`] if the source cannot deliver.
    fn fill(&self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| EncryptorError::Internal(format!("entropy source failed: {e}")))
    }
}

/// Draw a fixed-size array from `source`.
pub(crate) fn random_bytes<const N: usize>(source: &impl EntropySource) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    source.fill(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_entropy_produces_distinct_buffers() {
        let a: [u8; 32] = random_bytes(&OsEntropy).unwrap();
        let b: [u8; 32] = random_bytes(&OsEntropy).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn failure_propagates_as_internal() {
        let mut mock = MockEntropySource::new();
        mock.expect_fill()
            .returning(|_| Err(EncryptorError::Internal("no entropy".into())));
        let result: Result<[u8; 12]> = random_bytes(&mock);
        assert!(matches!(result, Err(EncryptorError::Internal(_))));
    }
}
