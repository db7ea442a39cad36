//! [`Embedding`]: a validated 128-dimensional face feature vector.
//!
//! # Wire layout
//!
//! ```text
//! value[0] (8 bytes LE f64) ‖ value[1] ‖ … ‖ value[127]   = 1024 bytes
//! ```
//!
//! The packing is little-endian IEEE-754 regardless of the host, so a blob
//! written on one machine decodes bit-for-bit on any other.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::ValidationError;

/// Number of values in an embedding.
pub const EMBEDDING_DIM: usize = 128;

/// Byte length of a packed embedding.
pub const EMBEDDING_BYTES: usize = EMBEDDING_DIM * VALUE_BYTES;

const VALUE_BYTES: usize = std::mem::size_of::<f64>();

/// Exactly [`EMBEDDING_DIM`] finite `f64` values.
///
/// Construction is the only place length and finiteness are checked; every
/// `Embedding` in circulation is already valid. Serialises as a plain JSON
/// number array. Values are wiped from memory on drop.
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Embedding([f64; EMBEDDING_DIM]);

impl Embedding {
    /// Wrap a fixed-size array after checking every value is finite.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFinite`] naming the first NaN or infinite
    /// element.
    pub fn new(values: [f64; EMBEDDING_DIM]) -> Result<Self, ValidationError> {
        check_finite(&values)?;
        Ok(Self(values))
    }

    /// Build an embedding from an arbitrary-length slice.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::WrongLength`] unless the slice has exactly
    /// [`EMBEDDING_DIM`] elements, or [`ValidationError::NonFinite`].
    pub fn from_slice(values: &[f64]) -> Result<Self, ValidationError> {
        let array: [f64; EMBEDDING_DIM] = values
            .try_into()
            .map_err(|_| ValidationError::WrongLength(values.len()))?;
        Self::new(array)
    }

    /// Decode a packed little-endian buffer produced by [`Embedding::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PayloadLength`] if `bytes` is not exactly
    /// [`EMBEDDING_BYTES`] long, or [`ValidationError::NonFinite`] if a decoded
    /// value is NaN or infinite.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.len() != EMBEDDING_BYTES {
            return Err(ValidationError::PayloadLength {
                expected: EMBEDDING_BYTES,
                actual: bytes.len(),
            });
        }
        let mut values = [0f64; EMBEDDING_DIM];
        for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(VALUE_BYTES)) {
            let mut raw = [0u8; VALUE_BYTES];
            raw.copy_from_slice(chunk);
            *value = f64::from_le_bytes(raw);
        }
        Self::new(values)
    }

    /// Pack the values into the portable 1024-byte layout.
    pub fn to_bytes(&self) -> Zeroizing<[u8; EMBEDDING_BYTES]> {
        let mut out = Zeroizing::new([0u8; EMBEDDING_BYTES]);
        for (chunk, value) in out.chunks_exact_mut(VALUE_BYTES).zip(self.0.iter()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    pub fn as_array(&self) -> &[f64; EMBEDDING_DIM] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns `true` if every value has the same bit pattern as in `other`.
    ///
    /// Stricter than `==`: distinguishes `0.0` from `-0.0`.
    pub fn bitwise_eq(&self, other: &Embedding) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

fn check_finite(values: &[f64]) -> Result<(), ValidationError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ValidationError::NonFinite { index }),
        None => Ok(()),
    }
}

impl TryFrom<Vec<f64>> for Embedding {
    type Error = ValidationError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl TryFrom<&[f64]> for Embedding {
    type Error = ValidationError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        Self::from_slice(values)
    }
}

impl From<Embedding> for Vec<f64> {
    fn from(embedding: Embedding) -> Self {
        embedding.0.to_vec()
    }
}

impl fmt::Debug for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Biometric values stay out of logs and panic messages.
        write!(f, "Embedding([REDACTED; {EMBEDDING_DIM}])")
    }
}
