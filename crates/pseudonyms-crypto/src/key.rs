//! Symmetric key material.
//!
//! The key is provisioned outside this crate and handed in as raw bytes or
//! hex. It is validated once at construction, zeroized on drop, and never
//! printed.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Accepted key lengths in bytes (AES-128, AES-192, AES-256).
pub const KEY_SIZES: [usize; 3] = [16, 24, 32];

/// A validated AES key shared by both sealing modes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Copy raw key bytes, rejecting unsupported lengths.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if !KEY_SIZES.contains(&bytes.len()) {
            return Err(CryptoError::InvalidKeyLength {
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Parse a hex-encoded key.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let mut raw = hex::decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let key = Self::from_bytes(&raw);
        raw.zeroize();
        key
    }

    /// Generate a random key of the given length (tests only).
    #[cfg(any(test, feature = "test-utils"))]
    pub fn random(len: usize) -> Result<Self, CryptoError> {
        use rand::RngCore;
        use rand::rngs::OsRng;

        let mut raw = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut raw)
            .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
        let key = Self::from_bytes(&raw);
        raw.zeroize();
        key
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bits.
    pub const fn bits(&self) -> usize {
        self.bytes.len() * 8
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(AES-{}, [REDACTED])", self.bits())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_lengths() {
        for len in KEY_SIZES {
            let key = SecretKey::from_bytes(&vec![7u8; len]).unwrap();
            assert_eq!(key.as_bytes().len(), len);
            assert_eq!(key.bits(), len * 8);
        }
    }

    #[test]
    fn rejects_unsupported_lengths() {
        for len in [0, 1, 15, 17, 31, 33, 64] {
            assert_eq!(
                SecretKey::from_bytes(&vec![0u8; len]).unwrap_err(),
                CryptoError::InvalidKeyLength { actual: len }
            );
        }
    }

    #[test]
    fn parses_hex() {
        let key = SecretKey::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(key.as_bytes(), &[0xAB; 32]);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(
            SecretKey::from_hex("not hex at all"),
            Err(CryptoError::InvalidKeyEncoding(_))
        ));
        assert!(matches!(
            SecretKey::from_hex("abcd"),
            Err(CryptoError::InvalidKeyLength { actual: 2 })
        ));
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = SecretKey::from_bytes(&[0x42; 16]).unwrap();
        let debug = format!("{key:?}");
        assert_eq!(debug, "SecretKey(AES-128, [REDACTED])");
        assert!(!debug.contains("42"));
    }

    #[test]
    fn random_keys_differ() {
        let a = SecretKey::random(32).unwrap();
        let b = SecretKey::random(32).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
