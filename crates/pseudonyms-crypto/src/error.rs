//! Crypto error types.

/// Errors from sealing and opening.
///
/// `AuthenticationFailed` carries no detail: a wrong key and a tampered
/// ciphertext, nonce or header are indistinguishable to the caller.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid key length: expected 16, 24 or 32 bytes, got {actual}")]
    InvalidKeyLength { actual: usize },

    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Random number generator unavailable: {0}")]
    RandomnessUnavailable(String),
}
