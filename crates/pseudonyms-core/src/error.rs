//! Error types for the exchange core.

use pseudonyms_crypto::CryptoError;
use thiserror::Error;
use tracing::warn;

/// Result type alias using [`ExchangeError`].
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Every failure an exchange call can return.
///
/// All variants are terminal for the call. `Authentication` in particular
/// signals tampering or a wrong key and must never be retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// Missing, empty or self-referential request fields
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Identifier type name not in the closed set
    #[error("Unsupported identifier type: {0}")]
    UnsupportedIdentifierType(String),

    /// Caller-supplied organisation differs from the pseudonym audience.
    /// Only the requested organisation is reported, never the real audience.
    #[error("Organisation {requested} does not match pseudonym audience")]
    InconsistentAudience { requested: String },

    /// Base64, JSON or field-level framing failure
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// AEAD tag verification failed
    #[error("Authentication failed")]
    Authentication,

    /// Plaintext decrypted but is not the expected payload
    #[error("Payload schema error: {0}")]
    Schema(String),

    /// Invalid key or primitive failure
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Token expiration has passed
    #[error("Token expired at {expiration}")]
    ExpiredToken { expiration: i64 },
}

impl ExchangeError {
    /// Stable machine-readable code for the surrounding service layer.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnsupportedIdentifierType(_) => "unsupported_identifier_type",
            Self::InconsistentAudience { .. } => "inconsistent_audience",
            Self::MalformedContainer(_) => "malformed_container",
            Self::Authentication => "authentication_failed",
            Self::Schema(_) => "schema_error",
            Self::Crypto(_) => "crypto_error",
            Self::ExpiredToken { .. } => "token_expired",
        }
    }

    pub(crate) fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

impl From<CryptoError> for ExchangeError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::AuthenticationFailed | CryptoError::InvalidNonceLength { .. } => {
                warn!(error = %err, "Container failed authentication");
                Self::Authentication
            }
            CryptoError::InvalidKeyLength { .. }
            | CryptoError::InvalidKeyEncoding(_)
            | CryptoError::EncryptionFailed(_)
            | CryptoError::RandomnessUnavailable(_) => Self::Crypto(err.to_string()),
        }
    }
}
