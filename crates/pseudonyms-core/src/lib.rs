//! Pseudonyms Core Library
//!
//! Converts between a citizen's BSN and organisation-scoped pseudonyms, and
//! issues short-lived bearer tokens naming a subject to an audience.
//!
//! Layers, leaves first:
//! - [`container`]: wire framing of `{nonce, header, ciphertext}`
//! - [`payload`]: pseudonym and token plaintext codec
//! - [`envelope`]: header-bound sealing and typed opening
//! - [`exchange`]: the identifier/token exchange protocol
//!
//! The symmetric key is always passed in explicitly; nothing here reads
//! process-wide key state.

pub mod config;
pub mod container;
pub mod envelope;
pub mod error;
pub mod exchange;
pub mod identifier;
pub mod payload;
pub mod tracing_init;

pub use config::{Config, ConfigError, ExchangeConfig};
pub use container::{Container, ContentType, Header, Version};
pub use envelope::Payload;
pub use error::{ExchangeError, Result};
pub use exchange::{
    ExchangeIdentifierRequest, ExchangeTokenRequest, GetTokenRequest, PseudonymService,
};
pub use identifier::{Identifier, IdentifierType};
pub use payload::{Pseudonym, Scope, Token};
pub use pseudonyms_crypto::SecretKey;
