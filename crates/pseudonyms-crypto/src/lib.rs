//! Pseudonyms Sealing Engine
//!
//! Authenticated encryption for identity payloads under a single
//! externally supplied symmetric key.
//!
//! ## Modes
//!
//! - **Randomized** (tokens): AES-GCM with a fresh 12-byte random nonce per call
//! - **Deterministic** (pseudonyms): AES-GCM-SIV with the nonce derived as
//!   `SHA-256(plaintext || aad)[..12]`, so equal inputs seal to equal output
//!
//! Both modes accept 128, 192 and 256-bit keys.

pub mod engine;
pub mod error;
pub mod key;

pub use engine::{NONCE_SIZE, SealMode, Sealed, derive_nonce, open, seal};
pub use error::CryptoError;
pub use key::{KEY_SIZES, SecretKey};
