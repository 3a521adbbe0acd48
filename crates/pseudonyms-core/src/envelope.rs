//! Sealing and opening of typed payloads.
//!
//! Joins the identity codec, the sealing engine and the container codec.
//! The header is built fresh for every seal; on open, the decoded header's
//! content type alone decides which AEAD mode and payload parser apply.

use pseudonyms_crypto::{self as crypto, SecretKey};
use tracing::debug;

use crate::container::{Container, ContentType, Header};
use crate::error::{ExchangeError, Result};
use crate::payload::{self, Pseudonym, Token};

/// A decrypted, schema-checked payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Token(Token),
    Pseudonym(Pseudonym),
}

impl Payload {
    pub const fn content_type(&self) -> ContentType {
        match self {
            Self::Token(_) => ContentType::Token,
            Self::Pseudonym(_) => ContentType::Pseudonym,
        }
    }
}

/// Seal a pseudonym deterministically and frame it.
pub fn seal_pseudonym(key: &SecretKey, pseudonym: &Pseudonym) -> Result<String> {
    seal_bytes(
        key,
        ContentType::Pseudonym,
        &payload::serialize_pseudonym(pseudonym),
    )
}

/// Seal a token with a random nonce and frame it.
pub fn seal_token(key: &SecretKey, token: &Token) -> Result<String> {
    seal_bytes(key, ContentType::Token, &payload::serialize_token(token))
}

fn seal_bytes(key: &SecretKey, content_type: ContentType, plaintext: &[u8]) -> Result<String> {
    let header = Header::v1(content_type);
    let sealed = crypto::seal(key, plaintext, &header.aad(), content_type.seal_mode())?;
    Container::new(header, sealed.nonce.to_vec(), sealed.ciphertext).encode()
}

/// Decode, authenticate and parse any container.
pub fn open_container(key: &SecretKey, wire: &str) -> Result<Payload> {
    let container = Container::decode(wire)?;
    let content_type = container.header.content_type;
    debug!(?content_type, "Opening container");

    let plaintext = crypto::open(
        key,
        &container.nonce,
        &container.ciphertext,
        &container.header.aad(),
        content_type.seal_mode(),
    )?;

    match content_type {
        ContentType::Token => payload::parse_token(&plaintext).map(Payload::Token),
        ContentType::Pseudonym => payload::parse_pseudonym(&plaintext).map(Payload::Pseudonym),
    }
}

/// Open a container that must hold a pseudonym.
pub fn open_pseudonym(key: &SecretKey, wire: &str) -> Result<Pseudonym> {
    match open_container(key, wire)? {
        Payload::Pseudonym(pseudonym) => Ok(pseudonym),
        Payload::Token(_) => Err(unexpected(ContentType::Pseudonym, ContentType::Token)),
    }
}

/// Open a container that must hold a token.
pub fn open_token(key: &SecretKey, wire: &str) -> Result<Token> {
    match open_container(key, wire)? {
        Payload::Token(token) => Ok(token),
        Payload::Pseudonym(_) => Err(unexpected(ContentType::Token, ContentType::Pseudonym)),
    }
}

fn unexpected(expected: ContentType, got: ContentType) -> ExchangeError {
    ExchangeError::invalid_request(format!("expected a {expected:?} container, got {got:?}"))
}
