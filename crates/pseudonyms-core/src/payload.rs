//! Identity codec.
//!
//! Converts pseudonym and token payloads to and from the binary protobuf
//! bytes that get sealed. Parsing validates the payload invariants, so a
//! [`ExchangeError::Schema`] after a successful decryption means the header
//! and the payload disagree, not that the container was tampered with.

use prost::Message;
use pseudonyms_proto as proto;
use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, Result};

/// Consent scope under which an identity may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scope {
    #[default]
    #[serde(rename = "TREATMENT")]
    Treatment,
}

impl Scope {
    fn from_wire(value: i32) -> Result<Self> {
        match proto::Scope::try_from(value) {
            Ok(proto::Scope::Treatment) => Ok(Self::Treatment),
            Ok(proto::Scope::Unspecified) | Err(_) => {
                Err(ExchangeError::Schema(format!("unknown scope value {value}")))
            }
        }
    }

    const fn to_wire(self) -> i32 {
        match self {
            Self::Treatment => proto::Scope::Treatment as i32,
        }
    }
}

/// Subject as known to one audience under one scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pseudonym {
    pub subject: String,
    pub audience: String,
    pub scope: Scope,
    pub version: u32,
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub subject: String,
    pub issuer: String,
    pub audience: String,
    /// Unix seconds.
    pub issued_at: i64,
    /// Unix seconds, strictly after `issued_at`.
    pub expiration: i64,
    /// Non-empty, order preserved.
    pub scopes: Vec<Scope>,
}

pub fn serialize_pseudonym(pseudonym: &Pseudonym) -> Vec<u8> {
    proto::Pseudonym {
        subject: pseudonym.subject.clone(),
        audience: pseudonym.audience.clone(),
        scope: pseudonym.scope.to_wire(),
        version: pseudonym.version,
    }
    .encode_to_vec()
}

pub fn parse_pseudonym(bytes: &[u8]) -> Result<Pseudonym> {
    let msg = proto::Pseudonym::decode(bytes)
        .map_err(|e| ExchangeError::Schema(format!("pseudonym: {e}")))?;
    require_non_empty("pseudonym subject", &msg.subject)?;
    require_non_empty("pseudonym audience", &msg.audience)?;
    if msg.version == 0 {
        return Err(ExchangeError::Schema("pseudonym version is 0".into()));
    }
    Ok(Pseudonym {
        scope: Scope::from_wire(msg.scope)?,
        subject: msg.subject,
        audience: msg.audience,
        version: msg.version,
    })
}

pub fn serialize_token(token: &Token) -> Vec<u8> {
    proto::Token {
        subject: token.subject.clone(),
        issuer: token.issuer.clone(),
        audience: token.audience.clone(),
        issued_at: token.issued_at,
        expiration: token.expiration,
        scopes: token.scopes.iter().map(|s| s.to_wire()).collect(),
    }
    .encode_to_vec()
}

pub fn parse_token(bytes: &[u8]) -> Result<Token> {
    let msg =
        proto::Token::decode(bytes).map_err(|e| ExchangeError::Schema(format!("token: {e}")))?;
    require_non_empty("token subject", &msg.subject)?;
    require_non_empty("token issuer", &msg.issuer)?;
    require_non_empty("token audience", &msg.audience)?;
    if msg.expiration <= msg.issued_at {
        return Err(ExchangeError::Schema(format!(
            "token expiration {} is not after issued_at {}",
            msg.expiration, msg.issued_at
        )));
    }
    if msg.scopes.is_empty() {
        return Err(ExchangeError::Schema("token has no scopes".into()));
    }
    let scopes = msg
        .scopes
        .iter()
        .map(|&s| Scope::from_wire(s))
        .collect::<Result<Vec<_>>>()?;
    Ok(Token {
        subject: msg.subject,
        issuer: msg.issuer,
        audience: msg.audience,
        issued_at: msg.issued_at,
        expiration: msg.expiration,
        scopes,
    })
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ExchangeError::Schema(format!("{field} is empty")));
    }
    Ok(())
}
