//! API-facing identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;

/// The closed set of identifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierType {
    /// Raw citizen service number.
    #[serde(rename = "BSN")]
    Bsn,
    /// Opaque organisation-scoped pseudonym container.
    #[serde(rename = "ORGANISATION_PSEUDO", alias = "ORG_PSEUDONYM")]
    OrgPseudonym,
}

impl IdentifierType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bsn => "BSN",
            Self::OrgPseudonym => "ORGANISATION_PSEUDO",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BSN" => Ok(Self::Bsn),
            "ORGANISATION_PSEUDO" | "ORG_PSEUDONYM" => Ok(Self::OrgPseudonym),
            other => Err(ExchangeError::UnsupportedIdentifierType(other.to_string())),
        }
    }
}

/// An identifier value tagged with its kind.
///
/// For [`IdentifierType::OrgPseudonym`] the value is a wire container string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
    #[serde(rename = "type")]
    pub identifier_type: IdentifierType,
}

impl Identifier {
    pub fn new(value: impl Into<String>, identifier_type: IdentifierType) -> Self {
        Self {
            value: value.into(),
            identifier_type,
        }
    }

    pub fn bsn(value: impl Into<String>) -> Self {
        Self::new(value, IdentifierType::Bsn)
    }

    pub fn pseudonym(container: impl Into<String>) -> Self {
        Self::new(container, IdentifierType::OrgPseudonym)
    }
}
