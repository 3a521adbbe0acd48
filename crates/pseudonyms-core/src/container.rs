//! Container codec.
//!
//! Frames `{nonce, header, ciphertext}` as a single transport-safe string:
//! the protobuf JSON mapping of the container (byte fields as padded
//! standard base64), itself base64-encoded as a whole.
//!
//! Decoding only checks framing. Authentication happens later, in
//! [`crate::envelope`], so a frame that decodes cleanly may still fail to open.

use base64::prelude::*;
use prost::Message;
use pseudonyms_crypto::SealMode;
use pseudonyms_proto as proto;
use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, Result};

/// Container format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    V1,
}

/// Kind of payload sealed in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "TOKEN")]
    Token,
    #[serde(rename = "PSEUDONYM")]
    Pseudonym,
}

impl ContentType {
    /// Sealing mode bound to this content type.
    pub const fn seal_mode(self) -> SealMode {
        match self {
            Self::Token => SealMode::Randomized,
            Self::Pseudonym => SealMode::Deterministic,
        }
    }
}

/// Cleartext metadata, authenticated as associated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Header {
    pub version: Version,
    pub content_type: ContentType,
}

impl Header {
    pub const fn v1(content_type: ContentType) -> Self {
        Self {
            version: Version::V1,
            content_type,
        }
    }

    /// Associated data: the header's binary protobuf encoding.
    pub fn aad(&self) -> Vec<u8> {
        let version = match self.version {
            Version::V1 => proto::Version::V1,
        };
        let content_type = match self.content_type {
            ContentType::Token => proto::ContentType::Token,
            ContentType::Pseudonym => proto::ContentType::Pseudonym,
        };
        proto::Header {
            version: version as i32,
            content_type: content_type as i32,
        }
        .encode_to_vec()
    }
}

/// A sealed payload as it travels on the wire.
///
/// Sealing always produces a 12-byte nonce. A decoded container keeps
/// whatever nonce it carried; a wrong length fails at open time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Container {
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
    pub header: Header,
    #[serde(with = "base64_bytes")]
    pub ciphertext: Vec<u8>,
}

impl Container {
    pub const fn new(header: Header, nonce: Vec<u8>, ciphertext: Vec<u8>) -> Self {
        Self {
            nonce,
            header,
            ciphertext,
        }
    }

    /// Serialize to the wire string.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| ExchangeError::MalformedContainer(format!("encode: {e}")))?;
        Ok(BASE64_STANDARD.encode(json))
    }

    /// Parse a wire string without attempting decryption.
    pub fn decode(wire: &str) -> Result<Self> {
        let json = BASE64_STANDARD
            .decode(wire.trim())
            .map_err(|e| ExchangeError::MalformedContainer(format!("base64: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| ExchangeError::MalformedContainer(format!("structure: {e}")))
    }
}

mod base64_bytes {
    use base64::prelude::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
