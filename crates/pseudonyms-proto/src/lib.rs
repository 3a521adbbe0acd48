//! Pseudonyms Protocol Buffers
//!
//! Protobuf messages sealed inside pseudonym and token containers.
//!
//! This crate contains:
//! - `Header`, whose binary encoding is the associated data of every container
//! - `Pseudonym` and `Token`, the plaintext payloads
//! - The `Version`, `ContentType` and `Scope` enumerations
//!
//! Field tags are part of the sealed format. Never renumber them.

#![allow(clippy::derive_partial_eq_without_eq)]

/// Pseudonyms v1 message definitions.
pub mod v1 {
    /// Container format version.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Version {
        Unspecified = 0,
        V1 = 1,
    }

    impl Version {
        /// Name of the enum value as it appears in the `.proto` definition.
        pub const fn as_str_name(&self) -> &'static str {
            match self {
                Self::Unspecified => "VERSION_UNSPECIFIED",
                Self::V1 => "V1",
            }
        }

        /// Parse an enum value from its `.proto` name.
        pub fn from_str_name(value: &str) -> Option<Self> {
            match value {
                "VERSION_UNSPECIFIED" => Some(Self::Unspecified),
                "V1" => Some(Self::V1),
                _ => None,
            }
        }
    }

    /// Kind of payload sealed inside a container.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum ContentType {
        Unspecified = 0,
        Token = 1,
        Pseudonym = 2,
    }

    impl ContentType {
        /// Name of the enum value as it appears in the `.proto` definition.
        pub const fn as_str_name(&self) -> &'static str {
            match self {
                Self::Unspecified => "CONTENT_TYPE_UNSPECIFIED",
                Self::Token => "TOKEN",
                Self::Pseudonym => "PSEUDONYM",
            }
        }

        /// Parse an enum value from its `.proto` name.
        pub fn from_str_name(value: &str) -> Option<Self> {
            match value {
                "CONTENT_TYPE_UNSPECIFIED" => Some(Self::Unspecified),
                "TOKEN" => Some(Self::Token),
                "PSEUDONYM" => Some(Self::Pseudonym),
                _ => None,
            }
        }
    }

    /// Consent scope under which an identity may be used.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Scope {
        Unspecified = 0,
        Treatment = 1,
    }

    impl Scope {
        /// Name of the enum value as it appears in the `.proto` definition.
        pub const fn as_str_name(&self) -> &'static str {
            match self {
                Self::Unspecified => "SCOPE_UNSPECIFIED",
                Self::Treatment => "TREATMENT",
            }
        }

        /// Parse an enum value from its `.proto` name.
        pub fn from_str_name(value: &str) -> Option<Self> {
            match value {
                "SCOPE_UNSPECIFIED" => Some(Self::Unspecified),
                "TREATMENT" => Some(Self::Treatment),
                _ => None,
            }
        }
    }

    /// Container header. Sent in the clear, bound to the ciphertext as AAD.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
    pub struct Header {
        #[prost(enumeration = "Version", tag = "1")]
        pub version: i32,
        #[prost(enumeration = "ContentType", tag = "2")]
        pub content_type: i32,
    }

    /// Organisation-scoped pseudonym payload.
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
    pub struct Pseudonym {
        #[prost(string, tag = "1")]
        pub subject: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub audience: ::prost::alloc::string::String,
        #[prost(enumeration = "Scope", tag = "3")]
        pub scope: i32,
        #[prost(uint32, tag = "4")]
        pub version: u32,
    }

    /// Bearer token payload.
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
    pub struct Token {
        #[prost(string, tag = "1")]
        pub subject: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub issuer: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub audience: ::prost::alloc::string::String,
        #[prost(int64, tag = "4")]
        pub issued_at: i64,
        #[prost(int64, tag = "5")]
        pub expiration: i64,
        #[prost(enumeration = "Scope", repeated, tag = "6")]
        pub scopes: ::prost::alloc::vec::Vec<i32>,
    }
}

// Re-export v1 as the default API version for convenience
pub use v1::*;
