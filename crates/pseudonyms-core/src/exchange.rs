//! Identifier and token exchange.
//!
//! Stateless decision logic for the three API operations. Every call is a
//! pure function of the request, the injected key and configuration, and
//! (for tokens) the current time.
//!
//! - [`PseudonymService::exchange_identifier`]: BSN <-> organisation pseudonym
//! - [`PseudonymService::exchange_token`]: token -> BSN or pseudonym
//! - [`PseudonymService::get_token`]: BSN or pseudonym -> token

use pseudonyms_crypto::SecretKey;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ExchangeConfig;
use crate::envelope;
use crate::error::{ExchangeError, Result};
use crate::identifier::{Identifier, IdentifierType};
use crate::payload::{Pseudonym, Scope, Token};

/// Request body for [`PseudonymService::exchange_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeIdentifierRequest {
    pub identifier: Identifier,
    pub recipient_identifier_type: IdentifierType,
    /// Required when the source is a BSN. For a pseudonym source it must
    /// match the pseudonym's audience if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
}

/// Request body for [`PseudonymService::exchange_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeTokenRequest {
    pub token: String,
    pub identifier_type: IdentifierType,
}

/// Request body for [`PseudonymService::get_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenRequest {
    pub identifier: Identifier,
    pub sender: String,
    pub receiver: String,
}

/// Identifier and token exchange over one injected key.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct PseudonymService {
    key: SecretKey,
    config: ExchangeConfig,
}

impl PseudonymService {
    pub fn new(key: SecretKey) -> Self {
        Self::with_config(key, ExchangeConfig::default())
    }

    pub const fn with_config(key: SecretKey, config: ExchangeConfig) -> Self {
        Self { key, config }
    }

    /// Exchange a BSN for an organisation pseudonym or the reverse.
    pub fn exchange_identifier(&self, request: &ExchangeIdentifierRequest) -> Result<Identifier> {
        let source = request.identifier.identifier_type;
        let target = request.recipient_identifier_type;
        if source == target {
            return Err(ExchangeError::invalid_request(
                "source and target identifier types cannot be the same",
            ));
        }
        require("identifier value", &request.identifier.value)?;
        let organisation = optional("organisation", request.organisation.as_deref())?;

        let (subject, audience) = match source {
            IdentifierType::Bsn => {
                let organisation = organisation.ok_or_else(|| {
                    ExchangeError::invalid_request(
                        "organisation is required for BSN to pseudonym exchange",
                    )
                })?;
                (request.identifier.value.clone(), organisation.to_string())
            }
            IdentifierType::OrgPseudonym => {
                let pseudonym = envelope::open_pseudonym(&self.key, &request.identifier.value)?;
                if let Some(organisation) = organisation
                    && organisation != pseudonym.audience
                {
                    return Err(ExchangeError::InconsistentAudience {
                        requested: organisation.to_string(),
                    });
                }
                (pseudonym.subject, pseudonym.audience)
            }
        };

        debug!(from = %source, to = %target, %audience, "Exchanging identifier");
        self.identifier_for(target, subject, audience, self.config.default_scope)
    }

    /// Resolve a token to an identifier of the requested type.
    pub fn exchange_token(&self, request: &ExchangeTokenRequest) -> Result<Identifier> {
        self.exchange_token_at(request, now_secs())
    }

    /// [`Self::exchange_token`] evaluated at `now` (unix seconds).
    pub fn exchange_token_at(
        &self,
        request: &ExchangeTokenRequest,
        now: i64,
    ) -> Result<Identifier> {
        require("token", &request.token)?;
        let token = envelope::open_token(&self.key, &request.token)?;

        let skew = i64::try_from(self.config.clock_skew_secs).unwrap_or(i64::MAX);
        if token.expiration <= now.saturating_sub(skew) {
            debug!(expiration = token.expiration, now, "Rejecting expired token");
            return Err(ExchangeError::ExpiredToken {
                expiration: token.expiration,
            });
        }

        let scope = token
            .scopes
            .first()
            .copied()
            .ok_or_else(|| ExchangeError::Schema("token has no scopes".into()))?;

        debug!(
            to = %request.identifier_type,
            issuer = %token.issuer,
            audience = %token.audience,
            "Exchanging token"
        );
        self.identifier_for(
            request.identifier_type,
            token.subject,
            token.audience,
            scope,
        )
    }

    /// Issue a token for the identified subject.
    pub fn get_token(&self, request: &GetTokenRequest) -> Result<String> {
        self.get_token_at(request, now_secs())
    }

    /// [`Self::get_token`] evaluated at `now` (unix seconds).
    pub fn get_token_at(&self, request: &GetTokenRequest, now: i64) -> Result<String> {
        require("identifier value", &request.identifier.value)?;
        require("sender", &request.sender)?;
        require("receiver", &request.receiver)?;

        let validity = i64::try_from(self.config.token_validity_secs).unwrap_or(i64::MAX);
        let expiration = now
            .checked_add(validity)
            .filter(|&at| at > now)
            .ok_or_else(|| {
                ExchangeError::invalid_request("token validity does not yield a future expiration")
            })?;

        let subject = match request.identifier.identifier_type {
            IdentifierType::Bsn => request.identifier.value.clone(),
            IdentifierType::OrgPseudonym => {
                envelope::open_pseudonym(&self.key, &request.identifier.value)?.subject
            }
        };

        let token = Token {
            subject,
            issuer: request.sender.clone(),
            audience: request.receiver.clone(),
            issued_at: now,
            expiration,
            scopes: vec![self.config.default_scope],
        };

        info!(
            from = %request.identifier.identifier_type,
            issuer = %token.issuer,
            audience = %token.audience,
            expiration = token.expiration,
            "Issuing token"
        );
        envelope::seal_token(&self.key, &token)
    }

    fn identifier_for(
        &self,
        target: IdentifierType,
        subject: String,
        audience: String,
        scope: Scope,
    ) -> Result<Identifier> {
        match target {
            IdentifierType::Bsn => Ok(Identifier::bsn(subject)),
            IdentifierType::OrgPseudonym => {
                let pseudonym = Pseudonym {
                    subject,
                    audience,
                    scope,
                    version: self.config.pseudonym_version,
                };
                envelope::seal_pseudonym(&self.key, &pseudonym).map(Identifier::pseudonym)
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ExchangeError::invalid_request(format!("{field} is required")));
    }
    Ok(())
}

fn optional<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>> {
    value.map_or(Ok(None), |v| require(field, v).map(|()| Some(v)))
}

fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    secs
}
