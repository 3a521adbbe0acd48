//! Subcommands mapping one-to-one onto the exchange API.

use serde::Serialize;

use pseudonyms_core::{
    ExchangeError, ExchangeIdentifierRequest, ExchangeTokenRequest, GetTokenRequest, Identifier,
    IdentifierType, PseudonymService,
};

/// Exchange subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Exchange a BSN for an organisation pseudonym, or the reverse.
    ExchangeIdentifier {
        /// Identifier value (BSN or pseudonym container).
        #[arg(long)]
        value: String,
        /// Type of the given identifier (`BSN` or `ORGANISATION_PSEUDO`).
        #[arg(long = "type")]
        identifier_type: IdentifierType,
        /// Type to exchange to.
        #[arg(long)]
        to: IdentifierType,
        /// Organisation the pseudonym is (or must be) scoped to.
        #[arg(long)]
        organisation: Option<String>,
    },
    /// Resolve a token to a BSN or an organisation pseudonym.
    ExchangeToken {
        /// Token string.
        #[arg(long)]
        token: String,
        /// Type to exchange to.
        #[arg(long)]
        to: IdentifierType,
    },
    /// Issue a token for an identifier.
    GetToken {
        /// Identifier value (BSN or pseudonym container).
        #[arg(long)]
        value: String,
        /// Type of the given identifier (`BSN` or `ORGANISATION_PSEUDO`).
        #[arg(long = "type")]
        identifier_type: IdentifierType,
        /// Issuing party.
        #[arg(long)]
        sender: String,
        /// Audience of the token.
        #[arg(long)]
        receiver: String,
    },
}

/// Response body, shaped like the service's JSON responses.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Output {
    Identifier { identifier: Identifier },
    Token { token: String },
}

/// Error body written to stderr.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl From<&ExchangeError> for ErrorBody {
    fn from(err: &ExchangeError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Execute a subcommand against `service`.
pub fn run(service: &PseudonymService, command: Command) -> Result<Output, ExchangeError> {
    match command {
        Command::ExchangeIdentifier {
            value,
            identifier_type,
            to,
            organisation,
        } => service
            .exchange_identifier(&ExchangeIdentifierRequest {
                identifier: Identifier::new(value, identifier_type),
                recipient_identifier_type: to,
                organisation,
            })
            .map(|identifier| Output::Identifier { identifier }),
        Command::ExchangeToken { token, to } => service
            .exchange_token(&ExchangeTokenRequest {
                token,
                identifier_type: to,
            })
            .map(|identifier| Output::Identifier { identifier }),
        Command::GetToken {
            value,
            identifier_type,
            sender,
            receiver,
        } => service
            .get_token(&GetTokenRequest {
                identifier: Identifier::new(value, identifier_type),
                sender,
                receiver,
            })
            .map(|token| Output::Token { token }),
    }
}
