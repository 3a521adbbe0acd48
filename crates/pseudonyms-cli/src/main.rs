//! `pseudonyms` command-line front end.
//!
//! Prints the JSON response on stdout. Rejected requests print
//! `{"code", "message"}` on stderr and exit with status 2.

mod commands;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use pseudonyms_core::SecretKey;
use pseudonyms_core::config::load_config;
use pseudonyms_core::exchange::PseudonymService;
use pseudonyms_core::tracing_init::init_tracing;

use commands::{Command, ErrorBody};

/// Exit status for requests rejected by the exchange.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "pseudonyms", version, about = "BSN and pseudonym exchange")]
struct Cli {
    /// AES key, hex encoded (16, 24 or 32 bytes).
    #[arg(long, env = "PSEUDONYMS_KEY", hide_env_values = true)]
    key: String,

    /// Path to a JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.log_json {
        config.log.json = true;
    }
    init_tracing(&config.log).context("Failed to initialise tracing")?;

    let key = SecretKey::from_hex(&cli.key).context("Invalid --key")?;
    info!(key = ?key, "Starting pseudonyms");
    let service = PseudonymService::with_config(key, config.exchange);

    match commands::run(&service, cli.command) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(code = err.code(), error = %err, "Request rejected");
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{}", serde_json::to_string(&ErrorBody::from(&err))?)?;
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pseudonyms_core::IdentifierType;

    use super::*;

    #[test]
    fn parses_exchange_identifier() {
        let cli = Cli::try_parse_from([
            "pseudonyms",
            "--key",
            "00112233445566778899aabbccddeeff",
            "exchange-identifier",
            "--value",
            "999999999",
            "--type",
            "BSN",
            "--to",
            "ORGANISATION_PSEUDO",
            "--organisation",
            "org-A",
        ])
        .unwrap();
        let Command::ExchangeIdentifier {
            value,
            identifier_type,
            to,
            organisation,
        } = cli.command
        else {
            unreachable!("parsed wrong subcommand");
        };
        assert_eq!(value, "999999999");
        assert_eq!(identifier_type, IdentifierType::Bsn);
        assert_eq!(to, IdentifierType::OrgPseudonym);
        assert_eq!(organisation.as_deref(), Some("org-A"));
    }

    #[test]
    fn rejects_unknown_identifier_type() {
        let result = Cli::try_parse_from([
            "pseudonyms",
            "--key",
            "00",
            "exchange-token",
            "--token",
            "t",
            "--to",
            "PASSPORT",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
