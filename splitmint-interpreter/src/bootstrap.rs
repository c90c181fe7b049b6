use crate::CliResult;
use splitmint_application::LedgerConfig;
use std::env;
use tracing_subscriber::EnvFilter;

pub const CURRENCY_VAR: &str = "SPLITMINT_CURRENCY";
pub const MAX_PARTICIPANTS_VAR: &str = "SPLITMINT_MAX_PARTICIPANTS";

/// Interpreter configuration read from the environment and an optional `.env`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub ledger: LedgerConfig,
}

impl InterpreterConfig {
    pub fn from_env() -> CliResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ledger = LedgerConfig::default();

        if let Some(currency) = lookup(CURRENCY_VAR) {
            let currency = currency.trim();
            if !currency.is_empty() {
                ledger = ledger.with_default_currency(currency.to_ascii_uppercase());
            }
        }
        if let Some(raw) = lookup(MAX_PARTICIPANTS_VAR) {
            ledger = ledger.with_participant_limit(parse_participant_limit(&raw)?);
        }

        Ok(Self { ledger })
    }
}

/// `0` and `none` lift the limit.
fn parse_participant_limit(raw: &str) -> CliResult<Option<usize>> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match value.parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(limit) => Ok(Some(limit)),
        Err(_) => Err(format!("Invalid {MAX_PARTICIPANTS_VAR} value '{raw}'").into()),
    }
}

/// Logs go to stderr so they never mix with the report on stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
