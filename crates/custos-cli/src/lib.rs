//! # custos-cli — Command-Line Interface
//!
//! Subcommand handlers for the `custos` binary:
//!
//! - `serve` — run the API server
//! - `migrate` — apply database migrations and exit
//! - `schema` — print the record schema catalog as JSON
//! - `report` — render a compliance report to a file
//!
//! Runtime configuration comes from `CUSTOS_*` environment variables, with
//! flags taking precedence where a subcommand offers one.

pub mod migrate;
pub mod report;
pub mod schema;
pub mod serve;

use custos_api::AppConfig;
use custos_sentinel::SentinelConfig;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_flag(name: &str) -> bool {
    matches!(env_var(name).as_deref(), Some("1") | Some("true"))
}

/// Assemble application configuration from `CUSTOS_*` environment variables.
///
/// `CUSTOS_DEMO=1` forces the in-memory backends even when a database URL
/// is set. The vendor adapter activates only when both the base URL and the
/// API key are present.
pub fn config_from_env() -> AppConfig {
    let demo = env_flag("CUSTOS_DEMO");
    let sentinel = match (
        env_var("CUSTOS_SENTINEL_BASE_URL"),
        env_var("CUSTOS_SENTINEL_API_KEY"),
    ) {
        (Some(base_url), Some(api_key)) if !demo => Some(SentinelConfig::new(
            base_url,
            api_key,
            env_var("CUSTOS_SENTINEL_WORKSPACE_ID").unwrap_or_default(),
        )),
        _ => None,
    };
    let mut config = AppConfig {
        auth_token: env_var("CUSTOS_AUTH_TOKEN"),
        database_url: if demo { None } else { env_var("CUSTOS_DATABASE_URL") },
        sentinel,
        ..AppConfig::default()
    };
    if let Some(dir) = env_var("CUSTOS_ATTACHMENTS_DIR") {
        config.attachments_dir = dir.into();
    }
    config
}
