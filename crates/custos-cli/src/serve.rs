//! `custos serve` — run the API server.

use anyhow::Context;
use clap::Args;

use custos_api::{app, AppState};

use crate::config_from_env;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: String,
}

pub fn run_serve(args: &ServeArgs) -> anyhow::Result<u8> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(serve(args))?;
    Ok(0)
}

async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let config = config_from_env();
    if config.auth_token.is_none() {
        tracing::warn!("CUSTOS_AUTH_TOKEN not set — API authentication is disabled");
    }
    let state = AppState::from_config(config)
        .await
        .context("failed to initialize application state")?;

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    tracing::info!(addr = %args.bind, demo = state.store.is_demo(), "custos API listening");

    axum::serve(listener, app(state))
        .await
        .context("server terminated")?;
    Ok(())
}
