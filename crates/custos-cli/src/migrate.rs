//! `custos migrate` — apply the embedded database migrations and exit.

use anyhow::Context;
use clap::Args;

use custos_store::PgStore;

use crate::env_var;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Postgres URL. Defaults to CUSTOS_DATABASE_URL.
    #[arg(long)]
    pub database_url: Option<String>,
}

pub fn run_migrate(args: &MigrateArgs) -> anyhow::Result<u8> {
    let url = args
        .database_url
        .clone()
        .or_else(|| env_var("CUSTOS_DATABASE_URL"))
        .context("no database URL: pass --database-url or set CUSTOS_DATABASE_URL")?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async {
        // Connecting applies the embedded migrations.
        PgStore::connect(&url).await.context("migration failed")
    })?;
    tracing::info!("migrations applied");
    println!("migrations applied");
    Ok(0)
}
