//! # custos CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Configuration comes from `CUSTOS_*` environment variables; flags take
//! precedence where a subcommand offers one.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use custos_cli::migrate::{run_migrate, MigrateArgs};
use custos_cli::report::{run_report, ReportArgs};
use custos_cli::schema::{run_schema, SchemaArgs};
use custos_cli::serve::{run_serve, ServeArgs};

/// Custos Compliance Stack CLI
///
/// Multi-tenant compliance registry for GDPR, ZVOP-2, NIS2, AI Act, and
/// ISO 27001 programmes: API server, migrations, schema catalog export,
/// and compliance report generation.
#[derive(Parser, Debug)]
#[command(name = "custos", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the API server.
    Serve(ServeArgs),

    /// Apply database migrations and exit.
    Migrate(MigrateArgs),

    /// Print the record schema catalog as JSON.
    Schema(SchemaArgs),

    /// Render a compliance report to an HTML file.
    Report(ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Migrate(args) => run_migrate(&args),
        Commands::Schema(args) => run_schema(&args),
        Commands::Report(args) => run_report(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
