//! `custos schema` — print the record schema catalog as JSON.

use anyhow::Context;
use clap::Args;

use custos_registry::{schema_for, table_names};

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print only this table's schema. Omit to print the whole catalog.
    pub table: Option<String>,

    /// Print table names only, one per line.
    #[arg(long)]
    pub list: bool,
}

pub fn run_schema(args: &SchemaArgs) -> anyhow::Result<u8> {
    if args.list {
        for name in table_names() {
            println!("{name}");
        }
        return Ok(0);
    }

    let json = match &args.table {
        Some(table) => {
            let schema = schema_for(table)
                .with_context(|| format!("unknown record table '{table}'"))?;
            serde_json::to_string_pretty(schema)?
        }
        None => {
            let all: Vec<_> = table_names().filter_map(schema_for).collect();
            serde_json::to_string_pretty(&all)?
        }
    };
    println!("{json}");
    Ok(0)
}
