//! `custos report` — render a compliance report to an HTML file.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;

use custos_api::routes::metrics::dashboard_snapshot;
use custos_core::{demo_org_id, OrgId};
use custos_report::{render_html, ReportInput};
use custos_store::{DemoStore, Store};

use crate::config_from_env;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Organization id to report on. Defaults to the demo organization
    /// when running against the demo store.
    #[arg(long)]
    pub org: Option<String>,

    /// Output file. Defaults to compliance-report-<date>.html.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Use the seeded demo store regardless of CUSTOS_DATABASE_URL.
    #[arg(long)]
    pub demo: bool,
}

pub fn run_report(args: &ReportArgs) -> anyhow::Result<u8> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let (path, organization_name) = runtime.block_on(render(args))?;
    println!("report for {organization_name} written to {}", path.display());
    Ok(0)
}

async fn render(args: &ReportArgs) -> anyhow::Result<(PathBuf, String)> {
    let config = config_from_env();
    let store = if args.demo || config.database_url.is_none() {
        Store::Demo(DemoStore::seeded())
    } else {
        Store::open(config.database_url.as_deref()).await?
    };

    let org: OrgId = match &args.org {
        Some(raw) => raw.parse().context("--org is not a UUID")?,
        None if store.is_demo() => demo_org_id(),
        None => anyhow::bail!("no organization: pass --org"),
    };
    let organization = store
        .organization(org)
        .await?
        .with_context(|| format!("no organization with id {org}"))?;

    let today = Utc::now().date_naive();
    let metrics = dashboard_snapshot(&store, org, today)
        .await
        .map_err(|e| anyhow::anyhow!("failed to aggregate metrics: {e}"))?;

    let input = ReportInput {
        organization_name: organization.name.clone(),
        generated_on: today,
        supplier_compliance_rate: metrics.supplier_compliance_rate,
        supplier_total: metrics.supplier_total,
        documents: metrics.documents,
        open_incidents: metrics.open_incidents,
        total_incidents: metrics.total_incidents,
        expiring_documents: metrics
            .expiring_documents
            .into_iter()
            .map(|d| (d.title, d.expiry_date))
            .collect(),
    };

    let path = args.out.clone().unwrap_or_else(|| {
        PathBuf::from(format!("compliance-report-{}.html", today.format("%Y-%m-%d")))
    });
    std::fs::write(&path, render_html(&input))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok((path, organization.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_report_renders_to_the_requested_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.html");
        let args = ReportArgs {
            org: None,
            out: Some(out.clone()),
            demo: true,
        };
        assert_eq!(run_report(&args).unwrap(), 0);
        let html = std::fs::read_to_string(out).unwrap();
        assert!(html.contains("Demo d.o.o."));
    }
}
