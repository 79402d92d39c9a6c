//! # custos-report — Compliance Report Rendering
//!
//! Builds the downloadable HTML compliance report and the `mailto:` payload
//! for sending it to the supervisory authority. Delivery stays manual by
//! design: the mail body walks the operator through attaching the
//! downloaded file and sending it — there is no programmatic delivery and
//! no confirmation.
//!
//! Rendering is pure string building over values the API layer has already
//! aggregated; nothing here performs I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;

use custos_core::metrics::DocumentCounters;

/// Fixed recipient: the national supervisory authority for data protection.
pub const AUTHORITY_EMAIL: &str = "gp.ip@ip-rs.si";

/// Everything the report renders. Aggregated by the caller; the report
/// crate never touches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInput {
    pub organization_name: String,
    pub generated_on: NaiveDate,
    /// Supplier compliance rate, 0–100.
    pub supplier_compliance_rate: u32,
    pub supplier_total: usize,
    pub documents: DocumentCounters,
    pub open_incidents: usize,
    pub total_incidents: usize,
    /// Documents inside the expiry warning window: (title, expiry date).
    pub expiring_documents: Vec<(String, NaiveDate)>,
}

/// Render the report as a self-contained HTML document.
pub fn render_html(input: &ReportInput) -> String {
    let mut expiring_rows = String::new();
    for (title, date) in &input.expiring_documents {
        expiring_rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape(title),
            date.format("%Y-%m-%d"),
        ));
    }
    if expiring_rows.is_empty() {
        expiring_rows = "<tr><td colspan=\"2\">No documents expiring in the next 30 days.</td></tr>\n".to_string();
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Compliance report — {org}</title>
<style>
body {{ font-family: sans-serif; margin: 2em; color: #1a1a1a; }}
h1 {{ border-bottom: 2px solid #1a1a1a; padding-bottom: 0.3em; }}
table {{ border-collapse: collapse; margin: 1em 0; }}
td, th {{ border: 1px solid #999; padding: 0.4em 0.8em; text-align: left; }}
.cards {{ display: flex; gap: 1em; }}
.card {{ border: 1px solid #999; padding: 1em; min-width: 10em; }}
.card b {{ font-size: 1.6em; display: block; }}
</style>
</head>
<body>
<h1>Compliance report — {org}</h1>
<p>Generated on {date}.</p>
<div class="cards">
<div class="card"><b>{rate}%</b>Supplier compliance rate ({suppliers} suppliers)</div>
<div class="card"><b>{compliant}/{doc_total}</b>Documents compliant</div>
<div class="card"><b>{needs_update}</b>Documents needing update</div>
<div class="card"><b>{open_incidents}/{total_incidents}</b>Incidents open</div>
</div>
<h2>Document status</h2>
<table>
<tr><th>Compliant</th><th>Under review</th><th>Needs update</th><th>Total</th></tr>
<tr><td>{compliant}</td><td>{under_review}</td><td>{needs_update}</td><td>{doc_total}</td></tr>
</table>
<h2>Expiring within 30 days</h2>
<table>
<tr><th>Document</th><th>Valid until</th></tr>
{expiring_rows}</table>
</body>
</html>
"#,
        org = escape(&input.organization_name),
        date = input.generated_on.format("%Y-%m-%d"),
        rate = input.supplier_compliance_rate,
        suppliers = input.supplier_total,
        compliant = input.documents.compliant,
        under_review = input.documents.under_review,
        needs_update = input.documents.needs_update,
        doc_total = input.documents.total,
        open_incidents = input.open_incidents,
        total_incidents = input.total_incidents,
        expiring_rows = expiring_rows,
    )
}

/// Build the `mailto:` URL with a prefilled subject and body. The body
/// describes the manual steps: download the report, attach it, send.
pub fn mailto_url(input: &ReportInput) -> String {
    let subject = format!(
        "Compliance report — {} — {}",
        input.organization_name,
        input.generated_on.format("%Y-%m-%d"),
    );
    let body = format!(
        "Dear Sir or Madam,\n\n\
         please find attached the compliance report for {org}, generated on {date}.\n\n\
         (Before sending: download the report from the dashboard and attach the\n\
         HTML file to this message.)\n\n\
         Kind regards",
        org = input.organization_name,
        date = input.generated_on.format("%Y-%m-%d"),
    );
    format!(
        "mailto:{}?subject={}&body={}",
        AUTHORITY_EMAIL,
        encode(&subject),
        encode(&body),
    )
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ReportInput {
        ReportInput {
            organization_name: "Acme <d.o.o.>".into(),
            generated_on: NaiveDate::parse_from_str("2026-08-24", "%Y-%m-%d").unwrap(),
            supplier_compliance_rate: 67,
            supplier_total: 3,
            documents: DocumentCounters {
                total: 4,
                compliant: 1,
                under_review: 1,
                needs_update: 2,
            },
            open_incidents: 1,
            total_incidents: 5,
            expiring_documents: vec![(
                "Information security policy".into(),
                NaiveDate::parse_from_str("2026-09-10", "%Y-%m-%d").unwrap(),
            )],
        }
    }

    #[test]
    fn html_escapes_organization_name() {
        let html = render_html(&input());
        assert!(html.contains("Acme &lt;d.o.o.&gt;"));
        assert!(!html.contains("Acme <d.o.o.>"));
    }

    #[test]
    fn html_lists_expiring_documents() {
        let html = render_html(&input());
        assert!(html.contains("Information security policy"));
        assert!(html.contains("2026-09-10"));
    }

    #[test]
    fn empty_expiry_list_renders_placeholder() {
        let mut i = input();
        i.expiring_documents.clear();
        let html = render_html(&i);
        assert!(html.contains("No documents expiring"));
    }

    #[test]
    fn mailto_targets_authority_with_encoded_subject() {
        let url = mailto_url(&input());
        assert!(url.starts_with("mailto:gp.ip@ip-rs.si?subject="));
        // Spaces are form-encoded; no raw spaces survive.
        assert!(!url.contains(' '));
        assert!(url.contains("body="));
    }
}
