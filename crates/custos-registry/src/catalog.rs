//! # Canonical Schema Catalog
//!
//! One [`RecordSchema`] per compliance record table. This is the full set of
//! "Add record" forms the dashboard offers; every list page, form, and
//! validation pass is driven from these definitions.
//!
//! Field keys are the canonical English snake_case names. Where the source
//! data carried both a localized and a legacy English name for the same
//! field, the catalog keeps exactly one.

use crate::schema::{FieldKind, FieldSpec, RecordSchema};

const RISK_LEVELS: &[&str] = &["low", "medium", "high"];
const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];
const REVIEW_STATUSES: &[&str] = &["compliant", "under_review", "needs_update"];
const FRAMEWORKS: &[&str] = &["gdpr", "zvop2", "nis2", "ai_act", "iso27001"];

macro_rules! field {
    ($key:literal, $label:literal, $kind:expr) => {
        FieldSpec {
            key: $key,
            label: $label,
            kind: $kind,
            required: false,
        }
    };
    ($key:literal, $label:literal, $kind:expr, required) => {
        FieldSpec {
            key: $key,
            label: $label,
            kind: $kind,
            required: true,
        }
    };
}

const SUPPLIERS: RecordSchema = RecordSchema {
    table: "suppliers",
    title: "Suppliers",
    fields: &[
        field!("name", "Supplier name", FieldKind::Text, required),
        field!("contact_email", "Contact email", FieldKind::Email),
        field!("country", "Country", FieldKind::Text),
        field!("services_provided", "Services provided", FieldKind::LongText),
        field!("iso27001_certified", "ISO 27001 certified", FieldKind::Flag),
        field!(
            "data_protection_compliant",
            "Data protection compliance confirmed",
            FieldKind::Flag
        ),
        field!("contract_expiry", "Contract expiry", FieldKind::Date),
        field!(
            "risk_level",
            "Risk level",
            FieldKind::Select { options: RISK_LEVELS }
        ),
        field!("notes", "Notes", FieldKind::LongText),
    ],
    date_rules: &[],
};

const RISK_ASSESSMENTS: RecordSchema = RecordSchema {
    table: "risk_assessments",
    title: "Risk Assessments",
    fields: &[
        field!("title", "Assessment title", FieldKind::Text, required),
        field!("supplier_id", "Supplier", FieldKind::Text),
        field!("assessment_date", "Assessment date", FieldKind::Date, required),
        field!(
            "likelihood",
            "Likelihood",
            FieldKind::Select { options: RISK_LEVELS }
        ),
        field!("impact", "Impact", FieldKind::Select { options: RISK_LEVELS }),
        field!(
            "risk_level",
            "Resulting risk",
            FieldKind::Select { options: SEVERITIES }
        ),
        field!("mitigation_plan", "Mitigation plan", FieldKind::LongText),
        field!("review_date", "Next review", FieldKind::Date),
    ],
    date_rules: &[("assessment_date", "review_date")],
};

const INCIDENTS: RecordSchema = RecordSchema {
    table: "incidents",
    title: "Incidents",
    fields: &[
        field!("title", "Incident title", FieldKind::Text, required),
        field!("description", "Description", FieldKind::LongText),
        field!(
            "severity",
            "Severity",
            FieldKind::Select { options: SEVERITIES }
        ),
        field!(
            "status",
            "Status",
            FieldKind::Select {
                options: &["open", "investigating", "contained", "resolved"]
            }
        ),
        field!("occurred_at", "Occurred on", FieldKind::Date, required),
        field!("resolved_at", "Resolved on", FieldKind::Date),
        field!(
            "reported_to_authority",
            "Reported to supervisory authority",
            FieldKind::Flag
        ),
        field!("supplier_id", "Related supplier", FieldKind::Text),
    ],
    date_rules: &[("occurred_at", "resolved_at")],
};

const AUDIT_ENTRIES: RecordSchema = RecordSchema {
    table: "audit_entries",
    title: "Audit Trail",
    fields: &[
        field!("action", "Action", FieldKind::Text, required),
        field!("actor", "Performed by", FieldKind::Text, required),
        field!("entry_date", "Date", FieldKind::Date, required),
        field!("area", "Framework", FieldKind::Select { options: FRAMEWORKS }),
        field!("details", "Details", FieldKind::LongText),
    ],
    date_rules: &[],
};

const POLICIES: RecordSchema = RecordSchema {
    table: "policies",
    title: "Policies",
    fields: &[
        field!("title", "Policy title", FieldKind::Text, required),
        field!("version", "Version", FieldKind::Text),
        field!(
            "status",
            "Status",
            FieldKind::Select {
                options: &["draft", "in_force", "retired"]
            }
        ),
        field!("effective_date", "Effective from", FieldKind::Date),
        field!("review_date", "Next review", FieldKind::Date),
        field!("owner", "Policy owner", FieldKind::Text),
        field!("document_url", "Document link", FieldKind::Text),
    ],
    date_rules: &[("effective_date", "review_date")],
};

const COMPLIANCE_DOCUMENTS: RecordSchema = RecordSchema {
    table: "compliance_documents",
    title: "Compliance Documents",
    fields: &[
        field!("title", "Document title", FieldKind::Text, required),
        field!(
            "category",
            "Framework",
            FieldKind::Select { options: FRAMEWORKS }
        ),
        field!(
            "status",
            "Review status",
            FieldKind::Select { options: REVIEW_STATUSES },
            required
        ),
        field!("expiry_date", "Valid until", FieldKind::Date),
        field!("file_digest", "Attached file", FieldKind::Text),
        field!("notes", "Notes", FieldKind::LongText),
    ],
    date_rules: &[],
};

const ZVOP_REQUIREMENTS: RecordSchema = RecordSchema {
    table: "zvop_requirements",
    title: "ZVOP-2 Requirements",
    fields: &[
        field!("requirement", "Requirement", FieldKind::Text, required),
        field!("article", "Article", FieldKind::Text),
        field!(
            "status",
            "Fulfilment",
            FieldKind::Select {
                options: &["met", "partially_met", "not_met"]
            }
        ),
        field!("responsible", "Responsible person", FieldKind::Text),
        field!("evidence", "Evidence", FieldKind::LongText),
        field!("due_date", "Due date", FieldKind::Date),
    ],
    date_rules: &[],
};

const AI_DOCUMENTS: RecordSchema = RecordSchema {
    table: "ai_documents",
    title: "AI Act Documentation",
    fields: &[
        field!("title", "Document title", FieldKind::Text, required),
        field!("system_name", "AI system", FieldKind::Text),
        field!(
            "risk_category",
            "AI Act risk category",
            FieldKind::Select {
                options: &["minimal", "limited", "high", "prohibited"]
            }
        ),
        field!(
            "status",
            "Review status",
            FieldKind::Select { options: REVIEW_STATUSES }
        ),
        field!("assessment_date", "Assessed on", FieldKind::Date),
        field!("expiry_date", "Valid until", FieldKind::Date),
        field!("notes", "Notes", FieldKind::LongText),
    ],
    date_rules: &[("assessment_date", "expiry_date")],
};

const WORKSTATIONS: RecordSchema = RecordSchema {
    table: "workstations",
    title: "SOC Workstations",
    fields: &[
        field!("hostname", "Hostname", FieldKind::Text, required),
        field!("os", "Operating system", FieldKind::Text),
        field!("owner", "Assigned to", FieldKind::Text),
        field!(
            "av_status",
            "Protection status",
            FieldKind::Select {
                options: &["protected", "at_risk", "unknown"]
            }
        ),
        field!("last_seen", "Last seen", FieldKind::Date),
    ],
    date_rules: &[],
};

const SECURITY_EVENTS: RecordSchema = RecordSchema {
    table: "security_events",
    title: "Security Events",
    fields: &[
        field!("event_type", "Event type", FieldKind::Text, required),
        field!(
            "severity",
            "Severity",
            FieldKind::Select { options: SEVERITIES }
        ),
        field!("endpoint_id", "Endpoint", FieldKind::Text),
        field!("detected_at", "Detected on", FieldKind::Date, required),
        field!("description", "Description", FieldKind::LongText),
    ],
    date_rules: &[],
};

const SCAN_TASKS: RecordSchema = RecordSchema {
    table: "scan_tasks",
    title: "Scan Tasks",
    fields: &[
        field!("endpoint_id", "Endpoint", FieldKind::Text, required),
        field!("scan_id", "Vendor scan id", FieldKind::Text),
        field!(
            "status",
            "Status",
            FieldKind::Select {
                options: &["queued", "running", "completed", "failed"]
            }
        ),
        field!("started_at", "Started on", FieldKind::Date),
        field!("note", "Note", FieldKind::LongText),
    ],
    date_rules: &[],
};

/// All schemas, in dashboard display order.
const CATALOG: &[RecordSchema] = &[
    SUPPLIERS,
    RISK_ASSESSMENTS,
    INCIDENTS,
    AUDIT_ENTRIES,
    POLICIES,
    COMPLIANCE_DOCUMENTS,
    ZVOP_REQUIREMENTS,
    AI_DOCUMENTS,
    WORKSTATIONS,
    SECURITY_EVENTS,
    SCAN_TASKS,
];

/// Look up the schema for a table name. `None` for unknown tables — the API
/// maps that to 404 rather than ever touching the store.
pub fn schema_for(table: &str) -> Option<&'static RecordSchema> {
    CATALOG.iter().find(|s| s.table == table)
}

/// The full list of known table names, in display order.
pub fn table_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|s| s.table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_resolves_to_its_own_schema() {
        for name in table_names() {
            let schema = schema_for(name).unwrap();
            assert_eq!(schema.table, name);
        }
    }

    #[test]
    fn unknown_table_is_none() {
        assert!(schema_for("no_such_table").is_none());
    }

    #[test]
    fn table_names_are_unique() {
        let names: Vec<_> = table_names().collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn date_rules_reference_declared_date_fields() {
        for schema in CATALOG {
            for (earlier, later) in schema.date_rules {
                for key in [earlier, later] {
                    let spec = schema
                        .field(key)
                        .unwrap_or_else(|| panic!("{}: missing field {key}", schema.table));
                    assert!(
                        matches!(spec.kind, crate::schema::FieldKind::Date),
                        "{}: {key} must be a date field",
                        schema.table
                    );
                }
            }
        }
    }

    #[test]
    fn every_schema_has_at_least_one_required_field() {
        for schema in CATALOG {
            assert!(
                schema.fields.iter().any(|f| f.required),
                "{} has no required field",
                schema.table
            );
        }
    }
}
