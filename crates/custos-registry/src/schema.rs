//! # Field Schemas and Validation
//!
//! A [`RecordSchema`] is the single source of truth for one record table:
//! which fields exist, how they render, which are required, and which date
//! pairs must be ordered. Validation is presence-first (missing or empty
//! required fields fail before kind checks) and reports *all* failures,
//! keyed by field name, so a form can annotate every offending input in one
//! round trip.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use custos_core::ValidationError;

/// How a field renders and which values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldKind {
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    LongText,
    /// ISO `YYYY-MM-DD` date.
    Date,
    /// JSON number.
    Number,
    /// One of a fixed option set.
    Select {
        options: &'static [&'static str],
    },
    /// Boolean checkbox.
    Flag,
    /// Email address. Checked only for the shape a native email input
    /// enforces (a `@` with text on both sides).
    Email,
}

/// One field of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
}

/// The declarative description of one record table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecordSchema {
    /// Backing table name, also the path segment in `/v1/records/{table}`.
    pub table: &'static str,
    /// Human-readable title for list pages and the add-record form.
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    /// Pairs `(earlier, later)`: when both dates are present, `earlier`
    /// must not be after `later`.
    pub date_rules: &'static [(&'static str, &'static str)],
}

impl RecordSchema {
    /// Look up a field spec by key.
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Validate a submitted field map against this schema.
    ///
    /// Returns every failure at once. Unknown keys are accepted unchanged —
    /// records carry a free-form tail of descriptive fields beyond the
    /// schema's own list.
    pub fn validate(&self, fields: &Map<String, Value>) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for spec in self.fields {
            let value = fields.get(spec.key);
            if is_absent(value) {
                if spec.required {
                    errors.push(ValidationError::MissingField {
                        field: spec.key.to_string(),
                    });
                }
                continue;
            }
            if let Some(value) = value {
                if let Some(reason) = kind_error(spec.kind, value) {
                    errors.push(ValidationError::InvalidValue {
                        field: spec.key.to_string(),
                        reason,
                    });
                }
            }
        }

        for (earlier, later) in self.date_rules {
            if let (Some(a), Some(b)) = (parse_date_field(fields, earlier), parse_date_field(fields, later)) {
                if a > b {
                    errors.push(ValidationError::DateOrder {
                        earlier: earlier.to_string(),
                        later: later.to_string(),
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A field is absent when missing, JSON null, or an empty/whitespace string.
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Check a present value against its declared kind. Returns a reason on
/// mismatch.
fn kind_error(kind: FieldKind, value: &Value) -> Option<String> {
    match kind {
        FieldKind::Text | FieldKind::LongText => match value {
            Value::String(_) => None,
            _ => Some("expected a string".to_string()),
        },
        FieldKind::Date => match value.as_str() {
            Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(_) => None,
                Err(_) => Some(format!("'{s}' is not a YYYY-MM-DD date")),
            },
            None => Some("expected a YYYY-MM-DD date string".to_string()),
        },
        FieldKind::Number => match value {
            Value::Number(_) => None,
            _ => Some("expected a number".to_string()),
        },
        FieldKind::Select { options } => match value.as_str() {
            Some(s) if options.contains(&s) => None,
            Some(s) => Some(format!("'{s}' is not one of {}", options.join(", "))),
            None => Some("expected a string option".to_string()),
        },
        FieldKind::Flag => match value {
            Value::Bool(_) => None,
            _ => Some("expected true or false".to_string()),
        },
        FieldKind::Email => match value.as_str() {
            Some(s) => {
                let mut parts = s.splitn(2, '@');
                let local = parts.next().unwrap_or_default();
                let domain = parts.next().unwrap_or_default();
                if local.is_empty() || domain.is_empty() {
                    Some(format!("'{s}' is not an email address"))
                } else {
                    None
                }
            }
            None => Some("expected an email address".to_string()),
        },
    }
}

/// Parse a date-kind field out of a submitted map, ignoring values that are
/// absent or malformed (kind validation reports those separately).
fn parse_date_field(fields: &Map<String, Value>, key: &str) -> Option<NaiveDate> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_FIELDS: &[FieldSpec] = &[
        FieldSpec {
            key: "title",
            label: "Title",
            kind: FieldKind::Text,
            required: true,
        },
        FieldSpec {
            key: "severity",
            label: "Severity",
            kind: FieldKind::Select {
                options: &["low", "high"],
            },
            required: false,
        },
        FieldSpec {
            key: "occurred_at",
            label: "Occurred",
            kind: FieldKind::Date,
            required: true,
        },
        FieldSpec {
            key: "resolved_at",
            label: "Resolved",
            kind: FieldKind::Date,
            required: false,
        },
        FieldSpec {
            key: "contact",
            label: "Contact",
            kind: FieldKind::Email,
            required: false,
        },
    ];

    const TEST_SCHEMA: RecordSchema = RecordSchema {
        table: "test_records",
        title: "Test Records",
        fields: TEST_FIELDS,
        date_rules: &[("occurred_at", "resolved_at")],
    };

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn valid_submission_passes() {
        let f = fields(json!({
            "title": "Phishing mail",
            "severity": "high",
            "occurred_at": "2026-03-01",
            "resolved_at": "2026-03-04",
        }));
        assert!(TEST_SCHEMA.validate(&f).is_ok());
    }

    #[test]
    fn missing_required_field_is_keyed_by_name() {
        let f = fields(json!({ "occurred_at": "2026-03-01" }));
        let errors = TEST_SCHEMA.validate(&f).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingField { field } if field == "title")));
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let f = fields(json!({ "title": "   ", "occurred_at": "2026-03-01" }));
        let errors = TEST_SCHEMA.validate(&f).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "title");
    }

    #[test]
    fn all_failures_reported_at_once() {
        let f = fields(json!({
            "severity": "catastrophic",
            "occurred_at": "not-a-date",
        }));
        let errors = TEST_SCHEMA.validate(&f).unwrap_err();
        // Missing title, bad select option, bad date.
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn date_ordering_is_enforced_when_both_present() {
        let f = fields(json!({
            "title": "x",
            "occurred_at": "2026-03-10",
            "resolved_at": "2026-03-01",
        }));
        let errors = TEST_SCHEMA.validate(&f).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DateOrder { .. })));
    }

    #[test]
    fn unknown_keys_are_accepted() {
        let f = fields(json!({
            "title": "x",
            "occurred_at": "2026-03-01",
            "free_form_note": "kept as-is",
        }));
        assert!(TEST_SCHEMA.validate(&f).is_ok());
    }

    #[test]
    fn email_shape_is_checked() {
        let f = fields(json!({
            "title": "x",
            "occurred_at": "2026-03-01",
            "contact": "not-an-address",
        }));
        let errors = TEST_SCHEMA.validate(&f).unwrap_err();
        assert_eq!(errors[0].field(), "contact");
    }
}
