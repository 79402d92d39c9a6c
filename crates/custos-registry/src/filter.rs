//! # In-Memory Row Filtering
//!
//! The dashboard fetches all rows for a table and derives filtered subsets
//! client-side; the API keeps that shape as a single synchronous pass over
//! the fetched list. A [`RowFilter`] combines an optional case-insensitive
//! text search (over the schema's text-like fields) with equality filters on
//! select and flag fields.

use serde_json::{Map, Value};

use crate::schema::{FieldKind, RecordSchema};

/// Parsed filter parameters for one list request.
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    /// Case-insensitive substring search across text, long-text, and email
    /// fields.
    pub q: Option<String>,
    /// Exact-match constraints, keyed by field name. Flag fields match
    /// against `"true"` / `"false"`.
    pub equals: Vec<(String, String)>,
}

impl RowFilter {
    /// True when the filter constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.q.is_none() && self.equals.is_empty()
    }

    /// Does a row's field map satisfy this filter under the given schema?
    pub fn matches(&self, schema: &RecordSchema, fields: &Map<String, Value>) -> bool {
        if let Some(q) = &self.q {
            let needle = q.to_lowercase();
            let hit = schema.fields.iter().any(|spec| {
                matches!(
                    spec.kind,
                    FieldKind::Text | FieldKind::LongText | FieldKind::Email
                ) && fields
                    .get(spec.key)
                    .and_then(Value::as_str)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            });
            if !hit {
                return false;
            }
        }

        for (key, expected) in &self.equals {
            let matched = match fields.get(key) {
                Some(Value::String(s)) => s == expected,
                Some(Value::Bool(b)) => b.to_string() == *expected,
                Some(Value::Number(n)) => n.to_string() == *expected,
                _ => false,
            };
            if !matched {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema_for;
    use serde_json::json;

    fn supplier_fields(name: &str, country: &str, certified: bool) -> Map<String, Value> {
        json!({
            "name": name,
            "country": country,
            "iso27001_certified": certified,
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let schema = schema_for("suppliers").unwrap();
        let filter = RowFilter::default();
        assert!(filter.matches(schema, &supplier_fields("Acme", "SI", true)));
    }

    #[test]
    fn search_is_case_insensitive_and_scans_text_fields() {
        let schema = schema_for("suppliers").unwrap();
        let filter = RowFilter {
            q: Some("acme".into()),
            equals: vec![],
        };
        assert!(filter.matches(schema, &supplier_fields("ACME d.o.o.", "SI", true)));
        assert!(!filter.matches(schema, &supplier_fields("Globex", "SI", true)));
    }

    #[test]
    fn equality_filter_on_flag_field() {
        let schema = schema_for("suppliers").unwrap();
        let filter = RowFilter {
            q: None,
            equals: vec![("iso27001_certified".into(), "true".into())],
        };
        assert!(filter.matches(schema, &supplier_fields("Acme", "SI", true)));
        assert!(!filter.matches(schema, &supplier_fields("Acme", "SI", false)));
    }

    #[test]
    fn search_and_equality_combine_conjunctively() {
        let schema = schema_for("suppliers").unwrap();
        let filter = RowFilter {
            q: Some("acme".into()),
            equals: vec![("country".into(), "SI".into())],
        };
        assert!(filter.matches(schema, &supplier_fields("Acme", "SI", false)));
        assert!(!filter.matches(schema, &supplier_fields("Acme", "DE", false)));
    }
}
