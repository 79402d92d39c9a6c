//! # Dashboard Metric Aggregation
//!
//! Pure, single-pass aggregation over already-fetched record lists. The API
//! layer fetches the rows; everything here is arithmetic with no I/O and no
//! division-by-zero panics — empty inputs produce zero-valued cards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::temporal::is_expired;

/// The supplier fields that feed the compliance-rate card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierCompliance {
    pub iso27001_certified: bool,
    pub data_protection_compliant: bool,
}

/// Percentage of suppliers holding both an ISO 27001 certificate and a data
/// protection compliance confirmation, rounded to the nearest integer.
/// Returns 0 for an empty list.
pub fn compliance_rate(suppliers: &[SupplierCompliance]) -> u32 {
    if suppliers.is_empty() {
        return 0;
    }
    let compliant = suppliers
        .iter()
        .filter(|s| s.iso27001_certified && s.data_protection_compliant)
        .count();
    ((100.0 * compliant as f64) / suppliers.len() as f64).round() as u32
}

/// Review status stored on a compliance document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Compliant,
    UnderReview,
    NeedsUpdate,
}

/// A compliance document's status together with its optional expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentState {
    pub status: DocumentStatus,
    pub expiry_date: Option<NaiveDate>,
}

/// Counter values for the document summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentCounters {
    pub total: usize,
    pub compliant: usize,
    pub under_review: usize,
    /// Documents whose status is `NeedsUpdate` *or* whose expiry date has
    /// passed. A document that is both is counted once.
    pub needs_update: usize,
}

/// Aggregate document statuses in one pass.
///
/// A document labeled `Compliant` but already expired still needs an update,
/// so it counts toward `needs_update` and not toward `compliant`.
pub fn document_counters(docs: &[DocumentState], today: NaiveDate) -> DocumentCounters {
    let mut counters = DocumentCounters {
        total: docs.len(),
        ..DocumentCounters::default()
    };
    for doc in docs {
        let expired = doc.expiry_date.is_some_and(|d| is_expired(d, today));
        if doc.status == DocumentStatus::NeedsUpdate || expired {
            counters.needs_update += 1;
        } else {
            match doc.status {
                DocumentStatus::Compliant => counters.compliant += 1,
                DocumentStatus::UnderReview => counters.under_review += 1,
                DocumentStatus::NeedsUpdate => unreachable!("handled above"),
            }
        }
    }
    counters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn supplier(iso: bool, dp: bool) -> SupplierCompliance {
        SupplierCompliance {
            iso27001_certified: iso,
            data_protection_compliant: dp,
        }
    }

    #[test]
    fn compliance_rate_empty_list_is_zero() {
        assert_eq!(compliance_rate(&[]), 0);
    }

    #[test]
    fn compliance_rate_requires_both_flags() {
        let suppliers = [
            supplier(true, true),
            supplier(true, false),
            supplier(false, true),
        ];
        // 1 of 3 → 33.3% → rounds to 33.
        assert_eq!(compliance_rate(&suppliers), 33);
    }

    #[test]
    fn compliance_rate_rounds_to_nearest() {
        // 2 of 3 → 66.7% → rounds to 67.
        let suppliers = [supplier(true, true), supplier(true, true), supplier(false, false)];
        assert_eq!(compliance_rate(&suppliers), 67);
    }

    #[test]
    fn expired_but_compliant_document_is_not_double_counted() {
        let today = d("2026-08-24");
        let docs = [
            DocumentState {
                status: DocumentStatus::Compliant,
                expiry_date: Some(d("2027-01-01")),
            },
            DocumentState {
                status: DocumentStatus::UnderReview,
                expiry_date: None,
            },
            DocumentState {
                status: DocumentStatus::NeedsUpdate,
                expiry_date: None,
            },
            // Labeled Compliant but expired: counts once, under needs_update.
            DocumentState {
                status: DocumentStatus::Compliant,
                expiry_date: Some(d("2026-01-01")),
            },
        ];
        let counters = document_counters(&docs, today);
        assert_eq!(counters.total, 4);
        assert_eq!(counters.compliant, 1);
        assert_eq!(counters.under_review, 1);
        assert_eq!(counters.needs_update, 2);
        assert_eq!(
            counters.compliant + counters.under_review + counters.needs_update,
            counters.total
        );
    }

    #[test]
    fn expired_needs_update_document_counts_once() {
        let today = d("2026-08-24");
        let docs = [DocumentState {
            status: DocumentStatus::NeedsUpdate,
            expiry_date: Some(d("2020-01-01")),
        }];
        let counters = document_counters(&docs, today);
        assert_eq!(counters.needs_update, 1);
        assert_eq!(counters.total, 1);
    }
}
