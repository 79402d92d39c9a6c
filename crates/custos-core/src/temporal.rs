//! # Expiry-Status Derivation
//!
//! Date-based status flags for compliance documents, certificates, and
//! policy review dates. A document is *expired* strictly before today, and
//! *expiring soon* when it expires within the next [`EXPIRY_WARNING_DAYS`]
//! days. The two predicates are mutually exclusive by construction.
//!
//! All functions take the reference date explicitly so callers (and tests)
//! never depend on the wall clock; the API layer passes `Utc::now().date_naive()`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Documents expiring within this many days are flagged as expiring soon.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Derived expiry state of a dated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// The date is strictly in the past.
    Expired,
    /// The date falls within the next [`EXPIRY_WARNING_DAYS`] days. Today
    /// itself counts as 0 days remaining and is therefore `Current`.
    ExpiringSoon,
    /// Neither expired nor inside the warning window.
    Current,
}

/// Signed number of days from `today` until `date`. Negative when the date
/// has passed.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// True iff `date` is strictly before `today`.
pub fn is_expired(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// True iff `date` lies strictly after `today` but no more than
/// [`EXPIRY_WARNING_DAYS`] days out.
pub fn is_expiring_soon(date: NaiveDate, today: NaiveDate) -> bool {
    let days = days_until(date, today);
    days > 0 && days <= EXPIRY_WARNING_DAYS
}

/// Classify a date relative to `today`.
pub fn expiry_status(date: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    if is_expired(date, today) {
        ExpiryStatus::Expired
    } else if is_expiring_soon(date, today) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Current
    }
}
