//! # Vendor Client Errors
//!
//! One error per failure mode, each carrying enough diagnostic context to
//! render the dashboard's dismissible banner: the operation, the HTTP
//! status where applicable, and an excerpt of the response body.

use thiserror::Error;

/// Failure of a vendor API call.
#[derive(Debug, Error)]
pub enum SentinelError {
    /// The client was built without a usable configuration.
    #[error("sentinel client not configured: {reason}")]
    NotConfigured { reason: String },

    /// The request did not complete within the per-request timeout.
    #[error("sentinel API timed out during {operation}")]
    Timeout { operation: &'static str },

    /// The vendor could not be reached at all.
    #[error("sentinel API unreachable during {operation}: {reason}")]
    Unreachable {
        operation: &'static str,
        reason: String,
    },

    /// The vendor answered with an error status.
    #[error("sentinel API {operation} failed: HTTP {status} — {body_excerpt}")]
    Api {
        operation: &'static str,
        status: u16,
        body_excerpt: String,
    },

    /// The response body did not match the expected shape.
    #[error("sentinel API {operation} returned an unexpected response: {reason}")]
    Decode {
        operation: &'static str,
        reason: String,
    },
}

/// Clip a response body to a loggable excerpt.
pub(crate) fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &body[..cut])
    }
}
