//! # Store Errors
//!
//! One error type for both backends. Database failures keep their SQLSTATE
//! code so the API layer can map the two constraint codes the add-record
//! form handles specially (23502, 23505) to friendlier messages.

use thiserror::Error;

/// Failure of a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record table is not in the schema catalog.
    #[error("unknown record table '{0}'")]
    UnknownTable(String),

    /// A database query failed. `sqlstate` is present for errors raised by
    /// Postgres itself (constraint violations and the like).
    #[error("database error: {message}")]
    Database {
        sqlstate: Option<String>,
        message: String,
    },

    /// Attachment blob I/O failed.
    #[error("attachment storage: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// The SQLSTATE code of a database failure, when known.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Database { sqlstate, .. } => sqlstate.as_deref(),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let sqlstate = match &err {
            sqlx::Error::Database(db) => db.code().map(|c| c.to_string()),
            _ => None,
        };
        Self::Database {
            sqlstate,
            message: err.to_string(),
        }
    }
}
