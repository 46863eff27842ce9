//! SQLite bootstrap for the `responses` table.
//!
//! The schema is a single table keyed by UUID text:
//! `responses(id, text, score, confidence)`, with `confidence` constrained to
//! `[0, 1]`. Newest-first order comes from SQLite's implicit `rowid`, so no
//! ordering column is stored.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the number of applied migrations.
//! - A file whose `user_version` is newer than this build is refused with
//!   [`DbError::UnsupportedSchemaVersion`] rather than read.
//! - Response rows are only touched after migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the response database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "response database is at schema version {db_version}; this build reads up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
