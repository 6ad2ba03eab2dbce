//! SQLite storage bootstrap for outline persistence.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the outline store.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No outline rows are read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating the outline store.
#[derive(Debug)]
pub enum DbError {
    /// The store could not be opened at `location` (a file path or `:memory:`).
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// A statement against an already open store failed.
    Query(rusqlite::Error),
    /// Migration script `version` failed and its transaction was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// Database was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open outline store at {location}: {source}")
            }
            Self::Query(err) => write!(f, "outline store query failed: {err}"),
            Self::Migration { version, source } => {
                write!(f, "outline store migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "outline store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Query(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}
