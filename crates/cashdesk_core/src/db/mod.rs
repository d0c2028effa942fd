//! SQLite storage bootstrap for the cash desk.
//!
//! # Responsibility
//! - Open and configure SQLite connections for a desk session.
//! - Bring the member/membership/deposit schema up to date.
//!
//! # Invariants
//! - Foreign keys are enabled so member deletion cascades to memberships
//!   and deposits.
//! - A failed schema step names itself and leaves the schema version
//!   unchanged.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    /// Connecting or configuring the connection failed.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer cash desk build.
    SchemaTooNew { found: u32, supported: u32 },
    /// One schema step could not be applied.
    SchemaStepFailed {
        version: u32,
        step: &'static str,
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Stable `error_code` used in `db_open` log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite",
            Self::SchemaTooNew { .. } => "schema_too_new",
            Self::SchemaStepFailed { .. } => "schema_step_failed",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "cash desk schema version {found} is newer than supported {supported}"
            ),
            Self::SchemaStepFailed {
                version,
                step,
                source,
            } => write!(f, "schema step {version} `{step}` failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::SchemaStepFailed { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
