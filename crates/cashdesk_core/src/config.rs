//! Cash desk session configuration.

use std::path::PathBuf;

/// Where a cash desk session keeps its records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageLocation {
    /// Private database that lives until the session is disposed.
    #[default]
    InMemory,
    /// SQLite database file, created on first use.
    File(PathBuf),
}

/// Settings applied by `CashDesk::initialize`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashDeskConfig {
    pub storage: StorageLocation,
}

impl CashDeskConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageLocation::File(path.into()),
        }
    }
}
