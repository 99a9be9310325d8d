//! Nullable directory: fixed entries instead of fetched documents.

use fleet_directory::{DirectoryAdapter, DirectoryError};
use fleet_types::DirectoryEntry;

/// A directory that returns pre-configured entries.
pub struct NullDirectory {
    entries: Vec<DirectoryEntry>,
    fail: bool,
}

impl NullDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self {
            entries,
            fail: false,
        }
    }

    /// A directory whose documents can never be fetched.
    pub fn unavailable() -> Self {
        Self {
            entries: Vec::new(),
            fail: true,
        }
    }
}

impl DirectoryAdapter for NullDirectory {
    async fn entries(&self) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        if self.fail {
            return Err(DirectoryError::Fetch {
                url: "null://directory".to_string(),
                reason: "unavailable".to_string(),
            });
        }
        Ok(self.entries.clone())
    }
}
