//! Duplicate export detection.

use std::collections::HashSet;

use crate::error::{DropError, Result};

/// Export identifiers already seen during one drop run.
#[derive(Debug)]
pub struct ExportIdentifiers {
    seen: HashSet<String>,
}

impl ExportIdentifiers {
    /// Creates an empty identifier set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: HashSet::with_capacity(50),
        }
    }

    /// Records an identifier, failing if it was already recorded.
    pub fn observe(&mut self, identifier: impl Into<String>) -> Result<()> {
        let identifier = identifier.into();
        if self.seen.contains(&identifier) {
            return Err(DropError::DuplicateExport(identifier));
        }
        self.seen.insert(identifier);
        Ok(())
    }

    /// Returns the number of identifiers recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for ExportIdentifiers {
    fn default() -> Self {
        Self::new()
    }
}
