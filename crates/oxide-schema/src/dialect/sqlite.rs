//! SQLite dialect for drop generation.
//!
//! SQLite cannot drop a constraint without recreating its table, has no
//! sequences, and attaches databases instead of creating schemas. Foreign
//! keys disappear with their tables.

use super::DropDialect;

/// SQLite dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DropDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn supports_drop_constraints(&self) -> bool {
        false
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn drop_schema_command(&self, _schema: &str) -> Vec<String> {
        Vec::new()
    }
}
