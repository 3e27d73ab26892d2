//! DuckDB dialect for drop generation.

use super::DropDialect;

/// DuckDB dialect.
///
/// DuckDB has sequences and schemas but rejects
/// `ALTER TABLE ... DROP CONSTRAINT`; constraints go away with their table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbDialect;

impl DuckDbDialect {
    /// Creates a new DuckDB dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DropDialect for DuckDbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn supports_drop_constraints(&self) -> bool {
        false
    }
}
