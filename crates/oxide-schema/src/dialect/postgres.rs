//! PostgreSQL dialect for drop generation.

use super::DropDialect;

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DropDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn supports_if_exists_before_constraint_name(&self) -> bool {
        true
    }

    fn supports_if_exists_after_alter_table(&self) -> bool {
        true
    }

    fn cascade_constraints(&self) -> &'static str {
        " CASCADE"
    }
}
