//! Dialect capabilities for drop generation.
//!
//! Different databases support different DDL: some cannot drop constraints
//! without recreating the table, some have no sequences, some have no
//! schemas at all. A dialect answers those capability questions and hands out
//! the exporters that render each kind of catalog object.

mod duckdb;
mod postgres;
mod sqlite;

pub use duckdb::DuckDbDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use std::fmt;
use std::sync::Arc;

use crate::auxiliary::AuxiliaryDatabaseObject;
use crate::catalog::{ForeignKey, Sequence, Table};
use crate::error::{DropError, Result};
use crate::exporter::{
    Exporter, StandardAuxiliaryObjectExporter, StandardForeignKeyExporter,
    StandardSequenceExporter, StandardTableExporter,
};

/// Names accepted by [`dialect_by_name`].
pub const DIALECT_NAMES: &[&str] = &["postgresql", "sqlite", "duckdb"];

/// Trait for database-specific drop capabilities.
pub trait DropDialect: fmt::Debug + Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns whether `ALTER TABLE ... DROP CONSTRAINT` is supported.
    fn supports_drop_constraints(&self) -> bool {
        true
    }

    /// Returns whether this dialect has sequences.
    fn supports_sequences(&self) -> bool {
        true
    }

    /// Returns whether `DROP TABLE IF EXISTS` is supported.
    fn supports_if_exists_before_table_name(&self) -> bool {
        true
    }

    /// Returns whether `DROP CONSTRAINT IF EXISTS` is supported.
    fn supports_if_exists_before_constraint_name(&self) -> bool {
        false
    }

    /// Returns whether `ALTER TABLE IF EXISTS` is supported.
    fn supports_if_exists_after_alter_table(&self) -> bool {
        false
    }

    /// Text appended to `DROP TABLE` to also drop dependent constraints.
    fn cascade_constraints(&self) -> &'static str {
        ""
    }

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        format!("{q}{name}{q}")
    }

    /// Generates the statements that drop a schema.
    fn drop_schema_command(&self, schema: &str) -> Vec<String> {
        vec![format!("DROP SCHEMA {schema}")]
    }

    /// Generates the statements that drop a sequence.
    fn drop_sequence_strings(&self, sequence: &str) -> Vec<String> {
        if !self.supports_sequences() {
            return Vec::new();
        }
        vec![format!("DROP SEQUENCE IF EXISTS {sequence}")]
    }

    /// Returns the exporter for tables.
    fn table_exporter(&self) -> &dyn Exporter<Table> {
        &StandardTableExporter
    }

    /// Returns the exporter for sequences.
    fn sequence_exporter(&self) -> &dyn Exporter<Sequence> {
        &StandardSequenceExporter
    }

    /// Returns the exporter for foreign keys.
    fn foreign_key_exporter(&self) -> &dyn Exporter<ForeignKey> {
        &StandardForeignKeyExporter
    }

    /// Returns the exporter for auxiliary objects.
    fn auxiliary_object_exporter(&self) -> &dyn Exporter<dyn AuxiliaryDatabaseObject> {
        &StandardAuxiliaryObjectExporter
    }
}

/// Looks up a built-in dialect by name.
pub fn dialect_by_name(name: &str) -> Result<Arc<dyn DropDialect>> {
    match name.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "pg" => Ok(Arc::new(PostgresDialect::new())),
        "sqlite" | "sqlite3" => Ok(Arc::new(SqliteDialect::new())),
        "duckdb" => Ok(Arc::new(DuckDbDialect::new())),
        _ => Err(DropError::UnknownDialect(name.to_string())),
    }
}
