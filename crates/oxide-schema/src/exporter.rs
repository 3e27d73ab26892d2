//! Exporters turn a single catalog object into drop statements.
//!
//! A dialect hands out one exporter per object kind. The standard exporters
//! below are driven entirely by the dialect's capability flags, so most
//! dialects never need their own.

use crate::auxiliary::AuxiliaryDatabaseObject;
use crate::catalog::{Database, ForeignKey, Sequence, Table};
use crate::dialect::DropDialect;

/// Renders the drop statements for one kind of catalog object.
pub trait Exporter<T: ?Sized> {
    /// Returns the statements that drop `object`, possibly none.
    fn drop_statements(&self, object: &T, database: &Database, dialect: &dyn DropDialect)
    -> Vec<String>;
}

/// `DROP TABLE [IF EXISTS] <name>[ CASCADE]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTableExporter;

impl Exporter<Table> for StandardTableExporter {
    fn drop_statements(
        &self,
        table: &Table,
        _database: &Database,
        dialect: &dyn DropDialect,
    ) -> Vec<String> {
        let mut sql = String::from("DROP TABLE ");
        if dialect.supports_if_exists_before_table_name() {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&table.name.render(dialect));
        sql.push_str(dialect.cascade_constraints());
        vec![sql]
    }
}

/// Delegates to [`DropDialect::drop_sequence_strings`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSequenceExporter;

impl Exporter<Sequence> for StandardSequenceExporter {
    fn drop_statements(
        &self,
        sequence: &Sequence,
        _database: &Database,
        dialect: &dyn DropDialect,
    ) -> Vec<String> {
        dialect.drop_sequence_strings(&sequence.name.render(dialect))
    }
}

/// `ALTER TABLE [IF EXISTS] <owner> DROP CONSTRAINT [IF EXISTS] <name>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardForeignKeyExporter;

impl Exporter<ForeignKey> for StandardForeignKeyExporter {
    fn drop_statements(
        &self,
        fk: &ForeignKey,
        _database: &Database,
        dialect: &dyn DropDialect,
    ) -> Vec<String> {
        if !dialect.supports_drop_constraints() {
            return Vec::new();
        }

        let mut sql = String::from("ALTER TABLE ");
        if dialect.supports_if_exists_after_alter_table() {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&fk.table.render(dialect));
        sql.push_str(" DROP CONSTRAINT ");
        if dialect.supports_if_exists_before_constraint_name() {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&fk.name.render(dialect));
        vec![sql]
    }
}

/// Delegates to [`AuxiliaryDatabaseObject::drop_statements`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAuxiliaryObjectExporter;

impl Exporter<dyn AuxiliaryDatabaseObject> for StandardAuxiliaryObjectExporter {
    fn drop_statements(
        &self,
        object: &(dyn AuxiliaryDatabaseObject + 'static),
        _database: &Database,
        dialect: &dyn DropDialect,
    ) -> Vec<String> {
        object.drop_statements(dialect)
    }
}
