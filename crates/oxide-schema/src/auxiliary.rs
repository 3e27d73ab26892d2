//! Auxiliary database objects.
//!
//! Auxiliary objects are free-standing, dialect-conditional objects that live
//! outside the table/sequence/constraint model, such as triggers or stored
//! functions.

use std::fmt;

use crate::dialect::DropDialect;

/// A free-standing object dropped alongside the schema.
pub trait AuxiliaryDatabaseObject: fmt::Debug + Send + Sync {
    /// Returns the identifier of this object.
    fn export_identifier(&self) -> String;

    /// Returns whether this object is dropped before the tables are.
    fn applies_before_tables(&self) -> bool {
        false
    }

    /// Returns whether this object exists for the given dialect.
    fn applies_to_dialect(&self, dialect: &dyn DropDialect) -> bool;

    /// Returns the statements that drop this object.
    fn drop_statements(&self, dialect: &dyn DropDialect) -> Vec<String>;
}

/// An auxiliary object with fixed drop statements.
///
/// The object applies to every dialect unless it is scoped to a set of
/// dialect names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleAuxiliaryDatabaseObject {
    name: String,
    before_tables: bool,
    dialect_scopes: Vec<String>,
    drop_strings: Vec<String>,
}

impl SimpleAuxiliaryDatabaseObject {
    /// Creates an auxiliary object with the given drop statements.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, drop_strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            before_tables: false,
            dialect_scopes: Vec::new(),
            drop_strings: drop_strings.into_iter().map(Into::into).collect(),
        }
    }

    /// Marks the object to be dropped before the tables.
    #[must_use]
    pub fn before_tables(mut self) -> Self {
        self.before_tables = true;
        self
    }

    /// Restricts the object to a dialect, by name.
    #[must_use]
    pub fn dialect_scope(mut self, dialect: impl Into<String>) -> Self {
        self.dialect_scopes.push(dialect.into());
        self
    }
}

impl AuxiliaryDatabaseObject for SimpleAuxiliaryDatabaseObject {
    fn export_identifier(&self) -> String {
        self.name.clone()
    }

    fn applies_before_tables(&self) -> bool {
        self.before_tables
    }

    fn applies_to_dialect(&self, dialect: &dyn DropDialect) -> bool {
        self.dialect_scopes.is_empty()
            || self
                .dialect_scopes
                .iter()
                .any(|scope| scope.eq_ignore_ascii_case(dialect.name()))
    }

    fn drop_statements(&self, _dialect: &dyn DropDialect) -> Vec<String> {
        self.drop_strings.clone()
    }
}
