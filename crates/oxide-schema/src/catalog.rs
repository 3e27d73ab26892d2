//! In-memory catalog model.
//!
//! These types describe the objects that exist in a database: namespaces,
//! tables, foreign keys and sequences. The catalog is built by the caller and
//! only read while drop statements are generated. Iteration order is always
//! insertion order; nothing here sorts.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auxiliary::AuxiliaryDatabaseObject;
use crate::dialect::DropDialect;

/// A database identifier, optionally quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Identifier text, without quote characters.
    pub text: String,
    /// Whether the identifier must be quoted when rendered.
    pub quoted: bool,
}

impl Identifier {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    /// Creates a quoted identifier.
    #[must_use]
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    /// Parses an identifier, treating text wrapped in backticks or double
    /// quotes as quoted.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        for quote in ['`', '"'] {
            if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
                return Self::quoted(&trimmed[1..trimmed.len() - 1]);
            }
        }
        Self::new(trimmed)
    }

    /// Renders the identifier for the given dialect.
    #[must_use]
    pub fn render(&self, dialect: &dyn DropDialect) -> String {
        if self.quoted {
            dialect.quote_identifier(&self.text)
        } else {
            self.text.clone()
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "`{}`", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

impl From<&str> for Identifier {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Identifier {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// The catalog and schema components that name a namespace.
///
/// Both parts are optional; a namespace without either is the database's
/// default namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NamespaceName {
    /// Catalog component.
    pub catalog: Option<Identifier>,
    /// Schema component.
    pub schema: Option<Identifier>,
}

impl NamespaceName {
    /// Creates a namespace name.
    #[must_use]
    pub const fn new(catalog: Option<Identifier>, schema: Option<Identifier>) -> Self {
        Self { catalog, schema }
    }

    /// Creates a namespace name with only a schema component.
    #[must_use]
    pub fn schema(schema: impl Into<Identifier>) -> Self {
        Self {
            catalog: None,
            schema: Some(schema.into()),
        }
    }
}

/// A possibly catalog/schema-qualified object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Catalog component.
    pub catalog: Option<Identifier>,
    /// Schema component.
    pub schema: Option<Identifier>,
    /// Object name.
    pub object: Identifier,
}

impl QualifiedName {
    /// Creates a name qualified by the given namespace.
    #[must_use]
    pub fn new(namespace: &NamespaceName, object: impl Into<Identifier>) -> Self {
        Self {
            catalog: namespace.catalog.clone(),
            schema: namespace.schema.clone(),
            object: object.into(),
        }
    }

    /// Creates an unqualified name.
    #[must_use]
    pub fn unqualified(object: impl Into<Identifier>) -> Self {
        Self {
            catalog: None,
            schema: None,
            object: object.into(),
        }
    }

    fn parts(&self) -> impl Iterator<Item = &Identifier> {
        self.catalog
            .iter()
            .chain(self.schema.iter())
            .chain(std::iter::once(&self.object))
    }

    /// Renders the dotted name for the given dialect.
    #[must_use]
    pub fn render(&self, dialect: &dyn DropDialect) -> String {
        self.parts()
            .map(|part| part.render(dialect))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.parts().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

/// What kind of relation a table entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// A table that physically exists in the database.
    #[default]
    Physical,
    /// A view; dropped by other means.
    View,
    /// A mapping onto a subselect; nothing exists in the database.
    Subselect,
}

/// A foreign key constraint owned by a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: Identifier,
    /// The table that owns the constraint.
    pub table: QualifiedName,
    /// The referenced table.
    pub referenced_table: QualifiedName,
    /// Referencing columns.
    pub columns: Vec<String>,
}

impl ForeignKey {
    /// Creates a foreign key referencing the given table.
    ///
    /// The owning table is filled in by [`Table::foreign_key`].
    #[must_use]
    pub fn new(name: impl Into<Identifier>, referenced_table: QualifiedName) -> Self {
        Self {
            name: name.into(),
            table: QualifiedName::unqualified(String::new()),
            referenced_table,
            columns: Vec::new(),
        }
    }

    /// Sets the referencing columns.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// A table, view or other relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Qualified table name.
    pub name: QualifiedName,
    /// Relation kind.
    pub kind: TableKind,
    /// Foreign keys owned by this table.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Creates a physical, unqualified table.
    #[must_use]
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: QualifiedName::unqualified(name),
            kind: TableKind::Physical,
            foreign_keys: Vec::new(),
        }
    }

    /// Sets the relation kind.
    #[must_use]
    pub fn kind(mut self, kind: TableKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds a foreign key, recording this table as its owner.
    #[must_use]
    pub fn foreign_key(mut self, mut fk: ForeignKey) -> Self {
        fk.table = self.name.clone();
        self.foreign_keys.push(fk);
        self
    }

    /// Returns whether the table physically exists in the database.
    #[must_use]
    pub fn is_physical_table(&self) -> bool {
        self.kind == TableKind::Physical
    }

    /// Returns the identifier used to detect duplicate exports.
    #[must_use]
    pub fn export_identifier(&self) -> String {
        self.name.to_string()
    }

    fn qualify(&mut self, namespace: &NamespaceName) {
        self.name.catalog = namespace.catalog.clone();
        self.name.schema = namespace.schema.clone();
        for fk in &mut self.foreign_keys {
            fk.table = self.name.clone();
        }
    }
}

/// A sequence generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// Qualified sequence name.
    pub name: QualifiedName,
}

impl Sequence {
    /// Creates an unqualified sequence.
    #[must_use]
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            name: QualifiedName::unqualified(name),
        }
    }

    /// Returns the identifier used to detect duplicate exports.
    #[must_use]
    pub fn export_identifier(&self) -> String {
        self.name.to_string()
    }
}

/// A catalog/schema container of tables and sequences.
///
/// Tables and sequences can only enter through [`Namespace::add_table`] and
/// [`Namespace::add_sequence`], so every contained name carries this
/// namespace's qualifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    name: NamespaceName,
    tables: Vec<Table>,
    sequences: Vec<Sequence>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new(name: NamespaceName) -> Self {
        Self {
            name,
            tables: Vec::new(),
            sequences: Vec::new(),
        }
    }

    /// Adds a table, qualifying its name with this namespace.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.add_table(table);
        self
    }

    /// Adds a sequence, qualifying its name with this namespace.
    #[must_use]
    pub fn sequence(mut self, sequence: Sequence) -> Self {
        self.add_sequence(sequence);
        self
    }

    /// Adds a table in place.
    pub fn add_table(&mut self, mut table: Table) {
        table.qualify(&self.name);
        self.tables.push(table);
    }

    /// Adds a sequence in place.
    pub fn add_sequence(&mut self, mut sequence: Sequence) {
        sequence.name.catalog = self.name.catalog.clone();
        sequence.name.schema = self.name.schema.clone();
        self.sequences.push(sequence);
    }

    /// Returns the namespace name.
    #[must_use]
    pub const fn name(&self) -> &NamespaceName {
        &self.name
    }

    /// Returns all tables in insertion order, including views.
    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Returns the sequences in insertion order.
    #[must_use]
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Returns the tables that physically exist in the database.
    pub fn physical_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(|t| t.is_physical_table())
    }

    /// Gets a table by its unqualified name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.object.text == name)
    }
}

/// The complete catalog of a database.
#[derive(Debug, Clone)]
pub struct Database {
    namespaces: Vec<Namespace>,
    auxiliary_objects: Vec<Arc<dyn AuxiliaryDatabaseObject>>,
    dialect: Arc<dyn DropDialect>,
}

impl Database {
    /// Creates an empty database whose default dialect is `dialect`.
    #[must_use]
    pub fn new(dialect: Arc<dyn DropDialect>) -> Self {
        Self {
            namespaces: Vec::new(),
            auxiliary_objects: Vec::new(),
            dialect,
        }
    }

    /// Adds a namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Adds an auxiliary database object.
    #[must_use]
    pub fn auxiliary_object(mut self, object: impl AuxiliaryDatabaseObject + 'static) -> Self {
        self.auxiliary_objects.push(Arc::new(object));
        self
    }

    /// Returns the namespaces in insertion order.
    #[must_use]
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Returns the auxiliary objects in insertion order.
    pub fn auxiliary_objects(
        &self,
    ) -> impl Iterator<Item = &(dyn AuxiliaryDatabaseObject + 'static)> {
        self.auxiliary_objects.iter().map(Arc::as_ref)
    }

    /// Returns the default dialect of this database.
    #[must_use]
    pub fn dialect(&self) -> &dyn DropDialect {
        self.dialect.as_ref()
    }

    /// Returns every physical table across all namespaces.
    pub fn physical_tables(&self) -> impl Iterator<Item = &Table> {
        self.namespaces.iter().flat_map(Namespace::physical_tables)
    }
}
