//! Serializable catalog definitions.
//!
//! A catalog definition is a plain JSON document describing namespaces,
//! tables, foreign keys, sequences and auxiliary objects. It is turned into a
//! [`Database`] for a chosen dialect.
//!
//! ```json
//! {
//!   "namespaces": [
//!     {
//!       "schema": "sales",
//!       "tables": [
//!         { "name": "customers" },
//!         {
//!           "name": "orders",
//!           "foreign_keys": [
//!             { "name": "fk_customer", "references": "customers", "columns": ["customer_id"] }
//!           ]
//!         }
//!       ],
//!       "sequences": ["order_seq"]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auxiliary::SimpleAuxiliaryDatabaseObject;
use crate::catalog::{
    Database, ForeignKey, Identifier, Namespace, NamespaceName, QualifiedName, Sequence, Table,
    TableKind,
};
use crate::dialect::DropDialect;
use crate::error::{DropError, Result};

/// Top-level catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDefinition {
    /// Namespaces, in drop order.
    #[serde(default)]
    pub namespaces: Vec<NamespaceDefinition>,
    /// Auxiliary objects, in drop order.
    #[serde(default)]
    pub auxiliary_objects: Vec<AuxiliaryObjectDefinition>,
}

/// A namespace entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceDefinition {
    /// Catalog component.
    #[serde(default)]
    pub catalog: Option<String>,
    /// Schema component.
    #[serde(default)]
    pub schema: Option<String>,
    /// Tables.
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
    /// Sequence names.
    #[serde(default)]
    pub sequences: Vec<String>,
}

/// A table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    /// Table name.
    pub name: String,
    /// Relation kind; defaults to a physical table.
    #[serde(default)]
    pub kind: TableKind,
    /// Foreign keys owned by the table.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDefinition>,
}

/// A foreign key entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeyDefinition {
    /// Constraint name.
    pub name: String,
    /// Referenced table: `table` (same namespace), `schema.table` or
    /// `catalog.schema.table`. Dots inside quotes belong to the name.
    pub references: String,
    /// Referencing columns.
    #[serde(default)]
    pub columns: Vec<String>,
}

/// An auxiliary object entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuxiliaryObjectDefinition {
    /// Object name.
    pub name: String,
    /// Whether the object is dropped before the tables.
    #[serde(default)]
    pub before_tables: bool,
    /// Dialect names the object applies to; empty means all.
    #[serde(default)]
    pub dialects: Vec<String>,
    /// Drop statements.
    pub drop: Vec<String>,
}

impl CatalogDefinition {
    /// Parses a catalog definition from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a catalog definition from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Builds a database whose default dialect is `dialect`.
    ///
    /// Empty names, including an empty quoted name, are rejected.
    pub fn into_database(self, dialect: Arc<dyn DropDialect>) -> Result<Database> {
        let mut database = Database::new(dialect);

        for ns_def in self.namespaces {
            let name = NamespaceName::new(
                ns_def
                    .catalog
                    .as_deref()
                    .map(|c| identifier("catalog", c))
                    .transpose()?,
                ns_def
                    .schema
                    .as_deref()
                    .map(|s| identifier("schema", s))
                    .transpose()?,
            );
            let mut namespace = Namespace::new(name);

            for table_def in &ns_def.tables {
                let mut table =
                    Table::new(identifier("table", &table_def.name)?).kind(table_def.kind);
                for fk_def in &table_def.foreign_keys {
                    let referenced =
                        resolve_reference(namespace.name(), &ns_def, &fk_def.references)?;
                    table = table.foreign_key(
                        ForeignKey::new(identifier("foreign key", &fk_def.name)?, referenced)
                            .columns(fk_def.columns.iter().cloned()),
                    );
                }
                namespace.add_table(table);
            }

            for sequence in &ns_def.sequences {
                namespace.add_sequence(Sequence::new(identifier("sequence", sequence)?));
            }

            database = database.namespace(namespace);
        }

        for aux_def in self.auxiliary_objects {
            if aux_def.name.trim().is_empty() {
                return Err(DropError::InvalidCatalog(
                    "auxiliary object name is empty".to_string(),
                ));
            }
            let mut object = SimpleAuxiliaryDatabaseObject::new(aux_def.name, aux_def.drop);
            if aux_def.before_tables {
                object = object.before_tables();
            }
            for dialect in aux_def.dialects {
                object = object.dialect_scope(dialect);
            }
            database = database.auxiliary_object(object);
        }

        Ok(database)
    }
}

fn identifier(kind: &str, text: &str) -> Result<Identifier> {
    let ident = Identifier::parse(text);
    if ident.text.trim().is_empty() {
        return Err(DropError::InvalidCatalog(format!("{kind} name is empty")));
    }
    Ok(ident)
}

/// Splits a dotted reference on the dots that sit outside quotes.
fn split_reference(reference: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut quote = None;
    let mut start = 0;

    for (i, c) in reference.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '`') => quote = Some(c),
            (None, '.') => {
                parts.push(&reference[start..i]);
                start = i + 1;
            }
            (None, _) => {}
        }
    }
    if quote.is_some() {
        return Err(DropError::InvalidCatalog(format!(
            "unterminated quote in reference '{reference}'"
        )));
    }
    parts.push(&reference[start..]);
    Ok(parts)
}

fn resolve_reference(
    namespace: &NamespaceName,
    ns_def: &NamespaceDefinition,
    reference: &str,
) -> Result<QualifiedName> {
    let parts = split_reference(reference)?;
    let (catalog, schema, table) = match parts.as_slice() {
        [table] => {
            let target = identifier("referenced table", table)?;
            let known = ns_def
                .tables
                .iter()
                .any(|t| Identifier::parse(&t.name) == target);
            if !known {
                return Err(DropError::InvalidCatalog(format!(
                    "foreign key references unknown table '{}'",
                    reference
                )));
            }
            return Ok(QualifiedName::new(namespace, target));
        }
        [schema, table] => (namespace.catalog.clone(), *schema, *table),
        [catalog, schema, table] => (Some(identifier("catalog", catalog)?), *schema, *table),
        _ => {
            return Err(DropError::InvalidCatalog(format!(
                "reference '{}' has too many parts",
                reference
            )));
        }
    };

    Ok(QualifiedName::new(
        &NamespaceName::new(catalog, Some(identifier("schema", schema)?)),
        identifier("referenced table", table)?,
    ))
}
