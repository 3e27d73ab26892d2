//! Dependency-ordered schema drop scripts for Rust.
//!
//! `oxide-schema` turns an in-memory catalog (namespaces, tables, foreign
//! keys, sequences and auxiliary objects) into the sequence of DDL statements
//! that tears it down, and delivers that sequence to any number of targets:
//! - Foreign keys are dropped before any table, so no drop fails on a
//!   still-existing constraint
//! - Schemas are dropped last, after everything they contain
//! - The same object is never emitted twice
//! - SQL generation is dialect-aware (PostgreSQL, SQLite, DuckDB)
//!
//! # Architecture
//!
//! - **Catalog** - The in-memory model of a database
//! - **Dialect** - Capability flags and the exporters for each object kind
//! - **Exporter** - Renders one catalog object into drop statements
//! - **Target** - Consumes statements (memory, stdout, script file)
//! - **Dropper** - Orders the drops and fans them out to targets
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use oxide_schema::prelude::*;
//!
//! let database = Database::new(Arc::new(PostgresDialect::new())).namespace(
//!     Namespace::new(NamespaceName::schema("shop"))
//!         .table(Table::new("customers"))
//!         .table(Table::new("orders").foreign_key(ForeignKey::new(
//!             "fk_orders_customer",
//!             QualifiedName::new(&NamespaceName::schema("shop"), "customers"),
//!         )))
//!         .sequence(Sequence::new("order_seq")),
//! );
//!
//! let sql = SchemaDropper::new()
//!     .generate_drop_commands(&database, true, &PostgresDialect::new())
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     vec![
//!         "ALTER TABLE IF EXISTS shop.orders DROP CONSTRAINT IF EXISTS fk_orders_customer",
//!         "DROP TABLE IF EXISTS shop.customers CASCADE",
//!         "DROP TABLE IF EXISTS shop.orders CASCADE",
//!         "DROP SEQUENCE IF EXISTS shop.order_seq",
//!         "DROP SCHEMA shop",
//!     ]
//! );
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the drop script for a catalog
//! oxide-schema drop --catalog catalog.json --dialect postgresql --drop-schemas
//!
//! # Write it to a file instead
//! oxide-schema drop --catalog catalog.json --output drop.sql --quiet
//! ```

pub mod auxiliary;
pub mod catalog;
pub mod definition;
pub mod dialect;
pub mod dropper;
pub mod error;
pub mod export_identifiers;
pub mod exporter;
pub mod target;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::auxiliary::{AuxiliaryDatabaseObject, SimpleAuxiliaryDatabaseObject};
    pub use crate::catalog::{
        Database, ForeignKey, Identifier, Namespace, NamespaceName, QualifiedName, Sequence,
        Table, TableKind,
    };
    pub use crate::definition::CatalogDefinition;
    pub use crate::dialect::{
        DropDialect, DuckDbDialect, PostgresDialect, SqliteDialect, dialect_by_name,
    };
    pub use crate::dropper::{DialectSource, DropOptions, SchemaDropper};
    pub use crate::error::{DropError, Result};
    pub use crate::exporter::Exporter;
    pub use crate::target::{CollectingTarget, FileTarget, Target, WriterTarget};
}
