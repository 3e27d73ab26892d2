//! Schema drop orchestration.
//!
//! [`SchemaDropper`] walks a [`Database`] and emits the statements that tear
//! it down, in an order that never drops an object while something still
//! depends on it:
//!
//! 1. auxiliary objects flagged to go before the tables
//! 2. foreign keys of every physical table in every namespace
//! 3. per namespace, physical tables then sequences
//! 4. the remaining auxiliary objects
//! 5. schemas, when requested
//!
//! Within a phase, objects are visited in catalog insertion order.

use tracing::{debug, info};

use crate::catalog::Database;
use crate::dialect::DropDialect;
use crate::error::Result;
use crate::export_identifiers::ExportIdentifiers;
use crate::target::{CollectingTarget, Target, TargetSet, combine};

/// Which dialect renders the auxiliary objects dropped after the tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialectSource {
    /// The dialect passed to the drop call.
    #[default]
    Explicit,
    /// The database's own default dialect, whatever was passed to the call.
    CatalogDefault,
}

/// Options controlling a drop run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropOptions {
    /// Dialect used to render post-table auxiliary drops.
    pub auxiliary_dialect: DialectSource,
}

/// Generates drop scripts for a catalog.
#[derive(Debug, Clone, Default)]
pub struct SchemaDropper {
    options: DropOptions,
}

impl SchemaDropper {
    /// Creates a dropper with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dropper with the given options.
    #[must_use]
    pub const fn with_options(options: DropOptions) -> Self {
        Self { options }
    }

    /// Sets the dialect used for post-table auxiliary drops.
    #[must_use]
    pub fn auxiliary_dialect(mut self, source: DialectSource) -> Self {
        self.options.auxiliary_dialect = source;
        self
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &DropOptions {
        &self.options
    }

    /// Generates the drop statements for `database` and returns them.
    pub fn generate_drop_commands(
        &self,
        database: &Database,
        drop_schemas: bool,
        dialect: &dyn DropDialect,
    ) -> Result<Vec<String>> {
        let mut collector = CollectingTarget::new();
        {
            let mut targets: [&mut dyn Target; 1] = [&mut collector];
            self.drop_with_dialect(database, drop_schemas, dialect, &mut targets)?;
        }
        Ok(collector.into_statements())
    }

    /// Drops `database` using its default dialect.
    pub fn drop(
        &self,
        database: &Database,
        drop_schemas: bool,
        targets: &mut [&mut dyn Target],
    ) -> Result<()> {
        self.drop_with_dialect(database, drop_schemas, database.dialect(), targets)
    }

    /// Drops `database` using `dialect`, delivering every statement to every
    /// target.
    ///
    /// Targets are released whether or not generation succeeds. When both
    /// generation and release fail, the generation error comes first in a
    /// [`DropError::Multiple`](crate::error::DropError::Multiple).
    pub fn drop_with_dialect(
        &self,
        database: &Database,
        drop_schemas: bool,
        dialect: &dyn DropDialect,
        targets: &mut [&mut dyn Target],
    ) -> Result<()> {
        info!(
            dialect = dialect.name(),
            namespaces = database.namespaces().len(),
            targets = targets.len(),
            drop_schemas,
            "Generating drop script"
        );

        let mut targets = TargetSet::new(targets);
        targets.prepare_all()?;

        let outcome = self.emit(database, drop_schemas, dialect, &mut targets);
        let released = targets.release_all();

        match outcome {
            Ok(emitted) => {
                released?;
                info!(statements = emitted, "Drop script generated");
                Ok(())
            }
            Err(err) => Err(combine(err, released)),
        }
    }

    fn emit(
        &self,
        database: &Database,
        drop_schemas: bool,
        dialect: &dyn DropDialect,
        targets: &mut TargetSet<'_, '_>,
    ) -> Result<usize> {
        let mut identifiers = ExportIdentifiers::new();
        let mut emitted = 0;

        // Init commands are irrelevant for dropping.

        for object in database.auxiliary_objects() {
            if !object.applies_before_tables() {
                continue;
            }
            if !object.applies_to_dialect(dialect) {
                debug!(
                    object = %object.export_identifier(),
                    dialect = dialect.name(),
                    "Auxiliary object does not apply to dialect, skipping"
                );
                continue;
            }
            let statements = dialect
                .auxiliary_object_exporter()
                .drop_statements(object, database, dialect);
            emitted += apply(targets, &statements)?;
        }

        // Every constraint goes before any table, across all namespaces.
        if dialect.supports_drop_constraints() {
            for table in database.physical_tables() {
                for fk in &table.foreign_keys {
                    let statements = dialect
                        .foreign_key_exporter()
                        .drop_statements(fk, database, dialect);
                    emitted += apply(targets, &statements)?;
                }
            }
        } else {
            debug!(
                dialect = dialect.name(),
                "Dialect cannot drop constraints, skipping foreign keys"
            );
        }

        for namespace in database.namespaces() {
            for table in namespace.physical_tables() {
                identifiers.observe(table.export_identifier())?;
                let statements = dialect
                    .table_exporter()
                    .drop_statements(table, database, dialect);
                emitted += apply(targets, &statements)?;
            }

            for sequence in namespace.sequences() {
                identifiers.observe(sequence.export_identifier())?;
                let statements = dialect
                    .sequence_exporter()
                    .drop_statements(sequence, database, dialect);
                emitted += apply(targets, &statements)?;
            }
        }

        let auxiliary_dialect = match self.options.auxiliary_dialect {
            DialectSource::Explicit => dialect,
            DialectSource::CatalogDefault => database.dialect(),
        };
        for object in database.auxiliary_objects() {
            if object.applies_before_tables() {
                continue;
            }
            if !object.applies_to_dialect(dialect) {
                debug!(
                    object = %object.export_identifier(),
                    dialect = dialect.name(),
                    "Auxiliary object does not apply to dialect, skipping"
                );
                continue;
            }
            emitted += apply(targets, &object.drop_statements(auxiliary_dialect))?;
        }

        if drop_schemas {
            for namespace in database.namespaces() {
                let Some(schema) = &namespace.name().schema else {
                    continue;
                };
                let statements = dialect.drop_schema_command(&schema.render(dialect));
                emitted += apply(targets, &statements)?;
            }
        }

        Ok(emitted)
    }
}

fn apply(targets: &mut TargetSet<'_, '_>, statements: &[String]) -> Result<usize> {
    targets.broadcast_all(statements)?;
    Ok(statements.len())
}
