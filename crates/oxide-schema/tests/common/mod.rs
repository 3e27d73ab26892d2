#![allow(dead_code)]

use oxide_schema::auxiliary::AuxiliaryDatabaseObject;
use oxide_schema::catalog::{Database, ForeignKey, Sequence, Table};
use oxide_schema::dialect::DropDialect;
use oxide_schema::error::{DropError, Result};
use oxide_schema::exporter::Exporter;
use oxide_schema::target::Target;

/// A dialect that renders bare, unqualified statements so tests can assert
/// exact sequences.
#[derive(Debug, Clone, Copy)]
pub struct TestDialect {
    name: &'static str,
    drop_constraints: bool,
}

impl TestDialect {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            drop_constraints: true,
        }
    }

    pub fn without_constraint_drops(mut self) -> Self {
        self.drop_constraints = false;
        self
    }
}

struct PlainTableExporter;

impl Exporter<Table> for PlainTableExporter {
    fn drop_statements(&self, table: &Table, _: &Database, _: &dyn DropDialect) -> Vec<String> {
        vec![format!("DROP TABLE {}", table.name.object)]
    }
}

struct PlainSequenceExporter;

impl Exporter<Sequence> for PlainSequenceExporter {
    fn drop_statements(&self, seq: &Sequence, _: &Database, _: &dyn DropDialect) -> Vec<String> {
        vec![format!("DROP SEQUENCE {}", seq.name.object)]
    }
}

struct PlainForeignKeyExporter;

impl Exporter<ForeignKey> for PlainForeignKeyExporter {
    fn drop_statements(&self, fk: &ForeignKey, _: &Database, _: &dyn DropDialect) -> Vec<String> {
        vec![format!("DROP {}", fk.name)]
    }
}

impl DropDialect for TestDialect {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports_drop_constraints(&self) -> bool {
        self.drop_constraints
    }

    fn table_exporter(&self) -> &dyn Exporter<Table> {
        &PlainTableExporter
    }

    fn sequence_exporter(&self) -> &dyn Exporter<Sequence> {
        &PlainSequenceExporter
    }

    fn foreign_key_exporter(&self) -> &dyn Exporter<ForeignKey> {
        &PlainForeignKeyExporter
    }
}

/// An auxiliary object whose drop statement names the dialect rendering it.
#[derive(Debug, Clone)]
pub struct TaggedObject {
    pub name: &'static str,
    pub before_tables: bool,
    pub dialects: Vec<&'static str>,
}

impl TaggedObject {
    pub fn before(name: &'static str) -> Self {
        Self {
            name,
            before_tables: true,
            dialects: Vec::new(),
        }
    }

    pub fn after(name: &'static str) -> Self {
        Self {
            name,
            before_tables: false,
            dialects: Vec::new(),
        }
    }

    pub fn only_for(mut self, dialect: &'static str) -> Self {
        self.dialects.push(dialect);
        self
    }
}

impl AuxiliaryDatabaseObject for TaggedObject {
    fn export_identifier(&self) -> String {
        self.name.to_string()
    }

    fn applies_before_tables(&self) -> bool {
        self.before_tables
    }

    fn applies_to_dialect(&self, dialect: &dyn DropDialect) -> bool {
        self.dialects.is_empty() || self.dialects.contains(&dialect.name())
    }

    fn drop_statements(&self, dialect: &dyn DropDialect) -> Vec<String> {
        vec![format!("DROP AUX {} ({})", self.name, dialect.name())]
    }
}

/// Records every lifecycle call it receives.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub events: Vec<String>,
    pub fail_on_accept: Option<String>,
    pub fail_on_release: bool,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements accepted, without the lifecycle markers.
    pub fn statements(&self) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| *e != "prepare" && *e != "release")
            .cloned()
            .collect()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl Target for RecordingTarget {
    fn accepts_import_script_actions(&self) -> bool {
        false
    }

    fn prepare(&mut self) -> Result<()> {
        self.events.push("prepare".to_string());
        Ok(())
    }

    fn accept(&mut self, statement: &str) -> Result<()> {
        if self.fail_on_accept.as_deref() == Some(statement) {
            return Err(DropError::Target(format!("rejected {statement}")));
        }
        self.events.push(statement.to_string());
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.events.push("release".to_string());
        if self.fail_on_release {
            return Err(DropError::Target("release failed".to_string()));
        }
        Ok(())
    }
}

/// Position of `statement` in `statements`, panicking if absent.
pub fn position(statements: &[String], statement: &str) -> usize {
    statements
        .iter()
        .position(|s| s == statement)
        .unwrap_or_else(|| panic!("statement not emitted: {statement}\nin: {statements:?}"))
}
