//! Integration tests for drop ordering and target fan-out.
//!
//! These tests build catalogs against a bare test dialect and check the
//! exact statement sequence every target receives.

mod common;

use std::sync::Arc;

use common::{RecordingTarget, TaggedObject, TestDialect, position};
use oxide_schema::prelude::*;

fn database(dialect: TestDialect) -> Database {
    Database::new(Arc::new(dialect))
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn drops_in_phase_order() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(
        Namespace::new(NamespaceName::schema("S"))
            .table(Table::new("T").foreign_key(ForeignKey::new(
                "FK1",
                QualifiedName::new(&NamespaceName::schema("S"), "T"),
            )))
            .sequence(Sequence::new("SEQ1")),
    );

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, true, &dialect)
        .unwrap();

    assert_eq!(
        sql,
        vec!["DROP FK1", "DROP TABLE T", "DROP SEQUENCE SEQ1", "DROP SCHEMA S"]
    );
}

#[test]
fn all_constraints_precede_all_tables() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .namespace(
            Namespace::new(NamespaceName::schema("a")).table(Table::new("orders").foreign_key(
                ForeignKey::new("fk_orders_product", QualifiedName::unqualified("products")),
            )),
        )
        .namespace(
            Namespace::new(NamespaceName::schema("b"))
                .table(Table::new("products"))
                .table(Table::new("stock").foreign_key(ForeignKey::new(
                    "fk_stock_orders",
                    QualifiedName::unqualified("orders"),
                ))),
        );

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, false, &dialect)
        .unwrap();

    let last_fk = position(&sql, "DROP fk_stock_orders");
    let first_table = position(&sql, "DROP TABLE orders");
    assert!(position(&sql, "DROP fk_orders_product") < first_table);
    assert!(last_fk < first_table);
    assert_eq!(
        sql,
        vec![
            "DROP fk_orders_product",
            "DROP fk_stock_orders",
            "DROP TABLE orders",
            "DROP TABLE products",
            "DROP TABLE stock",
        ]
    );
}

#[test]
fn auxiliary_objects_bracket_tables() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .namespace(
            Namespace::new(NamespaceName::schema("app"))
                .table(Table::new("users"))
                .sequence(Sequence::new("user_seq")),
        )
        .auxiliary_object(TaggedObject::after("late"))
        .auxiliary_object(TaggedObject::before("early"));

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, true, &dialect)
        .unwrap();

    assert_eq!(
        sql,
        vec![
            "DROP AUX early (test)",
            "DROP TABLE users",
            "DROP SEQUENCE user_seq",
            "DROP AUX late (test)",
            "DROP SCHEMA app",
        ]
    );
}

#[test]
fn inapplicable_auxiliary_objects_are_skipped() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .auxiliary_object(TaggedObject::before("pg_before").only_for("postgresql"))
        .auxiliary_object(TaggedObject::after("pg_after").only_for("postgresql"))
        .auxiliary_object(TaggedObject::after("mine").only_for("test"));

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, false, &dialect)
        .unwrap();

    assert_eq!(sql, vec!["DROP AUX mine (test)"]);
}

#[test]
fn views_are_never_dropped() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(
        Namespace::default()
            .table(Table::new("users"))
            .table(
                Table::new("active_users")
                    .kind(TableKind::View)
                    .foreign_key(ForeignKey::new("fk_view", QualifiedName::unqualified("users"))),
            )
            // Same identifier as the view: would be a duplicate if views were observed
            .table(Table::new("active_users")),
    );

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, false, &dialect)
        .unwrap();

    assert_eq!(sql, vec!["DROP TABLE users", "DROP TABLE active_users"]);
}

// =============================================================================
// Duplicate detection
// =============================================================================

#[test]
fn duplicate_table_halts_the_run() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .namespace(
            Namespace::new(NamespaceName::schema("s"))
                .table(Table::new("t"))
                .sequence(Sequence::new("seq1")),
        )
        .namespace(
            Namespace::new(NamespaceName::schema("s"))
                .table(Table::new("t"))
                .sequence(Sequence::new("seq2")),
        )
        .auxiliary_object(TaggedObject::after("late"));

    let mut target = RecordingTarget::new();
    let result = {
        let mut targets: [&mut dyn Target; 1] = [&mut target];
        SchemaDropper::new().drop(&db, true, &mut targets)
    };

    assert!(matches!(result, Err(DropError::DuplicateExport(ref id)) if id == "s.t"));
    assert_eq!(
        target.events,
        vec!["prepare", "DROP TABLE t", "DROP SEQUENCE seq1", "release"]
    );
}

#[test]
fn duplicate_sequence_is_rejected() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(
        Namespace::default()
            .sequence(Sequence::new("seq"))
            .sequence(Sequence::new("seq")),
    );

    let result = SchemaDropper::new().generate_drop_commands(&db, false, &dialect);
    assert!(matches!(result, Err(DropError::DuplicateExport(ref id)) if id == "seq"));
}

#[test]
fn same_name_in_different_schemas_is_not_a_duplicate() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .namespace(Namespace::new(NamespaceName::schema("a")).table(Table::new("users")))
        .namespace(Namespace::new(NamespaceName::schema("b")).table(Table::new("users")));

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, false, &dialect)
        .unwrap();

    assert_eq!(sql, vec!["DROP TABLE users", "DROP TABLE users"]);
}

#[test]
fn tables_added_in_place_keep_their_schema() {
    let dialect = PostgresDialect::new();
    let mut a = Namespace::new(NamespaceName::schema("a"));
    a.add_table(Table::new("users"));
    let mut b = Namespace::new(NamespaceName::schema("b"));
    b.add_table(Table::new("users"));
    b.add_sequence(Sequence::new("users_seq"));
    let db = Database::new(Arc::new(dialect)).namespace(a).namespace(b);

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, false, &dialect)
        .unwrap();

    assert_eq!(
        sql,
        vec![
            "DROP TABLE IF EXISTS a.users CASCADE",
            "DROP TABLE IF EXISTS b.users CASCADE",
            "DROP SEQUENCE IF EXISTS b.users_seq",
        ]
    );
}

#[test]
fn identifiers_do_not_survive_between_runs() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(Namespace::default().table(Table::new("users")));
    let dropper = SchemaDropper::new();

    dropper.generate_drop_commands(&db, false, &dialect).unwrap();
    dropper.generate_drop_commands(&db, false, &dialect).unwrap();
}

// =============================================================================
// Schemas
// =============================================================================

#[test]
fn schema_drops_follow_the_flag() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .namespace(Namespace::default().table(Table::new("settings")))
        .namespace(
            Namespace::new(NamespaceName::new(Some(Identifier::new("main")), None))
                .table(Table::new("logs")),
        )
        .namespace(Namespace::new(NamespaceName::schema("sales")));

    let with = SchemaDropper::new()
        .generate_drop_commands(&db, true, &dialect)
        .unwrap();
    let without = SchemaDropper::new()
        .generate_drop_commands(&db, false, &dialect)
        .unwrap();

    assert_eq!(
        with,
        vec!["DROP TABLE settings", "DROP TABLE logs", "DROP SCHEMA sales"]
    );
    assert_eq!(without, vec!["DROP TABLE settings", "DROP TABLE logs"]);
}

#[test]
fn quoted_schema_is_rendered_by_the_dialect() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .namespace(Namespace::new(NamespaceName::schema(Identifier::quoted("Sales"))));

    let sql = SchemaDropper::new()
        .generate_drop_commands(&db, true, &dialect)
        .unwrap();

    assert_eq!(sql, vec!["DROP SCHEMA \"Sales\""]);
}

// =============================================================================
// Dialect handling
// =============================================================================

#[test]
fn constraint_drops_follow_dialect_support() {
    let supporting = TestDialect::new("test");
    let refusing = TestDialect::new("test").without_constraint_drops();
    let db = database(supporting)
        .namespace(
            Namespace::new(NamespaceName::schema("s"))
                .table(Table::new("parent"))
                .table(Table::new("child").foreign_key(ForeignKey::new(
                    "fk_child_parent",
                    QualifiedName::unqualified("parent"),
                )))
                .sequence(Sequence::new("child_seq")),
        )
        .auxiliary_object(TaggedObject::before("early"))
        .auxiliary_object(TaggedObject::after("late"));

    let with_fks = SchemaDropper::new()
        .generate_drop_commands(&db, true, &supporting)
        .unwrap();
    let without_fks = SchemaDropper::new()
        .generate_drop_commands(&db, true, &refusing)
        .unwrap();

    let expected: Vec<String> = with_fks
        .iter()
        .filter(|s| *s != "DROP fk_child_parent")
        .cloned()
        .collect();
    assert_eq!(with_fks.len(), without_fks.len() + 1);
    assert_eq!(without_fks, expected);
}

#[test]
fn post_table_auxiliary_dialect_is_configurable() {
    let catalog_dialect = TestDialect::new("catalog");
    let call_dialect = TestDialect::new("call");
    let db = database(catalog_dialect)
        .auxiliary_object(TaggedObject::before("early"))
        .auxiliary_object(TaggedObject::after("late"));

    let explicit = SchemaDropper::new()
        .generate_drop_commands(&db, false, &call_dialect)
        .unwrap();
    let legacy = SchemaDropper::new()
        .auxiliary_dialect(DialectSource::CatalogDefault)
        .generate_drop_commands(&db, false, &call_dialect)
        .unwrap();

    assert_eq!(
        explicit,
        vec!["DROP AUX early (call)", "DROP AUX late (call)"]
    );
    assert_eq!(
        legacy,
        vec!["DROP AUX early (call)", "DROP AUX late (catalog)"]
    );
}

#[test]
fn constraint_drops_always_use_the_call_dialect() {
    let db = database(TestDialect::new("catalog").without_constraint_drops()).namespace(
        Namespace::default().table(
            Table::new("child")
                .foreign_key(ForeignKey::new("fk", QualifiedName::unqualified("child"))),
        ),
    );
    let call_dialect = TestDialect::new("call");

    let sql = SchemaDropper::new()
        .auxiliary_dialect(DialectSource::CatalogDefault)
        .generate_drop_commands(&db, false, &call_dialect)
        .unwrap();

    assert_eq!(sql, vec!["DROP fk", "DROP TABLE child"]);
}

#[test]
fn drop_defaults_to_the_catalog_dialect() {
    let db = database(TestDialect::new("catalog").without_constraint_drops()).namespace(
        Namespace::default().table(
            Table::new("child")
                .foreign_key(ForeignKey::new("fk", QualifiedName::unqualified("child"))),
        ),
    );

    let mut target = RecordingTarget::new();
    {
        let mut targets: [&mut dyn Target; 1] = [&mut target];
        SchemaDropper::new().drop(&db, false, &mut targets).unwrap();
    }

    assert_eq!(target.statements(), vec!["DROP TABLE child"]);
}

// =============================================================================
// Targets
// =============================================================================

#[test]
fn every_target_sees_the_same_sequence() {
    let dialect = TestDialect::new("test");
    let db = database(dialect)
        .namespace(
            Namespace::new(NamespaceName::schema("s"))
                .table(Table::new("a"))
                .table(Table::new("b").foreign_key(ForeignKey::new(
                    "fk_b_a",
                    QualifiedName::unqualified("a"),
                )))
                .sequence(Sequence::new("seq")),
        )
        .auxiliary_object(TaggedObject::after("late"));

    let mut first = RecordingTarget::new();
    let mut second = RecordingTarget::new();
    let mut third = RecordingTarget::new();
    {
        let mut targets: [&mut dyn Target; 3] = [&mut first, &mut second, &mut third];
        SchemaDropper::new()
            .drop_with_dialect(&db, true, &dialect, &mut targets)
            .unwrap();
    }

    for target in [&first, &second, &third] {
        assert_eq!(target.count("prepare"), 1);
        assert_eq!(target.count("release"), 1);
        assert_eq!(target.events.first().map(String::as_str), Some("prepare"));
        assert_eq!(target.events.last().map(String::as_str), Some("release"));
    }
    assert_eq!(first.events, second.events);
    assert_eq!(second.events, third.events);
    assert_eq!(first.statements().len(), 6);
}

#[test]
fn no_targets_is_not_an_error() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(Namespace::default().table(Table::new("users")));

    let mut targets: [&mut dyn Target; 0] = [];
    SchemaDropper::new()
        .drop_with_dialect(&db, true, &dialect, &mut targets)
        .unwrap();
}

#[test]
fn target_failure_still_releases_every_target() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(
        Namespace::default()
            .table(Table::new("a"))
            .table(Table::new("b")),
    );

    let mut healthy = RecordingTarget::new();
    let mut failing = RecordingTarget::new();
    failing.fail_on_accept = Some("DROP TABLE b".to_string());
    let result = {
        let mut targets: [&mut dyn Target; 2] = [&mut healthy, &mut failing];
        SchemaDropper::new().drop_with_dialect(&db, false, &dialect, &mut targets)
    };

    assert!(matches!(result, Err(DropError::Target(ref msg)) if msg == "rejected DROP TABLE b"));
    assert_eq!(
        healthy.events,
        vec!["prepare", "DROP TABLE a", "DROP TABLE b", "release"]
    );
    assert_eq!(failing.events, vec!["prepare", "DROP TABLE a", "release"]);
}

#[test]
fn release_failure_is_reported_after_the_run_error() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(
        Namespace::default()
            .table(Table::new("t"))
            .table(Table::new("t")),
    );

    let mut target = RecordingTarget::new();
    target.fail_on_release = true;
    let result = {
        let mut targets: [&mut dyn Target; 1] = [&mut target];
        SchemaDropper::new().drop_with_dialect(&db, false, &dialect, &mut targets)
    };

    match result {
        Err(DropError::Multiple(errors)) => {
            assert_eq!(errors.len(), 2);
            assert!(matches!(errors[0], DropError::DuplicateExport(_)));
            assert!(matches!(errors[1], DropError::Target(_)));
        }
        other => panic!("expected multiple errors, got {other:?}"),
    }
}

#[test]
fn release_failure_alone_fails_the_run() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(Namespace::default().table(Table::new("t")));

    let mut target = RecordingTarget::new();
    target.fail_on_release = true;
    let result = {
        let mut targets: [&mut dyn Target; 1] = [&mut target];
        SchemaDropper::new().drop_with_dialect(&db, false, &dialect, &mut targets)
    };

    assert!(matches!(result, Err(DropError::Target(_))));
    assert_eq!(target.events, vec!["prepare", "DROP TABLE t", "release"]);
}

#[test]
fn script_file_and_memory_targets_agree() {
    let dialect = TestDialect::new("test");
    let db = database(dialect).namespace(
        Namespace::new(NamespaceName::schema("s"))
            .table(Table::new("users"))
            .sequence(Sequence::new("user_seq")),
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drop.sql");
    let mut file = FileTarget::new(&path).delimiter(";");
    let mut memory = CollectingTarget::new();
    {
        let mut targets: [&mut dyn Target; 2] = [&mut file, &mut memory];
        SchemaDropper::new()
            .drop_with_dialect(&db, true, &dialect, &mut targets)
            .unwrap();
    }

    let script = std::fs::read_to_string(&path).unwrap();
    let expected: String = memory
        .statements()
        .iter()
        .map(|s| format!("{s};\n"))
        .collect();
    assert_eq!(script, expected);
    assert_eq!(
        script,
        "DROP TABLE users;\nDROP SEQUENCE user_seq;\nDROP SCHEMA s;\n"
    );
}
