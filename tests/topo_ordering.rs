//! Statement analysis over .sql trees: discovery, classification,
//! dependency ordering, cycle reporting.

use std::fs;

use pgplan::topo::diagnostics::{DiagnosticCode, Severity};
use pgplan::topo::{analyze_and_sort, AnalyzeRequest};
use tempfile::TempDir;

fn analyze(files: &[(&str, &str)]) -> pgplan::topo::AnalyzeResult {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    analyze_and_sort(&AnalyzeRequest {
        roots: vec![dir.path().to_path_buf()],
    })
}

#[test]
fn view_orders_after_the_table_it_reads() {
    // Alphabetical discovery puts the view first; the graph reorders.
    let result = analyze(&[
        ("a_view.sql", "CREATE VIEW v AS SELECT id FROM users;"),
        ("z_table.sql", "CREATE TABLE users (id integer PRIMARY KEY);"),
    ]);

    let order: Vec<&str> = result
        .ordered
        .iter()
        .map(|node| node.id.file_path.as_str())
        .collect();
    assert_eq!(order, vec!["z_table.sql", "a_view.sql"]);
    assert!(!result.has_errors());
}

#[test]
fn cycle_is_reported_and_both_statements_survive() {
    let result = analyze(&[(
        "views.sql",
        "CREATE VIEW a AS SELECT * FROM b;\nCREATE VIEW b AS SELECT * FROM a;",
    )]);

    assert_eq!(result.ordered.len(), 2);
    // Cycle members fall back to ingest order.
    assert_eq!(result.ordered[0].id.statement_index, 0);
    assert_eq!(result.ordered[1].id.statement_index, 1);

    let cycle = result
        .diagnostics
        .iter()
        .find(|d| d.code == DiagnosticCode::CycleDetected)
        .expect("cycle diagnostic missing");
    assert_eq!(cycle.severity, Severity::Warning);
    assert_eq!(result.graph.cycle_groups.len(), 1);
    assert_eq!(result.graph.cycle_groups[0].len(), 2);
    assert!(!result.has_errors());
}

#[test]
fn foreign_key_waits_for_unique_index() {
    // The FK references a column set only a unique index provides.
    let result = analyze(&[
        (
            "01_tables.sql",
            "CREATE TABLE accounts (id integer, email text);\nCREATE TABLE logins (email text);",
        ),
        (
            "02_constraints.sql",
            "ALTER TABLE logins ADD CONSTRAINT logins_email_fk FOREIGN KEY (email) REFERENCES accounts (email);",
        ),
        (
            "03_indexes.sql",
            "CREATE UNIQUE INDEX accounts_email_key ON accounts (email);",
        ),
    ]);

    let position = |fragment: &str| {
        result
            .ordered
            .iter()
            .position(|node| node.sql.contains(fragment))
            .unwrap_or_else(|| panic!("no statement containing {:?}", fragment))
    };
    assert!(position("CREATE UNIQUE INDEX") < position("ADD CONSTRAINT logins_email_fk"));
}

#[test]
fn grant_orders_into_the_privileges_phase() {
    let result = analyze(&[(
        "all.sql",
        "GRANT SELECT ON TABLE users TO reporting;\nCREATE TABLE users (id integer);\nCREATE ROLE reporting;",
    )]);

    let classes: Vec<String> = result
        .ordered
        .iter()
        .map(|node| format!("{:?}", node.class))
        .collect();
    assert_eq!(classes, vec!["CreateRole", "CreateTable", "Grant"]);
}

#[test]
fn parse_error_drops_statement_and_reports() {
    let result = analyze(&[(
        "bad.sql",
        "CREATE TABLE ok (id integer);\nTHIS IS NOT SQL AT ALL;",
    )]);

    assert_eq!(result.ordered.len(), 1);
    let parse_error = result
        .diagnostics
        .iter()
        .find(|d| d.code == DiagnosticCode::ParseError)
        .expect("parse error missing");
    assert_eq!(
        parse_error.statement_id.as_ref().unwrap().statement_index,
        1
    );
    assert!(result.has_errors());
}

#[test]
fn missing_root_is_a_discovery_error() {
    let result = analyze_and_sort(&AnalyzeRequest {
        roots: vec!["/definitely/not/a/real/path".into()],
    });
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::DiscoveryError));
    assert!(result.has_errors());
}

#[test]
fn do_block_provides_enum_for_dependents() {
    let result = analyze(&[
        (
            "10_types.sql",
            "DO $$ BEGIN CREATE TYPE mood AS ENUM ('sad','ok'); EXCEPTION WHEN duplicate_object THEN NULL; END $$;",
        ),
        (
            "00_tables.sql",
            "CREATE TABLE feelings (current mood);",
        ),
    ]);

    // The DO block provides type:public.mood; the table orders after it
    // when the column type reference resolves.
    let do_position = result
        .ordered
        .iter()
        .position(|node| node.sql.starts_with("DO"))
        .unwrap();
    let table_position = result
        .ordered
        .iter()
        .position(|node| node.sql.starts_with("CREATE TABLE"))
        .unwrap();
    assert!(do_position < table_position);
}

#[test]
fn annotations_add_requires_and_override_phase() {
    let result = analyze(&[(
        "annotated.sql",
        "-- pgplan:requires table:public.users\n-- pgplan:phase post_data\nSELECT maintain_users();\nCREATE TABLE users (id integer);",
    )]);

    let order: Vec<usize> = result
        .ordered
        .iter()
        .map(|node| node.id.statement_index)
        .collect();
    assert_eq!(order, vec![1, 0]);
}

#[test]
fn depends_on_links_whole_files() {
    let result = analyze(&[
        (
            "a_functions.sql",
            "-- pgplan:depends-on z_schema.sql\nCREATE FUNCTION app.f() RETURNS integer LANGUAGE sql AS $$ SELECT 1 $$;",
        ),
        ("z_schema.sql", "CREATE SCHEMA app;"),
    ]);

    let order: Vec<&str> = result
        .ordered
        .iter()
        .map(|node| node.id.file_path.as_str())
        .collect();
    assert_eq!(order, vec!["z_schema.sql", "a_functions.sql"]);
}

#[test]
fn stable_output_across_runs() {
    let files = [
        ("one.sql", "CREATE TABLE t1 (id integer);"),
        ("two.sql", "CREATE VIEW v1 AS SELECT id FROM t1;"),
        ("three.sql", "GRANT SELECT ON TABLE t1 TO PUBLIC;"),
    ];
    let first: Vec<String> = analyze(&files)
        .ordered
        .iter()
        .map(|n| n.sql.clone())
        .collect();
    let second: Vec<String> = analyze(&files)
        .ordered
        .iter()
        .map(|n| n.sql.clone())
        .collect();
    assert_eq!(first, second);
}
