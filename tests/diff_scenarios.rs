//! End-to-end planning scenarios: two catalog snapshots in, ordered DDL out.

use pgplan::catalog::collation::{Collation, CollationProvider};
use pgplan::catalog::custom_type::{EnumLabel, EnumType};
use pgplan::catalog::domain::Domain;
use pgplan::catalog::policy::{Policy, PolicyCommand};
use pgplan::catalog::sequence::Sequence;
use pgplan::catalog::table::{Column, ConstraintKind, ReplicaIdentity, Table, TableConstraint};
use pgplan::catalog::Catalog;
use pgplan::diff::PlanOptions;
use pgplan::plan;
use pgplan::topo::diagnostics::DiagnosticCode;

fn options() -> PlanOptions {
    PlanOptions {
        current_user: "postgres".to_string(),
    }
}

fn domain(name: &str) -> Domain {
    Domain {
        schema: "public".to_string(),
        name: name.to_string(),
        base_type: "integer".to_string(),
        base_type_schema: "pg_catalog".to_string(),
        collation: None,
        default: None,
        not_null: false,
        constraints: vec![],
        owner: "postgres".to_string(),
        comment: None,
        privileges: vec![],
    }
}

fn enum_type(labels: &[(&str, f64)]) -> EnumType {
    EnumType {
        schema: "public".to_string(),
        name: "e".to_string(),
        labels: labels
            .iter()
            .map(|(name, order)| EnumLabel {
                name: name.to_string(),
                sort_order: *order,
            })
            .collect(),
        owner: "postgres".to_string(),
        comment: None,
        privileges: vec![],
    }
}

fn sequence() -> Sequence {
    Sequence {
        schema: "public".to_string(),
        name: "s".to_string(),
        data_type: "integer".to_string(),
        unlogged: false,
        increment: 1,
        min_value: None,
        max_value: None,
        start_value: 1,
        cache: 1,
        cycle: false,
        owned_by: None,
        owner: "postgres".to_string(),
        comment: None,
        privileges: vec![],
    }
}

fn policy(command: PolicyCommand) -> Policy {
    Policy {
        schema: "public".to_string(),
        table: "t".to_string(),
        name: "p".to_string(),
        command,
        permissive: true,
        roles: vec!["app_user".to_string()],
        using_expr: Some("owner_id = current_user_id()".to_string()),
        with_check_expr: None,
        comment: None,
    }
}

fn users_table() -> Table {
    Table {
        schema: "public".to_string(),
        name: "users".to_string(),
        unlogged: false,
        partition_by: None,
        columns: vec![
            Column {
                name: "id".to_string(),
                data_type: "bigint".to_string(),
                collation: None,
                default: None,
                not_null: true,
                identity: None,
                comment: None,
            },
            Column {
                name: "email".to_string(),
                data_type: "text".to_string(),
                collation: None,
                default: None,
                not_null: true,
                identity: None,
                comment: None,
            },
        ],
        constraints: vec![TableConstraint {
            name: "users_pkey".to_string(),
            kind: ConstraintKind::PrimaryKey {
                columns: vec!["id".to_string()],
            },
            validated: true,
        }],
        storage_options: Default::default(),
        replica_identity: ReplicaIdentity::Default,
        rls_enabled: false,
        rls_forced: false,
        owner: "postgres".to_string(),
        comment: None,
        privileges: vec![],
    }
}

#[test]
fn dropping_a_domain_emits_a_single_statement() {
    let main = Catalog {
        domains: vec![domain("test_domain")],
        ..Default::default()
    };
    let branch = Catalog::default();

    let plan = plan(&main, &branch, &options());
    assert_eq!(plan.statements, vec!["DROP DOMAIN public.test_domain"]);
    assert_eq!(plan.sql(), "DROP DOMAIN public.test_domain;");
}

#[test]
fn adding_an_enum_value_in_the_middle_uses_before() {
    let main = Catalog {
        enums: vec![enum_type(&[("a", 1.0), ("c", 3.0)])],
        ..Default::default()
    };
    let branch = Catalog {
        enums: vec![enum_type(&[("a", 1.0), ("b", 2.0), ("c", 3.0)])],
        ..Default::default()
    };

    let plan = plan(&main, &branch, &options());
    assert_eq!(
        plan.statements,
        vec!["ALTER TYPE public.e ADD VALUE 'b' BEFORE 'c'"]
    );
}

#[test]
fn resetting_sequence_options_emits_one_alter() {
    let mut main_sequence = sequence();
    main_sequence.increment = 2;
    main_sequence.min_value = Some(3);
    main_sequence.max_value = Some(100);
    main_sequence.start_value = 5;
    main_sequence.cache = 2;
    main_sequence.cycle = true;

    let main = Catalog {
        sequences: vec![main_sequence],
        ..Default::default()
    };
    let branch = Catalog {
        sequences: vec![sequence()],
        ..Default::default()
    };

    let plan = plan(&main, &branch, &options());
    assert_eq!(
        plan.statements,
        vec!["ALTER SEQUENCE public.s INCREMENT BY 1 NO MINVALUE NO MAXVALUE START WITH 1 CACHE 1 NO CYCLE"]
    );
}

#[test]
fn policy_command_change_forces_drop_and_recreate() {
    let main = Catalog {
        policies: vec![policy(PolicyCommand::Select)],
        ..Default::default()
    };
    let branch = Catalog {
        policies: vec![policy(PolicyCommand::Update)],
        ..Default::default()
    };

    let plan = plan(&main, &branch, &options());
    assert_eq!(plan.statements.len(), 2);
    assert_eq!(plan.statements[0], "DROP POLICY p ON public.t");
    assert_eq!(
        plan.statements[1],
        "CREATE POLICY p ON public.t FOR UPDATE TO app_user USING (owner_id = current_user_id())"
    );
}

#[test]
fn collation_provider_change_forces_drop_and_recreate() {
    let collation = |provider: CollationProvider| Collation {
        schema: "public".to_string(),
        name: "c1".to_string(),
        provider,
        deterministic: true,
        encoding: None,
        locale: Some("en-US".to_string()),
        collate: None,
        ctype: None,
        icu_rules: None,
        version: None,
        owner: "postgres".to_string(),
        comment: None,
    };

    let main = Catalog {
        collations: vec![collation(CollationProvider::Libc)],
        ..Default::default()
    };
    let branch = Catalog {
        collations: vec![collation(CollationProvider::Icu)],
        ..Default::default()
    };

    let plan = plan(&main, &branch, &options());
    assert_eq!(plan.statements.len(), 2);
    assert_eq!(plan.statements[0], "DROP COLLATION public.c1");
    assert!(plan.statements[1].starts_with("CREATE COLLATION public.c1 ("));
}

#[test]
fn self_diff_is_empty() {
    let catalog = Catalog {
        domains: vec![domain("d")],
        enums: vec![enum_type(&[("a", 1.0), ("b", 2.0)])],
        sequences: vec![sequence()],
        tables: vec![users_table()],
        policies: vec![policy(PolicyCommand::Select)],
        ..Default::default()
    };

    let plan = plan(&catalog, &catalog, &options());
    assert!(plan.is_empty(), "unexpected changes: {:?}", plan.statements);
    assert!(plan.diagnostics.is_empty());
}

#[test]
fn alterable_changes_never_drop_the_object() {
    // Only the policy's role list changes; the plan must stay ALTER-only.
    let mut branch_policy = policy(PolicyCommand::Select);
    branch_policy.roles = vec!["app_user".to_string(), "auditor".to_string()];

    let main = Catalog {
        policies: vec![policy(PolicyCommand::Select)],
        ..Default::default()
    };
    let branch = Catalog {
        policies: vec![branch_policy],
        ..Default::default()
    };

    let plan = plan(&main, &branch, &options());
    assert_eq!(
        plan.statements,
        vec!["ALTER POLICY p ON public.t TO app_user, auditor"]
    );
}

#[test]
fn created_table_orders_after_its_schema_and_types() {
    use pgplan::catalog::schema::Schema;

    let mut table = users_table();
    table.schema = "app".to_string();
    table.columns.push(Column {
        name: "mood".to_string(),
        data_type: "app.mood".to_string(),
        collation: None,
        default: None,
        not_null: false,
        identity: None,
        comment: None,
    });
    let mut mood = enum_type(&[("sad", 1.0), ("ok", 2.0)]);
    mood.schema = "app".to_string();
    mood.name = "mood".to_string();

    let branch = Catalog {
        schemas: vec![Schema {
            name: "app".to_string(),
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        }],
        enums: vec![mood],
        tables: vec![table],
        ..Default::default()
    };

    let plan = plan(&Catalog::default(), &branch, &options());
    let position = |needle: &str| {
        plan.statements
            .iter()
            .position(|s| s.starts_with(needle))
            .unwrap_or_else(|| panic!("no statement starting with {:?}", needle))
    };

    assert!(position("CREATE SCHEMA app") < position("CREATE TYPE app.mood"));
    assert!(position("CREATE TYPE app.mood") < position("CREATE TABLE app.users"));
    assert!(plan.diagnostics.is_empty(), "{:?}", plan.diagnostics);
}

#[test]
fn sequence_drop_suppressed_when_owning_table_drops() {
    use pgplan::catalog::sequence::SequenceOwner;

    let mut owned = sequence();
    owned.owned_by = Some(SequenceOwner {
        schema: "public".to_string(),
        table: "users".to_string(),
        column: "id".to_string(),
    });

    let main = Catalog {
        sequences: vec![owned],
        tables: vec![users_table()],
        ..Default::default()
    };
    let branch = Catalog::default();

    let plan = plan(&main, &branch, &options());
    assert!(
        !plan.statements.iter().any(|s| s.contains("DROP SEQUENCE")),
        "auto-dropped sequence must not be dropped explicitly: {:?}",
        plan.statements
    );
    assert!(plan.statements.iter().any(|s| s == "DROP TABLE public.users"));
}

#[test]
fn enum_label_removal_is_reported_not_planned() {
    let main = Catalog {
        enums: vec![enum_type(&[("a", 1.0), ("b", 2.0)])],
        ..Default::default()
    };
    let branch = Catalog {
        enums: vec![enum_type(&[("a", 1.0)])],
        ..Default::default()
    };

    let plan = plan(&main, &branch, &options());
    assert!(plan.statements.is_empty());
    assert!(plan
        .diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::InvariantViolation));
    assert!(plan.has_errors());
}

#[test]
fn foreign_key_orders_after_referenced_key() {
    let mut orders = users_table();
    orders.name = "orders".to_string();
    orders.constraints = vec![TableConstraint {
        name: "orders_user_fk".to_string(),
        kind: ConstraintKind::ForeignKey {
            columns: vec!["id".to_string()],
            references: pgplan::catalog::table::ForeignKeyRef {
                schema: "public".to_string(),
                table: "users".to_string(),
                columns: vec!["id".to_string()],
                on_delete: None,
                on_update: None,
            },
        },
        validated: true,
    }];

    let branch = Catalog {
        tables: vec![orders, users_table()],
        ..Default::default()
    };

    let plan = plan(&Catalog::default(), &branch, &options());
    let fk_position = plan
        .statements
        .iter()
        .position(|s| s.contains("ADD CONSTRAINT orders_user_fk"))
        .expect("foreign key statement missing");
    let users_position = plan
        .statements
        .iter()
        .position(|s| s.starts_with("CREATE TABLE public.users"))
        .expect("users create missing");
    assert!(users_position < fk_position);
}

#[test]
fn identical_inputs_produce_byte_identical_output() {
    let branch = Catalog {
        domains: vec![domain("d1"), domain("d2")],
        sequences: vec![sequence()],
        tables: vec![users_table()],
        ..Default::default()
    };

    let first = plan(&Catalog::default(), &branch, &options()).sql();
    let second = plan(&Catalog::default(), &branch, &options()).sql();
    assert_eq!(first, second);
}
