//! Privilege reconciliation through the full planning pipeline.

use pgplan::catalog::privilege::{AclEntry, DefaultAclEntry, ObjtypeCode};
use pgplan::catalog::role::Role;
use pgplan::catalog::schema::Schema;
use pgplan::catalog::table::{Column, ReplicaIdentity, Table};
use pgplan::catalog::Catalog;
use pgplan::diff::PlanOptions;
use pgplan::plan;

fn options() -> PlanOptions {
    PlanOptions {
        current_user: "postgres".to_string(),
    }
}

fn role(name: &str) -> Role {
    Role {
        name: name.to_string(),
        superuser: false,
        createdb: false,
        createrole: false,
        inherit: true,
        login: false,
        replication: false,
        bypassrls: false,
        connection_limit: None,
        config: Default::default(),
        member_of: vec![],
        default_privileges: vec![],
        comment: None,
    }
}

fn table(name: &str, privileges: Vec<AclEntry>) -> Table {
    Table {
        schema: "app".to_string(),
        name: name.to_string(),
        unlogged: false,
        partition_by: None,
        columns: vec![Column {
            name: "id".to_string(),
            data_type: "bigint".to_string(),
            collation: None,
            default: None,
            not_null: true,
            identity: None,
            comment: None,
        }],
        constraints: vec![],
        storage_options: Default::default(),
        replica_identity: ReplicaIdentity::Default,
        rls_enabled: false,
        rls_forced: false,
        owner: "app_owner".to_string(),
        comment: None,
        privileges,
    }
}

fn app_schema() -> Schema {
    Schema {
        name: "app".to_string(),
        owner: "postgres".to_string(),
        comment: None,
        privileges: vec![],
    }
}

fn base_catalog() -> Catalog {
    Catalog {
        roles: vec![role("app_owner"), role("readers")],
        schemas: vec![app_schema()],
        ..Default::default()
    }
}

#[test]
fn desired_acl_matching_effective_defaults_emits_nothing() {
    // app_owner's default privileges already grant readers SELECT on new
    // tables; a created table that wants exactly that needs no GRANT.
    let mut main = base_catalog();
    main.roles[0].default_privileges = vec![DefaultAclEntry {
        objtype: ObjtypeCode::Relation,
        in_schema: Some("app".to_string()),
        grantee: "readers".to_string(),
        privilege: "SELECT".to_string(),
        grantable: false,
    }];

    let mut branch = main.clone();
    branch.tables = vec![table(
        "events",
        vec![AclEntry::new("readers", "SELECT")],
    )];

    let plan = plan(&main, &branch, &options());
    assert!(
        !plan.statements.iter().any(|s| s.starts_with("GRANT")),
        "redundant GRANT emitted: {:?}",
        plan.statements
    );
    assert!(!plan.statements.iter().any(|s| s.starts_with("REVOKE")));
}

#[test]
fn unwanted_effective_default_is_revoked_on_create() {
    // The projection gives readers SELECT, but the desired ACL is empty:
    // the plan must revoke what the object inherits at creation.
    let mut main = base_catalog();
    main.roles[0].default_privileges = vec![DefaultAclEntry {
        objtype: ObjtypeCode::Relation,
        in_schema: Some("app".to_string()),
        grantee: "readers".to_string(),
        privilege: "SELECT".to_string(),
        grantable: false,
    }];

    let mut branch = main.clone();
    branch.tables = vec![table("events", vec![])];

    let plan = plan(&main, &branch, &options());
    assert!(plan
        .statements
        .iter()
        .any(|s| s == "REVOKE SELECT ON TABLE app.events FROM readers"));
}

#[test]
fn default_privilege_change_projects_onto_later_creates() {
    // The plan itself grants readers SELECT by default; a table created in
    // the same plan wanting readers SELECT then needs no explicit GRANT.
    let main = base_catalog();
    let mut branch = main.clone();
    branch.roles[0].default_privileges = vec![DefaultAclEntry {
        objtype: ObjtypeCode::Relation,
        in_schema: Some("app".to_string()),
        grantee: "readers".to_string(),
        privilege: "SELECT".to_string(),
        grantable: false,
    }];
    branch.tables = vec![table(
        "events",
        vec![AclEntry::new("readers", "SELECT")],
    )];

    let plan = plan(&main, &branch, &options());
    assert!(plan.statements.iter().any(|s| s
        == "ALTER DEFAULT PRIVILEGES FOR ROLE app_owner IN SCHEMA app GRANT SELECT ON TABLES TO readers"));
    assert!(
        !plan.statements.iter().any(|s| s.starts_with("GRANT SELECT ON TABLE")),
        "projection missed: {:?}",
        plan.statements
    );

    // And the projection must come before the create it affects.
    let adp = plan
        .statements
        .iter()
        .position(|s| s.starts_with("ALTER DEFAULT PRIVILEGES"))
        .unwrap();
    let create = plan
        .statements
        .iter()
        .position(|s| s.starts_with("CREATE TABLE app.events"))
        .unwrap();
    assert!(adp < create);
}

#[test]
fn grant_option_downgrade_preserves_base_privilege() {
    let mut main = base_catalog();
    main.tables = vec![table(
        "events",
        vec![AclEntry::new("readers", "SELECT").grantable()],
    )];
    let mut branch = main.clone();
    branch.tables[0].privileges = vec![AclEntry::new("readers", "SELECT")];

    let plan = plan(&main, &branch, &options());
    assert_eq!(
        plan.statements,
        vec!["REVOKE GRANT OPTION FOR SELECT ON TABLE app.events FROM readers"]
    );
}

#[test]
fn column_grants_are_scoped() {
    let mut main = base_catalog();
    main.tables = vec![table("events", vec![])];
    let mut branch = main.clone();
    branch.tables[0].privileges =
        vec![AclEntry::new("readers", "SELECT").on_columns(&["id"])];

    let plan = plan(&main, &branch, &options());
    assert_eq!(
        plan.statements,
        vec!["GRANT SELECT (id) ON TABLE app.events TO readers"]
    );
}

#[test]
fn owner_entries_never_surface() {
    let mut main = base_catalog();
    main.tables = vec![table("events", vec![])];
    let mut branch = main.clone();
    branch.tables[0].privileges = vec![AclEntry::new("app_owner", "SELECT")];

    let plan = plan(&main, &branch, &options());
    assert!(plan.statements.is_empty(), "{:?}", plan.statements);
}

#[test]
fn grants_order_after_object_creation() {
    let main = base_catalog();
    let mut branch = main.clone();
    branch.tables = vec![table(
        "events",
        vec![AclEntry::new("readers", "INSERT")],
    )];

    let plan = plan(&main, &branch, &options());
    let create = plan
        .statements
        .iter()
        .position(|s| s.starts_with("CREATE TABLE app.events"))
        .unwrap();
    let grant = plan
        .statements
        .iter()
        .position(|s| s == "GRANT INSERT ON TABLE app.events TO readers")
        .unwrap();
    assert!(create < grant);
}
