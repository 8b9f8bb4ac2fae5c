//! Table differ: columns, constraints, storage options, replica identity,
//! row security, ownership, comments and ACLs.

use std::collections::BTreeMap;

use crate::catalog::table::{Column, ConstraintKind, Table, TableConstraint};
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, TableChange};
use crate::diff::PlanContext;

fn has_non_alterable_changes(main: &Table, branch: &Table) -> bool {
    main.partition_by != branch.partition_by
}

fn key_columns_of(constraint: &TableConstraint) -> Option<Vec<String>> {
    match &constraint.kind {
        ConstraintKind::PrimaryKey { columns } | ConstraintKind::Unique { columns } => {
            Some(columns.clone())
        }
        _ => None,
    }
}

fn create_changes(ctx: &PlanContext, table: &Table) -> Vec<Change> {
    let mut changes = vec![Change::Table(TableChange::Create {
        table: table.clone(),
    })];

    // Foreign keys and unvalidated constraints come after CREATE; the
    // rendered CREATE skips them.
    for constraint in &table.constraints {
        let deferred = !constraint.validated
            || matches!(constraint.kind, ConstraintKind::ForeignKey { .. });
        if deferred {
            changes.push(Change::Table(TableChange::AddConstraint {
                schema: table.schema.clone(),
                table: table.name.clone(),
                constraint: constraint.clone(),
            }));
        }
    }

    if table.rls_enabled {
        changes.push(Change::Table(TableChange::EnableRowSecurity {
            schema: table.schema.clone(),
            table: table.name.clone(),
        }));
    }
    if table.rls_forced {
        changes.push(Change::Table(TableChange::ForceRowSecurity {
            schema: table.schema.clone(),
            table: table.name.clone(),
        }));
    }
    if table.replica_identity != Default::default() {
        changes.push(Change::Table(TableChange::SetReplicaIdentity {
            schema: table.schema.clone(),
            table: table.name.clone(),
            identity: table.replica_identity.clone(),
        }));
    }
    if table.owner != ctx.current_user {
        changes.push(Change::Table(TableChange::ChangeOwner {
            schema: table.schema.clone(),
            table: table.name.clone(),
            owner: table.owner.clone(),
        }));
    }
    if let Some(comment) = &table.comment {
        changes.push(Change::Table(TableChange::Comment {
            schema: table.schema.clone(),
            table: table.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    for column in &table.columns {
        if let Some(comment) = &column.comment {
            changes.push(Change::Table(TableChange::ColumnComment {
                schema: table.schema.clone(),
                table: table.name.clone(),
                column: column.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
    }
    changes.extend(ctx.created_acl_changes(
        &table.stable_id(),
        ObjectKind::Table,
        &table.owner,
        Some(&table.schema),
        &table.privileges,
    ));
    changes
}

fn column_changes(branch_table: &Table, main: &Column, branch: &Column) -> Vec<Change> {
    let schema = branch_table.schema.clone();
    let table = branch_table.name.clone();
    let mut changes = Vec::new();

    if main.data_type != branch.data_type || main.collation != branch.collation {
        changes.push(Change::Table(TableChange::AlterColumnType {
            schema: schema.clone(),
            table: table.clone(),
            name: branch.name.clone(),
            data_type: branch.data_type.clone(),
            collation: branch.collation.clone(),
        }));
    }

    match (&main.default, &branch.default) {
        (None, Some(default)) => changes.push(Change::Table(TableChange::AlterColumnSetDefault {
            schema: schema.clone(),
            table: table.clone(),
            name: branch.name.clone(),
            default: default.clone(),
        })),
        (Some(_), None) => changes.push(Change::Table(TableChange::AlterColumnDropDefault {
            schema: schema.clone(),
            table: table.clone(),
            name: branch.name.clone(),
        })),
        (Some(old), Some(new)) if old != new => {
            changes.push(Change::Table(TableChange::AlterColumnSetDefault {
                schema: schema.clone(),
                table: table.clone(),
                name: branch.name.clone(),
                default: new.clone(),
            }))
        }
        _ => {}
    }

    if main.not_null != branch.not_null {
        changes.push(Change::Table(if branch.not_null {
            TableChange::AlterColumnSetNotNull {
                schema: schema.clone(),
                table: table.clone(),
                name: branch.name.clone(),
            }
        } else {
            TableChange::AlterColumnDropNotNull {
                schema: schema.clone(),
                table: table.clone(),
                name: branch.name.clone(),
            }
        }));
    }

    match (&main.identity, &branch.identity) {
        (None, Some(identity)) => {
            changes.push(Change::Table(TableChange::AlterColumnAddIdentity {
                schema: schema.clone(),
                table: table.clone(),
                name: branch.name.clone(),
                identity: *identity,
            }))
        }
        (Some(_), None) => changes.push(Change::Table(TableChange::AlterColumnDropIdentity {
            schema: schema.clone(),
            table: table.clone(),
            name: branch.name.clone(),
        })),
        (Some(old), Some(new)) if old != new => {
            changes.push(Change::Table(TableChange::AlterColumnSetIdentity {
                schema: schema.clone(),
                table: table.clone(),
                name: branch.name.clone(),
                identity: *new,
            }))
        }
        _ => {}
    }

    if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
        changes.push(Change::Table(TableChange::ColumnComment {
            schema,
            table,
            column: branch.name.clone(),
            comment,
        }));
    }

    changes
}

fn constraint_changes(main: &Table, branch: &Table) -> Vec<Change> {
    let mut changes = Vec::new();

    for main_constraint in &main.constraints {
        match branch.find_constraint(&main_constraint.name) {
            None => changes.push(Change::Table(TableChange::DropConstraint {
                schema: branch.schema.clone(),
                table: branch.name.clone(),
                name: main_constraint.name.clone(),
                key_columns: key_columns_of(main_constraint),
            })),
            Some(branch_constraint) if branch_constraint.kind != main_constraint.kind => {
                changes.push(Change::Table(TableChange::DropConstraint {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                    name: main_constraint.name.clone(),
                    key_columns: key_columns_of(main_constraint),
                }));
                changes.push(Change::Table(TableChange::AddConstraint {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                    constraint: branch_constraint.clone(),
                }));
            }
            Some(branch_constraint) => {
                if branch_constraint.validated && !main_constraint.validated {
                    changes.push(Change::Table(TableChange::ValidateConstraint {
                        schema: branch.schema.clone(),
                        table: branch.name.clone(),
                        name: branch_constraint.name.clone(),
                    }));
                }
            }
        }
    }

    for branch_constraint in &branch.constraints {
        if main.find_constraint(&branch_constraint.name).is_none() {
            changes.push(Change::Table(TableChange::AddConstraint {
                schema: branch.schema.clone(),
                table: branch.name.clone(),
                constraint: branch_constraint.clone(),
            }));
        }
    }

    changes
}

fn storage_option_changes(main: &Table, branch: &Table) -> Vec<Change> {
    let mut set: BTreeMap<String, String> = BTreeMap::new();
    let mut reset: Vec<String> = Vec::new();

    for (key, value) in &branch.storage_options {
        if main.storage_options.get(key) != Some(value) {
            set.insert(key.clone(), value.clone());
        }
    }
    for key in main.storage_options.keys() {
        if !branch.storage_options.contains_key(key) {
            reset.push(key.clone());
        }
    }

    let mut changes = Vec::new();
    if !set.is_empty() {
        changes.push(Change::Table(TableChange::SetStorageOptions {
            schema: branch.schema.clone(),
            table: branch.name.clone(),
            options: set,
        }));
    }
    if !reset.is_empty() {
        changes.push(Change::Table(TableChange::ResetStorageOptions {
            schema: branch.schema.clone(),
            table: branch.name.clone(),
            keys: reset,
        }));
    }
    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.tables,
        &ctx.branch.tables,
        Table::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for table in parts.created {
        changes.extend(create_changes(ctx, table));
    }

    for table in parts.dropped {
        changes.push(Change::Table(TableChange::Drop {
            table: table.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if has_non_alterable_changes(main, branch) {
            changes.push(Change::Table(TableChange::Drop {
                table: main.clone(),
            }));
            changes.extend(create_changes(ctx, branch));
            continue;
        }

        if main.unlogged != branch.unlogged {
            changes.push(Change::Table(if branch.unlogged {
                TableChange::SetUnlogged {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                }
            } else {
                TableChange::SetLogged {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                }
            }));
        }

        for main_column in &main.columns {
            match branch.find_column(&main_column.name) {
                None => changes.push(Change::Table(TableChange::DropColumn {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                    name: main_column.name.clone(),
                })),
                Some(branch_column) => {
                    changes.extend(column_changes(branch, main_column, branch_column));
                }
            }
        }
        for branch_column in &branch.columns {
            if main.find_column(&branch_column.name).is_none() {
                changes.push(Change::Table(TableChange::AddColumn {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                    column: branch_column.clone(),
                }));
                if let Some(comment) = &branch_column.comment {
                    changes.push(Change::Table(TableChange::ColumnComment {
                        schema: branch.schema.clone(),
                        table: branch.name.clone(),
                        column: branch_column.name.clone(),
                        comment: Some(comment.clone()),
                    }));
                }
            }
        }

        changes.extend(constraint_changes(main, branch));
        changes.extend(storage_option_changes(main, branch));

        if main.replica_identity != branch.replica_identity {
            changes.push(Change::Table(TableChange::SetReplicaIdentity {
                schema: branch.schema.clone(),
                table: branch.name.clone(),
                identity: branch.replica_identity.clone(),
            }));
        }

        if main.rls_enabled != branch.rls_enabled {
            changes.push(Change::Table(if branch.rls_enabled {
                TableChange::EnableRowSecurity {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                }
            } else {
                TableChange::DisableRowSecurity {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                }
            }));
        }
        if main.rls_forced != branch.rls_forced {
            changes.push(Change::Table(if branch.rls_forced {
                TableChange::ForceRowSecurity {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                }
            } else {
                TableChange::UnforceRowSecurity {
                    schema: branch.schema.clone(),
                    table: branch.name.clone(),
                }
            }));
        }

        if main.owner != branch.owner {
            changes.push(Change::Table(TableChange::ChangeOwner {
                schema: branch.schema.clone(),
                table: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Table(TableChange::Comment {
                schema: branch.schema.clone(),
                table: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::Table,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}
