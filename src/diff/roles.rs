//! Role differ: flag set, connection limit, per-role configuration and
//! memberships. Default privileges are reconciled separately so the
//! projection sees them in emission order.

use std::collections::BTreeSet;

use crate::catalog::role::Role;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, RoleChange};
use crate::diff::PlanContext;

/// Keyword (or NO-keyword) deltas for the alterable flag set.
fn flag_deltas(main: &Role, branch: &Role) -> Vec<String> {
    let mut options = Vec::new();
    let mut flag = |changed: bool, on: bool, keyword: &str| {
        if changed {
            options.push(if on {
                keyword.to_string()
            } else {
                format!("NO{}", keyword)
            });
        }
    };

    flag(main.superuser != branch.superuser, branch.superuser, "SUPERUSER");
    flag(main.createdb != branch.createdb, branch.createdb, "CREATEDB");
    flag(
        main.createrole != branch.createrole,
        branch.createrole,
        "CREATEROLE",
    );
    flag(main.inherit != branch.inherit, branch.inherit, "INHERIT");
    flag(main.login != branch.login, branch.login, "LOGIN");
    flag(
        main.replication != branch.replication,
        branch.replication,
        "REPLICATION",
    );
    flag(
        main.bypassrls != branch.bypassrls,
        branch.bypassrls,
        "BYPASSRLS",
    );

    if main.connection_limit != branch.connection_limit {
        options.push(format!(
            "CONNECTION LIMIT {}",
            branch.connection_limit.unwrap_or(-1)
        ));
    }

    options
}

fn membership_changes(main: &Role, branch: &Role) -> Vec<Change> {
    let main_groups: BTreeSet<_> = main.member_of.iter().collect();
    let branch_groups: BTreeSet<_> = branch.member_of.iter().collect();
    let mut changes = Vec::new();

    for membership in branch_groups.difference(&main_groups) {
        // An admin-option change re-grants; PostgreSQL treats it as
        // additive.
        changes.push(Change::Role(RoleChange::GrantMembership {
            group: membership.role.clone(),
            member: branch.name.clone(),
            admin_option: membership.admin_option,
        }));
    }
    for membership in main_groups.difference(&branch_groups) {
        let still_member = branch
            .member_of
            .iter()
            .any(|m| m.role == membership.role);
        if !still_member {
            changes.push(Change::Role(RoleChange::RevokeMembership {
                group: membership.role.clone(),
                member: branch.name.clone(),
            }));
        }
    }

    changes
}

fn config_changes(main: &Role, branch: &Role) -> Vec<Change> {
    let mut changes = Vec::new();

    if !main.config.is_empty() && branch.config.is_empty() {
        changes.push(Change::Role(RoleChange::ResetAllConfig {
            name: branch.name.clone(),
        }));
        return changes;
    }

    for (key, value) in &branch.config {
        if main.config.get(key) != Some(value) {
            changes.push(Change::Role(RoleChange::SetConfig {
                name: branch.name.clone(),
                key: key.clone(),
                value: value.clone(),
            }));
        }
    }
    for key in main.config.keys() {
        if !branch.config.contains_key(key) {
            changes.push(Change::Role(RoleChange::ResetConfig {
                name: branch.name.clone(),
                key: key.clone(),
            }));
        }
    }

    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.roles,
        &ctx.branch.roles,
        Role::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for role in parts.created {
        changes.push(Change::Role(RoleChange::Create { role: role.clone() }));
        for (key, value) in &role.config {
            changes.push(Change::Role(RoleChange::SetConfig {
                name: role.name.clone(),
                key: key.clone(),
                value: value.clone(),
            }));
        }
        for membership in &role.member_of {
            changes.push(Change::Role(RoleChange::GrantMembership {
                group: membership.role.clone(),
                member: role.name.clone(),
                admin_option: membership.admin_option,
            }));
        }
        if let Some(comment) = &role.comment {
            changes.push(Change::Role(RoleChange::Comment {
                name: role.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
    }

    for role in parts.dropped {
        changes.push(Change::Role(RoleChange::Drop {
            name: role.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        let options = flag_deltas(main, branch);
        if !options.is_empty() {
            changes.push(Change::Role(RoleChange::SetOptions {
                name: branch.name.clone(),
                options,
            }));
        }
        changes.extend(config_changes(main, branch));
        changes.extend(membership_changes(main, branch));
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Role(RoleChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}
