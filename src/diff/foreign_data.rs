//! Foreign-data wrapper and foreign server differs.

use std::collections::BTreeMap;

use crate::catalog::foreign_data::{ForeignDataWrapper, ForeignServer};
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, FdwChange, ForeignServerChange, OptionAction, OptionDelta};
use crate::diff::PlanContext;

/// Diff two OPTIONS maps into the ADD / SET / DROP triple ALTER accepts.
pub fn option_deltas(
    main: &BTreeMap<String, String>,
    branch: &BTreeMap<String, String>,
) -> Vec<OptionDelta> {
    let mut deltas = Vec::new();

    for (key, value) in branch {
        match main.get(key) {
            None => deltas.push(OptionDelta {
                action: OptionAction::Add,
                key: key.clone(),
                value: Some(value.clone()),
            }),
            Some(existing) if existing != value => deltas.push(OptionDelta {
                action: OptionAction::Set,
                key: key.clone(),
                value: Some(value.clone()),
            }),
            Some(_) => {}
        }
    }
    for key in main.keys() {
        if !branch.contains_key(key) {
            deltas.push(OptionDelta {
                action: OptionAction::Drop,
                key: key.clone(),
                value: None,
            });
        }
    }

    deltas
}

fn create_wrapper_changes(ctx: &PlanContext, wrapper: &ForeignDataWrapper) -> Vec<Change> {
    let mut changes = vec![Change::ForeignDataWrapper(FdwChange::Create {
        wrapper: wrapper.clone(),
    })];
    if wrapper.owner != ctx.current_user {
        changes.push(Change::ForeignDataWrapper(FdwChange::ChangeOwner {
            name: wrapper.name.clone(),
            owner: wrapper.owner.clone(),
        }));
    }
    if let Some(comment) = &wrapper.comment {
        changes.push(Change::ForeignDataWrapper(FdwChange::Comment {
            name: wrapper.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &wrapper.stable_id(),
        ObjectKind::ForeignDataWrapper,
        &wrapper.owner,
        None,
        &wrapper.privileges,
    ));
    changes
}

pub fn diff_wrappers(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.foreign_data_wrappers,
        &ctx.branch.foreign_data_wrappers,
        ForeignDataWrapper::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for wrapper in parts.created {
        changes.extend(create_wrapper_changes(ctx, wrapper));
    }

    for wrapper in parts.dropped {
        changes.push(Change::ForeignDataWrapper(FdwChange::Drop {
            name: wrapper.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if main.handler != branch.handler || main.validator != branch.validator {
            changes.push(Change::ForeignDataWrapper(FdwChange::Drop {
                name: main.name.clone(),
            }));
            changes.extend(create_wrapper_changes(ctx, branch));
            continue;
        }

        let deltas = option_deltas(&main.options, &branch.options);
        if !deltas.is_empty() {
            changes.push(Change::ForeignDataWrapper(FdwChange::AlterOptions {
                name: branch.name.clone(),
                options: deltas,
            }));
        }
        if main.owner != branch.owner {
            changes.push(Change::ForeignDataWrapper(FdwChange::ChangeOwner {
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::ForeignDataWrapper(FdwChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::ForeignDataWrapper,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}

fn create_server_changes(ctx: &PlanContext, server: &ForeignServer) -> Vec<Change> {
    let mut changes = vec![Change::ForeignServer(ForeignServerChange::Create {
        server: server.clone(),
    })];
    if server.owner != ctx.current_user {
        changes.push(Change::ForeignServer(ForeignServerChange::ChangeOwner {
            name: server.name.clone(),
            owner: server.owner.clone(),
        }));
    }
    if let Some(comment) = &server.comment {
        changes.push(Change::ForeignServer(ForeignServerChange::Comment {
            name: server.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &server.stable_id(),
        ObjectKind::ForeignServer,
        &server.owner,
        None,
        &server.privileges,
    ));
    changes
}

pub fn diff_servers(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.foreign_servers,
        &ctx.branch.foreign_servers,
        ForeignServer::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for server in parts.created {
        changes.extend(create_server_changes(ctx, server));
    }

    for server in parts.dropped {
        changes.push(Change::ForeignServer(ForeignServerChange::Drop {
            name: server.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if main.wrapper != branch.wrapper || main.server_type != branch.server_type {
            changes.push(Change::ForeignServer(ForeignServerChange::Drop {
                name: main.name.clone(),
            }));
            changes.extend(create_server_changes(ctx, branch));
            continue;
        }

        if main.version != branch.version {
            if let Some(version) = &branch.version {
                changes.push(Change::ForeignServer(ForeignServerChange::SetVersion {
                    name: branch.name.clone(),
                    version: version.clone(),
                }));
            }
        }
        let deltas = option_deltas(&main.options, &branch.options);
        if !deltas.is_empty() {
            changes.push(Change::ForeignServer(ForeignServerChange::AlterOptions {
                name: branch.name.clone(),
                options: deltas,
            }));
        }
        if main.owner != branch.owner {
            changes.push(Change::ForeignServer(ForeignServerChange::ChangeOwner {
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::ForeignServer(ForeignServerChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::ForeignServer,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_deltas() {
        let mut main = BTreeMap::new();
        main.insert("host".to_string(), "a".to_string());
        main.insert("port".to_string(), "5432".to_string());
        let mut branch = BTreeMap::new();
        branch.insert("host".to_string(), "b".to_string());
        branch.insert("sslmode".to_string(), "require".to_string());

        let deltas = option_deltas(&main, &branch);
        assert_eq!(deltas.len(), 3);
        assert!(deltas.iter().any(|d| d.action == OptionAction::Set && d.key == "host"));
        assert!(deltas
            .iter()
            .any(|d| d.action == OptionAction::Add && d.key == "sslmode"));
        assert!(deltas.iter().any(|d| d.action == OptionAction::Drop && d.key == "port"));
    }
}
