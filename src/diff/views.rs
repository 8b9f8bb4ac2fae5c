//! View and materialized-view differ.
//!
//! A plain view's definition changes via `CREATE OR REPLACE VIEW` so
//! dependents survive; materialized views have no OR REPLACE form and go
//! through drop+create.

use crate::catalog::id::ObjectId;
use crate::catalog::view::View;
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, ViewChange};
use crate::diff::PlanContext;
use crate::topo::refs::relation_names;

fn object_kind(view: &View) -> ObjectKind {
    if view.materialized {
        ObjectKind::MaterializedView
    } else {
        ObjectKind::View
    }
}

fn body_dependencies(ctx: &PlanContext, view: &View) -> Vec<ObjectId> {
    let refs = relation_names(&view.definition);
    ctx.resolve_relation_refs(&refs, &view.schema)
        .into_iter()
        .filter(|id| *id != view.stable_id())
        .collect()
}

fn create_changes(ctx: &PlanContext, view: &View) -> Vec<Change> {
    let mut changes = vec![Change::View(ViewChange::Create {
        view: view.clone(),
        depends_on: body_dependencies(ctx, view),
    })];
    if view.owner != ctx.current_user {
        changes.push(Change::View(ViewChange::ChangeOwner {
            schema: view.schema.clone(),
            name: view.name.clone(),
            materialized: view.materialized,
            owner: view.owner.clone(),
        }));
    }
    if let Some(comment) = &view.comment {
        changes.push(Change::View(ViewChange::Comment {
            schema: view.schema.clone(),
            name: view.name.clone(),
            materialized: view.materialized,
            comment: Some(comment.clone()),
        }));
    }
    for column in &view.columns {
        if let Some(comment) = &column.comment {
            changes.push(Change::View(ViewChange::ColumnComment {
                schema: view.schema.clone(),
                name: view.name.clone(),
                materialized: view.materialized,
                column: column.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
    }
    changes.extend(ctx.created_acl_changes(
        &view.stable_id(),
        object_kind(view),
        &view.owner,
        Some(&view.schema),
        &view.privileges,
    ));
    changes
}

fn option_changes(main: &View, branch: &View) -> Vec<Change> {
    let mut set = std::collections::BTreeMap::new();
    let mut reset = Vec::new();

    for (key, value) in &branch.options {
        if main.options.get(key) != Some(value) {
            set.insert(key.clone(), value.clone());
        }
    }
    for key in main.options.keys() {
        if !branch.options.contains_key(key) {
            reset.push(key.clone());
        }
    }

    let mut changes = Vec::new();
    if !set.is_empty() {
        changes.push(Change::View(ViewChange::SetOptions {
            schema: branch.schema.clone(),
            name: branch.name.clone(),
            materialized: branch.materialized,
            options: set,
        }));
    }
    if !reset.is_empty() {
        changes.push(Change::View(ViewChange::ResetOptions {
            schema: branch.schema.clone(),
            name: branch.name.clone(),
            materialized: branch.materialized,
            keys: reset,
        }));
    }
    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.views,
        &ctx.branch.views,
        View::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for view in parts.created {
        changes.extend(create_changes(ctx, view));
    }

    for view in parts.dropped {
        changes.push(Change::View(ViewChange::Drop {
            schema: view.schema.clone(),
            name: view.name.clone(),
            materialized: view.materialized,
        }));
    }

    for (main, branch) in parts.altered {
        if main.definition != branch.definition {
            if branch.materialized {
                changes.push(Change::View(ViewChange::Drop {
                    schema: main.schema.clone(),
                    name: main.name.clone(),
                    materialized: true,
                }));
                changes.extend(create_changes(ctx, branch));
                continue;
            }
            changes.push(Change::View(ViewChange::Replace {
                view: branch.clone(),
                depends_on: body_dependencies(ctx, branch),
            }));
        }

        changes.extend(option_changes(main, branch));

        if main.owner != branch.owner {
            changes.push(Change::View(ViewChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                materialized: branch.materialized,
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::View(ViewChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                materialized: branch.materialized,
                comment,
            }));
        }
        for branch_column in &branch.columns {
            let main_comment = main
                .columns
                .iter()
                .find(|c| c.name == branch_column.name)
                .and_then(|c| c.comment.clone());
            if let Some(comment) = diff_comment(&main_comment, &branch_column.comment) {
                changes.push(Change::View(ViewChange::ColumnComment {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                    materialized: branch.materialized,
                    column: branch_column.name.clone(),
                    comment,
                }));
            }
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            object_kind(branch),
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}
