//! Function, procedure and aggregate differ.
//!
//! Functions and procedures change definition via `CREATE OR REPLACE`; a
//! changed return clause cannot (PostgreSQL rejects it), so that forces
//! drop+create. Aggregates have no OR REPLACE at all.

use crate::catalog::function::{Routine, RoutineKind};
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, RoutineChange};
use crate::diff::PlanContext;
use crate::topo::refs::relation_names;

fn body_dependencies(ctx: &PlanContext, routine: &Routine) -> Vec<crate::catalog::id::ObjectId> {
    // SQL-language bodies read relations the plan may also be creating.
    if routine.language == "sql" || routine.language == "plpgsql" {
        ctx.resolve_relation_refs(&relation_names(&routine.body), &routine.schema)
    } else {
        Vec::new()
    }
}

fn requires_drop_create(main: &Routine, branch: &Routine) -> bool {
    branch.kind == RoutineKind::Aggregate
        || main.returns != branch.returns
        || main.parameters != branch.parameters
}

fn definition_changed(main: &Routine, branch: &Routine) -> bool {
    main.body != branch.body
        || main.language != branch.language
        || main.volatility != branch.volatility
        || main.strict != branch.strict
        || main.security_definer != branch.security_definer
}

fn create_changes(ctx: &PlanContext, routine: &Routine) -> Vec<Change> {
    let mut changes = vec![Change::Routine(RoutineChange::Create {
        routine: routine.clone(),
        depends_on: body_dependencies(ctx, routine),
    })];
    if routine.owner != ctx.current_user {
        changes.push(Change::Routine(RoutineChange::ChangeOwner {
            schema: routine.schema.clone(),
            name: routine.name.clone(),
            arguments: routine.arguments.clone(),
            kind: routine.kind,
            owner: routine.owner.clone(),
        }));
    }
    if let Some(comment) = &routine.comment {
        changes.push(Change::Routine(RoutineChange::Comment {
            schema: routine.schema.clone(),
            name: routine.name.clone(),
            arguments: routine.arguments.clone(),
            kind: routine.kind,
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &routine.stable_id(),
        routine.object_kind(),
        &routine.owner,
        Some(&routine.schema),
        &routine.privileges,
    ));
    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.routines,
        &ctx.branch.routines,
        Routine::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for routine in parts.created {
        changes.extend(create_changes(ctx, routine));
    }

    for routine in parts.dropped {
        changes.push(Change::Routine(RoutineChange::Drop {
            schema: routine.schema.clone(),
            name: routine.name.clone(),
            arguments: routine.arguments.clone(),
            kind: routine.kind,
        }));
    }

    for (main, branch) in parts.altered {
        if definition_changed(main, branch) {
            if requires_drop_create(main, branch) {
                changes.push(Change::Routine(RoutineChange::Drop {
                    schema: main.schema.clone(),
                    name: main.name.clone(),
                    arguments: main.arguments.clone(),
                    kind: main.kind,
                }));
                changes.extend(create_changes(ctx, branch));
                continue;
            }
            changes.push(Change::Routine(RoutineChange::Replace {
                routine: branch.clone(),
                depends_on: body_dependencies(ctx, branch),
            }));
        } else if requires_drop_create(main, branch) {
            // Return or parameter spelling changed with an identical body.
            changes.push(Change::Routine(RoutineChange::Drop {
                schema: main.schema.clone(),
                name: main.name.clone(),
                arguments: main.arguments.clone(),
                kind: main.kind,
            }));
            changes.extend(create_changes(ctx, branch));
            continue;
        }

        if main.owner != branch.owner {
            changes.push(Change::Routine(RoutineChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                arguments: branch.arguments.clone(),
                kind: branch.kind,
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Routine(RoutineChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                arguments: branch.arguments.clone(),
                kind: branch.kind,
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            branch.object_kind(),
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}
