//! Row-level security policy differ. The command and the permissive flag
//! have no ALTER form; roles, USING and WITH CHECK do.

use crate::catalog::policy::Policy;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, PolicyChange};
use crate::diff::PlanContext;

fn has_non_alterable_changes(main: &Policy, branch: &Policy) -> bool {
    main.command != branch.command || main.permissive != branch.permissive
}

fn create_changes(policy: &Policy) -> Vec<Change> {
    let mut changes = vec![Change::Policy(PolicyChange::Create {
        policy: policy.clone(),
    })];
    if let Some(comment) = &policy.comment {
        changes.push(Change::Policy(PolicyChange::Comment {
            schema: policy.schema.clone(),
            table: policy.table.clone(),
            name: policy.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.policies,
        &ctx.branch.policies,
        Policy::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for policy in parts.created {
        changes.extend(create_changes(policy));
    }

    for policy in parts.dropped {
        changes.push(Change::Policy(PolicyChange::Drop {
            schema: policy.schema.clone(),
            table: policy.table.clone(),
            name: policy.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if has_non_alterable_changes(main, branch) {
            changes.push(Change::Policy(PolicyChange::Drop {
                schema: main.schema.clone(),
                table: main.table.clone(),
                name: main.name.clone(),
            }));
            changes.extend(create_changes(branch));
            continue;
        }

        let set_roles = main.roles != branch.roles;
        let set_using = main.using_expr != branch.using_expr;
        let set_check = main.with_check_expr != branch.with_check_expr;
        if set_roles || set_using || set_check {
            changes.push(Change::Policy(PolicyChange::Alter {
                policy: branch.clone(),
                set_roles,
                set_using,
                set_check,
            }));
        }

        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Policy(PolicyChange::Comment {
                schema: branch.schema.clone(),
                table: branch.table.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}
