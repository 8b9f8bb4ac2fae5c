//! Schema differ

use crate::catalog::schema::Schema;
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, SchemaChange};
use crate::diff::PlanContext;

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.schemas,
        &ctx.branch.schemas,
        Schema::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for schema in parts.created {
        let id = schema.stable_id();
        changes.push(Change::Schema(SchemaChange::Create {
            schema: schema.clone(),
        }));
        if let Some(comment) = &schema.comment {
            changes.push(Change::Schema(SchemaChange::Comment {
                name: schema.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
        changes.extend(ctx.created_acl_changes(
            &id,
            ObjectKind::Schema,
            &schema.owner,
            None,
            &schema.privileges,
        ));
    }

    for schema in parts.dropped {
        changes.push(Change::Schema(SchemaChange::Drop {
            name: schema.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if main.owner != branch.owner {
            changes.push(Change::Schema(SchemaChange::ChangeOwner {
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Schema(SchemaChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::Schema,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}
