//! Index differ. Nothing about an index is alterable except its comment.

use crate::catalog::index::Index;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, IndexChange};
use crate::diff::PlanContext;

fn structurally_equal(a: &Index, b: &Index) -> bool {
    a.table == b.table
        && a.method == b.method
        && a.unique == b.unique
        && a.columns == b.columns
        && a.include == b.include
        && a.predicate == b.predicate
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.indexes,
        &ctx.branch.indexes,
        Index::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for index in parts.created {
        changes.push(Change::Index(IndexChange::Create {
            index: index.clone(),
        }));
        if let Some(comment) = &index.comment {
            changes.push(Change::Index(IndexChange::Comment {
                schema: index.schema.clone(),
                name: index.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
    }

    for index in parts.dropped {
        changes.push(Change::Index(IndexChange::Drop {
            index: index.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if !structurally_equal(main, branch) {
            changes.push(Change::Index(IndexChange::Drop {
                index: main.clone(),
            }));
            changes.push(Change::Index(IndexChange::Create {
                index: branch.clone(),
            }));
            if let Some(comment) = &branch.comment {
                changes.push(Change::Index(IndexChange::Comment {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                    comment: Some(comment.clone()),
                }));
            }
            continue;
        }

        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Index(IndexChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}
