//! Collation differ. Only the version (REFRESH VERSION) and the owner are
//! alterable; any structural change forces drop+create.

use crate::catalog::collation::Collation;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, CollationChange};
use crate::diff::PlanContext;

fn has_non_alterable_changes(main: &Collation, branch: &Collation) -> bool {
    main.provider != branch.provider
        || main.deterministic != branch.deterministic
        || main.encoding != branch.encoding
        || main.locale != branch.locale
        || main.collate != branch.collate
        || main.ctype != branch.ctype
        || main.icu_rules != branch.icu_rules
}

fn create_changes(ctx: &PlanContext, collation: &Collation) -> Vec<Change> {
    let mut changes = vec![Change::Collation(CollationChange::Create {
        collation: collation.clone(),
    })];
    if collation.owner != ctx.current_user {
        changes.push(Change::Collation(CollationChange::ChangeOwner {
            schema: collation.schema.clone(),
            name: collation.name.clone(),
            owner: collation.owner.clone(),
        }));
    }
    if let Some(comment) = &collation.comment {
        changes.push(Change::Collation(CollationChange::Comment {
            schema: collation.schema.clone(),
            name: collation.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.collations,
        &ctx.branch.collations,
        Collation::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for collation in parts.created {
        changes.extend(create_changes(ctx, collation));
    }

    for collation in parts.dropped {
        changes.push(Change::Collation(CollationChange::Drop {
            schema: collation.schema.clone(),
            name: collation.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if has_non_alterable_changes(main, branch) {
            changes.push(Change::Collation(CollationChange::Drop {
                schema: main.schema.clone(),
                name: main.name.clone(),
            }));
            changes.extend(create_changes(ctx, branch));
            continue;
        }

        if main.version != branch.version {
            changes.push(Change::Collation(CollationChange::RefreshVersion {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
            }));
        }
        if main.owner != branch.owner {
            changes.push(Change::Collation(CollationChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Collation(CollationChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}
