//! Sequence differ.
//!
//! One suppression rule matters here: a sequence whose owning table is
//! dropped in the same plan disappears with it (PostgreSQL follows the
//! OWNED BY dependency), so emitting DROP SEQUENCE would fail at run time.

use crate::catalog::sequence::Sequence;
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, SequenceChange, SequenceOptionClause};
use crate::diff::PlanContext;

fn has_non_alterable_changes(main: &Sequence, branch: &Sequence) -> bool {
    main.data_type != branch.data_type || main.unlogged != branch.unlogged
}

fn create_changes(ctx: &PlanContext, sequence: &Sequence) -> Vec<Change> {
    let mut changes = vec![Change::Sequence(SequenceChange::Create {
        sequence: sequence.clone(),
    })];
    if let Some(owned_by) = &sequence.owned_by {
        changes.push(Change::Sequence(SequenceChange::OwnedBy {
            schema: sequence.schema.clone(),
            name: sequence.name.clone(),
            owned_by: Some(owned_by.clone()),
        }));
    }
    if sequence.owner != ctx.current_user {
        changes.push(Change::Sequence(SequenceChange::ChangeOwner {
            schema: sequence.schema.clone(),
            name: sequence.name.clone(),
            owner: sequence.owner.clone(),
        }));
    }
    if let Some(comment) = &sequence.comment {
        changes.push(Change::Sequence(SequenceChange::Comment {
            schema: sequence.schema.clone(),
            name: sequence.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &sequence.stable_id(),
        ObjectKind::Sequence,
        &sequence.owner,
        Some(&sequence.schema),
        &sequence.privileges,
    ));
    changes
}

/// The single ALTER SEQUENCE statement covering every changed option, with
/// clauses in canonical order.
fn option_clauses(main: &Sequence, branch: &Sequence) -> Vec<SequenceOptionClause> {
    let mut clauses = Vec::new();
    if main.increment != branch.increment {
        clauses.push(SequenceOptionClause::Increment(branch.increment));
    }
    if main.min_value != branch.min_value {
        clauses.push(SequenceOptionClause::MinValue(branch.min_value));
    }
    if main.max_value != branch.max_value {
        clauses.push(SequenceOptionClause::MaxValue(branch.max_value));
    }
    if main.start_value != branch.start_value {
        clauses.push(SequenceOptionClause::Start(branch.start_value));
    }
    if main.cache != branch.cache {
        clauses.push(SequenceOptionClause::Cache(branch.cache));
    }
    if main.cycle != branch.cycle {
        clauses.push(SequenceOptionClause::Cycle(branch.cycle));
    }
    clauses
}

/// True when the sequence's owning table is itself dropped by this plan.
fn owning_table_dropped(ctx: &PlanContext, sequence: &Sequence) -> bool {
    match &sequence.owned_by {
        Some(owner) => {
            ctx.main.find_table(&owner.schema, &owner.table).is_some()
                && ctx.branch.find_table(&owner.schema, &owner.table).is_none()
        }
        None => false,
    }
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.sequences,
        &ctx.branch.sequences,
        Sequence::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for sequence in parts.created {
        changes.extend(create_changes(ctx, sequence));
    }

    for sequence in parts.dropped {
        if owning_table_dropped(ctx, sequence) {
            continue;
        }
        changes.push(Change::Sequence(SequenceChange::Drop {
            schema: sequence.schema.clone(),
            name: sequence.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if has_non_alterable_changes(main, branch) {
            changes.push(Change::Sequence(SequenceChange::Drop {
                schema: main.schema.clone(),
                name: main.name.clone(),
            }));
            changes.extend(create_changes(ctx, branch));
            continue;
        }

        let clauses = option_clauses(main, branch);
        if !clauses.is_empty() {
            changes.push(Change::Sequence(SequenceChange::SetOptions {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                options: clauses,
            }));
        }
        if main.owned_by != branch.owned_by {
            changes.push(Change::Sequence(SequenceChange::OwnedBy {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                owned_by: branch.owned_by.clone(),
            }));
        }
        if main.owner != branch.owner {
            changes.push(Change::Sequence(SequenceChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Sequence(SequenceChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::Sequence,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}
