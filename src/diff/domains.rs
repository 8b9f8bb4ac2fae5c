//! Domain differ

use crate::catalog::domain::{Domain, DomainConstraint};
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, DomainChange};
use crate::diff::PlanContext;

fn has_non_alterable_changes(main: &Domain, branch: &Domain) -> bool {
    main.base_type != branch.base_type
        || main.base_type_schema != branch.base_type_schema
        || main.collation != branch.collation
}

/// Add one constraint to an existing (or freshly created) domain. A
/// constraint the target considers validated still goes in as NOT VALID
/// first and validates in a second step, so existing rows are checked
/// without holding the stricter lock.
fn add_constraint_changes(domain: &Domain, constraint: &DomainConstraint) -> Vec<Change> {
    let mut staged = constraint.clone();
    staged.validated = false;

    let mut changes = vec![Change::Domain(DomainChange::AddConstraint {
        schema: domain.schema.clone(),
        name: domain.name.clone(),
        constraint: staged,
    })];
    if constraint.validated {
        changes.push(Change::Domain(DomainChange::ValidateConstraint {
            schema: domain.schema.clone(),
            name: domain.name.clone(),
            constraint_name: constraint.name.clone(),
        }));
    }
    changes
}

fn create_changes(ctx: &PlanContext, domain: &Domain) -> Vec<Change> {
    let mut changes = vec![Change::Domain(DomainChange::Create {
        domain: domain.clone(),
    })];

    // Validated constraints ride inline on CREATE; unvalidated ones cannot.
    for constraint in domain.constraints.iter().filter(|c| !c.validated) {
        changes.push(Change::Domain(DomainChange::AddConstraint {
            schema: domain.schema.clone(),
            name: domain.name.clone(),
            constraint: constraint.clone(),
        }));
    }

    if domain.owner != ctx.current_user {
        changes.push(Change::Domain(DomainChange::ChangeOwner {
            schema: domain.schema.clone(),
            name: domain.name.clone(),
            owner: domain.owner.clone(),
        }));
    }
    if let Some(comment) = &domain.comment {
        changes.push(Change::Domain(DomainChange::Comment {
            schema: domain.schema.clone(),
            name: domain.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &domain.stable_id(),
        ObjectKind::Domain,
        &domain.owner,
        Some(&domain.schema),
        &domain.privileges,
    ));
    changes
}

fn constraint_changes(main: &Domain, branch: &Domain) -> Vec<Change> {
    let mut changes = Vec::new();

    for main_constraint in &main.constraints {
        match branch
            .constraints
            .iter()
            .find(|c| c.name == main_constraint.name)
        {
            None => {
                changes.push(Change::Domain(DomainChange::DropConstraint {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                    constraint_name: main_constraint.name.clone(),
                }));
            }
            Some(branch_constraint) if branch_constraint.expression != main_constraint.expression => {
                changes.push(Change::Domain(DomainChange::DropConstraint {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                    constraint_name: main_constraint.name.clone(),
                }));
                changes.extend(add_constraint_changes(branch, branch_constraint));
            }
            Some(branch_constraint) => {
                if branch_constraint.validated && !main_constraint.validated {
                    changes.push(Change::Domain(DomainChange::ValidateConstraint {
                        schema: branch.schema.clone(),
                        name: branch.name.clone(),
                        constraint_name: branch_constraint.name.clone(),
                    }));
                }
            }
        }
    }

    for branch_constraint in &branch.constraints {
        if !main
            .constraints
            .iter()
            .any(|c| c.name == branch_constraint.name)
        {
            if branch_constraint.validated {
                changes.extend(add_constraint_changes(branch, branch_constraint));
            } else {
                changes.push(Change::Domain(DomainChange::AddConstraint {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                    constraint: branch_constraint.clone(),
                }));
            }
        }
    }

    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.domains,
        &ctx.branch.domains,
        Domain::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for domain in parts.created {
        changes.extend(create_changes(ctx, domain));
    }

    for domain in parts.dropped {
        changes.push(Change::Domain(DomainChange::Drop {
            schema: domain.schema.clone(),
            name: domain.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if has_non_alterable_changes(main, branch) {
            changes.push(Change::Domain(DomainChange::Drop {
                schema: main.schema.clone(),
                name: main.name.clone(),
            }));
            changes.extend(create_changes(ctx, branch));
            continue;
        }

        match (&main.default, &branch.default) {
            (None, Some(default)) => {
                changes.push(Change::Domain(DomainChange::SetDefault {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                    default: default.clone(),
                }));
            }
            (Some(_), None) => {
                changes.push(Change::Domain(DomainChange::DropDefault {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                }));
            }
            (Some(old), Some(new)) if old != new => {
                changes.push(Change::Domain(DomainChange::SetDefault {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                    default: new.clone(),
                }));
            }
            _ => {}
        }

        if main.not_null != branch.not_null {
            changes.push(Change::Domain(if branch.not_null {
                DomainChange::SetNotNull {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                }
            } else {
                DomainChange::DropNotNull {
                    schema: branch.schema.clone(),
                    name: branch.name.clone(),
                }
            }));
        }

        changes.extend(constraint_changes(main, branch));

        if main.owner != branch.owner {
            changes.push(Change::Domain(DomainChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Domain(DomainChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::Domain,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}
