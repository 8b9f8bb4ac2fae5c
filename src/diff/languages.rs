//! Procedural-language differ. Trust and the handler triple cannot be
//! altered in place.

use crate::catalog::language::Language;
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, LanguageChange};
use crate::diff::PlanContext;

fn has_non_alterable_changes(main: &Language, branch: &Language) -> bool {
    main.trusted != branch.trusted
        || main.handler != branch.handler
        || main.inline_handler != branch.inline_handler
        || main.validator != branch.validator
}

fn create_changes(ctx: &PlanContext, language: &Language) -> Vec<Change> {
    let mut changes = vec![Change::Language(LanguageChange::Create {
        language: language.clone(),
    })];
    if language.owner != ctx.current_user {
        changes.push(Change::Language(LanguageChange::ChangeOwner {
            name: language.name.clone(),
            owner: language.owner.clone(),
        }));
    }
    if let Some(comment) = &language.comment {
        changes.push(Change::Language(LanguageChange::Comment {
            name: language.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &language.stable_id(),
        ObjectKind::Language,
        &language.owner,
        None,
        &language.privileges,
    ));
    changes
}

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.languages,
        &ctx.branch.languages,
        Language::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for language in parts.created {
        changes.extend(create_changes(ctx, language));
    }

    for language in parts.dropped {
        changes.push(Change::Language(LanguageChange::Drop {
            name: language.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if has_non_alterable_changes(main, branch) {
            changes.push(Change::Language(LanguageChange::Drop {
                name: main.name.clone(),
            }));
            changes.extend(create_changes(ctx, branch));
            continue;
        }

        if main.owner != branch.owner {
            changes.push(Change::Language(LanguageChange::ChangeOwner {
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Language(LanguageChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::Language,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}
