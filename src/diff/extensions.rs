//! Extension differ

use crate::catalog::extension::Extension;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, ExtensionChange};
use crate::diff::PlanContext;

pub fn diff(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.extensions,
        &ctx.branch.extensions,
        Extension::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for extension in parts.created {
        changes.push(Change::Extension(ExtensionChange::Create {
            extension: extension.clone(),
        }));
        if let Some(comment) = &extension.comment {
            changes.push(Change::Extension(ExtensionChange::Comment {
                name: extension.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
    }

    for extension in parts.dropped {
        changes.push(Change::Extension(ExtensionChange::Drop {
            name: extension.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if main.schema != branch.schema {
            if let Some(schema) = &branch.schema {
                changes.push(Change::Extension(ExtensionChange::SetSchema {
                    name: branch.name.clone(),
                    schema: schema.clone(),
                }));
            }
        }
        if main.version != branch.version {
            if let Some(version) = &branch.version {
                changes.push(Change::Extension(ExtensionChange::UpdateVersion {
                    name: branch.name.clone(),
                    version: version.clone(),
                }));
            }
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Extension(ExtensionChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}
