//! Enum, composite and range type differs.
//!
//! Enums only grow: labels can be added at any position with
//! `ALTER TYPE … ADD VALUE BEFORE/AFTER`, but removal and reordering have
//! no lossless DDL form and are reported instead of planned.

use crate::catalog::custom_type::{CompositeType, EnumType, RangeType};
use crate::catalog::ObjectKind;
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{
    type_reference, Change, CompositeTypeChange, EnumChange, EnumValuePosition, RangeChange,
};
use crate::diff::{PlanContext, PlanError};

fn enum_create_changes(ctx: &PlanContext, enum_type: &EnumType) -> Vec<Change> {
    let mut changes = vec![Change::Enum(EnumChange::Create {
        enum_type: enum_type.clone(),
    })];
    if enum_type.owner != ctx.current_user {
        changes.push(Change::Enum(EnumChange::ChangeOwner {
            schema: enum_type.schema.clone(),
            name: enum_type.name.clone(),
            owner: enum_type.owner.clone(),
        }));
    }
    if let Some(comment) = &enum_type.comment {
        changes.push(Change::Enum(EnumChange::Comment {
            schema: enum_type.schema.clone(),
            name: enum_type.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &enum_type.stable_id(),
        ObjectKind::Enum,
        &enum_type.owner,
        Some(&enum_type.schema),
        &enum_type.privileges,
    ));
    changes
}

/// Derive ADD VALUE statements with their BEFORE/AFTER placement from the
/// target sort order. Returns `None` when labels were removed or reordered.
fn enum_label_additions(main: &EnumType, branch: &EnumType) -> Option<Vec<EnumChange>> {
    let main_order: Vec<&str> = main.sorted_labels().iter().map(|l| l.name.as_str()).collect();
    let branch_order: Vec<&str> = branch
        .sorted_labels()
        .iter()
        .map(|l| l.name.as_str())
        .collect();

    // Every existing label must survive, in the same relative order.
    let surviving: Vec<&str> = branch_order
        .iter()
        .copied()
        .filter(|name| main_order.contains(name))
        .collect();
    if surviving != main_order {
        return None;
    }

    let mut present: Vec<&str> = main_order.clone();
    let mut additions = Vec::new();

    for (position, label) in branch_order.iter().enumerate() {
        if present.contains(label) {
            continue;
        }

        // Anchor on the nearest neighbor that already exists: the next
        // existing label wins (BEFORE), else the previous one (AFTER).
        let next_existing = branch_order[position + 1..]
            .iter()
            .find(|candidate| present.contains(*candidate));
        let placement = match next_existing {
            Some(next) => EnumValuePosition::Before((*next).to_string()),
            None => match branch_order[..position]
                .iter()
                .rev()
                .find(|candidate| present.contains(*candidate))
            {
                Some(previous) => EnumValuePosition::After((*previous).to_string()),
                None => EnumValuePosition::Last,
            },
        };

        additions.push(EnumChange::AddValue {
            schema: branch.schema.clone(),
            name: branch.name.clone(),
            value: (*label).to_string(),
            position: placement,
        });

        // Later additions may anchor on this one.
        let index = branch_order[..position]
            .iter()
            .filter(|l| present.contains(*l))
            .count();
        present.insert(index, label);
    }

    Some(additions)
}

pub fn diff_enums(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.enums,
        &ctx.branch.enums,
        EnumType::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for enum_type in parts.created {
        changes.extend(enum_create_changes(ctx, enum_type));
    }

    for enum_type in parts.dropped {
        changes.push(Change::Enum(EnumChange::Drop {
            schema: enum_type.schema.clone(),
            name: enum_type.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        match enum_label_additions(main, branch) {
            None => {
                let id = branch.stable_id();
                ctx.report_invariant(PlanError::EnumLabelRemoval { id: id.clone() }, &id);
                continue;
            }
            Some(additions) => {
                changes.extend(additions.into_iter().map(Change::Enum));
            }
        }

        if main.owner != branch.owner {
            changes.push(Change::Enum(EnumChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Enum(EnumChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::Enum,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}

fn composite_attribute_refs(composite: &CompositeType) -> Vec<crate::catalog::id::ObjectId> {
    composite
        .attributes
        .iter()
        .filter_map(|attr| type_reference(&attr.data_type))
        .collect()
}

fn composite_create_changes(ctx: &PlanContext, composite: &CompositeType) -> Vec<Change> {
    let mut changes = vec![Change::CompositeType(CompositeTypeChange::Create {
        composite: composite.clone(),
        depends_on: composite_attribute_refs(composite),
    })];
    if composite.owner != ctx.current_user {
        changes.push(Change::CompositeType(CompositeTypeChange::ChangeOwner {
            schema: composite.schema.clone(),
            name: composite.name.clone(),
            owner: composite.owner.clone(),
        }));
    }
    if let Some(comment) = &composite.comment {
        changes.push(Change::CompositeType(CompositeTypeChange::Comment {
            schema: composite.schema.clone(),
            name: composite.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &composite.stable_id(),
        ObjectKind::CompositeType,
        &composite.owner,
        Some(&composite.schema),
        &composite.privileges,
    ));
    changes
}

pub fn diff_composites(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.composite_types,
        &ctx.branch.composite_types,
        CompositeType::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for composite in parts.created {
        changes.extend(composite_create_changes(ctx, composite));
    }

    for composite in parts.dropped {
        changes.push(Change::CompositeType(CompositeTypeChange::Drop {
            schema: composite.schema.clone(),
            name: composite.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if main.attributes != branch.attributes {
            changes.push(Change::CompositeType(CompositeTypeChange::Drop {
                schema: main.schema.clone(),
                name: main.name.clone(),
            }));
            changes.extend(composite_create_changes(ctx, branch));
            continue;
        }

        if main.owner != branch.owner {
            changes.push(Change::CompositeType(CompositeTypeChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::CompositeType(CompositeTypeChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::CompositeType,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}

fn range_create_changes(ctx: &PlanContext, range: &RangeType) -> Vec<Change> {
    let depends_on = type_reference(&range.subtype).into_iter().collect();
    let mut changes = vec![Change::Range(RangeChange::Create {
        range: range.clone(),
        depends_on,
    })];
    if range.owner != ctx.current_user {
        changes.push(Change::Range(RangeChange::ChangeOwner {
            schema: range.schema.clone(),
            name: range.name.clone(),
            owner: range.owner.clone(),
        }));
    }
    if let Some(comment) = &range.comment {
        changes.push(Change::Range(RangeChange::Comment {
            schema: range.schema.clone(),
            name: range.name.clone(),
            comment: Some(comment.clone()),
        }));
    }
    changes.extend(ctx.created_acl_changes(
        &range.stable_id(),
        ObjectKind::Range,
        &range.owner,
        Some(&range.schema),
        &range.privileges,
    ));
    changes
}

pub fn diff_ranges(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.ranges,
        &ctx.branch.ranges,
        RangeType::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for range in parts.created {
        changes.extend(range_create_changes(ctx, range));
    }

    for range in parts.dropped {
        changes.push(Change::Range(RangeChange::Drop {
            schema: range.schema.clone(),
            name: range.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        let structural = main.subtype != branch.subtype
            || main.subtype_opclass != branch.subtype_opclass
            || main.collation != branch.collation
            || main.canonical != branch.canonical
            || main.subtype_diff != branch.subtype_diff;
        if structural {
            changes.push(Change::Range(RangeChange::Drop {
                schema: main.schema.clone(),
                name: main.name.clone(),
            }));
            changes.extend(range_create_changes(ctx, branch));
            continue;
        }

        if main.owner != branch.owner {
            changes.push(Change::Range(RangeChange::ChangeOwner {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Range(RangeChange::Comment {
                schema: branch.schema.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
        changes.extend(ctx.reconcile_acl(
            &branch.stable_id(),
            ObjectKind::Range,
            &main.privileges,
            &branch.privileges,
            &branch.owner,
        ));
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::custom_type::EnumLabel;

    fn enum_with(labels: &[(&str, f64)]) -> EnumType {
        EnumType {
            schema: "public".to_string(),
            name: "e".to_string(),
            labels: labels
                .iter()
                .map(|(name, order)| EnumLabel {
                    name: name.to_string(),
                    sort_order: *order,
                })
                .collect(),
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        }
    }

    #[test]
    fn test_add_value_in_middle_uses_before() {
        let main = enum_with(&[("a", 1.0), ("c", 3.0)]);
        let branch = enum_with(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let additions = enum_label_additions(&main, &branch).unwrap();
        assert_eq!(additions.len(), 1);
        match &additions[0] {
            EnumChange::AddValue {
                value, position, ..
            } => {
                assert_eq!(value, "b");
                assert_eq!(*position, EnumValuePosition::Before("c".to_string()));
            }
            other => panic!("unexpected change: {:?}", other),
        }
    }

    #[test]
    fn test_append_uses_after() {
        let main = enum_with(&[("a", 1.0), ("b", 2.0)]);
        let branch = enum_with(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let additions = enum_label_additions(&main, &branch).unwrap();
        match &additions[0] {
            EnumChange::AddValue { position, .. } => {
                assert_eq!(*position, EnumValuePosition::After("b".to_string()));
            }
            other => panic!("unexpected change: {:?}", other),
        }
    }

    #[test]
    fn test_consecutive_additions_anchor_on_each_other() {
        let main = enum_with(&[("a", 1.0)]);
        let branch = enum_with(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let additions = enum_label_additions(&main, &branch).unwrap();
        assert_eq!(additions.len(), 2);
        match (&additions[0], &additions[1]) {
            (
                EnumChange::AddValue {
                    value: first,
                    position: first_pos,
                    ..
                },
                EnumChange::AddValue {
                    value: second,
                    position: second_pos,
                    ..
                },
            ) => {
                assert_eq!(first, "b");
                assert_eq!(*first_pos, EnumValuePosition::After("a".to_string()));
                assert_eq!(second, "c");
                assert_eq!(*second_pos, EnumValuePosition::After("b".to_string()));
            }
            other => panic!("unexpected changes: {:?}", other),
        }
    }

    #[test]
    fn test_label_removal_is_rejected() {
        let main = enum_with(&[("a", 1.0), ("b", 2.0)]);
        let branch = enum_with(&[("a", 1.0)]);
        assert!(enum_label_additions(&main, &branch).is_none());
    }

    #[test]
    fn test_label_reorder_is_rejected() {
        let main = enum_with(&[("a", 1.0), ("b", 2.0)]);
        let branch = enum_with(&[("b", 1.0), ("a", 2.0)]);
        assert!(enum_label_additions(&main, &branch).is_none());
    }
}
