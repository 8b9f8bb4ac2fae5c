//! Trigger and event-trigger differs. Neither has a usable ALTER form for
//! anything the planner models, so any change beyond the comment is
//! drop+create.

use crate::catalog::trigger::{EventTrigger, Trigger};
use crate::diff::comment_utils::diff_comment;
use crate::diff::kernel::partition;
use crate::diff::operations::{Change, EventTriggerChange, TriggerChange};
use crate::diff::PlanContext;

fn trigger_structure_equal(a: &Trigger, b: &Trigger) -> bool {
    a.timing == b.timing
        && a.events == b.events
        && a.for_each_row == b.for_each_row
        && a.condition == b.condition
        && a.function_schema == b.function_schema
        && a.function_name == b.function_name
        && a.function_args == b.function_args
}

pub fn diff_triggers(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.triggers,
        &ctx.branch.triggers,
        Trigger::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for trigger in parts.created {
        changes.push(Change::Trigger(TriggerChange::Create {
            trigger: trigger.clone(),
        }));
        if let Some(comment) = &trigger.comment {
            changes.push(Change::Trigger(TriggerChange::Comment {
                schema: trigger.schema.clone(),
                table: trigger.table.clone(),
                name: trigger.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
    }

    for trigger in parts.dropped {
        changes.push(Change::Trigger(TriggerChange::Drop {
            schema: trigger.schema.clone(),
            table: trigger.table.clone(),
            name: trigger.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if !trigger_structure_equal(main, branch) {
            changes.push(Change::Trigger(TriggerChange::Drop {
                schema: main.schema.clone(),
                table: main.table.clone(),
                name: main.name.clone(),
            }));
            changes.push(Change::Trigger(TriggerChange::Create {
                trigger: branch.clone(),
            }));
            if let Some(comment) = &branch.comment {
                changes.push(Change::Trigger(TriggerChange::Comment {
                    schema: branch.schema.clone(),
                    table: branch.table.clone(),
                    name: branch.name.clone(),
                    comment: Some(comment.clone()),
                }));
            }
            continue;
        }

        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::Trigger(TriggerChange::Comment {
                schema: branch.schema.clone(),
                table: branch.table.clone(),
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}

fn event_trigger_structure_equal(a: &EventTrigger, b: &EventTrigger) -> bool {
    a.event == b.event
        && a.tags == b.tags
        && a.function_schema == b.function_schema
        && a.function_name == b.function_name
}

pub fn diff_event_triggers(ctx: &mut PlanContext) -> Vec<Change> {
    let parts = partition(
        &ctx.main.event_triggers,
        &ctx.branch.event_triggers,
        EventTrigger::stable_id,
        |a, b| a == b,
    );

    let mut changes = Vec::new();

    for event_trigger in parts.created {
        changes.push(Change::EventTrigger(EventTriggerChange::Create {
            event_trigger: event_trigger.clone(),
        }));
        if event_trigger.owner != ctx.current_user {
            changes.push(Change::EventTrigger(EventTriggerChange::ChangeOwner {
                name: event_trigger.name.clone(),
                owner: event_trigger.owner.clone(),
            }));
        }
        if let Some(comment) = &event_trigger.comment {
            changes.push(Change::EventTrigger(EventTriggerChange::Comment {
                name: event_trigger.name.clone(),
                comment: Some(comment.clone()),
            }));
        }
    }

    for event_trigger in parts.dropped {
        changes.push(Change::EventTrigger(EventTriggerChange::Drop {
            name: event_trigger.name.clone(),
        }));
    }

    for (main, branch) in parts.altered {
        if !event_trigger_structure_equal(main, branch) {
            changes.push(Change::EventTrigger(EventTriggerChange::Drop {
                name: main.name.clone(),
            }));
            changes.push(Change::EventTrigger(EventTriggerChange::Create {
                event_trigger: branch.clone(),
            }));
            continue;
        }

        if main.owner != branch.owner {
            changes.push(Change::EventTrigger(EventTriggerChange::ChangeOwner {
                name: branch.name.clone(),
                owner: branch.owner.clone(),
            }));
        }
        if let Some(comment) = diff_comment(&main.comment, &branch.comment) {
            changes.push(Change::EventTrigger(EventTriggerChange::Comment {
                name: branch.name.clone(),
                comment,
            }));
        }
    }

    changes
}
