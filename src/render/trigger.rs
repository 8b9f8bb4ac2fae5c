//! SQL rendering for trigger and event-trigger operations

use crate::diff::operations::{EventTriggerChange, TriggerChange};
use crate::render::{
    quote_identifier, quote_literal, quote_qualified, render_change_owner, render_comment,
    SqlRenderer,
};

impl SqlRenderer for TriggerChange {
    fn serialize(&self) -> String {
        match self {
            TriggerChange::Create { trigger } => {
                let level = if trigger.for_each_row {
                    "FOR EACH ROW"
                } else {
                    "FOR EACH STATEMENT"
                };
                let mut sql = format!(
                    "CREATE TRIGGER {} {} {} ON {} {}",
                    quote_identifier(&trigger.name),
                    trigger.timing,
                    trigger.events.join(" OR "),
                    quote_qualified(&trigger.schema, &trigger.table),
                    level
                );
                if let Some(condition) = &trigger.condition {
                    sql.push_str(&format!(" WHEN ({})", condition));
                }
                let args: Vec<String> = trigger
                    .function_args
                    .iter()
                    .map(|a| quote_literal(a))
                    .collect();
                sql.push_str(&format!(
                    " EXECUTE FUNCTION {}({})",
                    quote_qualified(&trigger.function_schema, &trigger.function_name),
                    args.join(", ")
                ));
                sql
            }
            TriggerChange::Drop {
                schema,
                table,
                name,
            } => format!(
                "DROP TRIGGER {} ON {}",
                quote_identifier(name),
                quote_qualified(schema, table)
            ),
            TriggerChange::Comment {
                schema,
                table,
                name,
                comment,
            } => render_comment(
                "TRIGGER",
                &format!(
                    "{} ON {}",
                    quote_identifier(name),
                    quote_qualified(schema, table)
                ),
                comment.as_deref(),
            ),
        }
    }
}

impl SqlRenderer for EventTriggerChange {
    fn serialize(&self) -> String {
        match self {
            EventTriggerChange::Create { event_trigger } => {
                let mut sql = format!(
                    "CREATE EVENT TRIGGER {} ON {}",
                    quote_identifier(&event_trigger.name),
                    event_trigger.event
                );
                if !event_trigger.tags.is_empty() {
                    let tags: Vec<String> = event_trigger
                        .tags
                        .iter()
                        .map(|t| quote_literal(t))
                        .collect();
                    sql.push_str(&format!(" WHEN TAG IN ({})", tags.join(", ")));
                }
                sql.push_str(&format!(
                    " EXECUTE FUNCTION {}()",
                    quote_qualified(
                        &event_trigger.function_schema,
                        &event_trigger.function_name
                    )
                ));
                sql
            }
            EventTriggerChange::Drop { name } => {
                format!("DROP EVENT TRIGGER {}", quote_identifier(name))
            }
            EventTriggerChange::ChangeOwner { name, owner } => {
                render_change_owner("EVENT TRIGGER", &quote_identifier(name), owner)
            }
            EventTriggerChange::Comment { name, comment } => {
                render_comment("EVENT TRIGGER", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::trigger::Trigger;

    #[test]
    fn test_create_trigger() {
        let op = TriggerChange::Create {
            trigger: Trigger {
                schema: "public".to_string(),
                table: "users".to_string(),
                name: "users_audit".to_string(),
                timing: "AFTER".to_string(),
                events: vec!["INSERT".to_string(), "UPDATE".to_string()],
                for_each_row: true,
                condition: None,
                function_schema: "public".to_string(),
                function_name: "audit_row".to_string(),
                function_args: vec![],
                comment: None,
            },
        };
        assert_eq!(
            op.serialize(),
            "CREATE TRIGGER users_audit AFTER INSERT OR UPDATE ON public.users FOR EACH ROW EXECUTE FUNCTION public.audit_row()"
        );
    }

    #[test]
    fn test_drop_trigger() {
        let op = TriggerChange::Drop {
            schema: "public".to_string(),
            table: "users".to_string(),
            name: "users_audit".to_string(),
        };
        assert_eq!(op.serialize(), "DROP TRIGGER users_audit ON public.users");
    }
}
