//! SQL rendering for function, procedure and aggregate operations

use crate::catalog::function::{Routine, RoutineKind};
use crate::diff::operations::RoutineChange;
use crate::render::{quote_identifier, quote_qualified, render_comment, SqlRenderer};

fn routine_keyword(kind: RoutineKind) -> &'static str {
    match kind {
        RoutineKind::Function => "FUNCTION",
        RoutineKind::Procedure => "PROCEDURE",
        RoutineKind::Aggregate => "AGGREGATE",
    }
}

fn render_create_routine(routine: &Routine, or_replace: bool) -> String {
    let create = if or_replace {
        "CREATE OR REPLACE"
    } else {
        "CREATE"
    };

    if routine.kind == RoutineKind::Aggregate {
        // Aggregates take an option list instead of a body.
        return format!(
            "{} AGGREGATE {}({}) ({})",
            create,
            quote_qualified(&routine.schema, &routine.name),
            routine.parameters,
            routine.body
        );
    }

    let mut sql = format!(
        "{} {} {}({})",
        create,
        routine_keyword(routine.kind),
        quote_qualified(&routine.schema, &routine.name),
        routine.parameters
    );
    if let Some(returns) = &routine.returns {
        sql.push_str(&format!(" RETURNS {}", returns));
    }
    sql.push_str(&format!(" LANGUAGE {}", routine.language));
    if let Some(volatility) = &routine.volatility {
        sql.push_str(&format!(" {}", volatility));
    }
    if routine.strict {
        sql.push_str(" STRICT");
    }
    if routine.security_definer {
        sql.push_str(" SECURITY DEFINER");
    }
    sql.push_str(&format!(" AS $function${}$function$", routine.body));
    sql
}

impl SqlRenderer for RoutineChange {
    fn serialize(&self) -> String {
        match self {
            RoutineChange::Create { routine, .. } => render_create_routine(routine, false),
            RoutineChange::Replace { routine, .. } => render_create_routine(routine, true),
            RoutineChange::Drop {
                schema,
                name,
                arguments,
                kind,
            } => format!(
                "DROP {} {}({})",
                routine_keyword(*kind),
                quote_qualified(schema, name),
                arguments
            ),
            RoutineChange::ChangeOwner {
                schema,
                name,
                arguments,
                kind,
                owner,
            } => format!(
                "ALTER {} {}({}) OWNER TO {}",
                routine_keyword(*kind),
                quote_qualified(schema, name),
                arguments,
                quote_identifier(owner)
            ),
            RoutineChange::Comment {
                schema,
                name,
                arguments,
                kind,
                comment,
            } => render_comment(
                routine_keyword(*kind),
                &format!("{}({})", quote_qualified(schema, name), arguments),
                comment.as_deref(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine() -> Routine {
        Routine {
            schema: "public".to_string(),
            name: "add".to_string(),
            kind: RoutineKind::Function,
            arguments: "pg_catalog.int4,pg_catalog.int4".to_string(),
            parameters: "a integer, b integer".to_string(),
            returns: Some("integer".to_string()),
            language: "sql".to_string(),
            volatility: Some("IMMUTABLE".to_string()),
            strict: false,
            security_definer: false,
            body: "SELECT a + b".to_string(),
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        }
    }

    #[test]
    fn test_create_function() {
        let op = RoutineChange::Create {
            routine: routine(),
            depends_on: vec![],
        };
        assert_eq!(
            op.serialize(),
            "CREATE FUNCTION public.add(a integer, b integer) RETURNS integer LANGUAGE sql IMMUTABLE AS $function$SELECT a + b$function$"
        );
    }

    #[test]
    fn test_replace_function() {
        let op = RoutineChange::Replace {
            routine: routine(),
            depends_on: vec![],
        };
        assert!(op.serialize().starts_with("CREATE OR REPLACE FUNCTION"));
    }

    #[test]
    fn test_drop_function_with_signature() {
        let op = RoutineChange::Drop {
            schema: "public".to_string(),
            name: "add".to_string(),
            arguments: "pg_catalog.int4,pg_catalog.int4".to_string(),
            kind: RoutineKind::Function,
        };
        assert_eq!(
            op.serialize(),
            "DROP FUNCTION public.add(pg_catalog.int4,pg_catalog.int4)"
        );
    }

    #[test]
    fn test_create_aggregate() {
        let mut agg = routine();
        agg.kind = RoutineKind::Aggregate;
        agg.parameters = "integer".to_string();
        agg.body = "SFUNC = int4pl, STYPE = int4".to_string();
        let op = RoutineChange::Create {
            routine: agg,
            depends_on: vec![],
        };
        assert_eq!(
            op.serialize(),
            "CREATE AGGREGATE public.add(integer) (SFUNC = int4pl, STYPE = int4)"
        );
    }
}
