//! SQL rendering for view and materialized-view operations

use std::collections::BTreeMap;

use crate::catalog::view::View;
use crate::diff::operations::ViewChange;
use crate::render::{
    quote_identifier, quote_qualified, render_change_owner, render_comment, SqlRenderer,
};

fn view_keyword(materialized: bool) -> &'static str {
    if materialized {
        "MATERIALIZED VIEW"
    } else {
        "VIEW"
    }
}

fn render_create(view: &View, or_replace: bool) -> String {
    let create = if or_replace {
        "CREATE OR REPLACE"
    } else {
        "CREATE"
    };
    let mut sql = format!(
        "{} {} {}",
        create,
        view_keyword(view.materialized),
        quote_qualified(&view.schema, &view.name)
    );
    if !view.options.is_empty() {
        let options: Vec<String> = view
            .options
            .iter()
            .map(|(k, v)| format!("{} = {}", k, v))
            .collect();
        sql.push_str(&format!(" WITH ({})", options.join(", ")));
    }
    sql.push_str(&format!(" AS {}", view.definition));
    sql
}

fn render_options(keyword: &str, schema: &str, name: &str, body: String) -> String {
    format!("ALTER {} {} {}", keyword, quote_qualified(schema, name), body)
}

impl SqlRenderer for ViewChange {
    fn serialize(&self) -> String {
        match self {
            ViewChange::Create { view, .. } => render_create(view, false),
            ViewChange::Replace { view, .. } => render_create(view, true),
            ViewChange::Drop {
                schema,
                name,
                materialized,
            } => format!(
                "DROP {} {}",
                view_keyword(*materialized),
                quote_qualified(schema, name)
            ),
            ViewChange::SetOptions {
                schema,
                name,
                materialized,
                options,
            } => {
                let rendered: Vec<String> = options
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                render_options(
                    view_keyword(*materialized),
                    schema,
                    name,
                    format!("SET ({})", rendered.join(", ")),
                )
            }
            ViewChange::ResetOptions {
                schema,
                name,
                materialized,
                keys,
            } => render_options(
                view_keyword(*materialized),
                schema,
                name,
                format!("RESET ({})", keys.join(", ")),
            ),
            ViewChange::ChangeOwner {
                schema,
                name,
                materialized,
                owner,
            } => render_change_owner(
                view_keyword(*materialized),
                &quote_qualified(schema, name),
                owner,
            ),
            ViewChange::Comment {
                schema,
                name,
                materialized,
                comment,
            } => render_comment(
                view_keyword(*materialized),
                &quote_qualified(schema, name),
                comment.as_deref(),
            ),
            ViewChange::ColumnComment {
                schema,
                name,
                column,
                comment,
                ..
            } => {
                let identifier = format!(
                    "{}.{}",
                    quote_qualified(schema, name),
                    quote_identifier(column)
                );
                render_comment("COLUMN", &identifier, comment.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(materialized: bool) -> View {
        View {
            schema: "public".to_string(),
            name: "active_users".to_string(),
            materialized,
            definition: "SELECT id FROM users WHERE active".to_string(),
            options: BTreeMap::new(),
            columns: vec![],
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        }
    }

    #[test]
    fn test_create_view() {
        let op = ViewChange::Create {
            view: view(false),
            depends_on: vec![],
        };
        assert_eq!(
            op.serialize(),
            "CREATE VIEW public.active_users AS SELECT id FROM users WHERE active"
        );
    }

    #[test]
    fn test_replace_view() {
        let op = ViewChange::Replace {
            view: view(false),
            depends_on: vec![],
        };
        assert_eq!(
            op.serialize(),
            "CREATE OR REPLACE VIEW public.active_users AS SELECT id FROM users WHERE active"
        );
    }

    #[test]
    fn test_drop_materialized_view() {
        let op = ViewChange::Drop {
            schema: "public".to_string(),
            name: "active_users".to_string(),
            materialized: true,
        };
        assert_eq!(
            op.serialize(),
            "DROP MATERIALIZED VIEW public.active_users"
        );
    }

    #[test]
    fn test_set_and_reset_options() {
        let mut options = BTreeMap::new();
        options.insert("security_barrier".to_string(), "true".to_string());
        let set = ViewChange::SetOptions {
            schema: "public".to_string(),
            name: "active_users".to_string(),
            materialized: false,
            options,
        };
        assert_eq!(
            set.serialize(),
            "ALTER VIEW public.active_users SET (security_barrier = true)"
        );

        let reset = ViewChange::ResetOptions {
            schema: "public".to_string(),
            name: "active_users".to_string(),
            materialized: false,
            keys: vec!["security_barrier".to_string()],
        };
        assert_eq!(
            reset.serialize(),
            "ALTER VIEW public.active_users RESET (security_barrier)"
        );
    }
}
