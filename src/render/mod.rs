//! SQL serialization for change records.
//!
//! Every change serializes to exactly one SQL statement with no terminating
//! semicolon; the plan joins statements with `;\n` and a final `;`.

pub mod collation;
pub mod domain;
pub mod extension;
pub mod foreign_data;
pub mod function;
pub mod index;
pub mod policy;
pub mod privilege;
pub mod publication;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod trigger;
pub mod types;
pub mod view;

use crate::catalog::id::ObjectId;

/// Trait for serializing an operation into its SQL statement.
pub trait SqlRenderer {
    fn serialize(&self) -> String;
}

/// Reserved words that force quoting even when an identifier is otherwise
/// bare-safe. Not exhaustive; covers the words that actually collide with
/// generated DDL positions.
const RESERVED_WORDS: &[&str] = &[
    "all",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "column",
    "constraint",
    "create",
    "current_date",
    "current_role",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "for",
    "foreign",
    "from",
    "grant",
    "group",
    "having",
    "in",
    "initially",
    "intersect",
    "into",
    "leading",
    "limit",
    "localtime",
    "localtimestamp",
    "not",
    "null",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "placing",
    "primary",
    "references",
    "returning",
    "select",
    "session_user",
    "some",
    "symmetric",
    "table",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "when",
    "where",
    "window",
    "with",
];

/// Quote an SQL identifier per the usual rules: bare lowercase identifiers
/// pass through untouched, anything else is double-quoted with embedded
/// quotes doubled. Idempotent on already-quoted input.
pub fn quote_identifier(ident: &str) -> String {
    if ident.len() >= 2 && ident.starts_with('"') && ident.ends_with('"') {
        return ident.to_string();
    }

    let bare_safe = !ident.is_empty()
        && ident
            .chars()
            .next()
            .map(|c| c.is_ascii_lowercase() || c == '_')
            .unwrap_or(false)
        && ident
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&ident);

    if bare_safe {
        ident.to_string()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// Quote a `schema.name` pair.
pub fn quote_qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(name))
}

/// Quote a string literal. Single quotes are doubled; when the string
/// contains backslashes the `E''` escape form is used so the text survives
/// `standard_conforming_strings` either way.
pub fn quote_literal(s: &str) -> String {
    if s.contains('\\') {
        format!("E'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
    } else {
        format!("'{}'", s.replace('\'', "''"))
    }
}

/// `COMMENT ON <kind> <identifier> IS …`; a `None` comment serializes as
/// `IS NULL`, which is how PostgreSQL drops a comment.
pub fn render_comment(object_keyword: &str, identifier: &str, comment: Option<&str>) -> String {
    match comment {
        Some(text) => format!(
            "COMMENT ON {} {} IS {}",
            object_keyword,
            identifier,
            quote_literal(text)
        ),
        None => format!("COMMENT ON {} {} IS NULL", object_keyword, identifier),
    }
}

/// Render an owner change. All `ALTER <kind> <name> OWNER TO <role>` forms
/// share this shape.
pub fn render_change_owner(object_keyword: &str, identifier: &str, owner: &str) -> String {
    format!(
        "ALTER {} {} OWNER TO {}",
        object_keyword,
        identifier,
        quote_identifier(owner)
    )
}

/// Shared identifier rendering for grant/revoke/comment targets keyed by a
/// stable id.
pub fn render_object_identifier(id: &ObjectId) -> String {
    match id {
        ObjectId::Schema { name }
        | ObjectId::Role { name }
        | ObjectId::Language { name }
        | ObjectId::Extension { name }
        | ObjectId::ForeignDataWrapper { name }
        | ObjectId::ForeignServer { name }
        | ObjectId::EventTrigger { name }
        | ObjectId::Publication { name }
        | ObjectId::Subscription { name } => quote_identifier(name),
        ObjectId::Function {
            schema,
            name,
            arguments,
        }
        | ObjectId::Procedure {
            schema,
            name,
            arguments,
        }
        | ObjectId::Aggregate {
            schema,
            name,
            arguments,
        } => format!("{}({})", quote_qualified(schema, name), arguments),
        ObjectId::Trigger {
            schema,
            table,
            name,
        }
        | ObjectId::Policy {
            schema,
            table,
            name,
        } => format!(
            "{} ON {}",
            quote_identifier(name),
            quote_qualified(schema, table)
        ),
        other => {
            let qualified = other.qualified_name();
            match qualified.split_once('.') {
                Some((schema, name)) => quote_qualified(schema, name),
                None => quote_identifier(&qualified),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier_bare() {
        assert_eq!(quote_identifier("users"), "users");
        assert_eq!(quote_identifier("user_accounts_2"), "user_accounts_2");
        assert_eq!(quote_identifier("_private"), "_private");
    }

    #[test]
    fn test_quote_identifier_needs_quotes() {
        assert_eq!(quote_identifier("Users"), "\"Users\"");
        assert_eq!(quote_identifier("my table"), "\"my table\"");
        assert_eq!(quote_identifier("select"), "\"select\"");
        assert_eq!(quote_identifier("1st"), "\"1st\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quote_identifier_idempotent() {
        assert_eq!(quote_identifier("\"Users\""), "\"Users\"");
        assert_eq!(
            quote_identifier(&quote_identifier("My Table")),
            "\"My Table\""
        );
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("note"), "'note'");
        assert_eq!(quote_literal("it's"), "'it''s'");
        assert_eq!(quote_literal("a\\b"), "E'a\\\\b'");
    }

    #[test]
    fn test_render_comment() {
        assert_eq!(
            render_comment("SEQUENCE", "public.s", Some("note")),
            "COMMENT ON SEQUENCE public.s IS 'note'"
        );
        assert_eq!(
            render_comment("SEQUENCE", "public.s", None),
            "COMMENT ON SEQUENCE public.s IS NULL"
        );
    }
}
