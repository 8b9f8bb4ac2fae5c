//! SQL rendering for index operations

use crate::diff::operations::IndexChange;
use crate::render::{quote_identifier, quote_qualified, render_comment, SqlRenderer};

impl SqlRenderer for IndexChange {
    fn serialize(&self) -> String {
        match self {
            IndexChange::Create { index } => {
                let unique = if index.unique { "UNIQUE " } else { "" };
                let columns: Vec<String> = index
                    .columns
                    .iter()
                    .map(|c| {
                        // Expressions arrive pre-parenthesized from extraction;
                        // plain column names get identifier quoting.
                        if c.contains('(') || c.contains(' ') {
                            c.clone()
                        } else {
                            quote_identifier(c)
                        }
                    })
                    .collect();
                let mut sql = format!(
                    "CREATE {}INDEX {} ON {} USING {} ({})",
                    unique,
                    quote_identifier(&index.name),
                    quote_qualified(&index.schema, &index.table),
                    index.method,
                    columns.join(", ")
                );
                if !index.include.is_empty() {
                    let include: Vec<String> =
                        index.include.iter().map(|c| quote_identifier(c)).collect();
                    sql.push_str(&format!(" INCLUDE ({})", include.join(", ")));
                }
                if let Some(predicate) = &index.predicate {
                    sql.push_str(&format!(" WHERE {}", predicate));
                }
                sql
            }
            IndexChange::Drop { index } => format!(
                "DROP INDEX {}",
                quote_qualified(&index.schema, &index.name)
            ),
            IndexChange::Comment {
                schema,
                name,
                comment,
            } => render_comment("INDEX", &quote_qualified(schema, name), comment.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::index::Index;

    fn index() -> Index {
        Index {
            schema: "public".to_string(),
            name: "users_email_idx".to_string(),
            table: "users".to_string(),
            method: "btree".to_string(),
            unique: true,
            columns: vec!["email".to_string()],
            include: vec![],
            predicate: None,
            comment: None,
        }
    }

    #[test]
    fn test_create_unique_index() {
        let op = IndexChange::Create { index: index() };
        assert_eq!(
            op.serialize(),
            "CREATE UNIQUE INDEX users_email_idx ON public.users USING btree (email)"
        );
    }

    #[test]
    fn test_partial_index() {
        let mut idx = index();
        idx.unique = false;
        idx.predicate = Some("(deleted_at IS NULL)".to_string());
        let op = IndexChange::Create { index: idx };
        assert_eq!(
            op.serialize(),
            "CREATE INDEX users_email_idx ON public.users USING btree (email) WHERE (deleted_at IS NULL)"
        );
    }

    #[test]
    fn test_drop_index() {
        let op = IndexChange::Drop { index: index() };
        assert_eq!(op.serialize(), "DROP INDEX public.users_email_idx");
    }
}
