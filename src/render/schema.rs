//! SQL rendering for schema operations

use crate::diff::operations::SchemaChange;
use crate::render::{quote_identifier, render_comment, SqlRenderer};

impl SqlRenderer for SchemaChange {
    fn serialize(&self) -> String {
        match self {
            SchemaChange::Create { schema } => {
                format!(
                    "CREATE SCHEMA {} AUTHORIZATION {}",
                    quote_identifier(&schema.name),
                    quote_identifier(&schema.owner)
                )
            }
            SchemaChange::Drop { name } => format!("DROP SCHEMA {}", quote_identifier(name)),
            SchemaChange::ChangeOwner { name, owner } => format!(
                "ALTER SCHEMA {} OWNER TO {}",
                quote_identifier(name),
                quote_identifier(owner)
            ),
            SchemaChange::Comment { name, comment } => {
                render_comment("SCHEMA", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::Schema;

    #[test]
    fn test_create_schema() {
        let op = SchemaChange::Create {
            schema: Schema {
                name: "analytics".to_string(),
                owner: "app_owner".to_string(),
                comment: None,
                privileges: vec![],
            },
        };
        assert_eq!(
            op.serialize(),
            "CREATE SCHEMA analytics AUTHORIZATION app_owner"
        );
    }

    #[test]
    fn test_drop_schema() {
        let op = SchemaChange::Drop {
            name: "old_schema".to_string(),
        };
        assert_eq!(op.serialize(), "DROP SCHEMA old_schema");
    }

    #[test]
    fn test_schema_comment_null() {
        let op = SchemaChange::Comment {
            name: "analytics".to_string(),
            comment: None,
        };
        assert_eq!(op.serialize(), "COMMENT ON SCHEMA analytics IS NULL");
    }
}
