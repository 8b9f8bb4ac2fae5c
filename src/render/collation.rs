//! SQL rendering for collation operations

use crate::diff::operations::CollationChange;
use crate::render::{
    quote_literal, quote_qualified, render_change_owner, render_comment, SqlRenderer,
};

impl SqlRenderer for CollationChange {
    fn serialize(&self) -> String {
        match self {
            CollationChange::Create { collation } => {
                let mut parts = vec![format!("provider = {}", collation.provider.sql_keyword())];
                if let Some(locale) = &collation.locale {
                    parts.push(format!("locale = {}", quote_literal(locale)));
                }
                if let Some(collate) = &collation.collate {
                    parts.push(format!("lc_collate = {}", quote_literal(collate)));
                }
                if let Some(ctype) = &collation.ctype {
                    parts.push(format!("lc_ctype = {}", quote_literal(ctype)));
                }
                if let Some(rules) = &collation.icu_rules {
                    parts.push(format!("rules = {}", quote_literal(rules)));
                }
                if !collation.deterministic {
                    parts.push("deterministic = false".to_string());
                }
                format!(
                    "CREATE COLLATION {} ({})",
                    quote_qualified(&collation.schema, &collation.name),
                    parts.join(", ")
                )
            }
            CollationChange::Drop { schema, name } => {
                format!("DROP COLLATION {}", quote_qualified(schema, name))
            }
            CollationChange::RefreshVersion { schema, name } => format!(
                "ALTER COLLATION {} REFRESH VERSION",
                quote_qualified(schema, name)
            ),
            CollationChange::ChangeOwner {
                schema,
                name,
                owner,
            } => render_change_owner("COLLATION", &quote_qualified(schema, name), owner),
            CollationChange::Comment {
                schema,
                name,
                comment,
            } => render_comment("COLLATION", &quote_qualified(schema, name), comment.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::collation::{Collation, CollationProvider};

    #[test]
    fn test_create_collation_icu() {
        let op = CollationChange::Create {
            collation: Collation {
                schema: "public".to_string(),
                name: "german".to_string(),
                provider: CollationProvider::Icu,
                deterministic: true,
                encoding: None,
                locale: Some("de-DE".to_string()),
                collate: None,
                ctype: None,
                icu_rules: None,
                version: None,
                owner: "postgres".to_string(),
                comment: None,
            },
        };
        assert_eq!(
            op.serialize(),
            "CREATE COLLATION public.german (provider = icu, locale = 'de-DE')"
        );
    }

    #[test]
    fn test_refresh_version() {
        let op = CollationChange::RefreshVersion {
            schema: "public".to_string(),
            name: "german".to_string(),
        };
        assert_eq!(
            op.serialize(),
            "ALTER COLLATION public.german REFRESH VERSION"
        );
    }
}
