//! SQL rendering for extension and language operations

use crate::diff::operations::{ExtensionChange, LanguageChange};
use crate::render::{
    quote_identifier, quote_literal, render_change_owner, render_comment, SqlRenderer,
};

impl SqlRenderer for ExtensionChange {
    fn serialize(&self) -> String {
        match self {
            ExtensionChange::Create { extension } => {
                let mut sql = format!("CREATE EXTENSION {}", quote_identifier(&extension.name));
                if let Some(schema) = &extension.schema {
                    sql.push_str(&format!(" SCHEMA {}", quote_identifier(schema)));
                }
                if let Some(version) = &extension.version {
                    sql.push_str(&format!(" VERSION {}", quote_literal(version)));
                }
                sql
            }
            ExtensionChange::Drop { name } => {
                format!("DROP EXTENSION {}", quote_identifier(name))
            }
            ExtensionChange::UpdateVersion { name, version } => format!(
                "ALTER EXTENSION {} UPDATE TO {}",
                quote_identifier(name),
                quote_literal(version)
            ),
            ExtensionChange::SetSchema { name, schema } => format!(
                "ALTER EXTENSION {} SET SCHEMA {}",
                quote_identifier(name),
                quote_identifier(schema)
            ),
            ExtensionChange::Comment { name, comment } => {
                render_comment("EXTENSION", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

impl SqlRenderer for LanguageChange {
    fn serialize(&self) -> String {
        match self {
            LanguageChange::Create { language } => {
                let trusted = if language.trusted { "TRUSTED " } else { "" };
                let mut sql = format!(
                    "CREATE {}LANGUAGE {}",
                    trusted,
                    quote_identifier(&language.name)
                );
                if let Some(handler) = &language.handler {
                    sql.push_str(&format!(" HANDLER {}", handler));
                }
                if let Some(inline) = &language.inline_handler {
                    sql.push_str(&format!(" INLINE {}", inline));
                }
                if let Some(validator) = &language.validator {
                    sql.push_str(&format!(" VALIDATOR {}", validator));
                }
                sql
            }
            LanguageChange::Drop { name } => format!("DROP LANGUAGE {}", quote_identifier(name)),
            LanguageChange::ChangeOwner { name, owner } => {
                render_change_owner("LANGUAGE", &quote_identifier(name), owner)
            }
            LanguageChange::Comment { name, comment } => {
                render_comment("LANGUAGE", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::extension::Extension;

    #[test]
    fn test_create_extension_with_schema() {
        let op = ExtensionChange::Create {
            extension: Extension {
                name: "pgcrypto".to_string(),
                schema: Some("extensions".to_string()),
                version: None,
                comment: None,
            },
        };
        assert_eq!(
            op.serialize(),
            "CREATE EXTENSION pgcrypto SCHEMA extensions"
        );
    }

    #[test]
    fn test_update_version() {
        let op = ExtensionChange::UpdateVersion {
            name: "postgis".to_string(),
            version: "3.4".to_string(),
        };
        assert_eq!(op.serialize(), "ALTER EXTENSION postgis UPDATE TO '3.4'");
    }
}
