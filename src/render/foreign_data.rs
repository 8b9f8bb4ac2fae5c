//! SQL rendering for foreign-data wrapper and foreign server operations

use std::collections::BTreeMap;

use crate::diff::operations::{FdwChange, ForeignServerChange, OptionAction, OptionDelta};
use crate::render::{
    quote_identifier, quote_literal, render_change_owner, render_comment, SqlRenderer,
};

fn render_options_list(options: &BTreeMap<String, String>) -> String {
    options
        .iter()
        .map(|(k, v)| format!("{} {}", k, quote_literal(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the `OPTIONS (ADD …, SET …, DROP …)` clause of an ALTER statement.
pub fn render_option_deltas(deltas: &[OptionDelta]) -> String {
    deltas
        .iter()
        .map(|delta| match delta.action {
            OptionAction::Add => format!(
                "ADD {} {}",
                delta.key,
                quote_literal(delta.value.as_deref().unwrap_or_default())
            ),
            OptionAction::Set => format!(
                "SET {} {}",
                delta.key,
                quote_literal(delta.value.as_deref().unwrap_or_default())
            ),
            OptionAction::Drop => format!("DROP {}", delta.key),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl SqlRenderer for FdwChange {
    fn serialize(&self) -> String {
        match self {
            FdwChange::Create { wrapper } => {
                let mut sql = format!(
                    "CREATE FOREIGN DATA WRAPPER {}",
                    quote_identifier(&wrapper.name)
                );
                if let Some(handler) = &wrapper.handler {
                    sql.push_str(&format!(" HANDLER {}", handler));
                }
                if let Some(validator) = &wrapper.validator {
                    sql.push_str(&format!(" VALIDATOR {}", validator));
                }
                if !wrapper.options.is_empty() {
                    sql.push_str(&format!(
                        " OPTIONS ({})",
                        render_options_list(&wrapper.options)
                    ));
                }
                sql
            }
            FdwChange::Drop { name } => {
                format!("DROP FOREIGN DATA WRAPPER {}", quote_identifier(name))
            }
            FdwChange::AlterOptions { name, options } => format!(
                "ALTER FOREIGN DATA WRAPPER {} OPTIONS ({})",
                quote_identifier(name),
                render_option_deltas(options)
            ),
            FdwChange::ChangeOwner { name, owner } => {
                render_change_owner("FOREIGN DATA WRAPPER", &quote_identifier(name), owner)
            }
            FdwChange::Comment { name, comment } => render_comment(
                "FOREIGN DATA WRAPPER",
                &quote_identifier(name),
                comment.as_deref(),
            ),
        }
    }
}

impl SqlRenderer for ForeignServerChange {
    fn serialize(&self) -> String {
        match self {
            ForeignServerChange::Create { server } => {
                let mut sql = format!("CREATE SERVER {}", quote_identifier(&server.name));
                if let Some(server_type) = &server.server_type {
                    sql.push_str(&format!(" TYPE {}", quote_literal(server_type)));
                }
                if let Some(version) = &server.version {
                    sql.push_str(&format!(" VERSION {}", quote_literal(version)));
                }
                sql.push_str(&format!(
                    " FOREIGN DATA WRAPPER {}",
                    quote_identifier(&server.wrapper)
                ));
                if !server.options.is_empty() {
                    sql.push_str(&format!(
                        " OPTIONS ({})",
                        render_options_list(&server.options)
                    ));
                }
                sql
            }
            ForeignServerChange::Drop { name } => {
                format!("DROP SERVER {}", quote_identifier(name))
            }
            ForeignServerChange::AlterOptions { name, options } => format!(
                "ALTER SERVER {} OPTIONS ({})",
                quote_identifier(name),
                render_option_deltas(options)
            ),
            ForeignServerChange::SetVersion { name, version } => format!(
                "ALTER SERVER {} VERSION {}",
                quote_identifier(name),
                quote_literal(version)
            ),
            ForeignServerChange::ChangeOwner { name, owner } => {
                render_change_owner("SERVER", &quote_identifier(name), owner)
            }
            ForeignServerChange::Comment { name, comment } => {
                render_comment("SERVER", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::foreign_data::ForeignServer;

    #[test]
    fn test_create_server() {
        let mut options = BTreeMap::new();
        options.insert("host".to_string(), "db.internal".to_string());
        options.insert("port".to_string(), "5433".to_string());
        let op = ForeignServerChange::Create {
            server: ForeignServer {
                name: "reports".to_string(),
                wrapper: "postgres_fdw".to_string(),
                server_type: None,
                version: None,
                options,
                owner: "postgres".to_string(),
                comment: None,
                privileges: vec![],
            },
        };
        assert_eq!(
            op.serialize(),
            "CREATE SERVER reports FOREIGN DATA WRAPPER postgres_fdw OPTIONS (host 'db.internal', port '5433')"
        );
    }

    #[test]
    fn test_alter_server_options() {
        let op = ForeignServerChange::AlterOptions {
            name: "reports".to_string(),
            options: vec![
                OptionDelta {
                    action: OptionAction::Set,
                    key: "host".to_string(),
                    value: Some("db2.internal".to_string()),
                },
                OptionDelta {
                    action: OptionAction::Drop,
                    key: "port".to_string(),
                    value: None,
                },
                OptionDelta {
                    action: OptionAction::Add,
                    key: "sslmode".to_string(),
                    value: Some("require".to_string()),
                },
            ],
        };
        assert_eq!(
            op.serialize(),
            "ALTER SERVER reports OPTIONS (SET host 'db2.internal', DROP port, ADD sslmode 'require')"
        );
    }
}
