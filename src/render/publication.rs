//! SQL rendering for publication and subscription operations

use crate::diff::operations::{PublicationChange, SubscriptionChange};
use crate::render::foreign_data::render_option_deltas;
use crate::render::{
    quote_identifier, quote_literal, render_change_owner, render_comment, SqlRenderer,
};

fn render_table_list(tables: &[String]) -> String {
    tables
        .iter()
        .map(|qualified| match qualified.split_once('.') {
            Some((schema, name)) => {
                format!("{}.{}", quote_identifier(schema), quote_identifier(name))
            }
            None => quote_identifier(qualified),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl SqlRenderer for PublicationChange {
    fn serialize(&self) -> String {
        match self {
            PublicationChange::Create { publication } => {
                let mut sql = format!(
                    "CREATE PUBLICATION {}",
                    quote_identifier(&publication.name)
                );
                if publication.all_tables {
                    sql.push_str(" FOR ALL TABLES");
                } else if !publication.tables.is_empty() {
                    sql.push_str(&format!(
                        " FOR TABLE {}",
                        render_table_list(&publication.tables)
                    ));
                }
                if !publication.publish.is_empty() {
                    sql.push_str(&format!(
                        " WITH (publish = {})",
                        quote_literal(&publication.publish.join(", "))
                    ));
                }
                sql
            }
            PublicationChange::Drop { name } => {
                format!("DROP PUBLICATION {}", quote_identifier(name))
            }
            PublicationChange::SetTables { name, tables } => format!(
                "ALTER PUBLICATION {} SET TABLE {}",
                quote_identifier(name),
                render_table_list(tables)
            ),
            PublicationChange::SetPublish { name, publish } => format!(
                "ALTER PUBLICATION {} SET (publish = {})",
                quote_identifier(name),
                quote_literal(&publish.join(", "))
            ),
            PublicationChange::ChangeOwner { name, owner } => {
                render_change_owner("PUBLICATION", &quote_identifier(name), owner)
            }
            PublicationChange::Comment { name, comment } => {
                render_comment("PUBLICATION", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

impl SqlRenderer for SubscriptionChange {
    fn serialize(&self) -> String {
        match self {
            SubscriptionChange::Create { subscription } => {
                let publications: Vec<String> = subscription
                    .publications
                    .iter()
                    .map(|p| quote_identifier(p))
                    .collect();
                let mut sql = format!(
                    "CREATE SUBSCRIPTION {} CONNECTION {} PUBLICATION {}",
                    quote_identifier(&subscription.name),
                    quote_literal(&subscription.connection),
                    publications.join(", ")
                );
                let mut with_items: Vec<String> = subscription
                    .options
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                if !subscription.enabled {
                    with_items.insert(0, "enabled = false".to_string());
                }
                if !with_items.is_empty() {
                    sql.push_str(&format!(" WITH ({})", with_items.join(", ")));
                }
                sql
            }
            SubscriptionChange::Drop { name } => {
                format!("DROP SUBSCRIPTION {}", quote_identifier(name))
            }
            SubscriptionChange::SetConnection { name, connection } => format!(
                "ALTER SUBSCRIPTION {} CONNECTION {}",
                quote_identifier(name),
                quote_literal(connection)
            ),
            SubscriptionChange::SetPublications { name, publications } => {
                let list: Vec<String> =
                    publications.iter().map(|p| quote_identifier(p)).collect();
                format!(
                    "ALTER SUBSCRIPTION {} SET PUBLICATION {}",
                    quote_identifier(name),
                    list.join(", ")
                )
            }
            SubscriptionChange::Enable { name } => {
                format!("ALTER SUBSCRIPTION {} ENABLE", quote_identifier(name))
            }
            SubscriptionChange::Disable { name } => {
                format!("ALTER SUBSCRIPTION {} DISABLE", quote_identifier(name))
            }
            SubscriptionChange::SetOptions { name, options } => format!(
                "ALTER SUBSCRIPTION {} OPTIONS ({})",
                quote_identifier(name),
                render_option_deltas(options)
            ),
            SubscriptionChange::ChangeOwner { name, owner } => {
                render_change_owner("SUBSCRIPTION", &quote_identifier(name), owner)
            }
            SubscriptionChange::Comment { name, comment } => {
                render_comment("SUBSCRIPTION", &quote_identifier(name), comment.as_deref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::publication::Publication;

    #[test]
    fn test_create_publication_for_tables() {
        let op = PublicationChange::Create {
            publication: Publication {
                name: "app_changes".to_string(),
                all_tables: false,
                tables: vec!["public.users".to_string(), "public.orders".to_string()],
                publish: vec!["insert".to_string(), "update".to_string()],
                owner: "postgres".to_string(),
                comment: None,
            },
        };
        assert_eq!(
            op.serialize(),
            "CREATE PUBLICATION app_changes FOR TABLE public.users, public.orders WITH (publish = 'insert, update')"
        );
    }

    #[test]
    fn test_set_publication_tables() {
        let op = PublicationChange::SetTables {
            name: "app_changes".to_string(),
            tables: vec!["public.users".to_string()],
        };
        assert_eq!(
            op.serialize(),
            "ALTER PUBLICATION app_changes SET TABLE public.users"
        );
    }
}
