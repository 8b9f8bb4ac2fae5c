//! SQL rendering for table operations

use crate::catalog::table::{Column, ConstraintKind, ReplicaIdentity, TableConstraint};
use crate::diff::operations::TableChange;
use crate::render::{
    quote_identifier, quote_qualified, render_change_owner, render_comment, SqlRenderer,
};

fn render_column(column: &Column) -> String {
    let mut sql = format!("{} {}", quote_identifier(&column.name), column.data_type);
    if let Some(collation) = &column.collation {
        sql.push_str(&format!(" COLLATE {}", quote_identifier(collation)));
    }
    if let Some(default) = &column.default {
        sql.push_str(&format!(" DEFAULT {}", default));
    }
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(identity) = &column.identity {
        sql.push_str(&format!(
            " GENERATED {} AS IDENTITY",
            identity.sql_keyword()
        ));
    }
    sql
}

fn render_column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_constraint(constraint: &TableConstraint) -> String {
    let body = match &constraint.kind {
        ConstraintKind::PrimaryKey { columns } => {
            format!("PRIMARY KEY ({})", render_column_list(columns))
        }
        ConstraintKind::Unique { columns } => {
            format!("UNIQUE ({})", render_column_list(columns))
        }
        ConstraintKind::ForeignKey {
            columns,
            references,
        } => {
            let mut sql = format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                render_column_list(columns),
                quote_qualified(&references.schema, &references.table),
                render_column_list(&references.columns)
            );
            if let Some(action) = &references.on_delete {
                sql.push_str(&format!(" ON DELETE {}", action));
            }
            if let Some(action) = &references.on_update {
                sql.push_str(&format!(" ON UPDATE {}", action));
            }
            sql
        }
        ConstraintKind::Check { expression } => expression.clone(),
        ConstraintKind::Exclusion { definition } => definition.clone(),
    };
    format!("CONSTRAINT {} {}", quote_identifier(&constraint.name), body)
}

impl SqlRenderer for TableChange {
    fn serialize(&self) -> String {
        match self {
            TableChange::Create { table } => {
                let mut elements: Vec<String> = table.columns.iter().map(render_column).collect();
                // FK and unvalidated constraints are added post-create so the
                // graph can order them against the referenced keys.
                for constraint in &table.constraints {
                    let inline = constraint.validated
                        && !matches!(constraint.kind, ConstraintKind::ForeignKey { .. });
                    if inline {
                        elements.push(render_constraint(constraint));
                    }
                }
                let unlogged = if table.unlogged { "UNLOGGED " } else { "" };
                let mut sql = format!(
                    "CREATE {}TABLE {} ({})",
                    unlogged,
                    quote_qualified(&table.schema, &table.name),
                    elements.join(", ")
                );
                if let Some(partition_by) = &table.partition_by {
                    sql.push_str(&format!(" PARTITION BY {}", partition_by));
                }
                if !table.storage_options.is_empty() {
                    let options: Vec<String> = table
                        .storage_options
                        .iter()
                        .map(|(k, v)| format!("{} = {}", k, v))
                        .collect();
                    sql.push_str(&format!(" WITH ({})", options.join(", ")));
                }
                sql
            }
            TableChange::Drop { table } => {
                format!(
                    "DROP TABLE {}",
                    quote_qualified(&table.schema, &table.name)
                )
            }
            TableChange::AddColumn {
                schema,
                table,
                column,
            } => format!(
                "ALTER TABLE {} ADD COLUMN {}",
                quote_qualified(schema, table),
                render_column(column)
            ),
            TableChange::DropColumn {
                schema,
                table,
                name,
            } => format!(
                "ALTER TABLE {} DROP COLUMN {}",
                quote_qualified(schema, table),
                quote_identifier(name)
            ),
            TableChange::AlterColumnType {
                schema,
                table,
                name,
                data_type,
                collation,
            } => {
                let mut sql = format!(
                    "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}",
                    quote_qualified(schema, table),
                    quote_identifier(name),
                    data_type
                );
                if let Some(collation) = collation {
                    sql.push_str(&format!(" COLLATE {}", quote_identifier(collation)));
                }
                sql
            }
            TableChange::AlterColumnSetDefault {
                schema,
                table,
                name,
                default,
            } => format!(
                "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT {}",
                quote_qualified(schema, table),
                quote_identifier(name),
                default
            ),
            TableChange::AlterColumnDropDefault {
                schema,
                table,
                name,
            } => format!(
                "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
                quote_qualified(schema, table),
                quote_identifier(name)
            ),
            TableChange::AlterColumnSetNotNull {
                schema,
                table,
                name,
            } => format!(
                "ALTER TABLE {} ALTER COLUMN {} SET NOT NULL",
                quote_qualified(schema, table),
                quote_identifier(name)
            ),
            TableChange::AlterColumnDropNotNull {
                schema,
                table,
                name,
            } => format!(
                "ALTER TABLE {} ALTER COLUMN {} DROP NOT NULL",
                quote_qualified(schema, table),
                quote_identifier(name)
            ),
            TableChange::AlterColumnAddIdentity {
                schema,
                table,
                name,
                identity,
            } => format!(
                "ALTER TABLE {} ALTER COLUMN {} ADD GENERATED {} AS IDENTITY",
                quote_qualified(schema, table),
                quote_identifier(name),
                identity.sql_keyword()
            ),
            TableChange::AlterColumnSetIdentity {
                schema,
                table,
                name,
                identity,
            } => format!(
                "ALTER TABLE {} ALTER COLUMN {} SET GENERATED {}",
                quote_qualified(schema, table),
                quote_identifier(name),
                identity.sql_keyword()
            ),
            TableChange::AlterColumnDropIdentity {
                schema,
                table,
                name,
            } => format!(
                "ALTER TABLE {} ALTER COLUMN {} DROP IDENTITY",
                quote_qualified(schema, table),
                quote_identifier(name)
            ),
            TableChange::AddConstraint {
                schema,
                table,
                constraint,
            } => {
                let mut sql = format!(
                    "ALTER TABLE {} ADD {}",
                    quote_qualified(schema, table),
                    render_constraint(constraint)
                );
                if !constraint.validated {
                    sql.push_str(" NOT VALID");
                }
                sql
            }
            TableChange::DropConstraint {
                schema,
                table,
                name,
                ..
            } => format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                quote_qualified(schema, table),
                quote_identifier(name)
            ),
            TableChange::ValidateConstraint {
                schema,
                table,
                name,
            } => format!(
                "ALTER TABLE {} VALIDATE CONSTRAINT {}",
                quote_qualified(schema, table),
                quote_identifier(name)
            ),
            TableChange::SetStorageOptions {
                schema,
                table,
                options,
            } => {
                let rendered: Vec<String> = options
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                format!(
                    "ALTER TABLE {} SET ({})",
                    quote_qualified(schema, table),
                    rendered.join(", ")
                )
            }
            TableChange::ResetStorageOptions {
                schema,
                table,
                keys,
            } => format!(
                "ALTER TABLE {} RESET ({})",
                quote_qualified(schema, table),
                keys.join(", ")
            ),
            TableChange::SetReplicaIdentity {
                schema,
                table,
                identity,
            } => {
                let clause = match identity {
                    ReplicaIdentity::Default => "DEFAULT".to_string(),
                    ReplicaIdentity::Full => "FULL".to_string(),
                    ReplicaIdentity::Nothing => "NOTHING".to_string(),
                    ReplicaIdentity::Index { name } => {
                        format!("USING INDEX {}", quote_identifier(name))
                    }
                };
                format!(
                    "ALTER TABLE {} REPLICA IDENTITY {}",
                    quote_qualified(schema, table),
                    clause
                )
            }
            TableChange::SetLogged { schema, table } => {
                format!("ALTER TABLE {} SET LOGGED", quote_qualified(schema, table))
            }
            TableChange::SetUnlogged { schema, table } => {
                format!("ALTER TABLE {} SET UNLOGGED", quote_qualified(schema, table))
            }
            TableChange::EnableRowSecurity { schema, table } => format!(
                "ALTER TABLE {} ENABLE ROW LEVEL SECURITY",
                quote_qualified(schema, table)
            ),
            TableChange::DisableRowSecurity { schema, table } => format!(
                "ALTER TABLE {} DISABLE ROW LEVEL SECURITY",
                quote_qualified(schema, table)
            ),
            TableChange::ForceRowSecurity { schema, table } => format!(
                "ALTER TABLE {} FORCE ROW LEVEL SECURITY",
                quote_qualified(schema, table)
            ),
            TableChange::UnforceRowSecurity { schema, table } => format!(
                "ALTER TABLE {} NO FORCE ROW LEVEL SECURITY",
                quote_qualified(schema, table)
            ),
            TableChange::ChangeOwner {
                schema,
                table,
                owner,
            } => render_change_owner("TABLE", &quote_qualified(schema, table), owner),
            TableChange::Comment {
                schema,
                table,
                comment,
            } => render_comment("TABLE", &quote_qualified(schema, table), comment.as_deref()),
            TableChange::ColumnComment {
                schema,
                table,
                column,
                comment,
            } => {
                let identifier = format!(
                    "{}.{}",
                    quote_qualified(schema, table),
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
    use crate::catalog::table::{ColumnIdentity, ForeignKeyRef, Table};
    use std::collections::BTreeMap;

    fn column(name: &str, data_type: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: data_type.to_string(),
            collation: None,
            default: None,
            not_null: false,
            identity: None,
            comment: None,
        }
    }

    #[test]
    fn test_create_table_with_primary_key() {
        let mut id = column("id", "bigint");
        id.not_null = true;
        id.identity = Some(ColumnIdentity::Always);
        let mut name = column("name", "text");
        name.not_null = true;

        let table = Table {
            schema: "public".to_string(),
            name: "users".to_string(),
            unlogged: false,
            partition_by: None,
            columns: vec![id, name],
            constraints: vec![TableConstraint {
                name: "users_pkey".to_string(),
                kind: ConstraintKind::PrimaryKey {
                    columns: vec!["id".to_string()],
                },
                validated: true,
            }],
            storage_options: BTreeMap::new(),
            replica_identity: ReplicaIdentity::Default,
            rls_enabled: false,
            rls_forced: false,
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        };
        let op = TableChange::Create { table };
        assert_eq!(
            op.serialize(),
            "CREATE TABLE public.users (id bigint NOT NULL GENERATED ALWAYS AS IDENTITY, name text NOT NULL, CONSTRAINT users_pkey PRIMARY KEY (id))"
        );
    }

    #[test]
    fn test_foreign_keys_not_inlined() {
        let table = Table {
            schema: "public".to_string(),
            name: "orders".to_string(),
            unlogged: false,
            partition_by: None,
            columns: vec![column("user_id", "bigint")],
            constraints: vec![TableConstraint {
                name: "orders_user_fk".to_string(),
                kind: ConstraintKind::ForeignKey {
                    columns: vec!["user_id".to_string()],
                    references: ForeignKeyRef {
                        schema: "public".to_string(),
                        table: "users".to_string(),
                        columns: vec!["id".to_string()],
                        on_delete: None,
                        on_update: None,
                    },
                },
                validated: true,
            }],
            storage_options: BTreeMap::new(),
            replica_identity: ReplicaIdentity::Default,
            rls_enabled: false,
            rls_forced: false,
            owner: "postgres".to_string(),
            comment: None,
            privileges: vec![],
        };
        let op = TableChange::Create { table };
        assert_eq!(
            op.serialize(),
            "CREATE TABLE public.orders (user_id bigint)"
        );
    }

    #[test]
    fn test_add_foreign_key_with_actions() {
        let op = TableChange::AddConstraint {
            schema: "public".to_string(),
            table: "orders".to_string(),
            constraint: TableConstraint {
                name: "orders_user_fk".to_string(),
                kind: ConstraintKind::ForeignKey {
                    columns: vec!["user_id".to_string()],
                    references: ForeignKeyRef {
                        schema: "public".to_string(),
                        table: "users".to_string(),
                        columns: vec!["id".to_string()],
                        on_delete: Some("CASCADE".to_string()),
                        on_update: None,
                    },
                },
                validated: true,
            },
        };
        assert_eq!(
            op.serialize(),
            "ALTER TABLE public.orders ADD CONSTRAINT orders_user_fk FOREIGN KEY (user_id) REFERENCES public.users (id) ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_column_comment() {
        let op = TableChange::ColumnComment {
            schema: "public".to_string(),
            table: "users".to_string(),
            column: "name".to_string(),
            comment: Some("display name".to_string()),
        };
        assert_eq!(
            op.serialize(),
            "COMMENT ON COLUMN public.users.name IS 'display name'"
        );
    }

    #[test]
    fn test_replica_identity_using_index() {
        let op = TableChange::SetReplicaIdentity {
            schema: "public".to_string(),
            table: "users".to_string(),
            identity: ReplicaIdentity::Index {
                name: "users_pkey".to_string(),
            },
        };
        assert_eq!(
            op.serialize(),
            "ALTER TABLE public.users REPLICA IDENTITY USING INDEX users_pkey"
        );
    }
}
