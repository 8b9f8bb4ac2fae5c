//! Table operations

use std::collections::BTreeMap;

use crate::catalog::id::ObjectId;
use crate::catalog::table::{
    Column, ColumnIdentity, ConstraintKind, ReplicaIdentity, Table, TableConstraint,
};
use crate::catalog::ObjectKind;

use super::{type_reference, ChangeScope};

#[derive(Debug, Clone)]
pub enum TableChange {
    /// Creates the table with its columns and every validated primary-key,
    /// unique and check constraint inline. Foreign keys and unvalidated
    /// constraints arrive as separate `AddConstraint` changes so the graph
    /// can order them after the referenced key exists.
    Create {
        table: Table,
    },
    Drop {
        table: Table,
    },
    AddColumn {
        schema: String,
        table: String,
        column: Column,
    },
    DropColumn {
        schema: String,
        table: String,
        name: String,
    },
    AlterColumnType {
        schema: String,
        table: String,
        name: String,
        data_type: String,
        collation: Option<String>,
    },
    AlterColumnSetDefault {
        schema: String,
        table: String,
        name: String,
        default: String,
    },
    AlterColumnDropDefault {
        schema: String,
        table: String,
        name: String,
    },
    AlterColumnSetNotNull {
        schema: String,
        table: String,
        name: String,
    },
    AlterColumnDropNotNull {
        schema: String,
        table: String,
        name: String,
    },
    AlterColumnAddIdentity {
        schema: String,
        table: String,
        name: String,
        identity: ColumnIdentity,
    },
    AlterColumnSetIdentity {
        schema: String,
        table: String,
        name: String,
        identity: ColumnIdentity,
    },
    AlterColumnDropIdentity {
        schema: String,
        table: String,
        name: String,
    },
    AddConstraint {
        schema: String,
        table: String,
        constraint: TableConstraint,
    },
    DropConstraint {
        schema: String,
        table: String,
        name: String,
        /// Key columns of a dropped PRIMARY KEY/UNIQUE constraint, so the
        /// `key:` id it provided is recorded as dropped.
        key_columns: Option<Vec<String>>,
    },
    ValidateConstraint {
        schema: String,
        table: String,
        name: String,
    },
    SetStorageOptions {
        schema: String,
        table: String,
        options: BTreeMap<String, String>,
    },
    ResetStorageOptions {
        schema: String,
        table: String,
        keys: Vec<String>,
    },
    SetReplicaIdentity {
        schema: String,
        table: String,
        identity: ReplicaIdentity,
    },
    SetLogged {
        schema: String,
        table: String,
    },
    SetUnlogged {
        schema: String,
        table: String,
    },
    EnableRowSecurity {
        schema: String,
        table: String,
    },
    DisableRowSecurity {
        schema: String,
        table: String,
    },
    ForceRowSecurity {
        schema: String,
        table: String,
    },
    UnforceRowSecurity {
        schema: String,
        table: String,
    },
    ChangeOwner {
        schema: String,
        table: String,
        owner: String,
    },
    Comment {
        schema: String,
        table: String,
        comment: Option<String>,
    },
    ColumnComment {
        schema: String,
        table: String,
        column: String,
        comment: Option<String>,
    },
}

impl TableChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            TableChange::Create { table } | TableChange::Drop { table } => table.stable_id(),
            TableChange::AddColumn { schema, table, .. }
            | TableChange::DropColumn { schema, table, .. }
            | TableChange::AlterColumnType { schema, table, .. }
            | TableChange::AlterColumnSetDefault { schema, table, .. }
            | TableChange::AlterColumnDropDefault { schema, table, .. }
            | TableChange::AlterColumnSetNotNull { schema, table, .. }
            | TableChange::AlterColumnDropNotNull { schema, table, .. }
            | TableChange::AlterColumnAddIdentity { schema, table, .. }
            | TableChange::AlterColumnSetIdentity { schema, table, .. }
            | TableChange::AlterColumnDropIdentity { schema, table, .. }
            | TableChange::AddConstraint { schema, table, .. }
            | TableChange::DropConstraint { schema, table, .. }
            | TableChange::ValidateConstraint { schema, table, .. }
            | TableChange::SetStorageOptions { schema, table, .. }
            | TableChange::ResetStorageOptions { schema, table, .. }
            | TableChange::SetReplicaIdentity { schema, table, .. }
            | TableChange::SetLogged { schema, table }
            | TableChange::SetUnlogged { schema, table }
            | TableChange::EnableRowSecurity { schema, table }
            | TableChange::DisableRowSecurity { schema, table }
            | TableChange::ForceRowSecurity { schema, table }
            | TableChange::UnforceRowSecurity { schema, table }
            | TableChange::ChangeOwner { schema, table, .. }
            | TableChange::Comment { schema, table, .. }
            | TableChange::ColumnComment { schema, table, .. } => ObjectId::Table {
                schema: schema.clone(),
                name: table.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            TableChange::Create { table } => {
                let mut ids = vec![table.stable_id()];
                ids.extend(table.key_column_ids());
                ids
            }
            TableChange::AddConstraint {
                schema,
                table,
                constraint,
            } => match &constraint.kind {
                ConstraintKind::PrimaryKey { columns } | ConstraintKind::Unique { columns } => {
                    vec![ObjectId::KeyColumns {
                        schema: schema.clone(),
                        table: table.clone(),
                        columns: columns.clone(),
                    }]
                }
                _ => vec![],
            },
            TableChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            TableChange::Create { table } => {
                let mut reqs = vec![ObjectId::Schema {
                    name: table.schema.clone(),
                }];
                for column in &table.columns {
                    if let Some(type_ref) = type_reference(&column.data_type) {
                        reqs.push(type_ref);
                    }
                }
                reqs
            }
            TableChange::AddColumn { column, .. } => {
                let mut reqs = vec![self.stable_id()];
                if let Some(type_ref) = type_reference(&column.data_type) {
                    reqs.push(type_ref);
                }
                reqs
            }
            TableChange::AlterColumnType { data_type, .. } => {
                let mut reqs = vec![self.stable_id()];
                if let Some(type_ref) = type_reference(data_type) {
                    reqs.push(type_ref);
                }
                reqs
            }
            TableChange::AddConstraint { constraint, .. } => {
                let mut reqs = vec![self.stable_id()];
                if let ConstraintKind::ForeignKey { references, .. } = &constraint.kind {
                    reqs.push(ObjectId::Table {
                        schema: references.schema.clone(),
                        name: references.table.clone(),
                    });
                    reqs.push(ObjectId::KeyColumns {
                        schema: references.schema.clone(),
                        table: references.table.clone(),
                        columns: references.columns.clone(),
                    });
                }
                reqs
            }
            TableChange::ChangeOwner { owner, .. } => vec![
                self.stable_id(),
                ObjectId::Role {
                    name: owner.clone(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            TableChange::Drop { table } => {
                let mut ids = vec![table.stable_id()];
                ids.extend(table.key_column_ids());
                ids
            }
            TableChange::DropConstraint {
                schema,
                table,
                key_columns: Some(columns),
                ..
            } => vec![ObjectId::KeyColumns {
                schema: schema.clone(),
                table: table.clone(),
                columns: columns.clone(),
            }],
            TableChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            TableChange::Comment { .. } | TableChange::ColumnComment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }
}
