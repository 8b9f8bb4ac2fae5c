use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::ObjectId;
use super::privilege::AclEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnIdentity {
    Always,
    ByDefault,
}

impl ColumnIdentity {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            ColumnIdentity::Always => "ALWAYS",
            ColumnIdentity::ByDefault => "BY DEFAULT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub collation: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub identity: Option<ColumnIdentity>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Referential actions and the referenced column set of a FOREIGN KEY.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    pub schema: String,
    pub table: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub on_delete: Option<String>,
    #[serde(default)]
    pub on_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ConstraintKind {
    PrimaryKey {
        columns: Vec<String>,
    },
    Unique {
        columns: Vec<String>,
    },
    ForeignKey {
        columns: Vec<String>,
        references: ForeignKeyRef,
    },
    Check {
        expression: String,
    },
    Exclusion {
        definition: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConstraint {
    pub name: String,
    #[serde(flatten)]
    pub kind: ConstraintKind,
    #[serde(default = "default_true")]
    pub validated: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicaIdentity {
    Default,
    Full,
    Nothing,
    Index { name: String },
}

impl Default for ReplicaIdentity {
    fn default() -> Self {
        ReplicaIdentity::Default
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub unlogged: bool,
    /// `PARTITION BY …` clause, when the table is partitioned. Changing the
    /// partitioning kind forces drop+create.
    #[serde(default)]
    pub partition_by: Option<String>,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub constraints: Vec<TableConstraint>,
    #[serde(default)]
    pub storage_options: BTreeMap<String, String>,
    #[serde(default)]
    pub replica_identity: ReplicaIdentity,
    #[serde(default)]
    pub rls_enabled: bool,
    #[serde(default)]
    pub rls_forced: bool,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl Table {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Table {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn find_constraint(&self, name: &str) -> Option<&TableConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Column sets exposed to foreign-key references: every primary-key and
    /// unique constraint contributes one `key:` id.
    pub fn key_column_ids(&self) -> Vec<ObjectId> {
        self.constraints
            .iter()
            .filter_map(|c| match &c.kind {
                ConstraintKind::PrimaryKey { columns } | ConstraintKind::Unique { columns } => {
                    Some(ObjectId::KeyColumns {
                        schema: self.schema.clone(),
                        table: self.name.clone(),
                        columns: columns.clone(),
                    })
                }
                _ => None,
            })
            .collect()
    }
}
