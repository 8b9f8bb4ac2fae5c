use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use super::privilege::AclEntry;

/// A CHECK constraint on a domain. `expression` is the full `CHECK (…)`
/// clause as PostgreSQL would print it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConstraint {
    pub name: String,
    pub expression: String,
    #[serde(default = "default_true")]
    pub validated: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub schema: String,
    pub name: String,
    pub base_type: String,
    pub base_type_schema: String,
    #[serde(default)]
    pub collation: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub constraints: Vec<DomainConstraint>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl Domain {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Domain {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// The schema-qualified base type as it appears in generated DDL.
    pub fn qualified_base_type(&self) -> String {
        format!("{}.{}", self.base_type_schema, self.base_type)
    }
}
