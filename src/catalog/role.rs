use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::ObjectId;
use super::privilege::DefaultAclEntry;

/// Membership of this role in another role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleMembership {
    pub role: String,
    #[serde(default)]
    pub admin_option: bool,
}

/// A cluster role. The boolean flag set and the connection limit are
/// alterable in place; per-role configuration is reconciled key by key with
/// `ALTER ROLE … SET/RESET`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub superuser: bool,
    #[serde(default)]
    pub createdb: bool,
    #[serde(default)]
    pub createrole: bool,
    #[serde(default = "default_true")]
    pub inherit: bool,
    #[serde(default)]
    pub login: bool,
    #[serde(default)]
    pub replication: bool,
    #[serde(default)]
    pub bypassrls: bool,
    #[serde(default)]
    pub connection_limit: Option<i32>,
    /// `ALTER ROLE … SET key = value` settings.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub member_of: Vec<RoleMembership>,
    /// This role's `ALTER DEFAULT PRIVILEGES` configuration; seeds the
    /// default-privilege projection at the start of planning.
    #[serde(default)]
    pub default_privileges: Vec<DefaultAclEntry>,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Role {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Role {
            name: self.name.clone(),
        }
    }
}
