use serde::{Deserialize, Serialize};

use super::id::ObjectId;

/// Command type for row-level security policies. Serialized with the
/// single-letter codes `pg_policy.polcmd` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyCommand {
    #[serde(rename = "*")]
    All,
    #[serde(rename = "r")]
    Select,
    #[serde(rename = "a")]
    Insert,
    #[serde(rename = "w")]
    Update,
    #[serde(rename = "d")]
    Delete,
}

impl PolicyCommand {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            PolicyCommand::All => "ALL",
            PolicyCommand::Select => "SELECT",
            PolicyCommand::Insert => "INSERT",
            PolicyCommand::Update => "UPDATE",
            PolicyCommand::Delete => "DELETE",
        }
    }
}

/// A row-level security policy. Roles, USING and WITH CHECK can be altered
/// in place; the command and the permissive flag cannot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub command: PolicyCommand,
    #[serde(default = "default_true")]
    pub permissive: bool,
    /// Roles this policy applies to; empty means PUBLIC.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub using_expr: Option<String>,
    #[serde(default)]
    pub with_check_expr: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Policy {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Policy {
            schema: self.schema.clone(),
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }
}
