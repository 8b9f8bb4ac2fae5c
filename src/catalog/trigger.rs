use serde::{Deserialize, Serialize};

use super::id::ObjectId;

/// A table trigger. Triggers have no usable ALTER form; any change beyond
/// the comment is drop+create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub schema: String,
    pub table: String,
    pub name: String,
    /// BEFORE, AFTER or INSTEAD OF.
    pub timing: String,
    /// INSERT, UPDATE, DELETE, TRUNCATE; UPDATE may carry a column list as
    /// `UPDATE OF a, b`.
    pub events: Vec<String>,
    #[serde(default)]
    pub for_each_row: bool,
    #[serde(default)]
    pub condition: Option<String>,
    pub function_schema: String,
    pub function_name: String,
    #[serde(default)]
    pub function_args: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Trigger {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Trigger {
            schema: self.schema.clone(),
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTrigger {
    pub name: String,
    /// ddl_command_start, ddl_command_end, table_rewrite or sql_drop.
    pub event: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub function_schema: String,
    pub function_name: String,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl EventTrigger {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::EventTrigger {
            name: self.name.clone(),
        }
    }
}
