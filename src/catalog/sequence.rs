use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use super::privilege::AclEntry;

/// The column a sequence is `OWNED BY` (SERIAL and identity plumbing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOwner {
    pub schema: String,
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub schema: String,
    pub name: String,
    /// smallint, integer or bigint. Changing it forces drop+create.
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default)]
    pub unlogged: bool,
    #[serde(default = "default_one")]
    pub increment: i64,
    /// `None` means NO MINVALUE (the type default applies).
    #[serde(default)]
    pub min_value: Option<i64>,
    /// `None` means NO MAXVALUE.
    #[serde(default)]
    pub max_value: Option<i64>,
    #[serde(default = "default_one")]
    pub start_value: i64,
    #[serde(default = "default_one")]
    pub cache: i64,
    #[serde(default)]
    pub cycle: bool,
    #[serde(default)]
    pub owned_by: Option<SequenceOwner>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

fn default_data_type() -> String {
    "bigint".to_string()
}

fn default_one() -> i64 {
    1
}

impl Sequence {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Sequence {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}
