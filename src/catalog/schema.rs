use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use super::privilege::AclEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl Schema {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Schema {
            name: self.name.clone(),
        }
    }
}
