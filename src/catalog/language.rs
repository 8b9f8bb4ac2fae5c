use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use super::privilege::AclEntry;

/// A procedural language. Trust and the handler triple cannot be altered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub inline_handler: Option<String>,
    #[serde(default)]
    pub validator: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl Language {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Language {
            name: self.name.clone(),
        }
    }
}
