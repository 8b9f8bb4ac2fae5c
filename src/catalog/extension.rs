use serde::{Deserialize, Serialize};

use super::id::ObjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Extension {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Extension {
            name: self.name.clone(),
        }
    }
}
