use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::ObjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub name: String,
    #[serde(default)]
    pub all_tables: bool,
    /// `schema.table` entries, ignored when `all_tables` is set.
    #[serde(default)]
    pub tables: Vec<String>,
    /// insert, update, delete, truncate.
    #[serde(default)]
    pub publish: Vec<String>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Publication {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Publication {
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub name: String,
    pub connection: String,
    #[serde(default)]
    pub publications: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Subscription {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Subscription {
            name: self.name.clone(),
        }
    }
}
