use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::ObjectId;
use super::privilege::AclEntry;

/// A foreign-data wrapper. Handler and validator changes force drop+create;
/// options are reconciled with ADD/SET/DROP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignDataWrapper {
    pub name: String,
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub validator: Option<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl ForeignDataWrapper {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::ForeignDataWrapper {
            name: self.name.clone(),
        }
    }
}

/// A foreign server. The server type cannot be altered; version and options
/// can.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignServer {
    pub name: String,
    pub wrapper: String,
    #[serde(default)]
    pub server_type: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl ForeignServer {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::ForeignServer {
            name: self.name.clone(),
        }
    }
}
