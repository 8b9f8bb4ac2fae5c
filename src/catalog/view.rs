use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::id::ObjectId;
use super::privilege::AclEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewColumn {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A view or materialized view. Plain-view definition changes go through
/// `CREATE OR REPLACE VIEW`; materialized views have no OR REPLACE form and
/// are dropped and recreated instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub materialized: bool,
    /// The raw `SELECT …` body.
    pub definition: String,
    /// `WITH (…)` storage/view options.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub columns: Vec<ViewColumn>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl View {
    pub fn stable_id(&self) -> ObjectId {
        if self.materialized {
            ObjectId::MaterializedView {
                schema: self.schema.clone(),
                name: self.name.clone(),
            }
        } else {
            ObjectId::View {
                schema: self.schema.clone(),
                name: self.name.clone(),
            }
        }
    }
}
