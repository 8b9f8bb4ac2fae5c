use serde::{Deserialize, Serialize};

use super::id::ObjectId;

/// An index. Indexes have no ALTER form for anything the planner models, so
/// any change beyond the comment is drop+create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub schema: String,
    pub name: String,
    pub table: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub unique: bool,
    /// Column names or raw expressions, in index order.
    pub columns: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    /// Partial-index `WHERE` clause.
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_method() -> String {
    "btree".to_string()
}

impl Index {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Index {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// A unique index without a predicate guarantees a key over its plain
    /// columns, which foreign keys elsewhere may depend on.
    pub fn key_columns_id(&self) -> Option<ObjectId> {
        if self.unique && self.predicate.is_none() {
            Some(ObjectId::KeyColumns {
                schema: self.schema.clone(),
                table: self.table.clone(),
                columns: self.columns.clone(),
            })
        } else {
            None
        }
    }
}
