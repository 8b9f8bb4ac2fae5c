use serde::{Deserialize, Serialize};

use super::id::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollationProvider {
    Libc,
    Icu,
    Builtin,
}

impl CollationProvider {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            CollationProvider::Libc => "libc",
            CollationProvider::Icu => "icu",
            CollationProvider::Builtin => "builtin",
        }
    }
}

/// A collation. Only the recorded version (via `REFRESH VERSION`) and the
/// owner can change in place; everything else forces drop+create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collation {
    pub schema: String,
    pub name: String,
    pub provider: CollationProvider,
    #[serde(default = "default_true")]
    pub deterministic: bool,
    /// `None` means any encoding (the catalog's -1).
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub collate: Option<String>,
    #[serde(default)]
    pub ctype: Option<String>,
    #[serde(default)]
    pub icu_rules: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Collation {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Collation {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}
