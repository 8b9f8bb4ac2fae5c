use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use super::privilege::AclEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKind {
    Function,
    Procedure,
    Aggregate,
}

/// A function, procedure or aggregate. The identity is
/// `(schema, name, arguments)` where `arguments` is the schema-qualified,
/// comma-joined argument type list with no spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub schema: String,
    pub name: String,
    pub kind: RoutineKind,
    /// Identity signature: argument types only, e.g. `pg_catalog.int4,text`.
    #[serde(default)]
    pub arguments: String,
    /// Full parameter list as written in CREATE, e.g. `a integer, b text`.
    #[serde(default)]
    pub parameters: String,
    /// `RETURNS …` clause body; `None` for procedures.
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub volatility: Option<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub security_definer: bool,
    /// For aggregates: the `(SFUNC = …, STYPE = …)` option list instead of a
    /// body.
    #[serde(default)]
    pub body: String,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

fn default_language() -> String {
    "sql".to_string()
}

impl Routine {
    pub fn stable_id(&self) -> ObjectId {
        match self.kind {
            RoutineKind::Function => ObjectId::Function {
                schema: self.schema.clone(),
                name: self.name.clone(),
                arguments: self.arguments.clone(),
            },
            RoutineKind::Procedure => ObjectId::Procedure {
                schema: self.schema.clone(),
                name: self.name.clone(),
                arguments: self.arguments.clone(),
            },
            RoutineKind::Aggregate => ObjectId::Aggregate {
                schema: self.schema.clone(),
                name: self.name.clone(),
                arguments: self.arguments.clone(),
            },
        }
    }

    pub fn object_kind(&self) -> crate::catalog::ObjectKind {
        match self.kind {
            RoutineKind::Function => crate::catalog::ObjectKind::Function,
            RoutineKind::Procedure => crate::catalog::ObjectKind::Procedure,
            RoutineKind::Aggregate => crate::catalog::ObjectKind::Aggregate,
        }
    }
}
