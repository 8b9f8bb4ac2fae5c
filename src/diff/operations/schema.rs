//! Schema operations

use crate::catalog::id::ObjectId;
use crate::catalog::schema::Schema;
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum SchemaChange {
    Create {
        schema: Schema,
    },
    Drop {
        name: String,
    },
    ChangeOwner {
        name: String,
        owner: String,
    },
    Comment {
        name: String,
        comment: Option<String>,
    },
}

impl SchemaChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            SchemaChange::Create { schema } => schema.stable_id(),
            SchemaChange::Drop { name }
            | SchemaChange::ChangeOwner { name, .. }
            | SchemaChange::Comment { name, .. } => ObjectId::Schema { name: name.clone() },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            SchemaChange::Create { .. } => vec![self.stable_id()],
            SchemaChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            SchemaChange::Create { schema } => vec![ObjectId::Role {
                name: schema.owner.clone(),
            }],
            SchemaChange::ChangeOwner { owner, .. } => vec![
                self.stable_id(),
                ObjectId::Role {
                    name: owner.clone(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            SchemaChange::Drop { .. } => vec![self.stable_id()],
            SchemaChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            SchemaChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Schema
    }
}
