//! Collation operations

use crate::catalog::collation::Collation;
use crate::catalog::id::ObjectId;
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum CollationChange {
    Create {
        collation: Collation,
    },
    Drop {
        schema: String,
        name: String,
    },
    RefreshVersion {
        schema: String,
        name: String,
    },
    ChangeOwner {
        schema: String,
        name: String,
        owner: String,
    },
    Comment {
        schema: String,
        name: String,
        comment: Option<String>,
    },
}

impl CollationChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            CollationChange::Create { collation } => collation.stable_id(),
            CollationChange::Drop { schema, name }
            | CollationChange::RefreshVersion { schema, name }
            | CollationChange::ChangeOwner { schema, name, .. }
            | CollationChange::Comment { schema, name, .. } => ObjectId::Collation {
                schema: schema.clone(),
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            CollationChange::Create { .. } => vec![self.stable_id()],
            CollationChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            CollationChange::Create { collation } => vec![ObjectId::Schema {
                name: collation.schema.clone(),
            }],
            CollationChange::ChangeOwner { owner, .. } => vec![
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
            CollationChange::Drop { .. } => vec![self.stable_id()],
            CollationChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            CollationChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Collation
    }
}
