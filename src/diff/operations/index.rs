//! Index operations

use crate::catalog::id::ObjectId;
use crate::catalog::index::Index;
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum IndexChange {
    Create { index: Index },
    Drop { index: Index },
    Comment {
        schema: String,
        name: String,
        comment: Option<String>,
    },
}

impl IndexChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            IndexChange::Create { index } | IndexChange::Drop { index } => index.stable_id(),
            IndexChange::Comment { schema, name, .. } => ObjectId::Index {
                schema: schema.clone(),
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            IndexChange::Create { index } => {
                let mut ids = vec![index.stable_id()];
                ids.extend(index.key_columns_id());
                ids
            }
            IndexChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            IndexChange::Create { index } => vec![ObjectId::Table {
                schema: index.schema.clone(),
                name: index.table.clone(),
            }],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            IndexChange::Drop { index } => {
                let mut ids = vec![index.stable_id()];
                ids.extend(index.key_columns_id());
                ids
            }
            IndexChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            IndexChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Index
    }
}
