//! Sequence operations

use crate::catalog::id::ObjectId;
use crate::catalog::sequence::{Sequence, SequenceOwner};
use crate::catalog::ObjectKind;

use super::ChangeScope;

/// One option clause of `ALTER SEQUENCE`. `MinValue(None)` renders as
/// `NO MINVALUE`, and likewise for `MaxValue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOptionClause {
    Increment(i64),
    MinValue(Option<i64>),
    MaxValue(Option<i64>),
    Start(i64),
    Cache(i64),
    Cycle(bool),
}

#[derive(Debug, Clone)]
pub enum SequenceChange {
    Create {
        sequence: Sequence,
    },
    Drop {
        schema: String,
        name: String,
    },
    /// A single `ALTER SEQUENCE` statement carrying every changed option.
    SetOptions {
        schema: String,
        name: String,
        options: Vec<SequenceOptionClause>,
    },
    /// `OWNED BY table.column` or `OWNED BY NONE`.
    OwnedBy {
        schema: String,
        name: String,
        owned_by: Option<SequenceOwner>,
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

impl SequenceChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            SequenceChange::Create { sequence } => sequence.stable_id(),
            SequenceChange::Drop { schema, name }
            | SequenceChange::SetOptions { schema, name, .. }
            | SequenceChange::OwnedBy { schema, name, .. }
            | SequenceChange::ChangeOwner { schema, name, .. }
            | SequenceChange::Comment { schema, name, .. } => ObjectId::Sequence {
                schema: schema.clone(),
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            SequenceChange::Create { .. } => vec![self.stable_id()],
            SequenceChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            SequenceChange::Create { sequence } => vec![ObjectId::Schema {
                name: sequence.schema.clone(),
            }],
            SequenceChange::OwnedBy {
                owned_by: Some(owner),
                ..
            } => vec![
                self.stable_id(),
                ObjectId::Table {
                    schema: owner.schema.clone(),
                    name: owner.table.clone(),
                },
            ],
            SequenceChange::ChangeOwner { owner, .. } => vec![
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
            SequenceChange::Drop { .. } => vec![self.stable_id()],
            SequenceChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            SequenceChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Sequence
    }
}
