//! Function, procedure and aggregate operations

use crate::catalog::function::{Routine, RoutineKind};
use crate::catalog::id::ObjectId;
use crate::catalog::ObjectKind;

use super::{type_reference, ChangeScope};

/// Languages that ship with the server and contribute no dependency edge.
const BUILTIN_LANGUAGES: &[&str] = &["sql", "plpgsql", "c", "internal"];

#[derive(Debug, Clone)]
pub enum RoutineChange {
    Create {
        routine: Routine,
        /// Relations and routines the body reads, resolved by the differ.
        depends_on: Vec<ObjectId>,
    },
    /// `CREATE OR REPLACE` for a definition change. Aggregates have no
    /// OR REPLACE form and go through drop+create instead.
    Replace {
        routine: Routine,
        depends_on: Vec<ObjectId>,
    },
    Drop {
        schema: String,
        name: String,
        arguments: String,
        kind: RoutineKind,
    },
    ChangeOwner {
        schema: String,
        name: String,
        arguments: String,
        kind: RoutineKind,
        owner: String,
    },
    Comment {
        schema: String,
        name: String,
        arguments: String,
        kind: RoutineKind,
        comment: Option<String>,
    },
}

impl RoutineChange {
    fn routine_kind(&self) -> RoutineKind {
        match self {
            RoutineChange::Create { routine, .. } | RoutineChange::Replace { routine, .. } => {
                routine.kind
            }
            RoutineChange::Drop { kind, .. }
            | RoutineChange::ChangeOwner { kind, .. }
            | RoutineChange::Comment { kind, .. } => *kind,
        }
    }

    pub fn stable_id(&self) -> ObjectId {
        match self {
            RoutineChange::Create { routine, .. } | RoutineChange::Replace { routine, .. } => {
                routine.stable_id()
            }
            RoutineChange::Drop {
                schema,
                name,
                arguments,
                kind,
            }
            | RoutineChange::ChangeOwner {
                schema,
                name,
                arguments,
                kind,
                ..
            }
            | RoutineChange::Comment {
                schema,
                name,
                arguments,
                kind,
                ..
            } => match kind {
                RoutineKind::Function => ObjectId::Function {
                    schema: schema.clone(),
                    name: name.clone(),
                    arguments: arguments.clone(),
                },
                RoutineKind::Procedure => ObjectId::Procedure {
                    schema: schema.clone(),
                    name: name.clone(),
                    arguments: arguments.clone(),
                },
                RoutineKind::Aggregate => ObjectId::Aggregate {
                    schema: schema.clone(),
                    name: name.clone(),
                    arguments: arguments.clone(),
                },
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            RoutineChange::Create { .. } => vec![self.stable_id()],
            RoutineChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            RoutineChange::Create {
                routine,
                depends_on,
            } => {
                let mut reqs = vec![ObjectId::Schema {
                    name: routine.schema.clone(),
                }];
                for arg_type in routine.arguments.split(',').filter(|a| !a.is_empty()) {
                    if let Some(type_ref) = type_reference(arg_type) {
                        reqs.push(type_ref);
                    }
                }
                if !BUILTIN_LANGUAGES.contains(&routine.language.as_str()) {
                    reqs.push(ObjectId::Language {
                        name: routine.language.clone(),
                    });
                }
                reqs.extend(depends_on.iter().cloned());
                reqs
            }
            RoutineChange::Replace { depends_on, .. } => {
                let mut reqs = vec![self.stable_id()];
                reqs.extend(depends_on.iter().cloned());
                reqs
            }
            RoutineChange::ChangeOwner { owner, .. } => vec![
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
            RoutineChange::Drop { .. } => vec![self.stable_id()],
            RoutineChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            RoutineChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self.routine_kind() {
            RoutineKind::Function => ObjectKind::Function,
            RoutineKind::Procedure => ObjectKind::Procedure,
            RoutineKind::Aggregate => ObjectKind::Aggregate,
        }
    }
}
