//! Trigger and event-trigger operations

use crate::catalog::id::ObjectId;
use crate::catalog::trigger::{EventTrigger, Trigger};
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum TriggerChange {
    Create {
        trigger: Trigger,
    },
    Drop {
        schema: String,
        table: String,
        name: String,
    },
    Comment {
        schema: String,
        table: String,
        name: String,
        comment: Option<String>,
    },
}

impl TriggerChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            TriggerChange::Create { trigger } => trigger.stable_id(),
            TriggerChange::Drop {
                schema,
                table,
                name,
            }
            | TriggerChange::Comment {
                schema,
                table,
                name,
                ..
            } => ObjectId::Trigger {
                schema: schema.clone(),
                table: table.clone(),
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            TriggerChange::Create { .. } => vec![self.stable_id()],
            TriggerChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            TriggerChange::Create { trigger } => vec![
                ObjectId::Table {
                    schema: trigger.schema.clone(),
                    name: trigger.table.clone(),
                },
                ObjectId::Function {
                    schema: trigger.function_schema.clone(),
                    name: trigger.function_name.clone(),
                    arguments: String::new(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            TriggerChange::Drop { .. } => vec![self.stable_id()],
            TriggerChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            TriggerChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Trigger
    }
}

#[derive(Debug, Clone)]
pub enum EventTriggerChange {
    Create {
        event_trigger: EventTrigger,
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

impl EventTriggerChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            EventTriggerChange::Create { event_trigger } => event_trigger.stable_id(),
            EventTriggerChange::Drop { name }
            | EventTriggerChange::ChangeOwner { name, .. }
            | EventTriggerChange::Comment { name, .. } => ObjectId::EventTrigger {
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            EventTriggerChange::Create { .. } => vec![self.stable_id()],
            EventTriggerChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            EventTriggerChange::Create { event_trigger } => vec![ObjectId::Function {
                schema: event_trigger.function_schema.clone(),
                name: event_trigger.function_name.clone(),
                arguments: String::new(),
            }],
            EventTriggerChange::ChangeOwner { owner, .. } => vec![
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
            EventTriggerChange::Drop { .. } => vec![self.stable_id()],
            EventTriggerChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            EventTriggerChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::EventTrigger
    }
}
