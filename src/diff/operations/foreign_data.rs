//! Foreign-data wrapper and foreign server operations

use crate::catalog::foreign_data::{ForeignDataWrapper, ForeignServer};
use crate::catalog::id::ObjectId;
use crate::catalog::ObjectKind;

use super::{ChangeScope, OptionDelta};

#[derive(Debug, Clone)]
pub enum FdwChange {
    Create {
        wrapper: ForeignDataWrapper,
    },
    Drop {
        name: String,
    },
    AlterOptions {
        name: String,
        options: Vec<OptionDelta>,
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

impl FdwChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            FdwChange::Create { wrapper } => wrapper.stable_id(),
            FdwChange::Drop { name }
            | FdwChange::AlterOptions { name, .. }
            | FdwChange::ChangeOwner { name, .. }
            | FdwChange::Comment { name, .. } => ObjectId::ForeignDataWrapper {
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            FdwChange::Create { .. } => vec![self.stable_id()],
            FdwChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            FdwChange::Create { .. } => vec![],
            FdwChange::ChangeOwner { owner, .. } => vec![
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
            FdwChange::Drop { .. } => vec![self.stable_id()],
            FdwChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            FdwChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::ForeignDataWrapper
    }
}

#[derive(Debug, Clone)]
pub enum ForeignServerChange {
    Create {
        server: ForeignServer,
    },
    Drop {
        name: String,
    },
    AlterOptions {
        name: String,
        options: Vec<OptionDelta>,
    },
    SetVersion {
        name: String,
        version: String,
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

impl ForeignServerChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            ForeignServerChange::Create { server } => server.stable_id(),
            ForeignServerChange::Drop { name }
            | ForeignServerChange::AlterOptions { name, .. }
            | ForeignServerChange::SetVersion { name, .. }
            | ForeignServerChange::ChangeOwner { name, .. }
            | ForeignServerChange::Comment { name, .. } => ObjectId::ForeignServer {
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            ForeignServerChange::Create { .. } => vec![self.stable_id()],
            ForeignServerChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            ForeignServerChange::Create { server } => vec![ObjectId::ForeignDataWrapper {
                name: server.wrapper.clone(),
            }],
            ForeignServerChange::ChangeOwner { owner, .. } => vec![
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
            ForeignServerChange::Drop { .. } => vec![self.stable_id()],
            ForeignServerChange::Comment { comment: None, .. } => {
                vec![self.stable_id().comment()]
            }
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            ForeignServerChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::ForeignServer
    }
}
