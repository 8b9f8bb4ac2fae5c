//! Publication and subscription operations

use crate::catalog::id::ObjectId;
use crate::catalog::publication::{Publication, Subscription};
use crate::catalog::ObjectKind;

use super::{ChangeScope, OptionDelta};

fn table_refs(tables: &[String]) -> Vec<ObjectId> {
    tables
        .iter()
        .filter_map(|qualified| {
            qualified.split_once('.').map(|(schema, name)| ObjectId::Table {
                schema: schema.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum PublicationChange {
    Create {
        publication: Publication,
    },
    Drop {
        name: String,
    },
    SetTables {
        name: String,
        tables: Vec<String>,
    },
    SetPublish {
        name: String,
        publish: Vec<String>,
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

impl PublicationChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            PublicationChange::Create { publication } => publication.stable_id(),
            PublicationChange::Drop { name }
            | PublicationChange::SetTables { name, .. }
            | PublicationChange::SetPublish { name, .. }
            | PublicationChange::ChangeOwner { name, .. }
            | PublicationChange::Comment { name, .. } => ObjectId::Publication {
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            PublicationChange::Create { .. } => vec![self.stable_id()],
            PublicationChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            PublicationChange::Create { publication } => table_refs(&publication.tables),
            PublicationChange::SetTables { tables, .. } => {
                let mut reqs = vec![self.stable_id()];
                reqs.extend(table_refs(tables));
                reqs
            }
            PublicationChange::ChangeOwner { owner, .. } => vec![
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
            PublicationChange::Drop { .. } => vec![self.stable_id()],
            PublicationChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            PublicationChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Publication
    }
}

#[derive(Debug, Clone)]
pub enum SubscriptionChange {
    Create {
        subscription: Subscription,
    },
    Drop {
        name: String,
    },
    SetConnection {
        name: String,
        connection: String,
    },
    SetPublications {
        name: String,
        publications: Vec<String>,
    },
    Enable {
        name: String,
    },
    Disable {
        name: String,
    },
    SetOptions {
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

impl SubscriptionChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            SubscriptionChange::Create { subscription } => subscription.stable_id(),
            SubscriptionChange::Drop { name }
            | SubscriptionChange::SetConnection { name, .. }
            | SubscriptionChange::SetPublications { name, .. }
            | SubscriptionChange::Enable { name }
            | SubscriptionChange::Disable { name }
            | SubscriptionChange::SetOptions { name, .. }
            | SubscriptionChange::ChangeOwner { name, .. }
            | SubscriptionChange::Comment { name, .. } => ObjectId::Subscription {
                name: name.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            SubscriptionChange::Create { .. } => vec![self.stable_id()],
            SubscriptionChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            SubscriptionChange::Create { .. } => vec![],
            SubscriptionChange::ChangeOwner { owner, .. } => vec![
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
            SubscriptionChange::Drop { .. } => vec![self.stable_id()],
            SubscriptionChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            SubscriptionChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Subscription
    }
}
