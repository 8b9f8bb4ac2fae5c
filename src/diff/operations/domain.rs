//! Domain operations

use crate::catalog::domain::{Domain, DomainConstraint};
use crate::catalog::id::ObjectId;
use crate::catalog::ObjectKind;

use super::{type_reference, ChangeScope};

#[derive(Debug, Clone)]
pub enum DomainChange {
    /// Creates the domain with its default, NOT NULL and *validated* CHECK
    /// constraints inline; unvalidated constraints arrive as separate
    /// `AddConstraint { validated: false }` changes.
    Create {
        domain: Domain,
    },
    Drop {
        schema: String,
        name: String,
    },
    SetDefault {
        schema: String,
        name: String,
        default: String,
    },
    DropDefault {
        schema: String,
        name: String,
    },
    SetNotNull {
        schema: String,
        name: String,
    },
    DropNotNull {
        schema: String,
        name: String,
    },
    AddConstraint {
        schema: String,
        name: String,
        constraint: DomainConstraint,
    },
    DropConstraint {
        schema: String,
        name: String,
        constraint_name: String,
    },
    ValidateConstraint {
        schema: String,
        name: String,
        constraint_name: String,
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

impl DomainChange {
    fn ids(&self) -> (String, String) {
        match self {
            DomainChange::Create { domain } => (domain.schema.clone(), domain.name.clone()),
            DomainChange::Drop { schema, name }
            | DomainChange::SetDefault { schema, name, .. }
            | DomainChange::DropDefault { schema, name }
            | DomainChange::SetNotNull { schema, name }
            | DomainChange::DropNotNull { schema, name }
            | DomainChange::AddConstraint { schema, name, .. }
            | DomainChange::DropConstraint { schema, name, .. }
            | DomainChange::ValidateConstraint { schema, name, .. }
            | DomainChange::ChangeOwner { schema, name, .. }
            | DomainChange::Comment { schema, name, .. } => (schema.clone(), name.clone()),
        }
    }

    pub fn stable_id(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::Domain { schema, name }
    }

    fn type_alias(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::Type { schema, name }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            DomainChange::Create { .. } => vec![self.stable_id(), self.type_alias()],
            DomainChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            DomainChange::Create { domain } => {
                let mut reqs = vec![ObjectId::Schema {
                    name: domain.schema.clone(),
                }];
                if let Some(type_ref) = type_reference(&domain.qualified_base_type()) {
                    reqs.push(type_ref);
                }
                reqs
            }
            DomainChange::ChangeOwner { owner, .. } => vec![
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
            DomainChange::Drop { .. } => vec![self.stable_id(), self.type_alias()],
            DomainChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            DomainChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Domain
    }
}
