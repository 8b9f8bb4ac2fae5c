//! Row-level security policy operations

use crate::catalog::id::ObjectId;
use crate::catalog::policy::Policy;
use crate::catalog::privilege::PUBLIC;
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum PolicyChange {
    Create {
        policy: Policy,
    },
    /// `ALTER POLICY` carrying only the clauses that changed. The command
    /// and the permissive flag have no ALTER form.
    Alter {
        policy: Policy,
        set_roles: bool,
        set_using: bool,
        set_check: bool,
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

impl PolicyChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            PolicyChange::Create { policy } | PolicyChange::Alter { policy, .. } => {
                policy.stable_id()
            }
            PolicyChange::Drop {
                schema,
                table,
                name,
            }
            | PolicyChange::Comment {
                schema,
                table,
                name,
                ..
            } => ObjectId::Policy {
                schema: schema.clone(),
                table: table.clone(),
                name: name.clone(),
            },
        }
    }

    fn role_requirements(policy: &Policy) -> Vec<ObjectId> {
        policy
            .roles
            .iter()
            .filter(|r| r.as_str() != PUBLIC)
            .map(|r| ObjectId::Role { name: r.clone() })
            .collect()
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            PolicyChange::Create { .. } => vec![self.stable_id()],
            PolicyChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            PolicyChange::Create { policy } => {
                let mut reqs = vec![ObjectId::Table {
                    schema: policy.schema.clone(),
                    name: policy.table.clone(),
                }];
                reqs.extend(Self::role_requirements(policy));
                reqs
            }
            PolicyChange::Alter { policy, .. } => {
                let mut reqs = vec![self.stable_id()];
                reqs.extend(Self::role_requirements(policy));
                reqs
            }
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            PolicyChange::Drop { .. } => vec![self.stable_id()],
            PolicyChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            PolicyChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Policy
    }
}
