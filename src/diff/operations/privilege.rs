//! GRANT / REVOKE operations, object-level and default-privilege.

use crate::catalog::id::ObjectId;
use crate::catalog::privilege::{ObjtypeCode, PUBLIC};
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum PrivilegeChange {
    Grant {
        target: ObjectId,
        object_kind: ObjectKind,
        grantee: String,
        privileges: Vec<String>,
        grantable: bool,
        columns: Option<Vec<String>>,
    },
    Revoke {
        target: ObjectId,
        object_kind: ObjectKind,
        grantee: String,
        privileges: Vec<String>,
        columns: Option<Vec<String>>,
    },
    /// `REVOKE GRANT OPTION FOR …`: removes re-delegation rights while
    /// preserving the base privilege.
    RevokeGrantOption {
        target: ObjectId,
        object_kind: ObjectKind,
        grantee: String,
        privileges: Vec<String>,
        columns: Option<Vec<String>>,
    },
}

impl PrivilegeChange {
    pub fn target(&self) -> &ObjectId {
        match self {
            PrivilegeChange::Grant { target, .. }
            | PrivilegeChange::Revoke { target, .. }
            | PrivilegeChange::RevokeGrantOption { target, .. } => target,
        }
    }

    pub fn grantee(&self) -> &str {
        match self {
            PrivilegeChange::Grant { grantee, .. }
            | PrivilegeChange::Revoke { grantee, .. }
            | PrivilegeChange::RevokeGrantOption { grantee, .. } => grantee,
        }
    }

    pub fn stable_id(&self) -> ObjectId {
        self.target().acl(self.grantee())
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            PrivilegeChange::Grant { .. } => vec![self.stable_id()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        let mut reqs = vec![self.target().clone()];
        if self.grantee() != PUBLIC {
            reqs.push(ObjectId::Role {
                name: self.grantee().to_string(),
            });
        }
        if matches!(self, PrivilegeChange::RevokeGrantOption { .. }) {
            reqs.push(self.stable_id());
        }
        reqs
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            PrivilegeChange::Revoke { .. } => vec![self.stable_id()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        ChangeScope::Privilege
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            PrivilegeChange::Grant { object_kind, .. }
            | PrivilegeChange::Revoke { object_kind, .. }
            | PrivilegeChange::RevokeGrantOption { object_kind, .. } => *object_kind,
        }
    }
}

/// `ALTER DEFAULT PRIVILEGES FOR ROLE … [IN SCHEMA …] GRANT/REVOKE …`.
#[derive(Debug, Clone)]
pub enum DefaultPrivilegeChange {
    Grant {
        role: String,
        in_schema: Option<String>,
        objtype: ObjtypeCode,
        grantee: String,
        privileges: Vec<String>,
        grantable: bool,
    },
    Revoke {
        role: String,
        in_schema: Option<String>,
        objtype: ObjtypeCode,
        grantee: String,
        privileges: Vec<String>,
    },
}

impl DefaultPrivilegeChange {
    pub fn role(&self) -> &str {
        match self {
            DefaultPrivilegeChange::Grant { role, .. }
            | DefaultPrivilegeChange::Revoke { role, .. } => role,
        }
    }

    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Role {
            name: self.role().to_string(),
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        vec![]
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        let (role, in_schema, grantee) = match self {
            DefaultPrivilegeChange::Grant {
                role,
                in_schema,
                grantee,
                ..
            }
            | DefaultPrivilegeChange::Revoke {
                role,
                in_schema,
                grantee,
                ..
            } => (role, in_schema, grantee),
        };

        let mut reqs = vec![ObjectId::Role { name: role.clone() }];
        if let Some(schema) = in_schema {
            reqs.push(ObjectId::Schema {
                name: schema.clone(),
            });
        }
        if grantee != PUBLIC {
            reqs.push(ObjectId::Role {
                name: grantee.clone(),
            });
        }
        reqs
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        vec![]
    }

    pub fn scope(&self) -> ChangeScope {
        ChangeScope::DefaultPrivilege
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Role
    }
}
