//! Role operations, including membership and per-role configuration.

use crate::catalog::id::ObjectId;
use crate::catalog::role::Role;
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum RoleChange {
    Create {
        role: Role,
    },
    Drop {
        name: String,
    },
    /// `ALTER ROLE … WITH <flag …> [CONNECTION LIMIT n]`. `options` holds
    /// the already-decided keyword list (SUPERUSER, NOLOGIN, …).
    SetOptions {
        name: String,
        options: Vec<String>,
    },
    SetConfig {
        name: String,
        key: String,
        value: String,
    },
    ResetConfig {
        name: String,
        key: String,
    },
    ResetAllConfig {
        name: String,
    },
    /// `GRANT group TO member` role membership.
    GrantMembership {
        group: String,
        member: String,
        admin_option: bool,
    },
    RevokeMembership {
        group: String,
        member: String,
    },
    Comment {
        name: String,
        comment: Option<String>,
    },
}

impl RoleChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            RoleChange::Create { role } => role.stable_id(),
            RoleChange::Drop { name }
            | RoleChange::SetOptions { name, .. }
            | RoleChange::SetConfig { name, .. }
            | RoleChange::ResetConfig { name, .. }
            | RoleChange::ResetAllConfig { name }
            | RoleChange::Comment { name, .. } => ObjectId::Role { name: name.clone() },
            RoleChange::GrantMembership { member, .. }
            | RoleChange::RevokeMembership { member, .. } => ObjectId::Role {
                name: member.clone(),
            },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            RoleChange::Create { .. } => vec![self.stable_id()],
            RoleChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            RoleChange::Create { .. } => vec![],
            RoleChange::GrantMembership { group, member, .. }
            | RoleChange::RevokeMembership { group, member } => vec![
                ObjectId::Role {
                    name: group.clone(),
                },
                ObjectId::Role {
                    name: member.clone(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            RoleChange::Drop { .. } => vec![self.stable_id()],
            RoleChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            RoleChange::Comment { .. } => ChangeScope::Comment,
            RoleChange::GrantMembership { .. } | RoleChange::RevokeMembership { .. } => {
                ChangeScope::Membership
            }
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Role
    }
}

/// Build the `WITH …` keyword list for CREATE ROLE / ALTER ROLE from a role's
/// flag set. Only non-default flags are listed on CREATE; ALTER callers pass
/// the changed flags explicitly.
pub fn role_flag_keywords(role: &Role) -> Vec<String> {
    let mut flags = Vec::new();
    if role.superuser {
        flags.push("SUPERUSER".to_string());
    }
    if role.createdb {
        flags.push("CREATEDB".to_string());
    }
    if role.createrole {
        flags.push("CREATEROLE".to_string());
    }
    if !role.inherit {
        flags.push("NOINHERIT".to_string());
    }
    if role.login {
        flags.push("LOGIN".to_string());
    }
    if role.replication {
        flags.push("REPLICATION".to_string());
    }
    if role.bypassrls {
        flags.push("BYPASSRLS".to_string());
    }
    if let Some(limit) = role.connection_limit {
        flags.push(format!("CONNECTION LIMIT {}", limit));
    }
    flags
}
