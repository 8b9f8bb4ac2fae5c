//! Default-privilege projection.
//!
//! `ALTER DEFAULT PRIVILEGES` decides the initial ACL of objects created
//! later. When the plan itself both adjusts default privileges and creates
//! objects, the CREATE differs must reconcile desired ACLs against the
//! *effective* initial ACL at that point in the plan, not against an empty
//! one. [`DefaultPrivilegeState`] is that projection: seeded from the
//! `main` catalog's roles, then replayed forward as default-privilege
//! changes are emitted.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::privilege::{AclEntry, ObjtypeCode};
use crate::catalog::role::Role;
use crate::catalog::ObjectKind;
use crate::diff::operations::DefaultPrivilegeChange;

/// Flat keyed store: `(role, objtype, schema?, grantee)` → privilege set.
#[derive(Debug, Clone, Default)]
pub struct DefaultPrivilegeState {
    entries: BTreeMap<StateKey, BTreeSet<(String, bool)>>,
}

type StateKey = (String, char, Option<String>, String);

impl DefaultPrivilegeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the projection from the current catalog's roles.
    pub fn from_roles(roles: &[Role]) -> Self {
        let mut state = Self::new();
        for role in roles {
            for entry in &role.default_privileges {
                state.insert(
                    &role.name,
                    entry.objtype,
                    entry.in_schema.as_deref(),
                    &entry.grantee,
                    &entry.privilege,
                    entry.grantable,
                );
            }
        }
        state
    }

    fn key(
        role: &str,
        objtype: ObjtypeCode,
        in_schema: Option<&str>,
        grantee: &str,
    ) -> StateKey {
        (
            role.to_string(),
            objtype.as_char(),
            in_schema.map(|s| s.to_string()),
            grantee.to_string(),
        )
    }

    fn insert(
        &mut self,
        role: &str,
        objtype: ObjtypeCode,
        in_schema: Option<&str>,
        grantee: &str,
        privilege: &str,
        grantable: bool,
    ) {
        self.entries
            .entry(Self::key(role, objtype, in_schema, grantee))
            .or_default()
            .insert((privilege.to_string(), grantable));
    }

    pub fn apply_grant(
        &mut self,
        role: &str,
        objtype: ObjtypeCode,
        in_schema: Option<&str>,
        grantee: &str,
        privileges: &[(String, bool)],
    ) {
        for (privilege, grantable) in privileges {
            self.insert(role, objtype, in_schema, grantee, privilege, *grantable);
        }
    }

    /// Remove matching entries. Revoking a privilege removes both the plain
    /// and the grantable variant; there is no grant-option-only revoke at
    /// the default-privilege level worth modeling separately.
    pub fn apply_revoke(
        &mut self,
        role: &str,
        objtype: ObjtypeCode,
        in_schema: Option<&str>,
        grantee: &str,
        privileges: &[String],
    ) {
        let key = Self::key(role, objtype, in_schema, grantee);
        if let Some(set) = self.entries.get_mut(&key) {
            set.retain(|(privilege, _)| !privileges.contains(privilege));
            if set.is_empty() {
                self.entries.remove(&key);
            }
        }
    }

    /// Replay an emitted change into the projection.
    pub fn apply(&mut self, change: &DefaultPrivilegeChange) {
        match change {
            DefaultPrivilegeChange::Grant {
                role,
                in_schema,
                objtype,
                grantee,
                privileges,
                grantable,
            } => {
                let units: Vec<(String, bool)> = privileges
                    .iter()
                    .map(|p| (p.clone(), *grantable))
                    .collect();
                self.apply_grant(role, *objtype, in_schema.as_deref(), grantee, &units);
            }
            DefaultPrivilegeChange::Revoke {
                role,
                in_schema,
                objtype,
                grantee,
                privileges,
            } => {
                self.apply_revoke(role, *objtype, in_schema.as_deref(), grantee, privileges);
            }
        }
    }

    /// The ACL a freshly created object of `kind` in `schema`, owned by
    /// `owner`, will carry the moment it exists. Schema-specific entries
    /// win; the global (null-schema) entries apply only when the owner has
    /// no schema-specific configuration for this objtype at all.
    pub fn effective_defaults(
        &self,
        owner: &str,
        kind: ObjectKind,
        schema: Option<&str>,
    ) -> Vec<AclEntry> {
        let Some(objtype) = ObjtypeCode::for_kind(kind) else {
            return Vec::new();
        };
        let code = objtype.as_char();

        let scoped: Vec<(&StateKey, &BTreeSet<(String, bool)>)> = self
            .entries
            .iter()
            .filter(|((role, otype, in_schema, _), _)| {
                role == owner && *otype == code && in_schema.as_deref() == schema
            })
            .collect();

        let selected = if !scoped.is_empty() || schema.is_none() {
            scoped
        } else {
            self.entries
                .iter()
                .filter(|((role, otype, in_schema, _), _)| {
                    role == owner && *otype == code && in_schema.is_none()
                })
                .collect()
        };

        let mut acl = Vec::new();
        for ((_, _, _, grantee), privileges) in selected {
            for (privilege, grantable) in privileges {
                acl.push(AclEntry {
                    grantee: grantee.clone(),
                    privilege: privilege.clone(),
                    grantable: *grantable,
                    columns: None,
                });
            }
        }
        acl.sort();
        acl
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(entries: &[(&str, ObjtypeCode, Option<&str>, &str, &str, bool)]) -> DefaultPrivilegeState {
        let mut state = DefaultPrivilegeState::new();
        for (role, objtype, in_schema, grantee, privilege, grantable) in entries {
            state.apply_grant(
                role,
                *objtype,
                *in_schema,
                grantee,
                &[((*privilege).to_string(), *grantable)],
            );
        }
        state
    }

    #[test]
    fn test_effective_defaults_schema_specific_wins() {
        let state = state_with(&[
            (
                "owner",
                ObjtypeCode::Relation,
                None,
                "readers",
                "SELECT",
                false,
            ),
            (
                "owner",
                ObjtypeCode::Relation,
                Some("app"),
                "writers",
                "INSERT",
                false,
            ),
        ]);

        let in_app = state.effective_defaults("owner", ObjectKind::Table, Some("app"));
        assert_eq!(in_app.len(), 1);
        assert_eq!(in_app[0].grantee, "writers");

        // No schema-specific entries for "other": global entries apply.
        let elsewhere = state.effective_defaults("owner", ObjectKind::Table, Some("other"));
        assert_eq!(elsewhere.len(), 1);
        assert_eq!(elsewhere[0].grantee, "readers");
    }

    #[test]
    fn test_effective_defaults_empty_for_kinds_without_defaults() {
        let state = state_with(&[(
            "owner",
            ObjtypeCode::Relation,
            None,
            "readers",
            "SELECT",
            false,
        )]);
        assert!(state
            .effective_defaults("owner", ObjectKind::Trigger, Some("app"))
            .is_empty());
    }

    #[test]
    fn test_revoke_removes_grantable_and_base() {
        let mut state = state_with(&[
            ("owner", ObjtypeCode::Sequence, None, "apps", "USAGE", false),
            ("owner", ObjtypeCode::Sequence, None, "apps", "USAGE", true),
        ]);
        state.apply_revoke(
            "owner",
            ObjtypeCode::Sequence,
            None,
            "apps",
            &["USAGE".to_string()],
        );
        assert!(state
            .effective_defaults("owner", ObjectKind::Sequence, None)
            .is_empty());
    }

    #[test]
    fn test_replay_grant_change() {
        let mut state = DefaultPrivilegeState::new();
        state.apply(&DefaultPrivilegeChange::Grant {
            role: "owner".to_string(),
            in_schema: Some("app".to_string()),
            objtype: ObjtypeCode::Routine,
            grantee: "callers".to_string(),
            privileges: vec!["EXECUTE".to_string()],
            grantable: false,
        });
        let acl = state.effective_defaults("owner", ObjectKind::Function, Some("app"));
        assert_eq!(acl.len(), 1);
        assert_eq!(acl[0].privilege, "EXECUTE");
    }
}
