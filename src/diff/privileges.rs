//! ACL reconciliation.
//!
//! Diffs two ACL descriptions for one object into per-grantee grant /
//! revoke / revoke-grant-option deltas. Owner entries and PostgreSQL's
//! built-in PUBLIC defaults are filtered from both sides first: the owner
//! holds ALL implicitly, and the built-ins exist whether or not anyone ever
//! ran a GRANT.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::catalog::id::ObjectId;
use crate::catalog::privilege::{builtin_public_privileges, AclEntry, ServerVersion, PUBLIC};
use crate::catalog::ObjectKind;
use crate::diff::operations::{Change, PrivilegeChange};

/// One privilege unit inside a delta: `(privilege, grantable, columns)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AclUnit {
    pub privilege: String,
    pub grantable: bool,
    pub columns: Option<Vec<String>>,
}

/// The reconciliation result for one grantee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrivilegeDelta {
    pub grants: Vec<AclUnit>,
    pub revokes: Vec<AclUnit>,
    pub revoke_grant_option: Vec<AclUnit>,
}

impl PrivilegeDelta {
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.revokes.is_empty() && self.revoke_grant_option.is_empty()
    }
}

/// Drop entries that carry no information: the owner's (implicit ALL),
/// PUBLIC's built-in defaults for the kind, and any `grantable = false`
/// entry shadowed by a `grantable = true` entry with the same
/// `(grantee, privilege, columns)`.
fn normalize(
    acl: &[AclEntry],
    owner: &str,
    kind: ObjectKind,
    version: ServerVersion,
) -> Vec<AclEntry> {
    let builtins = builtin_public_privileges(kind, version);

    acl.iter()
        .filter(|entry| entry.grantee != owner)
        .filter(|entry| {
            !(entry.grantee == PUBLIC
                && entry.columns.is_none()
                && !entry.grantable
                && builtins.contains(&entry.privilege.as_str()))
        })
        .filter(|entry| {
            entry.grantable
                || !acl.iter().any(|other| {
                    other.grantable
                        && other.grantee == entry.grantee
                        && other.privilege == entry.privilege
                        && other.columns == entry.columns
                })
        })
        .cloned()
        .collect()
}

/// Reconcile two ACLs. Keys of the result are grantees with a non-empty
/// delta, in sorted order.
pub fn diff_privileges(
    main_acl: &[AclEntry],
    branch_acl: &[AclEntry],
    owner: &str,
    kind: ObjectKind,
    version: ServerVersion,
) -> BTreeMap<String, PrivilegeDelta> {
    type Key = (String, String, Option<Vec<String>>);

    let index = |acl: &[AclEntry]| -> BTreeMap<Key, bool> {
        acl.iter()
            .map(|e| {
                (
                    (e.grantee.clone(), e.privilege.clone(), e.columns.clone()),
                    e.grantable,
                )
            })
            .collect()
    };

    let main = index(&normalize(main_acl, owner, kind, version));
    let branch = index(&normalize(branch_acl, owner, kind, version));

    let mut deltas: BTreeMap<String, PrivilegeDelta> = BTreeMap::new();

    for (key, &grantable) in &branch {
        let (grantee, privilege, columns) = key;
        let unit = AclUnit {
            privilege: privilege.clone(),
            grantable,
            columns: columns.clone(),
        };
        match main.get(key) {
            None => deltas.entry(grantee.clone()).or_default().grants.push(unit),
            Some(&main_grantable) if main_grantable == grantable => {}
            Some(&main_grantable) => {
                let delta = deltas.entry(grantee.clone()).or_default();
                if main_grantable && !grantable {
                    // Keep the base privilege, strip re-delegation.
                    delta.revoke_grant_option.push(AclUnit {
                        grantable: false,
                        ..unit
                    });
                } else {
                    // Upgrading to grantable is an additive grant.
                    delta.grants.push(AclUnit {
                        grantable: true,
                        ..unit
                    });
                }
            }
        }
    }

    for (key, &grantable) in &main {
        let (grantee, privilege, columns) = key;
        if !branch.contains_key(key) {
            deltas
                .entry(grantee.clone())
                .or_default()
                .revokes
                .push(AclUnit {
                    privilege: privilege.clone(),
                    grantable,
                    columns: columns.clone(),
                });
        }
    }

    deltas.retain(|_, delta| !delta.is_empty());
    for delta in deltas.values_mut() {
        delta.grants.sort();
        delta.revokes.sort();
        delta.revoke_grant_option.sort();
    }
    deltas
}

/// Turn reconciliation deltas into GRANT / REVOKE change records for one
/// object. Grants are grouped by `(grantable, columns)` so each statement
/// carries one consistent flag; revokes group by columns only.
pub fn privilege_changes(
    target: &ObjectId,
    kind: ObjectKind,
    deltas: BTreeMap<String, PrivilegeDelta>,
) -> Vec<Change> {
    let mut changes = Vec::new();

    for (grantee, mut delta) in deltas {
        // chunk_by groups consecutive runs, so order by the grouping key
        // first.
        delta
            .grants
            .sort_by(|a, b| (a.grantable, &a.columns).cmp(&(b.grantable, &b.columns)));
        delta.revokes.sort_by(|a, b| a.columns.cmp(&b.columns));
        delta
            .revoke_grant_option
            .sort_by(|a, b| a.columns.cmp(&b.columns));

        for ((grantable, columns), units) in &delta
            .grants
            .iter()
            .chunk_by(|u| (u.grantable, u.columns.clone()))
        {
            changes.push(Change::Privilege(PrivilegeChange::Grant {
                target: target.clone(),
                object_kind: kind,
                grantee: grantee.clone(),
                privileges: units.map(|u| u.privilege.clone()).collect(),
                grantable,
                columns,
            }));
        }

        for (columns, units) in &delta.revokes.iter().chunk_by(|u| u.columns.clone()) {
            changes.push(Change::Privilege(PrivilegeChange::Revoke {
                target: target.clone(),
                object_kind: kind,
                grantee: grantee.clone(),
                privileges: units.map(|u| u.privilege.clone()).collect(),
                columns,
            }));
        }

        for (columns, units) in &delta
            .revoke_grant_option
            .iter()
            .chunk_by(|u| u.columns.clone())
        {
            changes.push(Change::Privilege(PrivilegeChange::RevokeGrantOption {
                target: target.clone(),
                object_kind: kind,
                grantee: grantee.clone(),
                privileges: units.map(|u| u.privilege.clone()).collect(),
                columns,
            }));
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff_table(main: &[AclEntry], branch: &[AclEntry]) -> BTreeMap<String, PrivilegeDelta> {
        diff_privileges(
            main,
            branch,
            "owner_role",
            ObjectKind::Table,
            ServerVersion::default(),
        )
    }

    #[test]
    fn test_owner_entries_are_ignored() {
        let main = vec![AclEntry::new("owner_role", "SELECT")];
        let branch = vec![];
        assert!(diff_table(&main, &branch).is_empty());
    }

    #[test]
    fn test_builtin_public_defaults_filtered() {
        // PUBLIC EXECUTE on a function is implicit; same on both sides of
        // a function diff means no change even when only one side lists it.
        let main = vec![AclEntry::new(PUBLIC, "EXECUTE")];
        let deltas = diff_privileges(
            &main,
            &[],
            "owner_role",
            ObjectKind::Function,
            ServerVersion::default(),
        );
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_new_grant() {
        let branch = vec![AclEntry::new("alice", "SELECT")];
        let deltas = diff_table(&[], &branch);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas["alice"].grants.len(), 1);
        assert!(!deltas["alice"].grants[0].grantable);
    }

    #[test]
    fn test_removed_grant_becomes_revoke() {
        let main = vec![AclEntry::new("alice", "SELECT")];
        let deltas = diff_table(&main, &[]);
        assert_eq!(deltas["alice"].revokes.len(), 1);
    }

    #[test]
    fn test_grant_option_downgrade() {
        let main = vec![AclEntry::new("alice", "SELECT").grantable()];
        let branch = vec![AclEntry::new("alice", "SELECT")];
        let deltas = diff_table(&main, &branch);
        let delta = &deltas["alice"];
        assert!(delta.grants.is_empty());
        assert!(delta.revokes.is_empty());
        assert_eq!(delta.revoke_grant_option.len(), 1);
        assert_eq!(delta.revoke_grant_option[0].privilege, "SELECT");
    }

    #[test]
    fn test_grant_option_upgrade_is_additive_grant() {
        let main = vec![AclEntry::new("alice", "SELECT")];
        let branch = vec![AclEntry::new("alice", "SELECT").grantable()];
        let deltas = diff_table(&main, &branch);
        let delta = &deltas["alice"];
        assert_eq!(delta.grants.len(), 1);
        assert!(delta.grants[0].grantable);
        assert!(delta.revokes.is_empty());
    }

    #[test]
    fn test_shadowed_plain_entry_elided() {
        // grantable=true shadows the redundant grantable=false twin.
        let main = vec![
            AclEntry::new("alice", "SELECT"),
            AclEntry::new("alice", "SELECT").grantable(),
        ];
        let branch = vec![AclEntry::new("alice", "SELECT").grantable()];
        assert!(diff_table(&main, &branch).is_empty());
    }

    #[test]
    fn test_column_grants_keyed_separately() {
        let main = vec![AclEntry::new("alice", "SELECT").on_columns(&["a"])];
        let branch = vec![AclEntry::new("alice", "SELECT").on_columns(&["a", "b"])];
        let deltas = diff_table(&main, &branch);
        let delta = &deltas["alice"];
        assert_eq!(delta.grants.len(), 1);
        assert_eq!(delta.revokes.len(), 1);
    }

    #[test]
    fn test_changes_grouped_by_grantable() {
        let branch = vec![
            AclEntry::new("alice", "SELECT"),
            AclEntry::new("alice", "INSERT"),
            AclEntry::new("alice", "UPDATE").grantable(),
        ];
        let deltas = diff_table(&[], &branch);
        let changes = privilege_changes(
            &ObjectId::Table {
                schema: "public".to_string(),
                name: "t".to_string(),
            },
            ObjectKind::Table,
            deltas,
        );
        // One plain grant carrying SELECT+INSERT, one WITH GRANT OPTION.
        assert_eq!(changes.len(), 2);
    }
}
