//! Catalog diffing.
//!
//! [`diff_all`] runs every per-kind differ over two catalog snapshots and
//! emits the unordered change list; ordering is the topological analyzer's
//! job. Mutable planning state (the default-privilege projection,
//! accumulated diagnostics) lives in [`PlanContext`], owned by one planning
//! pass.

pub mod collations;
pub mod comment_utils;
pub mod custom_types;
pub mod default_privileges;
pub mod domains;
pub mod extensions;
pub mod foreign_data;
pub mod functions;
pub mod indexes;
pub mod kernel;
pub mod languages;
pub mod operations;
pub mod policies;
pub mod privileges;
pub mod publications;
pub mod roles;
pub mod schemas;
pub mod sequences;
pub mod tables;
pub mod triggers;
pub mod views;

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::info;

use crate::catalog::id::ObjectId;
use crate::catalog::privilege::{AclEntry, ServerVersion};
use crate::catalog::{Catalog, ObjectKind};
use crate::diff::default_privileges::DefaultPrivilegeState;
use crate::diff::operations::{Change, DefaultPrivilegeChange};
use crate::topo::diagnostics::{Diagnostic, DiagnosticCode, Severity};

/// Planner failures that abort one object (never the whole plan).
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(
        "enum {id} removes or reorders labels; ALTER TYPE cannot express this without data loss"
    )]
    EnumLabelRemoval { id: ObjectId },
    #[error("grant on {id} mixes grantable flags within one statement")]
    MixedGrantableFlags { id: ObjectId },
}

/// Knobs for one planning pass.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// The role that will run the generated DDL; owners differing from it
    /// get an explicit `OWNER TO`.
    pub current_user: String,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            current_user: "postgres".to_string(),
        }
    }
}

/// Mutable state threaded through one planning pass.
pub struct PlanContext<'a> {
    pub main: &'a Catalog,
    pub branch: &'a Catalog,
    pub current_user: String,
    pub version: ServerVersion,
    pub defaults: DefaultPrivilegeState,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> PlanContext<'a> {
    pub fn new(main: &'a Catalog, branch: &'a Catalog, options: &PlanOptions) -> Self {
        Self {
            main,
            branch,
            current_user: options.current_user.clone(),
            version: branch.version,
            defaults: DefaultPrivilegeState::from_roles(&main.roles),
            diagnostics: Vec::new(),
        }
    }

    /// Reconcile an altered object's ACL.
    pub fn reconcile_acl(
        &self,
        target: &ObjectId,
        kind: ObjectKind,
        main_acl: &[AclEntry],
        branch_acl: &[AclEntry],
        owner: &str,
    ) -> Vec<Change> {
        let deltas = privileges::diff_privileges(main_acl, branch_acl, owner, kind, self.version);
        privileges::privilege_changes(target, kind, deltas)
    }

    /// Reconcile a freshly created object's ACL against the effective
    /// default privileges it inherits the moment it exists.
    pub fn created_acl_changes(
        &self,
        target: &ObjectId,
        kind: ObjectKind,
        owner: &str,
        schema: Option<&str>,
        branch_acl: &[AclEntry],
    ) -> Vec<Change> {
        let inherited = self.defaults.effective_defaults(owner, kind, schema);
        self.reconcile_acl(target, kind, &inherited, branch_acl, owner)
    }

    /// Resolve `(schema?, name)` relation references against the branch
    /// catalog. Unqualified names try `default_schema` first, then
    /// `public`. Unknown relations contribute nothing; they may exist only
    /// in the live database.
    pub fn resolve_relation_refs(
        &self,
        refs: &[(Option<String>, String)],
        default_schema: &str,
    ) -> Vec<ObjectId> {
        let mut out = BTreeSet::new();
        for (schema, name) in refs {
            let candidates: Vec<&str> = match schema {
                Some(s) => vec![s.as_str()],
                None => vec![default_schema, "public"],
            };
            for candidate in candidates {
                if let Some(table) = self.branch.find_table(candidate, name) {
                    out.insert(table.stable_id());
                    break;
                }
                if let Some(view) = self
                    .branch
                    .views
                    .iter()
                    .find(|v| v.schema == candidate && v.name == *name)
                {
                    out.insert(view.stable_id());
                    break;
                }
            }
        }
        out.into_iter().collect()
    }

    pub fn report_invariant(&mut self, error: PlanError, id: &ObjectId) {
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::InvariantViolation,
                Severity::Error,
                error.to_string(),
            )
            .with_objects(vec![id.to_string()]),
        );
    }
}

fn check_duplicate_ids(catalog: &Catalog, label: &str, diagnostics: &mut Vec<Diagnostic>) {
    for id in catalog.duplicate_stable_ids() {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::DuplicateStableId,
                Severity::Error,
                format!("duplicate stable id {} in {} catalog", id, label),
            )
            .with_objects(vec![id.to_string()]),
        );
    }
}

/// Diff two roles' default-privilege configuration. Emitted changes are
/// replayed into the projection immediately so later CREATE differs see the
/// state as-if executed.
fn diff_role_default_privileges(ctx: &mut PlanContext) -> Vec<Change> {
    use std::collections::BTreeMap;

    let mut changes = Vec::new();

    let mut role_names: BTreeSet<&str> = ctx.main.roles.iter().map(|r| r.name.as_str()).collect();
    role_names.extend(ctx.branch.roles.iter().map(|r| r.name.as_str()));

    for role_name in role_names {
        // A dropped role takes its defaults with it.
        if ctx.branch.find_role(role_name).is_none() {
            continue;
        }

        let main_entries: BTreeSet<_> = ctx
            .main
            .find_role(role_name)
            .map(|r| r.default_privileges.iter().cloned().collect())
            .unwrap_or_default();
        let branch_entries: BTreeSet<_> = ctx
            .branch
            .find_role(role_name)
            .map(|r| r.default_privileges.iter().cloned().collect())
            .unwrap_or_default();

        // Group per (objtype, schema, grantee, grantable) so each emitted
        // statement carries one consistent flag.
        type GroupKey = (char, Option<String>, String, bool);
        let mut grants: BTreeMap<GroupKey, Vec<String>> = BTreeMap::new();
        let mut revokes: BTreeMap<(char, Option<String>, String), Vec<String>> = BTreeMap::new();

        for entry in branch_entries.difference(&main_entries) {
            grants
                .entry((
                    entry.objtype.as_char(),
                    entry.in_schema.clone(),
                    entry.grantee.clone(),
                    entry.grantable,
                ))
                .or_default()
                .push(entry.privilege.clone());
        }
        for entry in main_entries.difference(&branch_entries) {
            // Losing just the grant option re-grants plain below; only a
            // fully removed privilege revokes.
            let retained = branch_entries.iter().any(|b| {
                b.objtype == entry.objtype
                    && b.in_schema == entry.in_schema
                    && b.grantee == entry.grantee
                    && b.privilege == entry.privilege
            });
            if !retained {
                revokes
                    .entry((
                        entry.objtype.as_char(),
                        entry.in_schema.clone(),
                        entry.grantee.clone(),
                    ))
                    .or_default()
                    .push(entry.privilege.clone());
            }
        }

        for ((code, in_schema, grantee), privileges) in revokes {
            let change = DefaultPrivilegeChange::Revoke {
                role: role_name.to_string(),
                in_schema,
                objtype: objtype_from_char(code),
                grantee,
                privileges,
            };
            ctx.defaults.apply(&change);
            changes.push(Change::DefaultPrivilege(change));
        }
        for ((code, in_schema, grantee, grantable), privileges) in grants {
            let change = DefaultPrivilegeChange::Grant {
                role: role_name.to_string(),
                in_schema,
                objtype: objtype_from_char(code),
                grantee,
                privileges,
                grantable,
            };
            ctx.defaults.apply(&change);
            changes.push(Change::DefaultPrivilege(change));
        }
    }

    changes
}

fn objtype_from_char(code: char) -> crate::catalog::privilege::ObjtypeCode {
    use crate::catalog::privilege::ObjtypeCode;
    match code {
        'r' => ObjtypeCode::Relation,
        'S' => ObjtypeCode::Sequence,
        'f' => ObjtypeCode::Routine,
        'T' => ObjtypeCode::Type,
        _ => ObjtypeCode::Schema,
    }
}

/// Run every per-kind differ, in dependency-friendly emission order so the
/// default-privilege projection is consulted and updated as-if executed.
pub fn diff_all(
    main: &Catalog,
    branch: &Catalog,
    options: &PlanOptions,
) -> (Vec<Change>, Vec<Diagnostic>) {
    info!("diffing catalogs");

    let mut ctx = PlanContext::new(main, branch, options);
    check_duplicate_ids(main, "main", &mut ctx.diagnostics);
    check_duplicate_ids(branch, "branch", &mut ctx.diagnostics);

    let mut changes = Vec::new();

    changes.extend(roles::diff(&mut ctx));
    changes.extend(diff_role_default_privileges(&mut ctx));
    changes.extend(schemas::diff(&mut ctx));
    changes.extend(extensions::diff(&mut ctx));
    changes.extend(languages::diff(&mut ctx));
    changes.extend(collations::diff(&mut ctx));
    changes.extend(foreign_data::diff_wrappers(&mut ctx));
    changes.extend(foreign_data::diff_servers(&mut ctx));
    changes.extend(custom_types::diff_enums(&mut ctx));
    changes.extend(custom_types::diff_composites(&mut ctx));
    changes.extend(custom_types::diff_ranges(&mut ctx));
    changes.extend(domains::diff(&mut ctx));
    changes.extend(sequences::diff(&mut ctx));
    changes.extend(tables::diff(&mut ctx));
    changes.extend(indexes::diff(&mut ctx));
    changes.extend(functions::diff(&mut ctx));
    changes.extend(views::diff(&mut ctx));
    changes.extend(triggers::diff_triggers(&mut ctx));
    changes.extend(triggers::diff_event_triggers(&mut ctx));
    changes.extend(policies::diff(&mut ctx));
    changes.extend(publications::diff_publications(&mut ctx));
    changes.extend(publications::diff_subscriptions(&mut ctx));

    info!(change_count = changes.len(), "diff complete");
    (changes, ctx.diagnostics)
}
