//! SQL rendering for GRANT / REVOKE operations, plus the shared
//! privilege-list formatting used by every kind.

use crate::catalog::id::ObjectId;
use crate::catalog::privilege::{privileges_for, ServerVersion, PUBLIC};
use crate::catalog::ObjectKind;
use crate::diff::operations::{DefaultPrivilegeChange, PrivilegeChange};
use crate::render::{
    quote_identifier, render_object_identifier, SqlRenderer,
};

/// The keyword naming an object kind in GRANT/REVOKE. Views and
/// materialized views grant as TABLE; aggregates grant as FUNCTION.
pub fn grant_object_keyword(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Table | ObjectKind::View | ObjectKind::MaterializedView => "TABLE",
        ObjectKind::Sequence => "SEQUENCE",
        ObjectKind::Schema => "SCHEMA",
        ObjectKind::Function | ObjectKind::Aggregate => "FUNCTION",
        ObjectKind::Procedure => "PROCEDURE",
        ObjectKind::Language => "LANGUAGE",
        ObjectKind::Domain => "DOMAIN",
        ObjectKind::Enum | ObjectKind::Range | ObjectKind::CompositeType => "TYPE",
        ObjectKind::ForeignDataWrapper => "FOREIGN DATA WRAPPER",
        ObjectKind::ForeignServer => "FOREIGN SERVER",
        other => other.sql_keyword(),
    }
}

/// Format a privilege list for one object kind, collapsing to
/// `ALL PRIVILEGES` only when every privilege the target server version
/// supports for that kind is present. Otherwise the list is emitted in
/// canonical vocabulary order. Single-privilege vocabularies (USAGE on
/// domains, EXECUTE on functions) never collapse; the explicit keyword is
/// the clearer statement.
pub fn format_object_privilege_list(
    kind: ObjectKind,
    privileges: &[String],
    version: ServerVersion,
) -> String {
    let vocabulary = privileges_for(kind, version);
    let complete = vocabulary.len() > 1
        && vocabulary
            .iter()
            .all(|v| privileges.iter().any(|p| p == v));
    if complete {
        return "ALL PRIVILEGES".to_string();
    }

    let mut ordered: Vec<&String> = privileges.iter().collect();
    ordered.sort_by_key(|p| {
        vocabulary
            .iter()
            .position(|v| v == &p.as_str())
            .unwrap_or(usize::MAX)
    });
    ordered
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_grantee(grantee: &str) -> String {
    if grantee == PUBLIC {
        "PUBLIC".to_string()
    } else {
        quote_identifier(grantee)
    }
}

fn render_privilege_list(
    kind: ObjectKind,
    privileges: &[String],
    columns: &Option<Vec<String>>,
    version: ServerVersion,
) -> String {
    match columns {
        Some(cols) => {
            let column_list = cols
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<Vec<_>>()
                .join(", ");
            privileges
                .iter()
                .map(|p| format!("{} ({})", p, column_list))
                .collect::<Vec<_>>()
                .join(", ")
        }
        None => format_object_privilege_list(kind, privileges, version),
    }
}

fn render_target(kind: ObjectKind, target: &ObjectId) -> String {
    format!(
        "{} {}",
        grant_object_keyword(kind),
        render_object_identifier(target)
    )
}

impl PrivilegeChange {
    /// Serialization needs the target server version for the ALL PRIVILEGES
    /// collapse; the plain `serialize()` uses the default version.
    pub fn serialize_for_version(&self, version: ServerVersion) -> String {
        match self {
            PrivilegeChange::Grant {
                target,
                object_kind,
                grantee,
                privileges,
                grantable,
                columns,
            } => {
                let mut sql = format!(
                    "GRANT {} ON {} TO {}",
                    render_privilege_list(*object_kind, privileges, columns, version),
                    render_target(*object_kind, target),
                    render_grantee(grantee)
                );
                if *grantable {
                    sql.push_str(" WITH GRANT OPTION");
                }
                sql
            }
            PrivilegeChange::Revoke {
                target,
                object_kind,
                grantee,
                privileges,
                columns,
            } => format!(
                "REVOKE {} ON {} FROM {}",
                render_privilege_list(*object_kind, privileges, columns, version),
                render_target(*object_kind, target),
                render_grantee(grantee)
            ),
            PrivilegeChange::RevokeGrantOption {
                target,
                object_kind,
                grantee,
                privileges,
                columns,
            } => format!(
                "REVOKE GRANT OPTION FOR {} ON {} FROM {}",
                render_privilege_list(*object_kind, privileges, columns, version),
                render_target(*object_kind, target),
                render_grantee(grantee)
            ),
        }
    }
}

impl SqlRenderer for PrivilegeChange {
    fn serialize(&self) -> String {
        self.serialize_for_version(ServerVersion::default())
    }
}

impl SqlRenderer for DefaultPrivilegeChange {
    fn serialize(&self) -> String {
        match self {
            DefaultPrivilegeChange::Grant {
                role,
                in_schema,
                objtype,
                grantee,
                privileges,
                grantable,
            } => {
                let mut sql = format!(
                    "ALTER DEFAULT PRIVILEGES FOR ROLE {}",
                    quote_identifier(role)
                );
                if let Some(schema) = in_schema {
                    sql.push_str(&format!(" IN SCHEMA {}", quote_identifier(schema)));
                }
                sql.push_str(&format!(
                    " GRANT {} ON {} TO {}",
                    privileges.join(", "),
                    objtype.sql_keyword(),
                    render_grantee(grantee)
                ));
                if *grantable {
                    sql.push_str(" WITH GRANT OPTION");
                }
                sql
            }
            DefaultPrivilegeChange::Revoke {
                role,
                in_schema,
                objtype,
                grantee,
                privileges,
            } => {
                let mut sql = format!(
                    "ALTER DEFAULT PRIVILEGES FOR ROLE {}",
                    quote_identifier(role)
                );
                if let Some(schema) = in_schema {
                    sql.push_str(&format!(" IN SCHEMA {}", quote_identifier(schema)));
                }
                sql.push_str(&format!(
                    " REVOKE {} ON {} FROM {}",
                    privileges.join(", "),
                    objtype.sql_keyword(),
                    render_grantee(grantee)
                ));
                sql
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::privilege::ObjtypeCode;

    #[test]
    fn test_grant_on_domain_with_grant_option() {
        let op = PrivilegeChange::Grant {
            target: ObjectId::Domain {
                schema: "public".to_string(),
                name: "d".to_string(),
            },
            object_kind: ObjectKind::Domain,
            grantee: "alice".to_string(),
            privileges: vec!["USAGE".to_string()],
            grantable: true,
            columns: None,
        };
        assert_eq!(
            op.serialize(),
            "GRANT USAGE ON DOMAIN public.d TO alice WITH GRANT OPTION"
        );
    }

    #[test]
    fn test_revoke_grant_option_for_columns() {
        let op = PrivilegeChange::RevokeGrantOption {
            target: ObjectId::Table {
                schema: "public".to_string(),
                name: "t".to_string(),
            },
            object_kind: ObjectKind::Table,
            grantee: "alice".to_string(),
            privileges: vec!["SELECT".to_string()],
            columns: Some(vec!["col1".to_string(), "col2".to_string()]),
        };
        assert_eq!(
            op.serialize(),
            "REVOKE GRANT OPTION FOR SELECT (col1, col2) ON TABLE public.t FROM alice"
        );
    }

    #[test]
    fn test_single_privilege_vocabulary_never_collapses() {
        assert_eq!(
            format_object_privilege_list(
                ObjectKind::Domain,
                &["USAGE".to_string()],
                ServerVersion::default()
            ),
            "USAGE"
        );
        assert_eq!(
            format_object_privilege_list(
                ObjectKind::Function,
                &["EXECUTE".to_string()],
                ServerVersion::default()
            ),
            "EXECUTE"
        );
    }

    #[test]
    fn test_partial_table_privileges_do_not_collapse() {
        assert_eq!(
            format_object_privilege_list(
                ObjectKind::Table,
                &["INSERT".to_string(), "SELECT".to_string()],
                ServerVersion::default()
            ),
            "SELECT, INSERT"
        );
    }

    #[test]
    fn test_full_table_privileges_collapse_version_gated() {
        let mut privileges: Vec<String> = [
            "SELECT",
            "INSERT",
            "UPDATE",
            "DELETE",
            "TRUNCATE",
            "REFERENCES",
            "TRIGGER",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        // On 16 this is everything; on 17 MAINTAIN is missing.
        assert_eq!(
            format_object_privilege_list(ObjectKind::Table, &privileges, ServerVersion(16)),
            "ALL PRIVILEGES"
        );
        assert_eq!(
            format_object_privilege_list(ObjectKind::Table, &privileges, ServerVersion(17)),
            "SELECT, INSERT, UPDATE, DELETE, TRUNCATE, REFERENCES, TRIGGER"
        );

        privileges.push("MAINTAIN".to_string());
        assert_eq!(
            format_object_privilege_list(ObjectKind::Table, &privileges, ServerVersion(17)),
            "ALL PRIVILEGES"
        );
    }

    #[test]
    fn test_grant_to_public() {
        let op = PrivilegeChange::Grant {
            target: ObjectId::Function {
                schema: "public".to_string(),
                name: "f".to_string(),
                arguments: "integer".to_string(),
            },
            object_kind: ObjectKind::Function,
            grantee: PUBLIC.to_string(),
            privileges: vec!["EXECUTE".to_string()],
            grantable: false,
            columns: None,
        };
        assert_eq!(
            op.serialize(),
            "GRANT EXECUTE ON FUNCTION public.f(integer) TO PUBLIC"
        );
    }

    #[test]
    fn test_alter_default_privileges() {
        let op = DefaultPrivilegeChange::Grant {
            role: "app_owner".to_string(),
            in_schema: Some("app".to_string()),
            objtype: ObjtypeCode::Relation,
            grantee: "readers".to_string(),
            privileges: vec!["SELECT".to_string()],
            grantable: false,
        };
        assert_eq!(
            op.serialize(),
            "ALTER DEFAULT PRIVILEGES FOR ROLE app_owner IN SCHEMA app GRANT SELECT ON TABLES TO readers"
        );

        let revoke = DefaultPrivilegeChange::Revoke {
            role: "app_owner".to_string(),
            in_schema: None,
            objtype: ObjtypeCode::Routine,
            grantee: PUBLIC.to_string(),
            privileges: vec!["EXECUTE".to_string()],
        };
        assert_eq!(
            revoke.serialize(),
            "ALTER DEFAULT PRIVILEGES FOR ROLE app_owner REVOKE EXECUTE ON FUNCTIONS FROM PUBLIC"
        );
    }
}
