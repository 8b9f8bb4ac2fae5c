//! ACL model and the fixed privilege vocabulary.
//!
//! PostgreSQL's privilege vocabulary varies by object kind and, occasionally,
//! by server version (MAINTAIN arrived with 17). The tables here are the one
//! place that knowledge lives; differs and renderers consult them instead of
//! hard-coding privilege lists.

use serde::{Deserialize, Serialize};

use super::ObjectKind;

/// The pseudo-role every PostgreSQL cluster knows.
pub const PUBLIC: &str = "public";

/// A single ACL entry on an object. `columns` is present only for
/// column-scoped grants on tables, views and materialized views.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AclEntry {
    pub grantee: String,
    pub privilege: String,
    #[serde(default)]
    pub grantable: bool,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

impl AclEntry {
    pub fn new(grantee: &str, privilege: &str) -> Self {
        Self {
            grantee: grantee.to_string(),
            privilege: privilege.to_string(),
            grantable: false,
            columns: None,
        }
    }

    pub fn grantable(mut self) -> Self {
        self.grantable = true;
        self
    }

    pub fn on_columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }
}

/// Target server major version. Gates the privilege vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerVersion(pub u32);

impl Default for ServerVersion {
    fn default() -> Self {
        ServerVersion(17)
    }
}

/// `pg_default_acl`-style object type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjtypeCode {
    /// `r`: tables, views, materialized views
    Relation,
    /// `S`: sequences
    Sequence,
    /// `f`: functions, procedures, aggregates
    Routine,
    /// `T`: types, domains, enums, ranges, composites
    Type,
    /// `n`: schemas
    Schema,
}

impl ObjtypeCode {
    pub fn as_char(self) -> char {
        match self {
            ObjtypeCode::Relation => 'r',
            ObjtypeCode::Sequence => 'S',
            ObjtypeCode::Routine => 'f',
            ObjtypeCode::Type => 'T',
            ObjtypeCode::Schema => 'n',
        }
    }

    pub fn for_kind(kind: ObjectKind) -> Option<ObjtypeCode> {
        match kind {
            ObjectKind::Table | ObjectKind::View | ObjectKind::MaterializedView => {
                Some(ObjtypeCode::Relation)
            }
            ObjectKind::Sequence => Some(ObjtypeCode::Sequence),
            ObjectKind::Function | ObjectKind::Procedure | ObjectKind::Aggregate => {
                Some(ObjtypeCode::Routine)
            }
            ObjectKind::Enum
            | ObjectKind::Domain
            | ObjectKind::Range
            | ObjectKind::CompositeType => Some(ObjtypeCode::Type),
            ObjectKind::Schema => Some(ObjtypeCode::Schema),
            _ => None,
        }
    }

    /// The keyword used in `ALTER DEFAULT PRIVILEGES … ON <keyword>`.
    pub fn sql_keyword(self) -> &'static str {
        match self {
            ObjtypeCode::Relation => "TABLES",
            ObjtypeCode::Sequence => "SEQUENCES",
            ObjtypeCode::Routine => "FUNCTIONS",
            ObjtypeCode::Type => "TYPES",
            ObjtypeCode::Schema => "SCHEMAS",
        }
    }
}

/// One row of a role's `ALTER DEFAULT PRIVILEGES` configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefaultAclEntry {
    pub objtype: ObjtypeCode,
    #[serde(default)]
    pub in_schema: Option<String>,
    pub grantee: String,
    pub privilege: String,
    #[serde(default)]
    pub grantable: bool,
}

/// The full privilege vocabulary for an object kind at a server version, in
/// canonical order. Empty for kinds that carry no grantable privileges.
pub fn privileges_for(kind: ObjectKind, version: ServerVersion) -> &'static [&'static str] {
    match kind {
        ObjectKind::Table | ObjectKind::View | ObjectKind::MaterializedView => {
            if version.0 >= 17 {
                &[
                    "SELECT",
                    "INSERT",
                    "UPDATE",
                    "DELETE",
                    "TRUNCATE",
                    "REFERENCES",
                    "TRIGGER",
                    "MAINTAIN",
                ]
            } else {
                &[
                    "SELECT",
                    "INSERT",
                    "UPDATE",
                    "DELETE",
                    "TRUNCATE",
                    "REFERENCES",
                    "TRIGGER",
                ]
            }
        }
        ObjectKind::Sequence => &["SELECT", "UPDATE", "USAGE"],
        ObjectKind::Schema => &["USAGE", "CREATE"],
        ObjectKind::Function | ObjectKind::Procedure | ObjectKind::Aggregate => &["EXECUTE"],
        ObjectKind::Language => &["USAGE"],
        ObjectKind::Enum | ObjectKind::Domain | ObjectKind::Range | ObjectKind::CompositeType => {
            &["USAGE"]
        }
        ObjectKind::ForeignDataWrapper | ObjectKind::ForeignServer => &["USAGE"],
        _ => &[],
    }
}

/// Privileges that may be granted per column on a relation.
pub fn column_privileges() -> &'static [&'static str] {
    &["SELECT", "INSERT", "UPDATE", "REFERENCES"]
}

/// Privileges PostgreSQL grants to PUBLIC by default when an object of this
/// kind is created. These are filtered out of both sides before diffing: they
/// exist whether or not anyone ever ran a GRANT.
pub fn builtin_public_privileges(kind: ObjectKind, _version: ServerVersion) -> &'static [&'static str] {
    match kind {
        ObjectKind::Function | ObjectKind::Procedure | ObjectKind::Aggregate => &["EXECUTE"],
        ObjectKind::Enum | ObjectKind::Domain | ObjectKind::Range | ObjectKind::CompositeType => {
            &["USAGE"]
        }
        ObjectKind::Language => &["USAGE"],
        _ => &[],
    }
}

/// Sort a privilege list into the canonical vocabulary order. Privileges not
/// in the vocabulary sort after known ones, alphabetically.
pub fn sort_privileges(kind: ObjectKind, version: ServerVersion, privs: &mut Vec<String>) {
    let vocab = privileges_for(kind, version);
    privs.sort_by(|a, b| {
        let pos = |p: &str| vocab.iter().position(|v| *v == p).unwrap_or(usize::MAX);
        pos(a).cmp(&pos(b)).then_with(|| a.cmp(b))
    });
    privs.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintain_gated_on_17() {
        assert!(privileges_for(ObjectKind::Table, ServerVersion(17)).contains(&"MAINTAIN"));
        assert!(!privileges_for(ObjectKind::Table, ServerVersion(16)).contains(&"MAINTAIN"));
    }

    #[test]
    fn test_builtin_public_defaults() {
        assert_eq!(
            builtin_public_privileges(ObjectKind::Function, ServerVersion::default()),
            &["EXECUTE"]
        );
        assert_eq!(
            builtin_public_privileges(ObjectKind::Domain, ServerVersion::default()),
            &["USAGE"]
        );
        assert!(builtin_public_privileges(ObjectKind::Table, ServerVersion::default()).is_empty());
    }

    #[test]
    fn test_sort_privileges_canonical_order() {
        let mut privs = vec![
            "TRIGGER".to_string(),
            "SELECT".to_string(),
            "INSERT".to_string(),
        ];
        sort_privileges(ObjectKind::Table, ServerVersion::default(), &mut privs);
        assert_eq!(privs, vec!["SELECT", "INSERT", "TRIGGER"]);
    }

    #[test]
    fn test_objtype_codes() {
        assert_eq!(ObjtypeCode::for_kind(ObjectKind::View), Some(ObjtypeCode::Relation));
        assert_eq!(ObjtypeCode::for_kind(ObjectKind::Aggregate), Some(ObjtypeCode::Routine));
        assert_eq!(ObjtypeCode::for_kind(ObjectKind::Trigger), None);
        assert_eq!(ObjtypeCode::Sequence.as_char(), 'S');
    }
}
