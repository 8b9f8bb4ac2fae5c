//! Stable object identifiers.
//!
//! Every catalog object is addressed by an [`ObjectId`]. The `Display` form
//! follows the grammar `kind ":" schema "." name [ "(" arg-types ")" ]` and is
//! the sole currency of the dependency graph. Auxiliary namespaces (`acl:`,
//! `comment:`, `key:`) let privilege and constraint statements depend on
//! things that are not first-class catalog objects.

use std::fmt;

/// A globally unique identifier for any database object known to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    Schema {
        name: String,
    },
    Role {
        name: String,
    },
    Collation {
        schema: String,
        name: String,
    },
    Language {
        name: String,
    },
    Extension {
        name: String,
    },
    ForeignDataWrapper {
        name: String,
    },
    ForeignServer {
        name: String,
    },
    /// Kind-agnostic alias for enum/domain/range/composite types. CREATE
    /// changes for those kinds also provide this id, so references that only
    /// know a type's name (column types, domain base types) can resolve
    /// without knowing which kind of type they point at.
    Type {
        schema: String,
        name: String,
    },
    Enum {
        schema: String,
        name: String,
    },
    Domain {
        schema: String,
        name: String,
    },
    Range {
        schema: String,
        name: String,
    },
    CompositeType {
        schema: String,
        name: String,
    },
    Sequence {
        schema: String,
        name: String,
    },
    Table {
        schema: String,
        name: String,
    },
    View {
        schema: String,
        name: String,
    },
    MaterializedView {
        schema: String,
        name: String,
    },
    Index {
        schema: String,
        name: String,
    },
    Function {
        schema: String,
        name: String,
        arguments: String,
    },
    Procedure {
        schema: String,
        name: String,
        arguments: String,
    },
    Aggregate {
        schema: String,
        name: String,
        arguments: String,
    },
    Trigger {
        schema: String,
        table: String,
        name: String,
    },
    EventTrigger {
        name: String,
    },
    Policy {
        schema: String,
        table: String,
        name: String,
    },
    Publication {
        name: String,
    },
    Subscription {
        name: String,
    },

    /// One grantee's ACL slice on an object: `acl:<object>::grantee:<role>`.
    Acl {
        object: Box<ObjectId>,
        grantee: String,
    },
    /// The comment attached to an object: `comment:<qualified-name>`.
    Comment {
        object: Box<ObjectId>,
    },
    /// A unique or primary-key column set surfaced to foreign-key references:
    /// `key:<schema>.<table>(<col,col…>)`.
    KeyColumns {
        schema: String,
        table: String,
        columns: Vec<String>,
    },
}

impl ObjectId {
    /// The `kind` prefix of the display grammar.
    pub fn kind_prefix(&self) -> &'static str {
        match self {
            ObjectId::Schema { .. } => "schema",
            ObjectId::Role { .. } => "role",
            ObjectId::Collation { .. } => "collation",
            ObjectId::Language { .. } => "language",
            ObjectId::Extension { .. } => "extension",
            ObjectId::ForeignDataWrapper { .. } => "foreign_data_wrapper",
            ObjectId::ForeignServer { .. } => "foreign_server",
            ObjectId::Type { .. } => "type",
            ObjectId::Enum { .. } => "enum",
            ObjectId::Domain { .. } => "domain",
            ObjectId::Range { .. } => "range",
            ObjectId::CompositeType { .. } => "composite_type",
            ObjectId::Sequence { .. } => "sequence",
            ObjectId::Table { .. } => "table",
            ObjectId::View { .. } => "view",
            ObjectId::MaterializedView { .. } => "materialized_view",
            ObjectId::Index { .. } => "index",
            ObjectId::Function { .. } => "function",
            ObjectId::Procedure { .. } => "procedure",
            ObjectId::Aggregate { .. } => "aggregate",
            ObjectId::Trigger { .. } => "trigger",
            ObjectId::EventTrigger { .. } => "event_trigger",
            ObjectId::Policy { .. } => "policy",
            ObjectId::Publication { .. } => "publication",
            ObjectId::Subscription { .. } => "subscription",
            ObjectId::Acl { .. } => "acl",
            ObjectId::Comment { .. } => "comment",
            ObjectId::KeyColumns { .. } => "key",
        }
    }

    /// The qualified-name portion of the display grammar, without the kind
    /// prefix or signature.
    pub fn qualified_name(&self) -> String {
        match self {
            ObjectId::Schema { name }
            | ObjectId::Role { name }
            | ObjectId::Language { name }
            | ObjectId::Extension { name }
            | ObjectId::ForeignDataWrapper { name }
            | ObjectId::ForeignServer { name }
            | ObjectId::EventTrigger { name }
            | ObjectId::Publication { name }
            | ObjectId::Subscription { name } => name.clone(),
            ObjectId::Collation { schema, name }
            | ObjectId::Type { schema, name }
            | ObjectId::Enum { schema, name }
            | ObjectId::Domain { schema, name }
            | ObjectId::Range { schema, name }
            | ObjectId::CompositeType { schema, name }
            | ObjectId::Sequence { schema, name }
            | ObjectId::Table { schema, name }
            | ObjectId::View { schema, name }
            | ObjectId::MaterializedView { schema, name }
            | ObjectId::Index { schema, name }
            | ObjectId::Function { schema, name, .. }
            | ObjectId::Procedure { schema, name, .. }
            | ObjectId::Aggregate { schema, name, .. } => format!("{}.{}", schema, name),
            ObjectId::Trigger {
                schema,
                table,
                name,
            }
            | ObjectId::Policy {
                schema,
                table,
                name,
            } => format!("{}.{}.{}", schema, table, name),
            ObjectId::Acl { object, .. } | ObjectId::Comment { object } => object.qualified_name(),
            ObjectId::KeyColumns { schema, table, .. } => format!("{}.{}", schema, table),
        }
    }

    /// The schema this object lives in, when it has one. For `Schema` ids the
    /// name itself is returned; cluster-wide objects return `None`.
    pub fn schema(&self) -> Option<&str> {
        match self {
            ObjectId::Schema { name } => Some(name.as_str()),
            ObjectId::Collation { schema, .. }
            | ObjectId::Type { schema, .. }
            | ObjectId::Enum { schema, .. }
            | ObjectId::Domain { schema, .. }
            | ObjectId::Range { schema, .. }
            | ObjectId::CompositeType { schema, .. }
            | ObjectId::Sequence { schema, .. }
            | ObjectId::Table { schema, .. }
            | ObjectId::View { schema, .. }
            | ObjectId::MaterializedView { schema, .. }
            | ObjectId::Index { schema, .. }
            | ObjectId::Function { schema, .. }
            | ObjectId::Procedure { schema, .. }
            | ObjectId::Aggregate { schema, .. }
            | ObjectId::Trigger { schema, .. }
            | ObjectId::Policy { schema, .. }
            | ObjectId::KeyColumns { schema, .. } => Some(schema.as_str()),
            ObjectId::Role { .. }
            | ObjectId::Language { .. }
            | ObjectId::Extension { .. }
            | ObjectId::ForeignDataWrapper { .. }
            | ObjectId::ForeignServer { .. }
            | ObjectId::EventTrigger { .. }
            | ObjectId::Publication { .. }
            | ObjectId::Subscription { .. } => None,
            ObjectId::Acl { object, .. } | ObjectId::Comment { object } => object.schema(),
        }
    }

    /// Wrap this id into its `acl:` namespace for one grantee.
    pub fn acl(&self, grantee: &str) -> ObjectId {
        ObjectId::Acl {
            object: Box::new(self.clone()),
            grantee: grantee.to_string(),
        }
    }

    /// Wrap this id into its `comment:` namespace.
    pub fn comment(&self) -> ObjectId {
        ObjectId::Comment {
            object: Box::new(self.clone()),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Function { arguments, .. }
            | ObjectId::Procedure { arguments, .. }
            | ObjectId::Aggregate { arguments, .. } => write!(
                f,
                "{}:{}({})",
                self.kind_prefix(),
                self.qualified_name(),
                arguments
            ),
            ObjectId::Acl { object, grantee } => {
                write!(f, "acl:{}::grantee:{}", object, grantee)
            }
            ObjectId::KeyColumns {
                schema,
                table,
                columns,
            } => write!(f, "key:{}.{}({})", schema, table, columns.join(",")),
            _ => write!(f, "{}:{}", self.kind_prefix(), self.qualified_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grammar() {
        assert_eq!(
            ObjectId::Table {
                schema: "public".to_string(),
                name: "users".to_string()
            }
            .to_string(),
            "table:public.users"
        );

        assert_eq!(
            ObjectId::Function {
                schema: "app".to_string(),
                name: "add".to_string(),
                arguments: "pg_catalog.int4,pg_catalog.int4".to_string()
            }
            .to_string(),
            "function:app.add(pg_catalog.int4,pg_catalog.int4)"
        );

        assert_eq!(
            ObjectId::Role {
                name: "alice".to_string()
            }
            .to_string(),
            "role:alice"
        );
    }

    #[test]
    fn test_auxiliary_namespaces() {
        let table = ObjectId::Table {
            schema: "public".to_string(),
            name: "t".to_string(),
        };

        assert_eq!(
            table.acl("alice").to_string(),
            "acl:table:public.t::grantee:alice"
        );
        assert_eq!(table.comment().to_string(), "comment:public.t");
        assert_eq!(
            ObjectId::KeyColumns {
                schema: "public".to_string(),
                table: "t".to_string(),
                columns: vec!["a".to_string(), "b".to_string()],
            }
            .to_string(),
            "key:public.t(a,b)"
        );
    }

    #[test]
    fn test_schema_accessor() {
        assert_eq!(
            ObjectId::Policy {
                schema: "app".to_string(),
                table: "users".to_string(),
                name: "by_owner".to_string()
            }
            .schema(),
            Some("app")
        );
        assert_eq!(
            ObjectId::Extension {
                name: "pgcrypto".to_string()
            }
            .schema(),
            None
        );
    }
}
