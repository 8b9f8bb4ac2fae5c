//! Change records.
//!
//! A [`Change`] is one planned DDL statement: a hierarchical enum with one
//! per-kind operation enum per object kind. Every concrete operation knows
//! the stable ids it `creates`, `requires` and `drops`; the topological
//! analyzer orders statements from nothing else.

use serde::{Deserialize, Serialize};

use crate::catalog::id::ObjectId;
use crate::catalog::ObjectKind;

pub use crate::render::SqlRenderer;

pub use collation::*;
pub use domain::*;
pub use extension::*;
pub use foreign_data::*;
pub use function::*;
pub use index::*;
pub use policy::*;
pub use privilege::*;
pub use publication::*;
pub use role::*;
pub use schema::*;
pub use sequence::*;
pub use table::*;
pub use trigger::*;
pub use types::*;
pub use view::*;

pub mod collation;
pub mod domain;
pub mod extension;
pub mod foreign_data;
pub mod function;
pub mod index;
pub mod policy;
pub mod privilege;
pub mod publication;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod trigger;
pub mod types;
pub mod view;

/// What aspect of an object a change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeScope {
    Object,
    Comment,
    Privilege,
    Membership,
    DefaultPrivilege,
}

/// A single ADD/SET/DROP delta in an `OPTIONS (…)` list (foreign-data
/// wrappers, foreign servers, subscriptions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDelta {
    pub action: OptionAction,
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionAction {
    Add,
    Set,
    Drop,
}

/// One planned DDL statement.
#[derive(Debug, Clone)]
pub enum Change {
    Schema(SchemaChange),
    Role(RoleChange),
    Collation(CollationChange),
    Language(LanguageChange),
    Extension(ExtensionChange),
    ForeignDataWrapper(FdwChange),
    ForeignServer(ForeignServerChange),
    Enum(EnumChange),
    CompositeType(CompositeTypeChange),
    Range(RangeChange),
    Domain(DomainChange),
    Sequence(SequenceChange),
    Table(TableChange),
    View(ViewChange),
    Index(IndexChange),
    Routine(RoutineChange),
    Trigger(TriggerChange),
    EventTrigger(EventTriggerChange),
    Policy(PolicyChange),
    Publication(PublicationChange),
    Subscription(SubscriptionChange),
    Privilege(PrivilegeChange),
    DefaultPrivilege(DefaultPrivilegeChange),
}

macro_rules! for_each_change {
    ($self:expr, $op:ident => $body:expr) => {
        match $self {
            Change::Schema($op) => $body,
            Change::Role($op) => $body,
            Change::Collation($op) => $body,
            Change::Language($op) => $body,
            Change::Extension($op) => $body,
            Change::ForeignDataWrapper($op) => $body,
            Change::ForeignServer($op) => $body,
            Change::Enum($op) => $body,
            Change::CompositeType($op) => $body,
            Change::Range($op) => $body,
            Change::Domain($op) => $body,
            Change::Sequence($op) => $body,
            Change::Table($op) => $body,
            Change::View($op) => $body,
            Change::Index($op) => $body,
            Change::Routine($op) => $body,
            Change::Trigger($op) => $body,
            Change::EventTrigger($op) => $body,
            Change::Policy($op) => $body,
            Change::Publication($op) => $body,
            Change::Subscription($op) => $body,
            Change::Privilege($op) => $body,
            Change::DefaultPrivilege($op) => $body,
        }
    };
}

impl Change {
    /// The stable id of the object this change targets.
    pub fn stable_id(&self) -> ObjectId {
        for_each_change!(self, op => op.stable_id())
    }

    /// Ids this statement introduces.
    pub fn creates(&self) -> Vec<ObjectId> {
        for_each_change!(self, op => op.creates())
    }

    /// Ids this statement reads; each must exist before the statement runs.
    pub fn requires(&self) -> Vec<ObjectId> {
        for_each_change!(self, op => op.requires())
    }

    /// Ids this statement removes.
    pub fn drops(&self) -> Vec<ObjectId> {
        for_each_change!(self, op => op.drops())
    }

    pub fn scope(&self) -> ChangeScope {
        for_each_change!(self, op => op.scope())
    }

    pub fn kind(&self) -> ObjectKind {
        for_each_change!(self, op => op.kind())
    }

    pub fn is_create(&self) -> bool {
        !self.creates().is_empty()
    }

    pub fn is_drop(&self) -> bool {
        !self.drops().is_empty()
    }
}

impl SqlRenderer for Change {
    fn serialize(&self) -> String {
        for_each_change!(self, op => op.serialize())
    }
}

/// Resolve a column/base type name to a kind-agnostic `type:` reference.
/// Built-in and system-schema types contribute no dependency. Array suffixes
/// and type modifiers are stripped before the lookup.
pub fn type_reference(data_type: &str) -> Option<ObjectId> {
    let mut base = data_type.trim();
    if let Some(stripped) = base.strip_suffix("[]") {
        base = stripped.trim_end();
    }
    if let Some(open) = base.find('(') {
        base = base[..open].trim_end();
    }

    let (schema, name) = base.split_once('.')?;
    let schema = schema.trim_matches('"');
    let name = name.trim_matches('"');
    if matches!(schema, "pg_catalog" | "information_schema") {
        return None;
    }
    Some(ObjectId::Type {
        schema: schema.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_reference() {
        assert_eq!(type_reference("integer"), None);
        assert_eq!(type_reference("pg_catalog.int4"), None);
        assert_eq!(
            type_reference("public.status"),
            Some(ObjectId::Type {
                schema: "public".to_string(),
                name: "status".to_string()
            })
        );
        assert_eq!(
            type_reference("app.priority[]"),
            Some(ObjectId::Type {
                schema: "app".to_string(),
                name: "priority".to_string()
            })
        );
        assert_eq!(
            type_reference("public.money_amount(10,2)"),
            Some(ObjectId::Type {
                schema: "public".to_string(),
                name: "money_amount".to_string()
            })
        );
    }
}
