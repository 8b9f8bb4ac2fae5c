use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::id::ObjectId;
use crate::catalog::privilege::ServerVersion;

pub mod collation;
pub mod custom_type;
pub mod domain;
pub mod extension;
pub mod foreign_data;
pub mod function;
pub mod id;
pub mod index;
pub mod language;
pub mod policy;
pub mod privilege;
pub mod publication;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod trigger;
pub mod view;

/// The kinds of catalog objects the planner knows how to diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Schema,
    Role,
    Collation,
    Language,
    Extension,
    ForeignDataWrapper,
    ForeignServer,
    Enum,
    Domain,
    Range,
    CompositeType,
    Sequence,
    Table,
    View,
    MaterializedView,
    Index,
    Function,
    Procedure,
    Aggregate,
    Trigger,
    EventTrigger,
    Policy,
    Publication,
    Subscription,
}

impl ObjectKind {
    /// The keyword used after `COMMENT ON`, `GRANT … ON`, `DROP` and friends.
    pub fn sql_keyword(self) -> &'static str {
        match self {
            ObjectKind::Schema => "SCHEMA",
            ObjectKind::Role => "ROLE",
            ObjectKind::Collation => "COLLATION",
            ObjectKind::Language => "LANGUAGE",
            ObjectKind::Extension => "EXTENSION",
            ObjectKind::ForeignDataWrapper => "FOREIGN DATA WRAPPER",
            ObjectKind::ForeignServer => "SERVER",
            ObjectKind::Enum | ObjectKind::Range | ObjectKind::CompositeType => "TYPE",
            ObjectKind::Domain => "DOMAIN",
            ObjectKind::Sequence => "SEQUENCE",
            ObjectKind::Table => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::MaterializedView => "MATERIALIZED VIEW",
            ObjectKind::Index => "INDEX",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Aggregate => "AGGREGATE",
            ObjectKind::Trigger => "TRIGGER",
            ObjectKind::EventTrigger => "EVENT TRIGGER",
            ObjectKind::Policy => "POLICY",
            ObjectKind::Publication => "PUBLICATION",
            ObjectKind::Subscription => "SUBSCRIPTION",
        }
    }
}

/// One catalog snapshot: everything the planner needs to know about a
/// database, as produced by the (external) extraction step. Immutable during
/// planning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub version: ServerVersion,
    #[serde(default)]
    pub roles: Vec<role::Role>,
    #[serde(default)]
    pub schemas: Vec<schema::Schema>,
    #[serde(default)]
    pub collations: Vec<collation::Collation>,
    #[serde(default)]
    pub languages: Vec<language::Language>,
    #[serde(default)]
    pub extensions: Vec<extension::Extension>,
    #[serde(default)]
    pub foreign_data_wrappers: Vec<foreign_data::ForeignDataWrapper>,
    #[serde(default)]
    pub foreign_servers: Vec<foreign_data::ForeignServer>,
    #[serde(default)]
    pub enums: Vec<custom_type::EnumType>,
    #[serde(default)]
    pub composite_types: Vec<custom_type::CompositeType>,
    #[serde(default)]
    pub ranges: Vec<custom_type::RangeType>,
    #[serde(default)]
    pub domains: Vec<domain::Domain>,
    #[serde(default)]
    pub sequences: Vec<sequence::Sequence>,
    #[serde(default)]
    pub tables: Vec<table::Table>,
    #[serde(default)]
    pub views: Vec<view::View>,
    #[serde(default)]
    pub indexes: Vec<index::Index>,
    #[serde(default)]
    pub routines: Vec<function::Routine>,
    #[serde(default)]
    pub triggers: Vec<trigger::Trigger>,
    #[serde(default)]
    pub event_triggers: Vec<trigger::EventTrigger>,
    #[serde(default)]
    pub policies: Vec<policy::Policy>,
    #[serde(default)]
    pub publications: Vec<publication::Publication>,
    #[serde(default)]
    pub subscriptions: Vec<publication::Subscription>,
}

impl Catalog {
    /// Every stable id in the snapshot, with multiplicity. Used to detect
    /// duplicate ids, which are an input error.
    pub fn all_stable_ids(&self) -> Vec<ObjectId> {
        let mut ids = Vec::new();
        ids.extend(self.roles.iter().map(|r| r.stable_id()));
        ids.extend(self.schemas.iter().map(|s| s.stable_id()));
        ids.extend(self.collations.iter().map(|c| c.stable_id()));
        ids.extend(self.languages.iter().map(|l| l.stable_id()));
        ids.extend(self.extensions.iter().map(|e| e.stable_id()));
        ids.extend(self.foreign_data_wrappers.iter().map(|f| f.stable_id()));
        ids.extend(self.foreign_servers.iter().map(|f| f.stable_id()));
        ids.extend(self.enums.iter().map(|e| e.stable_id()));
        ids.extend(self.composite_types.iter().map(|c| c.stable_id()));
        ids.extend(self.ranges.iter().map(|r| r.stable_id()));
        ids.extend(self.domains.iter().map(|d| d.stable_id()));
        ids.extend(self.sequences.iter().map(|s| s.stable_id()));
        ids.extend(self.tables.iter().map(|t| t.stable_id()));
        ids.extend(self.views.iter().map(|v| v.stable_id()));
        ids.extend(self.indexes.iter().map(|i| i.stable_id()));
        ids.extend(self.routines.iter().map(|r| r.stable_id()));
        ids.extend(self.triggers.iter().map(|t| t.stable_id()));
        ids.extend(self.event_triggers.iter().map(|t| t.stable_id()));
        ids.extend(self.policies.iter().map(|p| p.stable_id()));
        ids.extend(self.publications.iter().map(|p| p.stable_id()));
        ids.extend(self.subscriptions.iter().map(|s| s.stable_id()));
        ids
    }

    /// Stable ids that appear more than once, sorted.
    pub fn duplicate_stable_ids(&self) -> Vec<ObjectId> {
        let mut counts: BTreeMap<ObjectId, usize> = BTreeMap::new();
        for id in self.all_stable_ids() {
            *counts.entry(id).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn find_table(&self, schema: &str, name: &str) -> Option<&table::Table> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }

    pub fn find_role(&self, name: &str) -> Option<&role::Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    /// Every id a change record may legitimately reference in this
    /// snapshot: the stable ids plus the `type:` aliases of named types and
    /// the `key:` column sets of unique/primary-key constraints and
    /// indexes.
    pub fn referenceable_ids(&self) -> std::collections::BTreeSet<String> {
        let mut ids: std::collections::BTreeSet<String> = self
            .all_stable_ids()
            .iter()
            .map(|id| id.to_string())
            .collect();
        for enum_type in &self.enums {
            ids.insert(format!("type:{}.{}", enum_type.schema, enum_type.name));
        }
        for domain in &self.domains {
            ids.insert(format!("type:{}.{}", domain.schema, domain.name));
        }
        for range in &self.ranges {
            ids.insert(format!("type:{}.{}", range.schema, range.name));
        }
        for composite in &self.composite_types {
            ids.insert(format!("type:{}.{}", composite.schema, composite.name));
        }
        for table in &self.tables {
            for key in table.key_column_ids() {
                ids.insert(key.to_string());
            }
        }
        for index in &self.indexes {
            if let Some(key) = index.key_columns_id() {
                ids.insert(key.to_string());
            }
        }

        let mut acl = |id: ObjectId, privileges: &[privilege::AclEntry]| {
            for entry in privileges {
                ids.insert(id.acl(&entry.grantee).to_string());
            }
        };
        for s in &self.schemas {
            acl(s.stable_id(), &s.privileges);
        }
        for l in &self.languages {
            acl(l.stable_id(), &l.privileges);
        }
        for f in &self.foreign_data_wrappers {
            acl(f.stable_id(), &f.privileges);
        }
        for f in &self.foreign_servers {
            acl(f.stable_id(), &f.privileges);
        }
        for e in &self.enums {
            acl(e.stable_id(), &e.privileges);
        }
        for c in &self.composite_types {
            acl(c.stable_id(), &c.privileges);
        }
        for r in &self.ranges {
            acl(r.stable_id(), &r.privileges);
        }
        for d in &self.domains {
            acl(d.stable_id(), &d.privileges);
        }
        for s in &self.sequences {
            acl(s.stable_id(), &s.privileges);
        }
        for t in &self.tables {
            acl(t.stable_id(), &t.privileges);
        }
        for v in &self.views {
            acl(v.stable_id(), &v.privileges);
        }
        for r in &self.routines {
            acl(r.stable_id(), &r.privileges);
        }
        ids
    }

    /// Resolve a type name to the concrete kind that owns it, searching
    /// enums, domains, ranges and composites.
    pub fn find_type_id(&self, schema: &str, name: &str) -> Option<ObjectId> {
        if self
            .enums
            .iter()
            .any(|e| e.schema == schema && e.name == name)
        {
            return Some(ObjectId::Enum {
                schema: schema.to_string(),
                name: name.to_string(),
            });
        }
        if self
            .domains
            .iter()
            .any(|d| d.schema == schema && d.name == name)
        {
            return Some(ObjectId::Domain {
                schema: schema.to_string(),
                name: name.to_string(),
            });
        }
        if self
            .ranges
            .iter()
            .any(|r| r.schema == schema && r.name == name)
        {
            return Some(ObjectId::Range {
                schema: schema.to_string(),
                name: name.to_string(),
            });
        }
        if self
            .composite_types
            .iter()
            .any(|c| c.schema == schema && c.name == name)
        {
            return Some(ObjectId::CompositeType {
                schema: schema.to_string(),
                name: name.to_string(),
            });
        }
        None
    }
}
