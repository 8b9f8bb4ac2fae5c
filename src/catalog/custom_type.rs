//! Enum, composite and range types.

use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use super::privilege::AclEntry;

/// One label of an enum type, with its catalog sort order. The sort order is
/// what decides BEFORE/AFTER placement when labels are added later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumLabel {
    pub name: String,
    pub sort_order: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub schema: String,
    pub name: String,
    /// Labels in target sort order.
    pub labels: Vec<EnumLabel>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl EnumType {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Enum {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// Labels sorted by catalog sort order.
    pub fn sorted_labels(&self) -> Vec<&EnumLabel> {
        let mut labels: Vec<&EnumLabel> = self.labels.iter().collect();
        labels.sort_by(|a, b| {
            a.sort_order
                .partial_cmp(&b.sort_order)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        labels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeAttribute {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub collation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeType {
    pub schema: String,
    pub name: String,
    pub attributes: Vec<CompositeAttribute>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl CompositeType {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::CompositeType {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}

/// A range type. Only the owner is alterable; every structural property
/// forces drop+create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeType {
    pub schema: String,
    pub name: String,
    pub subtype: String,
    #[serde(default)]
    pub subtype_opclass: Option<String>,
    #[serde(default)]
    pub collation: Option<String>,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub subtype_diff: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub privileges: Vec<AclEntry>,
}

impl RangeType {
    pub fn stable_id(&self) -> ObjectId {
        ObjectId::Range {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}
