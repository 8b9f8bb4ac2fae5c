//! Enum, composite and range type operations

use crate::catalog::custom_type::{CompositeType, EnumType, RangeType};
use crate::catalog::id::ObjectId;
use crate::catalog::ObjectKind;

use super::ChangeScope;

/// Neighbor placement for `ALTER TYPE … ADD VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValuePosition {
    Before(String),
    After(String),
    Last,
}

#[derive(Debug, Clone)]
pub enum EnumChange {
    Create {
        enum_type: EnumType,
    },
    Drop {
        schema: String,
        name: String,
    },
    AddValue {
        schema: String,
        name: String,
        value: String,
        position: EnumValuePosition,
    },
    ChangeOwner {
        schema: String,
        name: String,
        owner: String,
    },
    Comment {
        schema: String,
        name: String,
        comment: Option<String>,
    },
}

impl EnumChange {
    fn ids(&self) -> (String, String) {
        match self {
            EnumChange::Create { enum_type } => {
                (enum_type.schema.clone(), enum_type.name.clone())
            }
            EnumChange::Drop { schema, name }
            | EnumChange::AddValue { schema, name, .. }
            | EnumChange::ChangeOwner { schema, name, .. }
            | EnumChange::Comment { schema, name, .. } => (schema.clone(), name.clone()),
        }
    }

    pub fn stable_id(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::Enum { schema, name }
    }

    fn type_alias(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::Type { schema, name }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            EnumChange::Create { .. } => vec![self.stable_id(), self.type_alias()],
            EnumChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            EnumChange::Create { enum_type } => vec![ObjectId::Schema {
                name: enum_type.schema.clone(),
            }],
            EnumChange::ChangeOwner { owner, .. } => vec![
                self.stable_id(),
                ObjectId::Role {
                    name: owner.clone(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            EnumChange::Drop { .. } => vec![self.stable_id(), self.type_alias()],
            EnumChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            EnumChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Enum
    }
}

#[derive(Debug, Clone)]
pub enum CompositeTypeChange {
    Create {
        composite: CompositeType,
        /// Type references of the attributes, resolved by the differ.
        depends_on: Vec<ObjectId>,
    },
    Drop {
        schema: String,
        name: String,
    },
    ChangeOwner {
        schema: String,
        name: String,
        owner: String,
    },
    Comment {
        schema: String,
        name: String,
        comment: Option<String>,
    },
}

impl CompositeTypeChange {
    fn ids(&self) -> (String, String) {
        match self {
            CompositeTypeChange::Create { composite, .. } => {
                (composite.schema.clone(), composite.name.clone())
            }
            CompositeTypeChange::Drop { schema, name }
            | CompositeTypeChange::ChangeOwner { schema, name, .. }
            | CompositeTypeChange::Comment { schema, name, .. } => {
                (schema.clone(), name.clone())
            }
        }
    }

    pub fn stable_id(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::CompositeType { schema, name }
    }

    fn type_alias(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::Type { schema, name }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            CompositeTypeChange::Create { .. } => vec![self.stable_id(), self.type_alias()],
            CompositeTypeChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            CompositeTypeChange::Create {
                composite,
                depends_on,
            } => {
                let mut reqs = vec![ObjectId::Schema {
                    name: composite.schema.clone(),
                }];
                reqs.extend(depends_on.iter().cloned());
                reqs
            }
            CompositeTypeChange::ChangeOwner { owner, .. } => vec![
                self.stable_id(),
                ObjectId::Role {
                    name: owner.clone(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            CompositeTypeChange::Drop { .. } => vec![self.stable_id(), self.type_alias()],
            CompositeTypeChange::Comment { comment: None, .. } => {
                vec![self.stable_id().comment()]
            }
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            CompositeTypeChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::CompositeType
    }
}

#[derive(Debug, Clone)]
pub enum RangeChange {
    Create {
        range: RangeType,
        depends_on: Vec<ObjectId>,
    },
    Drop {
        schema: String,
        name: String,
    },
    ChangeOwner {
        schema: String,
        name: String,
        owner: String,
    },
    Comment {
        schema: String,
        name: String,
        comment: Option<String>,
    },
}

impl RangeChange {
    fn ids(&self) -> (String, String) {
        match self {
            RangeChange::Create { range, .. } => (range.schema.clone(), range.name.clone()),
            RangeChange::Drop { schema, name }
            | RangeChange::ChangeOwner { schema, name, .. }
            | RangeChange::Comment { schema, name, .. } => (schema.clone(), name.clone()),
        }
    }

    pub fn stable_id(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::Range { schema, name }
    }

    fn type_alias(&self) -> ObjectId {
        let (schema, name) = self.ids();
        ObjectId::Type { schema, name }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            RangeChange::Create { .. } => vec![self.stable_id(), self.type_alias()],
            RangeChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            RangeChange::Create { range, depends_on } => {
                let mut reqs = vec![ObjectId::Schema {
                    name: range.schema.clone(),
                }];
                reqs.extend(depends_on.iter().cloned());
                reqs
            }
            RangeChange::ChangeOwner { owner, .. } => vec![
                self.stable_id(),
                ObjectId::Role {
                    name: owner.clone(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            RangeChange::Drop { .. } => vec![self.stable_id(), self.type_alias()],
            RangeChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            RangeChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Range
    }
}
