//! View and materialized-view operations

use std::collections::BTreeMap;

use crate::catalog::id::ObjectId;
use crate::catalog::view::View;
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum ViewChange {
    Create {
        view: View,
        /// Relations the body reads, resolved by the differ.
        depends_on: Vec<ObjectId>,
    },
    /// `CREATE OR REPLACE VIEW`, preferred over drop+create for plain views
    /// so dependents survive. Materialized views never take this path.
    Replace {
        view: View,
        depends_on: Vec<ObjectId>,
    },
    Drop {
        schema: String,
        name: String,
        materialized: bool,
    },
    SetOptions {
        schema: String,
        name: String,
        materialized: bool,
        options: BTreeMap<String, String>,
    },
    ResetOptions {
        schema: String,
        name: String,
        materialized: bool,
        keys: Vec<String>,
    },
    ChangeOwner {
        schema: String,
        name: String,
        materialized: bool,
        owner: String,
    },
    Comment {
        schema: String,
        name: String,
        materialized: bool,
        comment: Option<String>,
    },
    ColumnComment {
        schema: String,
        name: String,
        materialized: bool,
        column: String,
        comment: Option<String>,
    },
}

impl ViewChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            ViewChange::Create { view, .. } | ViewChange::Replace { view, .. } => view.stable_id(),
            ViewChange::Drop {
                schema,
                name,
                materialized,
            }
            | ViewChange::SetOptions {
                schema,
                name,
                materialized,
                ..
            }
            | ViewChange::ResetOptions {
                schema,
                name,
                materialized,
                ..
            }
            | ViewChange::ChangeOwner {
                schema,
                name,
                materialized,
                ..
            }
            | ViewChange::Comment {
                schema,
                name,
                materialized,
                ..
            }
            | ViewChange::ColumnComment {
                schema,
                name,
                materialized,
                ..
            } => {
                if *materialized {
                    ObjectId::MaterializedView {
                        schema: schema.clone(),
                        name: name.clone(),
                    }
                } else {
                    ObjectId::View {
                        schema: schema.clone(),
                        name: name.clone(),
                    }
                }
            }
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            ViewChange::Create { .. } => vec![self.stable_id()],
            ViewChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            ViewChange::Create { view, depends_on } => {
                let mut reqs = vec![ObjectId::Schema {
                    name: view.schema.clone(),
                }];
                reqs.extend(depends_on.iter().cloned());
                reqs
            }
            ViewChange::Replace { depends_on, .. } => {
                let mut reqs = vec![self.stable_id()];
                reqs.extend(depends_on.iter().cloned());
                reqs
            }
            ViewChange::ChangeOwner { owner, .. } => vec![
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
            ViewChange::Drop { .. } => vec![self.stable_id()],
            ViewChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            ViewChange::Comment { .. } | ViewChange::ColumnComment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self.stable_id() {
            ObjectId::MaterializedView { .. } => ObjectKind::MaterializedView,
            _ => ObjectKind::View,
        }
    }
}
