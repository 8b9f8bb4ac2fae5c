//! Extension and procedural-language operations

use crate::catalog::extension::Extension;
use crate::catalog::id::ObjectId;
use crate::catalog::language::Language;
use crate::catalog::ObjectKind;

use super::ChangeScope;

#[derive(Debug, Clone)]
pub enum ExtensionChange {
    Create {
        extension: Extension,
    },
    Drop {
        name: String,
    },
    UpdateVersion {
        name: String,
        version: String,
    },
    SetSchema {
        name: String,
        schema: String,
    },
    Comment {
        name: String,
        comment: Option<String>,
    },
}

impl ExtensionChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            ExtensionChange::Create { extension } => extension.stable_id(),
            ExtensionChange::Drop { name }
            | ExtensionChange::UpdateVersion { name, .. }
            | ExtensionChange::SetSchema { name, .. }
            | ExtensionChange::Comment { name, .. } => ObjectId::Extension { name: name.clone() },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            ExtensionChange::Create { .. } => vec![self.stable_id()],
            ExtensionChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            ExtensionChange::Create { extension } => extension
                .schema
                .iter()
                .map(|s| ObjectId::Schema { name: s.clone() })
                .collect(),
            ExtensionChange::SetSchema { schema, .. } => vec![
                self.stable_id(),
                ObjectId::Schema {
                    name: schema.clone(),
                },
            ],
            _ => vec![self.stable_id()],
        }
    }

    pub fn drops(&self) -> Vec<ObjectId> {
        match self {
            ExtensionChange::Drop { .. } => vec![self.stable_id()],
            ExtensionChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            ExtensionChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Extension
    }
}

#[derive(Debug, Clone)]
pub enum LanguageChange {
    Create {
        language: Language,
    },
    Drop {
        name: String,
    },
    ChangeOwner {
        name: String,
        owner: String,
    },
    Comment {
        name: String,
        comment: Option<String>,
    },
}

impl LanguageChange {
    pub fn stable_id(&self) -> ObjectId {
        match self {
            LanguageChange::Create { language } => language.stable_id(),
            LanguageChange::Drop { name }
            | LanguageChange::ChangeOwner { name, .. }
            | LanguageChange::Comment { name, .. } => ObjectId::Language { name: name.clone() },
        }
    }

    pub fn creates(&self) -> Vec<ObjectId> {
        match self {
            LanguageChange::Create { .. } => vec![self.stable_id()],
            LanguageChange::Comment {
                comment: Some(_), ..
            } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn requires(&self) -> Vec<ObjectId> {
        match self {
            LanguageChange::Create { .. } => vec![],
            LanguageChange::ChangeOwner { owner, .. } => vec![
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
            LanguageChange::Drop { .. } => vec![self.stable_id()],
            LanguageChange::Comment { comment: None, .. } => vec![self.stable_id().comment()],
            _ => vec![],
        }
    }

    pub fn scope(&self) -> ChangeScope {
        match self {
            LanguageChange::Comment { .. } => ChangeScope::Comment,
            _ => ChangeScope::Object,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        ObjectKind::Language
    }
}
