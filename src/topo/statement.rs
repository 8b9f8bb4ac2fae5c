//! Statement model for the topological analyzer.

use sqlparser::ast::Statement;

use crate::topo::classify::{Phase, StatementClass};
use crate::topo::diagnostics::StatementId;

/// Annotation hints parsed from `-- pgplan:` header comments. User
/// annotations extend extraction and override the computed phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    /// Relative paths of files whose objects this file builds on.
    pub depends_on: Vec<String>,
    pub phase: Option<Phase>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        self.provides.is_empty()
            && self.requires.is_empty()
            && self.depends_on.is_empty()
            && self.phase.is_none()
    }
}

/// One statement flowing through the analyzer: original text, optional AST
/// (parse failures can still carry a regex-classified statement), extracted
/// reference sets, and its place in the ingest order.
#[derive(Debug, Clone)]
pub struct StatementNode {
    pub id: StatementId,
    pub sql: String,
    pub ast: Option<Statement>,
    pub annotations: Annotations,
    pub class: StatementClass,
    pub phase: Phase,
    pub ingest_index: usize,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    pub drops: Vec<String>,
}
