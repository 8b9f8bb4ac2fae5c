//! Diagnostics accumulated through the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    DiscoveryError,
    ParseError,
    UnknownStatementClass,
    CycleDetected,
    DuplicateStableId,
    UnresolvedReference,
    InvariantViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Where a statement came from: its source file and position within it.
/// Generated changes carry a synthetic file path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatementId {
    pub file_path: String,
    pub statement_index: usize,
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_path, self.statement_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub statement_id: Option<StatementId>,
    #[serde(default)]
    pub object_refs: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            statement_id: None,
            object_refs: Vec::new(),
        }
    }

    pub fn at(mut self, statement_id: StatementId) -> Self {
        self.statement_id = Some(statement_id);
        self
    }

    pub fn with_objects(mut self, refs: Vec<String>) -> Self {
        self.object_refs = refs;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Deduplicate by `(code, statement_id, message, object_refs)` and order by
/// `(file_path, statement_index, code, message)`; diagnostics without a
/// statement id sort first.
pub fn dedupe_and_sort(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by(|a, b| {
        let a_key = (
            a.statement_id.as_ref().map(|s| (s.file_path.clone(), s.statement_index)),
            a.code,
            a.message.clone(),
        );
        let b_key = (
            b.statement_id.as_ref().map(|s| (s.file_path.clone(), s.statement_index)),
            b.code,
            b.message.clone(),
        );
        a_key.cmp(&b_key)
    });
    diagnostics.dedup_by(|a, b| {
        a.code == b.code
            && a.statement_id == b.statement_id
            && a.message == b.message
            && a.object_refs == b.object_refs
    });
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_and_sort() {
        let diag = |file: &str, index: usize, message: &str| {
            Diagnostic::new(DiagnosticCode::ParseError, Severity::Error, message).at(StatementId {
                file_path: file.to_string(),
                statement_index: index,
            })
        };

        let out = dedupe_and_sort(vec![
            diag("b.sql", 0, "x"),
            diag("a.sql", 1, "y"),
            diag("a.sql", 1, "y"),
            diag("a.sql", 0, "z"),
        ]);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].statement_id.as_ref().unwrap().to_string(), "a.sql:0");
        assert_eq!(out[1].statement_id.as_ref().unwrap().to_string(), "a.sql:1");
        assert_eq!(out[2].statement_id.as_ref().unwrap().to_string(), "b.sql:0");
    }
}
