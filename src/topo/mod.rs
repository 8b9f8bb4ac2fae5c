//! The topological analyzer.
//!
//! Ingests statements (parsed user SQL or generated change records),
//! classifies them, extracts the ids they provide and require, builds a
//! dependency DAG and emits a stable total order plus a graph report.

pub mod classify;
pub mod diagnostics;
pub mod discover;
pub mod graph;
pub mod refs;
pub mod statement;

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use tracing::info;

use crate::catalog::privilege::ServerVersion;
use crate::diff::operations::{Change, ChangeScope, SqlRenderer, TableChange};
use crate::topo::classify::{classify, classify_fallback, Phase, StatementClass};
use crate::topo::diagnostics::{
    dedupe_and_sort, Diagnostic, DiagnosticCode, Severity, StatementId,
};
use crate::topo::discover::{discover_sql_files, parse_annotations, split_statements};
use crate::topo::graph::{build_and_sort, GraphReport};
use crate::topo::refs::extract_refs;
use crate::topo::statement::StatementNode;

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub roots: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct AnalyzeResult {
    pub ordered: Vec<StatementNode>,
    pub diagnostics: Vec<Diagnostic>,
    pub graph: GraphReport,
}

impl AnalyzeResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Discover, parse, classify and order the `.sql` trees under `roots`.
pub fn analyze_and_sort(request: &AnalyzeRequest) -> AnalyzeResult {
    let mut diagnostics = Vec::new();
    let mut nodes: Vec<StatementNode> = Vec::new();
    let mut ingest = 0usize;

    for root in &request.roots {
        let files = match discover_sql_files(std::slice::from_ref(root)) {
            Ok(files) => files,
            Err(error) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::DiscoveryError,
                    Severity::Error,
                    format!("{:#}", error),
                ));
                continue;
            }
        };

        for file in files {
            let statements = split_statements(&file.content);

            for (statement_index, sql) in statements.into_iter().enumerate() {
                let id = StatementId {
                    file_path: file.relative_path.clone(),
                    statement_index,
                };

                let parsed = Parser::parse_sql(&PostgreSqlDialect {}, &sql);
                let (ast, class) = match parsed {
                    Ok(mut list) if !list.is_empty() => {
                        let first = list.remove(0);
                        let class = classify(&first, &sql);
                        (Some(first), class)
                    }
                    Ok(_) => (None, classify_fallback(&sql)),
                    Err(error) => {
                        let class = classify_fallback(&sql);
                        if class == StatementClass::Unknown {
                            diagnostics.push(
                                Diagnostic::new(
                                    DiagnosticCode::ParseError,
                                    Severity::Error,
                                    format!("{}", error),
                                )
                                .at(id.clone()),
                            );
                            continue;
                        }
                        (None, class)
                    }
                };

                if class == StatementClass::Unknown {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::UnknownStatementClass,
                            Severity::Warning,
                            "statement class not recognized; keeping it in ingest order",
                        )
                        .at(id.clone()),
                    );
                }

                let annotations = parse_annotations(&sql);
                let extracted = extract_refs(class, ast.as_ref(), &sql);

                let mut provides = extracted.provides;
                for provided in &annotations.provides {
                    if !provides.contains(provided) {
                        provides.push(provided.clone());
                    }
                }
                let mut requires = extracted.requires;
                for required in &annotations.requires {
                    if !requires.contains(required) {
                        requires.push(required.clone());
                    }
                }

                let phase = annotations.phase.unwrap_or_else(|| class.phase());

                nodes.push(StatementNode {
                    id,
                    sql,
                    ast,
                    annotations,
                    class,
                    phase,
                    ingest_index: ingest,
                    provides,
                    requires,
                    drops: extracted.drops,
                });
                ingest += 1;
            }
        }
    }

    apply_file_dependencies(&mut nodes);

    info!(statements = nodes.len(), "analyzing statement graph");
    let (ordered, graph) = build_and_sort(nodes, &BTreeSet::new(), &mut diagnostics);

    AnalyzeResult {
        ordered,
        diagnostics: dedupe_and_sort(diagnostics),
        graph,
    }
}

/// `-- pgplan:depends-on other.sql` makes every statement in the annotated
/// file require everything the other file provides.
fn apply_file_dependencies(nodes: &mut [StatementNode]) {
    let mut provides_by_file: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for node in nodes.iter() {
        provides_by_file
            .entry(node.id.file_path.clone())
            .or_default()
            .extend(node.provides.iter().cloned());
    }

    let mut deps_by_file: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in nodes.iter() {
        if !node.annotations.depends_on.is_empty() {
            let entry = deps_by_file.entry(node.id.file_path.clone()).or_default();
            for dependency in &node.annotations.depends_on {
                entry.insert(dependency.clone());
            }
        }
    }

    for node in nodes.iter_mut() {
        let Some(dependencies) = deps_by_file.get(&node.id.file_path) else {
            continue;
        };
        for dependency in dependencies {
            if let Some(provided) = provides_by_file.get(dependency) {
                for id in provided {
                    if !node.requires.contains(id) && !node.provides.contains(id) {
                        node.requires.push(id.clone());
                    }
                }
            }
        }
    }
}

/// The phase bucket a generated change lands in. Default privileges come
/// before the object creates that consult their projection; constraint and
/// index work follows the data structures it attaches to.
pub fn phase_for_change(change: &Change) -> Phase {
    if change.scope() == ChangeScope::Privilege {
        return Phase::Privileges;
    }
    if change.scope() == ChangeScope::Comment {
        return Phase::PostData;
    }
    match change {
        Change::Role(_) | Change::Schema(_) => Phase::Bootstrap,
        Change::DefaultPrivilege(_) => Phase::PreData,
        Change::Extension(_)
        | Change::Language(_)
        | Change::Collation(_)
        | Change::ForeignDataWrapper(_)
        | Change::ForeignServer(_)
        | Change::Enum(_)
        | Change::CompositeType(_)
        | Change::Range(_)
        | Change::Domain(_)
        | Change::Sequence(_) => Phase::PreData,
        Change::Table(op) => match op {
            TableChange::AddConstraint { .. } | TableChange::ValidateConstraint { .. } => {
                Phase::PostData
            }
            _ => Phase::DataStructures,
        },
        Change::View(_) => Phase::DataStructures,
        Change::Index(_) => Phase::PostData,
        Change::Routine(_) => Phase::Routines,
        Change::Trigger(_)
        | Change::EventTrigger(_)
        | Change::Policy(_)
        | Change::Publication(_)
        | Change::Subscription(_) => Phase::PostData,
        Change::Privilege(_) => Phase::Privileges,
    }
}

/// Order generated change records. `preexisting` carries every stable id of
/// the `main` snapshot so references to surviving objects resolve silently.
pub fn order_changes(
    changes: Vec<Change>,
    preexisting: &BTreeSet<String>,
    version: ServerVersion,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Vec<Change>, GraphReport) {
    let nodes: Vec<StatementNode> = changes
        .iter()
        .enumerate()
        .map(|(index, change)| {
            let sql = match change {
                Change::Privilege(op) => op.serialize_for_version(version),
                other => other.serialize(),
            };
            StatementNode {
                id: StatementId {
                    file_path: "<plan>".to_string(),
                    statement_index: index,
                },
                sql,
                ast: None,
                annotations: Default::default(),
                class: StatementClass::Unknown,
                phase: phase_for_change(change),
                ingest_index: index,
                provides: change.creates().iter().map(|id| id.to_string()).collect(),
                requires: change.requires().iter().map(|id| id.to_string()).collect(),
                drops: change.drops().iter().map(|id| id.to_string()).collect(),
            }
        })
        .collect();

    let (ordered_nodes, report) = build_and_sort(nodes, preexisting, diagnostics);

    let mut slots: Vec<Option<Change>> = changes.into_iter().map(Some).collect();
    let ordered = ordered_nodes
        .into_iter()
        .map(|node| slots[node.ingest_index].take().expect("change emitted once"))
        .collect();

    (ordered, report)
}
