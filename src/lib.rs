//! pgplan: a schema-migration planner for PostgreSQL-family databases.
//!
//! Given two catalog snapshots — `main` (current) and `branch` (desired) —
//! [`plan`] computes an ordered sequence of DDL statements transforming one
//! into the other, plus a dependency-graph report and diagnostics. The
//! whole pipeline is a pure function: no database access, no I/O.

pub mod catalog;
pub mod diff;
pub mod render;
pub mod topo;

use crate::catalog::Catalog;
use crate::diff::operations::{Change, SqlRenderer};
use crate::diff::PlanOptions;
use crate::topo::diagnostics::{dedupe_and_sort, Diagnostic};
use crate::topo::graph::GraphReport;

/// The result of one planning pass.
#[derive(Debug)]
pub struct Plan {
    /// Changes in execution order.
    pub changes: Vec<Change>,
    /// Serialized statements in the same order, without semicolons.
    pub statements: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub graph: GraphReport,
}

impl Plan {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The full script: statements joined with `;\n` and a final `;`.
    pub fn sql(&self) -> String {
        if self.statements.is_empty() {
            String::new()
        } else {
            format!("{};", self.statements.join(";\n"))
        }
    }
}

/// Compute the ordered DDL plan that transforms `main` into `branch`.
pub fn plan(main: &Catalog, branch: &Catalog, options: &PlanOptions) -> Plan {
    let (changes, mut diagnostics) = diff::diff_all(main, branch, options);

    let preexisting = main.referenceable_ids();
    let (ordered, graph) =
        topo::order_changes(changes, &preexisting, branch.version, &mut diagnostics);

    let statements = ordered
        .iter()
        .map(|change| match change {
            Change::Privilege(op) => op.serialize_for_version(branch.version),
            other => other.serialize(),
        })
        .collect();

    Plan {
        changes: ordered,
        statements,
        diagnostics: dedupe_and_sort(diagnostics),
        graph,
    }
}
