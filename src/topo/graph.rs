//! Dependency graph construction and the stable total order.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::topo::diagnostics::{Diagnostic, DiagnosticCode, Severity};
use crate::topo::statement::StatementNode;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub reason: String,
    #[serde(default)]
    pub object_ref: Option<String>,
}

/// Deterministic description of the dependency graph, for reports and
/// debugging. Nodes are statement ids; edges point from prerequisite to
/// dependent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphReport {
    pub node_count: usize,
    pub edges: Vec<GraphEdge>,
    pub cycle_groups: Vec<Vec<String>>,
}

/// The qualified-name portion of a stable id string, used to pair the
/// table/view readings of one ambiguous relation reference.
fn qualified_part(id: &str) -> Option<&str> {
    id.split_once(':').map(|(_, rest)| rest)
}

fn is_relation_id(id: &str) -> bool {
    id.starts_with("table:") || id.starts_with("view:") || id.starts_with("materialized_view:")
}

/// Build the DAG over `nodes` and emit the stable order: Kahn's algorithm
/// with ties broken by `(phase, ingest index)`. Cycle members fall back to
/// ingest order and are reported, not fixed.
pub fn build_and_sort(
    nodes: Vec<StatementNode>,
    preexisting: &BTreeSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Vec<StatementNode>, GraphReport) {
    let count = nodes.len();

    // id -> provider node indexes (any order; latest wins below).
    let mut providers: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, node) in nodes.iter().enumerate() {
        for provided in &node.provides {
            providers.entry(provided).or_default().push(index);
        }
    }

    let mut edges: BTreeSet<(usize, usize, &'static str, Option<String>)> = BTreeSet::new();
    let mut resolved: BTreeSet<(usize, String)> = BTreeSet::new();
    let mut unresolved: Vec<(usize, String)> = Vec::new();

    for (index, node) in nodes.iter().enumerate() {
        for required in &node.requires {
            if node.provides.contains(required) {
                continue;
            }
            // Latest provider in ingest order wins. A statement that drops
            // the id it requires refers to the pre-change object, so only
            // earlier providers count for it.
            let drops_it = node.drops.contains(required);
            let provider = providers
                .get(required.as_str())
                .and_then(|candidates| {
                    candidates
                        .iter()
                        .filter(|c| {
                            **c != index
                                && (!drops_it
                                    || nodes[**c].ingest_index < node.ingest_index)
                        })
                        .max()
                })
                .copied();
            match provider {
                Some(provider) => {
                    edges.insert((provider, index, "requires", Some(required.clone())));
                    resolved.insert((index, required.clone()));
                }
                None => {
                    if !preexisting.contains(required) && !drops_it {
                        unresolved.push((index, required.clone()));
                    }
                }
            }
        }
    }

    // Drops order after readers, and before any recreation of the same id.
    for (index, node) in nodes.iter().enumerate() {
        for dropped in &node.drops {
            for (other_index, other) in nodes.iter().enumerate() {
                if other_index == index {
                    continue;
                }
                if other.requires.contains(dropped) && !other.drops.contains(dropped) {
                    edges.insert((other_index, index, "drop-after-use", Some(dropped.clone())));
                }
                if other.provides.contains(dropped) {
                    edges.insert((index, other_index, "drop-before-recreate", Some(dropped.clone())));
                }
            }
        }
    }

    // An ambiguous relation reference contributes a table: and a view:
    // reading; only report it when neither resolved. Role references stay
    // quiet: roles are cluster-level and routinely exist outside the
    // snapshot.
    for (index, required) in unresolved {
        if required.starts_with("role:") {
            continue;
        }
        if is_relation_id(&required) {
            let qualified = qualified_part(&required).unwrap_or_default().to_string();
            let twin_resolved = resolved.iter().any(|(i, id)| {
                *i == index
                    && is_relation_id(id)
                    && qualified_part(id) == Some(qualified.as_str())
            });
            if twin_resolved {
                continue;
            }
        }
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::UnresolvedReference,
                Severity::Info,
                format!(
                    "{} is not provided by any statement in the input set; assuming it already exists",
                    required
                ),
            )
            .at(nodes[index].id.clone())
            .with_objects(vec![required]),
        );
    }

    // Cycle groups via SCC, over the same edge set.
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let node_indexes: Vec<NodeIndex> = (0..count).map(|i| graph.add_node(i)).collect();
    for (from, to, _, _) in &edges {
        graph.add_edge(node_indexes[*from], node_indexes[*to], ());
    }

    let mut cycle_groups: Vec<Vec<String>> = Vec::new();
    for component in tarjan_scc(&graph) {
        if component.len() > 1 {
            let mut members: Vec<usize> = component.iter().map(|n| graph[*n]).collect();
            members.sort_by_key(|i| nodes[*i].ingest_index);
            let ids: Vec<String> = members.iter().map(|i| nodes[*i].id.to_string()).collect();
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::CycleDetected,
                    Severity::Warning,
                    format!(
                        "dependency cycle between {}; break it by moving one reference into a later statement or an explicit -- pgplan:requires annotation",
                        ids.join(", ")
                    ),
                )
                .at(nodes[members[0]].id.clone())
                .with_objects(ids.clone()),
            );
            cycle_groups.push(ids);
        }
    }
    cycle_groups.sort();

    // Kahn with a deterministic ready set.
    let mut in_degree = vec![0usize; count];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (from, to, _, _) in &edges {
        in_degree[*to] += 1;
        successors[*from].push(*to);
    }

    let mut ready: BTreeSet<(crate::topo::classify::Phase, usize, usize)> = BTreeSet::new();
    for (index, node) in nodes.iter().enumerate() {
        if in_degree[index] == 0 {
            ready.insert((node.phase, node.ingest_index, index));
        }
    }

    let mut order: Vec<usize> = Vec::with_capacity(count);
    let mut emitted = vec![false; count];

    while order.len() < count {
        let next = match ready.iter().next().copied() {
            Some(entry) => {
                ready.remove(&entry);
                entry.2
            }
            None => {
                // Cycle remainder: place the earliest-ingested member and
                // keep going.
                let forced = (0..count)
                    .filter(|i| !emitted[*i])
                    .min_by_key(|i| nodes[*i].ingest_index)
                    .expect("nodes remain when ready set is empty");
                in_degree[forced] = 0;
                forced
            }
        };

        if emitted[next] {
            continue;
        }
        emitted[next] = true;
        order.push(next);

        for &successor in &successors[next] {
            if emitted[successor] || in_degree[successor] == 0 {
                continue;
            }
            in_degree[successor] -= 1;
            if in_degree[successor] == 0 {
                ready.insert((
                    nodes[successor].phase,
                    nodes[successor].ingest_index,
                    successor,
                ));
            }
        }
    }

    // The edge set is keyed by node index, which is ingest order — file
    // path, then statement index. Keep that order in the report.
    let report_edges: Vec<GraphEdge> = edges
        .into_iter()
        .map(|(from, to, reason, object_ref)| GraphEdge {
            from: nodes[from].id.to_string(),
            to: nodes[to].id.to_string(),
            reason: reason.to_string(),
            object_ref,
        })
        .collect();

    let report = GraphReport {
        node_count: count,
        edges: report_edges,
        cycle_groups,
    };

    let ordered: Vec<StatementNode> = {
        let mut nodes: Vec<Option<StatementNode>> = nodes.into_iter().map(Some).collect();
        order
            .into_iter()
            .map(|i| nodes[i].take().expect("each node emitted once"))
            .collect()
    };

    (ordered, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topo::classify::{Phase, StatementClass};
    use crate::topo::diagnostics::StatementId;
    use crate::topo::statement::Annotations;

    fn node(
        index: usize,
        phase: Phase,
        provides: &[&str],
        requires: &[&str],
        drops: &[&str],
    ) -> StatementNode {
        StatementNode {
            id: StatementId {
                file_path: "test.sql".to_string(),
                statement_index: index,
            },
            sql: format!("STATEMENT {}", index),
            ast: None,
            annotations: Annotations::default(),
            class: StatementClass::Unknown,
            phase,
            ingest_index: index,
            provides: provides.iter().map(|s| s.to_string()).collect(),
            requires: requires.iter().map(|s| s.to_string()).collect(),
            drops: drops.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_requires_orders_provider_first() {
        let nodes = vec![
            node(0, Phase::DataStructures, &["view:public.v"], &["table:public.t"], &[]),
            node(1, Phase::DataStructures, &["table:public.t"], &[], &[]),
        ];
        let mut diagnostics = Vec::new();
        let (ordered, report) = build_and_sort(nodes, &BTreeSet::new(), &mut diagnostics);
        assert_eq!(ordered[0].ingest_index, 1);
        assert_eq!(ordered[1].ingest_index, 0);
        assert_eq!(report.edges.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_phase_breaks_ties() {
        let nodes = vec![
            node(0, Phase::PostData, &[], &[], &[]),
            node(1, Phase::Bootstrap, &[], &[], &[]),
        ];
        let mut diagnostics = Vec::new();
        let (ordered, _) = build_and_sort(nodes, &BTreeSet::new(), &mut diagnostics);
        assert_eq!(ordered[0].ingest_index, 1);
    }

    #[test]
    fn test_cycle_reported_and_ordered_by_ingest() {
        let nodes = vec![
            node(0, Phase::DataStructures, &["view:public.a"], &["view:public.b"], &[]),
            node(1, Phase::DataStructures, &["view:public.b"], &["view:public.a"], &[]),
        ];
        let mut diagnostics = Vec::new();
        let (ordered, report) = build_and_sort(nodes, &BTreeSet::new(), &mut diagnostics);
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].ingest_index, 0);
        assert_eq!(report.cycle_groups.len(), 1);
        assert!(diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::CycleDetected));
    }

    #[test]
    fn test_unresolved_reference_is_info_only() {
        let nodes = vec![node(
            0,
            Phase::DataStructures,
            &[],
            &["table:public.elsewhere"],
            &[],
        )];
        let mut diagnostics = Vec::new();
        let (_, report) = build_and_sort(nodes, &BTreeSet::new(), &mut diagnostics);
        assert!(report.edges.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::UnresolvedReference);
        assert_eq!(diagnostics[0].severity, Severity::Info);
    }

    #[test]
    fn test_preexisting_suppresses_info() {
        let nodes = vec![node(
            0,
            Phase::DataStructures,
            &[],
            &["table:public.existing"],
            &[],
        )];
        let mut diagnostics = Vec::new();
        let preexisting: BTreeSet<String> = ["table:public.existing".to_string()].into();
        build_and_sort(nodes, &preexisting, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_drop_comes_after_readers_and_before_recreate() {
        let nodes = vec![
            node(0, Phase::DataStructures, &[], &["table:public.t"], &["table:public.t"]),
            node(1, Phase::DataStructures, &["table:public.t"], &[], &[]),
        ];
        let mut diagnostics = Vec::new();
        let preexisting: BTreeSet<String> = ["table:public.t".to_string()].into();
        let (ordered, _) = build_and_sort(nodes, &preexisting, &mut diagnostics);
        // DROP first, then CREATE of the same id.
        assert_eq!(ordered[0].ingest_index, 0);
        assert_eq!(ordered[1].ingest_index, 1);
    }

    #[test]
    fn test_latest_provider_wins() {
        let nodes = vec![
            node(0, Phase::DataStructures, &["table:public.t"], &[], &[]),
            node(1, Phase::DataStructures, &["table:public.t"], &[], &[]),
            node(2, Phase::Privileges, &[], &["table:public.t"], &[]),
        ];
        let mut diagnostics = Vec::new();
        let (_, report) = build_and_sort(nodes, &BTreeSet::new(), &mut diagnostics);
        let edge = report
            .edges
            .iter()
            .find(|e| e.reason == "requires")
            .unwrap();
        assert_eq!(edge.from, "test.sql:1");
        assert_eq!(edge.to, "test.sql:2");
    }

    #[test]
    fn test_permuting_input_order_is_stable() {
        let build = |nodes: Vec<StatementNode>| {
            let mut diagnostics = Vec::new();
            let (ordered, _) = build_and_sort(nodes, &BTreeSet::new(), &mut diagnostics);
            ordered
                .iter()
                .map(|n| n.ingest_index)
                .collect::<Vec<usize>>()
        };

        let make = || {
            vec![
                node(0, Phase::PostData, &[], &["table:public.t"], &[]),
                node(1, Phase::DataStructures, &["table:public.t"], &[], &[]),
                node(2, Phase::Bootstrap, &["schema:public"], &[], &[]),
            ]
        };

        let a = build(make());
        let mut shuffled = make();
        shuffled.reverse();
        let b = build(shuffled);
        assert_eq!(a, b);
    }
}
