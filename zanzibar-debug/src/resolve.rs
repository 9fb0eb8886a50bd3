use crate::{
    graph::{GraphView, PermissionGraph, HIGHLIGHT_COLOR, NEUTRAL_COLOR},
    models::NodeInfo,
    normalize::SUBJECT_LEVEL,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a chain from subject to object was proven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOutcome {
    Found,
    Fallback,
}

/// Records selected for display, root first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub outcome: PathOutcome,
    pub color: String,
    pub records: Vec<NodeInfo>,
}

impl ResolvedPath {
    pub fn found(&self) -> bool {
        self.outcome == PathOutcome::Found
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `user` id of every record, in path order
    pub fn nodes(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.user.as_str()).collect()
    }
}

/// Graph assembled from a resolved path
#[derive(Debug, Clone)]
pub struct Explanation {
    pub graph: PermissionGraph,
    pub path: ResolvedPath,
}

impl Explanation {
    pub fn found(&self) -> bool {
        self.path.found()
    }

    /// Renderer view of the assembled graph
    pub fn view(&self) -> GraphView {
        self.graph.view()
    }
}

/// Backward greedy trace from `subject`.
///
/// Scans `nodes` from the end with a cursor starting at `subject`. A record
/// whose `user` equals the cursor is accepted and moves the cursor to its
/// `object` (the subject sentinel keeps it in place). The sentinel is only
/// ever accepted as the first step, and self-edges never move the cursor so
/// they are skipped. The first match at each step wins.
///
/// The returned trace is in scan order (subject first) and includes the
/// sentinel, so it has length 1 when no chain exists.
pub fn trace_path(subject: &str, nodes: &[NodeInfo]) -> Vec<NodeInfo> {
    let mut current = subject.to_string();
    let mut trace: Vec<NodeInfo> = Vec::new();

    for record in nodes.iter().rev() {
        if record.user != current {
            continue;
        }

        let is_sentinel = record.level == SUBJECT_LEVEL;
        if is_sentinel && !trace.is_empty() {
            continue;
        }
        if record.is_self_edge() {
            continue;
        }

        if let Some(object) = record.object_id() {
            current = object.to_string();
        }
        trace.push(record.clone());
    }

    trace
}

/// Pick the records to display.
///
/// With a chain, the sentinel is dropped, the chain is put root first and
/// re-leveled `0..k` with the highlight colour. Without one, the full
/// sequence is returned unchanged with the neutral colour.
pub fn resolve(subject: &str, nodes: &[NodeInfo]) -> ResolvedPath {
    let trace = trace_path(subject, nodes);

    if trace.len() <= 1 {
        debug!(subject, records = nodes.len(), "No chain found, falling back to full sequence");
        return ResolvedPath {
            outcome: PathOutcome::Fallback,
            color: NEUTRAL_COLOR.to_string(),
            records: nodes.to_vec(),
        };
    }

    let records: Vec<NodeInfo> = trace
        .into_iter()
        .rev()
        .filter(|record| record.level != SUBJECT_LEVEL)
        .zip(0..)
        .map(|(record, level)| NodeInfo {
            level,
            seq: 0,
            color: Some(HIGHLIGHT_COLOR.to_string()),
            ..record
        })
        .collect();

    debug!(subject, length = records.len(), "Chain found");

    ResolvedPath {
        outcome: PathOutcome::Found,
        color: HIGHLIGHT_COLOR.to_string(),
        records,
    }
}

/// Resolve the path and build the graph from its records.
///
/// Every record adds its `user` and `object` nodes and a `user -> object`
/// edge labelled with its relation. Self-edges only contribute their node.
pub fn assemble(subject: &str, nodes: &[NodeInfo]) -> Explanation {
    let path = resolve(subject, nodes);
    let color = path.color.as_str();
    let mut graph = PermissionGraph::new();

    for record in &path.records {
        if !record.user.is_empty() {
            graph.add_node(&record.user, &record.user, color);
        }

        let Some(object) = record.object_id() else {
            continue;
        };
        graph.add_node(object, object, color);

        if !record.user.is_empty() && object != record.user {
            graph.add_edge(
                &record.user,
                object,
                record.relation.as_deref().unwrap_or_default(),
                color,
            );
        }
    }

    Explanation { graph, path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpansionRecord;
    use crate::normalize::normalize;

    fn anne_sequence() -> Vec<NodeInfo> {
        let records = vec![
            ExpansionRecord::self_edge("document:1#viewer", 1),
            ExpansionRecord::reference("document:1#viewer", "user:anne", "viewer", 1),
        ];
        normalize("document:1", "viewer", "user:anne", &records)
    }

    #[test]
    fn test_trace_includes_sentinel() {
        let trace = trace_path("user:anne", &anne_sequence());
        let users: Vec<&str> = trace.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(users, vec!["user:anne", "user:anne", "document:1#viewer"]);
        assert_eq!(trace[0].level, SUBJECT_LEVEL);
    }

    #[test]
    fn test_resolve_direct_user() {
        let path = resolve("user:anne", &anne_sequence());
        assert!(path.found());
        assert_eq!(path.color, HIGHLIGHT_COLOR);
        assert_eq!(path.nodes(), vec!["document:1#viewer", "user:anne"]);
        assert_eq!(path.records.iter().map(|r| r.level).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_unknown_subject_falls_back() {
        let nodes = normalize(
            "document:1",
            "viewer",
            "user:bob",
            &[
                ExpansionRecord::self_edge("document:1#viewer", 1),
                ExpansionRecord::reference("document:1#viewer", "user:anne", "viewer", 1),
            ],
        );

        assert_eq!(trace_path("user:bob", &nodes).len(), 1);

        let path = resolve("user:bob", &nodes);
        assert_eq!(path.outcome, PathOutcome::Fallback);
        assert_eq!(path.color, NEUTRAL_COLOR);
        assert_eq!(path.records, nodes);
    }

    #[test]
    fn test_first_match_wins() {
        // user:anne is reachable through two groups; the later record in the
        // sequence is met first by the backward scan.
        let records = vec![
            ExpansionRecord::self_edge("document:1#viewer", 1),
            ExpansionRecord::reference("document:1#viewer", "group:a#member", "", 1),
            ExpansionRecord::reference("document:1#viewer", "group:b#member", "", 1),
            ExpansionRecord::reference("group:a#member", "user:anne", "member", 2),
            ExpansionRecord::reference("group:b#member", "user:anne", "member", 2),
        ];
        let nodes = normalize("document:1", "viewer", "user:anne", &records);

        let path = resolve("user:anne", &nodes);
        assert_eq!(
            path.nodes(),
            vec!["document:1#viewer", "group:b#member", "user:anne"]
        );
    }

    #[test]
    fn test_sentinel_is_never_matched_twice() {
        let mut nodes = anne_sequence();
        let sentinel = nodes.last().cloned().unwrap();
        nodes.insert(0, sentinel);

        let path = resolve("user:anne", &nodes);
        assert!(path.records.iter().all(|r| r.level != SUBJECT_LEVEL));
    }

    #[test]
    fn test_assemble_found_path() {
        let explanation = assemble("user:anne", &anne_sequence());
        let graph = &explanation.graph;

        assert!(explanation.found());
        assert_eq!(graph.edge("user:anne", "document:1#viewer").unwrap().label, "viewer");
        assert_eq!(graph.edge("document:1#viewer", "document:1").unwrap().label, "viewer");
        assert!(graph.nodes().all(|n| n.color == HIGHLIGHT_COLOR));
        assert!(!graph.has_edge("document:1#viewer", "document:1#viewer"));
    }

    #[test]
    fn test_assemble_fallback_uses_everything() {
        let nodes = normalize(
            "document:1",
            "viewer",
            "user:bob",
            &[
                ExpansionRecord::self_edge("document:1#viewer", 1),
                ExpansionRecord::reference("document:1#viewer", "user:anne", "viewer", 1),
                ExpansionRecord::reference("document:1#viewer", "user:anne", "viewer", 1),
            ],
        );

        let explanation = assemble("user:bob", &nodes);
        let graph = &explanation.graph;

        assert!(!explanation.found());
        assert!(graph.has_node("user:bob"));
        assert!(graph.has_node("user:anne"));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.nodes().all(|n| n.color == NEUTRAL_COLOR));
    }

    #[test]
    fn test_explanation_view_matches_path_colour() {
        let explanation = assemble("user:anne", &anne_sequence());
        let view = explanation.view();

        assert_eq!(view.nodes.len(), explanation.graph.node_count());
        assert_eq!(view.edges.len(), 2);
        assert!(view
            .edges
            .iter()
            .any(|e| e.source == "user:anne" && e.target == "document:1#viewer" && e.label == "viewer"));
        assert!(view.nodes.iter().all(|n| n.color == HIGHLIGHT_COLOR));
    }
}
