use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Colour of nodes and edges on a proven path
pub const HIGHLIGHT_COLOR: &str = "green";

/// Colour used when no path could be proven
pub const NEUTRAL_COLOR: &str = "";

/// Node attributes read by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub color: String,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Edge attributes read by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub label: String,
    pub color: String,
}

impl fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Directed permission graph.
///
/// Nodes are keyed by `object#relation` or bare subject ids. At most one
/// edge exists per ordered `(source, target)` pair.
#[derive(Debug, Clone, Default)]
pub struct PermissionGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    index: HashMap<String, NodeIndex>,
}

impl PermissionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless one with the same id exists.
    ///
    /// Returns `true` when the node was inserted.
    pub fn add_node(&mut self, id: &str, label: &str, color: &str) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        self.insert_node(id, label, color);
        true
    }

    fn insert_node(&mut self, id: &str, label: &str, color: &str) -> NodeIndex {
        let idx = self.graph.add_node(GraphNode {
            id: id.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    fn node_index_or_insert(&mut self, id: &str, color: &str) -> NodeIndex {
        match self.index.get(id) {
            Some(idx) => *idx,
            None => self.insert_node(id, id, color),
        }
    }

    /// Insert `source -> target` unless that ordered pair already has an edge.
    ///
    /// Missing endpoints are created (labelled with their id). Returns `true`
    /// when the edge was inserted; a second insertion is ignored whatever its
    /// attributes.
    pub fn add_edge(&mut self, source: &str, target: &str, relation: &str, color: &str) -> bool {
        let from = self.node_index_or_insert(source, color);
        let to = self.node_index_or_insert(target, color);

        if self.graph.find_edge(from, to).is_some() {
            return false;
        }

        self.graph.add_edge(
            from,
            to,
            GraphEdge {
                label: relation.to_string(),
                color: color.to_string(),
            },
        );
        true
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edge(source, target).is_some()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        let from = self.index.get(source)?;
        let to = self.index.get(target)?;
        self.graph
            .find_edge(*from, *to)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Edges in insertion order as `(source, target, attributes)`
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &GraphEdge)> {
        self.graph.edge_references().filter_map(|edge| {
            let source = self.graph.node_weight(edge.source())?;
            let target = self.graph.node_weight(edge.target())?;
            Some((source.id.as_str(), target.id.as_str(), edge.weight()))
        })
    }

    /// Ids reachable from `id` over one outgoing edge
    pub fn out_neighbors(&self, id: &str) -> Vec<&str> {
        let Some(idx) = self.index.get(id) else {
            return Vec::new();
        };

        let mut neighbors: Vec<&str> = self
            .graph
            .neighbors_directed(*idx, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n))
            .map(|node| node.id.as_str())
            .collect();
        // petgraph yields the most recent edge first
        neighbors.reverse();
        neighbors
    }

    /// Renderer-facing copy of the graph
    pub fn view(&self) -> GraphView {
        GraphView {
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|(source, target, edge)| EdgeView {
                    source: source.to_string(),
                    target: target.to_string(),
                    label: edge.label.clone(),
                    color: edge.color.clone(),
                })
                .collect(),
        }
    }

    /// Graphviz rendering of the graph
    pub fn to_dot(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::NodeNoLabel, Config::EdgeNoLabel],
            &|_, edge| dot_attributes(&edge.weight().label, &edge.weight().color),
            &|_, (_, node)| dot_attributes(&node.label, &node.color),
        );
        format!("{}", dot)
    }
}

fn dot_attributes(label: &str, color: &str) -> String {
    if color.is_empty() {
        format!("label = {:?}", label)
    } else {
        format!("label = {:?} color = {:?}", label, color)
    }
}

/// Serialisable graph handed to the renderer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub label: String,
    pub color: String,
}
