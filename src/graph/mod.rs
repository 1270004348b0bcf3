use chrono::NaiveDate;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

pub mod builder;

pub use builder::DependencyGraphBuilder;

/// One chart bar: the scalar attributes the rendering collaborator needs
/// plus the resolved identifiers of the tasks this one depends on. The
/// referenced tasks live as sibling nodes in the same `DependencyGraph`;
/// a node never owns its predecessors.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub id: String,
    pub name: String,
    /// Qualified display name, `id - task`.
    pub full_name: String,
    pub start: NaiveDate,
    pub duration_days: i64,
    pub percent_done: i64,
    pub color: String,
    /// External owner, registered as a chart resource.
    pub resource: String,
    /// Resolved predecessor identifiers in raw-list order.
    pub depends_on: Vec<String>,
}

/// Adjacency for one build pass: a node arena keyed by identifier with
/// edges running predecessor -> dependent. Consumed for "depends on"
/// annotation only; cycles are legal and never checked for.
#[derive(Debug)]
pub struct DependencyGraph {
    pub graph: DiGraph<TaskNode, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&TaskNode> {
        self.id_to_index.get(id).map(|ix| &self.graph[*ix])
    }

    /// Nodes in insertion order, which is the subset's row order.
    pub fn nodes(&self) -> impl Iterator<Item = &TaskNode> {
        self.graph.node_weights()
    }

    /// Resolved predecessor nodes of `id`, in raw-list order.
    pub fn dependencies_of(&self, id: &str) -> Vec<&TaskNode> {
        match self.node(id) {
            Some(node) => node
                .depends_on
                .iter()
                .filter_map(|dep| self.node(dep))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Nodes that depend on `id`.
    pub fn dependents_of(&self, id: &str) -> Vec<&TaskNode> {
        match self.id_to_index.get(id) {
            Some(ix) => self
                .graph
                .neighbors_directed(*ix, Direction::Outgoing)
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }
}
