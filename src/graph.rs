//! Graph building.
//!
//! Turns validated edge records into an undirected simple graph. Nodes and
//! edges keep first-seen order so that every downstream view (layout,
//! rankings, summaries) is reproducible for the same input.

use crate::classify::classify;
use crate::models::{Category, EdgeRecord, DEFAULT_RELATIONSHIP};
use indexmap::IndexMap;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relationship: String,
}

impl GraphEdge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Undirected graph with at most one edge per unordered node pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: IndexMap<String, Category>,
    edges: IndexMap<(String, String), GraphEdge>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node if absent. Returns its category.
    pub fn add_node(&mut self, id: &str) -> Category {
        *self
            .nodes
            .entry(id.to_string())
            .or_insert_with(|| classify(id))
    }

    /// Adds an undirected edge. A repeated pair keeps its original position
    /// and orientation but takes the newest relationship label. A blank
    /// label becomes `CONNECTED`.
    pub fn add_edge(&mut self, source: &str, target: &str, relationship: &str) {
        self.add_node(source);
        self.add_node(target);

        let relationship = match relationship.trim() {
            "" => DEFAULT_RELATIONSHIP,
            label => label,
        };

        let key = pair_key(source, target);
        match self.edges.get_mut(&key) {
            Some(existing) => existing.relationship = relationship.to_string(),
            None => {
                self.edges.insert(
                    key,
                    GraphEdge {
                        source: source.to_string(),
                        target: target.to_string(),
                        relationship: relationship.to_string(),
                    },
                );
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn category(&self, id: &str) -> Option<Category> {
        self.nodes.get(id).copied()
    }

    /// Position of a node in insertion order.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|k| k.as_str())
    }

    pub fn nodes(&self) -> impl Iterator<Item = GraphNode> + '_ {
        self.nodes.iter().map(|(id, category)| GraphNode {
            id: id.clone(),
            category: *category,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn edge_between(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        self.edges.get(&pair_key(a, b))
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<GraphNode> = self.nodes().collect();
        let edges: Vec<&GraphEdge> = self.edges().collect();
        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}

// ============================================================================
// Graph Building
// ============================================================================

pub fn build_graph(edges: &[EdgeRecord]) -> Graph {
    let mut graph = Graph::new();
    for edge in edges {
        graph.add_edge(&edge.source, &edge.target, &edge.relationship);
    }
    graph
}
