//! Descriptive statistics over the edge graph.

use crate::graph::Graph;
use crate::models::{Category, Metrics, RankedNode};
use indexmap::IndexMap;

/// Union-Find over node insertion indices.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]);
        }
        self.parent[i]
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return;
        }
        if self.rank[root_i] < self.rank[root_j] {
            self.parent[root_i] = root_j;
        } else if self.rank[root_i] > self.rank[root_j] {
            self.parent[root_j] = root_i;
        } else {
            self.parent[root_j] = root_i;
            self.rank[root_i] += 1;
        }
    }
}

/// `2E / (N(N-1))`, or 0 for graphs with fewer than two nodes.
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count <= 1 {
        return 0.0;
    }
    let n = node_count as f64;
    2.0 * edge_count as f64 / (n * (n - 1.0))
}

pub fn component_count(graph: &Graph) -> usize {
    let n = graph.node_count();
    let mut uf = UnionFind::new(n);
    for edge in graph.edges() {
        if let (Some(a), Some(b)) = (graph.node_index(&edge.source), graph.node_index(&edge.target)) {
            uf.union(a, b);
        }
    }
    (0..n).filter(|&i| uf.find(i) == i).count()
}

/// Distinct incident edges per node. A self-loop counts once.
pub fn degrees(graph: &Graph) -> IndexMap<String, usize> {
    let mut degree: IndexMap<String, usize> = graph.node_ids().map(|id| (id.to_string(), 0)).collect();
    for edge in graph.edges() {
        if let Some(d) = degree.get_mut(&edge.source) {
            *d += 1;
        }
        if !edge.is_self_loop() {
            if let Some(d) = degree.get_mut(&edge.target) {
                *d += 1;
            }
        }
    }
    degree
}

pub fn category_groups(graph: &Graph) -> IndexMap<Category, Vec<String>> {
    let mut groups: IndexMap<Category, Vec<String>> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
    for node in graph.nodes() {
        groups.entry(node.category).or_default().push(node.id);
    }
    groups
}

pub fn analyze(graph: &Graph) -> Metrics {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let degree_by_node = degrees(graph);

    let total_degree: usize = degree_by_node.values().sum();
    let avg_degree = if node_count > 0 {
        total_degree as f64 / node_count as f64
    } else {
        0.0
    };
    let max_degree = degree_by_node.values().copied().max().unwrap_or(0);

    Metrics {
        node_count,
        edge_count,
        density: density(node_count, edge_count),
        component_count: component_count(graph),
        avg_degree,
        max_degree,
        degree_by_node,
        category_groups: category_groups(graph),
    }
}

/// Top `limit` nodes by degree. Ties keep node insertion order.
pub fn most_connected(graph: &Graph, metrics: &Metrics, limit: usize) -> Vec<RankedNode> {
    let mut ranked: Vec<RankedNode> = metrics
        .degree_by_node
        .iter()
        .map(|(id, degree)| RankedNode {
            id: id.clone(),
            category: graph.category(id).unwrap_or(Category::Other),
            degree: *degree,
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.degree.cmp(&a.degree));
    ranked.truncate(limit);
    ranked
}
