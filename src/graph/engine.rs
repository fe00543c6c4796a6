//! The dependency graph engine.
//!
//! Uses petgraph to store identity -> identity edges and keeps an index from
//! identity to node for lookups. Enumeration order of petgraph is insertion
//! order, so every public query sorts before returning.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::types::RelationKind;

/// Directed graph over source-unit identities.
///
/// Invariants: no self-edges, at most one edge per ordered pair, and every
/// edge endpoint is a known identity.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<String, RelationKind>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    // ─── Node Operations ────────────────────────────────────────

    /// Add a node for `identity`. Returns the existing index if already present.
    pub fn add_node(&mut self, identity: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(identity) {
            return idx;
        }
        let idx = self.graph.add_node(identity.to_string());
        self.index.insert(identity.to_string(), idx);
        idx
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains_key(identity)
    }

    // ─── Edge Operations ────────────────────────────────────────

    /// Add an edge between two known identities.
    ///
    /// Returns `false` (and adds nothing) for self-edges, duplicates and
    /// unknown endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: RelationKind) -> bool {
        if from == to {
            return false;
        }
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        if self.graph.contains_edge(a, b) {
            return false;
        }
        self.graph.add_edge(a, b, kind);
        true
    }

    // ─── Query Operations ───────────────────────────────────────

    /// All identities, sorted.
    pub fn identities(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.index.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// What `identity` points at, sorted. Empty for unknown identities.
    pub fn dependencies(&self, identity: &str) -> Vec<&str> {
        self.neighbors(identity, Direction::Outgoing)
    }

    /// What points at `identity`, sorted.
    pub fn dependents(&self, identity: &str) -> Vec<&str> {
        self.neighbors(identity, Direction::Incoming)
    }

    /// Every edge as `(from, to, kind)`, sorted by endpoints.
    pub fn edges(&self) -> Vec<(&str, &str, RelationKind)> {
        let mut edges: Vec<(&str, &str, RelationKind)> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                    *e.weight(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Export as a sorted adjacency map. Every node appears as a key.
    pub fn to_adjacency(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut adjacency: BTreeMap<String, BTreeSet<String>> = self
            .index
            .keys()
            .map(|id| (id.clone(), BTreeSet::new()))
            .collect();
        for (from, to, _) in self.edges() {
            if let Some(targets) = adjacency.get_mut(from) {
                targets.insert(to.to_string());
            }
        }
        adjacency
    }

    // ─── Stats ──────────────────────────────────────────────────

    pub fn stats(&self) -> GraphStats {
        let isolated = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_undirected(idx).next().is_none())
            .count();
        GraphStats {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            isolated_count: isolated,
        }
    }

    // ─── Internal Helpers ───────────────────────────────────────

    fn neighbors(&self, identity: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.index.get(identity) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Nodes with neither incoming nor outgoing edges.
    pub isolated_count: usize,
}
