//! Typed dependency multigraph between indexed entities
//!
//! Vertices are [`EntityId`]s; entity lifetime belongs to the index. Two
//! entities may be linked by several edges as long as their usages differ.
//! Backed by a petgraph `StableDiGraph` so removing a vertex keeps every
//! other vertex index valid.

use crate::model::EntityId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a relationship between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeUsage {
    /// class A extends class B
    Extends,
    /// class A implements interface B
    Implements,
    /// A returns, takes, throws or catches a B
    Uses,
    CallsField,
    CallsMethod,
    /// class A declares a field of type B
    Contains,
    /// Relation detected but not classified
    NoLink,
}

impl fmt::Display for EdgeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeUsage::Extends => "EXTENDS",
            EdgeUsage::Implements => "IMPLEMENTS",
            EdgeUsage::Uses => "USES",
            EdgeUsage::CallsField => "CALLS_FIELD",
            EdgeUsage::CallsMethod => "CALLS_METHOD",
            EdgeUsage::Contains => "CONTAINS",
            EdgeUsage::NoLink => "NO_LINK",
        };
        f.write_str(name)
    }
}

/// A directed, typed edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceCodeEdge {
    pub from: EntityId,
    pub to: EntityId,
    pub usage: EdgeUsage,
}

/// Directed multigraph over entity ids
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: StableDiGraph<EntityId, EdgeUsage>,
    vertices: FxHashMap<EntityId, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn vertex(&mut self, id: EntityId) -> NodeIndex {
        if let Some(&idx) = self.vertices.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.vertices.insert(id, idx);
        idx
    }

    fn edge_at(&self, from: NodeIndex, to: NodeIndex) -> impl Iterator<Item = SourceCodeEdge> + '_ {
        self.graph
            .edges_directed(from, Direction::Outgoing)
            .filter(move |e| e.target() == to)
            .map(|e| self.to_edge(e.source(), e.target(), *e.weight()))
    }

    fn to_edge(&self, source: NodeIndex, target: NodeIndex, usage: EdgeUsage) -> SourceCodeEdge {
        SourceCodeEdge {
            from: self.graph[source],
            to: self.graph[target],
            usage,
        }
    }

    /// Insert an edge. Returns false when an identical edge already exists.
    ///
    /// Endpoints are not validated here; [`AnalysisEngine::add_edge`](crate::engine::AnalysisEngine::add_edge)
    /// checks them against the index first.
    pub fn add_edge(&mut self, from: EntityId, to: EntityId, usage: EdgeUsage) -> bool {
        let a = self.vertex(from);
        let b = self.vertex(to);
        if self.edge_at(a, b).any(|e| e.usage == usage) {
            return false;
        }
        self.graph.add_edge(a, b, usage);
        true
    }

    /// The edge from `from` to `to` when exactly one exists.
    ///
    /// Returns `None` both when the pair is unconnected and when several
    /// edges of different usages connect it; use [`get_edges`](Self::get_edges)
    /// to pick a specific usage.
    pub fn get_edge(&self, from: EntityId, to: EntityId) -> Option<SourceCodeEdge> {
        let mut edges = self.get_edges(from, to).into_iter();
        match (edges.next(), edges.next()) {
            (Some(edge), None) => Some(edge),
            _ => None,
        }
    }

    /// Every edge from `from` to `to`, in insertion order
    pub fn get_edges(&self, from: EntityId, to: EntityId) -> Vec<SourceCodeEdge> {
        match (self.vertices.get(&from), self.vertices.get(&to)) {
            (Some(&a), Some(&b)) => {
                let mut edges: Vec<SourceCodeEdge> = self.edge_at(a, b).collect();
                // petgraph walks adjacency lists newest first
                edges.reverse();
                edges
            }
            _ => Vec::new(),
        }
    }

    pub fn contains_edge(&self, from: EntityId, to: EntityId) -> bool {
        match (self.vertices.get(&from), self.vertices.get(&to)) {
            (Some(&a), Some(&b)) => self.edge_at(a, b).next().is_some(),
            _ => false,
        }
    }

    pub fn incoming_edges_of(&self, to: EntityId) -> Vec<SourceCodeEdge> {
        self.directed(to, Direction::Incoming)
    }

    pub fn outgoing_edges_of(&self, from: EntityId) -> Vec<SourceCodeEdge> {
        self.directed(from, Direction::Outgoing)
    }

    /// Incoming and outgoing edges of `vertex`; a self-loop appears once
    pub fn edges_of(&self, vertex: EntityId) -> Vec<SourceCodeEdge> {
        let mut edges = self.outgoing_edges_of(vertex);
        edges.extend(
            self.incoming_edges_of(vertex)
                .into_iter()
                .filter(|e| e.from != e.to),
        );
        edges
    }

    fn directed(&self, id: EntityId, direction: Direction) -> Vec<SourceCodeEdge> {
        let Some(&idx) = self.vertices.get(&id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, direction)
            .map(|e| self.to_edge(e.source(), e.target(), *e.weight()))
            .collect()
    }

    /// All edges carrying `usage`
    pub fn edges_with_usage(&self, usage: EdgeUsage) -> Vec<SourceCodeEdge> {
        self.graph
            .edge_references()
            .filter(|e| *e.weight() == usage)
            .map(|e| self.to_edge(e.source(), e.target(), usage))
            .collect()
    }

    /// Entities that take part in at least one edge
    pub fn vertices(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.vertices.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn contains_vertex(&self, id: EntityId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Drop a vertex together with every incident edge
    pub fn remove_vertex(&mut self, id: EntityId) -> bool {
        match self.vertices.remove(&id) {
            Some(idx) => {
                self.graph.remove_node(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.vertices.clear();
    }

    /// Cycles among edges of the given usages (all usages when empty).
    ///
    /// Each cycle is a strongly connected component with more than one
    /// entity, sorted by id; larger cycles come first.
    pub fn find_cycles(&self, usages: &[EdgeUsage]) -> Vec<Vec<EntityId>> {
        let wanted = |usage: &EdgeUsage| usages.is_empty() || usages.contains(usage);

        let mut filtered: DiGraph<EntityId, ()> = DiGraph::new();
        let mut idx_map: FxHashMap<NodeIndex, petgraph::graph::NodeIndex> = FxHashMap::default();

        let relevant: FxHashSet<NodeIndex> = self
            .graph
            .edge_references()
            .filter(|e| wanted(e.weight()))
            .flat_map(|e| [e.source(), e.target()])
            .collect();
        for orig in relevant {
            idx_map.insert(orig, filtered.add_node(self.graph[orig]));
        }

        for edge in self.graph.edge_references() {
            if !wanted(edge.weight()) {
                continue;
            }
            if let (Some(&a), Some(&b)) = (idx_map.get(&edge.source()), idx_map.get(&edge.target()))
            {
                filtered.add_edge(a, b, ());
            }
        }

        let mut cycles: Vec<Vec<EntityId>> = tarjan_scc(&filtered)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut ids: Vec<EntityId> = scc.iter().map(|&i| filtered[i]).collect();
                ids.sort();
                ids
            })
            .collect();

        cycles.sort();
        cycles.sort_by_key(|c| std::cmp::Reverse(c.len()));
        cycles
    }
}

#[cfg(test)]
mod tests;
