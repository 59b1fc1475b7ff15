//! Analysis engine facade
//!
//! Owns the entity index and the dependency graph and keeps them consistent:
//! edges can only join indexed entities and disappear together with them.

use crate::error::{EngineError, EngineResult};
use crate::graph::{DependencyGraph, EdgeUsage, SourceCodeEdge};
use crate::index::{Query, SourceIndex};
use crate::metrics::{MetricDef, TreeDecorator};
use crate::model::{CheckMessage, EntityId, SourceCode};
use tracing::{debug, info};

/// Index + graph + project root for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    index: SourceIndex,
    graph: DependencyGraph,
}

impl AnalysisEngine {
    /// Create an engine whose root project is keyed `project_key`
    pub fn new(project_key: &str) -> Self {
        Self::with_project(SourceCode::project(project_key))
    }

    pub fn with_project(project: SourceCode) -> Self {
        Self {
            index: SourceIndex::new(project),
            graph: DependencyGraph::new(),
        }
    }

    pub fn root(&self) -> EntityId {
        self.index.root()
    }

    /// The root project, decorated once [`decorate`](Self::decorate) has run
    pub fn project(&self) -> &SourceCode {
        self.index.project()
    }

    pub fn index(&mut self, parent: EntityId, entity: SourceCode) -> EngineResult<EntityId> {
        self.index.index(parent, entity)
    }

    /// Read access to the entity index
    pub fn source_index(&self) -> &SourceIndex {
        &self.index
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn get(&self, id: EntityId) -> Option<&SourceCode> {
        self.index.get(id)
    }

    pub fn search(&self, key: &str) -> Option<&SourceCode> {
        self.index.search(key)
    }

    pub fn search_by(&self, queries: &[&dyn Query]) -> Vec<&SourceCode> {
        self.index.search_by(queries)
    }

    /// Record a dependency. Both endpoints must be indexed.
    ///
    /// Returns `Ok(false)` when the identical edge was already present.
    pub fn add_edge(&mut self, from: EntityId, to: EntityId, usage: EdgeUsage) -> EngineResult<bool> {
        for endpoint in [from, to] {
            if !self.index.contains(endpoint) {
                return Err(EngineError::UnindexedEndpoint {
                    from,
                    to,
                    usage,
                    missing: endpoint,
                });
            }
        }
        Ok(self.graph.add_edge(from, to, usage))
    }

    pub fn get_edge(&self, from: EntityId, to: EntityId) -> Option<SourceCodeEdge> {
        self.graph.get_edge(from, to)
    }

    pub fn get_edges(&self, from: EntityId, to: EntityId) -> Vec<SourceCodeEdge> {
        self.graph.get_edges(from, to)
    }

    pub fn contains_edge(&self, from: EntityId, to: EntityId) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn incoming_edges_of(&self, to: EntityId) -> Vec<SourceCodeEdge> {
        self.graph.incoming_edges_of(to)
    }

    pub fn outgoing_edges_of(&self, from: EntityId) -> Vec<SourceCodeEdge> {
        self.graph.outgoing_edges_of(from)
    }

    pub fn edges_of(&self, vertex: EntityId) -> Vec<SourceCodeEdge> {
        self.graph.edges_of(vertex)
    }

    /// Remove an entity, its subtree and every edge touching any of them
    pub fn remove(&mut self, id: EntityId) -> EngineResult<Vec<SourceCode>> {
        let removed = self.index.remove(id)?;
        let mut dropped = 0usize;
        for entity in &removed {
            if let Some(gone) = entity.id() {
                if self.graph.remove_vertex(gone) {
                    dropped += 1;
                }
            }
        }
        debug!("Dropped {} graph vertices with {}", dropped, id);
        Ok(removed)
    }

    pub fn set_measure(&mut self, id: EntityId, metric: &dyn MetricDef, value: f64) -> EngineResult<()> {
        self.index.set_measure(id, metric, value)
    }

    pub fn add_measure(&mut self, id: EntityId, metric: &dyn MetricDef, delta: f64) -> EngineResult<()> {
        self.index.add_measure(id, metric, delta)
    }

    pub fn add_check_message(&mut self, id: EntityId, message: CheckMessage) -> EngineResult<()> {
        self.index.add_check_message(id, message)
    }

    /// Aggregate `metrics` over the whole tree and return the decorated root
    pub fn decorate(&mut self, metrics: &[&dyn MetricDef]) -> &SourceCode {
        let root = self.index.root();
        let visited = TreeDecorator::new(metrics).decorate(&mut self.index, root);
        info!("Decorated {} entities", visited);
        self.index.project()
    }

    /// Drop every entity and edge, keeping an empty project root
    pub fn flush(&mut self) {
        self.index.flush();
        self.graph.clear();
    }
}
