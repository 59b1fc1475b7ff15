//! Key-addressed arena of source code entities
//!
//! The index owns every entity. Slots are addressed by [`EntityId`] and are
//! never reused, so a stale id simply resolves to nothing after removal.

pub mod query;

pub use query::{Operator, Query, QueryByAncestor, QueryByKeyPrefix, QueryByKind, QueryByMeasure};

use crate::error::{EngineError, EngineResult};
use crate::metrics::MetricDef;
use crate::model::{CheckMessage, EntityId, SourceCode};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Entity store with key lookup and predicate search
#[derive(Debug, Clone)]
pub struct SourceIndex {
    entities: Vec<Option<SourceCode>>,
    keys: FxHashMap<String, EntityId>,
    root: EntityId,
    live: usize,
}

impl SourceIndex {
    /// Create an index whose root is `project`
    pub fn new(mut project: SourceCode) -> Self {
        let root = EntityId(0);
        project.id = Some(root);
        project.parent = None;
        project.children.clear();

        let mut keys = FxHashMap::default();
        keys.insert(project.key.clone(), root);

        Self {
            entities: vec![Some(project)],
            keys,
            root,
            live: 1,
        }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn project(&self) -> &SourceCode {
        // The root slot is only vacated by `flush`, which refills it.
        self.entities[self.root.slot()]
            .as_ref()
            .expect("project root is always indexed")
    }

    /// Register `entity` as the last child of `parent`.
    ///
    /// Fails without touching the index when the key is taken or the parent
    /// is not indexed.
    pub fn index(&mut self, parent: EntityId, mut entity: SourceCode) -> EngineResult<EntityId> {
        if self.keys.contains_key(&entity.key) {
            return Err(EngineError::DuplicateKey(entity.key));
        }
        if !self.contains(parent) {
            return Err(EngineError::UnknownParent {
                key: entity.key,
                parent,
            });
        }

        let id = EntityId(self.entities.len() as u32);
        entity.id = Some(id);
        entity.parent = Some(parent);
        entity.children.clear();

        self.keys.insert(entity.key.clone(), id);
        self.entities.push(Some(entity));
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        self.live += 1;
        Ok(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&SourceCode> {
        self.entities.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SourceCode> {
        self.entities.get_mut(id.slot()).and_then(Option::as_mut)
    }

    pub fn id_of(&self, key: &str) -> Option<EntityId> {
        self.keys.get(key).copied()
    }

    /// Entity registered under `key`
    pub fn search(&self, key: &str) -> Option<&SourceCode> {
        self.id_of(key).and_then(|id| self.get(id))
    }

    /// Entities matching every query, in indexing order
    pub fn search_by(&self, queries: &[&dyn Query]) -> Vec<&SourceCode> {
        self.iter()
            .filter(|entity| queries.iter().all(|q| q.matches(entity, self)))
            .collect()
    }

    /// All live entities in indexing order
    pub fn iter(&self) -> impl Iterator<Item = &SourceCode> {
        self.entities.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.live
    }

    /// Always false: the project root cannot be removed
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn children(&self, id: EntityId) -> impl Iterator<Item = &SourceCode> {
        self.get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.get(*child))
    }

    /// Parent chain from the direct parent up to the root
    pub fn ancestors(&self, id: EntityId) -> Vec<EntityId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|e| e.parent);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.get(parent).and_then(|e| e.parent);
        }
        chain
    }

    /// True when `ancestor` is a strict ancestor of `id`
    pub fn is_descendant_of(&self, id: EntityId, ancestor: EntityId) -> bool {
        let mut current = self.get(id).and_then(|e| e.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(|e| e.parent);
        }
        false
    }

    /// `id` and its whole subtree, parents before children
    pub fn subtree(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(entity) = self.get(current) {
                // Reverse so children come out in creation order
                stack.extend(entity.children.iter().rev().copied());
            }
        }
        out
    }

    /// Everything below `id`, excluding `id` itself
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        self.subtree(id).into_iter().skip(1).collect()
    }

    /// `id` and its whole subtree, children before parents
    pub fn post_order(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                out.push(current);
                continue;
            }
            stack.push((current, true));
            if let Some(entity) = self.get(current) {
                stack.extend(entity.children.iter().rev().map(|c| (*c, false)));
            }
        }
        out
    }

    /// Remove `id` and its subtree. Returns the removed ids, parents first.
    ///
    /// Edges are not known here; callers owning a graph must drop the
    /// returned vertices as well (see [`AnalysisEngine::remove`](crate::engine::AnalysisEngine::remove)).
    pub fn remove(&mut self, id: EntityId) -> EngineResult<Vec<SourceCode>> {
        if id == self.root {
            return Err(EngineError::RootRemoval);
        }
        if !self.contains(id) {
            return Err(EngineError::UnknownEntity(id));
        }

        let parent = self.get(id).and_then(|e| e.parent);
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|child| *child != id);
        }

        let doomed = self.subtree(id);
        let mut removed = Vec::with_capacity(doomed.len());
        for victim in doomed {
            if let Some(entity) = self.entities[victim.slot()].take() {
                self.keys.remove(&entity.key);
                removed.push(entity);
            }
        }
        self.live -= removed.len();
        debug!("Removed {} entities under {}", removed.len(), id);
        Ok(removed)
    }

    pub fn set_measure(
        &mut self,
        id: EntityId,
        metric: &dyn MetricDef,
        value: f64,
    ) -> EngineResult<()> {
        let entity = self.get_mut(id).ok_or(EngineError::UnknownEntity(id))?;
        entity.set_measure(metric, value);
        Ok(())
    }

    pub fn add_measure(
        &mut self,
        id: EntityId,
        metric: &dyn MetricDef,
        delta: f64,
    ) -> EngineResult<()> {
        let entity = self.get_mut(id).ok_or(EngineError::UnknownEntity(id))?;
        entity.add_measure(metric, delta);
        Ok(())
    }

    pub fn add_check_message(&mut self, id: EntityId, message: CheckMessage) -> EngineResult<()> {
        let entity = self.get_mut(id).ok_or(EngineError::UnknownEntity(id))?;
        entity.add_check_message(message);
        Ok(())
    }

    /// Drop every entity and start over with a fresh copy of the root
    pub fn flush(&mut self) {
        let project = self.project();
        let fresh = SourceCode::new(project.kind.clone(), &project.key).with_name(&project.name);
        *self = Self::new(fresh);
    }
}

#[cfg(test)]
mod tests;
