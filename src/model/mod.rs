//! Source code entity model
//!
//! Entities form a strict tree: project → package → file → type → member.
//! They are owned by the [`SourceIndex`](crate::index::SourceIndex) arena and
//! refer to each other through [`EntityId`]s, so the tree links and the
//! dependency graph never hold live references into the arena.

mod measures;

pub use measures::Measures;

use crate::metrics::MetricDef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an indexed entity. Never reused within one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub(crate) u32);

impl EntityId {
    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity kinds in the source hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCodeKind {
    Project,
    Package,
    File,
    Type,
    Method,
    /// Generic unit for languages without a finer taxonomy
    Unit,
    /// Host-defined kind
    Other(String),
}

impl fmt::Display for SourceCodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCodeKind::Project => write!(f, "project"),
            SourceCodeKind::Package => write!(f, "package"),
            SourceCodeKind::File => write!(f, "file"),
            SourceCodeKind::Type => write!(f, "type"),
            SourceCodeKind::Method => write!(f, "method"),
            SourceCodeKind::Unit => write!(f, "unit"),
            SourceCodeKind::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A message recorded against an entity by a check or by the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckMessage {
    pub line: Option<u32>,
    pub rule: String,
    pub message: String,
}

impl CheckMessage {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: None,
            rule: rule.into(),
            message: message.into(),
        }
    }

    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// A node in the source code tree
#[derive(Debug, Clone, Serialize)]
pub struct SourceCode {
    pub(crate) id: Option<EntityId>,
    pub(crate) key: String,
    pub(crate) name: String,
    pub(crate) kind: SourceCodeKind,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) line_start: Option<u32>,
    pub(crate) line_end: Option<u32>,
    /// Values set during scanning
    pub(crate) measures: Measures,
    /// Whole-subtree values written by the last decoration pass
    pub(crate) decorated: Option<Measures>,
    pub(crate) messages: Vec<CheckMessage>,
}

impl SourceCode {
    pub fn new(kind: SourceCodeKind, key: &str) -> Self {
        Self {
            id: None,
            key: key.to_string(),
            name: key.to_string(),
            kind,
            parent: None,
            children: Vec::new(),
            line_start: None,
            line_end: None,
            measures: Measures::new(),
            decorated: None,
            messages: Vec::new(),
        }
    }

    pub fn project(key: &str) -> Self {
        Self::new(SourceCodeKind::Project, key)
    }

    pub fn package(key: &str) -> Self {
        Self::new(SourceCodeKind::Package, key)
    }

    pub fn file(path: &str) -> Self {
        Self::new(SourceCodeKind::File, path)
    }

    pub fn type_def(key: &str) -> Self {
        Self::new(SourceCodeKind::Type, key)
    }

    pub fn method(key: &str) -> Self {
        Self::new(SourceCodeKind::Method, key)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_lines(mut self, start: u32, end: u32) -> Self {
        self.line_start = Some(start);
        self.line_end = Some(end);
        self
    }

    pub fn with_measure(mut self, metric: &dyn MetricDef, value: f64) -> Self {
        self.measures.set(metric.name(), value);
        self
    }

    /// Identifier assigned when the entity was indexed
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &SourceCodeKind {
        &self.kind
    }

    pub fn is(&self, kind: &SourceCodeKind) -> bool {
        &self.kind == kind
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn line_start(&self) -> Option<u32> {
        self.line_start
    }

    pub fn line_end(&self) -> Option<u32> {
        self.line_end
    }

    pub fn check_messages(&self) -> &[CheckMessage] {
        &self.messages
    }

    pub fn add_check_message(&mut self, message: CheckMessage) {
        self.messages.push(message);
    }

    /// Raw value set during scanning, ignoring decoration
    pub fn raw_measures(&self) -> &Measures {
        &self.measures
    }

    /// Whether a decoration pass has run since the last raw change
    pub fn is_decorated(&self) -> bool {
        self.decorated.is_some()
    }

    /// Current view: the decorated values if any, otherwise the raw ones
    pub fn measures(&self) -> &Measures {
        self.decorated.as_ref().unwrap_or(&self.measures)
    }

    /// Set a raw measure. Any decorated view of this entity is discarded.
    pub fn set_measure(&mut self, metric: &dyn MetricDef, value: f64) {
        self.measures.set(metric.name(), value);
        self.decorated = None;
    }

    /// Add to a raw measure. Any decorated view of this entity is discarded.
    pub fn add_measure(&mut self, metric: &dyn MetricDef, delta: f64) {
        self.measures.add(metric.name(), delta);
        self.decorated = None;
    }

    /// Metric value from the current view.
    ///
    /// Formula metrics that were not materialised by a decoration pass are
    /// computed on demand from the current view.
    pub fn get_f64(&self, metric: &dyn MetricDef) -> f64 {
        let view = self.measures();
        if let Some(value) = view.get(metric.name()) {
            return value;
        }
        metric
            .formula()
            .map(|formula| formula.calculate(view))
            .unwrap_or(0.0)
    }

    pub fn get_i64(&self, metric: &dyn MetricDef) -> i64 {
        self.get_f64(metric).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;

    #[test]
    fn test_builder_sets_fields() {
        let entity = SourceCode::method("Foo#bar")
            .with_name("bar")
            .with_lines(3, 9)
            .with_measure(&Metric::Complexity, 4.0);

        assert_eq!(entity.key(), "Foo#bar");
        assert_eq!(entity.name(), "bar");
        assert_eq!(entity.kind(), &SourceCodeKind::Method);
        assert_eq!(entity.line_start(), Some(3));
        assert_eq!(entity.get_i64(&Metric::Complexity), 4);
        assert!(entity.id().is_none());
    }

    #[test]
    fn test_formula_computed_on_demand() {
        let mut package = SourceCode::package("pac1");
        package.set_measure(&Metric::Ca, 50.0);
        package.set_measure(&Metric::Ce, 0.0);
        assert!((package.get_f64(&Metric::Instability) - 0.0).abs() < 0.01);

        package.set_measure(&Metric::Ca, 0.0);
        package.set_measure(&Metric::Ce, 10.0);
        assert!((package.get_f64(&Metric::Instability) - 1.0).abs() < 0.01);

        package.set_measure(&Metric::Ce, 0.0);
        assert!((package.get_f64(&Metric::Instability) - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_set_measure_discards_decorated_view() {
        let mut file = SourceCode::file("a.c");
        let mut decorated = Measures::new();
        decorated.set("lines", 42.0);
        file.decorated = Some(decorated);
        assert_eq!(file.get_i64(&Metric::Lines), 42);

        file.set_measure(&Metric::Lines, 7.0);
        assert!(!file.is_decorated());
        assert_eq!(file.get_i64(&Metric::Lines), 7);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SourceCodeKind::Package.to_string(), "package");
        assert_eq!(SourceCodeKind::Other("module".into()).to_string(), "module");
    }
}
