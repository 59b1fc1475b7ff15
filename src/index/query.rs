//! Predicates for searching the index
//!
//! A search takes several queries and keeps the entities matching all of
//! them. Any `Fn(&SourceCode) -> bool` closure is a query as well.

use super::SourceIndex;
use crate::metrics::MetricDef;
use crate::model::{EntityId, SourceCode, SourceCodeKind};

/// A predicate over indexed entities
pub trait Query {
    fn matches(&self, entity: &SourceCode, index: &SourceIndex) -> bool;
}

impl<F> Query for F
where
    F: Fn(&SourceCode) -> bool,
{
    fn matches(&self, entity: &SourceCode, _index: &SourceIndex) -> bool {
        self(entity)
    }
}

/// Entities of one kind
#[derive(Debug, Clone)]
pub struct QueryByKind(pub SourceCodeKind);

impl Query for QueryByKind {
    fn matches(&self, entity: &SourceCode, _index: &SourceIndex) -> bool {
        entity.is(&self.0)
    }
}

/// Entities whose key starts with a prefix
#[derive(Debug, Clone)]
pub struct QueryByKeyPrefix(pub String);

impl QueryByKeyPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }
}

impl Query for QueryByKeyPrefix {
    fn matches(&self, entity: &SourceCode, _index: &SourceIndex) -> bool {
        entity.key().starts_with(&self.0)
    }
}

/// Strict descendants of an entity
#[derive(Debug, Clone, Copy)]
pub struct QueryByAncestor(pub EntityId);

impl Query for QueryByAncestor {
    fn matches(&self, entity: &SourceCode, index: &SourceIndex) -> bool {
        entity
            .id()
            .is_some_and(|id| index.is_descendant_of(id, self.0))
    }
}

/// Comparison used by [`QueryByMeasure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
}

impl Operator {
    fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Operator::Equals => left == right,
            Operator::LessThan => left < right,
            Operator::LessThanEquals => left <= right,
            Operator::GreaterThan => left > right,
            Operator::GreaterThanEquals => left >= right,
        }
    }
}

/// Entities whose current value of a metric satisfies a threshold
pub struct QueryByMeasure<'m> {
    metric: &'m dyn MetricDef,
    operator: Operator,
    value: f64,
}

impl<'m> QueryByMeasure<'m> {
    pub fn new(metric: &'m dyn MetricDef, operator: Operator, value: f64) -> Self {
        Self {
            metric,
            operator,
            value,
        }
    }
}

impl Query for QueryByMeasure<'_> {
    fn matches(&self, entity: &SourceCode, _index: &SourceIndex) -> bool {
        self.operator.apply(entity.get_f64(self.metric), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        assert!(Operator::Equals.apply(2.0, 2.0));
        assert!(Operator::LessThan.apply(1.0, 2.0));
        assert!(!Operator::LessThan.apply(2.0, 2.0));
        assert!(Operator::LessThanEquals.apply(2.0, 2.0));
        assert!(Operator::GreaterThan.apply(3.0, 2.0));
        assert!(Operator::GreaterThanEquals.apply(2.0, 2.0));
        assert!(!Operator::GreaterThanEquals.apply(1.0, 2.0));
    }
}
