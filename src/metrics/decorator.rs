//! Bottom-up metric decoration
//!
//! One post-order pass over a subtree. At each node the `Sum` metrics are
//! finalised first (own raw value + children's aggregated values), then the
//! `Formula` metrics are computed from those totals. The aggregated view is
//! rebuilt from raw values on every pass, so decorating twice yields the
//! same numbers.

use super::{Aggregation, MetricDef};
use crate::index::SourceIndex;
use crate::model::{EntityId, Measures};
use tracing::debug;

/// Aggregates a set of metrics over the entity tree
pub struct TreeDecorator<'m> {
    sums: Vec<&'m dyn MetricDef>,
    formulas: Vec<&'m dyn MetricDef>,
}

impl<'m> TreeDecorator<'m> {
    pub fn new(metrics: &[&'m dyn MetricDef]) -> Self {
        let sums = metrics
            .iter()
            .copied()
            .filter(|m| m.aggregation() == Aggregation::Sum)
            .collect();
        let formulas = metrics
            .iter()
            .copied()
            .filter(|m| m.aggregation() == Aggregation::Formula && m.formula().is_some())
            .collect();
        Self { sums, formulas }
    }

    /// Decorate `root` and everything below it. Returns the number of
    /// entities visited.
    pub fn decorate(&self, index: &mut SourceIndex, root: EntityId) -> usize {
        let order = index.post_order(root);
        for &id in &order {
            let Some(view) = self.aggregate(index, id) else {
                continue;
            };
            if let Some(entity) = index.get_mut(id) {
                entity.decorated = Some(view);
            }
        }
        debug!(
            "Decorated {} entities ({} sum, {} formula metrics)",
            order.len(),
            self.sums.len(),
            self.formulas.len()
        );
        order.len()
    }

    fn aggregate(&self, index: &SourceIndex, id: EntityId) -> Option<Measures> {
        let entity = index.get(id)?;
        let mut view = entity.raw_measures().clone();

        for metric in &self.sums {
            let name = metric.name();
            let children: f64 = index
                .children(id)
                .map(|child| child.measures().value(name))
                .sum();
            view.set(name, entity.raw_measures().value(name) + children);
        }

        for metric in &self.formulas {
            if let Some(formula) = metric.formula() {
                let value = formula.calculate(&view);
                view.set(metric.name(), value);
            }
        }

        Some(view)
    }
}
