//! Per-entity measure tables

use rustc_hash::FxHashMap;
use serde::Serialize;

/// Numeric values keyed by metric name.
///
/// Integer-valued metrics are stored as `f64` too; `get_i64` rounds on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Measures {
    values: FxHashMap<String, f64>,
}

impl Measures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    /// Value of `metric`, zero when it was never set
    pub fn value(&self, metric: &str) -> f64 {
        self.get(metric).unwrap_or(0.0)
    }

    pub fn get_i64(&self, metric: &str) -> Option<i64> {
        self.get(metric).map(|v| v.round() as i64)
    }

    pub fn set(&mut self, metric: &str, value: f64) {
        self.values.insert(metric.to_string(), value);
    }

    /// Add `delta` to the current value (missing counts as zero)
    pub fn add(&mut self, metric: &str, delta: f64) {
        *self.values.entry(metric.to_string()).or_insert(0.0) += delta;
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.values.contains_key(metric)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
