//! Derived metrics computed from aggregated values on one node
//!
//! Every ratio here treats a zero denominator as a zero result.

use super::Metric;
use crate::model::Measures;

/// Computes a metric from other metrics of the same entity
pub trait Formula: Send + Sync {
    fn calculate(&self, measures: &Measures) -> f64;
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `ce / (ca + ce)`
#[derive(Debug, Clone, Copy, Default)]
pub struct InstabilityFormula;

impl Formula for InstabilityFormula {
    fn calculate(&self, measures: &Measures) -> f64 {
        let ca = measures.value(Metric::Ca.as_str());
        let ce = measures.value(Metric::Ce.as_str());
        ratio(ce, ca + ce)
    }
}

/// `(interfaces + abstract_classes) / classes`
#[derive(Debug, Clone, Copy, Default)]
pub struct AbstractnessFormula;

impl Formula for AbstractnessFormula {
    fn calculate(&self, measures: &Measures) -> f64 {
        let abstractions = measures.value(Metric::Interfaces.as_str())
            + measures.value(Metric::AbstractClasses.as_str());
        ratio(abstractions, measures.value(Metric::Classes.as_str()))
    }
}

/// Distance from the main sequence: `|abstractness + instability - 1|`
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceFormula;

impl Formula for DistanceFormula {
    fn calculate(&self, measures: &Measures) -> f64 {
        let abstractness = AbstractnessFormula.calculate(measures);
        let instability = InstabilityFormula.calculate(measures);
        (abstractness + instability - 1.0).abs()
    }
}

/// `comment_lines / (lines_of_code + comment_lines)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentLinesDensityFormula;

impl Formula for CommentLinesDensityFormula {
    fn calculate(&self, measures: &Measures) -> f64 {
        let comments = measures.value(Metric::CommentLines.as_str());
        let code = measures.value(Metric::LinesOfCode.as_str());
        ratio(comments, code + comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupling(ca: f64, ce: f64) -> Measures {
        let mut measures = Measures::new();
        measures.set("ca", ca);
        measures.set("ce", ce);
        measures
    }

    #[test]
    fn test_instability_best_stability() {
        assert!((InstabilityFormula.calculate(&coupling(50.0, 0.0)) - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_instability_worst_stability() {
        assert!((InstabilityFormula.calculate(&coupling(0.0, 10.0)) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_instability_isolated_project() {
        let value = InstabilityFormula.calculate(&coupling(0.0, 0.0));
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn test_instability_missing_inputs_are_zero() {
        assert_eq!(InstabilityFormula.calculate(&Measures::new()), 0.0);
    }

    #[test]
    fn test_abstractness_and_distance() {
        let mut measures = coupling(1.0, 3.0);
        measures.set("classes", 4.0);
        measures.set("interfaces", 1.0);
        measures.set("abstract_classes", 1.0);

        assert!((AbstractnessFormula.calculate(&measures) - 0.5).abs() < 1e-9);
        // |0.5 + 0.75 - 1|
        assert!((DistanceFormula.calculate(&measures) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_comment_density() {
        let mut measures = Measures::new();
        measures.set("lines_of_code", 30.0);
        measures.set("comment_lines", 10.0);
        assert!((CommentLinesDensityFormula.calculate(&measures) - 0.25).abs() < 1e-9);
        assert_eq!(CommentLinesDensityFormula.calculate(&Measures::new()), 0.0);
    }
}
