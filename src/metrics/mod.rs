//! Metric definitions and bottom-up aggregation
//!
//! A metric is a named numeric quantity with an aggregation policy:
//! - `Sum`: own raw value plus the aggregated values of all children
//! - `Formula`: derived from already-aggregated values on the same node
//! - `None`: kept as set during scanning
//!
//! Built-in metrics live in [`Metric`]; hosts add their own by implementing
//! [`MetricDef`].

pub mod decorator;
pub mod formula;

pub use decorator::TreeDecorator;
pub use formula::{
    AbstractnessFormula, CommentLinesDensityFormula, DistanceFormula, Formula, InstabilityFormula,
};

use serde::Serialize;
use std::fmt;

/// How a metric propagates through the tree during decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Formula,
    None,
}

/// A measurable quantity attached to entities
pub trait MetricDef: Send + Sync {
    /// Key under which values are stored in an entity's measure table
    fn name(&self) -> &str;

    fn aggregation(&self) -> Aggregation;

    /// Formula for `Aggregation::Formula` metrics
    fn formula(&self) -> Option<&dyn Formula> {
        None
    }
}

/// Built-in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Files,
    Packages,
    Classes,
    Interfaces,
    AbstractClasses,
    Methods,
    Lines,
    LinesOfCode,
    BlankLines,
    CommentLines,
    CommentBlankLines,
    CommentedOutCodeLines,
    Statements,
    Complexity,
    /// Afferent coupling
    Ca,
    /// Efferent coupling
    Ce,
    Instability,
    Abstractness,
    Distance,
    CommentLinesDensity,
}

impl Metric {
    pub const ALL: [Metric; 20] = [
        Metric::Files,
        Metric::Packages,
        Metric::Classes,
        Metric::Interfaces,
        Metric::AbstractClasses,
        Metric::Methods,
        Metric::Lines,
        Metric::LinesOfCode,
        Metric::BlankLines,
        Metric::CommentLines,
        Metric::CommentBlankLines,
        Metric::CommentedOutCodeLines,
        Metric::Statements,
        Metric::Complexity,
        Metric::Ca,
        Metric::Ce,
        Metric::Instability,
        Metric::Abstractness,
        Metric::Distance,
        Metric::CommentLinesDensity,
    ];

    /// All built-in metrics as trait objects, ready for decoration
    pub fn defs() -> Vec<&'static dyn MetricDef> {
        BUILTIN.iter().map(|m| m as &dyn MetricDef).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Files => "files",
            Metric::Packages => "packages",
            Metric::Classes => "classes",
            Metric::Interfaces => "interfaces",
            Metric::AbstractClasses => "abstract_classes",
            Metric::Methods => "methods",
            Metric::Lines => "lines",
            Metric::LinesOfCode => "lines_of_code",
            Metric::BlankLines => "blank_lines",
            Metric::CommentLines => "comment_lines",
            Metric::CommentBlankLines => "comment_blank_lines",
            Metric::CommentedOutCodeLines => "commented_out_code_lines",
            Metric::Statements => "statements",
            Metric::Complexity => "complexity",
            Metric::Ca => "ca",
            Metric::Ce => "ce",
            Metric::Instability => "instability",
            Metric::Abstractness => "abstractness",
            Metric::Distance => "distance",
            Metric::CommentLinesDensity => "comment_lines_density",
        }
    }

    /// Look up a built-in metric by its stored name
    pub fn from_name(name: &str) -> Option<Metric> {
        Self::ALL.iter().copied().find(|m| m.as_str() == name)
    }

    pub fn is_formula(&self) -> bool {
        self.aggregation() == Aggregation::Formula
    }
}

static BUILTIN: [Metric; 20] = Metric::ALL;

impl MetricDef for Metric {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn aggregation(&self) -> Aggregation {
        match self {
            Metric::Instability
            | Metric::Abstractness
            | Metric::Distance
            | Metric::CommentLinesDensity => Aggregation::Formula,
            _ => Aggregation::Sum,
        }
    }

    fn formula(&self) -> Option<&dyn Formula> {
        match self {
            Metric::Instability => Some(&InstabilityFormula),
            Metric::Abstractness => Some(&AbstractnessFormula),
            Metric::Distance => Some(&DistanceFormula),
            Metric::CommentLinesDensity => Some(&CommentLinesDensityFormula),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
