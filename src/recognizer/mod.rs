//! Probabilistic code-line recognition
//!
//! A [`LanguageFootprint`] is a set of [`Detector`]s, each giving an
//! independent probability that a line shows some language feature. The
//! [`CodeRecognizer`] folds them together as `1 - Π(1 - p_i)`, so the result
//! does not depend on detector order.
//!
//! Used to tell commented-out code apart from prose comments.

pub mod detectors;
pub mod footprints;

pub use detectors::{CamelCaseDetector, ContainsDetector, EndWithDetector, KeywordsDetector, RegexDetector};
pub use footprints::{CFamilyFootprint, PythonFootprint};

/// Scores one language feature on a single line
pub trait Detector: Send + Sync {
    /// Probability contributed by a single match
    fn probability(&self) -> f64;

    /// Number of matches of this feature on `line`
    fn scan(&self, line: &str) -> usize;

    /// Probability in `[0, 1]` that `line` is code according to this detector
    fn recognition(&self, line: &str) -> f64 {
        match self.scan(line) {
            0 => 0.0,
            n => 1.0 - (1.0 - self.probability()).powi(n.min(i32::MAX as usize) as i32),
        }
    }
}

/// Detectors characterising one language
pub trait LanguageFootprint: Send + Sync {
    fn detectors(&self) -> &[Box<dyn Detector>];
}

/// Decides whether a line looks like code
pub struct CodeRecognizer {
    threshold: f64,
    footprint: Box<dyn LanguageFootprint>,
}

impl CodeRecognizer {
    pub fn new(threshold: f64, footprint: impl LanguageFootprint + 'static) -> Self {
        Self {
            threshold,
            footprint: Box::new(footprint),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Combined probability that `line` is code
    pub fn recognition(&self, line: &str) -> f64 {
        self.footprint
            .detectors()
            .iter()
            .fold(0.0, |probability, detector| {
                1.0 - (1.0 - probability) * (1.0 - detector.recognition(line))
            })
    }

    /// True when the recognition is strictly above the threshold
    pub fn is_line_of_code(&self, line: &str) -> bool {
        self.recognition(line) - self.threshold > 0.0
    }

    /// Lines whose recognition reaches the threshold (inclusive), in order.
    ///
    /// Note the boundary differs from [`is_line_of_code`](Self::is_line_of_code):
    /// a line scoring exactly the threshold is extracted but is not a line of code.
    pub fn extract_code_lines<'a, I>(&self, lines: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter(|line| self.recognition(line) >= self.threshold)
            .collect()
    }
}

impl std::fmt::Debug for CodeRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeRecognizer")
            .field("threshold", &self.threshold)
            .field("detectors", &self.footprint.detectors().len())
            .finish()
    }
}
