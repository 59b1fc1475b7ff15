//! Visitors for [`SourceText`] files
//!
//! Both set raw measures on the File entity; aggregation is left to the
//! decorator.

use crate::error::EngineResult;
use crate::metrics::Metric;
use crate::parsers::{Language, SourceText};
use crate::recognizer::CodeRecognizer;
use crate::scanner::{AstVisitor, ScanContext};
use crate::text::Source;
use rustc_hash::FxHashMap;

pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Physical line metrics: lines, blank, code, comment and commented-out code
#[derive(Debug)]
pub struct LineMetricsVisitor {
    threshold: f64,
    recognizers: FxHashMap<Language, CodeRecognizer>,
}

impl LineMetricsVisitor {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            recognizers: FxHashMap::default(),
        }
    }
}

impl Default for LineMetricsVisitor {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl AstVisitor<SourceText> for LineMetricsVisitor {
    fn visit_file(&mut self, ctx: &mut ScanContext<'_>, ast: &SourceText) -> EngineResult<()> {
        let threshold = self.threshold;
        let recognizer = self
            .recognizers
            .entry(ast.language)
            .or_insert_with(|| ast.language.recognizer(threshold));
        let source = Source::from_text(&ast.text, &ast.language.context_handlers(), recognizer);

        let file = ctx.file();
        for (metric, count) in source.counts().as_metrics() {
            ctx.set_measure(file, &metric, f64::from(count))?;
        }
        Ok(())
    }
}

/// Approximate cyclomatic complexity: one plus every branch keyword and
/// short-circuit operator found on code lines
#[derive(Debug, Default)]
pub struct ComplexityVisitor {
    recognizers: FxHashMap<Language, CodeRecognizer>,
}

impl ComplexityVisitor {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Complexity of one text, comments and string literals ignored
pub fn complexity_of(language: Language, text: &str, recognizer: &CodeRecognizer) -> u32 {
    let source = Source::from_text(text, &language.context_handlers(), recognizer);
    let keywords = language.branch_keywords();
    let operators = language.branch_operators();

    let decisions: usize = source
        .bare_code_lines()
        .map(|line| {
            let by_keyword = line
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .filter(|token| keywords.contains(token))
                .count();
            let by_operator: usize = operators.iter().map(|op| line.matches(op).count()).sum();
            by_keyword + by_operator
        })
        .sum();
    1 + decisions as u32
}

impl AstVisitor<SourceText> for ComplexityVisitor {
    fn visit_file(&mut self, ctx: &mut ScanContext<'_>, ast: &SourceText) -> EngineResult<()> {
        let recognizer = self
            .recognizers
            .entry(ast.language)
            .or_insert_with(|| ast.language.recognizer(DEFAULT_THRESHOLD));
        let complexity = complexity_of(ast.language, &ast.text, recognizer);
        let file = ctx.file();
        ctx.set_measure(file, &Metric::Complexity, f64::from(complexity))
    }
}
