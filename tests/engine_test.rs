//! End-to-end engine tests
//!
//! Scans a small on-disk tree with the text parser and the built-in
//! visitors, then checks the decorated totals and the dependency graph.

use codeweave::graph::EdgeUsage;
use codeweave::index::{Operator, QueryByKind, QueryByMeasure};
use codeweave::metrics::{Metric, MetricDef};
use codeweave::model::SourceCodeKind;
use codeweave::parsers::TextParser;
use codeweave::scanner::{ScanStatus, Scanner, SilentProgressReport, PARSE_ERROR_RULE};
use codeweave::visitors::{ComplexityVisitor, LineMetricsVisitor};
use codeweave::AnalysisEngine;
use std::path::PathBuf;
use tempfile::TempDir;

const MAIN_C: &str = "#include <stdio.h>
// entry point
int main(void) {
    if (1 && 2) {
        return 0;
    }
    return 1;
}
";

const UTIL_PY: &str = "def add(a, b):

    # return self.total + b
    return a + b
";

fn create_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::create_dir_all(dir.path().join("lib")).unwrap();
    std::fs::write(dir.path().join("src/main.c"), MAIN_C).unwrap();
    std::fs::write(dir.path().join("lib/util.py"), UTIL_PY).unwrap();
    std::fs::write(dir.path().join("lib/notes.txt"), "not source\n").unwrap();
    dir
}

fn scanner_for(dir: &TempDir) -> Scanner<TextParser> {
    Scanner::new(TextParser::with_root(dir.path()))
        .with_visitor(LineMetricsVisitor::default())
        .with_visitor(ComplexityVisitor::new())
        .with_progress_report(SilentProgressReport)
        .with_files_metric(Metric::Files)
        .group_by_directory(true)
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn test_scan_and_decorate_tree() {
    let dir = create_workspace();
    let mut engine = AnalysisEngine::new("demo");

    let report = scanner_for(&dir)
        .scan(&mut engine, &paths(&["lib/util.py", "src/main.c"]))
        .unwrap();
    assert_eq!(report.status, ScanStatus::Succeeded);
    assert_eq!(report.scanned_files, 2);

    let project = engine.decorate(&Metric::defs());
    assert_eq!(project.get_i64(&Metric::Files), 2);
    assert_eq!(project.get_i64(&Metric::Lines), 12);
    assert_eq!(project.get_i64(&Metric::LinesOfCode), 9);
    assert_eq!(project.get_i64(&Metric::BlankLines), 1);
    assert_eq!(project.get_i64(&Metric::CommentLines), 1);
    assert_eq!(project.get_i64(&Metric::CommentedOutCodeLines), 1);
    // main.c: 1 + if + &&; util.py: 1
    assert_eq!(project.get_i64(&Metric::Complexity), 4);
    assert!((project.get_f64(&Metric::CommentLinesDensity) - 0.1).abs() < 1e-9);

    let src = engine.search("package:src").unwrap();
    assert!(src.is(&SourceCodeKind::Package));
    assert_eq!(src.get_i64(&Metric::Lines), 8);
    assert_eq!(src.get_i64(&Metric::Files), 1);

    let packages = engine.search_by(&[&QueryByKind(SourceCodeKind::Package)]);
    assert_eq!(packages.len(), 2);
}

#[test]
fn test_raw_measures_survive_decoration() {
    let dir = create_workspace();
    let mut engine = AnalysisEngine::new("demo");
    scanner_for(&dir)
        .scan(&mut engine, &paths(&["lib/util.py", "src/main.c"]))
        .unwrap();
    engine.decorate(&Metric::defs());

    let lib = engine.search("package:lib").unwrap();
    assert!(lib.is_decorated());
    assert!(lib.raw_measures().get(Metric::Lines.name()).is_none());
    assert_eq!(lib.get_i64(&Metric::Lines), 4);

    // Changing a raw value drops the stale view
    let id = lib.id().unwrap();
    engine.set_measure(id, &Metric::Lines, 100.0).unwrap();
    let lib = engine.search("package:lib").unwrap();
    assert!(!lib.is_decorated());

    let project = engine.decorate(&Metric::defs());
    assert_eq!(project.get_i64(&Metric::Lines), 112);
}

#[test]
fn test_unsupported_file_is_reported() {
    let dir = create_workspace();
    let mut engine = AnalysisEngine::new("demo");

    let report = scanner_for(&dir)
        .scan(&mut engine, &paths(&["lib/notes.txt", "src/main.c"]))
        .unwrap();
    assert_eq!(report.status, ScanStatus::CompletedWithErrors);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, PathBuf::from("lib/notes.txt"));

    let notes = engine.search("lib/notes.txt").unwrap();
    assert_eq!(notes.check_messages().len(), 1);
    assert_eq!(notes.check_messages()[0].rule, PARSE_ERROR_RULE);
    assert!(engine.search("src/main.c").is_some());
}

#[test]
fn test_query_complex_files() {
    let dir = create_workspace();
    let mut engine = AnalysisEngine::new("demo");
    scanner_for(&dir)
        .scan(&mut engine, &paths(&["lib/util.py", "src/main.c"]))
        .unwrap();

    let complex = engine.search_by(&[
        &QueryByKind(SourceCodeKind::File),
        &QueryByMeasure::new(&Metric::Complexity, Operator::GreaterThan, 1.0),
    ]);
    assert_eq!(complex.len(), 1);
    assert_eq!(complex[0].key(), PathBuf::from("src/main.c").display().to_string());
}

#[test]
fn test_dependencies_between_scanned_files() {
    let dir = create_workspace();
    let mut engine = AnalysisEngine::new("demo");
    scanner_for(&dir)
        .scan(&mut engine, &paths(&["lib/util.py", "src/main.c"]))
        .unwrap();

    let main = engine.search("src/main.c").and_then(|f| f.id()).unwrap();
    let util = engine.search("lib/util.py").and_then(|f| f.id()).unwrap();

    assert!(engine.add_edge(main, util, EdgeUsage::Uses).unwrap());
    assert!(engine.graph().find_cycles(&[EdgeUsage::Uses]).is_empty());

    assert!(engine.add_edge(util, main, EdgeUsage::Uses).unwrap());
    let cycles = engine.graph().find_cycles(&[EdgeUsage::Uses]);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), 2);

    // Rescanning a file replaces its entity and its edges
    scanner_for(&dir)
        .scan(&mut engine, &paths(&["lib/util.py"]))
        .unwrap();
    assert!(engine.incoming_edges_of(main).is_empty());
    assert!(engine.outgoing_edges_of(main).is_empty());
}
