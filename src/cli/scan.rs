//! `codeweave scan`: walk, scan, decorate, report

use super::progress::BarProgressReport;
use anyhow::{bail, Context, Result};
use codeweave::config::{load_project_config, ProjectConfig};
use codeweave::engine::AnalysisEngine;
use codeweave::index::QueryByKind;
use codeweave::metrics::{Metric, MetricDef};
use codeweave::model::{CheckMessage, SourceCode, SourceCodeKind};
use codeweave::parsers::{TextParser, SUPPORTED_EXTENSIONS};
use codeweave::scanner::{CancelFlag, LoggingProgressReport, ProgressReport, ScanReport, ScanStatus, Scanner};
use codeweave::visitors::{ComplexityVisitor, LineMetricsVisitor};
use console::style;
use ignore::WalkBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct ScanOptions {
    pub format: String,
    pub fail_fast: bool,
    pub threshold: Option<f64>,
    pub no_progress: bool,
    pub top: usize,
}

/// Metrics shown in text output, in display order
const SUMMARY_METRICS: &[Metric] = &[
    Metric::Files,
    Metric::Packages,
    Metric::Lines,
    Metric::LinesOfCode,
    Metric::BlankLines,
    Metric::CommentLines,
    Metric::CommentBlankLines,
    Metric::CommentedOutCodeLines,
    Metric::Complexity,
    Metric::CommentLinesDensity,
];

pub fn run(path: &Path, options: ScanOptions) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let mut config = load_project_config(&root);
    if options.fail_fast {
        config.scan.fail_fast = true;
    }
    if let Some(threshold) = options.threshold {
        config.recognizer.threshold = threshold;
    }

    let files = collect_source_files(&root, &config)?;
    debug!("Collected {} files under {}", files.len(), root.display());

    let project_key = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let mut engine = AnalysisEngine::new(&project_key);

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.cancel()) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let interactive = !options.no_progress && options.format == "text" && console::Term::stderr().is_term();
    let progress: Box<dyn ProgressReport> = if interactive {
        Box::new(BarProgressReport::new())
    } else {
        Box::new(LoggingProgressReport::new(config.scan.progress_interval()))
    };

    let mut scanner = Scanner::new(TextParser::with_root(&root))
        .with_visitor(LineMetricsVisitor::new(config.recognizer.threshold))
        .with_visitor(ComplexityVisitor::new())
        .with_progress_report(progress)
        .with_files_metric(Metric::Files)
        .with_cancel_flag(cancel)
        .fail_fast(config.scan.fail_fast)
        .group_by_directory(config.scan.group_by_directory);

    let report = scanner
        .scan(&mut engine, &files)
        .context("Scan aborted")?;

    count_packages(&mut engine)?;
    engine.decorate(&Metric::defs());

    match options.format.as_str() {
        "json" => print_json(&engine, &report)?,
        _ => print_text(&engine, &report, options.top),
    }

    match report.status {
        ScanStatus::Cancelled => bail!("Scan cancelled"),
        ScanStatus::Failed => bail!("Scan stopped at the first parse error"),
        ScanStatus::Succeeded | ScanStatus::CompletedWithErrors => Ok(()),
    }
}

/// Source files under `root`, relative to it, in a stable order
fn collect_source_files(root: &Path, config: &ProjectConfig) -> Result<Vec<PathBuf>> {
    let overrides = config
        .exclude
        .overrides(root)
        .context("Invalid [exclude] patterns")?;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .overrides(overrides);

    let mut files = Vec::new();
    for entry in builder.build().flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
        if !supported {
            continue;
        }
        if let Ok(relative) = path.strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Packages count themselves so the total aggregates at the root
fn count_packages(engine: &mut AnalysisEngine) -> Result<()> {
    let packages: Vec<_> = engine
        .search_by(&[&QueryByKind(SourceCodeKind::Package)])
        .iter()
        .filter_map(|p| p.id())
        .collect();
    for id in packages {
        engine.set_measure(id, &Metric::Packages, 1.0)?;
    }
    Ok(())
}

fn metric_table(entity: &SourceCode) -> BTreeMap<String, f64> {
    Metric::ALL
        .iter()
        .map(|m| (m.name().to_string(), entity.get_f64(m)))
        .collect()
}

#[derive(Serialize)]
struct FileOutput<'a> {
    key: &'a str,
    metrics: BTreeMap<String, f64>,
    messages: &'a [CheckMessage],
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    project: &'a str,
    report: &'a ScanReport,
    metrics: BTreeMap<String, f64>,
    files: Vec<FileOutput<'a>>,
}

fn print_json(engine: &AnalysisEngine, report: &ScanReport) -> Result<()> {
    let project = engine.project();
    let files = engine
        .search_by(&[&QueryByKind(SourceCodeKind::File)])
        .into_iter()
        .map(|file| FileOutput {
            key: file.key(),
            metrics: metric_table(file),
            messages: file.check_messages(),
        })
        .collect();

    let output = ScanOutput {
        project: project.key(),
        report,
        metrics: metric_table(project),
        files,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(engine: &AnalysisEngine, report: &ScanReport, top: usize) {
    let project = engine.project();
    let status = match report.status {
        ScanStatus::Succeeded => style(report.status.to_string()).green(),
        ScanStatus::CompletedWithErrors => style(report.status.to_string()).yellow(),
        ScanStatus::Cancelled | ScanStatus::Failed => style(report.status.to_string()).red(),
    };

    println!();
    println!(
        "{} {} ({}/{} files, {:.2?})",
        style("Scan").bold(),
        status,
        report.scanned_files,
        report.total_files,
        report.elapsed
    );
    println!();
    println!("{}", style(project.key()).bold().underlined());
    for metric in SUMMARY_METRICS {
        let value = project.get_f64(metric);
        let shown = if metric.is_formula() {
            format!("{:.1}%", value * 100.0)
        } else {
            format!("{}", value.round() as i64)
        };
        println!("  {:<26} {}", metric.name(), style(shown).cyan());
    }

    let mut files = engine.search_by(&[&QueryByKind(SourceCodeKind::File)]);
    files.sort_by_key(|f| std::cmp::Reverse(f.get_i64(&Metric::Complexity)));
    if top > 0 && !files.is_empty() {
        println!();
        println!("{}", style("Most complex files").bold());
        for file in files.iter().take(top) {
            println!(
                "  {:>5}  {}",
                style(file.get_i64(&Metric::Complexity)).yellow(),
                file.key()
            );
        }
    }

    if report.has_errors() {
        println!();
        println!("{}", style(format!("{} files failed to parse", report.errors.len())).red());
        for error in &report.errors {
            match error.line {
                Some(line) => println!("  {}:{}: {}", error.path.display(), line, error.message),
                None => println!("  {}: {}", error.path.display(), error.message),
            }
        }
    }
}
