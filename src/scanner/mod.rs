//! Scan orchestration
//!
//! A [`Scanner`] feeds files one at a time through a parser and a fixed list
//! of visitors, reporting progress as it goes. It indexes one File entity per
//! path; visitors hang everything else below it through the [`ScanContext`].
//!
//! Cancellation is cooperative: the [`CancelFlag`] is polled between files,
//! so a file being parsed or visited is always finished first.

pub mod cancel;
pub mod progress;

pub use cancel::CancelFlag;
pub use progress::{LoggingProgressReport, ProgressReport, SilentProgressReport};

use crate::engine::AnalysisEngine;
use crate::error::{EngineError, EngineResult, ParseError};
use crate::graph::EdgeUsage;
use crate::metrics::MetricDef;
use crate::model::{CheckMessage, EntityId, SourceCode, SourceCodeKind};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Rule name of the check message recorded for unparsable files
pub const PARSE_ERROR_RULE: &str = "ParseError";

/// Key of the Package entity grouping the files of `dir`.
///
/// Prefixed so a directory can share its name with the project or a file.
pub fn package_key(dir: &Path) -> String {
    format!("package:{}", dir.display())
}

/// Turns a file into a syntax tree
pub trait AstParser: Send {
    type Ast;

    fn parse(&mut self, path: &Path) -> Result<Self::Ast, ParseError>;
}

/// Callbacks run for every successfully parsed file.
///
/// `visit_file` runs in registration order, `leave_file` in reverse order.
/// Returning an error aborts the scan.
pub trait AstVisitor<A>: Send {
    fn init(&mut self, _engine: &mut AnalysisEngine) -> EngineResult<()> {
        Ok(())
    }

    fn visit_file(&mut self, ctx: &mut ScanContext<'_>, ast: &A) -> EngineResult<()>;

    fn leave_file(&mut self, _ctx: &mut ScanContext<'_>, _ast: &A) -> EngineResult<()> {
        Ok(())
    }

    /// Called once after the last file, whatever the outcome
    fn destroy(&mut self) {}
}

/// What visitors may touch while a file is being scanned
pub struct ScanContext<'a> {
    engine: &'a mut AnalysisEngine,
    file: EntityId,
    path: &'a Path,
}

impl<'a> ScanContext<'a> {
    pub fn new(engine: &'a mut AnalysisEngine, file: EntityId, path: &'a Path) -> Self {
        Self { engine, file, path }
    }

    /// The File entity of the file being scanned
    pub fn file(&self) -> EntityId {
        self.file
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    pub fn engine(&self) -> &AnalysisEngine {
        self.engine
    }

    pub fn index(&mut self, parent: EntityId, entity: SourceCode) -> EngineResult<EntityId> {
        self.engine.index(parent, entity)
    }

    pub fn add_edge(&mut self, from: EntityId, to: EntityId, usage: EdgeUsage) -> EngineResult<bool> {
        self.engine.add_edge(from, to, usage)
    }

    pub fn set_measure(&mut self, id: EntityId, metric: &dyn MetricDef, value: f64) -> EngineResult<()> {
        self.engine.set_measure(id, metric, value)
    }

    pub fn add_measure(&mut self, id: EntityId, metric: &dyn MetricDef, delta: f64) -> EngineResult<()> {
        self.engine.add_measure(id, metric, delta)
    }

    pub fn add_check_message(&mut self, id: EntityId, message: CheckMessage) -> EngineResult<()> {
        self.engine.add_check_message(id, message)
    }

    pub fn search(&self, key: &str) -> Option<&SourceCode> {
        self.engine.search(key)
    }
}

/// Lifecycle of a scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    Idle,
    Scanning,
    Completed,
    Cancelled,
    Failed,
}

/// Outcome of one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Succeeded,
    CompletedWithErrors,
    Cancelled,
    Failed,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScanStatus::Succeeded => "succeeded",
            ScanStatus::CompletedWithErrors => "completed with errors",
            ScanStatus::Cancelled => "cancelled",
            ScanStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A file the parser could not handle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub line: Option<u32>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub status: ScanStatus,
    pub total_files: usize,
    /// Files taken through the parser, failed ones included
    pub scanned_files: usize,
    pub errors: Vec<FileError>,
    pub elapsed: Duration,
}

impl ScanReport {
    fn new(total_files: usize) -> Self {
        Self {
            status: ScanStatus::Succeeded,
            total_files,
            scanned_files: 0,
            errors: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

enum LoopOutcome {
    Finished,
    Cancelled,
    Aborted,
}

/// Drives a parser and visitors over a list of files
pub struct Scanner<P: AstParser> {
    parser: P,
    visitors: Vec<Box<dyn AstVisitor<P::Ast>>>,
    progress: Box<dyn ProgressReport>,
    files_metric: Option<Box<dyn MetricDef>>,
    fail_fast: bool,
    group_by_directory: bool,
    cancel: CancelFlag,
    state: ScanState,
}

impl<P: AstParser> Scanner<P> {
    /// A scanner with no visitors that logs progress every 10 seconds
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            visitors: Vec::new(),
            progress: Box::new(LoggingProgressReport::default()),
            files_metric: None,
            fail_fast: false,
            group_by_directory: false,
            cancel: CancelFlag::new(),
            state: ScanState::Idle,
        }
    }

    pub fn with_visitor(mut self, visitor: impl AstVisitor<P::Ast> + 'static) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    pub fn with_progress_report(mut self, progress: impl ProgressReport + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Metric set to 1 on every File entity
    pub fn with_files_metric(mut self, metric: impl MetricDef + 'static) -> Self {
        self.files_metric = Some(Box::new(metric));
        self
    }

    /// Share an existing flag instead of the scanner's own
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Stop at the first file that fails to parse
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Hang files under a Package entity per parent directory
    pub fn group_by_directory(mut self, enabled: bool) -> Self {
        self.group_by_directory = enabled;
        self
    }

    /// Handle for cancelling a scan from another thread
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Scan `files` in order.
    ///
    /// A flag cancelled before the call cancels the scan immediately; use
    /// [`CancelFlag::reset`] to run the scanner again.
    pub fn scan(&mut self, engine: &mut AnalysisEngine, files: &[PathBuf]) -> EngineResult<ScanReport> {
        let started = Instant::now();
        let mut report = ScanReport::new(files.len());
        self.state = ScanState::Scanning;

        for visitor in &mut self.visitors {
            if let Err(err) = visitor.init(engine) {
                self.state = ScanState::Failed;
                return Err(err);
            }
        }

        self.progress.start(files.len());
        let outcome = self.scan_files(engine, files, &mut report);
        for visitor in &mut self.visitors {
            visitor.destroy();
        }
        report.elapsed = started.elapsed();

        match outcome {
            Err(err) => {
                self.progress.cancel();
                self.state = ScanState::Failed;
                warn!("Scan aborted: {}", err);
                Err(err)
            }
            Ok(LoopOutcome::Aborted) => {
                self.progress.cancel();
                self.state = ScanState::Failed;
                report.status = ScanStatus::Failed;
                Ok(report)
            }
            Ok(LoopOutcome::Cancelled) => {
                self.progress.cancel();
                self.state = ScanState::Cancelled;
                report.status = ScanStatus::Cancelled;
                Ok(report)
            }
            Ok(LoopOutcome::Finished) => {
                self.progress.stop();
                self.state = ScanState::Completed;
                report.status = if report.has_errors() {
                    ScanStatus::CompletedWithErrors
                } else {
                    ScanStatus::Succeeded
                };
                Ok(report)
            }
        }
    }

    fn scan_files(
        &mut self,
        engine: &mut AnalysisEngine,
        files: &[PathBuf],
        report: &mut ScanReport,
    ) -> EngineResult<LoopOutcome> {
        for (i, path) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Ok(LoopOutcome::Cancelled);
            }

            let file = self.index_file(engine, path)?;
            debug!("Scanning {}", path.display());

            let parsed = self.parser.parse(path);
            report.scanned_files += 1;
            match parsed {
                Ok(ast) => {
                    let mut ctx = ScanContext::new(engine, file, path);
                    for visitor in self.visitors.iter_mut() {
                        visitor.visit_file(&mut ctx, &ast)?;
                    }
                    for visitor in self.visitors.iter_mut().rev() {
                        visitor.leave_file(&mut ctx, &ast)?;
                    }
                }
                Err(err) => {
                    warn!("Unable to parse file {}: {}", path.display(), err);
                    let mut message = CheckMessage::new(PARSE_ERROR_RULE, format!("Parse error: {}", err));
                    message.line = err.line;
                    engine.add_check_message(file, message)?;
                    report.errors.push(FileError {
                        path: path.clone(),
                        line: err.line,
                        message: err.message,
                    });
                    if self.fail_fast {
                        self.progress.progress(i + 1);
                        return Ok(LoopOutcome::Aborted);
                    }
                }
            }

            self.progress.progress(i + 1);
        }

        // A cancel arriving while the last file was in flight changes nothing
        Ok(LoopOutcome::Finished)
    }

    /// Index the File entity for `path`, replacing one left by an earlier scan
    fn index_file(&self, engine: &mut AnalysisEngine, path: &Path) -> EngineResult<EntityId> {
        let key = path.display().to_string();
        let previous = engine
            .search(&key)
            .map(|e| (e.id(), e.is(&SourceCodeKind::File)));
        match previous {
            // Only a File left by an earlier scan may be replaced
            Some((Some(id), true)) => {
                debug!("Rescanning {}, dropping previous entity", key);
                engine.remove(id)?;
            }
            Some(_) => return Err(EngineError::DuplicateKey(key)),
            None => {}
        }

        let parent = if self.group_by_directory {
            self.package_for(engine, path)?
        } else {
            engine.root()
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| key.clone());
        let file = engine.index(parent, SourceCode::file(&key).with_name(&name))?;
        if let Some(metric) = &self.files_metric {
            engine.set_measure(file, metric.as_ref(), 1.0)?;
        }
        Ok(file)
    }

    fn package_for(&self, engine: &mut AnalysisEngine, path: &Path) -> EngineResult<EntityId> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => return Ok(engine.root()),
        };
        let key = package_key(dir);
        let root = engine.root();
        let existing = engine
            .source_index()
            .children(root)
            .find(|child| child.is(&SourceCodeKind::Package) && child.key() == key)
            .and_then(|package| package.id());
        match existing {
            Some(id) => Ok(id),
            None => {
                let name = dir.display().to_string();
                engine.index(root, SourceCode::package(&key).with_name(&name))
            }
        }
    }
}

impl<P: AstParser> fmt::Debug for Scanner<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("visitors", &self.visitors.len())
            .field("fail_fast", &self.fail_fast)
            .field("group_by_directory", &self.group_by_directory)
            .field("state", &self.state)
            .finish()
    }
}
