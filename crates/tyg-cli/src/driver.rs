//! The fix batch: diagnostics in, rewritten files out.
//!
//! Diagnostics are grouped by file. Each file is parsed into its own tree,
//! every diagnostic for it goes through the fixer pipeline, and a modified
//! tree is printed and written back through a temporary file in the same
//! directory. Files are independent, so `--parallel` fans the groups out
//! over rayon; results are merged back in first-seen file order.

use anyhow::{Context, Result};
use globset::GlobSet;
use rayon::prelude::*;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};
use tyg_checker::{
    FixCounters, FixOptions, FixerSet, InferenceSession, ManualReviewItem, ModuleFixReport,
    SkipReason, fix_module, infer_and_annotate,
};
use tyg_common::diagnostics::group_by_file;
use tyg_common::{Diagnostic, DiagnosticCategory, DiagnosticParser, Severity};
use tyg_emitter::print_module;
use tyg_parser::parse_module;

use crate::backup::create_backup;
use crate::runner::MypyRunner;

/// Where diagnostic lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticSource {
    /// Run mypy over the target.
    Mypy,
    /// Pre-recorded output in a file.
    File(PathBuf),
    Stdin,
}

impl DiagnosticSource {
    /// `-` means stdin.
    #[must_use]
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => Self::Mypy,
            Some(path) if path == Path::new("-") => Self::Stdin,
            Some(path) => Self::File(path.to_path_buf()),
        }
    }
}

/// Raw diagnostic lines for `target`.
pub fn read_diagnostic_lines(
    source: &DiagnosticSource,
    target: &Path,
    runner: &MypyRunner,
) -> Result<Vec<String>> {
    match source {
        DiagnosticSource::Mypy => runner.run(target),
        DiagnosticSource::File(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read diagnostics from {}", path.display()))?;
            Ok(text.lines().map(str::to_string).collect())
        }
        DiagnosticSource::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read diagnostics from stdin")?;
            Ok(text.lines().map(str::to_string).collect())
        }
    }
}

/// Parse raw lines into diagnostics. Notes are attached hints of the error
/// before them and are dropped.
#[must_use]
pub fn parse_diagnostics(lines: &[String]) -> Vec<Diagnostic> {
    let mut parser = DiagnosticParser::new();
    parser
        .parse_lines(lines)
        .into_iter()
        .filter(|diagnostic| diagnostic.severity != Severity::Note)
        .collect()
}

/// Drop diagnostics for files matching `exclude`, matched relative to `base`.
#[must_use]
pub fn drop_excluded(diagnostics: Vec<Diagnostic>, exclude: &GlobSet, base: &Path) -> Vec<Diagnostic> {
    if exclude.is_empty() {
        return diagnostics;
    }
    diagnostics
        .into_iter()
        .filter(|diagnostic| {
            let path = Path::new(&diagnostic.file);
            !exclude.is_match(path.strip_prefix(base).unwrap_or(path))
        })
        .collect()
}

/// Replace `path` with `contents` through a temporary sibling and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write temporary file for {}", path.display()))?;
    tmp.flush()
        .with_context(|| format!("failed to flush temporary file for {}", path.display()))?;
    if let Ok(metadata) = std::fs::metadata(path) {
        let _ = std::fs::set_permissions(tmp.path(), metadata.permissions());
    }
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub fix: FixOptions,
    /// Compute everything but write nothing.
    pub dry_run: bool,
    pub parallel: bool,
}

/// Outcome of one file of the batch.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file: String,
    pub report: ModuleFixReport,
    /// Whether the file on disk was replaced.
    pub written: bool,
}

/// Totals of a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FixResult {
    #[serde(flatten)]
    pub counters: FixCounters,
    pub manual_review: Vec<ManualReviewItem>,
    /// Files whose tree changed, in first-seen order.
    pub files_modified: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    #[serde(rename = "time", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl FixResult {
    fn absorb(&mut self, outcome: FileOutcome) {
        self.counters.merge(&outcome.report.counters);
        self.manual_review.extend(outcome.report.manual_review);
        if outcome.report.modified {
            self.files_modified.push(outcome.file);
        }
    }
}

/// Manual-review entry covering a whole file.
fn whole_file_item(file: &str, message: String, reason: SkipReason) -> ManualReviewItem {
    ManualReviewItem {
        file: file.to_string(),
        line: 0,
        category: DiagnosticCategory::Unknown,
        message,
        reason,
    }
}

/// Fix one file's diagnostics.
///
/// A file that cannot be read, parsed or written back lands in manual
/// review as a whole and the rest of the batch carries on. A missing file
/// is skipped.
pub fn fix_file(
    file: &str,
    diagnostics: &[Diagnostic],
    fixers: &FixerSet,
    options: BatchOptions,
) -> Result<FileOutcome> {
    let _span = info_span!("fix_file", file, diagnostics = diagnostics.len()).entered();
    let mut outcome = FileOutcome {
        file: file.to_string(),
        report: ModuleFixReport::default(),
        written: false,
    };

    let path = Path::new(file);
    if !path.is_file() {
        warn!("file not found, skipping");
        return Ok(outcome);
    }
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            warn!(%err, "read failed");
            outcome
                .report
                .manual_review
                .push(whole_file_item(file, format!("cannot read: {err}"), SkipReason::Unreadable));
            return Ok(outcome);
        }
    };

    let mut module = match parse_module(file, &source) {
        Ok(module) => module,
        Err(err) => {
            debug!(%err, "parse failed");
            outcome
                .report
                .manual_review
                .push(whole_file_item(file, format!("cannot parse: {err}"), SkipReason::ParseFailed));
            return Ok(outcome);
        }
    };

    outcome.report = fix_module(&mut module, diagnostics, fixers, options.fix);
    if outcome.report.modified && !options.dry_run {
        let printed = print_module(&module.arena, module.root);
        match write_atomic(path, &printed) {
            Ok(()) => outcome.written = true,
            Err(err) => {
                warn!("write failed: {err:#}");
                outcome.report.modified = false;
                outcome.report.counters = FixCounters::default();
                outcome
                    .report
                    .manual_review
                    .push(whole_file_item(file, format!("cannot write: {err:#}"), SkipReason::WriteFailed));
            }
        }
    }
    debug!(
        modified = outcome.report.modified,
        written = outcome.written,
        manual_review = outcome.report.manual_review.len(),
        "file done"
    );
    Ok(outcome)
}

/// Run the fixer pipeline over every file named by `diagnostics`.
pub fn run_fix_batch(diagnostics: Vec<Diagnostic>, options: BatchOptions) -> Result<FixResult> {
    let start = Instant::now();
    let fixers = FixerSet::default();
    let groups: Vec<(String, Vec<Diagnostic>)> = group_by_file(diagnostics).into_iter().collect();
    info!(files = groups.len(), parallel = options.parallel, "fix batch");

    let outcomes: Vec<Result<FileOutcome>> = if options.parallel {
        groups
            .par_iter()
            .map(|(file, diagnostics)| fix_file(file, diagnostics, &fixers, options))
            .collect()
    } else {
        groups
            .iter()
            .map(|(file, diagnostics)| fix_file(file, diagnostics, &fixers, options))
            .collect()
    };

    let mut result = FixResult::default();
    for outcome in outcomes {
        result.absorb(outcome?);
    }
    result.elapsed = start.elapsed();
    Ok(result)
}

/// Back up the affected files (unless this is a dry run), then fix them.
pub fn fix_with_backup(
    diagnostics: Vec<Diagnostic>,
    backup_root: &Path,
    options: BatchOptions,
) -> Result<FixResult> {
    let backup_dir = if options.dry_run || diagnostics.is_empty() {
        None
    } else {
        let files: Vec<PathBuf> = group_by_file(diagnostics.clone())
            .into_keys()
            .map(PathBuf::from)
            .collect();
        Some(create_backup(backup_root, &files)?.dir)
    };
    let mut result = run_fix_batch(diagnostics, options)?;
    result.backup_dir = backup_dir;
    Ok(result)
}

/// Per-file outcome of whole-file annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationOutcome {
    pub file: PathBuf,
    pub added: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fill missing annotations in each file. A file that cannot be read or
/// parsed reports 0 with the error.
pub fn annotate_files(files: &[PathBuf], strict: bool, dry_run: bool) -> Result<Vec<AnnotationOutcome>> {
    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let _span = info_span!("annotate_file", file = %file.display()).entered();
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(err) => {
                outcomes.push(AnnotationOutcome {
                    file: file.clone(),
                    added: 0,
                    error: Some(err.to_string()),
                });
                continue;
            }
        };
        let mut module = match parse_module(&file.display().to_string(), &source) {
            Ok(module) => module,
            Err(err) => {
                outcomes.push(AnnotationOutcome {
                    file: file.clone(),
                    added: 0,
                    error: Some(err.to_string()),
                });
                continue;
            }
        };

        let mut session = InferenceSession::new(strict);
        let added = infer_and_annotate(&mut module, &mut session);
        if added > 0 {
            tyg_checker::reconcile_imports(&mut module);
            if !dry_run
                && let Err(err) = write_atomic(file, &print_module(&module.arena, module.root))
            {
                outcomes.push(AnnotationOutcome {
                    file: file.clone(),
                    added: 0,
                    error: Some(format!("{err:#}")),
                });
                continue;
            }
        }
        outcomes.push(AnnotationOutcome {
            file: file.clone(),
            added,
            error: None,
        });
    }
    Ok(outcomes)
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
