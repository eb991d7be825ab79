//! Applying a batch of diagnostics to one tree.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, trace};
use tyg_common::{Diagnostic, DiagnosticCategory};
use tyg_parser::ParsedModule;

use crate::context::InferenceSession;
use crate::fixers::{FixKind, FixOutcome, FixerSet, SkipReason};
use crate::imports::{prune_unused_imports, reconcile_imports};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixOptions {
    /// Decline fixes that would fall back to `Any`.
    pub strict: bool,
    /// Drop unreferenced `typing` imports after fixing.
    pub prune_imports: bool,
}

/// Fix counters; one per fix kind plus import bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FixCounters {
    pub hints_added: usize,
    pub nullable_guards_added: usize,
    pub imports_added: usize,
    pub generics_fixed: usize,
    pub imports_removed: usize,
}

impl FixCounters {
    pub fn record(&mut self, kind: FixKind) {
        match kind {
            FixKind::MissingAnnotation | FixKind::CollectionElements => self.hints_added += 1,
            FixKind::NullableGuard => self.nullable_guards_added += 1,
            FixKind::GenericParameters => self.generics_fixed += 1,
        }
    }

    pub fn merge(&mut self, other: &FixCounters) {
        self.hints_added += other.hints_added;
        self.nullable_guards_added += other.nullable_guards_added;
        self.imports_added += other.imports_added;
        self.generics_fixed += other.generics_fixed;
        self.imports_removed += other.imports_removed;
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.hints_added
            + self.nullable_guards_added
            + self.imports_added
            + self.generics_fixed
            + self.imports_removed
    }
}

/// A diagnostic left for a human.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManualReviewItem {
    pub file: String,
    /// 0 when the whole file is concerned.
    pub line: u32,
    pub category: DiagnosticCategory,
    pub message: String,
    pub reason: SkipReason,
}

impl ManualReviewItem {
    #[must_use]
    pub fn from_diagnostic(diagnostic: &Diagnostic, reason: SkipReason) -> Self {
        Self {
            file: diagnostic.file.clone(),
            line: diagnostic.line,
            category: diagnostic.category,
            message: diagnostic.message.clone(),
            reason,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ModuleFixReport {
    pub counters: FixCounters,
    pub manual_review: Vec<ManualReviewItem>,
    /// Whether the tree was changed and must be written back.
    pub modified: bool,
}

/// Run every diagnostic through its fixer, then reconcile imports.
///
/// Diagnostics are handled in the order given. A second diagnostic for a
/// line that the same kind of fix already handled in this run is dropped.
pub fn fix_module(
    module: &mut ParsedModule,
    diagnostics: &[Diagnostic],
    fixers: &FixerSet,
    options: FixOptions,
) -> ModuleFixReport {
    let mut session = InferenceSession::new(options.strict);
    let mut report = ModuleFixReport::default();
    let mut handled: FxHashSet<(u32, FixKind)> = FxHashSet::default();

    for diagnostic in diagnostics {
        let Some(fixer) = fixers.fixer_for(diagnostic) else {
            trace!(line = diagnostic.line, category = %diagnostic.category, "no fixer");
            report
                .manual_review
                .push(ManualReviewItem::from_diagnostic(diagnostic, SkipReason::NoFixer));
            continue;
        };
        if handled.contains(&(diagnostic.line, fixer.kind())) {
            trace!(line = diagnostic.line, fixer = fixer.name(), "line already fixed");
            continue;
        }

        match fixer.fix(diagnostic, module, &mut session) {
            FixOutcome::Applied => {
                debug!(line = diagnostic.line, fixer = fixer.name(), "applied fix");
                report.counters.record(fixer.kind());
                report.modified = true;
                handled.insert((diagnostic.line, fixer.kind()));
            }
            FixOutcome::Partial(reason) => {
                debug!(line = diagnostic.line, fixer = fixer.name(), %reason, "applied part of fix");
                report.counters.record(fixer.kind());
                report.modified = true;
                handled.insert((diagnostic.line, fixer.kind()));
                report
                    .manual_review
                    .push(ManualReviewItem::from_diagnostic(diagnostic, reason));
            }
            FixOutcome::Skipped(reason) => {
                debug!(line = diagnostic.line, fixer = fixer.name(), %reason, "fix skipped");
                report
                    .manual_review
                    .push(ManualReviewItem::from_diagnostic(diagnostic, reason));
            }
        }
    }

    if report.modified {
        report.counters.imports_added = reconcile_imports(module);
    }
    if options.prune_imports {
        report.counters.imports_removed = prune_unused_imports(module);
        report.modified |= report.counters.imports_removed > 0;
    }
    report
}

#[cfg(test)]
#[path = "../tests/pipeline_tests.rs"]
mod pipeline_tests;
