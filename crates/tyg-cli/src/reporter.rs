use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tyg_common::diagnostics::format_diagnostic;
use tyg_common::{Diagnostic, DiagnosticCategory};

use crate::driver::{AnnotationOutcome, FixResult};

pub struct Reporter {
    color: bool,
}

/// `(category, count)` pairs, most common first; ties keep category order.
#[must_use]
pub fn category_breakdown(diagnostics: &[Diagnostic]) -> Vec<(DiagnosticCategory, usize)> {
    let mut counts: IndexMap<DiagnosticCategory, usize> = IndexMap::new();
    for diagnostic in diagnostics {
        *counts.entry(diagnostic.category).or_default() += 1;
    }
    let mut rows: Vec<(DiagnosticCategory, usize)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    rows
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn count(&self, value: usize) -> String {
        let text = value.to_string();
        if !self.color {
            return text;
        }
        if value == 0 {
            text.dimmed().to_string()
        } else {
            text.green().bold().to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn render_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&format_diagnostic(diagnostic, true));
            out.push('\n');
        }
        out
    }

    pub fn render_breakdown(&self, diagnostics: &[Diagnostic]) -> String {
        if diagnostics.is_empty() {
            let text = "No type errors found";
            return if self.color {
                format!("{}\n", text.green().bold())
            } else {
                format!("{text}\n")
            };
        }

        let mut out = format!("Found {} type errors\n\n", diagnostics.len());
        out.push_str(&self.heading("Error Breakdown"));
        out.push('\n');
        for (category, count) in category_breakdown(diagnostics) {
            out.push_str(&format!("  {:<22} {:>5}\n", category.as_str(), count));
        }
        out
    }

    pub fn render_fix_result(&self, result: &FixResult, dry_run: bool) -> String {
        let mut out = String::new();
        if dry_run {
            out.push_str(&self.warning("Dry run - no changes were written"));
            out.push('\n');
        }
        out.push_str(&self.heading("Results"));
        out.push('\n');

        let counters = &result.counters;
        let rows = [
            ("Type hints added", counters.hints_added),
            ("Optional issues fixed", counters.nullable_guards_added),
            ("Typing imports added", counters.imports_added),
            ("Generic types fixed", counters.generics_fixed),
        ];
        for (label, value) in rows {
            out.push_str(&format!("  {label:<22} {}\n", self.count(value)));
        }
        if counters.imports_removed > 0 {
            out.push_str(&format!(
                "  {:<22} {}\n",
                "Typing imports removed",
                self.count(counters.imports_removed)
            ));
        }
        out.push_str(&format!(
            "  {:<22} {:.1}s\n",
            "Time",
            result.elapsed.as_secs_f64()
        ));

        if let Some(dir) = &result.backup_dir {
            out.push_str(&format!("\nBackup: {}\n", dir.display()));
        }

        if !result.manual_review.is_empty() {
            out.push('\n');
            out.push_str(&self.warning(&format!(
                "{} issues need manual review",
                result.manual_review.len()
            )));
            out.push('\n');
            for item in &result.manual_review {
                out.push_str(&format!(
                    "  {}:{}  {} ({})\n",
                    item.file, item.line, item.reason, item.message
                ));
            }
        }
        out
    }

    pub fn render_remaining(&self, remaining: usize) -> String {
        if remaining == 0 {
            let text = "Success: no issues found";
            if self.color {
                format!("{}\n", text.green().bold())
            } else {
                format!("{text}\n")
            }
        } else {
            format!("{}\n", self.warning(&format!("{remaining} errors remaining")))
        }
    }

    pub fn render_annotations(&self, outcomes: &[AnnotationOutcome]) -> String {
        let mut out = format!("Found {} files needing annotations\n\n", outcomes.len());
        out.push_str(&self.heading("Annotation Results"));
        out.push('\n');
        for outcome in outcomes {
            out.push_str(&format!(
                "  {}  {}",
                outcome.file.display(),
                self.count(outcome.added)
            ));
            if let Some(error) = &outcome.error {
                out.push_str(&format!("  ({})", self.warning(error)));
            }
            out.push('\n');
        }
        out
    }

    pub fn render_untyped(&self, files: &[(PathBuf, Option<(usize, usize)>)]) -> String {
        let mut out = format!("{} files need annotations\n", files.len());
        for (file, coverage) in files {
            match coverage {
                Some((annotated, total)) => out.push_str(&format!(
                    "  {}  {annotated}/{total} functions annotated\n",
                    file.display()
                )),
                None => out.push_str(&format!("  {}\n", file.display())),
            }
        }
        out
    }
}

/// JSON document for `check`.
pub fn check_json(diagnostics: &[Diagnostic]) -> serde_json::Value {
    let breakdown: serde_json::Map<String, serde_json::Value> = category_breakdown(diagnostics)
        .into_iter()
        .map(|(category, count)| (category.as_str().to_string(), json!(count)))
        .collect();
    json!({
        "total": diagnostics.len(),
        "breakdown": breakdown,
        "diagnostics": diagnostics,
    })
}

/// JSON document for `fix`.
pub fn fix_json(diagnostics: &[Diagnostic], result: &FixResult, dry_run: bool) -> serde_json::Value {
    json!({
        "diagnostics": diagnostics.len(),
        "dryRun": dry_run,
        "result": result,
    })
}

pub fn to_json_string<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod reporter_tests;
