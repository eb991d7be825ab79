//! Parsing of raw type-checker output lines.
//!
//! The accepted grammar is
//!
//! ```text
//! <path>:<line>:<col>: <severity>: <message>( [<code>])?
//! ```
//!
//! Lines that do not match are dropped without error. Context extraction
//! reads the referenced source file once per parser and never fails: an
//! unreadable file just leaves the source-derived context fields empty.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::{Diagnostic, DiagnosticCategory, DiagnosticContext, Severity, categorize};
use crate::limits::CONTEXT_WINDOW_LINES;

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<file>.+?):(?P<line>\d+):(?P<col>\d+): (?P<severity>\w+): (?P<message>.+?)(?:\s+\[(?P<code>[\w-]+)\])?$",
    )
    .expect("diagnostic line pattern is valid")
});
static QUOTED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"](\w+)['"]"#).expect("quoted name pattern is valid"));
static CURRENT_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"has type ["'](.+?)["']"#).expect("current type pattern is valid"));
static EXPECTED_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"expected ["'](.+?)["']"#).expect("expected type pattern is valid"));
static MISSING_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"has no attribute ["'](\w+)["']"#).expect("attribute pattern is valid")
});

/// Turns raw type-checker output into [`Diagnostic`] records.
///
/// The parser caches the lines of every source file it has read, so a batch
/// of diagnostics against the same file reads it once.
#[derive(Default)]
pub struct DiagnosticParser {
    sources: FxHashMap<String, Option<Vec<String>>>,
}

impl DiagnosticParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every line, keeping only the ones that match the grammar.
    pub fn parse_lines<I, S>(&mut self, lines: I) -> Vec<Diagnostic>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        let mut dropped = 0usize;
        for line in lines {
            match self.parse_line(line.as_ref()) {
                Some(diagnostic) => parsed.push(diagnostic),
                None => dropped += 1,
            }
        }
        debug!(parsed = parsed.len(), dropped, "parsed type checker output");
        parsed
    }

    /// Parse a single line. Returns `None` when the line is not a diagnostic.
    pub fn parse_line(&mut self, line: &str) -> Option<Diagnostic> {
        let captures = LINE_PATTERN.captures(line.trim_end())?;
        let file = captures.name("file")?.as_str().to_string();
        let line_number: u32 = captures.name("line")?.as_str().parse().ok()?;
        let column: u32 = captures.name("col")?.as_str().parse().ok()?;
        let severity = Severity::parse(captures.name("severity")?.as_str());
        let message = captures.name("message")?.as_str().to_string();
        let code = captures.name("code").map(|m| m.as_str().to_string());

        let category = categorize(&message);
        let context = self.extract_context(&file, line_number, &message);
        trace!(%file, line = line_number, %category, "diagnostic");

        Some(Diagnostic {
            file,
            line: line_number,
            column,
            severity,
            message,
            code,
            category,
            context,
        })
    }

    fn extract_context(&mut self, file: &str, line: u32, message: &str) -> DiagnosticContext {
        let mut context = DiagnosticContext {
            name: capture_first(&QUOTED_NAME, message),
            current_type: capture_first(&CURRENT_TYPE, message),
            expected_type: capture_first(&EXPECTED_TYPE, message),
            attribute: capture_first(&MISSING_ATTRIBUTE, message),
            ..DiagnosticContext::default()
        };

        let Some(lines) = self.source_lines(file) else {
            return context;
        };
        let Some(index) = (line as usize).checked_sub(1) else {
            return context;
        };
        if index >= lines.len() {
            return context;
        }

        context.code_line = Some(lines[index].trim_end().to_string());
        let start = index.saturating_sub(CONTEXT_WINDOW_LINES);
        let end = (index + CONTEXT_WINDOW_LINES + 1).min(lines.len());
        let mut window = String::new();
        for text in &lines[start..end] {
            window.push_str(text);
            window.push('\n');
        }
        context.code_context = Some(window);
        context
    }

    fn source_lines(&mut self, file: &str) -> Option<&Vec<String>> {
        self.sources
            .entry(file.to_string())
            .or_insert_with(|| {
                std::fs::read_to_string(Path::new(file))
                    .ok()
                    .map(|text| text.lines().map(str::to_string).collect())
            })
            .as_ref()
    }
}

fn capture_first(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Group diagnostics by file, preserving the order files first appear in.
#[must_use]
pub fn group_by_file(diagnostics: Vec<Diagnostic>) -> IndexMap<String, Vec<Diagnostic>> {
    let mut grouped: IndexMap<String, Vec<Diagnostic>> = IndexMap::new();
    for diagnostic in diagnostics {
        grouped
            .entry(diagnostic.file.clone())
            .or_default()
            .push(diagnostic);
    }
    grouped
}

/// Group diagnostics by category, preserving first-seen order.
#[must_use]
pub fn group_by_category(
    diagnostics: &[Diagnostic],
) -> IndexMap<DiagnosticCategory, Vec<&Diagnostic>> {
    let mut grouped: IndexMap<DiagnosticCategory, Vec<&Diagnostic>> = IndexMap::new();
    for diagnostic in diagnostics {
        grouped.entry(diagnostic.category).or_default().push(diagnostic);
    }
    grouped
}

/// Keep only diagnostics whose category has an automatic fixer.
#[must_use]
pub fn filter_fixable(diagnostics: &[Diagnostic]) -> Vec<&Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.category.is_fixable())
        .collect()
}

/// Format a diagnostic for display.
///
/// ```text
/// app.py:10:5
///   error: Missing return type annotation [return]
///   > def greet(name):
/// ```
#[must_use]
pub fn format_diagnostic(diagnostic: &Diagnostic, show_context: bool) -> String {
    let mut out = format!(
        "{}:{}:{}\n  {}: {} [{}]",
        diagnostic.file,
        diagnostic.line,
        diagnostic.column,
        diagnostic.severity.as_str(),
        diagnostic.message,
        diagnostic.code_or_default()
    );
    if show_context && let Some(code_line) = &diagnostic.context.code_line {
        out.push_str("\n  > ");
        out.push_str(code_line);
    }
    out
}
