//! Type-checker diagnostic records.
//!
//! A [`Diagnostic`] is one line of type-checker output turned into a
//! structured record. Records are created by [`DiagnosticParser`] and never
//! mutated afterwards; every later stage only reads them.

use serde::Serialize;

use crate::position::Location;

mod report_parser;
pub use report_parser::{
    DiagnosticParser, filter_fixable, format_diagnostic, group_by_category, group_by_file,
};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Severity as printed by the type checker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
    /// Any other severity word; kept verbatim.
    Other(String),
}

impl Severity {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text {
            "error" => Self::Error,
            "warning" => Self::Warning,
            "note" => Self::Note,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Other(text) => text,
        }
    }
}

/// Coarse classification of a diagnostic; decides which fixer may handle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    MissingTypeHint,
    OptionalNone,
    CollectionType,
    GenericType,
    TypeMismatch,
    ReturnTypeMismatch,
    AnyType,
    Unknown,
}

impl DiagnosticCategory {
    pub const ALL: [DiagnosticCategory; 8] = [
        Self::MissingTypeHint,
        Self::OptionalNone,
        Self::CollectionType,
        Self::GenericType,
        Self::TypeMismatch,
        Self::ReturnTypeMismatch,
        Self::AnyType,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingTypeHint => "missing_type_hint",
            Self::OptionalNone => "optional_none",
            Self::CollectionType => "collection_type",
            Self::GenericType => "generic_type",
            Self::TypeMismatch => "type_mismatch",
            Self::ReturnTypeMismatch => "return_type_mismatch",
            Self::AnyType => "any_type",
            Self::Unknown => "unknown",
        }
    }

    /// Categories that have an automatic fixer.
    #[must_use]
    pub const fn is_fixable(self) -> bool {
        matches!(
            self,
            Self::MissingTypeHint | Self::OptionalNone | Self::CollectionType | Self::GenericType
        )
    }
}

impl std::fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered phrase table used for categorization.
///
/// Each entry is a list of fragments that must all occur, in order, in the
/// lower-cased message. The table is scanned top to bottom and the first
/// matching entry wins, so the order of entries is part of the behavior.
const CATEGORY_PATTERNS: &[(&[&str], DiagnosticCategory)] = &[
    (&["missing return type"], DiagnosticCategory::MissingTypeHint),
    (&["is missing a return type annotation"], DiagnosticCategory::MissingTypeHint),
    (&["missing type annotation"], DiagnosticCategory::MissingTypeHint),
    (&["is missing a type annotation"], DiagnosticCategory::MissingTypeHint),
    (&["need type annotation"], DiagnosticCategory::MissingTypeHint),
    (&["item \"none\" of \""], DiagnosticCategory::OptionalNone),
    (&["optional["], DiagnosticCategory::OptionalNone),
    (&["missing type parameters for generic type"], DiagnosticCategory::GenericType),
    (&["argument ", " has incompatible type"], DiagnosticCategory::TypeMismatch),
    (&["incompatible return value type"], DiagnosticCategory::ReturnTypeMismatch),
    (&["has type \"any\""], DiagnosticCategory::AnyType),
    (&["returning any from function"], DiagnosticCategory::AnyType),
    (&["need type parameter"], DiagnosticCategory::GenericType),
    (&["list["], DiagnosticCategory::CollectionType),
    (&["dict["], DiagnosticCategory::CollectionType),
    (&["set["], DiagnosticCategory::CollectionType),
];

/// Classify a diagnostic message. Never fails: unmatched text is `Unknown`.
#[must_use]
pub fn categorize(message: &str) -> DiagnosticCategory {
    let lowered = message.to_lowercase();
    CATEGORY_PATTERNS
        .iter()
        .find(|(fragments, _)| fragments_match_in_order(&lowered, fragments))
        .map_or(DiagnosticCategory::Unknown, |(_, category)| *category)
}

fn fragments_match_in_order(haystack: &str, fragments: &[&str]) -> bool {
    let mut rest = haystack;
    for fragment in fragments {
        match rest.find(fragment) {
            Some(at) => rest = &rest[at + fragment.len()..],
            None => return false,
        }
    }
    true
}

/// Best-effort context extracted from the message and the source file.
///
/// Every field is optional; an empty context is normal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticContext {
    /// First quoted identifier in the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Text of `has type "X"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_type: Option<String>,
    /// Text of `expected "X"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<String>,
    /// Text of `has no attribute "X"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// The exact source line, trailing whitespace removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_line: Option<String>,
    /// The source line with up to two lines on either side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_context: Option<String>,
}

impl DiagnosticContext {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.current_type.is_none()
            && self.expected_type.is_none()
            && self.attribute.is_none()
            && self.code_line.is_none()
            && self.code_context.is_none()
    }
}

/// One structured type-checker diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    /// Column exactly as printed by the type checker (1-based).
    pub column: u32,
    pub severity: Severity,
    pub message: String,
    /// Error code from the trailing `[code]`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub category: DiagnosticCategory,
    #[serde(skip_serializing_if = "DiagnosticContext::is_empty")]
    pub context: DiagnosticContext,
}

impl Diagnostic {
    /// Build a diagnostic without touching the filesystem.
    ///
    /// The category is derived from the message; the context is left empty.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            file: file.into(),
            line,
            column,
            severity: Severity::Error,
            category: categorize(&message),
            message,
            code: None,
            context: DiagnosticContext::default(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.context.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.context.attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        Location::from_checker_column(self.line, self.column)
    }

    /// The code as displayed; diagnostics without one show `no-code`.
    #[must_use]
    pub fn code_or_default(&self) -> &str {
        self.code.as_deref().unwrap_or("no-code")
    }
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
