//! Line/column source locations.

use serde::Serialize;

/// A position in a source file.
///
/// `line` is 1-based. `column` is 0-based, matching the offsets the parser
/// records on syntax nodes. Type-checker columns are converted with
/// [`Location::from_checker_column`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const NONE: Location = Location { line: 0, column: 0 };

    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Build a location from a 1-based column as printed by the type checker.
    #[must_use]
    pub const fn from_checker_column(line: u32, column: u32) -> Self {
        Self {
            line,
            column: column.saturating_sub(1),
        }
    }

    /// Synthesized nodes carry no location.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.line == 0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column + 1)
    }
}
