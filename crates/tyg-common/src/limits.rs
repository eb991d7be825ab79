//! Centralized limits and thresholds.
//!
//! Keeping these in one place makes it easy to audit how far the heuristics
//! are allowed to go before they give up.

use std::time::Duration;

/// How long the external type checker may run before the batch aborts.
pub const TYPE_CHECKER_TIMEOUT: Duration = Duration::from_secs(300);

/// Lines captured on each side of a diagnostic line for `code_context`.
pub const CONTEXT_WINDOW_LINES: usize = 2;

/// Maximum recursion depth of expression inference.
///
/// Name lookups re-enter inference on the assigned value, so a chain of
/// `a = b`, `b = c`, ... is bounded by this depth.
pub const MAX_INFERENCE_DEPTH: u32 = 48;

/// Maximum nesting depth accepted by the parser before it reports an error.
pub const MAX_PARSE_DEPTH: u32 = 64;

/// A file is considered untyped when fewer than this share of its functions
/// carry at least one annotation.
pub const UNTYPED_FILE_RATIO: f64 = 0.5;
