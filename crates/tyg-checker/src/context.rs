//! Inference session.
//!
//! One session lives for the processing of one file. It owns the variable
//! type cache and the recursion guards; nothing is shared between files.

use rustc_hash::{FxHashMap, FxHashSet};
use tyg_parser::NodeIndex;
use tyg_solver::TypeExpr;

/// A name looked up from a given scope.
pub(crate) type VariableKey = (NodeIndex, String);

#[derive(Debug, Default)]
pub struct InferenceSession {
    strict: bool,
    /// Resolved variable types; `None` records a lookup that failed.
    pub(crate) variable_types: FxHashMap<VariableKey, Option<TypeExpr>>,
    /// Lookups currently on the stack, to cut `x = x + 1` style cycles.
    pub(crate) variables_in_progress: FxHashSet<VariableKey>,
    pub(crate) depth: u32,
    pub(crate) declined: u32,
}

impl InferenceSession {
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    /// In strict mode every fallback to `Any` declines the fix instead.
    #[must_use]
    pub const fn strict(&self) -> bool {
        self.strict
    }

    /// Number of inferences declined so far.
    #[must_use]
    pub const fn declined(&self) -> u32 {
        self.declined
    }

    #[must_use]
    pub fn cached_variables(&self) -> usize {
        self.variable_types.len()
    }

    /// Drop cached variable types, e.g. after the tree was re-parsed.
    pub fn clear(&mut self) {
        self.variable_types.clear();
        self.variables_in_progress.clear();
        self.depth = 0;
    }
}
