//! Fixers: one per fixable diagnostic category.
//!
//! A fixer locates the node a diagnostic points at, asks the inference
//! engine for a type and rewrites the tree through the arena mutators.
//! Anything it cannot handle is reported back as a [`SkipReason`] and ends
//! up in manual review.

mod collection_elements;
mod generic_params;
mod missing_annotation;
mod nullable_access;

pub use collection_elements::CollectionElementFixer;
pub use generic_params::GenericParameterFixer;
pub use missing_annotation::MissingAnnotationFixer;
pub(crate) use missing_annotation::annotate_function;
pub use nullable_access::NullableAccessFixer;

use serde::Serialize;
use tyg_common::Diagnostic;
use tyg_parser::{NodeArena, NodeData, NodeIndex, ParsedModule};
use tyg_solver::TypeExpr;

use crate::annotations::type_to_node;
use crate::context::InferenceSession;
use crate::variable_types::assignment_target_name;

/// What a fixer changes; selects the counter an applied fix increments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixKind {
    MissingAnnotation,
    NullableGuard,
    GenericParameters,
    CollectionElements,
}

/// Why a diagnostic was left for manual review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The category has no automatic fixer.
    NoFixer,
    /// Nothing the fixer understands sits at the diagnostic's line.
    NoTarget,
    AlreadyAnnotated,
    AlreadyGuarded,
    NothingToParametrize,
    /// Inference fell back to `Any` in strict mode.
    Declined,
    MutationFailed,
    /// The file could not be parsed.
    ParseFailed,
    /// The file could not be read as UTF-8 text.
    Unreadable,
    /// The rewritten file could not be written back.
    WriteFailed,
}

impl SkipReason {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::NoFixer => "no automatic fix for this category",
            Self::NoTarget => "no fixable construct at this line",
            Self::AlreadyAnnotated => "already annotated",
            Self::AlreadyGuarded => "access is already guarded against None",
            Self::NothingToParametrize => "no bare generic annotation to parametrize",
            Self::Declined => "type could not be inferred without Any",
            Self::MutationFailed => "tree edit could not be applied",
            Self::ParseFailed => "file could not be parsed",
            Self::Unreadable => "file could not be read as UTF-8 text",
            Self::WriteFailed => "fixed file could not be written",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixOutcome {
    Applied,
    /// The tree changed, but part of the site still needs a human.
    Partial(SkipReason),
    Skipped(SkipReason),
}

impl FixOutcome {
    #[must_use]
    pub const fn applied(self) -> bool {
        matches!(self, Self::Applied | Self::Partial(_))
    }

    const fn from_edit(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::Skipped(SkipReason::MutationFailed)
        }
    }
}

pub trait Fixer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn kind(&self) -> FixKind;

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool;

    /// Rewrite `module` for `diagnostic`. A skipped fix leaves the tree
    /// untouched.
    fn fix(
        &self,
        diagnostic: &Diagnostic,
        module: &mut ParsedModule,
        session: &mut InferenceSession,
    ) -> FixOutcome;
}

/// The fixers consulted for a batch, in priority order.
pub struct FixerSet {
    fixers: Vec<Box<dyn Fixer>>,
}

impl FixerSet {
    #[must_use]
    pub fn new(fixers: Vec<Box<dyn Fixer>>) -> Self {
        Self { fixers }
    }

    /// First fixer that accepts `diagnostic`.
    #[must_use]
    pub fn fixer_for(&self, diagnostic: &Diagnostic) -> Option<&dyn Fixer> {
        self.fixers
            .iter()
            .find(|fixer| fixer.can_fix(diagnostic))
            .map(|fixer| fixer.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fixers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixers.is_empty()
    }
}

impl Default for FixerSet {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MissingAnnotationFixer),
            Box::new(NullableAccessFixer),
            Box::new(GenericParameterFixer),
            Box::new(CollectionElementFixer),
        ])
    }
}

/// Single-target assignment on `line`, preferring one that binds `name`.
pub(crate) fn assignment_at_line(
    arena: &NodeArena,
    root: NodeIndex,
    line: u32,
    name: Option<&str>,
) -> NodeIndex {
    let candidates: Vec<NodeIndex> = arena
        .nodes_at_line(root, line)
        .into_iter()
        .filter(|index| assignment_target_name(arena, *index).is_some())
        .collect();
    name.and_then(|name| {
        candidates
            .iter()
            .copied()
            .find(|index| assignment_target_name(arena, *index) == Some(name))
    })
    .or_else(|| candidates.first().copied())
    .unwrap_or(NodeIndex::NONE)
}

/// Turn `target = value` into `target: ty = value` in place.
pub(crate) fn promote_assignment(arena: &mut NodeArena, assignment: NodeIndex, ty: &TypeExpr) -> bool {
    let Some(NodeData::Assign { targets, value }) = arena.data(assignment) else {
        return false;
    };
    let (Some(target), 1) = (targets.first(), targets.len()) else {
        return false;
    };
    let value = *value;
    let annotation = type_to_node(arena, ty);
    let promoted = arena.add_ann_assign(target, annotation, value);
    arena.replace(assignment, promoted)
}

#[cfg(test)]
#[path = "../../tests/fixers_tests.rs"]
mod fixers_tests;
