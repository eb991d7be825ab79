//! Type inference and annotation fixers.
//!
//! This crate is organized into several submodules:
//! - `context` - `InferenceSession`, the per-file caches and recursion guards
//! - `state` - `InferenceEngine`, inference over one tree
//! - `expr` - Expression types
//! - `function_types` - Return and parameter types of functions
//! - `variable_types` - Variable and container element types
//! - `annotations` - Conversion between `TypeExpr` and annotation nodes
//! - `guards` - `is None` / `is not None` guard detection
//! - `fixers` - The four fixers and the `Fixer` trait
//! - `imports` - Import reconciliation for the `typing` vocabulary
//! - `annotate` - Whole-file annotation and annotation coverage
//! - `pipeline` - Applying a batch of diagnostics to one tree

pub mod annotate;
pub mod annotations;
pub mod context;
pub mod expr;
pub mod fixers;
pub mod function_types;
pub mod guards;
pub mod imports;
pub mod pipeline;
pub mod state;
pub mod variable_types;

pub use annotate::{annotation_coverage, infer_and_annotate, needs_annotations};
pub use annotations::{node_to_type, type_to_node};
pub use context::InferenceSession;
pub use fixers::{FixKind, FixOutcome, Fixer, FixerSet, SkipReason};
pub use imports::{merge_annotation_imports, prune_unused_imports, reconcile_imports};
pub use pipeline::{FixCounters, FixOptions, ManualReviewItem, ModuleFixReport, fix_module};
pub use state::InferenceEngine;
