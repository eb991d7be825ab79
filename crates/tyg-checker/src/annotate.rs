//! Whole-file annotation and annotation coverage.

use tracing::info;
use tyg_common::limits::UNTYPED_FILE_RATIO;
use tyg_parser::{NodeArena, NodeData, NodeIndex, ParsedModule};

use crate::context::InferenceSession;
use crate::fixers::annotate_function;

/// Fill every missing return and parameter annotation in the module.
/// Returns the number of annotations added.
pub fn infer_and_annotate(module: &mut ParsedModule, session: &mut InferenceSession) -> usize {
    let functions: Vec<NodeIndex> = module
        .arena
        .walk(module.root)
        .into_iter()
        .filter(|index| matches!(module.arena.data(*index), Some(NodeData::FunctionDef { .. })))
        .collect();

    let mut added = 0;
    for function in functions {
        added += annotate_function(module, function, session).added;
    }
    info!(file = module.file_name.as_str(), added, "annotated module");
    added
}

/// `(annotated, total)` function counts. A function counts as annotated
/// when its return or any parameter carries an annotation.
#[must_use]
pub fn annotation_coverage(arena: &NodeArena, root: NodeIndex) -> (usize, usize) {
    let mut annotated = 0;
    let mut total = 0;
    for index in arena.walk(root) {
        let Some(NodeData::FunctionDef { params, returns, .. }) = arena.data(index) else {
            continue;
        };
        total += 1;
        let has_annotation = returns.is_some()
            || params.iter().any(|param| {
                matches!(arena.data(*param), Some(NodeData::Parameter { annotation, .. }) if annotation.is_some())
            });
        if has_annotation {
            annotated += 1;
        }
    }
    (annotated, total)
}

/// Whether fewer than half of the module's functions carry annotations.
/// Modules without functions never need annotations.
#[must_use]
pub fn needs_annotations(arena: &NodeArena, root: NodeIndex) -> bool {
    let (annotated, total) = annotation_coverage(arena, root);
    total > 0 && (annotated as f64) < (total as f64) * UNTYPED_FILE_RATIO
}

#[cfg(test)]
#[path = "../tests/annotate_tests.rs"]
mod annotate_tests;
