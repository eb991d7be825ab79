use tracing::debug;
use tyg_common::{Diagnostic, DiagnosticCategory};
use tyg_parser::syntax::node_utils::function_at_line;
use tyg_parser::{NodeData, NodeIndex, ParsedModule};
use tyg_solver::TypeExpr;

use super::{FixKind, FixOutcome, Fixer, SkipReason, assignment_at_line, promote_assignment};
use crate::annotations::type_to_node;
use crate::context::InferenceSession;
use crate::function_types::annotatable_parameters;
use crate::state::InferenceEngine;
use crate::variable_types::assignment_target_name;

/// Fills missing function annotations, or promotes a plain assignment to
/// an annotated one.
pub struct MissingAnnotationFixer;

impl Fixer for MissingAnnotationFixer {
    fn name(&self) -> &'static str {
        "missing-annotation"
    }

    fn kind(&self) -> FixKind {
        FixKind::MissingAnnotation
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.category == DiagnosticCategory::MissingTypeHint
    }

    fn fix(
        &self,
        diagnostic: &Diagnostic,
        module: &mut ParsedModule,
        session: &mut InferenceSession,
    ) -> FixOutcome {
        let function = function_at_line(&module.arena, module.root, diagnostic.line);
        if function.is_some() {
            let filled = annotate_function(module, function, session);
            return if filled.added > 0 && filled.declined > 0 {
                FixOutcome::Partial(SkipReason::Declined)
            } else if filled.added > 0 {
                FixOutcome::Applied
            } else if filled.declined > 0 {
                FixOutcome::Skipped(SkipReason::Declined)
            } else {
                FixOutcome::Skipped(SkipReason::AlreadyAnnotated)
            };
        }

        let assignment = assignment_at_line(
            &module.arena,
            module.root,
            diagnostic.line,
            diagnostic.context.name.as_deref(),
        );
        let Some(data) = module.arena.data(assignment) else {
            return FixOutcome::Skipped(SkipReason::NoTarget);
        };
        if matches!(data, NodeData::AnnAssign { .. }) {
            return FixOutcome::Skipped(SkipReason::AlreadyAnnotated);
        }
        let Some(name) = assignment_target_name(&module.arena, assignment) else {
            return FixOutcome::Skipped(SkipReason::NoTarget);
        };

        let mut engine = InferenceEngine::new(&module.arena, module.root, session);
        let inferred = engine
            .infer_collection_type(assignment, name)
            .or_else(|| engine.infer_variable_type(name, assignment));
        let Some(ty) = inferred else {
            return FixOutcome::Skipped(SkipReason::Declined);
        };
        debug!(line = diagnostic.line, %ty, "annotating assignment");
        FixOutcome::from_edit(promote_assignment(&mut module.arena, assignment, &ty))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FilledAnnotations {
    pub(crate) added: usize,
    pub(crate) declined: usize,
}

/// Fill every missing return and parameter annotation of `function`.
pub(crate) fn annotate_function(
    module: &mut ParsedModule,
    function: NodeIndex,
    session: &mut InferenceSession,
) -> FilledAnnotations {
    let mut filled = FilledAnnotations::default();
    let mut planned: Vec<(NodeIndex, TypeExpr)> = Vec::new();
    {
        let arena = &module.arena;
        let Some(NodeData::FunctionDef { returns, .. }) = arena.data(function) else {
            return filled;
        };
        let returns_missing = returns.is_none();
        let parameters = annotatable_parameters(arena, function);
        let mut engine = InferenceEngine::new(arena, module.root, session);

        if returns_missing {
            match engine.infer_return_type(function) {
                Some(ty) => planned.push((function, ty)),
                None => filled.declined += 1,
            }
        }
        for parameter in parameters {
            match engine.infer_parameter_type(function, parameter) {
                Some(ty) => planned.push((parameter, ty)),
                None => filled.declined += 1,
            }
        }
    }

    for (target, ty) in planned {
        let annotation = type_to_node(&mut module.arena, &ty);
        if module.arena.set_annotation(target, annotation) {
            debug!(target = target.0, %ty, "filled annotation");
            filled.added += 1;
        }
    }
    filled
}
