use tracing::debug;
use tyg_common::{Diagnostic, DiagnosticCategory};
use tyg_parser::{NodeData, ParsedModule};

use super::{FixKind, FixOutcome, Fixer, SkipReason, assignment_at_line, promote_assignment};
use crate::context::InferenceSession;
use crate::state::InferenceEngine;
use crate::variable_types::{assignment_target_name, collection_kind};

/// Annotates a container assignment with its element type, e.g.
/// `items = []` followed by `items.append(User())` becomes
/// `items: List[User] = []`.
pub struct CollectionElementFixer;

impl Fixer for CollectionElementFixer {
    fn name(&self) -> &'static str {
        "collection-elements"
    }

    fn kind(&self) -> FixKind {
        FixKind::CollectionElements
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.category == DiagnosticCategory::CollectionType
    }

    fn fix(
        &self,
        diagnostic: &Diagnostic,
        module: &mut ParsedModule,
        session: &mut InferenceSession,
    ) -> FixOutcome {
        let arena = &module.arena;
        let assignment = assignment_at_line(
            arena,
            module.root,
            diagnostic.line,
            diagnostic.context.name.as_deref(),
        );
        let value = match arena.data(assignment) {
            Some(NodeData::Assign { value, .. }) => *value,
            Some(NodeData::AnnAssign { .. }) => return FixOutcome::Skipped(SkipReason::AlreadyAnnotated),
            _ => return FixOutcome::Skipped(SkipReason::NoTarget),
        };
        let (Some(name), Some(_)) = (
            assignment_target_name(arena, assignment),
            collection_kind(arena, value),
        ) else {
            return FixOutcome::Skipped(SkipReason::NoTarget);
        };

        let mut engine = InferenceEngine::new(arena, module.root, session);
        let Some(ty) = engine.infer_collection_type(assignment, name) else {
            return FixOutcome::Skipped(SkipReason::Declined);
        };
        debug!(line = diagnostic.line, name, %ty, "annotating collection");
        FixOutcome::from_edit(promote_assignment(&mut module.arena, assignment, &ty))
    }
}
