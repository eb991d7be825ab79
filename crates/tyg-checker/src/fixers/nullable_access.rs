use tracing::debug;
use tyg_common::{Diagnostic, DiagnosticCategory};
use tyg_parser::{CmpOp, NodeArena, NodeData, NodeIndex, ParsedModule};

use super::{FixKind, FixOutcome, Fixer, SkipReason};
use crate::context::InferenceSession;
use crate::guards::is_guarded;

/// Wraps an access on a possibly-`None` name in a conditional expression:
/// `user.email` becomes `user.email if user is not None else None`.
pub struct NullableAccessFixer;

impl Fixer for NullableAccessFixer {
    fn name(&self) -> &'static str {
        "nullable-access"
    }

    fn kind(&self) -> FixKind {
        FixKind::NullableGuard
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.category == DiagnosticCategory::OptionalNone
    }

    fn fix(
        &self,
        diagnostic: &Diagnostic,
        module: &mut ParsedModule,
        _session: &mut InferenceSession,
    ) -> FixOutcome {
        let arena = &module.arena;
        let Some(access) = nullable_access_at_line(
            arena,
            module.root,
            diagnostic.line,
            diagnostic.context.attribute.as_deref(),
        ) else {
            return FixOutcome::Skipped(SkipReason::NoTarget);
        };
        if is_guarded(arena, access.node, &access.receiver) {
            debug!(line = diagnostic.line, receiver = access.receiver.as_str(), "access already guarded");
            return FixOutcome::Skipped(SkipReason::AlreadyGuarded);
        }

        let arena = &mut module.arena;
        let receiver = arena.add_name(access.receiver.as_str());
        let none = arena.add_none();
        let test = arena.add_compare(receiver, CmpOp::IsNot, none);
        let orelse = arena.add_none();
        let guard = arena.add_if_exp(test, access.node, orelse);
        debug!(line = diagnostic.line, receiver = access.receiver.as_str(), "guarding access");
        FixOutcome::from_edit(arena.replace(access.node, guard))
    }
}

struct NullableAccess {
    /// The attribute, or the call when the attribute is called.
    node: NodeIndex,
    receiver: String,
}

/// Attribute accesses on a bare name at `line`, source order; the one
/// naming `attribute` wins when given.
fn nullable_access_at_line(
    arena: &NodeArena,
    root: NodeIndex,
    line: u32,
    attribute: Option<&str>,
) -> Option<NullableAccess> {
    let candidates: Vec<(NodeIndex, &str, &str)> = arena
        .nodes_at_line(root, line)
        .into_iter()
        .filter_map(|index| {
            let NodeData::Attribute { value, attr } = arena.data(index)? else {
                return None;
            };
            let receiver = arena.name_id(*value)?;
            if matches!(receiver, "self" | "cls") || is_store_target(arena, index) {
                return None;
            }
            Some((index, receiver, attr.as_str()))
        })
        .collect();

    let (attribute_node, receiver, _) = attribute
        .and_then(|wanted| candidates.iter().find(|(_, _, attr)| *attr == wanted))
        .or_else(|| candidates.first())
        .copied()?;

    let parent = arena.parent(attribute_node);
    let node = match arena.data(parent) {
        Some(NodeData::Call { func, .. }) if *func == attribute_node => parent,
        _ => attribute_node,
    };
    Some(NullableAccess {
        node,
        receiver: receiver.to_string(),
    })
}

/// Whether `index` is written to rather than read.
fn is_store_target(arena: &NodeArena, index: NodeIndex) -> bool {
    match arena.data(arena.parent(index)) {
        Some(NodeData::Assign { targets, .. } | NodeData::Delete { targets }) => {
            targets.position_of(index).is_some()
        }
        Some(
            NodeData::AugAssign { target, .. }
            | NodeData::AnnAssign { target, .. }
            | NodeData::For { target, .. }
            | NodeData::WithItem { target, .. }
            | NodeData::Comprehension { target, .. },
        ) => *target == index,
        _ => false,
    }
}
