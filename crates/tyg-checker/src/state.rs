//! Inference engine over one tree.

use tracing::trace;
use tyg_parser::{NodeArena, NodeIndex};
use tyg_solver::TypeExpr;

use crate::context::InferenceSession;

/// Read-only view of a tree plus the session that caches what was learned
/// about it.
///
/// Engines are cheap; fixers build one, infer, drop it and only then mutate
/// the tree.
pub struct InferenceEngine<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) root: NodeIndex,
    pub(crate) session: &'a mut InferenceSession,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(arena: &'a NodeArena, root: NodeIndex, session: &'a mut InferenceSession) -> Self {
        Self {
            arena,
            root,
            session,
        }
    }

    #[must_use]
    pub const fn strict(&self) -> bool {
        self.session.strict()
    }

    /// Apply the session default to an inference result.
    ///
    /// Unresolved results become `Any`, or are declined in strict mode.
    /// Strict mode also declines results that carry `Any` anywhere.
    pub(crate) fn settle(&mut self, inferred: Option<TypeExpr>) -> Option<TypeExpr> {
        let strict = self.session.strict();
        match inferred {
            Some(ty) if !(strict && ty.contains_any()) => Some(ty),
            Some(ty) => {
                trace!(%ty, "declined Any-bearing type");
                self.session.declined += 1;
                None
            }
            None if strict => {
                trace!("declined unresolved type");
                self.session.declined += 1;
                None
            }
            None => Some(TypeExpr::any()),
        }
    }
}
