//! Variable and container element types.

use tracing::trace;
use tyg_parser::syntax::node_utils::{called_name, method_call, positional_args};
use tyg_parser::{NodeArena, NodeData, NodeIndex};
use tyg_solver::{TypeExpr, unify};

use crate::expr::element_of;
use crate::state::InferenceEngine;

/// Container built by an initializer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    Dict,
}

impl CollectionKind {
    fn with_element(self, element: TypeExpr) -> TypeExpr {
        match self {
            Self::List => TypeExpr::list(element),
            Self::Set => TypeExpr::set(element),
            Self::Dict => TypeExpr::dict(TypeExpr::any(), element),
        }
    }
}

/// Kind of container `value` builds: a display, a comprehension or a call
/// of `list`/`set`/`dict`.
#[must_use]
pub fn collection_kind(arena: &NodeArena, value: NodeIndex) -> Option<CollectionKind> {
    match arena.data(value)? {
        NodeData::List { .. } | NodeData::ListComp { .. } => Some(CollectionKind::List),
        NodeData::Set { .. } | NodeData::SetComp { .. } => Some(CollectionKind::Set),
        NodeData::Dict { .. } | NodeData::DictComp { .. } => Some(CollectionKind::Dict),
        NodeData::Call { .. } => match called_name(arena, value)? {
            "list" => Some(CollectionKind::List),
            "set" => Some(CollectionKind::Set),
            "dict" => Some(CollectionKind::Dict),
            _ => None,
        },
        _ => None,
    }
}

/// Name bound by a single-target assignment (`x = ...` or `x: T = ...`).
#[must_use]
pub fn assignment_target_name(arena: &NodeArena, statement: NodeIndex) -> Option<&str> {
    match arena.data(statement)? {
        NodeData::Assign { targets, .. } if targets.len() == 1 => arena.name_id(targets.first()?),
        NodeData::AnnAssign { target, .. } => arena.name_id(*target),
        _ => None,
    }
}

impl InferenceEngine<'_> {
    /// Type of the variable `name` bound by `assignment`.
    ///
    /// The right-hand side decides when it resolves without `Any`;
    /// otherwise every assignment to `name` in the tree is unified.
    pub fn infer_variable_type(&mut self, name: &str, assignment: NodeIndex) -> Option<TypeExpr> {
        let arena = self.arena;
        let mut fallback = None;
        if let Some(NodeData::Assign { value, .. }) = arena.data(assignment) {
            match self.expression_type(*value) {
                Some(ty) if !ty.contains_any() => return Some(ty),
                other => fallback = other,
            }
        }

        let mut assigned = Vec::new();
        for index in arena.walk(self.root) {
            let Some(NodeData::Assign { targets, value }) = arena.data(index) else {
                continue;
            };
            if targets.iter().any(|target| arena.is_name(*target, name))
                && let Some(ty) = self.expression_type(*value)
            {
                assigned.push(ty);
            }
        }
        if assigned.iter().any(|ty| !ty.contains_any()) {
            assigned.retain(|ty| !ty.contains_any());
        }
        trace!(name, assignments = assigned.len(), "unifying assignments");
        let unified = (!assigned.is_empty()).then(|| unify(assigned));
        self.settle(unified.filter(|ty| !ty.is_any()).or(fallback))
    }

    /// Container type of the collection bound to `name` by `assignment`.
    ///
    /// Elements of the initializer decide first; an empty or unresolved
    /// initializer falls back to the values later added through
    /// `append`/`add`/`insert`/`extend` (or item assignment for dicts).
    /// Returns `None` when the initializer is not a container.
    pub fn infer_collection_type(&mut self, assignment: NodeIndex, name: &str) -> Option<TypeExpr> {
        let arena = self.arena;
        let value = match arena.data(assignment)? {
            NodeData::Assign { value, .. } | NodeData::AnnAssign { value, .. } => *value,
            _ => return None,
        };
        let kind = collection_kind(arena, value)?;

        if let Some(literal) = self.literal_collection_type(value)
            && !literal.contains_any()
        {
            return Some(literal);
        }

        let scope = arena.enclosing_scope(assignment);
        let from_usage = match kind {
            CollectionKind::Dict => self.dict_usage_type(scope, name),
            CollectionKind::List | CollectionKind::Set => {
                let added = self.added_element_types(scope, name);
                (!added.is_empty()).then(|| kind.with_element(unify(added)))
            }
        };
        trace!(name, ?kind, usage = ?from_usage.as_ref().map(ToString::to_string), "collection usage");

        let collection = from_usage.unwrap_or_else(|| kind.with_element(TypeExpr::any()));
        self.settle(Some(collection))
    }

    fn literal_collection_type(&mut self, value: NodeIndex) -> Option<TypeExpr> {
        let arena = self.arena;
        match arena.data(value)? {
            NodeData::List { elts } | NodeData::Set { elts } if !elts.is_empty() => {
                self.expression_type(value)
            }
            NodeData::Dict { keys, .. } if !keys.is_empty() => self.expression_type(value),
            NodeData::ListComp { .. } | NodeData::SetComp { .. } | NodeData::DictComp { .. } => {
                self.expression_type(value)
            }
            _ => None,
        }
    }

    /// Types of values added to the list or set `name` within `scope`.
    fn added_element_types(&mut self, scope: NodeIndex, name: &str) -> Vec<TypeExpr> {
        let arena = self.arena;
        let mut added = Vec::new();
        for index in arena.walk_scope(scope) {
            let Some((receiver, method)) = method_call(arena, index) else {
                continue;
            };
            if !arena.is_name(receiver, name) {
                continue;
            }
            let args = positional_args(arena, index);
            let element = match (method, args.as_slice()) {
                ("append" | "add", [element]) | ("insert", [_, element]) => self.expression_type(*element),
                ("extend" | "update", [iterable]) => self
                    .expression_type(*iterable)
                    .as_ref()
                    .and_then(element_of),
                _ => continue,
            };
            if let Some(element) = element {
                added.push(element);
            }
        }
        added
    }

    /// `Dict[K, V]` from `name[key] = value` assignments within `scope`.
    fn dict_usage_type(&mut self, scope: NodeIndex, name: &str) -> Option<TypeExpr> {
        let arena = self.arena;
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for index in arena.walk_scope(scope) {
            let Some(NodeData::Assign { targets, value }) = arena.data(index) else {
                continue;
            };
            for target in targets {
                let Some(NodeData::Subscript { value: receiver, slice }) = arena.data(*target) else {
                    continue;
                };
                if !arena.is_name(*receiver, name) {
                    continue;
                }
                if let Some(key) = self.expression_type(*slice) {
                    keys.push(key);
                }
                if let Some(value) = self.expression_type(*value) {
                    values.push(value);
                }
            }
        }
        if keys.is_empty() && values.is_empty() {
            return None;
        }
        Some(TypeExpr::dict(unify(keys), unify(values)))
    }
}

#[cfg(test)]
#[path = "../tests/variable_types_tests.rs"]
mod variable_types_tests;
