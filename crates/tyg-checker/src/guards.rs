//! `None` guard detection
//!
//! AST-level utilities for deciding whether an attribute access is already
//! protected by an `is None` / `is not None` check on its receiver.

use tyg_parser::syntax::node_utils::is_none_literal;
use tyg_parser::{BoolOp, CmpOp, NodeArena, NodeData, NodeIndex, UnaryOp};

/// Checks if `test` compares `name` against `None` with `is` or `is not`,
/// possibly inside `and`/`or`/`not`.
pub fn is_none_check(arena: &NodeArena, test: NodeIndex, name: &str) -> bool {
    let Some(data) = arena.data(test) else {
        return false;
    };

    match data {
        NodeData::Compare {
            left,
            ops,
            comparators,
        } => {
            let [op] = ops.as_slice() else {
                return false;
            };
            if !matches!(op, CmpOp::Is | CmpOp::IsNot) {
                return false;
            }
            let Some(right) = comparators.first() else {
                return false;
            };
            (arena.is_name(*left, name) && is_none_literal(arena, right))
                || (is_none_literal(arena, *left) && arena.is_name(right, name))
        }
        NodeData::BoolOp { values, .. } => values.iter().any(|value| is_none_check(arena, *value, name)),
        NodeData::UnaryOp {
            op: UnaryOp::Not,
            operand,
        } => is_none_check(arena, *operand, name),
        _ => false,
    }
}

/// Checks if `access` sits under a `None` check on `name` within its scope.
///
/// Conditional statements and expressions count wherever the access sits in
/// them; an `and` chain counts only for operands after the check.
pub fn is_guarded(arena: &NodeArena, access: NodeIndex, name: &str) -> bool {
    for ancestor in arena.ancestors(access) {
        let Some(data) = arena.data(ancestor) else {
            return false;
        };
        if data.is_scope() {
            return false;
        }
        let guarded = match data {
            NodeData::If { test, .. } | NodeData::While { test, .. } | NodeData::IfExp { test, .. } => {
                *test != access && is_none_check(arena, *test, name)
            }
            NodeData::BoolOp {
                op: BoolOp::And,
                values,
            } => values
                .iter()
                .take_while(|value| !arena.is_within(access, **value))
                .any(|value| is_none_check(arena, *value, name)),
            _ => false,
        };
        if guarded {
            return true;
        }
    }
    false
}

#[cfg(test)]
#[path = "../tests/guards_tests.rs"]
mod guards_tests;
