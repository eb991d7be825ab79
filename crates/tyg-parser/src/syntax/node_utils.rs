//! Small structural queries over the arena tree.

use crate::parser::{ConstantValue, NodeArena, NodeData, NodeIndex, NodeList};

/// Whether `index` is the literal `None`.
#[must_use]
pub fn is_none_literal(arena: &NodeArena, index: NodeIndex) -> bool {
    matches!(
        arena.data(index),
        Some(NodeData::Constant {
            value: ConstantValue::None
        })
    )
}

/// Whether a statement is a string-literal expression (a docstring when it
/// is the first statement of a body).
#[must_use]
pub fn is_docstring(arena: &NodeArena, statement: NodeIndex) -> bool {
    let Some(NodeData::ExprStmt { value }) = arena.data(statement) else {
        return false;
    };
    matches!(
        arena.data(*value),
        Some(NodeData::Constant {
            value: ConstantValue::Str(_)
        })
    )
}

#[must_use]
pub fn is_import(arena: &NodeArena, statement: NodeIndex) -> bool {
    matches!(
        arena.data(statement),
        Some(NodeData::Import { .. } | NodeData::ImportFrom { .. })
    )
}

/// Position right after the docstring and the run of imports that follows
/// it at the top of `body`.
#[must_use]
pub fn leading_import_end(arena: &NodeArena, body: &NodeList) -> usize {
    let mut position = 0;
    if body
        .first()
        .is_some_and(|first| is_docstring(arena, first))
    {
        position = 1;
    }
    while body
        .get(position)
        .is_some_and(|statement| is_import(arena, statement))
    {
        position += 1;
    }
    position
}

/// First function definition whose `def` keyword is on `line`.
#[must_use]
pub fn function_at_line(arena: &NodeArena, root: NodeIndex, line: u32) -> NodeIndex {
    arena
        .nodes_at_line(root, line)
        .into_iter()
        .find(|index| matches!(arena.data(*index), Some(NodeData::FunctionDef { .. })))
        .unwrap_or(NodeIndex::NONE)
}

/// Name of the function called by `call` when the callee is a bare name.
#[must_use]
pub fn called_name(arena: &NodeArena, call: NodeIndex) -> Option<&str> {
    match arena.data(call)? {
        NodeData::Call { func, .. } => arena.name_id(*func),
        _ => None,
    }
}

/// `(receiver, method)` of a call of the form `receiver.method(...)`.
#[must_use]
pub fn method_call(arena: &NodeArena, call: NodeIndex) -> Option<(NodeIndex, &str)> {
    let NodeData::Call { func, .. } = arena.data(call)? else {
        return None;
    };
    match arena.data(*func)? {
        NodeData::Attribute { value, attr } => Some((*value, attr.as_str())),
        _ => None,
    }
}

/// Positional arguments of a call (keywords and unpacking excluded).
#[must_use]
pub fn positional_args(arena: &NodeArena, call: NodeIndex) -> Vec<NodeIndex> {
    let Some(NodeData::Call { args, .. }) = arena.data(call) else {
        return Vec::new();
    };
    args.iter()
        .copied()
        .filter(|arg| {
            !matches!(
                arena.data(*arg),
                Some(NodeData::Keyword { .. } | NodeData::Starred { .. })
            )
        })
        .collect()
}

/// Top-level function and class names defined in a module body.
#[must_use]
pub fn module_definitions(arena: &NodeArena, root: NodeIndex) -> Vec<(String, NodeIndex)> {
    let Some(NodeData::Module { body }) = arena.data(root) else {
        return Vec::new();
    };
    body.iter()
        .filter_map(|statement| match arena.data(*statement)? {
            NodeData::FunctionDef { name, .. } | NodeData::ClassDef { name, .. } => {
                Some((name.clone(), *statement))
            }
            _ => None,
        })
        .collect()
}
