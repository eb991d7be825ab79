//! Conversion between [`TypeExpr`] values and annotation subtrees.

use tyg_parser::{BinaryOp, ConstantValue, NodeArena, NodeData, NodeIndex};
use tyg_solver::{TypeExpr, parse_type};

/// Build the annotation subtree for `ty`. The new nodes are detached until
/// the caller splices the returned root into the tree.
pub fn type_to_node(arena: &mut NodeArena, ty: &TypeExpr) -> NodeIndex {
    match ty {
        TypeExpr::Atomic { name } if name == "None" => arena.add_none(),
        TypeExpr::Atomic { name } if name == "..." => arena.add_constant(ConstantValue::Ellipsis),
        TypeExpr::Atomic { name } => dotted_name_node(arena, name),
        TypeExpr::Generic { name, args } => {
            let value = dotted_name_node(arena, name);
            let slice = arguments_node(arena, args);
            arena.add_subscript(value, slice)
        }
        TypeExpr::Union { members } => {
            let value = arena.add_name("Union");
            let slice = arguments_node(arena, members);
            arena.add_subscript(value, slice)
        }
    }
}

fn arguments_node(arena: &mut NodeArena, args: &[TypeExpr]) -> NodeIndex {
    if let [single] = args {
        return type_to_node(arena, single);
    }
    let elts = args.iter().map(|arg| type_to_node(arena, arg)).collect();
    arena.add_tuple(elts)
}

fn dotted_name_node(arena: &mut NodeArena, name: &str) -> NodeIndex {
    let mut parts = name.split('.');
    let mut node = arena.add_name(parts.next().unwrap_or(name));
    for part in parts {
        node = arena.add_attribute(node, part);
    }
    node
}

/// Read an annotation subtree back into a [`TypeExpr`].
///
/// String annotations (`"User"`) are parsed as annotation text. Returns
/// `None` for shapes that are not annotations, such as calls.
#[must_use]
pub fn node_to_type(arena: &NodeArena, node: NodeIndex) -> Option<TypeExpr> {
    match arena.data(node)? {
        NodeData::Name { id } => Some(TypeExpr::atomic(id.as_str())),
        NodeData::Attribute { .. } => dotted_name(arena, node).map(TypeExpr::atomic),
        NodeData::Constant { value } => match value {
            ConstantValue::None => Some(TypeExpr::none()),
            ConstantValue::Ellipsis => Some(TypeExpr::atomic("...")),
            ConstantValue::Str(raw) => parse_type(unquote(raw)?).ok(),
            _ => None,
        },
        NodeData::Subscript { value, slice } => {
            let name = dotted_name(arena, *value)?;
            let args = match arena.data(*slice)? {
                NodeData::Tuple { elts } => elts
                    .iter()
                    .map(|elt| node_to_type(arena, *elt))
                    .collect::<Option<Vec<_>>>()?,
                _ => vec![node_to_type(arena, *slice)?],
            };
            if name.rsplit('.').next() == Some("Union") {
                Some(TypeExpr::union_of(args))
            } else {
                Some(TypeExpr::generic(name, args))
            }
        }
        NodeData::BinOp {
            left,
            op: BinaryOp::BitOr,
            right,
        } => Some(TypeExpr::union_of([
            node_to_type(arena, *left)?,
            node_to_type(arena, *right)?,
        ])),
        _ => None,
    }
}

/// `a.b.c` for a chain of attributes over a name.
#[must_use]
pub fn dotted_name(arena: &NodeArena, node: NodeIndex) -> Option<String> {
    match arena.data(node)? {
        NodeData::Name { id } => Some(id.clone()),
        NodeData::Attribute { value, attr } => {
            let mut name = dotted_name(arena, *value)?;
            name.push('.');
            name.push_str(attr);
            Some(name)
        }
        _ => None,
    }
}

/// Body of a plain string literal; prefixed literals are not annotations.
fn unquote(raw: &str) -> Option<&str> {
    let quote = raw.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let triple: String = std::iter::repeat_n(quote, 3).collect();
    let body = if raw.len() >= 6 && raw.starts_with(&triple) && raw.ends_with(&triple) {
        &raw[3..raw.len() - 3]
    } else {
        raw.strip_prefix(quote)?.strip_suffix(quote)?
    };
    Some(body)
}

#[cfg(test)]
#[path = "../tests/annotations_tests.rs"]
mod annotations_tests;
