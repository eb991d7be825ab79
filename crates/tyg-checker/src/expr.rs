//! Expression types.
//!
//! `expression_type` answers `None` when nothing useful can be said; the
//! public entry points turn that into `Any` (or a declined fix in strict
//! mode) through [`InferenceEngine::settle`].

use tracing::trace;
use tyg_common::limits::MAX_INFERENCE_DEPTH;
use tyg_parser::syntax::node_utils::is_none_literal;
use tyg_parser::{BinaryOp, ConstantValue, NodeData, NodeIndex, NodeList, UnaryOp};
use tyg_solver::{TypeExpr, unify};

use crate::annotations::node_to_type;
use crate::state::InferenceEngine;

/// Builtins whose call result does not depend on the arguments.
const BUILTIN_RESULTS: &[(&str, &str)] = &[
    ("bool", "bool"),
    ("bytes", "bytes"),
    ("callable", "bool"),
    ("chr", "str"),
    ("complex", "complex"),
    ("float", "float"),
    ("format", "str"),
    ("hasattr", "bool"),
    ("hash", "int"),
    ("input", "str"),
    ("int", "int"),
    ("isinstance", "bool"),
    ("issubclass", "bool"),
    ("len", "int"),
    ("ord", "int"),
    ("repr", "str"),
    ("str", "str"),
];

impl InferenceEngine<'_> {
    /// Type of `expr` with the session default applied.
    pub fn infer_expression(&mut self, expr: NodeIndex) -> Option<TypeExpr> {
        let inferred = self.expression_type(expr);
        self.settle(inferred)
    }

    pub(crate) fn expression_type(&mut self, expr: NodeIndex) -> Option<TypeExpr> {
        if self.session.depth >= MAX_INFERENCE_DEPTH {
            trace!(expr = expr.0, "inference depth exhausted");
            return None;
        }
        self.session.depth += 1;
        let result = self.expression_type_inner(expr);
        self.session.depth -= 1;
        result
    }

    fn expression_type_inner(&mut self, expr: NodeIndex) -> Option<TypeExpr> {
        let arena = self.arena;
        match arena.data(expr)? {
            NodeData::Constant { value } => constant_type(value),
            NodeData::List { elts } => Some(TypeExpr::list(self.element_type(elts))),
            NodeData::Set { elts } => Some(TypeExpr::set(self.element_type(elts))),
            NodeData::Dict { keys, values } => {
                let key = self.element_type(keys);
                let value = self.element_type(values);
                Some(TypeExpr::dict(key, value))
            }
            NodeData::Tuple { elts } => Some(self.tuple_type(elts)),
            NodeData::ListComp { elt, .. } => Some(TypeExpr::list(self.slot_type(*elt))),
            NodeData::SetComp { elt, .. } => Some(TypeExpr::set(self.slot_type(*elt))),
            NodeData::GeneratorExp { elt, .. } => Some(TypeExpr::iterator(self.slot_type(*elt))),
            NodeData::DictComp { key, value, .. } => {
                let key = self.slot_type(*key);
                let value = self.slot_type(*value);
                Some(TypeExpr::dict(key, value))
            }
            NodeData::Call { func, .. } => self.call_type(*func),
            NodeData::BinOp { left, op, right } => self.binary_type(*left, *op, *right),
            NodeData::UnaryOp {
                op: UnaryOp::Not, ..
            }
            | NodeData::Compare { .. }
            | NodeData::BoolOp { .. } => Some(TypeExpr::atomic("bool")),
            NodeData::UnaryOp { operand, .. } => {
                self.expression_type(*operand).filter(is_numeric)
            }
            NodeData::IfExp { body, orelse, .. } => {
                let body = self.expression_type(*body)?;
                let orelse = self.expression_type(*orelse)?;
                Some(unify([body, orelse]))
            }
            NodeData::NamedExpr { value, .. } => self.expression_type(*value),
            NodeData::Name { id } => self.name_type(expr, id),
            NodeData::Subscript { value, slice } => self.subscript_type(*value, *slice),
            _ => None,
        }
    }

    /// Unified type of a literal's elements; `Any` when the literal is empty
    /// or any element is unresolved.
    fn element_type(&mut self, elements: &NodeList) -> TypeExpr {
        let mut types = Vec::with_capacity(elements.len());
        for element in elements {
            if element.is_none() || matches!(self.arena.data(*element), Some(NodeData::Starred { .. })) {
                return TypeExpr::any();
            }
            let Some(ty) = self.expression_type(*element) else {
                return TypeExpr::any();
            };
            types.push(ty);
        }
        unify(types)
    }

    fn slot_type(&mut self, slot: NodeIndex) -> TypeExpr {
        self.expression_type(slot).unwrap_or_else(TypeExpr::any)
    }

    fn tuple_type(&mut self, elements: &NodeList) -> TypeExpr {
        if elements.is_empty() {
            return TypeExpr::tuple_of_any();
        }
        let mut types = Vec::with_capacity(elements.len());
        for element in elements {
            if matches!(self.arena.data(*element), Some(NodeData::Starred { .. })) {
                return TypeExpr::tuple_of_any();
            }
            match self.expression_type(*element) {
                Some(ty) => types.push(ty),
                None => return TypeExpr::tuple_of_any(),
            }
        }
        TypeExpr::tuple(types)
    }

    fn call_type(&mut self, func: NodeIndex) -> Option<TypeExpr> {
        let arena = self.arena;
        let name = arena.name_id(func)?;
        if let Some((_, result)) = BUILTIN_RESULTS.iter().find(|(builtin, _)| *builtin == name) {
            return Some(TypeExpr::atomic(*result));
        }
        match name {
            "list" => return Some(TypeExpr::list(TypeExpr::any())),
            "dict" => return Some(TypeExpr::dict(TypeExpr::any(), TypeExpr::any())),
            "set" => return Some(TypeExpr::set(TypeExpr::any())),
            "frozenset" => return Some(TypeExpr::generic("FrozenSet", vec![TypeExpr::any()])),
            "tuple" => return Some(TypeExpr::tuple_of_any()),
            _ => {}
        }
        let definition = arena.walk(self.root).into_iter().find(|index| {
            matches!(
                arena.data(*index),
                Some(NodeData::FunctionDef { name: defined, .. } | NodeData::ClassDef { name: defined, .. })
                    if defined == name
            )
        });
        match definition.and_then(|index| arena.data(index)) {
            Some(NodeData::FunctionDef { returns, .. }) => node_to_type(arena, *returns),
            Some(NodeData::ClassDef { .. }) => Some(TypeExpr::atomic(name)),
            _ if name.starts_with(|c: char| c.is_ascii_uppercase()) => Some(TypeExpr::atomic(name)),
            _ => None,
        }
    }

    fn binary_type(&mut self, left: NodeIndex, op: BinaryOp, right: NodeIndex) -> Option<TypeExpr> {
        let left = self.expression_type(left);
        let right = self.expression_type(right);

        if !op.is_arithmetic() {
            return match (left, right) {
                (Some(l), Some(r)) if l == r && (l.is_atomic("int") || l.is_atomic("bool")) => Some(l),
                _ => None,
            };
        }

        match (op, &left, &right) {
            (BinaryOp::Mod, Some(l), _) if l.is_atomic("str") => return Some(l.clone()),
            (BinaryOp::Add, Some(l), Some(r)) if l == r && !is_numeric(l) => return Some(l.clone()),
            (BinaryOp::Add, Some(known), None) | (BinaryOp::Add, None, Some(known))
                if known.is_atomic("str") =>
            {
                return Some(known.clone());
            }
            (BinaryOp::Mult, Some(l), Some(r)) if is_sequence(l) && r.is_atomic("int") => {
                return Some(l.clone());
            }
            _ => {}
        }

        let sides = [left, right];
        if sides.iter().flatten().any(|side| !is_numeric(side)) {
            return None;
        }
        let numeric: Vec<TypeExpr> = sides.into_iter().flatten().collect();
        if numeric.is_empty() {
            return None;
        }
        if op == BinaryOp::Div {
            return Some(TypeExpr::atomic("float"));
        }
        Some(widen(numeric))
    }

    fn name_type(&mut self, at: NodeIndex, id: &str) -> Option<TypeExpr> {
        match id {
            "True" | "False" => return Some(TypeExpr::atomic("bool")),
            "self" | "cls" => return None,
            _ => {}
        }
        let scope = self.arena.enclosing_scope(at);
        if let Some(parameter) = self.parameter_binding(scope, id) {
            return self.parameter_annotation(parameter);
        }

        let key = (scope, id.to_string());
        if let Some(cached) = self.session.variable_types.get(&key) {
            return cached.clone();
        }
        if !self.session.variables_in_progress.insert(key.clone()) {
            trace!(name = id, "cyclic variable lookup");
            return None;
        }

        let mut result = self.first_assignment_type(scope, id);
        if result.is_none() && scope != self.root {
            result = self.first_assignment_type(self.root, id);
        }

        self.session.variables_in_progress.remove(&key);
        trace!(name = id, ty = ?result.as_ref().map(ToString::to_string), "variable type");
        self.session.variable_types.insert(key, result.clone());
        result
    }

    /// Parameter of the function `scope` that binds `id`, if any.
    fn parameter_binding(&self, scope: NodeIndex, id: &str) -> Option<NodeIndex> {
        let Some(NodeData::FunctionDef { params, .. }) = self.arena.data(scope) else {
            return None;
        };
        params.iter().copied().find(|param| {
            matches!(self.arena.data(*param), Some(NodeData::Parameter { name, .. }) if name == id)
        })
    }

    fn parameter_annotation(&mut self, parameter: NodeIndex) -> Option<TypeExpr> {
        let arena = self.arena;
        let Some(NodeData::Parameter {
            annotation, default, ..
        }) = arena.data(parameter)
        else {
            return None;
        };
        if annotation.is_some() {
            return node_to_type(arena, *annotation);
        }
        if default.is_some() && !is_none_literal(arena, *default) {
            return self.expression_type(*default).filter(|ty| !ty.contains_any());
        }
        None
    }

    /// Type of the first binding of `id` in `scope`, in source order.
    fn first_assignment_type(&mut self, scope: NodeIndex, id: &str) -> Option<TypeExpr> {
        let arena = self.arena;
        for index in arena.walk_scope(scope) {
            match arena.data(index) {
                Some(NodeData::Assign { targets, value })
                    if targets.iter().any(|target| arena.is_name(*target, id)) =>
                {
                    return self.expression_type(*value);
                }
                Some(NodeData::AnnAssign {
                    target, annotation, ..
                }) if arena.is_name(*target, id) => {
                    return node_to_type(arena, *annotation);
                }
                Some(NodeData::For { target, iter, .. }) if arena.is_name(*target, id) => {
                    let iterable = self.expression_type(*iter)?;
                    return element_of(&iterable);
                }
                _ => {}
            }
        }
        None
    }

    fn subscript_type(&mut self, value: NodeIndex, slice: NodeIndex) -> Option<TypeExpr> {
        let container = self.expression_type(value)?;
        let is_slice = matches!(self.arena.data(slice), Some(NodeData::Slice { .. }));
        if container.is_atomic("str") {
            return Some(container);
        }
        let TypeExpr::Generic { name, args } = &container else {
            return None;
        };
        match (name.as_str(), args.as_slice()) {
            ("List" | "Sequence", _) if is_slice => Some(container.clone()),
            ("List" | "Sequence", [element]) => Some(element.clone()),
            ("Dict" | "Mapping", [_, value]) if !is_slice => Some(value.clone()),
            ("Tuple", elements) if !is_slice => {
                let Some(NodeData::Constant {
                    value: ConstantValue::Int(text),
                }) = self.arena.data(slice)
                else {
                    return None;
                };
                let position: usize = text.parse().ok()?;
                elements
                    .get(position)
                    .filter(|element| !element.is_atomic("..."))
                    .cloned()
            }
            _ => None,
        }
    }
}

fn constant_type(value: &ConstantValue) -> Option<TypeExpr> {
    let name = match value {
        ConstantValue::None => "None",
        ConstantValue::True | ConstantValue::False => "bool",
        ConstantValue::Int(_) => "int",
        ConstantValue::Float(_) => "float",
        ConstantValue::Complex(_) => "complex",
        ConstantValue::Str(_) => "str",
        ConstantValue::Bytes(_) => "bytes",
        ConstantValue::Ellipsis => return None,
    };
    Some(TypeExpr::atomic(name))
}

fn is_numeric(ty: &TypeExpr) -> bool {
    ty.is_atomic("int") || ty.is_atomic("float") || ty.is_atomic("bool")
}

fn is_sequence(ty: &TypeExpr) -> bool {
    ty.is_atomic("str") || matches!(ty.name(), "List" | "Tuple")
}

/// Numeric widening: `bool` counts as `int`, `float` absorbs `int`.
fn widen(numeric: Vec<TypeExpr>) -> TypeExpr {
    unify(numeric.into_iter().map(|ty| {
        if ty.is_atomic("bool") {
            TypeExpr::atomic("int")
        } else {
            ty
        }
    }))
}

/// Element type produced by iterating over a value of type `iterable`.
pub(crate) fn element_of(iterable: &TypeExpr) -> Option<TypeExpr> {
    if iterable.is_atomic("str") {
        return Some(iterable.clone());
    }
    let TypeExpr::Generic { name, args } = iterable else {
        return None;
    };
    match (name.as_str(), args.as_slice()) {
        ("List" | "Set" | "FrozenSet" | "Iterator" | "Iterable" | "Sequence", [element]) => {
            Some(element.clone())
        }
        ("Dict" | "Mapping", [key, _]) => Some(key.clone()),
        ("Tuple", [element, ellipsis]) if ellipsis.is_atomic("...") => Some(element.clone()),
        ("Tuple", elements) if !elements.is_empty() => Some(unify(elements.iter().cloned())),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/expr_tests.rs"]
mod expr_tests;
