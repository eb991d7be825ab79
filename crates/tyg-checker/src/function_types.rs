//! Return and parameter types of functions.

use tracing::trace;
use tyg_parser::syntax::node_utils::{is_none_literal, method_call};
use tyg_parser::{BinaryOp, ConstantValue, NodeArena, NodeData, NodeIndex, ParamKind};
use tyg_solver::{TypeExpr, unify};

use crate::expr::element_of;
use crate::state::InferenceEngine;

/// Receiver methods that identify the receiver's type.
const STR_METHODS: &[&str] = &[
    "capitalize",
    "casefold",
    "endswith",
    "format",
    "isdigit",
    "join",
    "lower",
    "lstrip",
    "replace",
    "rstrip",
    "split",
    "splitlines",
    "startswith",
    "strip",
    "title",
    "upper",
];
const LIST_METHODS: &[&str] = &["append", "extend", "insert", "pop", "remove", "reverse", "sort"];
const DICT_METHODS: &[&str] = &["get", "items", "keys", "setdefault", "update", "values"];
const SET_METHODS: &[&str] = &["add", "difference", "discard", "intersection", "union"];

/// Receiver type implied by calling `method` on it.
#[must_use]
pub fn method_receiver_type(method: &str) -> Option<TypeExpr> {
    if STR_METHODS.contains(&method) {
        Some(TypeExpr::atomic("str"))
    } else if LIST_METHODS.contains(&method) {
        Some(TypeExpr::list(TypeExpr::any()))
    } else if DICT_METHODS.contains(&method) {
        Some(TypeExpr::dict(TypeExpr::atomic("str"), TypeExpr::any()))
    } else if SET_METHODS.contains(&method) {
        Some(TypeExpr::set(TypeExpr::any()))
    } else {
        None
    }
}

impl InferenceEngine<'_> {
    /// Return type of `function` from its `return` and `yield` statements.
    ///
    /// `return` and `return None` only mark that the function can return
    /// nothing: alone they give `None`, next to valued returns they wrap
    /// the unified type in `Optional`. A function that yields returns
    /// `Iterator` of the yielded types.
    pub fn infer_return_type(&mut self, function: NodeIndex) -> Option<TypeExpr> {
        let arena = self.arena;
        let mut returned = Vec::new();
        let mut yielded = Vec::new();
        let mut bare_return = false;
        let mut is_generator = false;
        let mut unresolved = false;

        for index in arena.walk_scope(function) {
            match arena.data(index) {
                Some(NodeData::Return { value }) => {
                    if value.is_none() || is_none_literal(arena, *value) {
                        bare_return = true;
                    } else if let Some(ty) = self.expression_type(*value) {
                        returned.push(ty);
                    } else {
                        unresolved = true;
                        returned.push(TypeExpr::any());
                    }
                }
                Some(NodeData::Yield { value }) => {
                    is_generator = true;
                    if value.is_none() {
                        yielded.push(TypeExpr::none());
                    } else if let Some(ty) = self.expression_type(*value) {
                        yielded.push(ty);
                    } else {
                        unresolved = true;
                        yielded.push(TypeExpr::any());
                    }
                }
                Some(NodeData::YieldFrom { value }) => {
                    is_generator = true;
                    match self.expression_type(*value).as_ref().and_then(element_of) {
                        Some(ty) => yielded.push(ty),
                        None => {
                            unresolved = true;
                            yielded.push(TypeExpr::any());
                        }
                    }
                }
                _ => {}
            }
        }

        if unresolved && self.strict() {
            return self.settle(None);
        }
        if is_generator {
            let element = unify(yielded);
            trace!(function = function.0, %element, "generator element type");
            return self.settle(Some(TypeExpr::iterator(element)));
        }
        if returned.is_empty() {
            return Some(TypeExpr::none());
        }
        let mut result = unify(returned);
        if bare_return && !result.is_none() && !result.is_any() {
            result = TypeExpr::optional(result);
        }
        trace!(function = function.0, %result, "return type");
        self.settle(Some(result))
    }

    /// Type of `parameter` of `function`.
    ///
    /// A literal default decides first. Otherwise the body is scanned for
    /// usage patterns and the first recognised one, in source order, wins.
    /// A `None` default wraps the result in `Optional`.
    pub fn infer_parameter_type(&mut self, function: NodeIndex, parameter: NodeIndex) -> Option<TypeExpr> {
        let arena = self.arena;
        let Some(NodeData::Parameter { name, default, .. }) = arena.data(parameter) else {
            return None;
        };
        let default = *default;
        let none_default = default.is_some() && is_none_literal(arena, default);

        let mut default_type = None;
        if default.is_some() && !none_default {
            default_type = self.expression_type(default);
            if let Some(ty) = default_type.as_ref().filter(|ty| !ty.contains_any()) {
                return Some(ty.clone());
            }
        }

        let usage = self.parameter_usage_type(function, name).or(default_type);
        trace!(parameter = name.as_str(), usage = ?usage.as_ref().map(ToString::to_string), "parameter usage");
        if none_default {
            let inner = usage.unwrap_or_else(TypeExpr::any);
            return self.settle(Some(TypeExpr::optional(inner)));
        }
        self.settle(usage)
    }

    fn parameter_usage_type(&mut self, function: NodeIndex, name: &str) -> Option<TypeExpr> {
        let arena = self.arena;
        let Some(NodeData::FunctionDef { body, .. }) = arena.data(function) else {
            return None;
        };
        // Nested definitions bind their own names.
        for statement in body {
            if arena.data(*statement).is_some_and(NodeData::is_scope) {
                continue;
            }
            for index in arena.walk_scope(*statement) {
                if let Some(ty) = self.usage_pattern(index, name) {
                    return Some(ty);
                }
            }
        }
        None
    }

    /// Type implied by one node's use of `name`, if the node is a
    /// recognised usage pattern.
    fn usage_pattern(&mut self, index: NodeIndex, name: &str) -> Option<TypeExpr> {
        let arena = self.arena;
        match arena.data(index)? {
            NodeData::Call { .. } => {
                let (receiver, method) = method_call(arena, index)?;
                if !arena.is_name(receiver, name) {
                    return None;
                }
                method_receiver_type(method)
            }
            NodeData::Subscript { value, slice } if arena.is_name(*value, name) => {
                match arena.data(*slice)? {
                    NodeData::Constant {
                        value: ConstantValue::Int(_),
                    } => Some(TypeExpr::list(TypeExpr::any())),
                    NodeData::Constant {
                        value: ConstantValue::Str(_),
                    } => Some(TypeExpr::dict(TypeExpr::atomic("str"), TypeExpr::any())),
                    _ => None,
                }
            }
            NodeData::For { iter, .. } | NodeData::Comprehension { iter, .. }
                if arena.is_name(*iter, name) =>
            {
                Some(TypeExpr::generic("Iterable", vec![TypeExpr::any()]))
            }
            NodeData::BinOp { left, op, right } if op.is_arithmetic() => {
                let other = if arena.is_name(*left, name) {
                    *right
                } else if arena.is_name(*right, name) {
                    *left
                } else {
                    return None;
                };
                let on_left = other == *right;
                Some(self.arithmetic_operand_type(*op, other, on_left))
            }
            _ => None,
        }
    }

    fn arithmetic_operand_type(&mut self, op: BinaryOp, other: NodeIndex, on_left: bool) -> TypeExpr {
        let other = self.expression_type(other);
        match (op, other) {
            (_, Some(ty)) if ty.is_atomic("float") => ty,
            (BinaryOp::Add, Some(ty)) if ty.is_atomic("str") => ty,
            (BinaryOp::Mod, _) if on_left => TypeExpr::atomic("str"),
            _ => TypeExpr::atomic("int"),
        }
    }
}

/// Parameters of `function` that lack an annotation and may receive one.
///
/// `*args`, `**kwargs` and the implicit first parameter of methods are
/// never annotated.
#[must_use]
pub fn annotatable_parameters(arena: &NodeArena, function: NodeIndex) -> Vec<NodeIndex> {
    let Some(NodeData::FunctionDef {
        params, decorators, ..
    }) = arena.data(function)
    else {
        return Vec::new();
    };
    let is_method = matches!(arena.data(arena.parent(function)), Some(NodeData::ClassDef { .. }));
    let is_static = decorators
        .iter()
        .any(|decorator| arena.is_name(*decorator, "staticmethod"));

    params
        .iter()
        .enumerate()
        .filter_map(|(position, param)| {
            let Some(NodeData::Parameter {
                name,
                kind,
                annotation,
                ..
            }) = arena.data(*param)
            else {
                return None;
            };
            let implicit = is_method && !is_static && position == 0 && (name == "self" || name == "cls");
            let variadic = matches!(kind, ParamKind::VarArgs | ParamKind::KwArgs);
            (annotation.is_none() && !implicit && !variadic).then_some(*param)
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/function_types_tests.rs"]
mod function_types_tests;
