use tracing::debug;
use tyg_common::{Diagnostic, DiagnosticCategory};
use tyg_parser::syntax::node_utils::{called_name, function_at_line, leading_import_end};
use tyg_parser::{NodeArena, NodeData, NodeIndex, ParsedModule};

use super::{FixKind, FixOutcome, Fixer, SkipReason};
use crate::context::InferenceSession;

/// Name given to a type variable created by the fixer.
pub const DEFAULT_TYPE_VAR: &str = "T";

/// Generic annotations that are completed with a type variable.
const PARAMETRIZABLE: &[&str] = &["Dict", "List", "Optional", "Set"];

/// Completes bare generic annotations of a function with a module-level
/// type variable: `List` becomes `List[T]`, `Dict` becomes `Dict[str, T]`.
pub struct GenericParameterFixer;

impl Fixer for GenericParameterFixer {
    fn name(&self) -> &'static str {
        "generic-parameters"
    }

    fn kind(&self) -> FixKind {
        FixKind::GenericParameters
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.category == DiagnosticCategory::GenericType
    }

    fn fix(
        &self,
        diagnostic: &Diagnostic,
        module: &mut ParsedModule,
        _session: &mut InferenceSession,
    ) -> FixOutcome {
        let function = function_at_line(&module.arena, module.root, diagnostic.line);
        if function.is_none() {
            return FixOutcome::Skipped(SkipReason::NoTarget);
        }
        let bare = bare_generic_annotations(&module.arena, function);
        if bare.is_empty() {
            return FixOutcome::Skipped(SkipReason::NothingToParametrize);
        }

        let type_var = ensure_type_var(module);
        let arena = &mut module.arena;
        let mut replaced = 0;
        for (node, generic) in bare {
            let value = arena.add_name(generic);
            let variable = arena.add_name(type_var.as_str());
            let slice = if generic == "Dict" {
                let key = arena.add_name("str");
                arena.add_tuple(vec![key, variable])
            } else {
                variable
            };
            let parametrized = arena.add_subscript(value, slice);
            if arena.replace(node, parametrized) {
                replaced += 1;
            }
        }
        debug!(line = diagnostic.line, replaced, type_var = type_var.as_str(), "parametrized generics");
        FixOutcome::from_edit(replaced > 0)
    }
}

/// Bare `List`/`Set`/`Dict`/`Optional` names in the return and parameter
/// annotations of `function`.
fn bare_generic_annotations(arena: &NodeArena, function: NodeIndex) -> Vec<(NodeIndex, &'static str)> {
    let Some(NodeData::FunctionDef { params, returns, .. }) = arena.data(function) else {
        return Vec::new();
    };
    let mut annotations = vec![*returns];
    for param in params {
        if let Some(NodeData::Parameter { annotation, .. }) = arena.data(*param) {
            annotations.push(*annotation);
        }
    }

    let mut bare = Vec::new();
    for annotation in annotations.into_iter().filter(|index| index.is_some()) {
        for index in arena.walk(annotation) {
            let Some(id) = arena.name_id(index) else {
                continue;
            };
            let Some(generic) = PARAMETRIZABLE.iter().copied().find(|generic| *generic == id) else {
                continue;
            };
            let subscripted = matches!(
                arena.data(arena.parent(index)),
                Some(NodeData::Subscript { value, .. }) if *value == index
            );
            if !subscripted {
                bare.push((index, generic));
            }
        }
    }
    bare
}

/// Name of the module's type variable, creating `T = TypeVar('T')` when
/// none is assigned anywhere in the tree.
///
/// A new definition goes after the docstring and the leading imports, but
/// never below the first top-level function or class.
fn ensure_type_var(module: &mut ParsedModule) -> String {
    let arena = &module.arena;
    for statement in arena.walk(module.root) {
        let Some(NodeData::Assign { targets, value }) = arena.data(statement) else {
            continue;
        };
        let is_type_var = called_name(arena, *value) == Some("TypeVar")
            || matches!(
                arena.data(*value),
                Some(NodeData::Call { func, .. })
                    if matches!(arena.data(*func), Some(NodeData::Attribute { attr, .. }) if attr == "TypeVar")
            );
        if is_type_var && let Some(name) = targets.first().and_then(|target| arena.name_id(target)) {
            return name.to_string();
        }
    }

    let body = module.body().to_vec();
    let imports_end = match arena.data(module.root) {
        Some(NodeData::Module { body }) => leading_import_end(arena, body),
        _ => 0,
    };
    let first_definition = body
        .iter()
        .position(|statement| {
            matches!(
                arena.data(*statement),
                Some(NodeData::FunctionDef { .. } | NodeData::ClassDef { .. })
            )
        })
        .unwrap_or(body.len());
    let position = imports_end.min(first_definition);

    let arena = &mut module.arena;
    let target = arena.add_name(DEFAULT_TYPE_VAR);
    let func = arena.add_name("TypeVar");
    let label = arena.add_str(DEFAULT_TYPE_VAR);
    let call = arena.add_call(func, vec![label]);
    let assignment = arena.add_assign(target, call);
    arena.insert_statement(module.root, position, assignment);
    debug!(position, "inserted type variable");
    DEFAULT_TYPE_VAR.to_string()
}
