//! Import reconciliation for the `typing` vocabulary.
//!
//! After the fixers have run, annotations may name `List`, `Optional`,
//! `TypeVar` and friends that the module never imported. The reconciler
//! adds exactly those names to a single `from typing import ...` statement.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::debug;
use tyg_parser::syntax::node_utils::{called_name, leading_import_end};
use tyg_parser::{ConstantValue, NodeArena, NodeData, NodeIndex, ParsedModule};
use tyg_solver::{is_typing_name, parse_type};

/// Module the annotation vocabulary is imported from.
pub const TYPING_MODULE: &str = "typing";

/// Vocabulary names the module's annotations and `TypeVar(...)` calls use.
#[must_use]
pub fn annotation_names(arena: &NodeArena, root: NodeIndex) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for index in arena.walk(root) {
        match arena.data(index) {
            Some(NodeData::FunctionDef { returns, .. }) => collect_names(arena, *returns, &mut names),
            Some(NodeData::Parameter { annotation, .. } | NodeData::AnnAssign { annotation, .. }) => {
                collect_names(arena, *annotation, &mut names);
            }
            Some(NodeData::Call { .. }) if called_name(arena, index) == Some("TypeVar") => {
                names.insert("TypeVar".to_string());
            }
            _ => {}
        }
    }
    names
}

fn collect_names(arena: &NodeArena, annotation: NodeIndex, names: &mut BTreeSet<String>) {
    if annotation.is_none() {
        return;
    }
    for index in arena.walk(annotation) {
        match arena.data(index) {
            Some(NodeData::Name { id }) if is_typing_name(id) => {
                names.insert(id.clone());
            }
            Some(NodeData::Constant {
                value: ConstantValue::Str(raw),
            }) => {
                let text = raw.trim_matches(|c| c == '\'' || c == '"');
                if let Ok(ty) = parse_type(text) {
                    names.extend(
                        ty.referenced_names()
                            .into_iter()
                            .filter(|name| is_typing_name(name))
                            .map(str::to_string),
                    );
                }
            }
            _ => {}
        }
    }
}

/// What the module already imports from `typing`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypingImports {
    /// `from typing import *` or `import typing`.
    Everything,
    Names(BTreeSet<String>),
}

#[must_use]
pub fn typing_imports(arena: &NodeArena, root: NodeIndex) -> TypingImports {
    let mut imported = BTreeSet::new();
    for index in arena.walk(root) {
        match arena.data(index) {
            Some(NodeData::ImportFrom { .. }) if is_typing_import(arena, index) => {
                for (name, _) in alias_names(arena, index) {
                    if name == "*" {
                        return TypingImports::Everything;
                    }
                    imported.insert(name.to_string());
                }
            }
            Some(NodeData::Import { .. }) => {
                if alias_names(arena, index).iter().any(|(name, _)| *name == TYPING_MODULE) {
                    return TypingImports::Everything;
                }
            }
            _ => {}
        }
    }
    TypingImports::Names(imported)
}

/// Add the vocabulary names used by annotations but not imported yet.
///
/// Existing `from typing import` statements are first folded into one; the
/// missing names then extend it, or a new statement is inserted after the
/// docstring and the leading imports. Returns the number of names added.
pub fn reconcile_imports(module: &mut ParsedModule) -> usize {
    let needed = annotation_names(&module.arena, module.root);
    let missing: Vec<String> = match typing_imports(&module.arena, module.root) {
        TypingImports::Everything => return 0,
        TypingImports::Names(imported) => needed.difference(&imported).cloned().collect(),
    };
    if missing.is_empty() {
        return 0;
    }

    merge_annotation_imports(module);
    let arena = &mut module.arena;
    match top_level_typing_imports(arena, module.root).first().copied() {
        Some(import) => {
            for name in &missing {
                let alias = arena.add_alias(name.as_str());
                arena.push_import_name(import, alias);
            }
            sort_import_names(arena, import);
        }
        None => {
            let position = match arena.data(module.root) {
                Some(NodeData::Module { body }) => leading_import_end(arena, body),
                _ => 0,
            };
            let names: Vec<&str> = missing.iter().map(String::as_str).collect();
            let import = arena.add_import_from(TYPING_MODULE, &names);
            arena.insert_statement(module.root, position, import);
        }
    }
    debug!(file = module.file_name.as_str(), added = ?missing, "reconciled typing imports");
    missing.len()
}

/// Fold every top-level `from typing import ...` into the first one.
///
/// Duplicate names are dropped and the result is sorted. Returns the number
/// of statements removed. A wildcard import is left alone.
pub fn merge_annotation_imports(module: &mut ParsedModule) -> usize {
    let arena = &mut module.arena;
    let imports = top_level_typing_imports(arena, module.root);
    let Some((&keep, rest)) = imports.split_first() else {
        return 0;
    };
    let has_wildcard = imports
        .iter()
        .any(|import| alias_names(arena, *import).iter().any(|(name, _)| *name == "*"));
    if has_wildcard {
        return 0;
    }

    for import in rest {
        let aliases = match arena.data(*import) {
            Some(NodeData::ImportFrom { names, .. }) => names.nodes.clone(),
            _ => continue,
        };
        for alias in aliases {
            arena.remove_import_name(*import, alias);
            arena.push_import_name(keep, alias);
        }
        arena.remove_statement(*import);
    }
    sort_import_names(arena, keep);
    rest.len()
}

/// Drop names imported from `typing` that nothing references. Statements
/// left empty are removed. Returns the number of names dropped.
pub fn prune_unused_imports(module: &mut ParsedModule) -> usize {
    let arena = &mut module.arena;
    let mut referenced: FxHashSet<String> = FxHashSet::default();
    for index in arena.walk(module.root) {
        if let Some(NodeData::Name { id }) = arena.data(index) {
            referenced.insert(id.clone());
        }
    }
    referenced.extend(annotation_names(arena, module.root));

    let mut removed = 0;
    for import in top_level_typing_imports(arena, module.root) {
        let unused: Vec<NodeIndex> = match arena.data(import) {
            Some(NodeData::ImportFrom { names, .. }) => names
                .iter()
                .copied()
                .filter(|alias| match arena.data(*alias) {
                    Some(NodeData::Alias { name, asname }) => {
                        name != "*" && !referenced.contains(asname.as_ref().unwrap_or(name))
                    }
                    _ => false,
                })
                .collect(),
            _ => continue,
        };
        for alias in unused {
            if arena.remove_import_name(import, alias) {
                removed += 1;
            }
        }
        if matches!(arena.data(import), Some(NodeData::ImportFrom { names, .. }) if names.is_empty()) {
            arena.remove_statement(import);
        }
    }
    if removed > 0 {
        debug!(file = module.file_name.as_str(), removed, "pruned typing imports");
    }
    removed
}

fn is_typing_import(arena: &NodeArena, index: NodeIndex) -> bool {
    matches!(
        arena.data(index),
        Some(NodeData::ImportFrom { module: Some(module), level: 0, .. }) if module == TYPING_MODULE
    )
}

fn top_level_typing_imports(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let Some(NodeData::Module { body }) = arena.data(root) else {
        return Vec::new();
    };
    body.iter()
        .copied()
        .filter(|statement| is_typing_import(arena, *statement))
        .collect()
}

/// `(name, asname)` of each alias of an import statement.
fn alias_names(arena: &NodeArena, import: NodeIndex) -> Vec<(&str, Option<&str>)> {
    let names = match arena.data(import) {
        Some(NodeData::Import { names } | NodeData::ImportFrom { names, .. }) => names,
        _ => return Vec::new(),
    };
    names
        .iter()
        .filter_map(|alias| match arena.data(*alias)? {
            NodeData::Alias { name, asname } => Some((name.as_str(), asname.as_deref())),
            _ => None,
        })
        .collect()
}

/// Sort the aliases of `import` by name and drop exact duplicates.
fn sort_import_names(arena: &mut NodeArena, import: NodeIndex) {
    let Some(NodeData::ImportFrom { names, .. }) = arena.data(import) else {
        return;
    };
    let mut keyed: Vec<((String, Option<String>), NodeIndex)> = names
        .iter()
        .filter_map(|alias| match arena.data(*alias)? {
            NodeData::Alias { name, asname } => Some(((name.clone(), asname.clone()), *alias)),
            _ => None,
        })
        .collect();
    keyed.sort();
    keyed.dedup_by(|a, b| a.0 == b.0);
    let sorted: Vec<NodeIndex> = keyed.into_iter().map(|(_, alias)| alias).collect();

    if let Some(node) = arena.get_mut(import)
        && let NodeData::ImportFrom { names, .. } = &mut node.data
    {
        names.nodes = sorted;
    }
}

#[cfg(test)]
#[path = "../tests/imports_tests.rs"]
mod imports_tests;
