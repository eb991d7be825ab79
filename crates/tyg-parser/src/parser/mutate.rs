//! Tree Mutator: structural edits on a live tree.
//!
//! All edits keep the parent pointers consistent. Nodes are never freed; a
//! replaced node stays in the arena as a detached orphan.

use tracing::trace;

use super::base::NodeIndex;
use super::node::*;

impl NodeArena {
    /// Overwrite the slot holding `old` with `new`.
    ///
    /// The slot is found through `old`'s parent: it is either an element of
    /// one of the parent's child lists or one of its singular fields. `new`
    /// takes over `old`'s source location and parent; children of `new` are
    /// re-parented to it (so `old` may itself be a child of `new`).
    ///
    /// Returns `false` and leaves the tree untouched when no slot holds
    /// `old`, for example because it is the root or already detached.
    pub fn replace(&mut self, old: NodeIndex, new: NodeIndex) -> bool {
        if old == new || self.get(new).is_none() {
            return false;
        }
        let holder = self.parent(old);
        let Some(holder_node) = self.get_mut(holder) else {
            return false;
        };

        let mut replaced = 0usize;
        holder_node.data.for_each_slot_mut(|slot| {
            if *slot == old && replaced == 0 {
                *slot = new;
                replaced += 1;
            }
        });
        if replaced == 0 {
            return false;
        }

        let (line, column) = self.location(old);
        if let Some(node) = self.get_mut(new) {
            node.line = line;
            node.column = column;
        }
        if let Some(info) = self.get_extended_mut(new) {
            info.parent = holder;
        }
        for child in self.children(new) {
            if let Some(info) = self.get_extended_mut(child) {
                info.parent = new;
            }
        }
        if self.parent(old) == holder
            && let Some(info) = self.get_extended_mut(old)
        {
            info.parent = NodeIndex::NONE;
        }
        trace!(old = old.0, new = new.0, holder = holder.0, "replaced node");
        true
    }

    /// Fill an empty annotation slot of a parameter or the return slot of a
    /// function. Existing annotations are never overwritten.
    pub fn set_annotation(&mut self, target: NodeIndex, annotation: NodeIndex) -> bool {
        let Some(node) = self.get_mut(target) else {
            return false;
        };
        let slot = match &mut node.data {
            NodeData::Parameter { annotation, .. } => annotation,
            NodeData::FunctionDef { returns, .. } => returns,
            _ => return false,
        };
        if slot.is_some() {
            return false;
        }
        *slot = annotation;
        if let Some(info) = self.get_extended_mut(annotation) {
            info.parent = target;
        }
        true
    }

    /// Insert `statement` into the main body of `container` at `position`
    /// (clamped to the body length).
    pub fn insert_statement(
        &mut self,
        container: NodeIndex,
        position: usize,
        statement: NodeIndex,
    ) -> bool {
        let Some(node) = self.get_mut(container) else {
            return false;
        };
        let body = match &mut node.data {
            NodeData::Module { body }
            | NodeData::FunctionDef { body, .. }
            | NodeData::ClassDef { body, .. } => body,
            _ => return false,
        };
        let position = position.min(body.len());
        body.nodes.insert(position, statement);
        if let Some(info) = self.get_extended_mut(statement) {
            info.parent = container;
        }
        true
    }

    /// Detach `statement` from whichever statement list holds it.
    pub fn remove_statement(&mut self, statement: NodeIndex) -> bool {
        let holder = self.parent(statement);
        let Some(node) = self.get_mut(holder) else {
            return false;
        };
        let mut removed = false;
        for list in node.data.statement_lists_mut() {
            if let Some(position) = list.position_of(statement) {
                list.nodes.remove(position);
                removed = true;
                break;
            }
        }
        if removed && let Some(info) = self.get_extended_mut(statement) {
            info.parent = NodeIndex::NONE;
        }
        removed
    }

    /// Append an alias node to an `import`/`from ... import` statement.
    pub fn push_import_name(&mut self, import: NodeIndex, alias: NodeIndex) -> bool {
        let Some(node) = self.get_mut(import) else {
            return false;
        };
        match &mut node.data {
            NodeData::Import { names } | NodeData::ImportFrom { names, .. } => names.push(alias),
            _ => return false,
        }
        if let Some(info) = self.get_extended_mut(alias) {
            info.parent = import;
        }
        true
    }

    /// Remove an alias node from its import statement.
    pub fn remove_import_name(&mut self, import: NodeIndex, alias: NodeIndex) -> bool {
        let Some(node) = self.get_mut(import) else {
            return false;
        };
        let names = match &mut node.data {
            NodeData::Import { names } | NodeData::ImportFrom { names, .. } => names,
            _ => return false,
        };
        let Some(position) = names.position_of(alias) else {
            return false;
        };
        names.nodes.remove(position);
        if let Some(info) = self.get_extended_mut(alias) {
            info.parent = NodeIndex::NONE;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/mutate_tests.rs"]
mod mutate_tests;
