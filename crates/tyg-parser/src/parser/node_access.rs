//! NodeArena access and traversal methods.

use super::base::NodeIndex;
use super::node::*;

impl NodeArena {
    /// Get a node by index
    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    #[must_use]
    pub fn get_extended(&self, index: NodeIndex) -> Option<&ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn get_extended_mut(&mut self, index: NodeIndex) -> Option<&mut ExtendedNodeInfo> {
        if index.is_none() {
            None
        } else {
            self.extended_info.get_mut(index.0 as usize)
        }
    }

    #[inline]
    #[must_use]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|node| &node.data)
    }

    /// Parent of a node, or `NONE` for the root and detached nodes.
    #[inline]
    #[must_use]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get_extended(index)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    /// `(line, column)` of a node.
    #[must_use]
    pub fn location(&self, index: NodeIndex) -> (u32, u32) {
        self.get(index).map_or((0, 0), |node| (node.line, node.column))
    }

    /// Present children in source order.
    #[must_use]
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut children = Vec::new();
        if let Some(data) = self.data(index) {
            data.for_each_child(|child| children.push(child));
        }
        children
    }

    /// Identifier of a `Name` node.
    #[must_use]
    pub fn name_id(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Name { id } => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_name(&self, index: NodeIndex, id: &str) -> bool {
        self.name_id(index) == Some(id)
    }

    /// Pre-order walk of the subtree rooted at `root` (source order).
    #[must_use]
    pub fn walk(&self, root: NodeIndex) -> Vec<NodeIndex> {
        self.walk_filtered(root, |_| true)
    }

    /// Pre-order walk that does not descend into nested functions, classes
    /// or lambdas. The nested definition nodes themselves are included.
    #[must_use]
    pub fn walk_scope(&self, root: NodeIndex) -> Vec<NodeIndex> {
        self.walk_filtered(root, |data| !data.is_scope())
    }

    fn walk_filtered(&self, root: NodeIndex, descend: impl Fn(&NodeData) -> bool) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let Some(data) = self.data(index) else {
                continue;
            };
            order.push(index);
            if index != root && !descend(data) {
                continue;
            }
            let start = stack.len();
            data.for_each_child(|child| stack.push(child));
            stack[start..].reverse();
        }
        order
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        std::iter::successors(Some(self.parent(index)), |current| {
            Some(self.parent(*current))
        })
        .take_while(|current| current.is_some())
    }

    /// Nearest enclosing module, function, class or lambda.
    #[must_use]
    pub fn enclosing_scope(&self, index: NodeIndex) -> NodeIndex {
        self.ancestors(index)
            .find(|ancestor| self.data(*ancestor).is_some_and(NodeData::is_scope))
            .unwrap_or(NodeIndex::NONE)
    }

    /// Nearest enclosing function definition.
    #[must_use]
    pub fn enclosing_function(&self, index: NodeIndex) -> NodeIndex {
        self.ancestors(index)
            .find(|ancestor| matches!(self.data(*ancestor), Some(NodeData::FunctionDef { .. })))
            .unwrap_or(NodeIndex::NONE)
    }

    /// Whether `ancestor` lies on the parent chain of `index` (or is it).
    #[must_use]
    pub fn is_within(&self, index: NodeIndex, ancestor: NodeIndex) -> bool {
        index == ancestor || self.ancestors(index).any(|a| a == ancestor)
    }

    /// Nodes in the subtree whose first token is on `line`, in source order.
    #[must_use]
    pub fn nodes_at_line(&self, root: NodeIndex, line: u32) -> Vec<NodeIndex> {
        self.walk(root)
            .into_iter()
            .filter(|index| self.get(*index).is_some_and(|node| node.line == line))
            .collect()
    }
}
