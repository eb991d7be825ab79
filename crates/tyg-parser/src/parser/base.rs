//! Base index types for the arena tree.

/// Index of a node in a [`super::NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Marker for an empty optional slot.
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::NONE
    }
}

/// Ordered list of child nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn push(&mut self, index: NodeIndex) {
        self.nodes.push(index);
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, NodeIndex> {
        self.nodes.iter()
    }

    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<NodeIndex> {
        self.nodes.get(position).copied()
    }

    #[must_use]
    pub fn position_of(&self, index: NodeIndex) -> Option<usize> {
        self.nodes.iter().position(|n| *n == index)
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        Self { nodes }
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a NodeIndex;
    type IntoIter = std::slice::Iter<'a, NodeIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a mut NodeList {
    type Item = &'a mut NodeIndex;
    type IntoIter = std::slice::IterMut<'a, NodeIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter_mut()
    }
}
