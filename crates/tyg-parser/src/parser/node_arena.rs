//! NodeArena creation methods (add_* methods).

use super::base::{NodeIndex, NodeList};
use super::node::*;

impl NodeArena {
    #[must_use]
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            extended_info: Vec::with_capacity(capacity),
        }
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

    /// Add a node and adopt every child that has no parent yet.
    ///
    /// Children that are still attached elsewhere keep their parent until the
    /// new node is spliced in with [`NodeArena::replace`].
    pub fn add_node(&mut self, data: NodeData, line: u32, column: u32) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let mut children = Vec::new();
        data.for_each_child(|child| children.push(child));
        self.nodes.push(Node { data, line, column });
        self.extended_info.push(ExtendedNodeInfo::default());
        for child in children {
            if let Some(info) = self.get_extended_mut(child)
                && info.parent.is_none()
            {
                info.parent = index;
            }
        }
        index
    }

    /// Add a synthesized node without a source location.
    pub fn add_synthetic(&mut self, data: NodeData) -> NodeIndex {
        self.add_node(data, 0, 0)
    }

    pub fn add_name(&mut self, id: impl Into<String>) -> NodeIndex {
        self.add_synthetic(NodeData::Name { id: id.into() })
    }

    pub fn add_constant(&mut self, value: ConstantValue) -> NodeIndex {
        self.add_synthetic(NodeData::Constant { value })
    }

    pub fn add_none(&mut self) -> NodeIndex {
        self.add_constant(ConstantValue::None)
    }

    pub fn add_str(&mut self, text: &str) -> NodeIndex {
        self.add_constant(ConstantValue::Str(format!("'{text}'")))
    }

    pub fn add_attribute(&mut self, value: NodeIndex, attr: impl Into<String>) -> NodeIndex {
        self.add_synthetic(NodeData::Attribute {
            value,
            attr: attr.into(),
        })
    }

    pub fn add_subscript(&mut self, value: NodeIndex, slice: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Subscript { value, slice })
    }

    pub fn add_tuple(&mut self, elts: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Tuple { elts: elts.into() })
    }

    pub fn add_call(&mut self, func: NodeIndex, args: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Call {
            func,
            args: args.into(),
        })
    }

    pub fn add_compare(&mut self, left: NodeIndex, op: CmpOp, right: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Compare {
            left,
            ops: vec![op],
            comparators: vec![right].into(),
        })
    }

    pub fn add_if_exp(&mut self, test: NodeIndex, body: NodeIndex, orelse: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::IfExp { test, body, orelse })
    }

    pub fn add_assign(&mut self, target: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::Assign {
            targets: vec![target].into(),
            value,
        })
    }

    pub fn add_ann_assign(
        &mut self,
        target: NodeIndex,
        annotation: NodeIndex,
        value: NodeIndex,
    ) -> NodeIndex {
        self.add_synthetic(NodeData::AnnAssign {
            target,
            annotation,
            value,
        })
    }

    pub fn add_alias(&mut self, name: impl Into<String>) -> NodeIndex {
        self.add_synthetic(NodeData::Alias {
            name: name.into(),
            asname: None,
        })
    }

    /// `from <module> import <names...>`
    pub fn add_import_from(&mut self, module: &str, names: &[&str]) -> NodeIndex {
        let aliases: Vec<NodeIndex> = names.iter().map(|name| self.add_alias(*name)).collect();
        self.add_synthetic(NodeData::ImportFrom {
            module: Some(module.to_string()),
            names: NodeList::from(aliases),
            level: 0,
        })
    }
}
