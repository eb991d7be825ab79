//! Python parser and syntax tree for the tyg annotation fixer.
//!
//! The tree is an arena of [`Node`]s addressed by [`NodeIndex`]. Nodes are
//! never moved or freed while a tree is alive, so an index stays valid for
//! the whole processing pass even after other parts of the tree have been
//! rewritten through [`NodeArena::replace`].

pub mod parser;
pub use parser::{
    BinaryOp, BoolOp, CmpOp, ConstantValue, ExtendedNodeInfo, Node, NodeArena, NodeData,
    NodeIndex, NodeList, ParamKind, ParseError, ParsedModule, ParserState, UnaryOp, parse_module,
};

pub mod syntax;
