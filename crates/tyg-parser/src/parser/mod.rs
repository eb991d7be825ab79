//! Parser and arena tree.

mod base;
pub use base::{NodeIndex, NodeList};

mod node;
pub use node::{
    BinaryOp, BoolOp, CmpOp, ConstantValue, ExtendedNodeInfo, Node, NodeArena, NodeData,
    ParamKind, UnaryOp,
};

mod mutate;
mod node_access;
mod node_arena;

mod state;
pub use state::{ParseError, ParserState};
mod state_expressions;
mod state_statements;

use tracing::debug;

/// A parsed source file: the tree plus its root.
#[derive(Clone, Debug)]
pub struct ParsedModule {
    pub file_name: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
}

impl ParsedModule {
    /// Statements of the module body.
    #[must_use]
    pub fn body(&self) -> &[NodeIndex] {
        match self.arena.data(self.root) {
            Some(NodeData::Module { body }) => &body.nodes,
            _ => &[],
        }
    }
}

/// Parse a whole module.
pub fn parse_module(file_name: &str, source: &str) -> Result<ParsedModule, ParseError> {
    let mut state = ParserState::new(source)?;
    let root = state.parse_source_file()?;
    debug!(file = file_name, nodes = state.arena.len(), "parsed module");
    Ok(ParsedModule {
        file_name: file_name.to_string(),
        arena: state.into_arena(),
        root,
    })
}

#[cfg(test)]
#[path = "../../tests/state_statement_tests.rs"]
mod state_statement_tests;

#[cfg(test)]
#[path = "../../tests/state_expression_tests.rs"]
mod state_expression_tests;
