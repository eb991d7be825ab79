//! Tree printer.
//!
//! `Printer` walks the arena from a root and writes source text into an
//! internal buffer. Statement printing lives in `statements.rs`, expression
//! printing in `expressions.rs` and the output helpers in `helpers.rs`.

use tracing::debug;
use tyg_parser::{BinaryOp, BoolOp, NodeArena, NodeData, NodeIndex, UnaryOp};

mod expressions;
mod helpers;
mod statements;

/// Binding strength of an expression, weakest first.
///
/// A child printed in a context that requires a stronger precedence than
/// its own is wrapped in parentheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Yield,
    Tuple,
    NamedExpr,
    Test,
    Or,
    And,
    Not,
    Cmp,
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    Arith,
    Term,
    Factor,
    Power,
    Await,
    Atom,
}

impl Precedence {
    /// The next stronger level.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::Yield => Self::Tuple,
            Self::Tuple => Self::NamedExpr,
            Self::NamedExpr => Self::Test,
            Self::Test => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Not,
            Self::Not => Self::Cmp,
            Self::Cmp => Self::BitOr,
            Self::BitOr => Self::BitXor,
            Self::BitXor => Self::BitAnd,
            Self::BitAnd => Self::Shift,
            Self::Shift => Self::Arith,
            Self::Arith => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Power,
            Self::Power => Self::Await,
            Self::Await | Self::Atom => Self::Atom,
        }
    }

    pub(crate) const fn of_binary(op: BinaryOp) -> Self {
        match op {
            BinaryOp::BitOr => Self::BitOr,
            BinaryOp::BitXor => Self::BitXor,
            BinaryOp::BitAnd => Self::BitAnd,
            BinaryOp::LShift | BinaryOp::RShift => Self::Shift,
            BinaryOp::Add | BinaryOp::Sub => Self::Arith,
            BinaryOp::Mult
            | BinaryOp::MatMult
            | BinaryOp::Div
            | BinaryOp::FloorDiv
            | BinaryOp::Mod => Self::Term,
            BinaryOp::Pow => Self::Power,
        }
    }
}

/// Writes a tree back out as Python source.
pub struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    output: String,
    indent_level: u32,
    at_line_start: bool,
}

impl<'a> Printer<'a> {
    #[must_use]
    pub fn new(arena: &'a NodeArena) -> Self {
        Self {
            arena,
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Print a whole module (or any statement-bearing root).
    pub fn print_root(&mut self, root: NodeIndex) {
        let arena = self.arena;
        match arena.data(root) {
            Some(NodeData::Module { body }) => self.emit_statement_list(&body.nodes, true),
            Some(data) if data.is_statement() => self.emit_statement(root),
            Some(_) => self.emit_expression(root, Precedence::Yield),
            None => {}
        }
    }

    /// Print a single expression without a trailing newline.
    #[must_use]
    pub fn expression_text(arena: &'a NodeArena, expr: NodeIndex) -> String {
        let mut printer = Printer::new(arena);
        printer.emit_expression(expr, Precedence::Test);
        printer.finish()
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }

    /// Precedence of an expression node as written, before any context is
    /// taken into account.
    pub(crate) fn precedence_of(&self, index: NodeIndex) -> Precedence {
        match self.arena.data(index) {
            Some(NodeData::Yield { .. } | NodeData::YieldFrom { .. }) => Precedence::Yield,
            Some(NodeData::Tuple { elts }) if elts.len() > 1 => Precedence::Tuple,
            Some(NodeData::NamedExpr { .. }) => Precedence::NamedExpr,
            Some(NodeData::Lambda { .. } | NodeData::IfExp { .. }) => Precedence::Test,
            Some(NodeData::BoolOp { op: BoolOp::Or, .. }) => Precedence::Or,
            Some(NodeData::BoolOp { op: BoolOp::And, .. }) => Precedence::And,
            Some(NodeData::UnaryOp {
                op: UnaryOp::Not, ..
            }) => Precedence::Not,
            Some(NodeData::UnaryOp { .. }) => Precedence::Factor,
            Some(NodeData::Compare { .. }) => Precedence::Cmp,
            Some(NodeData::BinOp { op, .. }) => Precedence::of_binary(*op),
            Some(NodeData::Await { .. }) => Precedence::Await,
            _ => Precedence::Atom,
        }
    }
}

/// Print the tree rooted at `root` as source text.
#[must_use]
pub fn print_module(arena: &NodeArena, root: NodeIndex) -> String {
    let mut printer = Printer::new(arena);
    printer.print_root(root);
    let output = printer.finish();
    debug!(bytes = output.len(), "printed module");
    output
}

#[cfg(test)]
#[path = "../../tests/printer_tests.rs"]
mod printer_tests;
