//! Printer for the tyg syntax tree.
//!
//! Comments and original formatting are not preserved: the output is
//! regenerated from the tree with four-space indentation and the minimum
//! parentheses the operator precedence requires.

pub mod emitter;
pub use emitter::{Printer, print_module};
