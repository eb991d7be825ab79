//! Type algebra for the tyg annotation fixer.
//!
//! - [`TypeExpr`]: atomic, generic and union type expressions as they are
//!   written in annotations.
//! - [`unify`]: merge a set of inferred types into one.
//! - [`parse_type`]: read annotation text back into a [`TypeExpr`].

pub mod annotation;
pub mod types;
pub mod unify;

pub use annotation::{TypeParseError, parse_type};
pub use types::{Arity, TYPING_VOCABULARY, TypeExpr, generic_arity, is_typing_name};
pub use unify::{unify, unify2};
