//! Python scanner/tokenizer for the tyg annotation fixer.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine producing `Token`s
//! - `ScanError` - Lexical errors

pub mod syntax_kind;
pub use syntax_kind::{
    SyntaxKind, keyword_to_text, punctuation_to_text, text_to_keyword,
    token_is_augmented_assignment, token_is_keyword,
};

pub mod scanner_impl;
pub use scanner_impl::{ScanError, ScannerState, Token, tokenize};
