//! Parser state: token cursor, error type and shared helpers.
//!
//! The parser is a plain recursive-descent parser over the full token
//! vector produced by `tyg_scanner::tokenize`. Statement rules live in
//! `state_statements.rs`, expression rules in `state_expressions.rs`.

use thiserror::Error;
use tyg_common::limits::MAX_PARSE_DEPTH;
use tyg_scanner::{ScanError, SyntaxKind, Token, keyword_to_text, punctuation_to_text, tokenize};

use super::base::NodeIndex;
use super::node::{NodeArena, NodeData};

/// Errors that make a file unparsable.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("{line}:{column}: expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
        line: u32,
        column: u32,
    },
    #[error("{line}:{column}: unsupported syntax: {construct}")]
    Unsupported {
        construct: &'static str,
        line: u32,
        column: u32,
    },
    #[error("{line}:{column}: cannot assign to {kind}")]
    InvalidTarget {
        kind: &'static str,
        line: u32,
        column: u32,
    },
    #[error("nesting deeper than {limit} levels at line {line}")]
    TooDeep { limit: u32, line: u32 },
}

impl ParseError {
    /// Line the error was reported at.
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Self::Scan(
                ScanError::UnexpectedCharacter { line, .. }
                | ScanError::UnterminatedString { line, .. }
                | ScanError::InconsistentDedent { line },
            ) => *line,
            Self::Expected { line, .. }
            | Self::Unsupported { line, .. }
            | Self::InvalidTarget { line, .. }
            | Self::TooDeep { line, .. } => *line,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct ParserState<'a> {
    pub(crate) source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    pub(crate) arena: NodeArena,
    depth: u32,
}

impl<'a> ParserState<'a> {
    pub fn new(source: &'a str) -> ParseResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Self {
            source,
            arena: NodeArena::with_capacity(tokens.len()),
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    #[must_use]
    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    /// Current token. The scanner always ends the stream with an
    /// end-of-file token, which the cursor never moves past.
    #[inline]
    pub(crate) fn current(&self) -> Token {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[self.pos.min(last)]
    }

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.token() == kind
    }

    /// Kind of the token `offset` positions ahead.
    pub(crate) fn peek_kind(&self, offset: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(SyntaxKind::EndOfFileToken, |t| t.kind)
    }

    /// Consume the current token and return it.
    pub(crate) fn next_token(&mut self) -> Token {
        let token = self.current();
        if token.kind != SyntaxKind::EndOfFileToken {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(
        &mut self,
        kind: SyntaxKind,
        expected: &'static str,
    ) -> ParseResult<Token> {
        if self.is_token(kind) {
            Ok(self.next_token())
        } else {
            Err(self.error_expected(expected))
        }
    }

    #[inline]
    pub(crate) fn text_of(&self, token: Token) -> &'a str {
        token.text(self.source)
    }

    pub(crate) fn parse_identifier_text(&mut self) -> ParseResult<String> {
        let token = self.parse_expected(SyntaxKind::Identifier, "identifier")?;
        Ok(self.text_of(token).to_string())
    }

    pub(crate) fn error_expected(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        ParseError::Expected {
            expected,
            found: describe_token(token, self.source),
            line: token.line,
            column: token.column,
        }
    }

    pub(crate) fn error_unsupported(&self, construct: &'static str) -> ParseError {
        let token = self.current();
        ParseError::Unsupported {
            construct,
            line: token.line,
            column: token.column,
        }
    }

    // =========================================================================
    // Recursion guard
    // =========================================================================

    pub(crate) fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_PARSE_DEPTH,
                line: self.current().line,
            });
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // =========================================================================
    // Node creation
    // =========================================================================

    /// Add a node located at `token`.
    pub(crate) fn add(&mut self, data: NodeData, token: Token) -> NodeIndex {
        self.arena.add_node(data, token.line, token.column)
    }

    /// Add a node located where `first` starts.
    pub(crate) fn add_at(&mut self, data: NodeData, first: NodeIndex) -> NodeIndex {
        let (line, column) = self.arena.location(first);
        self.arena.add_node(data, line, column)
    }
}

fn describe_token(token: Token, source: &str) -> String {
    match token.kind {
        SyntaxKind::EndOfFileToken => "end of file".to_string(),
        SyntaxKind::NewLineToken => "newline".to_string(),
        SyntaxKind::IndentToken => "indent".to_string(),
        SyntaxKind::DedentToken => "dedent".to_string(),
        kind => keyword_to_text(kind)
            .or_else(|| punctuation_to_text(kind))
            .map_or_else(|| format!("{:?}", token.text(source)), |text| format!("'{text}'")),
    }
}
