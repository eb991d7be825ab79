//! Annotation text parser.
//!
//! Reads the subset of annotation syntax the fixers produce and the type
//! checker reports: dotted names, `None`, `...`, subscripted generics and
//! `X | Y` unions.

use thiserror::Error;

use crate::types::{Arity, TypeExpr, generic_arity};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("empty type expression")]
    Empty,
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: String, offset: usize },
    #[error("unexpected end of type expression")]
    UnexpectedEnd,
    #[error("{name} takes {expected} type argument(s), found {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
    Name,
    Ellipsis,
    OpenBracket,
    CloseBracket,
    Comma,
    Bar,
}

#[derive(Clone, Copy, Debug)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    offset: usize,
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>, TypeParseError> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        let start = pos;
        let ch = bytes[pos];
        let kind = match ch {
            b' ' | b'\t' => {
                pos += 1;
                continue;
            }
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            b',' => TokenKind::Comma,
            b'|' => TokenKind::Bar,
            b'.' if text[pos..].starts_with("...") => {
                pos += 3;
                tokens.push(Token {
                    kind: TokenKind::Ellipsis,
                    text: &text[start..pos],
                    offset: start,
                });
                continue;
            }
            c if c == b'_' || c.is_ascii_alphabetic() => {
                while pos < bytes.len()
                    && (bytes[pos] == b'_' || bytes[pos] == b'.' || bytes[pos].is_ascii_alphanumeric())
                {
                    pos += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Name,
                    text: &text[start..pos],
                    offset: start,
                });
                continue;
            }
            _ => {
                let found = text[start..].chars().next().map(String::from).unwrap_or_default();
                return Err(TypeParseError::Unexpected {
                    found,
                    offset: start,
                });
            }
        };
        pos += 1;
        tokens.push(Token {
            kind,
            text: &text[start..pos],
            offset: start,
        });
    }
    Ok(tokens)
}

struct TypeParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next_token(&mut self) -> Result<Token<'a>, TypeParseError> {
        let token = self.peek().ok_or(TypeParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|token| token.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), TypeParseError> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(token))
        }
    }

    /// `union := primary ('|' primary)*`
    fn parse_union(&mut self) -> Result<TypeExpr, TypeParseError> {
        let first = self.parse_primary()?;
        if !self.eat(TokenKind::Bar) {
            return Ok(first);
        }
        let mut members = vec![first];
        loop {
            members.push(self.parse_primary()?);
            if !self.eat(TokenKind::Bar) {
                break;
            }
        }
        Ok(TypeExpr::union_of(members))
    }

    /// `primary := NAME ('[' union (',' union)* ']')? | '...'`
    fn parse_primary(&mut self) -> Result<TypeExpr, TypeParseError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Ellipsis => return Ok(TypeExpr::atomic("...")),
            TokenKind::Name => {}
            _ => return Err(unexpected(token)),
        }
        let name = token.text;
        if !self.eat(TokenKind::OpenBracket) {
            return Ok(TypeExpr::atomic(name));
        }
        let mut args = vec![self.parse_union()?];
        while self.eat(TokenKind::Comma) {
            if self.peek().is_some_and(|t| t.kind == TokenKind::CloseBracket) {
                break;
            }
            args.push(self.parse_union()?);
        }
        self.expect(TokenKind::CloseBracket)?;
        build_generic(name, args)
    }
}

fn build_generic(name: &str, args: Vec<TypeExpr>) -> Result<TypeExpr, TypeParseError> {
    let short_name = name.rsplit('.').next().unwrap_or(name);
    if short_name == "Union" {
        return Ok(TypeExpr::union_of(args));
    }
    if let Some(arity) = generic_arity(short_name)
        && !arity.accepts(args.len())
        && let Arity::Fixed(expected) = arity
    {
        return Err(TypeParseError::Arity {
            name: name.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(TypeExpr::generic(name, args))
}

fn unexpected(token: Token<'_>) -> TypeParseError {
    TypeParseError::Unexpected {
        found: token.text.to_string(),
        offset: token.offset,
    }
}

/// Parse annotation text such as `Dict[str, List[int]]` or `int | None`.
pub fn parse_type(text: &str) -> Result<TypeExpr, TypeParseError> {
    let tokens = tokenize(text.trim())?;
    if tokens.is_empty() {
        return Err(TypeParseError::Empty);
    }
    let mut parser = TypeParser { tokens, pos: 0 };
    let expr = parser.parse_union()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(unexpected(token)),
    }
}

#[cfg(test)]
#[path = "../tests/annotation_tests.rs"]
mod annotation_tests;
