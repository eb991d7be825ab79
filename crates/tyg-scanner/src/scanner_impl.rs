//! Scanner state machine.
//!
//! Produces the full token stream for a module up front. Indentation is
//! turned into `IndentToken`/`DedentToken` pairs, logical line ends into
//! `NewLineToken`. Newlines inside brackets and after a backslash
//! continuation are not significant. Blank and comment-only lines produce
//! nothing. Comments are dropped.

use memchr::memchr;
use thiserror::Error;
use tracing::trace;

use crate::syntax_kind::{PUNCTUATION, SyntaxKind, text_to_keyword};

/// Errors reported while tokenizing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("unexpected character {ch:?} at {line}:{column}")]
    UnexpectedCharacter { ch: char, line: u32, column: u32 },
    #[error("unterminated string starting at {line}:{column}")]
    UnterminatedString { line: u32, column: u32 },
    #[error("unindent does not match any outer indentation level at line {line}")]
    InconsistentDedent { line: u32 },
}

/// A scanned token. Offsets are byte offsets into the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub start: u32,
    pub end: u32,
    /// 1-based line of the first character.
    pub line: u32,
    /// 0-based column (in characters) of the first character.
    pub column: u32,
}

impl Token {
    #[inline]
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}

/// Tokenize a whole module.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScanError> {
    ScannerState::new(source).scan_all()
}

pub struct ScannerState<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    line_start: usize,
    indent_stack: Vec<u32>,
    bracket_depth: u32,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> ScannerState<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            indent_stack: vec![0],
            bracket_depth: 0,
            at_line_start: true,
            tokens: Vec::with_capacity(source.len() / 3),
        }
    }

    pub fn scan_all(mut self) -> Result<Vec<Token>, ScanError> {
        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                if self.scan_indentation()? {
                    continue;
                }
                self.at_line_start = false;
            }

            self.skip_horizontal_whitespace();
            let Some(&byte) = self.bytes.get(self.pos) else {
                self.finish();
                break;
            };

            match byte {
                b'#' => self.skip_to_line_end(),
                b'\\' if self.is_line_continuation() => {
                    self.pos += 1;
                    self.consume_newline();
                }
                b'\n' | b'\r' => {
                    if self.bracket_depth == 0 {
                        self.push_token(SyntaxKind::NewLineToken, self.pos, self.pos + 1);
                        self.at_line_start = true;
                    }
                    self.consume_newline();
                }
                b'0'..=b'9' => self.scan_number(),
                b'.' if self.peek_is_digit(1) => self.scan_number(),
                b'"' | b'\'' => self.scan_string(self.pos)?,
                b if is_identifier_start(b) => self.scan_identifier_or_string()?,
                _ => self.scan_punctuation()?,
            }
        }
        trace!(tokens = self.tokens.len(), "scanned module");
        Ok(self.tokens)
    }

    /// Measure the indentation of a new line. Returns `true` when the line
    /// was blank or comment-only and has been skipped entirely.
    fn scan_indentation(&mut self) -> Result<bool, ScanError> {
        let mut width = 0u32;
        while let Some(&byte) = self.bytes.get(self.pos) {
            match byte {
                b' ' => width += 1,
                b'\t' => width = (width / 8 + 1) * 8,
                b'\x0c' => width = 0,
                _ => break,
            }
            self.pos += 1;
        }

        match self.bytes.get(self.pos) {
            None => return Ok(false),
            Some(b'#') => {
                self.skip_to_line_end();
                self.consume_newline();
                return Ok(true);
            }
            Some(b'\n' | b'\r') => {
                self.consume_newline();
                return Ok(true);
            }
            Some(b'\\') if self.is_line_continuation() => {
                self.pos += 1;
                self.consume_newline();
                return Ok(true);
            }
            Some(_) => {}
        }

        let current = self.indent_stack.last().copied().unwrap_or(0);
        if width > current {
            self.indent_stack.push(width);
            self.push_token(SyntaxKind::IndentToken, self.pos, self.pos);
        } else if width < current {
            while self.indent_stack.last().is_some_and(|&level| level > width) {
                self.indent_stack.pop();
                self.push_token(SyntaxKind::DedentToken, self.pos, self.pos);
            }
            if self.indent_stack.last().copied().unwrap_or(0) != width {
                return Err(ScanError::InconsistentDedent { line: self.line });
            }
        }
        Ok(false)
    }

    fn finish(&mut self) {
        let needs_newline = self
            .tokens
            .last()
            .is_some_and(|t| t.kind != SyntaxKind::NewLineToken && t.kind != SyntaxKind::DedentToken);
        if needs_newline {
            self.push_token(SyntaxKind::NewLineToken, self.pos, self.pos);
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push_token(SyntaxKind::DedentToken, self.pos, self.pos);
        }
        self.push_token(SyntaxKind::EndOfFileToken, self.pos, self.pos);
    }

    fn push_token(&mut self, kind: SyntaxKind, start: usize, end: usize) {
        let column = self.column_of(start);
        self.tokens.push(Token {
            kind,
            start: start as u32,
            end: end as u32,
            line: self.line,
            column,
        });
    }

    fn column_of(&self, offset: usize) -> u32 {
        let start = self.line_start.min(offset);
        self.source[start..offset].chars().count() as u32
    }

    fn skip_horizontal_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\x0c') = self.bytes.get(self.pos) {
            self.pos += 1;
        }
    }

    fn skip_to_line_end(&mut self) {
        let rest = &self.bytes[self.pos..];
        self.pos += memchr(b'\n', rest).unwrap_or(rest.len());
        if self.pos > 0 && self.bytes.get(self.pos - 1) == Some(&b'\r') {
            self.pos -= 1;
        }
    }

    fn is_line_continuation(&self) -> bool {
        matches!(self.bytes.get(self.pos + 1), Some(b'\n' | b'\r'))
    }

    /// Consume `\n`, `\r\n` or `\r` and start a new physical line.
    fn consume_newline(&mut self) {
        match self.bytes.get(self.pos) {
            Some(b'\r') => {
                self.pos += 1;
                if self.bytes.get(self.pos) == Some(&b'\n') {
                    self.pos += 1;
                }
            }
            Some(b'\n') => self.pos += 1,
            _ => return,
        }
        self.line += 1;
        self.line_start = self.pos;
    }

    fn peek_is_digit(&self, offset: usize) -> bool {
        self.bytes
            .get(self.pos + offset)
            .is_some_and(u8::is_ascii_digit)
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        let radix_prefix = self.bytes[self.pos] == b'0'
            && matches!(
                self.bytes.get(self.pos + 1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            );
        if radix_prefix {
            self.pos += 2;
            while self
                .bytes
                .get(self.pos)
                .is_some_and(|b| b.is_ascii_hexdigit() || *b == b'_')
            {
                self.pos += 1;
            }
        } else {
            self.eat_digits();
            if self.bytes.get(self.pos) == Some(&b'.') {
                self.pos += 1;
                self.eat_digits();
            }
            if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
                let mut lookahead = self.pos + 1;
                if matches!(self.bytes.get(lookahead), Some(b'+' | b'-')) {
                    lookahead += 1;
                }
                if self.bytes.get(lookahead).is_some_and(u8::is_ascii_digit) {
                    self.pos = lookahead;
                    self.eat_digits();
                }
            }
            if matches!(self.bytes.get(self.pos), Some(b'j' | b'J')) {
                self.pos += 1;
            }
        }
        self.push_token(SyntaxKind::NumericLiteral, start, self.pos);
    }

    fn eat_digits(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit() || *b == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_identifier_or_string(&mut self) -> Result<(), ScanError> {
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|&b| is_identifier_part(b))
        {
            self.pos += 1;
        }
        let source = self.source;
        let text = &source[start..self.pos];
        if matches!(self.bytes.get(self.pos), Some(b'"' | b'\'')) && is_string_prefix(text) {
            return self.scan_string(start);
        }
        let kind = text_to_keyword(text).unwrap_or(SyntaxKind::Identifier);
        self.push_token(kind, start, self.pos);
        Ok(())
    }

    /// Scan a string literal whose prefix (if any) begins at `start` and
    /// whose opening quote is at the current position.
    fn scan_string(&mut self, start: usize) -> Result<(), ScanError> {
        let token_line = self.line;
        let token_column = self.column_of(start);
        let quote = self.bytes[self.pos];
        let triple = self.bytes.get(self.pos + 1) == Some(&quote)
            && self.bytes.get(self.pos + 2) == Some(&quote);
        self.pos += if triple { 3 } else { 1 };

        let unterminated = ScanError::UnterminatedString {
            line: token_line,
            column: token_column,
        };
        loop {
            let Some(&byte) = self.bytes.get(self.pos) else {
                return Err(unterminated);
            };
            match byte {
                b'\\' => {
                    self.pos += 1;
                    if matches!(self.bytes.get(self.pos), Some(b'\n' | b'\r')) {
                        self.consume_newline();
                    } else if self.pos < self.bytes.len() {
                        self.pos += 1;
                    }
                }
                b'\n' | b'\r' => {
                    if !triple {
                        return Err(unterminated);
                    }
                    self.consume_newline();
                }
                b if b == quote => {
                    if !triple {
                        self.pos += 1;
                        break;
                    }
                    if self.bytes.get(self.pos + 1) == Some(&quote)
                        && self.bytes.get(self.pos + 2) == Some(&quote)
                    {
                        self.pos += 3;
                        break;
                    }
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }

        self.tokens.push(Token {
            kind: SyntaxKind::StringLiteral,
            start: start as u32,
            end: self.pos as u32,
            line: token_line,
            column: token_column,
        });
        Ok(())
    }

    fn scan_punctuation(&mut self) -> Result<(), ScanError> {
        let rest = &self.bytes[self.pos..];
        let Some((text, kind)) = PUNCTUATION
            .iter()
            .find(|(text, _)| rest.starts_with(text.as_bytes()))
        else {
            let ch = self.source[self.pos..].chars().next().unwrap_or('\0');
            return Err(ScanError::UnexpectedCharacter {
                ch,
                line: self.line,
                column: self.column_of(self.pos),
            });
        };

        match kind {
            SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken
            | SyntaxKind::OpenBraceToken => self.bracket_depth += 1,
            SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::CloseBraceToken => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
            }
            _ => {}
        }
        let start = self.pos;
        self.pos += text.len();
        self.push_token(*kind, start, self.pos);
        Ok(())
    }
}

#[inline]
const fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

#[inline]
const fn is_identifier_part(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

fn is_string_prefix(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "r" | "u" | "f" | "b" | "br" | "rb" | "fr" | "rf"
    )
}

#[cfg(test)]
#[path = "../tests/scanner_impl_tests.rs"]
mod scanner_impl_tests;
