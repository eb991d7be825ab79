//! Parser state - expression parsing methods

use tyg_scanner::SyntaxKind;

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{ParseResult, ParserState};

impl ParserState<'_> {
    // =========================================================================
    // Parse Methods - Expression lists
    // =========================================================================

    /// Parse `star_expressions`: one expression, or a bare tuple when
    /// followed by commas (`return a, b`, `x = 1, 2`).
    pub(crate) fn parse_star_expressions(&mut self) -> ParseResult<NodeIndex> {
        let first = self.parse_star_or_named_expression()?;
        if !self.is_token(SyntaxKind::CommaToken) {
            return Ok(first);
        }
        let mut elts = NodeList::from(vec![first]);
        while self.parse_optional(SyntaxKind::CommaToken) {
            if self.at_expression_list_end() {
                break;
            }
            let elt = self.parse_star_or_named_expression()?;
            elts.push(elt);
        }
        Ok(self.add_at(NodeData::Tuple { elts }, first))
    }

    fn at_expression_list_end(&self) -> bool {
        let kind = self.token();
        self.at_statement_end()
            || tyg_scanner::token_is_augmented_assignment(kind)
            || matches!(
                kind,
                SyntaxKind::EqualsToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::InKeyword
            )
    }

    fn parse_star_or_named_expression(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::AsteriskToken) {
            let start = self.next_token();
            let value = self.parse_bitor_expression()?;
            return Ok(self.add(NodeData::Starred { value }, start));
        }
        self.parse_named_expression()
    }

    /// Parse an assignment target list (`for` targets, `with ... as`).
    pub(crate) fn parse_target_list(&mut self) -> ParseResult<NodeIndex> {
        let first = self.parse_star_target()?;
        let target = if self.is_token(SyntaxKind::CommaToken) {
            let mut elts = NodeList::from(vec![first]);
            while self.parse_optional(SyntaxKind::CommaToken) {
                if self.at_expression_list_end() {
                    break;
                }
                let elt = self.parse_star_target()?;
                elts.push(elt);
            }
            self.add_at(NodeData::Tuple { elts }, first)
        } else {
            first
        };
        self.check_assignment_target(target)?;
        Ok(target)
    }

    pub(crate) fn parse_star_target(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::AsteriskToken) {
            let start = self.next_token();
            let value = self.parse_bitor_expression()?;
            return Ok(self.add(NodeData::Starred { value }, start));
        }
        self.parse_bitor_expression()
    }

    // =========================================================================
    // Parse Methods - Expressions
    // =========================================================================

    /// Parse `name := value` or a plain test.
    pub(crate) fn parse_named_expression(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::Identifier) && self.peek_kind(1) == SyntaxKind::ColonEqualsToken
        {
            let start = self.next_token();
            let target = self.add(
                NodeData::Name {
                    id: self.text_of(start).to_string(),
                },
                start,
            );
            self.next_token();
            let value = self.parse_test()?;
            return Ok(self.add(NodeData::NamedExpr { target, value }, start));
        }
        self.parse_test()
    }

    /// Parse `lambda`, or `or_test ['if' or_test 'else' test]`.
    pub(crate) fn parse_test(&mut self) -> ParseResult<NodeIndex> {
        self.enter()?;
        let result = self.parse_test_worker();
        self.leave();
        result
    }

    fn parse_test_worker(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::LambdaKeyword) {
            return self.parse_lambda();
        }
        let body = self.parse_or_test()?;
        if !self.parse_optional(SyntaxKind::IfKeyword) {
            return Ok(body);
        }
        let test = self.parse_or_test()?;
        self.parse_expected(SyntaxKind::ElseKeyword, "'else'")?;
        let orelse = self.parse_test()?;
        Ok(self.add_at(NodeData::IfExp { test, body, orelse }, body))
    }

    fn parse_lambda(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        let params = self.parse_parameter_list(SyntaxKind::ColonToken, false)?;
        self.parse_expected(SyntaxKind::ColonToken, "':'")?;
        let body = self.parse_test()?;
        Ok(self.add(NodeData::Lambda { params, body }, start))
    }

    pub(crate) fn parse_or_test(&mut self) -> ParseResult<NodeIndex> {
        let first = self.parse_and_test()?;
        if !self.is_token(SyntaxKind::OrKeyword) {
            return Ok(first);
        }
        let mut values = NodeList::from(vec![first]);
        while self.parse_optional(SyntaxKind::OrKeyword) {
            let value = self.parse_and_test()?;
            values.push(value);
        }
        Ok(self.add_at(
            NodeData::BoolOp {
                op: BoolOp::Or,
                values,
            },
            first,
        ))
    }

    fn parse_and_test(&mut self) -> ParseResult<NodeIndex> {
        let first = self.parse_not_test()?;
        if !self.is_token(SyntaxKind::AndKeyword) {
            return Ok(first);
        }
        let mut values = NodeList::from(vec![first]);
        while self.parse_optional(SyntaxKind::AndKeyword) {
            let value = self.parse_not_test()?;
            values.push(value);
        }
        Ok(self.add_at(
            NodeData::BoolOp {
                op: BoolOp::And,
                values,
            },
            first,
        ))
    }

    fn parse_not_test(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::NotKeyword) {
            let start = self.next_token();
            self.enter()?;
            let operand = self.parse_not_test();
            self.leave();
            let operand = operand?;
            return Ok(self.add(
                NodeData::UnaryOp {
                    op: UnaryOp::Not,
                    operand,
                },
                start,
            ));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<NodeIndex> {
        let left = self.parse_bitor_expression()?;
        let mut ops = Vec::new();
        let mut comparators = NodeList::new();
        loop {
            let op = match self.token() {
                SyntaxKind::LessThanToken => CmpOp::Lt,
                SyntaxKind::GreaterThanToken => CmpOp::Gt,
                SyntaxKind::EqualsEqualsToken => CmpOp::Eq,
                SyntaxKind::GreaterThanEqualsToken => CmpOp::GtE,
                SyntaxKind::LessThanEqualsToken => CmpOp::LtE,
                SyntaxKind::ExclamationEqualsToken => CmpOp::NotEq,
                SyntaxKind::InKeyword => CmpOp::In,
                SyntaxKind::NotKeyword if self.peek_kind(1) == SyntaxKind::InKeyword => {
                    self.next_token();
                    CmpOp::NotIn
                }
                SyntaxKind::IsKeyword if self.peek_kind(1) == SyntaxKind::NotKeyword => {
                    self.next_token();
                    CmpOp::IsNot
                }
                SyntaxKind::IsKeyword => CmpOp::Is,
                _ => break,
            };
            self.next_token();
            ops.push(op);
            let right = self.parse_bitor_expression()?;
            comparators.push(right);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(self.add_at(
            NodeData::Compare {
                left,
                ops,
                comparators,
            },
            left,
        ))
    }

    pub(crate) fn parse_bitor_expression(&mut self) -> ParseResult<NodeIndex> {
        self.parse_binary_expression(1)
    }

    /// Precedence climbing over the binary operator levels.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> ParseResult<NodeIndex> {
        let mut left = self.parse_factor()?;
        while let Some((op, precedence)) = binary_operator(self.token())
            && precedence >= min_precedence
        {
            self.next_token();
            let right = self.parse_binary_expression(precedence + 1)?;
            left = self.add_at(NodeData::BinOp { left, op, right }, left);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<NodeIndex> {
        let op = match self.token() {
            SyntaxKind::PlusToken => UnaryOp::UAdd,
            SyntaxKind::MinusToken => UnaryOp::USub,
            SyntaxKind::TildeToken => UnaryOp::Invert,
            _ => return self.parse_power(),
        };
        let start = self.next_token();
        self.enter()?;
        let operand = self.parse_factor();
        self.leave();
        let operand = operand?;
        Ok(self.add(NodeData::UnaryOp { op, operand }, start))
    }

    /// `**` is right-associative and binds tighter than unary minus on its
    /// left but not on its right (`-2 ** -1`).
    fn parse_power(&mut self) -> ParseResult<NodeIndex> {
        let base = if self.is_token(SyntaxKind::AwaitKeyword) {
            let start = self.next_token();
            let value = self.parse_primary()?;
            self.add(NodeData::Await { value }, start)
        } else {
            self.parse_primary()?
        };
        if !self.parse_optional(SyntaxKind::AsteriskAsteriskToken) {
            return Ok(base);
        }
        self.enter()?;
        let exponent = self.parse_factor();
        self.leave();
        let right = exponent?;
        Ok(self.add_at(
            NodeData::BinOp {
                left: base,
                op: BinaryOp::Pow,
                right,
            },
            base,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<NodeIndex> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.token() {
                SyntaxKind::OpenParenToken => {
                    self.next_token();
                    let args = self.parse_argument_list()?;
                    self.parse_expected(SyntaxKind::CloseParenToken, "')'")?;
                    expr = self.add_at(NodeData::Call { func: expr, args }, expr);
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let slice = self.parse_subscript_list()?;
                    self.parse_expected(SyntaxKind::CloseBracketToken, "']'")?;
                    expr = self.add_at(NodeData::Subscript { value: expr, slice }, expr);
                }
                SyntaxKind::DotToken => {
                    self.next_token();
                    let attr = self.parse_identifier_text()?;
                    expr = self.add_at(NodeData::Attribute { value: expr, attr }, expr);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Parse call arguments up to (not including) the closing parenthesis.
    pub(crate) fn parse_argument_list(&mut self) -> ParseResult<NodeList> {
        let mut args = NodeList::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            let start = self.current();
            let arg = match start.kind {
                SyntaxKind::AsteriskToken => {
                    self.next_token();
                    let value = self.parse_test()?;
                    self.add(NodeData::Starred { value }, start)
                }
                SyntaxKind::AsteriskAsteriskToken => {
                    self.next_token();
                    let value = self.parse_test()?;
                    self.add(NodeData::Keyword { arg: None, value }, start)
                }
                SyntaxKind::Identifier if self.peek_kind(1) == SyntaxKind::EqualsToken => {
                    let arg = self.parse_identifier_text()?;
                    self.next_token();
                    let value = self.parse_test()?;
                    self.add(
                        NodeData::Keyword {
                            arg: Some(arg),
                            value,
                        },
                        start,
                    )
                }
                _ => {
                    let value = self.parse_named_expression()?;
                    if self.is_comprehension_start() {
                        let generators = self.parse_comprehension_clauses()?;
                        self.add_at(
                            NodeData::GeneratorExp {
                                elt: value,
                                generators,
                            },
                            value,
                        )
                    } else {
                        value
                    }
                }
            };
            args.push(arg);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        Ok(args)
    }

    fn parse_subscript_list(&mut self) -> ParseResult<NodeIndex> {
        let first = self.parse_subscript()?;
        if !self.is_token(SyntaxKind::CommaToken) {
            return Ok(first);
        }
        let mut elts = NodeList::from(vec![first]);
        while self.parse_optional(SyntaxKind::CommaToken) {
            if self.is_token(SyntaxKind::CloseBracketToken) {
                break;
            }
            let elt = self.parse_subscript()?;
            elts.push(elt);
        }
        Ok(self.add_at(NodeData::Tuple { elts }, first))
    }

    fn parse_subscript(&mut self) -> ParseResult<NodeIndex> {
        let start = self.current();
        let lower = if self.is_token(SyntaxKind::ColonToken) {
            NodeIndex::NONE
        } else {
            self.parse_star_or_named_expression()?
        };
        if !self.parse_optional(SyntaxKind::ColonToken) {
            return Ok(lower);
        }
        let upper = if self.at_slice_part_end() {
            NodeIndex::NONE
        } else {
            self.parse_test()?
        };
        let step = if self.parse_optional(SyntaxKind::ColonToken) && !self.at_slice_part_end() {
            self.parse_test()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.add(NodeData::Slice { lower, upper, step }, start))
    }

    fn at_slice_part_end(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::CloseBracketToken
        )
    }

    fn parse_atom(&mut self) -> ParseResult<NodeIndex> {
        let start = self.current();
        match start.kind {
            SyntaxKind::Identifier => {
                self.next_token();
                Ok(self.add(
                    NodeData::Name {
                        id: self.text_of(start).to_string(),
                    },
                    start,
                ))
            }
            SyntaxKind::NumericLiteral => {
                self.next_token();
                let value = classify_number(self.text_of(start));
                Ok(self.add(NodeData::Constant { value }, start))
            }
            SyntaxKind::StringLiteral => Ok(self.parse_string_literal()),
            SyntaxKind::NoneKeyword | SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                self.next_token();
                let value = match start.kind {
                    SyntaxKind::NoneKeyword => ConstantValue::None,
                    SyntaxKind::TrueKeyword => ConstantValue::True,
                    _ => ConstantValue::False,
                };
                Ok(self.add(NodeData::Constant { value }, start))
            }
            SyntaxKind::DotDotDotToken => {
                self.next_token();
                Ok(self.add(
                    NodeData::Constant {
                        value: ConstantValue::Ellipsis,
                    },
                    start,
                ))
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized(),
            SyntaxKind::OpenBracketToken => self.parse_list_display(),
            SyntaxKind::OpenBraceToken => self.parse_brace_display(),
            _ => Err(self.error_expected("expression")),
        }
    }

    /// Adjacent string literals are joined into one constant.
    fn parse_string_literal(&mut self) -> NodeIndex {
        let first = self.next_token();
        let mut raw = self.text_of(first).to_string();
        while self.is_token(SyntaxKind::StringLiteral) {
            let next = self.next_token();
            raw.push(' ');
            raw.push_str(self.text_of(next));
        }
        let prefix_end = raw.find(['"', '\'']).unwrap_or(0);
        let value = if raw[..prefix_end].contains(['b', 'B']) {
            ConstantValue::Bytes(raw)
        } else {
            ConstantValue::Str(raw)
        };
        self.add(NodeData::Constant { value }, first)
    }

    fn parse_parenthesized(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        if self.parse_optional(SyntaxKind::CloseParenToken) {
            return Ok(self.add(
                NodeData::Tuple {
                    elts: NodeList::new(),
                },
                start,
            ));
        }
        if self.is_token(SyntaxKind::YieldKeyword) {
            let expr = self.parse_yield_expression()?;
            self.parse_expected(SyntaxKind::CloseParenToken, "')'")?;
            return Ok(expr);
        }

        let first = self.parse_star_or_named_expression()?;
        if self.is_comprehension_start() {
            let generators = self.parse_comprehension_clauses()?;
            self.parse_expected(SyntaxKind::CloseParenToken, "')'")?;
            return Ok(self.add(
                NodeData::GeneratorExp {
                    elt: first,
                    generators,
                },
                start,
            ));
        }
        if !self.is_token(SyntaxKind::CommaToken) {
            self.parse_expected(SyntaxKind::CloseParenToken, "')'")?;
            return Ok(first);
        }
        let elts = self.parse_display_tail(first, SyntaxKind::CloseParenToken)?;
        Ok(self.add(NodeData::Tuple { elts }, start))
    }

    fn parse_list_display(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        if self.parse_optional(SyntaxKind::CloseBracketToken) {
            return Ok(self.add(
                NodeData::List {
                    elts: NodeList::new(),
                },
                start,
            ));
        }
        let first = self.parse_star_or_named_expression()?;
        if self.is_comprehension_start() {
            let generators = self.parse_comprehension_clauses()?;
            self.parse_expected(SyntaxKind::CloseBracketToken, "']'")?;
            return Ok(self.add(
                NodeData::ListComp {
                    elt: first,
                    generators,
                },
                start,
            ));
        }
        let elts = self.parse_display_tail(first, SyntaxKind::CloseBracketToken)?;
        Ok(self.add(NodeData::List { elts }, start))
    }

    /// Parse `(',' element)* [','] closing` after the first element.
    fn parse_display_tail(
        &mut self,
        first: NodeIndex,
        closing: SyntaxKind,
    ) -> ParseResult<NodeList> {
        let mut elts = NodeList::from(vec![first]);
        while self.parse_optional(SyntaxKind::CommaToken) {
            if self.is_token(closing) {
                break;
            }
            let elt = self.parse_star_or_named_expression()?;
            elts.push(elt);
        }
        self.parse_expected(closing, "closing bracket")?;
        Ok(elts)
    }

    fn parse_brace_display(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        if self.parse_optional(SyntaxKind::CloseBraceToken) {
            return Ok(self.add(
                NodeData::Dict {
                    keys: NodeList::new(),
                    values: NodeList::new(),
                },
                start,
            ));
        }

        let is_dict = self.is_token(SyntaxKind::AsteriskAsteriskToken);
        let first = if is_dict {
            NodeIndex::NONE
        } else {
            self.parse_star_or_named_expression()?
        };
        if !is_dict && !self.is_token(SyntaxKind::ColonToken) {
            if self.is_comprehension_start() {
                let generators = self.parse_comprehension_clauses()?;
                self.parse_expected(SyntaxKind::CloseBraceToken, "'}'")?;
                return Ok(self.add(
                    NodeData::SetComp {
                        elt: first,
                        generators,
                    },
                    start,
                ));
            }
            let elts = self.parse_display_tail(first, SyntaxKind::CloseBraceToken)?;
            return Ok(self.add(NodeData::Set { elts }, start));
        }

        let mut keys = NodeList::new();
        let mut values = NodeList::new();
        if is_dict {
            self.next_token();
            keys.push(NodeIndex::NONE);
            values.push(self.parse_bitor_expression()?);
        } else {
            self.next_token();
            let value = self.parse_test()?;
            if self.is_comprehension_start() {
                let generators = self.parse_comprehension_clauses()?;
                self.parse_expected(SyntaxKind::CloseBraceToken, "'}'")?;
                return Ok(self.add(
                    NodeData::DictComp {
                        key: first,
                        value,
                        generators,
                    },
                    start,
                ));
            }
            keys.push(first);
            values.push(value);
        }

        while self.parse_optional(SyntaxKind::CommaToken) {
            if self.is_token(SyntaxKind::CloseBraceToken) {
                break;
            }
            if self.parse_optional(SyntaxKind::AsteriskAsteriskToken) {
                keys.push(NodeIndex::NONE);
                values.push(self.parse_bitor_expression()?);
                continue;
            }
            let key = self.parse_test()?;
            self.parse_expected(SyntaxKind::ColonToken, "':'")?;
            let value = self.parse_test()?;
            keys.push(key);
            values.push(value);
        }
        self.parse_expected(SyntaxKind::CloseBraceToken, "'}'")?;
        Ok(self.add(NodeData::Dict { keys, values }, start))
    }

    fn is_comprehension_start(&self) -> bool {
        self.is_token(SyntaxKind::ForKeyword)
            || (self.is_token(SyntaxKind::AsyncKeyword)
                && self.peek_kind(1) == SyntaxKind::ForKeyword)
    }

    fn parse_comprehension_clauses(&mut self) -> ParseResult<NodeList> {
        let mut generators = NodeList::new();
        while self.is_comprehension_start() {
            let start = self.current();
            let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
            self.parse_expected(SyntaxKind::ForKeyword, "'for'")?;
            let target = self.parse_target_list()?;
            self.parse_expected(SyntaxKind::InKeyword, "'in'")?;
            let iter = self.parse_or_test()?;
            let mut ifs = NodeList::new();
            while self.parse_optional(SyntaxKind::IfKeyword) {
                let condition = self.parse_or_test()?;
                ifs.push(condition);
            }
            let generator = self.add(
                NodeData::Comprehension {
                    target,
                    iter,
                    ifs,
                    is_async,
                },
                start,
            );
            generators.push(generator);
        }
        Ok(generators)
    }

    /// Parse `yield`, `yield value(s)` or `yield from value`.
    pub(crate) fn parse_yield_expression(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        if self.parse_optional(SyntaxKind::FromKeyword) {
            let value = self.parse_test()?;
            return Ok(self.add(NodeData::YieldFrom { value }, start));
        }
        let value = if self.at_expression_list_end() {
            NodeIndex::NONE
        } else {
            self.parse_star_expressions()?
        };
        Ok(self.add(NodeData::Yield { value }, start))
    }
}

/// Binary operator and its precedence level (higher binds tighter).
fn binary_operator(kind: SyntaxKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        SyntaxKind::BarToken => (BinaryOp::BitOr, 1),
        SyntaxKind::CaretToken => (BinaryOp::BitXor, 2),
        SyntaxKind::AmpersandToken => (BinaryOp::BitAnd, 3),
        SyntaxKind::LessThanLessThanToken => (BinaryOp::LShift, 4),
        SyntaxKind::GreaterThanGreaterThanToken => (BinaryOp::RShift, 4),
        SyntaxKind::PlusToken => (BinaryOp::Add, 5),
        SyntaxKind::MinusToken => (BinaryOp::Sub, 5),
        SyntaxKind::AsteriskToken => (BinaryOp::Mult, 6),
        SyntaxKind::AtToken => (BinaryOp::MatMult, 6),
        SyntaxKind::SlashToken => (BinaryOp::Div, 6),
        SyntaxKind::SlashSlashToken => (BinaryOp::FloorDiv, 6),
        SyntaxKind::PercentToken => (BinaryOp::Mod, 6),
        _ => return None,
    };
    Some(entry)
}

fn classify_number(text: &str) -> ConstantValue {
    let lowered = text.to_ascii_lowercase();
    if lowered.ends_with('j') {
        ConstantValue::Complex(text.to_string())
    } else if lowered.starts_with("0x") || lowered.starts_with("0o") || lowered.starts_with("0b") {
        ConstantValue::Int(text.to_string())
    } else if lowered.contains(['.', 'e']) {
        ConstantValue::Float(text.to_string())
    } else {
        ConstantValue::Int(text.to_string())
    }
}
