//! Parser state - statement parsing methods

use tyg_scanner::{SyntaxKind, token_is_augmented_assignment};

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{ParseError, ParseResult, ParserState};

impl ParserState<'_> {
    // =========================================================================
    // Parse Methods - Module and blocks
    // =========================================================================

    /// Parse the whole token stream into a `Module` node.
    pub fn parse_source_file(&mut self) -> ParseResult<NodeIndex> {
        let mut body = NodeList::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            if self.parse_optional(SyntaxKind::NewLineToken) {
                continue;
            }
            if self.is_token(SyntaxKind::IndentToken) {
                return Err(self.error_expected("statement"));
            }
            self.parse_statement(&mut body)?;
        }
        Ok(self.arena.add_node(NodeData::Module { body }, 1, 0))
    }

    /// Parse `: suite`, either an indented block or simple statements on
    /// the same line.
    pub(crate) fn parse_block(&mut self) -> ParseResult<NodeList> {
        self.parse_expected(SyntaxKind::ColonToken, "':'")?;
        let mut body = NodeList::new();
        if !self.parse_optional(SyntaxKind::NewLineToken) {
            self.parse_simple_statements(&mut body)?;
            return Ok(body);
        }

        self.parse_expected(SyntaxKind::IndentToken, "indented block")?;
        while !self.is_token(SyntaxKind::DedentToken) && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::NewLineToken) {
                continue;
            }
            self.parse_statement(&mut body)?;
        }
        self.parse_optional(SyntaxKind::DedentToken);
        Ok(body)
    }

    pub(crate) fn parse_statement(&mut self, out: &mut NodeList) -> ParseResult<()> {
        self.enter()?;
        let result = self.parse_statement_worker(out);
        self.leave();
        result
    }

    fn parse_statement_worker(&mut self, out: &mut NodeList) -> ParseResult<()> {
        let statement = match self.token() {
            SyntaxKind::DefKeyword => self.parse_function_definition(NodeList::new())?,
            SyntaxKind::ClassKeyword => self.parse_class_definition(NodeList::new())?,
            SyntaxKind::AtToken => self.parse_decorated()?,
            SyntaxKind::IfKeyword => self.parse_if_statement()?,
            SyntaxKind::ForKeyword => self.parse_for_statement()?,
            SyntaxKind::WhileKeyword => self.parse_while_statement()?,
            SyntaxKind::TryKeyword => self.parse_try_statement()?,
            SyntaxKind::WithKeyword => self.parse_with_statement()?,
            SyntaxKind::AsyncKeyword => match self.peek_kind(1) {
                SyntaxKind::DefKeyword => self.parse_function_definition(NodeList::new())?,
                SyntaxKind::ForKeyword => self.parse_for_statement()?,
                SyntaxKind::WithKeyword => self.parse_with_statement()?,
                _ => return Err(self.error_expected("'def', 'for' or 'with' after 'async'")),
            },
            _ => return self.parse_simple_statements(out),
        };
        out.push(statement);
        Ok(())
    }

    /// Parse `small_stmt (';' small_stmt)* [';'] NEWLINE`.
    pub(crate) fn parse_simple_statements(&mut self, out: &mut NodeList) -> ParseResult<()> {
        loop {
            let statement = self.parse_small_statement()?;
            out.push(statement);
            if !self.parse_optional(SyntaxKind::SemicolonToken) {
                break;
            }
            if self.is_token(SyntaxKind::NewLineToken) || self.is_token(SyntaxKind::EndOfFileToken) {
                break;
            }
        }
        if !self.is_token(SyntaxKind::EndOfFileToken) {
            self.parse_expected(SyntaxKind::NewLineToken, "newline")?;
        }
        Ok(())
    }

    pub(crate) fn at_statement_end(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::NewLineToken | SyntaxKind::SemicolonToken | SyntaxKind::EndOfFileToken
        )
    }

    // =========================================================================
    // Parse Methods - Compound statements
    // =========================================================================

    fn parse_decorated(&mut self) -> ParseResult<NodeIndex> {
        let mut decorators = NodeList::new();
        while self.parse_optional(SyntaxKind::AtToken) {
            let decorator = self.parse_named_expression()?;
            decorators.push(decorator);
            self.parse_expected(SyntaxKind::NewLineToken, "newline after decorator")?;
        }
        match self.token() {
            SyntaxKind::DefKeyword => self.parse_function_definition(decorators),
            SyntaxKind::AsyncKeyword if self.peek_kind(1) == SyntaxKind::DefKeyword => {
                self.parse_function_definition(decorators)
            }
            SyntaxKind::ClassKeyword => self.parse_class_definition(decorators),
            _ => Err(self.error_unsupported("decorator on a statement other than def or class")),
        }
    }

    /// Parse `[async] def name(params) [-> annotation]: suite`.
    ///
    /// The node is located at the `def` (or `async`) keyword, not at the
    /// first decorator.
    pub(crate) fn parse_function_definition(
        &mut self,
        decorators: NodeList,
    ) -> ParseResult<NodeIndex> {
        let start = self.current();
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        self.parse_expected(SyntaxKind::DefKeyword, "'def'")?;
        let name = self.parse_identifier_text()?;
        self.parse_expected(SyntaxKind::OpenParenToken, "'('")?;
        let params = self.parse_parameter_list(SyntaxKind::CloseParenToken, true)?;
        self.parse_expected(SyntaxKind::CloseParenToken, "')'")?;
        let returns = if self.parse_optional(SyntaxKind::MinusGreaterThanToken) {
            self.parse_test()?
        } else {
            NodeIndex::NONE
        };
        let body = self.parse_block()?;
        Ok(self.add(
            NodeData::FunctionDef {
                name,
                decorators,
                params,
                returns,
                body,
                is_async,
            },
            start,
        ))
    }

    /// Parse parameters up to (not including) `closing`.
    ///
    /// Lambdas pass `annotated = false` because their parameter list ends at
    /// a colon.
    pub(crate) fn parse_parameter_list(
        &mut self,
        closing: SyntaxKind,
        annotated: bool,
    ) -> ParseResult<NodeList> {
        let mut params = NodeList::new();
        let mut keyword_only = false;
        while !self.is_token(closing) {
            let start = self.current();
            match start.kind {
                SyntaxKind::SlashToken => {
                    self.next_token();
                    self.mark_positional_only(&params);
                }
                SyntaxKind::AsteriskToken => {
                    self.next_token();
                    keyword_only = true;
                    if !self.is_token(SyntaxKind::CommaToken) && !self.is_token(closing) {
                        let param = self.parse_parameter(ParamKind::VarArgs, annotated, start)?;
                        params.push(param);
                    }
                }
                SyntaxKind::AsteriskAsteriskToken => {
                    self.next_token();
                    let param = self.parse_parameter(ParamKind::KwArgs, annotated, start)?;
                    params.push(param);
                }
                SyntaxKind::Identifier => {
                    let kind = if keyword_only {
                        ParamKind::KeywordOnly
                    } else {
                        ParamKind::Normal
                    };
                    let param = self.parse_parameter(kind, annotated, start)?;
                    params.push(param);
                }
                _ => return Err(self.error_expected("parameter")),
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_parameter(
        &mut self,
        kind: ParamKind,
        annotated: bool,
        start: tyg_scanner::Token,
    ) -> ParseResult<NodeIndex> {
        let name = self.parse_identifier_text()?;
        let annotation = if annotated && self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_test()?
        } else {
            NodeIndex::NONE
        };
        let takes_default = matches!(
            kind,
            ParamKind::Normal | ParamKind::KeywordOnly | ParamKind::PositionalOnly
        );
        let default = if takes_default && self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_test()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.add(
            NodeData::Parameter {
                name,
                kind,
                annotation,
                default,
            },
            start,
        ))
    }

    fn mark_positional_only(&mut self, params: &NodeList) {
        for param in params {
            if let Some(node) = self.arena.get_mut(*param)
                && let NodeData::Parameter { kind, .. } = &mut node.data
                && *kind == ParamKind::Normal
            {
                *kind = ParamKind::PositionalOnly;
            }
        }
    }

    fn parse_class_definition(&mut self, decorators: NodeList) -> ParseResult<NodeIndex> {
        let start = self.parse_expected(SyntaxKind::ClassKeyword, "'class'")?;
        let name = self.parse_identifier_text()?;
        let bases = if self.parse_optional(SyntaxKind::OpenParenToken) {
            let bases = self.parse_argument_list()?;
            self.parse_expected(SyntaxKind::CloseParenToken, "')'")?;
            bases
        } else {
            NodeList::new()
        };
        let body = self.parse_block()?;
        Ok(self.add(
            NodeData::ClassDef {
                name,
                decorators,
                bases,
                body,
            },
            start,
        ))
    }

    /// Parse `if`/`elif`. An `elif` chain becomes an `If` nested in `orelse`.
    fn parse_if_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        let test = self.parse_named_expression()?;
        let body = self.parse_block()?;
        let orelse = match self.token() {
            SyntaxKind::ElifKeyword => NodeList::from(vec![self.parse_if_statement()?]),
            SyntaxKind::ElseKeyword => {
                self.next_token();
                self.parse_block()?
            }
            _ => NodeList::new(),
        };
        Ok(self.add(NodeData::If { test, body, orelse }, start))
    }

    fn parse_for_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.current();
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        self.parse_expected(SyntaxKind::ForKeyword, "'for'")?;
        let target = self.parse_target_list()?;
        self.parse_expected(SyntaxKind::InKeyword, "'in'")?;
        let iter = self.parse_star_expressions()?;
        let body = self.parse_block()?;
        let orelse = self.parse_else_block()?;
        Ok(self.add(
            NodeData::For {
                target,
                iter,
                body,
                orelse,
                is_async,
            },
            start,
        ))
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        let test = self.parse_named_expression()?;
        let body = self.parse_block()?;
        let orelse = self.parse_else_block()?;
        Ok(self.add(NodeData::While { test, body, orelse }, start))
    }

    fn parse_else_block(&mut self) -> ParseResult<NodeList> {
        if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_block()
        } else {
            Ok(NodeList::new())
        }
    }

    fn parse_try_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        let body = self.parse_block()?;

        let mut handlers = NodeList::new();
        while self.is_token(SyntaxKind::ExceptKeyword) {
            let handler_start = self.next_token();
            if self.is_token(SyntaxKind::AsteriskToken) {
                return Err(self.error_unsupported("except*"));
            }
            let type_expr = if self.is_token(SyntaxKind::ColonToken) {
                NodeIndex::NONE
            } else {
                self.parse_test()?
            };
            let name = if self.parse_optional(SyntaxKind::AsKeyword) {
                Some(self.parse_identifier_text()?)
            } else {
                None
            };
            let handler_body = self.parse_block()?;
            let handler = self.add(
                NodeData::ExceptHandler {
                    type_expr,
                    name,
                    body: handler_body,
                },
                handler_start,
            );
            handlers.push(handler);
        }

        let orelse = if handlers.is_empty() {
            NodeList::new()
        } else {
            self.parse_else_block()?
        };
        let finalbody = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()?
        } else {
            NodeList::new()
        };
        if handlers.is_empty() && finalbody.is_empty() {
            return Err(self.error_expected("'except' or 'finally'"));
        }
        Ok(self.add(
            NodeData::Try {
                body,
                handlers,
                orelse,
                finalbody,
            },
            start,
        ))
    }

    fn parse_with_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.current();
        let is_async = self.parse_optional(SyntaxKind::AsyncKeyword);
        self.parse_expected(SyntaxKind::WithKeyword, "'with'")?;
        let mut items = NodeList::new();
        loop {
            let context = self.parse_test()?;
            let target = if self.parse_optional(SyntaxKind::AsKeyword) {
                let target = self.parse_star_target()?;
                self.check_assignment_target(target)?;
                target
            } else {
                NodeIndex::NONE
            };
            let item = self.add_at(NodeData::WithItem { context, target }, context);
            items.push(item);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let body = self.parse_block()?;
        Ok(self.add(
            NodeData::With {
                items,
                body,
                is_async,
            },
            start,
        ))
    }

    // =========================================================================
    // Parse Methods - Simple statements
    // =========================================================================

    fn parse_small_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.current();
        match start.kind {
            SyntaxKind::PassKeyword => {
                self.next_token();
                Ok(self.add(NodeData::Pass, start))
            }
            SyntaxKind::BreakKeyword => {
                self.next_token();
                Ok(self.add(NodeData::Break, start))
            }
            SyntaxKind::ContinueKeyword => {
                self.next_token();
                Ok(self.add(NodeData::Continue, start))
            }
            SyntaxKind::ReturnKeyword => {
                self.next_token();
                let value = if self.at_statement_end() {
                    NodeIndex::NONE
                } else {
                    self.parse_star_expressions()?
                };
                Ok(self.add(NodeData::Return { value }, start))
            }
            SyntaxKind::RaiseKeyword => {
                self.next_token();
                let (exc, cause) = if self.at_statement_end() {
                    (NodeIndex::NONE, NodeIndex::NONE)
                } else {
                    let exc = self.parse_test()?;
                    let cause = if self.parse_optional(SyntaxKind::FromKeyword) {
                        self.parse_test()?
                    } else {
                        NodeIndex::NONE
                    };
                    (exc, cause)
                };
                Ok(self.add(NodeData::Raise { exc, cause }, start))
            }
            SyntaxKind::GlobalKeyword | SyntaxKind::NonlocalKeyword => {
                self.next_token();
                let mut names = vec![self.parse_identifier_text()?];
                while self.parse_optional(SyntaxKind::CommaToken) {
                    names.push(self.parse_identifier_text()?);
                }
                let data = if start.kind == SyntaxKind::GlobalKeyword {
                    NodeData::Global { names }
                } else {
                    NodeData::Nonlocal { names }
                };
                Ok(self.add(data, start))
            }
            SyntaxKind::DelKeyword => {
                self.next_token();
                let mut targets = NodeList::new();
                loop {
                    let target = self.parse_bitor_expression()?;
                    self.check_assignment_target(target)?;
                    targets.push(target);
                    if !self.parse_optional(SyntaxKind::CommaToken) || self.at_statement_end() {
                        break;
                    }
                }
                Ok(self.add(NodeData::Delete { targets }, start))
            }
            SyntaxKind::AssertKeyword => {
                self.next_token();
                let test = self.parse_test()?;
                let msg = if self.parse_optional(SyntaxKind::CommaToken) {
                    self.parse_test()?
                } else {
                    NodeIndex::NONE
                };
                Ok(self.add(NodeData::Assert { test, msg }, start))
            }
            SyntaxKind::ImportKeyword => self.parse_import_statement(),
            SyntaxKind::FromKeyword => self.parse_import_from_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_dotted_name(&mut self) -> ParseResult<String> {
        let mut name = self.parse_identifier_text()?;
        while self.parse_optional(SyntaxKind::DotToken) {
            name.push('.');
            name.push_str(&self.parse_identifier_text()?);
        }
        Ok(name)
    }

    fn parse_import_alias(&mut self, dotted: bool) -> ParseResult<NodeIndex> {
        let start = self.current();
        let name = if dotted {
            self.parse_dotted_name()?
        } else {
            self.parse_identifier_text()?
        };
        let asname = if self.parse_optional(SyntaxKind::AsKeyword) {
            Some(self.parse_identifier_text()?)
        } else {
            None
        };
        Ok(self.add(NodeData::Alias { name, asname }, start))
    }

    fn parse_import_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        let mut names = NodeList::new();
        loop {
            let alias = self.parse_import_alias(true)?;
            names.push(alias);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        Ok(self.add(NodeData::Import { names }, start))
    }

    fn parse_import_from_statement(&mut self) -> ParseResult<NodeIndex> {
        let start = self.next_token();
        let mut level = 0u32;
        loop {
            match self.token() {
                SyntaxKind::DotToken => level += 1,
                SyntaxKind::DotDotDotToken => level += 3,
                _ => break,
            }
            self.next_token();
        }
        let module = if self.is_token(SyntaxKind::Identifier) {
            Some(self.parse_dotted_name()?)
        } else {
            None
        };
        if module.is_none() && level == 0 {
            return Err(self.error_expected("module name"));
        }
        self.parse_expected(SyntaxKind::ImportKeyword, "'import'")?;

        let mut names = NodeList::new();
        let star = self.current();
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            let alias = self.add(
                NodeData::Alias {
                    name: "*".to_string(),
                    asname: None,
                },
                star,
            );
            names.push(alias);
        } else {
            let parenthesized = self.parse_optional(SyntaxKind::OpenParenToken);
            loop {
                let alias = self.parse_import_alias(false)?;
                names.push(alias);
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
                if parenthesized && self.is_token(SyntaxKind::CloseParenToken) {
                    break;
                }
            }
            if parenthesized {
                self.parse_expected(SyntaxKind::CloseParenToken, "')'")?;
            }
        }
        Ok(self.add(
            NodeData::ImportFrom {
                module,
                names,
                level,
            },
            start,
        ))
    }

    /// Expression statements and the three assignment forms.
    fn parse_expression_statement(&mut self) -> ParseResult<NodeIndex> {
        let first = if self.is_token(SyntaxKind::YieldKeyword) {
            self.parse_yield_expression()?
        } else {
            self.parse_star_expressions()?
        };

        let kind = self.token();
        if kind == SyntaxKind::ColonToken {
            self.next_token();
            self.check_assignment_target(first)?;
            let annotation = self.parse_test()?;
            let value = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_value()?
            } else {
                NodeIndex::NONE
            };
            return Ok(self.add_at(
                NodeData::AnnAssign {
                    target: first,
                    annotation,
                    value,
                },
                first,
            ));
        }

        if token_is_augmented_assignment(kind) {
            self.next_token();
            self.check_assignment_target(first)?;
            let value = self.parse_assignment_value()?;
            return Ok(self.add_at(
                NodeData::AugAssign {
                    target: first,
                    op: augmented_operator(kind),
                    value,
                },
                first,
            ));
        }

        if kind == SyntaxKind::EqualsToken {
            self.check_assignment_target(first)?;
            let mut targets = NodeList::from(vec![first]);
            let value = loop {
                self.next_token();
                let next = self.parse_assignment_value()?;
                if self.is_token(SyntaxKind::EqualsToken) {
                    self.check_assignment_target(next)?;
                    targets.push(next);
                } else {
                    break next;
                }
            };
            return Ok(self.add_at(NodeData::Assign { targets, value }, first));
        }

        Ok(self.add_at(NodeData::ExprStmt { value: first }, first))
    }

    fn parse_assignment_value(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::YieldKeyword) {
            self.parse_yield_expression()
        } else {
            self.parse_star_expressions()
        }
    }

    /// Reject expressions that cannot be bound to.
    pub(crate) fn check_assignment_target(&self, target: NodeIndex) -> ParseResult<()> {
        let Some(node) = self.arena.get(target) else {
            return Ok(());
        };
        match &node.data {
            NodeData::Name { .. } | NodeData::Attribute { .. } | NodeData::Subscript { .. } => {
                Ok(())
            }
            NodeData::Starred { value } => self.check_assignment_target(*value),
            NodeData::Tuple { elts } | NodeData::List { elts } => {
                for elt in elts {
                    self.check_assignment_target(*elt)?;
                }
                Ok(())
            }
            other => Err(ParseError::InvalidTarget {
                kind: other.kind_name(),
                line: node.line,
                column: node.column,
            }),
        }
    }
}

fn augmented_operator(kind: SyntaxKind) -> BinaryOp {
    match kind {
        SyntaxKind::MinusEqualsToken => BinaryOp::Sub,
        SyntaxKind::AsteriskEqualsToken => BinaryOp::Mult,
        SyntaxKind::AsteriskAsteriskEqualsToken => BinaryOp::Pow,
        SyntaxKind::SlashEqualsToken => BinaryOp::Div,
        SyntaxKind::SlashSlashEqualsToken => BinaryOp::FloorDiv,
        SyntaxKind::PercentEqualsToken => BinaryOp::Mod,
        SyntaxKind::AtEqualsToken => BinaryOp::MatMult,
        SyntaxKind::AmpersandEqualsToken => BinaryOp::BitAnd,
        SyntaxKind::BarEqualsToken => BinaryOp::BitOr,
        SyntaxKind::CaretEqualsToken => BinaryOp::BitXor,
        SyntaxKind::LessThanLessThanEqualsToken => BinaryOp::LShift,
        SyntaxKind::GreaterThanGreaterThanEqualsToken => BinaryOp::RShift,
        _ => BinaryOp::Add,
    }
}
