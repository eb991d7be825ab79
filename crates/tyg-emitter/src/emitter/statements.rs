use super::{Precedence, Printer};
use tyg_parser::{NodeData, NodeIndex, NodeList, ParamKind};

impl Printer<'_> {
    // =========================================================================
    // Statement lists
    // =========================================================================

    /// Emit a statement list at the current indentation.
    ///
    /// Definitions are separated from their neighbours by two blank lines at
    /// module level and by one blank line inside bodies. An empty list prints
    /// `pass`.
    pub(super) fn emit_statement_list(&mut self, statements: &[NodeIndex], top_level: bool) {
        if statements.is_empty() {
            if !top_level {
                self.write("pass");
                self.write_line();
            }
            return;
        }
        let gap = if top_level { 2 } else { 1 };
        let mut previous_is_definition = false;
        for (i, statement) in statements.iter().enumerate() {
            let is_definition = matches!(
                self.arena.data(*statement),
                Some(NodeData::FunctionDef { .. } | NodeData::ClassDef { .. })
            );
            if i > 0 && (is_definition || previous_is_definition) {
                self.write_blank_lines(gap);
            }
            self.emit_statement(*statement);
            previous_is_definition = is_definition;
        }
    }

    /// Emit `:` followed by an indented block.
    fn emit_suite(&mut self, body: &NodeList) {
        self.write(":");
        self.write_line();
        self.increase_indent();
        self.emit_statement_list(&body.nodes, false);
        self.decrease_indent();
    }

    fn emit_else(&mut self, keyword: &str, body: &NodeList) {
        if body.is_empty() {
            return;
        }
        self.write(keyword);
        self.emit_suite(body);
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(super) fn emit_statement(&mut self, index: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(index) else {
            return;
        };
        match &node.data {
            NodeData::FunctionDef { .. } => self.emit_function_def(index),
            NodeData::ClassDef {
                name,
                decorators,
                bases,
                body,
            } => {
                self.emit_decorators(decorators);
                self.write("class ");
                self.write(name);
                if !bases.is_empty() {
                    self.write("(");
                    self.emit_comma_list(&bases.nodes, Precedence::NamedExpr);
                    self.write(")");
                }
                self.emit_suite(body);
            }
            NodeData::Return { value } => {
                self.write("return");
                if value.is_some() {
                    self.write_space();
                    self.emit_expression(*value, Precedence::Tuple);
                }
                self.write_line();
            }
            NodeData::Delete { targets } => {
                self.write("del ");
                self.emit_comma_list(&targets.nodes, Precedence::BitOr);
                self.write_line();
            }
            NodeData::Assign { targets, value } => {
                for target in targets {
                    self.emit_expression(*target, Precedence::Tuple);
                    self.write(" = ");
                }
                self.emit_expression(*value, Precedence::Yield);
                self.write_line();
            }
            NodeData::AugAssign { target, op, value } => {
                self.emit_expression(*target, Precedence::Atom);
                self.write_space();
                self.write(op.as_str());
                self.write("= ");
                self.emit_expression(*value, Precedence::Yield);
                self.write_line();
            }
            NodeData::AnnAssign {
                target,
                annotation,
                value,
            } => {
                self.emit_expression(*target, Precedence::Atom);
                self.write(": ");
                self.emit_expression(*annotation, Precedence::Test);
                if value.is_some() {
                    self.write(" = ");
                    self.emit_expression(*value, Precedence::Yield);
                }
                self.write_line();
            }
            NodeData::For {
                target,
                iter,
                body,
                orelse,
                is_async,
            } => {
                if *is_async {
                    self.write("async ");
                }
                self.write("for ");
                self.emit_expression(*target, Precedence::Tuple);
                self.write(" in ");
                self.emit_expression(*iter, Precedence::Tuple);
                self.emit_suite(body);
                self.emit_else("else", orelse);
            }
            NodeData::While { test, body, orelse } => {
                self.write("while ");
                self.emit_expression(*test, Precedence::NamedExpr);
                self.emit_suite(body);
                self.emit_else("else", orelse);
            }
            NodeData::If { .. } => self.emit_if(index, "if "),
            NodeData::With {
                items,
                body,
                is_async,
            } => {
                if *is_async {
                    self.write("async ");
                }
                self.write("with ");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_with_item(*item);
                }
                self.emit_suite(body);
            }
            NodeData::Raise { exc, cause } => {
                self.write("raise");
                if exc.is_some() {
                    self.write_space();
                    self.emit_expression(*exc, Precedence::Test);
                }
                if cause.is_some() {
                    self.write(" from ");
                    self.emit_expression(*cause, Precedence::Test);
                }
                self.write_line();
            }
            NodeData::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                self.write("try");
                self.emit_suite(body);
                for handler in handlers {
                    self.emit_except_handler(*handler);
                }
                self.emit_else("else", orelse);
                self.emit_else("finally", finalbody);
            }
            NodeData::Assert { test, msg } => {
                self.write("assert ");
                self.emit_expression(*test, Precedence::Test);
                if msg.is_some() {
                    self.write(", ");
                    self.emit_expression(*msg, Precedence::Test);
                }
                self.write_line();
            }
            NodeData::Import { names } => {
                self.write("import ");
                self.emit_aliases(names);
                self.write_line();
            }
            NodeData::ImportFrom {
                module,
                names,
                level,
            } => {
                self.write("from ");
                for _ in 0..*level {
                    self.write(".");
                }
                if let Some(module) = module {
                    self.write(module);
                }
                self.write(" import ");
                self.emit_aliases(names);
                self.write_line();
            }
            NodeData::Global { names } => {
                self.write("global ");
                self.write_names(names);
                self.write_line();
            }
            NodeData::Nonlocal { names } => {
                self.write("nonlocal ");
                self.write_names(names);
                self.write_line();
            }
            NodeData::ExprStmt { value } => {
                self.emit_expression(*value, Precedence::Yield);
                self.write_line();
            }
            NodeData::Pass => {
                self.write("pass");
                self.write_line();
            }
            NodeData::Break => {
                self.write("break");
                self.write_line();
            }
            NodeData::Continue => {
                self.write("continue");
                self.write_line();
            }
            // Expression nodes never sit in a statement list; print them as
            // expression statements so nothing is silently dropped.
            _ => {
                self.emit_expression(index, Precedence::Yield);
                self.write_line();
            }
        }
    }

    /// `if`/`elif` chain. An `else` branch holding exactly one `if` is
    /// printed as `elif`.
    fn emit_if(&mut self, index: NodeIndex, keyword: &str) {
        let arena = self.arena;
        let Some(NodeData::If { test, body, orelse }) = arena.data(index) else {
            return;
        };
        self.write(keyword);
        self.emit_expression(*test, Precedence::NamedExpr);
        self.emit_suite(body);
        if orelse.len() == 1
            && let Some(only) = orelse.first()
            && matches!(arena.data(only), Some(NodeData::If { .. }))
        {
            self.emit_if(only, "elif ");
            return;
        }
        self.emit_else("else", orelse);
    }

    fn emit_decorators(&mut self, decorators: &NodeList) {
        for decorator in decorators {
            self.write("@");
            self.emit_expression(*decorator, Precedence::NamedExpr);
            self.write_line();
        }
    }

    fn emit_function_def(&mut self, index: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::FunctionDef {
            name,
            decorators,
            params,
            returns,
            body,
            is_async,
        }) = arena.data(index)
        else {
            return;
        };
        self.emit_decorators(decorators);
        if *is_async {
            self.write("async ");
        }
        self.write("def ");
        self.write(name);
        self.write("(");
        self.emit_parameters(params, true);
        self.write(")");
        if returns.is_some() {
            self.write(" -> ");
            self.emit_expression(*returns, Precedence::Test);
        }
        self.emit_suite(body);
    }

    /// Parameter list, rebuilding the `/` and bare `*` markers from the
    /// parameter kinds.
    pub(super) fn emit_parameters(&mut self, params: &NodeList, annotated: bool) {
        let arena = self.arena;
        let mut first = true;
        let mut previous_kind: Option<ParamKind> = None;
        for param in params {
            let Some(NodeData::Parameter {
                name,
                kind,
                annotation,
                default,
            }) = arena.data(*param)
            else {
                continue;
            };
            if previous_kind == Some(ParamKind::PositionalOnly)
                && *kind != ParamKind::PositionalOnly
            {
                self.write_separator(&mut first);
                self.write("/");
            }
            if *kind == ParamKind::KeywordOnly
                && !matches!(
                    previous_kind,
                    Some(ParamKind::KeywordOnly | ParamKind::VarArgs)
                )
            {
                self.write_separator(&mut first);
                self.write("*");
            }
            self.write_separator(&mut first);
            match kind {
                ParamKind::VarArgs => self.write("*"),
                ParamKind::KwArgs => self.write("**"),
                _ => {}
            }
            self.write(name);
            let has_annotation = annotated && annotation.is_some();
            if has_annotation {
                self.write(": ");
                self.emit_expression(*annotation, Precedence::Test);
            }
            if default.is_some() {
                self.write(if has_annotation { " = " } else { "=" });
                self.emit_expression(*default, Precedence::Test);
            }
            previous_kind = Some(*kind);
        }
        if previous_kind == Some(ParamKind::PositionalOnly) {
            self.write_separator(&mut first);
            self.write("/");
        }
    }

    fn write_separator(&mut self, first: &mut bool) {
        if !*first {
            self.write(", ");
        }
        *first = false;
    }

    fn emit_with_item(&mut self, item: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::WithItem { context, target }) = arena.data(item) else {
            return;
        };
        self.emit_expression(*context, Precedence::Test);
        if target.is_some() {
            self.write(" as ");
            self.emit_expression(*target, Precedence::Tuple);
        }
    }

    fn emit_except_handler(&mut self, handler: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::ExceptHandler {
            type_expr,
            name,
            body,
        }) = arena.data(handler)
        else {
            return;
        };
        self.write("except");
        if type_expr.is_some() {
            self.write_space();
            self.emit_expression(*type_expr, Precedence::Test);
            if let Some(name) = name {
                self.write(" as ");
                self.write(name);
            }
        }
        self.emit_suite(body);
    }

    fn emit_aliases(&mut self, names: &NodeList) {
        let arena = self.arena;
        let mut first = true;
        for alias in names {
            let Some(NodeData::Alias { name, asname }) = arena.data(*alias) else {
                continue;
            };
            self.write_separator(&mut first);
            self.write(name);
            if let Some(asname) = asname {
                self.write(" as ");
                self.write(asname);
            }
        }
    }
}
