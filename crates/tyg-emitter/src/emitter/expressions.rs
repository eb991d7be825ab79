use super::{Precedence, Printer};
use tyg_parser::{BinaryOp, ConstantValue, NodeData, NodeIndex, NodeList};

impl Printer<'_> {
    // =========================================================================
    // Expressions
    // =========================================================================

    /// Emit an expression in a context that needs at least `required`
    /// binding strength, adding parentheses when the node binds weaker.
    ///
    /// An assignment expression is never left bare where a tuple or a
    /// `yield` would be accepted: those are statement-level positions.
    pub(super) fn emit_expression(&mut self, index: NodeIndex, required: Precedence) {
        let own = self.precedence_of(index);
        let parenthesize =
            own < required || (own == Precedence::NamedExpr && required < Precedence::NamedExpr);
        if parenthesize {
            self.write("(");
        }
        self.emit_expression_worker(index, own);
        if parenthesize {
            self.write(")");
        }
    }

    fn emit_expression_worker(&mut self, index: NodeIndex, own: Precedence) {
        let arena = self.arena;
        let Some(node) = arena.get(index) else {
            return;
        };
        match &node.data {
            NodeData::BoolOp { op, values } => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.write_space();
                        self.write(op.as_str());
                        self.write_space();
                    }
                    self.emit_expression(*value, own.next());
                }
            }
            NodeData::NamedExpr { target, value } => {
                self.emit_expression(*target, Precedence::Atom);
                self.write(" := ");
                self.emit_expression(*value, Precedence::Test);
            }
            NodeData::BinOp { left, op, right } => {
                // `**` binds right-to-left and accepts a unary operand on
                // its right.
                let (left_required, right_required) = if *op == BinaryOp::Pow {
                    (own.next(), Precedence::Factor)
                } else {
                    (own, own.next())
                };
                self.emit_expression(*left, left_required);
                self.write_space();
                self.write(op.as_str());
                self.write_space();
                self.emit_expression(*right, right_required);
            }
            NodeData::UnaryOp { op, operand } => {
                self.write(op.as_str());
                self.emit_expression(*operand, own);
            }
            NodeData::Lambda { params, body } => {
                self.write("lambda");
                if !params.is_empty() {
                    self.write_space();
                    self.emit_parameters(params, false);
                }
                self.write(": ");
                self.emit_expression(*body, Precedence::Test);
            }
            NodeData::IfExp { test, body, orelse } => {
                self.emit_expression(*body, Precedence::Or);
                self.write(" if ");
                self.emit_expression(*test, Precedence::Or);
                self.write(" else ");
                self.emit_expression(*orelse, Precedence::Test);
            }
            NodeData::Dict { keys, values } => {
                self.write("{");
                for (i, (key, value)) in keys.iter().zip(values).enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if key.is_none() {
                        self.write("**");
                        self.emit_expression(*value, Precedence::BitOr);
                    } else {
                        self.emit_expression(*key, Precedence::Test);
                        self.write(": ");
                        self.emit_expression(*value, Precedence::Test);
                    }
                }
                self.write("}");
            }
            NodeData::Set { elts } => {
                if elts.is_empty() {
                    self.write("set()");
                } else {
                    self.write("{");
                    self.emit_comma_list(&elts.nodes, Precedence::NamedExpr);
                    self.write("}");
                }
            }
            NodeData::List { elts } => {
                self.write("[");
                self.emit_comma_list(&elts.nodes, Precedence::NamedExpr);
                self.write("]");
            }
            NodeData::Tuple { elts } => self.emit_tuple(elts),
            NodeData::ListComp { elt, generators } => {
                self.write("[");
                self.emit_expression(*elt, Precedence::NamedExpr);
                self.emit_generators(generators);
                self.write("]");
            }
            NodeData::SetComp { elt, generators } => {
                self.write("{");
                self.emit_expression(*elt, Precedence::NamedExpr);
                self.emit_generators(generators);
                self.write("}");
            }
            NodeData::GeneratorExp { elt, generators } => {
                self.write("(");
                self.emit_expression(*elt, Precedence::NamedExpr);
                self.emit_generators(generators);
                self.write(")");
            }
            NodeData::DictComp {
                key,
                value,
                generators,
            } => {
                self.write("{");
                self.emit_expression(*key, Precedence::Test);
                self.write(": ");
                self.emit_expression(*value, Precedence::Test);
                self.emit_generators(generators);
                self.write("}");
            }
            NodeData::Await { value } => {
                self.write("await ");
                self.emit_expression(*value, Precedence::Atom);
            }
            NodeData::Yield { value } => {
                self.write("yield");
                if value.is_some() {
                    self.write_space();
                    self.emit_expression(*value, Precedence::Tuple);
                }
            }
            NodeData::YieldFrom { value } => {
                self.write("yield from ");
                self.emit_expression(*value, Precedence::Test);
            }
            NodeData::Compare {
                left,
                ops,
                comparators,
            } => {
                self.emit_expression(*left, own.next());
                for (op, comparator) in ops.iter().zip(comparators) {
                    self.write_space();
                    self.write(op.as_str());
                    self.write_space();
                    self.emit_expression(*comparator, own.next());
                }
            }
            NodeData::Call { func, args } => {
                self.emit_expression(*func, Precedence::Atom);
                self.write("(");
                self.emit_call_arguments(args);
                self.write(")");
            }
            NodeData::Constant { value } => self.emit_constant(value),
            NodeData::Attribute { value, attr } => {
                // `1.real` would lex as a float.
                let int_receiver = matches!(
                    arena.data(*value),
                    Some(NodeData::Constant {
                        value: ConstantValue::Int(_)
                    })
                );
                if int_receiver {
                    self.write("(");
                    self.emit_expression(*value, Precedence::Test);
                    self.write(")");
                } else {
                    self.emit_expression(*value, Precedence::Atom);
                }
                self.write(".");
                self.write(attr);
            }
            NodeData::Subscript { value, slice } => {
                self.emit_expression(*value, Precedence::Atom);
                self.write("[");
                self.emit_expression(*slice, Precedence::Tuple);
                self.write("]");
            }
            NodeData::Starred { value } => {
                self.write("*");
                self.emit_expression(*value, Precedence::BitOr);
            }
            NodeData::Name { id } => self.write(id),
            NodeData::Slice { lower, upper, step } => {
                if lower.is_some() {
                    self.emit_expression(*lower, Precedence::Test);
                }
                self.write(":");
                if upper.is_some() {
                    self.emit_expression(*upper, Precedence::Test);
                }
                if step.is_some() {
                    self.write(":");
                    self.emit_expression(*step, Precedence::Test);
                }
            }
            NodeData::Keyword { arg, value } => {
                if let Some(arg) = arg {
                    self.write(arg);
                    self.write("=");
                    self.emit_expression(*value, Precedence::Test);
                } else {
                    self.write("**");
                    self.emit_expression(*value, Precedence::BitOr);
                }
            }
            NodeData::Parameter { name, .. } | NodeData::Alias { name, .. } => self.write(name),
            NodeData::WithItem { context, .. } => {
                self.emit_expression(*context, Precedence::Test);
            }
            NodeData::Comprehension { .. } => self.emit_generator(index),
            // Statements and handlers are never nested inside expressions.
            NodeData::Module { .. }
            | NodeData::FunctionDef { .. }
            | NodeData::ClassDef { .. }
            | NodeData::Return { .. }
            | NodeData::Delete { .. }
            | NodeData::Assign { .. }
            | NodeData::AugAssign { .. }
            | NodeData::AnnAssign { .. }
            | NodeData::For { .. }
            | NodeData::While { .. }
            | NodeData::If { .. }
            | NodeData::With { .. }
            | NodeData::Raise { .. }
            | NodeData::Try { .. }
            | NodeData::Assert { .. }
            | NodeData::Import { .. }
            | NodeData::ImportFrom { .. }
            | NodeData::Global { .. }
            | NodeData::Nonlocal { .. }
            | NodeData::ExprStmt { .. }
            | NodeData::Pass
            | NodeData::Break
            | NodeData::Continue
            | NodeData::ExceptHandler { .. } => {}
        }
    }

    /// Tuples of two or more elements print bare when the context accepts a
    /// tuple; empty and one-element tuples always carry their parentheses.
    fn emit_tuple(&mut self, elts: &NodeList) {
        match elts.nodes.as_slice() {
            [] => self.write("()"),
            [only] => {
                self.write("(");
                self.emit_expression(*only, Precedence::NamedExpr);
                self.write(",)");
            }
            items => self.emit_comma_list(items, Precedence::NamedExpr),
        }
    }

    fn emit_constant(&mut self, value: &ConstantValue) {
        match value {
            ConstantValue::None => self.write("None"),
            ConstantValue::True => self.write("True"),
            ConstantValue::False => self.write("False"),
            ConstantValue::Ellipsis => self.write("..."),
            ConstantValue::Int(raw)
            | ConstantValue::Float(raw)
            | ConstantValue::Complex(raw)
            | ConstantValue::Str(raw)
            | ConstantValue::Bytes(raw) => self.write(raw),
        }
    }

    /// Arguments of a call. A sole generator argument keeps its own
    /// parentheses only.
    fn emit_call_arguments(&mut self, args: &NodeList) {
        let arena = self.arena;
        if args.len() == 1
            && let Some(only) = args.first()
            && let Some(NodeData::GeneratorExp { elt, generators }) = arena.data(only)
        {
            self.emit_expression(*elt, Precedence::NamedExpr);
            self.emit_generators(generators);
            return;
        }
        self.emit_comma_list(&args.nodes, Precedence::NamedExpr);
    }

    fn emit_generators(&mut self, generators: &NodeList) {
        for generator in generators {
            self.write_space();
            self.emit_generator(*generator);
        }
    }

    fn emit_generator(&mut self, index: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::Comprehension {
            target,
            iter,
            ifs,
            is_async,
        }) = arena.data(index)
        else {
            return;
        };
        if *is_async {
            self.write("async ");
        }
        self.write("for ");
        self.emit_expression(*target, Precedence::Tuple);
        self.write(" in ");
        self.emit_expression(*iter, Precedence::Or);
        for condition in ifs {
            self.write(" if ");
            self.emit_expression(*condition, Precedence::Or);
        }
    }
}
