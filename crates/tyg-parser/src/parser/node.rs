//! Node types for the arena tree.
//!
//! Every syntactic construct is one variant of the closed [`NodeData`] sum
//! type. Child references are [`NodeIndex`] values; optional children use
//! [`NodeIndex::NONE`]. Source locations live on [`Node`] and never take part
//! in structural comparisons.

use super::base::{NodeIndex, NodeList};

// =============================================================================
// Operators
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mult => "*",
            Self::MatMult => "@",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::LShift => "<<",
            Self::RShift => ">>",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
        }
    }

    /// Arithmetic operators take part in numeric widening.
    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mult | Self::Div | Self::FloorDiv | Self::Mod | Self::Pow
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Invert,
    UAdd,
    USub,
}

impl UnaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Not => "not ",
            Self::Invert => "~",
            Self::UAdd => "+",
            Self::USub => "-",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtE => "<=",
            Self::Gt => ">",
            Self::GtE => ">=",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

/// How a parameter binds its argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Declared before a `/` marker.
    PositionalOnly,
    Normal,
    /// `*args`
    VarArgs,
    /// Declared after `*` or `*args`.
    KeywordOnly,
    /// `**kwargs`
    KwArgs,
}

/// Literal value. Numbers and strings keep their source spelling so the
/// printer reproduces them exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    None,
    True,
    False,
    Ellipsis,
    Int(String),
    Float(String),
    Complex(String),
    /// Raw text including prefix and quotes. Adjacent literals are joined
    /// with a single space.
    Str(String),
    Bytes(String),
}

// =============================================================================
// Nodes
// =============================================================================

/// Kind tag plus structural fields of one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Module {
        body: NodeList,
    },

    // Statements
    FunctionDef {
        name: String,
        decorators: NodeList,
        params: NodeList,
        returns: NodeIndex,
        body: NodeList,
        is_async: bool,
    },
    ClassDef {
        name: String,
        decorators: NodeList,
        /// Base classes and class keywords (`metaclass=...`).
        bases: NodeList,
        body: NodeList,
    },
    Return {
        value: NodeIndex,
    },
    Delete {
        targets: NodeList,
    },
    Assign {
        targets: NodeList,
        value: NodeIndex,
    },
    AugAssign {
        target: NodeIndex,
        op: BinaryOp,
        value: NodeIndex,
    },
    AnnAssign {
        target: NodeIndex,
        annotation: NodeIndex,
        value: NodeIndex,
    },
    For {
        target: NodeIndex,
        iter: NodeIndex,
        body: NodeList,
        orelse: NodeList,
        is_async: bool,
    },
    While {
        test: NodeIndex,
        body: NodeList,
        orelse: NodeList,
    },
    If {
        test: NodeIndex,
        body: NodeList,
        orelse: NodeList,
    },
    With {
        items: NodeList,
        body: NodeList,
        is_async: bool,
    },
    Raise {
        exc: NodeIndex,
        cause: NodeIndex,
    },
    Try {
        body: NodeList,
        handlers: NodeList,
        orelse: NodeList,
        finalbody: NodeList,
    },
    Assert {
        test: NodeIndex,
        msg: NodeIndex,
    },
    Import {
        names: NodeList,
    },
    ImportFrom {
        /// `None` for `from . import x`.
        module: Option<String>,
        names: NodeList,
        /// Number of leading dots.
        level: u32,
    },
    Global {
        names: Vec<String>,
    },
    Nonlocal {
        names: Vec<String>,
    },
    ExprStmt {
        value: NodeIndex,
    },
    Pass,
    Break,
    Continue,

    // Expressions
    BoolOp {
        op: BoolOp,
        values: NodeList,
    },
    NamedExpr {
        target: NodeIndex,
        value: NodeIndex,
    },
    BinOp {
        left: NodeIndex,
        op: BinaryOp,
        right: NodeIndex,
    },
    UnaryOp {
        op: UnaryOp,
        operand: NodeIndex,
    },
    Lambda {
        params: NodeList,
        body: NodeIndex,
    },
    IfExp {
        test: NodeIndex,
        body: NodeIndex,
        orelse: NodeIndex,
    },
    Dict {
        /// `NONE` marks a `**mapping` entry.
        keys: NodeList,
        values: NodeList,
    },
    Set {
        elts: NodeList,
    },
    ListComp {
        elt: NodeIndex,
        generators: NodeList,
    },
    SetComp {
        elt: NodeIndex,
        generators: NodeList,
    },
    DictComp {
        key: NodeIndex,
        value: NodeIndex,
        generators: NodeList,
    },
    GeneratorExp {
        elt: NodeIndex,
        generators: NodeList,
    },
    Await {
        value: NodeIndex,
    },
    Yield {
        value: NodeIndex,
    },
    YieldFrom {
        value: NodeIndex,
    },
    Compare {
        left: NodeIndex,
        ops: Vec<CmpOp>,
        comparators: NodeList,
    },
    Call {
        func: NodeIndex,
        /// Positional, `Starred` and `Keyword` arguments in source order.
        args: NodeList,
    },
    Constant {
        value: ConstantValue,
    },
    Attribute {
        value: NodeIndex,
        attr: String,
    },
    Subscript {
        value: NodeIndex,
        slice: NodeIndex,
    },
    Starred {
        value: NodeIndex,
    },
    Name {
        id: String,
    },
    List {
        elts: NodeList,
    },
    Tuple {
        elts: NodeList,
    },
    Slice {
        lower: NodeIndex,
        upper: NodeIndex,
        step: NodeIndex,
    },

    // Auxiliary
    Parameter {
        name: String,
        kind: ParamKind,
        annotation: NodeIndex,
        default: NodeIndex,
    },
    Keyword {
        /// `None` for `**kwargs` unpacking.
        arg: Option<String>,
        value: NodeIndex,
    },
    Alias {
        name: String,
        asname: Option<String>,
    },
    WithItem {
        context: NodeIndex,
        target: NodeIndex,
    },
    ExceptHandler {
        type_expr: NodeIndex,
        name: Option<String>,
        body: NodeList,
    },
    Comprehension {
        target: NodeIndex,
        iter: NodeIndex,
        ifs: NodeList,
        is_async: bool,
    },
}

/// Visit every child slot of a node in source order.
///
/// `$data` may be `&NodeData` or `&mut NodeData`; default binding modes make
/// the closure receive `&NodeIndex` or `&mut NodeIndex` accordingly. Empty
/// optional slots are visited too.
macro_rules! visit_slots {
    ($data:expr, $visit:expr) => {{
        let mut visit = $visit;
        match $data {
            NodeData::Module { body } => {
                for child in body {
                    visit(child);
                }
            }
            NodeData::FunctionDef {
                decorators,
                params,
                returns,
                body,
                ..
            } => {
                for child in decorators {
                    visit(child);
                }
                for child in params {
                    visit(child);
                }
                visit(returns);
                for child in body {
                    visit(child);
                }
            }
            NodeData::ClassDef {
                decorators,
                bases,
                body,
                ..
            } => {
                for child in decorators {
                    visit(child);
                }
                for child in bases {
                    visit(child);
                }
                for child in body {
                    visit(child);
                }
            }
            NodeData::Return { value }
            | NodeData::ExprStmt { value }
            | NodeData::Await { value }
            | NodeData::Yield { value }
            | NodeData::YieldFrom { value }
            | NodeData::Starred { value }
            | NodeData::Attribute { value, .. }
            | NodeData::Keyword { value, .. } => visit(value),
            NodeData::Delete { targets } => {
                for child in targets {
                    visit(child);
                }
            }
            NodeData::Assign { targets, value } => {
                for child in targets {
                    visit(child);
                }
                visit(value);
            }
            NodeData::AugAssign { target, value, .. } | NodeData::NamedExpr { target, value } => {
                visit(target);
                visit(value);
            }
            NodeData::AnnAssign {
                target,
                annotation,
                value,
            } => {
                visit(target);
                visit(annotation);
                visit(value);
            }
            NodeData::For {
                target,
                iter,
                body,
                orelse,
                ..
            } => {
                visit(target);
                visit(iter);
                for child in body {
                    visit(child);
                }
                for child in orelse {
                    visit(child);
                }
            }
            NodeData::While { test, body, orelse } | NodeData::If { test, body, orelse } => {
                visit(test);
                for child in body {
                    visit(child);
                }
                for child in orelse {
                    visit(child);
                }
            }
            NodeData::With { items, body, .. } => {
                for child in items {
                    visit(child);
                }
                for child in body {
                    visit(child);
                }
            }
            NodeData::Raise { exc, cause } => {
                visit(exc);
                visit(cause);
            }
            NodeData::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                for child in body {
                    visit(child);
                }
                for child in handlers {
                    visit(child);
                }
                for child in orelse {
                    visit(child);
                }
                for child in finalbody {
                    visit(child);
                }
            }
            NodeData::Assert { test, msg } => {
                visit(test);
                visit(msg);
            }
            NodeData::Import { names } | NodeData::ImportFrom { names, .. } => {
                for child in names {
                    visit(child);
                }
            }
            NodeData::Global { .. }
            | NodeData::Nonlocal { .. }
            | NodeData::Pass
            | NodeData::Break
            | NodeData::Continue
            | NodeData::Constant { .. }
            | NodeData::Name { .. }
            | NodeData::Alias { .. } => {}
            NodeData::BoolOp { values, .. } => {
                for child in values {
                    visit(child);
                }
            }
            NodeData::BinOp { left, right, .. } => {
                visit(left);
                visit(right);
            }
            NodeData::UnaryOp { operand, .. } => visit(operand),
            NodeData::Lambda { params, body } => {
                for child in params {
                    visit(child);
                }
                visit(body);
            }
            NodeData::IfExp { test, body, orelse } => {
                visit(body);
                visit(test);
                visit(orelse);
            }
            NodeData::Dict { keys, values } => {
                for (key, value) in keys.into_iter().zip(values) {
                    visit(key);
                    visit(value);
                }
            }
            NodeData::Set { elts } | NodeData::List { elts } | NodeData::Tuple { elts } => {
                for child in elts {
                    visit(child);
                }
            }
            NodeData::ListComp { elt, generators }
            | NodeData::SetComp { elt, generators }
            | NodeData::GeneratorExp { elt, generators } => {
                visit(elt);
                for child in generators {
                    visit(child);
                }
            }
            NodeData::DictComp {
                key,
                value,
                generators,
            } => {
                visit(key);
                visit(value);
                for child in generators {
                    visit(child);
                }
            }
            NodeData::Compare {
                left, comparators, ..
            } => {
                visit(left);
                for child in comparators {
                    visit(child);
                }
            }
            NodeData::Call { func, args } => {
                visit(func);
                for child in args {
                    visit(child);
                }
            }
            NodeData::Subscript { value, slice } => {
                visit(value);
                visit(slice);
            }
            NodeData::Slice { lower, upper, step } => {
                visit(lower);
                visit(upper);
                visit(step);
            }
            NodeData::Parameter {
                annotation,
                default,
                ..
            } => {
                visit(annotation);
                visit(default);
            }
            NodeData::WithItem { context, target } => {
                visit(context);
                visit(target);
            }
            NodeData::ExceptHandler {
                type_expr, body, ..
            } => {
                visit(type_expr);
                for child in body {
                    visit(child);
                }
            }
            NodeData::Comprehension {
                target, iter, ifs, ..
            } => {
                visit(target);
                visit(iter);
                for child in ifs {
                    visit(child);
                }
            }
        }
    }};
}

impl NodeData {
    /// Call `f` for every present child, in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(NodeIndex)) {
        visit_slots!(self, |child: &NodeIndex| {
            if child.is_some() {
                f(*child);
            }
        });
    }

    /// Call `f` with every child slot, including empty optional ones.
    pub fn for_each_slot_mut(&mut self, f: impl FnMut(&mut NodeIndex)) {
        visit_slots!(self, f);
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Module { .. } => "Module",
            Self::FunctionDef { .. } => "FunctionDef",
            Self::ClassDef { .. } => "ClassDef",
            Self::Return { .. } => "Return",
            Self::Delete { .. } => "Delete",
            Self::Assign { .. } => "Assign",
            Self::AugAssign { .. } => "AugAssign",
            Self::AnnAssign { .. } => "AnnAssign",
            Self::For { .. } => "For",
            Self::While { .. } => "While",
            Self::If { .. } => "If",
            Self::With { .. } => "With",
            Self::Raise { .. } => "Raise",
            Self::Try { .. } => "Try",
            Self::Assert { .. } => "Assert",
            Self::Import { .. } => "Import",
            Self::ImportFrom { .. } => "ImportFrom",
            Self::Global { .. } => "Global",
            Self::Nonlocal { .. } => "Nonlocal",
            Self::ExprStmt { .. } => "Expr",
            Self::Pass => "Pass",
            Self::Break => "Break",
            Self::Continue => "Continue",
            Self::BoolOp { .. } => "BoolOp",
            Self::NamedExpr { .. } => "NamedExpr",
            Self::BinOp { .. } => "BinOp",
            Self::UnaryOp { .. } => "UnaryOp",
            Self::Lambda { .. } => "Lambda",
            Self::IfExp { .. } => "IfExp",
            Self::Dict { .. } => "Dict",
            Self::Set { .. } => "Set",
            Self::ListComp { .. } => "ListComp",
            Self::SetComp { .. } => "SetComp",
            Self::DictComp { .. } => "DictComp",
            Self::GeneratorExp { .. } => "GeneratorExp",
            Self::Await { .. } => "Await",
            Self::Yield { .. } => "Yield",
            Self::YieldFrom { .. } => "YieldFrom",
            Self::Compare { .. } => "Compare",
            Self::Call { .. } => "Call",
            Self::Constant { .. } => "Constant",
            Self::Attribute { .. } => "Attribute",
            Self::Subscript { .. } => "Subscript",
            Self::Starred { .. } => "Starred",
            Self::Name { .. } => "Name",
            Self::List { .. } => "List",
            Self::Tuple { .. } => "Tuple",
            Self::Slice { .. } => "Slice",
            Self::Parameter { .. } => "Parameter",
            Self::Keyword { .. } => "Keyword",
            Self::Alias { .. } => "Alias",
            Self::WithItem { .. } => "WithItem",
            Self::ExceptHandler { .. } => "ExceptHandler",
            Self::Comprehension { .. } => "Comprehension",
        }
    }

    /// Function and class definitions open a new name scope.
    #[must_use]
    pub const fn is_scope(&self) -> bool {
        matches!(
            self,
            Self::Module { .. } | Self::FunctionDef { .. } | Self::ClassDef { .. } | Self::Lambda { .. }
        )
    }

    /// Statements that may appear in a body list.
    #[must_use]
    pub const fn is_statement(&self) -> bool {
        matches!(
            self,
            Self::FunctionDef { .. }
                | Self::ClassDef { .. }
                | Self::Return { .. }
                | Self::Delete { .. }
                | Self::Assign { .. }
                | Self::AugAssign { .. }
                | Self::AnnAssign { .. }
                | Self::For { .. }
                | Self::While { .. }
                | Self::If { .. }
                | Self::With { .. }
                | Self::Raise { .. }
                | Self::Try { .. }
                | Self::Assert { .. }
                | Self::Import { .. }
                | Self::ImportFrom { .. }
                | Self::Global { .. }
                | Self::Nonlocal { .. }
                | Self::ExprStmt { .. }
                | Self::Pass
                | Self::Break
                | Self::Continue
        )
    }

    /// Mutable access to the statement lists of a block-bearing node.
    pub(crate) fn statement_lists_mut(&mut self) -> smallvec::SmallVec<[&mut NodeList; 4]> {
        let mut lists = smallvec::SmallVec::new();
        match self {
            Self::Module { body } | Self::FunctionDef { body, .. } | Self::ClassDef { body, .. } => {
                lists.push(body);
            }
            Self::ExceptHandler { body, .. } | Self::With { body, .. } => lists.push(body),
            Self::For { body, orelse, .. }
            | Self::While { body, orelse, .. }
            | Self::If { body, orelse, .. } => {
                lists.push(body);
                lists.push(orelse);
            }
            Self::Try {
                body,
                orelse,
                finalbody,
                ..
            } => {
                lists.push(body);
                lists.push(orelse);
                lists.push(finalbody);
            }
            _ => {}
        }
        lists
    }
}

/// A node: kind, structure and the location of its first token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub data: NodeData,
    /// 1-based line; 0 for synthesized nodes that have not been placed yet.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
}

/// Per-node information kept outside [`Node`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

/// Owner of every node of one tree.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended_info: Vec<ExtendedNodeInfo>,
}
