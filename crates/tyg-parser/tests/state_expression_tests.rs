//! Tests for expression parsing.

use super::*;

/// Parse a single expression statement and return the module and the
/// expression node.
fn parse_expr(source: &str) -> (ParsedModule, NodeIndex) {
    let module = parse_module("test.py", &format!("{source}\n")).expect("source parses");
    let statement = module.body()[0];
    let Some(NodeData::ExprStmt { value }) = module.arena.data(statement) else {
        panic!("expected an expression statement");
    };
    let value = *value;
    (module, value)
}

#[test]
fn test_precedence_of_binary_operators() {
    let (module, expr) = parse_expr("a + b * c ** d");
    let Some(NodeData::BinOp { op, right, .. }) = module.arena.data(expr) else {
        panic!("expected binop");
    };
    assert_eq!(*op, BinaryOp::Add);
    let Some(NodeData::BinOp { op, right, .. }) = module.arena.data(*right) else {
        panic!("expected binop");
    };
    assert_eq!(*op, BinaryOp::Mult);
    assert!(matches!(
        module.arena.data(*right),
        Some(NodeData::BinOp {
            op: BinaryOp::Pow,
            ..
        })
    ));
}

#[test]
fn test_left_associativity() {
    let (module, expr) = parse_expr("a - b - c");
    let Some(NodeData::BinOp { left, .. }) = module.arena.data(expr) else {
        panic!("expected binop");
    };
    assert!(matches!(
        module.arena.data(*left),
        Some(NodeData::BinOp {
            op: BinaryOp::Sub,
            ..
        })
    ));
}

#[test]
fn test_boolean_operations_flatten() {
    let (module, expr) = parse_expr("a or b or not c and d");
    let Some(NodeData::BoolOp { op, values }) = module.arena.data(expr) else {
        panic!("expected boolop");
    };
    assert_eq!(*op, BoolOp::Or);
    assert_eq!(values.len(), 3);
}

#[test]
fn test_comparison_chain() {
    let (module, expr) = parse_expr("a < b is not None not in c");
    let Some(NodeData::Compare { ops, comparators, .. }) = module.arena.data(expr) else {
        panic!("expected compare");
    };
    assert_eq!(ops, &[CmpOp::Lt, CmpOp::IsNot, CmpOp::NotIn]);
    assert_eq!(comparators.len(), 3);
}

#[test]
fn test_conditional_expression() {
    let (module, expr) = parse_expr("user.email if user is not None else None");
    let Some(NodeData::IfExp { test, body, orelse }) = module.arena.data(expr) else {
        panic!("expected conditional");
    };
    assert!(matches!(module.arena.data(*body), Some(NodeData::Attribute { attr, .. }) if attr == "email"));
    assert!(matches!(module.arena.data(*test), Some(NodeData::Compare { .. })));
    assert!(matches!(
        module.arena.data(*orelse),
        Some(NodeData::Constant {
            value: ConstantValue::None
        })
    ));
}

#[test]
fn test_calls_and_arguments() {
    let (module, expr) = parse_expr("f(a, *rest, key=1, **opts)");
    let Some(NodeData::Call { args, .. }) = module.arena.data(expr) else {
        panic!("expected call");
    };
    let kinds: Vec<&str> = args
        .iter()
        .map(|a| module.arena.data(*a).expect("arg").kind_name())
        .collect();
    assert_eq!(kinds, ["Name", "Starred", "Keyword", "Keyword"]);

    let (module, expr) = parse_expr("sum(x for x in xs if x)");
    let Some(NodeData::Call { args, .. }) = module.arena.data(expr) else {
        panic!("expected call");
    };
    assert!(matches!(
        module.arena.data(args.first().expect("arg")),
        Some(NodeData::GeneratorExp { .. })
    ));
}

#[test]
fn test_displays_and_comprehensions() {
    let cases = [
        ("[]", "List"),
        ("[1, 2,]", "List"),
        ("()", "Tuple"),
        ("(1,)", "Tuple"),
        ("(1)", "Constant"),
        ("{}", "Dict"),
        ("{'a': 1, **rest}", "Dict"),
        ("{1, 2}", "Set"),
        ("[x for x in y]", "ListComp"),
        ("{x for x in y}", "SetComp"),
        ("{k: v for k, v in y}", "DictComp"),
        ("(x for x in y)", "GeneratorExp"),
        ("lambda x, y=1: x + y", "Lambda"),
        ("x[1:2, ::3]", "Subscript"),
        ("await g()", "Await"),
        ("(n := 10)", "NamedExpr"),
    ];
    for (source, expected) in cases {
        let (module, expr) = parse_expr(source);
        assert_eq!(
            module.arena.data(expr).expect("expr").kind_name(),
            expected,
            "{source}"
        );
    }
}

#[test]
fn test_literals() {
    let cases = [
        ("42", ConstantValue::Int("42".into())),
        ("0xFF", ConstantValue::Int("0xFF".into())),
        ("1.5e3", ConstantValue::Float("1.5e3".into())),
        ("2j", ConstantValue::Complex("2j".into())),
        ("f'{x}'", ConstantValue::Str("f'{x}'".into())),
        ("'a' \"b\"", ConstantValue::Str("'a' \"b\"".into())),
        ("b'raw'", ConstantValue::Bytes("b'raw'".into())),
        ("...", ConstantValue::Ellipsis),
        ("True", ConstantValue::True),
    ];
    for (source, expected) in cases {
        let (module, expr) = parse_expr(source);
        assert_eq!(
            module.arena.data(expr),
            Some(&NodeData::Constant { value: expected }),
            "{source}"
        );
    }
}

#[test]
fn test_yield_forms() {
    let module = parse_module("t.py", "def g():\n    yield\n    yield 1, 2\n    x = yield from h()\n")
        .expect("source parses");
    let kinds: Vec<&str> = module
        .arena
        .walk(module.root)
        .into_iter()
        .map(|i| module.arena.data(i).expect("node").kind_name())
        .filter(|k| k.starts_with("Yield"))
        .collect();
    assert_eq!(kinds, ["Yield", "Yield", "YieldFrom"]);
}

#[test]
fn test_expression_locations() {
    let module = parse_module("t.py", "x = 1\nprint(user.email)\n").expect("source parses");
    let attribute = module
        .arena
        .walk(module.root)
        .into_iter()
        .find(|i| matches!(module.arena.data(*i), Some(NodeData::Attribute { .. })))
        .expect("attribute");
    assert_eq!(module.arena.location(attribute), (2, 6));
}
