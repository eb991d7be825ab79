use super::*;
use crate::context::InferenceSession;
use tyg_parser::{ParsedModule, parse_module};

fn first_function(module: &ParsedModule) -> NodeIndex {
    module
        .arena
        .walk(module.root)
        .into_iter()
        .find(|index| matches!(module.arena.data(*index), Some(NodeData::FunctionDef { .. })))
        .expect("source should define a function")
}

fn parameter_named(module: &ParsedModule, function: NodeIndex, wanted: &str) -> NodeIndex {
    let Some(NodeData::FunctionDef { params, .. }) = module.arena.data(function) else {
        panic!("not a function");
    };
    params
        .iter()
        .copied()
        .find(|param| matches!(module.arena.data(*param), Some(NodeData::Parameter { name, .. }) if name == wanted))
        .expect("parameter should exist")
}

fn return_type_with(source: &str, strict: bool) -> Option<String> {
    let module = parse_module("test.py", source).expect("source should parse");
    let function = first_function(&module);
    let mut session = InferenceSession::new(strict);
    let mut engine = InferenceEngine::new(&module.arena, module.root, &mut session);
    engine.infer_return_type(function).map(|ty| ty.to_string())
}

fn return_type(source: &str) -> String {
    return_type_with(source, false).expect("non-strict inference always answers")
}

fn parameter_type_with(source: &str, parameter: &str, strict: bool) -> Option<String> {
    let module = parse_module("test.py", source).expect("source should parse");
    let function = first_function(&module);
    let parameter = parameter_named(&module, function, parameter);
    let mut session = InferenceSession::new(strict);
    let mut engine = InferenceEngine::new(&module.arena, module.root, &mut session);
    engine.infer_parameter_type(function, parameter).map(|ty| ty.to_string())
}

fn parameter_type(source: &str, parameter: &str) -> String {
    parameter_type_with(source, parameter, false).expect("non-strict inference always answers")
}

// =============================================================================
// Return types
// =============================================================================

#[test]
fn test_string_return() {
    assert_eq!(return_type("def f():\n    return \"x\"\n"), "str");
}

#[test]
fn test_int_and_float_returns_widen() {
    let source = "def f(flag):\n    if flag:\n        return 5\n    return 3.14\n";
    assert_eq!(return_type(source), "float");
}

#[test]
fn test_unrelated_returns_form_a_union() {
    let source = "def f(x):\n    if x:\n        return 1\n    return 'a'\n";
    assert_eq!(return_type(source), "Union[int, str]");
}

#[test]
fn test_no_return_gives_none() {
    assert_eq!(return_type("def f():\n    print(1)\n"), "None");
    assert_eq!(return_type("def f(x):\n    if x:\n        return\n    return None\n"), "None");
}

#[test]
fn test_bare_return_next_to_value_gives_optional() {
    let source = "def f(x):\n    if x:\n        return\n    return 1\n";
    assert_eq!(return_type(source), "Optional[int]");
    let source = "def f(x):\n    if x:\n        return None\n    return [1]\n";
    assert_eq!(return_type(source), "Optional[List[int]]");
}

#[test]
fn test_generator_returns_iterator() {
    assert_eq!(return_type("def g():\n    yield 1\n    yield 2\n"), "Iterator[int]");
    assert_eq!(return_type("def g():\n    yield from ['a', 'b']\n"), "Iterator[str]");
}

#[test]
fn test_nested_function_returns_are_ignored() {
    let source = "def f():\n    def g():\n        return 'a'\n    return 1\n";
    assert_eq!(return_type(source), "int");
}

#[test]
fn test_unresolved_return_depends_on_strictness() {
    let source = "def f(x):\n    return x.load()\n";
    assert_eq!(return_type_with(source, false).as_deref(), Some("Any"));
    assert_eq!(return_type_with(source, true), None);
}

#[test]
fn test_return_of_local_variable() {
    let source = "def f():\n    total = 0.0\n    return total\n";
    assert_eq!(return_type(source), "float");
}

// =============================================================================
// Parameter types
// =============================================================================

#[test]
fn test_string_method_implies_str() {
    assert_eq!(parameter_type("def f(name):\n    return name.lower()\n", "name"), "str");
}

#[test]
fn test_list_and_dict_methods() {
    assert_eq!(parameter_type("def f(items):\n    items.append(1)\n", "items"), "List[Any]");
    assert_eq!(parameter_type("def f(d):\n    return d.items()\n", "d"), "Dict[str, Any]");
}

#[test]
fn test_subscript_key_decides_container() {
    assert_eq!(parameter_type("def f(d):\n    return d['key']\n", "d"), "Dict[str, Any]");
    assert_eq!(parameter_type("def f(xs):\n    return xs[0]\n", "xs"), "List[Any]");
}

#[test]
fn test_iteration_implies_iterable() {
    let source = "def f(xs):\n    for x in xs:\n        print(x)\n";
    assert_eq!(parameter_type(source, "xs"), "Iterable[Any]");
}

#[test]
fn test_arithmetic_operand() {
    assert_eq!(parameter_type("def f(n):\n    return n * 2\n", "n"), "int");
    assert_eq!(parameter_type("def f(n):\n    return n * 2.5\n", "n"), "float");
    assert_eq!(parameter_type("def f(s):\n    return s + 'x'\n", "s"), "str");
}

#[test]
fn test_first_recognised_usage_wins() {
    let source = "def f(x):\n    for c in x:\n        pass\n    x.append(1)\n";
    assert_eq!(parameter_type(source, "x"), "Iterable[Any]");
    let source = "def f(x):\n    x.frobnicate()\n    return x.upper()\n";
    assert_eq!(parameter_type(source, "x"), "str");
}

#[test]
fn test_nested_definitions_do_not_decide_usage() {
    let source = "def outer(x):\n    def inner(x):\n        return x.upper()\n    return x * 2\n";
    assert_eq!(parameter_type(source, "x"), "int");
    let source = "def outer(x):\n    key = lambda x: x.lower()\n    return x * 2.5\n";
    assert_eq!(parameter_type(source, "x"), "float");
}

#[test]
fn test_unused_parameter_depends_on_strictness() {
    let source = "def f(x):\n    return x\n";
    assert_eq!(parameter_type_with(source, "x", false).as_deref(), Some("Any"));
    assert_eq!(parameter_type_with(source, "x", true), None);
}

#[test]
fn test_literal_default_decides() {
    assert_eq!(parameter_type("def f(limit=10):\n    return limit\n", "limit"), "int");
    assert_eq!(parameter_type("def f(flag=False):\n    pass\n", "flag"), "bool");
}

#[test]
fn test_none_default_wraps_in_optional() {
    let source = "def f(name=None):\n    return name.upper()\n";
    assert_eq!(parameter_type(source, "name"), "Optional[str]");
    assert_eq!(parameter_type("def f(x=None):\n    pass\n", "x"), "Optional[Any]");
    assert_eq!(parameter_type_with("def f(x=None):\n    pass\n", "x", true), None);
}

#[test]
fn test_method_receiver_table() {
    assert_eq!(method_receiver_type("strip"), Some(TypeExpr::atomic("str")));
    assert_eq!(method_receiver_type("add"), Some(TypeExpr::set(TypeExpr::any())));
    assert_eq!(method_receiver_type("frobnicate"), None);
}

// =============================================================================
// Annotatable parameters
// =============================================================================

fn annotatable_names(source: &str) -> Vec<String> {
    let module = parse_module("test.py", source).expect("source should parse");
    let function = first_function(&module);
    annotatable_parameters(&module.arena, function)
        .into_iter()
        .filter_map(|param| match module.arena.data(param) {
            Some(NodeData::Parameter { name, .. }) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_method_receiver_and_variadics_are_skipped() {
    let source = "class C:\n    def m(self, a, *args, b: int, **kwargs):\n        pass\n";
    assert_eq!(annotatable_names(source), vec!["a"]);
}

#[test]
fn test_staticmethod_first_parameter_is_annotatable() {
    let source = "class C:\n    @staticmethod\n    def m(self):\n        pass\n";
    assert_eq!(annotatable_names(source), vec!["self"]);
}

#[test]
fn test_free_function_self_is_annotatable() {
    assert_eq!(annotatable_names("def f(self, cls):\n    pass\n"), vec!["self", "cls"]);
}
