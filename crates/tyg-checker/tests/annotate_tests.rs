use super::*;
use tyg_emitter::print_module;
use tyg_parser::parse_module;

fn parse(source: &str) -> ParsedModule {
    parse_module("test.py", source).expect("source should parse")
}

#[test]
fn test_annotates_every_function() {
    let mut module = parse("def add(a, b=1):\n    return a + b\n\n\nclass C:\n    def name(self):\n        return 'c'\n");
    let mut session = InferenceSession::new(false);
    assert_eq!(infer_and_annotate(&mut module, &mut session), 4);

    let printed = print_module(&module.arena, module.root);
    assert!(printed.contains("def add(a: int, b: int = 1) -> int:\n"), "{printed}");
    assert!(printed.contains("def name(self) -> str:\n"), "{printed}");
}

#[test]
fn test_second_pass_adds_nothing() {
    let mut module = parse("def f(name):\n    return name.strip()\n");
    let mut session = InferenceSession::new(false);
    assert_eq!(infer_and_annotate(&mut module, &mut session), 2);
    assert_eq!(infer_and_annotate(&mut module, &mut session), 0);
}

#[test]
fn test_strict_mode_leaves_unknowns_alone() {
    let mut module = parse("def f(x):\n    return x\n\n\ndef g():\n    return 1\n");
    let mut session = InferenceSession::new(true);
    assert_eq!(infer_and_annotate(&mut module, &mut session), 1);
    assert_eq!(session.declined(), 2);
    let printed = print_module(&module.arena, module.root);
    assert!(printed.contains("def f(x):\n"), "{printed}");
    assert!(printed.contains("def g() -> int:\n"), "{printed}");
}

#[test]
fn test_annotation_coverage() {
    let module = parse("def a():\n    pass\n\n\ndef b(x: int):\n    pass\n\n\ndef c() -> None:\n    pass\n");
    assert_eq!(annotation_coverage(&module.arena, module.root), (2, 3));
}

#[test]
fn test_needs_annotations_threshold() {
    let half = parse("def a():\n    pass\n\n\ndef b(x: int):\n    pass\n");
    assert!(!needs_annotations(&half.arena, half.root));

    let mostly_untyped = parse("def a():\n    pass\n\n\ndef b():\n    pass\n\n\ndef c(x: int):\n    pass\n");
    assert!(needs_annotations(&mostly_untyped.arena, mostly_untyped.root));

    let no_functions = parse("x = 1\n");
    assert!(!needs_annotations(&no_functions.arena, no_functions.root));
}
