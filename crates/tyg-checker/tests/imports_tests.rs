use super::*;
use tyg_emitter::print_module;
use tyg_parser::parse_module;

fn parse(source: &str) -> ParsedModule {
    parse_module("test.py", source).expect("source should parse")
}

fn printed(module: &ParsedModule) -> String {
    print_module(&module.arena, module.root)
}

fn typing_statement_count(module: &ParsedModule) -> usize {
    module
        .body()
        .iter()
        .filter(|statement| is_typing_import(&module.arena, **statement))
        .count()
}

// =============================================================================
// Collecting names
// =============================================================================

#[test]
fn test_annotation_names() {
    let module = parse("T = TypeVar('T')\n\n\ndef f(x: List[T], y: 'Optional[int]') -> Dict[str, Any]:\n    z: Set[int] = set()\n");
    let names: Vec<String> = annotation_names(&module.arena, module.root).into_iter().collect();
    assert_eq!(names, vec!["Any", "Dict", "List", "Optional", "Set", "TypeVar"]);
}

#[test]
fn test_names_outside_annotations_are_ignored() {
    let module = parse("x = List\ny = isinstance(x, Dict)\n");
    assert!(annotation_names(&module.arena, module.root).is_empty());
}

#[test]
fn test_typing_imports() {
    let module = parse("from typing import List, Optional as Opt\nimport os\n");
    let expected: BTreeSet<String> = ["List", "Optional"].into_iter().map(String::from).collect();
    assert_eq!(typing_imports(&module.arena, module.root), TypingImports::Names(expected));
    let module = parse("import typing\n");
    assert_eq!(typing_imports(&module.arena, module.root), TypingImports::Everything);
    let module = parse("from typing import *\n");
    assert_eq!(typing_imports(&module.arena, module.root), TypingImports::Everything);
}

// =============================================================================
// Reconciling
// =============================================================================

#[test]
fn test_inserts_single_sorted_import() {
    let mut module = parse("def f(x: List[int]) -> Optional[int]:\n    return None\n");
    assert_eq!(reconcile_imports(&mut module), 2);
    assert_eq!(
        printed(&module),
        "from typing import List, Optional\n\n\ndef f(x: List[int]) -> Optional[int]:\n    return None\n"
    );
}

#[test]
fn test_extends_existing_import() {
    let mut module = parse("from typing import List\n\n\ndef f(x: List[int]) -> Optional[int]:\n    pass\n");
    assert_eq!(reconcile_imports(&mut module), 1);
    assert!(printed(&module).starts_with("from typing import List, Optional\n"));
    assert_eq!(typing_statement_count(&module), 1);
}

#[test]
fn test_nothing_missing() {
    let mut module = parse("from typing import List\nx: List[int] = []\n");
    assert_eq!(reconcile_imports(&mut module), 0);
    assert_eq!(printed(&module), "from typing import List\nx: List[int] = []\n");
}

#[test]
fn test_wildcard_and_module_import_satisfy_everything() {
    let mut module = parse("from typing import *\n\n\ndef f(x: List[int]):\n    pass\n");
    assert_eq!(reconcile_imports(&mut module), 0);
    let mut module = parse("import typing\n\n\ndef f(x: List[int]):\n    pass\n");
    assert_eq!(reconcile_imports(&mut module), 0);
}

#[test]
fn test_new_import_goes_after_docstring_and_leading_imports() {
    let mut module = parse("\"\"\"Doc.\"\"\"\nimport os\nx: Dict[str, int] = {}\n");
    assert_eq!(reconcile_imports(&mut module), 1);
    assert_eq!(
        printed(&module),
        "\"\"\"Doc.\"\"\"\nimport os\nfrom typing import Dict\nx: Dict[str, int] = {}\n"
    );
}

#[test]
fn test_type_var_call_needs_import() {
    let mut module = parse("T = TypeVar('T')\n");
    assert_eq!(reconcile_imports(&mut module), 1);
    assert_eq!(printed(&module), "from typing import TypeVar\nT = TypeVar('T')\n");
}

#[test]
fn test_string_annotation_needs_import() {
    let mut module = parse("def f(x: 'Optional[User]'):\n    pass\n");
    assert_eq!(reconcile_imports(&mut module), 1);
    assert!(printed(&module).starts_with("from typing import Optional\n"));
}

#[test]
fn test_reconcile_folds_duplicate_statements() {
    let mut module = parse("from typing import List\nimport os\nfrom typing import Dict\nx: Set[int] = set()\n");
    assert_eq!(reconcile_imports(&mut module), 1);
    assert_eq!(typing_statement_count(&module), 1);
    assert_eq!(
        printed(&module),
        "from typing import Dict, List, Set\nimport os\nx: Set[int] = set()\n"
    );
}

// =============================================================================
// Merging and pruning
// =============================================================================

#[test]
fn test_merge_annotation_imports() {
    let mut module = parse("from typing import List\nfrom typing import Dict, List\nimport os\nfrom typing import Any\n");
    assert_eq!(merge_annotation_imports(&mut module), 2);
    assert_eq!(printed(&module), "from typing import Any, Dict, List\nimport os\n");
}

#[test]
fn test_merge_leaves_wildcard_alone() {
    let source = "from typing import *\nfrom typing import List\n";
    let mut module = parse(source);
    assert_eq!(merge_annotation_imports(&mut module), 0);
    assert_eq!(printed(&module), source);
}

#[test]
fn test_prune_unused_names() {
    let mut module = parse("from typing import Any, Dict, List as L\n\n\ndef f(x: L[int]) -> None:\n    pass\n");
    assert_eq!(prune_unused_imports(&mut module), 2);
    assert!(printed(&module).starts_with("from typing import List as L\n"));
}

#[test]
fn test_prune_removes_empty_statement() {
    let mut module = parse("from typing import Any\nx = 1\n");
    assert_eq!(prune_unused_imports(&mut module), 1);
    assert_eq!(printed(&module), "x = 1\n");
}

#[test]
fn test_prune_keeps_runtime_uses_and_other_modules() {
    let source = "from os import path\nfrom typing import cast\ny = cast(int, x)\n";
    let mut module = parse(source);
    assert_eq!(prune_unused_imports(&mut module), 0);
    assert_eq!(printed(&module), source);
}
