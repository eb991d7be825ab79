//! End-to-end fixes through the public API: parse, fix, print.

use tyg_checker::{FixOptions, FixerSet, ModuleFixReport, fix_module};
use tyg_common::Diagnostic;
use tyg_emitter::print_module;
use tyg_parser::{ParsedModule, parse_module};

fn parse(source: &str) -> ParsedModule {
    parse_module("service.py", source).expect("source should parse")
}

fn fix_in_place(module: &mut ParsedModule, diagnostics: &[Diagnostic]) -> ModuleFixReport {
    fix_module(module, diagnostics, &FixerSet::default(), FixOptions::default())
}

fn fix(source: &str, diagnostics: &[Diagnostic]) -> String {
    let mut module = parse(source);
    fix_in_place(&mut module, diagnostics);
    print_module(&module.arena, module.root)
}

fn at(line: u32, message: &str) -> Diagnostic {
    Diagnostic::new("service.py", line, 5, message)
}

#[test]
fn test_string_return_gets_str() {
    let printed = fix(
        "def label():\n    return \"x\"\n",
        &[at(1, "Function is missing a return type annotation")],
    );
    assert_eq!(printed, "def label() -> str:\n    return \"x\"\n");
}

#[test]
fn test_mixed_numeric_returns_widen_to_float() {
    let printed = fix(
        "def ratio(flag):\n    if flag:\n        return 5\n    return 3.14\n",
        &[at(1, "Function is missing a return type annotation")],
    );
    assert!(printed.contains("-> float:"), "{printed}");
}

#[test]
fn test_optional_attribute_access_is_guarded() {
    let printed = fix(
        "def email_of(user):\n    return user.email\n",
        &[at(2, "Item \"None\" of \"Optional[User]\" has no attribute \"email\"")],
    );
    assert!(printed.contains("    return user.email if user is not None else None\n"), "{printed}");
}

#[test]
fn test_empty_list_learns_element_type() {
    let printed = fix(
        "items = []\nitems.append(User())\n",
        &[at(1, "Need type annotation for \"items\" (hint: \"items: list[<type>] = ...\")").with_name("items")],
    );
    assert!(printed.contains("items: List[User] = []\n"), "{printed}");
}

#[test]
fn test_typing_names_are_imported_once() {
    let printed = fix(
        "def pick(values, fallback=None):\n    for v in values:\n        return [v]\n    return fallback.strip()\n",
        &[at(1, "Function is missing a type annotation")],
    );
    assert_eq!(printed.matches("from typing import").count(), 1, "{printed}");
    assert!(printed.starts_with("from typing import "), "{printed}");
    assert!(printed.contains("Iterable"), "{printed}");
    assert!(printed.contains("Optional"), "{printed}");
}

#[test]
fn test_unimported_list_and_optional_share_one_sorted_import() {
    let printed = fix(
        "def lookup(items: List[str], key: Optional[str]):\n    return 1\n",
        &[at(1, "Function is missing a return type annotation")],
    );
    assert_eq!(
        printed,
        "from typing import List, Optional\n\n\ndef lookup(items: List[str], key: Optional[str]) -> int:\n    return 1\n"
    );
}

#[test]
fn test_second_run_changes_nothing() {
    let source = "\
def email_of(user):
    return user.email


def label(count):
    if count:
        return
    return 'many'


items = []
items.append(1.5)
";
    let diagnostics = [
        at(2, "Item \"None\" of \"Optional[User]\" has no attribute \"email\""),
        at(5, "Function is missing a type annotation"),
        at(11, "Need type annotation for \"items\"").with_name("items"),
    ];
    let mut module = parse(source);
    let first = fix_in_place(&mut module, &diagnostics);
    assert!(first.modified);
    let printed = print_module(&module.arena, module.root);
    assert!(printed.contains("-> Optional[str]:"), "{printed}");
    assert!(printed.contains("items: List[float] = []"), "{printed}");

    let second = fix_in_place(&mut module, &diagnostics);
    assert!(!second.modified);
    assert_eq!(second.counters.total(), 0);
    assert_eq!(print_module(&module.arena, module.root), printed);
}
