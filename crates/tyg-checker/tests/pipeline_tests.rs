use super::*;
use tyg_emitter::print_module;
use tyg_parser::parse_module;

const MISSING_HINT: &str = "Function is missing a type annotation";
const NONE_ACCESS: &str = "Item \"None\" of \"Optional[User]\" has no attribute \"email\"";
const BARE_LIST: &str = "Missing type parameters for generic type \"List\"";
const SET_OF_STR: &str =
    "Incompatible types in assignment (expression has type \"set[str]\", variable has type \"list[str]\")";

fn diagnostic(line: u32, message: &str) -> Diagnostic {
    Diagnostic::new("app.py", line, 1, message)
}

fn run(module: &mut ParsedModule, diagnostics: &[Diagnostic], options: FixOptions) -> (String, ModuleFixReport) {
    let report = fix_module(module, diagnostics, &FixerSet::default(), options);
    (print_module(&module.arena, module.root), report)
}

fn fix(source: &str, diagnostics: &[Diagnostic]) -> (String, ModuleFixReport) {
    let mut module = parse_module("app.py", source).expect("source should parse");
    run(&mut module, diagnostics, FixOptions::default())
}

// =============================================================================
// Counters
// =============================================================================

#[test]
fn test_counters_record_and_merge() {
    let mut counters = FixCounters::default();
    counters.record(FixKind::MissingAnnotation);
    counters.record(FixKind::CollectionElements);
    counters.record(FixKind::NullableGuard);
    assert_eq!(counters.hints_added, 2);
    assert_eq!(counters.nullable_guards_added, 1);

    let mut total = FixCounters {
        imports_added: 1,
        ..FixCounters::default()
    };
    total.merge(&counters);
    assert_eq!(total.total(), 4);
}

// =============================================================================
// Fixes
// =============================================================================

#[test]
fn test_function_annotations() {
    let (printed, report) = fix(
        "def greet(name):\n    return 'Hello ' + name.upper()\n",
        &[diagnostic(1, MISSING_HINT)],
    );
    assert_eq!(printed, "def greet(name: str) -> str:\n    return 'Hello ' + name.upper()\n");
    assert_eq!(report.counters.hints_added, 1);
    assert_eq!(report.counters.imports_added, 0);
    assert!(report.modified);
    assert!(report.manual_review.is_empty());
}

#[test]
fn test_nullable_guard() {
    let (printed, report) = fix(
        "def email_of(user):\n    return user.email\n",
        &[diagnostic(2, NONE_ACCESS).with_attribute("email")],
    );
    assert_eq!(printed, "def email_of(user):\n    return user.email if user is not None else None\n");
    assert_eq!(report.counters.nullable_guards_added, 1);
}

#[test]
fn test_guard_is_never_applied_twice() {
    let mut module = parse_module("app.py", "def email_of(user):\n    return user.email\n").expect("source should parse");
    let diagnostics = [diagnostic(2, NONE_ACCESS)];
    let (first, _) = run(&mut module, &diagnostics, FixOptions::default());
    let (second, report) = run(&mut module, &diagnostics, FixOptions::default());

    assert_eq!(first, second);
    assert!(!report.modified);
    assert_eq!(report.counters, FixCounters::default());
    assert_eq!(report.manual_review[0].reason, SkipReason::AlreadyGuarded);
}

#[test]
fn test_existing_guard_is_respected() {
    let source = "def email_of(user):\n    if user is not None:\n        return user.email\n    return None\n";
    let (printed, report) = fix(source, &[diagnostic(3, NONE_ACCESS)]);
    assert_eq!(printed, source);
    assert!(!report.modified);
    assert_eq!(report.manual_review.len(), 1);
}

#[test]
fn test_generic_parameters_and_type_var_import() {
    let (printed, report) = fix(
        "from typing import List\n\n\ndef first(items: List) -> List:\n    return items\n",
        &[diagnostic(4, BARE_LIST)],
    );
    assert_eq!(
        printed,
        "from typing import List, TypeVar\nT = TypeVar('T')\n\n\ndef first(items: List[T]) -> List[T]:\n    return items\n"
    );
    assert_eq!(report.counters.generics_fixed, 1);
    assert_eq!(report.counters.imports_added, 1);
}

#[test]
fn test_existing_type_var_is_reused() {
    let (printed, report) = fix(
        "from typing import Dict, TypeVar\n\nK = TypeVar('K')\n\n\ndef f(d: Dict) -> None:\n    pass\n",
        &[diagnostic(6, "Missing type parameters for generic type \"Dict\"")],
    );
    assert!(printed.contains("def f(d: Dict[str, K]) -> None:\n"), "{printed}");
    assert!(!printed.contains("T = TypeVar"), "{printed}");
    assert_eq!(report.counters.imports_added, 0);
}

#[test]
fn test_collection_from_appends() {
    let (printed, report) = fix(
        "items = []\nitems.append(User())\n",
        &[diagnostic(1, "Need type annotation for \"items\"").with_name("items")],
    );
    assert_eq!(printed, "from typing import List\nitems: List[User] = []\nitems.append(User())\n");
    assert_eq!(report.counters.hints_added, 1);
    assert_eq!(report.counters.imports_added, 1);
}

#[test]
fn test_collection_inside_function() {
    let (printed, _) = fix(
        "def load():\n    seen = set()\n    seen.add('a')\n    return seen\n",
        &[diagnostic(2, SET_OF_STR)],
    );
    assert!(printed.starts_with("from typing import Set\n\n\ndef load():\n"), "{printed}");
    assert!(printed.contains("    seen: Set[str] = set()\n"), "{printed}");
}

// =============================================================================
// Manual review
// =============================================================================

#[test]
fn test_unfixable_diagnostic_goes_to_manual_review() {
    let source = "x = 1\n";
    let (printed, report) = fix(source, &[diagnostic(1, "Name \"foo\" is not defined")]);
    assert_eq!(printed, source);
    assert!(!report.modified);
    assert_eq!(report.manual_review.len(), 1);
    assert_eq!(report.manual_review[0].reason, SkipReason::NoFixer);
    assert_eq!(report.manual_review[0].line, 1);
}

#[test]
fn test_strict_mode_declines() {
    let mut module = parse_module("app.py", "def f(x):\n    return x\n").expect("source should parse");
    let options = FixOptions {
        strict: true,
        ..FixOptions::default()
    };
    let (printed, report) = run(&mut module, &[diagnostic(1, MISSING_HINT)], options);
    assert_eq!(printed, "def f(x):\n    return x\n");
    assert!(!report.modified);
    assert_eq!(report.manual_review[0].reason, SkipReason::Declined);
}

#[test]
fn test_strict_mode_reports_declined_parameter_of_fixed_function() {
    let mut module = parse_module("app.py", "def f(x):\n    return 1\n").expect("source should parse");
    let options = FixOptions {
        strict: true,
        ..FixOptions::default()
    };
    let (printed, report) = run(&mut module, &[diagnostic(1, MISSING_HINT)], options);
    assert_eq!(printed, "def f(x) -> int:\n    return 1\n");
    assert!(report.modified);
    assert_eq!(report.counters.hints_added, 1);
    assert_eq!(report.manual_review.len(), 1);
    assert_eq!(report.manual_review[0].line, 1);
    assert_eq!(report.manual_review[0].reason, SkipReason::Declined);
}

#[test]
fn test_duplicate_diagnostics_fix_once() {
    let (_, report) = fix(
        "def f():\n    return 1\n",
        &[diagnostic(1, MISSING_HINT), diagnostic(1, "Function is missing a return type annotation")],
    );
    assert_eq!(report.counters.hints_added, 1);
    assert!(report.manual_review.is_empty());
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn test_prune_option() {
    let mut module = parse_module("app.py", "from typing import Dict, List\n\n\ndef f(x: List[int]) -> None:\n    pass\n")
        .expect("source should parse");
    let options = FixOptions {
        prune_imports: true,
        ..FixOptions::default()
    };
    let (printed, report) = run(&mut module, &[], options);
    assert!(printed.starts_with("from typing import List\n"), "{printed}");
    assert_eq!(report.counters.imports_removed, 1);
    assert!(report.modified);
}

#[test]
fn test_imports_untouched_without_fixes() {
    let source = "def f(x: List[int]) -> None:\n    pass\n";
    let (printed, report) = fix(source, &[]);
    assert_eq!(printed, source);
    assert_eq!(report.counters.imports_added, 0);
}
