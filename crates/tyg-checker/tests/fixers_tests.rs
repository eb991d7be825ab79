use super::*;
use tyg_common::DiagnosticCategory;
use tyg_emitter::print_module;
use tyg_parser::parse_module;

fn diagnostic(line: u32, message: &str) -> Diagnostic {
    Diagnostic::new("test.py", line, 1, message)
}

fn apply(source: &str, diagnostic: &Diagnostic) -> (FixOutcome, String) {
    let mut module = parse_module("test.py", source).expect("source should parse");
    let mut session = InferenceSession::new(false);
    let fixers = FixerSet::default();
    let fixer = fixers.fixer_for(diagnostic).expect("a fixer should accept the diagnostic");
    let outcome = fixer.fix(diagnostic, &mut module, &mut session);
    (outcome, print_module(&module.arena, module.root))
}

// =============================================================================
// Fixer selection
// =============================================================================

#[test]
fn test_default_set_covers_fixable_categories() {
    let fixers = FixerSet::default();
    assert_eq!(fixers.len(), 4);
    assert!(!fixers.is_empty());

    let cases = [
        ("Function is missing a return type annotation", FixKind::MissingAnnotation),
        ("Item \"None\" of \"Optional[User]\" has no attribute \"email\"", FixKind::NullableGuard),
        ("Missing type parameters for generic type \"List\"", FixKind::GenericParameters),
        ("Incompatible types in assignment (expression has type \"set[str]\", variable has type \"list[str]\")", FixKind::CollectionElements),
    ];
    for (message, kind) in cases {
        let fixer = fixers.fixer_for(&diagnostic(1, message)).expect(message);
        assert_eq!(fixer.kind(), kind, "{message}");
    }
}

#[test]
fn test_unfixable_category_has_no_fixer() {
    let unknown = diagnostic(1, "Name \"foo\" is not defined");
    assert_eq!(unknown.category, DiagnosticCategory::Unknown);
    assert!(FixerSet::default().fixer_for(&unknown).is_none());
    assert!(FixerSet::new(Vec::new()).fixer_for(&diagnostic(1, "Need type annotation for \"x\"")).is_none());
}

#[test]
fn test_outcome_and_reason_text() {
    assert!(FixOutcome::Applied.applied());
    assert!(FixOutcome::Partial(SkipReason::Declined).applied());
    assert!(!FixOutcome::Skipped(SkipReason::NoTarget).applied());
    assert_eq!(SkipReason::AlreadyGuarded.to_string(), "access is already guarded against None");
}

// =============================================================================
// Shared helpers
// =============================================================================

#[test]
fn test_assignment_at_line_prefers_named_target() {
    let module = parse_module("test.py", "a = 1; b = 2\n").expect("source should parse");
    let named = assignment_at_line(&module.arena, module.root, 1, Some("b"));
    assert_eq!(assignment_target_name(&module.arena, named), Some("b"));
    let first = assignment_at_line(&module.arena, module.root, 1, None);
    assert_eq!(assignment_target_name(&module.arena, first), Some("a"));
    assert!(assignment_at_line(&module.arena, module.root, 2, None).is_none());
}

#[test]
fn test_promote_assignment() {
    let mut module = parse_module("test.py", "x = 1\n").expect("source should parse");
    let assignment = module.body()[0];
    assert!(promote_assignment(&mut module.arena, assignment, &TypeExpr::atomic("int")));
    assert_eq!(print_module(&module.arena, module.root), "x: int = 1\n");
}

#[test]
fn test_promote_refuses_multiple_targets() {
    let mut module = parse_module("test.py", "x = y = 1\n").expect("source should parse");
    let assignment = module.body()[0];
    assert!(!promote_assignment(&mut module.arena, assignment, &TypeExpr::atomic("int")));
}

// =============================================================================
// Individual fixers
// =============================================================================

#[test]
fn test_missing_annotation_on_function() {
    let (outcome, printed) = apply(
        "def label():\n    return 'x'\n",
        &diagnostic(1, "Function is missing a return type annotation"),
    );
    assert_eq!(outcome, FixOutcome::Applied);
    assert_eq!(printed, "def label() -> str:\n    return 'x'\n");
}

#[test]
fn test_missing_annotation_on_fully_annotated_function() {
    let (outcome, _) = apply(
        "def label() -> str:\n    return 'x'\n",
        &diagnostic(1, "Function is missing a return type annotation"),
    );
    assert_eq!(outcome, FixOutcome::Skipped(SkipReason::AlreadyAnnotated));
}

#[test]
fn test_missing_annotation_on_assignment() {
    let (outcome, printed) = apply(
        "limit = 10\n",
        &diagnostic(1, "Need type annotation for \"limit\"").with_name("limit"),
    );
    assert_eq!(outcome, FixOutcome::Applied);
    assert_eq!(printed, "limit: int = 10\n");
}

#[test]
fn test_missing_annotation_without_target() {
    let (outcome, _) = apply("print(1)\n", &diagnostic(1, "Need type annotation for \"x\""));
    assert_eq!(outcome, FixOutcome::Skipped(SkipReason::NoTarget));
}

#[test]
fn test_nullable_access_wraps_call() {
    let (outcome, printed) = apply(
        "name = user.get_name()\n",
        &diagnostic(1, "Item \"None\" of \"Optional[User]\" has no attribute \"get_name\""),
    );
    assert_eq!(outcome, FixOutcome::Applied);
    assert_eq!(printed, "name = user.get_name() if user is not None else None\n");
}

#[test]
fn test_nullable_access_picks_named_attribute() {
    let (outcome, printed) = apply(
        "x = account.id + user.email\n",
        &diagnostic(1, "Item \"None\" of \"Optional[User]\" has no attribute \"email\"").with_attribute("email"),
    );
    assert_eq!(outcome, FixOutcome::Applied);
    assert_eq!(printed, "x = account.id + (user.email if user is not None else None)\n");
}

#[test]
fn test_nullable_access_ignores_store_targets() {
    let (outcome, _) = apply(
        "user.email = 'a'\n",
        &diagnostic(1, "Item \"None\" of \"Optional[User]\" has no attribute \"email\""),
    );
    assert_eq!(outcome, FixOutcome::Skipped(SkipReason::NoTarget));
}

#[test]
fn test_generic_fixer_without_bare_generics() {
    let (outcome, printed) = apply(
        "def f(x: List[int]) -> None:\n    pass\n",
        &diagnostic(1, "Missing type parameters for generic type \"List\""),
    );
    assert_eq!(outcome, FixOutcome::Skipped(SkipReason::NothingToParametrize));
    assert!(!printed.contains("TypeVar"));
}

#[test]
fn test_generic_fixer_places_type_var_before_first_definition() {
    let (outcome, printed) = apply(
        "\"\"\"Doc.\"\"\"\nimport os\n\n\ndef f(x: Optional) -> None:\n    pass\n",
        &diagnostic(5, "Missing type parameters for generic type \"Optional\""),
    );
    assert_eq!(outcome, FixOutcome::Applied);
    assert_eq!(
        printed,
        "\"\"\"Doc.\"\"\"\nimport os\nT = TypeVar('T')\n\n\ndef f(x: Optional[T]) -> None:\n    pass\n"
    );
}

#[test]
fn test_generic_fixer_reuses_nested_type_var() {
    let (outcome, printed) = apply(
        "from typing import List, TypeVar\n\nif True:\n    U = TypeVar('U')\n\n\ndef first(items: List) -> None:\n    pass\n",
        &diagnostic(7, "Missing type parameters for generic type \"List\""),
    );
    assert_eq!(outcome, FixOutcome::Applied);
    assert!(printed.contains("def first(items: List[U]) -> None:\n"), "{printed}");
    assert_eq!(printed.matches("TypeVar(").count(), 1, "{printed}");
}

#[test]
fn test_collection_fixer_requires_a_collection() {
    let message = "Incompatible types in assignment (expression has type \"set[str]\", variable has type \"list[str]\")";
    let (outcome, _) = apply("x = load()\n", &diagnostic(1, message));
    assert_eq!(outcome, FixOutcome::Skipped(SkipReason::NoTarget));
    let (outcome, _) = apply("x: List[int] = []\n", &diagnostic(1, message));
    assert_eq!(outcome, FixOutcome::Skipped(SkipReason::AlreadyAnnotated));
}
