use super::*;
use std::time::Duration;
use tyg_checker::{FixCounters, ManualReviewItem, SkipReason};

fn diagnostics() -> Vec<Diagnostic> {
    vec![
        Diagnostic::new("a.py", 1, 1, "Function is missing a type annotation"),
        Diagnostic::new("a.py", 4, 1, "Item \"None\" of \"Optional[str]\" has no attribute \"x\""),
        Diagnostic::new("b.py", 2, 1, "Function is missing a return type annotation").with_code("no-untyped-def"),
        Diagnostic::new("b.py", 9, 1, "Name \"foo\" is not defined"),
    ]
}

fn result() -> FixResult {
    FixResult {
        counters: FixCounters {
            hints_added: 2,
            nullable_guards_added: 1,
            imports_added: 1,
            ..FixCounters::default()
        },
        manual_review: vec![ManualReviewItem {
            file: "b.py".to_string(),
            line: 9,
            category: DiagnosticCategory::Unknown,
            message: "Name \"foo\" is not defined".to_string(),
            reason: SkipReason::NoFixer,
        }],
        files_modified: vec!["a.py".to_string(), "b.py".to_string()],
        backup_dir: None,
        elapsed: Duration::from_millis(1500),
    }
}

#[test]
fn breakdown_is_most_common_first() {
    assert_eq!(
        category_breakdown(&diagnostics()),
        vec![
            (DiagnosticCategory::MissingTypeHint, 2),
            (DiagnosticCategory::OptionalNone, 1),
            (DiagnosticCategory::Unknown, 1),
        ]
    );
}

#[test]
fn renders_breakdown_without_color() {
    let text = Reporter::new(false).render_breakdown(&diagnostics());
    assert!(text.starts_with("Found 4 type errors\n\nError Breakdown\n"), "{text}");
    assert!(text.contains("  missing_type_hint          2\n"), "{text}");
    assert_eq!(Reporter::new(false).render_breakdown(&[]), "No type errors found\n");
}

#[test]
fn renders_diagnostics_with_codes() {
    let text = Reporter::new(false).render_diagnostics(&diagnostics()[2..3]);
    assert_eq!(
        text,
        "b.py:2:1\n  error: Function is missing a return type annotation [no-untyped-def]\n"
    );
}

#[test]
fn renders_fix_summary() {
    let text = Reporter::new(false).render_fix_result(&result(), false);
    assert!(text.contains("  Type hints added       2\n"), "{text}");
    assert!(text.contains("  Optional issues fixed  1\n"), "{text}");
    assert!(text.contains("  Time                   1.5s\n"), "{text}");
    assert!(text.contains("1 issues need manual review\n"), "{text}");
    assert!(text.contains("  b.py:9  no automatic fix for this category"), "{text}");
    assert!(!text.contains("Dry run"), "{text}");
    assert!(!text.contains("removed"), "{text}");

    let dry = Reporter::new(false).render_fix_result(&result(), true);
    assert!(dry.starts_with("Dry run - no changes were written\n"), "{dry}");
}

#[test]
fn color_output_uses_ansi_escapes() {
    colored::control::set_override(true);
    let colored_text = Reporter::new(true).render_fix_result(&result(), false);
    colored::control::unset_override();
    assert!(colored_text.contains("\u{1b}["));
}

#[test]
fn renders_remaining_count() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.render_remaining(0), "Success: no issues found\n");
    assert_eq!(reporter.render_remaining(3), "3 errors remaining\n");
}

#[test]
fn renders_annotations_and_untyped_files() {
    let reporter = Reporter::new(false);
    let text = reporter.render_annotations(&[AnnotationOutcome {
        file: PathBuf::from("m.py"),
        added: 3,
        error: None,
    }]);
    assert!(text.contains("  m.py  3\n"), "{text}");

    let text = reporter.render_untyped(&[(PathBuf::from("m.py"), Some((1, 4)))]);
    assert_eq!(text, "1 files need annotations\n  m.py  1/4 functions annotated\n");
}

#[test]
fn json_documents() {
    let check = check_json(&diagnostics());
    assert_eq!(check["total"], 4);
    assert_eq!(check["breakdown"]["missing_type_hint"], 2);
    assert_eq!(check["diagnostics"][2]["code"], "no-untyped-def");
    assert_eq!(check["diagnostics"][0]["category"], "missing_type_hint");

    let fix = fix_json(&diagnostics(), &result(), true);
    assert_eq!(fix["dryRun"], true);
    assert_eq!(fix["result"]["hints_added"], 2);
    assert_eq!(fix["result"]["time"], 1.5);
    assert_eq!(fix["result"]["manual_review"][0]["reason"], "no_fixer");
    assert!(fix["result"].get("backup_dir").is_none());
    assert!(to_json_string(&fix).expect("serializable").contains("\"dryRun\": true"));
}
