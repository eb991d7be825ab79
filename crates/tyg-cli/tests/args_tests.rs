use super::*;
use std::path::Path;

#[test]
fn parses_fix_defaults() {
    let args = CliArgs::try_parse_from(["tyg", "fix"]).expect("default args should parse");

    assert_eq!(args.format, OutputFormat::Text);
    assert!(args.config.is_none());
    assert!(!args.no_color);
    let Command::Fix(fix) = args.command else {
        panic!("expected fix command");
    };
    assert!(fix.path.is_none());
    assert!(!fix.dry_run);
    assert!(!fix.strict);
    assert!(!fix.parallel);
    assert!(!fix.prune_imports);
    assert!(fix.diagnostics.is_none());
}

#[test]
fn parses_fix_flags() {
    let args = CliArgs::try_parse_from([
        "tyg",
        "fix",
        "src",
        "--dry-run",
        "--strict",
        "--parallel",
        "--prune-imports",
        "--diagnostics",
        "-",
        "--format",
        "json",
        "--config",
        "ci/type-guardian.json",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.config.as_deref(), Some(Path::new("ci/type-guardian.json")));
    let Command::Fix(fix) = args.command else {
        panic!("expected fix command");
    };
    assert_eq!(fix.path.as_deref(), Some(Path::new("src")));
    assert!(fix.dry_run);
    assert!(fix.strict);
    assert!(fix.parallel);
    assert!(fix.prune_imports);
    assert_eq!(fix.diagnostics.as_deref(), Some(Path::new("-")));
}

#[test]
fn parses_apply() {
    let args = CliArgs::try_parse_from([
        "tyg",
        "apply",
        "app.py",
        "--line",
        "3",
        "--old",
        "x = 1",
        "--new",
        "x: int = 1",
    ])
    .expect("apply args should parse");

    let Command::Apply(apply) = args.command else {
        panic!("expected apply command");
    };
    assert_eq!(apply.file, Path::new("app.py"));
    assert_eq!(apply.line, 3);
    assert_eq!(apply.old, "x = 1");
    assert_eq!(apply.new, "x: int = 1");
}

#[test]
fn annotate_requires_a_path() {
    assert!(CliArgs::try_parse_from(["tyg", "annotate"]).is_err());
    assert!(CliArgs::try_parse_from(["tyg", "scan"]).is_err());
}

#[test]
fn rejects_unknown_format() {
    assert!(CliArgs::try_parse_from(["tyg", "check", "--format", "xml"]).is_err());
}
