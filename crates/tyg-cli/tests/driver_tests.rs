use super::*;
use tempfile::TempDir;

const MISSING_HINT: &str = "Function is missing a type annotation";
const NONE_ACCESS: &str = "Item \"None\" of \"Optional[User]\" has no attribute \"email\"";

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write source");
    path.display().to_string()
}

fn read(path: &str) -> String {
    std::fs::read_to_string(path).expect("read source")
}

/// Two files: one needing a function annotation, one a None guard.
fn project(dir: &Path) -> (String, String, Vec<Diagnostic>) {
    let greet = write(dir, "greet.py", "def greet(name):\n    return 'Hello ' + name.upper()\n");
    let users = write(dir, "users.py", "def email_of(user):\n    return user.email\n");
    let diagnostics = vec![
        Diagnostic::new(users.clone(), 2, 12, NONE_ACCESS).with_attribute("email"),
        Diagnostic::new(greet.clone(), 1, 1, MISSING_HINT),
    ];
    (greet, users, diagnostics)
}

#[test]
fn parses_lines_and_drops_notes() {
    let lines: Vec<String> = [
        "app.py:3:1: error: Function is missing a type annotation  [no-untyped-def]",
        "app.py:3:1: note: Use \"-> None\" if function does not return a value",
        "Success: no issues found in 1 source file",
        "",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();

    let diagnostics = parse_diagnostics(&lines);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category, DiagnosticCategory::MissingTypeHint);
    assert_eq!(diagnostics[0].code.as_deref(), Some("no-untyped-def"));
}

#[test]
fn diagnostic_source_from_arg() {
    assert_eq!(DiagnosticSource::from_arg(None), DiagnosticSource::Mypy);
    assert_eq!(DiagnosticSource::from_arg(Some(Path::new("-"))), DiagnosticSource::Stdin);
    assert_eq!(
        DiagnosticSource::from_arg(Some(Path::new("out.txt"))),
        DiagnosticSource::File(PathBuf::from("out.txt"))
    );
}

#[test]
fn reads_recorded_diagnostics_from_file() {
    let temp = TempDir::new().expect("temp dir");
    let recorded = temp.path().join("mypy.txt");
    std::fs::write(&recorded, "a.py:1:1: error: x\nb.py:2:1: error: y\n").expect("write");
    let runner = MypyRunner::new(crate::config::MypySettings::default());

    let lines = read_diagnostic_lines(&DiagnosticSource::File(recorded), temp.path(), &runner)
        .expect("lines should be read");
    assert_eq!(lines, vec!["a.py:1:1: error: x", "b.py:2:1: error: y"]);
}

#[test]
fn write_atomic_replaces_contents() {
    let temp = TempDir::new().expect("temp dir");
    let path = write(temp.path(), "m.py", "old\n");
    write_atomic(Path::new(&path), "new\n").expect("write should succeed");
    assert_eq!(read(&path), "new\n");
    let leftovers = std::fs::read_dir(temp.path()).expect("read dir").count();
    assert_eq!(leftovers, 1);
}

#[test]
fn batch_fixes_and_rewrites_files() {
    let temp = TempDir::new().expect("temp dir");
    let (greet, users, diagnostics) = project(temp.path());

    let result = run_fix_batch(diagnostics, BatchOptions::default()).expect("batch should run");

    assert_eq!(read(&greet), "def greet(name: str) -> str:\n    return 'Hello ' + name.upper()\n");
    assert_eq!(
        read(&users),
        "def email_of(user):\n    return user.email if user is not None else None\n"
    );
    assert_eq!(result.counters.hints_added, 1);
    assert_eq!(result.counters.nullable_guards_added, 1);
    assert!(result.manual_review.is_empty());
    assert_eq!(result.files_modified, vec![users, greet]);
}

#[test]
fn dry_run_counts_without_writing() {
    let temp = TempDir::new().expect("temp dir");
    let (greet, users, diagnostics) = project(temp.path());
    let before = (read(&greet), read(&users));

    let result = run_fix_batch(
        diagnostics,
        BatchOptions {
            dry_run: true,
            ..BatchOptions::default()
        },
    )
    .expect("batch should run");

    assert_eq!((read(&greet), read(&users)), before);
    assert_eq!(result.counters.total(), 2);
    assert_eq!(result.files_modified.len(), 2);
}

#[test]
fn parallel_batch_matches_sequential_order() {
    let sequential = {
        let temp = TempDir::new().expect("temp dir");
        let (_, _, diagnostics) = project(temp.path());
        let result = run_fix_batch(diagnostics, BatchOptions::default()).expect("batch should run");
        result
            .files_modified
            .iter()
            .map(|file| Path::new(file).file_name().map(|n| n.to_owned()))
            .collect::<Vec<_>>()
    };
    let parallel = {
        let temp = TempDir::new().expect("temp dir");
        let (_, _, diagnostics) = project(temp.path());
        let result = run_fix_batch(
            diagnostics,
            BatchOptions {
                parallel: true,
                ..BatchOptions::default()
            },
        )
        .expect("batch should run");
        result
            .files_modified
            .iter()
            .map(|file| Path::new(file).file_name().map(|n| n.to_owned()))
            .collect::<Vec<_>>()
    };
    assert_eq!(sequential, parallel);
}

#[test]
fn second_batch_changes_nothing() {
    let temp = TempDir::new().expect("temp dir");
    let (greet, users, diagnostics) = project(temp.path());
    run_fix_batch(diagnostics.clone(), BatchOptions::default()).expect("first batch");
    let after_first = (read(&greet), read(&users));

    let result = run_fix_batch(diagnostics, BatchOptions::default()).expect("second batch");
    assert_eq!((read(&greet), read(&users)), after_first);
    assert!(result.files_modified.is_empty());
    assert_eq!(result.counters.total(), 0);
}

#[test]
fn unparsable_file_goes_to_manual_review() {
    let temp = TempDir::new().expect("temp dir");
    let broken = write(temp.path(), "broken.py", "def f(:\n");
    let diagnostics = vec![Diagnostic::new(broken.clone(), 1, 1, MISSING_HINT)];

    let result = run_fix_batch(diagnostics, BatchOptions::default()).expect("batch should run");

    assert_eq!(read(&broken), "def f(:\n");
    assert_eq!(result.manual_review.len(), 1);
    assert_eq!(result.manual_review[0].reason, SkipReason::ParseFailed);
    assert_eq!(result.manual_review[0].line, 0);
}

#[test]
fn undecodable_file_does_not_stop_the_batch() {
    let temp = TempDir::new().expect("temp dir");
    let good = write(temp.path(), "a.py", "def f():\n    return 1\n");
    let latin1 = temp.path().join("b.py");
    std::fs::write(&latin1, b"# -*- coding: latin-1 -*-\ndef g():\n    return '\xe9'\n").expect("write latin-1 source");
    let latin1 = latin1.display().to_string();
    let diagnostics = vec![
        Diagnostic::new(good.clone(), 1, 1, MISSING_HINT),
        Diagnostic::new(latin1.clone(), 2, 1, MISSING_HINT),
    ];

    let result = run_fix_batch(diagnostics, BatchOptions::default()).expect("batch should run");

    assert_eq!(read(&good), "def f() -> int:\n    return 1\n");
    assert_eq!(result.counters.hints_added, 1);
    assert_eq!(result.files_modified, vec![good]);
    assert_eq!(result.manual_review.len(), 1);
    assert_eq!(result.manual_review[0].file, latin1);
    assert_eq!(result.manual_review[0].line, 0);
    assert_eq!(result.manual_review[0].reason, SkipReason::Unreadable);
}

#[test]
fn missing_file_is_skipped() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("gone.py").display().to_string();
    let result = run_fix_batch(vec![Diagnostic::new(missing, 1, 1, MISSING_HINT)], BatchOptions::default())
        .expect("batch should run");
    assert_eq!(result.counters.total(), 0);
    assert!(result.manual_review.is_empty());
}

#[test]
fn backup_is_taken_before_fixing() {
    let temp = TempDir::new().expect("temp dir");
    let (greet, _, diagnostics) = project(temp.path());
    let backups = temp.path().join("backups");

    let result = fix_with_backup(diagnostics, &backups, BatchOptions::default()).expect("batch should run");

    let dir = result.backup_dir.expect("backup dir");
    assert!(dir.starts_with(&backups));
    assert!(dir.join("README.txt").is_file());
    let copies: Vec<_> = walkdir::WalkDir::new(&dir)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_name() == "greet.py")
        .collect();
    assert_eq!(copies.len(), 1);
    assert_eq!(
        std::fs::read_to_string(copies[0].path()).expect("copy"),
        "def greet(name):\n    return 'Hello ' + name.upper()\n"
    );
    assert!(read(&greet).starts_with("def greet(name: str) -> str:"));
}

#[test]
fn dry_run_takes_no_backup() {
    let temp = TempDir::new().expect("temp dir");
    let (_, _, diagnostics) = project(temp.path());
    let backups = temp.path().join("backups");
    let result = fix_with_backup(
        diagnostics,
        &backups,
        BatchOptions {
            dry_run: true,
            ..BatchOptions::default()
        },
    )
    .expect("batch should run");
    assert!(result.backup_dir.is_none());
    assert!(!backups.exists());
}

#[test]
fn annotate_rewrites_and_reports_counts() {
    let temp = TempDir::new().expect("temp dir");
    let math = write(temp.path(), "math_utils.py", "def add(a, b=1):\n    return a + b\n");
    let broken = write(temp.path(), "broken.py", "def f(:\n");
    let files = vec![PathBuf::from(&math), PathBuf::from(&broken)];

    let outcomes = annotate_files(&files, false, false).expect("annotate should run");

    assert_eq!(outcomes[0].added, 3);
    assert!(outcomes[0].error.is_none());
    assert_eq!(read(&math), "def add(a: int, b: int = 1) -> int:\n    return a + b\n");
    assert_eq!(outcomes[1].added, 0);
    assert!(outcomes[1].error.is_some());
}

#[test]
fn annotate_dry_run_leaves_files() {
    let temp = TempDir::new().expect("temp dir");
    let source = "def add(a, b=1):\n    return a + b\n";
    let math = write(temp.path(), "math_utils.py", source);
    let outcomes = annotate_files(&[PathBuf::from(&math)], false, true).expect("annotate should run");
    assert_eq!(outcomes[0].added, 3);
    assert_eq!(read(&math), source);
}

#[test]
fn excluded_files_are_dropped() {
    let mut builder = globset::GlobSetBuilder::new();
    builder.add(globset::Glob::new("migrations/**").expect("valid glob"));
    let exclude = builder.build().expect("glob set");
    let base = Path::new("/repo");
    let diagnostics = vec![
        Diagnostic::new("/repo/migrations/0001.py", 1, 1, MISSING_HINT),
        Diagnostic::new("/repo/app.py", 1, 1, MISSING_HINT),
        Diagnostic::new("migrations/0002.py", 1, 1, MISSING_HINT),
    ];

    let kept = drop_excluded(diagnostics, &exclude, base);
    let files: Vec<&str> = kept.iter().map(|d| d.file.as_str()).collect();
    assert_eq!(files, vec!["/repo/app.py"]);
}
