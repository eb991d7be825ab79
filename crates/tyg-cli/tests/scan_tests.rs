use super::*;
use globset::{Glob, GlobSetBuilder};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(&path, contents).expect("write file");
    path
}

fn exclude(patterns: &[&str]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).expect("valid glob"));
    }
    builder.build().expect("glob set")
}

#[test]
fn discovers_python_files_sorted() {
    let temp = TempDir::new().expect("temp dir");
    let b = write(temp.path(), "pkg/b.py", "");
    let a = write(temp.path(), "a.py", "");
    write(temp.path(), "notes.txt", "");
    write(temp.path(), "__pycache__/a.py", "");
    write(temp.path(), ".venv/lib/site.py", "");

    let files = discover_python_files(temp.path(), &GlobSet::empty());
    assert_eq!(files, vec![a, b]);
}

#[test]
fn exclude_patterns_are_relative_to_root() {
    let temp = TempDir::new().expect("temp dir");
    let kept = write(temp.path(), "app.py", "");
    write(temp.path(), "build/gen.py", "");
    write(temp.path(), "pkg/test_app.py", "");

    let files = discover_python_files(temp.path(), &exclude(&["build/**", "**/test_*.py"]));
    assert_eq!(files, vec![kept]);
}

#[test]
fn single_file_is_returned_as_is() {
    let temp = TempDir::new().expect("temp dir");
    let file = write(temp.path(), "script.py", "");
    assert_eq!(discover_python_files(&file, &GlobSet::empty()), vec![file]);
}

#[test]
fn finds_mostly_untyped_files() {
    let temp = TempDir::new().expect("temp dir");
    let untyped = write(
        temp.path(),
        "untyped.py",
        "def a(x):\n    return x\n\ndef b(y):\n    return y\n\ndef c(z: int) -> int:\n    return z\n",
    );
    write(
        temp.path(),
        "typed.py",
        "def a(x: int) -> int:\n    return x\n\ndef b(y):\n    return y\n",
    );
    write(temp.path(), "constants.py", "LIMIT = 10\n");
    write(temp.path(), "broken.py", "def f(:\n");

    assert_eq!(find_untyped_files(temp.path(), &GlobSet::empty()), vec![untyped]);
}

#[test]
fn coverage_of_a_file() {
    let temp = TempDir::new().expect("temp dir");
    let file = write(
        temp.path(),
        "m.py",
        "def a(x: int):\n    pass\n\ndef b():\n    pass\n",
    );
    assert_eq!(file_coverage(&file), Some((1, 2)));
    assert_eq!(file_coverage(&temp.path().join("absent.py")), None);
}
