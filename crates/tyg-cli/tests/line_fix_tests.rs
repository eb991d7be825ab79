use super::*;
use tempfile::TempDir;

fn fix(line: u32, old_text: &str, new_text: &str) -> LineFix {
    LineFix {
        file: PathBuf::from("app.py"),
        line,
        old_text: old_text.to_string(),
        new_text: new_text.to_string(),
    }
}

#[test]
fn replaces_matching_line() {
    let source = "import os\nx = 1\nprint(x)\n";
    assert_eq!(
        replace_line(source, &fix(2, "x = 1", "x: int = 1")),
        Ok("import os\nx: int = 1\nprint(x)\n".to_string())
    );
}

#[test]
fn match_ignores_surrounding_whitespace() {
    let source = "def f():\n    x = 1\n";
    assert_eq!(
        replace_line(source, &fix(2, "x = 1  ", "    x: int = 1\n")),
        Ok("def f():\n    x: int = 1\n".to_string())
    );
}

#[test]
fn keeps_crlf_and_missing_final_newline() {
    assert_eq!(
        replace_line("a = 1\r\nb = 2", &fix(1, "a = 1", "a: int = 1")),
        Ok("a: int = 1\r\nb = 2".to_string())
    );
    assert_eq!(
        replace_line("a = 1\r\nb = 2", &fix(2, "b = 2", "b: int = 2")),
        Ok("a = 1\r\nb: int = 2".to_string())
    );
}

#[test]
fn refuses_mismatch_and_out_of_range() {
    let source = "x = 1\n";
    assert_eq!(
        replace_line(source, &fix(1, "y = 1", "y: int = 1")),
        Err(LineFixError::Mismatch {
            found: "x = 1".to_string()
        })
    );
    assert_eq!(
        replace_line(source, &fix(0, "x = 1", "")),
        Err(LineFixError::LineOutOfRange { lines: 1 })
    );
    assert_eq!(
        replace_line(source, &fix(2, "x = 1", "")),
        Err(LineFixError::LineOutOfRange { lines: 1 })
    );
}

#[test]
fn apply_rewrites_the_file() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("app.py");
    std::fs::write(&path, "count = 0\n").expect("write source");
    let fix = LineFix {
        file: path.clone(),
        line: 1,
        old_text: "count = 0".to_string(),
        new_text: "count: int = 0".to_string(),
    };

    assert_eq!(apply_line_fix(&fix).expect("io should succeed"), Ok(()));
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "count: int = 0\n");

    // The line changed, so the same fix is now refused.
    assert!(matches!(
        apply_line_fix(&fix).expect("io should succeed"),
        Err(LineFixError::Mismatch { .. })
    ));
}

#[test]
fn apply_reports_missing_file() {
    let temp = TempDir::new().expect("temp dir");
    let fix = LineFix {
        file: temp.path().join("absent.py"),
        line: 1,
        old_text: String::new(),
        new_text: String::new(),
    };
    assert_eq!(
        apply_line_fix(&fix).expect("io should succeed"),
        Err(LineFixError::FileMissing)
    );
}
