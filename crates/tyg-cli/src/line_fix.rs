//! The manual-apply path: a textual single-line replacement.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::driver::write_atomic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFix {
    pub file: PathBuf,
    /// 1-based.
    pub line: u32,
    pub old_text: String,
    pub new_text: String,
}

/// Why a line fix was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFixError {
    FileMissing,
    LineOutOfRange { lines: usize },
    /// The line no longer reads as `old_text`.
    Mismatch { found: String },
}

impl std::fmt::Display for LineFixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileMissing => f.write_str("file does not exist"),
            Self::LineOutOfRange { lines } => write!(f, "line is out of range (file has {lines} lines)"),
            Self::Mismatch { found } => write!(f, "line does not match, found: {found}"),
        }
    }
}

/// Replace one line of `source`.
///
/// The current line must equal `old_text` once both are trimmed. The line
/// ending of the replaced line is kept.
pub fn replace_line(source: &str, fix: &LineFix) -> Result<String, LineFixError> {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    let Some(index) = (fix.line as usize)
        .checked_sub(1)
        .filter(|index| *index < lines.len())
    else {
        return Err(LineFixError::LineOutOfRange { lines: lines.len() });
    };

    let current = lines[index];
    if current.trim() != fix.old_text.trim() {
        return Err(LineFixError::Mismatch {
            found: current.trim_end().to_string(),
        });
    }

    let ending = if current.ends_with("\r\n") {
        "\r\n"
    } else if current.ends_with('\n') {
        "\n"
    } else {
        ""
    };
    let mut out = String::with_capacity(source.len() + fix.new_text.len());
    for (i, line) in lines.iter().enumerate() {
        if i == index {
            out.push_str(fix.new_text.trim_end_matches(['\r', '\n']));
            out.push_str(ending);
        } else {
            out.push_str(line);
        }
    }
    Ok(out)
}

/// Apply `fix` to its file. `Ok(Err(_))` means the fix was refused and the
/// file is untouched; `Err(_)` is an I/O failure.
pub fn apply_line_fix(fix: &LineFix) -> Result<Result<(), LineFixError>> {
    if !fix.file.is_file() {
        return Ok(Err(LineFixError::FileMissing));
    }
    let source = std::fs::read_to_string(&fix.file)?;
    match replace_line(&source, fix) {
        Ok(updated) => {
            write_atomic(&fix.file, &updated)?;
            debug!(file = %fix.file.display(), line = fix.line, "applied line fix");
            Ok(Ok(()))
        }
        Err(reason) => {
            debug!(file = %fix.file.display(), line = fix.line, %reason, "line fix refused");
            Ok(Err(reason))
        }
    }
}

#[cfg(test)]
#[path = "../tests/line_fix_tests.rs"]
mod line_fix_tests;
