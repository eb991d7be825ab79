//! Python file discovery.

use globset::GlobSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tyg_checker::{annotation_coverage, needs_annotations};
use tyg_parser::parse_module;
use walkdir::{DirEntry, WalkDir};

/// Directories never worth descending into.
const SKIPPED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".mypy_cache",
    ".tox",
    ".type-guardian",
    ".venv",
    "__pycache__",
    "node_modules",
    "venv",
];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_python_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}

/// Every `.py` file under `root`, sorted. A file path is returned as is.
/// `exclude` is matched against paths relative to `root`.
#[must_use]
pub fn discover_python_files(root: &Path, exclude: &GlobSet) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .flatten()
        .filter(|entry| entry.file_type().is_file() && is_python_file(entry.path()))
        .map(|entry| entry.into_path())
        .filter(|path| {
            let relative = path.strip_prefix(root).unwrap_or(path);
            let excluded = exclude.is_match(relative);
            if excluded {
                trace!(path = %path.display(), "excluded");
            }
            !excluded
        })
        .collect();
    files.sort();
    debug!(root = %root.display(), count = files.len(), "discovered python files");
    files
}

/// Annotation coverage of one file; `None` when it cannot be read or parsed.
#[must_use]
pub fn file_coverage(path: &Path) -> Option<(usize, usize)> {
    let source = std::fs::read_to_string(path).ok()?;
    let module = parse_module(&path.display().to_string(), &source).ok()?;
    Some(annotation_coverage(&module.arena, module.root))
}

fn file_needs_annotations(path: &Path) -> bool {
    let Ok(source) = std::fs::read_to_string(path) else {
        return false;
    };
    match parse_module(&path.display().to_string(), &source) {
        Ok(module) => needs_annotations(&module.arena, module.root),
        Err(err) => {
            debug!(path = %path.display(), %err, "skipping unparsable file");
            false
        }
    }
}

/// Files under `root` where fewer than half of the functions carry any
/// annotation. Unreadable and unparsable files are skipped.
#[must_use]
pub fn find_untyped_files(root: &Path, exclude: &GlobSet) -> Vec<PathBuf> {
    discover_python_files(root, exclude)
        .into_iter()
        .filter(|path| file_needs_annotations(path))
        .collect()
}

#[cfg(test)]
#[path = "../tests/scan_tests.rs"]
mod scan_tests;
