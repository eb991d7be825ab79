//! Snapshot directory created before a batch rewrites files.
//!
//! One subdirectory per run, named after the local time. It holds a copy of
//! every file the run is about to touch and a README pointing at git for
//! restores.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Component, Path, PathBuf};
use tracing::info;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone)]
pub struct Backup {
    pub dir: PathBuf,
    pub timestamp: String,
}

/// Create `<backup_root>/<timestamp>/` with its README and a copy of each
/// existing file in `files`.
pub fn create_backup(backup_root: &Path, files: &[PathBuf]) -> Result<Backup> {
    create_backup_at(backup_root, files, Local::now())
}

pub fn create_backup_at(backup_root: &Path, files: &[PathBuf], now: DateTime<Local>) -> Result<Backup> {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let dir = backup_root.join(&timestamp);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create backup directory {}", dir.display()))?;

    std::fs::write(
        dir.join("README.txt"),
        format!("Backup created at {timestamp}\nUse git to restore if needed\n"),
    )
    .with_context(|| format!("failed to write backup note in {}", dir.display()))?;

    let mut copied = 0usize;
    for file in files {
        if !file.is_file() {
            continue;
        }
        let target = dir.join(relative_backup_path(file));
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::copy(file, &target)
            .with_context(|| format!("failed to back up {}", file.display()))?;
        copied += 1;
    }

    info!(dir = %dir.display(), copied, "created backup");
    Ok(Backup { dir, timestamp })
}

/// `file` with root, prefix and parent components dropped, so the copy
/// always lands inside the backup directory.
fn relative_backup_path(file: &Path) -> PathBuf {
    file.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/backup_tests.rs"]
mod backup_tests;
