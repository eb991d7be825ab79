//! `type-guardian.json` loading.
//!
//! Every field of the file is optional. Values missing from the file fall back
//! to the built-in defaults, and command-line flags win over both.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use tyg_common::limits::TYPE_CHECKER_TIMEOUT;

pub const CONFIG_FILE_NAME: &str = "type-guardian.json";
pub const DEFAULT_BACKUP_DIR: &str = ".type-guardian/backups";
pub const DEFAULT_MYPY_COMMAND: &str = "mypy";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid exclude pattern '{pattern}': {source}")]
    Exclude {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Custom deserializer for boolean options that can be either bool or string.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{}'. Expected true, false, 'yes', or 'no'",
                s
            ))),
        },
    }
}

/// The file as written.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub strict: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub prune_imports: Option<bool>,
    #[serde(default)]
    pub backup_dir: Option<PathBuf>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub mypy: Option<MypyConfigFile>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MypyConfigFile {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub config_file: Option<PathBuf>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// How mypy is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MypySettings {
    pub command: String,
    pub config_file: Option<PathBuf>,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for MypySettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_MYPY_COMMAND.to_string(),
            config_file: None,
            args: Vec::new(),
            timeout: TYPE_CHECKER_TIMEOUT,
        }
    }
}

/// Settings after defaults and flag overrides have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub strict: bool,
    pub prune_imports: bool,
    pub backup_dir: PathBuf,
    pub exclude: Vec<String>,
    pub mypy: MypySettings,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ConfigFile::default().resolve()
    }
}

impl ConfigFile {
    #[must_use]
    pub fn resolve(self) -> ResolvedConfig {
        let mypy = self.mypy.unwrap_or_default();
        let defaults = MypySettings::default();
        ResolvedConfig {
            strict: self.strict.unwrap_or(false),
            prune_imports: self.prune_imports.unwrap_or(false),
            backup_dir: self
                .backup_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_DIR)),
            exclude: self.exclude.unwrap_or_default(),
            mypy: MypySettings {
                command: mypy.command.unwrap_or(defaults.command),
                config_file: mypy.config_file,
                args: mypy.args.unwrap_or_default(),
                timeout: mypy
                    .timeout_secs
                    .map_or(defaults.timeout, Duration::from_secs),
            },
        }
    }
}

impl ResolvedConfig {
    /// Flags only ever switch an option on; an option enabled in the file
    /// stays enabled.
    pub fn apply_flags(&mut self, strict: bool, prune_imports: bool) {
        self.strict |= strict;
        self.prune_imports |= prune_imports;
    }

    /// Make relative paths relative to `base`.
    pub fn anchor(&mut self, base: &Path) {
        if self.backup_dir.is_relative() {
            self.backup_dir = base.join(&self.backup_dir);
        }
        if let Some(config_file) = &self.mypy.config_file
            && config_file.is_relative()
        {
            self.mypy.config_file = Some(base.join(config_file));
        }
    }

    pub fn exclude_set(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Exclude {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Exclude {
            pattern: self.exclude.join(", "),
            source,
        })
    }
}

pub fn parse_config(source: &str) -> Result<ConfigFile, serde_json::Error> {
    serde_json::from_str(source)
}

/// Load the configuration.
///
/// An explicit path must exist. Without one, `type-guardian.json` in `cwd`
/// is used when present and the defaults otherwise.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<ResolvedConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                debug!(cwd = %cwd.display(), "no configuration file, using defaults");
                let mut config = ResolvedConfig::default();
                config.anchor(cwd);
                return Ok(config);
            }
            candidate
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let file = parse_config(&text).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "loaded configuration");

    let mut config = file.resolve();
    let base = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(cwd);
    config.anchor(base);
    Ok(config)
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;
