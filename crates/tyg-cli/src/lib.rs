//! Command-line driver for the tyg annotation fixer.
//!
//! - `args` - clap definitions for the `tyg` binary
//! - `config` - `type-guardian.json` loading and flag overrides
//! - `runner` - invoking mypy with a timeout
//! - `driver` - the per-file fix batch and atomic rewrites
//! - `backup` - the timestamped snapshot directory
//! - `scan` - discovery of Python files and untyped-file detection
//! - `line_fix` - the manual single-line replacement path
//! - `reporter` - human and JSON output
//! - `tracing_config` - `TYG_LOG` subscriber setup

pub mod args;
pub mod backup;
pub mod config;
pub mod driver;
pub mod line_fix;
pub mod reporter;
pub mod runner;
pub mod scan;
pub mod tracing_config;
