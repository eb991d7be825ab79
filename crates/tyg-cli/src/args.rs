use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tyg binary.
#[derive(Parser, Debug)]
#[command(
    name = "tyg",
    version,
    about = "Repair missing and incorrect Python type annotations from mypy diagnostics"
)]
pub struct CliArgs {
    /// Path to a type-guardian.json file (default: ./type-guardian.json if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run mypy and report the diagnostics without changing any file.
    Check(CheckArgs),
    /// Fix the diagnostics reported for a path.
    Fix(FixArgs),
    /// Add inferred annotations to files that are mostly unannotated.
    Annotate(AnnotateArgs),
    /// List files that are mostly unannotated.
    Scan(ScanArgs),
    /// Replace one source line, only if it still reads as expected.
    Apply(ApplyArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// File or directory to check (default: current directory).
    pub path: Option<PathBuf>,

    /// Read diagnostic lines from a file ("-" for stdin) instead of running mypy.
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FixArgs {
    /// File or directory to fix (default: current directory).
    pub path: Option<PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Leave a diagnostic unfixed instead of annotating it with Any.
    #[arg(long)]
    pub strict: bool,

    /// Process files concurrently.
    #[arg(long)]
    pub parallel: bool,

    /// Drop typing imports that are no longer referenced.
    #[arg(long = "prune-imports")]
    pub prune_imports: bool,

    /// Read diagnostic lines from a file ("-" for stdin) instead of running mypy.
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,

    /// Skip the final mypy run that counts the remaining diagnostics.
    #[arg(long = "no-recheck")]
    pub no_recheck: bool,
}

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// File or directory to annotate.
    pub path: PathBuf,

    /// Report the counts without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Leave a parameter or return unannotated instead of using Any.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// File or directory to scan.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// File to edit.
    pub file: PathBuf,

    /// 1-based line number.
    #[arg(long)]
    pub line: u32,

    /// Text the line is expected to hold (whitespace-insensitive).
    #[arg(long)]
    pub old: String,

    /// Replacement text for the line.
    #[arg(long)]
    pub new: String,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;
