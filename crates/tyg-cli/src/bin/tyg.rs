#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tyg_checker::FixOptions;
use tyg_cli::args::{
    AnnotateArgs, ApplyArgs, CheckArgs, CliArgs, Command, FixArgs, OutputFormat, ScanArgs,
};
use tyg_cli::config::{ResolvedConfig, load_config};
use tyg_cli::driver::{
    BatchOptions, DiagnosticSource, annotate_files, drop_excluded, fix_with_backup,
    parse_diagnostics, read_diagnostic_lines,
};
use tyg_cli::line_fix::{LineFix, apply_line_fix};
use tyg_cli::reporter::{Reporter, check_json, fix_json, to_json_string};
use tyg_cli::runner::MypyRunner;
use tyg_cli::scan::{file_coverage, find_untyped_files};
use tyg_common::Diagnostic;

const EXIT_SUCCESS: u8 = 0;
/// Diagnostics were found, or a requested edit was refused.
const EXIT_ISSUES: u8 = 1;
const EXIT_ERROR: u8 = 2;

struct Session {
    cwd: PathBuf,
    config: ResolvedConfig,
    format: OutputFormat,
    reporter: Reporter,
}

fn main() -> ExitCode {
    // Initialize tracing if TYG_LOG or RUST_LOG is set.
    tyg_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    match run(args) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: CliArgs) -> Result<u8> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = load_config(args.config.as_deref(), &cwd)?;
    let color =
        !args.no_color && args.format == OutputFormat::Text && std::io::stdout().is_terminal();
    let mut session = Session {
        cwd,
        config,
        format: args.format,
        reporter: Reporter::new(color),
    };

    match args.command {
        Command::Check(check) => handle_check(&session, &check),
        Command::Fix(fix) => handle_fix(&mut session, &fix),
        Command::Annotate(annotate) => handle_annotate(&mut session, &annotate),
        Command::Scan(scan) => handle_scan(&session, &scan),
        Command::Apply(apply) => handle_apply(&apply),
    }
}

fn emit_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json_string(value).context("failed to serialize report")?);
    Ok(())
}

/// Diagnostics for `target`, with excluded files removed.
fn collect_diagnostics(
    session: &Session,
    target: &Path,
    recorded: Option<&Path>,
) -> Result<(Vec<Diagnostic>, DiagnosticSource, MypyRunner)> {
    let source = DiagnosticSource::from_arg(recorded);
    let runner = MypyRunner::new(session.config.mypy.clone());
    let lines = read_diagnostic_lines(&source, target, &runner)?;
    let exclude = session.config.exclude_set()?;
    let diagnostics = drop_excluded(parse_diagnostics(&lines), &exclude, &session.cwd);
    Ok((diagnostics, source, runner))
}

fn handle_check(session: &Session, args: &CheckArgs) -> Result<u8> {
    let target = args.path.clone().unwrap_or_else(|| session.cwd.clone());
    let (diagnostics, _, _) = collect_diagnostics(session, &target, args.diagnostics.as_deref())?;

    match session.format {
        OutputFormat::Json => emit_json(&check_json(&diagnostics))?,
        OutputFormat::Text => {
            print!("{}", session.reporter.render_diagnostics(&diagnostics));
            print!("{}", session.reporter.render_breakdown(&diagnostics));
        }
    }
    Ok(if diagnostics.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_ISSUES
    })
}

fn handle_fix(session: &mut Session, args: &FixArgs) -> Result<u8> {
    session.config.apply_flags(args.strict, args.prune_imports);
    let target = args.path.clone().unwrap_or_else(|| session.cwd.clone());
    let (diagnostics, source, runner) =
        collect_diagnostics(session, &target, args.diagnostics.as_deref())?;

    let options = BatchOptions {
        fix: FixOptions {
            strict: session.config.strict,
            prune_imports: session.config.prune_imports,
        },
        dry_run: args.dry_run,
        parallel: args.parallel,
    };

    if session.format == OutputFormat::Text {
        print!("{}", session.reporter.render_breakdown(&diagnostics));
        if diagnostics.is_empty() {
            return Ok(EXIT_SUCCESS);
        }
        println!();
    }

    let result = fix_with_backup(diagnostics.clone(), &session.config.backup_dir, options)?;

    match session.format {
        OutputFormat::Json => emit_json(&fix_json(&diagnostics, &result, args.dry_run))?,
        OutputFormat::Text => {
            print!("{}", session.reporter.render_fix_result(&result, args.dry_run));
            let recheck = source == DiagnosticSource::Mypy && !args.dry_run && !args.no_recheck;
            if recheck {
                let remaining = parse_diagnostics(&runner.run(&target)?).len();
                println!();
                print!("{}", session.reporter.render_remaining(remaining));
            }
        }
    }
    Ok(EXIT_SUCCESS)
}

fn handle_annotate(session: &mut Session, args: &AnnotateArgs) -> Result<u8> {
    session.config.apply_flags(args.strict, false);
    let exclude = session.config.exclude_set()?;
    let files = find_untyped_files(&args.path, &exclude);
    let outcomes = annotate_files(&files, session.config.strict, args.dry_run)?;

    match session.format {
        OutputFormat::Json => emit_json(&outcomes)?,
        OutputFormat::Text => print!("{}", session.reporter.render_annotations(&outcomes)),
    }
    Ok(EXIT_SUCCESS)
}

fn handle_scan(session: &Session, args: &ScanArgs) -> Result<u8> {
    let exclude = session.config.exclude_set()?;
    let files: Vec<(PathBuf, Option<(usize, usize)>)> = find_untyped_files(&args.path, &exclude)
        .into_iter()
        .map(|file| {
            let coverage = file_coverage(&file);
            (file, coverage)
        })
        .collect();

    match session.format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = files
                .iter()
                .map(|(file, coverage)| {
                    serde_json::json!({
                        "file": file,
                        "annotated": coverage.map(|(annotated, _)| annotated),
                        "functions": coverage.map(|(_, total)| total),
                    })
                })
                .collect();
            emit_json(&rows)?;
        }
        OutputFormat::Text => print!("{}", session.reporter.render_untyped(&files)),
    }
    Ok(EXIT_SUCCESS)
}

fn handle_apply(args: &ApplyArgs) -> Result<u8> {
    let fix = LineFix {
        file: args.file.clone(),
        line: args.line,
        old_text: args.old.clone(),
        new_text: args.new.clone(),
    };
    match apply_line_fix(&fix).with_context(|| format!("failed to apply fix to {}", fix.file.display()))? {
        Ok(()) => {
            println!("Applied {}:{}", fix.file.display(), fix.line);
            Ok(EXIT_SUCCESS)
        }
        Err(reason) => {
            eprintln!("Not applied {}:{}: {reason}", fix.file.display(), fix.line);
            Ok(EXIT_ISSUES)
        }
    }
}
