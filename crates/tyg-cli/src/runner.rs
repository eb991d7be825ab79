//! Running mypy.
//!
//! The process is polled until it exits or the configured timeout expires.
//! Output is drained on reader threads so a chatty run cannot fill the pipe
//! and stall the child.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info_span};

use crate::config::MypySettings;

/// Flags that make the output parseable line by line.
pub const REPORT_FLAGS: [&str; 3] = [
    "--show-column-numbers",
    "--show-error-codes",
    "--no-error-summary",
];

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct MypyRunner {
    settings: MypySettings,
}

impl MypyRunner {
    #[must_use]
    pub fn new(settings: MypySettings) -> Self {
        Self { settings }
    }

    /// Program and arguments for a run over `target`.
    ///
    /// `command` may carry its own arguments (`python3 -m mypy`); it is
    /// split on whitespace.
    #[must_use]
    pub fn command_line(&self, target: &Path) -> Vec<String> {
        let mut argv: Vec<String> = self
            .settings
            .command
            .split_whitespace()
            .map(str::to_string)
            .collect();
        argv.push(target.display().to_string());
        if let Some(config_file) = &self.settings.config_file
            && config_file.exists()
        {
            argv.push("--config-file".to_string());
            argv.push(config_file.display().to_string());
        }
        argv.extend(REPORT_FLAGS.iter().map(|flag| flag.to_string()));
        argv.extend(self.settings.args.iter().cloned());
        argv
    }

    /// Run mypy over `target` and return its non-empty stdout lines.
    ///
    /// A non-zero exit status is expected whenever diagnostics were found and
    /// is not an error. A missing executable and a timeout are.
    pub fn run(&self, target: &Path) -> Result<Vec<String>> {
        let argv = self.command_line(target);
        let Some((program, args)) = argv.split_first() else {
            bail!("mypy command is empty; set mypy.command in the configuration");
        };
        let _span = info_span!("mypy", target = %target.display()).entered();

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                bail!("{program} not found - install with: pip install mypy");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to start {program}"));
            }
        };

        let stdout = child.stdout.take().context("take mypy stdout")?;
        let stderr = child.stderr.take().context("take mypy stderr")?;
        let stdout_thread = std::thread::spawn(move || read_all(stdout));
        let stderr_thread = std::thread::spawn(move || read_all(stderr));

        let (status, timed_out) = wait_with_timeout(&mut child, self.settings.timeout)?;
        let stdout = stdout_thread.join().unwrap_or_default();
        let stderr = stderr_thread.join().unwrap_or_default();

        if timed_out {
            bail!(
                "mypy timed out after {} seconds; raise mypy.timeoutSecs or check a smaller path",
                self.settings.timeout.as_secs()
            );
        }
        debug!(code = ?status.code(), stderr_bytes = stderr.len(), "mypy finished");

        let lines = output_lines(&stdout);
        if lines.is_empty() && !status.success() && !stderr.trim().is_empty() {
            bail!("mypy failed: {}", stderr.trim());
        }
        Ok(lines)
    }
}

fn read_all(mut reader: impl Read) -> String {
    let mut buf = String::new();
    let _ = reader.read_to_string(&mut buf);
    buf
}

/// Wait for `child`, killing it once `timeout` has elapsed.
/// Returns the exit status and whether the child was killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(ExitStatus, bool)> {
    let deadline = Instant::now().checked_add(timeout.max(Duration::from_millis(1)));
    loop {
        if let Some(status) = child.try_wait().context("try_wait mypy")? {
            return Ok((status, false));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            let _ = child.kill();
            let status = child.wait().context("wait mypy after kill")?;
            return Ok((status, true));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Non-blank lines of a captured stream.
#[must_use]
pub fn output_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "../tests/runner_tests.rs"]
mod runner_tests;
