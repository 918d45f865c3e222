//! External stage processes (the content generator, the mockup renderer).

use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use std::time::Duration;

use crate::error::StageError;

/// Longest stderr tail kept in a [`StageError::Execution`].
const STDERR_TAIL_CHARS: usize = 2000;

/// A program plus arguments, run with the artifact root as working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    program: String,
    args: Vec<String>,
}

/// Returned when parsing a blank command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stage command is empty")]
pub struct EmptyCommand;

impl StageCommand {
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command to completion inside `cwd`.
    ///
    /// Stdout is logged at debug level. The child is killed if `timeout`
    /// elapses first.
    ///
    /// # Errors
    ///
    /// - [`StageError::Spawn`] if the program cannot be started.
    /// - [`StageError::Timeout`] if it runs longer than `timeout`.
    /// - [`StageError::Execution`] on a non-zero exit, carrying the exit code
    ///   and the tail of stderr.
    pub async fn run(&self, cwd: &Path, timeout: Duration) -> Result<(), StageError> {
        tracing::info!(program = %self.program, args = ?self.args, "starting stage command");

        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| StageError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| StageError::Spawn {
                program: self.program.clone(),
                source: e,
            })?,
            Err(_) => {
                return Err(StageError::Timeout {
                    program: self.program.clone(),
                    secs: timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!(program = %self.program, "{line}");
        }

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(StageError::Execution {
            program: self.program.clone(),
            code: output.status.code(),
            stderr: tail(stderr.trim(), STDERR_TAIL_CHARS).to_string(),
        })
    }
}

impl FromStr for StageCommand {
    type Err = EmptyCommand;

    /// Splits on whitespace; the first word is the program. No shell quoting
    /// is interpreted.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let program = words.next().ok_or(EmptyCommand)?;
        Ok(Self::new(program, words))
    }
}

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    text.char_indices()
        .nth(skip)
        .map_or(text, |(idx, _)| &text[idx..])
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
