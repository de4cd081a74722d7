use anyhow::anyhow;
use async_trait::async_trait;
use slog_scope::{info, warn};
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[cfg(test)]
use mockall::automock;

use crate::StdResult;
use crate::error::HarnessError;

/// An external command: a program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessCommand {
    program: String,
    args: Vec<String>,
}

impl HarnessCommand {
    /// [HarnessCommand] factory
    pub fn new<P: Into<String>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build a command from a list whose first element is the program, ie: `["make", "clean"]`.
    pub fn from_parts(parts: &[String]) -> StdResult<Self> {
        match parts.split_first() {
            Some((program, args)) => Ok(Self::new(program.clone(), args.to_vec())),
            None => Err(anyhow!("a command must at least name a program")),
        }
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments given to the program
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Display for HarnessCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }

        Ok(())
    }
}

/// How a command must be run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Capture stdout and stderr instead of streaming them to the terminal
    pub capture: bool,

    /// Tolerate a non zero exit (or a deadline expiry) instead of failing
    pub allow_fail: bool,

    /// Kill the process if it's still running after this duration
    pub timeout: Option<Duration>,
}

impl RunOptions {
    /// Streamed output, failure is fatal.
    pub fn fatal() -> Self {
        Self::default()
    }

    /// Streamed output, failure is tolerated.
    pub fn tolerant() -> Self {
        Self {
            allow_fail: true,
            ..Self::default()
        }
    }

    /// Captured output, failure is tolerated, optional deadline.
    pub fn captured(timeout: Option<Duration>) -> Self {
        Self {
            capture: true,
            allow_fail: true,
            timeout,
        }
    }
}

/// What a finished (or killed) command left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed
    pub exit_code: Option<i32>,

    /// Captured stdout, empty if not captured
    pub stdout: String,

    /// Captured stderr, empty if not captured
    pub stderr: String,

    /// `true` if the process was killed because its deadline expired
    pub timed_out: bool,
}

impl CommandOutput {
    /// `true` if the process exited with a zero code
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Execute external commands synchronously from the caller point of view.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command in the given working directory and wait for it to finish.
    ///
    /// A failure that the options do not tolerate is returned as a [HarnessError].
    async fn run(
        &self,
        command: &HarnessCommand,
        work_dir: &Path,
        options: RunOptions,
    ) -> Result<CommandOutput, HarnessError>;
}

/// [ProcessRunner] spawning real processes with tokio.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokioProcessRunner {
    reserve_stdout: bool,
}

impl TokioProcessRunner {
    /// [TokioProcessRunner] factory
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, the command echo and the streamed output of the commands go to stderr, stdout
    /// is left to the caller (ie: for a JSON report).
    pub fn with_reserved_stdout(mut self, reserve_stdout: bool) -> Self {
        self.reserve_stdout = reserve_stdout;
        self
    }

    fn echo(&self, command: &HarnessCommand) {
        if self.reserve_stdout {
            eprintln!("+ {command}");
        } else {
            self.echo(command);
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        command: &HarnessCommand,
        work_dir: &Path,
        options: RunOptions,
    ) -> Result<CommandOutput, HarnessError> {
        self.echo(command);

        let mut process = Command::new(&command.program);
        process
            .current_dir(work_dir)
            .args(&command.args)
            .kill_on_drop(true);
        if options.capture {
            process.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else if self.reserve_stdout {
            process.stdout(std::io::stderr());
        }

        info!("Running {}", command.program; "work_dir" => %work_dir.display(), "args" => ?command.args);

        let child = process.spawn().map_err(|e| HarnessError::CommandSpawn {
            command: command.to_string(),
            source: anyhow!(e),
        })?;

        // Dropping the pending output future on timeout kills the child (`kill_on_drop`).
        let waited = match options.timeout {
            Some(deadline) => tokio::time::timeout(deadline, child.wait_with_output())
                .await
                .ok(),
            None => Some(child.wait_with_output().await),
        };

        let output = match waited {
            None => {
                warn!("Command killed after its deadline"; "command" => %command, "timeout" => ?options.timeout);
                CommandOutput {
                    timed_out: true,
                    ..CommandOutput::default()
                }
            }
            Some(result) => {
                let output = result.map_err(|e| HarnessError::CommandSpawn {
                    command: command.to_string(),
                    source: anyhow!(e).context("failed while waiting for the process"),
                })?;
                CommandOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    timed_out: false,
                }
            }
        };

        if output.success() || options.allow_fail {
            return Ok(output);
        }

        match output.exit_code {
            Some(exit_code) => Err(HarnessError::CommandFailed {
                command: command.to_string(),
                exit_code,
            }),
            None => Err(HarnessError::CommandTerminated {
                command: command.to_string(),
            }),
        }
    }
}
