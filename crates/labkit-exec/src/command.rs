//! Command execution with exit code checking.

use camino::Utf8Path;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::Command;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("exit code {code} from {command}")]
    Exit { command: String, code: i32 },
    #[error("{command} killed by signal {signal}")]
    Signal { command: String, signal: i32 },
}

impl ExecError {
    /// Exit code of the failed process, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::Exit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Render a command as `program arg1 arg2 ...` for messages.
pub fn describe(cmd: &Command) -> String {
    let std_cmd = cmd.as_std();
    std::iter::once(std_cmd.get_program())
        .chain(std_cmd.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_status(command: String, status: ExitStatus) -> Result<(), ExecError> {
    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(ExecError::Exit { command, code }),
        None => Err(ExecError::Signal {
            command,
            signal: status.signal().unwrap_or_default(),
        }),
    }
}

/// Run a command with inherited stdio and wait for it.
///
/// A zero exit code returns `Ok`, anything else is an error carrying the code.
pub async fn run_status(cmd: &mut Command) -> Result<(), ExecError> {
    let command = describe(cmd);
    tracing::debug!("running {}", command);
    let status = cmd.status().await.map_err(|source| ExecError::Spawn {
        command: command.clone(),
        source,
    })?;
    check_status(command, status)
}

/// Print the command, then run it like [`run_status`].
pub async fn run_verbose(cmd: &mut Command) -> Result<(), ExecError> {
    println!("sysexec: {}", describe(cmd));
    run_status(cmd).await
}

/// Run a command and return its stdout as a string.
///
/// Stdin is closed and stderr stays attached to the terminal.
pub async fn run_output(cmd: &mut Command) -> Result<String, ExecError> {
    let command = describe(cmd);
    let output = cmd
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(|source| ExecError::Spawn {
            command: command.clone(),
            source,
        })?;
    check_status(command, output.status)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a script through `sh -c`.
///
/// This is the only entry point that goes through a shell; everything else
/// passes argument lists.
pub async fn run_shell(script: &str, cwd: Option<&Utf8Path>) -> Result<(), ExecError> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    run_status(&mut cmd).await
}
