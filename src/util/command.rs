use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::{BorgbahmError, Result};

/// Captured result of a command whose output we need to inspect.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the run and the external tools it drives.
///
/// `status` lets the child share the terminal; `output` captures stdout and
/// stderr. Both block until the child exits.
pub trait CommandRunner {
    fn status(&self, cmd: &mut Command) -> Result<i32>;
    fn output(&self, cmd: &mut Command) -> Result<CommandOutput>;
}

pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn status(&self, cmd: &mut Command) -> Result<i32> {
        log_command(cmd);
        let status = cmd.status().map_err(|e| spawn_error(cmd, e))?;
        Ok(exit_code(status))
    }

    fn output(&self, cmd: &mut Command) -> Result<CommandOutput> {
        log_command(cmd);
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(cmd, e))?;
        Ok(CommandOutput {
            code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// A child killed by a signal has no exit code; report it the way a shell
/// does, as 128 plus the signal number.
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

pub fn describe_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn log_command(cmd: &Command) {
    debug!(command = %describe_command(cmd), "running");
}

fn spawn_error(cmd: &Command, err: std::io::Error) -> BorgbahmError {
    BorgbahmError::message(format!("{}: {}", cmd.get_program().to_string_lossy(), err))
}

/// Exit status 0 is clean, 1 means the archiver finished with warnings.
pub fn archiver_accepts(code: i32) -> bool {
    code == 0 || code == 1
}
