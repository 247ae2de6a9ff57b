use std::process::{Command, ExitStatus, Stdio};

use crate::error::{DeployError, DeployResult};

/// Run a command, capturing stdout while stdin and stderr stay
/// attached to the terminal. Returns the exit status and the
/// trimmed stdout regardless of success.
pub fn capture(program: &str, args: &[&str]) -> DeployResult<(ExitStatus, String)> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| spawn_error(program, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok((output.status, stdout))
}

/// Run a command with stdin/stdout/stderr inherited (interactive).
pub fn interactive(program: &str, args: &[&str]) -> DeployResult<ExitStatus> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| spawn_error(program, e))
}

/// Check if a command exists on PATH.
#[must_use]
pub fn command_exists(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

fn spawn_error(program: &str, e: std::io::Error) -> DeployError {
    if e.kind() == std::io::ErrorKind::NotFound {
        DeployError::CommandNotFound(program.to_string())
    } else {
        DeployError::Io(e)
    }
}

#[must_use]
pub fn format_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| (*a).to_string()));
    parts.join(" ")
}
