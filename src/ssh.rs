use tracing::debug;

use crate::cmd;
use crate::error::{DeployError, DeployResult};
use crate::remote::{CommandOutput, Remote, RemoteCommand};

/// Exit status `ssh` itself uses for connection errors.
const SSH_CONNECTION_ERROR: i32 = 255;

/// SSH session wrapper for executing commands on a remote host
/// through the system `ssh` client.
pub struct SshSession {
    host: String,
    user: Option<String>,
    key: Option<String>,
    program: String,
}

impl SshSession {
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            user: None,
            key: None,
            program: "ssh".to_string(),
        }
    }

    /// Default login user. Without one, `ssh` falls back to its
    /// own configuration.
    #[must_use]
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key_path: &str) -> Self {
        self.key = Some(key_path.to_string());
        self
    }

    /// Client binary to spawn instead of `ssh` from `PATH`. It gets
    /// the same arguments and must follow `ssh`'s exit conventions.
    #[must_use]
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Destination argument (`user@host` or `host`) for a command.
    #[must_use]
    pub fn destination(&self, login_user: Option<&str>) -> String {
        match login_user.or(self.user.as_deref()) {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    /// Full `ssh` argument list for a command.
    #[must_use]
    pub fn build_ssh_args(&self, command: &RemoteCommand) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-o".to_string(),
            "ConnectTimeout=10".to_string(),
        ];
        if let Some(key) = &self.key {
            args.push("-i".to_string());
            args.push(key.clone());
        }
        if command.interactive {
            args.push("-t".to_string());
        }
        args.push(self.destination(command.login_user.as_deref()));
        args.push(command.line.clone());
        args
    }
}

/// Exit status 255 is `ssh`'s own connection failure and becomes
/// [`DeployError::SshFailed`], even for commands a `warn_only` scope
/// would tolerate. A remote command exiting 255 is indistinguishable
/// from that and is reported the same way.
impl Remote for SshSession {
    fn name(&self) -> &str {
        &self.host
    }

    fn execute(&self, command: &RemoteCommand) -> DeployResult<CommandOutput> {
        let args = self.build_ssh_args(command);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!(command = %cmd::format_command(&self.program, &refs), "spawning");

        let (status, stdout) = if command.interactive {
            (cmd::interactive(&self.program, &refs)?, String::new())
        } else {
            cmd::capture(&self.program, &refs)?
        };

        if status.code() == Some(SSH_CONNECTION_ERROR) {
            return Err(DeployError::SshFailed(format!(
                "could not reach {}",
                self.destination(command.login_user.as_deref())
            )));
        }

        Ok(CommandOutput {
            code: status.code(),
            stdout,
        })
    }
}
