use tracing::{debug, info, warn};

use crate::error::{DeployError, DeployResult};
use crate::quote::{escape_double_quoted, shell_quote};
use crate::remote::{CommandOutput, Remote, RemoteCommand};

const SUDO_PROMPT: &str = "sudo password: ";

/// Execution scope for remote commands.
///
/// Scopes are cheap to clone and never mutate their parent:
/// `shell.cd("/srv").warn_only()` returns a new scope and leaves
/// `shell` untouched, so leaving a block restores the outer
/// context.
#[derive(Clone)]
pub struct Shell<'a> {
    remote: &'a dyn Remote,
    cwd: Option<String>,
    prefixes: Vec<String>,
    user: Option<String>,
    warn_only: bool,
}

#[derive(Clone, Copy)]
enum Mode<'u> {
    Run,
    Sudo(Option<&'u str>),
}

impl<'a> Shell<'a> {
    #[must_use]
    pub fn new(remote: &'a dyn Remote) -> Self {
        Self {
            remote,
            cwd: None,
            prefixes: Vec::new(),
            user: None,
            warn_only: false,
        }
    }

    /// Run subsequent commands from `dir`. Relative directories
    /// nest under the current one.
    #[must_use]
    pub fn cd(&self, dir: &str) -> Self {
        let mut next = self.clone();
        next.cwd = Some(match &self.cwd {
            Some(cwd) if !dir.starts_with('/') && !dir.starts_with('~') => {
                format!("{}/{dir}", cwd.trim_end_matches('/'))
            }
            _ => dir.to_string(),
        });
        next
    }

    /// Prepend `command &&` to every subsequent command.
    #[must_use]
    pub fn prefix(&self, command: &str) -> Self {
        let mut next = self.clone();
        next.prefixes.push(command.to_string());
        next
    }

    /// Log in as `user` for subsequent commands.
    #[must_use]
    pub fn as_user(&self, user: &str) -> Self {
        let mut next = self.clone();
        next.user = Some(user.to_string());
        next
    }

    /// Report failed commands instead of aborting.
    #[must_use]
    pub fn warn_only(&self) -> Self {
        let mut next = self.clone();
        next.warn_only = true;
        next
    }

    #[must_use]
    pub const fn is_warn_only(&self) -> bool {
        self.warn_only
    }

    /// Run a command as the login user.
    pub fn run(&self, command: &str) -> DeployResult<CommandOutput> {
        self.execute(command, Mode::Run, false)
    }

    /// Run a command that needs a terminal.
    pub fn run_interactive(&self, command: &str) -> DeployResult<CommandOutput> {
        self.execute(command, Mode::Run, true)
    }

    /// Run a command as root.
    ///
    /// sudo commands always get a terminal so the remote pty reads
    /// the password without echo. Their stdout is not captured.
    pub fn sudo(&self, command: &str) -> DeployResult<CommandOutput> {
        self.execute(command, Mode::Sudo(None), true)
    }

    /// Run a command as another local user on the host.
    pub fn sudo_as(&self, user: &str, command: &str) -> DeployResult<CommandOutput> {
        self.execute(command, Mode::Sudo(Some(user)), true)
    }

    /// Command line `run` would send for `command`.
    #[must_use]
    pub fn render_run(&self, command: &str) -> String {
        self.render(command, Mode::Run)
    }

    fn render(&self, command: &str, mode: Mode<'_>) -> String {
        let mut parts = Vec::new();
        if let Some(cwd) = &self.cwd {
            parts.push(format!("cd {}", shell_quote(cwd)));
        }
        parts.extend(self.prefixes.iter().cloned());
        parts.push(command.to_string());

        let inner = escape_double_quoted(&parts.join(" && "));
        match mode {
            Mode::Run => format!("/bin/bash -l -c \"{inner}\""),
            Mode::Sudo(None) => {
                format!("sudo -p '{SUDO_PROMPT}' /bin/bash -l -c \"{inner}\"")
            }
            Mode::Sudo(Some(user)) => format!(
                "sudo -p '{SUDO_PROMPT}' -u {} /bin/bash -l -c \"{inner}\"",
                shell_quote(user)
            ),
        }
    }

    fn execute(
        &self,
        command: &str,
        mode: Mode<'_>,
        interactive: bool,
    ) -> DeployResult<CommandOutput> {
        let host = self.remote.name();
        match mode {
            Mode::Run => info!("[{host}] run: {command}"),
            Mode::Sudo(None) => info!("[{host}] sudo: {command}"),
            Mode::Sudo(Some(user)) => info!("[{host}] sudo ({user}): {command}"),
        }

        let line = self.render(command, mode);
        debug!(%line, user = ?self.user, "rendered");

        let remote_command = RemoteCommand::new(&line)
            .login_user(self.user.as_deref())
            .interactive(interactive);
        let output = self.remote.execute(&remote_command)?;

        if output.failed() {
            if self.warn_only {
                warn!(
                    "[{host}] command exited with {:?}, continuing: {command}",
                    output.code
                );
            } else {
                return Err(DeployError::CommandFailed {
                    command: command.to_string(),
                    code: output.code,
                });
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Recorder;

    #[test]
    fn plain_run() {
        let remote = Recorder::new("h");
        let shell = Shell::new(&remote);

        assert_eq!(shell.render_run("uptime"), "/bin/bash -l -c \"uptime\"");
    }

    #[test]
    fn relative_cd_nests() {
        let remote = Recorder::new("h");
        let shell = Shell::new(&remote).cd("/srv/pypln/").cd("project");

        assert_eq!(
            shell.render_run("ls"),
            "/bin/bash -l -c \"cd /srv/pypln/project && ls\""
        );
    }

    #[test]
    fn absolute_cd_replaces() {
        let remote = Recorder::new("h");
        let shell = Shell::new(&remote).cd("/a").cd("/b");

        assert_eq!(shell.render_run("ls"), "/bin/bash -l -c \"cd /b && ls\"");
    }

    #[test]
    fn scopes_do_not_leak_into_parent() {
        let remote = Recorder::new("h");
        let outer = Shell::new(&remote);
        let _inner = outer.cd("/tmp").prefix("true").warn_only();

        assert!(!outer.is_warn_only());
        assert_eq!(outer.render_run("ls"), "/bin/bash -l -c \"ls\"");
    }
}
