use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::DeployResult;

/// A fully rendered command line, ready to be sent to a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommand {
    /// Command line as the remote login shell will see it.
    pub line: String,
    /// Log in as this user instead of the session default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_user: Option<String>,
    /// Needs a terminal (`sudo`, `passwd`); stdout is not captured.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interactive: bool,
}

impl RemoteCommand {
    #[must_use]
    pub fn new(line: &str) -> Self {
        Self {
            line: line.to_string(),
            login_user: None,
            interactive: false,
        }
    }

    #[must_use]
    pub fn login_user(mut self, user: Option<&str>) -> Self {
        self.login_user = user.map(str::to_string);
        self
    }

    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Exit code and captured stdout of a remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(stdout: &str) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.to_string(),
        }
    }

    #[must_use]
    pub const fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        !self.succeeded()
    }
}

/// Something that can execute commands on a target host.
///
/// A non-zero exit is reported through [`CommandOutput`], not as
/// an error. Errors mean the command could not be issued at all.
/// Transports may reserve an exit status for their own failures;
/// [`SshSession`](crate::ssh::SshSession) turns 255 into
/// [`DeployError::SshFailed`](crate::error::DeployError::SshFailed)
/// regardless of the calling scope.
pub trait Remote {
    /// Label used in log lines (usually the host name).
    fn name(&self) -> &str;

    /// Execute one command and wait for it to finish.
    fn execute(&self, command: &RemoteCommand) -> DeployResult<CommandOutput>;
}

/// In-memory [`Remote`] that records every command it is given.
///
/// Used for dry runs and tests. Responses are scripted by
/// substring: the first rule whose pattern occurs in the command
/// line wins; unmatched commands succeed with empty output.
///
/// ```
/// use pypln_deploy::remote::{CommandOutput, Recorder, Remote, RemoteCommand};
///
/// let remote = Recorder::new("dry-run").respond("id pypln", CommandOutput::failure(1));
///
/// let out = remote.execute(&RemoteCommand::new("id pypln")).unwrap();
/// assert!(out.failed());
/// assert_eq!(remote.lines(), vec!["id pypln"]);
/// ```
#[derive(Debug, Default)]
pub struct Recorder {
    name: String,
    rules: Vec<(String, CommandOutput)>,
    log: RefCell<Vec<RemoteCommand>>,
}

impl Recorder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn respond(mut self, pattern: &str, output: CommandOutput) -> Self {
        self.rules.push((pattern.to_string(), output));
        self
    }

    /// Every command executed so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<RemoteCommand> {
        self.log.borrow().clone()
    }

    /// Command lines executed so far, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.log.borrow().iter().map(|c| c.line.clone()).collect()
    }
}

impl Remote for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, command: &RemoteCommand) -> DeployResult<CommandOutput> {
        self.log.borrow_mut().push(command.clone());

        let output = self
            .rules
            .iter()
            .find(|(pattern, _)| command.line.contains(pattern.as_str()))
            .map_or_else(|| CommandOutput::success(""), |(_, out)| out.clone());

        Ok(output)
    }
}
