//! Task recipes.
//!
//! Each task is a fixed, top-to-bottom sequence of remote
//! commands. A failing command aborts the task unless the task
//! explicitly runs it in a warn-only scope.

mod database;
mod release;
mod repository;
mod services;
mod setup;

use crate::config::Config;
use crate::prompt::Prompter;
use crate::remote::Remote;
use crate::shell::Shell;

pub use services::{NGINX_SITES_ENABLED, SUPERVISOR_CONF, SUPERVISOR_INCLUDE_DIR};

/// Default database host for [`Tasks::create_db`].
pub const DEFAULT_DB_HOST: &str = "localhost";
/// Default database port for [`Tasks::create_db`].
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// The deployment tasks bound to one host.
///
/// # Example
///
/// ```
/// use pypln_deploy::remote::Recorder;
/// use pypln_deploy::prompt::AssumeYes;
/// use pypln_deploy::{Config, Tasks};
///
/// let config = Config::new();
/// let remote = Recorder::new("dry-run");
/// let tasks = Tasks::new(&config, &remote, &AssumeYes);
///
/// tasks.restart_services().unwrap();
///
/// assert_eq!(remote.lines().len(), 3);
/// ```
pub struct Tasks<'a> {
    config: &'a Config,
    shell: Shell<'a>,
    prompter: &'a dyn Prompter,
}

impl<'a> Tasks<'a> {
    #[must_use]
    pub fn new(config: &'a Config, remote: &'a dyn Remote, prompter: &'a dyn Prompter) -> Self {
        Self {
            config,
            shell: Shell::new(remote),
            prompter,
        }
    }

    /// Scope for commands run by the deployment account inside the
    /// project virtualenv.
    fn release_shell(&self) -> Shell<'a> {
        self.shell
            .prefix(&format!("source {}", self.config.activate_script()))
            .as_user(&self.config.user)
    }

    /// `chown -R user:user path`
    fn chown_command(&self, path: &str, recursive: bool) -> String {
        let user = &self.config.user;
        if recursive {
            format!("chown -R {user}:{user} {path}")
        } else {
            format!("chown {user}:{user} {path}")
        }
    }
}
