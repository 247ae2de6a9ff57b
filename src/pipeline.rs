use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cmd;
use crate::config::Config;
use crate::error::{DeployError, DeployResult};
use crate::prompt::{AssumeYes, Console, Prompter};
use crate::remote::{CommandOutput, Recorder, RemoteCommand};
use crate::ssh::SshSession;
use crate::tasks::{DEFAULT_DB_HOST, DEFAULT_DB_PORT, Tasks};

/// Entry point wiring the CLI to the deployment tasks.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse CLI arguments and dispatch the appropriate
    /// command.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatched command fails.
    pub fn run(&self) -> DeployResult<()> {
        let cli = Cli::parse();
        self.run_cli(&cli)
    }

    /// Dispatch already parsed arguments.
    pub fn run_cli(&self, cli: &Cli) -> DeployResult<()> {
        let config = self.effective_config(cli)?;

        if cli.dry_run {
            return Self::dry_run(&config, cli);
        }

        let host = cli.host.as_deref().ok_or(DeployError::MissingHost)?;
        if !cmd::command_exists("ssh") {
            return Err(DeployError::CommandNotFound("ssh".into()));
        }

        let mut ssh = SshSession::new(host);
        if let Some(user) = &cli.user {
            ssh = ssh.with_user(user);
        }
        if let Some(key) = &cli.key {
            ssh = ssh.with_key(key);
        }

        let prompter: &dyn Prompter = match &cli.command {
            Command::DbRestore { yes: true, .. } => &AssumeYes,
            _ => &Console,
        };

        let tasks = Tasks::new(&config, &ssh, prompter);
        dispatch(&tasks, &cli.command)?;
        info!("done");
        Ok(())
    }

    /// The pipeline's layout with `--config` layered on top. Keys
    /// missing from the file keep the values given to
    /// [`Pipeline::new`].
    pub fn effective_config(&self, cli: &Cli) -> DeployResult<Config> {
        match &cli.config {
            Some(path) => self.config.layer_yaml_file(path),
            None => Ok(self.config.clone()),
        }
    }

    fn dry_run(config: &Config, cli: &Cli) -> DeployResult<()> {
        let remote = Recorder::new(cli.host.as_deref().unwrap_or("dry-run"))
            .respond("git rev-parse", CommandOutput::success("<sha1>"));
        let tasks = Tasks::new(config, &remote, &AssumeYes);

        eprintln!("=== Dry run: no changes will be made ===");
        eprintln!();
        let result = dispatch(&tasks, &cli.command);

        println!("{}", render_plan(&remote.commands(), cli.json)?);
        result
    }
}

/// Dry-run listing: one line per command, prefixed with `[user] `
/// when it logs in as someone else, or a JSON array.
pub fn render_plan(commands: &[RemoteCommand], json: bool) -> DeployResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(commands)?);
    }
    let lines: Vec<String> = commands
        .iter()
        .map(|command| match &command.login_user {
            Some(user) => format!("[{user}] {}", command.line),
            None => command.line.clone(),
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Run one CLI command against `tasks`.
pub fn dispatch(tasks: &Tasks<'_>, command: &Command) -> DeployResult<()> {
    match command {
        Command::InitialSetup { branch } => tasks.initial_setup(branch),
        Command::Deploy { branch } => tasks.deploy(branch),
        Command::RestartServices => tasks.restart_services(),
        Command::InstallSystemPackages => tasks.install_system_packages(),
        Command::CreateDb {
            db_user,
            db_name,
            db_host,
            db_port,
        } => tasks.create_db(db_user, db_name, db_host, *db_port).map(drop),
        Command::DbBackup => {
            let path = tasks.db_backup()?;
            eprintln!("Backup written to {path}");
            Ok(())
        }
        Command::DbRestore { filename, .. } => tasks.db_restore(filename),
        Command::Manage {
            command,
            environment,
        } => tasks.manage(&command.join(" "), environment),
    }
}

#[derive(Debug, Parser)]
#[command(name = "pypln-deploy")]
#[command(about = "Deployment automation for PyPLN")]
pub struct Cli {
    /// Hostname or IP address of the target server
    #[arg(long, global = true, env = "PYPLN_DEPLOY_HOST")]
    pub host: Option<String>,

    /// SSH login user (needs sudo rights)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// SSH private key
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// YAML file overriding the default layout
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// With --dry-run, print the commands as JSON
    #[arg(long, global = true, requires = "dry_run")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Install packages, create the deploy user, clone, and
    /// configure supervisord, nginx and the database
    InitialSetup {
        #[arg(long, default_value = crate::tasks::DEFAULT_BRANCH)]
        branch: String,
    },

    /// Deploy a branch to the server
    Deploy {
        #[arg(long, default_value = crate::tasks::DEFAULT_BRANCH)]
        branch: String,
    },

    /// Restart supervisord and nginx
    RestartServices,

    /// Install the system packages
    InstallSystemPackages,

    /// Create a database role and a database it owns
    CreateDb {
        db_user: String,
        db_name: String,

        #[arg(long, default_value = DEFAULT_DB_HOST)]
        db_host: String,

        #[arg(long, default_value_t = DEFAULT_DB_PORT)]
        db_port: u16,
    },

    /// Dump the database into the backup directory
    DbBackup,

    /// Restore the database from a backup file
    DbRestore {
        /// File name inside the backup directory
        filename: String,

        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Run a Django management command
    Manage {
        #[arg(long, default_value = crate::tasks::DEFAULT_ENVIRONMENT)]
        environment: String,

        /// Management command and its arguments
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        command: Vec<String>,
    },
}
