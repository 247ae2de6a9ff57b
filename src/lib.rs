//! Deployment tasks for PyPLN.
//!
//! [Repository](https://github.com/NAMD/pypln-deploy)
//!
//! `pypln-deploy` provisions a server, checks out the PyPLN
//! repositories, wires them into supervisord and nginx, manages
//! the PostgreSQL database and pushes new releases. Every task is
//! a fixed sequence of commands sent over one SSH session.
//!
//! # Overview
//!
//! - [`Config`] holds the deployment layout: account, home
//!   directory, repositories, supervised daemons and packages.
//! - A [`Remote`](remote::Remote) executes commands on a host:
//!   [`SshSession`] for real runs, [`Recorder`](remote::Recorder)
//!   for dry runs and tests.
//! - A [`Shell`](shell::Shell) scopes commands: working
//!   directory, command prefix, login user, warn-only.
//! - [`Tasks`] are the recipes (`initial_setup`, `deploy`,
//!   `db_backup`, `db_restore`, `manage`, ...).
//! - [`Pipeline`] exposes the tasks as CLI subcommands.
//!
//! # Failure model
//!
//! A command that exits non-zero aborts its task with
//! [`DeployError::CommandFailed`](error::DeployError::CommandFailed).
//! The few steps that may legitimately fail (the deploy account
//! already exists, the database role already exists) run in a
//! warn-only scope and branch on the result. Restoring the
//! database asks for confirmation first.
//!
//! # Examples
//!
//! ## Wrapping the CLI
//!
//! Create an `xtask/src/main.rs` in your project:
//!
//! ```rust,no_run
//! use pypln_deploy::{Config, Pipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new()
//!         .home("/srv/pypln/")
//!         .daemons(&["router", "pipeliner", "broker", "web"]);
//!
//!     Pipeline::new(config).run()?;
//!     Ok(())
//! }
//! ```
//!
//! Then:
//!
//! ```sh
//! # Fresh server
//! cargo xtask --host pypln.example.com --user admin initial-setup
//!
//! # Push a release
//! cargo xtask --host pypln.example.com deploy --branch develop
//!
//! # Show what a deploy would run
//! cargo xtask deploy --dry-run
//!
//! # Database
//! cargo xtask --host pypln.example.com db-backup
//! cargo xtask --host pypln.example.com db-restore pypln_2013-04-02_17-05-09.backup
//! ```
//!
//! ## Driving tasks directly
//!
//! ```rust,no_run
//! use pypln_deploy::prompt::Console;
//! use pypln_deploy::{Config, SshSession, Tasks};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new();
//!     let ssh = SshSession::new("pypln.example.com").with_user("admin");
//!     let tasks = Tasks::new(&config, &ssh, &Console);
//!
//!     tasks.deploy("master")?;
//!     tasks.restart_services()?;
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for a
// deployment tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod backup;
pub mod cmd;
pub mod config;
pub mod error;
pub mod files;
pub mod pipeline;
pub mod prompt;
pub mod quote;
pub mod remote;
pub mod secrets;
pub mod shell;
pub mod ssh;
pub mod tasks;

pub use config::Config;
pub use error::{DeployError, DeployResult};
pub use pipeline::Pipeline;
pub use ssh::SshSession;
pub use tasks::Tasks;
