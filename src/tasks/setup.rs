use tracing::info;

use crate::error::DeployResult;
use crate::quote::shell_quote;
use crate::secrets::{self, SmtpConfig};
use crate::tasks::{DEFAULT_DB_HOST, DEFAULT_DB_PORT, Tasks};

impl Tasks<'_> {
    pub fn install_system_packages(&self) -> DeployResult<()> {
        info!("installing system packages");
        self.shell.sudo("apt-get update")?;
        self.shell.sudo(&format!(
            "apt-get install -y {}",
            self.config.system_packages.join(" ")
        ))?;
        // Old virtualenv releases cannot opt back into system site
        // packages, so always upgrade it.
        self.shell.sudo("pip install --upgrade virtualenv")?;
        Ok(())
    }

    pub(crate) fn create_secret_key_file(&self) -> DeployResult<()> {
        let key = secrets::secret_key(&mut rand::rng());
        let path = self.config.secret_key_path();
        self.shell
            .sudo(&format!("echo {} > {path}", shell_quote(&key)))?;
        self.shell.sudo(&self.chown_command(&path, false))?;
        Ok(())
    }

    pub(crate) fn create_smtp_config(&self) -> DeployResult<()> {
        let smtp = SmtpConfig {
            host: self.prompter.prompt("smtp host:", Some("smtp.gmail.com"))?,
            port: self.prompter.prompt("smtp port:", Some("587"))?,
            user: self.prompter.prompt("smtp user:", None)?,
            password: self.prompter.prompt("smtp password:", None)?,
        };
        let path = self.config.smtp_config_path();
        self.shell
            .sudo(&format!("echo {} > {path}", shell_quote(&smtp.render())))?;
        self.shell.sudo(&self.chown_command(&path, false))?;
        self.shell.sudo(&format!("chmod 600 {path}"))?;
        Ok(())
    }

    /// Create the deployment account and its directories. Does
    /// nothing when the account already exists.
    ///
    /// Returns whether the account was created.
    pub fn create_deploy_user(&self) -> DeployResult<bool> {
        let user = &self.config.user;
        let existing = self.shell.warn_only().run(&format!("id {user}"))?;
        if existing.succeeded() {
            info!("user {user} already exists");
            return Ok(false);
        }

        info!("creating user {user}");
        self.shell.sudo(&format!(
            "useradd --shell=/bin/bash --home {} --create-home {user}",
            self.config.home
        ))?;
        for dir in [
            self.config.log_dir(),
            self.config.backup_dir(),
            self.config.project_root(),
        ] {
            self.shell.sudo(&format!("mkdir {dir}"))?;
            self.shell.sudo(&self.chown_command(&dir, true))?;
        }
        self.shell.sudo(&format!("passwd {user}"))?;
        self.create_secret_key_file()?;
        self.create_smtp_config()?;
        Ok(true)
    }

    /// Bring a fresh server up: packages, deployment account,
    /// checkouts, virtualenv, supervisord, nginx and database.
    pub fn initial_setup(&self, branch: &str) -> DeployResult<()> {
        info!("initial setup on branch {branch}");
        self.install_system_packages()?;
        self.create_deploy_user()?;

        let deploy_shell = self.shell.warn_only().as_user(&self.config.user);
        self.clone_repos(&deploy_shell, branch)?;
        deploy_shell.run(&format!(
            "virtualenv --system-site-packages {}",
            self.config.project_root()
        ))?;

        self.configure_supervisord()?;
        self.configure_nginx()?;
        let name = &self.config.name;
        self.create_db(name, name, DEFAULT_DB_HOST, DEFAULT_DB_PORT)?;
        Ok(())
    }
}
