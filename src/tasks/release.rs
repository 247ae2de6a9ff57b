use tracing::info;

use crate::error::{DeployError, DeployResult};
use crate::shell::Shell;
use crate::tasks::{DEFAULT_ENVIRONMENT, Tasks};

impl Tasks<'_> {
    /// Push `branch` to the server: update every checkout,
    /// reinstall the Python packages, refresh the crontab, migrate
    /// and reload the supervised processes.
    pub fn deploy(&self, branch: &str) -> DeployResult<()> {
        info!("deploying {branch}");
        let shell = self.release_shell().cd(&self.config.project_root());

        self.update_code(&shell, branch)?;

        shell
            .cd(&self.config.backend_root())
            .run("python setup.py install")?;
        shell
            .cd(&self.config.web_root())
            .run("python setup.py install")?;
        // TODO: move all of pypln.web's requirements into one file.
        shell
            .cd(&self.config.django_root())
            .run("pip install -r requirements/project.txt")?;

        shell.run("python -m nltk.downloader all")?;

        self.update_crontab(&shell)?;

        for command in ["syncdb --noinput", "migrate", "collectstatic --noinput"] {
            self.manage_in(&shell, command, DEFAULT_ENVIRONMENT)?;
        }

        shell.run("supervisorctl reload")?;
        info!("deployed {branch}");
        Ok(())
    }

    /// Run a Django management command against the given settings
    /// module (`settings.<environment>`).
    pub fn manage(&self, command: &str, environment: &str) -> DeployResult<()> {
        self.manage_in(&self.release_shell(), command, environment)
    }

    fn manage_in(&self, shell: &Shell<'_>, command: &str, environment: &str) -> DeployResult<()> {
        if command.trim().is_empty() {
            return Err(DeployError::InvalidArgument("management command is empty".into()));
        }
        shell.run(&format!(
            "python {} {command} --settings=settings.{environment}",
            self.config.manage_script()
        ))?;
        Ok(())
    }

    /// Install the crontab shipped in the deploy repository.
    fn update_crontab(&self, shell: &Shell<'_>) -> DeployResult<()> {
        shell.run(&format!("crontab {}", self.config.crontab()))?;
        Ok(())
    }
}
