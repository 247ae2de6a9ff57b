use tracing::info;

use crate::error::DeployResult;
use crate::quote::shell_quote;
use crate::shell::Shell;
use crate::tasks::Tasks;

impl Tasks<'_> {
    /// Hard-reset the checkout in the scope's directory to
    /// `origin/<branch>`.
    ///
    /// The same branch name is used for every repository.
    pub(crate) fn update_repository(shell: &Shell<'_>, branch: &str) -> DeployResult<()> {
        let branch = shell_quote(branch);
        shell.run("git remote update")?;
        let sha1 = shell.run(&format!("git rev-parse origin/{branch}"))?.stdout;
        shell.run(&format!("git checkout {branch}"))?;
        shell.run(&format!("git reset --hard {}", shell_quote(&sha1)))?;
        Ok(())
    }

    /// Update the backend, web and deploy checkouts, in that order.
    pub(crate) fn update_code(&self, shell: &Shell<'_>, branch: &str) -> DeployResult<()> {
        for (_, root) in self.config.checkouts() {
            info!("updating {root} to {branch}");
            Self::update_repository(&shell.cd(&root), branch)?;
        }
        Ok(())
    }

    pub(crate) fn clone_repos(&self, shell: &Shell<'_>, branch: &str) -> DeployResult<()> {
        let repos = &self.config.repositories;
        for (url, root) in [
            (&repos.web, self.config.web_root()),
            (&repos.backend, self.config.backend_root()),
            (&repos.deploy, self.config.deploy_root()),
        ] {
            shell.run(&format!("git clone {} {root}", shell_quote(url)))?;
        }
        self.update_code(shell, branch)
    }
}
