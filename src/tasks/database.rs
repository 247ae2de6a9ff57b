use tracing::{info, warn};

use crate::backup;
use crate::config::join;
use crate::error::{DeployError, DeployResult};
use crate::quote::shell_quote;
use crate::secrets::{self, PgPass};
use crate::tasks::Tasks;

const POSTGRES_USER: &str = "postgres";

impl Tasks<'_> {
    /// Create a PostgreSQL role with a random password and a
    /// database it owns, and store the credentials in the
    /// deployment account's `.pgpass`.
    ///
    /// An existing role is not an error: nothing else is done and
    /// `false` is returned.
    pub fn create_db(
        &self,
        db_user: &str,
        db_name: &str,
        db_host: &str,
        db_port: u16,
    ) -> DeployResult<bool> {
        let password = secrets::db_password(&mut rand::rng());

        let create_user = format!(
            "psql template1 -c \"CREATE USER {db_user} WITH CREATEDB ENCRYPTED PASSWORD '{password}'\""
        );
        let created = self
            .shell
            .warn_only()
            .sudo_as(POSTGRES_USER, &create_user)?;
        if created.failed() {
            warn!("database user {db_user} was not created, skipping database {db_name}");
            return Ok(false);
        }

        let pgpass = PgPass {
            host: db_host.to_string(),
            port: db_port,
            database: db_name.to_string(),
            user: db_user.to_string(),
            password,
        };
        let path = self.config.pgpass_path();
        self.shell
            .sudo(&format!("echo {} > {path}", shell_quote(&pgpass.render())))?;
        self.shell.sudo(&self.chown_command(&path, false))?;
        self.shell.sudo(&format!("chmod 600 {path}"))?;
        self.shell.sudo_as(
            POSTGRES_USER,
            &format!("createdb \"{db_name}\" -O \"{db_user}\""),
        )?;
        info!("created database {db_name} owned by {db_user}");
        Ok(true)
    }

    /// Dump the database into the backup directory. Returns the
    /// remote path of the dump.
    pub fn db_backup(&self) -> DeployResult<String> {
        self.db_backup_named(&backup::backup_filename_now(&self.config.name))
    }

    /// [`Tasks::db_backup`] with an explicit file name.
    pub fn db_backup_named(&self, filename: &str) -> DeployResult<String> {
        let path = join(&self.config.backup_dir(), filename);
        self.shell
            .as_user(&self.config.user)
            .run(&format!("pg_dump -Fc -o -f {}", shell_quote(&path)))?;
        info!("database dumped to {path}");
        Ok(path)
    }

    /// Replace the current database with a dump from the backup
    /// directory, after the operator confirms.
    pub fn db_restore(&self, filename: &str) -> DeployResult<()> {
        if filename.is_empty() {
            return Err(DeployError::InvalidArgument("backup file name is empty".into()));
        }

        let question =
            format!("Are you sure you want to replace the current database with {filename}");
        if !self.prompter.confirm(&question, false)? {
            return Err(DeployError::Aborted("Aborting database restore...".into()));
        }

        let path = join(&self.config.backup_dir(), filename);
        self.shell.sudo_as(
            POSTGRES_USER,
            &format!("pg_restore -d template1 -C {}", shell_quote(&path)),
        )?;
        info!("database restored from {path}");
        Ok(())
    }
}
