use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{DeployError, DeployResult};

/// Git repositories checked out on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repositories {
    pub backend: String,
    pub web: String,
    pub deploy: String,
}

impl Default for Repositories {
    fn default() -> Self {
        Self {
            backend: "https://github.com/NAMD/pypln.backend.git".to_string(),
            web: "https://github.com/NAMD/pypln.web.git".to_string(),
            deploy: "https://github.com/NAMD/pypln-deploy.git".to_string(),
        }
    }
}

/// Layout of a deployment: who owns it, where it lives on the
/// server and what gets installed.
///
/// Every field has a default, so a YAML override only needs the
/// keys it changes. [`Config::layer_yaml_str`] applies such an
/// override on top of an existing layout instead of the defaults.
///
/// # Example
///
/// ```
/// use pypln_deploy::Config;
///
/// let config = Config::new().home("/opt/pypln/");
///
/// assert_eq!(config.project_root(), "/opt/pypln/project/");
/// assert_eq!(config.backend_root(), "/opt/pypln/project/backend");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name: nginx site, supervisor config prefix, backup
    /// prefix and default database name.
    pub name: String,
    /// Unix account that owns the deployment.
    pub user: String,
    pub home: String,
    pub repositories: Repositories,
    /// Supervisor programs, one `<name>-<daemon>.conf` each.
    pub daemons: Vec<String>,
    pub system_packages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "pypln".to_string(),
            user: "pypln".to_string(),
            home: "/srv/pypln/".to_string(),
            repositories: Repositories::default(),
            daemons: ["router", "pipeliner", "broker", "web"]
                .map(str::to_string)
                .to_vec(),
            system_packages: [
                "python-setuptools",
                "python-pip",
                "python-numpy",
                "build-essential",
                "python-dev",
                "mongodb",
                "pdftohtml",
                "git-core",
                "supervisor",
                "nginx",
                "python-virtualenv",
                "postgresql",
                "python-psycopg2",
            ]
            .map(str::to_string)
            .to_vec(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> DeployResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> DeployResult<Self> {
        Self::default().layer_yaml_file(path)
    }

    /// Copy of `self` with the keys present in `yaml` replaced.
    /// Nested mappings (`repositories`) merge key by key; lists are
    /// replaced whole.
    pub fn layer_yaml_str(&self, yaml: &str) -> DeployResult<Self> {
        let mut base = serde_yaml::to_value(self)?;
        merge(&mut base, serde_yaml::from_str(yaml)?);
        Ok(serde_yaml::from_value(base)?)
    }

    pub fn layer_yaml_file(&self, path: &Path) -> DeployResult<Self> {
        if !path.exists() {
            return Err(DeployError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        self.layer_yaml_str(&content)
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    #[must_use]
    pub fn user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    #[must_use]
    pub fn home(mut self, home: &str) -> Self {
        self.home = home.to_string();
        self
    }

    #[must_use]
    pub fn repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = repositories;
        self
    }

    #[must_use]
    pub fn daemon(mut self, daemon: &str) -> Self {
        self.daemons.push(daemon.to_string());
        self
    }

    #[must_use]
    pub fn daemons(mut self, daemons: &[&str]) -> Self {
        self.daemons = daemons.iter().map(|d| (*d).to_string()).collect();
        self
    }

    #[must_use]
    pub fn system_packages(mut self, packages: &[&str]) -> Self {
        self.system_packages = packages.iter().map(|p| (*p).to_string()).collect();
        self
    }

    #[must_use]
    pub fn log_dir(&self) -> String {
        join(&self.home, "logs/")
    }

    #[must_use]
    pub fn backup_dir(&self) -> String {
        join(&self.home, "backups/")
    }

    #[must_use]
    pub fn project_root(&self) -> String {
        join(&self.home, "project/")
    }

    #[must_use]
    pub fn backend_root(&self) -> String {
        join(&self.project_root(), "backend")
    }

    #[must_use]
    pub fn web_root(&self) -> String {
        join(&self.project_root(), "web/")
    }

    #[must_use]
    pub fn deploy_root(&self) -> String {
        join(&self.project_root(), "deploy/")
    }

    /// Directory holding the Django `manage.py`.
    #[must_use]
    pub fn django_root(&self) -> String {
        join(&self.web_root(), &format!("{}/web/", self.name))
    }

    #[must_use]
    pub fn activate_script(&self) -> String {
        join(&self.project_root(), "bin/activate")
    }

    #[must_use]
    pub fn manage_script(&self) -> String {
        join(&self.django_root(), "manage.py")
    }

    #[must_use]
    pub fn secret_key_path(&self) -> String {
        join(&self.home, ".secret_key")
    }

    #[must_use]
    pub fn smtp_config_path(&self) -> String {
        join(&self.home, ".smtp_config")
    }

    #[must_use]
    pub fn pgpass_path(&self) -> String {
        join(&self.home, ".pgpass")
    }

    #[must_use]
    pub fn server_config(&self, file: &str) -> String {
        join(&join(&self.deploy_root(), "server_config/"), file)
    }

    #[must_use]
    pub fn supervisor_program_config(&self, daemon: &str) -> String {
        self.server_config(&format!("{}-{daemon}.conf", self.name))
    }

    #[must_use]
    pub fn nginx_vhost(&self) -> String {
        self.server_config("nginx.conf")
    }

    #[must_use]
    pub fn crontab(&self) -> String {
        self.server_config("crontab")
    }

    /// Repositories paired with their checkout directories, in
    /// update order.
    #[must_use]
    pub fn checkouts(&self) -> [(&str, String); 3] {
        [
            (self.repositories.backend.as_str(), self.backend_root()),
            (self.repositories.web.as_str(), self.web_root()),
            (self.repositories.deploy.as_str(), self.deploy_root()),
        ]
    }
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Join two POSIX path components. An absolute `tail` replaces
/// `base`; otherwise exactly one `/` separates them.
#[must_use]
pub fn join(base: &str, tail: &str) -> String {
    if tail.starts_with('/') || base.is_empty() {
        return tail.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{tail}")
    } else {
        format!("{base}/{tail}")
    }
}
