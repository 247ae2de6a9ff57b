use tracing::info;

use crate::error::DeployResult;
use crate::files;
use crate::tasks::Tasks;

pub const SUPERVISOR_CONF: &str = "/etc/supervisor/supervisord.conf";
pub const SUPERVISOR_INCLUDE_DIR: &str = "/etc/supervisor/conf.d/";
pub const NGINX_SITES_ENABLED: &str = "/etc/nginx/sites-enabled/";

/// Unix socket line that keeps non-root users out of supervisorctl.
const SUPERVISOR_SOCKET_LINE: &str = "^serverurl=unix:///var/run//supervisor.sock .*";
const SUPERVISOR_HTTP_SERVER: [&str; 2] = ["[inet_http_server]", "port=127.0.0.1:9001"];

impl Tasks<'_> {
    // The init script exits 1 on "restart", so stop and start
    // are always issued separately.
    pub(crate) fn stop_supervisord(&self) -> DeployResult<()> {
        self.shell.sudo("service supervisor stop")?;
        Ok(())
    }

    pub(crate) fn start_supervisord(&self) -> DeployResult<()> {
        self.shell.sudo("service supervisor start")?;
        Ok(())
    }

    pub(crate) fn restart_supervisord(&self) -> DeployResult<()> {
        self.stop_supervisord()?;
        self.start_supervisord()
    }

    pub(crate) fn restart_nginx(&self) -> DeployResult<()> {
        self.shell.sudo("service nginx restart")?;
        Ok(())
    }

    /// Restart supervisord and nginx.
    ///
    /// Needs a login user with sudo rights.
    pub fn restart_services(&self) -> DeployResult<()> {
        info!("restarting services");
        self.stop_supervisord()?;
        self.restart_nginx()?;
        self.start_supervisord()
    }

    /// Link the program configs from the deploy repository and
    /// expose supervisorctl on localhost:9001.
    pub fn configure_supervisord(&self) -> DeployResult<()> {
        info!("configuring supervisord");
        for daemon in &self.config.daemons {
            let program_conf = self.config.supervisor_program_config(daemon);
            self.shell
                .sudo(&format!("ln -sf {program_conf} {SUPERVISOR_INCLUDE_DIR}"))?;
        }

        // Without the socket line supervisorctl falls back to the
        // inet server, which non-root users may reach.
        files::comment(&self.shell, SUPERVISOR_CONF, SUPERVISOR_SOCKET_LINE, ';', true)?;
        files::append(&self.shell, SUPERVISOR_CONF, &SUPERVISOR_HTTP_SERVER, true)?;

        self.restart_supervisord()
    }

    pub fn configure_nginx(&self) -> DeployResult<()> {
        info!("configuring nginx");
        self.shell.sudo(&format!(
            "ln -sf {} {NGINX_SITES_ENABLED}{}",
            self.config.nginx_vhost(),
            self.config.name
        ))?;
        self.restart_nginx()
    }
}
