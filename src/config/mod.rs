//! Connection configuration.
//!
//! Each setting is taken from the first source that has it: command-line
//! flag, environment variable, `--config` TOML file, built-in default.

pub mod duration;
pub mod file;

pub use duration::parse_duration;
pub use file::ConnectionFile;

use anyhow::Context;
use clap::Args;
use griddb_webapi::WebApiConfig;
use std::path::PathBuf;

/// GridDB Web API connection options.
#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// GridDB Web API URL [default: http://localhost:8080]
    #[arg(long = "griddb-url", env = "GRIDDB_URL")]
    pub url: Option<String>,

    /// GridDB cluster name [default: myCluster]
    #[arg(long, env = "GRIDDB_CLUSTER")]
    pub cluster: Option<String>,

    /// GridDB database name [default: public]
    #[arg(long, env = "GRIDDB_DATABASE")]
    pub database: Option<String>,

    /// GridDB user [default: admin]
    #[arg(long, env = "GRIDDB_USER")]
    pub user: Option<String>,

    /// GridDB password [default: admin]
    #[arg(long, env = "GRIDDB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Per-request timeout, e.g. "30s" or "500ms" [default: 30s]
    #[arg(long)]
    pub timeout: Option<String>,

    /// TOML file with connection settings
    #[arg(long = "config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Resolve the final settings, reading `--config` if one was given.
    pub fn resolve(&self) -> anyhow::Result<WebApiConfig> {
        let file = match &self.config_file {
            Some(path) => ConnectionFile::from_file(path)?,
            None => ConnectionFile::default(),
        };
        self.merge(file)
    }

    /// Layer these arguments over `file`, then over the defaults.
    pub fn merge(&self, file: ConnectionFile) -> anyhow::Result<WebApiConfig> {
        let defaults = WebApiConfig::default();

        let timeout = match self.timeout.as_ref().or(file.timeout.as_ref()) {
            Some(raw) => parse_duration(raw).with_context(|| format!("Invalid timeout '{raw}'"))?,
            None => defaults.timeout,
        };

        Ok(WebApiConfig {
            url: pick(&self.url, file.url, defaults.url),
            cluster: pick(&self.cluster, file.cluster, defaults.cluster),
            database: pick(&self.database, file.database, defaults.database),
            user: pick(&self.user, file.user, defaults.user),
            password: pick(&self.password, file.password, defaults.password),
            timeout,
        })
    }
}

fn pick(arg: &Option<String>, file: Option<String>, default: String) -> String {
    arg.clone().or(file).unwrap_or(default)
}
