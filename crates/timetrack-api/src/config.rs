use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, File};
use serde::Deserialize;
use timetrack_db::DatabaseOptions;

#[derive(Parser, Debug)]
#[command(name = "timetrack-api")]
#[command(about = "Time tracking API server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(long, env = "TIMETRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip schema bootstrap on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Deployment flavour; selects log format and verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Environment {
    Local,
    Dev,
    Prod,
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "local" => Environment::Local,
            "dev" => Environment::Dev,
            // Unknown names get production settings.
            _ => Environment::Prod,
        }
    }
}

impl Environment {
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev => {
                "timetrack_api=debug,timetrack_db=debug,timetrack_info=debug,tower_http=debug"
            }
            Environment::Prod => {
                "timetrack_api=info,timetrack_db=info,timetrack_info=info,tower_http=info"
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub address: String,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl HttpSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// 0 disables the per-statement limit.
    pub statement_timeout_secs: u64,
}

impl DatabaseSettings {
    pub fn options(&self) -> DatabaseOptions {
        DatabaseOptions {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            statement_timeout: (self.statement_timeout_secs > 0)
                .then(|| Duration::from_secs(self.statement_timeout_secs)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoServiceSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl InfoServiceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub env: Environment,
    pub http: HttpSettings,
    pub database: DatabaseSettings,
    pub info_service: InfoServiceSettings,
}

impl Settings {
    /// Defaults, then `path` if given, then `TIMETRACK__SECTION__KEY` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("env", "prod")?
            .set_default("http.address", "0.0.0.0:8082")?
            .set_default("http.request_timeout_secs", 4i64)?
            .set_default("http.shutdown_timeout_secs", 10i64)?
            .set_default("database.max_connections", 5i64)?
            .set_default("database.acquire_timeout_secs", 3i64)?
            .set_default("database.statement_timeout_secs", 10i64)?
            .set_default("info_service.timeout_secs", 5i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                config::Environment::with_prefix("TIMETRACK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
