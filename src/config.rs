use std::path::PathBuf;
use std::time::Duration;

use tracing::trace;

use crate::api::ApiConfig;

/// Storage backend configuration
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (nothing survives a restart)
    None,

    /// SQLite database (default for most deployments)
    Sqlite {
        /// Path to the SQLite database file
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("./sitewatch.db")
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Storage configuration (optional - defaults to sqlite)
    pub storage: Option<StorageConfig>,

    /// Scheduling and probing knobs
    pub monitor: Option<MonitorConfig>,

    /// Mail provider for down alerts (optional - without it, alerts are
    /// logged and skipped)
    pub mail: Option<MailConfig>,

    /// REST API server
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitorConfig {
    /// Seconds between two checks of the same target
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Outbound probe timeout in seconds
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl MonitorConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

fn default_check_interval() -> u64 {
    3600
}

fn default_probe_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MailConfig {
    /// Base URL of the SendGrid-compatible mail API
    #[serde(default = "default_mail_endpoint")]
    pub endpoint: String,

    /// Sender address on alert mails
    #[serde(default = "default_mail_from")]
    pub from: String,

    /// API key; falls back to the SENDGRID_API_KEY environment variable
    pub api_key: Option<String>,
}

fn default_mail_endpoint() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_mail_from() -> String {
    "alerts@sitewatch.local".to_string()
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
