use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_core::CoreSettings;
use catalog_engine::ApiSettings;
use catalog_logging::LogDestination;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "./catalog_console.ron";

/// Settings read from the RON configuration file. Absent keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub page_size: u64,
    pub poll_interval_ms: u64,
    pub max_poll_failures: u32,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub log_level: String,
    pub log_destination: LogDestination,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let core = CoreSettings::default();
        Self {
            base_url: ApiSettings::default().base_url,
            page_size: core.page_size,
            poll_interval_ms: core.poll_interval.as_millis() as u64,
            max_poll_failures: core.max_poll_failures,
            connect_timeout_ms: Some(10_000),
            request_timeout_ms: None,
            log_level: "info".to_string(),
            log_destination: LogDestination::default(),
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub log_destination: Option<LogDestination>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl ConsoleConfig {
    /// Reads `path`; `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(destination) = overrides.log_destination {
            self.log_destination = destination;
        }
        self
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            page_size: self.page_size.max(1),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_poll_failures: self.max_poll_failures.max(1),
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }
}
