use crate::error::Result;
use crate::event::EventFilter;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Re-process every configured job this often while serving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprocess_interval_secs: Option<u64>,
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            reprocess_interval_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Jobs handled by `process --all` and by periodic re-processing.
    #[serde(default)]
    pub jobs: Vec<String>,
    #[serde(default)]
    pub filter: EventFilter,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            jobs: Vec::new(),
            filter: EventFilter::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Read `config.yaml` from the workdir, falling back to defaults when the
    /// file does not exist.
    pub fn load(workdir: &Path) -> Result<Self> {
        let path = paths::config_path(workdir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let mut seen = HashSet::new();
        for job in &self.jobs {
            if paths::validate_job_name(job).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("invalid job name '{job}' in jobs"),
                });
            }
            if !seen.insert(job.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("job '{job}' listed more than once"),
                });
            }
        }

        if self.filter.locator_contains.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "filter.locator_contains is empty: every locator matches".to_string(),
            });
        }
        if self.filter.message_contains.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "filter.message_contains is empty: every message matches".to_string(),
            });
        }

        if self.server.reprocess_interval_secs == Some(0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "server.reprocess_interval_secs must be greater than 0".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
