//! INI-backed configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::config_file_path;
use crate::api::{BlockRule, StaticPolicy, DEFAULT_API_BASE_URL, DEFAULT_VE_MIN_BUILD, DEFAULT_VE_SKUS};

/// Errors reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A setting has a value of the wrong shape.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: 30,
        }
    }
}

/// `[policy]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySettings {
    pub ve_min_build: u32,
    pub ve_skus: Vec<u32>,
    pub blocked: Vec<BlockRule>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            ve_min_build: DEFAULT_VE_MIN_BUILD,
            ve_skus: DEFAULT_VE_SKUS.to_vec(),
            blocked: Vec::new(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for daily log files; stderr only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// The complete configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub api: ApiSettings,
    pub policy: PolicySettings,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load from the default location, falling back to defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from a specific file. Missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::default();

        if let Some(api) = ini.section(Some("api")) {
            if let Some(url) = api.get("base_url") {
                config.api.base_url = url.trim().to_string();
            }
            if let Some(timeout) = api.get("timeout") {
                config.api.timeout = parse_value("api.timeout", timeout)?;
            }
        }

        if let Some(policy) = ini.section(Some("policy")) {
            if let Some(build) = policy.get("ve_min_build") {
                config.policy.ve_min_build = parse_value("policy.ve_min_build", build)?;
            }
            if let Some(skus) = policy.get("ve_skus") {
                config.policy.ve_skus = split_list(skus, ',')
                    .map(|sku| parse_value("policy.ve_skus", sku))
                    .collect::<Result<_, _>>()?;
            }
            if let Some(blocked) = policy.get("blocked") {
                config.policy.blocked = split_list(blocked, '|')
                    .map(|rule| parse_value("policy.blocked", rule))
                    .collect::<Result<_, _>>()?;
            }
        }

        if let Some(logging) = ini.section(Some("logging")) {
            if let Some(level) = logging.get("level") {
                config.logging.level = level.trim().to_string();
            }
            if let Some(dir) = logging.get("directory") {
                let dir = dir.trim();
                config.logging.directory = (!dir.is_empty()).then(|| PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    /// Write the configuration, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut ini = Ini::new();
        for (section, key, value) in self.entries() {
            ini.with_section(Some(section)).set(key, value);
        }
        ini.write_to_file(path).map_err(write_err)
    }

    /// Every setting as `(section, key, value)`, in file order.
    pub fn entries(&self) -> Vec<(&'static str, &'static str, String)> {
        let join = |items: Vec<String>, sep: &str| items.join(sep);

        vec![
            ("api", "base_url", self.api.base_url.clone()),
            ("api", "timeout", self.api.timeout.to_string()),
            ("policy", "ve_min_build", self.policy.ve_min_build.to_string()),
            (
                "policy",
                "ve_skus",
                join(self.policy.ve_skus.iter().map(u32::to_string).collect(), ","),
            ),
            (
                "policy",
                "blocked",
                join(self.policy.blocked.iter().map(BlockRule::to_string).collect(), "|"),
            ),
            ("logging", "level", self.logging.level.clone()),
            (
                "logging",
                "directory",
                self.logging
                    .directory
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default(),
            ),
        ]
    }

    /// The update policy described by the `[policy]` section.
    pub fn update_policy(&self) -> StaticPolicy {
        self.policy
            .blocked
            .iter()
            .cloned()
            .fold(
                StaticPolicy::new()
                    .with_ve_min_build(self.policy.ve_min_build)
                    .with_ve_skus(self.policy.ve_skus.clone()),
                StaticPolicy::with_block_rule,
            )
    }
}

fn split_list(raw: &str, separator: char) -> impl Iterator<Item = &str> {
    raw.split(separator).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
