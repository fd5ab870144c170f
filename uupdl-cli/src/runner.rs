//! Shared command setup: configuration and logging.

use tracing::info;
use uupdl::config::ConfigFile;
use uupdl::logging::{self, LoggingGuard};

use crate::error::CliError;

/// Loads configuration and installs logging for a command run.
pub struct CliRunner {
    config: ConfigFile,
    _logging: LoggingGuard,
}

impl CliRunner {
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let guard = logging::init(&config.logging)?;
        Ok(Self {
            config,
            _logging: guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = uupdl::VERSION,
            command,
            api = %self.config.api.base_url,
            "uupdl starting"
        );
    }
}
