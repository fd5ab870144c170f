//! CLI error type.

use thiserror::Error;
use uupdl::autodl::AutoDlError;
use uupdl::config::ConfigError;
use uupdl::logging::LoggingError;
use uupdl::request::RequestError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("{0}")]
    Http(String),

    #[error(transparent)]
    AutoDl(#[from] AutoDlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Print the error the way the download page would report it.
    pub fn report(&self) {
        match self {
            CliError::AutoDl(e) => {
                let page = e.error_page();
                eprintln!("error: {} ({} page)", page.code, page.page);
                eprintln!("  {}", e);
            }
            other => eprintln!("error: {}", other),
        }
    }
}
