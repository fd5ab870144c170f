//! Configuration file support.
//!
//! Settings live in an INI file under the user's configuration directory
//! (`~/.config/uupdl/config.ini` on Linux). A missing file means defaults.
//!
//! ```ini
//! [api]
//! base_url = https://api.uupdump.net
//! timeout = 30
//!
//! [policy]
//! ve_min_build = 17063
//! ve_skus = 4,27,48,49,98,99,100,101,121,125,126,161,162
//! blocked = 26100:Insider | 22621:Canary
//!
//! [logging]
//! level = info
//! directory = /var/log/uupdl
//! ```

mod file;

use std::path::PathBuf;

pub use file::{ApiSettings, ConfigError, ConfigFile, LoggingConfig, PolicySettings};

/// Name of the configuration directory and log file prefix.
pub const APP_DIR_NAME: &str = "uupdl";

/// Path of the user's configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("config.ini")
}
