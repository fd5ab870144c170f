//! Automatic download configuration.
//!
//! [`DownloadConfig`] takes the parameters of an automatic-download request,
//! resolves the update through the API collaborators and decides which
//! package to create.
//!
//! # Construction sequence
//!
//! ```text
//! resolve files ──► update metadata ──► archive name ──► URLs + app eligibility
//!      │
//!      └── resolver error: FileResolution(code), nothing else runs
//! ```
//!
//! Construction either succeeds with every derived value populated or fails
//! with an [`AutoDlError`]; the caller renders the error page.

mod config;
mod error;
mod metadata;
mod mode;
mod options;
mod params;

pub use config::{DownloadConfig, LAST_BUILD_WITHOUT_APPS, PACK_STYLE_FULL};
pub use error::{AutoDlError, ErrorPage, DOWNLOADS_PAGE};
pub use metadata::{UpdateMetadata, DEFAULT_SKU, UNKNOWN};
pub use mode::DownloadMode;
pub use options::convert_options;
pub use params::AutoDlParams;
