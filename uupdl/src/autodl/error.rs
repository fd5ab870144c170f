//! Errors that end an automatic-download request.

use thiserror::Error;

use crate::package::PackageError;

/// Page key under which automatic-download errors are rendered.
pub const DOWNLOADS_PAGE: &str = "downloads";

/// Errors that terminate an automatic-download request.
#[derive(Debug, Error)]
pub enum AutoDlError {
    /// The request has no update ID.
    #[error("No update ID was specified")]
    MissingUpdateId,

    /// The download mode flag is not 1, 2 or 3.
    #[error("Invalid download mode: {0}")]
    InvalidMode(String),

    /// The file resolver rejected the request.
    #[error("File resolution failed: {0}")]
    FileResolution(String),

    /// Virtual editions cannot be created for this build, SKU or edition.
    #[error("Virtual editions are not available for this update")]
    VirtualEditionUnavailable,

    /// Virtual-edition conversion was requested without any edition.
    #[error("No virtual editions were selected")]
    VirtualEditionUnspecified,

    /// The package builder failed.
    #[error(transparent)]
    Package(#[from] PackageError),
}

impl AutoDlError {
    /// Error code passed to the localized error renderer.
    ///
    /// File resolution errors keep the resolver's code verbatim.
    pub fn error_code(&self) -> &str {
        match self {
            AutoDlError::MissingUpdateId => "UNSPECIFIED_UPDATE",
            AutoDlError::InvalidMode(_) => "INVALID_MODE",
            AutoDlError::FileResolution(code) => code.as_str(),
            AutoDlError::VirtualEditionUnavailable => "VE_UNAVAILABLE",
            AutoDlError::VirtualEditionUnspecified => "UNSPECIFIED_VE",
            AutoDlError::Package(_) => "PACKAGE_FAILED",
        }
    }

    /// The error page to render for this error.
    pub fn error_page(&self) -> ErrorPage {
        ErrorPage {
            code: self.error_code().to_string(),
            page: DOWNLOADS_PAGE,
        }
    }
}

/// What the caller's error renderer needs: a code and a page key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub code: String,
    pub page: &'static str,
}
