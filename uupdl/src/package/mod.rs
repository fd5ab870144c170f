//! Package requests and the builders that fulfil them.
//!
//! A download configuration ends in exactly one package request:
//!
//! - [`Aria2Package`] - an aria2 manifest plus scripts for a plain download
//! - [`ConvertPackage`] - a download that is converted into an ISO, optionally
//!   with virtual editions
//!
//! Building the actual archive is the job of a [`PackageBuilder`]. The crate
//! ships [`JsonPackageWriter`], which records the request as JSON for a
//! downstream builder.

mod writer;

pub use writer::JsonPackageWriter;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by package builders.
#[derive(Debug, Error)]
pub enum PackageError {
    /// I/O error while writing the package.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be serialized.
    #[error("Failed to serialize package request: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Builder-specific failure.
    #[error("Package builder error: {0}")]
    Builder(String),
}

/// Extra conversion options, each either 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Integrate updates into the image.
    pub updates: u8,
    /// Run component cleanup after integrating updates.
    pub cleanup: u8,
    /// Integrate .NET Framework 3.5.
    pub netfx: u8,
    /// Create install.esd instead of install.wim.
    pub esd: u8,
}

/// Request for an aria2 download-only package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aria2Package {
    pub url: String,
    pub archive_name: String,
    pub app_url: Option<String>,
}

/// Request for a UUP conversion package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertPackage {
    pub url: String,
    pub archive_name: String,
    pub virtual_editions: bool,
    pub virtual_edition_list: Vec<String>,
    pub options: ConvertOptions,
    pub app_url: Option<String>,
}

/// The single package a download configuration resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackageRequest {
    Aria2(Aria2Package),
    Convert(ConvertPackage),
}

impl PackageRequest {
    pub fn archive_name(&self) -> &str {
        match self {
            PackageRequest::Aria2(package) => &package.archive_name,
            PackageRequest::Convert(package) => &package.archive_name,
        }
    }
}

/// Creates download packages.
pub trait PackageBuilder {
    fn create_aria2_package(&mut self, package: &Aria2Package) -> Result<(), PackageError>;

    fn create_convert_package(&mut self, package: &ConvertPackage) -> Result<(), PackageError>;

    /// Dispatch a request to the matching builder method.
    fn create(&mut self, request: &PackageRequest) -> Result<(), PackageError> {
        match request {
            PackageRequest::Aria2(package) => self.create_aria2_package(package),
            PackageRequest::Convert(package) => self.create_convert_package(package),
        }
    }
}
