//! JSON package request writer.

use std::io::Write;

use serde::Serialize;
use tracing::info;

use super::{Aria2Package, ConvertPackage, PackageBuilder, PackageError, PackageRequest};

/// Writes each package request as pretty-printed JSON.
///
/// Used where the archive itself is built by a separate process that picks
/// the request up from a file or pipe.
pub struct JsonPackageWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonPackageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_request<T: Serialize>(&mut self, request: &T) -> Result<(), PackageError> {
        serde_json::to_writer_pretty(&mut self.writer, request)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> PackageBuilder for JsonPackageWriter<W> {
    fn create_aria2_package(&mut self, package: &Aria2Package) -> Result<(), PackageError> {
        info!(archive = %package.archive_name, "Writing aria2 package request");
        self.write_request(&PackageRequest::Aria2(package.clone()))
    }

    fn create_convert_package(&mut self, package: &ConvertPackage) -> Result<(), PackageError> {
        info!(
            archive = %package.archive_name,
            virtual_editions = package.virtual_editions,
            "Writing conversion package request"
        );
        self.write_request(&PackageRequest::Convert(package.clone()))
    }
}
