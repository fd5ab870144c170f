//! Update metadata with defaults applied.

use crate::api::UpdateInfo;
use crate::naming::build_major;

/// SKU assumed when the API does not report one (Professional).
pub const DEFAULT_SKU: u32 = 48;

/// Placeholder for missing build, architecture and title.
pub const UNKNOWN: &str = "UNKNOWN";

/// Build, architecture, SKU and title of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMetadata {
    pub sku: u32,
    pub build: String,
    pub arch: String,
    pub title: String,
}

impl Default for UpdateMetadata {
    fn default() -> Self {
        Self {
            sku: DEFAULT_SKU,
            build: UNKNOWN.to_string(),
            arch: UNKNOWN.to_string(),
            title: UNKNOWN.to_string(),
        }
    }
}

impl UpdateMetadata {
    /// Major build number, 0 if the build string is not numeric.
    pub fn build_number(&self) -> u32 {
        build_major(&self.build)
    }
}

impl From<UpdateInfo> for UpdateMetadata {
    fn from(info: UpdateInfo) -> Self {
        Self {
            sku: info.sku.unwrap_or(DEFAULT_SKU),
            build: info.build.unwrap_or_else(|| UNKNOWN.to_string()),
            arch: info.arch.unwrap_or_else(|| UNKNOWN.to_string()),
            title: info.title.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let metadata = UpdateMetadata::from(UpdateInfo::default());
        assert_eq!(metadata, UpdateMetadata::default());
        assert_eq!(metadata.sku, 48);
        assert_eq!(metadata.build, "UNKNOWN");
        assert_eq!(metadata.build_number(), 0);
    }

    #[test]
    fn test_partial_info() {
        let metadata = UpdateMetadata::from(UpdateInfo {
            sku: Some(101),
            build: Some("22631.2428".to_string()),
            arch: None,
            title: Some("Windows 11".to_string()),
        });
        assert_eq!(metadata.sku, 101);
        assert_eq!(metadata.arch, "UNKNOWN");
        assert_eq!(metadata.build_number(), 22631);
    }
}
