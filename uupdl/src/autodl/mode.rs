//! Download mode flag.

use std::fmt;
use std::str::FromStr;

use super::error::AutoDlError;

/// What the automatic download produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    /// Flag 1: plain aria2 download package.
    #[default]
    DownloadOnly,
    /// Flag 2: download and convert to an ISO.
    Convert,
    /// Flag 3: convert and create virtual editions.
    ConvertWithVirtualEditions,
}

impl DownloadMode {
    /// True for both conversion modes.
    pub fn is_conversion(&self) -> bool {
        !matches!(self, DownloadMode::DownloadOnly)
    }

    pub fn is_virtual_editions(&self) -> bool {
        matches!(self, DownloadMode::ConvertWithVirtualEditions)
    }

    /// The numeric request flag.
    pub fn flag(&self) -> u8 {
        match self {
            DownloadMode::DownloadOnly => 1,
            DownloadMode::Convert => 2,
            DownloadMode::ConvertWithVirtualEditions => 3,
        }
    }
}

impl TryFrom<u8> for DownloadMode {
    type Error = AutoDlError;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            1 => Ok(DownloadMode::DownloadOnly),
            2 => Ok(DownloadMode::Convert),
            3 => Ok(DownloadMode::ConvertWithVirtualEditions),
            other => Err(AutoDlError::InvalidMode(other.to_string())),
        }
    }
}

impl FromStr for DownloadMode {
    type Err = AutoDlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let flag: u8 = s
            .trim()
            .parse()
            .map_err(|_| AutoDlError::InvalidMode(s.to_string()))?;
        DownloadMode::try_from(flag)
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DownloadMode::DownloadOnly => "download only",
            DownloadMode::Convert => "convert",
            DownloadMode::ConvertWithVirtualEditions => "convert with virtual editions",
        };
        f.write_str(name)
    }
}
