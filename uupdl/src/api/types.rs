//! Collaborator traits and wire types for the update API.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::edition::EditionSelection;

/// Language bucket holding language-neutral packages such as apps.
pub const NEUTRAL_PACK: &str = "neutral";

/// Errors returned by update API collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered with an error code (e.g. `UNSUPPORTED_LANG`).
    #[error("Update API returned error: {0}")]
    Resolution(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The response body could not be decoded.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// A single downloadable file of an update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEntry {
    pub sha1: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub expire: Option<u64>,
}

/// Files resolved for an update, language and edition selection.
///
/// The download configuration only checks that resolution succeeded; the
/// file set is handed on untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolvedFiles {
    pub update_name: Option<String>,
    pub arch: Option<String>,
    pub build: Option<String>,
    pub files: BTreeMap<String, FileEntry>,
}

/// Update metadata as reported by the API. Every field may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateInfo {
    #[serde(deserialize_with = "lenient_u32")]
    pub sku: Option<u32>,
    pub build: Option<String>,
    pub arch: Option<String>,
    pub title: Option<String>,
}

/// Editions available per language bucket: `bucket -> edition -> details`.
pub type PackIndex = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// Resolves the file set for an update.
pub trait FileResolver: Send + Sync {
    /// Resolve files for `update_id`.
    ///
    /// `pack_style` 2 requests files together with their download links.
    fn resolve_files(
        &self,
        update_id: &str,
        pack: Option<&str>,
        editions: &EditionSelection,
        pack_style: u8,
    ) -> Result<ResolvedFiles, ApiError>;
}

/// Fetches update metadata.
pub trait MetadataResolver: Send + Sync {
    fn update_info(&self, update_id: &str, ignore_files: bool) -> Result<UpdateInfo, ApiError>;
}

/// Lists the packs (language buckets and their editions) of an update.
pub trait PackLister: Send + Sync {
    fn packs(&self, update_id: &str) -> Result<PackIndex, ApiError>;
}

/// Administrative checks applied to updates.
pub trait UpdatePolicy: Send + Sync {
    /// True if the update must not be offered for app downloads.
    fn is_update_blocked(&self, build_num: u32, title: &str) -> bool;

    /// True if virtual editions can be created for this build and SKU.
    fn are_virtual_editions_supported(&self, build_num: u32, sku: u32) -> bool;
}

/// The collaborators a download configuration is built against.
#[derive(Clone, Copy)]
pub struct UpdateServices<'a> {
    pub files: &'a dyn FileResolver,
    pub metadata: &'a dyn MetadataResolver,
    pub packs: &'a dyn PackLister,
    pub policy: &'a dyn UpdatePolicy,
}

impl<'a> UpdateServices<'a> {
    /// Use one API backend for files, metadata and packs.
    pub fn from_api<A>(api: &'a A, policy: &'a dyn UpdatePolicy) -> Self
    where
        A: FileResolver + MetadataResolver + PackLister,
    {
        Self {
            files: api,
            metadata: api,
            packs: api,
            policy,
        }
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u64(deserializer)?.and_then(|v| u32::try_from(v).ok()))
}
