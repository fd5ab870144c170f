//! Update API client for the UUP dump JSON API.
//!
//! # API Endpoints
//!
//! - Files: `{base}/get.php?id={id}&lang={pack}&edition={editions}`
//! - Update info: `{base}/updateinfo.php?id={id}&onlyInfo=1`
//! - Editions: `{base}/listeditions.php?id={id}&lang=neutral`
//!
//! Every endpoint wraps its payload in `{"response": {...}}`; failures are
//! reported as `{"response": {"error": "CODE"}}`.

use std::collections::BTreeMap;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::http::HttpClient;
use super::types::{
    ApiError, FileResolver, MetadataResolver, PackIndex, PackLister, ResolvedFiles, UpdateInfo,
    NEUTRAL_PACK,
};
use crate::edition::EditionSelection;

/// Public UUP dump API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.uupdump.net";

/// Pack style that asks the API for download links.
const PACK_STYLE_WITH_LINKS: u8 = 2;

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
struct FilesResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    files: ResolvedFiles,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateInfoResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    update_info: Option<UpdateInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditionListResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    edition_list: Vec<String>,
}

/// Update API backed by the UUP dump JSON endpoints.
pub struct UupApiClient<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> UupApiClient<C> {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(http_client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    /// The API root URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds an endpoint URL with percent-encoded query parameters.
    fn endpoint(&self, script: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        Url::parse_with_params(&format!("{}/{}", self.base_url, script), params)
            .map_err(|e| ApiError::HttpError(format!("Invalid API URL: {}", e)))
    }

    fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(url = %url, "Querying update API");
        let body = self.http_client.get(url.as_str())?;

        let envelope: Envelope<T> = serde_json::from_slice(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))?;
        Ok(envelope.response)
    }
}

impl<C: HttpClient> FileResolver for UupApiClient<C> {
    fn resolve_files(
        &self,
        update_id: &str,
        pack: Option<&str>,
        editions: &EditionSelection,
        pack_style: u8,
    ) -> Result<ResolvedFiles, ApiError> {
        let edition = editions.as_query_value();

        let mut params = vec![("id", update_id)];
        if let Some(pack) = pack {
            params.push(("lang", pack));
        }
        if let Some(edition) = edition.as_deref() {
            params.push(("edition", edition));
        }
        if pack_style < PACK_STYLE_WITH_LINKS {
            params.push(("noLinks", "1"));
        }

        let response: FilesResponse = self.fetch(self.endpoint("get.php", &params)?)?;
        match response.error {
            Some(code) => Err(ApiError::Resolution(code)),
            None => Ok(response.files),
        }
    }
}

impl<C: HttpClient> MetadataResolver for UupApiClient<C> {
    fn update_info(&self, update_id: &str, ignore_files: bool) -> Result<UpdateInfo, ApiError> {
        let mut params = vec![("id", update_id)];
        if ignore_files {
            params.push(("onlyInfo", "1"));
        }

        let response: UpdateInfoResponse = self.fetch(self.endpoint("updateinfo.php", &params)?)?;
        if let Some(code) = response.error {
            return Err(ApiError::Resolution(code));
        }

        Ok(response.update_info.unwrap_or_default())
    }
}

impl<C: HttpClient> PackLister for UupApiClient<C> {
    fn packs(&self, update_id: &str) -> Result<PackIndex, ApiError> {
        let params = [("id", update_id), ("lang", NEUTRAL_PACK)];

        let response: EditionListResponse =
            self.fetch(self.endpoint("listeditions.php", &params)?)?;
        if let Some(code) = response.error {
            return Err(ApiError::Resolution(code));
        }

        let editions: BTreeMap<String, serde_json::Value> = response
            .edition_list
            .into_iter()
            .map(|edition| (edition, serde_json::Value::Null))
            .collect();

        let mut index = PackIndex::new();
        if !editions.is_empty() {
            index.insert(NEUTRAL_PACK.to_string(), editions);
        }
        Ok(index)
    }
}
