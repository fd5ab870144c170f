//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ApiError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(format!("uupdl/{}", crate::VERSION))
            .build()
            .map_err(|e| ApiError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ApiError::HttpError(format!("Request failed: {}", e)))?;

        // Error statuses from the update API still carry a JSON error body.
        let status = response.status();
        let body = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ApiError::HttpError(format!("Failed to read response: {}", e)))?;

        if !status.is_success() && body.is_empty() {
            return Err(ApiError::HttpError(format!("HTTP {} from {}", status, url)));
        }

        Ok(body)
    }
}
