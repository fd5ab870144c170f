//! Update API abstraction
//!
//! This module provides the collaborator traits the download configuration
//! depends on, plus an implementation backed by the UUP dump JSON API.
//!
//! # Collaborators
//!
//! - [`FileResolver`] - resolves the file set for an update/language/edition
//! - [`MetadataResolver`] - fetches build, architecture, SKU and title
//! - [`PackLister`] - lists the editions available per language bucket
//! - [`UpdatePolicy`] - block list and virtual-edition support checks
//!
//! # Example
//!
//! ```ignore
//! use uupdl::api::{ReqwestClient, StaticPolicy, UpdateServices, UupApiClient};
//!
//! let api = UupApiClient::new(ReqwestClient::new()?, "https://api.uupdump.net");
//! let policy = StaticPolicy::default();
//! let services = UpdateServices::from_api(&api, &policy);
//! ```

mod client;
mod http;
mod policy;
mod types;

pub use client::{UupApiClient, DEFAULT_API_BASE_URL};
pub use http::{HttpClient, ReqwestClient};
pub use policy::{BlockRule, ParseBlockRuleError, StaticPolicy, DEFAULT_VE_MIN_BUILD, DEFAULT_VE_SKUS};
pub use types::{
    ApiError, FileEntry, FileResolver, MetadataResolver, PackIndex, PackLister, ResolvedFiles,
    UpdateInfo, UpdatePolicy, UpdateServices, NEUTRAL_PACK,
};

#[cfg(test)]
pub use http::tests::MockHttpClient;
