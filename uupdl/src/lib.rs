//! uupdl - Automatic download configuration for UUP dump
//!
//! This library turns an automatic-download request (update ID, language pack,
//! edition selection and download mode) into a single package request: either
//! an aria2 download package or a UUP conversion package.
//!
//! # Architecture
//!
//! ```text
//! RequestContext ──► AutoDlParams ──► DownloadConfig::build ──► plan() ──► PackageBuilder
//!                                       │
//!                                       ├── FileResolver     (files)
//!                                       ├── MetadataResolver (update info)
//!                                       ├── PackLister       (app eligibility)
//!                                       └── UpdatePolicy     (block list, VE support)
//! ```
//!
//! The update-API collaborators are traits so hosts can plug in their own
//! backends; [`api::UupApiClient`] talks to the public UUP dump JSON API.

pub mod api;
pub mod autodl;
pub mod config;
pub mod edition;
pub mod lang;
pub mod logging;
pub mod naming;
pub mod package;
pub mod request;

/// Crate version, shown in CLI banners and the HTTP user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
