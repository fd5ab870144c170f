//! Centralized archive naming conventions.
//!
//! This module is the single source of truth for automatic-download naming:
//! - Archive names (e.g., `22631.1_amd64_en-us_professional_40a2b91c`)
//! - Update-only archive names (e.g., `22631.1_amd64_updates_40a2b91c`)
//! - The short update ID segment shared by both
//!
//! All other modules should use these functions rather than constructing names directly.

use crate::edition::UPDATE_ONLY_TAG;

/// Number of update ID characters kept in archive names.
pub const SHORT_ID_LEN: usize = 8;

/// Language segment used when no language pack was selected.
pub const ALL_LANGUAGES: &str = "all";

/// The first eight characters of an update ID.
///
/// Shorter IDs are returned unchanged.
///
/// ```
/// use uupdl::naming::short_update_id;
///
/// assert_eq!(short_update_id("40a2b91c8f77xyz"), "40a2b91c");
/// assert_eq!(short_update_id("abc"), "abc");
/// ```
pub fn short_update_id(update_id: &str) -> &str {
    match update_id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &update_id[..end],
        None => update_id,
    }
}

/// Generate the archive name for an automatic download.
///
/// # Format
///
/// - `{build}_{arch}_updates_{id}` when `edition` is `updateonly`
/// - `{build}_{arch}_{lang}_{edition}_{id}` otherwise
///
/// # Examples
///
/// ```
/// use uupdl::naming::archive_name;
///
/// assert_eq!(
///     archive_name("22631.1", "amd64", "all", "all", "40a2b91c8f77xyz"),
///     "22631.1_amd64_all_all_40a2b91c"
/// );
/// assert_eq!(
///     archive_name("22631.1", "arm64", "en-us", "updateonly", "40a2b91c8f77xyz"),
///     "22631.1_arm64_updates_40a2b91c"
/// );
/// ```
pub fn archive_name(build: &str, arch: &str, lang: &str, edition: &str, update_id: &str) -> String {
    let id = short_update_id(update_id);

    if edition == UPDATE_ONLY_TAG {
        format!("{}_{}_updates_{}", build, arch, id)
    } else {
        format!("{}_{}_{}_{}_{}", build, arch, lang, edition, id)
    }
}

/// Parse the major build number from a build string.
///
/// Only the leading digits of the first dot-separated component count.
/// Unparseable builds (such as `UNKNOWN`) yield 0.
///
/// ```
/// use uupdl::naming::build_major;
///
/// assert_eq!(build_major("22631.2428"), 22631);
/// assert_eq!(build_major("26100"), 26100);
/// assert_eq!(build_major("UNKNOWN"), 0);
/// ```
pub fn build_major(build: &str) -> u32 {
    let major = build.trim().split('.').next().unwrap_or_default();
    let digits_end = major
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(major.len());

    major[..digits_end].parse().unwrap_or(0)
}
