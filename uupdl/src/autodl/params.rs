//! Request parameters of an automatic download.

use tracing::debug;

use super::error::AutoDlError;
use super::mode::DownloadMode;
use super::options::AUTODL_PARAM;
use crate::edition::EditionSelection;
use crate::request::RequestContext;

/// Form field listing the requested virtual editions.
const VIRTUAL_EDITIONS_FIELD: &str = "virtualEditions";

/// Parameters that drive a download configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutoDlParams {
    pub mode: DownloadMode,
    pub update_id: String,
    /// Language pack; `None` means all languages.
    pub language_pack: Option<String>,
    /// The raw `edition` parameter, forwarded as-is in callback URLs.
    pub desired_edition: Option<String>,
    /// The parsed edition selection.
    pub desired_edition_mixed: EditionSelection,
    /// Only used by [`DownloadMode::ConvertWithVirtualEditions`].
    pub desired_virtual_editions: Vec<String>,
}

impl AutoDlParams {
    /// Creates parameters for an update with every other option unset.
    pub fn new(mode: DownloadMode, update_id: impl Into<String>) -> Self {
        Self {
            mode,
            update_id: update_id.into(),
            ..Default::default()
        }
    }

    /// Set the language pack.
    pub fn with_language_pack(mut self, pack: impl Into<String>) -> Self {
        self.language_pack = Some(pack.into());
        self
    }

    /// Set the edition parameter; the mixed selection is parsed from it.
    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        let edition = edition.into();
        self.desired_edition_mixed = EditionSelection::parse(Some(&edition));
        self.desired_edition = Some(edition);
        self
    }

    /// Set the requested virtual editions.
    pub fn with_virtual_editions<I, S>(mut self, editions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.desired_virtual_editions = editions.into_iter().map(Into::into).collect();
        self
    }

    /// Extracts parameters from a request.
    ///
    /// - `id` (query, required)
    /// - `pack`, `edition` (query, optional; empty counts as absent)
    /// - `autodl` (query, mode flag 1-3, defaults to 1)
    /// - `virtualEditions` (form, `;` or `,` separated)
    pub fn from_request(request: &RequestContext) -> Result<Self, AutoDlError> {
        let update_id = non_empty(request.query_param("id")).ok_or(AutoDlError::MissingUpdateId)?;

        let mode = match request.query_param(AUTODL_PARAM) {
            Some(flag) => flag.parse()?,
            None => DownloadMode::DownloadOnly,
        };

        let desired_edition = non_empty(request.query_param("edition")).map(str::to_string);
        let desired_virtual_editions = request
            .form_field(VIRTUAL_EDITIONS_FIELD)
            .map(|raw| {
                raw.split([';', ','])
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let params = Self {
            mode,
            update_id: update_id.to_string(),
            language_pack: non_empty(request.query_param("pack")).map(str::to_string),
            desired_edition_mixed: EditionSelection::parse(desired_edition.as_deref()),
            desired_edition,
            desired_virtual_editions,
        };

        debug!(
            update_id = %params.update_id,
            mode = %params.mode,
            pack = ?params.language_pack,
            edition = ?params.desired_edition,
            "Parsed automatic download parameters"
        );

        Ok(params)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Scheme;

    fn request() -> RequestContext {
        RequestContext::new(Scheme::Https, "uupdump.net", "/get.php")
    }

    #[test]
    fn test_requires_update_id() {
        let err = AutoDlParams::from_request(&request()).unwrap_err();
        assert!(matches!(err, AutoDlError::MissingUpdateId));

        let err = AutoDlParams::from_request(&request().with_query("id", " ")).unwrap_err();
        assert!(matches!(err, AutoDlError::MissingUpdateId));
    }

    #[test]
    fn test_minimal_request() {
        let params = AutoDlParams::from_request(&request().with_query("id", "abc")).unwrap();

        assert_eq!(params, AutoDlParams::new(DownloadMode::DownloadOnly, "abc"));
    }

    #[test]
    fn test_full_request() {
        let ctx = request()
            .with_query("id", "abc")
            .with_query("pack", "en-us")
            .with_query("edition", "core;professional")
            .with_query("autodl", "3")
            .with_form("virtualEditions", "Enterprise, Education;");

        let params = AutoDlParams::from_request(&ctx).unwrap();

        assert_eq!(params.mode, DownloadMode::ConvertWithVirtualEditions);
        assert_eq!(params.language_pack.as_deref(), Some("en-us"));
        assert_eq!(params.desired_edition.as_deref(), Some("core;professional"));
        assert_eq!(params.desired_edition_mixed.edition_tag(), "multi");
        assert_eq!(params.desired_virtual_editions, vec!["Enterprise", "Education"]);
    }

    #[test]
    fn test_invalid_mode() {
        let ctx = request().with_query("id", "abc").with_query("autodl", "9");
        let err = AutoDlParams::from_request(&ctx).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MODE");
    }

    #[test]
    fn test_builder_matches_request_parsing() {
        let built = AutoDlParams::new(DownloadMode::Convert, "abc")
            .with_language_pack("de-de")
            .with_edition("Professional");
        let parsed = AutoDlParams::from_request(
            &request()
                .with_query("id", "abc")
                .with_query("pack", "de-de")
                .with_query("edition", "Professional")
                .with_query("autodl", "2"),
        )
        .unwrap();

        assert_eq!(built, parsed);
    }
}
