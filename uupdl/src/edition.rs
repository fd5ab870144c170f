//! Edition selection for automatic downloads.
//!
//! The `edition` request parameter names either one Windows edition or a
//! `;`-separated list of them. [`EditionSelection`] resolves that once at the
//! request boundary so the rest of the crate never has to probe its shape.

/// Edition tag used in archive names when several editions are selected.
pub const MULTI_EDITION_TAG: &str = "multi";

/// Edition tag used when no edition was selected.
pub const ALL_EDITIONS_TAG: &str = "all";

/// Edition tag for update-only downloads.
pub const UPDATE_ONLY_TAG: &str = "updateonly";

/// Edition tag for app downloads.
pub const APP_TAG: &str = "app";

/// Edition tag for moment app downloads.
pub const APP_MOMENT_TAG: &str = "app_moment";

/// Separator between editions in a mixed selection.
pub const EDITION_SEPARATOR: char = ';';

/// Returns true for the app edition tags.
pub fn is_app_tag(tag: &str) -> bool {
    tag == APP_TAG || tag == APP_MOMENT_TAG
}

/// The editions a request asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditionSelection {
    /// No edition parameter; every edition is included.
    #[default]
    Absent,
    /// A single edition name.
    Single(String),
    /// A list of edition names, in request order.
    Multiple(Vec<String>),
}

impl EditionSelection {
    /// Parses a raw `edition` parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use uupdl::edition::EditionSelection;
    ///
    /// assert_eq!(EditionSelection::parse(None), EditionSelection::Absent);
    /// assert_eq!(
    ///     EditionSelection::parse(Some("professional")),
    ///     EditionSelection::Single("professional".to_string())
    /// );
    /// assert_eq!(
    ///     EditionSelection::parse(Some("core;professional")),
    ///     EditionSelection::Multiple(vec!["core".to_string(), "professional".to_string()])
    /// );
    /// ```
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return EditionSelection::Absent,
        };

        if !raw.contains(EDITION_SEPARATOR) {
            return EditionSelection::Single(raw.to_string());
        }

        let editions: Vec<String> = raw
            .split(EDITION_SEPARATOR)
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();

        if editions.is_empty() {
            return EditionSelection::Absent;
        }

        EditionSelection::Multiple(editions)
    }

    /// Edition names in the selection.
    pub fn editions(&self) -> &[String] {
        match self {
            EditionSelection::Absent => &[],
            EditionSelection::Single(edition) => std::slice::from_ref(edition),
            EditionSelection::Multiple(editions) => editions,
        }
    }

    /// The edition segment used in archive names.
    ///
    /// A list containing an app edition is labelled `app` instead of `multi`.
    ///
    /// ```
    /// use uupdl::edition::EditionSelection;
    ///
    /// let pro_home = EditionSelection::parse(Some("Pro;Home"));
    /// assert_eq!(pro_home.edition_tag(), "multi");
    ///
    /// let with_app = EditionSelection::parse(Some("Pro;Home;App_Moment"));
    /// assert_eq!(with_app.edition_tag(), "app");
    /// ```
    pub fn edition_tag(&self) -> String {
        let tag = match self {
            EditionSelection::Absent => ALL_EDITIONS_TAG.to_string(),
            EditionSelection::Single(edition) => edition.to_lowercase(),
            EditionSelection::Multiple(editions) if editions.len() == 1 => {
                editions[0].to_lowercase()
            }
            EditionSelection::Multiple(_) => MULTI_EDITION_TAG.to_string(),
        };

        if tag == MULTI_EDITION_TAG && self.contains_app() {
            return APP_TAG.to_string();
        }

        tag
    }

    /// True if the selection already rules out a separate app package.
    pub fn excludes_apps(&self) -> bool {
        self.editions().iter().any(|edition| {
            let edition = edition.to_lowercase();
            edition == UPDATE_ONLY_TAG || is_app_tag(&edition)
        })
    }

    /// Value forwarded to the update API's `edition` parameter.
    pub fn as_query_value(&self) -> Option<String> {
        match self {
            EditionSelection::Absent => None,
            EditionSelection::Single(edition) => Some(edition.clone()),
            EditionSelection::Multiple(editions) => {
                Some(editions.join(&EDITION_SEPARATOR.to_string()))
            }
        }
    }

    fn contains_app(&self) -> bool {
        self.editions()
            .iter()
            .any(|edition| is_app_tag(&edition.to_lowercase()))
    }
}
