//! Site languages and browser language mappings.
//!
//! Browser locales are only mapped for reasonably complete translations, so
//! several supported site languages have no browser mapping at all and
//! visitors with those browser locales get the site default instead.

/// Languages supported by the website, in display order.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "en-us", "pl-pl", "de-de", "pt-br", "pt-pt", "nl-nl", "fr-fr", "zh-cn", "ja-jp", "es-ar",
    "it-it", "ar-sa", "ko-kr", "zh-tw", "hu-hu", "tr-tr", "ro-ro", "ru-ru",
];

/// Browser locale to site language.
const BROWSER_LANGUAGE_MAPPINGS: &[(&str, &str)] = &[
    ("en-us", "en-us"),
    ("en", "en-us"),
    ("pl-pl", "pl-pl"),
    ("pl", "pl-pl"),
    ("de-de", "de-de"),
    ("de", "de-de"),
    ("ja-jp", "ja-jp"),
    ("ja", "ja-jp"),
    ("zh-cn", "zh-cn"),
    ("zh", "zh-cn"),
    ("ar-sa", "ar-sa"),
    ("ar", "ar-sa"),
];

static REGISTRY: LanguageRegistry = LanguageRegistry {
    supported: SUPPORTED_LANGUAGES,
    browser_mappings: BROWSER_LANGUAGE_MAPPINGS,
};

/// Immutable table of site languages.
#[derive(Debug)]
pub struct LanguageRegistry {
    supported: &'static [&'static str],
    browser_mappings: &'static [(&'static str, &'static str)],
}

impl LanguageRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static LanguageRegistry {
        &REGISTRY
    }

    pub fn supported_languages(&self) -> &'static [&'static str] {
        self.supported
    }

    pub fn is_supported(&self, tag: &str) -> bool {
        self.supported.iter().any(|supported| *supported == tag)
    }

    /// Exact-match lookup of a browser locale.
    ///
    /// ```
    /// use uupdl::lang::LanguageRegistry;
    ///
    /// let registry = LanguageRegistry::global();
    /// assert_eq!(registry.site_language_for("en"), Some("en-us"));
    /// assert_eq!(registry.site_language_for("fr-fr"), None);
    /// ```
    pub fn site_language_for(&self, browser_tag: &str) -> Option<&'static str> {
        self.browser_mappings
            .iter()
            .find(|(browser, _)| *browser == browser_tag)
            .map(|(_, site)| *site)
    }

    /// Picks the site language for an `Accept-Language` header.
    ///
    /// Entries are tried by descending quality (header order for ties);
    /// `q=0` entries are skipped.
    pub fn preferred_site_language(&self, accept_language: &str) -> Option<&'static str> {
        let mut entries: Vec<(String, f32)> = accept_language
            .split(',')
            .filter_map(parse_language_range)
            .filter(|(_, quality)| *quality > 0.0)
            .collect();

        // Stable sort keeps header order among equal weights.
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        entries
            .iter()
            .find_map(|(tag, _)| self.site_language_for(tag))
    }
}

fn parse_language_range(entry: &str) -> Option<(String, f32)> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim().to_lowercase();
    if tag.is_empty() {
        return None;
    }

    let quality = parts
        .filter_map(|p| p.trim().strip_prefix("q="))
        .find_map(|q| q.trim().parse::<f32>().ok())
        .unwrap_or(1.0);

    Some((tag, quality))
}
