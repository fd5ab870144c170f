//! Request context for automatic-download requests.
//!
//! Everything the download configuration needs to know about the incoming
//! HTTP request is carried explicitly in a [`RequestContext`]: the scheme and
//! host used to build callback URLs, the request path, and the query and form
//! parameters.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::Url;
use thiserror::Error;

/// Errors raised while building a request context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The URL could not be parsed.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Only http and https requests are accepted.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The URL has no host component.
    #[error("Request URL has no host: {0}")]
    MissingHost(String),
}

/// Transport scheme the request arrived over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    /// Returns the scheme as used in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Selects the scheme from a TLS flag.
    pub fn from_tls(tls: bool) -> Self {
        if tls {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of an HTTP request consumed by the download configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    scheme: Scheme,
    host: String,
    path: String,
    query: BTreeMap<String, String>,
    form: BTreeMap<String, String>,
}

impl RequestContext {
    /// Creates a context without query or form parameters.
    pub fn new(scheme: Scheme, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            path: path.into(),
            query: BTreeMap::new(),
            form: BTreeMap::new(),
        }
    }

    /// Parses an absolute request URL.
    ///
    /// The host keeps an explicit port if one was given. Repeated query keys
    /// keep the last value.
    pub fn from_url(url: &str) -> Result<Self, RequestError> {
        let parsed = Url::parse(url).map_err(|e| RequestError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match parsed.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => return Err(RequestError::UnsupportedScheme(other.to_string())),
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| RequestError::MissingHost(url.to_string()))?;
        let host = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let mut context = Self::new(scheme, host, parsed.path());
        for (key, value) in parsed.query_pairs() {
            context.query.insert(key.into_owned(), value.into_owned());
        }

        Ok(context)
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds a form field.
    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key.into(), value.into());
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Scheme, host and path of the current request, without a query string.
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn has_query(&self, name: &str) -> bool {
        self.query.contains_key(name)
    }

    pub fn form_field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_plain_http() {
        let ctx = RequestContext::new(Scheme::Http, "uupdump.net", "/get.php");
        assert_eq!(ctx.base_url(), "http://uupdump.net/get.php");
    }

    #[test]
    fn test_base_url_tls() {
        let ctx = RequestContext::new(Scheme::from_tls(true), "uupdump.net", "/get.php");
        assert_eq!(ctx.base_url(), "https://uupdump.net/get.php");
    }

    #[test]
    fn test_from_url_extracts_parts() {
        let ctx =
            RequestContext::from_url("https://uupdump.net/get.php?id=abc&pack=en-us&autodl=2")
                .unwrap();

        assert_eq!(ctx.scheme(), Scheme::Https);
        assert_eq!(ctx.host(), "uupdump.net");
        assert_eq!(ctx.path(), "/get.php");
        assert_eq!(ctx.query_param("id"), Some("abc"));
        assert_eq!(ctx.query_param("pack"), Some("en-us"));
        assert!(ctx.has_query("autodl"));
        assert!(!ctx.has_query("edition"));
    }

    #[test]
    fn test_from_url_keeps_port() {
        let ctx = RequestContext::from_url("http://localhost:8080/get.php").unwrap();
        assert_eq!(ctx.host(), "localhost:8080");
        assert_eq!(ctx.base_url(), "http://localhost:8080/get.php");
    }

    #[test]
    fn test_from_url_decodes_query_values() {
        let ctx = RequestContext::from_url("http://h/get.php?edition=core%3Bprofessional").unwrap();
        assert_eq!(ctx.query_param("edition"), Some("core;professional"));
    }

    #[test]
    fn test_from_url_rejects_other_schemes() {
        let err = RequestContext::from_url("ftp://uupdump.net/get.php").unwrap_err();
        assert_eq!(err, RequestError::UnsupportedScheme("ftp".to_string()));
    }

    #[test]
    fn test_from_url_rejects_garbage() {
        let err = RequestContext::from_url("not a url").unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl { .. }));
    }

    #[test]
    fn test_form_fields() {
        let ctx = RequestContext::new(Scheme::Http, "h", "/")
            .with_form("cleanup", "1")
            .with_query("id", "x");
        assert_eq!(ctx.form_field("cleanup"), Some("1"));
        assert_eq!(ctx.form_field("netfx"), None);
        assert_eq!(ctx.query_param("id"), Some("x"));
    }
}
