//! Locations: URLs navigated to, and the path-equality rules between them

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::path_config::QueryStringPresentation;

/// A navigable location (an absolute URL)
///
/// All navigation decisions compare locations by path (and optionally
/// query string), never by scheme/host: a session is scoped to one app
/// domain, so the path+query is the identity that matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Url);

impl Location {
    /// Parse a location from a URL string
    pub fn parse(url: &str) -> Result<Self> {
        Url::parse(url)
            .map(Self)
            .map_err(|_| Error::invalid_location(url))
    }

    /// The underlying URL
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Full URL string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Path component (always begins with `/`)
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Query string, if any (without the leading `?`)
    pub fn query(&self) -> Option<&str> {
        self.0.query()
    }

    /// Path plus query string, the input that path rules match against
    pub fn path_and_query(&self) -> String {
        match self.0.query() {
            Some(q) => format!("{}?{}", self.0.path(), q),
            None => self.0.path().to_string(),
        }
    }

    /// Path-equality under a query-string policy.
    ///
    /// `Replace` compares paths only (two locations differing solely in
    /// query string are the same place); `Default` requires the query
    /// string to match too.
    pub fn matches(&self, other: &Location, query_policy: QueryStringPresentation) -> bool {
        match query_policy {
            QueryStringPresentation::Replace => self.path() == other.path(),
            QueryStringPresentation::Default => {
                self.path() == other.path() && self.query() == other.query()
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl std::str::FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Location::parse("not a url").is_err());
        assert!(Location::parse("https://example.com/home").is_ok());
    }

    #[test]
    fn test_path_and_query() {
        assert_eq!(loc("https://example.com/feature").path_and_query(), "/feature");
        assert_eq!(
            loc("https://example.com/feature?x=1").path_and_query(),
            "/feature?x=1"
        );
    }

    #[test]
    fn test_matches_default_requires_query() {
        let a = loc("https://example.com/feature?x=1");
        let b = loc("https://example.com/feature?x=2");
        assert!(!a.matches(&b, QueryStringPresentation::Default));

        let c = loc("https://example.com/feature?x=1");
        assert!(a.matches(&c, QueryStringPresentation::Default));
    }

    #[test]
    fn test_matches_replace_ignores_query() {
        let a = loc("https://example.com/feature?x=1");
        let b = loc("https://example.com/feature?x=2");
        assert!(a.matches(&b, QueryStringPresentation::Replace));

        let other = loc("https://example.com/other?x=1");
        assert!(!a.matches(&other, QueryStringPresentation::Replace));
    }

    #[test]
    fn test_serializes_as_plain_url_string() {
        let location = loc("https://example.com/feature?x=1");
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "\"https://example.com/feature?x=1\"");

        let back: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(back, location);
    }

    #[test]
    fn test_no_query_vs_query() {
        let bare = loc("https://example.com/feature");
        let with = loc("https://example.com/feature?x=1");
        assert!(!bare.matches(&with, QueryStringPresentation::Default));
        assert!(bare.matches(&with, QueryStringPresentation::Replace));
    }
}
