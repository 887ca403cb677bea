#![forbid(unsafe_code)]

//! Section anchors: `#id` references into the page.

use std::fmt;

use crate::error::ScrollspyError;

/// A validated in-page section reference such as `#intro`.
///
/// The same string serves as the element lookup key (without the `#`) and as
/// the navigation hash a link carries (with the `#`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor(String);

impl Anchor {
    /// Parse an anchor of the form `#id` with a non-empty id.
    pub fn parse(raw: &str) -> Result<Self, ScrollspyError> {
        match raw.strip_prefix('#') {
            Some(id) if !id.is_empty() && !id.chars().any(char::is_whitespace) => {
                Ok(Self(raw.to_owned()))
            }
            _ => Err(ScrollspyError::InvalidAnchor(raw.to_owned())),
        }
    }

    /// Parse a whole anchor list, failing on the first bad entry.
    pub fn parse_all<I, S>(raw: I) -> Result<Vec<Self>, ScrollspyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter().map(|s| Self::parse(s.as_ref())).collect()
    }

    /// The element id this anchor points at (no leading `#`).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0[1..]
    }

    /// The anchor as a navigation hash (with leading `#`).
    #[must_use]
    pub fn as_hash(&self) -> &str {
        &self.0
    }

    /// Exact match against a link hash.
    #[must_use]
    pub fn matches_hash(&self, hash: &str) -> bool {
        self.0 == hash
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Anchor {
    type Error = ScrollspyError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_hash_id() {
        let anchor = Anchor::parse("#intro").unwrap();
        assert_eq!(anchor.id(), "intro");
        assert_eq!(anchor.as_hash(), "#intro");
        assert_eq!(anchor.to_string(), "#intro");
    }

    #[test]
    fn parse_rejects_missing_hash() {
        assert_eq!(
            Anchor::parse("intro"),
            Err(ScrollspyError::InvalidAnchor("intro".into()))
        );
    }

    #[test]
    fn parse_rejects_bare_hash_and_whitespace() {
        assert!(Anchor::parse("#").is_err());
        assert!(Anchor::parse("").is_err());
        assert!(Anchor::parse("#two words").is_err());
    }

    #[test]
    fn parse_all_stops_on_first_error() {
        let err = Anchor::parse_all(["#a", "b", "#c"]).unwrap_err();
        assert_eq!(err, ScrollspyError::InvalidAnchor("b".into()));
    }

    #[test]
    fn hash_match_is_exact() {
        let anchor = Anchor::parse("#setup").unwrap();
        assert!(anchor.matches_hash("#setup"));
        assert!(!anchor.matches_hash("#setup-2"));
        assert!(!anchor.matches_hash("setup"));
    }
}
