#![forbid(unsafe_code)]

//! Errors raised while configuring a scrollspy.
//!
//! Runtime events never fail: missing sections, detached containers and
//! degenerate geometry all degrade to no-ops. Only configuration is checked.

/// Errors from building or updating a [`Scrollspy`](crate::Scrollspy).
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollspyError {
    /// Anchors and navigation items must pair up one to one.
    ItemCountMismatch { anchors: usize, items: usize },
    /// An anchor string was not of the form `#id`.
    InvalidAnchor(String),
    /// A configuration value was out of range.
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for ScrollspyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemCountMismatch { anchors, items } => write!(
                f,
                "item count mismatch: {anchors} anchors but {items} navigation items"
            ),
            Self::InvalidAnchor(raw) => write!(f, "invalid anchor '{raw}': expected '#id'"),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config field '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for ScrollspyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_counts() {
        let err = ScrollspyError::ItemCountMismatch {
            anchors: 3,
            items: 2,
        };
        assert_eq!(
            err.to_string(),
            "item count mismatch: 3 anchors but 2 navigation items"
        );
    }

    #[test]
    fn display_invalid_anchor() {
        let err = ScrollspyError::InvalidAnchor("intro".into());
        assert_eq!(err.to_string(), "invalid anchor 'intro': expected '#id'");
    }
}
