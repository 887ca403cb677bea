#![forbid(unsafe_code)]

//! JSON options accepted by the JavaScript-facing handle.
//!
//! ```json
//! {
//!   "anchors": ["#intro", "#install"],
//!   "config": { "headerHeight": 64, "activeClass": "is-current" },
//!   "applyScrollMargin": false
//! }
//! ```
//!
//! `applyScrollMargin` opts in to writing an inline `scroll-margin-top` of
//! `headerHeight + sectionOffset` onto every resolved section. It is off by
//! default so page styles stay untouched.
//!
//! Parsing lives outside the `wasm32`-only module so it can be unit tested
//! natively.

use scrollspy_core::{Anchor, ScrollspyConfig, ScrollspyError};
use serde::Deserialize;

/// Errors from decoding host-supplied options.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsError {
    /// Malformed JSON or wrong shape.
    Json(String),
    /// Well-formed JSON with invalid values.
    Config(ScrollspyError),
}

impl core::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(_) => None,
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ScrollspyError> for OptionsError {
    fn from(err: ScrollspyError) -> Self {
        Self::Config(err)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawOptions {
    anchors: Vec<String>,
    #[serde(default)]
    config: ScrollspyConfig,
    #[serde(default)]
    apply_scroll_margin: bool,
}

/// Decoded, validated handle options.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub anchors: Vec<Anchor>,
    pub config: ScrollspyConfig,
    /// Write `scroll-margin-top` onto resolved sections.
    pub apply_scroll_margin: bool,
}

/// Parse and validate the options document.
pub fn parse_options(json: &str) -> Result<Options, OptionsError> {
    let raw: RawOptions =
        serde_json::from_str(json).map_err(|e| OptionsError::Json(e.to_string()))?;
    raw.config.validate()?;
    Ok(Options {
        anchors: Anchor::parse_all(&raw.anchors)?,
        config: raw.config,
        apply_scroll_margin: raw.apply_scroll_margin,
    })
}

/// Parse a bare JSON array of anchor strings.
pub fn parse_anchor_list(json: &str) -> Result<Vec<Anchor>, OptionsError> {
    let raw: Vec<String> =
        serde_json::from_str(json).map_err(|e| OptionsError::Json(e.to_string()))?;
    Ok(Anchor::parse_all(&raw)?)
}
