#![forbid(unsafe_code)]

//! Tracker configuration.
//!
//! [`ScrollspyConfig`] deserializes from camelCase JSON with every field
//! optional, so hosts can pass only what they override:
//!
//! ```
//! use scrollspy_core::ScrollspyConfig;
//!
//! let config: ScrollspyConfig = serde_json::from_str(r#"{"headerHeight": 64}"#).unwrap();
//! assert_eq!(config.header_height, 64.0);
//! assert_eq!(config.active_class, "Scrollspy");
//! ```

use serde::Deserialize;

use crate::error::ScrollspyError;

/// Class applied to the active navigation item unless overridden.
pub const DEFAULT_ACTIVE_CLASS: &str = "Scrollspy";
/// Default in-view threshold, in pixels.
pub const DEFAULT_SECTION_OFFSET: f64 = 20.0;
/// Fraction of the viewport below the header treated as "currently reading".
pub const DEFAULT_VISIBLE_BAND_RATIO: f64 = 0.33;

/// Tuning knobs for section tracking.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ScrollspyConfig {
    /// Height of a fixed page header, excluded from the visible area.
    pub header_height: f64,

    /// In-view threshold, in pixels. The tracker itself never reads it;
    /// [`scroll_margin`](Self::scroll_margin) combines it with the header for
    /// hosts that want to offset anchor jumps.
    pub section_offset: f64,

    /// Marker applied to active items. Empty disables marking entirely,
    /// including list scroll sync.
    pub active_class: String,

    /// Upper fraction of `viewport - header` used as the in-view band.
    pub visible_band_ratio: f64,
}

impl Default for ScrollspyConfig {
    fn default() -> Self {
        Self {
            header_height: 0.0,
            section_offset: DEFAULT_SECTION_OFFSET,
            active_class: DEFAULT_ACTIVE_CLASS.to_owned(),
            visible_band_ratio: DEFAULT_VISIBLE_BAND_RATIO,
        }
    }
}

impl ScrollspyConfig {
    #[must_use]
    pub fn with_header_height(mut self, height: f64) -> Self {
        self.header_height = height;
        self
    }

    #[must_use]
    pub fn with_section_offset(mut self, offset: f64) -> Self {
        self.section_offset = offset;
        self
    }

    #[must_use]
    pub fn with_active_class(mut self, class: impl Into<String>) -> Self {
        self.active_class = class.into();
        self
    }

    #[must_use]
    pub fn with_visible_band_ratio(mut self, ratio: f64) -> Self {
        self.visible_band_ratio = ratio;
        self
    }

    /// Whether active items get marked (and the list is kept in sync).
    #[inline]
    #[must_use]
    pub fn marks_active(&self) -> bool {
        !self.active_class.is_empty()
    }

    /// Height of the in-view band for a viewport of `viewport_height` pixels.
    #[inline]
    #[must_use]
    pub fn visible_area_height(&self, viewport_height: f64) -> f64 {
        (viewport_height - self.header_height) * self.visible_band_ratio
    }

    /// `header_height + section_offset`, for hosts that position sections
    /// themselves. Nothing in this crate applies it.
    #[inline]
    #[must_use]
    pub fn scroll_margin(&self) -> f64 {
        self.header_height + self.section_offset
    }

    /// Reject non-finite or out-of-range values.
    pub fn validate(&self) -> Result<(), ScrollspyError> {
        if !self.header_height.is_finite() || self.header_height < 0.0 {
            return Err(ScrollspyError::InvalidConfig {
                field: "headerHeight",
                reason: "must be a finite, non-negative number",
            });
        }
        if !self.section_offset.is_finite() || self.section_offset < 0.0 {
            return Err(ScrollspyError::InvalidConfig {
                field: "sectionOffset",
                reason: "must be a finite, non-negative number",
            });
        }
        if !(self.visible_band_ratio > 0.0 && self.visible_band_ratio <= 1.0) {
            return Err(ScrollspyError::InvalidConfig {
                field: "visibleBandRatio",
                reason: "must be in (0, 1]",
            });
        }
        if self.active_class.chars().any(char::is_whitespace) {
            return Err(ScrollspyError::InvalidConfig {
                field: "activeClass",
                reason: "must be a single class name",
            });
        }
        Ok(())
    }
}
