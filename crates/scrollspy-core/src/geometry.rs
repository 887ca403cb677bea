#![forbid(unsafe_code)]

//! Host seams: everything the tracker needs to know about the page and its
//! own list container.
//!
//! The tracker never touches a DOM directly. A host supplies a [`Page`] that
//! can resolve anchors and report vertical geometry, and a [`ListContainer`]
//! for the scrollable navigation list. All lengths are CSS pixels.

use crate::anchor::Anchor;

/// The document the sections live in.
pub trait Page {
    /// Handle to a resolved section element.
    type Target;

    /// Look up the element an anchor points at. `None` when it is not
    /// (yet) rendered.
    fn resolve(&self, anchor: &Anchor) -> Option<Self::Target>;

    /// Top edge of `target` relative to the viewport (negative once the
    /// section start has scrolled above it).
    fn top_offset(&self, target: &Self::Target) -> f64;

    /// Height of the viewport.
    fn viewport_height(&self) -> f64;

    /// Absolute vertical scroll offset of the page.
    fn scroll_offset(&self) -> f64;
}

/// The scrollable list that holds the navigation items.
pub trait ListContainer {
    /// Full scrollable content height.
    fn scroll_height(&self) -> f64;

    /// Visible height of the list.
    fn client_height(&self) -> f64;

    /// Current scroll position.
    fn scroll_top(&self) -> f64;

    /// Move the scroll position.
    fn set_scroll_top(&mut self, value: f64);

    /// Whether the container is attached and measurable. Scroll sync is
    /// skipped entirely when this is false.
    fn is_mounted(&self) -> bool {
        true
    }
}
