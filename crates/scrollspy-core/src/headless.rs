#![forbid(unsafe_code)]

//! In-memory page and list container for testing without a browser.
//!
//! [`HeadlessPage`] lays sections out at fixed document offsets and derives
//! viewport-relative tops from its scroll offset, the way a browser reports
//! `getBoundingClientRect().top`. [`HeadlessContainer`] clamps scroll writes
//! like a real overflow container and records every write.
//!
//! # Example
//!
//! ```
//! use scrollspy_core::headless::{HeadlessContainer, HeadlessPage};
//! use scrollspy_core::{Anchor, Scrollspy, ScrollspyConfig};
//!
//! let mut page = HeadlessPage::new(900.0)
//!     .with_section("intro", 100.0)
//!     .with_section("usage", 1_000.0);
//! let mut list = HeadlessContainer::uniform(2, 30.0, 2);
//!
//! let anchors = Anchor::parse_all(["#intro", "#usage"]).unwrap();
//! let mut spy = Scrollspy::new(ScrollspyConfig::default(), anchors, vec!["Intro", "Usage"]).unwrap();
//! let _ = spy.mount(&page, &mut list);
//! assert_eq!(spy.active_index(), Some(0));
//!
//! page.scroll_to(900.0);
//! let _ = spy.on_page_scroll(&page, &mut list);
//! assert_eq!(spy.active_index(), Some(1));
//! ```

use crate::anchor::Anchor;
use crate::geometry::{ListContainer, Page};

/// A page with sections at fixed document offsets.
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    sections: Vec<(String, f64)>,
    viewport_height: f64,
    scroll_offset: f64,
}

impl HeadlessPage {
    /// Empty page with the given viewport height, scrolled to the top.
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            sections: Vec::new(),
            viewport_height,
            scroll_offset: 0.0,
        }
    }

    /// Add a section whose top edge sits `document_top` pixels into the page.
    #[must_use]
    pub fn with_section(mut self, id: impl Into<String>, document_top: f64) -> Self {
        self.insert_section(id, document_top);
        self
    }

    /// Add or move a section.
    pub fn insert_section(&mut self, id: impl Into<String>, document_top: f64) {
        let id = id.into();
        match self.sections.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = document_top,
            None => self.sections.push((id, document_top)),
        }
    }

    /// Remove a section, as a route change that drops it from the page would.
    pub fn remove_section(&mut self, id: &str) {
        self.sections.retain(|(existing, _)| existing != id);
    }

    /// Scroll the page to an absolute offset.
    pub fn scroll_to(&mut self, offset: f64) {
        self.scroll_offset = offset.max(0.0);
    }

    /// Resize the viewport.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }
}

impl Page for HeadlessPage {
    /// Document offset of the section's top edge.
    type Target = f64;

    fn resolve(&self, anchor: &Anchor) -> Option<f64> {
        self.sections
            .iter()
            .find(|(id, _)| id == anchor.id())
            .map(|&(_, top)| top)
    }

    fn top_offset(&self, target: &f64) -> f64 {
        target - self.scroll_offset
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }
}

/// A scrollable list container with clamped scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessContainer {
    scroll_height: f64,
    client_height: f64,
    scroll_top: f64,
    mounted: bool,
    writes: Vec<f64>,
}

impl HeadlessContainer {
    #[must_use]
    pub fn new(scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_height,
            client_height,
            scroll_top: 0.0,
            mounted: true,
            writes: Vec::new(),
        }
    }

    /// `item_count` items of `item_height` pixels with `visible_items` fitting
    /// in the list viewport.
    #[must_use]
    pub fn uniform(item_count: usize, item_height: f64, visible_items: usize) -> Self {
        Self::new(
            item_height * item_count as f64,
            item_height * visible_items as f64,
        )
    }

    /// A container that was never attached.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            mounted: false,
            ..Self::new(0.0, 0.0)
        }
    }

    /// Largest reachable scroll position.
    #[must_use]
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Scroll writes issued by the tracker, in order, before clamping.
    #[must_use]
    pub fn writes(&self) -> &[f64] {
        &self.writes
    }

    /// Forget recorded writes.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Simulate the user scrolling the list directly.
    pub fn user_scroll_to(&mut self, offset: f64) {
        self.scroll_top = offset.clamp(0.0, self.max_scroll_top());
    }
}

impl ListContainer for HeadlessContainer {
    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, value: f64) {
        self.writes.push(value);
        self.scroll_top = value.clamp(0.0, self.max_scroll_top());
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tops_are_viewport_relative() {
        let mut page = HeadlessPage::new(800.0).with_section("a", 500.0);
        let anchor = Anchor::parse("#a").unwrap();
        let target = page.resolve(&anchor).unwrap();
        assert_eq!(page.top_offset(&target), 500.0);
        page.scroll_to(650.0);
        assert_eq!(page.top_offset(&target), -150.0);
    }

    #[test]
    fn missing_section_does_not_resolve() {
        let mut page = HeadlessPage::new(800.0).with_section("a", 0.0);
        page.remove_section("a");
        assert!(page.resolve(&Anchor::parse("#a").unwrap()).is_none());
    }

    #[test]
    fn container_clamps_and_records() {
        let mut list = HeadlessContainer::uniform(10, 30.0, 3);
        list.set_scroll_top(1_000.0);
        assert_eq!(list.scroll_top(), 210.0);
        assert_eq!(list.writes(), &[1_000.0]);
    }
}
