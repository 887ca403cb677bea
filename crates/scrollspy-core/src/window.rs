#![forbid(unsafe_code)]

//! Navigation list scroll sync.
//!
//! The navigation list is its own scroll container. To keep the active item
//! visible without measuring every item, item heights are approximated as
//! uniform (`scroll_height / item_count`) and the tracker remembers which
//! index range it believes is on screen ([`IndexWindow`]). When the active
//! item falls on or outside that range, the window slides and the list is
//! scrolled to show it.
//!
//! The approximation is deliberately coarse: the failure mode is a list
//! scrolled a few pixels too far or too short.

use crate::geometry::ListContainer;

/// Approximate list geometry derived from the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerMetrics {
    /// Average height of one navigation item, rounded to whole pixels.
    pub item_height: f64,
    /// Rounded number of items that fit in the visible list, at least 1.
    pub items_in_view: usize,
    /// Total navigation items.
    pub item_count: usize,
}

impl ContainerMetrics {
    /// Measure `container` holding `item_count` items.
    ///
    /// Returns `None` when there is nothing meaningful to measure: a detached
    /// container, no items, or an approximate item height that rounds to zero.
    #[must_use]
    pub fn measure<C: ListContainer + ?Sized>(container: &C, item_count: usize) -> Option<Self> {
        if !container.is_mounted() || item_count == 0 {
            return None;
        }
        let item_height = (container.scroll_height() / item_count as f64).round();
        if !item_height.is_finite() || item_height <= 0.0 {
            return None;
        }
        let in_view = (container.client_height() / item_height).round();
        let items_in_view = if in_view.is_finite() && in_view >= 1.0 {
            in_view as usize
        } else {
            1
        };
        Some(Self {
            item_height,
            items_in_view,
            item_count,
        })
    }

    #[inline]
    fn last_index(&self) -> usize {
        self.item_count - 1
    }
}

/// Inclusive range of item indices assumed visible in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexWindow {
    pub first: usize,
    pub last: usize,
}

impl IndexWindow {
    /// Window whose last visible index is `last`, clamped to the list.
    #[must_use]
    pub fn ending_at(last: usize, metrics: &ContainerMetrics) -> Self {
        let last = last.min(metrics.last_index());
        Self {
            first: last.saturating_sub(metrics.items_in_view - 1),
            last,
        }
    }

    /// Window whose first visible index is `first`, clamped to the list.
    #[must_use]
    pub fn starting_at(first: usize, metrics: &ContainerMetrics) -> Self {
        let last = first
            .saturating_add(metrics.items_in_view - 1)
            .min(metrics.last_index());
        Self::ending_at(last, metrics)
    }

    /// Window before any list scroll was observed.
    #[must_use]
    pub fn initial(metrics: &ContainerMetrics) -> Self {
        Self::starting_at(0, metrics)
    }

    /// Re-derive the window from the list's actual scroll position.
    #[must_use]
    pub fn from_scroll_top(scroll_top: f64, metrics: &ContainerMetrics) -> Self {
        let first_visible = (scroll_top.max(0.0) / metrics.item_height).round() as usize;
        Self::ending_at(
            first_visible.saturating_add(metrics.items_in_view - 1),
            metrics,
        )
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.first <= index && index <= self.last
    }
}

/// What the list container should do after an item became active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAdjustment {
    /// The item is already inside the window.
    None,
    /// Scroll to an absolute offset.
    To(f64),
    /// Scroll to the very end. Used near the end of the list so a short final
    /// scroll does not leave a blank gap.
    SnapToBottom(f64),
}

impl ScrollAdjustment {
    /// Target offset, if the list should move.
    #[must_use]
    pub fn offset(self) -> Option<f64> {
        match self {
            Self::None => None,
            Self::To(offset) | Self::SnapToBottom(offset) => Some(offset),
        }
    }
}

/// Slide `window` (or an initial one) so `index` is visible.
///
/// Returns the new window and the scroll the container should perform.
#[must_use]
pub fn sync_to(
    index: usize,
    window: Option<IndexWindow>,
    metrics: &ContainerMetrics,
    scroll_height: f64,
) -> (IndexWindow, ScrollAdjustment) {
    let current = window.unwrap_or_else(|| IndexWindow::initial(metrics));

    let next = if index >= current.last {
        IndexWindow::ending_at(index, metrics)
    } else if index <= current.first {
        IndexWindow::starting_at(index, metrics)
    } else {
        return (current, ScrollAdjustment::None);
    };

    let end_is_near =
        next.last as f64 + metrics.items_in_view as f64 / 2.0 > metrics.item_count as f64;
    let adjustment = if end_is_near {
        ScrollAdjustment::SnapToBottom(scroll_height)
    } else {
        ScrollAdjustment::To(metrics.item_height * next.first as f64)
    };
    (next, adjustment)
}
