#![forbid(unsafe_code)]

//! Activation heuristic: which navigation item is "currently reading".
//!
//! # Invariants
//!
//! 1. **Length**: an evaluated [`ViewState`] has exactly one slot per anchor,
//!    resolved or not. Unresolved anchors always read `false`.
//! 2. **Single winner for ordered pages**: when resolved section tops are
//!    non-decreasing in document order, at most one slot is `true`.
//! 3. **No flicker**: if no rule marks anything, the previous state is
//!    returned unchanged instead of an all-false state.
//! 4. **Determinism**: identical inputs give identical outputs.
//!
//! # Rules (in priority order, per resolved section)
//!
//! | Rule | Condition | Effect |
//! |------|-----------|--------|
//! | In view | `top < band` | mark, unmark previous resolved |
//! | Pseudo-active | nothing in view yet, `scroll_offset > top` | mark, unmark previous resolved |
//! | Top of page | nothing marked, `scroll_offset < first top` | mark first resolved |
//! | Retain | nothing marked | keep previous state |

use crate::anchor::Anchor;

/// Per-anchor active flags, in anchor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    flags: Vec<bool>,
}

impl ViewState {
    /// All-inactive state for `len` anchors.
    #[must_use]
    pub fn inactive(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Build from explicit flags.
    #[must_use]
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether slot `index` is active. Out of range reads as inactive.
    #[inline]
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// First active slot, if any.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.flags.iter().position(|&active| active)
    }

    /// Number of active slots.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|&&active| active).count()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    /// Indices active here that were not active in `previous`.
    pub fn newly_active<'a>(&'a self, previous: &'a ViewState) -> impl Iterator<Item = usize> + 'a {
        self.flags
            .iter()
            .enumerate()
            .filter(move |&(index, &active)| active && !previous.is_active(index))
            .map(|(index, _)| index)
    }
}

/// Which rule produced an evaluated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A section top is inside the in-view band.
    InView,
    /// The page scrolled past a section start but nothing is in the band.
    PseudoActive,
    /// The page sits above the first section.
    TopOfPage,
    /// A navigation link hash matched an anchor.
    Hash,
    /// Nothing qualified; the previous state was kept.
    Retained,
}

/// Run the scroll heuristic.
///
/// `tops[i]` is the viewport-relative top of anchor `i`, or `None` when the
/// anchor did not resolve. `visible_area_height` is the band's lower bound
/// and `scroll_offset` the page's absolute vertical offset.
#[must_use]
pub fn evaluate(
    tops: &[Option<f64>],
    visible_area_height: f64,
    scroll_offset: f64,
    previous: &ViewState,
) -> (ViewState, Activation) {
    let mut flags = vec![false; tops.len()];
    let mut in_view = false;
    let mut pseudo = false;
    let mut prev_resolved: Option<usize> = None;

    for (index, top) in tops.iter().enumerate() {
        let Some(top) = *top else {
            continue;
        };

        if visible_area_height > top {
            if let Some(prev) = prev_resolved {
                flags[prev] = false;
            }
            flags[index] = true;
            in_view = true;
        } else if !in_view && scroll_offset > top {
            if let Some(prev) = prev_resolved {
                flags[prev] = false;
            }
            flags[index] = true;
            pseudo = true;
        }
        prev_resolved = Some(index);
    }

    if in_view {
        return (ViewState { flags }, Activation::InView);
    }
    if pseudo {
        return (ViewState { flags }, Activation::PseudoActive);
    }

    let first = tops
        .iter()
        .enumerate()
        .find_map(|(index, top)| top.map(|top| (index, top)));
    if let Some((index, top)) = first
        && scroll_offset < top
    {
        flags[index] = true;
        return (ViewState { flags }, Activation::TopOfPage);
    }

    (previous.clone(), Activation::Retained)
}

/// Activate the anchor whose hash equals `hash` exactly.
///
/// Only resolved anchors (`resolved[i] == true`) can match. Without a match
/// the previous state is kept as is: the scroll rules, including the
/// top-of-page default, do not run for clicks, so an unknown hash never
/// moves the highlight.
#[must_use]
pub fn from_hash(
    anchors: &[Anchor],
    resolved: &[bool],
    hash: &str,
    previous: &ViewState,
) -> (ViewState, Activation) {
    let flags: Vec<bool> = anchors
        .iter()
        .zip(resolved)
        .map(|(anchor, &resolved)| resolved && anchor.matches_hash(hash))
        .collect();

    if flags.iter().any(|&active| active) {
        (ViewState { flags }, Activation::Hash)
    } else {
        (previous.clone(), Activation::Retained)
    }
}
