#![forbid(unsafe_code)]

//! The scrollspy state object and its event entry points.
//!
//! [`Scrollspy`] owns everything that changes over a mounted lifetime:
//! resolved section targets, the [`ViewState`], the list [`IndexWindow`]
//! and the click [`ScrollSuppression`]. Hosts drive it with one call per
//! external event:
//!
//! | Event | Entry point |
//! |-------|-------------|
//! | mount / content refresh | [`Scrollspy::mount`] |
//! | page scroll | [`Scrollspy::on_page_scroll`] |
//! | list scroll | [`Scrollspy::on_container_scroll`] |
//! | navigation click | [`Scrollspy::on_section_click`] |
//! | anchors replaced | [`Scrollspy::set_anchors`] |
//! | route changed | [`Scrollspy::set_route`] |
//!
//! # Invariants
//!
//! 1. `anchors.len() == items.len() == view.len() == targets.len()` after
//!    every entry point returns.
//! 2. A navigation click makes exactly the next page scroll a no-op; the
//!    scroll after that evaluates normally.
//! 3. List scroll sync only happens for items that *became* active, and only
//!    when active marking is enabled.

use std::fmt;

use crate::anchor::Anchor;
use crate::config::ScrollspyConfig;
use crate::error::ScrollspyError;
use crate::geometry::{ListContainer, Page};
use crate::view::{self, Activation, ViewState};
use crate::window::{self, ContainerMetrics, IndexWindow, ScrollAdjustment};

/// Whether the next page scroll event should be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollSuppression {
    /// Evaluate page scrolls normally.
    #[default]
    Normal,
    /// A navigation click just set the active item; the scroll it causes is
    /// ignored once.
    IgnoreNextScroll,
}

/// A click inside the navigation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionClick {
    /// The click landed on a navigation link carrying `hash` (e.g. `#setup`).
    Link { hash: String },
    /// The click landed on something that is not a navigation link.
    Other,
}

impl SectionClick {
    #[must_use]
    pub fn link(hash: impl Into<String>) -> Self {
        Self::Link { hash: hash.into() }
    }

    /// The link hash, if this click targets a navigation link.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Link { hash } => Some(hash),
            Self::Other => None,
        }
    }
}

/// Result of one entry point call.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    /// Rule that produced the view state, or `None` if the event was skipped.
    pub activation: Option<Activation>,
    /// Whether any active flag changed.
    pub view_changed: bool,
    /// Scroll applied to the list container.
    pub scroll: ScrollAdjustment,
}

impl Update {
    fn skipped() -> Self {
        Self {
            activation: None,
            view_changed: false,
            scroll: ScrollAdjustment::None,
        }
    }

    /// Whether the host should re-render its items.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.view_changed
    }
}

/// Outcome of a navigation click.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Not a navigation link; let the event continue.
    Ignored,
    /// Handled: the host must stop the click from propagating further.
    Handled(Update),
}

impl ClickOutcome {
    #[must_use]
    pub fn stops_propagation(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

type ClickHandler = Box<dyn FnMut(&SectionClick)>;

/// Tracks which section is being read and keeps its navigation item visible.
///
/// `I` is the caller's opaque navigation item; `T` is the [`Page`]'s section
/// handle type.
pub struct Scrollspy<I, T> {
    config: ScrollspyConfig,
    anchors: Vec<Anchor>,
    items: Vec<I>,
    targets: Vec<Option<T>>,
    view: ViewState,
    window: Option<IndexWindow>,
    suppression: ScrollSuppression,
    route: Option<String>,
    on_section_click: Option<ClickHandler>,
}

impl<I, T> Scrollspy<I, T> {
    /// Create an unmounted tracker.
    ///
    /// Fails if the config is invalid or anchors and items do not pair up.
    pub fn new(
        config: ScrollspyConfig,
        anchors: Vec<Anchor>,
        items: Vec<I>,
    ) -> Result<Self, ScrollspyError> {
        config.validate()?;
        check_pairing(&anchors, &items)?;
        let len = anchors.len();
        Ok(Self {
            config,
            anchors,
            items,
            targets: (0..len).map(|_| None).collect(),
            view: ViewState::inactive(len),
            window: None,
            suppression: ScrollSuppression::Normal,
            route: None,
            on_section_click: None,
        })
    }

    /// Invoke `handler` after every handled navigation click.
    #[must_use]
    pub fn with_click_handler(mut self, handler: impl FnMut(&SectionClick) + 'static) -> Self {
        self.on_section_click = Some(Box::new(handler));
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScrollspyConfig {
        &self.config
    }

    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    #[inline]
    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Index of the active navigation item, if any.
    #[inline]
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.view.active_index()
    }

    /// Anchor of the active navigation item, if any.
    #[must_use]
    pub fn active_anchor(&self) -> Option<&Anchor> {
        self.active_index().map(|index| &self.anchors[index])
    }

    #[must_use]
    pub fn window(&self) -> Option<IndexWindow> {
        self.window
    }

    #[must_use]
    pub fn suppression(&self) -> ScrollSuppression {
        self.suppression
    }

    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Resolved section handles, one slot per anchor.
    #[must_use]
    pub fn targets(&self) -> &[Option<T>] {
        &self.targets
    }

    /// Number of anchors that resolved to a section.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.targets.iter().filter(|target| target.is_some()).count()
    }

    /// Render every item through `f(item, is_active)`.
    ///
    /// `is_active` is always `false` when active marking is disabled.
    pub fn render<R>(&self, mut f: impl FnMut(&I, bool) -> R) -> Vec<R> {
        let marks = self.config.marks_active();
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| f(item, marks && self.view.is_active(index)))
            .collect()
    }

    /// Resolve anchors against `page` and evaluate from scratch.
    ///
    /// Call on mount and whenever the page content may have been replaced.
    pub fn mount<P, C>(&mut self, page: &P, container: &mut C) -> Update
    where
        P: Page<Target = T>,
        C: ListContainer + ?Sized,
    {
        self.targets = self.anchors.iter().map(|anchor| page.resolve(anchor)).collect();
        self.view = ViewState::inactive(self.anchors.len());
        self.window = None;
        self.suppression = ScrollSuppression::Normal;

        tracing::debug!(
            anchors = self.anchors.len(),
            resolved = self.resolved_count(),
            route = self.route.as_deref().unwrap_or(""),
            "scrollspy targets resolved"
        );

        let (next, activation) = self.evaluate_page(page);
        self.commit(next, activation, container)
    }

    /// Handle a page scroll event.
    pub fn on_page_scroll<P, C>(&mut self, page: &P, container: &mut C) -> Update
    where
        P: Page<Target = T>,
        C: ListContainer + ?Sized,
    {
        if self.suppression == ScrollSuppression::IgnoreNextScroll {
            self.suppression = ScrollSuppression::Normal;
            tracing::trace!("page scroll ignored after navigation click");
            return Update::skipped();
        }
        let (next, activation) = self.evaluate_page(page);
        self.commit(next, activation, container)
    }

    /// Handle a scroll of the navigation list itself: re-derive which items
    /// are on screen from its scroll position.
    pub fn on_container_scroll<C>(&mut self, container: &C) -> Option<IndexWindow>
    where
        C: ListContainer + ?Sized,
    {
        let metrics = ContainerMetrics::measure(container, self.items.len())?;
        let window = IndexWindow::from_scroll_top(container.scroll_top(), &metrics);
        self.window = Some(window);
        tracing::trace!(
            first = window.first,
            last = window.last,
            "list window recalibrated"
        );
        Some(window)
    }

    /// Handle a click inside the navigation list.
    ///
    /// Navigation links activate their anchor directly and suppress the next
    /// page scroll; anything else is ignored.
    pub fn on_section_click<C>(&mut self, click: &SectionClick, container: &mut C) -> ClickOutcome
    where
        C: ListContainer + ?Sized,
    {
        let Some(hash) = click.hash() else {
            return ClickOutcome::Ignored;
        };

        self.suppression = ScrollSuppression::IgnoreNextScroll;
        let resolved: Vec<bool> = self.targets.iter().map(Option::is_some).collect();
        let (next, activation) = view::from_hash(&self.anchors, &resolved, hash, &self.view);
        tracing::debug!(hash, matched = activation == Activation::Hash, "navigation click");

        let update = self.commit(next, activation, container);
        if let Some(handler) = self.on_section_click.as_mut() {
            handler(click);
        }
        ClickOutcome::Handled(update)
    }

    /// Replace anchors and items.
    ///
    /// Items are always replaced; targets are re-resolved only when the
    /// anchor list actually changed.
    pub fn set_anchors<P, C>(
        &mut self,
        anchors: Vec<Anchor>,
        items: Vec<I>,
        page: &P,
        container: &mut C,
    ) -> Result<Update, ScrollspyError>
    where
        P: Page<Target = T>,
        C: ListContainer + ?Sized,
    {
        check_pairing(&anchors, &items)?;
        self.items = items;
        if anchors == self.anchors {
            return Ok(Update::skipped());
        }
        self.anchors = anchors;
        Ok(self.mount(page, container))
    }

    /// Record the current route; a different path re-resolves everything.
    pub fn set_route<P, C>(&mut self, route: &str, page: &P, container: &mut C) -> Update
    where
        P: Page<Target = T>,
        C: ListContainer + ?Sized,
    {
        if self.route.as_deref() == Some(route) {
            return Update::skipped();
        }
        self.route = Some(route.to_owned());
        self.mount(page, container)
    }

    fn evaluate_page<P>(&self, page: &P) -> (ViewState, Activation)
    where
        P: Page<Target = T>,
    {
        let tops: Vec<Option<f64>> = self
            .targets
            .iter()
            .map(|target| target.as_ref().map(|target| page.top_offset(target)))
            .collect();
        let band = self.config.visible_area_height(page.viewport_height());
        view::evaluate(&tops, band, page.scroll_offset(), &self.view)
    }

    fn commit<C>(&mut self, next: ViewState, activation: Activation, container: &mut C) -> Update
    where
        C: ListContainer + ?Sized,
    {
        let previous = std::mem::replace(&mut self.view, next);
        let view_changed = previous != self.view;
        let mut scroll = ScrollAdjustment::None;

        if view_changed {
            tracing::debug!(
                ?activation,
                active = ?self.view.active_index(),
                "active section changed"
            );
        }

        if self.config.marks_active() {
            let newly_active: Vec<usize> = self.view.newly_active(&previous).collect();
            for index in newly_active {
                let adjustment = self.sync_list(index, container);
                if adjustment != ScrollAdjustment::None {
                    scroll = adjustment;
                }
            }
        }

        Update {
            activation: Some(activation),
            view_changed,
            scroll,
        }
    }

    fn sync_list<C>(&mut self, index: usize, container: &mut C) -> ScrollAdjustment
    where
        C: ListContainer + ?Sized,
    {
        let Some(metrics) = ContainerMetrics::measure(container, self.items.len()) else {
            return ScrollAdjustment::None;
        };
        let (next, adjustment) =
            window::sync_to(index, self.window, &metrics, container.scroll_height());
        if self.window != Some(next) {
            tracing::debug!(
                index,
                first = next.first,
                last = next.last,
                "list window moved"
            );
        }
        self.window = Some(next);
        if let Some(offset) = adjustment.offset() {
            container.set_scroll_top(offset);
        }
        adjustment
    }
}

impl<I: fmt::Debug, T> fmt::Debug for Scrollspy<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scrollspy")
            .field("config", &self.config)
            .field("anchors", &self.anchors)
            .field("items", &self.items)
            .field("resolved", &self.resolved_count())
            .field("view", &self.view)
            .field("window", &self.window)
            .field("suppression", &self.suppression)
            .field("route", &self.route)
            .field("on_section_click", &self.on_section_click.is_some())
            .finish()
    }
}

fn check_pairing<I>(anchors: &[Anchor], items: &[I]) -> Result<(), ScrollspyError> {
    if anchors.len() == items.len() {
        Ok(())
    } else {
        Err(ScrollspyError::ItemCountMismatch {
            anchors: anchors.len(),
            items: items.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::headless::{HeadlessContainer, HeadlessPage};

    fn anchors(raw: &[&str]) -> Vec<Anchor> {
        Anchor::parse_all(raw).unwrap()
    }

    fn abc_page() -> HeadlessPage {
        HeadlessPage::new(1000.0)
            .with_section("a", 100.0)
            .with_section("b", 1_200.0)
            .with_section("c", 2_400.0)
    }

    fn abc_spy() -> Scrollspy<&'static str, f64> {
        Scrollspy::new(
            ScrollspyConfig::default(),
            anchors(&["#a", "#b", "#c"]),
            vec!["A", "B", "C"],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_count_mismatch() {
        let err = Scrollspy::<&str, f64>::new(
            ScrollspyConfig::default(),
            anchors(&["#a", "#b"]),
            vec!["A"],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScrollspyError::ItemCountMismatch {
                anchors: 2,
                items: 1
            }
        );
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = ScrollspyConfig::default().with_header_height(f64::NAN);
        assert!(Scrollspy::<&str, f64>::new(config, Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn mount_resolves_and_activates_first() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let update = spy.mount(&page, &mut list);
        assert_eq!(spy.view_state().len(), 3);
        assert_eq!(spy.resolved_count(), 3);
        assert_eq!(spy.active_index(), Some(0));
        assert_eq!(update.activation, Some(Activation::InView));
        assert!(update.view_changed);
    }

    #[test]
    fn missing_target_is_dropped_silently() {
        let page = HeadlessPage::new(1000.0)
            .with_section("a", 100.0)
            .with_section("c", 2_400.0);
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);
        assert_eq!(spy.resolved_count(), 2);
        assert!(spy.targets()[1].is_none());
        assert_eq!(spy.view_state().len(), 3);
    }

    #[test]
    fn click_activates_and_suppresses_one_scroll() {
        let mut page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);

        let outcome = spy.on_section_click(&SectionClick::link("#b"), &mut list);
        assert!(outcome.stops_propagation());
        assert_eq!(spy.view_state().as_slice(), &[false, true, false]);
        assert_eq!(spy.suppression(), ScrollSuppression::IgnoreNextScroll);

        // Still at the top of the page: a normal evaluation would pick #a.
        let skipped = spy.on_page_scroll(&page, &mut list);
        assert_eq!(skipped.activation, None);
        assert_eq!(spy.view_state().as_slice(), &[false, true, false]);
        assert_eq!(spy.suppression(), ScrollSuppression::Normal);

        page.scroll_to(0.0);
        let _ = spy.on_page_scroll(&page, &mut list);
        assert_eq!(spy.view_state().as_slice(), &[true, false, false]);
    }

    #[test]
    fn unknown_hash_click_keeps_highlight_at_top_of_page() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);
        let _ = spy.on_section_click(&SectionClick::link("#b"), &mut list);

        // Page still above #a, yet an unmatched hash must not fall back to it.
        let outcome = spy.on_section_click(&SectionClick::link("#missing"), &mut list);
        assert_eq!(
            outcome,
            ClickOutcome::Handled(Update {
                activation: Some(Activation::Retained),
                view_changed: false,
                scroll: ScrollAdjustment::None,
            })
        );
        assert_eq!(spy.view_state().as_slice(), &[false, true, false]);
        assert_eq!(spy.suppression(), ScrollSuppression::IgnoreNextScroll);
    }

    #[test]
    fn non_link_click_is_ignored() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);
        let outcome = spy.on_section_click(&SectionClick::Other, &mut list);
        assert_eq!(outcome, ClickOutcome::Ignored);
        assert_eq!(spy.suppression(), ScrollSuppression::Normal);
    }

    #[test]
    fn click_handler_runs_after_state_update() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy().with_click_handler(move |click| {
            sink.borrow_mut()
                .push(click.hash().unwrap_or_default().to_owned());
        });
        let _ = spy.mount(&page, &mut list);
        let _ = spy.on_section_click(&SectionClick::link("#c"), &mut list);
        let _ = spy.on_section_click(&SectionClick::Other, &mut list);
        assert_eq!(*seen.borrow(), vec!["#c".to_owned()]);
    }

    #[test]
    fn render_marks_only_active_items() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);
        let rendered = spy.render(|item, active| format!("{item}{}", if active { "*" } else { "" }));
        assert_eq!(rendered, vec!["A*", "B", "C"]);
    }

    #[test]
    fn empty_marker_disables_marking_and_sync() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = Scrollspy::new(
            ScrollspyConfig::default().with_active_class(""),
            anchors(&["#a", "#b", "#c"]),
            vec!["A", "B", "C"],
        )
        .unwrap();
        let _ = spy.mount(&page, &mut list);
        assert_eq!(spy.active_index(), Some(0));
        assert!(spy.render(|_, active| active).iter().all(|&active| !active));
        assert!(list.writes().is_empty());
        assert_eq!(spy.window(), None);
    }

    #[test]
    fn set_route_remounts_only_on_change() {
        let mut page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let first = spy.set_route("/docs/one", &page, &mut list);
        assert!(first.activation.is_some());
        assert_eq!(spy.route(), Some("/docs/one"));

        page.remove_section("a");
        let same = spy.set_route("/docs/one", &page, &mut list);
        assert_eq!(same.activation, None);
        assert_eq!(spy.resolved_count(), 3);

        let changed = spy.set_route("/docs/two", &page, &mut list);
        assert!(changed.activation.is_some());
        assert_eq!(spy.resolved_count(), 2);
    }

    #[test]
    fn set_anchors_validates_and_remounts() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);

        assert!(
            spy.set_anchors(anchors(&["#a"]), vec!["A", "B"], &page, &mut list)
                .is_err()
        );
        assert_eq!(spy.anchors().len(), 3);

        let update = spy
            .set_anchors(anchors(&["#b", "#c"]), vec!["B", "C"], &page, &mut list)
            .unwrap();
        assert!(update.activation.is_some());
        assert_eq!(spy.view_state().len(), 2);
        assert_eq!(spy.items(), &["B", "C"]);
    }

    #[test]
    fn set_anchors_same_list_only_swaps_items() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 3);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);
        let update = spy
            .set_anchors(
                anchors(&["#a", "#b", "#c"]),
                vec!["x", "y", "z"],
                &page,
                &mut list,
            )
            .unwrap();
        assert_eq!(update.activation, None);
        assert_eq!(spy.items(), &["x", "y", "z"]);
        assert_eq!(spy.active_index(), Some(0));
    }

    #[test]
    fn detached_container_skips_sync() {
        let page = abc_page();
        let mut list = HeadlessContainer::detached();
        let mut spy = abc_spy();
        let update = spy.mount(&page, &mut list);
        assert_eq!(update.scroll, ScrollAdjustment::None);
        assert_eq!(spy.window(), None);
        assert!(list.writes().is_empty());
    }

    #[test]
    fn container_scroll_recalibrates_window() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(3, 30.0, 1);
        let mut spy = abc_spy();
        let _ = spy.mount(&page, &mut list);
        list.user_scroll_to(60.0);
        assert_eq!(
            spy.on_container_scroll(&list),
            Some(IndexWindow { first: 2, last: 2 })
        );
        assert_eq!(spy.window(), Some(IndexWindow { first: 2, last: 2 }));
    }

    #[test]
    fn container_scroll_with_no_items_is_a_no_op() {
        let mut spy = Scrollspy::<&str, f64>::new(ScrollspyConfig::default(), Vec::new(), Vec::new())
            .unwrap();
        let list = HeadlessContainer::uniform(0, 30.0, 3);
        assert_eq!(spy.on_container_scroll(&list), None);
    }

    #[test]
    fn empty_anchor_list_stays_empty() {
        let page = abc_page();
        let mut list = HeadlessContainer::uniform(0, 30.0, 3);
        let mut spy = Scrollspy::<&str, f64>::new(ScrollspyConfig::default(), Vec::new(), Vec::new())
            .unwrap();
        let update = spy.mount(&page, &mut list);
        assert!(spy.view_state().is_empty());
        assert_eq!(update.scroll, ScrollAdjustment::None);
        assert!(list.writes().is_empty());
    }
}
