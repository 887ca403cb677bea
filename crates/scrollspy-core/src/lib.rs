#![forbid(unsafe_code)]

//! Core: section activation heuristics and navigation list scroll sync.
//!
//! # Role in the workspace
//! `scrollspy-core` is the host-agnostic half of the scrollspy. It owns the
//! tracker state ([`Scrollspy`]), the activation heuristic that maps page
//! geometry to a [`ViewState`], and the index-window scheme that keeps the
//! active navigation item visible inside its own scrollable list.
//!
//! # Primary responsibilities
//! - **Anchors**: validated `#id` section references ([`Anchor`]).
//! - **Activation**: band test, pseudo-active fallback and top-of-page
//!   default ([`view::evaluate`]).
//! - **List sync**: sliding [`IndexWindow`] over approximate item heights.
//! - **Host seams**: the [`Page`] and [`ListContainer`] traits. Anything that
//!   can answer "where is this section" and "how tall is this list" can drive
//!   the tracker; `scrollspy-web` implements them against the DOM and
//!   [`headless`] implements them in memory for tests.
//!
//! # How it fits in the system
//! Hosts own a [`Scrollspy`] and call exactly one entry point per external
//! event (mount, page scroll, list scroll, link click, anchor or route
//! change). Every entry point runs to completion synchronously and returns an
//! [`Update`] describing what changed.

pub mod anchor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod tracker;
pub mod view;
pub mod window;

pub use anchor::Anchor;
pub use config::ScrollspyConfig;
pub use error::ScrollspyError;
pub use geometry::{ListContainer, Page};
pub use tracker::{ClickOutcome, ScrollSuppression, Scrollspy, SectionClick, Update};
pub use view::ViewState;
pub use window::{ContainerMetrics, IndexWindow, ScrollAdjustment};
