#![forbid(unsafe_code)]

//! Browser binding for the scrollspy.
//!
//! This crate provides [`ScrollspyHandle`], a `wasm-bindgen`-exported struct
//! that attaches a [`scrollspy_core::Scrollspy`] to a live navigation list:
//!
//! ```js
//! const spy = new ScrollspyHandle(
//!   document.querySelector("ul.toc"),
//!   JSON.stringify({ anchors: ["#intro", "#install"], config: { headerHeight: 64 } }),
//!   (event) => console.log("navigated", event.target.hash),
//! );
//! router.onChange((path) => spy.setRoute(path));
//! // later
//! spy.destroy();
//! ```
//!
//! The list's element children are the navigation items, one per anchor, in
//! order. Page scroll, list scroll and list click listeners live exactly as
//! long as the handle.

pub mod link;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::ScrollspyHandle;

pub use link::same_document_hash;
pub use options::{Options, OptionsError, parse_anchor_list, parse_options};
