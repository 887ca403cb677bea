#![forbid(unsafe_code)]

//! Navigation link classification.
//!
//! A click only counts as section navigation when the link stays on the
//! current document. Links to other paths belong to the host router.

/// The link's hash when it targets a section of the current document.
///
/// `link_pathname` and `page_pathname` are `location.pathname`-style values;
/// `hash` includes its leading `#`.
#[must_use]
pub fn same_document_hash<'a>(
    link_pathname: &str,
    page_pathname: &str,
    hash: &'a str,
) -> Option<&'a str> {
    (!hash.is_empty() && link_pathname == page_pathname).then_some(hash)
}
