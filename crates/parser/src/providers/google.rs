// ABOUTME: Selector bundles shared by the Google results-page providers (AI Overview, AI Mode).
// ABOUTME: Chrome on these pages is hidden with injected CSS rather than structural removal.

//! Google results-page chrome selectors.
//!
//! Both Google surfaces render inside the regular search results page, whose
//! chrome carries obfuscated class names that rotate rarely but are shared
//! between the two. Hiding via stylesheet keeps the page layout machinery
//! intact where structural removal would leave dangling grid tracks.

/// Search header, app bar, and filter-bar chrome.
pub(super) const HEADER_SELECTORS: &str = "header, #header, #searchform, .sfbg, #appbar, \
div[role=\"navigation\"], #leftnav, #sidetogether, [role=\"banner\"], .Fgvgjc, #hdtb, \
.hdtb-msb, .DZ13He, .wYq63b, .eT9Cje, .bNg8Rb, .S6VXfe, .Lu57id";

/// Left navigation and related-searches rail.
pub(super) const SIDEBAR_SELECTORS: &str = "#leftnav, #sidetogether";

/// Page footer and bottom navigation.
pub(super) const FOOTER_SELECTORS: &str = "footer, #footer, .fbar, .pdp-nav, \
[aria-label=\"Main menu\"], .gb_Td, .gb_L";

/// Cookie-consent overlay shown on uncached captures.
pub(super) const COOKIE_SELECTORS: &str = ".KxvlWc, #CXQnmb";

/// A display-none rule covering the given selector list.
pub(super) fn hide_rule(selectors: &str) -> String {
    format!("{}{{display:none !important}}", selectors)
}
