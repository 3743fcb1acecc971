// ABOUTME: Raw-markup utilities behind the providers' structural cleanup.
// ABOUTME: Hosts the tag scanner and the anchor-based element removal engine.

//! Markup utilities for structural cleanup.
//!
//! Provider captures arrive as serialized markup, not live documents, so
//! cleanup here works directly on the raw text: a small tag scanner walks
//! the markup once and the removal engine deletes whole element subtrees by
//! tracking open/close depth for the anchored tag name.

pub(crate) mod scan;
pub mod strip;

pub use strip::{strip_elements, Anchor, Marker};
