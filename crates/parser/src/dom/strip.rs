// ABOUTME: Anchor-based element removal over raw markup.
// ABOUTME: Deletes whole subtrees by tracking open/close depth of the anchored tag name.

//! Structural element removal.
//!
//! Providers describe the chrome they strip (headers, composers, sidebars)
//! as anchors: a tag name plus attribute markers. When an anchor matches an
//! open tag, the engine tracks the nesting depth of that tag name until the
//! balancing close tag and removes the whole byte range. Nested same-name
//! elements therefore stay inside the removed region instead of cutting it
//! short. An element left unclosed by a truncated capture is kept as-is.

use crate::dom::scan::{is_void_tag, AttrIter, Tag, TagScanner};

/// One attribute condition on an anchored tag. Attribute names compare
/// case-insensitively; values are exact.
#[derive(Debug, Clone, Copy)]
pub enum Marker<'a> {
    /// The attribute's whole value equals the given string.
    AttrEquals(&'a str, &'a str),
    /// The attribute's value contains the given substring.
    AttrContains(&'a str, &'a str),
}

impl Marker<'_> {
    fn matches(&self, attrs: &str) -> bool {
        match self {
            Marker::AttrEquals(name, want) => {
                AttrIter::new(attrs).any(|(k, v)| k.eq_ignore_ascii_case(name) && v == *want)
            }
            Marker::AttrContains(name, want) => {
                AttrIter::new(attrs).any(|(k, v)| k.eq_ignore_ascii_case(name) && v.contains(want))
            }
        }
    }
}

/// An element to remove: a tag name plus attribute markers that must all
/// match. An empty marker list matches every element with that tag name.
#[derive(Debug, Clone, Copy)]
pub struct Anchor<'a> {
    pub tag: &'a str,
    pub markers: &'a [Marker<'a>],
}

impl Anchor<'_> {
    fn matches(&self, tag: &Tag<'_>) -> bool {
        tag.name.eq_ignore_ascii_case(self.tag)
            && self.markers.iter().all(|marker| marker.matches(tag.attrs))
    }
}

/// Remove every element matching any of the anchors, subtree included.
pub fn strip_elements(html: &str, anchors: &[Anchor<'_>]) -> String {
    if html.is_empty() || anchors.is_empty() {
        return html.to_string();
    }
    let mut removals: Vec<(usize, usize)> = Vec::new();
    let mut scanner = TagScanner::new(html);
    'scan: while let Some(tag) = scanner.next() {
        if tag.closing || !anchors.iter().any(|anchor| anchor.matches(&tag)) {
            continue;
        }
        if tag.self_closing || is_void_tag(tag.name) {
            removals.push((tag.start, tag.end));
            continue;
        }
        let mut depth = 1usize;
        for inner in scanner.by_ref() {
            if !inner.name.eq_ignore_ascii_case(tag.name) {
                continue;
            }
            if inner.closing {
                depth -= 1;
                if depth == 0 {
                    removals.push((tag.start, inner.end));
                    continue 'scan;
                }
            } else if !inner.self_closing && !is_void_tag(inner.name) {
                depth += 1;
            }
        }
        // the capture ends before this element closes; keep it
        break;
    }
    if removals.is_empty() {
        return html.to_string();
    }
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for (start, end) in removals {
        out.push_str(&html[cursor..start]);
        cursor = end;
    }
    out.push_str(&html[cursor..]);
    out
}
