// ABOUTME: AI Mode provider: anchored removal of the filter bar, input plate, and history panel.
// ABOUTME: Layers the shared Google hiding CSS and an always-on cookie-consent rule on top.

//! The AI Mode provider.
//!
//! AI Mode shares the Google results-page shell with AI Overview but adds
//! its own deeply nested chrome: the filter/header bar, the "mars" input
//! plate, and the history slide-over. Those are removed structurally by
//! anchor (the input plate sits a dozen divs deep, which is exactly what
//! depth tracking is for), with the shared hiding CSS under them as a
//! second layer for chrome that renders after capture.

use serde_json::{Map, Value};

use crate::dom::{strip_elements, Anchor, Marker};
use crate::error::ParseError;
use crate::locate::locate;
use crate::options::ParseOptions;
use crate::providers::google;
use crate::providers::{resolve_flag, Provider, ProviderKind};
use crate::result::{meta, ContentExtraction, ParsedResponse};
use crate::sanitize::{self, StyleOptions};

const HEADER_ANCHORS: &[Anchor<'static>] = &[Anchor {
    tag: "div",
    markers: &[Marker::AttrContains("class", "DZ13He")],
}];

const FOOTER_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("data-xid", "aim-mars-input-plate")],
    },
    // Wrapper fallback for captures where the plate itself is elided.
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("jscontroller", "P5gZDb")],
    },
];

const SIDEBAR_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("aria-label", "AI Mode history")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("jsname", "NlVIob")],
    },
    Anchor {
        tag: "button",
        markers: &[Marker::AttrEquals("aria-label", "Start new search")],
    },
    Anchor {
        tag: "button",
        markers: &[Marker::AttrEquals("aria-label", "AI Mode history")],
    },
];

/// Provider for Google AI Mode captures.
#[derive(Debug, Default)]
pub struct AiModeProvider;

impl Provider for AiModeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AiMode
    }

    fn origin_base_url(&self) -> &str {
        "https://www.google.com"
    }

    fn extract_content(&self, response: &Value) -> ContentExtraction {
        locate(response)
    }

    fn parse(
        &self,
        response: &Value,
        options: &ParseOptions,
    ) -> Result<ParsedResponse, ParseError> {
        let extraction = self.extract_content(response);
        if extraction.is_empty() {
            return Err(ParseError::no_content(self.kind().as_str(), "parse"));
        }
        let text = extraction.text.unwrap_or_default();
        let mut html = extraction.html.unwrap_or_default();

        let remove_header = resolve_flag(options.remove_header, true);
        let remove_footer = resolve_flag(options.remove_footer, true);

        let mut header_removed = false;
        let mut footer_removed = false;
        let mut sidebar_removed = false;
        let mut links_removed = false;

        if !html.is_empty() {
            html = sanitize::sanitize_html(&html);
            if remove_header {
                html = strip_elements(&html, HEADER_ANCHORS);
                header_removed = true;
            }
            if remove_footer {
                html = strip_elements(&html, FOOTER_ANCHORS);
                footer_removed = true;
            }
            if options.remove_sidebar {
                html = strip_elements(&html, SIDEBAR_ANCHORS);
                sidebar_removed = true;
            }
            if options.remove_links {
                html = sanitize::remove_links(&html);
                links_removed = true;
            }
            // Consent overlay hiding is unconditional; the bundles mirror
            // the structural removals for chrome the page re-renders.
            let mut css = google::hide_rule(google::COOKIE_SELECTORS);
            if remove_header {
                css.push_str(&google::hide_rule(google::HEADER_SELECTORS));
            }
            if options.remove_sidebar {
                css.push_str(&google::hide_rule(google::SIDEBAR_SELECTORS));
            }
            if remove_footer {
                css.push_str(&google::hide_rule(google::FOOTER_SELECTORS));
            }
            html = sanitize::inject_styles(
                &html,
                &StyleOptions {
                    css,
                    base_url: Some(
                        options
                            .base_url
                            .clone()
                            .unwrap_or_else(|| self.origin_base_url().to_string()),
                    ),
                },
            );
        }

        let mut metadata = Map::new();
        metadata.insert(
            meta::IS_FULL_DOCUMENT.to_string(),
            Value::Bool(sanitize::is_full_document(&html)),
        );
        metadata.insert(meta::HEADER_REMOVED.to_string(), Value::Bool(header_removed));
        metadata.insert(meta::FOOTER_REMOVED.to_string(), Value::Bool(footer_removed));
        metadata.insert(
            meta::SIDEBAR_REMOVED.to_string(),
            Value::Bool(sidebar_removed),
        );
        metadata.insert(meta::LINKS_REMOVED.to_string(), Value::Bool(links_removed));

        Ok(ParsedResponse {
            provider: ProviderKind::AiMode,
            html,
            text: Some(text),
            sources: None,
            metadata,
        })
    }
}
