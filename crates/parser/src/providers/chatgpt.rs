// ABOUTME: ChatGPT provider: conversation-page extraction and chrome removal.
// ABOUTME: Also the fallback identity the dispatcher labels generic results with.

//! The ChatGPT provider.
//!
//! Captures come from the chatgpt.com conversation view. Chrome removal is
//! structural: the page header, the `nav` sidebar, and the composer/footer
//! grid areas are all anchored by stable ids or utility-class fragments.

use serde_json::{Map, Value};

use crate::dom::{strip_elements, Anchor, Marker};
use crate::error::ParseError;
use crate::locate::locate;
use crate::options::ParseOptions;
use crate::providers::{resolve_flag, Provider, ProviderKind};
use crate::result::{meta, ContentExtraction, ParsedResponse};
use crate::sanitize::{self, StyleOptions};

const HEADER_ANCHORS: &[Anchor<'static>] = &[Anchor {
    tag: "header",
    markers: &[Marker::AttrEquals("id", "page-header")],
}];

const SIDEBAR_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "nav",
        markers: &[],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "sidebar")],
    },
];

const FOOTER_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("id", "thread-bottom-container")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("id", "thread-bottom")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "[grid-area:leading]")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "[grid-area:footer]")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "[grid-area:trailing]")],
    },
    // Disclaimer bar; targeted by view-transition name, so it survives
    // localization.
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains(
            "class",
            "[view-transition-name:var(--vt-disclaimer)]",
        )],
    },
];

/// Provider for chatgpt.com conversation captures.
#[derive(Debug, Default)]
pub struct ChatGptProvider;

impl Provider for ChatGptProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ChatGpt
    }

    fn origin_base_url(&self) -> &str {
        "https://chatgpt.com"
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

        let remove_header = resolve_flag(options.remove_header, false);
        let remove_footer = resolve_flag(options.remove_footer, false);

        let mut header_removed = false;
        let mut sidebar_removed = false;
        let mut footer_removed = false;
        let mut links_removed = false;

        if !html.is_empty() {
            html = sanitize::sanitize_html(&html);
            if remove_header {
                html = strip_elements(&html, HEADER_ANCHORS);
                header_removed = true;
            }
            if options.remove_sidebar {
                html = strip_elements(&html, SIDEBAR_ANCHORS);
                sidebar_removed = true;
            }
            if remove_footer {
                html = strip_elements(&html, FOOTER_ANCHORS);
                footer_removed = true;
            }
            if options.remove_links {
                html = sanitize::remove_links(&html);
                links_removed = true;
            }
            html = sanitize::inject_styles(
                &html,
                &StyleOptions {
                    css: String::new(),
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
        metadata.insert(
            meta::SIDEBAR_REMOVED.to_string(),
            Value::Bool(sidebar_removed),
        );
        metadata.insert(meta::FOOTER_REMOVED.to_string(), Value::Bool(footer_removed));
        metadata.insert(meta::LINKS_REMOVED.to_string(), Value::Bool(links_removed));

        Ok(ParsedResponse {
            provider: ProviderKind::ChatGpt,
            html,
            text: Some(text),
            sources: None,
            metadata,
        })
    }
}
