// ABOUTME: Perplexity provider: thread-page extraction with collapse-style link removal.
// ABOUTME: No sidebar routine; captures carry the answer column only.

//! The Perplexity provider.
//!
//! The one provider on the collapse link strategy: Perplexity decorates
//! inline citations so heavily that keeping the anchor shells produces
//! visual noise, so anchors are replaced by their inner content outright.

use serde_json::{Map, Value};

use crate::dom::{strip_elements, Anchor, Marker};
use crate::error::ParseError;
use crate::locate::locate;
use crate::options::ParseOptions;
use crate::providers::{resolve_flag, Provider, ProviderKind};
use crate::result::{meta, ContentExtraction, ParsedResponse};
use crate::sanitize::{self, StyleOptions};

const HEADER_ANCHORS: &[Anchor<'static>] = &[Anchor {
    tag: "div",
    markers: &[Marker::AttrContains("class", "@container/header")],
}];

const FOOTER_ANCHORS: &[Anchor<'static>] = &[Anchor {
    tag: "div",
    markers: &[Marker::AttrContains("class", "bottom-safeAreaInsetBottom")],
}];

/// Provider for perplexity.ai thread captures.
#[derive(Debug, Default)]
pub struct PerplexityProvider;

impl Provider for PerplexityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Perplexity
    }

    fn origin_base_url(&self) -> &str {
        "https://www.perplexity.ai"
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
        let mut footer_removed = false;
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
            if options.remove_links {
                html = sanitize::collapse_links(&html);
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
        metadata.insert(meta::LINKS_REMOVED.to_string(), Value::Bool(links_removed));
        metadata.insert(meta::HEADER_REMOVED.to_string(), Value::Bool(header_removed));
        metadata.insert(meta::FOOTER_REMOVED.to_string(), Value::Bool(footer_removed));

        Ok(ParsedResponse {
            provider: ProviderKind::Perplexity,
            html,
            text: Some(text),
            sources: None,
            metadata,
        })
    }
}
