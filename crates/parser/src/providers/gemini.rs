// ABOUTME: Gemini provider: custom-element chrome removal and the aioverview summary override.
// ABOUTME: Dark by default; inversion injects a light-theme override stylesheet.

//! The Gemini provider.
//!
//! Gemini renders with Angular custom elements, so most chrome anchors are
//! whole custom tags (`top-bar-actions`, `input-container`, `bard-sidenav`)
//! rather than classed divs. Extraction honors the `aioverview` summary
//! object some captures carry: its text overrides the located text and its
//! sources ride along as first-class citations.

use serde_json::{Map, Value};

use crate::dom::{strip_elements, Anchor, Marker};
use crate::error::ParseError;
use crate::locate::{locate, non_empty_str, unwrap_result};
use crate::options::ParseOptions;
use crate::providers::{resolve_flag, wants_inversion, Provider, ProviderKind};
use crate::result::{meta, ContentExtraction, ParsedResponse};
use crate::sanitize::{self, StyleOptions};

const HEADER_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "boqOnegoogleliteOgbOneGoogleBar")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "side-nav-menu-button")],
    },
    Anchor {
        tag: "top-bar-actions",
        markers: &[],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "desktop-ogb-buffer")],
    },
];

const FOOTER_ANCHORS: &[Anchor<'static>] = &[Anchor {
    tag: "input-container",
    markers: &[],
}];

const SIDEBAR_ANCHORS: &[Anchor<'static>] = &[Anchor {
    tag: "bard-sidenav",
    markers: &[],
}];

/// Light-theme override applied when the caller asks for the opposite of
/// Gemini's dark default. Backgrounds go white, text near-black, and the
/// composer gradient overlay is neutralized.
const LIGHT_THEME_CSS: &str = "\
html{color-scheme:light !important}\
html,body,main{background-color:#ffffff !important}\
html,body,main,article,div,span,p,h1,h2,h3,h4,h5,h6,li,a,button,strong,label,textarea{color:#1A1A1A !important}\
.user-query-bubble-with-background,.user-query-container,.query-text,.query-text-line{background-color:#F4F4F4 !important;color:#1A1A1A !important}\
.model-response-text,.response-container,.response-container-content,.response-content{background-color:#ffffff !important;color:#1A1A1A !important}\
input-area-v2,.input-area,.input-area-container,.text-input-field,.text-input-field_textarea-wrapper,.text-input-field-main-area,.text-input-field_textarea-inner,.text-input-field_textarea,.ql-editor,.textarea,.input-buttons-wrapper-bottom{background-color:#ffffff !important;color:#1A1A1A !important;border-color:#E5E5E5 !important}\
input-container,.input-gradient{background:transparent !important}\
input-container::before,.input-gradient::before{background:linear-gradient(transparent,#ffffff) !important;content:none !important}\
.ql-editor::before,.textarea::placeholder{color:#666666 !important}\
button,[role=\"button\"]{background-color:#F4F4F4 !important;color:#1A1A1A !important;border-color:#E5E5E5 !important}\
a{color:#1a73e8 !important}\
pre,code,[class*=\"code\"]{background-color:#f5f5f5 !important;color:#1A1A1A !important;border-color:#E5E5E5 !important}\
table,td,th{background-color:#ffffff !important;border-color:#E5E5E5 !important;color:#1A1A1A !important}\
[class*=\"border\"],hr{border-color:#E5E5E5 !important}\
[class*=\"card\"],[class*=\"container\"]{background-color:#ffffff !important;border-color:#E5E5E5 !important}";

/// Provider for gemini.google.com captures.
#[derive(Debug, Default)]
pub struct GeminiProvider;

impl Provider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn origin_base_url(&self) -> &str {
        "https://gemini.google.com"
    }

    /// Standard location plus the `aioverview` summary override: its text
    /// replaces located text, its sources become the citation list.
    fn extract_content(&self, response: &Value) -> ContentExtraction {
        let mut extraction = locate(response);
        let mut sources = Vec::new();
        if let Value::Object(map) = unwrap_result(response) {
            if let Some(summary) = map.get("aioverview") {
                if let Some(text) = summary.get("text").and_then(non_empty_str) {
                    extraction.text = Some(text.to_string());
                }
                if let Some(Value::Array(items)) = summary.get("sources") {
                    sources = items.clone();
                }
            }
        }
        extraction.sources = Some(sources);
        extraction
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
        let sources = extraction.sources.unwrap_or_default();
        let mut html = extraction.html.unwrap_or_default();

        let remove_header = resolve_flag(options.remove_header, false);
        let remove_footer = resolve_flag(options.remove_footer, false);
        let invert = wants_inversion(self.kind().default_theme(), options);

        let mut header_removed = false;
        let mut footer_removed = false;
        let mut sidebar_removed = false;
        let mut links_removed = false;
        let mut colors_inverted = false;

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
            let css = if invert {
                colors_inverted = true;
                LIGHT_THEME_CSS.to_string()
            } else {
                String::new()
            };
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
        metadata.insert(
            meta::COLORS_INVERTED.to_string(),
            Value::Bool(colors_inverted),
        );

        Ok(ParsedResponse {
            provider: ProviderKind::Gemini,
            html,
            text: Some(text),
            sources: Some(sources),
            metadata,
        })
    }
}
