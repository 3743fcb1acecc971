// ABOUTME: Copilot provider: testid-anchored chrome removal plus the always-on cookie banner sweep.
// ABOUTME: Dark by default; inversion injects a light-theme override stylesheet.

//! The Copilot provider.
//!
//! Copilot chrome is anchored by `data-testid` attributes where the page
//! provides them and by Tailwind utility-class fragments elsewhere. The
//! cookie-consent banner is removed unconditionally; a capture never wants
//! it, and the removal is recorded as its own metadata flag.

use serde_json::{Map, Value};

use crate::dom::{strip_elements, Anchor, Marker};
use crate::error::ParseError;
use crate::locate::locate;
use crate::options::ParseOptions;
use crate::providers::{resolve_flag, wants_inversion, Provider, ProviderKind};
use crate::result::{meta, ContentExtraction, ParsedResponse};
use crate::sanitize::{self, StyleOptions};

const COOKIE_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("id", "cookie-banner")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "max-w-cookie-banner")],
    },
];

const HEADER_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("data-testid", "backstage-chats")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrEquals("data-testid", "settings-wrapper")],
    },
    Anchor {
        tag: "span",
        markers: &[Marker::AttrEquals("data-testid", "date-divider")],
    },
];

const FOOTER_ANCHORS: &[Anchor<'static>] = &[
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "absolute bottom-0 w-full")],
    },
    Anchor {
        tag: "div",
        markers: &[Marker::AttrContains("class", "mt-[var(--composer-container-height)]")],
    },
    Anchor {
        tag: "button",
        markers: &[Marker::AttrEquals("data-testid", "scroll-to-bottom-button")],
    },
];

const SIDEBAR_ANCHORS: &[Anchor<'static>] = &[Anchor {
    tag: "div",
    markers: &[Marker::AttrContains("class", "max-md:bg-sidebar-light")],
}];

/// Light-theme override applied when the caller asks for the opposite of
/// Copilot's dark default. Dark-mode Tailwind variants are matched through
/// `[class*=...]` selectors since the literal class names carry escapes.
const LIGHT_THEME_CSS: &str = "\
html{color-scheme:light !important}\
html,body,main{background-color:#ffffff !important}\
html,body,main,article,div,span,p,h1,h2,h3,h4,h5,h6,li,a,button,strong,label,textarea{color:#1A1A1A !important}\
[class*=\"bg-accent-250\"]{background-color:#F4F4F4 !important;color:#1A1A1A !important}\
[class*=\"dark:bg-accent\"]{background-color:#F4F4F4 !important}\
[class*=\"ai-message\"]{background-color:#ffffff !important;color:#1A1A1A !important}\
[class*=\"bg-sidebar-dark\"]{background-color:#ffffff !important}\
[class*=\"composer\"],[class*=\"bottom-0\"]{background-color:#ffffff !important;border-color:#E5E5E5 !important}\
textarea{background-color:#F4F4F4 !important;color:#1A1A1A !important}\
textarea::placeholder{color:#666666 !important}\
[class*=\"dark:bg-background\"],[class*=\"dark:bg-black\"],[class*=\"dark:bg-muted\"]{background-color:#F4F4F4 !important}\
.bg-transparent{background-color:transparent !important}\
[class*=\"dark:border-black\"]{border-color:#E5E5E5 !important}\
[class*=\"border-transparent\"]{border-color:transparent !important}\
[class*=\"dark:fill\"]{fill:#1A1A1A !important}\
a{color:#1a73e8 !important}\
[class*=\"dark:text-accent\"]{color:#1a73e8 !important}\
pre,code,[class*=\"code\"]{background-color:#f5f5f5 !important;color:#1A1A1A !important;border-color:#E5E5E5 !important}\
table,td,th{background-color:#ffffff !important;border-color:#E5E5E5 !important;color:#1A1A1A !important}\
[class*=\"dark:border-stroke\"]{border-color:#E5E5E5 !important}\
[class*=\"border\"],hr{border-color:#E5E5E5 !important}\
[class*=\"text-foreground\"]{color:#1A1A1A !important}\
[class*=\"bg-background-1\"],[class*=\"bg-background-2\"],[class*=\"bg-white\\/\"]{background-color:#ffffff !important}\
[class*=\"bg-background-3\"],[class*=\"bg-background-8\"],[class*=\"bg-accent-1\"],[class*=\"bg-accent-2\"],[class*=\"dark:bg-white/5\"]{background-color:#F4F4F4 !important}\
[class*=\"text-foreground-750\"]{color:#1A1A1A !important}\
[class*=\"before:from-sidebar\"],[class*=\"before:to-sidebar\"],[class*=\"before:bg-gradient\"],[class*=\"before:from-transparent\"],[class*=\"before:to-\"],[class*=\"before:opacity\"]{background:linear-gradient(transparent,rgba(255,255,255,0.9)) !important}\
[class*=\"before:border-black\"],[class*=\"after:border-white\"]{border-color:#E5E5E5 !important}\
::before,::after{background-color:transparent !important;border-color:#E5E5E5 !important}\
[data-testid=\"scroll-to-bottom-button\"]{background-color:transparent !important}";

/// Provider for copilot.microsoft.com captures.
#[derive(Debug, Default)]
pub struct CopilotProvider;

impl Provider for CopilotProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Copilot
    }

    fn origin_base_url(&self) -> &str {
        "https://copilot.microsoft.com"
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
        let invert = wants_inversion(self.kind().default_theme(), options);

        let mut cookie_banner_removed = false;
        let mut header_removed = false;
        let mut footer_removed = false;
        let mut sidebar_removed = false;
        let mut links_removed = false;
        let mut colors_inverted = false;

        if !html.is_empty() {
            html = sanitize::sanitize_html(&html);
            html = strip_elements(&html, COOKIE_ANCHORS);
            cookie_banner_removed = true;
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
        metadata.insert(
            meta::COOKIE_BANNER_REMOVED.to_string(),
            Value::Bool(cookie_banner_removed),
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
            provider: ProviderKind::Copilot,
            html,
            text: Some(text),
            sources: None,
            metadata,
        })
    }
}
