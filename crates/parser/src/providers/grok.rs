// ABOUTME: Grok provider: utility-class CSS hiding and filter-based color inversion.
// ABOUTME: The one provider whose light theme is a hue-rotation filter, not a rule bundle.

//! The Grok provider.
//!
//! Grok's chrome carries no stable ids or testids, only rotating Tailwind
//! utility stacks, so header and footer are hidden with attribute-substring
//! CSS instead of structural removal. Inversion follows the same spirit:
//! rather than enumerating selectors for a page with none, the whole root
//! is inverted with a filter and media elements are double-inverted back to
//! their true colors.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::locate::locate;
use crate::options::ParseOptions;
use crate::providers::{resolve_flag, wants_inversion, Provider, ProviderKind};
use crate::result::{meta, ContentExtraction, ParsedResponse};
use crate::sanitize::{self, StyleOptions};

const HEADER_HIDE_CSS: &str = "div[class*=\"h-16\"][class*=\"top-0\"][class*=\"z-10\"],\
div[class*=\"absolute\"][class*=\"inset-x-0\"][class*=\"top-0\"]{display:none !important}";

const FOOTER_HIDE_CSS: &str = "div[class*=\"absolute\"][class*=\"inset-x-0\"]\
[class*=\"bottom-0\"][class*=\"max-w-breakout\"],\
div[class*=\"absolute\"][class*=\"bottom-0\"][class*=\"w-full\"]{display:none !important}";

/// Whole-page inversion with media elements inverted a second time so
/// photos and embeds keep their real colors.
const INVERT_FILTER_CSS: &str = "\
html{filter:invert(1) hue-rotate(180deg)}\
img,video,picture,canvas,iframe,embed,object,svg{filter:invert(1) hue-rotate(180deg)}";

/// Provider for grok.com captures.
#[derive(Debug, Default)]
pub struct GrokProvider;

impl Provider for GrokProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Grok
    }

    fn origin_base_url(&self) -> &str {
        "https://grok.com"
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

        let mut header_removed = false;
        let mut footer_removed = false;
        let mut links_removed = false;
        let mut colors_inverted = false;

        if !html.is_empty() {
            html = sanitize::sanitize_html(&html);
            if options.remove_links {
                html = sanitize::remove_links(&html);
                links_removed = true;
            }
            let mut css = String::new();
            if remove_header {
                css.push_str(HEADER_HIDE_CSS);
                header_removed = true;
            }
            if remove_footer {
                css.push_str(FOOTER_HIDE_CSS);
                footer_removed = true;
            }
            if invert {
                css.push_str(INVERT_FILTER_CSS);
                colors_inverted = true;
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
        metadata.insert(meta::LINKS_REMOVED.to_string(), Value::Bool(links_removed));
        metadata.insert(meta::HEADER_REMOVED.to_string(), Value::Bool(header_removed));
        metadata.insert(meta::FOOTER_REMOVED.to_string(), Value::Bool(footer_removed));
        metadata.insert(
            meta::COLORS_INVERTED.to_string(),
            Value::Bool(colors_inverted),
        );

        Ok(ParsedResponse {
            provider: ProviderKind::Grok,
            html,
            text: Some(text),
            sources: None,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> Value {
        json!({
            "result": {
                "html": "<html><head></head><body>\
                         <div class=\"h-16 sticky top-0 z-10\">bar</div>\
                         <main class=\"max-w-breakout\"><p>grok answer</p></main>\
                         </body></html>"
            }
        })
    }

    #[test]
    fn test_hiding_is_css_not_structural() {
        let options = ParseOptions {
            remove_header: Some(true),
            remove_footer: Some(true),
            ..Default::default()
        };
        let parsed = GrokProvider.parse(&fixture(), &options).unwrap();
        // The markup keeps the chrome; the stylesheet hides it.
        assert!(parsed.html.contains("h-16 sticky top-0 z-10"));
        assert!(parsed.html.contains("[class*=\"max-w-breakout\"]"));
        assert!(parsed.html.contains("display:none !important"));
        assert!(parsed.flag(meta::HEADER_REMOVED));
        assert!(parsed.flag(meta::FOOTER_REMOVED));
    }

    #[test]
    fn test_defaults_inject_no_hiding() {
        let parsed = GrokProvider
            .parse(&fixture(), &ParseOptions::default())
            .unwrap();
        assert!(!parsed.html.contains("display:none"));
        assert!(!parsed.flag(meta::HEADER_REMOVED));
    }

    #[test]
    fn test_filter_inversion() {
        let options = ParseOptions {
            invert_colors: true,
            ..Default::default()
        };
        let parsed = GrokProvider.parse(&fixture(), &options).unwrap();
        assert!(parsed
            .html
            .contains("html{filter:invert(1) hue-rotate(180deg)}"));
        assert!(parsed.html.contains("img,video"));
        assert!(parsed.flag(meta::COLORS_INVERTED));
    }

    #[test]
    fn test_light_theme_request_inverts_dark_default() {
        let options = ParseOptions {
            theme: Some(crate::options::Theme::Light),
            ..Default::default()
        };
        let parsed = GrokProvider.parse(&fixture(), &options).unwrap();
        assert!(parsed.flag(meta::COLORS_INVERTED));
    }

    #[test]
    fn test_base_tag_points_at_origin() {
        let parsed = GrokProvider
            .parse(&fixture(), &ParseOptions::default())
            .unwrap();
        assert!(parsed.html.contains("<base href=\"https://grok.com/\">"));
    }

    #[test]
    fn test_no_sidebar_flag_in_metadata() {
        let parsed = GrokProvider
            .parse(&fixture(), &ParseOptions::default())
            .unwrap();
        assert!(!parsed.metadata.contains_key(meta::SIDEBAR_REMOVED));
    }
}
