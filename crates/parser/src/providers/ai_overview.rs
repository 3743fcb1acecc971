// ABOUTME: AI Overview provider: CSS-hidden Google chrome and the embedded data-blob decode.
// ABOUTME: Never emits text; citations ride along as first-class sources.

//! The AI Overview provider.
//!
//! Overviews live inside the Google results page, so chrome handling is
//! CSS-hiding with the shared selector bundles and header/footer hiding
//! defaults on. Some captures carry no rendered markup at all, just the
//! page's serialized data blob inside a script tag. When the located HTML
//! has no visible text, the blob is decoded instead: its payload string is
//! JSON-unescaped and the private-use delimiter glyphs are translated into
//! semantic markup. Any decode failure falls back to the original HTML.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::locate::locate_with_sources;
use crate::options::ParseOptions;
use crate::providers::google;
use crate::providers::{resolve_flag, Provider, ProviderKind};
use crate::result::{meta, ContentExtraction, ParsedResponse};
use crate::sanitize::{self, StyleOptions};

// The vendor blob key holds one JSON string literal; the capture keeps its
// escape sequences intact for the unescape step.
static BLOB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""DnVkpd":"((?:\\.|[^"\\])*)""#).unwrap());

/// Private-use glyph the blob uses as a section divider.
const SECTION_GLYPH: char = '\u{e000}';
/// Private-use glyph the blob uses for line breaks and inline images.
const INLINE_GLYPH: char = '\u{e001}';

/// Provider for Google AI Overview captures.
#[derive(Debug, Default)]
pub struct AiOverviewProvider;

impl Provider for AiOverviewProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AiOverview
    }

    fn origin_base_url(&self) -> &str {
        "https://www.google.com"
    }

    fn extract_content(&self, response: &Value) -> ContentExtraction {
        locate_with_sources(response)
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
        let sources = extraction.sources.unwrap_or_default();
        let raw_html = extraction.html.unwrap_or_default();

        let remove_header = resolve_flag(options.remove_header, true);
        let remove_footer = resolve_flag(options.remove_footer, true);

        let mut header_removed = false;
        let mut footer_removed = false;
        let mut sidebar_removed = false;
        let mut links_removed = false;

        let mut html = String::new();
        if !raw_html.is_empty() {
            html = sanitize::sanitize_html(&raw_html);
            if sanitize::visible_text(&html).is_empty() {
                // The blob lives in a script tag, so it is only findable in
                // the pre-sanitize markup.
                if let Some(decoded) = decode_embedded_blob(&raw_html) {
                    // Blob payloads can carry markup of their own.
                    html = sanitize::sanitize_html(&decoded);
                }
            }
            if options.remove_links {
                html = sanitize::remove_links(&html);
                links_removed = true;
            }
            let mut css = String::new();
            if remove_header {
                css.push_str(&google::hide_rule(google::HEADER_SELECTORS));
                header_removed = true;
            }
            if options.remove_sidebar {
                css.push_str(&google::hide_rule(google::SIDEBAR_SELECTORS));
                sidebar_removed = true;
            }
            if remove_footer {
                css.push_str(&google::hide_rule(google::FOOTER_SELECTORS));
                footer_removed = true;
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
            provider: ProviderKind::AiOverview,
            html,
            text: None,
            sources: Some(sources),
            metadata,
        })
    }
}

/// Recover overview markup from the serialized data blob.
///
/// Returns `None` when the blob is absent, fails to unescape, or decodes to
/// nothing but whitespace; the caller keeps whatever markup it had.
fn decode_embedded_blob(html: &str) -> Option<String> {
    let escaped = BLOB_RE.captures(html)?.get(1)?.as_str();
    let decoded: String = serde_json::from_str(&format!("\"{}\"", escaped)).ok()?;
    if decoded.trim().is_empty() {
        return None;
    }
    Some(translate_blob_text(&decoded))
}

fn translate_blob_text(decoded: &str) -> String {
    let mut out = String::with_capacity(decoded.len() + 16);
    let mut rest = decoded;
    while let Some(ch) = rest.chars().next() {
        rest = &rest[ch.len_utf8()..];
        match ch {
            SECTION_GLYPH => out.push_str("<hr>"),
            INLINE_GLYPH => {
                if let Some(url) = leading_image_url(rest) {
                    out.push_str("<img src=\"");
                    out.push_str(url);
                    out.push_str("\">");
                    rest = &rest[url.len()..];
                } else {
                    out.push_str("<br>");
                }
            }
            '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

/// The image URL at the head of `text`, if any; runs to the first character
/// that cannot belong to a URL in the blob encoding.
fn leading_image_url(text: &str) -> Option<&str> {
    if !text.starts_with("http://") && !text.starts_with("https://") {
        return None;
    }
    let end = text
        .find(|c: char| {
            c.is_whitespace() || matches!(c, '"' | '<' | SECTION_GLYPH | INLINE_GLYPH)
        })
        .unwrap_or(text.len());
    Some(&text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rendered_fixture() -> Value {
        json!({
            "result": {
                "html": "<html><head></head><body><div class=\"WaaZC\">\
                         <p>overview body</p></div></body></html>",
                "aioverview": {
                    "sources": [{"url": "https://cited.example"}]
                }
            }
        })
    }

    #[test]
    fn test_header_and_footer_hiding_default_on() {
        let parsed = AiOverviewProvider
            .parse(&rendered_fixture(), &ParseOptions::default())
            .unwrap();
        assert!(parsed.html.contains("#searchform"));
        assert!(parsed.html.contains("footer, #footer"));
        assert!(!parsed.html.contains("#leftnav, #sidetogether{display"));
        assert!(parsed.flag(meta::HEADER_REMOVED));
        assert!(parsed.flag(meta::FOOTER_REMOVED));
        assert!(!parsed.flag(meta::SIDEBAR_REMOVED));
    }

    #[test]
    fn test_keep_flags_suppress_hiding() {
        let options = ParseOptions {
            remove_header: Some(false),
            remove_footer: Some(false),
            ..Default::default()
        };
        let parsed = AiOverviewProvider
            .parse(&rendered_fixture(), &options)
            .unwrap();
        assert!(!parsed.html.contains("#searchform"));
        assert!(!parsed.flag(meta::HEADER_REMOVED));
        assert!(!parsed.flag(meta::FOOTER_REMOVED));
    }

    #[test]
    fn test_no_text_field_and_first_class_sources() {
        let parsed = AiOverviewProvider
            .parse(&rendered_fixture(), &ParseOptions::default())
            .unwrap();
        assert_eq!(parsed.text, None);
        assert_eq!(parsed.sources, Some(vec![json!({"url": "https://cited.example"})]));
    }

    #[test]
    fn test_blob_decode_when_no_visible_text() {
        let response = json!({
            "html": "<html><head></head><body><script>AF_initDataCallback(\
                     {\"DnVkpd\":\"First line\\nsecond\\ue000Heading\\ue001\
                     https://img.example/chart.png tail\\ue001plain\"});\
                     var WIZ_global_data={};</script></body></html>"
        });
        let parsed = AiOverviewProvider
            .parse(
                &response,
                &ParseOptions {
                    remove_header: Some(false),
                    remove_footer: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(
            parsed.html,
            "First line<br>second<hr>Heading\
             <img src=\"https://img.example/chart.png\"> tail<br>plain"
        );
    }

    #[test]
    fn test_blob_script_markup_is_stripped() {
        let response = json!({
            "html": "<html><head></head><body><script>AF_initDataCallback(\
                     {\"DnVkpd\":\"before<script>alert(1)<\\/script> after\"});\
                     </script></body></html>"
        });
        let parsed = AiOverviewProvider
            .parse(
                &response,
                &ParseOptions {
                    remove_header: Some(false),
                    remove_footer: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(parsed.html, "before after");
    }

    #[test]
    fn test_blob_skipped_when_markup_is_visible() {
        let response = json!({
            "html": "<html><head></head><body><p>visible</p>\
                     <script>x={\"DnVkpd\":\"blob text\"};</script></body></html>"
        });
        let parsed = AiOverviewProvider
            .parse(&response, &ParseOptions::default())
            .unwrap();
        assert!(parsed.html.contains("<p>visible</p>"));
        assert!(!parsed.html.contains("blob text"));
    }

    #[test]
    fn test_malformed_blob_falls_back_to_sanitized_html() {
        // Truncated escape sequence: the unescape step fails.
        let response = json!({
            "html": "<html><head></head><body>\
                     <script>x={\"DnVkpd\":\"bad escape \\u00\"};</script></body></html>"
        });
        let parsed = AiOverviewProvider
            .parse(&response, &ParseOptions::default())
            .unwrap();
        assert!(!parsed.html.contains("bad escape"));
        assert!(parsed.html.contains("<body>"));
    }

    #[test]
    fn test_decode_translates_glyphs() {
        assert_eq!(
            translate_blob_text("a\u{e000}b\u{e001}c\nd"),
            "a<hr>b<br>c<br>d"
        );
    }

    #[test]
    fn test_image_url_consumes_until_delimiter() {
        let out = translate_blob_text("\u{e001}https://i.example/a.png\u{e000}next");
        assert_eq!(out, "<img src=\"https://i.example/a.png\"><hr>next");
    }

    #[test]
    fn test_text_only_payload_has_empty_result() {
        let parsed = AiOverviewProvider
            .parse(&json!({"text": "words"}), &ParseOptions::default())
            .unwrap();
        assert_eq!(parsed.html, "");
        assert_eq!(parsed.text, None);
    }

    #[test]
    fn test_empty_payload_is_no_content() {
        let err = AiOverviewProvider
            .parse(&json!({}), &ParseOptions::default())
            .unwrap_err();
        assert!(err.is_no_content());
    }
}
