// ABOUTME: Markup hygiene and presentation helpers shared by every provider.
// ABOUTME: Script stripping, base/style head injection, link rewriting, fragment wrapping.

//! Sanitizing and style injection.
//!
//! Captured markup is rendered in an embedded view, so scripts are always
//! stripped and relative URLs need a `<base>` target pointing back at the
//! provider origin. Providers feed their chrome-hiding and theme CSS
//! through [`inject_styles`]; link handling offers the badge-preserving
//! span rewrite and the collapse variant.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html};
use url::Url;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());
static NOSCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<noscript.*?</noscript>").unwrap());
static FULL_DOCUMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*(?:<html|<!doctype)").unwrap());
static HEAD_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").unwrap());
static HTML_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html(?:\s[^>]*)?>").unwrap());
static BASE_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<base\b").unwrap());
static OPEN_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<a\b([^>]*)>").unwrap());
static CLOSE_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</a>").unwrap());
static ANCHOR_ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").unwrap());
static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const WRAP_PREFIX: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
<meta http-equiv=\"Content-Security-Policy\" content=\"default-src 'none'; script-src 'none'; style-src 'unsafe-inline';\">\
<style>body{margin:0;padding:16px;font-family:system-ui,-apple-system,sans-serif;white-space:pre-wrap;word-wrap:break-word}\
img{max-width:100%;height:auto}body{pointer-events:none;user-select:none}</style></head><body>";
const WRAP_SUFFIX: &str = "</body></html>";

/// Strip `<script>` and `<noscript>` blocks, content included.
pub fn sanitize_html(html: &str) -> String {
    let out = SCRIPT_RE.replace_all(html, "");
    NOSCRIPT_RE.replace_all(&out, "").to_string()
}

/// Whether the markup is a full document rather than a fragment.
pub fn is_full_document(html: &str) -> bool {
    FULL_DOCUMENT_RE.is_match(html)
}

/// Inputs to [`inject_styles`].
#[derive(Debug, Clone, Default)]
pub struct StyleOptions {
    /// CSS appended as a `<style>` block; skipped when empty.
    pub css: String,
    /// Target for the injected `<base>` tag; skipped when missing, invalid,
    /// or the document already carries a base tag.
    pub base_url: Option<String>,
}

/// Insert a `<base>` tag and a `<style>` block into the document head.
///
/// Both go right after the opening `<head>` tag; when the document has an
/// `<html>` tag but no head, one is synthesized. Fragments with neither
/// pass through unchanged. The base insertion runs first, so the style
/// block ends up ahead of it in the head.
pub fn inject_styles(html: &str, options: &StyleOptions) -> String {
    let mut out = html.to_string();
    if let Some(base) = options.base_url.as_deref() {
        if let Ok(url) = Url::parse(base) {
            if !BASE_TAG_RE.is_match(&out) {
                let tag = format!("<base href=\"{}\">", url.as_str());
                if let Some(injected) = insert_in_head(&out, &tag) {
                    out = injected;
                }
            }
        }
    }
    if !options.css.is_empty() {
        let block = format!("<style>{}</style>", options.css);
        if let Some(injected) = insert_in_head(&out, &block) {
            out = injected;
        }
    }
    out
}

fn insert_in_head(html: &str, insert: &str) -> Option<String> {
    if let Some(head) = HEAD_OPEN_RE.find(html) {
        let mut out = String::with_capacity(html.len() + insert.len());
        out.push_str(&html[..head.end()]);
        out.push_str(insert);
        out.push_str(&html[head.end()..]);
        return Some(out);
    }
    if let Some(open) = HTML_OPEN_RE.find(html) {
        let mut out = String::with_capacity(html.len() + insert.len() + 13);
        out.push_str(&html[..open.end()]);
        out.push_str("<head>");
        out.push_str(insert);
        out.push_str("</head>");
        out.push_str(&html[open.end()..]);
        return Some(out);
    }
    None
}

/// Rewrite anchors into inert `<span>` elements.
///
/// Drops the navigation attributes (`href`, `rel`, `target`, `alt`) and
/// keeps the rest, so styling hooks like classes survive.
pub fn remove_links(html: &str) -> String {
    let out = OPEN_ANCHOR_RE.replace_all(html, |caps: &Captures<'_>| {
        let kept = keep_anchor_attrs(&caps[1]);
        if kept.is_empty() {
            "<span>".to_string()
        } else {
            format!("<span {}>", kept)
        }
    });
    CLOSE_ANCHOR_RE.replace_all(&out, "</span>").to_string()
}

/// Replace each anchor element with its inner content only.
pub fn collapse_links(html: &str) -> String {
    ANCHOR_ELEMENT_RE.replace_all(html, "$1").to_string()
}

fn keep_anchor_attrs(attrs: &str) -> String {
    let mut kept = String::new();
    for (name, value) in crate::dom::scan::AttrIter::new(attrs) {
        if ["href", "rel", "target", "alt"]
            .iter()
            .any(|drop| drop.eq_ignore_ascii_case(name))
        {
            continue;
        }
        if !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(name);
        if !value.is_empty() {
            if value.contains('"') {
                kept.push_str(&format!("='{}'", value));
            } else {
                kept.push_str(&format!("=\"{}\"", value));
            }
        }
    }
    kept
}

/// Wrap a fragment in a minimal locked-down document: scripts forbidden by
/// CSP, pointer events and selection disabled.
pub fn wrap_fragment(fragment: &str) -> String {
    let mut out = String::with_capacity(WRAP_PREFIX.len() + fragment.len() + WRAP_SUFFIX.len());
    out.push_str(WRAP_PREFIX);
    out.push_str(fragment);
    out.push_str(WRAP_SUFFIX);
    out
}

/// Text content of the markup with script/style/head subtrees excluded and
/// whitespace collapsed.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    push_visible_text(document.root_element(), &mut raw);
    WHITESPACE_RUN_RE.replace_all(&raw, " ").trim().to_string()
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    if matches!(
        element.value().name(),
        "script" | "style" | "noscript" | "template" | "head"
    ) {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(inner) = ElementRef::wrap(child) {
            push_visible_text(inner, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_strips_scripts_and_noscript() {
        let html = "<p>a</p><SCRIPT src=\"x.js\">var a = 1;\n</SCRIPT><noscript><img src=\"t.gif\"></noscript><p>b</p>";
        assert_eq!(sanitize_html(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_sanitize_spans_newlines() {
        let html = "<script>\nline1\nline2\n</script>x";
        assert_eq!(sanitize_html(html), "x");
    }

    #[test]
    fn test_is_full_document() {
        assert!(is_full_document("<html><body></body></html>"));
        assert!(is_full_document("  <!DOCTYPE html><html></html>"));
        assert!(is_full_document("<HTML lang=\"en\">"));
        assert!(!is_full_document("<div>fragment</div>"));
        assert!(!is_full_document("plain text"));
    }

    #[test]
    fn test_inject_base_into_existing_head() {
        let out = inject_styles(
            "<html><head><title>t</title></head><body></body></html>",
            &StyleOptions {
                css: String::new(),
                base_url: Some("https://chatgpt.com".to_string()),
            },
        );
        assert_eq!(
            out,
            "<html><head><base href=\"https://chatgpt.com/\"><title>t</title></head><body></body></html>"
        );
    }

    #[test]
    fn test_inject_synthesizes_head() {
        let out = inject_styles(
            "<html lang=\"en\"><body>x</body></html>",
            &StyleOptions {
                css: String::new(),
                base_url: Some("https://grok.com".to_string()),
            },
        );
        assert_eq!(
            out,
            "<html lang=\"en\"><head><base href=\"https://grok.com/\"></head><body>x</body></html>"
        );
    }

    #[test]
    fn test_inject_base_is_idempotent() {
        let options = StyleOptions {
            css: String::new(),
            base_url: Some("https://chatgpt.com".to_string()),
        };
        let once = inject_styles("<html><head></head><body></body></html>", &options);
        let twice = inject_styles(&once, &options);
        assert_eq!(twice, once);
        assert_eq!(twice.matches("<base").count(), 1);
    }

    #[test]
    fn test_inject_skips_invalid_base_url() {
        let html = "<html><head></head></html>";
        let out = inject_styles(
            html,
            &StyleOptions {
                css: String::new(),
                base_url: Some("not a url".to_string()),
            },
        );
        assert_eq!(out, html);
    }

    #[test]
    fn test_fragment_passes_through_unchanged() {
        let html = "<div>fragment</div>";
        let out = inject_styles(
            html,
            &StyleOptions {
                css: "body{color:red}".to_string(),
                base_url: Some("https://chatgpt.com".to_string()),
            },
        );
        assert_eq!(out, html);
    }

    #[test]
    fn test_header_element_is_not_a_head() {
        let html = "<header>site</header><p>x</p>";
        let out = inject_styles(
            html,
            &StyleOptions {
                css: "p{margin:0}".to_string(),
                base_url: None,
            },
        );
        assert_eq!(out, html);
    }

    #[test]
    fn test_style_block_precedes_base() {
        let out = inject_styles(
            "<html><head></head><body></body></html>",
            &StyleOptions {
                css: "body{background:#fff}".to_string(),
                base_url: Some("https://gemini.google.com".to_string()),
            },
        );
        let style_at = out.find("<style>").unwrap();
        let base_at = out.find("<base").unwrap();
        assert!(style_at < base_at);
        assert!(out.contains("<style>body{background:#fff}</style>"));
    }

    #[test]
    fn test_remove_links_keeps_styling_attrs() {
        assert_eq!(
            remove_links(r#"<p><a href="x" class="c">t</a></p>"#),
            r#"<p><span class="c">t</span></p>"#
        );
    }

    #[test]
    fn test_remove_links_drops_all_navigation_attrs() {
        assert_eq!(
            remove_links(r#"<a href="u" rel="noopener" target="_blank" data-k="v">t</a>"#),
            r#"<span data-k="v">t</span>"#
        );
    }

    #[test]
    fn test_remove_links_bare_anchor() {
        assert_eq!(remove_links("<a>t</a>"), "<span>t</span>");
    }

    #[test]
    fn test_collapse_links_leaves_inner_content() {
        assert_eq!(
            collapse_links(r#"x <a href="u" class="c">t <b>b</b></a> y"#),
            "x t <b>b</b> y"
        );
    }

    #[test]
    fn test_wrap_fragment_is_locked_down() {
        let out = wrap_fragment("<p>hi</p>");
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("Content-Security-Policy"));
        assert!(out.contains("script-src 'none'"));
        assert!(out.contains("pointer-events:none"));
        assert!(out.contains("<body><p>hi</p></body></html>"));
        assert!(is_full_document(&out));
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let html = "<html><head><style>body{color:red}</style><title>t</title></head>\
                    <body><p>hello</p> <script>var x;</script><p>world</p></body></html>";
        assert_eq!(visible_text(html), "hello world");
    }

    #[test]
    fn test_visible_text_empty_for_script_only_markup() {
        let html = "<html><head></head><body><script>WIZ_global_data = {};</script></body></html>";
        assert_eq!(visible_text(html), "");
    }

    #[test]
    fn test_visible_text_collapses_whitespace() {
        assert_eq!(visible_text("<div>  a\n\n  b\t c </div>"), "a b c");
    }
}
