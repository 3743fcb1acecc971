// ABOUTME: End-to-end pipeline tests running raw capture payloads through detection and dispatch.
// ABOUTME: Covers every provider identity, the generic fallback, and the forced-provider path.

use serde_json::{json, Value};
use vitrine_parser::{meta, ParseOptions, Parser, ProviderKind, Theme};

/// A capture envelope the way the browser extension writes them.
fn capture(html: &str) -> Value {
    json!({ "result": { "html": html } })
}

fn chatgpt_capture() -> Value {
    capture(
        "<html><head><title>ChatGPT</title></head><body>\
         <header id=\"page-header\">top nav</header>\
         <main class=\"bg-token-bg-primary\">\
         <p>The answer is <a href=\"https://a.example/\">sourced</a>.</p>\
         </main>\
         <div id=\"thread-bottom\">composer</div>\
         </body></html>",
    )
}

#[test]
fn chatgpt_capture_full_cleanup() {
    let parser = Parser::new();
    let mut options = ParseOptions::default();
    options.remove_header = Some(true);
    options.remove_footer = Some(true);
    options.remove_links = true;

    let parsed = parser
        .parse(&chatgpt_capture(), &options)
        .expect("chatgpt capture should parse");

    assert_eq!(parsed.provider, ProviderKind::ChatGpt);
    assert!(
        !parsed.html.contains("page-header"),
        "header chrome should be removed: {}",
        parsed.html
    );
    assert!(
        !parsed.html.contains("composer"),
        "composer bar should be removed: {}",
        parsed.html
    );
    assert!(parsed.html.contains("<span>sourced</span>"));
    assert!(!parsed.html.contains("<a "));
    assert!(parsed.html.contains("<base href=\"https://chatgpt.com/\""));

    assert!(parsed.flag(meta::IS_FULL_DOCUMENT));
    assert!(parsed.flag(meta::HEADER_REMOVED));
    assert!(parsed.flag(meta::FOOTER_REMOVED));
    assert!(!parsed.flag(meta::SIDEBAR_REMOVED));
    assert!(parsed.flag(meta::LINKS_REMOVED));
    assert_eq!(
        parsed.metadata.get(meta::DETECTION_CONFIDENCE),
        Some(&json!(1.0))
    );
}

#[test]
fn chatgpt_defaults_keep_chrome() {
    let parser = Parser::new();
    let parsed = parser
        .parse(&chatgpt_capture(), &ParseOptions::default())
        .expect("chatgpt capture should parse");

    assert!(parsed.html.contains("page-header"));
    assert!(parsed.html.contains("composer"));
    assert!(parsed.html.contains("<a "));
    assert!(!parsed.flag(meta::HEADER_REMOVED));
    assert!(!parsed.flag(meta::LINKS_REMOVED));
}

#[test]
fn gemini_theme_inversion_and_sources() {
    let parser = Parser::new();
    let payload = json!({
        "result": {
            "html": "<html><head></head><body>\
                     <bard-sidenav>history</bard-sidenav>\
                     <main>the answer</main>\
                     </body></html>",
            "aioverview": { "sources": [{ "url": "https://cite.example/" }] }
        }
    });
    let mut options = ParseOptions::default();
    options.theme = Some(Theme::Light);

    let parsed = parser
        .parse(&payload, &options)
        .expect("gemini capture should parse");

    assert_eq!(parsed.provider, ProviderKind::Gemini);
    assert!(parsed.flag(meta::COLORS_INVERTED));
    assert!(
        parsed.html.contains("<style>"),
        "light theme stylesheet should be injected: {}",
        parsed.html
    );
    assert!(parsed
        .html
        .contains("<base href=\"https://gemini.google.com/\""));
    // Sidebar removal is opt-in; the element survives default options.
    assert!(parsed.html.contains("bard-sidenav"));
    assert_eq!(
        parsed.sources,
        Some(vec![json!({ "url": "https://cite.example/" })])
    );
}

#[test]
fn gemini_dark_theme_request_is_a_no_op() {
    let parser = Parser::new();
    let payload = capture("<html><head></head><body><bard-sidenav>n</bard-sidenav><p>a</p></body></html>");
    let mut options = ParseOptions::default();
    options.theme = Some(Theme::Dark);

    let parsed = parser
        .parse(&payload, &options)
        .expect("gemini capture should parse");
    assert!(!parsed.flag(meta::COLORS_INVERTED));
    assert!(!parsed.html.contains("<style>"));
}

#[test]
fn perplexity_collapses_citation_links() {
    let parser = Parser::new();
    let payload = capture(
        "<div class=\"prose\"><p>Answer [<a href=\"https://s.example/\">1</a>]</p></div>",
    );
    let mut options = ParseOptions::default();
    options.remove_links = true;

    let parsed = parser
        .parse(&payload, &options)
        .expect("perplexity capture should parse");

    assert_eq!(parsed.provider, ProviderKind::Perplexity);
    assert!(parsed.html.contains("Answer [1]"));
    assert!(!parsed.html.contains("<a "));
    assert!(parsed.flag(meta::LINKS_REMOVED));
    assert!(
        !parsed.metadata.contains_key(meta::SIDEBAR_REMOVED),
        "perplexity reports no sidebar flag"
    );
}

#[test]
fn copilot_cookie_banner_always_removed() {
    let parser = Parser::new();
    let payload = capture(
        "<div id=\"cookie-banner\">consent prompt</div>\
         <div data-testid=\"sidebar-container\"><p>the chat</p></div>",
    );

    let parsed = parser
        .parse(&payload, &ParseOptions::default())
        .expect("copilot capture should parse");

    assert_eq!(parsed.provider, ProviderKind::Copilot);
    assert!(
        !parsed.html.contains("consent prompt"),
        "cookie banner survives: {}",
        parsed.html
    );
    assert!(parsed.html.contains("the chat"));
    assert!(parsed.flag(meta::COOKIE_BANNER_REMOVED));
    assert!(!parsed.flag(meta::COLORS_INVERTED));
}

#[test]
fn ai_overview_decodes_embedded_blob() {
    let parser = Parser::new();
    // The summary text only exists inside a script payload; scripts are
    // stripped, so the pipeline has to fall back to the blob.
    let payload = capture(
        "<script>AF_initDataCallback({\"DnVkpd\":\"Answer line one\\nline two\"});</script>",
    );

    let parsed = parser
        .parse(&payload, &ParseOptions::default())
        .expect("ai overview capture should parse");

    assert_eq!(parsed.provider, ProviderKind::AiOverview);
    assert_eq!(parsed.html, "Answer line one<br>line two");
    assert_eq!(parsed.text, None, "overview results carry no text field");
    assert_eq!(parsed.sources, Some(vec![]));
    assert!(parsed.flag(meta::HEADER_REMOVED), "hiding defaults on");
    assert!(parsed.flag(meta::FOOTER_REMOVED));
    assert_eq!(
        parsed.metadata.get(meta::DETECTION_CONFIDENCE),
        Some(&json!(1.0))
    );
}

#[test]
fn ai_mode_strips_chrome_by_default() {
    let parser = Parser::new();
    let payload = capture(
        "<html><head></head><body>\
         <div class=\"DZ13He\">omnibox chrome</div>\
         <p>AI Mode answer</p>\
         </body></html>",
    );

    let parsed = parser
        .parse(&payload, &ParseOptions::default())
        .expect("ai mode capture should parse");

    assert_eq!(parsed.provider, ProviderKind::AiMode);
    assert!(!parsed.html.contains("omnibox chrome"));
    assert!(parsed.html.contains("AI Mode answer"));
    assert!(parsed.flag(meta::HEADER_REMOVED));
    assert!(parsed.flag(meta::FOOTER_REMOVED));
    // Consent overlay hiding rides along on every styled result.
    assert!(parsed.html.contains("#CXQnmb"));
}

#[test]
fn grok_inverts_with_a_filter_not_markup_edits() {
    let parser = Parser::new();
    let payload = capture(
        "<html><head></head><body>\
         <main class=\"max-w-breakout\"><p>grok answer</p></main>\
         </body></html>",
    );
    let mut options = ParseOptions::default();
    options.invert_colors = true;

    let parsed = parser
        .parse(&payload, &options)
        .expect("grok capture should parse");

    assert_eq!(parsed.provider, ProviderKind::Grok);
    assert!(parsed.html.contains("max-w-breakout"), "markup untouched");
    assert!(parsed
        .html
        .contains("html{filter:invert(1) hue-rotate(180deg)}"));
    assert!(parsed.flag(meta::COLORS_INVERTED));
}

#[test]
fn unrecognized_capture_falls_back_to_generic() {
    let parser = Parser::new();
    let parsed = parser
        .parse(
            &json!({ "result": { "content": "Plain prose answer" } }),
            &ParseOptions::default(),
        )
        .expect("generic capture should parse");

    assert_eq!(parsed.provider, ProviderKind::ChatGpt);
    assert_eq!(parsed.html, "");
    assert_eq!(parsed.text.as_deref(), Some("Plain prose answer"));
    assert!(parsed.flag(meta::IS_GENERIC));
    assert!(
        !parsed.metadata.contains_key(meta::DETECTION_CONFIDENCE),
        "no detection ran, so no confidence to report"
    );
}

#[test]
fn forced_provider_skips_detection() {
    let parser = Parser::new();
    let parsed = parser
        .parse_with_provider(
            &chatgpt_capture(),
            ProviderKind::Perplexity,
            &ParseOptions::default(),
        )
        .expect("forcing a registered provider should not error")
        .expect("payload has markup to parse");

    assert_eq!(parsed.provider, ProviderKind::Perplexity);
    assert!(!parsed.metadata.contains_key(meta::DETECTION_CONFIDENCE));
}

#[test]
fn empty_registry_splits_the_two_entry_points() {
    let parser = Parser::empty();

    // Auto-parse swallows the registry miss.
    assert!(parser
        .parse(&chatgpt_capture(), &ParseOptions::default())
        .is_none());

    // The explicit entry point reports it.
    let err = parser
        .parse_with_provider(
            &chatgpt_capture(),
            ProviderKind::ChatGpt,
            &ParseOptions::default(),
        )
        .unwrap_err();
    assert!(err.is_unknown_provider());
}

#[test]
fn registry_lists_all_builtin_identities() {
    let parser = Parser::new();
    assert_eq!(parser.supported_providers(), ProviderKind::ALL.to_vec());
}

#[test]
fn parsed_response_wire_shape() {
    let parser = Parser::new();
    let payload = capture(
        "<script>AF_initDataCallback({\"DnVkpd\":\"Summary\"});</script>",
    );
    let parsed = parser
        .parse(&payload, &ParseOptions::default())
        .expect("ai overview capture should parse");

    let value = serde_json::to_value(&parsed).expect("response serializes");
    let object = value.as_object().expect("response is a JSON object");
    assert_eq!(object.get("provider"), Some(&json!("AIOVERVIEW")));
    assert!(object.contains_key("html"));
    assert!(object.contains_key("sources"));
    assert!(object.contains_key("metadata"));
    assert!(!object.contains_key("text"), "absent text is omitted");
}

#[test]
fn wrapped_fragment_is_a_locked_down_document() {
    let parser = Parser::new();
    let parsed = parser
        .parse(
            &capture("<div class=\"prose\"><p>answer</p></div>"),
            &ParseOptions::default(),
        )
        .expect("perplexity capture should parse");

    let page = vitrine_parser::wrap_fragment(&parsed.html);
    assert!(vitrine_parser::sanitize::is_full_document(&page));
    assert!(page.contains("Content-Security-Policy"));
    assert!(page.contains("<p>answer</p>"));
}

#[test]
fn detection_ranking_is_exposed() {
    let parser = Parser::new();
    let payload = capture("<div class=\"prose\">grok.com text</div>");

    let ranked = parser.detect_all_providers(&payload);
    assert!(!ranked.is_empty());
    assert_eq!(ranked[0].provider, ProviderKind::Perplexity);
    assert_eq!(ranked[0].confidence, 1.0);
    assert!(ranked
        .iter()
        .any(|d| d.provider == ProviderKind::Grok && d.confidence < 1.0));
}
