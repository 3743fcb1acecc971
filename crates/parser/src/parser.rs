// ABOUTME: The dispatcher: a provider registry driven by detection, with a generic fallback.
// ABOUTME: parse() swallows provider failures into None; parse_with_provider surfaces registry misses.

//! Detection-driven dispatch.
//!
//! A [`Parser`] owns one boxed provider per identity. `parse` detects,
//! delegates, and normalizes every failure to `None` so callers embedding
//! results never handle provider-specific errors; failures are still
//! observable on the `tracing` channel. `parse_with_provider` skips
//! detection and, deliberately asymmetric, reports an unregistered
//! identity as an error rather than an empty result.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::detect;
use crate::error::ParseError;
use crate::locate::locate;
use crate::options::ParseOptions;
use crate::providers::{
    AiModeProvider, AiOverviewProvider, ChatGptProvider, CopilotProvider, GeminiProvider,
    GrokProvider, PerplexityProvider, Provider, ProviderKind,
};
use crate::result::{meta, Detection, ParsedResponse};
use crate::sanitize;

/// Identity the generic fallback labels its results with.
const FALLBACK_KIND: ProviderKind = ProviderKind::ChatGpt;

/// Registry of providers plus the dispatch logic.
pub struct Parser {
    providers: BTreeMap<ProviderKind, Box<dyn Provider>>,
}

impl Parser {
    /// A parser with all builtin providers registered.
    pub fn new() -> Self {
        let mut parser = Self::empty();
        parser.register_provider(ProviderKind::ChatGpt, Box::new(ChatGptProvider));
        parser.register_provider(ProviderKind::Gemini, Box::new(GeminiProvider));
        parser.register_provider(ProviderKind::Perplexity, Box::new(PerplexityProvider));
        parser.register_provider(ProviderKind::Copilot, Box::new(CopilotProvider));
        parser.register_provider(ProviderKind::AiOverview, Box::new(AiOverviewProvider));
        parser.register_provider(ProviderKind::AiMode, Box::new(AiModeProvider));
        parser.register_provider(ProviderKind::Grok, Box::new(GrokProvider));
        parser
    }

    /// A parser with an empty registry, for fully custom setups.
    pub fn empty() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }

    /// Parse with auto-detected provider.
    ///
    /// No detection falls back to the generic path; a detected identity
    /// missing from the registry, and any provider failure, yield `None`.
    /// On success the detection confidence is spliced into the metadata.
    pub fn parse(&self, response: &Value, options: &ParseOptions) -> Option<ParsedResponse> {
        let detection = match detect::detect(response) {
            Some(detection) => detection,
            None => return self.parse_generic(response),
        };

        let provider = match self.providers.get(&detection.provider) {
            Some(provider) => provider,
            None => {
                debug!(provider = %detection.provider, "detected provider not registered");
                return None;
            }
        };

        match provider.parse(response, options) {
            Ok(mut parsed) => {
                parsed.metadata.insert(
                    meta::DETECTION_CONFIDENCE.to_string(),
                    Value::from(detection.confidence),
                );
                Some(parsed)
            }
            Err(error) => {
                warn!(provider = %detection.provider, error = %error, "provider parse failed");
                None
            }
        }
    }

    /// Parse with an explicitly chosen provider, skipping detection.
    ///
    /// An unregistered identity is an `UnknownProvider` error; a registered
    /// provider's failure is `Ok(None)`. No confidence is spliced, since
    /// none was computed.
    pub fn parse_with_provider(
        &self,
        response: &Value,
        kind: ProviderKind,
        options: &ParseOptions,
    ) -> Result<Option<ParsedResponse>, ParseError> {
        let provider = self
            .providers
            .get(&kind)
            .ok_or_else(|| ParseError::unknown_provider(kind.as_str(), "parse_with_provider"))?;

        match provider.parse(response, options) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(error) => {
                warn!(provider = %kind, error = %error, "provider parse failed");
                Ok(None)
            }
        }
    }

    /// Detect the provider identity for a response.
    pub fn detect_provider(&self, response: &Value) -> Option<ProviderKind> {
        detect::detect(response).map(|detection| detection.provider)
    }

    /// All candidate identities with confidence scores, best first.
    pub fn detect_all_providers(&self, response: &Value) -> Vec<Detection> {
        detect::all_providers(response)
    }

    /// Insert or overwrite the provider for an identity.
    pub fn register_provider(&mut self, kind: ProviderKind, provider: Box<dyn Provider>) {
        self.providers.insert(kind, provider);
    }

    /// Identities currently registered, in identity order.
    pub fn supported_providers(&self) -> Vec<ProviderKind> {
        self.providers.keys().copied().collect()
    }

    /// Last-resort path for responses no pattern recognizes: locate, strip
    /// scripts, and label with the fallback identity.
    fn parse_generic(&self, response: &Value) -> Option<ParsedResponse> {
        let extraction = locate(response);
        if extraction.is_empty() {
            return None;
        }
        debug!("no provider detected, parsing as generic content");

        let mut html = extraction.html.unwrap_or_default();
        if !html.is_empty() {
            html = sanitize::sanitize_html(&html);
        }

        let mut metadata = Map::new();
        metadata.insert(meta::IS_GENERIC.to_string(), Value::Bool(true));

        Some(ParsedResponse {
            provider: FALLBACK_KIND,
            html,
            text: Some(extraction.text.unwrap_or_default()),
            sources: None,
            metadata,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn chatgpt_payload() -> Value {
        json!({
            "result": {
                "html": "<div class=\"bg-token-bg-primary\"><p>hi</p></div>"
            }
        })
    }

    #[test]
    fn test_parse_detects_and_splices_confidence() {
        let parser = Parser::new();
        let parsed = parser
            .parse(&chatgpt_payload(), &ParseOptions::default())
            .unwrap();
        assert_eq!(parsed.provider, ProviderKind::ChatGpt);
        assert_eq!(
            parsed.metadata.get(meta::DETECTION_CONFIDENCE),
            Some(&json!(1.0))
        );
        assert!(!parsed.flag(meta::IS_GENERIC));
    }

    #[test]
    fn test_parse_generic_fallback() {
        let parser = Parser::new();
        let parsed = parser
            .parse(&json!({"result": {"content": "hello"}}), &ParseOptions::default())
            .unwrap();
        assert_eq!(parsed.provider, ProviderKind::ChatGpt);
        assert_eq!(parsed.html, "");
        assert_eq!(parsed.text.as_deref(), Some("hello"));
        assert!(parsed.flag(meta::IS_GENERIC));
        // The generic path reports nothing else.
        assert_eq!(parsed.metadata.len(), 1);
    }

    #[test]
    fn test_parse_generic_sanitizes_html() {
        let parser = Parser::new();
        let parsed = parser
            .parse(
                &json!({"html": "<p>a</p><script>x()</script>"}),
                &ParseOptions::default(),
            )
            .unwrap();
        assert_eq!(parsed.html, "<p>a</p>");
        assert!(parsed.flag(meta::IS_GENERIC));
    }

    #[test]
    fn test_parse_nothing_extractable_is_none() {
        let parser = Parser::new();
        assert!(parser
            .parse(&json!({"unrelated": true}), &ParseOptions::default())
            .is_none());
    }

    #[test]
    fn test_detected_but_unregistered_is_none_not_generic() {
        let parser = Parser::empty();
        // Detection succeeds, registry lookup fails; the generic path must
        // NOT run for a recognized identity.
        assert!(parser
            .parse(&chatgpt_payload(), &ParseOptions::default())
            .is_none());
    }

    struct FailingProvider;

    impl Provider for FailingProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::ChatGpt
        }
        fn origin_base_url(&self) -> &str {
            "https://chatgpt.com"
        }
        fn extract_content(&self, _response: &Value) -> crate::result::ContentExtraction {
            crate::result::ContentExtraction::default()
        }
        fn parse(
            &self,
            _response: &Value,
            _options: &ParseOptions,
        ) -> Result<ParsedResponse, ParseError> {
            Err(ParseError::provider_parse(
                "CHATGPT",
                "parse",
                Some(anyhow::anyhow!("boom")),
            ))
        }
    }

    #[test]
    fn test_provider_failure_becomes_none() {
        let mut parser = Parser::new();
        parser.register_provider(ProviderKind::ChatGpt, Box::new(FailingProvider));
        assert!(parser
            .parse(&chatgpt_payload(), &ParseOptions::default())
            .is_none());
    }

    #[test]
    fn test_parse_with_provider_unknown_is_error() {
        let parser = Parser::empty();
        let err = parser
            .parse_with_provider(
                &chatgpt_payload(),
                ProviderKind::ChatGpt,
                &ParseOptions::default(),
            )
            .unwrap_err();
        assert!(err.is_unknown_provider());
    }

    #[test]
    fn test_parse_with_provider_failure_is_ok_none() {
        let parser = Parser::new();
        let outcome = parser
            .parse_with_provider(&json!({}), ProviderKind::Gemini, &ParseOptions::default())
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_parse_with_provider_skips_confidence() {
        let parser = Parser::new();
        let parsed = parser
            .parse_with_provider(
                &chatgpt_payload(),
                ProviderKind::ChatGpt,
                &ParseOptions::default(),
            )
            .unwrap()
            .unwrap();
        assert!(!parsed.metadata.contains_key(meta::DETECTION_CONFIDENCE));
    }

    #[test]
    fn test_forced_provider_overrides_detection() {
        let parser = Parser::new();
        let parsed = parser
            .parse_with_provider(
                &chatgpt_payload(),
                ProviderKind::Perplexity,
                &ParseOptions::default(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(parsed.provider, ProviderKind::Perplexity);
    }

    #[test]
    fn test_supported_providers_sorted_and_complete() {
        let parser = Parser::new();
        let kinds = parser.supported_providers();
        assert_eq!(kinds.len(), 7);
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted);
    }

    #[test]
    fn test_register_provider_overwrites() {
        let mut parser = Parser::empty();
        parser.register_provider(ProviderKind::Grok, Box::new(GrokProvider));
        parser.register_provider(ProviderKind::Grok, Box::new(GrokProvider));
        assert_eq!(parser.supported_providers(), vec![ProviderKind::Grok]);
    }

    #[test]
    fn test_detect_provider_delegation() {
        let parser = Parser::new();
        assert_eq!(
            parser.detect_provider(&chatgpt_payload()),
            Some(ProviderKind::ChatGpt)
        );
        assert_eq!(parser.detect_provider(&json!({"html": "<p>x</p>"})), None);
    }
}
