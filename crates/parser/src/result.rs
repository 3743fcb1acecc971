// ABOUTME: Result types produced by the pipeline: ContentExtraction, Detection, and ParsedResponse.
// ABOUTME: Also defines the documented metadata key vocabulary shared by all providers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::providers::ProviderKind;

/// Documented metadata keys. Providers may add keys beyond these; only
/// `isFullDocument` is populated by every provider.
pub mod meta {
    pub const IS_FULL_DOCUMENT: &str = "isFullDocument";
    pub const HEADER_REMOVED: &str = "headerRemoved";
    pub const FOOTER_REMOVED: &str = "footerRemoved";
    pub const SIDEBAR_REMOVED: &str = "sidebarRemoved";
    pub const LINKS_REMOVED: &str = "linksRemoved";
    pub const COLORS_INVERTED: &str = "colorsInverted";
    pub const COOKIE_BANNER_REMOVED: &str = "cookieBannerRemoved";
    pub const DETECTION_CONFIDENCE: &str = "detectionConfidence";
    pub const IS_GENERIC: &str = "isGeneric";
}

/// Content located in a raw payload. Produced fresh per extraction call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentExtraction {
    pub html: Option<String>,
    pub text: Option<String>,
    pub sources: Option<Vec<Value>>,
}

impl ContentExtraction {
    /// Returns true if neither html nor text was located.
    pub fn is_empty(&self) -> bool {
        self.html.is_none() && self.text.is_none()
    }
}

/// A provider identity matched against a payload, with a confidence score
/// in (0, 1]. "Nothing matched" is the absence of a Detection, never a
/// zero-confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub provider: ProviderKind,
    pub confidence: f64,
}

/// The normalized result of parsing a captured response.
///
/// Invariant: `html`, when non-empty, has had `<script>` and `<noscript>`
/// blocks stripped. `metadata` reflects transformations that actually ran,
/// not merely what the caller requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedResponse {
    pub provider: ProviderKind,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl ParsedResponse {
    /// Returns true if the result carries neither html nor text.
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.text.as_ref().map_or(true, |t| t.is_empty())
    }

    /// Look up a boolean metadata flag, defaulting to false when absent.
    pub fn flag(&self, key: &str) -> bool {
        self.metadata.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}
