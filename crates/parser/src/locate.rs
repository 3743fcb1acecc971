// ABOUTME: The shared content-location primitive turning raw captured payloads into ContentExtraction.
// ABOUTME: Unwraps one result level, classifies strings as html/text, and walks html/content/text fields.

use serde_json::Value;

use crate::result::ContentExtraction;

/// Locate html/text content in an arbitrary captured payload.
///
/// Never fails; a payload with no recognizable content yields an all-empty
/// extraction. Every provider and the generic fallback go through this one
/// primitive so envelope shapes are interpreted in exactly one place.
pub fn locate(response: &Value) -> ContentExtraction {
    let data = unwrap_result(response);
    let mut extraction = ContentExtraction::default();

    match data {
        Value::String(s) => {
            if s.trim_start().starts_with('<') && s.contains('>') {
                extraction.html = Some(s.clone());
            } else {
                extraction.text = Some(s.clone());
            }
        }
        Value::Object(map) => {
            if let Some(html) = map.get("html").and_then(non_empty_str) {
                extraction.html = Some(html.to_string());
            } else if let Some(content) = map.get("content").and_then(non_empty_str) {
                // Unlike bare strings, a content field needs no '>' to count as html.
                if content.trim_start().starts_with('<') {
                    extraction.html = Some(content.to_string());
                } else {
                    extraction.text = Some(content.to_string());
                }
            } else if let Some(text) = map.get("text").and_then(non_empty_str) {
                extraction.text = Some(text.to_string());
            }
        }
        _ => {}
    }

    extraction
}

/// Locate content and additionally lift a citation list from the payload.
///
/// Sources come from the summary object's `aioverview.sources` when present,
/// otherwise from a top-level `sources` array. The sources field is always
/// populated (empty when nothing was found) so callers that treat citations
/// as first-class get a stable shape.
pub fn locate_with_sources(response: &Value) -> ContentExtraction {
    let mut extraction = locate(response);
    let mut sources = Vec::new();

    if let Value::Object(map) = unwrap_result(response) {
        let lifted = map
            .get("aioverview")
            .and_then(|v| v.get("sources"))
            .filter(|v| is_present(v))
            .or_else(|| map.get("sources").filter(|v| is_present(v)));
        if let Some(Value::Array(items)) = lifted {
            sources = items.clone();
        }
    }

    extraction.sources = Some(sources);
    extraction
}

/// Unwrap exactly one level if the payload carries a populated `result` field.
pub(crate) fn unwrap_result(response: &Value) -> &Value {
    if let Value::Object(map) = response {
        if let Some(result) = map.get("result") {
            if is_present(result) {
                return result;
            }
        }
    }
    response
}

/// Returns the field value as a str iff it is a non-empty string.
pub(crate) fn non_empty_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Loose presence check: null, false, zero, and the empty string all count
/// as absent; arrays and objects (even empty ones) count as present.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
