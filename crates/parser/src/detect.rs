// ABOUTME: Provider detection: scores each identity's signature patterns against a raw payload.
// ABOUTME: Markers are scanned in one Aho-Corasick pass; field probes walk the payload itself.

//! Provider detection.
//!
//! Every identity owns a fixed list of patterns; a pattern is a list of
//! probes and matches when any one probe fires. Marker probes are literal
//! substrings of the capture's markup, field probes test payload fields for
//! presence. `detect` picks the identity with the strictly highest pattern
//! count, `all_providers` reports each identity's hit ratio, and `validate`
//! checks a payload against one expected identity.

use std::collections::HashSet;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::locate::{is_present, non_empty_str};
use crate::providers::ProviderKind;
use crate::result::Detection;

/// One detection signal.
enum Probe {
    /// Literal substring of the detection HTML.
    Marker(&'static str),
    /// Nested field path that must resolve to a present value, looked up
    /// under `result` first and then at the top level.
    Field(&'static [&'static str]),
}

/// A pattern matches when at least one of its probes fires.
type Pattern = &'static [Probe];

struct ProviderPatterns {
    kind: ProviderKind,
    patterns: &'static [Pattern],
}

/// The pattern library. Iteration order is the tie-break order: when two
/// identities score the same count, the one listed first wins.
static PROVIDER_PATTERNS: [ProviderPatterns; 7] = [
    ProviderPatterns {
        kind: ProviderKind::ChatGpt,
        patterns: &[
            &[
                Probe::Marker("bg-token-bg-primary"),
                Probe::Marker("text-token-text-secondary"),
            ],
            &[Probe::Marker("chatgpt.com"), Probe::Marker("openai.com")],
        ],
    },
    ProviderPatterns {
        kind: ProviderKind::Gemini,
        patterns: &[
            &[Probe::Marker("bard-sidenav"), Probe::Marker("mat-sidenav")],
            &[
                Probe::Marker("gemini.google.com"),
                Probe::Marker("gem-sys-color"),
            ],
        ],
    },
    ProviderPatterns {
        kind: ProviderKind::Perplexity,
        patterns: &[&[Probe::Marker("perplexity.ai"), Probe::Marker("prose")]],
    },
    ProviderPatterns {
        kind: ProviderKind::Copilot,
        patterns: &[&[
            Probe::Marker("copilot.microsoft.com"),
            Probe::Marker(r#"data-testid="sidebar-container""#),
        ]],
    },
    // All three signals live in one pattern: any signal is exactly one hit,
    // so a capture carrying several cannot outscore other identities.
    ProviderPatterns {
        kind: ProviderKind::AiOverview,
        patterns: &[&[
            Probe::Field(&["aioverview", "text"]),
            Probe::Marker("WIZ_global_data"),
            Probe::Marker("DnVkpd"),
        ]],
    },
    ProviderPatterns {
        kind: ProviderKind::AiMode,
        patterns: &[&[
            Probe::Marker("DZ13He"),
            Probe::Marker("wYq63b"),
            Probe::Marker("AI Mode"),
        ]],
    },
    ProviderPatterns {
        kind: ProviderKind::Grok,
        patterns: &[
            &[Probe::Marker("grok.com"), Probe::Marker("x.ai")],
            &[Probe::Marker("max-w-breakout")],
        ],
    },
];

/// Every distinct marker in the library, in first-seen order.
static MARKERS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut markers: Vec<&'static str> = Vec::new();
    for entry in &PROVIDER_PATTERNS {
        for pattern in entry.patterns {
            for probe in *pattern {
                if let Probe::Marker(marker) = probe {
                    if !markers.contains(marker) {
                        markers.push(marker);
                    }
                }
            }
        }
    }
    markers
});

static MARKER_AUTOMATON: Lazy<AhoCorasick> =
    Lazy::new(|| AhoCorasick::new(MARKERS.iter()).unwrap());

/// Identify the provider behind a raw capture payload.
///
/// Counts matched patterns per identity and picks the strictly highest
/// count; ties go to the identity listed first in the library. The
/// winner's confidence is its count over the best count, which pins it to
/// `1.0`. Returns `None` when nothing matches at all.
pub fn detect(response: &Value) -> Option<Detection> {
    let mut winner: Option<(ProviderKind, usize)> = None;
    for (kind, hits, _) in score_patterns(response) {
        if hits == 0 {
            continue;
        }
        match winner {
            Some((_, best)) if hits <= best => {}
            _ => winner = Some((kind, hits)),
        }
    }
    winner.map(|(provider, hits)| Detection {
        provider,
        confidence: hits as f64 / hits.max(1) as f64,
    })
}

/// Report every identity with at least one matched pattern, each scored as
/// matched patterns over that identity's own pattern count, strongest
/// first. Equal scores keep library order.
pub fn all_providers(response: &Value) -> Vec<Detection> {
    let mut detections: Vec<Detection> = score_patterns(response)
        .into_iter()
        .filter(|&(_, hits, _)| hits > 0)
        .map(|(provider, hits, total)| Detection {
            provider,
            confidence: hits as f64 / total as f64,
        })
        .collect();
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    detections
}

/// Whether the payload detects as the expected identity with confidence
/// above 0.5.
pub fn validate(response: &Value, kind: ProviderKind) -> bool {
    match detect(response) {
        Some(detection) => detection.provider == kind && detection.confidence > 0.5,
        None => false,
    }
}

/// Matched-pattern count and pattern total per identity, in library order.
fn score_patterns(response: &Value) -> Vec<(ProviderKind, usize, usize)> {
    let found = found_markers(detection_html(response));
    PROVIDER_PATTERNS
        .iter()
        .map(|entry| {
            let hits = entry
                .patterns
                .iter()
                .filter(|pattern| {
                    pattern
                        .iter()
                        .any(|probe| probe_fires(probe, response, &found))
                })
                .count();
            (entry.kind, hits, entry.patterns.len())
        })
        .collect()
}

fn probe_fires(probe: &Probe, response: &Value, found: &HashSet<&'static str>) -> bool {
    match probe {
        Probe::Marker(marker) => found.contains(marker),
        Probe::Field(path) => field_present(response, path),
    }
}

/// The markup detection scans: a non-empty `result.html`, else a non-empty
/// top-level `html`, else nothing. Bare string payloads never match markers.
fn detection_html(response: &Value) -> &str {
    response
        .get("result")
        .and_then(|result| result.get("html"))
        .and_then(non_empty_str)
        .or_else(|| response.get("html").and_then(non_empty_str))
        .unwrap_or("")
}

/// One automaton pass over the markup, mapped back to marker strings.
fn found_markers(html: &str) -> HashSet<&'static str> {
    let mut found = HashSet::new();
    if html.is_empty() {
        return found;
    }
    for hit in MARKER_AUTOMATON.find_overlapping_iter(html) {
        found.insert(MARKERS[hit.pattern().as_usize()]);
    }
    found
}

fn field_present(response: &Value, path: &[&str]) -> bool {
    if let Some(result) = response.get("result") {
        if path_present(result, path) {
            return true;
        }
    }
    path_present(response, path)
}

fn path_present(root: &Value, path: &[&str]) -> bool {
    let mut cursor = root;
    for key in path {
        match cursor.get(key) {
            Some(next) => cursor = next,
            None => return false,
        }
    }
    is_present(cursor)
}
