// ABOUTME: Provider identity enum, the Provider capability trait, and shared provider helpers.
// ABOUTME: One submodule per supported AI-chat front end plus shared Google chrome stylesheets.

//! The provider family.
//!
//! Each supported front end gets one provider implementation wrapping the
//! shared content locator with its own extraction nuances and structural
//! cleanup. Identities form a closed enum; the dispatcher's registry maps
//! each identity to a boxed `Provider` instance and may be extended or
//! overridden at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;
use crate::options::{ParseOptions, Theme};
use crate::result::{ContentExtraction, ParsedResponse};

mod ai_mode;
mod ai_overview;
mod chatgpt;
mod copilot;
mod gemini;
mod google;
mod grok;
mod perplexity;

pub use ai_mode::AiModeProvider;
pub use ai_overview::AiOverviewProvider;
pub use chatgpt::ChatGptProvider;
pub use copilot::CopilotProvider;
pub use gemini::GeminiProvider;
pub use grok::GrokProvider;
pub use perplexity::PerplexityProvider;

/// The closed set of supported provider identities.
///
/// Wire names are the upper-case tokens used in serialized output and
/// accepted by `FromStr`. Declaration order is the detector's tie-break
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProviderKind {
    ChatGpt,
    Gemini,
    Perplexity,
    Copilot,
    AiOverview,
    AiMode,
    Grok,
}

impl ProviderKind {
    /// All identities in declaration order.
    pub const ALL: [ProviderKind; 7] = [
        ProviderKind::ChatGpt,
        ProviderKind::Gemini,
        ProviderKind::Perplexity,
        ProviderKind::Copilot,
        ProviderKind::AiOverview,
        ProviderKind::AiMode,
        ProviderKind::Grok,
    ];

    /// The identity's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::ChatGpt => "CHATGPT",
            ProviderKind::Gemini => "GEMINI",
            ProviderKind::Perplexity => "PERPLEXITY",
            ProviderKind::Copilot => "COPILOT",
            ProviderKind::AiOverview => "AIOVERVIEW",
            ProviderKind::AiMode => "AIMODE",
            ProviderKind::Grok => "GROK",
        }
    }

    /// The theme the origin renders with out of the box. Inversion requests
    /// are interpreted relative to this.
    pub fn default_theme(&self) -> Theme {
        match self {
            ProviderKind::Gemini | ProviderKind::Copilot | ProviderKind::Grok => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CHATGPT" => Ok(ProviderKind::ChatGpt),
            "GEMINI" => Ok(ProviderKind::Gemini),
            "PERPLEXITY" => Ok(ProviderKind::Perplexity),
            "COPILOT" => Ok(ProviderKind::Copilot),
            "AIOVERVIEW" => Ok(ProviderKind::AiOverview),
            "AIMODE" => Ok(ProviderKind::AiMode),
            "GROK" => Ok(ProviderKind::Grok),
            _ => Err(ParseError::unknown_provider(s, "from_str")),
        }
    }
}

/// The capability set every concrete provider satisfies.
///
/// `parse` fails only when neither html nor text could be located; all
/// other cleanup is best-effort on whatever markup is present.
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// The origin injected as the default `<base>` target.
    fn origin_base_url(&self) -> &str;

    /// Locate content in the raw payload, with provider-specific nuances.
    fn extract_content(&self, response: &Value) -> ContentExtraction;

    /// Produce the normalized response.
    fn parse(&self, response: &Value, options: &ParseOptions)
        -> Result<ParsedResponse, ParseError>;
}

/// Resolve a tri-state removal flag against the provider's default.
pub(crate) fn resolve_flag(requested: Option<bool>, default_on: bool) -> bool {
    requested.unwrap_or(default_on)
}

/// Whether options ask for the opposite of the provider's default theme.
///
/// `invert_colors` always inverts; an explicit `theme` inverts exactly when
/// it differs from the origin default.
pub(crate) fn wants_inversion(default: Theme, options: &ParseOptions) -> bool {
    if options.invert_colors {
        return true;
    }
    match options.theme {
        Some(theme) => theme != default,
        None => false,
    }
}
