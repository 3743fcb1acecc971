// ABOUTME: Configuration options for parsing including ParseOptions and the Theme enum.
// ABOUTME: Providers honor only the subset relevant to them; unknown concerns are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rendering theme requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for Theme {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Configuration options for a parse call.
///
/// `remove_header` and `remove_footer` are tri-state: `None` defers to the
/// provider's own default (some providers strip chrome by default for a
/// clean view, others leave it in place).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    pub remove_links: bool,
    pub remove_header: Option<bool>,
    pub remove_footer: Option<bool>,
    pub remove_sidebar: bool,
    pub invert_colors: bool,
    pub theme: Option<Theme>,
    pub base_url: Option<String>,
    pub sanitize: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            remove_links: false,
            remove_header: None,
            remove_footer: None,
            remove_sidebar: false,
            invert_colors: false,
            theme: None,
            base_url: None,
            sanitize: true,
        }
    }
}

impl ParseOptions {
    /// Create options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }
}
