// ABOUTME: Main library entry point for the Vitrine AI-response parser.
// ABOUTME: Re-exports the public API: Parser, ParseOptions, ParsedResponse, ParseError, ProviderKind, Detection.

//! Vitrine - a parser for captured AI-chat responses.
//!
//! This crate identifies which AI front end produced a captured payload,
//! extracts the answer markup from the capture envelope, strips provider
//! chrome and scripts, and normalizes the result into a portable record
//! suitable for archiving or re-rendering.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use vitrine_parser::{ParseOptions, Parser};
//!
//! let parser = Parser::new();
//! let capture = json!({
//!     "result": { "html": "<main class=\"bg-token-bg-primary\"><p>hi</p></main>" }
//! });
//! let mut options = ParseOptions::default();
//! options.remove_links = true;
//! if let Some(parsed) = parser.parse(&capture, &options) {
//!     println!("{}: {}", parsed.provider, parsed.html);
//! }
//! ```

pub mod detect;
pub mod dom;
pub mod error;
pub mod locate;
pub mod options;
pub mod parser;
pub mod providers;
pub mod result;
pub mod sanitize;

pub use crate::error::{ErrorCode, ParseError};
pub use crate::options::{ParseOptions, Theme};
pub use crate::parser::Parser;
pub use crate::providers::{Provider, ProviderKind};
pub use crate::result::{meta, ContentExtraction, Detection, ParsedResponse};
pub use crate::sanitize::{sanitize_html, wrap_fragment, StyleOptions};
