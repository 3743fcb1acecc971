// ABOUTME: Error types for the Vitrine parser including ErrorCode enum and ParseError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NoContent,
    UnknownProvider,
    ProviderParse,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NoContent => "no content located",
            ErrorCode::UnknownProvider => "unknown provider",
            ErrorCode::ProviderParse => "provider parse failure",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for parse operations.
#[derive(Debug, thiserror::Error)]
pub struct ParseError {
    pub code: ErrorCode,
    pub provider: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vitrine: {} {}: {}", self.op, self.provider, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ParseError {
    /// Create a NoContent error naming the provider whose extraction came up empty.
    pub fn no_content(provider: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NoContent,
            provider: provider.into(),
            op: op.into(),
            source: None,
        }
    }

    /// Create an UnknownProvider error for an identity absent from the registry.
    pub fn unknown_provider(provider: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UnknownProvider,
            provider: provider.into(),
            op: op.into(),
            source: None,
        }
    }

    /// Create a ProviderParse error wrapping an underlying failure.
    pub fn provider_parse(
        provider: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::ProviderParse,
            provider: provider.into(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is a NoContent error.
    pub fn is_no_content(&self) -> bool {
        self.code == ErrorCode::NoContent
    }

    /// Returns true if this is an UnknownProvider error.
    pub fn is_unknown_provider(&self) -> bool {
        self.code == ErrorCode::UnknownProvider
    }

    /// Returns true if this is a ProviderParse error.
    pub fn is_provider_parse(&self) -> bool {
        self.code == ErrorCode::ProviderParse
    }
}
