//! Error types for template loading and directive parsing
//!
//! Directive errors are recoverable: callers log them and treat the directive
//! as absent. Template and message errors surface through `DynSvgError`.

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Clone, Error)]
pub enum DynSvgError {
    #[error("Template error: {0}")]
    Svg(#[from] SvgError),

    #[error("Directive error: {0}")]
    Directive(#[from] DirectiveError),

    /// Inbound data message could not be decoded
    #[error("Invalid data message: {0}")]
    Message(String),
}

/// Malformed `{{...}}` tags
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DirectiveError {
    /// Option list did not coerce into a JSON object
    #[error("Invalid option list '{text}': {reason}")]
    Json { text: String, reason: String },
}

/// Template markup errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SvgError {
    /// Markup is not well-formed XML
    #[error("Invalid XML: {0}")]
    Xml(String),

    /// Document has no `<svg>` element
    #[error("Missing <svg> root element")]
    MissingRoot,

    /// Serialization failed
    #[error("Failed to write markup: {0}")]
    Write(String),
}

pub type Result<T> = std::result::Result<T, DynSvgError>;
