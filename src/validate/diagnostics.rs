//! Diagnostics - structured error reporting for the pipeline.
//!
//! A diagnostic carries a severity, a message, a 0-based line/column span
//! and an optional source tag naming the stage that produced it. The
//! driver converts positions to the 1-based external convention when it
//! reports to consumers.

use crate::base::Span;

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 0-based line/column range
    pub span: Span,
    /// Stage that produced this diagnostic ("lex", "syntax", "lower",
    /// "validate")
    pub source: Option<&'static str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            source: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
            source: None,
        }
    }

    /// Tag the producing stage.
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }
}
