//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (delimiters, expected tokens)
//! - E03xx: Declaration errors (POUs, variables, types)
//! - E04xx: Expression errors
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Error codes for parser diagnostics
///
/// Each error code represents a specific category of parse error,
/// enabling filtering, documentation, and IDE integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors (invalid tokens)
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,
    /// Unterminated block comment
    E0103,

    // =========================================================================
    // E02xx: Structural errors (delimiters, expected tokens)
    // =========================================================================
    /// Expected a specific token, found something else
    E0201,
    /// Unexpected token, recovery skipped input
    E0202,
    /// Unclosed parenthesis `(`
    E0203,
    /// Unclosed bracket `[`
    E0204,

    // =========================================================================
    // E03xx: Declaration errors (POUs, variables, types)
    // =========================================================================
    /// Missing identifier/name in a declaration
    E0301,
    /// Missing or malformed type reference
    E0302,
    /// Malformed variable declaration line
    E0303,
    /// Misplaced declaration or statement in a body
    E0304,

    // =========================================================================
    // E04xx: Expression errors
    // =========================================================================
    /// Missing expression where one was expected
    E0401,
    /// Malformed argument in a call
    E0402,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Internal error (unrecognized tree shape)
    E0901,
}

impl ErrorCode {
    /// A short human-readable description of the error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::E0101 => "unexpected character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "unterminated block comment",
            Self::E0201 => "expected token",
            Self::E0202 => "unexpected token",
            Self::E0203 => "unclosed parenthesis",
            Self::E0204 => "unclosed bracket",
            Self::E0301 => "missing name",
            Self::E0302 => "missing type",
            Self::E0303 => "malformed variable declaration",
            Self::E0304 => "misplaced item in body",
            Self::E0401 => "expected expression",
            Self::E0402 => "malformed argument",
            Self::E0901 => "internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
