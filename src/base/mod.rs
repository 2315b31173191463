//! Foundation types for the Structured Text toolchain.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for AST nodes
//!
//! This module has NO dependencies on other stc modules.

mod line_index;
mod position;

pub use line_index::{LineCol, LineIndex};
pub use position::{Position, Span};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
