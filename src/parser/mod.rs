//! Lexer and parser for Structured Text
//!
//! This module provides a lossless front half of the pipeline using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! The parser is a hand-written recursive descent over the token stream
//! with ordered alternatives and bounded lookahead; it never backtracks.
//! All trivia is preserved in the tree, so the CST's text reproduces the
//! input byte-for-byte.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! Lowerer (syntax::lower) → owned AST
//! ```

pub mod errors;
pub mod grammar;
pub mod keywords;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;
mod syntax_kind;

pub use errors::{ErrorCode, Severity, SyntaxError};
pub use lexer::{Lexer, Token, lex, tokenize};
pub use parser::{Parse, parse};
pub use syntax_kind::{
    StLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodeChildren, SyntaxToken,
};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
