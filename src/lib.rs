//! # stc-core
//!
//! Core library for IEC 61131-3 Structured Text parsing, AST construction,
//! and validation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! driver    → batch compile, incremental validate, worker protocol
//!   ↓
//! validate  → declaration-level diagnostics over the AST
//!   ↓
//! syntax    → owned AST, CST→AST lowering, text formatter
//!   ↓
//! parser    → logos lexer, recursive-descent parser, token table
//!   ↓
//! base      → primitives (LineIndex, Position, Span, TextRange)
//! ```
//!
//! Every stage is a synchronous pure function of its input plus a
//! diagnostic accumulator; there is no shared mutable state between
//! requests, and a failing stage never prevents the next from running on
//! whatever it produced.

// ============================================================================
// MODULES (dependency order: base → parser → syntax → validate → driver)
// ============================================================================

/// Foundation types: LineIndex, Position, Span, TextRange
pub mod base;

/// Parser: logos lexer, recursive-descent parser, grammar, token table
pub mod parser;

/// Syntax: owned AST types, CST lowering, formatter
pub mod syntax;

/// Validation: declaration-level diagnostics
pub mod validate;

/// Driver: batch compile, incremental validate, worker protocol
pub mod driver;

// Re-export commonly needed items
pub use parser::keywords;

// Re-export foundation types
pub use base::{LineCol, LineIndex, Position, Span, TextRange, TextSize};

// Re-export the primary entry points
pub use driver::{CompileResult, SourceFile, compile, handle_message, validate_document};
pub use syntax::ast::Program;
pub use syntax::{format, format_edit};
pub use validate::{Diagnostic, Severity};
