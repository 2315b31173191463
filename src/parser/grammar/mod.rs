//! Grammar modules for Structured Text parsing
//!
//! This module contains the language-specific parsing logic organized by area:
//! - `pou` - program organization units, variable blocks, type declarations
//! - `statements` - statement forms and statement-level error recovery
//! - `expressions` - the operator precedence chain and call arguments
//!
//! The parsing functions are generic over the [`StParser`] trait so they can
//! be used with any parser implementation.

pub mod expressions;
pub mod pou;
pub mod statements;

use super::errors::ErrorCode;
use super::syntax_kind::SyntaxKind;
use rowan::Checkpoint;

/// Interface between the grammar functions and the parser state.
pub trait StParser {
    // Token inspection
    fn current_kind(&self) -> SyntaxKind;
    fn current_text(&self) -> Option<&str>;
    fn at(&self, kind: SyntaxKind) -> bool;
    fn at_any(&self, kinds: &[SyntaxKind]) -> bool;
    fn at_eof(&self) -> bool;

    /// Peek at the kind of the nth token ahead (skipping trivia).
    /// `nth(0)` is the next non-trivia token.
    fn nth(&self, n: usize) -> SyntaxKind;

    // Token consumption
    fn bump(&mut self);
    fn eat(&mut self, kind: SyntaxKind) -> bool;
    fn expect(&mut self, kind: SyntaxKind) -> bool;

    // Trivia handling
    fn skip_trivia(&mut self);

    // Node building
    fn start_node(&mut self, kind: SyntaxKind);
    fn finish_node(&mut self);
    fn checkpoint(&mut self) -> Checkpoint;
    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind);

    // Error handling
    fn error(&mut self, message: impl Into<String>, code: ErrorCode);
    fn error_hint(&mut self, message: impl Into<String>, hint: impl Into<String>, code: ErrorCode);
    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]);
}

/// Keywords that open a new top-level declaration; error recovery
/// resynchronizes here (or at any `END_*` keyword).
pub const TOP_LEVEL_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::FUNCTION_BLOCK_KW,
    SyntaxKind::PROGRAM_KW,
    SyntaxKind::TYPE_KW,
];

/// Recovery set for statement-level errors: the next `;` or the next
/// structural keyword.
pub const STATEMENT_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::SEMICOLON,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::FUNCTION_BLOCK_KW,
    SyntaxKind::PROGRAM_KW,
    SyntaxKind::TYPE_KW,
    SyntaxKind::END_KW,
];

/// Check whether the current token terminates a statement list: a block
/// closer, a branch keyword of the enclosing statement, or the start of
/// another top-level declaration.
pub fn at_statement_list_end<P: StParser>(p: &P) -> bool {
    if p.at_eof() {
        return true;
    }
    let kind = p.current_kind();
    kind == SyntaxKind::END_KW
        || kind.is_end_keyword()
        || matches!(
            kind,
            SyntaxKind::ELSIF_KW | SyntaxKind::ELSE_KW | SyntaxKind::UNTIL_KW
        )
        || TOP_LEVEL_KEYWORDS.contains(&kind)
}
