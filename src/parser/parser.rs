//! Recursive descent parser for Structured Text
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.

use super::errors::{ErrorCode, SyntaxError};
use super::grammar::{self, StParser};
use super::lexer::{self, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    /// Lexical diagnostics, in source order
    pub lex_errors: Vec<SyntaxError>,
    /// Parse diagnostics, in source order
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.lex_errors.is_empty() && self.errors.is_empty()
    }
}

/// Parse Structured Text source code into a CST
pub fn parse(input: &str) -> Parse {
    let (tokens, lex_errors) = lexer::lex(input);
    let mut parser = Parser::new(&tokens);
    grammar::pou::parse_source_file(&mut parser);
    let (green, errors) = parser.finish();
    Parse {
        green,
        lex_errors,
        errors,
    }
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (GreenNode, Vec<SyntaxError>) {
        (self.builder.finish(), self.errors)
    }

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_range(&self) -> TextRange {
        self.current()
            .map(|t| t.range())
            .unwrap_or_else(|| {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.range().end())
                    .unwrap_or_else(|| TextSize::new(0));
                TextRange::empty(end)
            })
    }
}

impl<'a> StParser for Parser<'a> {
    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn current_text(&self) -> Option<&str> {
        self.current().map(|t| t.text)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        // Look ahead, skipping trivia
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return self.tokens[idx].kind;
                }
                count += 1;
            }
            idx += 1;
        }
        SyntaxKind::ERROR
    }

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            let expected = kind.display_name();
            let found = self
                .current()
                .map(|t| t.kind.display_name())
                .unwrap_or("end of file");
            self.error(
                format!("expected {}, found {}", expected, found),
                ErrorCode::E0201,
            );
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn error(&mut self, message: impl Into<String>, code: ErrorCode) {
        let range = self.current_range();
        self.errors.push(SyntaxError::new(message, range, code));
    }

    fn error_hint(&mut self, message: impl Into<String>, hint: impl Into<String>, code: ErrorCode) {
        let range = self.current_range();
        self.errors
            .push(SyntaxError::new(message, range, code).with_hint(hint));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message, ErrorCode::E0202);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) && !self.current_kind().is_end_keyword() {
            self.bump();
            consumed = true;
        }
        // If we didn't consume anything and we're not at EOF, consume one token
        // to prevent infinite loops
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.ok());
        assert_eq!(result.syntax().kind(), SyntaxKind::SOURCE_FILE);
    }

    #[test]
    fn test_parse_minimal_program() {
        let result = parse("PROGRAM P VAR x : INT := 0; END_VAR BEGIN x := x + 1; END END_PROGRAM");
        assert!(result.ok(), "errors: {:?}", result.errors);
        let root = result.syntax();
        assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
        assert!(
            root.children()
                .any(|n| n.kind() == SyntaxKind::PROGRAM_DECL)
        );
    }

    #[test]
    fn test_parse_function_block_direct_body() {
        let result = parse(
            "FUNCTION_BLOCK FB VAR t : TON; done : BOOL; END_VAR done := t.Q; END_FUNCTION_BLOCK",
        );
        assert!(result.ok(), "errors: {:?}", result.errors);
    }

    #[test]
    fn test_parse_function_block_begin_body() {
        let result = parse("FUNCTION_BLOCK FB VAR x : INT; END_VAR BEGIN x := 1; END END_FUNCTION_BLOCK");
        assert!(result.ok(), "errors: {:?}", result.errors);
    }

    #[test]
    fn test_parse_function_with_return_type() {
        let result = parse(
            "FUNCTION Add : INT VAR_INPUT a : INT; b : INT; END_VAR Add := a + b; END_FUNCTION",
        );
        assert!(result.ok(), "errors: {:?}", result.errors);
    }

    #[test]
    fn test_parse_enum_type() {
        let result = parse("TYPE Color : (RED, GREEN, BLUE); END_TYPE");
        assert!(result.ok(), "errors: {:?}", result.errors);
        let root = result.syntax();
        assert!(root.children().any(|n| n.kind() == SyntaxKind::ENUM_DECL));
    }

    #[test]
    fn test_parse_struct_type() {
        let result = parse(
            "TYPE Motor : STRUCT speed : INT; running : BOOL := FALSE; END_STRUCT; END_TYPE",
        );
        assert!(result.ok(), "errors: {:?}", result.errors);
        let root = result.syntax();
        assert!(root.children().any(|n| n.kind() == SyntaxKind::STRUCT_DECL));
    }

    #[test]
    fn test_parse_array_declaration() {
        let result = parse(
            "PROGRAM P VAR a : ARRAY[1..10] OF INT := [1, 2, 3]; END_VAR BEGIN END END_PROGRAM",
        );
        assert!(result.ok(), "errors: {:?}", result.errors);
    }

    #[test]
    fn test_parse_timer_call_named_args() {
        let result = parse(
            "FUNCTION_BLOCK FB VAR t : TON; END_VAR t(IN := TRUE, PT := T#500ms); END_FUNCTION_BLOCK",
        );
        assert!(result.ok(), "errors: {:?}", result.errors);
    }

    #[test]
    fn test_parse_control_statements() {
        let source = r#"
            PROGRAM P
            VAR i : INT; x : INT; END_VAR
            BEGIN
                IF x > 0 THEN x := 0; ELSIF x < 0 THEN x := 1; ELSE x := 2; END_IF
                WHILE x < 10 DO x := x + 1; END_WHILE
                REPEAT x := x - 1; UNTIL x = 0 END_REPEAT
                FOR i := 1 TO 10 BY 2 DO x := x + i; END_FOR
                CASE x OF 1: x := 10; 2: x := 20; ELSE x := 0; END_CASE
                RETURN;
            END
            END_PROGRAM
        "#;
        let result = parse(source);
        assert!(result.ok(), "errors: {:?}", result.errors);
    }

    #[test]
    fn test_parse_missing_end_if_recovers() {
        let result = parse("PROGRAM P BEGIN IF TRUE THEN x := 1; END END_PROGRAM");
        assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
        assert!(result.errors[0].message.contains("END_IF"));
    }

    #[test]
    fn test_parse_error_resync_at_semicolon() {
        let result = parse("PROGRAM P BEGIN x := ; y := 2; END END_PROGRAM");
        assert!(!result.errors.is_empty());
        // The statement after the bad one still parses
        let root = result.syntax();
        let assignments: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::ASSIGNMENT_STMT)
            .collect();
        assert_eq!(assignments.len(), 2);
    }

    #[test]
    fn test_parse_missing_argument_value() {
        let result =
            parse("FUNCTION_BLOCK FB VAR t : TON; END_VAR t(IN := ); END_FUNCTION_BLOCK");
        assert_eq!(result.errors.len(), 1, "errors: {:?}", result.errors);
        assert!(result.errors[0].message.contains("missing argument value"));
    }

    #[test]
    fn test_cst_is_lossless() {
        let source = "PROGRAM P (* keep me *)\n  VAR x : INT; END_VAR\n  BEGIN x := 1; END\nEND_PROGRAM ;";
        let result = parse(source);
        assert_eq!(result.syntax().text().to_string(), source);
    }

    #[test]
    fn test_lossless_even_with_errors() {
        let source = "PROGRAM P BEGIN ??? x := 1; END END_PROGRAM";
        let result = parse(source);
        assert_eq!(result.syntax().text().to_string(), source);
    }

    #[test]
    fn test_top_level_optional_semicolons() {
        let result = parse("TYPE Color : (RED, GREEN); END_TYPE; PROGRAM P BEGIN END END_PROGRAM;");
        assert!(result.ok(), "errors: {:?}", result.errors);
    }
}
