//! Static token-kind table for editor highlighting.
//!
//! The editor maps symbolic token names to colors; this table is the
//! authoritative list of public token kinds. Trivia and composite node
//! kinds are not listed - highlighting works on tokens alone.

use super::syntax_kind::SyntaxKind;

/// Highlight class of a token kind, mapped to a color scheme by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightClass {
    Keyword,
    Operator,
    Literal,
    Identifier,
    Comment,
}

/// An entry in the public token table.
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    name: &'static str,
    pub class: HighlightClass,
}

impl TokenInfo {
    /// Symbolic name, stable across releases (e.g. `FUNCTION_BLOCK`)
    pub fn name(&self) -> &'static str {
        self.name.strip_suffix("_KW").unwrap_or(self.name)
    }
}

macro_rules! token_table {
    ($($kind:ident => $class:ident),* $(,)?) => {
        &[$(TokenInfo {
            kind: SyntaxKind::$kind,
            name: stringify!($kind),
            class: HighlightClass::$class,
        }),*]
    };
}

/// The authoritative token table exposed to the editor.
pub static TOKEN_TABLE: &[TokenInfo] = token_table![
    LINE_COMMENT => Comment,
    BLOCK_COMMENT => Comment,
    IDENTIFIER => Identifier,
    NUMBER => Literal,
    STRING => Literal,
    TIME_LITERAL => Literal,
    DIRECT_ADDRESS => Literal,
    ENUM_REFERENCE => Literal,
    ASSIGN => Operator,
    NEQ => Operator,
    LT_EQ => Operator,
    GT_EQ => Operator,
    DOT_DOT => Operator,
    EQ => Operator,
    LT => Operator,
    GT => Operator,
    PLUS => Operator,
    MINUS => Operator,
    STAR => Operator,
    SLASH => Operator,
    DOT => Operator,
    COMMA => Operator,
    SEMICOLON => Operator,
    COLON => Operator,
    L_PAREN => Operator,
    R_PAREN => Operator,
    L_BRACKET => Operator,
    R_BRACKET => Operator,
    PROGRAM_KW => Keyword,
    END_PROGRAM_KW => Keyword,
    FUNCTION_KW => Keyword,
    END_FUNCTION_KW => Keyword,
    FUNCTION_BLOCK_KW => Keyword,
    END_FUNCTION_BLOCK_KW => Keyword,
    VAR_KW => Keyword,
    VAR_INPUT_KW => Keyword,
    VAR_OUTPUT_KW => Keyword,
    VAR_IN_OUT_KW => Keyword,
    END_VAR_KW => Keyword,
    TYPE_KW => Keyword,
    END_TYPE_KW => Keyword,
    STRUCT_KW => Keyword,
    END_STRUCT_KW => Keyword,
    ARRAY_KW => Keyword,
    OF_KW => Keyword,
    IF_KW => Keyword,
    THEN_KW => Keyword,
    ELSIF_KW => Keyword,
    ELSE_KW => Keyword,
    END_IF_KW => Keyword,
    WHILE_KW => Keyword,
    DO_KW => Keyword,
    END_WHILE_KW => Keyword,
    REPEAT_KW => Keyword,
    UNTIL_KW => Keyword,
    END_REPEAT_KW => Keyword,
    FOR_KW => Keyword,
    TO_KW => Keyword,
    BY_KW => Keyword,
    END_FOR_KW => Keyword,
    CASE_KW => Keyword,
    END_CASE_KW => Keyword,
    RETURN_KW => Keyword,
    BEGIN_KW => Keyword,
    END_KW => Keyword,
    TRUE_KW => Keyword,
    FALSE_KW => Keyword,
    AND_KW => Keyword,
    OR_KW => Keyword,
    XOR_KW => Keyword,
    NOT_KW => Keyword,
    MOD_KW => Keyword,
    TON_KW => Keyword,
    TOF_KW => Keyword,
    TP_KW => Keyword,
];

/// Look up table metadata for a token kind.
pub fn token_info(kind: SyntaxKind) -> Option<&'static TokenInfo> {
    TOKEN_TABLE.iter().find(|info| info.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_names() {
        let info = token_info(SyntaxKind::FUNCTION_BLOCK_KW).unwrap();
        assert_eq!(info.name(), "FUNCTION_BLOCK");
        assert_eq!(info.class, HighlightClass::Keyword);

        let info = token_info(SyntaxKind::TIME_LITERAL).unwrap();
        assert_eq!(info.name(), "TIME_LITERAL");
        assert_eq!(info.class, HighlightClass::Literal);
    }

    #[test]
    fn test_table_has_no_trivia_gaps() {
        assert!(token_info(SyntaxKind::WHITESPACE).is_none());
        assert!(token_info(SyntaxKind::SOURCE_FILE).is_none());
        // Every keyword is present
        assert!(TOKEN_TABLE.iter().filter(|i| i.class == HighlightClass::Keyword).count() >= 40);
    }
}
