//! Syntax kinds for the rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! for IEC 61131-3 Structured Text.

/// All syntax kinds (tokens and nodes) in Structured Text
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (POUs, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS AND VALUE TOKENS
    // =========================================================================
    IDENTIFIER,     // motorSpeed
    NUMBER,         // 42, 3.14, 16#FF
    STRING,         // 'hello' or "hello"
    TIME_LITERAL,   // T#500ms, TIME#1h30m
    DIRECT_ADDRESS, // %IX0.0
    ENUM_REFERENCE, // Color#RED

    // =========================================================================
    // PUNCTUATION (multi-character first)
    // =========================================================================
    ASSIGN,    // :=
    NEQ,       // <>
    LT_EQ,     // <=
    GT_EQ,     // >=
    DOT_DOT,   // ..
    EQ,        // =
    LT,        // <
    GT,        // >
    PLUS,      // +
    MINUS,     // -
    STAR,      // *
    SLASH,     // /
    DOT,       // .
    COMMA,     // ,
    SEMICOLON, // ;
    COLON,     // :
    L_PAREN,   // (
    R_PAREN,   // )
    L_BRACKET, // [
    R_BRACKET, // ]

    // =========================================================================
    // KEYWORDS (END_* forms listed with their openers; the lexer's
    // longest-match rule keeps them ahead of the bare END)
    // =========================================================================
    PROGRAM_KW,
    END_PROGRAM_KW,
    FUNCTION_KW,
    END_FUNCTION_KW,
    FUNCTION_BLOCK_KW,
    END_FUNCTION_BLOCK_KW,
    VAR_KW,
    VAR_INPUT_KW,
    VAR_OUTPUT_KW,
    VAR_IN_OUT_KW,
    END_VAR_KW,
    TYPE_KW,
    END_TYPE_KW,
    STRUCT_KW,
    END_STRUCT_KW,
    ARRAY_KW,
    OF_KW,
    IF_KW,
    THEN_KW,
    ELSIF_KW,
    ELSE_KW,
    END_IF_KW,
    WHILE_KW,
    DO_KW,
    END_WHILE_KW,
    REPEAT_KW,
    UNTIL_KW,
    END_REPEAT_KW,
    FOR_KW,
    TO_KW,
    BY_KW,
    END_FOR_KW,
    CASE_KW,
    END_CASE_KW,
    RETURN_KW,
    BEGIN_KW,
    END_KW,
    TRUE_KW,
    FALSE_KW,
    AND_KW,
    OR_KW,
    XOR_KW,
    NOT_KW,
    MOD_KW,
    TON_KW,
    TOF_KW,
    TP_KW,

    // =========================================================================
    // COMPOSITE NODES
    // =========================================================================
    SOURCE_FILE,

    // POUs and declarations
    PROGRAM_DECL,
    FUNCTION_DEF,
    FUNCTION_BLOCK_DECL,
    RETURN_TYPE,
    POU_BODY, // explicit BEGIN .. END block
    VAR_BLOCK,
    VAR_LINE,
    RANGE_CONSTRAINT,
    TYPE_REF,
    ARRAY_TYPE,
    ARRAY_DIMENSION,
    ENUM_DECL,
    STRUCT_DECL,
    STRUCT_MEMBER,
    TYPE_ALIAS, // function-scoped TYPE name [: T] [:= expr] END_TYPE

    // Statements
    ASSIGNMENT_STMT,
    CALL_STMT,
    IF_STMT,
    ELSIF_BRANCH,
    ELSE_BRANCH,
    WHILE_STMT,
    REPEAT_STMT,
    FOR_STMT,
    CASE_STMT,
    CASE_BRANCH,
    RETURN_STMT,

    // Expressions
    BIN_EXPR,
    UNARY_EXPR,
    PAREN_EXPR,
    VARIABLE_REF,
    ACCESS_ELEMENT,
    CALL_EXPR,
    ARG_LIST,
    ARGUMENT,
    ARRAY_INIT,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::PROGRAM_KW as u16) && (self as u16) <= (Self::TP_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::ASSIGN as u16) && (self as u16) <= (Self::R_BRACKET as u16)
    }

    /// Check if this is a value-class token (literal, identifier or address)
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IDENTIFIER
                | Self::NUMBER
                | Self::STRING
                | Self::TIME_LITERAL
                | Self::DIRECT_ADDRESS
                | Self::ENUM_REFERENCE
        )
    }

    /// Check if this is one of the `END_*` closing keywords (not the bare `END`)
    pub fn is_end_keyword(self) -> bool {
        matches!(
            self,
            Self::END_PROGRAM_KW
                | Self::END_FUNCTION_KW
                | Self::END_FUNCTION_BLOCK_KW
                | Self::END_VAR_KW
                | Self::END_TYPE_KW
                | Self::END_STRUCT_KW
                | Self::END_IF_KW
                | Self::END_WHILE_KW
                | Self::END_REPEAT_KW
                | Self::END_FOR_KW
                | Self::END_CASE_KW
        )
    }

    /// Check if this is a timer function block type keyword
    pub fn is_timer_type(self) -> bool {
        matches!(self, Self::TON_KW | Self::TOF_KW | Self::TP_KW)
    }

    /// Human-readable name for error messages
    pub fn display_name(self) -> &'static str {
        match self {
            // Trivia
            Self::WHITESPACE => "whitespace",
            Self::LINE_COMMENT | Self::BLOCK_COMMENT => "comment",

            // Value tokens
            Self::IDENTIFIER => "identifier",
            Self::NUMBER => "number",
            Self::STRING => "string",
            Self::TIME_LITERAL => "time literal",
            Self::DIRECT_ADDRESS => "direct address",
            Self::ENUM_REFERENCE => "enum reference",

            // Punctuation
            Self::ASSIGN => "':='",
            Self::NEQ => "'<>'",
            Self::LT_EQ => "'<='",
            Self::GT_EQ => "'>='",
            Self::DOT_DOT => "'..'",
            Self::EQ => "'='",
            Self::LT => "'<'",
            Self::GT => "'>'",
            Self::PLUS => "'+'",
            Self::MINUS => "'-'",
            Self::STAR => "'*'",
            Self::SLASH => "'/'",
            Self::DOT => "'.'",
            Self::COMMA => "','",
            Self::SEMICOLON => "';'",
            Self::COLON => "':'",
            Self::L_PAREN => "'('",
            Self::R_PAREN => "')'",
            Self::L_BRACKET => "'['",
            Self::R_BRACKET => "']'",

            // Keywords
            Self::PROGRAM_KW => "'PROGRAM'",
            Self::END_PROGRAM_KW => "'END_PROGRAM'",
            Self::FUNCTION_KW => "'FUNCTION'",
            Self::END_FUNCTION_KW => "'END_FUNCTION'",
            Self::FUNCTION_BLOCK_KW => "'FUNCTION_BLOCK'",
            Self::END_FUNCTION_BLOCK_KW => "'END_FUNCTION_BLOCK'",
            Self::VAR_KW => "'VAR'",
            Self::VAR_INPUT_KW => "'VAR_INPUT'",
            Self::VAR_OUTPUT_KW => "'VAR_OUTPUT'",
            Self::VAR_IN_OUT_KW => "'VAR_IN_OUT'",
            Self::END_VAR_KW => "'END_VAR'",
            Self::TYPE_KW => "'TYPE'",
            Self::END_TYPE_KW => "'END_TYPE'",
            Self::STRUCT_KW => "'STRUCT'",
            Self::END_STRUCT_KW => "'END_STRUCT'",
            Self::ARRAY_KW => "'ARRAY'",
            Self::OF_KW => "'OF'",
            Self::IF_KW => "'IF'",
            Self::THEN_KW => "'THEN'",
            Self::ELSIF_KW => "'ELSIF'",
            Self::ELSE_KW => "'ELSE'",
            Self::END_IF_KW => "'END_IF'",
            Self::WHILE_KW => "'WHILE'",
            Self::DO_KW => "'DO'",
            Self::END_WHILE_KW => "'END_WHILE'",
            Self::REPEAT_KW => "'REPEAT'",
            Self::UNTIL_KW => "'UNTIL'",
            Self::END_REPEAT_KW => "'END_REPEAT'",
            Self::FOR_KW => "'FOR'",
            Self::TO_KW => "'TO'",
            Self::BY_KW => "'BY'",
            Self::END_FOR_KW => "'END_FOR'",
            Self::CASE_KW => "'CASE'",
            Self::END_CASE_KW => "'END_CASE'",
            Self::RETURN_KW => "'RETURN'",
            Self::BEGIN_KW => "'BEGIN'",
            Self::END_KW => "'END'",
            Self::TRUE_KW => "'TRUE'",
            Self::FALSE_KW => "'FALSE'",
            Self::AND_KW => "'AND'",
            Self::OR_KW => "'OR'",
            Self::XOR_KW => "'XOR'",
            Self::NOT_KW => "'NOT'",
            Self::MOD_KW => "'MOD'",
            Self::TON_KW => "'TON'",
            Self::TOF_KW => "'TOF'",
            Self::TP_KW => "'TP'",

            // Composite nodes - describe the construct
            Self::SOURCE_FILE => "source file",
            Self::PROGRAM_DECL => "program",
            Self::FUNCTION_DEF => "function",
            Self::FUNCTION_BLOCK_DECL => "function block",
            Self::RETURN_TYPE => "return type",
            Self::POU_BODY => "body",
            Self::VAR_BLOCK => "variable block",
            Self::VAR_LINE => "variable declaration",
            Self::RANGE_CONSTRAINT => "range constraint",
            Self::TYPE_REF => "type",
            Self::ARRAY_TYPE => "array type",
            Self::ARRAY_DIMENSION => "array dimension",
            Self::ENUM_DECL => "enum declaration",
            Self::STRUCT_DECL => "struct declaration",
            Self::STRUCT_MEMBER => "struct member",
            Self::TYPE_ALIAS => "type alias",
            Self::ASSIGNMENT_STMT => "assignment",
            Self::CALL_STMT => "call statement",
            Self::IF_STMT => "IF statement",
            Self::ELSIF_BRANCH => "ELSIF branch",
            Self::ELSE_BRANCH => "ELSE branch",
            Self::WHILE_STMT => "WHILE statement",
            Self::REPEAT_STMT => "REPEAT statement",
            Self::FOR_STMT => "FOR statement",
            Self::CASE_STMT => "CASE statement",
            Self::CASE_BRANCH => "CASE branch",
            Self::RETURN_STMT => "RETURN statement",
            Self::BIN_EXPR => "binary expression",
            Self::UNARY_EXPR => "unary expression",
            Self::PAREN_EXPR => "parenthesized expression",
            Self::VARIABLE_REF => "variable reference",
            Self::ACCESS_ELEMENT => "access element",
            Self::CALL_EXPR => "call expression",
            Self::ARG_LIST => "argument list",
            Self::ARGUMENT => "argument",
            Self::ARRAY_INIT => "array initializer",
            Self::ERROR => "error",
            Self::__LAST => "token",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StLanguage {}

impl rowan::Language for StLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<StLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<StLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<StLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<StLanguage>;
