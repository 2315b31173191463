//! Logos-based lexer for Structured Text
//!
//! Fast tokenization using the logos crate. Keywords are matched
//! case-insensitively; identifiers keep their source spelling. Trivia
//! (whitespace and comments) are real tokens so the token stream covers
//! the source byte-for-byte.
//!
//! Longest-match resolves the lexical priority rules of the language:
//! `END_IF` wins over `END`, `ENDPOINT` lexes as an identifier, and the
//! multi-character operators win over their single-character prefixes.
//! Explicit priorities order `T#...` time literals above `Name#Member`
//! enum references where both could match.

use super::errors::{ErrorCode, SyntaxError};
use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Byte range covered by this token
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, TextSize::of(self.text))
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Tokenize and classify lexical errors.
///
/// Every character of the input ends up either inside a token or inside a
/// single-width error token, so tokenization always runs to completion.
pub fn lex(input: &str) -> (Vec<Token<'_>>, Vec<SyntaxError>) {
    let tokens = tokenize(input);
    let mut errors = Vec::new();
    for token in &tokens {
        if token.kind != SyntaxKind::ERROR {
            continue;
        }
        let error = if token.text.starts_with("(*") {
            SyntaxError::new("unterminated block comment", token.range(), ErrorCode::E0103)
        } else if token.text.starts_with('\'') || token.text.starts_with('"') {
            SyntaxError::new("unterminated string literal", token.range(), ErrorCode::E0102)
        } else {
            SyntaxError::new(
                format!("unexpected character '{}'", token.text),
                token.range(),
                ErrorCode::E0101,
            )
        };
        errors.push(error);
    }
    (tokens, errors)
}

/// Scan a `(* ... *)` block comment after logos matched the opener.
///
/// Block comments do not nest: the body runs to the first `*)`.
fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    match lex.remainder().find("*)") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("(*", block_comment)]
    BlockComment,

    // =========================================================================
    // VALUE TOKENS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // Plain, decimal and base-prefixed (2#1010, 16#FF) numeric literals
    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+#[0-9a-fA-F_]+")]
    Number,

    #[regex(r"'([^'$\r\n]|\$.)*'")]
    #[regex(r#""([^"$\r\n]|\$.)*""#)]
    String,

    // T#500ms, TIME#1h30m - must outrank the enum-reference form
    #[regex(r"[tT]([iI][mM][eE])?#[0-9smhdSMHD_]+", priority = 20)]
    TimeLiteral,

    // %IX0.0, %QW4, %MD12
    #[regex(r"%[iqmIQM][xbwdlXBWDL][0-9.]+")]
    DirectAddress,

    // Color#RED - outranks the plain identifier by longest match
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*#[a-zA-Z_][a-zA-Z0-9_]*", priority = 10)]
    EnumReference,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token(":=")]
    Assign,

    #[token("<>")]
    Neq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("..")]
    DotDot,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // =========================================================================
    // KEYWORDS (case-insensitive; longest match keeps END_* ahead of END)
    // =========================================================================
    #[token("PROGRAM", ignore(ascii_case))]
    ProgramKw,
    #[token("END_PROGRAM", ignore(ascii_case))]
    EndProgramKw,
    #[token("FUNCTION", ignore(ascii_case))]
    FunctionKw,
    #[token("END_FUNCTION", ignore(ascii_case))]
    EndFunctionKw,
    #[token("FUNCTION_BLOCK", ignore(ascii_case))]
    FunctionBlockKw,
    #[token("END_FUNCTION_BLOCK", ignore(ascii_case))]
    EndFunctionBlockKw,
    #[token("VAR", ignore(ascii_case))]
    VarKw,
    #[token("VAR_INPUT", ignore(ascii_case))]
    VarInputKw,
    #[token("VAR_OUTPUT", ignore(ascii_case))]
    VarOutputKw,
    #[token("VAR_IN_OUT", ignore(ascii_case))]
    VarInOutKw,
    #[token("END_VAR", ignore(ascii_case))]
    EndVarKw,
    #[token("TYPE", ignore(ascii_case))]
    TypeKw,
    #[token("END_TYPE", ignore(ascii_case))]
    EndTypeKw,
    #[token("STRUCT", ignore(ascii_case))]
    StructKw,
    #[token("END_STRUCT", ignore(ascii_case))]
    EndStructKw,
    #[token("ARRAY", ignore(ascii_case))]
    ArrayKw,
    #[token("OF", ignore(ascii_case))]
    OfKw,
    #[token("IF", ignore(ascii_case))]
    IfKw,
    #[token("THEN", ignore(ascii_case))]
    ThenKw,
    #[token("ELSIF", ignore(ascii_case))]
    ElsifKw,
    #[token("ELSE", ignore(ascii_case))]
    ElseKw,
    #[token("END_IF", ignore(ascii_case))]
    EndIfKw,
    #[token("WHILE", ignore(ascii_case))]
    WhileKw,
    #[token("DO", ignore(ascii_case))]
    DoKw,
    #[token("END_WHILE", ignore(ascii_case))]
    EndWhileKw,
    #[token("REPEAT", ignore(ascii_case))]
    RepeatKw,
    #[token("UNTIL", ignore(ascii_case))]
    UntilKw,
    #[token("END_REPEAT", ignore(ascii_case))]
    EndRepeatKw,
    #[token("FOR", ignore(ascii_case))]
    ForKw,
    #[token("TO", ignore(ascii_case))]
    ToKw,
    #[token("BY", ignore(ascii_case))]
    ByKw,
    #[token("END_FOR", ignore(ascii_case))]
    EndForKw,
    #[token("CASE", ignore(ascii_case))]
    CaseKw,
    #[token("END_CASE", ignore(ascii_case))]
    EndCaseKw,
    #[token("RETURN", ignore(ascii_case))]
    ReturnKw,
    #[token("BEGIN", ignore(ascii_case))]
    BeginKw,
    #[token("END", ignore(ascii_case))]
    EndKw,
    #[token("TRUE", ignore(ascii_case))]
    TrueKw,
    #[token("FALSE", ignore(ascii_case))]
    FalseKw,
    #[token("AND", ignore(ascii_case))]
    AndKw,
    #[token("OR", ignore(ascii_case))]
    OrKw,
    #[token("XOR", ignore(ascii_case))]
    XorKw,
    #[token("NOT", ignore(ascii_case))]
    NotKw,
    #[token("MOD", ignore(ascii_case))]
    ModKw,
    #[token("TON", ignore(ascii_case))]
    TonKw,
    #[token("TOF", ignore(ascii_case))]
    TofKw,
    #[token("TP", ignore(ascii_case))]
    TpKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Value tokens
            Identifier => SyntaxKind::IDENTIFIER,
            Number => SyntaxKind::NUMBER,
            String => SyntaxKind::STRING,
            TimeLiteral => SyntaxKind::TIME_LITERAL,
            DirectAddress => SyntaxKind::DIRECT_ADDRESS,
            EnumReference => SyntaxKind::ENUM_REFERENCE,

            // Punctuation
            Assign => SyntaxKind::ASSIGN,
            Neq => SyntaxKind::NEQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            DotDot => SyntaxKind::DOT_DOT,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Dot => SyntaxKind::DOT,
            Comma => SyntaxKind::COMMA,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,

            // Keywords
            ProgramKw => SyntaxKind::PROGRAM_KW,
            EndProgramKw => SyntaxKind::END_PROGRAM_KW,
            FunctionKw => SyntaxKind::FUNCTION_KW,
            EndFunctionKw => SyntaxKind::END_FUNCTION_KW,
            FunctionBlockKw => SyntaxKind::FUNCTION_BLOCK_KW,
            EndFunctionBlockKw => SyntaxKind::END_FUNCTION_BLOCK_KW,
            VarKw => SyntaxKind::VAR_KW,
            VarInputKw => SyntaxKind::VAR_INPUT_KW,
            VarOutputKw => SyntaxKind::VAR_OUTPUT_KW,
            VarInOutKw => SyntaxKind::VAR_IN_OUT_KW,
            EndVarKw => SyntaxKind::END_VAR_KW,
            TypeKw => SyntaxKind::TYPE_KW,
            EndTypeKw => SyntaxKind::END_TYPE_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            EndStructKw => SyntaxKind::END_STRUCT_KW,
            ArrayKw => SyntaxKind::ARRAY_KW,
            OfKw => SyntaxKind::OF_KW,
            IfKw => SyntaxKind::IF_KW,
            ThenKw => SyntaxKind::THEN_KW,
            ElsifKw => SyntaxKind::ELSIF_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            EndIfKw => SyntaxKind::END_IF_KW,
            WhileKw => SyntaxKind::WHILE_KW,
            DoKw => SyntaxKind::DO_KW,
            EndWhileKw => SyntaxKind::END_WHILE_KW,
            RepeatKw => SyntaxKind::REPEAT_KW,
            UntilKw => SyntaxKind::UNTIL_KW,
            EndRepeatKw => SyntaxKind::END_REPEAT_KW,
            ForKw => SyntaxKind::FOR_KW,
            ToKw => SyntaxKind::TO_KW,
            ByKw => SyntaxKind::BY_KW,
            EndForKw => SyntaxKind::END_FOR_KW,
            CaseKw => SyntaxKind::CASE_KW,
            EndCaseKw => SyntaxKind::END_CASE_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            BeginKw => SyntaxKind::BEGIN_KW,
            EndKw => SyntaxKind::END_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            AndKw => SyntaxKind::AND_KW,
            OrKw => SyntaxKind::OR_KW,
            XorKw => SyntaxKind::XOR_KW,
            NotKw => SyntaxKind::NOT_KW,
            ModKw => SyntaxKind::MOD_KW,
            TonKw => SyntaxKind::TON_KW,
            TofKw => SyntaxKind::TOF_KW,
            TpKw => SyntaxKind::TP_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_lex_program_header() {
        let tokens: Vec<_> = Lexer::new("PROGRAM Main").collect();
        assert_eq!(tokens.len(), 3); // PROGRAM, whitespace, Main
        assert_eq!(tokens[0].kind, SyntaxKind::PROGRAM_KW);
        assert_eq!(tokens[1].kind, SyntaxKind::WHITESPACE);
        assert_eq!(tokens[2].kind, SyntaxKind::IDENTIFIER);
        assert_eq!(tokens[2].text, "Main");
    }

    #[test]
    fn test_lex_keywords_case_insensitive() {
        assert_eq!(kinds("program"), vec![SyntaxKind::PROGRAM_KW]);
        assert_eq!(kinds("End_If"), vec![SyntaxKind::END_IF_KW]);
        assert_eq!(kinds("var_input"), vec![SyntaxKind::VAR_INPUT_KW]);
    }

    #[test]
    fn test_lex_end_family_priority() {
        assert_eq!(kinds("END"), vec![SyntaxKind::END_KW]);
        assert_eq!(kinds("END_IF"), vec![SyntaxKind::END_IF_KW]);
        assert_eq!(
            kinds("END_FUNCTION_BLOCK"),
            vec![SyntaxKind::END_FUNCTION_BLOCK_KW]
        );
        assert_eq!(kinds("END END_VAR"), vec![SyntaxKind::END_KW, SyntaxKind::END_VAR_KW]);
    }

    #[test]
    fn test_lex_end_word_boundary() {
        // Identifiers that merely start with a keyword stay identifiers
        assert_eq!(kinds("ENDPOINT"), vec![SyntaxKind::IDENTIFIER]);
        assert_eq!(kinds("END_POINTER"), vec![SyntaxKind::IDENTIFIER]);
        assert_eq!(kinds("VARIANT"), vec![SyntaxKind::IDENTIFIER]);
    }

    #[test]
    fn test_lex_multi_char_operators() {
        assert_eq!(
            kinds("x := 1 <= 2 <> 3 >= 4"),
            vec![
                SyntaxKind::IDENTIFIER,
                SyntaxKind::ASSIGN,
                SyntaxKind::NUMBER,
                SyntaxKind::LT_EQ,
                SyntaxKind::NUMBER,
                SyntaxKind::NEQ,
                SyntaxKind::NUMBER,
                SyntaxKind::GT_EQ,
                SyntaxKind::NUMBER,
            ]
        );
    }

    #[test]
    fn test_lex_time_literals() {
        assert_eq!(kinds("T#500ms"), vec![SyntaxKind::TIME_LITERAL]);
        assert_eq!(kinds("TIME#1h30m"), vec![SyntaxKind::TIME_LITERAL]);
        assert_eq!(kinds("t#10s"), vec![SyntaxKind::TIME_LITERAL]);
    }

    #[test]
    fn test_lex_enum_reference() {
        assert_eq!(kinds("Color#RED"), vec![SyntaxKind::ENUM_REFERENCE]);
        // Not an enum reference: member starts with a digit
        assert_eq!(kinds("T#5s"), vec![SyntaxKind::TIME_LITERAL]);
    }

    #[test]
    fn test_lex_direct_address() {
        assert_eq!(kinds("%IX0.0"), vec![SyntaxKind::DIRECT_ADDRESS]);
        assert_eq!(kinds("%QW4"), vec![SyntaxKind::DIRECT_ADDRESS]);
        assert_eq!(kinds("%md12"), vec![SyntaxKind::DIRECT_ADDRESS]);
    }

    #[test]
    fn test_lex_range_vs_decimal() {
        assert_eq!(
            kinds("1..10"),
            vec![SyntaxKind::NUMBER, SyntaxKind::DOT_DOT, SyntaxKind::NUMBER]
        );
        assert_eq!(kinds("1.5"), vec![SyntaxKind::NUMBER]);
        assert_eq!(kinds("16#FF"), vec![SyntaxKind::NUMBER]);
    }

    #[test]
    fn test_lex_comments() {
        let tokens: Vec<_> = Lexer::new("// line\nx").collect();
        assert_eq!(tokens[0].kind, SyntaxKind::LINE_COMMENT);
        assert_eq!(tokens[2].kind, SyntaxKind::IDENTIFIER);

        let tokens: Vec<_> = Lexer::new("(* a (* still the same *) x").collect();
        // Block comments do not nest: the first `*)` terminates the comment
        assert_eq!(tokens[0].kind, SyntaxKind::BLOCK_COMMENT);
        assert_eq!(tokens[0].text, "(* a (* still the same *)");
    }

    #[test]
    fn test_lex_unterminated_block_comment() {
        let (tokens, errors) = lex("x (* never closed");
        assert_eq!(tokens.last().unwrap().kind, SyntaxKind::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("block comment"));
    }

    #[test]
    fn test_lex_unterminated_string() {
        let (_, errors) = lex("s := 'oops\n");
        assert!(errors.iter().any(|e| e.message.contains("string")));
    }

    #[test]
    fn test_lex_unexpected_character() {
        let (tokens, errors) = lex("x @ y");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains('@'));
        // The bad character is a single-width token; lexing continues
        assert_eq!(
            tokens.iter().filter(|t| t.kind == SyntaxKind::IDENTIFIER).count(),
            2
        );
    }

    #[test]
    fn test_tokens_cover_source() {
        let source = "PROGRAM P (* c *) VAR x : INT := 0; END_VAR BEGIN x := x + 1; END END_PROGRAM";
        let rebuilt: String = tokenize(source).iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_tokenizes_arbitrary_bytes_to_completion() {
        let source = "£ ?? §§ PROGRAM @@";
        let rebuilt: String = tokenize(source).iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, source);
    }
}
