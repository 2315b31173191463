//! Program organization units, variable blocks and type declarations.

use super::super::errors::ErrorCode;
use super::expressions::{parse_array_init, parse_expression};
use super::statements::parse_statement;
use super::{StParser, TOP_LEVEL_KEYWORDS, at_statement_list_end};
use crate::parser::syntax_kind::SyntaxKind;

/// Variable block introducers
const VAR_BLOCK_KEYWORDS: &[SyntaxKind] = &[
    SyntaxKind::VAR_KW,
    SyntaxKind::VAR_INPUT_KW,
    SyntaxKind::VAR_OUTPUT_KW,
    SyntaxKind::VAR_IN_OUT_KW,
];

// =============================================================================
// Source file entry point
// =============================================================================

/// Parse a Structured Text source file:
/// `Program ::= { POU | TypeDecl }` with an optional `;` after each
/// top-level declaration.
pub fn parse_source_file<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::SOURCE_FILE);

    loop {
        p.skip_trivia();
        if p.at_eof() {
            break;
        }
        match p.current_kind() {
            SyntaxKind::PROGRAM_KW => parse_program(p),
            SyntaxKind::FUNCTION_KW => parse_function(p),
            SyntaxKind::FUNCTION_BLOCK_KW => parse_function_block(p),
            SyntaxKind::TYPE_KW => parse_type_declaration(p),
            _ => {
                let found = p
                    .current_text()
                    .map(|t| format!("'{}'", t))
                    .unwrap_or_else(|| p.current_kind().display_name().to_string());
                p.error_recover(
                    format!("expected a PROGRAM, FUNCTION, FUNCTION_BLOCK or TYPE, found {}", found),
                    TOP_LEVEL_KEYWORDS,
                );
                continue;
            }
        }
        p.skip_trivia();
        p.eat(SyntaxKind::SEMICOLON);
    }

    p.finish_node();
}

// =============================================================================
// POUs
// =============================================================================

/// Consume the declared name, or report a missing-name error.
fn expect_name<P: StParser>(p: &mut P, what: &str) {
    if p.at(SyntaxKind::IDENTIFIER) {
        p.bump();
    } else {
        p.error(format!("expected a name for this {}", what), ErrorCode::E0301);
    }
}

/// `ProgramDecl ::= PROGRAM Ident VarDecl* BEGIN Body END END_PROGRAM`
fn parse_program<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::PROGRAM_DECL);
    p.bump(); // PROGRAM
    p.skip_trivia();
    expect_name(p, "program");

    parse_var_blocks(p);

    p.skip_trivia();
    parse_begin_end_body(p);

    p.skip_trivia();
    p.expect(SyntaxKind::END_PROGRAM_KW);
    p.finish_node();
}

/// `FunctionBlock ::= FUNCTION_BLOCK Ident VarDecl* Body END_FUNCTION_BLOCK`
///
/// The body is either an explicit `BEGIN .. END` block or a direct list of
/// statements and type declarations.
fn parse_function_block<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::FUNCTION_BLOCK_DECL);
    p.bump(); // FUNCTION_BLOCK
    p.skip_trivia();
    expect_name(p, "function block");

    parse_var_blocks(p);

    p.skip_trivia();
    if p.at(SyntaxKind::BEGIN_KW) {
        parse_begin_end_body(p);
    } else {
        parse_body_items(p);
    }

    p.skip_trivia();
    p.expect(SyntaxKind::END_FUNCTION_BLOCK_KW);
    p.finish_node();
}

/// `FunctionDef ::= FUNCTION Ident (':' TypeDecl)? (VarDecl | InnerTypeDecl)*
///                  Statement* END_FUNCTION`
fn parse_function<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::FUNCTION_DEF);
    p.bump(); // FUNCTION
    p.skip_trivia();
    expect_name(p, "function");

    p.skip_trivia();
    if p.eat(SyntaxKind::COLON) {
        p.skip_trivia();
        p.start_node(SyntaxKind::RETURN_TYPE);
        parse_type_ref(p);
        p.finish_node();
    }

    // Var blocks and function-scoped type aliases, in any order
    loop {
        p.skip_trivia();
        if p.at_any(VAR_BLOCK_KEYWORDS) {
            parse_var_block(p);
        } else if p.at(SyntaxKind::TYPE_KW) {
            parse_type_declaration(p);
        } else {
            break;
        }
    }

    parse_body_items(p);

    p.skip_trivia();
    p.expect(SyntaxKind::END_FUNCTION_KW);
    p.finish_node();
}

/// Parse an explicit `BEGIN { Statement | TypeDecl } END` block.
fn parse_begin_end_body<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::POU_BODY);
    p.expect(SyntaxKind::BEGIN_KW);
    parse_body_items(p);
    p.skip_trivia();
    p.expect(SyntaxKind::END_KW);
    p.finish_node();
}

/// Parse statements and nested type declarations until a block closer.
fn parse_body_items<P: StParser>(p: &mut P) {
    loop {
        p.skip_trivia();
        if at_statement_list_end(p) && !p.at(SyntaxKind::TYPE_KW) {
            break;
        }
        if p.at(SyntaxKind::TYPE_KW) {
            parse_type_declaration(p);
            p.skip_trivia();
            p.eat(SyntaxKind::SEMICOLON);
        } else {
            parse_statement(p);
        }
    }
}

// =============================================================================
// Variable declarations
// =============================================================================

fn parse_var_blocks<P: StParser>(p: &mut P) {
    loop {
        p.skip_trivia();
        if p.at_any(VAR_BLOCK_KEYWORDS) {
            parse_var_block(p);
        } else {
            break;
        }
    }
}

/// `VarDecl ::= (VAR | VAR_INPUT | VAR_OUTPUT | VAR_IN_OUT) Line* END_VAR`
fn parse_var_block<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::VAR_BLOCK);
    p.bump(); // VAR*

    loop {
        p.skip_trivia();
        if p.at_eof()
            || p.at(SyntaxKind::END_VAR_KW)
            || p.current_kind().is_end_keyword()
            || p.at_any(TOP_LEVEL_KEYWORDS)
            || p.at(SyntaxKind::BEGIN_KW)
        {
            break;
        }
        parse_var_line(p);
    }

    p.expect(SyntaxKind::END_VAR_KW);
    p.finish_node();
}

/// A declaration line:
/// `Ident ':' TypeDecl [ '(' Expr '..' Expr ')' ] [ ':=' ArrayInit ] ';'?`
/// or `Ident ':=' Expr ';'?`
fn parse_var_line<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::VAR_LINE);

    if !p.at(SyntaxKind::IDENTIFIER) {
        p.error_recover(
            format!(
                "expected a variable name, found {}",
                p.current_kind().display_name()
            ),
            &[SyntaxKind::SEMICOLON, SyntaxKind::END_VAR_KW],
        );
        p.skip_trivia();
        p.eat(SyntaxKind::SEMICOLON);
        p.finish_node();
        return;
    }
    p.bump(); // name
    p.skip_trivia();

    if p.eat(SyntaxKind::COLON) {
        p.skip_trivia();
        parse_type_ref(p);

        p.skip_trivia();
        if p.at(SyntaxKind::L_PAREN) {
            parse_range_constraint(p);
        }

        p.skip_trivia();
        if p.eat(SyntaxKind::ASSIGN) {
            p.skip_trivia();
            parse_array_init(p);
        }
    } else if p.eat(SyntaxKind::ASSIGN) {
        p.skip_trivia();
        parse_expression(p);
    } else {
        p.error(
            "expected ':' or ':=' after the variable name",
            ErrorCode::E0303,
        );
    }

    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `'(' Expr '..' Expr ')'` - a value range constraint on a simple type
fn parse_range_constraint<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::RANGE_CONSTRAINT);
    p.bump(); // (
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::DOT_DOT);
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    if !p.eat(SyntaxKind::R_PAREN) {
        p.error("unclosed range constraint", ErrorCode::E0203);
    }
    p.finish_node();
}

// =============================================================================
// Type references and declarations
// =============================================================================

/// `TypeDecl ::= Ident | TON | TOF | TP | ArrayType`
pub fn parse_type_ref<P: StParser>(p: &mut P) {
    match p.current_kind() {
        SyntaxKind::ARRAY_KW => parse_array_type(p),
        SyntaxKind::IDENTIFIER
        | SyntaxKind::TON_KW
        | SyntaxKind::TOF_KW
        | SyntaxKind::TP_KW => {
            p.start_node(SyntaxKind::TYPE_REF);
            p.bump();
            p.finish_node();
        }
        _ => {
            p.error(
                format!(
                    "expected a type name, found {}",
                    p.current_kind().display_name()
                ),
                ErrorCode::E0302,
            );
        }
    }
}

/// `ArrayType ::= ARRAY '[' Expr '..' Expr { ',' Expr '..' Expr } ']' OF TypeDecl`
fn parse_array_type<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::ARRAY_TYPE);
    p.bump(); // ARRAY
    p.skip_trivia();
    p.expect(SyntaxKind::L_BRACKET);

    loop {
        p.skip_trivia();
        p.start_node(SyntaxKind::ARRAY_DIMENSION);
        parse_expression(p);
        p.skip_trivia();
        p.expect(SyntaxKind::DOT_DOT);
        p.skip_trivia();
        parse_expression(p);
        p.finish_node();

        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }

    if !p.eat(SyntaxKind::R_BRACKET) {
        p.error("unclosed array dimension list", ErrorCode::E0204);
    }
    p.skip_trivia();
    p.expect(SyntaxKind::OF_KW);
    p.skip_trivia();
    parse_type_ref(p);
    p.finish_node();
}

/// Dispatch a `TYPE ...` declaration by looking past the name:
/// `TYPE N : ( ... )` is an enum, `TYPE N : STRUCT` is a struct, anything
/// else is a function-scoped alias.
pub fn parse_type_declaration<P: StParser>(p: &mut P) {
    debug_assert!(p.at(SyntaxKind::TYPE_KW));
    if p.nth(2) == SyntaxKind::COLON {
        match p.nth(3) {
            SyntaxKind::L_PAREN => return parse_enum_decl(p),
            SyntaxKind::STRUCT_KW => return parse_struct_decl(p),
            _ => {}
        }
    }
    parse_type_alias(p)
}

/// `EnumType ::= TYPE Ident ':' '(' Ident { ',' Ident } ')' ';' END_TYPE`
fn parse_enum_decl<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::ENUM_DECL);
    p.bump(); // TYPE
    p.skip_trivia();
    p.expect(SyntaxKind::IDENTIFIER);
    p.skip_trivia();
    p.expect(SyntaxKind::COLON);
    p.skip_trivia();
    p.expect(SyntaxKind::L_PAREN);

    loop {
        p.skip_trivia();
        if !p.expect(SyntaxKind::IDENTIFIER) {
            break;
        }
        p.skip_trivia();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }

    p.skip_trivia();
    p.expect(SyntaxKind::R_PAREN);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    p.expect(SyntaxKind::END_TYPE_KW);
    p.finish_node();
}

/// `StructType ::= TYPE Ident ':' STRUCT { Member } END_STRUCT ';' END_TYPE`
/// where `Member ::= Ident ':' TypeDecl [ ':=' Expr ] ';'`
fn parse_struct_decl<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::STRUCT_DECL);
    p.bump(); // TYPE
    p.skip_trivia();
    p.expect(SyntaxKind::IDENTIFIER);
    p.skip_trivia();
    p.expect(SyntaxKind::COLON);
    p.skip_trivia();
    p.expect(SyntaxKind::STRUCT_KW);

    loop {
        p.skip_trivia();
        if p.at_eof()
            || p.at(SyntaxKind::END_STRUCT_KW)
            || p.current_kind().is_end_keyword()
            || p.at_any(TOP_LEVEL_KEYWORDS)
        {
            break;
        }
        parse_struct_member(p);
    }

    p.expect(SyntaxKind::END_STRUCT_KW);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    p.expect(SyntaxKind::END_TYPE_KW);
    p.finish_node();
}

fn parse_struct_member<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::STRUCT_MEMBER);
    if !p.expect(SyntaxKind::IDENTIFIER) {
        // Skip something unusable so the member loop makes progress
        p.bump();
        p.finish_node();
        return;
    }
    p.skip_trivia();
    p.expect(SyntaxKind::COLON);
    p.skip_trivia();
    parse_type_ref(p);
    p.skip_trivia();
    if p.eat(SyntaxKind::ASSIGN) {
        p.skip_trivia();
        parse_expression(p);
    }
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `TYPE name [ ':' TypeDecl ] [ ':=' Expr ] ';'? END_TYPE` - a
/// function-scoped constant alias
fn parse_type_alias<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::TYPE_ALIAS);
    p.bump(); // TYPE
    p.skip_trivia();
    p.expect(SyntaxKind::IDENTIFIER);
    p.skip_trivia();
    if p.eat(SyntaxKind::COLON) {
        p.skip_trivia();
        parse_type_ref(p);
        p.skip_trivia();
    }
    if p.eat(SyntaxKind::ASSIGN) {
        p.skip_trivia();
        parse_expression(p);
        p.skip_trivia();
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    p.expect(SyntaxKind::END_TYPE_KW);
    p.finish_node();
}
