//! Expression parsing for Structured Text
//!
//! Implements the precedence chain (low to high):
//!
//! ```text
//! or-expr  → and-expr { (OR | XOR) and-expr }
//! and-expr → rel-expr { AND rel-expr }
//! rel-expr → add-expr [ (= | <> | < | <= | > | >=) add-expr ]
//! add-expr → mul-expr { (+ | -) mul-expr }
//! mul-expr → unary { (* | / | MOD) unary }
//! unary    → [ NOT | - ] primary
//! ```
//!
//! Chains are recorded flat inside a single `BIN_EXPR` node (operand, op,
//! operand, op, ...); the lowerer folds them into strictly binary
//! left-associative trees. A chain with no operator never creates a node.

use super::super::errors::ErrorCode;
use super::StParser;
use crate::parser::syntax_kind::SyntaxKind;

const REL_OPERATORS: &[SyntaxKind] = &[
    SyntaxKind::EQ,
    SyntaxKind::NEQ,
    SyntaxKind::LT,
    SyntaxKind::LT_EQ,
    SyntaxKind::GT,
    SyntaxKind::GT_EQ,
];

/// Entry point for all expressions
pub fn parse_expression<P: StParser>(p: &mut P) {
    parse_or_expr(p);
}

fn parse_or_expr<P: StParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_and_expr(p);
    p.skip_trivia();

    if p.at(SyntaxKind::OR_KW) || p.at(SyntaxKind::XOR_KW) {
        p.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
        while p.at(SyntaxKind::OR_KW) || p.at(SyntaxKind::XOR_KW) {
            p.bump();
            p.skip_trivia();
            parse_and_expr(p);
            p.skip_trivia();
        }
        p.finish_node();
    }
}

fn parse_and_expr<P: StParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_rel_expr(p);
    p.skip_trivia();

    if p.at(SyntaxKind::AND_KW) {
        p.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
        while p.at(SyntaxKind::AND_KW) {
            p.bump();
            p.skip_trivia();
            parse_rel_expr(p);
            p.skip_trivia();
        }
        p.finish_node();
    }
}

/// Relational operators do not chain: `a < b < c` is rejected downstream
/// by the single optional comparison of the grammar.
fn parse_rel_expr<P: StParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_add_expr(p);
    p.skip_trivia();

    if p.at_any(REL_OPERATORS) {
        p.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
        p.bump();
        p.skip_trivia();
        parse_add_expr(p);
        p.finish_node();
    }
}

fn parse_add_expr<P: StParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_mul_expr(p);
    p.skip_trivia();

    if p.at(SyntaxKind::PLUS) || p.at(SyntaxKind::MINUS) {
        p.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
        while p.at(SyntaxKind::PLUS) || p.at(SyntaxKind::MINUS) {
            p.bump();
            p.skip_trivia();
            parse_mul_expr(p);
            p.skip_trivia();
        }
        p.finish_node();
    }
}

fn parse_mul_expr<P: StParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_unary_expr(p);
    p.skip_trivia();

    if p.at_any(&[SyntaxKind::STAR, SyntaxKind::SLASH, SyntaxKind::MOD_KW]) {
        p.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
        while p.at_any(&[SyntaxKind::STAR, SyntaxKind::SLASH, SyntaxKind::MOD_KW]) {
            p.bump();
            p.skip_trivia();
            parse_unary_expr(p);
            p.skip_trivia();
        }
        p.finish_node();
    }
}

fn parse_unary_expr<P: StParser>(p: &mut P) {
    if p.at(SyntaxKind::NOT_KW) || p.at(SyntaxKind::MINUS) {
        p.start_node(SyntaxKind::UNARY_EXPR);
        p.bump();
        p.skip_trivia();
        parse_unary_expr(p);
        p.finish_node();
    } else {
        parse_primary(p);
    }
}

/// `primary → call | reference | literal | '(' expr ')' | '[' ... ']'`
fn parse_primary<P: StParser>(p: &mut P) {
    match p.current_kind() {
        SyntaxKind::NUMBER
        | SyntaxKind::STRING
        | SyntaxKind::TIME_LITERAL
        | SyntaxKind::DIRECT_ADDRESS
        | SyntaxKind::ENUM_REFERENCE
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW => {
            p.bump();
        }
        SyntaxKind::IDENTIFIER => parse_postfix(p),
        SyntaxKind::L_PAREN => {
            p.start_node(SyntaxKind::PAREN_EXPR);
            p.bump(); // (
            p.skip_trivia();
            parse_expression(p);
            p.skip_trivia();
            if !p.eat(SyntaxKind::R_PAREN) {
                p.error("unclosed parenthesized expression", ErrorCode::E0203);
            }
            p.finish_node();
        }
        SyntaxKind::L_BRACKET => parse_array_init(p),
        SyntaxKind::TON_KW | SyntaxKind::TOF_KW | SyntaxKind::TP_KW => {
            p.error_hint(
                format!(
                    "expected expression, found {}",
                    p.current_kind().display_name()
                ),
                "timer types are declared in VAR blocks; a call uses the instance name",
                ErrorCode::E0401,
            );
        }
        _ => {
            let found = p
                .current_text()
                .map(|t| format!("'{}'", t))
                .unwrap_or_else(|| "end of file".to_string());
            p.error(
                format!("expected expression, found {}", found),
                ErrorCode::E0401,
            );
        }
    }
}

/// An identifier-led reference path with optional indexes
/// (`a`, `a.b`, `a[i].b`), optionally turning into a call when an
/// argument list follows (`f(...)`, `obj.method(...)`).
pub fn parse_postfix<P: StParser>(p: &mut P) {
    let checkpoint = p.checkpoint();

    p.start_node(SyntaxKind::VARIABLE_REF);
    loop {
        p.start_node(SyntaxKind::ACCESS_ELEMENT);
        p.expect(SyntaxKind::IDENTIFIER);
        if p.nth(0) == SyntaxKind::L_BRACKET {
            p.skip_trivia();
            p.bump(); // [
            p.skip_trivia();
            parse_expression(p);
            p.skip_trivia();
            if !p.eat(SyntaxKind::R_BRACKET) {
                p.error("unclosed index expression", ErrorCode::E0204);
            }
        }
        p.finish_node();

        if p.nth(0) == SyntaxKind::DOT {
            p.skip_trivia();
            p.bump(); // .
            p.skip_trivia();
        } else {
            break;
        }
    }
    p.finish_node();

    if p.nth(0) == SyntaxKind::L_PAREN {
        p.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
        p.skip_trivia();
        parse_arg_list(p);
        p.finish_node();
    }
}

/// `'(' [ Argument { ',' Argument } ] ')'`
fn parse_arg_list<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::ARG_LIST);
    p.bump(); // (
    p.skip_trivia();

    if !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
        loop {
            parse_argument(p);
            p.skip_trivia();
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            p.skip_trivia();
        }
    }

    if !p.eat(SyntaxKind::R_PAREN) {
        p.error_hint(
            "unclosed argument list",
            "argument values may be time literals (T#...), direct addresses (%IX0.0) or expressions",
            ErrorCode::E0203,
        );
    }
    p.finish_node();
}

/// `Argument ::= [ Ident ':=' ] Value` where a value is a time literal, a
/// direct address or an expression, tried in that order. The explicit
/// priority keeps `PT := T#500ms` from being parsed as arithmetic around
/// a `#`.
fn parse_argument<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::ARGUMENT);

    if p.at(SyntaxKind::IDENTIFIER) && p.nth(1) == SyntaxKind::ASSIGN {
        p.bump(); // parameter name
        p.skip_trivia();
        p.bump(); // :=
        p.skip_trivia();
    }

    match p.current_kind() {
        SyntaxKind::TIME_LITERAL | SyntaxKind::DIRECT_ADDRESS => p.bump(),
        SyntaxKind::COMMA | SyntaxKind::R_PAREN => {
            p.error("missing argument value", ErrorCode::E0402);
        }
        _ => parse_expression(p),
    }
    p.finish_node();
}

/// `ArrayInit ::= '[' Expr { ',' Expr } ']'` (also usable as an
/// expression primary). A bare expression initializer is handled by the
/// caller falling through to `parse_expression`.
pub fn parse_array_init<P: StParser>(p: &mut P) {
    if !p.at(SyntaxKind::L_BRACKET) {
        parse_expression(p);
        return;
    }
    p.start_node(SyntaxKind::ARRAY_INIT);
    p.bump(); // [
    p.skip_trivia();

    if !p.at(SyntaxKind::R_BRACKET) && !p.at_eof() {
        loop {
            parse_expression(p);
            p.skip_trivia();
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            p.skip_trivia();
        }
    }

    if !p.eat(SyntaxKind::R_BRACKET) {
        p.error("unclosed array initializer", ErrorCode::E0204);
    }
    p.finish_node();
}
