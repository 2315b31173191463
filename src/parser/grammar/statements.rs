//! Statement parsing and statement-level error recovery.

use super::expressions::{parse_expression, parse_postfix};
use super::{STATEMENT_RECOVERY, StParser, at_statement_list_end};
use crate::parser::syntax_kind::SyntaxKind;

/// Parse one statement. The caller guarantees the current token is not a
/// statement-list terminator.
pub fn parse_statement<P: StParser>(p: &mut P) {
    match p.current_kind() {
        SyntaxKind::IF_KW => parse_if(p),
        SyntaxKind::WHILE_KW => parse_while(p),
        SyntaxKind::REPEAT_KW => parse_repeat(p),
        SyntaxKind::FOR_KW => parse_for(p),
        SyntaxKind::CASE_KW => parse_case(p),
        SyntaxKind::RETURN_KW => parse_return(p),
        SyntaxKind::IDENTIFIER => parse_assignment_or_call(p),
        _ => {
            let found = p
                .current_text()
                .map(|t| format!("'{}'", t))
                .unwrap_or_else(|| p.current_kind().display_name().to_string());
            p.error_recover(
                format!("unexpected {} in statement position", found),
                STATEMENT_RECOVERY,
            );
            p.skip_trivia();
            p.eat(SyntaxKind::SEMICOLON);
        }
    }
}

/// Parse statements until a terminator of the enclosing block.
pub fn parse_statement_list<P: StParser>(p: &mut P) {
    loop {
        p.skip_trivia();
        if at_statement_list_end(p) {
            break;
        }
        parse_statement(p);
    }
}

// =============================================================================
// Control flow
// =============================================================================

/// `IF Expr THEN Stmt* { ELSIF Expr THEN Stmt* } [ ELSE Stmt* ] END_IF`
fn parse_if<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::IF_STMT);
    p.bump(); // IF
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::THEN_KW);

    parse_statement_list(p);

    while p.at(SyntaxKind::ELSIF_KW) {
        p.start_node(SyntaxKind::ELSIF_BRANCH);
        p.bump(); // ELSIF
        p.skip_trivia();
        parse_expression(p);
        p.skip_trivia();
        p.expect(SyntaxKind::THEN_KW);
        parse_statement_list(p);
        p.finish_node();
    }

    if p.at(SyntaxKind::ELSE_KW) {
        p.start_node(SyntaxKind::ELSE_BRANCH);
        p.bump(); // ELSE
        parse_statement_list(p);
        p.finish_node();
    }

    p.expect(SyntaxKind::END_IF_KW);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `WHILE Expr DO Stmt* END_WHILE`
fn parse_while<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::WHILE_STMT);
    p.bump(); // WHILE
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::DO_KW);

    parse_statement_list(p);

    p.expect(SyntaxKind::END_WHILE_KW);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `REPEAT Stmt* UNTIL Expr END_REPEAT`
fn parse_repeat<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::REPEAT_STMT);
    p.bump(); // REPEAT

    parse_statement_list(p);

    p.expect(SyntaxKind::UNTIL_KW);
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.skip_trivia();
    p.expect(SyntaxKind::END_REPEAT_KW);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `FOR Ident ':=' Expr TO Expr [ BY Expr ] DO Stmt* END_FOR`
fn parse_for<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::FOR_STMT);
    p.bump(); // FOR
    p.skip_trivia();
    p.expect(SyntaxKind::IDENTIFIER);
    p.skip_trivia();
    p.expect(SyntaxKind::ASSIGN);
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::TO_KW);
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    if p.eat(SyntaxKind::BY_KW) {
        p.skip_trivia();
        parse_expression(p);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::DO_KW);

    parse_statement_list(p);

    p.expect(SyntaxKind::END_FOR_KW);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// `CASE Expr OF { Label ':' Stmt* } [ ELSE Stmt* ] END_CASE`
fn parse_case<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::CASE_STMT);
    p.bump(); // CASE
    p.skip_trivia();
    parse_expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::OF_KW);

    loop {
        p.skip_trivia();
        if p.at_eof()
            || p.at(SyntaxKind::END_CASE_KW)
            || p.at(SyntaxKind::ELSE_KW)
            || p.current_kind().is_end_keyword()
            || p.at(SyntaxKind::END_KW)
        {
            break;
        }
        parse_case_branch(p);
    }

    if p.at(SyntaxKind::ELSE_KW) {
        p.start_node(SyntaxKind::ELSE_BRANCH);
        p.bump(); // ELSE
        parse_statement_list(p);
        p.finish_node();
    }

    p.expect(SyntaxKind::END_CASE_KW);
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// One `Label ':' Stmt*` alternative of a CASE statement.
fn parse_case_branch<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::CASE_BRANCH);
    parse_expression(p);
    p.skip_trivia();
    p.expect(SyntaxKind::COLON);

    loop {
        p.skip_trivia();
        if at_statement_list_end(p) || at_case_label(p) {
            break;
        }
        parse_statement(p);
    }
    p.finish_node();
}

/// Check whether the current token starts the label of the next CASE
/// alternative rather than a statement. An identifier only counts as a
/// label when a `:` follows directly (`RED :` vs `x := 1`).
fn at_case_label<P: StParser>(p: &P) -> bool {
    match p.current_kind() {
        SyntaxKind::NUMBER
        | SyntaxKind::ENUM_REFERENCE
        | SyntaxKind::STRING
        | SyntaxKind::TIME_LITERAL
        | SyntaxKind::MINUS
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW => true,
        SyntaxKind::IDENTIFIER => p.nth(1) == SyntaxKind::COLON,
        _ => false,
    }
}

/// `RETURN ';'?`
fn parse_return<P: StParser>(p: &mut P) {
    p.start_node(SyntaxKind::RETURN_STMT);
    p.bump(); // RETURN
    p.skip_trivia();
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

// =============================================================================
// Assignment / call
// =============================================================================

/// Parse an identifier-led statement. The reference path is parsed first;
/// a following `:=` makes it an assignment, anything else a call statement
/// (which covers both `f(...)` and bare member access like `timer.Q`).
fn parse_assignment_or_call<P: StParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_postfix(p);
    p.skip_trivia();

    if p.at(SyntaxKind::ASSIGN) {
        p.start_node_at(checkpoint, SyntaxKind::ASSIGNMENT_STMT);
        p.bump(); // :=
        p.skip_trivia();
        parse_expression(p);
        p.skip_trivia();
        p.eat(SyntaxKind::SEMICOLON);
        p.finish_node();
    } else {
        p.start_node_at(checkpoint, SyntaxKind::CALL_STMT);
        p.eat(SyntaxKind::SEMICOLON);
        p.finish_node();
    }
}
