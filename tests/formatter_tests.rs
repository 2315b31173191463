//! Formatter behavior on whole documents.

use rstest::rstest;
use stc::syntax::{FormatOptions, format, format_edit};

fn fmt(source: &str) -> String {
    format(source, &FormatOptions::default())
}

#[test]
fn test_format_full_program() {
    let source = "PROGRAM Main\nVAR\ncounter : INT := 0;\nEND_VAR\nBEGIN\nIF counter < 10 THEN\ncounter := counter + 1\nEND_IF\nEND\nEND_PROGRAM";
    let expected = "PROGRAM Main\n  VAR\n    counter : INT := 0;\n  END_VAR\n  BEGIN\n    IF counter < 10 THEN\n      counter := counter + 1;\n    END_IF\n  END\nEND_PROGRAM\n";
    assert_eq!(fmt(source), expected);
}

#[rstest]
#[case("PROGRAM P\nVAR\nx : INT;\nEND_VAR\nBEGIN\nx := 1\nEND\nEND_PROGRAM")]
#[case("FUNCTION_BLOCK FB\nVAR t : TON; END_VAR\nt(IN := TRUE, PT := T#500ms)\nEND_FUNCTION_BLOCK")]
#[case("CASE x OF\n1:\ny := 1;\nELSE\ny := 0;\nEND_CASE")]
#[case("REPEAT\nx := x - 1;\nUNTIL x = 0\nEND_REPEAT")]
#[case("TYPE Motor : STRUCT\nspeed : INT;\nEND_STRUCT;\nEND_TYPE")]
#[case("this is not even (close to) valid ST")]
#[case("")]
fn test_format_is_idempotent(#[case] source: &str) {
    let once = fmt(source);
    let twice = fmt(&once);
    assert_eq!(twice, once, "second pass changed the output");
}

#[test]
fn test_closers_align_with_openers() {
    let formatted = fmt("FUNCTION_BLOCK FB\nVAR\nx : INT;\nEND_VAR\nIF x > 0 THEN\nx := 0;\nEND_IF\nEND_FUNCTION_BLOCK");
    let lines: Vec<&str> = formatted.lines().collect();
    let indent_of = |needle: &str| {
        lines
            .iter()
            .find(|l| l.trim_start().starts_with(needle))
            .map(|l| l.len() - l.trim_start().len())
            .unwrap_or_else(|| panic!("line starting with {:?} not found", needle))
    };
    assert_eq!(indent_of("FUNCTION_BLOCK"), indent_of("END_FUNCTION_BLOCK"));
    assert_eq!(indent_of("VAR"), indent_of("END_VAR"));
    assert_eq!(indent_of("IF"), indent_of("END_IF"));
    assert!(indent_of("x :=") > indent_of("IF"));
}

#[test]
fn test_format_works_on_broken_input() {
    // Half an IF with an unterminated comment: no panic, statement intact
    let formatted = fmt("IF x THEN\nx := 1;\n(* dangling");
    assert!(formatted.contains("  x := 1;\n"));
}

#[test]
fn test_format_edit_replaces_whole_document() {
    let source = "PROGRAM P\nBEGIN\nEND\nEND_PROGRAM";
    let edit = format_edit(source);
    assert_eq!(u32::from(edit.range.start()), 0);
    assert_eq!(u32::from(edit.range.end()), source.len() as u32);
    assert_eq!(edit.new_text, fmt(source));
}
