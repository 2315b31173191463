//! Keyword-driven text formatter.
//!
//! The formatter is a pure text transformation: it works line by line off
//! the structural keywords alone, so it behaves sensibly on syntactically
//! incorrect input too. Applying it twice yields the first result.

use text_size::{TextRange, TextSize};

/// Formatting options.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Spaces per indentation level
    pub indent_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

/// A whole-document replacement edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatEdit {
    /// The replaced range - always the full document
    pub range: TextRange,
    pub new_text: String,
}

/// Format source text with the given options.
pub fn format(source: &str, options: &FormatOptions) -> String {
    let mut out = String::with_capacity(source.len());
    let mut indent: usize = 0;

    for raw_line in source.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            out.push('\n');
            continue;
        }

        let first = first_word(line);
        if closes_block(&first) || continues_block(&first) {
            indent = indent.saturating_sub(1);
        }

        for _ in 0..indent * options.indent_width {
            out.push(' ');
        }
        out.push_str(line);
        if needs_semicolon(line, &first) {
            out.push(';');
        }
        out.push('\n');

        if continues_block(&first) {
            indent += 1;
        } else if opens_block(&first) && !closes_itself(line, &first) {
            indent += 1;
        }
    }

    out
}

/// Format with default options, returned as a single edit spanning the
/// whole document.
pub fn format_edit(source: &str) -> FormatEdit {
    FormatEdit {
        range: TextRange::new(TextSize::new(0), TextSize::of(source)),
        new_text: format(source, &FormatOptions::default()),
    }
}

/// The leading keyword-ish word of a trimmed line, uppercased.
fn first_word(line: &str) -> String {
    line.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Keywords that open an indented block.
fn opens_block(word: &str) -> bool {
    matches!(
        word,
        "IF" | "WHILE"
            | "FOR"
            | "REPEAT"
            | "CASE"
            | "FUNCTION"
            | "FUNCTION_BLOCK"
            | "PROGRAM"
            | "VAR"
            | "VAR_INPUT"
            | "VAR_OUTPUT"
            | "VAR_IN_OUT"
            | "TYPE"
            | "STRUCT"
            | "BEGIN"
    )
}

/// Keywords that close the current block: the `END_*` family and the
/// bare `END`.
fn closes_block(word: &str) -> bool {
    word == "END" || word.starts_with("END_")
}

/// Keywords that sit at the opener's level with the block continuing
/// after them: branch keywords and `UNTIL` before `END_REPEAT`.
fn continues_block(word: &str) -> bool {
    matches!(word, "ELSE" | "ELSIF" | "UNTIL")
}

/// Structural words never receive an appended semicolon.
fn is_structural(word: &str) -> bool {
    opens_block(word) || closes_block(word) || continues_block(word)
}

/// Whether an opening line also contains its own closer, as in
/// `IF x THEN y := 1; END_IF` on one line.
fn closes_itself(line: &str, first: &str) -> bool {
    let rest = &line[first.len()..];
    let mut words = rest.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'));
    words.any(|w| {
        let upper = w.to_ascii_uppercase();
        upper == "END" || upper.starts_with("END_") || (first == "REPEAT" && upper == "UNTIL")
    })
}

/// Append `;` to lines that carry a statement: not already terminated, not
/// keyword-led, not a comment.
fn needs_semicolon(line: &str, first: &str) -> bool {
    !line.ends_with(';')
        && !is_structural(first)
        && !line.starts_with("//")
        && !line.starts_with("(*")
        && !line.ends_with("*)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(source: &str) -> String {
        format(source, &FormatOptions::default())
    }

    #[test]
    fn test_format_indents_blocks() {
        let source = "PROGRAM P\nVAR\nx : INT;\nEND_VAR\nBEGIN\nx := 1;\nEND\nEND_PROGRAM";
        let expected = "PROGRAM P\n  VAR\n    x : INT;\n  END_VAR\n  BEGIN\n    x := 1;\n  END\nEND_PROGRAM\n";
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_format_aligns_closers_with_openers() {
        let source = "IF a THEN\nx := 1;\nELSIF b THEN\ny := 2;\nELSE\nz := 3;\nEND_IF";
        let expected = "IF a THEN\n  x := 1;\nELSIF b THEN\n  y := 2;\nELSE\n  z := 3;\nEND_IF\n";
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_format_repeat_until() {
        let source = "REPEAT\nx := x - 1;\nUNTIL x = 0\nEND_REPEAT";
        let expected = "REPEAT\n  x := x - 1;\nUNTIL x = 0\nEND_REPEAT\n";
        assert_eq!(fmt(source), expected);
    }

    #[test]
    fn test_format_appends_semicolons() {
        assert_eq!(fmt("x := 1"), "x := 1;\n");
        // keyword-led and comment lines are left alone
        assert_eq!(fmt("BEGIN"), "BEGIN\n");
        assert_eq!(fmt("// note"), "// note\n");
    }

    #[test]
    fn test_format_single_line_block_keeps_level() {
        let source = "PROGRAM P BEGIN x := 1; END END_PROGRAM\nx := 2";
        let formatted = fmt(source);
        assert!(formatted.starts_with("PROGRAM P BEGIN x := 1; END END_PROGRAM\n"));
        assert!(formatted.contains("\nx := 2;\n"));
    }

    #[test]
    fn test_format_is_idempotent() {
        let sources = [
            "PROGRAM P\nVAR\nx : INT;\nEND_VAR\nBEGIN\nIF x > 0 THEN\nx := 0\nEND_IF\nEND\nEND_PROGRAM",
            "FUNCTION_BLOCK FB\nVAR t : TON; END_VAR\nt(IN := TRUE, PT := T#500ms)\nEND_FUNCTION_BLOCK",
            "broken ( input without\nany END markers",
        ];
        for source in sources {
            let once = fmt(source);
            assert_eq!(fmt(&once), once, "not idempotent for {:?}", source);
        }
    }

    #[test]
    fn test_format_handles_broken_input() {
        // No panic, content preserved modulo whitespace and semicolons
        let out = fmt("IF TRUE THEN\nx := 1;\n(* unclosed");
        assert!(out.contains("x := 1;"));
    }

    #[test]
    fn test_format_edit_spans_whole_document() {
        let source = "x := 1";
        let edit = format_edit(source);
        assert_eq!(edit.range, TextRange::new(TextSize::new(0), TextSize::of(source)));
        assert_eq!(edit.new_text, "x := 1;\n");
    }

    #[test]
    fn test_format_preserves_blank_lines() {
        assert_eq!(fmt("x := 1;\n\ny := 2;"), "x := 1;\n\ny := 2;\n");
    }
}
