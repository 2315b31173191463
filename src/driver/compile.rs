//! Batch compilation and incremental validation.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::base::LineIndex;
use crate::parser::{self, Severity as ParseSeverity, SyntaxError};
use crate::syntax::ast::Program;
use crate::syntax::lower;
use crate::validate::{self, Diagnostic};

/// One input file of a batch compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub file_name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A diagnostic tagged with the file it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDiagnostic {
    pub file_name: String,
    pub diagnostic: Diagnostic,
}

/// The outcome of a batch compilation.
#[derive(Debug)]
pub struct CompileResult {
    /// True when no diagnostic across all files has error severity
    pub success: bool,
    pub diagnostics: Vec<FileDiagnostic>,
    pub file_count: usize,
    /// The AST of the first file that compiled without errors
    pub ast: Option<Program>,
    /// The source of the file that produced `ast`
    pub source_code: Option<String>,
    /// Monotonic wall-clock time of the whole request
    pub processing_time_ms: u64,
}

/// Compile a batch of files.
///
/// Every file runs through the full pipeline and contributes diagnostics;
/// the first file with zero errors contributes the result AST. The
/// pipeline is single-file - batch mode compiles one "active" file while
/// linting the others.
pub fn compile(files: &[SourceFile]) -> CompileResult {
    let started = Instant::now();
    let mut diagnostics: Vec<FileDiagnostic> = Vec::new();
    let mut ast: Option<Program> = None;
    let mut source_code: Option<String> = None;

    for file in files {
        let _span = tracing::debug_span!("compile", file = %file.file_name).entered();
        let (file_diagnostics, program) = run_pipeline(&file.content);
        tracing::debug!(
            diagnostics = file_diagnostics.len(),
            "pipeline finished"
        );

        let clean = !file_diagnostics
            .iter()
            .any(|d| d.severity.is_error());
        if clean && ast.is_none() {
            ast = program;
            source_code = Some(file.content.clone());
        }

        diagnostics.extend(file_diagnostics.into_iter().map(|diagnostic| {
            FileDiagnostic {
                file_name: file.file_name.clone(),
                diagnostic,
            }
        }));
    }

    let success = !diagnostics
        .iter()
        .any(|d| d.diagnostic.severity.is_error());

    CompileResult {
        success,
        diagnostics,
        file_count: files.len(),
        ast,
        source_code,
        processing_time_ms: started.elapsed().as_millis() as u64,
    }
}

/// Validate a single document for the editor. Runs the full pipeline but
/// persists nothing; the host debounces and discards stale results.
pub fn validate_document(uri: &str, text: &str) -> Vec<Diagnostic> {
    let _span = tracing::debug_span!("validate", uri = %uri).entered();
    run_pipeline(text).0
}

/// Run lex, parse, lower and validate over one file. Diagnostics come out
/// grouped by stage (lex, syntax, lower, validate), each group in source
/// order; a failing stage never prevents the next from running on what
/// was produced.
fn run_pipeline(content: &str) -> (Vec<Diagnostic>, Option<Program>) {
    let line_index = LineIndex::new(content);
    let parse = parser::parse(content);

    let mut diagnostics = Vec::new();
    collect_stage(&mut diagnostics, &parse.lex_errors, &line_index, "lex");
    collect_stage(&mut diagnostics, &parse.errors, &line_index, "syntax");

    let lowered = lower::lower(&parse.syntax(), &line_index);
    collect_stage(&mut diagnostics, &lowered.errors, &line_index, "lower");

    let mut validation = validate::validate(&lowered.program);
    validation.sort_by_key(|d| (d.span.start.line, d.span.start.column));
    diagnostics.extend(validation);

    (diagnostics, Some(lowered.program))
}

/// Convert one stage's syntax errors, sorted by position.
fn collect_stage(
    out: &mut Vec<Diagnostic>,
    errors: &[SyntaxError],
    line_index: &LineIndex,
    stage: &'static str,
) {
    let mut converted: Vec<Diagnostic> = errors
        .iter()
        .map(|e| to_diagnostic(e, line_index, stage))
        .collect();
    converted.sort_by_key(|d| (d.span.start.line, d.span.start.column));
    out.append(&mut converted);
}

fn to_diagnostic(error: &SyntaxError, line_index: &LineIndex, stage: &'static str) -> Diagnostic {
    let span = line_index.span(error.range);
    let message = match &error.hint {
        Some(hint) => format!("{} ({})", error.message, hint),
        None => error.message.clone(),
    };
    let diagnostic = match error.severity {
        ParseSeverity::Error => Diagnostic::error(span, message),
        ParseSeverity::Warning => Diagnostic::warning(span, message),
    };
    diagnostic.with_source(stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Severity;

    fn file(name: &str, content: &str) -> SourceFile {
        SourceFile {
            file_name: name.to_string(),
            content: content.to_string(),
            uri: None,
        }
    }

    #[test]
    fn test_compile_clean_file() {
        let result = compile(&[file(
            "main.st",
            "PROGRAM P VAR x : INT := 0; END_VAR BEGIN x := x + 1; END END_PROGRAM",
        )]);
        assert!(result.success, "diagnostics: {:?}", result.diagnostics);
        assert_eq!(result.file_count, 1);
        let ast = result.ast.expect("ast expected on success");
        assert_eq!(ast.programs.len(), 1);
        assert_eq!(ast.programs[0].name, "P");
        assert!(result.source_code.is_some());
    }

    #[test]
    fn test_compile_reports_tagged_diagnostics() {
        let result = compile(&[
            file("ok.st", "PROGRAM P BEGIN END END_PROGRAM"),
            file("bad.st", "PROGRAM Q BEGIN x := ; END END_PROGRAM"),
        ]);
        assert!(!result.success);
        assert!(
            result
                .diagnostics
                .iter()
                .all(|d| d.file_name == "bad.st")
        );
        // The clean file still contributes the active AST
        let ast = result.ast.expect("first clean file provides the ast");
        assert_eq!(ast.programs[0].name, "P");
    }

    #[test]
    fn test_warnings_do_not_flip_success() {
        let result = compile(&[file(
            "main.st",
            "PROGRAM Motor BEGIN END END_PROGRAM TYPE Motor : (ON, OFF); END_TYPE",
        )]);
        assert!(result.success, "diagnostics: {:?}", result.diagnostics);
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.diagnostic.severity == Severity::Warning)
        );
    }

    #[test]
    fn test_diagnostics_grouped_by_stage() {
        // One lexical error and one syntactic error in the same file
        let result = compile(&[file(
            "main.st",
            "PROGRAM P BEGIN x := 1 @ ; y := ; END END_PROGRAM",
        )]);
        let stages: Vec<_> = result
            .diagnostics
            .iter()
            .filter_map(|d| d.diagnostic.source)
            .collect();
        let lex_pos = stages.iter().position(|s| *s == "lex");
        let syntax_pos = stages.iter().position(|s| *s == "syntax");
        match (lex_pos, syntax_pos) {
            (Some(lex), Some(syntax)) => assert!(lex < syntax),
            _ => panic!("expected lex and syntax diagnostics, got {:?}", stages),
        }
    }

    #[test]
    fn test_validate_document_is_stateless() {
        let first = validate_document("file:///a.st", "PROGRAM P BEGIN END END_PROGRAM");
        assert!(first.is_empty(), "diags: {:?}", first);
        // A later call sees nothing from the earlier one
        let second = validate_document("file:///a.st", "");
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_processing_time_reported() {
        let result = compile(&[file("a.st", "PROGRAM P BEGIN END END_PROGRAM")]);
        // Monotonic wall clock: zero is fine, going backwards is not
        assert!(result.processing_time_ms < 60_000);
    }
}
