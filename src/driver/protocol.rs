//! JSON worker protocol.
//!
//! The compiler core runs in a background worker and talks to its host in
//! discrete request/response messages:
//!
//! - `{ "type": "compile", "files": [{ "fileName", "content", "uri"? }] }`
//!   answered by `{ "type": "compile-result", "result": { ... } }` with
//!   1-based line/column positions for external consumers;
//! - `{ "type": "validate", "uri", "text" }` answered by
//!   `{ "uri", "diagnostics": [...] }` with 0-based positions (the
//!   language-server convention).
//!
//! A fatal worker error answers
//! `{ "success": false, "diagnostics": [], "fileCount": 0, "error": "..." }`
//! instead of terminating the worker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::compile::{self, CompileResult, SourceFile};
use crate::syntax::ast::Program;
use crate::validate::Diagnostic;

/// A request arriving from the host.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Request {
    Compile { files: Vec<SourceFile> },
    Validate { uri: String, text: String },
}

/// Errors at the worker boundary.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

/// Decode a request, run it, and encode the response.
pub fn handle_message(text: &str) -> String {
    match serde_json::from_str::<Request>(text) {
        Ok(Request::Compile { files }) => {
            let result = compile::compile(&files);
            encode(&CompileResponse::new(&result))
        }
        Ok(Request::Validate { uri, text }) => {
            let diagnostics = compile::validate_document(&uri, &text);
            encode(&ValidateResponse::new(&uri, &diagnostics))
        }
        Err(error) => {
            let error = WorkerError::from(error);
            tracing::error!(%error, "worker request failed");
            fatal(&error.to_string())
        }
    }
}

fn encode<T: Serialize>(response: &T) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| fatal(&e.to_string()))
}

/// The fatal-error response shape; built by hand so it cannot itself fail.
fn fatal(message: &str) -> String {
    format!(
        r#"{{"success":false,"diagnostics":[],"fileCount":0,"error":{}}}"#,
        serde_json::Value::String(message.to_string())
    )
}

// =============================================================================
// Compile response (1-based positions)
// =============================================================================

#[derive(Serialize)]
struct CompileResponse<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    result: WireCompileResult<'a>,
}

impl<'a> CompileResponse<'a> {
    fn new(result: &'a CompileResult) -> Self {
        Self {
            kind: "compile-result",
            result: WireCompileResult::new(result),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireCompileResult<'a> {
    success: bool,
    diagnostics: Vec<WireDiagnostic<'a>>,
    file_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    ast: Option<&'a Program>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_code: Option<&'a str>,
    processing_time_ms: u64,
}

impl<'a> WireCompileResult<'a> {
    fn new(result: &'a CompileResult) -> Self {
        Self {
            success: result.success,
            diagnostics: result
                .diagnostics
                .iter()
                .map(|d| WireDiagnostic::new(&d.file_name, &d.diagnostic))
                .collect(),
            file_count: result.file_count,
            ast: result.ast.as_ref(),
            source_code: result.source_code.as_deref(),
            processing_time_ms: result.processing_time_ms,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDiagnostic<'a> {
    file_name: &'a str,
    severity: &'static str,
    message: &'a str,
    range: WireRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'static str>,
}

impl<'a> WireDiagnostic<'a> {
    fn new(file_name: &'a str, diagnostic: &'a Diagnostic) -> Self {
        Self {
            file_name,
            severity: diagnostic.severity.as_str(),
            message: &diagnostic.message,
            range: WireRange::one_based(diagnostic),
            source: diagnostic.source,
        }
    }
}

#[derive(Serialize)]
struct WireRange {
    start: WirePosition,
    end: WirePosition,
}

#[derive(Serialize)]
struct WirePosition {
    line: usize,
    column: usize,
}

impl WireRange {
    /// External consumers read 1-based lines and columns.
    fn one_based(diagnostic: &Diagnostic) -> Self {
        Self {
            start: WirePosition {
                line: diagnostic.span.start.line + 1,
                column: diagnostic.span.start.column + 1,
            },
            end: WirePosition {
                line: diagnostic.span.end.line + 1,
                column: diagnostic.span.end.column + 1,
            },
        }
    }
}

// =============================================================================
// Validate response (0-based positions, LSP convention)
// =============================================================================

#[derive(Serialize)]
struct ValidateResponse<'a> {
    uri: &'a str,
    diagnostics: Vec<LspDiagnostic<'a>>,
}

impl<'a> ValidateResponse<'a> {
    fn new(uri: &'a str, diagnostics: &'a [Diagnostic]) -> Self {
        Self {
            uri,
            diagnostics: diagnostics.iter().map(LspDiagnostic::new).collect(),
        }
    }
}

#[derive(Serialize)]
struct LspDiagnostic<'a> {
    range: LspRange,
    severity: u32,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'static str>,
}

impl<'a> LspDiagnostic<'a> {
    fn new(diagnostic: &'a Diagnostic) -> Self {
        Self {
            range: LspRange {
                start: LspPosition {
                    line: diagnostic.span.start.line,
                    character: diagnostic.span.start.column,
                },
                end: LspPosition {
                    line: diagnostic.span.end.line,
                    character: diagnostic.span.end.column,
                },
            },
            severity: diagnostic.severity.to_lsp(),
            message: &diagnostic.message,
            source: diagnostic.source,
        }
    }
}

#[derive(Serialize)]
struct LspRange {
    start: LspPosition,
    end: LspPosition,
}

#[derive(Serialize)]
struct LspPosition {
    line: usize,
    character: usize,
}
