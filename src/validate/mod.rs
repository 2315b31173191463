//! Declaration-level validation over the AST.
//!
//! The validator never mutates the AST; it walks the declaration lists
//! and reports cross-declaration problems:
//! - an empty file (no POU at all),
//! - duplicate POU names (the language is case-insensitive),
//! - functions without a declared return type,
//! - duplicate type names, and type names shadowing a POU.

mod diagnostics;

pub use diagnostics::{Diagnostic, Severity};

use indexmap::IndexMap;

use crate::base::Span;
use crate::syntax::ast::Program;

/// Run all declaration-level checks.
pub fn validate(program: &Program) -> Vec<Diagnostic> {
    let mut validator = Validator {
        diagnostics: Vec::new(),
    };
    validator.check_not_empty(program);
    let pou_names = validator.check_pou_names(program);
    validator.check_function_return_types(program);
    validator.check_type_names(program, &pou_names);
    validator.diagnostics
}

struct Validator {
    diagnostics: Vec<Diagnostic>,
}

/// A named declaration site, used for duplicate detection in source order.
struct NameSite {
    name: String,
    span: Span,
}

impl Validator {
    fn error(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(span, message).with_source("validate"));
    }

    fn warning(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::warning(span, message).with_source("validate"));
    }

    fn check_not_empty(&mut self, program: &Program) {
        if program.pou_count() == 0 {
            self.error(
                Span::default(),
                "File must contain at least one PROGRAM, FUNCTION, or FUNCTION_BLOCK",
            );
        }
    }

    /// Report duplicate POU names, pointing at the redeclaration. Returns
    /// the registry of seen names for the shadowing check.
    fn check_pou_names(&mut self, program: &Program) -> IndexMap<String, Span> {
        let mut sites: Vec<NameSite> = Vec::new();
        for pou in &program.programs {
            push_site(&mut sites, pou.name.as_str(), pou.name_span);
        }
        for pou in &program.functions {
            push_site(&mut sites, pou.name.as_str(), pou.name_span);
        }
        for pou in &program.function_blocks {
            push_site(&mut sites, pou.name.as_str(), pou.name_span);
        }
        // Restore source order across the three lists so the second
        // occurrence in the file is the one reported
        sites.sort_by_key(|site| (site.span.start.line, site.span.start.column));

        let mut seen: IndexMap<String, Span> = IndexMap::new();
        for site in sites {
            let key = site.name.to_ascii_lowercase();
            if seen.contains_key(&key) {
                self.error(site.span, format!("Duplicate name: {}", site.name));
            } else {
                seen.insert(key, site.span);
            }
        }
        seen
    }

    fn check_function_return_types(&mut self, program: &Program) {
        for function in &program.functions {
            if function.return_type.is_none() {
                self.error(
                    function.name_span,
                    format!("Function '{}' must declare a return type", function.name),
                );
            }
        }
    }

    fn check_type_names(&mut self, program: &Program, pou_names: &IndexMap<String, Span>) {
        let mut sites: Vec<NameSite> = Vec::new();
        for decl in &program.enums {
            push_site(&mut sites, decl.name.as_str(), decl.name_span);
        }
        for decl in &program.structs {
            push_site(&mut sites, decl.name.as_str(), decl.name_span);
        }
        sites.sort_by_key(|site| (site.span.start.line, site.span.start.column));

        let mut seen: IndexMap<String, Span> = IndexMap::new();
        for site in sites {
            let key = site.name.to_ascii_lowercase();
            if seen.contains_key(&key) {
                self.error(site.span, format!("Duplicate type name: {}", site.name));
                continue;
            }
            if pou_names.contains_key(&key) {
                self.warning(
                    site.span,
                    format!("Type '{}' shares its name with a POU", site.name),
                );
            }
            seen.insert(key, site.span);
        }
    }
}

fn push_site(sites: &mut Vec<NameSite>, name: &str, span: Span) {
    // Recovery can leave declarations nameless; those were already reported
    if !name.is_empty() {
        sites.push(NameSite {
            name: name.to_string(),
            span,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::LineIndex;
    use crate::parser;
    use crate::syntax::lower;

    fn validate_source(source: &str) -> Vec<Diagnostic> {
        let parse = parser::parse(source);
        let line_index = LineIndex::new(source);
        let lowered = lower::lower(&parse.syntax(), &line_index);
        validate(&lowered.program)
    }

    #[test]
    fn test_empty_file_rejected() {
        let diags = validate_source("");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("at least one PROGRAM"));
        assert!(diags[0].severity.is_error());
    }

    #[test]
    fn test_type_only_file_rejected() {
        let diags = validate_source("TYPE Color : (RED, GREEN); END_TYPE");
        assert!(diags.iter().any(|d| d.message.contains("at least one PROGRAM")));
    }

    #[test]
    fn test_duplicate_pou_names() {
        let diags = validate_source(
            "PROGRAM A BEGIN END END_PROGRAM FUNCTION_BLOCK A VAR END_VAR END_FUNCTION_BLOCK",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Duplicate name: A");
        // Points at the second A, on the same line after the first POU
        assert!(diags[0].span.start.column > 30);
    }

    #[test]
    fn test_duplicate_is_case_insensitive() {
        let diags = validate_source(
            "PROGRAM Motor BEGIN END END_PROGRAM PROGRAM MOTOR BEGIN END END_PROGRAM",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Duplicate name: MOTOR");
    }

    #[test]
    fn test_function_without_return_type() {
        let diags = validate_source("FUNCTION F VAR_INPUT x : INT; END_VAR END_FUNCTION");
        assert!(
            diags
                .iter()
                .any(|d| d.message.contains("must declare a return type"))
        );
    }

    #[test]
    fn test_function_with_return_type_ok() {
        let diags = validate_source(
            "FUNCTION F : INT VAR_INPUT x : INT; END_VAR F := x; END_FUNCTION",
        );
        assert!(diags.is_empty(), "diags: {:?}", diags);
    }

    #[test]
    fn test_duplicate_type_names() {
        let diags = validate_source(
            "TYPE T : (A, B); END_TYPE TYPE T : (C, D); END_TYPE PROGRAM P BEGIN END END_PROGRAM",
        );
        assert!(diags.iter().any(|d| d.message == "Duplicate type name: T"));
    }

    #[test]
    fn test_type_shadowing_pou_warns() {
        let diags = validate_source(
            "PROGRAM Motor BEGIN END END_PROGRAM TYPE Motor : (ON, OFF); END_TYPE",
        );
        let warning = diags
            .iter()
            .find(|d| d.message.contains("shares its name"))
            .expect("expected a shadowing warning");
        assert_eq!(warning.severity, Severity::Warning);
    }
}
