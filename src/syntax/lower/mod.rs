//! CST → AST lowering.
//!
//! Walks the rowan tree top-down and builds the owned AST. Dispatch is
//! keyed on [`SyntaxKind`]; an unrecognized shape produces an internal
//! diagnostic carrying the node's range - never a silent no-op.
//!
//! Lowering runs even on trees with parse errors and produces as much of
//! the AST as the tree supports; placeholders stand in for expressions
//! the parser could not produce.

mod expressions;
mod pou;
mod statements;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::{LineIndex, Span};
use crate::parser::{ErrorCode, Severity, SyntaxError, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::syntax::ast::{EnumType, Program, StructType, TypeDecl};

/// The lowered program plus any internal diagnostics.
#[derive(Debug)]
pub struct LowerResult {
    pub program: Program,
    pub errors: Vec<SyntaxError>,
}

/// Lower a parsed source file to the owned AST.
pub fn lower(root: &SyntaxNode, line_index: &LineIndex) -> LowerResult {
    let mut ctx = Lowerer {
        line_index,
        errors: Vec::new(),
        hoisted_enums: Vec::new(),
        hoisted_structs: Vec::new(),
    };
    let mut program = ctx.lower_source_file(root);
    ctx.resolve_type_references(&mut program);
    LowerResult {
        program,
        errors: ctx.errors,
    }
}

pub(super) struct Lowerer<'a> {
    pub(super) line_index: &'a LineIndex,
    pub(super) errors: Vec<SyntaxError>,
    /// Enum/struct declarations found inside POU bodies; ST type names are
    /// globally scoped, so they surface on the program's lists.
    pub(super) hoisted_enums: Vec<EnumType>,
    pub(super) hoisted_structs: Vec<StructType>,
}

impl Lowerer<'_> {
    // =========================================================================
    // Span and diagnostic helpers
    // =========================================================================

    pub(super) fn span(&self, node: &SyntaxNode) -> Span {
        self.line_index.span(node.text_range())
    }

    pub(super) fn token_span(&self, token: &SyntaxToken) -> Span {
        self.line_index.span(token.text_range())
    }

    pub(super) fn internal(&mut self, node: &SyntaxNode, message: impl Into<String>) {
        self.internal_at(node.text_range(), message);
    }

    pub(super) fn internal_at(
        &mut self,
        range: crate::base::TextRange,
        message: impl Into<String>,
    ) {
        self.errors
            .push(SyntaxError::new(message, range, ErrorCode::E0901));
    }

    pub(super) fn warn(&mut self, node: &SyntaxNode, message: impl Into<String>, code: ErrorCode) {
        self.errors.push(
            SyntaxError::new(message, node.text_range(), code)
                .with_severity(Severity::Warning),
        );
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    fn lower_source_file(&mut self, root: &SyntaxNode) -> Program {
        let mut program = Program {
            enums: Vec::new(),
            structs: Vec::new(),
            function_blocks: Vec::new(),
            functions: Vec::new(),
            programs: Vec::new(),
            span: self.span(root),
        };

        for child in root.children() {
            match child.kind() {
                SyntaxKind::PROGRAM_DECL => {
                    let decl = self.lower_program(&child);
                    program.programs.push(decl);
                }
                SyntaxKind::FUNCTION_BLOCK_DECL => {
                    let decl = self.lower_function_block(&child);
                    program.function_blocks.push(decl);
                }
                SyntaxKind::FUNCTION_DEF => {
                    let decl = self.lower_function(&child);
                    program.functions.push(decl);
                }
                SyntaxKind::ENUM_DECL => {
                    let decl = self.lower_enum(&child);
                    program.enums.push(decl);
                }
                SyntaxKind::STRUCT_DECL => {
                    let decl = self.lower_struct(&child);
                    program.structs.push(decl);
                }
                SyntaxKind::TYPE_ALIAS => {
                    self.warn(
                        &child,
                        "only enum and struct types can be declared at the top level",
                        ErrorCode::E0304,
                    );
                }
                // Recovery artifacts were already reported by the parser
                SyntaxKind::ERROR => {}
                other => {
                    self.internal(
                        &child,
                        format!("unhandled node in lowering: {}", other.display_name()),
                    );
                }
            }
        }

        program.enums.append(&mut self.hoisted_enums);
        program.structs.append(&mut self.hoisted_structs);
        program
    }

    // =========================================================================
    // Type reference resolution
    // =========================================================================

    /// Resolve `SimpleType` names against the declared enums and structs.
    /// Unresolved names stay `SimpleType`, deferring to downstream passes.
    fn resolve_type_references(&mut self, program: &mut Program) {
        let enum_names: FxHashSet<String> = program
            .enums
            .iter()
            .map(|e| e.name.to_ascii_lowercase())
            .collect();

        // Enum references inside struct members resolve first so the struct
        // map below carries resolved members.
        for decl in &mut program.structs {
            for member in &mut decl.members {
                resolve_enum_refs(&mut member.ty, &enum_names);
            }
        }

        let struct_map: FxHashMap<String, StructType> = program
            .structs
            .iter()
            .map(|s| (s.name.to_ascii_lowercase(), s.clone()))
            .collect();

        let mut resolve = |ty: &mut TypeDecl| resolve_type(ty, &enum_names, &struct_map);

        for pou in &mut program.programs {
            for block in &mut pou.var_declarations {
                for decl in &mut block.declarations {
                    if let Some(ty) = &mut decl.ty {
                        resolve(ty);
                    }
                }
            }
        }
        for pou in &mut program.function_blocks {
            for block in &mut pou.var_declarations {
                for decl in &mut block.declarations {
                    if let Some(ty) = &mut decl.ty {
                        resolve(ty);
                    }
                }
            }
        }
        for pou in &mut program.functions {
            if let Some(ty) = &mut pou.return_type {
                resolve(ty);
            }
            for block in &mut pou.var_declarations {
                for decl in &mut block.declarations {
                    if let Some(ty) = &mut decl.ty {
                        resolve(ty);
                    }
                }
            }
        }
    }
}

/// Replace a simple type naming a declared enum with an enum reference.
fn resolve_enum_refs(ty: &mut TypeDecl, enums: &FxHashSet<String>) {
    match ty {
        TypeDecl::SimpleType(simple) => {
            if simple.constraint.is_none() && enums.contains(&simple.name.to_ascii_lowercase()) {
                *ty = TypeDecl::EnumTypeReference(crate::syntax::ast::EnumTypeReference {
                    name: simple.name.clone(),
                    span: simple.span,
                });
            }
        }
        TypeDecl::ArrayType(array) => resolve_enum_refs(&mut array.element, enums),
        TypeDecl::StructType(_) | TypeDecl::EnumTypeReference(_) => {}
    }
}

/// Resolve a variable's type against both enum and struct declarations.
/// A struct-typed variable receives a copy of the declared members so the
/// runtime needs no name lookup.
fn resolve_type(
    ty: &mut TypeDecl,
    enums: &FxHashSet<String>,
    structs: &FxHashMap<String, StructType>,
) {
    match ty {
        TypeDecl::SimpleType(simple) => {
            if simple.constraint.is_some() {
                return;
            }
            let key = simple.name.to_ascii_lowercase();
            if enums.contains(&key) {
                *ty = TypeDecl::EnumTypeReference(crate::syntax::ast::EnumTypeReference {
                    name: simple.name.clone(),
                    span: simple.span,
                });
            } else if let Some(decl) = structs.get(&key) {
                let mut resolved = decl.clone();
                resolved.span = simple.span;
                *ty = TypeDecl::StructType(resolved);
            }
        }
        TypeDecl::ArrayType(array) => resolve_type(&mut array.element, enums, structs),
        TypeDecl::StructType(_) | TypeDecl::EnumTypeReference(_) => {}
    }
}

// =============================================================================
// CST access helpers
// =============================================================================

use crate::parser::SyntaxElement;

/// First direct child token of the given kind.
pub(super) fn child_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// First direct identifier token - the declared name for most nodes.
pub(super) fn name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    child_token(node, SyntaxKind::IDENTIFIER)
}

/// Check whether an element can stand for an expression: either an
/// expression node or a bare literal token.
pub(super) fn is_expr_element(element: &SyntaxElement) -> bool {
    match element {
        SyntaxElement::Node(node) => matches!(
            node.kind(),
            SyntaxKind::BIN_EXPR
                | SyntaxKind::UNARY_EXPR
                | SyntaxKind::PAREN_EXPR
                | SyntaxKind::VARIABLE_REF
                | SyntaxKind::CALL_EXPR
                | SyntaxKind::ARRAY_INIT
        ),
        SyntaxElement::Token(token) => matches!(
            token.kind(),
            SyntaxKind::NUMBER
                | SyntaxKind::STRING
                | SyntaxKind::TIME_LITERAL
                | SyntaxKind::DIRECT_ADDRESS
                | SyntaxKind::ENUM_REFERENCE
                | SyntaxKind::TRUE_KW
                | SyntaxKind::FALSE_KW
        ),
    }
}

/// Direct children that stand for expressions, in source order.
pub(super) fn expr_elements(node: &SyntaxNode) -> Vec<SyntaxElement> {
    node.children_with_tokens()
        .filter(is_expr_element)
        .collect()
}

/// Check for a statement node kind.
pub(super) fn is_statement_kind(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ASSIGNMENT_STMT
            | SyntaxKind::CALL_STMT
            | SyntaxKind::IF_STMT
            | SyntaxKind::WHILE_STMT
            | SyntaxKind::REPEAT_STMT
            | SyntaxKind::FOR_STMT
            | SyntaxKind::CASE_STMT
            | SyntaxKind::RETURN_STMT
    )
}
