//! Owned AST for Structured Text.
//!
//! The AST is the canonical serializable form consumed by the runtime:
//! a tagged node graph in which every node carries a `$type` kind tag.
//! Sum types are Rust enums and every consumer matches exhaustively, so
//! adding a node kind is a compile-time follow-up obligation.
//!
//! Every node carries a [`Span`] covering all of its tokens.

mod expressions;
mod statements;
mod types;

pub use expressions::{
    Argument, ArrayAccess, ArrayInitializer, BinaryExpression, BinaryOperator, Call,
    ElementAccess, EnumReference, Expression, FunctionCallExpression, LeftExpression, Literal,
    LiteralValue, ParenExpression, UnaryExpression, UnaryOperator, VariableReference,
};
pub use statements::{
    Assignment, CallStatement, CaseBranch, CaseStatement, ElsifBranch, ForStatement, IfStatement,
    RepeatStatement, ReturnStatement, Statement, TypeDeclaration, WhileStatement,
};
pub use types::{ArrayDimension, ArrayType, EnumTypeReference, RangeConstraint, SimpleType, TypeDecl};

use crate::base::Span;
use serde::Serialize;
use smol_str::SmolStr;

/// A compiled source file: ordered lists of type declarations and POUs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub enums: Vec<EnumType>,
    pub structs: Vec<StructType>,
    pub function_blocks: Vec<FunctionBlock>,
    pub functions: Vec<FunctionDef>,
    pub programs: Vec<ProgramDecl>,
    pub span: Span,
}

impl Program {
    /// Total number of program organization units.
    pub fn pou_count(&self) -> usize {
        self.programs.len() + self.functions.len() + self.function_blocks.len()
    }
}

/// `PROGRAM name ... END_PROGRAM`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDecl {
    pub name: SmolStr,
    pub var_declarations: Vec<VarDeclaration>,
    pub body: Vec<Statement>,
    pub span: Span,
    /// Span of the name token, used by redeclaration diagnostics
    pub name_span: Span,
}

/// `FUNCTION_BLOCK name ... END_FUNCTION_BLOCK`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionBlock {
    pub name: SmolStr,
    pub var_declarations: Vec<VarDeclaration>,
    pub body: Vec<Statement>,
    pub span: Span,
    pub name_span: Span,
}

/// `FUNCTION name : ReturnType ... END_FUNCTION`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDef {
    pub name: SmolStr,
    pub return_type: Option<TypeDecl>,
    pub var_declarations: Vec<VarDeclaration>,
    pub body: Vec<Statement>,
    pub span: Span,
    pub name_span: Span,
}

/// `TYPE name : (A, B, C); END_TYPE`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumType {
    pub name: SmolStr,
    pub members: Vec<SmolStr>,
    pub span: Span,
    pub name_span: Span,
}

/// `TYPE name : STRUCT ... END_STRUCT; END_TYPE`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructType {
    pub name: SmolStr,
    pub members: Vec<StructMember>,
    pub span: Span,
    pub name_span: Span,
}

/// One `name : Type [ := default ];` member of a struct
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructMember {
    pub name: SmolStr,
    pub ty: TypeDecl,
    pub initializer: Option<Expression>,
    pub span: Span,
}

/// One `VAR .. END_VAR` group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarDeclaration {
    pub kind: VarBlockKind,
    pub declarations: Vec<VarDecl>,
    pub span: Span,
}

/// Which `VAR` form introduced the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VarBlockKind {
    #[serde(rename = "VAR")]
    Var,
    #[serde(rename = "VAR_INPUT")]
    VarInput,
    #[serde(rename = "VAR_OUTPUT")]
    VarOutput,
    #[serde(rename = "VAR_IN_OUT")]
    VarInOut,
}

/// One declaration line inside a var group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarDecl {
    pub name: SmolStr,
    /// Absent for the `name := expr` initializer-only form
    pub ty: Option<TypeDecl>,
    pub initializer: Option<Expression>,
    pub span: Span,
}
