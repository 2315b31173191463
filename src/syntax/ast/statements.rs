//! Statement nodes.

use crate::base::Span;
use serde::Serialize;
use smol_str::SmolStr;

use super::expressions::{Call, Expression, LeftExpression};
use super::types::TypeDecl;

/// The statement sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type")]
pub enum Statement {
    Assignment(Assignment),
    If(IfStatement),
    While(WhileStatement),
    Repeat(RepeatStatement),
    For(ForStatement),
    Case(CaseStatement),
    FunctionCall(CallStatement),
    Return(ReturnStatement),
    TypeDeclaration(TypeDeclaration),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Assignment(s) => s.span,
            Statement::If(s) => s.span,
            Statement::While(s) => s.span,
            Statement::Repeat(s) => s.span,
            Statement::For(s) => s.span,
            Statement::Case(s) => s.span,
            Statement::FunctionCall(s) => s.span,
            Statement::Return(s) => s.span,
            Statement::TypeDeclaration(s) => s.span,
        }
    }
}

/// `target := value;`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub target: LeftExpression,
    pub value: Expression,
    pub span: Span,
}

/// `IF .. THEN .. {ELSIF .. THEN ..} [ELSE ..] END_IF`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub elsif_branches: Vec<ElsifBranch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<Vec<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElsifBranch {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// `WHILE cond DO .. END_WHILE`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// `REPEAT .. UNTIL cond END_REPEAT`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatStatement {
    pub body: Vec<Statement>,
    pub until: Expression,
    pub span: Span,
}

/// `FOR v := from TO to [BY step] DO .. END_FOR`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForStatement {
    pub variable: SmolStr,
    pub from: Expression,
    pub to: Expression,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<Expression>,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// `CASE selector OF label: .. [ELSE ..] END_CASE`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStatement {
    pub selector: Expression,
    pub branches: Vec<CaseBranch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<Vec<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseBranch {
    pub label: Expression,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// A call at statement position (`f(..);`, `timer(IN := x);`)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStatement {
    pub call: Call,
    pub span: Span,
}

/// `RETURN;`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnStatement {
    pub span: Span,
}

/// The function-scoped `TYPE name [: T] [:= expr] END_TYPE` constant alias
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub name: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeDecl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
    pub span: Span,
}
