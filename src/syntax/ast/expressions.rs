//! Expression nodes.
//!
//! Binary trees are strictly binary and left-associative; the flat
//! operator chains of the parse are folded during lowering.

use crate::base::Span;
use serde::Serialize;
use smol_str::SmolStr;

/// The expression sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type")]
pub enum Expression {
    Literal(Literal),
    VariableReference(VariableReference),
    ArrayAccess(ArrayAccess),
    FunctionCallExpression(FunctionCallExpression),
    BinaryExpression(BinaryExpression),
    UnaryExpression(UnaryExpression),
    ParenExpression(ParenExpression),
    EnumReference(EnumReference),
    ArrayInitializer(ArrayInitializer),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(e) => e.span,
            Expression::VariableReference(e) => e.span,
            Expression::ArrayAccess(e) => e.span,
            Expression::FunctionCallExpression(e) => e.span,
            Expression::BinaryExpression(e) => e.span,
            Expression::UnaryExpression(e) => e.span,
            Expression::ParenExpression(e) => e.span,
            Expression::EnumReference(e) => e.span,
            Expression::ArrayInitializer(e) => e.span,
        }
    }
}

/// A literal value. Time literals and direct addresses keep their raw
/// source image as the string value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Literal {
    pub value: LiteralValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Number(f64),
    String(SmolStr),
}

/// A reference path such as `a`, `a.b[c].d`; one entry per `.`-separated
/// element, each with an optional index expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableReference {
    pub elements: Vec<ElementAccess>,
    pub span: Span,
}

/// One element of a reference path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAccess {
    pub name: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<Expression>,
}

/// The target of an assignment, flattened into element accesses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftExpression {
    pub elements: Vec<ElementAccess>,
    pub span: Span,
}

/// Indexing into a non-path expression: `x[i]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayAccess {
    pub array: Box<Expression>,
    pub index: Box<Expression>,
    pub span: Span,
}

/// A call in expression position, including the parenless member read
/// (`timer.Q` reads the `Q` output).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallExpression {
    pub call: Call,
    pub span: Span,
}

/// Callee and arguments of a call. Either `name` is set (plain call) or
/// `object`/`member` are (member call or member read).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<SmolStr>,
    pub args: Vec<Argument>,
}

/// One call argument; named arguments carry the parameter tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<SmolStr>,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
    pub span: Span,
}

/// Binary operators, serialized as their source spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "XOR")]
    Xor,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    Neq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "MOD")]
    Mod,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "MOD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    #[serde(rename = "NOT")]
    Not,
    #[serde(rename = "-")]
    Neg,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParenExpression {
    pub expr: Box<Expression>,
    pub span: Span,
}

/// `Color#RED`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumReference {
    pub type_name: SmolStr,
    pub member: SmolStr,
    pub span: Span,
}

/// `[ e1, e2, ... ]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayInitializer {
    pub elements: Vec<Expression>,
    pub span: Span,
}
