//! Type declarations as they appear on variables and struct members.

use crate::base::Span;
use serde::Serialize;
use smol_str::SmolStr;

use super::expressions::Expression;
use super::StructType;

/// The sum of type forms a declaration can reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "$type")]
pub enum TypeDecl {
    SimpleType(SimpleType),
    ArrayType(ArrayType),
    /// A resolved reference to a struct declared in the same program;
    /// carries the declared members so the runtime needs no lookup.
    StructType(StructType),
    /// A resolved reference to an enum declared in the same program.
    EnumTypeReference(EnumTypeReference),
}

impl TypeDecl {
    pub fn span(&self) -> Span {
        match self {
            TypeDecl::SimpleType(t) => t.span,
            TypeDecl::ArrayType(t) => t.span,
            TypeDecl::StructType(t) => t.span,
            TypeDecl::EnumTypeReference(t) => t.span,
        }
    }
}

/// A named type (`INT`, `BOOL`, `TON`, a user type), optionally range
/// constrained: `INT (0..100)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleType {
    pub name: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<RangeConstraint>,
    pub span: Span,
}

/// `( min .. max )`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeConstraint {
    pub min: Expression,
    pub max: Expression,
}

/// `ARRAY [ lo..hi {, lo..hi} ] OF Element`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayType {
    pub dimensions: Vec<ArrayDimension>,
    pub element: Box<TypeDecl>,
    pub span: Span,
}

/// One `lo..hi` bound pair of an array type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayDimension {
    pub start: Expression,
    pub end: Expression,
}

/// A variable typed by an enum declared elsewhere in the program
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumTypeReference {
    pub name: SmolStr,
    pub span: Span,
}
