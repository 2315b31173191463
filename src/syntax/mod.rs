//! Syntax layer: owned AST types, CST lowering, and the text formatter.

pub mod ast;
pub mod formatter;
pub mod lower;

pub use ast::*;
pub use formatter::{FormatEdit, FormatOptions, format, format_edit};
pub use lower::{LowerResult, lower};
