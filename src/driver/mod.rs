//! Pipeline driver.
//!
//! Exposes the two entry points of the compiler core - batch compilation
//! and incremental validation - plus the JSON worker protocol around
//! them. The driver holds no state between requests: every call parses,
//! lowers and validates from scratch and releases its intermediates when
//! the result is built.

pub mod compile;
pub mod protocol;

pub use compile::{
    CompileResult, FileDiagnostic, SourceFile, compile, validate_document,
};
pub use protocol::{Request, WorkerError, handle_message};
