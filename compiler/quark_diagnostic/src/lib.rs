//! Diagnostic system for rich error reporting.
//!
//! Every diagnostic carries:
//! - an error code for searchability, and its [`ErrorKind`] category
//! - a clear message (what went wrong)
//! - a primary span (where it went wrong)
//! - context labels and notes (why it's wrong)
//! - suggestions (how to fix)
//!
//! # Error Guarantees
//!
//! The `ErrorGuaranteed` type provides type-level proof that at least one
//! error was emitted, so a stage cannot fail without reporting why.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic, line, column);
//! fn check() -> Result<TypedModule, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod fault;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{
    expected_expression, type_mismatch, unexpected_token, unknown_identifier, Diagnostic, Label,
    Severity,
};
pub use error_code::{ErrorCode, ErrorKind};
pub use fault::{FaultPhase, InternalCompilerFault};
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
