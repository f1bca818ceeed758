//! Internal compiler faults.
//!
//! Lowering and code generation never report user errors: by the time they
//! run, the program has been checked. Anything they cannot handle is a
//! compiler bug, reported as an [`InternalCompilerFault`] that aborts the unit.

use std::fmt;

use quark_ir::Span;
use thiserror::Error;

use crate::{Diagnostic, ErrorCode};

/// Pipeline phase a fault originated in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FaultPhase {
    Lower,
    Verify,
    Codegen,
}

impl fmt::Display for FaultPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FaultPhase::Lower => "lowering",
            FaultPhase::Verify => "IR verification",
            FaultPhase::Codegen => "code generation",
        })
    }
}

/// A fatal compiler bug with enough context to reproduce it.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("internal compiler fault during {phase}: {message}")]
pub struct InternalCompilerFault {
    pub phase: FaultPhase,
    pub message: String,
    /// Rendering of the offending AST or IR node.
    pub context: String,
    /// Source location, when the fault can be traced back to one.
    pub span: Option<Span>,
}

impl InternalCompilerFault {
    #[cold]
    pub fn new(phase: FaultPhase, message: impl Into<String>) -> Self {
        InternalCompilerFault {
            phase,
            message: message.into(),
            context: String::new(),
            span: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Convert into an E9001 diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(ErrorCode::E9001).with_message(self.to_string());
        if let Some(span) = self.span {
            diag = diag.with_label(span, "while compiling this");
        }
        if !self.context.is_empty() {
            diag = diag.with_note(format!("offending node: {}", self.context));
        }
        diag.with_note("this is a bug in the compiler")
    }
}
