//! Result types for the compiler pipeline.
//!
//! These are the interface between the driver and its consumers; they carry
//! everything needed to present results without exposing stage internals.

use quark_diagnostic::Diagnostic;
use quark_ir::StringInterner;
use quark_mir::IrModule;

/// The stage that stopped a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorPhase {
    /// Invalid characters or malformed literals.
    Lex,
    Parse,
    /// Name resolution and type errors.
    Check,
    /// Internal fault while lowering or verifying IR.
    Lower,
    /// Internal fault while generating assembly.
    Codegen,
}

/// Result of compiling (or checking) one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOutput {
    /// Assembly or IR text. `None` when only checking, and whenever an error
    /// was reported.
    pub artifact: Option<String>,
    /// Errors, warnings and notes, sorted by source position.
    pub diagnostics: Vec<Diagnostic>,
    pub error_phase: Option<ErrorPhase>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Process exit status: 0 iff no error-severity diagnostic was recorded.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }
}

/// A unit that checked and lowered cleanly.
#[derive(Debug)]
pub struct LoweredUnit {
    pub ir: IrModule,
    pub interner: StringInterner,
    /// Warnings from the earlier stages.
    pub diagnostics: Vec<Diagnostic>,
}
