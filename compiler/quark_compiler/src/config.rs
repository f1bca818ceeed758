//! Driver configuration.

use quark_codegen::Target;
use quark_diagnostic::DiagnosticConfig;

/// What a successful compilation produces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EmitKind {
    /// GNU assembler text.
    #[default]
    Assembly,
    /// Textual SSA IR, for inspection.
    Ir,
}

impl EmitKind {
    /// File extension of the artifact.
    pub const fn extension(self) -> &'static str {
        match self {
            EmitKind::Assembly => "s",
            EmitKind::Ir => "qir",
        }
    }
}

/// Configuration for compiling one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileConfig {
    /// Logical file path, used when rendering diagnostics.
    pub file_path: String,
    pub emit: EmitKind,
    pub target: Target,
    pub diagnostics: DiagnosticConfig,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            file_path: "input.qrk".to_string(),
            emit: EmitKind::default(),
            target: Target::default(),
            diagnostics: DiagnosticConfig::default(),
        }
    }
}
