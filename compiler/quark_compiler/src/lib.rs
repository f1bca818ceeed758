//! Portable Quark compiler driver.
//!
//! Runs the full pipeline for one compilation unit with no filesystem
//! access, plus a thin file-level wrapper ([`compile_file`]) for tools.
//!
//! # Usage
//!
//! ```ignore
//! use quark_compiler::{compile_unit, CompileConfig};
//!
//! let output = compile_unit(
//!     "fn main() -> int32 { return 0; }",
//!     &CompileConfig::default(),
//! );
//! assert_eq!(output.exit_code(), 0);
//! assert!(output.artifact.unwrap().contains("main:"));
//! ```
//!
//! # Architecture
//!
//! ```text
//! quark_ir, quark_lexer, quark_parse, quark_types, quark_mir, quark_codegen
//!                              ↓
//!                       quark_compiler  ← this crate
//! ```
//!
//! Every stage reports problems as values; the driver funnels them through a
//! per-unit [`DiagnosticQueue`](quark_diagnostic::DiagnosticQueue) and stops
//! at the first stage that reported an error.

mod config;
mod error;
mod file;
mod output;
mod pipeline;

pub use config::{CompileConfig, EmitKind};
pub use error::DriverError;
pub use file::{artifact_path, compile_file, FileOutput};
pub use output::{CompileOutput, ErrorPhase, LoweredUnit};
pub use pipeline::{check_unit, compile_unit, compile_units, lower_unit};
pub use quark_codegen::Target;

use std::sync::Once;

use quark_diagnostic::emitter::{
    ColorMode, DiagnosticEmitter, JsonEmitter, SourceContext, TerminalEmitter,
};
use quark_diagnostic::{Diagnostic, Severity};

/// Render diagnostics to a string with source snippets and a trailing
/// error/warning summary.
pub fn render_diagnostics(
    source: &str,
    file_path: &str,
    diagnostics: &[Diagnostic],
    color: ColorMode,
) -> String {
    let mut buf = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut buf, color, false)
            .with_source(SourceContext::new(file_path, source));
        emitter.emit_all(diagnostics);
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        emitter.emit_summary(errors, warnings);
        emitter.flush();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Render diagnostics as a JSON array of records.
pub fn render_json(source: &str, file_path: &str, diagnostics: &[Diagnostic]) -> String {
    let mut buf = Vec::new();
    {
        let mut emitter =
            JsonEmitter::new(&mut buf).with_source(SourceContext::new(file_path, source));
        emitter.begin();
        emitter.emit_all(diagnostics);
        emitter.end();
        emitter.flush();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=quark_codegen=debug`,
/// `RUST_LOG=quark_mir=trace`, and so on.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
