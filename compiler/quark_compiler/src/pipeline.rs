//! Core compilation pipeline: lex → parse → check → lower → codegen.
//!
//! Portable (no filesystem IO). Source comes in as `&str`, results come out as
//! [`CompileOutput`]. Every unit owns its interner and diagnostic queue, so
//! independent units compile in parallel without sharing state.

use quark_codegen::CodegenError;
use quark_diagnostic::span_utils::LineOffsetTable;
use quark_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use quark_ir::StringInterner;
use quark_parse::ParseOutput;
use quark_types::TypeCheckResult;
use rayon::prelude::*;

use crate::config::{CompileConfig, EmitKind};
use crate::output::{CompileOutput, ErrorPhase, LoweredUnit};

/// Diagnostics collected for one unit, positioned against its source.
struct Unit<'s> {
    source: &'s str,
    table: LineOffsetTable,
    queue: DiagnosticQueue,
}

impl<'s> Unit<'s> {
    fn new(source: &'s str, config: &CompileConfig) -> Self {
        Unit {
            source,
            table: LineOffsetTable::build(source),
            queue: DiagnosticQueue::with_config(config.diagnostics.clone()),
        }
    }

    fn report(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diag in diagnostics {
            self.queue.add_with_table(diag, &self.table, self.source);
        }
    }

    fn has_errors(&self) -> bool {
        self.queue.has_errors().is_some()
    }

    fn halt(mut self, phase: ErrorPhase) -> CompileOutput {
        tracing::debug!(?phase, errors = self.queue.error_count(), "unit halted");
        CompileOutput {
            artifact: None,
            diagnostics: self.queue.flush(),
            error_phase: Some(phase),
        }
    }

    fn finish(mut self, artifact: Option<String>) -> CompileOutput {
        CompileOutput {
            artifact,
            diagnostics: self.queue.flush(),
            error_phase: None,
        }
    }
}

/// Lex, parse and check. Lexing and parsing always both run so that lexical
/// and syntax errors are reported together; checking only runs on a clean
/// parse. Warnings never halt.
fn front_end(
    unit: &mut Unit<'_>,
    interner: &mut StringInterner,
) -> Result<(ParseOutput, TypeCheckResult), ErrorPhase> {
    let lexed = quark_lexer::lex(unit.source, interner);
    unit.report(lexed.errors.iter().map(quark_lexer::LexError::to_diagnostic));

    let parsed = quark_parse::parse(&lexed.tokens, interner);
    unit.report(parsed.errors.iter().map(quark_parse::ParseError::to_diagnostic));
    if lexed.has_errors() {
        return Err(ErrorPhase::Lex);
    }
    if parsed.has_errors() {
        return Err(ErrorPhase::Parse);
    }

    let checked = quark_types::check_module(&parsed.module, &parsed.arena, interner);
    unit.report(checked.diagnostics());
    if checked.has_errors() || unit.has_errors() {
        return Err(ErrorPhase::Check);
    }
    Ok((parsed, checked))
}

/// Run the front end only, like a `check` command: diagnostics, no artifact.
#[tracing::instrument(level = "debug", skip_all, fields(file = %config.file_path))]
pub fn check_unit(source: &str, config: &CompileConfig) -> CompileOutput {
    let mut interner = StringInterner::new();
    let mut unit = Unit::new(source, config);
    match front_end(&mut unit, &mut interner) {
        Ok(_) => unit.finish(None),
        Err(phase) => unit.halt(phase),
    }
}

/// Check and lower one unit to verified IR.
///
/// On failure the returned [`CompileOutput`] carries the diagnostics and the
/// phase that stopped the unit.
pub fn lower_unit(source: &str, config: &CompileConfig) -> Result<LoweredUnit, CompileOutput> {
    let mut interner = StringInterner::new();
    let mut unit = Unit::new(source, config);
    let (parsed, checked) = match front_end(&mut unit, &mut interner) {
        Ok(stages) => stages,
        Err(phase) => return Err(unit.halt(phase)),
    };

    match quark_mir::lower_module(&parsed.module, &parsed.arena, &checked.typed, &interner) {
        Ok(ir) => Ok(LoweredUnit {
            ir,
            interner,
            diagnostics: unit.queue.flush(),
        }),
        Err(fault) => {
            unit.report([fault.to_diagnostic()]);
            Err(unit.halt(ErrorPhase::Lower))
        }
    }
}

/// Full single-unit pipeline: source text in, artifact and diagnostics out.
///
/// The artifact is present iff no error-severity diagnostic was recorded.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(file = %config.file_path, emit = ?config.emit)
)]
pub fn compile_unit(source: &str, config: &CompileConfig) -> CompileOutput {
    let lowered = match lower_unit(source, config) {
        Ok(lowered) => lowered,
        Err(output) => return output,
    };

    let mut unit = Unit::new(source, config);
    unit.report(lowered.diagnostics);
    let artifact = match config.emit {
        EmitKind::Ir => quark_mir::print_module(&lowered.ir, &lowered.interner),
        EmitKind::Assembly => {
            match quark_codegen::emit_module(&lowered.ir, &lowered.interner, config.target) {
                Ok(asm) => asm,
                Err(err) => {
                    unit.report([codegen_diagnostic(&err)]);
                    return unit.halt(ErrorPhase::Codegen);
                }
            }
        }
    };
    tracing::debug!(bytes = artifact.len(), "artifact produced");
    unit.finish(Some(artifact))
}

/// Compile independent units in parallel. Results are in input order.
pub fn compile_units<S>(sources: &[S], config: &CompileConfig) -> Vec<CompileOutput>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| compile_unit(source.as_ref(), config))
        .collect()
}

fn codegen_diagnostic(err: &CodegenError) -> Diagnostic {
    match err {
        CodegenError::Fault(fault) => fault.to_diagnostic(),
        other => Diagnostic::error(ErrorCode::E9001).with_message(other.to_string()),
    }
}
