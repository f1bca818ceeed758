//! Diagnostic Emitters
//!
//! Provides different output formats for diagnostics:
//! - Terminal: colored, human-readable output with source snippets
//! - JSON: the machine-readable stream of
//!   `{severity, file, line, column, message, kind, code}` records
//!
//! Each emitter implements the `DiagnosticEmitter` trait. Emitters given a
//! [`SourceContext`] resolve spans to file/line/column; without one they
//! fall back to raw byte spans.

mod json;
mod terminal;

pub use json::JsonEmitter;
pub use terminal::{ColorMode, TerminalEmitter};

use std::fmt::Write;

use quark_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::Diagnostic;

/// Returns a trailing comma for JSON list serialization.
pub(crate) fn trailing_comma(index: usize, total: usize) -> &'static str {
    if index + 1 < total {
        ","
    } else {
        ""
    }
}

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// The file a batch of diagnostics refers to.
#[derive(Clone, Debug)]
pub struct SourceContext {
    pub path: String,
    pub source: String,
    table: LineOffsetTable,
}

impl SourceContext {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let table = LineOffsetTable::build(&source);
        SourceContext {
            path: path.into(),
            source,
            table,
        }
    }

    /// 1-based (line, column) of a span's start.
    pub fn position(&self, span: Span) -> (u32, u32) {
        self.table.offset_to_line_col(&self.source, span.start)
    }

    pub fn line_text(&self, line: u32) -> Option<&str> {
        self.table.line_text(&self.source, line)
    }
}

/// Escape a string for JSON output.
pub(crate) fn escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(result, "\\u{:04x}", c as u32);
            }
            c => result.push(c),
        }
    }
    result
}
