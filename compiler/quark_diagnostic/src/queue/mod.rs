//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of same-line syntax errors and repeated messages
//! - Stable position-ordered flushing
//! - `ErrorGuaranteed` proof that errors were emitted

use std::hash::{Hash, Hasher};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Hash the first N characters of a message for dedup comparison.
#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = rustc_hash::FxHasher::default();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped (0 = unlimited).
    pub error_limit: usize,
    /// Deduplicate diagnostics with same line and similar content.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 50,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    /// 1-based line for sorting.
    line: u32,
    /// 1-based column for sorting within a line.
    column: u32,
}

/// Queue for collecting, deduplicating, and sorting the diagnostics of one
/// compilation unit.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic, line, column);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    error_count: usize,
    warning_count: usize,
    /// Errors dropped because the limit was reached.
    suppressed: usize,
    /// Last line with a syntax error (for dedup).
    last_syntax_line: Option<u32>,
    /// Last (line, `message_prefix_hash`) for non-syntax error dedup.
    last_error: Option<(u32, u64)>,
    config: DiagnosticConfig,
}

impl Default for DiagnosticQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            warning_count: 0,
            suppressed: 0,
            last_syntax_line: None,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic at an explicit position.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        let is_error = diag.is_error();

        if is_error && self.limit_reached() {
            self.suppressed += 1;
            return false;
        }

        if self.config.deduplicate && self.is_duplicate(&diag, line) {
            return false;
        }

        if is_error {
            if diag.code.is_parser_error() {
                self.last_syntax_line = Some(line);
            } else {
                self.last_error = Some((line, message_prefix_hash(&diag.message)));
            }
            self.error_count += 1;
        } else if matches!(diag.severity, crate::Severity::Warning) {
            self.warning_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });
        true
    }

    /// Add a diagnostic, positioning it by its primary span.
    pub fn add_with_table(
        &mut self,
        diag: Diagnostic,
        table: &LineOffsetTable,
        source: &str,
    ) -> bool {
        let (line, column) = diag
            .primary_span()
            .map_or((1, 1), |span| table.offset_to_line_col(source, span.start));
        self.add(diag, line, column)
    }

    /// Emit an error diagnostic and get proof it was emitted.
    pub fn emit_error(&mut self, diag: Diagnostic, line: u32, column: u32) -> ErrorGuaranteed {
        self.add(diag, line, column);
        ErrorGuaranteed::new()
    }

    fn is_duplicate(&self, diag: &Diagnostic, line: u32) -> bool {
        if !diag.is_error() {
            return false;
        }
        if diag.code.is_parser_error() {
            return self.last_syntax_line == Some(line);
        }
        self.last_error == Some((line, message_prefix_hash(&diag.message)))
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Sort diagnostics by position and return them.
    ///
    /// The sort is stable: diagnostics at the same position keep their
    /// insertion order. If errors were dropped by the limit, a trailing
    /// E9002 note reports how many. Clears the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| (w[0].line, w[0].column) <= (w[1].line, w[1].column));

        if !already_sorted {
            self.diagnostics.sort_by_key(|d| (d.line, d.column));
        }

        let mut result: Vec<Diagnostic> =
            self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        if self.suppressed > 0 {
            result.push(Diagnostic {
                severity: crate::Severity::Note,
                ..Diagnostic::error(ErrorCode::E9002).with_message(format!(
                    "error limit reached; {} further error(s) not shown",
                    self.suppressed
                ))
            });
        }

        self.error_count = 0;
        self.warning_count = 0;
        self.suppressed = 0;
        self.last_syntax_line = None;
        self.last_error = None;

        result
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests;
