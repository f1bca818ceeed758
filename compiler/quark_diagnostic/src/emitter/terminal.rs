//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support and
//! source snippets when a [`SourceContext`] is attached.

use std::io::{self, Write};

use crate::{Diagnostic, Label, Severity};

use super::{DiagnosticEmitter, SourceContext};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const HELP: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    context: Option<SourceContext>,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            context: None,
        }
    }

    /// Render snippets and `path:line:col` locations from this file.
    #[must_use]
    pub fn with_source(mut self, context: SourceContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter {
            writer: io::stderr(),
            colors: mode.should_use_colors(is_tty),
            context: None,
        }
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        }
    }

    fn write_label(&mut self, label: &Label, severity: Severity) {
        let marker = if label.is_primary { "-->" } else { ":::" };
        let Some(ctx) = self.context.take() else {
            let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
            let color = if label.is_primary {
                Self::severity_color(severity)
            } else {
                colors::SECONDARY
            };
            self.write_colored(&label.message, color);
            let _ = writeln!(self.writer);
            return;
        };

        let (line, col) = ctx.position(label.span);
        let gutter = line.to_string().len();
        let pad = " ".repeat(gutter);
        let _ = writeln!(self.writer, "{pad}{marker} {}:{line}:{col}", ctx.path);
        let _ = writeln!(self.writer, "{pad} |");
        if let Some(text) = ctx.line_text(line) {
            let _ = writeln!(self.writer, "{line} | {text}");
            let available = text.chars().count().saturating_sub(col as usize - 1);
            let width = (label.span.len() as usize).clamp(1, available.max(1));
            let underline_char = if label.is_primary { "^" } else { "-" };
            let underline = underline_char.repeat(width);
            let _ = write!(self.writer, "{pad} | {}", " ".repeat(col as usize - 1));
            let color = if label.is_primary {
                Self::severity_color(severity)
            } else {
                colors::SECONDARY
            };
            self.write_colored(&format!("{underline} {}", label.message), color);
            let _ = writeln!(self.writer);
        }
        self.context = Some(ctx);
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: severity[CODE]: message
        self.write_colored(
            diagnostic.severity.as_str(),
            Self::severity_color(diagnostic.severity),
        );
        if self.colors {
            let _ = write!(
                self.writer,
                "{}[{}]{}",
                colors::BOLD,
                diagnostic.code,
                colors::RESET
            );
        } else {
            let _ = write!(self.writer, "[{}]", diagnostic.code);
        }
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            self.write_label(label, diagnostic.severity);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }

        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.write_colored("help", colors::HELP);
            let _ = writeln!(self.writer, ": {suggestion}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count == 0 && warning_count == 0 {
            return;
        }

        if error_count > 0 {
            self.write_colored("error", colors::ERROR);
            let error_part = if error_count == 1 {
                "previous error".to_string()
            } else {
                format!("{error_count} previous errors")
            };
            if warning_count > 0 {
                let _ = writeln!(
                    self.writer,
                    ": aborting due to {error_part}; {warning_count} warning{} emitted",
                    plural_s(warning_count)
                );
            } else {
                let _ = writeln!(self.writer, ": aborting due to {error_part}");
            }
        } else {
            self.write_colored("warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {warning_count} warning{} emitted",
                plural_s(warning_count)
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use pretty_assertions::assert_eq;
    use quark_ir::Span;

    fn render(diag: &Diagnostic, context: Option<SourceContext>) -> String {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
        if let Some(ctx) = context {
            emitter = emitter.with_source(ctx);
        }
        emitter.emit(diag);
        emitter.flush();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn renders_snippet_with_underline() {
        let source = "fn f() -> int32 { return y; }";
        let diag = Diagnostic::error(ErrorCode::E2002)
            .with_message("cannot find `y` in this scope")
            .with_label(Span::new(25, 26), "not found in this scope");
        let text = render(&diag, Some(SourceContext::new("main.qrk", source)));
        let expected = format!(
            "error[E2002]: cannot find `y` in this scope\n \
             --> main.qrk:1:26\n  |\n\
             1 | fn f() -> int32 {{ return y; }}\n  | {}^ not found in this scope\n\n",
            " ".repeat(25)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn renders_raw_spans_without_source() {
        let diag = Diagnostic::warning(ErrorCode::E2100)
            .with_message("unreachable code")
            .with_label(Span::new(3, 9), "never executed")
            .with_note("previous statement always returns");
        let text = render(&diag, None);
        assert!(text.starts_with("warning[E2100]: unreachable code\n"));
        assert!(text.contains("  --> 3..9: never executed\n"));
        assert!(text.contains("  = note: previous statement always returns\n"));
    }

    #[test]
    fn summary_counts() {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, ColorMode::Never, false);
        emitter.emit_summary(2, 1);
        emitter.emit_summary(0, 3);
        emitter.emit_summary(0, 0);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "error: aborting due to 2 previous errors; 1 warning emitted\n\
             warning: 3 warnings emitted\n"
        );
    }

    #[test]
    fn color_mode_resolution() {
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
    }
}
