//! JSON Emitter
//!
//! Machine-readable diagnostic output: one JSON array of flat records.

use std::io::Write;

use crate::Diagnostic;

use super::{escape_json, trailing_comma, DiagnosticEmitter, SourceContext};

/// JSON emitter for machine-readable output.
pub struct JsonEmitter<W: Write> {
    writer: W,
    first: bool,
    context: Option<SourceContext>,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        JsonEmitter {
            writer,
            first: true,
            context: None,
        }
    }

    /// Resolve spans against this file.
    #[must_use]
    pub fn with_source(mut self, context: SourceContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Begin the JSON array output.
    pub fn begin(&mut self) {
        let _ = writeln!(self.writer, "[");
    }

    /// End the JSON array output.
    pub fn end(&mut self) {
        let _ = writeln!(self.writer, "\n]");
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if !self.first {
            let _ = writeln!(self.writer, ",");
        }
        self.first = false;

        let span = diagnostic.primary_span();
        let (line, column) = match (&self.context, span) {
            (Some(ctx), Some(span)) => ctx.position(span),
            _ => (0, 0),
        };
        let file = self.context.as_ref().map_or("", |ctx| ctx.path.as_str());

        // Built by hand: the record is flat and small.
        let _ = writeln!(self.writer, "  {{");
        let _ = writeln!(
            self.writer,
            "    \"severity\": \"{}\",",
            diagnostic.severity.as_str()
        );
        let _ = writeln!(self.writer, "    \"file\": \"{}\",", escape_json(file));
        let _ = writeln!(self.writer, "    \"line\": {line},");
        let _ = writeln!(self.writer, "    \"column\": {column},");
        if let Some(span) = span {
            let _ = writeln!(self.writer, "    \"start\": {},", span.start);
            let _ = writeln!(self.writer, "    \"end\": {},", span.end);
        }
        let _ = writeln!(
            self.writer,
            "    \"message\": \"{}\",",
            escape_json(&diagnostic.message)
        );
        let _ = writeln!(self.writer, "    \"kind\": \"{}\",", diagnostic.kind());
        let _ = writeln!(self.writer, "    \"code\": \"{}\",", diagnostic.code);

        let _ = writeln!(self.writer, "    \"notes\": [");
        for (i, note) in diagnostic.notes.iter().enumerate() {
            let comma = trailing_comma(i, diagnostic.notes.len());
            let _ = writeln!(self.writer, "      \"{}\"{}", escape_json(note), comma);
        }
        let _ = writeln!(self.writer, "    ],");

        let _ = writeln!(self.writer, "    \"suggestions\": [");
        for (i, suggestion) in diagnostic.suggestions.iter().enumerate() {
            let comma = trailing_comma(i, diagnostic.suggestions.len());
            let _ = writeln!(
                self.writer,
                "      \"{}\"{}",
                escape_json(suggestion),
                comma
            );
        }
        let _ = writeln!(self.writer, "    ]");

        let _ = write!(self.writer, "  }}");
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, _error_count: usize, _warning_count: usize) {
        // The record stream carries everything; no summary line.
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use quark_ir::Span;

    #[test]
    fn record_has_structured_fields() {
        let mut output = Vec::new();
        let source = "fn f() -> int32 {\n  return y;\n}";
        let mut emitter =
            JsonEmitter::new(&mut output).with_source(SourceContext::new("src/main.qrk", source));

        let diag = Diagnostic::error(ErrorCode::E2002)
            .with_message("cannot find `y` in this scope")
            .with_label(Span::new(27, 28), "not found in this scope");

        emitter.begin();
        emitter.emit(&diag);
        emitter.end();
        emitter.flush();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"severity\": \"error\""));
        assert!(text.contains("\"file\": \"src/main.qrk\""));
        assert!(text.contains("\"line\": 2,"));
        assert!(text.contains("\"column\": 10,"));
        assert!(text.contains("\"kind\": \"UndeclaredName\""));
        assert!(text.contains("\"code\": \"E2002\""));
        assert!(text.contains("cannot find `y` in this scope"));
    }

    #[test]
    fn multiple_records_are_comma_separated() {
        let mut output = Vec::new();
        let mut emitter = JsonEmitter::new(&mut output);

        emitter.begin();
        emitter.emit(&Diagnostic::error(ErrorCode::E1001).with_message("error 1"));
        emitter.emit(&Diagnostic::warning(ErrorCode::E2100).with_message("warning 1"));
        emitter.end();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("[\n"));
        assert!(text.contains("},\n  {"));
        assert!(text.contains("\"severity\": \"warning\""));
        assert!(text.contains("\"kind\": \"UnreachableCode\""));
        assert!(text.trim_end().ends_with(']'));
    }
}
