//! Lexer error values.
//!
//! The lexer never stops on an error: it records a [`LexError`] and keeps
//! going, so one pass reports every lexical problem in the file. Errors turn
//! into diagnostics at the stage boundary via [`LexError::to_diagnostic`].

use quark_diagnostic::{Diagnostic, ErrorCode};
use quark_ir::Span;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// A character that starts no token.
    InvalidCharacter { ch: char },
    /// U+0000 inside the source.
    NullByte,
    /// Leading UTF-8 byte order mark.
    ByteOrderMark,
    /// Suffix that is not one of `i8 .. u64`, `f32`, `f64`, or that does not
    /// apply to this literal (an integer suffix on a float).
    InvalidSuffix { suffix: String },
    /// Integer value does not fit in 64 bits.
    IntOverflow,
    /// `1e`, `2.5e+`.
    EmptyExponent,
    /// `0x`, `0b` with no digits.
    MissingDigits { radix: u32 },
    /// `0b102`.
    InvalidDigit { digit: char, radix: u32 },
    /// `/*` with no closing `*/`.
    UnterminatedBlockComment,
    /// `"` with no closing quote on the same line.
    UnterminatedString,
    /// `\q` and every other escape outside `\n \t \r \" \\`.
    UnknownEscape { escape: char },
}

impl LexError {
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::InvalidCharacter { .. }
            | LexErrorKind::NullByte
            | LexErrorKind::ByteOrderMark => ErrorCode::E0001,
            LexErrorKind::InvalidSuffix { .. } => ErrorCode::E0002,
            LexErrorKind::IntOverflow => ErrorCode::E0003,
            LexErrorKind::UnterminatedBlockComment => ErrorCode::E0004,
            LexErrorKind::UnterminatedString => ErrorCode::E0006,
            LexErrorKind::UnknownEscape { .. } => ErrorCode::E0007,
            LexErrorKind::EmptyExponent
            | LexErrorKind::MissingDigits { .. }
            | LexErrorKind::InvalidDigit { .. } => ErrorCode::E0005,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            LexErrorKind::InvalidCharacter { ch } => {
                format!("invalid character `{}`", ch.escape_debug())
            }
            LexErrorKind::NullByte => "null byte in source text".to_string(),
            LexErrorKind::ByteOrderMark => {
                "a UTF-8 byte order mark is not allowed in source files".to_string()
            }
            LexErrorKind::InvalidSuffix { suffix } => {
                format!("invalid suffix `{suffix}` for number literal")
            }
            LexErrorKind::IntOverflow => "integer literal is too large".to_string(),
            LexErrorKind::EmptyExponent => "expected at least one digit in exponent".to_string(),
            LexErrorKind::MissingDigits { radix } => {
                format!("no valid digits found for {} literal", radix_name(*radix))
            }
            LexErrorKind::InvalidDigit { digit, radix } => {
                format!("invalid digit `{digit}` in {} literal", radix_name(*radix))
            }
            LexErrorKind::UnterminatedBlockComment => "unterminated block comment".to_string(),
            LexErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            LexErrorKind::UnknownEscape { escape } => {
                format!("unknown escape sequence `\\{}`", escape.escape_debug())
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.message());
        match &self.kind {
            LexErrorKind::InvalidCharacter { .. } | LexErrorKind::NullByte => {
                diag.with_label(self.span, "not valid here")
            }
            LexErrorKind::ByteOrderMark => diag
                .with_label(self.span, "byte order mark")
                .with_suggestion("save the file as UTF-8 without a BOM"),
            LexErrorKind::InvalidSuffix { .. } => diag
                .with_label(self.span, "invalid suffix")
                .with_note("valid suffixes are i8, i16, i32, i64, u8, u16, u32, u64, f32 and f64"),
            LexErrorKind::IntOverflow => diag
                .with_label(self.span, "does not fit in 64 bits")
                .with_note("the largest integer literal is 18446744073709551615"),
            LexErrorKind::UnterminatedBlockComment => diag
                .with_label(self.span, "comment starts here")
                .with_suggestion("add `*/` to close the comment"),
            LexErrorKind::UnterminatedString => diag
                .with_label(self.span, "string starts here")
                .with_suggestion("add `\"` before the end of the line"),
            LexErrorKind::UnknownEscape { .. } => diag
                .with_label(self.span, "unknown escape")
                .with_note("valid escapes are \\n, \\t, \\r, \\\" and \\\\"),
            LexErrorKind::EmptyExponent
            | LexErrorKind::MissingDigits { .. }
            | LexErrorKind::InvalidDigit { .. } => diag.with_label(self.span, "malformed literal"),
        }
    }
}

fn radix_name(radix: u32) -> &'static str {
    match radix {
        2 => "binary",
        16 => "hexadecimal",
        _ => "decimal",
    }
}
