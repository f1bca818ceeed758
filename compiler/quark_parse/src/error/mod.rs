//! Parse error values.
//!
//! Each error carries what went wrong, where, and optionally what the parser
//! was in the middle of ("while parsing a struct declaration"). Errors turn
//! into diagnostics at the stage boundary via [`ParseError::to_diagnostic`].

use std::fmt;

use quark_diagnostic::{expected_expression, unexpected_token, Diagnostic, ErrorCode};
use quark_ir::{Span, TokenTag};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub context: Option<ErrorContext>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    UnexpectedToken {
        expected: &'static str,
        found: TokenTag,
    },
    ExpectedExpression {
        found: TokenTag,
    },
    ExpectedType {
        found: TokenTag,
    },
    ExpectedIdent {
        found: TokenTag,
    },
    ExpectedItem {
        found: TokenTag,
    },
    /// `(f)(x)`, `s.f(x)`: only named functions can be called.
    InvalidCallTarget,
}

/// What the parser was parsing when the error occurred.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorContext {
    FunctionDecl,
    ExternDecl,
    StructDecl,
    GlobalDecl,
    Params,
    VarDecl,
    IfStmt,
    WhileStmt,
    ReturnStmt,
    Block,
    CallArgs,
}

impl ErrorContext {
    pub const fn description(self) -> &'static str {
        match self {
            ErrorContext::FunctionDecl => "a function declaration",
            ErrorContext::ExternDecl => "an extern declaration",
            ErrorContext::StructDecl => "a struct declaration",
            ErrorContext::GlobalDecl => "a global variable",
            ErrorContext::Params => "a parameter list",
            ErrorContext::VarDecl => "a variable declaration",
            ErrorContext::IfStmt => "an if statement",
            ErrorContext::WhileStmt => "a while loop",
            ErrorContext::ReturnStmt => "a return statement",
            ErrorContext::Block => "a block",
            ErrorContext::CallArgs => "call arguments",
        }
    }
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError {
            kind,
            span,
            context: None,
        }
    }

    #[cold]
    pub fn unexpected(expected: &'static str, found: TokenTag, span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedToken { expected, found }, span)
    }

    #[cold]
    pub fn expected_expression(found: TokenTag, span: Span) -> Self {
        Self::new(ParseErrorKind::ExpectedExpression { found }, span)
    }

    #[cold]
    pub fn expected_type(found: TokenTag, span: Span) -> Self {
        Self::new(ParseErrorKind::ExpectedType { found }, span)
    }

    #[cold]
    pub fn expected_ident(found: TokenTag, span: Span) -> Self {
        Self::new(ParseErrorKind::ExpectedIdent { found }, span)
    }

    /// Attach a context unless a more specific one is already set.
    #[must_use]
    pub fn in_context(mut self, context: ErrorContext) -> Self {
        self.context.get_or_insert(context);
        self
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            ParseErrorKind::UnexpectedToken { .. } => ErrorCode::E1001,
            ParseErrorKind::ExpectedExpression { .. } => ErrorCode::E1002,
            ParseErrorKind::ExpectedType { .. } => ErrorCode::E1003,
            ParseErrorKind::ExpectedIdent { .. } => ErrorCode::E1004,
            ParseErrorKind::ExpectedItem { .. } => ErrorCode::E1005,
            ParseErrorKind::InvalidCallTarget => ErrorCode::E1006,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                format!("unexpected token: expected {expected}, found {found}")
            }
            ParseErrorKind::ExpectedExpression { found } => {
                format!("expected expression, found {found}")
            }
            ParseErrorKind::ExpectedType { found } => format!("expected type, found {found}"),
            ParseErrorKind::ExpectedIdent { found } => {
                format!("expected identifier, found {found}")
            }
            ParseErrorKind::ExpectedItem { found } => format!(
                "expected `fn`, `extern`, `struct` or `var` at top level, found {found}"
            ),
            ParseErrorKind::InvalidCallTarget => {
                "only named functions can be called".to_string()
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                unexpected_token(self.span, expected, found.display_name())
            }
            ParseErrorKind::ExpectedExpression { found } => {
                expected_expression(self.span, found.display_name())
            }
            ParseErrorKind::ExpectedType { .. } => Diagnostic::error(self.code())
                .with_message(self.message())
                .with_label(self.span, "expected type here")
                .with_note("types are int8..int64, uint8..uint64, float32, float64, bool, void, `*T` or a struct name"),
            ParseErrorKind::ExpectedIdent { .. } => Diagnostic::error(self.code())
                .with_message(self.message())
                .with_label(self.span, "expected identifier here"),
            ParseErrorKind::ExpectedItem { .. } => Diagnostic::error(self.code())
                .with_message(self.message())
                .with_label(self.span, "not an item"),
            ParseErrorKind::InvalidCallTarget => Diagnostic::error(self.code())
                .with_message(self.message())
                .with_label(self.span, "not a function name"),
        };
        match self.context {
            Some(context) => diag.with_note(format!("while parsing {}", context.description())),
            None => diag,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests;
