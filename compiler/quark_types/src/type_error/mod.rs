//! Type checking errors and warnings.
//!
//! Errors are plain values carrying rendered type names, so they can be
//! compared in tests and converted to diagnostics without access to the pool.

use quark_diagnostic::{type_mismatch, unknown_identifier, Diagnostic, ErrorCode};
use quark_ir::Span;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeCheckError {
    pub span: Span,
    pub kind: TypeErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeErrorKind {
    /// Value of type `found` where `expected` is required.
    Mismatch {
        expected: String,
        found: String,
        context: &'static str,
    },
    UndeclaredName {
        name: String,
        suggestion: Option<String>,
    },
    UnknownType {
        name: String,
        suggestion: Option<String>,
    },
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },
    DuplicateDeclaration {
        name: String,
        previous: Span,
    },
    MissingReturn {
        function: String,
        ret: String,
    },
    UnknownField {
        ty: String,
        field: String,
        suggestion: Option<String>,
    },
    /// Structs only travel by pointer across calls.
    StructByValue {
        ty: String,
        position: &'static str,
    },
    RecursiveStruct {
        name: String,
        field: String,
    },
    NonConstantInitializer,
    FunctionAsValue {
        name: String,
    },
    /// `var x;` with neither a type nor an initializer, or a `void` variable.
    InvalidVariableType {
        name: String,
        reason: &'static str,
    },
    AddressOfTemporary,
    InvalidAssignTarget,
    InvalidCast {
        from: String,
        to: String,
    },
    JumpOutsideLoop {
        keyword: &'static str,
    },
    NotCallable {
        name: String,
        ty: String,
    },
    UnsupportedOperands {
        op: &'static str,
        operands: String,
    },
    LiteralOutOfRange {
        value: String,
        ty: String,
    },
}

impl TypeCheckError {
    pub fn new(span: Span, kind: TypeErrorKind) -> Self {
        TypeCheckError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            TypeErrorKind::Mismatch { .. } => ErrorCode::E2001,
            TypeErrorKind::UndeclaredName { .. } => ErrorCode::E2002,
            TypeErrorKind::UnknownType { .. } => ErrorCode::E2003,
            TypeErrorKind::ArityMismatch { .. } => ErrorCode::E2004,
            TypeErrorKind::DuplicateDeclaration { .. } => ErrorCode::E2005,
            TypeErrorKind::MissingReturn { .. } => ErrorCode::E2006,
            TypeErrorKind::UnknownField { .. } => ErrorCode::E2007,
            TypeErrorKind::StructByValue { .. } => ErrorCode::E2008,
            TypeErrorKind::RecursiveStruct { .. } => ErrorCode::E2009,
            TypeErrorKind::NonConstantInitializer => ErrorCode::E2010,
            TypeErrorKind::FunctionAsValue { .. } => ErrorCode::E2011,
            TypeErrorKind::InvalidVariableType { .. } => ErrorCode::E2012,
            TypeErrorKind::AddressOfTemporary => ErrorCode::E2013,
            TypeErrorKind::InvalidAssignTarget => ErrorCode::E2014,
            TypeErrorKind::InvalidCast { .. } => ErrorCode::E2015,
            TypeErrorKind::JumpOutsideLoop { .. } => ErrorCode::E2016,
            TypeErrorKind::NotCallable { .. } => ErrorCode::E2017,
            TypeErrorKind::UnsupportedOperands { .. } => ErrorCode::E2018,
            TypeErrorKind::LiteralOutOfRange { .. } => ErrorCode::E2019,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            TypeErrorKind::Mismatch {
                expected, found, ..
            } => format!("type mismatch: expected `{expected}`, found `{found}`"),
            TypeErrorKind::UndeclaredName { name, .. } => {
                format!("cannot find `{name}` in this scope")
            }
            TypeErrorKind::UnknownType { name, .. } => format!("unknown type `{name}`"),
            TypeErrorKind::ArityMismatch {
                callee,
                expected,
                found,
            } => format!(
                "`{callee}` takes {expected} argument{} but {found} {} supplied",
                if *expected == 1 { "" } else { "s" },
                if *found == 1 { "was" } else { "were" }
            ),
            TypeErrorKind::DuplicateDeclaration { name, .. } => {
                format!("`{name}` is declared more than once in this scope")
            }
            TypeErrorKind::MissingReturn { function, ret } => {
                format!("function `{function}` may end without returning a `{ret}`")
            }
            TypeErrorKind::UnknownField { ty, field, .. } => {
                format!("no field `{field}` on type `{ty}`")
            }
            TypeErrorKind::StructByValue { ty, position } => {
                format!("struct `{ty}` cannot be used by value as a {position}")
            }
            TypeErrorKind::RecursiveStruct { name, field } => {
                format!("struct `{name}` contains itself by value through field `{field}`")
            }
            TypeErrorKind::NonConstantInitializer => {
                "global initializer must be a constant literal".to_string()
            }
            TypeErrorKind::FunctionAsValue { name } => {
                format!("function `{name}` cannot be used as a value")
            }
            TypeErrorKind::InvalidVariableType { name, reason } => {
                format!("invalid type for variable `{name}`: {reason}")
            }
            TypeErrorKind::AddressOfTemporary => {
                "cannot take the address of a temporary value".to_string()
            }
            TypeErrorKind::InvalidAssignTarget => "invalid left-hand side of assignment".to_string(),
            TypeErrorKind::InvalidCast { from, to } => {
                format!("cannot cast `{from}` to `{to}`")
            }
            TypeErrorKind::JumpOutsideLoop { keyword } => {
                format!("`{keyword}` outside of a loop")
            }
            TypeErrorKind::NotCallable { name, ty } => {
                format!("`{name}` has type `{ty}` and cannot be called")
            }
            TypeErrorKind::UnsupportedOperands { op, operands } => {
                format!("operator `{op}` cannot be applied to {operands}")
            }
            TypeErrorKind::LiteralOutOfRange { value, ty } => {
                format!("literal `{value}` does not fit in `{ty}`")
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match &self.kind {
            TypeErrorKind::Mismatch {
                expected,
                found,
                context,
            } => type_mismatch(self.span, expected, found, context),
            TypeErrorKind::UndeclaredName { name, suggestion } => {
                unknown_identifier(self.span, name, suggestion.as_deref())
            }
            TypeErrorKind::UnknownType { suggestion, .. }
            | TypeErrorKind::UnknownField { suggestion, .. } => {
                let diag = self.base().with_label(self.span, "not found");
                match suggestion {
                    Some(s) => diag.with_suggestion(format!("did you mean `{s}`?")),
                    None => diag,
                }
            }
            TypeErrorKind::DuplicateDeclaration { previous, .. } => self
                .base()
                .with_label(self.span, "redeclared here")
                .with_secondary_label(*previous, "first declared here"),
            TypeErrorKind::StructByValue { .. } => self
                .base()
                .with_label(self.span, "passed by value")
                .with_suggestion("pass a pointer to the struct instead"),
            TypeErrorKind::RecursiveStruct { .. } => self
                .base()
                .with_label(self.span, "recursive without indirection")
                .with_suggestion("use a pointer to break the cycle"),
            TypeErrorKind::MissingReturn { .. } => self
                .base()
                .with_label(self.span, "control can reach the end of this function"),
            TypeErrorKind::LiteralOutOfRange { ty, .. } => self
                .base()
                .with_label(self.span, format!("out of range for `{ty}`")),
            _ => self.base().with_label(self.span, self.code().description()),
        }
    }

    fn base(&self) -> Diagnostic {
        Diagnostic::error(self.code()).with_message(self.message())
    }
}

/// Non-fatal findings.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeCheckWarning {
    /// A statement that can never execute, after the statement at `cause`.
    UnreachableCode { span: Span, cause: Span },
}

impl TypeCheckWarning {
    pub fn span(&self) -> Span {
        match self {
            TypeCheckWarning::UnreachableCode { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TypeCheckWarning::UnreachableCode { span, cause } => {
                Diagnostic::warning(ErrorCode::E2100)
                    .with_message("unreachable statement")
                    .with_label(*span, "unreachable")
                    .with_secondary_label(*cause, "any code following this is unreachable")
            }
        }
    }
}
