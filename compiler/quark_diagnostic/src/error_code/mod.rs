//! Error codes and the error-kind taxonomy.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first digit
//! indicating the compiler phase. Every code belongs to exactly one
//! [`ErrorKind`], the coarse category tooling filters on.

use std::fmt;

/// Coarse diagnostic category.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    /// A character that cannot start any token.
    InvalidCharacter,
    /// A numeric literal with a bad suffix, bad digits or an out-of-range value.
    MalformedLiteral,
    /// Token sequence does not match the grammar.
    SyntaxError,
    /// A name, type or field that is not declared.
    UndeclaredName,
    /// Two declarations with the same name in the same scope.
    DuplicateDeclaration,
    /// Types are incompatible.
    TypeMismatch,
    /// A non-void function can reach its end without returning.
    NonExhaustiveReturn,
    /// A semantically invalid construct that is not a type mismatch.
    InvalidConstruct,
    /// Code that can never execute. Warning only.
    UnreachableCode,
    /// A bug in the compiler itself.
    InternalCompilerFault,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCharacter => "InvalidCharacter",
            Self::MalformedLiteral => "MalformedLiteral",
            Self::SyntaxError => "SyntaxError",
            Self::UndeclaredName => "UndeclaredName",
            Self::DuplicateDeclaration => "DuplicateDeclaration",
            Self::TypeMismatch => "TypeMismatch",
            Self::NonExhaustiveReturn => "NonExhaustiveReturn",
            Self::InvalidConstruct => "InvalidConstruct",
            Self::UnreachableCode => "UnreachableCode",
            Self::InternalCompilerFault => "InternalCompilerFault",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Resolution and type errors (E21xx are warnings)
/// - E9xxx: Internal compiler errors and limits
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Invalid character in source
    E0001,
    /// Unknown numeric literal suffix
    E0002,
    /// Integer literal does not fit in 64 bits
    E0003,
    /// Unterminated block comment
    E0004,
    /// Malformed numeric literal
    E0005,
    /// Unterminated string literal
    E0006,
    /// Unknown escape sequence in a string literal
    E0007,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Expected type
    E1003,
    /// Expected identifier
    E1004,
    /// Expected item
    E1005,
    /// Invalid call target
    E1006,

    // Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Undeclared name
    E2002,
    /// Unknown type
    E2003,
    /// Wrong number of arguments
    E2004,
    /// Duplicate declaration
    E2005,
    /// Missing return
    E2006,
    /// Unknown struct field
    E2007,
    /// Struct passed or returned by value
    E2008,
    /// Struct contains itself by value
    E2009,
    /// Global initializer is not a constant
    E2010,
    /// Function used as a value
    E2011,
    /// Cannot infer variable type
    E2012,
    /// Address of a temporary
    E2013,
    /// Invalid assignment target
    E2014,
    /// Invalid cast
    E2015,
    /// `break` or `continue` outside a loop
    E2016,
    /// Call of a non-function
    E2017,
    /// Operator applied to unsupported operand types
    E2018,
    /// Literal out of range for its type
    E2019,

    // Warnings (E21xx)
    /// Unreachable code
    E2100,

    // Internal Errors (E9xxx)
    /// Internal compiler fault
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// Every error code, in numeric order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E0007,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E2016,
        ErrorCode::E2017,
        ErrorCode::E2018,
        ErrorCode::E2019,
        ErrorCode::E2100,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E2100 => "E2100",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// The taxonomy category this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E0001 => ErrorKind::InvalidCharacter,
            ErrorCode::E0002 | ErrorCode::E0003 | ErrorCode::E0005 | ErrorCode::E0007 => {
                ErrorKind::MalformedLiteral
            }
            ErrorCode::E0004
            | ErrorCode::E0006
            | ErrorCode::E1001
            | ErrorCode::E1002
            | ErrorCode::E1003
            | ErrorCode::E1004
            | ErrorCode::E1005
            | ErrorCode::E1006 => ErrorKind::SyntaxError,
            ErrorCode::E2002 | ErrorCode::E2003 | ErrorCode::E2007 => ErrorKind::UndeclaredName,
            ErrorCode::E2005 => ErrorKind::DuplicateDeclaration,
            ErrorCode::E2001
            | ErrorCode::E2004
            | ErrorCode::E2012
            | ErrorCode::E2015
            | ErrorCode::E2017
            | ErrorCode::E2018
            | ErrorCode::E2019 => ErrorKind::TypeMismatch,
            ErrorCode::E2006 => ErrorKind::NonExhaustiveReturn,
            ErrorCode::E2008
            | ErrorCode::E2009
            | ErrorCode::E2010
            | ErrorCode::E2011
            | ErrorCode::E2013
            | ErrorCode::E2014
            | ErrorCode::E2016 => ErrorKind::InvalidConstruct,
            ErrorCode::E2100 => ErrorKind::UnreachableCode,
            ErrorCode::E9001 | ErrorCode::E9002 => ErrorKind::InternalCompilerFault,
        }
    }

    /// Short description, used by `--explain` style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "invalid character in source",
            ErrorCode::E0002 => "unknown numeric literal suffix",
            ErrorCode::E0003 => "integer literal does not fit in 64 bits",
            ErrorCode::E0004 => "unterminated block comment",
            ErrorCode::E0005 => "malformed numeric literal",
            ErrorCode::E0006 => "unterminated string literal",
            ErrorCode::E0007 => "unknown escape sequence",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "expected type",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "expected item",
            ErrorCode::E1006 => "invalid call target",
            ErrorCode::E2001 => "type mismatch",
            ErrorCode::E2002 => "undeclared name",
            ErrorCode::E2003 => "unknown type",
            ErrorCode::E2004 => "wrong number of arguments",
            ErrorCode::E2005 => "duplicate declaration",
            ErrorCode::E2006 => "missing return",
            ErrorCode::E2007 => "unknown struct field",
            ErrorCode::E2008 => "struct passed or returned by value",
            ErrorCode::E2009 => "struct contains itself by value",
            ErrorCode::E2010 => "global initializer is not a constant",
            ErrorCode::E2011 => "function used as a value",
            ErrorCode::E2012 => "cannot infer variable type",
            ErrorCode::E2013 => "cannot take the address of a temporary",
            ErrorCode::E2014 => "invalid assignment target",
            ErrorCode::E2015 => "invalid cast",
            ErrorCode::E2016 => "`break` or `continue` outside of a loop",
            ErrorCode::E2017 => "call of a non-function",
            ErrorCode::E2018 => "unsupported operand types",
            ErrorCode::E2019 => "literal out of range for its type",
            ErrorCode::E2100 => "unreachable code",
            ErrorCode::E9001 => "internal compiler fault",
            ErrorCode::E9002 => "too many errors",
        }
    }

    /// Check if this is a parser/syntax error code (E1xxx).
    pub fn is_parser_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
                | ErrorCode::E1006
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
