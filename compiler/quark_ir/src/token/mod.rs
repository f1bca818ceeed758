//! Tokens produced by the lexer.
//!
//! [`TokenKind`] carries payloads (literal values, interned identifiers);
//! [`TokenTag`] is its payload-free discriminant, used by the parser's
//! recovery sets and by fast `check` comparisons.

use std::fmt;
use std::ops::Index;

use crate::{Name, Span};

/// Numeric literal type suffix (`5u8`, `1.5f32`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NumSuffix {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumSuffix {
    /// Parse a suffix as written in source.
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// 1-based line and column plus 0-based byte offset of a token's first byte.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

/// Token kinds.
///
/// Float literal values are stored as `u64` bits so the enum stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    Int { value: u64, suffix: Option<NumSuffix> },
    Float { bits: u64, suffix: Option<NumSuffix> },
    /// String literal; the name holds the text with escapes resolved.
    Str(Name),
    Ident(Name),

    // Keywords
    Fn,
    Extern,
    Struct,
    Var,
    If,
    Else,
    While,
    Return,
    Break,
    Continue,
    True,
    False,
    As,

    // Type keywords
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    Void,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Arrow,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Tilde,
    Bang,
    BangEq,
    Eq,
    EqEq,
    Lt,
    LtEq,
    Shl,
    Gt,
    GtEq,
    Shr,

    // Trivia, only produced when the lexer runs in trivia mode
    Whitespace,
    Comment,

    /// Placeholder for input the lexer rejected. A diagnostic was already
    /// recorded for it.
    Error,
    Eof,
}

/// Payload-free discriminant of [`TokenKind`], indexable into a bitset.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum TokenTag {
    Int,
    Float,
    Str,
    Ident,
    Fn,
    Extern,
    Struct,
    Var,
    If,
    Else,
    While,
    Return,
    Break,
    Continue,
    True,
    False,
    As,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    Void,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Arrow,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Tilde,
    Bang,
    BangEq,
    Eq,
    EqEq,
    Lt,
    LtEq,
    Shl,
    Gt,
    GtEq,
    Shr,
    Whitespace,
    Comment,
    Error,
    Eof,
}

impl TokenKind {
    /// Look up a reserved word.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "fn" => Self::Fn,
            "extern" => Self::Extern,
            "struct" => Self::Struct,
            "var" => Self::Var,
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "return" => Self::Return,
            "break" => Self::Break,
            "continue" => Self::Continue,
            "true" => Self::True,
            "false" => Self::False,
            "as" => Self::As,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "bool" => Self::Bool,
            "void" => Self::Void,
            _ => return None,
        })
    }

    pub const fn tag(&self) -> TokenTag {
        match self {
            Self::Int { .. } => TokenTag::Int,
            Self::Float { .. } => TokenTag::Float,
            Self::Str(_) => TokenTag::Str,
            Self::Ident(_) => TokenTag::Ident,
            Self::Fn => TokenTag::Fn,
            Self::Extern => TokenTag::Extern,
            Self::Struct => TokenTag::Struct,
            Self::Var => TokenTag::Var,
            Self::If => TokenTag::If,
            Self::Else => TokenTag::Else,
            Self::While => TokenTag::While,
            Self::Return => TokenTag::Return,
            Self::Break => TokenTag::Break,
            Self::Continue => TokenTag::Continue,
            Self::True => TokenTag::True,
            Self::False => TokenTag::False,
            Self::As => TokenTag::As,
            Self::Int8 => TokenTag::Int8,
            Self::Int16 => TokenTag::Int16,
            Self::Int32 => TokenTag::Int32,
            Self::Int64 => TokenTag::Int64,
            Self::Uint8 => TokenTag::Uint8,
            Self::Uint16 => TokenTag::Uint16,
            Self::Uint32 => TokenTag::Uint32,
            Self::Uint64 => TokenTag::Uint64,
            Self::Float32 => TokenTag::Float32,
            Self::Float64 => TokenTag::Float64,
            Self::Bool => TokenTag::Bool,
            Self::Void => TokenTag::Void,
            Self::LParen => TokenTag::LParen,
            Self::RParen => TokenTag::RParen,
            Self::LBrace => TokenTag::LBrace,
            Self::RBrace => TokenTag::RBrace,
            Self::Comma => TokenTag::Comma,
            Self::Semicolon => TokenTag::Semicolon,
            Self::Colon => TokenTag::Colon,
            Self::Dot => TokenTag::Dot,
            Self::Arrow => TokenTag::Arrow,
            Self::Plus => TokenTag::Plus,
            Self::Minus => TokenTag::Minus,
            Self::Star => TokenTag::Star,
            Self::Slash => TokenTag::Slash,
            Self::Percent => TokenTag::Percent,
            Self::Amp => TokenTag::Amp,
            Self::AmpAmp => TokenTag::AmpAmp,
            Self::Pipe => TokenTag::Pipe,
            Self::PipePipe => TokenTag::PipePipe,
            Self::Caret => TokenTag::Caret,
            Self::Tilde => TokenTag::Tilde,
            Self::Bang => TokenTag::Bang,
            Self::BangEq => TokenTag::BangEq,
            Self::Eq => TokenTag::Eq,
            Self::EqEq => TokenTag::EqEq,
            Self::Lt => TokenTag::Lt,
            Self::LtEq => TokenTag::LtEq,
            Self::Shl => TokenTag::Shl,
            Self::Gt => TokenTag::Gt,
            Self::GtEq => TokenTag::GtEq,
            Self::Shr => TokenTag::Shr,
            Self::Whitespace => TokenTag::Whitespace,
            Self::Comment => TokenTag::Comment,
            Self::Error => TokenTag::Error,
            Self::Eof => TokenTag::Eof,
        }
    }

    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl TokenTag {
    /// Human-readable description for "expected X, found Y" messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Int => "integer literal",
            Self::Float => "float literal",
            Self::Str => "string literal",
            Self::Ident => "identifier",
            Self::Fn => "`fn`",
            Self::Extern => "`extern`",
            Self::Struct => "`struct`",
            Self::Var => "`var`",
            Self::If => "`if`",
            Self::Else => "`else`",
            Self::While => "`while`",
            Self::Return => "`return`",
            Self::Break => "`break`",
            Self::Continue => "`continue`",
            Self::True => "`true`",
            Self::False => "`false`",
            Self::As => "`as`",
            Self::Int8 => "`int8`",
            Self::Int16 => "`int16`",
            Self::Int32 => "`int32`",
            Self::Int64 => "`int64`",
            Self::Uint8 => "`uint8`",
            Self::Uint16 => "`uint16`",
            Self::Uint32 => "`uint32`",
            Self::Uint64 => "`uint64`",
            Self::Float32 => "`float32`",
            Self::Float64 => "`float64`",
            Self::Bool => "`bool`",
            Self::Void => "`void`",
            Self::LParen => "`(`",
            Self::RParen => "`)`",
            Self::LBrace => "`{`",
            Self::RBrace => "`}`",
            Self::Comma => "`,`",
            Self::Semicolon => "`;`",
            Self::Colon => "`:`",
            Self::Dot => "`.`",
            Self::Arrow => "`->`",
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Percent => "`%`",
            Self::Amp => "`&`",
            Self::AmpAmp => "`&&`",
            Self::Pipe => "`|`",
            Self::PipePipe => "`||`",
            Self::Caret => "`^`",
            Self::Tilde => "`~`",
            Self::Bang => "`!`",
            Self::BangEq => "`!=`",
            Self::Eq => "`=`",
            Self::EqEq => "`==`",
            Self::Lt => "`<`",
            Self::LtEq => "`<=`",
            Self::Shl => "`<<`",
            Self::Gt => "`>`",
            Self::GtEq => "`>=`",
            Self::Shr => "`>>`",
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::Error => "invalid token",
            Self::Eof => "end of file",
        }
    }

    /// Bit index for [`TokenTag`] sets.
    #[inline]
    pub const fn index(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for TokenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A token with its source location.
///
/// `span` delimits the exact source slice; `pos` is the line/column of the
/// first byte, precomputed by the lexer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub pos: SourcePos,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span, pos: SourcePos) -> Self {
        Token { kind, span, pos }
    }

    #[inline]
    pub const fn tag(&self) -> TokenTag {
        self.kind.tag()
    }
}

/// Ordered list of tokens, always terminated by exactly one `Eof` token once
/// produced by the lexer.
#[derive(Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            tokens: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenList {
            tokens: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
