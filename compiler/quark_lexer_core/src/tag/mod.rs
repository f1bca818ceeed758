//! Raw token tags.
//!
//! Discriminants are grouped into ranges so category checks are a single
//! comparison:
//!
//! | Range | Category |
//! |---|---|
//! | 0-15 | identifiers and literals |
//! | 32-63 | operators |
//! | 80-95 | delimiters |
//! | 112-119 | trivia |
//! | 240-247 | errors |
//! | 255 | end of input |

/// What kind of token a byte run is, without payload.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum RawTag {
    // Identifiers & literals
    Ident = 0,
    /// Decimal integer, including any trailing suffix characters.
    Int = 1,
    /// Decimal float (has `.` or an exponent), including suffix characters.
    Float = 2,
    /// `0x...`, including suffix characters.
    HexInt = 3,
    /// `0b...`, including suffix characters.
    BinInt = 4,
    /// `"..."`, quotes included; escapes are not yet validated.
    String = 5,

    // Operators
    Plus = 32,
    Minus = 33,
    Star = 34,
    Slash = 35,
    Percent = 36,
    Amp = 37,
    AmpAmp = 38,
    Pipe = 39,
    PipePipe = 40,
    Caret = 41,
    Tilde = 42,
    Bang = 43,
    BangEqual = 44,
    Equal = 45,
    EqualEqual = 46,
    Less = 47,
    LessEqual = 48,
    Shl = 49,
    Greater = 50,
    GreaterEqual = 51,
    Shr = 52,
    Arrow = 53,

    // Delimiters
    LeftParen = 80,
    RightParen = 81,
    LeftBrace = 82,
    RightBrace = 83,
    Comma = 84,
    Semicolon = 85,
    Colon = 86,
    Dot = 87,

    // Trivia
    /// Spaces, tabs, and lone `\r`.
    Whitespace = 112,
    /// `\n` or `\r\n`.
    Newline = 113,
    /// `// ...` up to (not including) the newline.
    LineComment = 114,
    /// `/* ... */`, non-nesting.
    BlockComment = 115,

    // Errors
    /// A byte (or whole UTF-8 character) that starts no token.
    InvalidByte = 240,
    /// A NUL byte inside the source content.
    InteriorNull = 241,
    /// `/*` without a closing `*/`; runs to end of input.
    UnterminatedBlockComment = 242,
    /// `"` with no closing quote before the end of the line.
    UnterminatedString = 243,

    Eof = 255,
}

impl RawTag {
    #[inline]
    pub const fn is_trivia(self) -> bool {
        matches!(self as u8, 112..=119)
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        matches!(self as u8, 240..=247)
    }
}

/// One raw token: a tag and a byte length. Position is implicit (running sum).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}

const _: () = assert!(std::mem::size_of::<RawToken>() == 8);

#[cfg(test)]
mod tests;
