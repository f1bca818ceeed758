//! Hand-written raw scanner producing `(RawTag, len)` pairs.
//!
//! Dispatch is on the first byte. Each arm advances the cursor over one token
//! and returns its tag and length. The sentinel byte dispatches to `eof`,
//! which also handles interior NUL bytes. Errors are tags, never `Err`.
//!
//! Numeric literals are scanned greedily: after the digits, every following
//! identifier character is part of the same token. `12u8`, `3.5f32` and the
//! malformed `7xyz` are all one token; the cooking layer splits off and
//! validates the suffix.

use crate::cursor::Cursor;
use crate::tag::{RawTag, RawToken};

/// Allocation-free scanner over a [`Cursor`].
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> RawScanner<'a> {
    pub fn new(cursor: Cursor<'a>) -> Self {
        RawScanner { cursor }
    }

    /// Byte offset of the next token.
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Produce the next raw token. After the end of input, keeps returning
    /// `Eof` with `len == 0`.
    pub fn next_token(&mut self) -> RawToken {
        let start = self.cursor.pos();
        match self.cursor.current() {
            0 => self.eof(start),
            b' ' | b'\t' => self.whitespace(start),
            b'\r' => self.carriage_return(start),
            b'\n' => self.single(start, RawTag::Newline),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(start),
            b'0'..=b'9' => self.number(start),
            b'"' => self.string(start),
            b'/' => self.slash_or_comment(start),
            b'+' => self.single(start, RawTag::Plus),
            b'-' => self.one_or_two(start, b'>', RawTag::Minus, RawTag::Arrow),
            b'*' => self.single(start, RawTag::Star),
            b'%' => self.single(start, RawTag::Percent),
            b'^' => self.single(start, RawTag::Caret),
            b'~' => self.single(start, RawTag::Tilde),
            b'&' => self.one_or_two(start, b'&', RawTag::Amp, RawTag::AmpAmp),
            b'|' => self.one_or_two(start, b'|', RawTag::Pipe, RawTag::PipePipe),
            b'!' => self.one_or_two(start, b'=', RawTag::Bang, RawTag::BangEqual),
            b'=' => self.one_or_two(start, b'=', RawTag::Equal, RawTag::EqualEqual),
            b'<' => self.angle(start, RawTag::Less, RawTag::LessEqual, RawTag::Shl),
            b'>' => self.angle(start, RawTag::Greater, RawTag::GreaterEqual, RawTag::Shr),
            b'(' => self.single(start, RawTag::LeftParen),
            b')' => self.single(start, RawTag::RightParen),
            b'{' => self.single(start, RawTag::LeftBrace),
            b'}' => self.single(start, RawTag::RightBrace),
            b',' => self.single(start, RawTag::Comma),
            b';' => self.single(start, RawTag::Semicolon),
            b':' => self.single(start, RawTag::Colon),
            b'.' => self.single(start, RawTag::Dot),
            _ => self.invalid(start),
        }
    }

    #[inline]
    fn token(&self, tag: RawTag, start: u32) -> RawToken {
        RawToken {
            tag,
            len: self.cursor.pos() - start,
        }
    }

    fn eof(&mut self, start: u32) -> RawToken {
        if self.cursor.is_eof() {
            return RawToken {
                tag: RawTag::Eof,
                len: 0,
            };
        }
        self.cursor.advance();
        self.token(RawTag::InteriorNull, start)
    }

    // ─── Trivia ─────────────────────────────────────────────────

    fn whitespace(&mut self, start: u32) -> RawToken {
        self.cursor.eat_whitespace();
        self.token(RawTag::Whitespace, start)
    }

    fn carriage_return(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == b'\n' {
            self.cursor.advance();
            self.token(RawTag::Newline, start)
        } else {
            self.token(RawTag::Whitespace, start)
        }
    }

    fn slash_or_comment(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        match self.cursor.current() {
            b'/' => {
                self.cursor.eat_until_newline_or_eof();
                self.token(RawTag::LineComment, start)
            }
            b'*' => {
                self.cursor.advance();
                if self.cursor.eat_block_comment_body() {
                    self.token(RawTag::BlockComment, start)
                } else {
                    self.token(RawTag::UnterminatedBlockComment, start)
                }
            }
            _ => self.token(RawTag::Slash, start),
        }
    }

    // ─── Identifiers & operators ────────────────────────────────

    fn identifier(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        self.token(RawTag::Ident, start)
    }

    fn single(&mut self, start: u32, tag: RawTag) -> RawToken {
        self.cursor.advance();
        self.token(tag, start)
    }

    /// `x` or `x<second>`.
    fn one_or_two(&mut self, start: u32, second: u8, one: RawTag, two: RawTag) -> RawToken {
        self.cursor.advance();
        if self.cursor.current() == second {
            self.cursor.advance();
            self.token(two, start)
        } else {
            self.token(one, start)
        }
    }

    /// `<`, `<=`, `<<` and the `>` family.
    fn angle(&mut self, start: u32, bare: RawTag, with_eq: RawTag, doubled: RawTag) -> RawToken {
        let first = self.cursor.current();
        self.cursor.advance();
        match self.cursor.current() {
            b'=' => {
                self.cursor.advance();
                self.token(with_eq, start)
            }
            b if b == first => {
                self.cursor.advance();
                self.token(doubled, start)
            }
            _ => self.token(bare, start),
        }
    }

    // ─── Numeric literals ───────────────────────────────────────

    fn number(&mut self, start: u32) -> RawToken {
        let first = self.cursor.current();
        self.cursor.advance();

        if first == b'0' && matches!(self.cursor.current(), b'x' | b'X') {
            self.cursor.advance();
            self.cursor.eat_while(is_ident_continue);
            return self.token(RawTag::HexInt, start);
        }
        if first == b'0' && matches!(self.cursor.current(), b'b' | b'B') {
            self.cursor.advance();
            self.cursor.eat_while(is_ident_continue);
            return self.token(RawTag::BinInt, start);
        }

        self.eat_decimal_digits();
        let mut is_float = false;

        // `1.x` is an integer followed by `.`; a fraction needs a digit.
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.eat_decimal_digits();
            is_float = true;
        }
        if matches!(self.cursor.current(), b'e' | b'E') && self.exponent_follows() {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            self.eat_decimal_digits();
            is_float = true;
        }

        // Suffix characters, valid or not.
        self.cursor.eat_while(is_ident_continue);
        self.token(if is_float { RawTag::Float } else { RawTag::Int }, start)
    }

    /// `e` starts an exponent unless it starts an identifier-like suffix
    /// (`1else` is not an exponent). A bare `e` at the end is an empty
    /// exponent, reported by the cooking layer.
    fn exponent_follows(&self) -> bool {
        match self.cursor.peek() {
            b'0'..=b'9' | b'+' | b'-' => true,
            b => !is_ident_continue(b),
        }
    }

    fn eat_decimal_digits(&mut self) {
        self.cursor.eat_while(|b| b.is_ascii_digit() || b == b'_');
    }

    // ─── String literals ────────────────────────────────────────

    /// A string ends at its closing quote. A line break or EOF first makes
    /// it unterminated; the token then stops before the line break.
    fn string(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        loop {
            match self.cursor.skip_to_string_delim() {
                b'"' => {
                    self.cursor.advance();
                    return self.token(RawTag::String, start);
                }
                b'\\' => {
                    self.cursor.advance();
                    if !matches!(self.cursor.current(), b'\n' | b'\r') && !self.cursor.is_eof() {
                        self.cursor.advance_char();
                    }
                }
                _ => return self.token(RawTag::UnterminatedString, start),
            }
        }
    }

    // ─── Errors ─────────────────────────────────────────────────

    /// One whole character that starts no token.
    fn invalid(&mut self, start: u32) -> RawToken {
        self.cursor.advance_char();
        self.token(RawTag::InvalidByte, start)
    }
}

impl Iterator for RawScanner<'_> {
    type Item = RawToken;

    fn next(&mut self) -> Option<RawToken> {
        let tok = self.next_token();
        (tok.tag != RawTag::Eof).then_some(tok)
    }
}

static IS_IDENT_CONTINUE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = matches!(
            i as u8,
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_'
        );
        i += 1;
    }
    table
};

#[inline]
fn is_ident_continue(b: u8) -> bool {
    IS_IDENT_CONTINUE_TABLE[b as usize]
}

/// Scan `source` into raw tokens, excluding the final `Eof`.
pub fn tokenize(source: &str) -> Vec<RawToken> {
    let buf = crate::SourceBuffer::new(source);
    RawScanner::new(buf.cursor()).collect()
}

#[cfg(test)]
mod tests;
