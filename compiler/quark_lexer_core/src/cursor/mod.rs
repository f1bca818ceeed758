//! Byte cursor over a [`SourceBuffer`](crate::SourceBuffer).
//!
//! The cursor is `Copy`, so the scanner can snapshot it for free. Reads never
//! check the source length: the buffer guarantees a `0x00` sentinel and zero
//! padding after the content.

/// Forward-only position in a sentinel-terminated buffer.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
    source_len: u32,
}

impl<'a> Cursor<'a> {
    /// `buf` must hold `source_len` content bytes followed by at least one
    /// `0x00` byte.
    pub fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            buf.len() > source_len as usize,
            "buffer must contain a sentinel after the source"
        );
        Cursor {
            buf,
            pos: 0,
            source_len,
        }
    }

    #[inline]
    pub fn current(&self) -> u8 {
        self.byte_at(self.pos)
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte_at(self.pos + 1)
    }

    #[inline]
    pub fn peek2(&self) -> u8 {
        self.byte_at(self.pos + 2)
    }

    /// Reads past the padding return the sentinel value.
    #[inline]
    fn byte_at(&self, index: u32) -> u8 {
        self.buf.get(index as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// At the sentinel. An interior NUL is not EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Source text in `start..end`.
    ///
    /// Both ends must be character boundaries inside the content, which
    /// holds for every boundary the scanner produces. A range that is not
    /// valid UTF-8 yields `""`.
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(start <= end && end <= self.source_len);
        std::str::from_utf8(&self.buf[start as usize..end as usize]).unwrap_or("")
    }

    /// Advance while `pred` holds. `pred(0)` must be `false`.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance over spaces and tabs.
    #[inline]
    pub fn eat_whitespace(&mut self) {
        self.eat_while(|b| b == b' ' || b == b'\t');
    }

    /// Width in bytes of the UTF-8 character led by `byte`; 1 for ASCII,
    /// continuation and invalid bytes.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one whole character, never beyond the content.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.pos = (self.pos + width).min(self.source_len.max(self.pos + 1));
    }

    /// Move to the next `\n`, or to EOF if there is none.
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memchr(b'\n', remaining) {
            Some(offset) => self.pos += offset as u32,
            None => self.pos = self.source_len,
        }
    }

    /// Move to the next `"`, `\\`, `\n` or `\r` inside a string literal and
    /// return it, or return 0 at EOF.
    pub fn skip_to_string_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        let primary = memchr::memchr3(b'"', b'\\', b'\n', remaining);
        let cr = memchr::memchr(b'\r', remaining);
        let offset = match (primary, cr) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (found, None) | (None, found) => found,
        };
        match offset {
            Some(offset) => {
                self.pos += offset as u32;
                self.buf[self.pos as usize]
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Move just past the next `*/`. Returns `false` (cursor at EOF) if the
    /// comment is never closed.
    pub fn eat_block_comment_body(&mut self) -> bool {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        match memchr::memmem::find(remaining, b"*/") {
            Some(offset) => {
                self.pos += offset as u32 + 2;
                true
            }
            None => {
                self.pos = self.source_len;
                false
            }
        }
    }
}
