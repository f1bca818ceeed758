//! Sentinel-terminated source buffer.
//!
//! The source bytes are copied into a buffer followed by a `0x00` sentinel
//! and zero padding up to the next 64-byte boundary. The scanner can then
//! read `current`, `peek` and `peek2` without bounds checks against the
//! source length: at the end of input it simply sees zeros.
//!
//! Construction also records encoding problems the scanner alone cannot
//! describe well (a UTF-8 byte order mark, interior NUL bytes). The cooking
//! layer turns them into diagnostics.

use crate::Cursor;

const CACHE_LINE: usize = 64;

/// `[source_bytes..., 0x00 sentinel, 0x00 padding...]`
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    buf: Vec<u8>,
    source_len: u32,
    encoding_issues: Vec<EncodingIssue>,
}

/// An encoding problem at `pos..pos + len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingIssue {
    pub kind: EncodingIssueKind,
    pub pos: u32,
    pub len: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingIssueKind {
    /// `EF BB BF` at offset 0.
    Utf8Bom,
    /// U+0000 inside the source.
    InteriorNull,
}

impl EncodingIssueKind {
    pub const fn message(self) -> &'static str {
        match self {
            EncodingIssueKind::Utf8Bom => "a UTF-8 byte order mark is not allowed in source files",
            EncodingIssueKind::InteriorNull => "null byte in source text",
        }
    }
}

impl SourceBuffer {
    /// Copy `source` into a padded, sentinel-terminated buffer.
    ///
    /// Sources longer than `u32::MAX` bytes saturate the recorded length;
    /// spans are 32-bit throughout the compiler.
    pub fn new(source: &str) -> Self {
        let source_bytes = source.as_bytes();
        let source_len = source_bytes.len();

        let padded_len = (source_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);
        let mut buf = vec![0u8; padded_len];
        buf[..source_len].copy_from_slice(source_bytes);

        let mut encoding_issues = Vec::new();
        detect_bom(source_bytes, &mut encoding_issues);
        detect_interior_nulls(source_bytes, &mut encoding_issues);

        SourceBuffer {
            buf,
            source_len: u32::try_from(source_len).unwrap_or(u32::MAX),
            encoding_issues,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// The whole buffer, sentinel and padding included.
    pub fn as_sentinel_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// A cursor at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// A cursor at `offset`, clamped to the source length.
    pub fn cursor_at(&self, offset: u32) -> Cursor<'_> {
        let mut cursor = self.cursor();
        cursor.advance_n(offset.min(self.source_len));
        cursor
    }

    pub fn len(&self) -> u32 {
        self.source_len
    }

    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Encoding issues in source order.
    pub fn encoding_issues(&self) -> &[EncodingIssue] {
        &self.encoding_issues
    }
}

fn detect_bom(source: &[u8], issues: &mut Vec<EncodingIssue>) {
    if source.starts_with(&[0xEF, 0xBB, 0xBF]) {
        issues.push(EncodingIssue {
            kind: EncodingIssueKind::Utf8Bom,
            pos: 0,
            len: 3,
        });
    }
}

fn detect_interior_nulls(source: &[u8], issues: &mut Vec<EncodingIssue>) {
    let mut offset = 0;
    while let Some(found) = memchr::memchr(0, &source[offset..]) {
        let absolute = offset + found;
        match u32::try_from(absolute) {
            Ok(pos) => issues.push(EncodingIssue {
                kind: EncodingIssueKind::InteriorNull,
                pos,
                len: 1,
            }),
            Err(_) => break,
        }
        offset = absolute + 1;
    }
}
