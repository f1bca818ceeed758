//! Lexer for Quark.
//!
//! Two layers:
//! - `quark_lexer_core::RawScanner` splits bytes into `(RawTag, len)` pairs,
//!   trivia included
//! - the cooker here resolves keywords, interns identifiers, parses numeric
//!   values and records [`LexError`]s
//!
//! [`Lexer`] is the lazy, restartable interface: an iterator of [`Token`]s
//! ending in exactly one `Eof`. [`lex`] is the batch entry point the driver
//! uses.

mod cook_escape;
mod cooker;
mod lex_error;
mod parse_helpers;

pub use lex_error::{LexError, LexErrorKind};

use quark_ir::{SourcePos, Span, StringInterner, Token, TokenKind, TokenList};
use quark_lexer_core::{RawScanner, RawTag, SourceBuffer};

use cooker::TokenCooker;

/// Lazy token stream over one source text.
///
/// Lexing errors never stop the stream; each offending span yields a
/// `TokenKind::Error` token (for invalid characters) and a [`LexError`].
pub struct Lexer<'a> {
    source: &'a str,
    buf: SourceBuffer,
    cooker: TokenCooker<'a>,
    interner: &'a mut StringInterner,
    pos: u32,
    line: u32,
    column: u32,
    trivia: bool,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut StringInterner) -> Self {
        Self::at_offset(source, 0, interner)
    }

    /// Start lexing at byte `offset`. An offset inside a multi-byte character
    /// moves back to that character's start; one past the end is clamped.
    pub fn at_offset(source: &'a str, offset: u32, interner: &'a mut StringInterner) -> Self {
        let mut start = (offset as usize).min(source.len());
        while !source.is_char_boundary(start) {
            start -= 1;
        }
        let before = &source[..start];
        let line = 1 + before.bytes().filter(|&b| b == b'\n').count() as u32;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = 1 + before[line_start..].chars().count() as u32;

        let buf = SourceBuffer::new(source);
        let cooker = TokenCooker::new(source, buf.encoding_issues());
        Lexer {
            source,
            buf,
            cooker,
            interner,
            pos: start as u32,
            line,
            column,
            trivia: false,
            done: false,
        }
    }

    /// Keep whitespace and comment tokens in the stream.
    #[must_use]
    pub fn with_trivia(mut self, trivia: bool) -> Self {
        self.trivia = trivia;
        self
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        self.cooker.errors()
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.cooker.into_errors()
    }

    fn advance_position(&mut self, tag: RawTag, text: &str) {
        match tag {
            RawTag::Newline => {
                self.line += 1;
                self.column = 1;
            }
            RawTag::BlockComment | RawTag::UnterminatedBlockComment => {
                for ch in text.chars() {
                    if ch == '\n' {
                        self.line += 1;
                        self.column = 1;
                    } else {
                        self.column += 1;
                    }
                }
            }
            _ => self.column += text.chars().count() as u32,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.done {
                return None;
            }
            let start = self.pos;
            let raw = RawScanner::new(self.buf.cursor_at(start)).next_token();
            let pos = SourcePos {
                line: self.line,
                column: self.column,
                offset: start,
            };

            if raw.tag == RawTag::Eof {
                self.done = true;
                return Some(Token::new(TokenKind::Eof, Span::point(start), pos));
            }

            let end = start + raw.len;
            let kind = self.cooker.cook(raw.tag, start, raw.len, self.interner);
            let text = self.source.get(start as usize..end as usize).unwrap_or("");
            self.advance_position(raw.tag, text);
            self.pos = end;

            if kind.is_trivia() && !self.trivia {
                continue;
            }
            return Some(Token::new(kind, Span::new(start, end), pos));
        }
    }
}

/// Output of [`lex`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexOutput {
    /// Non-trivia tokens ending in `Eof`.
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex a whole source text.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn lex(source: &str, interner: &mut StringInterner) -> LexOutput {
    let mut lexer = Lexer::new(source, interner);
    let tokens: TokenList = lexer.by_ref().collect();
    let errors = lexer.into_errors();
    tracing::debug!(tokens = tokens.len(), errors = errors.len(), "lexed");
    LexOutput { tokens, errors }
}
