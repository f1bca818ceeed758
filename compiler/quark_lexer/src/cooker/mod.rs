//! Token cooking: raw `(RawTag, len)` pairs into parser-ready [`TokenKind`]s.
//!
//! ```text
//! source -> RawScanner -> (RawTag, len) -> TokenCooker -> TokenKind
//! ```
//!
//! - operators and delimiters map 1:1
//! - identifiers go through keyword lookup, then the interner
//! - numeric literals are parsed and their suffix validated
//! - string literals have their escapes resolved and are interned
//! - error tags record a [`LexError`] and become `TokenKind::Error`
//!
//! Trivia tags cook to `Whitespace` / `Comment`; the [`Lexer`](crate::Lexer)
//! drops them unless it runs in trivia mode.

use quark_ir::{NumSuffix, Span, StringInterner, TokenKind};
use quark_lexer_core::{EncodingIssue, EncodingIssueKind, RawTag};

use crate::cook_escape::unescape_string;
use crate::lex_error::{LexError, LexErrorKind};
use crate::parse_helpers::{float_body_len, parse_float_skip_underscores, parse_int_skip_underscores};

/// Stateless per token; accumulates errors for the whole file.
pub(crate) struct TokenCooker<'src> {
    source: &'src str,
    encoding_issues: Vec<EncodingIssue>,
    errors: Vec<LexError>,
}

impl<'src> TokenCooker<'src> {
    pub(crate) fn new(source: &'src str, encoding_issues: &[EncodingIssue]) -> Self {
        TokenCooker {
            source,
            encoding_issues: encoding_issues.to_vec(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub(crate) fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    /// Cook the raw token at `offset..offset + len`.
    pub(crate) fn cook(
        &mut self,
        tag: RawTag,
        offset: u32,
        len: u32,
        interner: &mut StringInterner,
    ) -> TokenKind {
        match tag {
            RawTag::Ident => self.cook_ident(offset, len, interner),
            RawTag::Int => self.cook_decimal_int(offset, len),
            RawTag::Float => self.cook_float(offset, len),
            RawTag::HexInt => self.cook_radix_int(offset, len, 16),
            RawTag::BinInt => self.cook_radix_int(offset, len, 2),
            RawTag::String => self.cook_string(offset, len, interner),

            RawTag::Plus => TokenKind::Plus,
            RawTag::Minus => TokenKind::Minus,
            RawTag::Star => TokenKind::Star,
            RawTag::Slash => TokenKind::Slash,
            RawTag::Percent => TokenKind::Percent,
            RawTag::Amp => TokenKind::Amp,
            RawTag::AmpAmp => TokenKind::AmpAmp,
            RawTag::Pipe => TokenKind::Pipe,
            RawTag::PipePipe => TokenKind::PipePipe,
            RawTag::Caret => TokenKind::Caret,
            RawTag::Tilde => TokenKind::Tilde,
            RawTag::Bang => TokenKind::Bang,
            RawTag::BangEqual => TokenKind::BangEq,
            RawTag::Equal => TokenKind::Eq,
            RawTag::EqualEqual => TokenKind::EqEq,
            RawTag::Less => TokenKind::Lt,
            RawTag::LessEqual => TokenKind::LtEq,
            RawTag::Shl => TokenKind::Shl,
            RawTag::Greater => TokenKind::Gt,
            RawTag::GreaterEqual => TokenKind::GtEq,
            RawTag::Shr => TokenKind::Shr,
            RawTag::Arrow => TokenKind::Arrow,

            RawTag::LeftParen => TokenKind::LParen,
            RawTag::RightParen => TokenKind::RParen,
            RawTag::LeftBrace => TokenKind::LBrace,
            RawTag::RightBrace => TokenKind::RBrace,
            RawTag::Comma => TokenKind::Comma,
            RawTag::Semicolon => TokenKind::Semicolon,
            RawTag::Colon => TokenKind::Colon,
            RawTag::Dot => TokenKind::Dot,

            RawTag::Whitespace | RawTag::Newline => TokenKind::Whitespace,
            RawTag::LineComment | RawTag::BlockComment => TokenKind::Comment,
            RawTag::UnterminatedBlockComment => {
                self.push(span(offset, 2), LexErrorKind::UnterminatedBlockComment);
                TokenKind::Comment
            }

            RawTag::UnterminatedString => {
                self.push(span(offset, len), LexErrorKind::UnterminatedString);
                TokenKind::Error
            }

            RawTag::InvalidByte | RawTag::InteriorNull => self.cook_invalid(offset, len),
            RawTag::Eof => TokenKind::Eof,
        }
    }

    fn push(&mut self, span: Span, kind: LexErrorKind) {
        self.errors.push(LexError::new(span, kind));
    }

    fn text(&self, offset: u32, len: u32) -> &'src str {
        self.source
            .get(offset as usize..(offset + len) as usize)
            .unwrap_or("")
    }

    fn issue_at(&self, offset: u32) -> Option<EncodingIssueKind> {
        self.encoding_issues
            .binary_search_by_key(&offset, |issue| issue.pos)
            .ok()
            .map(|i| self.encoding_issues[i].kind)
    }

    fn cook_invalid(&mut self, offset: u32, len: u32) -> TokenKind {
        let kind = match self.issue_at(offset) {
            Some(EncodingIssueKind::Utf8Bom) => LexErrorKind::ByteOrderMark,
            Some(EncodingIssueKind::InteriorNull) => LexErrorKind::NullByte,
            None => {
                let ch = self.text(offset, len).chars().next().unwrap_or('\u{FFFD}');
                LexErrorKind::InvalidCharacter { ch }
            }
        };
        self.push(span(offset, len), kind);
        TokenKind::Error
    }

    fn cook_ident(&mut self, offset: u32, len: u32, interner: &mut StringInterner) -> TokenKind {
        let text = self.text(offset, len);
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(interner.intern(text)))
    }

    fn cook_string(&mut self, offset: u32, len: u32, interner: &mut StringInterner) -> TokenKind {
        let text = self.text(offset, len);
        let content = text
            .get(1..text.len().saturating_sub(1))
            .unwrap_or("");
        let content_offset = offset + 1;
        if let Some(pos) = content.find('\0') {
            self.push(span(content_offset + pos as u32, 1), LexErrorKind::NullByte);
        }
        let name = match unescape_string(content, content_offset, &mut self.errors) {
            Some(unescaped) => interner.intern(&unescaped),
            None => interner.intern(content),
        };
        TokenKind::Str(name)
    }

    fn cook_decimal_int(&mut self, offset: u32, len: u32) -> TokenKind {
        let text = self.text(offset, len);
        let body_len = text
            .bytes()
            .take_while(|b| b.is_ascii_digit() || *b == b'_')
            .count();
        let (body, suffix_text) = text.split_at(body_len);
        let suffix_span = span(offset + body_len as u32, len - body_len as u32);

        match self.suffix(suffix_text, suffix_span) {
            Some(suffix) if suffix.is_float() => {
                let value = parse_float_skip_underscores(body).unwrap_or(0.0);
                TokenKind::Float {
                    bits: value.to_bits(),
                    suffix: Some(suffix),
                }
            }
            suffix => {
                let value = self.int_value(body, 10, span(offset, len));
                TokenKind::Int { value, suffix }
            }
        }
    }

    fn cook_radix_int(&mut self, offset: u32, len: u32, radix: u32) -> TokenKind {
        let text = self.text(offset, len);
        let digits = &text[2..];
        let body_len = digits
            .chars()
            .take_while(|c| *c == '_' || c.is_digit(radix))
            .count();
        let (body, suffix_text) = digits.split_at(body_len);
        let whole = span(offset, len);

        if body.bytes().all(|b| b == b'_') {
            self.push(whole, LexErrorKind::MissingDigits { radix });
            return TokenKind::Int {
                value: 0,
                suffix: None,
            };
        }
        if let Some(digit) = suffix_text.chars().next().filter(char::is_ascii_digit) {
            self.push(whole, LexErrorKind::InvalidDigit { digit, radix });
            return TokenKind::Int {
                value: 0,
                suffix: None,
            };
        }

        let suffix_span = span(offset + 2 + body_len as u32, suffix_text.len() as u32);
        let suffix = match self.suffix(suffix_text, suffix_span) {
            Some(s) if s.is_float() => {
                self.push(
                    suffix_span,
                    LexErrorKind::InvalidSuffix {
                        suffix: suffix_text.to_string(),
                    },
                );
                None
            }
            other => other,
        };
        let value = self.int_value(body, radix, whole);
        TokenKind::Int { value, suffix }
    }

    fn cook_float(&mut self, offset: u32, len: u32) -> TokenKind {
        let text = self.text(offset, len);
        let body_len = float_body_len(text);
        let (body, suffix_text) = text.split_at(body_len);
        let suffix_span = span(offset + body_len as u32, len - body_len as u32);

        let suffix = match self.suffix(suffix_text, suffix_span) {
            Some(s) if !s.is_float() => {
                self.push(
                    suffix_span,
                    LexErrorKind::InvalidSuffix {
                        suffix: suffix_text.to_string(),
                    },
                );
                None
            }
            other => other,
        };

        let value = if let Some(v) = parse_float_skip_underscores(body) {
            v
        } else {
            self.push(span(offset, body_len as u32), LexErrorKind::EmptyExponent);
            0.0
        };
        TokenKind::Float {
            bits: value.to_bits(),
            suffix,
        }
    }

    /// Validate a suffix; an unknown one is reported and dropped.
    fn suffix(&mut self, text: &str, suffix_span: Span) -> Option<NumSuffix> {
        if text.is_empty() {
            return None;
        }
        let parsed = NumSuffix::parse(text);
        if parsed.is_none() {
            self.push(
                suffix_span,
                LexErrorKind::InvalidSuffix {
                    suffix: text.to_string(),
                },
            );
        }
        parsed
    }

    fn int_value(&mut self, body: &str, radix: u32, literal_span: Span) -> u64 {
        if let Some(value) = parse_int_skip_underscores(body, radix) {
            value
        } else {
            self.push(literal_span, LexErrorKind::IntOverflow);
            0
        }
    }
}

#[inline]
fn span(offset: u32, len: u32) -> Span {
    Span::new(offset, offset + len)
}
