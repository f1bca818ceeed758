//! Token cursor for navigating the token stream.
//!
//! `Error` tokens from the lexer are invisible here: the cursor steps over
//! them, since the lexer already reported each one.

use quark_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList, TokenTag};

use crate::ParseError;

pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// `tokens` must end in `Eof`, as every lexer output does.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        debug_assert!(
            tokens.as_slice().last().map(Token::tag) == Some(TokenTag::Eof),
            "token list must end in Eof"
        );
        let mut cursor = Cursor {
            tokens,
            interner,
            pos: 0,
        };
        cursor.skip_error_tokens();
        cursor
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Index of the current token, for progress checks.
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        let tokens = self.tokens.as_slice();
        &tokens[self.pos.min(tokens.len() - 1)]
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_tag(&self) -> TokenTag {
        self.current().tag()
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the last consumed token.
    pub fn previous_span(&self) -> Span {
        self.tokens.as_slice()[..self.pos.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::Error)
            .map_or(Span::DUMMY, |t| t.span)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_tag() == TokenTag::Eof
    }

    #[inline]
    pub fn check(&self, tag: TokenTag) -> bool {
        self.current_tag() == tag
    }

    /// Consume the current token. `Eof` is never consumed.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
            self.skip_error_tokens();
        }
        token
    }

    /// Consume the current token if it has `tag`.
    pub fn eat(&mut self, tag: TokenTag) -> bool {
        if self.check(tag) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, tag: TokenTag) -> Result<&'a Token, ParseError> {
        if self.check(tag) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                tag.display_name(),
                self.current_tag(),
                self.current_span(),
            ))
        }
    }

    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.current_span();
            self.advance();
            Ok((name, span))
        } else {
            Err(ParseError::expected_ident(
                self.current_tag(),
                self.current_span(),
            ))
        }
    }

    fn skip_error_tokens(&mut self) {
        while self.current().kind == TokenKind::Error {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
