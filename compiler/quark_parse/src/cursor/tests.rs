use super::*;
use quark_diagnostic::ErrorCode;

fn lex(source: &str) -> (TokenList, StringInterner) {
    let mut interner = StringInterner::new();
    let output = quark_lexer::lex(source, &mut interner);
    (output.tokens, interner)
}

#[test]
fn advance_stops_at_eof() {
    let (tokens, interner) = lex("a");
    let mut cursor = Cursor::new(&tokens, &interner);
    assert!(cursor.check(TokenTag::Ident));
    cursor.advance();
    assert!(cursor.is_at_end());
    cursor.advance();
    assert!(cursor.is_at_end());
}

#[test]
fn error_tokens_are_skipped() {
    let (tokens, interner) = lex("$ a $ $ ;");
    let mut cursor = Cursor::new(&tokens, &interner);
    assert!(cursor.check(TokenTag::Ident));
    cursor.advance();
    assert!(cursor.check(TokenTag::Semicolon));
    assert_eq!(cursor.previous_span(), Span::new(2, 3));
}

#[test]
fn expect_reports_expected_and_found() {
    let (tokens, interner) = lex("x");
    let mut cursor = Cursor::new(&tokens, &interner);
    let err = cursor.expect(TokenTag::Semicolon).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1001);
    assert_eq!(
        err.message(),
        "unexpected token: expected `;`, found identifier"
    );
    assert_eq!(err.span, Span::new(0, 1));
}

#[test]
fn expect_ident_returns_name_and_span() {
    let (tokens, mut interner) = lex("  total");
    let name = interner.intern("total");
    let mut cursor = Cursor::new(&tokens, &interner);
    assert_eq!(cursor.expect_ident().ok(), Some((name, Span::new(2, 7))));
}
