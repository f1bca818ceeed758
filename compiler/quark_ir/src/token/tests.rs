use super::*;

#[test]
fn keywords_resolve() {
    assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::Fn));
    assert_eq!(TokenKind::keyword("uint16"), Some(TokenKind::Uint16));
    assert_eq!(TokenKind::keyword("float64"), Some(TokenKind::Float64));
    assert_eq!(TokenKind::keyword("function"), None);
    assert_eq!(TokenKind::keyword("Fn"), None);
}

#[test]
fn tags_ignore_payloads() {
    let a = TokenKind::Int {
        value: 1,
        suffix: None,
    };
    let b = TokenKind::Int {
        value: 99,
        suffix: Some(NumSuffix::U8),
    };
    assert_eq!(a.tag(), b.tag());
    assert_ne!(a, b);
}

#[test]
fn tag_indices_fit_in_u128_bitset() {
    assert!(TokenTag::Eof.index() < 128);
    assert_eq!(TokenTag::Int.index(), 0);
}

#[test]
fn suffix_parsing() {
    assert_eq!(NumSuffix::parse("u64"), Some(NumSuffix::U64));
    assert_eq!(NumSuffix::parse("f32"), Some(NumSuffix::F32));
    assert_eq!(NumSuffix::parse("i128"), None);
    assert!(NumSuffix::F64.is_float());
    assert!(!NumSuffix::I8.is_float());
    assert_eq!(NumSuffix::I16.as_str(), "i16");
}

#[test]
fn display_names_are_quoted_for_punctuation() {
    assert_eq!(TokenTag::Semicolon.to_string(), "`;`");
    assert_eq!(TokenTag::Ident.to_string(), "identifier");
    assert_eq!(TokenTag::Eof.to_string(), "end of file");
}

#[test]
fn token_list_collects() {
    let pos = SourcePos::default();
    let list: TokenList = [
        Token::new(TokenKind::Fn, Span::new(0, 2), pos),
        Token::new(TokenKind::Eof, Span::point(2), pos),
    ]
    .into_iter()
    .collect();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].tag(), TokenTag::Eof);
    assert_eq!(list.iter().count(), 2);
}
