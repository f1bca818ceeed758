use super::*;

#[test]
fn category_ranges() {
    assert!(RawTag::Ident as u8 == 0);
    assert!(RawTag::Whitespace.is_trivia());
    assert!(RawTag::BlockComment.is_trivia());
    assert!(!RawTag::Semicolon.is_trivia());

    assert!(RawTag::InvalidByte.is_error());
    assert!(RawTag::UnterminatedBlockComment.is_error());
    assert!(!RawTag::Eof.is_error());
}
