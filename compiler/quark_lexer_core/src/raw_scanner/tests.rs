use super::*;
use crate::SourceBuffer;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scan_tags(source: &str) -> Vec<RawTag> {
    tokenize(source).iter().map(|t| t.tag).collect()
}

/// Tags with their source text, trivia included.
fn scan_text(source: &str) -> Vec<(RawTag, &str)> {
    let mut offset = 0usize;
    tokenize(source)
        .into_iter()
        .map(|t| {
            let text = &source[offset..offset + t.len as usize];
            offset += t.len as usize;
            (t.tag, text)
        })
        .collect()
}

fn total_len(source: &str) -> u32 {
    tokenize(source).iter().map(|t| t.len).sum()
}

// ─── Losslessness ───────────────────────────────────────────

#[test]
fn lengths_sum_to_source_length() {
    let sources = [
        "",
        "x",
        "fn add(a: int32, b: int32) -> int32 { return a + b; }",
        "var p: *Point = &pt;\r\n  p.x = 3u8;",
        "/* block */ // line\n",
        "/* never closed",
        "1.5e-3f32 0xFF_u8 0b1010 7xyz",
        "é € \u{1F600} $ @ #",
        "a\0b",
        "\"str\\\"ing\" \"open\n\"\\é\"",
    ];
    for source in sources {
        assert_eq!(total_len(source) as usize, source.len(), "{source:?}");
    }
}

#[test]
fn every_token_is_non_empty() {
    for tok in tokenize("fn f() { while x >= 1 { x = x >> 1; } } ~!^|") {
        assert!(tok.len > 0, "{tok:?}");
    }
}

#[test]
fn eof_repeats_with_zero_length() {
    let buf = SourceBuffer::new("x");
    let mut scanner = RawScanner::new(buf.cursor());
    assert_eq!(scanner.next_token().tag, RawTag::Ident);
    for _ in 0..3 {
        assert_eq!(
            scanner.next_token(),
            RawToken {
                tag: RawTag::Eof,
                len: 0
            }
        );
    }
}

#[test]
fn every_byte_value_scans() {
    for b in 0u8..=127 {
        let source = String::from(char::from(b));
        let tokens = tokenize(&source);
        assert_eq!(tokens.len(), 1, "byte {b}");
        assert_eq!(tokens[0].len, 1, "byte {b}");
    }
}

// ─── Trivia ─────────────────────────────────────────────────

#[test]
fn whitespace_and_newlines() {
    assert_eq!(
        scan_text("  \t\n\r\n\rx"),
        vec![
            (RawTag::Whitespace, "  \t"),
            (RawTag::Newline, "\n"),
            (RawTag::Newline, "\r\n"),
            (RawTag::Whitespace, "\r"),
            (RawTag::Ident, "x"),
        ]
    );
}

#[test]
fn comments() {
    assert_eq!(
        scan_text("a // rest\n/* x * / y */b"),
        vec![
            (RawTag::Ident, "a"),
            (RawTag::Whitespace, " "),
            (RawTag::LineComment, "// rest"),
            (RawTag::Newline, "\n"),
            (RawTag::BlockComment, "/* x * / y */"),
            (RawTag::Ident, "b"),
        ]
    );
}

#[test]
fn block_comments_do_not_nest() {
    assert_eq!(
        scan_text("/* /* */ */"),
        vec![
            (RawTag::BlockComment, "/* /* */"),
            (RawTag::Whitespace, " "),
            (RawTag::Star, "*"),
            (RawTag::Slash, "/"),
        ]
    );
}

#[test]
fn unterminated_block_comment_runs_to_eof() {
    assert_eq!(
        scan_text("x /* open\nstill"),
        vec![
            (RawTag::Ident, "x"),
            (RawTag::Whitespace, " "),
            (RawTag::UnterminatedBlockComment, "/* open\nstill"),
        ]
    );
}

// ─── Operators ──────────────────────────────────────────────

#[test]
fn maximal_munch_operators() {
    assert_eq!(
        scan_tags("<<= >>= -> && || != == <= >="),
        vec![
            RawTag::Shl,
            RawTag::Equal,
            RawTag::Whitespace,
            RawTag::Shr,
            RawTag::Equal,
            RawTag::Whitespace,
            RawTag::Arrow,
            RawTag::Whitespace,
            RawTag::AmpAmp,
            RawTag::Whitespace,
            RawTag::PipePipe,
            RawTag::Whitespace,
            RawTag::BangEqual,
            RawTag::Whitespace,
            RawTag::EqualEqual,
            RawTag::Whitespace,
            RawTag::LessEqual,
            RawTag::Whitespace,
            RawTag::GreaterEqual,
        ]
    );
}

#[test]
fn single_char_tokens() {
    assert_eq!(
        scan_tags("+-*/%&|^~!=<>(){},;:."),
        vec![
            RawTag::Plus,
            RawTag::Minus,
            RawTag::Star,
            RawTag::Slash,
            RawTag::Percent,
            RawTag::Amp,
            RawTag::Pipe,
            RawTag::Caret,
            RawTag::Tilde,
            RawTag::BangEqual,
            RawTag::Less,
            RawTag::Greater,
            RawTag::LeftParen,
            RawTag::RightParen,
            RawTag::LeftBrace,
            RawTag::RightBrace,
            RawTag::Comma,
            RawTag::Semicolon,
            RawTag::Colon,
            RawTag::Dot,
        ]
    );
}

// ─── Identifiers & numbers ──────────────────────────────────

#[test]
fn identifiers() {
    assert_eq!(
        scan_text("_tmp x1 __"),
        vec![
            (RawTag::Ident, "_tmp"),
            (RawTag::Whitespace, " "),
            (RawTag::Ident, "x1"),
            (RawTag::Whitespace, " "),
            (RawTag::Ident, "__"),
        ]
    );
}

#[test]
fn numbers_include_suffix_characters() {
    assert_eq!(
        scan_text("42 1_000u64 3.25 1e9 2.5E+3f32 0xFFu8 0b1010 7xyz"),
        vec![
            (RawTag::Int, "42"),
            (RawTag::Whitespace, " "),
            (RawTag::Int, "1_000u64"),
            (RawTag::Whitespace, " "),
            (RawTag::Float, "3.25"),
            (RawTag::Whitespace, " "),
            (RawTag::Float, "1e9"),
            (RawTag::Whitespace, " "),
            (RawTag::Float, "2.5E+3f32"),
            (RawTag::Whitespace, " "),
            (RawTag::HexInt, "0xFFu8"),
            (RawTag::Whitespace, " "),
            (RawTag::BinInt, "0b1010"),
            (RawTag::Whitespace, " "),
            (RawTag::Int, "7xyz"),
        ]
    );
}

#[test]
fn dot_after_integer_without_digit_is_field_access() {
    assert_eq!(
        scan_tags("1.x"),
        vec![RawTag::Int, RawTag::Dot, RawTag::Ident]
    );
}

#[test]
fn empty_exponent_is_still_float() {
    assert_eq!(scan_text("1e;"), vec![(RawTag::Float, "1e"), (RawTag::Semicolon, ";")]);
}

// ─── Strings ────────────────────────────────────────────────

#[test]
fn strings_include_their_quotes() {
    assert_eq!(
        scan_text(r#"puts("hi");"#),
        vec![
            (RawTag::Ident, "puts"),
            (RawTag::LeftParen, "("),
            (RawTag::String, r#""hi""#),
            (RawTag::RightParen, ")"),
            (RawTag::Semicolon, ";"),
        ]
    );
}

#[test]
fn escaped_quote_does_not_end_a_string() {
    assert_eq!(
        scan_text(r#""a\"b" x"#),
        vec![
            (RawTag::String, r#""a\"b""#),
            (RawTag::Whitespace, " "),
            (RawTag::Ident, "x"),
        ]
    );
    assert_eq!(scan_tags(r#""\\" y"#), vec![RawTag::String, RawTag::Whitespace, RawTag::Ident]);
}

#[test]
fn unterminated_string_stops_at_line_end() {
    assert_eq!(
        scan_text("\"abc\nx"),
        vec![
            (RawTag::UnterminatedString, "\"abc"),
            (RawTag::Newline, "\n"),
            (RawTag::Ident, "x"),
        ]
    );
    assert_eq!(scan_text("\"abc\\"), vec![(RawTag::UnterminatedString, "\"abc\\")]);
    assert_eq!(scan_tags("\"é"), vec![RawTag::UnterminatedString]);
}

// ─── Errors ─────────────────────────────────────────────────

#[test]
fn invalid_bytes_consume_whole_characters() {
    assert_eq!(
        scan_text("$é\u{1F600}"),
        vec![
            (RawTag::InvalidByte, "$"),
            (RawTag::InvalidByte, "é"),
            (RawTag::InvalidByte, "\u{1F600}"),
        ]
    );
}

#[test]
fn interior_null_is_its_own_token() {
    assert_eq!(
        scan_tags("a\0b"),
        vec![RawTag::Ident, RawTag::InteriorNull, RawTag::Ident]
    );
}

proptest! {
    #[test]
    fn arbitrary_input_is_lossless(source in "\\PC*") {
        let tokens = tokenize(&source);
        let total: u32 = tokens.iter().map(|t| t.len).sum();
        prop_assert_eq!(total as usize, source.len());
        prop_assert!(tokens.iter().all(|t| t.len > 0));
    }

    #[test]
    fn token_boundaries_are_char_boundaries(source in "[a-z0-9 +*/.\\n\u{e9}\u{20ac}]{0,64}") {
        let mut offset = 0usize;
        for tok in tokenize(&source) {
            prop_assert!(source.is_char_boundary(offset));
            offset += tok.len as usize;
        }
        prop_assert_eq!(offset, source.len());
    }
}
