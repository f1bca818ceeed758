use super::*;
use quark_diagnostic::ErrorKind;

#[test]
fn every_kind_is_a_syntax_error() {
    let span = Span::new(3, 4);
    let errors = [
        ParseError::unexpected("`;`", TokenTag::RBrace, span),
        ParseError::expected_expression(TokenTag::Semicolon, span),
        ParseError::expected_type(TokenTag::Int, span),
        ParseError::expected_ident(TokenTag::LParen, span),
        ParseError::new(
            ParseErrorKind::ExpectedItem {
                found: TokenTag::Return,
            },
            span,
        ),
        ParseError::new(ParseErrorKind::InvalidCallTarget, span),
    ];
    for err in errors {
        let diag = err.to_diagnostic();
        assert_eq!(diag.kind(), ErrorKind::SyntaxError, "{err:?}");
        assert_eq!(diag.code, err.code());
        assert_eq!(diag.primary_span(), Some(span));
        assert_eq!(diag.message, err.message());
    }
}

#[test]
fn first_context_wins() {
    let err = ParseError::expected_expression(TokenTag::RParen, Span::new(0, 1))
        .in_context(ErrorContext::CallArgs)
        .in_context(ErrorContext::FunctionDecl);
    assert_eq!(err.context, Some(ErrorContext::CallArgs));
    let diag = err.to_diagnostic();
    assert_eq!(diag.notes, vec!["while parsing call arguments".to_string()]);
}
