//! Escape processing for string literals.
//!
//! Valid escapes are `\n` `\t` `\r` `\"` `\\`. Anything else is recorded as
//! an error and cooked to U+FFFD so lexing can continue. There is no `\0`:
//! string literals become NUL-terminated data, so they may not contain NUL.

use quark_ir::Span;

use crate::lex_error::{LexError, LexErrorKind};

/// Resolve the escapes in a string literal's content (between the quotes).
///
/// Returns `None` when the content has no backslash, so the caller can
/// intern the source slice directly.
pub(crate) fn unescape_string(
    content: &str,
    base_offset: u32,
    errors: &mut Vec<LexError>,
) -> Option<String> {
    if !content.contains('\\') {
        return None;
    }

    let mut result = String::with_capacity(content.len());
    let mut chars = content.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        let start = base_offset + i as u32;
        match chars.next() {
            Some((_, 'n')) => result.push('\n'),
            Some((_, 't')) => result.push('\t'),
            Some((_, 'r')) => result.push('\r'),
            Some((_, '"')) => result.push('"'),
            Some((_, '\\')) => result.push('\\'),
            Some((j, other)) => {
                let end = base_offset + (j + other.len_utf8()) as u32;
                errors.push(LexError::new(
                    Span::new(start, end),
                    LexErrorKind::UnknownEscape { escape: other },
                ));
                result.push('\u{FFFD}');
            }
            // A terminated string never ends in a lone backslash.
            None => {
                errors.push(LexError::new(
                    Span::new(start, start + 1),
                    LexErrorKind::UnknownEscape { escape: '\\' },
                ));
            }
        }
    }
    Some(result)
}
