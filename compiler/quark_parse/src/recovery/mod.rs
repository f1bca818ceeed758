//! Error recovery: token sets and synchronization.
//!
//! After a syntax error the parser skips tokens until it reaches a point
//! where parsing can resume, so one pass reports many independent errors.

use quark_ir::TokenTag;

use crate::Cursor;

/// Set of token tags as a bitset; membership is one AND.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TokenSet(u128);

const _: () = assert!((TokenTag::Eof as u32) < 128);

impl TokenSet {
    pub const fn new() -> Self {
        TokenSet(0)
    }

    #[must_use]
    pub const fn with(self, tag: TokenTag) -> Self {
        TokenSet(self.0 | (1u128 << tag.index()))
    }

    #[inline]
    pub const fn contains(self, tag: TokenTag) -> bool {
        self.0 & (1u128 << tag.index()) != 0
    }
}

/// Tokens that can start a top-level item.
pub const ITEM_START: TokenSet = TokenSet::new()
    .with(TokenTag::Fn)
    .with(TokenTag::Extern)
    .with(TokenTag::Struct)
    .with(TokenTag::Var)
    .with(TokenTag::Eof);

/// Keywords that start a statement.
pub const STMT_START: TokenSet = TokenSet::new()
    .with(TokenTag::Var)
    .with(TokenTag::If)
    .with(TokenTag::While)
    .with(TokenTag::Return)
    .with(TokenTag::Break)
    .with(TokenTag::Continue);

/// Statement-level recovery: skip to just past the next `;`, or to the `}`
/// closing the current block, or to a statement keyword. Nested braces are
/// skipped as a unit.
pub fn synchronize_stmt(cursor: &mut Cursor<'_>) {
    let mut depth = 0u32;
    while !cursor.is_at_end() {
        let tag = cursor.current_tag();
        match tag {
            TokenTag::Semicolon if depth == 0 => {
                cursor.advance();
                return;
            }
            TokenTag::RBrace if depth == 0 => return,
            TokenTag::RBrace => depth -= 1,
            TokenTag::LBrace => depth += 1,
            _ if depth == 0 && STMT_START.contains(tag) => return,
            _ => {}
        }
        cursor.advance();
    }
}

/// Item-level recovery: skip to the next item keyword outside any braces.
/// A brace-delimited body is skipped whole, so `var` inside a broken
/// function is not mistaken for a global.
pub fn synchronize_item(cursor: &mut Cursor<'_>) {
    let mut depth = 0u32;
    while !cursor.is_at_end() {
        let tag = cursor.current_tag();
        match tag {
            TokenTag::LBrace => depth += 1,
            TokenTag::RBrace => depth = depth.saturating_sub(1),
            _ if depth == 0 && ITEM_START.contains(tag) => return,
            _ => {}
        }
        cursor.advance();
    }
}
