//! Recursive descent parser for Quark.
//!
//! Consumes a [`TokenList`] and produces a [`Module`] plus the [`ExprArena`]
//! holding every expression and statement. Binary operators are parsed by
//! precedence climbing over [`BinaryOp::precedence`](quark_ir::BinaryOp).
//!
//! Syntax errors never abort the parse: the parser records a [`ParseError`],
//! synchronizes to the next statement or item boundary, and carries on. A
//! failed parse still returns the partial module.

mod cursor;
mod error;
mod grammar;
mod recovery;

pub use cursor::Cursor;
pub use error::{ErrorContext, ParseError, ParseErrorKind};
pub use recovery::{TokenSet, ITEM_START, STMT_START};

use quark_ir::{Expr, ExprArena, ExprId, ExprKind, Module, Span, StringInterner, TokenList};

use recovery::synchronize_item;

/// Parser state for one token list.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    errors: Vec<ParseError>,
}

/// Output of [`parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub module: Module,
    pub arena: ExprArena,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            arena: ExprArena::new(),
            errors: Vec::new(),
        }
    }

    /// Parse items until end of input.
    pub fn parse_module(mut self) -> ParseOutput {
        let mut module = Module::default();
        while !self.cursor.is_at_end() {
            let before = self.cursor.position();
            match self.parse_item() {
                Ok(item) => module.items.push(item),
                Err(err) => {
                    self.errors.push(err);
                    if self.cursor.position() == before {
                        self.cursor.advance();
                    }
                    synchronize_item(&mut self.cursor);
                }
            }
        }
        ParseOutput {
            module,
            arena: self.arena,
            errors: self.errors,
        }
    }

    /// Span from `start` through the last consumed token.
    #[inline]
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    fn alloc_expr(&mut self, kind: ExprKind, start: Span) -> ExprId {
        let span = self.span_from(start);
        self.arena.alloc_expr(Expr::new(kind, span))
    }
}

/// Parse a token list into a module.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseOutput {
    let output = Parser::new(tokens, interner).parse_module();
    tracing::debug!(
        items = output.module.items.len(),
        exprs = output.arena.expr_count(),
        errors = output.errors.len(),
        "parsed"
    );
    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
