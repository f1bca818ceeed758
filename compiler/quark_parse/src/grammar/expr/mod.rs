//! Expression parsing.
//!
//! Assignment is parsed on top of a precedence-climbing loop for binary
//! operators; casts, prefix operators and postfix field access bind tighter
//! than any binary operator.
//!
//! # Module Structure
//!
//! - `mod.rs`: `parse_expr`, assignment, the climbing loop, unary/postfix/primary
//! - `operators.rs`: token to operator mapping

mod operators;

use quark_ir::{BinaryOp, ExprId, ExprKind, TokenKind, TokenTag};
use quark_stack::ensure_sufficient_stack;

use crate::{ErrorContext, ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    /// Parse an expression, including assignment.
    ///
    /// Uses `ensure_sufficient_stack` so deeply nested input cannot overflow
    /// the native stack.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assign())
    }

    /// `binary ('=' assignment)?`, right-associative.
    fn parse_assign(&mut self) -> Result<ExprId, ParseError> {
        let target = self.parse_binary(BinaryOp::MIN_PRECEDENCE)?;
        if !self.cursor.eat(TokenTag::Eq) {
            return Ok(target);
        }
        let start = self.arena.get_expr(target).span;
        let value = self.parse_expr()?;
        Ok(self.alloc_expr(ExprKind::Assign { target, value }, start))
    }

    /// Precedence climbing: fold operators binding at least as tightly as
    /// `min_prec`. The right operand is parsed at `prec + 1`, making every
    /// binary operator left-associative.
    fn parse_binary(&mut self, min_prec: u8) -> Result<ExprId, ParseError> {
        let mut left = self.parse_cast()?;
        while let Some(op) = self.match_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let right = self.parse_binary(prec + 1)?;
            let start = self.arena.get_expr(left).span;
            left = self.alloc_expr(ExprKind::Binary { op, left, right }, start);
        }
        Ok(left)
    }

    /// `unary ('as' type)*`
    fn parse_cast(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_unary()?;
        while self.cursor.eat(TokenTag::As) {
            let ty = self.parse_type()?;
            let start = self.arena.get_expr(expr).span;
            expr = self.alloc_expr(ExprKind::Cast { expr, ty }, start);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        if let Some(op) = self.match_unary_op() {
            self.cursor.advance();
            let operand = ensure_sufficient_stack(|| self.parse_unary())?;
            return Ok(self.alloc_expr(ExprKind::Unary { op, operand }, start));
        }
        match self.cursor.current_kind() {
            TokenKind::Star => {
                self.cursor.advance();
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                Ok(self.alloc_expr(ExprKind::Deref(operand), start))
            }
            TokenKind::Amp => {
                self.cursor.advance();
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                Ok(self.alloc_expr(ExprKind::AddressOf(operand), start))
            }
            _ => self.parse_postfix(),
        }
    }

    /// `primary ('.' IDENT | '(' args ')')*`
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = self.arena.get_expr(expr).span;
            match self.cursor.current_kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let (field, field_span) = self.cursor.expect_ident()?;
                    expr = self.alloc_expr(
                        ExprKind::Field {
                            base: expr,
                            field,
                            field_span,
                        },
                        start,
                    );
                }
                TokenKind::LParen => {
                    // Only a plain name can be called; the arguments are still
                    // parsed so the rest of the statement stays in sync.
                    let paren = self.cursor.current_span();
                    self.parse_call_args()?;
                    self.errors.push(ParseError::new(
                        ParseErrorKind::InvalidCallTarget,
                        start.merge(paren),
                    ));
                    expr = self.alloc_expr(ExprKind::Error, start);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Int { value, suffix } => {
                self.cursor.advance();
                ExprKind::Int { value, suffix }
            }
            TokenKind::Float { bits, suffix } => {
                self.cursor.advance();
                ExprKind::Float { bits, suffix }
            }
            TokenKind::True => {
                self.cursor.advance();
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.cursor.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                ExprKind::Str(name)
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                if self.cursor.check(TokenTag::LParen) {
                    let args = self.parse_call_args()?;
                    ExprKind::Call {
                        callee: name,
                        callee_span: start,
                        args,
                    }
                } else {
                    ExprKind::Ident(name)
                }
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(TokenTag::RParen)?;
                return Ok(inner);
            }
            _ => {
                return Err(ParseError::expected_expression(
                    self.cursor.current_tag(),
                    start,
                ))
            }
        };
        Ok(self.alloc_expr(kind, start))
    }

    /// `'(' (expr (',' expr)* ','?)? ')'`
    fn parse_call_args(&mut self) -> Result<Vec<ExprId>, ParseError> {
        self.cursor.expect(TokenTag::LParen)?;
        let mut args = Vec::new();
        while !self.cursor.check(TokenTag::RParen) && !self.cursor.is_at_end() {
            let arg = self
                .parse_expr()
                .map_err(|e| e.in_context(ErrorContext::CallArgs))?;
            args.push(arg);
            if !self.cursor.eat(TokenTag::Comma) {
                break;
            }
        }
        self.cursor
            .expect(TokenTag::RParen)
            .map_err(|e| e.in_context(ErrorContext::CallArgs))?;
        Ok(args)
    }
}
