//! Operator and cast typing.

use quark_ir::{BinaryOp, ExprId, ExprKind, Span, UnaryOp};

use super::super::ModuleChecker;
use crate::{Idx, TypeErrorKind};

impl ModuleChecker<'_> {
    pub(super) fn check_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        hint: Option<Idx>,
        span: Span,
    ) -> Idx {
        if op.is_logical() {
            let l = self.check_expr(left, Some(Idx::BOOL));
            let r = self.check_expr(right, Some(Idx::BOOL));
            if l.is_error() || r.is_error() {
                return Idx::BOOL;
            }
            if l != Idx::BOOL || r != Idx::BOOL {
                self.unsupported(op.as_symbol(), l, r, span);
            }
            return Idx::BOOL;
        }

        // Comparisons produce `bool`, so their hint says nothing about the
        // operands.
        let hint = if op.is_comparison() { None } else { hint };
        let (l, r) = if self.is_adaptable_literal(left) && !self.is_adaptable_literal(right) {
            let r = self.check_expr(right, hint);
            (self.check_expr(left, Some(r)), r)
        } else {
            let l = self.check_expr(left, hint);
            (l, self.check_expr(right, Some(l)))
        };
        if l.is_error() || r.is_error() {
            return if op.is_comparison() { Idx::BOOL } else { Idx::ERROR };
        }

        let Some(common) = self.unify(left, l, right, r) else {
            self.unsupported(op.as_symbol(), l, r, span);
            return if op.is_comparison() { Idx::BOOL } else { Idx::ERROR };
        };

        let allowed = if op.is_equality() {
            self.pool.is_numeric(common) || common == Idx::BOOL || self.pool.is_pointer(common)
        } else if op.is_integer_only() {
            self.pool.is_int(common)
        } else {
            self.pool.is_numeric(common)
        };
        if !allowed {
            self.unsupported(op.as_symbol(), l, r, span);
            return if op.is_comparison() { Idx::BOOL } else { Idx::ERROR };
        }
        if op.is_comparison() {
            Idx::BOOL
        } else {
            common
        }
    }

    /// Bring two operand types to a common type, recording the widening of
    /// whichever side converts.
    fn unify(&mut self, left: ExprId, l: Idx, right: ExprId, r: Idx) -> Option<Idx> {
        if l == r {
            Some(l)
        } else if self.pool.can_widen(l, r) {
            self.coercions.insert(left, r);
            Some(r)
        } else if self.pool.can_widen(r, l) {
            self.coercions.insert(right, l);
            Some(l)
        } else {
            None
        }
    }

    fn unsupported(&mut self, op: &'static str, l: Idx, r: Idx, span: Span) {
        let operands = format!("`{}` and `{}`", self.display(l), self.display(r));
        self.error(span, TypeErrorKind::UnsupportedOperands { op, operands });
    }

    pub(super) fn check_unary(
        &mut self,
        op: UnaryOp,
        operand: ExprId,
        hint: Option<Idx>,
        span: Span,
    ) -> Idx {
        let arena = self.arena;
        let operand_expr = arena.get_expr(operand);
        let ty = match (op, &operand_expr.kind) {
            (UnaryOp::Neg, ExprKind::Int { value, suffix }) => {
                let ty = self.check_int_literal(*value, *suffix, hint, true, operand_expr.span);
                self.expr_types[operand.index()] = ty;
                ty
            }
            (UnaryOp::Not, _) => self.check_expr(operand, Some(Idx::BOOL)),
            _ => self.check_expr(operand, hint),
        };
        if ty.is_error() {
            return Idx::ERROR;
        }
        let allowed = match op {
            UnaryOp::Neg => self.pool.is_signed_int(ty) || self.pool.is_float(ty),
            UnaryOp::Not => ty == Idx::BOOL,
            UnaryOp::BitNot => self.pool.is_int(ty),
        };
        if allowed {
            ty
        } else {
            let operands = format!("`{}`", self.display(ty));
            self.error(
                span,
                TypeErrorKind::UnsupportedOperands {
                    op: op.as_symbol(),
                    operands,
                },
            );
            Idx::ERROR
        }
    }

    pub(super) fn check_cast(&mut self, from: Idx, to: Idx, span: Span) -> Idx {
        if from.is_error() || to.is_error() {
            return to;
        }
        if self.cast_is_valid(from, to) {
            return to;
        }
        let kind = TypeErrorKind::InvalidCast {
            from: self.display(from),
            to: self.display(to),
        };
        self.error(span, kind);
        Idx::ERROR
    }

    fn cast_is_valid(&self, from: Idx, to: Idx) -> bool {
        let pool = &self.pool;
        let is_word = |ty: Idx| ty == Idx::INT64 || ty == Idx::UINT64;
        from == to
            || (pool.is_numeric(from) && pool.is_numeric(to))
            || (from == Idx::BOOL && pool.is_int(to))
            || (pool.is_pointer(from) && pool.is_pointer(to))
            || (pool.is_pointer(from) && is_word(to))
            || (is_word(from) && pool.is_pointer(to))
    }
}
