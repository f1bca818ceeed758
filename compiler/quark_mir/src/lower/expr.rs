//! Expressions.

use quark_diagnostic::InternalCompilerFault;
use quark_ir::{BinaryOp, ExprId, ExprKind, Name, Span, UnaryOp};
use quark_stack::ensure_sufficient_stack;
use quark_types::{Idx, StorageClass};

use super::env::{merge_into, Incoming};
use super::{fault, FunctionLowerer};
use crate::ir::{Constant, IrType, VarId};

type LowerResult<T> = Result<T, InternalCompilerFault>;

impl FunctionLowerer<'_> {
    /// Lower an expression and apply the implicit widening the checker
    /// recorded for it.
    pub(super) fn lower_value(&mut self, id: ExprId) -> LowerResult<VarId> {
        let value = self.lower_expr(id)?;
        match self.typed.coercions.get(&id) {
            Some(&target) => {
                let span = self.arena.get_expr(id).span;
                let to = self.scalar_type(target, span)?;
                Ok(self.builder.emit_cast(value, to))
            }
            None => Ok(value),
        }
    }

    /// Lower an expression to its value, or to its address when it has
    /// struct type.
    pub(super) fn lower_expr(&mut self, id: ExprId) -> LowerResult<VarId> {
        ensure_sufficient_stack(|| self.lower_expr_inner(id))
    }

    fn lower_expr_inner(&mut self, id: ExprId) -> LowerResult<VarId> {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        let ty = self.typed.expr_type(id);
        match &expr.kind {
            ExprKind::Int { value, .. } => {
                let ir_ty = self.scalar_type(ty, expr.span)?;
                Ok(self.builder.emit_const(ir_ty, Constant::Int(*value)))
            }
            ExprKind::Float { bits, .. } => {
                let ir_ty = self.scalar_type(ty, expr.span)?;
                Ok(self.builder.emit_const(ir_ty, Constant::Float(*bits)))
            }
            ExprKind::Bool(b) => Ok(self.builder.emit_const(IrType::Bool, Constant::Bool(*b))),
            ExprKind::Str(value) => Ok(self.builder.emit_str_addr(*value)),
            ExprKind::Ident(_) => {
                let symbol = self
                    .typed
                    .resolution(id)
                    .ok_or_else(|| fault("unresolved identifier", expr.span))?;
                if let Some(value) = self.env.lookup(symbol) {
                    return Ok(value);
                }
                let ptr = self.lower_place(id)?;
                self.load_unless_struct(ptr, ty, expr.span)
            }
            ExprKind::Binary { op, left, right } if op.is_logical() => {
                self.lower_short_circuit(*op, *left, *right)
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.lower_value(*left)?;
                let rhs = self.lower_value(*right)?;
                let operand_ty = self.builder.var_type(lhs);
                Ok(self.builder.emit_binop(*op, operand_ty, lhs, rhs))
            }
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } if is_numeric_literal(&arena.get_expr(*operand).kind) => {
                let ir_ty = self.scalar_type(ty, expr.span)?;
                let value = match arena.get_expr(*operand).kind {
                    ExprKind::Float { bits, .. } => Constant::Float((-f64::from_bits(bits)).to_bits()),
                    ExprKind::Int { value, .. } if ir_ty.is_float() => {
                        Constant::Float((-(value as f64)).to_bits())
                    }
                    ExprKind::Int { value, .. } => {
                        Constant::Int(ir_ty.canonical(0u64.wrapping_sub(value)))
                    }
                    _ => return Err(fault("negated literal changed kind", expr.span)),
                };
                Ok(self.builder.emit_const(ir_ty, value))
            }
            ExprKind::Unary { op, operand } => {
                let value = self.lower_value(*operand)?;
                let ir_ty = self.scalar_type(ty, expr.span)?;
                Ok(self.builder.emit_unary(*op, ir_ty, value))
            }
            ExprKind::Deref(_) | ExprKind::Field { .. } => {
                let ptr = self.lower_place(id)?;
                self.load_unless_struct(ptr, ty, expr.span)
            }
            ExprKind::AddressOf(inner) => self.lower_place(*inner),
            ExprKind::Call {
                callee,
                callee_span,
                args,
            } => self
                .lower_call(id, *callee, *callee_span, args)?
                .ok_or_else(|| fault("value of a `void` call", expr.span)),
            ExprKind::Assign { target, value } => self.lower_assign(*target, *value, expr.span),
            ExprKind::Cast { expr: inner, .. } => {
                let value = self.lower_value(*inner)?;
                let to = self.scalar_type(ty, expr.span)?;
                Ok(self.builder.emit_cast(value, to))
            }
            ExprKind::Error => Err(fault("error expression reached lowering", expr.span)),
        }
    }

    fn load_unless_struct(
        &mut self,
        ptr: VarId,
        ty: Idx,
        span: Span,
    ) -> LowerResult<VarId> {
        if self.typed.pool.as_struct(ty).is_some() {
            return Ok(ptr);
        }
        let ir_ty = self.scalar_type(ty, span)?;
        Ok(self.builder.emit_load(ir_ty, ptr))
    }

    /// `a && b` and `a || b` as a conditional branch; `b` is evaluated only
    /// on the path that needs it.
    fn lower_short_circuit(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    ) -> LowerResult<VarId> {
        let lhs = self.lower_value(left)?;
        let rhs_bb = self.builder.new_block();
        let short_bb = self.builder.new_block();
        let merge = self.builder.new_block();
        let is_or = op == BinaryOp::Or;
        if is_or {
            self.builder.terminate_cond_branch(lhs, short_bb, rhs_bb);
        } else {
            self.builder.terminate_cond_branch(lhs, rhs_bb, short_bb);
        }
        let pre = self.env.clone();

        self.builder.position_at(short_bb);
        let short = self.builder.emit_const(IrType::Bool, Constant::Bool(is_or));
        let short_edge = Incoming {
            block: short_bb,
            env: pre.clone(),
            args: vec![short],
        };

        self.builder.position_at(rhs_bb);
        let rhs = self.lower_value(right)?;
        let rhs_edge = Incoming {
            block: self.builder.current_block(),
            env: self.env.clone(),
            args: vec![rhs],
        };

        let result = self.builder.add_block_param(merge, IrType::Bool);
        self.env = merge_into(&mut self.builder, merge, &pre, &[short_edge, rhs_edge]);
        Ok(result)
    }

    /// Returns `None` for `void` callees.
    pub(super) fn lower_call(
        &mut self,
        id: ExprId,
        callee: Name,
        span: Span,
        args: &[ExprId],
    ) -> LowerResult<Option<VarId>> {
        let symbol = self
            .typed
            .resolution(id)
            .ok_or_else(|| fault("unresolved call", span))?;
        let sym = self.typed.symbols.get(symbol);
        if sym.storage != StorageClass::Function {
            return Err(fault("call to a non-function", span));
        }
        let info = self
            .typed
            .functions
            .get(&callee)
            .ok_or_else(|| fault("callee has no signature", span))?;
        let ret = super::ir_type(self.typed, info.ret);

        let mut values = Vec::with_capacity(args.len());
        for &arg in args {
            values.push(self.lower_value(arg)?);
        }
        Ok(self.builder.emit_call(callee, values, ret))
    }

    fn lower_assign(&mut self, target: ExprId, value: ExprId, span: Span) -> LowerResult<VarId> {
        let ty = self.typed.expr_type(target);

        if let ExprKind::Ident(_) = self.arena.get_expr(target).kind {
            if let Some(symbol) = self.typed.resolution(target) {
                if self.env.lookup(symbol).is_some() {
                    let v = self.lower_value(value)?;
                    self.env.bind(symbol, v);
                    return Ok(v);
                }
            }
        }

        let ptr = self.lower_place(target)?;
        if self.typed.pool.as_struct(ty).is_some() {
            let src = self.lower_expr(value)?;
            self.copy_struct(ptr, src, ty)?;
            return Ok(ptr);
        }
        let v = self.lower_value(value)?;
        let ir_ty = self.scalar_type(ty, span)?;
        self.builder.emit_store(ir_ty, ptr, v);
        Ok(v)
    }
}

/// `-literal` lowers to a single constant with the sign folded in.
fn is_numeric_literal(kind: &ExprKind) -> bool {
    matches!(kind, ExprKind::Int { .. } | ExprKind::Float { .. })
}
