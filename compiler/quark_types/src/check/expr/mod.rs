//! Expression checking.
//!
//! `check_expr` takes an optional type hint. Only literals act on it: an
//! unsuffixed literal adopts the hinted type when its value fits. Every other
//! expression ignores the hint or passes it to its operands.

mod operators;

use quark_ir::{ExprId, ExprKind, Name, NumSuffix, Span, UnaryOp};
use quark_stack::ensure_sufficient_stack;

use super::ModuleChecker;
use crate::suggest::suggest_similar;
use crate::{Idx, StorageClass, TypeErrorKind};

impl ModuleChecker<'_> {
    /// Check an expression and record its type.
    pub(super) fn check_expr(&mut self, id: ExprId, hint: Option<Idx>) -> Idx {
        let ty = ensure_sufficient_stack(|| self.check_expr_inner(id, hint));
        self.expr_types[id.index()] = ty;
        ty
    }

    fn check_expr_inner(&mut self, id: ExprId, hint: Option<Idx>) -> Idx {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        match &expr.kind {
            ExprKind::Int { value, suffix } => {
                self.check_int_literal(*value, *suffix, hint, false, expr.span)
            }
            ExprKind::Float { suffix, .. } => match suffix {
                Some(NumSuffix::F32) => Idx::FLOAT32,
                Some(_) => Idx::FLOAT64,
                None => match hint {
                    Some(h) if self.pool.is_float(h) => h,
                    _ => Idx::FLOAT64,
                },
            },
            ExprKind::Bool(_) => Idx::BOOL,
            ExprKind::Str(_) => self.pool.pointer_to(Idx::UINT8),
            ExprKind::Ident(name) => self.check_ident(id, *name, expr.span),
            ExprKind::Binary { op, left, right } => {
                self.check_binary(*op, *left, *right, hint, expr.span)
            }
            ExprKind::Unary { op, operand } => self.check_unary(*op, *operand, hint, expr.span),
            ExprKind::Deref(operand) => self.check_deref(*operand, expr.span),
            ExprKind::AddressOf(operand) => self.check_address_of(*operand, expr.span),
            ExprKind::Call {
                callee,
                callee_span,
                args,
            } => self.check_call(id, *callee, *callee_span, args, expr.span),
            ExprKind::Field {
                base,
                field,
                field_span,
            } => self.check_field(*base, *field, *field_span),
            ExprKind::Assign { target, value } => self.check_assign(*target, *value),
            ExprKind::Cast { expr: inner, ty } => {
                let to = self.resolve_type(ty);
                let from = self.check_expr(*inner, None);
                self.check_cast(from, to, expr.span)
            }
            ExprKind::Error => Idx::ERROR,
        }
    }

    /// Type an integer literal, negated when it is the operand of unary `-`.
    fn check_int_literal(
        &mut self,
        value: u64,
        suffix: Option<NumSuffix>,
        hint: Option<Idx>,
        negated: bool,
        span: Span,
    ) -> Idx {
        let ty = match suffix {
            Some(NumSuffix::F32) => return Idx::FLOAT32,
            Some(NumSuffix::F64) => return Idx::FLOAT64,
            Some(suffix) => suffix_type(suffix),
            None => match hint {
                Some(h) if self.pool.is_signed_int(h) => h,
                Some(h) if self.pool.is_int(h) && !negated => h,
                _ if int_fits(value, 32, true, negated) => Idx::INT32,
                _ => Idx::INT64,
            },
        };
        if let Some((bits, signed)) = self.pool.int_info(ty) {
            // Negating an unsigned type is reported by the operator.
            if (signed || !negated) && !int_fits(value, bits, signed, negated) {
                let sign = if negated { "-" } else { "" };
                self.error(
                    span,
                    TypeErrorKind::LiteralOutOfRange {
                        value: format!("{sign}{value}"),
                        ty: self.display(ty),
                    },
                );
            }
        }
        ty
    }

    fn check_ident(&mut self, id: ExprId, name: Name, span: Span) -> Idx {
        let Some(symbol) = self.lookup_or_report(name, span) else {
            return Idx::ERROR;
        };
        let sym = self.symbols.get(symbol);
        if sym.storage == StorageClass::Function {
            self.error(
                span,
                TypeErrorKind::FunctionAsValue {
                    name: self.name_str(name).to_string(),
                },
            );
            return Idx::ERROR;
        }
        let ty = sym.ty;
        self.resolutions.insert(id, symbol);
        ty
    }

    /// Resolve a name through the scope chain, reporting it with a
    /// suggestion when it is not found.
    fn lookup_or_report(&mut self, name: Name, span: Span) -> Option<crate::SymbolId> {
        if let Some(symbol) = self.scopes.lookup(name) {
            return Some(symbol);
        }
        let interner = self.interner;
        let visible = self.scopes.visible_names();
        let suggestion = suggest_similar(
            interner.lookup(name),
            visible.iter().map(|n| interner.lookup(*n)),
        )
        .map(str::to_string);
        self.error(
            span,
            TypeErrorKind::UndeclaredName {
                name: interner.lookup(name).to_string(),
                suggestion,
            },
        );
        None
    }

    fn check_deref(&mut self, operand: ExprId, span: Span) -> Idx {
        let ty = self.check_expr(operand, None);
        if ty.is_error() {
            return Idx::ERROR;
        }
        match self.pool.pointee(ty) {
            Some(pointee) if !pointee.is_void() => pointee,
            _ => {
                let operands = format!("`{}`", self.display(ty));
                self.error(span, TypeErrorKind::UnsupportedOperands { op: "*", operands });
                Idx::ERROR
            }
        }
    }

    fn check_address_of(&mut self, operand: ExprId, span: Span) -> Idx {
        let ty = self.check_expr(operand, None);
        if ty.is_error() {
            return Idx::ERROR;
        }
        if !self.is_place(operand) {
            self.error(span, TypeErrorKind::AddressOfTemporary);
            return Idx::ERROR;
        }
        if let ExprKind::Ident(_) = self.arena.get_expr(operand).kind {
            if let Some(symbol) = self.resolutions.get(&operand) {
                self.address_taken.insert(*symbol);
            }
        }
        self.pool.pointer_to(ty)
    }

    /// Places denote memory: variables, dereferences and fields of places.
    /// A field reached through a pointer is always a place.
    pub(super) fn is_place(&self, id: ExprId) -> bool {
        match &self.arena.get_expr(id).kind {
            ExprKind::Ident(_) => self
                .resolutions
                .get(&id)
                .is_some_and(|s| self.symbols.get(*s).storage.is_variable()),
            ExprKind::Deref(_) => true,
            ExprKind::Field { base, .. } => {
                self.pool.is_pointer(self.expr_types[base.index()]) || self.is_place(*base)
            }
            _ => false,
        }
    }

    fn check_call(
        &mut self,
        id: ExprId,
        callee: Name,
        callee_span: Span,
        args: &[ExprId],
        span: Span,
    ) -> Idx {
        let Some(symbol) = self.lookup_or_report(callee, callee_span) else {
            self.check_args_unhinted(args);
            return Idx::ERROR;
        };
        let sym = self.symbols.get(symbol);
        let fn_ty = sym.ty;
        let signature = match self.pool.get(fn_ty) {
            crate::TypeData::Function { params, ret } if sym.storage == StorageClass::Function => {
                Some((params.clone(), *ret))
            }
            _ => None,
        };
        let Some((params, ret)) = signature else {
            let kind = TypeErrorKind::NotCallable {
                name: self.name_str(callee).to_string(),
                ty: self.display(fn_ty),
            };
            self.error(callee_span, kind);
            self.check_args_unhinted(args);
            return Idx::ERROR;
        };
        self.resolutions.insert(id, symbol);

        if params.len() != args.len() {
            self.error(
                span,
                TypeErrorKind::ArityMismatch {
                    callee: self.name_str(callee).to_string(),
                    expected: params.len(),
                    found: args.len(),
                },
            );
        }
        for (i, &arg) in args.iter().enumerate() {
            let param = params.get(i).copied();
            let found = self.check_expr(arg, param);
            if let Some(param) = param {
                self.coerce(arg, found, param, "expected due to the parameter type");
            }
        }
        ret
    }

    fn check_args_unhinted(&mut self, args: &[ExprId]) {
        for &arg in args {
            self.check_expr(arg, None);
        }
    }

    fn check_field(&mut self, base: ExprId, field: Name, field_span: Span) -> Idx {
        let base_ty = self.check_expr(base, None);
        if base_ty.is_error() {
            return Idx::ERROR;
        }
        let struct_id = self
            .pool
            .as_struct(base_ty)
            .or_else(|| self.pool.pointee(base_ty).and_then(|p| self.pool.as_struct(p)));
        let Some(struct_id) = struct_id else {
            let kind = TypeErrorKind::UnknownField {
                ty: self.display(base_ty),
                field: self.name_str(field).to_string(),
                suggestion: None,
            };
            self.error(field_span, kind);
            return Idx::ERROR;
        };
        if let Some((_, def)) = self.structs.field(struct_id, field) {
            return def.ty;
        }
        let interner = self.interner;
        let suggestion = suggest_similar(
            interner.lookup(field),
            self.structs
                .get(struct_id)
                .fields
                .iter()
                .map(|f| interner.lookup(f.name)),
        )
        .map(str::to_string);
        let kind = TypeErrorKind::UnknownField {
            ty: self.display(base_ty),
            field: interner.lookup(field).to_string(),
            suggestion,
        };
        self.error(field_span, kind);
        Idx::ERROR
    }

    fn check_assign(&mut self, target: ExprId, value: ExprId) -> Idx {
        let target_ty = self.check_expr(target, None);
        if !target_ty.is_error() && !self.is_place(target) {
            let span = self.arena.get_expr(target).span;
            self.error(span, TypeErrorKind::InvalidAssignTarget);
            self.check_expr(value, None);
            return Idx::ERROR;
        }
        let found = self.check_expr(value, Some(target_ty));
        self.coerce(value, found, target_ty, "expected due to the assignment target");
        target_ty
    }

    /// An unsuffixed literal, possibly negated, whose type follows context.
    pub(super) fn is_adaptable_literal(&self, id: ExprId) -> bool {
        match &self.arena.get_expr(id).kind {
            ExprKind::Int { suffix: None, .. } | ExprKind::Float { suffix: None, .. } => true,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => self.is_adaptable_literal(*operand),
            _ => false,
        }
    }
}

fn suffix_type(suffix: NumSuffix) -> Idx {
    match suffix {
        NumSuffix::I8 => Idx::INT8,
        NumSuffix::I16 => Idx::INT16,
        NumSuffix::I32 => Idx::INT32,
        NumSuffix::I64 => Idx::INT64,
        NumSuffix::U8 => Idx::UINT8,
        NumSuffix::U16 => Idx::UINT16,
        NumSuffix::U32 => Idx::UINT32,
        NumSuffix::U64 => Idx::UINT64,
        NumSuffix::F32 => Idx::FLOAT32,
        NumSuffix::F64 => Idx::FLOAT64,
    }
}

/// Whether the magnitude `value` (negated if `negated`) is representable in
/// an integer of `bits` width.
pub(crate) fn int_fits(value: u64, bits: u8, signed: bool, negated: bool) -> bool {
    if signed {
        let limit = 1u64 << (bits - 1);
        if negated {
            value <= limit
        } else {
            value < limit
        }
    } else if negated {
        value == 0
    } else {
        bits == 64 || value < (1u64 << bits)
    }
}
