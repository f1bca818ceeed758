//! Places: expressions that denote storage, and struct copies between them.

use quark_diagnostic::{FaultPhase, InternalCompilerFault};
use quark_ir::{ExprId, ExprKind};
use quark_types::{Idx, StorageClass};

use super::{fault, FunctionLowerer};
use crate::ir::{IrType, VarId};

impl FunctionLowerer<'_> {
    /// Address of a place expression: a memory-resident variable, a
    /// dereference, or a field of either.
    pub(super) fn lower_place(&mut self, id: ExprId) -> Result<VarId, InternalCompilerFault> {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        match &expr.kind {
            ExprKind::Ident(name) => {
                let symbol = self
                    .typed
                    .resolution(id)
                    .ok_or_else(|| fault("unresolved identifier", expr.span))?;
                if let Some(&slot) = self.slots.get(&symbol) {
                    return Ok(slot);
                }
                match self.typed.symbols.get(symbol).storage {
                    StorageClass::Global => Ok(self.builder.emit_global_addr(*name)),
                    _ => Err(fault("variable has no storage", expr.span)
                        .with_context(self.interner.lookup(*name).to_owned())),
                }
            }
            ExprKind::Deref(inner) => self.lower_value(*inner),
            ExprKind::Field { base, field, .. } => {
                let base_ty = self.typed.expr_type(*base);
                let (base_ptr, struct_ty) = match self.typed.pool.pointee(base_ty) {
                    Some(pointee) => (self.lower_value(*base)?, pointee),
                    None => (self.lower_expr(*base)?, base_ty),
                };
                let struct_id = self
                    .typed
                    .pool
                    .as_struct(struct_ty)
                    .ok_or_else(|| fault("field access on a non-struct", expr.span))?;
                let (_, def) = self
                    .typed
                    .structs
                    .field(struct_id, *field)
                    .ok_or_else(|| fault("unknown field", expr.span))?;
                Ok(self.builder.emit_field_ptr(base_ptr, def.offset))
            }
            _ => Err(fault("expression is not a place", expr.span)),
        }
    }

    /// Copy a value of struct type `ty` from `src` to `dst`, one scalar
    /// field at a time.
    pub(super) fn copy_struct(
        &mut self,
        dst: VarId,
        src: VarId,
        ty: Idx,
    ) -> Result<(), InternalCompilerFault> {
        for (offset, leaf) in self.leaves(ty)? {
            let from = self.builder.emit_field_ptr(src, offset);
            let to = self.builder.emit_field_ptr(dst, offset);
            let value = self.builder.emit_load(leaf, from);
            self.builder.emit_store(leaf, to, value);
        }
        Ok(())
    }

    /// Zero every scalar field of the struct at `ptr`.
    pub(super) fn zero_struct(&mut self, ptr: VarId, ty: Idx) -> Result<(), InternalCompilerFault> {
        for (offset, leaf) in self.leaves(ty)? {
            let to = self.builder.emit_field_ptr(ptr, offset);
            let zero = self.builder.emit_zero(leaf);
            self.builder.emit_store(leaf, to, zero);
        }
        Ok(())
    }

    /// Scalar leaves of a struct type as `(offset, type)`, in field order.
    fn leaves(&self, ty: Idx) -> Result<Vec<(u32, IrType)>, InternalCompilerFault> {
        let mut out = Vec::new();
        self.collect_leaves(ty, 0, &mut out)?;
        Ok(out)
    }

    fn collect_leaves(
        &self,
        ty: Idx,
        base: u32,
        out: &mut Vec<(u32, IrType)>,
    ) -> Result<(), InternalCompilerFault> {
        match self.typed.pool.as_struct(ty) {
            Some(struct_id) => {
                for field in &self.typed.structs.get(struct_id).fields {
                    self.collect_leaves(field.ty, base + field.offset, out)?;
                }
                Ok(())
            }
            None => {
                let leaf = super::ir_type(self.typed, ty).ok_or_else(|| {
                    InternalCompilerFault::new(FaultPhase::Lower, "struct field has no machine type")
                })?;
                out.push((base, leaf));
                Ok(())
            }
        }
    }
}
