//! Typed AST to SSA IR lowering.
//!
//! # Variables
//!
//! - Scalar locals and parameters that are never address-taken are held in
//!   SSA variables tracked by an [`SsaEnv`](env::SsaEnv); joins merge them
//!   through block parameters.
//! - Address-taken locals and every struct-typed local get an `Alloca` in
//!   the entry block and are accessed with `Load`/`Store`.
//! - Globals are reached through `GlobalAddr`, string literals through
//!   `StrAddr`.
//!
//! A struct-typed expression lowers to the address of its storage; struct
//! copies are per-leaf loads and stores.
//!
//! Lowering only runs on programs that checked cleanly, so anything it
//! cannot handle is an [`InternalCompilerFault`].

mod env;
mod expr;
mod place;
mod stmt;

use quark_diagnostic::{FaultPhase, InternalCompilerFault};
use quark_ir::{ExprArena, FunctionDecl, Item, Module, Name, Span, StringInterner};
use quark_types::{ConstValue, Idx, SymbolId, TypeData, TypedModule};
use rustc_hash::FxHashMap;

use crate::builder::IrBuilder;
use crate::ir::{
    Constant, GlobalInit, IrExtern, IrFunction, IrGlobal, IrModule, IrType, VarId,
};
use crate::{dce, verify};

use self::env::SsaEnv;

/// Machine type of a checked scalar type; `None` for `void`, structs and
/// functions.
pub fn ir_type(typed: &TypedModule, ty: Idx) -> Option<IrType> {
    Some(match *typed.pool.get(ty) {
        TypeData::Bool => IrType::Bool,
        TypeData::Int { bits, signed } => match (bits, signed) {
            (8, true) => IrType::I8,
            (16, true) => IrType::I16,
            (32, true) => IrType::I32,
            (64, true) => IrType::I64,
            (8, false) => IrType::U8,
            (16, false) => IrType::U16,
            (32, false) => IrType::U32,
            (64, false) => IrType::U64,
            _ => return None,
        },
        TypeData::Float { bits: 32 } => IrType::F32,
        TypeData::Float { .. } => IrType::F64,
        TypeData::Pointer(_) => IrType::Ptr,
        TypeData::Error | TypeData::Void | TypeData::Struct(_) | TypeData::Function { .. } => {
            return None
        }
    })
}

/// Lower a checked module. Every function is built, stripped of
/// unreachable blocks, and verified.
#[tracing::instrument(level = "debug", skip_all, fields(items = module.items.len()))]
pub fn lower_module(
    module: &Module,
    arena: &ExprArena,
    typed: &TypedModule,
    interner: &StringInterner,
) -> Result<IrModule, InternalCompilerFault> {
    let mut ir = IrModule::default();
    for item in &module.items {
        match item {
            Item::Global(decl) => ir.globals.push(lower_global(typed, decl.name, decl.span)?),
            Item::Extern(decl) => {
                let info = typed.functions.get(&decl.name).ok_or_else(|| {
                    fault("extern has no signature", decl.span)
                })?;
                let params = info
                    .params
                    .iter()
                    .map(|&ty| ir_type(typed, ty).ok_or_else(|| fault("non-scalar parameter", decl.span)))
                    .collect::<Result<Vec<_>, _>>()?;
                ir.externs.push(IrExtern {
                    name: decl.name,
                    params,
                    ret: ir_type(typed, info.ret),
                });
            }
            Item::Function(decl) => {
                let mut func = lower_function(decl, arena, typed, interner)?;
                let removed = dce::eliminate_dead_blocks(&mut func);
                tracing::trace!(
                    function = interner.lookup(decl.name),
                    blocks = func.blocks.len(),
                    removed,
                    "function lowered"
                );
                verify::verify_function(&func, interner)?;
                ir.collect_strings(&func);
                ir.functions.push(func);
            }
            Item::Struct(_) => {}
        }
    }
    tracing::debug!(
        functions = ir.functions.len(),
        globals = ir.globals.len(),
        externs = ir.externs.len(),
        strings = ir.strings.len(),
        "module lowered"
    );
    Ok(ir)
}

fn lower_global(typed: &TypedModule, name: Name, span: Span) -> Result<IrGlobal, InternalCompilerFault> {
    let info = typed
        .globals
        .get(&name)
        .ok_or_else(|| fault("global was never registered", span))?;
    let init = match (info.init, ir_type(typed, info.ty)) {
        (None, _) => None,
        (Some(value), Some(ty)) => Some(GlobalInit {
            ty,
            value: match value {
                ConstValue::Int(bits) => Constant::Int(bits),
                ConstValue::Float(bits) => Constant::Float(bits),
                ConstValue::Bool(b) => Constant::Bool(b),
            },
        }),
        (Some(_), None) => return Err(fault("initializer for a non-scalar global", span)),
    };
    Ok(IrGlobal {
        name,
        size: typed.size_of(info.ty),
        align: typed.align_of(info.ty),
        init,
    })
}

#[cold]
pub(crate) fn fault(message: &str, span: Span) -> InternalCompilerFault {
    InternalCompilerFault::new(FaultPhase::Lower, message).with_span(span)
}

/// `break`/`continue` targets of the innermost loop. Both blocks take one
/// parameter per symbol in `symbols`.
struct LoopTargets {
    header: crate::ir::BlockId,
    exit: crate::ir::BlockId,
    symbols: Vec<SymbolId>,
}

pub(crate) struct FunctionLowerer<'a> {
    builder: IrBuilder,
    arena: &'a ExprArena,
    typed: &'a TypedModule,
    interner: &'a StringInterner,
    env: SsaEnv,
    /// Frame slot of each memory-resident local or parameter.
    slots: FxHashMap<SymbolId, VarId>,
    loops: Vec<LoopTargets>,
    ret: Option<IrType>,
}

/// Lower one function body. The result still contains unreachable blocks.
pub fn lower_function(
    decl: &FunctionDecl,
    arena: &ExprArena,
    typed: &TypedModule,
    interner: &StringInterner,
) -> Result<IrFunction, InternalCompilerFault> {
    let info = typed
        .functions
        .get(&decl.name)
        .ok_or_else(|| fault("function was never registered", decl.name_span))?;
    let mut lowerer = FunctionLowerer {
        builder: IrBuilder::new(),
        arena,
        typed,
        interner,
        env: SsaEnv::default(),
        slots: FxHashMap::default(),
        loops: Vec::new(),
        ret: ir_type(typed, info.ret),
    };

    let mut params = Vec::with_capacity(info.param_symbols.len());
    for (&symbol, param) in info.param_symbols.iter().zip(&decl.params) {
        let ty = lowerer.scalar_type(typed.symbols.get(symbol).ty, param.span)?;
        let var = lowerer.builder.fresh_var(ty);
        params.push((var, ty));
        lowerer.bind_new(symbol, var, ty);
    }

    lowerer.lower_stmts(&decl.body.stmts)?;
    if !lowerer.builder.is_terminated() {
        if lowerer.ret.is_none() {
            lowerer.builder.terminate_return(None);
        } else {
            lowerer.builder.terminate_unreachable();
        }
    }
    let ret = lowerer.ret;
    Ok(lowerer.builder.finish(decl.name, params, ret))
}

impl FunctionLowerer<'_> {
    fn scalar_type(&self, ty: Idx, span: Span) -> Result<IrType, InternalCompilerFault> {
        ir_type(self.typed, ty).ok_or_else(|| {
            fault("expected a scalar type", span)
                .with_context(self.typed.pool.display(ty, &self.typed.structs, self.interner))
        })
    }

    /// Whether a local or parameter lives in an SSA variable.
    fn is_promoted(&self, symbol: SymbolId) -> bool {
        let ty = self.typed.symbols.get(symbol).ty;
        self.typed.pool.is_scalar(ty) && !self.typed.address_taken.contains(&symbol)
    }

    /// Give a new scalar local or parameter its initial value.
    fn bind_new(&mut self, symbol: SymbolId, value: VarId, ty: IrType) {
        if self.is_promoted(symbol) {
            self.env.bind(symbol, value);
        } else {
            let slot = self.builder.emit_alloca(ty.size(), ty.size());
            self.builder.emit_store(ty, slot, value);
            self.slots.insert(symbol, slot);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
