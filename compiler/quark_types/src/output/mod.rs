//! Type checker output.
//!
//! [`TypedModule`] is everything lowering needs: the type pool and struct
//! layouts, a type for every expression, the implicit coercions the checker
//! decided on, and how each name resolved.

use quark_diagnostic::Diagnostic;
use quark_ir::{ExprId, Name, Span, StmtId};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Idx, Pool, StructTable, SymbolId, SymbolTable, TypeCheckError, TypeCheckWarning};

/// Value of a global initializer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstValue {
    /// Two's complement bits, truncated to the global's width by the consumer.
    Int(u64),
    /// `f64` bits, narrowed by the consumer for `float32` globals.
    Float(u64),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: Name,
    pub symbol: SymbolId,
    pub params: Vec<Idx>,
    /// Parameter symbols in order; empty for externs.
    pub param_symbols: Vec<SymbolId>,
    pub ret: Idx,
    pub is_extern: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalInfo {
    pub name: Name,
    pub symbol: SymbolId,
    pub ty: Idx,
    /// `None` means zero-initialized.
    pub init: Option<ConstValue>,
}

#[derive(Clone, Debug, Default)]
pub struct TypedModule {
    pub pool: Pool,
    pub structs: StructTable,
    pub symbols: SymbolTable,
    /// Type of each expression, indexed by `ExprId`.
    pub expr_types: Vec<Idx>,
    /// Implicit widening applied to an expression's value at its use.
    pub coercions: FxHashMap<ExprId, Idx>,
    /// Identifier and call expressions to the symbol they name.
    pub resolutions: FxHashMap<ExprId, SymbolId>,
    /// Local `var` statements to the symbol they declare.
    pub local_decls: FxHashMap<StmtId, SymbolId>,
    pub functions: FxHashMap<Name, FunctionInfo>,
    pub globals: FxHashMap<Name, GlobalInfo>,
    /// Variables whose address is taken with `&`.
    pub address_taken: FxHashSet<SymbolId>,
}

impl TypedModule {
    #[inline]
    pub fn expr_type(&self, id: ExprId) -> Idx {
        self.expr_types
            .get(id.index())
            .copied()
            .unwrap_or(Idx::ERROR)
    }

    pub fn resolution(&self, id: ExprId) -> Option<SymbolId> {
        self.resolutions.get(&id).copied()
    }

    pub fn size_of(&self, ty: Idx) -> u32 {
        self.structs.size_of(&self.pool, ty)
    }

    pub fn align_of(&self, ty: Idx) -> u32 {
        self.structs.align_of(&self.pool, ty)
    }
}

/// Result of checking one module.
#[derive(Clone, Debug)]
pub struct TypeCheckResult {
    pub typed: TypedModule,
    pub errors: Vec<TypeCheckError>,
    pub warnings: Vec<TypeCheckWarning>,
}

impl TypeCheckResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors then warnings, as diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(TypeCheckError::to_diagnostic)
            .chain(self.warnings.iter().map(TypeCheckWarning::to_diagnostic))
            .collect()
    }
}
