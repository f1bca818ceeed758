//! Module-level type checker.
//!
//! Checking runs in passes so every declaration is known before any body is
//! checked:
//!
//! ```text
//! Pass 1: struct names
//! Pass 2: struct field types, then layouts (rejects by-value recursion)
//! Pass 3: functions, externs and globals in the global scope
//! Pass 4: global initializers (constant literals only)
//! Pass 5: function bodies
//! ```
//!
//! Every error is recorded and checking continues. An ill-typed expression
//! gets `Idx::ERROR`, which is compatible with everything, so one mistake
//! yields one diagnostic.

mod bodies;
mod expr;
mod registration;

use quark_ir::{ExprArena, ExprId, Module, Name, ParsedType, ParsedTypeKind, Span, StmtId};
use quark_ir::StringInterner;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::suggest::suggest_similar;
use crate::{
    FunctionInfo, GlobalInfo, Idx, Pool, Scopes, StructTable, SymbolId, SymbolTable,
    TypeCheckError, TypeCheckResult, TypeCheckWarning, TypeErrorKind, TypedModule,
};

/// Check a parsed module.
#[tracing::instrument(level = "debug", skip_all, fields(items = module.items.len()))]
pub fn check_module(
    module: &Module,
    arena: &ExprArena,
    interner: &StringInterner,
) -> TypeCheckResult {
    let mut checker = ModuleChecker::new(module, arena, interner);
    checker.register_structs();
    checker.resolve_struct_fields();
    checker.register_signatures();
    checker.check_globals();
    tracing::debug!(
        structs = checker.structs.len(),
        functions = checker.functions.len(),
        globals = checker.globals.len(),
        "declarations registered"
    );
    checker.check_bodies();
    tracing::debug!(
        errors = checker.errors.len(),
        warnings = checker.warnings.len(),
        "bodies checked"
    );
    checker.finish()
}

#[derive(Copy, Clone, Debug, Default)]
struct LoopState {
    has_break: bool,
}

pub(crate) struct ModuleChecker<'a> {
    // === Immutable Context ===
    module: &'a Module,
    arena: &'a ExprArena,
    interner: &'a StringInterner,

    // === Type Storage ===
    pool: Pool,
    structs: StructTable,
    /// Item index to the struct it declared (duplicates are absent).
    struct_items: Vec<(usize, crate::StructId)>,

    // === Names ===
    symbols: SymbolTable,
    scopes: Scopes,
    /// Item index to its resolved `(params, ret)`, for every function and
    /// extern including duplicates.
    signatures: FxHashMap<usize, (Vec<Idx>, Idx)>,
    functions: FxHashMap<Name, FunctionInfo>,
    globals: FxHashMap<Name, GlobalInfo>,

    // === Per-Expression Results ===
    expr_types: Vec<Idx>,
    coercions: FxHashMap<ExprId, Idx>,
    resolutions: FxHashMap<ExprId, SymbolId>,
    local_decls: FxHashMap<StmtId, SymbolId>,
    address_taken: FxHashSet<SymbolId>,

    // === Function Context ===
    current_ret: Idx,
    loops: Vec<LoopState>,

    // === Diagnostics ===
    errors: Vec<TypeCheckError>,
    warnings: Vec<TypeCheckWarning>,
}

impl<'a> ModuleChecker<'a> {
    fn new(module: &'a Module, arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        ModuleChecker {
            module,
            arena,
            interner,
            pool: Pool::new(),
            structs: StructTable::default(),
            struct_items: Vec::new(),
            symbols: SymbolTable::default(),
            scopes: Scopes::new(),
            signatures: FxHashMap::default(),
            functions: FxHashMap::default(),
            globals: FxHashMap::default(),
            expr_types: vec![Idx::ERROR; arena.expr_count()],
            coercions: FxHashMap::default(),
            resolutions: FxHashMap::default(),
            local_decls: FxHashMap::default(),
            address_taken: FxHashSet::default(),
            current_ret: Idx::VOID,
            loops: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn finish(self) -> TypeCheckResult {
        TypeCheckResult {
            typed: TypedModule {
                pool: self.pool,
                structs: self.structs,
                symbols: self.symbols,
                expr_types: self.expr_types,
                coercions: self.coercions,
                resolutions: self.resolutions,
                local_decls: self.local_decls,
                functions: self.functions,
                globals: self.globals,
                address_taken: self.address_taken,
            },
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    // === Helpers ===

    fn error(&mut self, span: Span, kind: TypeErrorKind) {
        self.errors.push(TypeCheckError::new(span, kind));
    }

    #[inline]
    fn name_str(&self, name: Name) -> &'a str {
        self.interner.lookup(name)
    }

    fn display(&self, ty: Idx) -> String {
        self.pool.display(ty, &self.structs, self.interner)
    }

    /// Resolve a written type. Unknown struct names are reported and become
    /// `Idx::ERROR`.
    fn resolve_type(&mut self, ty: &ParsedType) -> Idx {
        match &ty.kind {
            ParsedTypeKind::Prim(prim) => Idx::from_prim(*prim),
            ParsedTypeKind::Pointer(inner) => {
                let inner = self.resolve_type(inner);
                if inner.is_error() {
                    Idx::ERROR
                } else {
                    self.pool.pointer_to(inner)
                }
            }
            ParsedTypeKind::Named(name) => {
                if let Some(id) = self.structs.lookup(*name) {
                    return self.pool.struct_type(id);
                }
                let interner = self.interner;
                let suggestion = suggest_similar(
                    interner.lookup(*name),
                    self.structs.names().map(|n| interner.lookup(n)),
                )
                .map(str::to_string);
                self.error(
                    ty.span,
                    TypeErrorKind::UnknownType {
                        name: interner.lookup(*name).to_string(),
                        suggestion,
                    },
                );
                Idx::ERROR
            }
        }
    }

    /// Record `expected` as `expr`'s value type if `found` converts to it
    /// implicitly; report a mismatch otherwise.
    fn coerce(&mut self, expr: ExprId, found: Idx, expected: Idx, context: &'static str) -> bool {
        if found == expected || found.is_error() || expected.is_error() {
            return true;
        }
        if self.pool.can_widen(found, expected) {
            self.coercions.insert(expr, expected);
            return true;
        }
        let span = self.arena.get_expr(expr).span;
        let kind = TypeErrorKind::Mismatch {
            expected: self.display(expected),
            found: self.display(found),
            context,
        };
        self.error(span, kind);
        false
    }

    /// Report a redeclaration of the symbol `existing`.
    fn duplicate(&mut self, name: Name, span: Span, existing: SymbolId) {
        let previous = self.symbols.get(existing).span;
        self.error(
            span,
            TypeErrorKind::DuplicateDeclaration {
                name: self.name_str(name).to_string(),
                previous,
            },
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests;
