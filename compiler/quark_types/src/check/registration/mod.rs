//! Declaration passes: structs, signatures, globals.

use quark_ir::{ExprKind, Item, Param, UnaryOp};

use super::ModuleChecker;
use crate::{
    ConstValue, FunctionInfo, GlobalInfo, Idx, ScopeId, StorageClass, Symbol, TypeErrorKind,
};

impl ModuleChecker<'_> {
    /// Pass 1: give every struct an identity so field and signature types
    /// can refer to structs declared later in the file.
    pub(super) fn register_structs(&mut self) {
        for (index, item) in self.module.items.iter().enumerate() {
            let Item::Struct(decl) = item else {
                continue;
            };
            if let Some(existing) = self.structs.lookup(decl.name) {
                let previous = self.structs.get(existing).span;
                self.error(
                    decl.name_span,
                    TypeErrorKind::DuplicateDeclaration {
                        name: self.name_str(decl.name).to_string(),
                        previous,
                    },
                );
                continue;
            }
            let id = self.structs.declare(decl.name, decl.name_span);
            self.struct_items.push((index, id));
        }
    }

    /// Pass 2: resolve field types, then lay every struct out.
    pub(super) fn resolve_struct_fields(&mut self) {
        for (index, id) in self.struct_items.clone() {
            let Item::Struct(decl) = &self.module.items[index] else {
                continue;
            };
            let mut fields: Vec<crate::FieldDef> = Vec::with_capacity(decl.fields.len());
            for field in &decl.fields {
                if let Some(previous) = fields.iter().find(|f| f.name == field.name) {
                    let previous = previous.span;
                    self.error(
                        field.name_span,
                        TypeErrorKind::DuplicateDeclaration {
                            name: self.name_str(field.name).to_string(),
                            previous,
                        },
                    );
                    continue;
                }
                let mut ty = self.resolve_type(&field.ty);
                if ty.is_void() {
                    self.error(
                        field.ty.span,
                        TypeErrorKind::InvalidVariableType {
                            name: self.name_str(field.name).to_string(),
                            reason: "fields cannot have type `void`",
                        },
                    );
                    ty = Idx::ERROR;
                }
                fields.push(crate::FieldDef {
                    name: field.name,
                    ty,
                    span: field.name_span,
                    offset: 0,
                });
            }
            self.structs.get_mut(id).fields = fields;
        }

        for (id, field_index) in self.structs.layout_all(&self.pool) {
            let def = self.structs.get(id);
            let field = &def.fields[field_index];
            let (span, kind) = (
                field.span,
                TypeErrorKind::RecursiveStruct {
                    name: self.name_str(def.name).to_string(),
                    field: self.name_str(field.name).to_string(),
                },
            );
            self.error(span, kind);
        }
    }

    /// Pass 3: functions, externs and globals enter the global scope with
    /// resolved types.
    pub(super) fn register_signatures(&mut self) {
        for (index, item) in self.module.items.iter().enumerate() {
            match item {
                Item::Function(decl) => {
                    let (params, ret) = self.resolve_signature(&decl.params, decl.ret.as_ref());
                    self.register_function(index, decl.name, decl.name_span, params, ret, false);
                }
                Item::Extern(decl) => {
                    let (params, ret) = self.resolve_signature(&decl.params, decl.ret.as_ref());
                    self.register_function(index, decl.name, decl.name_span, params, ret, true);
                }
                Item::Global(decl) => {
                    let mut ty = self.resolve_type(&decl.ty);
                    if ty.is_void() {
                        self.error(
                            decl.ty.span,
                            TypeErrorKind::InvalidVariableType {
                                name: self.name_str(decl.name).to_string(),
                                reason: "variables cannot have type `void`",
                            },
                        );
                        ty = Idx::ERROR;
                    }
                    let symbol = self.symbols.alloc(Symbol {
                        name: decl.name,
                        ty,
                        storage: StorageClass::Global,
                        scope: ScopeId::GLOBAL,
                        span: decl.name_span,
                    });
                    if let Err(existing) = self.scopes.declare(decl.name, symbol) {
                        self.duplicate(decl.name, decl.name_span, existing);
                        continue;
                    }
                    self.globals.insert(
                        decl.name,
                        GlobalInfo {
                            name: decl.name,
                            symbol,
                            ty,
                            init: None,
                        },
                    );
                }
                Item::Struct(_) => {}
            }
        }
    }

    fn resolve_signature(
        &mut self,
        params: &[Param],
        ret: Option<&quark_ir::ParsedType>,
    ) -> (Vec<Idx>, Idx) {
        let mut param_types = Vec::with_capacity(params.len());
        for param in params {
            let mut ty = self.resolve_type(&param.ty);
            if ty.is_void() {
                self.error(
                    param.ty.span,
                    TypeErrorKind::InvalidVariableType {
                        name: self.name_str(param.name).to_string(),
                        reason: "parameters cannot have type `void`",
                    },
                );
                ty = Idx::ERROR;
            } else if self.pool.as_struct(ty).is_some() {
                let kind = TypeErrorKind::StructByValue {
                    ty: self.display(ty),
                    position: "parameter",
                };
                self.error(param.ty.span, kind);
                ty = Idx::ERROR;
            }
            param_types.push(ty);
        }
        let ret_ty = match ret {
            None => Idx::VOID,
            Some(parsed) => {
                let ty = self.resolve_type(parsed);
                if self.pool.as_struct(ty).is_some() {
                    let kind = TypeErrorKind::StructByValue {
                        ty: self.display(ty),
                        position: "return type",
                    };
                    self.error(parsed.span, kind);
                    Idx::ERROR
                } else {
                    ty
                }
            }
        };
        (param_types, ret_ty)
    }

    fn register_function(
        &mut self,
        index: usize,
        name: quark_ir::Name,
        name_span: quark_ir::Span,
        params: Vec<Idx>,
        ret: Idx,
        is_extern: bool,
    ) {
        self.signatures.insert(index, (params.clone(), ret));
        let fn_ty = self.pool.function(params.clone(), ret);
        let symbol = self.symbols.alloc(Symbol {
            name,
            ty: fn_ty,
            storage: StorageClass::Function,
            scope: ScopeId::GLOBAL,
            span: name_span,
        });
        if let Err(existing) = self.scopes.declare(name, symbol) {
            self.duplicate(name, name_span, existing);
            return;
        }
        self.functions.insert(
            name,
            FunctionInfo {
                name,
                symbol,
                params,
                param_symbols: Vec::new(),
                ret,
                is_extern,
                span: name_span,
            },
        );
    }

    /// Pass 4: global initializers must be literals (optionally negated) of
    /// the global's type.
    pub(super) fn check_globals(&mut self) {
        for item in &self.module.items {
            let Item::Global(decl) = item else {
                continue;
            };
            let Some(init) = decl.init else {
                continue;
            };
            let Some(global) = self.globals.get(&decl.name) else {
                continue;
            };
            if self.symbols.get(global.symbol).span != decl.name_span {
                // A duplicate; the first declaration owns the entry.
                continue;
            }
            let ty = global.ty;

            let (literal, negated) = match &self.arena.get_expr(init).kind {
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand,
                } => (*operand, true),
                _ => (init, false),
            };
            let value = match self.arena.get_expr(literal).kind {
                ExprKind::Int { value, .. } => Some(ConstValue::Int(if negated {
                    value.wrapping_neg()
                } else {
                    value
                })),
                ExprKind::Float { bits, .. } => {
                    let value = f64::from_bits(bits);
                    Some(ConstValue::Float(
                        (if negated { -value } else { value }).to_bits(),
                    ))
                }
                ExprKind::Bool(b) if !negated => Some(ConstValue::Bool(b)),
                _ => None,
            };
            let Some(value) = value else {
                let span = self.arena.get_expr(init).span;
                self.error(span, TypeErrorKind::NonConstantInitializer);
                continue;
            };

            let found = self.check_expr(init, Some(ty));
            if self.coerce(init, found, ty, "expected due to the global's type") {
                if let Some(global) = self.globals.get_mut(&decl.name) {
                    global.init = Some(value);
                }
            }
        }
    }
}
