//! Function bodies: statements, scopes, and control-flow facts.

use quark_ir::{Block, ElseBranch, ExprId, ExprKind, FunctionDecl, Item, StmtId, StmtKind, VarDecl};
use quark_stack::ensure_sufficient_stack;

use super::{LoopState, ModuleChecker};
use crate::{Idx, StorageClass, Symbol, TypeCheckWarning, TypeErrorKind};

/// How control leaves a statement.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Flow {
    /// May continue with the next statement.
    Normal,
    /// Never continues: `return`, or a loop that cannot exit.
    Diverges,
    /// Leaves through `break` or `continue`.
    Jumps,
}

impl Flow {
    /// Flow of an `if` with both branches present.
    fn join(self, other: Flow) -> Flow {
        match (self, other) {
            (Flow::Normal, _) | (_, Flow::Normal) => Flow::Normal,
            (Flow::Diverges, Flow::Diverges) => Flow::Diverges,
            _ => Flow::Jumps,
        }
    }
}

impl ModuleChecker<'_> {
    /// Pass 5: check every function body.
    pub(super) fn check_bodies(&mut self) {
        for (index, item) in self.module.items.iter().enumerate() {
            if let Item::Function(decl) = item {
                self.check_function(index, decl);
            }
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(index = index))]
    fn check_function(&mut self, index: usize, decl: &FunctionDecl) {
        let Some((params, ret)) = self.signatures.get(&index).cloned() else {
            return;
        };
        let scope = self.scopes.push();
        let mut param_symbols = Vec::with_capacity(params.len());
        for (param, ty) in decl.params.iter().zip(params) {
            let symbol = self.symbols.alloc(Symbol {
                name: param.name,
                ty,
                storage: StorageClass::Parameter,
                scope,
                span: param.name_span,
            });
            if let Err(existing) = self.scopes.declare(param.name, symbol) {
                self.duplicate(param.name, param.name_span, existing);
            }
            param_symbols.push(symbol);
        }
        if let Some(info) = self.functions.get_mut(&decl.name) {
            if info.span == decl.name_span {
                info.param_symbols = param_symbols;
            }
        }

        self.current_ret = ret;
        self.loops.clear();
        let flow = self.check_stmts(&decl.body.stmts);
        if flow == Flow::Normal && !ret.is_void() && !ret.is_error() {
            let kind = TypeErrorKind::MissingReturn {
                function: self.name_str(decl.name).to_string(),
                ret: self.display(ret),
            };
            self.error(decl.name_span, kind);
        }
        self.scopes.pop();
    }

    /// A block in a fresh scope.
    fn check_block(&mut self, block: &Block) -> Flow {
        self.scopes.push();
        let flow = self.check_stmts(&block.stmts);
        self.scopes.pop();
        flow
    }

    /// Statements in the current scope. The first statement after control
    /// has left gets one unreachable-code warning.
    fn check_stmts(&mut self, stmts: &[StmtId]) -> Flow {
        let mut flow = Flow::Normal;
        let mut cause = None;
        let mut warned = false;
        for &stmt in stmts {
            let span = self.arena.get_stmt(stmt).span;
            if let (Some(cause), false) = (cause, warned) {
                self.warnings
                    .push(TypeCheckWarning::UnreachableCode { span, cause });
                warned = true;
            }
            let stmt_flow = self.check_stmt(stmt);
            if flow == Flow::Normal && stmt_flow != Flow::Normal {
                flow = stmt_flow;
                cause = Some(span);
            }
        }
        flow
    }

    fn check_stmt(&mut self, id: StmtId) -> Flow {
        ensure_sufficient_stack(|| self.check_stmt_inner(id))
    }

    fn check_stmt_inner(&mut self, id: StmtId) -> Flow {
        let arena = self.arena;
        let stmt = arena.get_stmt(id);
        match &stmt.kind {
            StmtKind::Var(decl) => {
                self.check_var(id, decl);
                Flow::Normal
            }
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => {
                self.check_condition(*cond);
                let then_flow = self.check_block(then_block);
                match else_branch {
                    None => Flow::Normal,
                    Some(ElseBranch::Block(block)) => then_flow.join(self.check_block(block)),
                    Some(ElseBranch::If(nested)) => then_flow.join(self.check_stmt(*nested)),
                }
            }
            StmtKind::While { cond, body } => {
                self.check_condition(*cond);
                self.loops.push(LoopState::default());
                self.check_block(body);
                let state = self.loops.pop().unwrap_or_default();
                let infinite = matches!(arena.get_expr(*cond).kind, ExprKind::Bool(true));
                if infinite && !state.has_break {
                    Flow::Diverges
                } else {
                    Flow::Normal
                }
            }
            StmtKind::Return(value) => {
                self.check_return(*value, stmt.span);
                Flow::Diverges
            }
            StmtKind::Break => match self.loops.last_mut() {
                Some(state) => {
                    state.has_break = true;
                    Flow::Jumps
                }
                None => {
                    self.error(stmt.span, TypeErrorKind::JumpOutsideLoop { keyword: "break" });
                    Flow::Normal
                }
            },
            StmtKind::Continue => {
                if self.loops.is_empty() {
                    self.error(
                        stmt.span,
                        TypeErrorKind::JumpOutsideLoop {
                            keyword: "continue",
                        },
                    );
                    Flow::Normal
                } else {
                    Flow::Jumps
                }
            }
            StmtKind::Expr(expr) => {
                self.check_expr(*expr, None);
                Flow::Normal
            }
            StmtKind::Block(block) => self.check_block(block),
        }
    }

    fn check_var(&mut self, id: StmtId, decl: &VarDecl) {
        let declared = decl.ty.as_ref().map(|ty| self.resolve_type(ty));
        let init_ty = decl.init.map(|init| self.check_expr(init, declared));

        let ty = match (declared, decl.init, init_ty) {
            (Some(declared), Some(init), Some(found)) => {
                self.coerce(init, found, declared, "expected due to the declared type");
                declared
            }
            (Some(declared), _, _) => declared,
            (None, _, Some(found)) => found,
            (None, _, None) => {
                self.error(
                    decl.name_span,
                    TypeErrorKind::InvalidVariableType {
                        name: self.name_str(decl.name).to_string(),
                        reason: "a variable needs a type or an initializer",
                    },
                );
                Idx::ERROR
            }
        };
        let ty = if ty.is_void() {
            self.error(
                decl.name_span,
                TypeErrorKind::InvalidVariableType {
                    name: self.name_str(decl.name).to_string(),
                    reason: "variables cannot have type `void`",
                },
            );
            Idx::ERROR
        } else {
            ty
        };

        // Declared after the initializer: `var x = x;` sees the outer `x`.
        let symbol = self.symbols.alloc(Symbol {
            name: decl.name,
            ty,
            storage: StorageClass::Local,
            scope: self.scopes.current(),
            span: decl.name_span,
        });
        if let Err(existing) = self.scopes.declare(decl.name, symbol) {
            self.duplicate(decl.name, decl.name_span, existing);
        }
        self.local_decls.insert(id, symbol);
    }

    fn check_return(&mut self, value: Option<ExprId>, span: quark_ir::Span) {
        let ret = self.current_ret;
        match value {
            Some(value) => {
                let found = self.check_expr(value, Some(ret));
                self.coerce(value, found, ret, "expected due to the return type");
            }
            None if !ret.is_void() && !ret.is_error() => {
                let kind = TypeErrorKind::Mismatch {
                    expected: self.display(ret),
                    found: self.display(Idx::VOID),
                    context: "expected due to the return type",
                };
                self.error(span, kind);
            }
            None => {}
        }
    }

    fn check_condition(&mut self, cond: ExprId) {
        let found = self.check_expr(cond, Some(Idx::BOOL));
        self.coerce(cond, found, Idx::BOOL, "conditions must be `bool`");
    }
}
