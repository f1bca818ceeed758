//! Statements and structured control flow.
//!
//! ```text
//! if c { A } else { B }          while c { body }
//!
//! entry:                         entry:
//!   cond_br c, then, else          br header(vars...)
//! then:                          header(vars...):
//!   A; br merge(...)               cond_br c, body, exit_edge
//! else:                          body:
//!   B; br merge(...)               ...; br header(vars...)
//! merge(...):                    exit_edge:
//!                                  br exit(vars...)
//!                                exit(vars...):
//! ```
//!
//! Loop headers and exits take one parameter per SSA variable visible at
//! the loop; `if` joins only add parameters for variables that differ.

use quark_diagnostic::InternalCompilerFault;
use quark_ir::{Block, ElseBranch, ExprId, ExprKind, StmtId, StmtKind, VarDecl};
use quark_stack::ensure_sufficient_stack;
use quark_types::SymbolId;

use super::env::{merge_into, Incoming, SsaEnv};
use super::{fault, FunctionLowerer, LoopTargets};

type LowerResult<T = ()> = Result<T, InternalCompilerFault>;

impl FunctionLowerer<'_> {
    /// Lower statements until one terminates the current block.
    pub(super) fn lower_stmts(&mut self, stmts: &[StmtId]) -> LowerResult {
        for &stmt in stmts {
            if self.builder.is_terminated() {
                break;
            }
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn lower_block(&mut self, block: &Block) -> LowerResult {
        self.lower_stmts(&block.stmts)
    }

    fn lower_stmt(&mut self, id: StmtId) -> LowerResult {
        ensure_sufficient_stack(|| self.lower_stmt_inner(id))
    }

    fn lower_stmt_inner(&mut self, id: StmtId) -> LowerResult {
        let arena = self.arena;
        let stmt = arena.get_stmt(id);
        match &stmt.kind {
            StmtKind::Var(decl) => self.lower_var(id, decl),
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => self.lower_if(*cond, then_block, else_branch.as_ref()),
            StmtKind::While { cond, body } => self.lower_while(*cond, body),
            StmtKind::Return(value) => self.lower_return(*value),
            StmtKind::Break => {
                let targets = self
                    .loops
                    .last()
                    .ok_or_else(|| fault("`break` outside a loop", stmt.span))?;
                let (exit, args) = (targets.exit, self.loop_args(&targets.symbols));
                self.builder.terminate_branch(exit, args);
                Ok(())
            }
            StmtKind::Continue => {
                let targets = self
                    .loops
                    .last()
                    .ok_or_else(|| fault("`continue` outside a loop", stmt.span))?;
                let (header, args) = (targets.header, self.loop_args(&targets.symbols));
                self.builder.terminate_branch(header, args);
                Ok(())
            }
            StmtKind::Expr(expr) => self.lower_effect(*expr),
            StmtKind::Block(block) => self.lower_block(block),
        }
    }

    /// An expression evaluated for its side effects only.
    fn lower_effect(&mut self, expr: ExprId) -> LowerResult {
        let arena = self.arena;
        if let ExprKind::Call {
            callee,
            callee_span,
            args,
        } = &arena.get_expr(expr).kind
        {
            self.lower_call(expr, *callee, *callee_span, args)?;
            return Ok(());
        }
        self.lower_expr(expr)?;
        Ok(())
    }

    fn lower_var(&mut self, id: StmtId, decl: &VarDecl) -> LowerResult {
        let symbol = *self
            .typed
            .local_decls
            .get(&id)
            .ok_or_else(|| fault("local has no symbol", decl.name_span))?;
        let ty = self.typed.symbols.get(symbol).ty;

        if let Some(struct_id) = self.typed.pool.as_struct(ty) {
            let def = self.typed.structs.get(struct_id);
            let slot = self.builder.emit_alloca(def.size, def.align);
            self.slots.insert(symbol, slot);
            match decl.init {
                Some(init) => {
                    let src = self.lower_expr(init)?;
                    self.copy_struct(slot, src, ty)?;
                }
                None => self.zero_struct(slot, ty)?,
            }
            return Ok(());
        }

        let ir_ty = self.scalar_type(ty, decl.name_span)?;
        let value = match decl.init {
            Some(init) => self.lower_value(init)?,
            None => self.builder.emit_zero(ir_ty),
        };
        self.bind_new(symbol, value, ir_ty);
        Ok(())
    }

    fn lower_if(
        &mut self,
        cond: ExprId,
        then_block: &Block,
        else_branch: Option<&ElseBranch>,
    ) -> LowerResult {
        let cond = self.lower_value(cond)?;
        let then_bb = self.builder.new_block();
        let else_bb = self.builder.new_block();
        let merge = self.builder.new_block();
        self.builder.terminate_cond_branch(cond, then_bb, else_bb);

        let pre = self.env.clone();
        let mut incoming = Vec::with_capacity(2);

        self.builder.position_at(then_bb);
        self.lower_block(then_block)?;
        self.close_edge(&mut incoming);

        self.env = pre.clone();
        self.builder.position_at(else_bb);
        match else_branch {
            Some(ElseBranch::Block(block)) => self.lower_block(block)?,
            Some(ElseBranch::If(nested)) => self.lower_stmt(*nested)?,
            None => {}
        }
        self.close_edge(&mut incoming);

        self.env = merge_into(&mut self.builder, merge, &pre, &incoming);
        Ok(())
    }

    /// Record the current block as an edge into a pending merge, unless it
    /// already left through `return`, `break` or `continue`.
    fn close_edge(&mut self, incoming: &mut Vec<Incoming>) {
        if !self.builder.is_terminated() {
            incoming.push(Incoming {
                block: self.builder.current_block(),
                env: self.env.clone(),
                args: Vec::new(),
            });
        }
    }

    fn lower_while(&mut self, cond: ExprId, body: &Block) -> LowerResult {
        let pre = self.env.clone();
        let symbols: Vec<SymbolId> = pre.iter().map(|(s, _)| s).collect();
        let header = self.builder.new_block();
        let exit = self.builder.new_block();

        let mut header_env = SsaEnv::default();
        let mut exit_env = SsaEnv::default();
        for (symbol, value) in pre.iter() {
            let ty = self.builder.var_type(value);
            header_env.bind(symbol, self.builder.add_block_param(header, ty));
            exit_env.bind(symbol, self.builder.add_block_param(exit, ty));
        }
        let entry_args = self.loop_args(&symbols);
        self.builder.terminate_branch(header, entry_args);

        self.builder.position_at(header);
        self.env = header_env;
        let cond = self.lower_value(cond)?;
        let body_bb = self.builder.new_block();
        let exit_edge = self.builder.new_block();
        self.builder.terminate_cond_branch(cond, body_bb, exit_edge);
        let after_cond = self.env.clone();

        self.builder.position_at(exit_edge);
        let exit_args = self.loop_args(&symbols);
        self.builder.terminate_branch(exit, exit_args);

        self.loops.push(LoopTargets {
            header,
            exit,
            symbols,
        });
        self.builder.position_at(body_bb);
        self.env = after_cond;
        self.lower_block(body)?;
        let targets = self
            .loops
            .pop()
            .ok_or_else(|| fault("loop stack underflow", body.span))?;
        if !self.builder.is_terminated() {
            let args = self.loop_args(&targets.symbols);
            self.builder.terminate_branch(header, args);
        }

        self.builder.position_at(exit);
        self.env = exit_env;
        Ok(())
    }

    /// Current values of the loop-carried symbols.
    fn loop_args(&self, symbols: &[SymbolId]) -> Vec<crate::ir::VarId> {
        symbols
            .iter()
            .filter_map(|&symbol| self.env.lookup(symbol))
            .collect()
    }

    fn lower_return(&mut self, value: Option<ExprId>) -> LowerResult {
        match value {
            Some(value) if self.ret.is_some() => {
                let v = self.lower_value(value)?;
                self.builder.terminate_return(Some(v));
            }
            // `return f();` in a `void` function.
            Some(value) => {
                self.lower_effect(value)?;
                self.builder.terminate_return(None);
            }
            None => self.builder.terminate_return(None),
        }
        Ok(())
    }
}
