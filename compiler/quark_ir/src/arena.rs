//! Arena storage for AST expressions and statements.

use std::ops::Index;

use crate::{Expr, ExprId, Stmt, StmtId};

/// Contiguous storage for every expression and statement of one module.
///
/// Nodes are immutable once allocated. Each node is referenced by exactly one
/// parent (or by an item), so the arena forms a forest of trees.
#[derive(Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its ID.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX - 1));
        self.exprs.push(expr);
        id
    }

    /// Allocate a statement, returning its ID.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(u32::try_from(self.stmts.len()).unwrap_or(u32::MAX - 1));
        self.stmts.push(stmt);
        id
    }

    #[inline]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Number of expressions allocated. Side tables indexed by `ExprId` use
    /// this as their length.
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Iterate over all expressions with their IDs.
    pub fn exprs(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, e)| (ExprId::new(i as u32), e))
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Expr {
        self.get_expr(id)
    }
}

impl Index<StmtId> for ExprArena {
    type Output = Stmt;

    fn index(&self, id: StmtId) -> &Stmt {
        self.get_stmt(id)
    }
}
