//! Read-only AST traversal for whole-tree assertions.
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! visits children in source order.

use quark_ir::{Block, ElseBranch, ExprArena, ExprId, ExprKind, StmtId, StmtKind};

/// AST visitor. The visitor may mutate its own state; the AST is immutable.
pub(super) trait Visitor<'ast> {
    fn visit_block(&mut self, block: &'ast Block, arena: &'ast ExprArena) {
        walk_block(self, block, arena);
    }

    fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
        walk_stmt(self, id, arena);
    }

    fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
        walk_expr(self, id, arena);
    }
}

pub(super) fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    block: &'ast Block,
    arena: &'ast ExprArena,
) {
    for &stmt in &block.stmts {
        visitor.visit_stmt(stmt, arena);
    }
}

pub(super) fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: StmtId,
    arena: &'ast ExprArena,
) {
    match &arena.get_stmt(id).kind {
        StmtKind::Var(decl) => {
            if let Some(init) = decl.init {
                visitor.visit_expr(init, arena);
            }
        }
        StmtKind::If {
            cond,
            then_block,
            else_branch,
        } => {
            visitor.visit_expr(*cond, arena);
            visitor.visit_block(then_block, arena);
            match else_branch {
                Some(ElseBranch::Block(block)) => visitor.visit_block(block, arena),
                Some(ElseBranch::If(nested)) => visitor.visit_stmt(*nested, arena),
                None => {}
            }
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr(*cond, arena);
            visitor.visit_block(body, arena);
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(*value, arena);
            }
        }
        StmtKind::Expr(expr) => visitor.visit_expr(*expr, arena),
        StmtKind::Block(block) => visitor.visit_block(block, arena),
        StmtKind::Break | StmtKind::Continue => {}
    }
}

pub(super) fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: ExprId,
    arena: &'ast ExprArena,
) {
    match &arena.get_expr(id).kind {
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(*left, arena);
            visitor.visit_expr(*right, arena);
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr(*operand, arena),
        ExprKind::Deref(inner) | ExprKind::AddressOf(inner) => visitor.visit_expr(*inner, arena),
        ExprKind::Call { args, .. } => {
            for &arg in args {
                visitor.visit_expr(arg, arena);
            }
        }
        ExprKind::Field { base, .. } => visitor.visit_expr(*base, arena),
        ExprKind::Assign { target, value } => {
            visitor.visit_expr(*target, arena);
            visitor.visit_expr(*value, arena);
        }
        ExprKind::Cast { expr, .. } => visitor.visit_expr(*expr, arena),
        ExprKind::Int { .. }
        | ExprKind::Float { .. }
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Ident(_)
        | ExprKind::Error => {}
    }
}
