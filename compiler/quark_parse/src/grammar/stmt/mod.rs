//! Statement and block parsing.
//!
//! ```text
//! block := '{' stmt* '}'
//! stmt  := var_decl | if_stmt | while_stmt | 'return' expr? ';'
//!        | 'break' ';' | 'continue' ';' | block | expr ';'
//! ```
//!
//! A statement error is recorded and the block resynchronizes at the next
//! statement boundary, so one bad statement does not hide the rest of the
//! function.

use quark_ir::{Block, ElseBranch, Stmt, StmtId, StmtKind, TokenKind, TokenTag, VarDecl};
use quark_stack::ensure_sufficient_stack;

use crate::recovery::synchronize_stmt;
use crate::{ErrorContext, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let start = self.cursor.current_span();
        self.cursor
            .expect(TokenTag::LBrace)
            .map_err(|e| e.in_context(ErrorContext::Block))?;
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenTag::RBrace) && !self.cursor.is_at_end() {
            let before = self.cursor.position();
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    if self.cursor.position() == before {
                        self.cursor.advance();
                    }
                    synchronize_stmt(&mut self.cursor);
                }
            }
        }
        if let Err(err) = self.cursor.expect(TokenTag::RBrace) {
            // Unclosed block at end of input; keep what was parsed.
            self.errors.push(err.in_context(ErrorContext::Block));
        }
        Ok(Block {
            stmts,
            span: self.span_from(start),
        })
    }

    /// Blocks nest through statements, so this is the recursion point that
    /// grows the stack.
    fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Var => self
                .parse_var_decl()
                .map_err(|e| e.in_context(ErrorContext::VarDecl))?,
            TokenKind::If => {
                return self
                    .parse_if()
                    .map_err(|e| e.in_context(ErrorContext::IfStmt))
            }
            TokenKind::While => self
                .parse_while()
                .map_err(|e| e.in_context(ErrorContext::WhileStmt))?,
            TokenKind::Return => self
                .parse_return()
                .map_err(|e| e.in_context(ErrorContext::ReturnStmt))?,
            TokenKind::Break => {
                self.cursor.advance();
                self.cursor.expect(TokenTag::Semicolon)?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.cursor.advance();
                self.cursor.expect(TokenTag::Semicolon)?;
                StmtKind::Continue
            }
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            _ => {
                let expr = self.parse_expr()?;
                self.cursor.expect(TokenTag::Semicolon)?;
                StmtKind::Expr(expr)
            }
        };
        Ok(self.alloc_stmt(kind, start))
    }

    /// `'var' IDENT (':' type)? ('=' expr)? ';'`
    fn parse_var_decl(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.expect(TokenTag::Var)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        let ty = if self.cursor.eat(TokenTag::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.cursor.eat(TokenTag::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.cursor.expect(TokenTag::Semicolon)?;
        Ok(StmtKind::Var(VarDecl {
            name,
            name_span,
            ty,
            init,
        }))
    }

    /// `'if' expr block ('else' (if_stmt | block))?`
    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenTag::If)?;
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_branch = if self.cursor.eat(TokenTag::Else) {
            if self.cursor.check(TokenTag::If) {
                Some(ElseBranch::If(ensure_sufficient_stack(|| self.parse_if())?))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };
        Ok(self.alloc_stmt(
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            },
            start,
        ))
    }

    fn parse_while(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.expect(TokenTag::While)?;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(StmtKind::While { cond, body })
    }

    fn parse_return(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.expect(TokenTag::Return)?;
        let value = if self.cursor.check(TokenTag::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect(TokenTag::Semicolon)?;
        Ok(StmtKind::Return(value))
    }

    fn alloc_stmt(&mut self, kind: StmtKind, start: quark_ir::Span) -> StmtId {
        let span = self.span_from(start);
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }
}
