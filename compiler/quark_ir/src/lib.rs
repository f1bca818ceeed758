//! Quark IR - shared front-end data types
//!
//! This crate contains the data structures every stage of the Quark
//! compiler agrees on:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - AST nodes (items, statements, expressions) in a flat arena
//! - Operators and the binary precedence table
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers become `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` /
//!   `StmtId(u32)` indices into an [`ExprArena`]
//! - **No back-references**: nodes own their children; nothing points up
//!
//! Float literals are stored as `u64` bits so every node can derive `Eq`
//! and `Hash`.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
mod span;
mod token;

pub use arena::ExprArena;
pub use ast::{
    BinaryOp, Block, ElseBranch, Expr, ExprKind, ExternDecl, FieldDecl, FunctionDecl, GlobalDecl,
    Item, Module, Param, ParsedType, ParsedTypeKind, PrimTy, Stmt, StmtKind, StructDecl, UnaryOp,
    VarDecl,
};
pub use ids::{ExprId, StmtId};
pub use interner::StringInterner;
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{NumSuffix, SourcePos, Token, TokenKind, TokenList, TokenTag};
