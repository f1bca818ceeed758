//! AST node types.
//!
//! Expressions and statements live in an [`ExprArena`](crate::ExprArena) and
//! reference their children by ID. Items live directly in [`Module`]. Every
//! node carries the span of the tokens it was parsed from.

mod operators;

pub use operators::{BinaryOp, UnaryOp};

use crate::{ExprId, Name, NumSuffix, Span, StmtId};

/// Built-in scalar types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PrimTy {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    Void,
}

impl PrimTy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Void => "void",
        }
    }
}

/// A type as written in source, before resolution.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParsedType {
    pub kind: ParsedTypeKind,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ParsedTypeKind {
    Prim(PrimTy),
    /// A struct name; resolved by the checker.
    Named(Name),
    /// `*T`
    Pointer(Box<ParsedType>),
}

/// Expression node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer literal. The value is the unsigned magnitude as written.
    Int { value: u64, suffix: Option<NumSuffix> },
    /// Float literal stored as `f64` bits.
    Float { bits: u64, suffix: Option<NumSuffix> },
    Bool(bool),
    /// String literal with escapes resolved; NUL is appended at emission.
    Str(Name),
    Ident(Name),
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    /// `*operand`
    Deref(ExprId),
    /// `&operand`
    AddressOf(ExprId),
    /// Direct call of a named function.
    Call {
        callee: Name,
        callee_span: Span,
        args: Vec<ExprId>,
    },
    /// `base.field`
    Field {
        base: ExprId,
        field: Name,
        field_span: Span,
    },
    /// `target = value`
    Assign { target: ExprId, value: ExprId },
    /// `expr as ty`
    Cast { expr: ExprId, ty: ParsedType },
    /// Placeholder produced by parser recovery.
    Error,
}

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Var(VarDecl),
    If {
        cond: ExprId,
        then_block: Block,
        else_branch: Option<ElseBranch>,
    },
    While {
        cond: ExprId,
        body: Block,
    },
    Return(Option<ExprId>),
    Break,
    Continue,
    Expr(ExprId),
    Block(Block),
}

/// Local variable declaration: `var name: ty = init;`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct VarDecl {
    pub name: Name,
    pub name_span: Span,
    pub ty: Option<ParsedType>,
    pub init: Option<ExprId>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElseBranch {
    Block(Block),
    /// `else if ...`: the nested `If` statement.
    If(StmtId),
}

/// `{ stmts }`. Introduces a scope.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Block {
    pub stmts: Vec<StmtId>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub name_span: Span,
    pub ty: ParsedType,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDecl {
    pub name: Name,
    pub name_span: Span,
    pub params: Vec<Param>,
    /// `None` means `void`.
    pub ret: Option<ParsedType>,
    pub body: Block,
    pub span: Span,
}

/// `extern fn name(params) -> ret;` declares a symbol defined elsewhere.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExternDecl {
    pub name: Name,
    pub name_span: Span,
    pub params: Vec<Param>,
    pub ret: Option<ParsedType>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDecl {
    pub name: Name,
    pub name_span: Span,
    pub ty: ParsedType,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructDecl {
    pub name: Name,
    pub name_span: Span,
    pub fields: Vec<FieldDecl>,
    pub span: Span,
}

/// Top-level `var name: ty = init;`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GlobalDecl {
    pub name: Name,
    pub name_span: Span,
    pub ty: ParsedType,
    pub init: Option<ExprId>,
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Item {
    Function(FunctionDecl),
    Extern(ExternDecl),
    Struct(StructDecl),
    Global(GlobalDecl),
}

impl Item {
    pub fn name(&self) -> Name {
        match self {
            Item::Function(f) => f.name,
            Item::Extern(e) => e.name,
            Item::Struct(s) => s.name,
            Item::Global(g) => g.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Item::Function(f) => f.span,
            Item::Extern(e) => e.span,
            Item::Struct(s) => s.span,
            Item::Global(g) => g.span,
        }
    }
}

/// A parsed compilation unit (the program node).
#[derive(Clone, Default, Eq, PartialEq, Hash, Debug)]
pub struct Module {
    pub items: Vec<Item>,
}

impl Module {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Function(f) => Some(f),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests;
