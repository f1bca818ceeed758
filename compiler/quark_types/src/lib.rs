//! Name resolution and type checking for Quark.
//!
//! [`check_module`] resolves every name in a parsed module, assigns a type
//! to every expression, lays out structs, and reports type errors and
//! warnings. Types are interned in a [`Pool`] and referred to by [`Idx`];
//! primitives live at fixed indices so the common case needs no lookup.
//!
//! # Error Recovery
//!
//! An ill-typed expression gets [`Idx::ERROR`], which every check accepts
//! silently. One mistake therefore produces one diagnostic, and checking
//! always reaches the end of the module.

mod check;
mod idx;
mod layout;
mod output;
mod pool;
mod scope;
pub mod suggest;
mod symbol;
mod type_error;

pub use check::check_module;
pub use idx::Idx;
pub use layout::{FieldDef, StructDef, StructId, StructTable};
pub use output::{ConstValue, FunctionInfo, GlobalInfo, TypeCheckResult, TypedModule};
pub use pool::{Pool, TypeData};
pub use scope::{ScopeId, Scopes};
pub use symbol::{StorageClass, Symbol, SymbolId, SymbolTable};
pub use type_error::{TypeCheckError, TypeCheckWarning, TypeErrorKind};
