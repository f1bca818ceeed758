//! Grammar productions, one module per syntactic category.
//!
//! - `item`: functions, externs, structs, globals
//! - `stmt`: blocks and statements
//! - `expr`: precedence climbing, unary, postfix and primary expressions
//! - `ty`: type syntax

mod expr;
mod item;
mod stmt;
mod ty;
