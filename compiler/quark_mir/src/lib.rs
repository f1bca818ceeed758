//! SSA intermediate representation for Quark.
//!
//! [`lower_module`] turns a checked AST into an [`IrModule`]: one
//! [`IrFunction`] per function, each a list of basic blocks with block
//! parameters in place of phi nodes.
//!
//! # Pipeline
//!
//! ```text
//! Module + ExprArena + TypedModule
//!        ↓
//!   lower          (AST -> blocks, SSA promotion of scalar locals)
//!        ↓
//!   dce            (drop blocks unreachable from the entry)
//!        ↓
//!   verify         (SSA and CFG well-formedness)
//!        ↓
//!   IrModule
//! ```
//!
//! [`print_module`] renders the result as text. With the `eval` feature,
//! [`eval::Evaluator`] executes it directly.

pub mod builder;
pub mod dce;
#[cfg(feature = "eval")]
pub mod eval;
pub mod graph;
pub mod ir;
pub mod lower;
pub mod print;
pub mod verify;

pub use builder::IrBuilder;
pub use dce::eliminate_dead_blocks;
pub use graph::DominatorTree;
pub use ir::{
    Block, BlockId, Constant, GlobalInit, Instr, IrExtern, IrFunction, IrGlobal, IrModule, IrType,
    Terminator, VarId,
};
pub use lower::{ir_type, lower_function, lower_module};
pub use print::{format_instr, format_terminator, print_function, print_module};
pub use verify::verify_function;
