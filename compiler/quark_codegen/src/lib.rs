//! x86-64 System V code generation for Quark.
//!
//! [`emit_module`] turns a verified [`IrModule`](quark_mir::IrModule) into
//! GNU assembler text in AT&T syntax.
//!
//! # Pipeline (per function)
//!
//! ```text
//! IrFunction
//!      ↓
//!   liveness   (block live-in/out, then one conservative interval per var)
//!      ↓
//!   regalloc   (linear scan; call-crossing values in callee-saved GPRs)
//!      ↓
//!   emit       (frame layout, instruction selection, parallel moves)
//!      ↓
//!   assembly text
//! ```

pub mod abi;
mod emit;
mod error;
pub mod liveness;
pub mod regalloc;
mod target;

pub use emit::emit_module;
pub use error::CodegenError;
pub use target::Target;
