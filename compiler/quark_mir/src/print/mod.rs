//! Textual IR.
//!
//! ```text
//! fn @max(v0: i32, v1: i32) -> i32 {
//! bb0:
//!   v2 = gt.i32 v0, v1
//!   condbr v2, bb1, bb2
//! bb1:
//!   br bb3(v0)
//! ...
//! }
//! ```
//!
//! The format is for humans and tests; nothing parses it back.

use std::fmt::Write;

use quark_ir::{BinaryOp, StringInterner, UnaryOp};

use crate::ir::{Block, Constant, Instr, IrFunction, IrModule, IrType, Terminator};

pub fn print_module(module: &IrModule, interner: &StringInterner) -> String {
    let mut out = String::with_capacity(1024);
    for global in &module.globals {
        let _ = write!(
            out,
            "global @{}: size {}, align {}",
            interner.lookup(global.name),
            global.size,
            global.align
        );
        match global.init {
            Some(init) => {
                let _ = writeln!(out, " = {} {}", init.ty, format_constant(init.ty, init.value));
            }
            None => out.push_str(" = zeroed\n"),
        }
    }
    for ext in &module.externs {
        let params: Vec<&str> = ext.params.iter().map(|ty| ty.as_str()).collect();
        let _ = write!(
            out,
            "extern fn @{}({})",
            interner.lookup(ext.name),
            params.join(", ")
        );
        if let Some(ret) = ext.ret {
            let _ = write!(out, " -> {ret}");
        }
        out.push('\n');
    }
    for func in &module.functions {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&print_function(func, interner));
    }
    out
}

pub fn print_function(func: &IrFunction, interner: &StringInterner) -> String {
    let mut out = String::with_capacity(256);
    let params: Vec<String> = func
        .params
        .iter()
        .map(|(var, ty)| format!("v{}: {ty}", var.raw()))
        .collect();
    let _ = write!(
        out,
        "fn @{}({})",
        interner.lookup(func.name),
        params.join(", ")
    );
    if let Some(ret) = func.ret {
        let _ = write!(out, " -> {ret}");
    }
    out.push_str(" {\n");
    for block in &func.blocks {
        write_block(&mut out, block, interner);
    }
    out.push_str("}\n");
    out
}

fn write_block(out: &mut String, block: &Block, interner: &StringInterner) {
    let _ = write!(out, "bb{}", block.id.raw());
    if !block.params.is_empty() {
        let params: Vec<String> = block
            .params
            .iter()
            .map(|(var, ty)| format!("v{}: {ty}", var.raw()))
            .collect();
        let _ = write!(out, "({})", params.join(", "));
    }
    out.push_str(":\n");
    for instr in &block.body {
        let _ = writeln!(out, "  {}", format_instr(instr, interner));
    }
    let _ = writeln!(out, "  {}", format_terminator(&block.terminator));
}

/// One instruction, e.g. `v4 = add.i32 v3, v1`.
pub fn format_instr(instr: &Instr, interner: &StringInterner) -> String {
    match instr {
        Instr::Const { dst, ty, value } => {
            format!("v{} = const.{ty} {}", dst.raw(), format_constant(*ty, *value))
        }
        Instr::Load { dst, ty, ptr } => format!("v{} = load.{ty} v{}", dst.raw(), ptr.raw()),
        Instr::Store { ty, ptr, value } => {
            format!("store.{ty} v{}, v{}", value.raw(), ptr.raw())
        }
        Instr::BinOp {
            dst,
            op,
            ty,
            lhs,
            rhs,
        } => format!(
            "v{} = {}.{ty} v{}, v{}",
            dst.raw(),
            binop_mnemonic(*op),
            lhs.raw(),
            rhs.raw()
        ),
        Instr::Unary {
            dst,
            op,
            ty,
            operand,
        } => {
            let name = match op {
                UnaryOp::Neg => "neg",
                UnaryOp::Not => "not",
                UnaryOp::BitNot => "bitnot",
            };
            format!("v{} = {name}.{ty} v{}", dst.raw(), operand.raw())
        }
        Instr::Cast {
            dst,
            from,
            to,
            value,
        } => format!("v{} = cast.{from}.{to} v{}", dst.raw(), value.raw()),
        Instr::Call {
            dst,
            ret,
            func,
            args,
        } => {
            let args: Vec<String> = args.iter().map(|a| format!("v{}", a.raw())).collect();
            let callee = interner.lookup(*func);
            match (dst, ret) {
                (Some(dst), Some(ret)) => {
                    format!("v{} = call.{ret} @{callee}({})", dst.raw(), args.join(", "))
                }
                _ => format!("call @{callee}({})", args.join(", ")),
            }
        }
        Instr::Alloca { dst, size, align } => {
            format!("v{} = alloca {size}, align {align}", dst.raw())
        }
        Instr::GetFieldPtr { dst, base, offset } => {
            format!("v{} = fieldptr v{}, {offset}", dst.raw(), base.raw())
        }
        Instr::GlobalAddr { dst, name } => {
            format!("v{} = globaladdr @{}", dst.raw(), interner.lookup(*name))
        }
        Instr::StrAddr { dst, value } => {
            format!("v{} = straddr {:?}", dst.raw(), interner.lookup(*value))
        }
    }
}

pub fn format_terminator(terminator: &Terminator) -> String {
    match terminator {
        Terminator::Branch { target, args } if args.is_empty() => format!("br bb{}", target.raw()),
        Terminator::Branch { target, args } => {
            let args: Vec<String> = args.iter().map(|a| format!("v{}", a.raw())).collect();
            format!("br bb{}({})", target.raw(), args.join(", "))
        }
        Terminator::CondBranch {
            cond,
            then_block,
            else_block,
        } => format!(
            "condbr v{}, bb{}, bb{}",
            cond.raw(),
            then_block.raw(),
            else_block.raw()
        ),
        Terminator::Return(Some(value)) => format!("ret v{}", value.raw()),
        Terminator::Return(None) => "ret".to_owned(),
        Terminator::Unreachable => "unreachable".to_owned(),
    }
}

fn binop_mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::Mod => "rem",
        BinaryOp::Eq => "eq",
        BinaryOp::NotEq => "ne",
        BinaryOp::Lt => "lt",
        BinaryOp::LtEq => "le",
        BinaryOp::Gt => "gt",
        BinaryOp::GtEq => "ge",
        BinaryOp::And => "land",
        BinaryOp::Or => "lor",
        BinaryOp::BitAnd => "and",
        BinaryOp::BitOr => "or",
        BinaryOp::BitXor => "xor",
        BinaryOp::Shl => "shl",
        BinaryOp::Shr => "shr",
    }
}

/// Signed constants print with their sign, floats in shortest round-trip form.
fn format_constant(ty: IrType, value: Constant) -> String {
    match value {
        Constant::Bool(b) => b.to_string(),
        Constant::Float(bits) => {
            let f = f64::from_bits(bits);
            if ty == IrType::F32 {
                let narrow = f as f32;
                format!("{narrow:?}")
            } else {
                format!("{f:?}")
            }
        }
        Constant::Int(bits) if ty.is_signed() => {
            let shift = 64 - ty.size() * 8;
            let signed = ((bits << shift) as i64) >> shift;
            signed.to_string()
        }
        Constant::Int(bits) => {
            let mask = if ty.size() >= 8 {
                u64::MAX
            } else {
                (1u64 << (ty.size() * 8)) - 1
            };
            (bits & mask).to_string()
        }
    }
}

#[cfg(test)]
mod tests;
