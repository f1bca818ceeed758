//! AT&T assembly emission.
//!
//! A module is emitted as `.data` (initialized globals), `.bss` (zeroed
//! globals), `.rodata` (string literals), `.text` (one symbol per function),
//! and the non-executable stack note.
//!
//! Every SSA variable lives in one [`Slot`] for its whole life. Instruction
//! selection loads operands into the scratch registers (`rax`, `rcx`, `rdx`
//! for integers, `xmm14`, `xmm15` for floats), computes there, re-extends
//! narrow integers to their canonical 64-bit form, and stores the result
//! back to the destination slot.

use std::fmt::{self, Write};

/// Append one indented line to an [`AsmWriter`].
macro_rules! emit {
    ($w:expr, $($arg:tt)*) => {
        $w.line(format_args!($($arg)*))
    };
}

mod function;
mod instr;
mod moves;

use quark_ir::StringInterner;
use quark_mir::{Constant, GlobalInit, IrGlobal, IrModule, IrType};
use rustc_hash::FxHashSet;

use crate::abi::{Gpr, Xmm};
use crate::{CodegenError, Target};

/// Text buffer for assembly output.
pub(crate) struct AsmWriter {
    output: String,
}

impl AsmWriter {
    pub(crate) fn new() -> Self {
        AsmWriter {
            output: String::with_capacity(4096),
        }
    }

    /// Directive or instruction, indented one tab.
    pub(crate) fn line(&mut self, args: fmt::Arguments<'_>) {
        self.output.push('\t');
        let _ = self.output.write_fmt(args);
        self.output.push('\n');
    }

    pub(crate) fn label(&mut self, label: &str) {
        self.output.push_str(label);
        self.output.push_str(":\n");
    }

    pub(crate) fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

/// Home of a variable: a register or an `rbp`-relative frame offset.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum Slot {
    Gpr(Gpr),
    Xmm(Xmm),
    Frame(i32),
}

pub(crate) const RAX: Slot = Slot::Gpr(Gpr::Rax);
pub(crate) const RCX: Slot = Slot::Gpr(Gpr::Rcx);
pub(crate) const XMM14: Slot = Slot::Xmm(Xmm(14));
pub(crate) const XMM15: Slot = Slot::Xmm(Xmm(15));

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Gpr(reg) => fmt::Display::fmt(reg, f),
            Slot::Xmm(reg) => fmt::Display::fmt(reg, f),
            Slot::Frame(offset) => write!(f, "{offset}(%rbp)"),
        }
    }
}

/// Bit pattern of a constant as stored in memory, in the low
/// `ty.size()` bytes.
pub(crate) fn constant_bits(ty: IrType, value: Constant) -> u64 {
    match value {
        Constant::Int(bits) => ty.canonical(bits),
        Constant::Float(bits) if ty == IrType::F32 => {
            u64::from((f64::from_bits(bits) as f32).to_bits())
        }
        Constant::Float(bits) => bits,
        Constant::Bool(b) => u64::from(b),
    }
}

/// Emit a whole module. The IR must already have passed verification.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(triple = target.triple(), functions = module.functions.len())
)]
pub fn emit_module(
    module: &IrModule,
    interner: &StringInterner,
    target: Target,
) -> Result<String, CodegenError> {
    let Target::X86_64LinuxGnu = target;

    let mut w = AsmWriter::new();
    emit_globals(&mut w, module, interner);
    emit_strings(&mut w, module, interner);

    let externs: FxHashSet<_> = module.externs.iter().map(|e| e.name).collect();
    if !module.functions.is_empty() {
        emit!(w, ".text");
    }
    for func in &module.functions {
        function::emit_function(&mut w, func, interner, &externs, &module.strings)?;
    }

    emit!(w, ".section .note.GNU-stack,\"\",@progbits");
    Ok(w.take_output())
}

fn emit_globals(w: &mut AsmWriter, module: &IrModule, interner: &StringInterner) {
    let (data, bss): (Vec<&IrGlobal>, Vec<&IrGlobal>) =
        module.globals.iter().partition(|g| g.init.is_some());

    if !data.is_empty() {
        emit!(w, ".data");
    }
    for global in data {
        global_header(w, global, interner);
        if let Some(init) = global.init {
            emit_init(w, init);
            if global.size > init.ty.size() {
                emit!(w, ".zero {}", global.size - init.ty.size());
            }
        }
    }

    if !bss.is_empty() {
        emit!(w, ".bss");
    }
    for global in bss {
        global_header(w, global, interner);
        emit!(w, ".zero {}", global.size.max(1));
    }
}

fn emit_strings(w: &mut AsmWriter, module: &IrModule, interner: &StringInterner) {
    if module.strings.is_empty() {
        return;
    }
    emit!(w, ".section .rodata");
    for (index, &value) in module.strings.iter().enumerate() {
        w.label(&string_label(index));
        emit!(w, ".asciz \"{}\"", asm_string(interner.lookup(value).as_bytes()));
    }
}

fn string_label(index: usize) -> String {
    format!(".Lstr{index}")
}

/// Quote bytes for `.asciz`: printable ASCII as is, everything else as a
/// three-digit octal escape.
fn asm_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b' '..=b'~' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out
}

fn global_header(w: &mut AsmWriter, global: &IrGlobal, interner: &StringInterner) {
    let name = interner.lookup(global.name);
    emit!(w, ".globl {name}");
    emit!(w, ".balign {}", global.align.max(1));
    emit!(w, ".type {name}, @object");
    emit!(w, ".size {name}, {}", global.size);
    w.label(name);
}

fn emit_init(w: &mut AsmWriter, init: GlobalInit) {
    let bits = constant_bits(init.ty, init.value);
    match init.ty.size() {
        1 => emit!(w, ".byte {}", bits & 0xff),
        2 => emit!(w, ".short {}", bits & 0xffff),
        4 => emit!(w, ".long {}", bits & 0xffff_ffff),
        _ => emit!(w, ".quad {bits}"),
    }
}
