//! Per-function emission: frame layout, prologue and epilogue, blocks in
//! IR order, and terminators.
//!
//! Frame layout below `rbp`, from high to low addresses:
//!
//! ```text
//! saved callee-saved registers   8 bytes each
//! allocas                        each aligned to its own alignment
//! spill slots                    8 bytes each
//! ```
//!
//! The total is rounded up to 16 so `rsp` stays call-aligned.

use quark_diagnostic::{FaultPhase, InternalCompilerFault};
use quark_ir::{Name, StringInterner};
use quark_mir::{format_instr, format_terminator, BlockId, Instr, IrFunction, Terminator, VarId};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::abi::{classify_args, ArgLoc, Gpr, FLOAT_RET, INT_RET, SLOT_SIZE, STACK_ALIGN};
use crate::liveness::{build_intervals, compute_liveness};
use crate::regalloc::{self, Assignment, Location};
use crate::CodegenError;

use super::moves::{mov, parallel_move};
use super::{AsmWriter, Slot, RAX};

struct Frame {
    slots: Vec<Option<Slot>>,
    allocas: FxHashMap<VarId, i32>,
    saved: Vec<(Gpr, i32)>,
    size: u32,
}

fn align_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

fn layout_frame(func: &IrFunction, assignment: &Assignment) -> Frame {
    let mut cursor = 0u32;
    let saved = assignment
        .used_callee_saved
        .iter()
        .map(|&reg| {
            cursor += SLOT_SIZE;
            (reg, -(cursor as i32))
        })
        .collect();

    let mut allocas = FxHashMap::default();
    for instr in &func.block(IrFunction::ENTRY).body {
        if let Instr::Alloca { dst, size, align } = *instr {
            cursor = align_up(cursor + size, align.max(1));
            allocas.insert(dst, -(cursor as i32));
        }
    }

    let spill_base = align_up(cursor, SLOT_SIZE);
    let slots = assignment
        .locations
        .iter()
        .map(|loc| {
            loc.map(|loc| match loc {
                Location::Gpr(reg) => Slot::Gpr(reg),
                Location::Xmm(reg) => Slot::Xmm(reg),
                Location::Spill(k) => Slot::Frame(-((spill_base + SLOT_SIZE * (k + 1)) as i32)),
            })
        })
        .collect();
    let size = align_up(spill_base + SLOT_SIZE * assignment.spill_slots, STACK_ALIGN);

    Frame {
        slots,
        allocas,
        saved,
        size,
    }
}

pub(super) struct FunctionEmitter<'a> {
    pub(super) w: &'a mut AsmWriter,
    pub(super) func: &'a IrFunction,
    interner: &'a StringInterner,
    externs: &'a FxHashSet<Name>,
    strings: &'a [Name],
    pub(super) name: &'a str,
    frame: Frame,
    labels: u32,
}

#[tracing::instrument(level = "debug", skip_all, fields(function = interner.lookup(func.name)))]
pub(super) fn emit_function(
    w: &mut AsmWriter,
    func: &IrFunction,
    interner: &StringInterner,
    externs: &FxHashSet<Name>,
    strings: &[Name],
) -> Result<(), CodegenError> {
    let liveness = compute_liveness(func);
    let layout = build_intervals(func, &liveness);
    let assignment = regalloc::allocate(func, &layout);
    let frame = layout_frame(func, &assignment);
    tracing::trace!(frame_size = frame.size, "frame laid out");

    let mut emitter = FunctionEmitter {
        w,
        func,
        interner,
        externs,
        strings,
        name: interner.lookup(func.name),
        frame,
        labels: 0,
    };
    emitter.emit()
}

impl<'a> FunctionEmitter<'a> {
    fn emit(&mut self) -> Result<(), CodegenError> {
        let func = self.func;
        let interner = self.interner;
        let name = self.name;
        emit!(self.w, ".globl {name}");
        emit!(self.w, ".type {name}, @function");
        self.w.label(name);
        self.prologue()?;

        for (i, block) in func.blocks.iter().enumerate() {
            let label = self.block_label(block.id);
            self.w.label(&label);
            for instr in &block.body {
                self.emit_instr(instr)
                    .map_err(|err| with_context(err, || format_instr(instr, interner)))?;
            }
            let next = func.blocks.get(i + 1).map(|b| b.id);
            self.emit_terminator(&block.terminator, next)
                .map_err(|err| with_context(err, || format_terminator(&block.terminator)))?;
        }

        self.epilogue();
        emit!(self.w, ".size {name}, .-{name}");
        Ok(())
    }

    fn prologue(&mut self) -> Result<(), CodegenError> {
        emit!(self.w, "pushq %rbp");
        emit!(self.w, "movq %rsp, %rbp");
        if self.frame.size > 0 {
            emit!(self.w, "subq ${}, %rsp", self.frame.size);
        }
        for &(reg, offset) in &self.frame.saved {
            emit!(self.w, "movq {reg}, {offset}(%rbp)");
        }

        let func = self.func;
        let types: Vec<_> = func.params.iter().map(|&(_, ty)| ty).collect();
        let layout = classify_args(&types);
        let mut moves = Vec::with_capacity(func.params.len());
        for (&(param, _), loc) in func.params.iter().zip(&layout.args) {
            let src = match *loc {
                ArgLoc::Gpr(reg) => Slot::Gpr(reg),
                ArgLoc::Xmm(reg) => Slot::Xmm(reg),
                ArgLoc::Stack(k) => Slot::Frame(ArgLoc::callee_offset(k)),
            };
            moves.push((src, self.slot(param)?));
        }
        parallel_move(self.w, moves);

        // Callers only guarantee the low bits of narrow arguments.
        for &(param, ty) in &func.params {
            if !ty.is_float() && ty.size() < 8 {
                let slot = self.slot(param)?;
                mov(self.w, slot, RAX);
                self.extend_rax(ty);
                mov(self.w, RAX, slot);
            }
        }
        Ok(())
    }

    fn epilogue(&mut self) {
        let label = self.return_label();
        self.w.label(&label);
        for &(reg, offset) in &self.frame.saved {
            emit!(self.w, "movq {offset}(%rbp), {reg}");
        }
        emit!(self.w, "leave");
        emit!(self.w, "ret");
    }

    fn emit_terminator(
        &mut self,
        terminator: &Terminator,
        next: Option<BlockId>,
    ) -> Result<(), CodegenError> {
        match terminator {
            Terminator::Branch { target, args } => {
                let func = self.func;
                let params = &func.block(*target).params;
                if params.len() != args.len() {
                    return Err(self.fault("branch argument count does not match its target").into());
                }
                let mut moves = Vec::with_capacity(args.len());
                for (&arg, &(param, _)) in args.iter().zip(params) {
                    moves.push((self.slot(arg)?, self.slot(param)?));
                }
                parallel_move(self.w, moves);
                if next != Some(*target) {
                    let label = self.block_label(*target);
                    emit!(self.w, "jmp {label}");
                }
            }
            Terminator::CondBranch {
                cond,
                then_block,
                else_block,
            } => {
                let cond = self.slot(*cond)?;
                mov(self.w, cond, RAX);
                emit!(self.w, "testq %rax, %rax");
                let then_label = self.block_label(*then_block);
                let else_label = self.block_label(*else_block);
                if next == Some(*then_block) {
                    emit!(self.w, "je {else_label}");
                } else {
                    emit!(self.w, "jne {then_label}");
                    if next != Some(*else_block) {
                        emit!(self.w, "jmp {else_label}");
                    }
                }
            }
            Terminator::Return(value) => {
                if let Some(value) = *value {
                    let src = self.slot(value)?;
                    let dst = if self.func.var_type(value).is_float() {
                        Slot::Xmm(FLOAT_RET)
                    } else {
                        Slot::Gpr(INT_RET)
                    };
                    mov(self.w, src, dst);
                }
                // The epilogue follows the last block.
                if next.is_some() {
                    let label = self.return_label();
                    emit!(self.w, "jmp {label}");
                }
            }
            Terminator::Unreachable => emit!(self.w, "ud2"),
        }
        Ok(())
    }

    // === Helpers shared with instruction selection ===

    pub(super) fn slot(&self, var: VarId) -> Result<Slot, InternalCompilerFault> {
        self.frame
            .slots
            .get(var.index())
            .copied()
            .flatten()
            .ok_or_else(|| self.fault(format!("v{} has no assigned location", var.raw())))
    }

    pub(super) fn alloca_offset(&self, var: VarId) -> Result<i32, InternalCompilerFault> {
        self.frame
            .allocas
            .get(&var)
            .copied()
            .ok_or_else(|| self.fault(format!("v{} is not an entry-block alloca", var.raw())))
    }

    pub(super) fn symbol(&self, name: Name) -> &'a str {
        self.interner.lookup(name)
    }

    pub(super) fn is_extern(&self, name: Name) -> bool {
        self.externs.contains(&name)
    }

    /// Read-only data label of a string literal.
    pub(super) fn string_label(&self, value: Name) -> Result<String, InternalCompilerFault> {
        self.strings
            .iter()
            .position(|&s| s == value)
            .map(super::string_label)
            .ok_or_else(|| self.fault("string literal missing from the module"))
    }

    pub(super) fn fresh_label(&mut self, kind: &str) -> String {
        self.labels += 1;
        format!(".L{}_{kind}{}", self.name, self.labels - 1)
    }

    pub(super) fn fault(&self, message: impl std::fmt::Display) -> InternalCompilerFault {
        InternalCompilerFault::new(FaultPhase::Codegen, format!("in `{}`: {message}", self.name))
    }

    fn block_label(&self, block: BlockId) -> String {
        format!(".L{}_bb{}", self.name, block.raw())
    }

    fn return_label(&self) -> String {
        format!(".L{}_ret", self.name)
    }
}

/// Attach the offending IR node to a fault that has none yet.
fn with_context(err: CodegenError, render: impl FnOnce() -> String) -> CodegenError {
    match err {
        CodegenError::Fault(fault) if fault.context.is_empty() => {
            CodegenError::Fault(fault.with_context(render()))
        }
        other => other,
    }
}
