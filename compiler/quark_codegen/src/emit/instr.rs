//! Instruction selection.
//!
//! Integer values are held sign- or zero-extended to 64 bits, so 64-bit
//! arithmetic, comparison, division and right shifts give the right answer
//! for every width once the result is re-extended with [`extend_rax`].
//!
//! [`extend_rax`]: FunctionEmitter::extend_rax

use quark_ir::{BinaryOp, Name, UnaryOp};
use quark_mir::{Constant, Instr, IrType, VarId};

use crate::abi::{classify_args, ArgLoc, FLOAT_RET, SLOT_SIZE};
use crate::CodegenError;

use super::function::FunctionEmitter;
use super::moves::mov;
use super::{constant_bits, Slot, RAX, RCX, XMM14, XMM15};

/// `ss`/`sd` suffix of scalar SSE instructions.
fn sse_suffix(ty: IrType) -> &'static str {
    if ty == IrType::F32 {
        "ss"
    } else {
        "sd"
    }
}

impl FunctionEmitter<'_> {
    pub(super) fn emit_instr(&mut self, instr: &Instr) -> Result<(), CodegenError> {
        match instr {
            Instr::Const { dst, ty, value } => self.emit_const(*dst, *ty, *value)?,
            Instr::Load { dst, ty, ptr } => self.emit_load(*dst, *ty, *ptr)?,
            Instr::Store { ty, ptr, value } => self.emit_store(*ty, *ptr, *value)?,
            Instr::BinOp {
                dst,
                op,
                ty,
                lhs,
                rhs,
            } => {
                if ty.is_float() {
                    self.emit_float_binop(*dst, *op, *ty, *lhs, *rhs)?;
                } else {
                    self.emit_int_binop(*dst, *op, *ty, *lhs, *rhs)?;
                }
            }
            Instr::Unary {
                dst,
                op,
                ty,
                operand,
            } => self.emit_unary(*dst, *op, *ty, *operand)?,
            Instr::Cast {
                dst,
                from,
                to,
                value,
            } => self.emit_cast(*dst, *from, *to, *value)?,
            Instr::Call {
                dst,
                ret,
                func,
                args,
            } => self.emit_call(*dst, *ret, *func, args)?,
            Instr::Alloca { dst, .. } => {
                let offset = self.alloca_offset(*dst)?;
                emit!(self.w, "leaq {offset}(%rbp), %rax");
                self.def(*dst, RAX)?;
            }
            Instr::GetFieldPtr { dst, base, offset } => {
                self.use_into(*base, RAX)?;
                emit!(self.w, "leaq {offset}(%rax), %rax");
                self.def(*dst, RAX)?;
            }
            Instr::GlobalAddr { dst, name } => {
                let symbol = self.symbol(*name);
                emit!(self.w, "leaq {symbol}(%rip), %rax");
                self.def(*dst, RAX)?;
            }
            Instr::StrAddr { dst, value } => {
                let label = self.string_label(*value)?;
                emit!(self.w, "leaq {label}(%rip), %rax");
                self.def(*dst, RAX)?;
            }
        }
        Ok(())
    }

    /// Copy `var` into the scratch `slot`.
    fn use_into(&mut self, var: VarId, slot: Slot) -> Result<(), CodegenError> {
        let src = self.slot(var)?;
        mov(self.w, src, slot);
        Ok(())
    }

    /// Store a result from scratch `slot` into `var`'s home.
    fn def(&mut self, var: VarId, slot: Slot) -> Result<(), CodegenError> {
        let dst = self.slot(var)?;
        mov(self.w, slot, dst);
        Ok(())
    }

    /// Re-extend `rax` to the canonical form of `ty`.
    pub(super) fn extend_rax(&mut self, ty: IrType) {
        match ty {
            IrType::I8 => emit!(self.w, "movsbq %al, %rax"),
            IrType::I16 => emit!(self.w, "movswq %ax, %rax"),
            IrType::I32 => emit!(self.w, "movslq %eax, %rax"),
            IrType::U8 | IrType::Bool => emit!(self.w, "movzbl %al, %eax"),
            IrType::U16 => emit!(self.w, "movzwl %ax, %eax"),
            IrType::U32 => emit!(self.w, "movl %eax, %eax"),
            IrType::I64 | IrType::U64 | IrType::Ptr | IrType::F32 | IrType::F64 => {}
        }
    }

    fn emit_const(&mut self, dst: VarId, ty: IrType, value: Constant) -> Result<(), CodegenError> {
        let bits = constant_bits(ty, value);
        let dst_slot = self.slot(dst)?;
        match (ty, i32::try_from(bits as i64)) {
            (IrType::F32, _) => {
                emit!(self.w, "movl ${bits}, %eax");
                mov(self.w, RAX, dst_slot);
            }
            (IrType::F64, _) => {
                emit!(self.w, "movabsq ${}, %rax", bits as i64);
                mov(self.w, RAX, dst_slot);
            }
            (_, Ok(imm)) => match dst_slot {
                Slot::Xmm(_) => {
                    emit!(self.w, "movq ${imm}, %rax");
                    mov(self.w, RAX, dst_slot);
                }
                Slot::Gpr(_) | Slot::Frame(_) => emit!(self.w, "movq ${imm}, {dst_slot}"),
            },
            (_, Err(_)) => {
                emit!(self.w, "movabsq ${}, %rax", bits as i64);
                mov(self.w, RAX, dst_slot);
            }
        }
        Ok(())
    }

    fn emit_load(&mut self, dst: VarId, ty: IrType, ptr: VarId) -> Result<(), CodegenError> {
        self.use_into(ptr, RAX)?;
        match ty {
            IrType::F32 | IrType::F64 => {
                emit!(self.w, "mov{} (%rax), %xmm14", sse_suffix(ty));
                return self.def(dst, XMM14);
            }
            IrType::I8 => emit!(self.w, "movsbq (%rax), %rax"),
            IrType::I16 => emit!(self.w, "movswq (%rax), %rax"),
            IrType::I32 => emit!(self.w, "movslq (%rax), %rax"),
            IrType::U8 | IrType::Bool => emit!(self.w, "movzbl (%rax), %eax"),
            IrType::U16 => emit!(self.w, "movzwl (%rax), %eax"),
            IrType::U32 => emit!(self.w, "movl (%rax), %eax"),
            IrType::I64 | IrType::U64 | IrType::Ptr => emit!(self.w, "movq (%rax), %rax"),
        }
        self.def(dst, RAX)
    }

    fn emit_store(&mut self, ty: IrType, ptr: VarId, value: VarId) -> Result<(), CodegenError> {
        self.use_into(ptr, RAX)?;
        if ty.is_float() {
            self.use_into(value, XMM14)?;
            emit!(self.w, "mov{} %xmm14, (%rax)", sse_suffix(ty));
            return Ok(());
        }
        self.use_into(value, RCX)?;
        match ty.size() {
            1 => emit!(self.w, "movb %cl, (%rax)"),
            2 => emit!(self.w, "movw %cx, (%rax)"),
            4 => emit!(self.w, "movl %ecx, (%rax)"),
            _ => emit!(self.w, "movq %rcx, (%rax)"),
        }
        Ok(())
    }

    fn emit_int_binop(
        &mut self,
        dst: VarId,
        op: BinaryOp,
        ty: IrType,
        lhs: VarId,
        rhs: VarId,
    ) -> Result<(), CodegenError> {
        self.use_into(lhs, RAX)?;
        self.use_into(rhs, RCX)?;
        let signed = ty.is_signed();
        match op {
            BinaryOp::Add => emit!(self.w, "addq %rcx, %rax"),
            BinaryOp::Sub => emit!(self.w, "subq %rcx, %rax"),
            BinaryOp::Mul => emit!(self.w, "imulq %rcx, %rax"),
            BinaryOp::BitAnd | BinaryOp::And => emit!(self.w, "andq %rcx, %rax"),
            BinaryOp::BitOr | BinaryOp::Or => emit!(self.w, "orq %rcx, %rax"),
            BinaryOp::BitXor => emit!(self.w, "xorq %rcx, %rax"),
            BinaryOp::Div | BinaryOp::Mod => {
                if signed {
                    emit!(self.w, "cqto");
                    emit!(self.w, "idivq %rcx");
                } else {
                    emit!(self.w, "xorl %edx, %edx");
                    emit!(self.w, "divq %rcx");
                }
                if op == BinaryOp::Mod {
                    emit!(self.w, "movq %rdx, %rax");
                }
            }
            BinaryOp::Shl | BinaryOp::Shr => {
                if ty.size() < 8 {
                    emit!(self.w, "andl $31, %ecx");
                }
                let mnemonic = match op {
                    BinaryOp::Shl => "shlq",
                    _ if signed => "sarq",
                    _ => "shrq",
                };
                emit!(self.w, "{mnemonic} %cl, %rax");
            }
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => {
                let cc = match (op, signed) {
                    (BinaryOp::Eq, _) => "e",
                    (BinaryOp::NotEq, _) => "ne",
                    (BinaryOp::Lt, true) => "l",
                    (BinaryOp::LtEq, true) => "le",
                    (BinaryOp::Gt, true) => "g",
                    (BinaryOp::GtEq, true) => "ge",
                    (BinaryOp::Lt, false) => "b",
                    (BinaryOp::LtEq, false) => "be",
                    (BinaryOp::Gt, false) => "a",
                    _ => "ae",
                };
                emit!(self.w, "cmpq %rcx, %rax");
                emit!(self.w, "set{cc} %al");
                emit!(self.w, "movzbl %al, %eax");
                return self.def(dst, RAX);
            }
        }
        self.extend_rax(ty);
        self.def(dst, RAX)
    }

    fn emit_float_binop(
        &mut self,
        dst: VarId,
        op: BinaryOp,
        ty: IrType,
        lhs: VarId,
        rhs: VarId,
    ) -> Result<(), CodegenError> {
        self.use_into(lhs, XMM14)?;
        self.use_into(rhs, XMM15)?;
        let sfx = sse_suffix(ty);
        let arith = match op {
            BinaryOp::Add => Some("add"),
            BinaryOp::Sub => Some("sub"),
            BinaryOp::Mul => Some("mul"),
            BinaryOp::Div => Some("div"),
            _ => None,
        };
        if let Some(arith) = arith {
            emit!(self.w, "{arith}{sfx} %xmm15, %xmm14");
            return self.def(dst, XMM14);
        }

        // `ucomis` leaves ZF, PF and CF all set for unordered operands, so
        // `a`/`ae` are false on NaN; `<` and `<=` swap the operands.
        match op {
            BinaryOp::Gt | BinaryOp::GtEq => emit!(self.w, "ucomi{sfx} %xmm15, %xmm14"),
            BinaryOp::Lt | BinaryOp::LtEq => emit!(self.w, "ucomi{sfx} %xmm14, %xmm15"),
            BinaryOp::Eq | BinaryOp::NotEq => emit!(self.w, "ucomi{sfx} %xmm15, %xmm14"),
            _ => return Err(self.fault(format!("`{}` on {ty}", op.as_symbol())).into()),
        }
        match op {
            BinaryOp::Gt | BinaryOp::Lt => emit!(self.w, "seta %al"),
            BinaryOp::GtEq | BinaryOp::LtEq => emit!(self.w, "setae %al"),
            BinaryOp::Eq => {
                emit!(self.w, "sete %al");
                emit!(self.w, "setnp %cl");
                emit!(self.w, "andb %cl, %al");
            }
            _ => {
                emit!(self.w, "setne %al");
                emit!(self.w, "setp %cl");
                emit!(self.w, "orb %cl, %al");
            }
        }
        emit!(self.w, "movzbl %al, %eax");
        self.def(dst, RAX)
    }

    fn emit_unary(
        &mut self,
        dst: VarId,
        op: UnaryOp,
        ty: IrType,
        operand: VarId,
    ) -> Result<(), CodegenError> {
        match op {
            UnaryOp::Neg if ty.is_float() => {
                self.use_into(operand, XMM14)?;
                if ty == IrType::F32 {
                    emit!(self.w, "movl $0x80000000, %eax");
                } else {
                    emit!(self.w, "movabsq $0x8000000000000000, %rax");
                }
                emit!(self.w, "movq %rax, %xmm15");
                emit!(self.w, "xorps %xmm15, %xmm14");
                return self.def(dst, XMM14);
            }
            UnaryOp::Neg => {
                self.use_into(operand, RAX)?;
                emit!(self.w, "negq %rax");
            }
            UnaryOp::Not => {
                self.use_into(operand, RAX)?;
                emit!(self.w, "xorq $1, %rax");
            }
            UnaryOp::BitNot => {
                self.use_into(operand, RAX)?;
                emit!(self.w, "notq %rax");
            }
        }
        self.extend_rax(ty);
        self.def(dst, RAX)
    }

    fn emit_cast(
        &mut self,
        dst: VarId,
        from: IrType,
        to: IrType,
        value: VarId,
    ) -> Result<(), CodegenError> {
        match (from.is_float(), to.is_float()) {
            (true, true) => {
                self.use_into(value, XMM14)?;
                if from != to {
                    emit!(
                        self.w,
                        "cvt{}2{} %xmm14, %xmm14",
                        sse_suffix(from),
                        sse_suffix(to)
                    );
                }
                self.def(dst, XMM14)
            }
            (false, true) => {
                self.use_into(value, RAX)?;
                let sfx = sse_suffix(to);
                if from == IrType::U64 {
                    self.u64_to_float(sfx);
                } else {
                    emit!(self.w, "cvtsi2{sfx}q %rax, %xmm14");
                }
                self.def(dst, XMM14)
            }
            (true, false) if to == IrType::Bool => {
                // Any bit set, so `-0.0` is true.
                self.use_into(value, RAX)?;
                if from == IrType::F32 {
                    emit!(self.w, "movl %eax, %eax");
                }
                self.set_nonzero(dst)
            }
            (true, false) => {
                self.use_into(value, XMM14)?;
                emit!(self.w, "cvtt{}2siq %xmm14, %rax", sse_suffix(from));
                self.extend_rax(to);
                self.def(dst, RAX)
            }
            (false, false) if to == IrType::Bool => {
                self.use_into(value, RAX)?;
                self.set_nonzero(dst)
            }
            (false, false) => {
                self.use_into(value, RAX)?;
                self.extend_rax(to);
                self.def(dst, RAX)
            }
        }
    }

    fn set_nonzero(&mut self, dst: VarId) -> Result<(), CodegenError> {
        emit!(self.w, "testq %rax, %rax");
        emit!(self.w, "setne %al");
        emit!(self.w, "movzbl %al, %eax");
        self.def(dst, RAX)
    }

    /// `rax` as an unsigned 64-bit integer into `xmm14`. Values with the top
    /// bit set are halved (keeping the low bit for rounding), converted,
    /// and doubled.
    fn u64_to_float(&mut self, sfx: &str) {
        let big = self.fresh_label("u2f");
        let done = format!("{big}_done");
        emit!(self.w, "testq %rax, %rax");
        emit!(self.w, "js {big}");
        emit!(self.w, "cvtsi2{sfx}q %rax, %xmm14");
        emit!(self.w, "jmp {done}");
        self.w.label(&big);
        emit!(self.w, "movq %rax, %rcx");
        emit!(self.w, "shrq %rcx");
        emit!(self.w, "andl $1, %eax");
        emit!(self.w, "orq %rax, %rcx");
        emit!(self.w, "cvtsi2{sfx}q %rcx, %xmm14");
        emit!(self.w, "add{sfx} %xmm14, %xmm14");
        self.w.label(&done);
    }

    /// Direct call. Stack arguments are pushed right to left above an
    /// optional 8-byte pad that keeps `rsp` 16-byte aligned at the `call`;
    /// register arguments go through the stack too, so loading one argument
    /// register never clobbers another argument's source.
    fn emit_call(
        &mut self,
        dst: Option<VarId>,
        ret: Option<IrType>,
        callee: Name,
        args: &[VarId],
    ) -> Result<(), CodegenError> {
        let types: Vec<IrType> = args.iter().map(|&arg| self.func.var_type(arg)).collect();
        let layout = classify_args(&types);
        let padding = layout.stack_slots % 2 * SLOT_SIZE;
        if padding > 0 {
            emit!(self.w, "subq ${padding}, %rsp");
        }

        for (&arg, loc) in args.iter().zip(&layout.args).rev() {
            if let ArgLoc::Stack(_) = loc {
                self.push(arg)?;
            }
        }
        let in_registers: Vec<(VarId, ArgLoc)> = args
            .iter()
            .copied()
            .zip(layout.args.iter().copied())
            .filter(|(_, loc)| !matches!(loc, ArgLoc::Stack(_)))
            .collect();
        for &(arg, _) in &in_registers {
            self.push(arg)?;
        }
        for &(_, loc) in in_registers.iter().rev() {
            match loc {
                ArgLoc::Gpr(reg) => emit!(self.w, "popq {reg}"),
                ArgLoc::Xmm(reg) => {
                    emit!(self.w, "popq %rax");
                    emit!(self.w, "movq %rax, {reg}");
                }
                ArgLoc::Stack(_) => {}
            }
        }

        emit!(self.w, "movl ${}, %eax", layout.vector_regs);
        let symbol = self.symbol(callee);
        if self.is_extern(callee) {
            emit!(self.w, "call {symbol}@PLT");
        } else {
            emit!(self.w, "call {symbol}");
        }
        let cleanup = layout.stack_slots * SLOT_SIZE + padding;
        if cleanup > 0 {
            emit!(self.w, "addq ${cleanup}, %rsp");
        }

        match (dst, ret) {
            (Some(dst), Some(ty)) if ty.is_float() => self.def(dst, Slot::Xmm(FLOAT_RET)),
            (Some(dst), Some(ty)) => {
                self.extend_rax(ty);
                self.def(dst, RAX)
            }
            _ => Ok(()),
        }
    }

    fn push(&mut self, var: VarId) -> Result<(), CodegenError> {
        match self.slot(var)? {
            slot @ (Slot::Gpr(_) | Slot::Frame(_)) => emit!(self.w, "pushq {slot}"),
            slot @ Slot::Xmm(_) => {
                mov(self.w, slot, RAX);
                emit!(self.w, "pushq %rax");
            }
        }
        Ok(())
    }
}
