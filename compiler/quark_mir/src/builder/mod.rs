//! Incremental construction of an [`IrFunction`].
//!
//! Follows the "position at a block, emit instructions, terminate" pattern
//! of LLVM's `IRBuilder`, with block parameters instead of phi nodes.
//! Emitting into a terminated block is a no-op for terminators and appends
//! dead instructions otherwise; dead-block elimination removes both.

use quark_ir::{BinaryOp, Name, UnaryOp};

use crate::ir::{Block, BlockId, Constant, Instr, IrFunction, IrType, Terminator, VarId};

/// In-progress basic block.
struct BlockBuilder {
    params: Vec<(VarId, IrType)>,
    body: Vec<Instr>,
    terminator: Option<Terminator>,
}

impl BlockBuilder {
    fn new() -> Self {
        Self {
            params: Vec::new(),
            body: Vec::new(),
            terminator: None,
        }
    }
}

/// Builder for an in-progress function. Consumed by
/// [`finish`](IrBuilder::finish).
pub struct IrBuilder {
    blocks: Vec<BlockBuilder>,
    current: BlockId,
    var_types: Vec<IrType>,
    /// Number of `Alloca`s at the front of the entry block.
    allocas: usize,
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IrBuilder {
    /// A builder positioned at a fresh entry block.
    pub fn new() -> Self {
        Self {
            blocks: vec![BlockBuilder::new()],
            current: IrFunction::ENTRY,
            var_types: Vec::new(),
            allocas: 0,
        }
    }

    // === Blocks ===

    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        self.blocks.push(BlockBuilder::new());
        id
    }

    pub fn position_at(&mut self, block: BlockId) {
        debug_assert!(block.index() < self.blocks.len());
        self.current = block;
    }

    #[inline]
    pub fn current_block(&self) -> BlockId {
        self.current
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.blocks[self.current.index()].terminator.is_some()
    }

    pub fn block_param_count(&self, block: BlockId) -> usize {
        self.blocks[block.index()].params.len()
    }

    // === Variables ===

    pub fn fresh_var(&mut self, ty: IrType) -> VarId {
        let id = VarId::new(self.var_types.len() as u32);
        self.var_types.push(ty);
        id
    }

    #[inline]
    pub fn var_type(&self, var: VarId) -> IrType {
        self.var_types[var.index()]
    }

    pub fn add_block_param(&mut self, block: BlockId, ty: IrType) -> VarId {
        let var = self.fresh_var(ty);
        self.blocks[block.index()].params.push((var, ty));
        var
    }

    // === Instructions ===

    fn push(&mut self, instr: Instr) {
        self.blocks[self.current.index()].body.push(instr);
    }

    pub fn emit_const(&mut self, ty: IrType, value: Constant) -> VarId {
        let dst = self.fresh_var(ty);
        self.push(Instr::Const { dst, ty, value });
        dst
    }

    /// The all-zero value of a scalar type.
    pub fn emit_zero(&mut self, ty: IrType) -> VarId {
        let value = match ty {
            IrType::Bool => Constant::Bool(false),
            IrType::F32 | IrType::F64 => Constant::Float(0f64.to_bits()),
            _ => Constant::Int(0),
        };
        self.emit_const(ty, value)
    }

    pub fn emit_load(&mut self, ty: IrType, ptr: VarId) -> VarId {
        let dst = self.fresh_var(ty);
        self.push(Instr::Load { dst, ty, ptr });
        dst
    }

    pub fn emit_store(&mut self, ty: IrType, ptr: VarId, value: VarId) {
        self.push(Instr::Store { ty, ptr, value });
    }

    pub fn emit_binop(&mut self, op: BinaryOp, ty: IrType, lhs: VarId, rhs: VarId) -> VarId {
        let result = if op.is_comparison() { IrType::Bool } else { ty };
        let dst = self.fresh_var(result);
        self.push(Instr::BinOp {
            dst,
            op,
            ty,
            lhs,
            rhs,
        });
        dst
    }

    pub fn emit_unary(&mut self, op: UnaryOp, ty: IrType, operand: VarId) -> VarId {
        let dst = self.fresh_var(ty);
        self.push(Instr::Unary {
            dst,
            op,
            ty,
            operand,
        });
        dst
    }

    /// Convert `value` to `to`; returns `value` unchanged if it already has
    /// that type.
    pub fn emit_cast(&mut self, value: VarId, to: IrType) -> VarId {
        let from = self.var_type(value);
        if from == to {
            return value;
        }
        let dst = self.fresh_var(to);
        self.push(Instr::Cast {
            dst,
            from,
            to,
            value,
        });
        dst
    }

    pub fn emit_call(&mut self, func: Name, args: Vec<VarId>, ret: Option<IrType>) -> Option<VarId> {
        let dst = ret.map(|ty| self.fresh_var(ty));
        self.push(Instr::Call {
            dst,
            ret,
            func,
            args,
        });
        dst
    }

    /// Frame slot in the entry block, ahead of every other entry
    /// instruction so it dominates all uses.
    pub fn emit_alloca(&mut self, size: u32, align: u32) -> VarId {
        let dst = self.fresh_var(IrType::Ptr);
        let entry = &mut self.blocks[IrFunction::ENTRY.index()].body;
        entry.insert(self.allocas, Instr::Alloca { dst, size, align });
        self.allocas += 1;
        dst
    }

    pub fn emit_field_ptr(&mut self, base: VarId, offset: u32) -> VarId {
        if offset == 0 {
            return base;
        }
        let dst = self.fresh_var(IrType::Ptr);
        self.push(Instr::GetFieldPtr { dst, base, offset });
        dst
    }

    pub fn emit_global_addr(&mut self, name: Name) -> VarId {
        let dst = self.fresh_var(IrType::Ptr);
        self.push(Instr::GlobalAddr { dst, name });
        dst
    }

    pub fn emit_str_addr(&mut self, value: Name) -> VarId {
        let dst = self.fresh_var(IrType::Ptr);
        self.push(Instr::StrAddr { dst, value });
        dst
    }

    // === Terminators ===

    fn terminate(&mut self, terminator: Terminator) {
        let block = &mut self.blocks[self.current.index()];
        if block.terminator.is_none() {
            block.terminator = Some(terminator);
        }
    }

    pub fn terminate_branch(&mut self, target: BlockId, args: Vec<VarId>) {
        self.terminate(Terminator::Branch { target, args });
    }

    pub fn terminate_cond_branch(&mut self, cond: VarId, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::CondBranch {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn terminate_return(&mut self, value: Option<VarId>) {
        self.terminate(Terminator::Return(value));
    }

    pub fn terminate_unreachable(&mut self) {
        self.terminate(Terminator::Unreachable);
    }

    // === Finalization ===

    /// Produce the function. Blocks left open end in `Unreachable`.
    pub fn finish(
        self,
        name: Name,
        params: Vec<(VarId, IrType)>,
        ret: Option<IrType>,
    ) -> IrFunction {
        let blocks = self
            .blocks
            .into_iter()
            .enumerate()
            .map(|(i, bb)| Block {
                id: BlockId::new(i as u32),
                params: bb.params,
                body: bb.body,
                terminator: bb.terminator.unwrap_or(Terminator::Unreachable),
            })
            .collect();
        IrFunction {
            name,
            params,
            ret,
            blocks,
            var_types: self.var_types,
        }
    }
}
