//! Basic-block SSA IR.
//!
//! - **[`IrFunction`]**: parameters, blocks, and one [`IrType`] per variable
//! - **[`Block`]**: block parameters, body instructions, one terminator
//! - **[`Instr`]**: a single instruction; most define a fresh [`VarId`]
//! - **[`Terminator`]**: how control leaves a block
//!
//! Block parameters take the place of phi nodes: a `Branch` passes one
//! argument per parameter of its target.

use quark_ir::{BinaryOp, Name, UnaryOp};
use smallvec::SmallVec;

// ── ID newtypes ─────────────────────────────────────────────────────

/// SSA variable within one [`IrFunction`], allocated sequentially from 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Basic block within one [`IrFunction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Types and constants ─────────────────────────────────────────────

/// Machine-level type of an SSA variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Ptr,
}

impl IrType {
    /// Size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            IrType::I8 | IrType::U8 | IrType::Bool => 1,
            IrType::I16 | IrType::U16 => 2,
            IrType::I32 | IrType::U32 | IrType::F32 => 4,
            IrType::I64 | IrType::U64 | IrType::F64 | IrType::Ptr => 8,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, IrType::F32 | IrType::F64)
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, IrType::I8 | IrType::I16 | IrType::I32 | IrType::I64)
    }

    pub const fn is_integer(self) -> bool {
        !self.is_float() && !matches!(self, IrType::Bool | IrType::Ptr)
    }

    /// `bits` truncated to this integer type and sign- or zero-extended
    /// back to 64 bits. The representation every integer value has in a
    /// register.
    pub const fn canonical(self, bits: u64) -> u64 {
        let width = self.size() * 8;
        if width >= 64 {
            bits
        } else if self.is_signed() {
            let shift = 64 - width;
            (((bits << shift) as i64) >> shift) as u64
        } else {
            bits & ((1u64 << width) - 1)
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            IrType::I8 => "i8",
            IrType::I16 => "i16",
            IrType::I32 => "i32",
            IrType::I64 => "i64",
            IrType::U8 => "u8",
            IrType::U16 => "u16",
            IrType::U32 => "u32",
            IrType::U64 => "u64",
            IrType::F32 => "f32",
            IrType::F64 => "f64",
            IrType::Bool => "bool",
            IrType::Ptr => "ptr",
        }
    }
}

impl std::fmt::Display for IrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constant operand of a `Const` instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Two's complement bits; only the low `size()` bytes are meaningful.
    Int(u64),
    /// `f64` bits, narrowed when the constant's type is `F32`.
    Float(u64),
    Bool(bool),
}

// ── Instructions ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    /// `dst = const.ty value`
    Const {
        dst: VarId,
        ty: IrType,
        value: Constant,
    },
    /// `dst = load.ty ptr`
    Load { dst: VarId, ty: IrType, ptr: VarId },
    /// `store.ty value, ptr`
    Store { ty: IrType, ptr: VarId, value: VarId },
    /// Arithmetic, bitwise or comparison. `ty` is the operand type;
    /// comparisons define a `Bool`. Never `&&`/`||`, which lower to branches.
    BinOp {
        dst: VarId,
        op: BinaryOp,
        ty: IrType,
        lhs: VarId,
        rhs: VarId,
    },
    Unary {
        dst: VarId,
        op: UnaryOp,
        ty: IrType,
        operand: VarId,
    },
    /// Numeric or pointer conversion from `from` to the type of `dst`.
    Cast {
        dst: VarId,
        from: IrType,
        to: IrType,
        value: VarId,
    },
    /// Direct call; `dst` is `None` for `void` callees.
    Call {
        dst: Option<VarId>,
        ret: Option<IrType>,
        func: Name,
        args: Vec<VarId>,
    },
    /// Frame memory for one local. Only emitted in the entry block.
    Alloca { dst: VarId, size: u32, align: u32 },
    /// `dst = base + offset`, the address of a struct field.
    GetFieldPtr { dst: VarId, base: VarId, offset: u32 },
    GlobalAddr { dst: VarId, name: Name },
    /// Address of the read-only, NUL-terminated bytes of a string literal.
    StrAddr { dst: VarId, value: Name },
}

impl Instr {
    /// The variable this instruction defines, if any.
    pub fn defined_var(&self) -> Option<VarId> {
        match self {
            Instr::Const { dst, .. }
            | Instr::Load { dst, .. }
            | Instr::BinOp { dst, .. }
            | Instr::Unary { dst, .. }
            | Instr::Cast { dst, .. }
            | Instr::Alloca { dst, .. }
            | Instr::GetFieldPtr { dst, .. }
            | Instr::GlobalAddr { dst, .. }
            | Instr::StrAddr { dst, .. } => Some(*dst),
            Instr::Call { dst, .. } => *dst,
            Instr::Store { .. } => None,
        }
    }

    /// Every variable read by this instruction, in operand order.
    pub fn used_vars(&self) -> SmallVec<[VarId; 4]> {
        match self {
            Instr::Const { .. }
            | Instr::Alloca { .. }
            | Instr::GlobalAddr { .. }
            | Instr::StrAddr { .. } => SmallVec::new(),
            Instr::Load { ptr, .. } => smallvec::smallvec![*ptr],
            Instr::Store { ptr, value, .. } => smallvec::smallvec![*ptr, *value],
            Instr::BinOp { lhs, rhs, .. } => smallvec::smallvec![*lhs, *rhs],
            Instr::Unary { operand, .. } => smallvec::smallvec![*operand],
            Instr::Cast { value, .. } => smallvec::smallvec![*value],
            Instr::Call { args, .. } => args.iter().copied().collect(),
            Instr::GetFieldPtr { base, .. } => smallvec::smallvec![*base],
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Instr::Call { .. })
    }
}

// ── Terminators ─────────────────────────────────────────────────────

/// Block exit. Every block ends with exactly one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// Unconditional jump passing one argument per target parameter.
    Branch { target: BlockId, args: Vec<VarId> },
    /// Two-way branch on a `Bool`. Both targets take no parameters.
    CondBranch {
        cond: VarId,
        then_block: BlockId,
        else_block: BlockId,
    },
    Return(Option<VarId>),
    /// Control never reaches the end of this block.
    Unreachable,
}

impl Terminator {
    pub fn used_vars(&self) -> SmallVec<[VarId; 4]> {
        match self {
            Terminator::Branch { args, .. } => args.iter().copied().collect(),
            Terminator::CondBranch { cond, .. } => smallvec::smallvec![*cond],
            Terminator::Return(Some(value)) => smallvec::smallvec![*value],
            Terminator::Return(None) | Terminator::Unreachable => SmallVec::new(),
        }
    }

    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            Terminator::Branch { target, .. } => smallvec::smallvec![*target],
            Terminator::CondBranch {
                then_block,
                else_block,
                ..
            } => smallvec::smallvec![*then_block, *else_block],
            Terminator::Return(_) | Terminator::Unreachable => SmallVec::new(),
        }
    }

    /// Rewrite every successor through `map`.
    pub fn remap_successors(&mut self, mut map: impl FnMut(BlockId) -> BlockId) {
        match self {
            Terminator::Branch { target, .. } => *target = map(*target),
            Terminator::CondBranch {
                then_block,
                else_block,
                ..
            } => {
                *then_block = map(*then_block);
                *else_block = map(*else_block);
            }
            Terminator::Return(_) | Terminator::Unreachable => {}
        }
    }
}

// ── Blocks and functions ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
    /// Values supplied by each incoming `Branch`.
    pub params: Vec<(VarId, IrType)>,
    pub body: Vec<Instr>,
    pub terminator: Terminator,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IrFunction {
    pub name: Name,
    pub params: Vec<(VarId, IrType)>,
    /// `None` for `void` functions.
    pub ret: Option<IrType>,
    /// `blocks[i].id == BlockId(i)`; the entry block is first.
    pub blocks: Vec<Block>,
    /// Type of each variable, indexed by `VarId::index()`.
    pub var_types: Vec<IrType>,
}

impl IrFunction {
    pub const ENTRY: BlockId = BlockId(0);

    #[inline]
    pub fn var_type(&self, var: VarId) -> IrType {
        self.var_types[var.index()]
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn var_count(&self) -> usize {
        self.var_types.len()
    }

    /// Predecessor lists, indexed by block.
    pub fn predecessors(&self) -> Vec<SmallVec<[BlockId; 2]>> {
        let mut preds = vec![SmallVec::new(); self.blocks.len()];
        for block in &self.blocks {
            for succ in block.terminator.successors() {
                if let Some(list) = preds.get_mut(succ.index()) {
                    list.push(block.id);
                }
            }
        }
        preds
    }
}

/// Initial value of a global variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlobalInit {
    pub ty: IrType,
    pub value: Constant,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IrGlobal {
    pub name: Name,
    pub size: u32,
    pub align: u32,
    /// `None` means zero-initialized.
    pub init: Option<GlobalInit>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IrExtern {
    pub name: Name,
    pub params: Vec<IrType>,
    pub ret: Option<IrType>,
}

/// A lowered compilation unit, in source declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IrModule {
    pub globals: Vec<IrGlobal>,
    pub externs: Vec<IrExtern>,
    pub functions: Vec<IrFunction>,
    /// Distinct string literals in first-use order. Entry `i` is emitted
    /// under the label `.Lstr{i}`.
    pub strings: Vec<Name>,
}

impl IrModule {
    pub fn function(&self, name: Name) -> Option<&IrFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Index of a string literal in [`IrModule::strings`].
    pub fn string_index(&self, value: Name) -> Option<usize> {
        self.strings.iter().position(|&s| s == value)
    }

    /// Record every string literal `func` references, keeping first-use order.
    pub fn collect_strings(&mut self, func: &IrFunction) {
        for instr in func.blocks.iter().flat_map(|b| &b.body) {
            if let Instr::StrAddr { value, .. } = instr {
                if self.string_index(*value).is_none() {
                    self.strings.push(*value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
