//! x86-64 System V calling convention.
//!
//! | Item | Value |
//! |---|---|
//! | integer, pointer and bool args | `rdi rsi rdx rcx r8 r9`, then stack |
//! | float args | `xmm0`-`xmm7`, then stack |
//! | stack args | 8-byte slots, left to right from `16(%rbp)` in the callee |
//! | return | `rax` / `xmm0` |
//! | callee-saved | `rbx rbp r12 r13 r14 r15` |
//! | stack alignment | 16 bytes at every `call` |
//! | variadic callers | `al` = number of vector registers used |
//!
//! Integer values narrower than 64 bits are kept sign- or zero-extended to
//! the full register everywhere, which also satisfies the rule that
//! sub-32-bit arguments are extended by the producer.

use std::fmt;

use quark_mir::IrType;

/// General-purpose registers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Gpr {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl Gpr {
    /// AT&T name of the low `size` bytes, without the `%`.
    pub const fn name(self, size: u32) -> &'static str {
        // [64, 32, 16, 8]
        let names: [&str; 4] = match self {
            Gpr::Rax => ["rax", "eax", "ax", "al"],
            Gpr::Rbx => ["rbx", "ebx", "bx", "bl"],
            Gpr::Rcx => ["rcx", "ecx", "cx", "cl"],
            Gpr::Rdx => ["rdx", "edx", "dx", "dl"],
            Gpr::Rsi => ["rsi", "esi", "si", "sil"],
            Gpr::Rdi => ["rdi", "edi", "di", "dil"],
            Gpr::Rbp => ["rbp", "ebp", "bp", "bpl"],
            Gpr::Rsp => ["rsp", "esp", "sp", "spl"],
            Gpr::R8 => ["r8", "r8d", "r8w", "r8b"],
            Gpr::R9 => ["r9", "r9d", "r9w", "r9b"],
            Gpr::R10 => ["r10", "r10d", "r10w", "r10b"],
            Gpr::R11 => ["r11", "r11d", "r11w", "r11b"],
            Gpr::R12 => ["r12", "r12d", "r12w", "r12b"],
            Gpr::R13 => ["r13", "r13d", "r13w", "r13b"],
            Gpr::R14 => ["r14", "r14d", "r14w", "r14b"],
            Gpr::R15 => ["r15", "r15d", "r15w", "r15b"],
        };
        match size {
            1 => names[3],
            2 => names[2],
            4 => names[1],
            _ => names[0],
        }
    }
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.name(8))
    }
}

/// SSE register `xmm0`-`xmm15`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct Xmm(pub u8);

impl fmt::Display for Xmm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%xmm{}", self.0)
    }
}

pub const INT_ARGS: [Gpr; 6] = [Gpr::Rdi, Gpr::Rsi, Gpr::Rdx, Gpr::Rcx, Gpr::R8, Gpr::R9];
pub const FLOAT_ARGS: [Xmm; 8] = [
    Xmm(0),
    Xmm(1),
    Xmm(2),
    Xmm(3),
    Xmm(4),
    Xmm(5),
    Xmm(6),
    Xmm(7),
];
pub const INT_RET: Gpr = Gpr::Rax;
pub const FLOAT_RET: Xmm = Xmm(0);

/// `rbp` is also callee-saved; it is the frame pointer and never allocated.
pub const CALLEE_SAVED: [Gpr; 5] = [Gpr::Rbx, Gpr::R12, Gpr::R13, Gpr::R14, Gpr::R15];

/// Allocation order for intervals that do not cross a call: caller-saved
/// first, so callee-saved registers stay free for values that need them.
pub const ALLOCATABLE_GPRS: [Gpr; 10] = [
    Gpr::Rsi,
    Gpr::Rdi,
    Gpr::R8,
    Gpr::R9,
    Gpr::R10,
    Gpr::Rbx,
    Gpr::R12,
    Gpr::R13,
    Gpr::R14,
    Gpr::R15,
];

/// No XMM register survives a call.
pub const ALLOCATABLE_XMMS: [Xmm; 6] = [Xmm(8), Xmm(9), Xmm(10), Xmm(11), Xmm(12), Xmm(13)];

pub const STACK_ALIGN: u32 = 16;
pub const SLOT_SIZE: u32 = 8;
/// Offset of the first stack argument from `rbp` in the callee: past the
/// saved `rbp` and the return address.
pub const STACK_ARG_OFFSET: i32 = 16;

/// Where one argument is passed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ArgLoc {
    Gpr(Gpr),
    Xmm(Xmm),
    /// Index of the 8-byte stack slot, counted from the first stack argument.
    Stack(u32),
}

impl ArgLoc {
    /// `rbp`-relative address of a stack argument, as seen by the callee.
    pub fn callee_offset(slot: u32) -> i32 {
        STACK_ARG_OFFSET + (slot * SLOT_SIZE) as i32
    }
}

/// Locations of a call's arguments, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallLayout {
    pub args: Vec<ArgLoc>,
    pub stack_slots: u32,
    /// Value for `al` at the call.
    pub vector_regs: u32,
}

/// Assign each argument type a register or stack slot.
pub fn classify_args(types: &[IrType]) -> CallLayout {
    let mut ints = INT_ARGS.iter();
    let mut floats = FLOAT_ARGS.iter();
    let mut stack_slots = 0;
    let mut vector_regs = 0;
    let args = types
        .iter()
        .map(|ty| {
            let reg = if ty.is_float() {
                floats.next().map(|&x| {
                    vector_regs += 1;
                    ArgLoc::Xmm(x)
                })
            } else {
                ints.next().map(|&g| ArgLoc::Gpr(g))
            };
            reg.unwrap_or_else(|| {
                stack_slots += 1;
                ArgLoc::Stack(stack_slots - 1)
            })
        })
        .collect();
    CallLayout {
        args,
        stack_slots,
        vector_regs,
    }
}
