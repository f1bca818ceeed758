use std::mem;

use quark_ir::{BinaryOp, Name};

use super::*;

fn v(n: u32) -> VarId {
    VarId::new(n)
}

fn b(n: u32) -> BlockId {
    BlockId::new(n)
}

#[test]
fn id_basics() {
    assert_eq!(v(42).raw(), 42);
    assert_eq!(v(42).index(), 42);
    assert_eq!(b(7).index(), 7);
    assert!(v(0) < v(1));
    assert_eq!(mem::size_of::<VarId>(), 4);
    assert_eq!(mem::size_of::<BlockId>(), 4);
}

#[test]
fn type_sizes_and_classes() {
    assert_eq!(IrType::Bool.size(), 1);
    assert_eq!(IrType::U16.size(), 2);
    assert_eq!(IrType::F32.size(), 4);
    assert_eq!(IrType::Ptr.size(), 8);
    assert!(IrType::I8.is_signed());
    assert!(!IrType::U64.is_signed());
    assert!(IrType::U64.is_integer());
    assert!(!IrType::Ptr.is_integer());
    assert!(IrType::F64.is_float());
    assert_eq!(IrType::I32.to_string(), "i32");
}

#[test]
fn defs_and_uses() {
    let add = Instr::BinOp {
        dst: v(3),
        op: BinaryOp::Add,
        ty: IrType::I32,
        lhs: v(1),
        rhs: v(2),
    };
    assert_eq!(add.defined_var(), Some(v(3)));
    assert_eq!(add.used_vars().as_slice(), &[v(1), v(2)]);

    let store = Instr::Store {
        ty: IrType::I64,
        ptr: v(0),
        value: v(4),
    };
    assert_eq!(store.defined_var(), None);
    assert_eq!(store.used_vars().as_slice(), &[v(0), v(4)]);

    let void_call = Instr::Call {
        dst: None,
        ret: None,
        func: Name::from_raw(1),
        args: vec![v(5), v(6)],
    };
    assert_eq!(void_call.defined_var(), None);
    assert!(void_call.is_call());
    assert_eq!(void_call.used_vars().len(), 2);
}

#[test]
fn terminator_successors() {
    let cond = Terminator::CondBranch {
        cond: v(0),
        then_block: b(1),
        else_block: b(2),
    };
    assert_eq!(cond.successors().as_slice(), &[b(1), b(2)]);
    assert_eq!(cond.used_vars().as_slice(), &[v(0)]);
    assert!(Terminator::Return(None).successors().is_empty());

    let mut jump = Terminator::Branch {
        target: b(4),
        args: vec![v(1)],
    };
    jump.remap_successors(|id| BlockId::new(id.raw() - 2));
    assert_eq!(jump.successors().as_slice(), &[b(2)]);
}

#[test]
fn predecessors_follow_terminators() {
    let block = |id, terminator| Block {
        id: b(id),
        params: Vec::new(),
        body: Vec::new(),
        terminator,
    };
    let func = IrFunction {
        name: Name::from_raw(1),
        params: Vec::new(),
        ret: None,
        blocks: vec![
            block(
                0,
                Terminator::CondBranch {
                    cond: v(0),
                    then_block: b(1),
                    else_block: b(2),
                },
            ),
            block(
                1,
                Terminator::Branch {
                    target: b(2),
                    args: vec![],
                },
            ),
            block(2, Terminator::Return(None)),
        ],
        var_types: vec![IrType::Bool],
    };
    let preds = func.predecessors();
    assert!(preds[0].is_empty());
    assert_eq!(preds[1].as_slice(), &[b(0)]);
    assert_eq!(preds[2].as_slice(), &[b(0), b(1)]);
}

#[test]
fn canonical_extends_by_signedness() {
    assert_eq!(IrType::I8.canonical(0xff), u64::MAX);
    assert_eq!(IrType::U8.canonical(0x1ff), 0xff);
    assert_eq!(IrType::I32.canonical(0x8000_0000), 0xffff_ffff_8000_0000);
    assert_eq!(IrType::U32.canonical(u64::MAX), 0xffff_ffff);
    assert_eq!(IrType::U64.canonical(u64::MAX), u64::MAX);
}
