use pretty_assertions::assert_eq;
use quark_ir::Name;

use super::*;
use crate::builder::IrBuilder;
use crate::ir::{Constant, IrType};

fn b(i: u32) -> BlockId {
    BlockId::new(i)
}

/// bb0 -> bb1 | bb2 -> bb3
fn diamond() -> IrFunction {
    let mut builder = IrBuilder::new();
    let cond = builder.emit_const(IrType::Bool, Constant::Bool(true));
    let then_b = builder.new_block();
    let else_b = builder.new_block();
    let merge = builder.new_block();
    builder.terminate_cond_branch(cond, then_b, else_b);
    builder.position_at(then_b);
    builder.terminate_branch(merge, vec![]);
    builder.position_at(else_b);
    builder.terminate_branch(merge, vec![]);
    builder.position_at(merge);
    builder.terminate_return(None);
    builder.finish(Name::from_raw(1), vec![], None)
}

/// bb0 -> bb1 (header) -> bb2 (body) -> bb1; bb1 -> bb3 (exit). bb4 is dead.
fn with_loop() -> IrFunction {
    let mut builder = IrBuilder::new();
    let cond = builder.emit_const(IrType::Bool, Constant::Bool(false));
    let header = builder.new_block();
    let body = builder.new_block();
    let exit = builder.new_block();
    let _dead = builder.new_block();
    builder.terminate_branch(header, vec![]);
    builder.position_at(header);
    builder.terminate_cond_branch(cond, body, exit);
    builder.position_at(body);
    builder.terminate_branch(header, vec![]);
    builder.position_at(exit);
    builder.terminate_return(None);
    builder.finish(Name::from_raw(1), vec![], None)
}

#[test]
fn diamond_dominance() {
    let func = diamond();
    let dom = DominatorTree::build(&func);
    assert!(dom.dominates(b(0), b(3)));
    assert!(!dom.dominates(b(1), b(3)));
    assert!(!dom.dominates(b(2), b(3)));
    assert!(dom.dominates(b(3), b(3)));
    assert_eq!(dom.idom(b(3)), Some(b(0)));
    assert_eq!(dom.idom(b(0)), None);
}

#[test]
fn loop_header_dominates_body_and_exit() {
    let func = with_loop();
    let dom = DominatorTree::build(&func);
    assert!(dom.dominates(b(1), b(2)));
    assert!(dom.dominates(b(1), b(3)));
    assert!(!dom.dominates(b(2), b(1)));
}

#[test]
fn unreachable_blocks_are_excluded() {
    let func = with_loop();
    assert_eq!(reachable(&func), vec![true, true, true, true, false]);
    let dom = DominatorTree::build(&func);
    assert!(!dom.dominates(b(0), b(4)));
    assert_eq!(dom.idom(b(4)), None);
}

#[test]
fn reverse_postorder_starts_at_entry() {
    let func = diamond();
    let rpo = reverse_postorder(&func);
    assert_eq!(rpo.len(), 4);
    assert_eq!(rpo[0], 0);
    assert_eq!(rpo[3], 3);
}
