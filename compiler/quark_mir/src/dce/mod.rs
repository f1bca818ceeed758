//! Dead-block elimination.
//!
//! Lowering leaves behind blocks nothing branches to: merge points after
//! two returning arms, code after `break`, loop exits of `while true`.
//! This pass drops every block unreachable from the entry and renumbers the
//! rest, preserving their relative order.

use crate::graph;
use crate::ir::{BlockId, IrFunction};

/// Remove unreachable blocks. Returns how many were removed.
pub fn eliminate_dead_blocks(func: &mut IrFunction) -> usize {
    let live = graph::reachable(func);
    let removed = live.iter().filter(|&&l| !l).count();
    if removed == 0 {
        return 0;
    }

    let mut remap = vec![None; func.blocks.len()];
    let mut next = 0u32;
    for (idx, &is_live) in live.iter().enumerate() {
        if is_live {
            remap[idx] = Some(BlockId::new(next));
            next += 1;
        }
    }

    let blocks = std::mem::take(&mut func.blocks);
    func.blocks = blocks
        .into_iter()
        .filter(|block| live[block.id.index()])
        .map(|mut block| {
            // Successors of a live block are live.
            block.terminator.remap_successors(|old| remap[old.index()].unwrap_or(old));
            block.id = remap[block.id.index()].unwrap_or(block.id);
            block
        })
        .collect();

    tracing::trace!(removed, remaining = func.blocks.len(), "dead blocks removed");
    removed
}
