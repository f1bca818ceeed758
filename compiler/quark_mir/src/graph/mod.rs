//! CFG analyses shared by the IR passes and the backend.
//!
//! Everything here is a pure function of an [`IrFunction`]'s terminators.
//! Passes depend on `graph`, never on each other.

use crate::ir::{BlockId, IrFunction};

/// Blocks reachable from the entry, indexed by block.
pub fn reachable(func: &IrFunction) -> Vec<bool> {
    let mut seen = vec![false; func.blocks.len()];
    for idx in postorder(func) {
        seen[idx] = true;
    }
    seen
}

/// Postorder of the reachable blocks, starting from the entry.
///
/// Iterative DFS with an explicit stack, so deeply nested control flow
/// cannot overflow the native stack.
pub fn postorder(func: &IrFunction) -> Vec<usize> {
    let num_blocks = func.blocks.len();
    let mut visited = vec![false; num_blocks];
    let mut order = Vec::with_capacity(num_blocks);
    if num_blocks == 0 {
        return order;
    }

    // (block, successors already pushed)
    let mut stack: Vec<(usize, bool)> = vec![(IrFunction::ENTRY.index(), false)];
    while let Some(&mut (block_idx, ref mut children_done)) = stack.last_mut() {
        if *children_done {
            order.push(block_idx);
            stack.pop();
            continue;
        }
        *children_done = true;
        if block_idx >= num_blocks || visited[block_idx] {
            stack.pop();
            continue;
        }
        visited[block_idx] = true;

        // Reversed so the first successor is explored first.
        for succ in func.blocks[block_idx].terminator.successors().iter().rev() {
            let succ_idx = succ.index();
            if succ_idx < num_blocks && !visited[succ_idx] {
                stack.push((succ_idx, false));
            }
        }
    }
    order
}

/// Reverse postorder: every block appears before its successors, except
/// along back edges.
pub fn reverse_postorder(func: &IrFunction) -> Vec<usize> {
    let mut rpo = postorder(func);
    rpo.reverse();
    rpo
}

/// Dominator tree, built with the Cooper-Harvey-Kennedy iterative
/// algorithm over reverse postorder.
///
/// Reference: Cooper, Harvey, Kennedy. "A Simple, Fast Dominance Algorithm" (2001)
pub struct DominatorTree {
    /// `idom[entry] == Some(entry)`; unreachable blocks are `None`.
    idom: Vec<Option<usize>>,
}

impl DominatorTree {
    pub fn build(func: &IrFunction) -> Self {
        let n = func.blocks.len();
        if n == 0 {
            return Self { idom: vec![] };
        }

        let preds = func.predecessors();
        let rpo = reverse_postorder(func);
        let mut rpo_pos = vec![usize::MAX; n];
        for (pos, &block_idx) in rpo.iter().enumerate() {
            rpo_pos[block_idx] = pos;
        }

        let entry = IrFunction::ENTRY.index();
        let mut idom: Vec<Option<usize>> = vec![None; n];
        idom[entry] = Some(entry);

        let mut changed = true;
        while changed {
            changed = false;
            for &block_idx in &rpo[1..] {
                let mut processed = preds[block_idx]
                    .iter()
                    .map(|p| p.index())
                    .filter(|&p| idom[p].is_some());
                let Some(first) = processed.next() else {
                    continue;
                };
                let new_idom =
                    processed.fold(first, |acc, pred| Self::intersect(pred, acc, &idom, &rpo_pos));
                if idom[block_idx] != Some(new_idom) {
                    idom[block_idx] = Some(new_idom);
                    changed = true;
                }
            }
        }

        Self { idom }
    }

    /// Does `a` dominate `b`? A block dominates itself; unreachable blocks
    /// are dominated by nothing.
    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        let target = a.index();
        let mut current = b.index();
        if self.idom.get(current).copied().flatten().is_none() {
            return false;
        }
        loop {
            if current == target {
                return true;
            }
            match self.idom[current] {
                Some(dom) if dom != current => current = dom,
                _ => return false,
            }
        }
    }

    /// Immediate dominator; `None` for the entry and unreachable blocks.
    pub fn idom(&self, block: BlockId) -> Option<BlockId> {
        match self.idom.get(block.index()).copied().flatten() {
            Some(dom) if dom != block.index() => u32::try_from(dom).ok().map(BlockId::new),
            _ => None,
        }
    }

    /// Walk two fingers up the tree until they meet. Both blocks must
    /// already have an immediate dominator.
    fn intersect(mut a: usize, mut b: usize, idom: &[Option<usize>], rpo_pos: &[usize]) -> usize {
        while a != b {
            while rpo_pos[a] > rpo_pos[b] {
                let Some(next) = idom[a] else {
                    debug_assert!(false, "intersect: broken idom chain at {a}");
                    return a;
                };
                a = next;
            }
            while rpo_pos[b] > rpo_pos[a] {
                let Some(next) = idom[b] else {
                    debug_assert!(false, "intersect: broken idom chain at {b}");
                    return b;
                };
                b = next;
            }
        }
        a
    }
}

#[cfg(test)]
mod tests;
