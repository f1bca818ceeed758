//! Backward dataflow liveness and conservative live intervals.
//!
//! # Algorithm
//!
//! 1. **gen/kill** per block (forward scan): `gen(B)` holds variables used
//!    before any definition in B, `kill(B)` holds B's parameters and
//!    instruction results.
//! 2. **Fixed point** in postorder:
//!    `live_out(B) = ∪ live_in(S)`, `live_in(B) = gen(B) ∪ (live_out(B) - kill(B))`.
//!
//! Block arguments need no special casing: `Branch` arguments are uses in
//! the predecessor and block parameters are definitions in the successor.
//!
//! Intervals are then built over the blocks laid out in IR order. Each
//! variable gets one `[start, end]` range covering every position where it
//! is defined, used or live at a block boundary; holes are not tracked.

use rustc_hash::{FxHashMap, FxHashSet};

use quark_mir::graph;
use quark_mir::{Block, IrFunction, Terminator, VarId};

pub type LiveSet = FxHashSet<VarId>;

/// Live variables at each block boundary, indexed by `BlockId::index()`.
pub struct BlockLiveness {
    pub live_in: Vec<LiveSet>,
    pub live_out: Vec<LiveSet>,
}

pub fn compute_liveness(func: &IrFunction) -> BlockLiveness {
    let num_blocks = func.blocks.len();
    let mut gen: Vec<LiveSet> = Vec::with_capacity(num_blocks);
    let mut kill: Vec<LiveSet> = Vec::with_capacity(num_blocks);
    for block in &func.blocks {
        let (block_gen, block_kill) = gen_kill(func, block);
        gen.push(block_gen);
        kill.push(block_kill);
    }

    let postorder = graph::postorder(func);
    let mut live_in: Vec<LiveSet> = vec![LiveSet::default(); num_blocks];
    let mut live_out: Vec<LiveSet> = vec![LiveSet::default(); num_blocks];

    let mut iterations = 0u32;
    loop {
        iterations += 1;
        let mut changed = false;
        for &idx in &postorder {
            let mut new_out = LiveSet::default();
            for succ in func.blocks[idx].terminator.successors() {
                if let Some(succ_in) = live_in.get(succ.index()) {
                    new_out.extend(succ_in.iter().copied());
                }
            }
            let mut new_in = gen[idx].clone();
            new_in.extend(new_out.iter().filter(|v| !kill[idx].contains(v)).copied());

            if new_in != live_in[idx] || new_out != live_out[idx] {
                changed = true;
                live_in[idx] = new_in;
                live_out[idx] = new_out;
            }
        }
        if !changed {
            break;
        }
    }

    tracing::trace!(blocks = num_blocks, iterations, "liveness converged");
    BlockLiveness { live_in, live_out }
}

fn gen_kill(func: &IrFunction, block: &Block) -> (LiveSet, LiveSet) {
    let mut gen = LiveSet::default();
    let mut kill = LiveSet::default();
    if block.id == IrFunction::ENTRY {
        kill.extend(func.params.iter().map(|&(v, _)| v));
    }
    kill.extend(block.params.iter().map(|&(v, _)| v));
    for instr in &block.body {
        for var in instr.used_vars() {
            if !kill.contains(&var) {
                gen.insert(var);
            }
        }
        if let Some(def) = instr.defined_var() {
            kill.insert(def);
        }
    }
    for var in block.terminator.used_vars() {
        if !kill.contains(&var) {
            gen.insert(var);
        }
    }
    (gen, kill)
}

/// A variable's conservative live range in linear positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub var: VarId,
    pub start: u32,
    pub end: u32,
}

impl Interval {
    /// Live both before and after the instruction at `pos`.
    pub fn crosses(&self, pos: u32) -> bool {
        self.start < pos && pos < self.end
    }
}

/// Positions of the linearized function.
///
/// Block `b` starts at `block_start[b]` (where its parameters are defined);
/// its `i`-th instruction is at `block_start[b] + 2 * (i + 1)`, and its
/// terminator follows the last instruction.
pub struct Layout {
    pub block_start: Vec<u32>,
    pub call_positions: Vec<u32>,
    pub intervals: Vec<Interval>,
}

impl Layout {
    /// Whether any call happens strictly inside `interval`.
    pub fn crosses_call(&self, interval: &Interval) -> bool {
        // Sorted, so binary search for the first call after `start`.
        let first = self.call_positions.partition_point(|&p| p <= interval.start);
        self.call_positions
            .get(first)
            .is_some_and(|&p| interval.crosses(p))
    }
}

/// Lay out `func` in block order and build one interval per defined variable.
pub fn build_intervals(func: &IrFunction, liveness: &BlockLiveness) -> Layout {
    let mut block_start = Vec::with_capacity(func.blocks.len());
    let mut pos = 0u32;
    for block in &func.blocks {
        block_start.push(pos);
        pos += 2 * (block.body.len() as u32 + 2);
    }

    let mut ranges: FxHashMap<VarId, (u32, u32)> = FxHashMap::default();
    let mut touch = |var: VarId, at: u32| {
        ranges
            .entry(var)
            .and_modify(|(s, e)| {
                *s = (*s).min(at);
                *e = (*e).max(at);
            })
            .or_insert((at, at));
    };

    for &(var, _) in &func.params {
        touch(var, 0);
    }

    let mut call_positions = Vec::new();
    for block in &func.blocks {
        let idx = block.id.index();
        let start = block_start[idx];
        let end = start + 2 * (block.body.len() as u32 + 1);

        for &var in &liveness.live_in[idx] {
            touch(var, start);
        }
        for &var in &liveness.live_out[idx] {
            touch(var, end);
        }
        for &(var, _) in &block.params {
            touch(var, start);
        }
        for (i, instr) in block.body.iter().enumerate() {
            let at = start + 2 * (i as u32 + 1);
            for var in instr.used_vars() {
                touch(var, at);
            }
            if let Some(def) = instr.defined_var() {
                touch(def, at);
            }
            if instr.is_call() {
                call_positions.push(at);
            }
        }
        for var in block.terminator.used_vars() {
            touch(var, end);
        }
        // Branch arguments are written into the target's parameters at the
        // branch, so those parameters must be live there too.
        if let Terminator::Branch { target, .. } = &block.terminator {
            for &(param, _) in &func.block(*target).params {
                touch(param, end);
            }
        }
    }

    let mut intervals: Vec<Interval> = ranges
        .into_iter()
        .map(|(var, (start, end))| Interval { var, start, end })
        .collect();
    intervals.sort_by_key(|i| (i.start, i.var));

    Layout {
        block_start,
        call_positions,
        intervals,
    }
}
