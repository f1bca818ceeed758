//! SSA environment: the current value of each register-held variable.
//!
//! Locals and parameters that are scalar and never address-taken live in
//! SSA variables. An assignment rebinds the symbol to a fresh value; where
//! control flow joins, [`merge_into`] adds a block parameter for every
//! symbol whose incoming values differ.

use std::collections::BTreeMap;

use quark_types::SymbolId;

use crate::builder::IrBuilder;
use crate::ir::{BlockId, VarId};

/// Symbol to current value. Ordered so block parameters are created in a
/// deterministic order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SsaEnv {
    values: BTreeMap<SymbolId, VarId>,
}

impl SsaEnv {
    pub(crate) fn bind(&mut self, symbol: SymbolId, value: VarId) {
        self.values.insert(symbol, value);
    }

    pub(crate) fn lookup(&self, symbol: SymbolId) -> Option<VarId> {
        self.values.get(&symbol).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (SymbolId, VarId)> + '_ {
        self.values.iter().map(|(s, v)| (*s, *v))
    }
}

/// An open edge into a merge block.
pub(crate) struct Incoming {
    /// Block to terminate with the branch.
    pub block: BlockId,
    /// Environment at the end of `block`.
    pub env: SsaEnv,
    /// Arguments for the merge block's leading parameters.
    pub args: Vec<VarId>,
}

/// Join `incoming` edges at `merge`, which must already carry one leading
/// parameter per element of each edge's `args`.
///
/// Only symbols bound in `pre` (visible before the split) survive the join.
/// Leaves the builder positioned at `merge` and returns the joined
/// environment. With no incoming edges `merge` is unreachable and gets an
/// `Unreachable` terminator.
pub(crate) fn merge_into(
    builder: &mut IrBuilder,
    merge: BlockId,
    pre: &SsaEnv,
    incoming: &[Incoming],
) -> SsaEnv {
    if incoming.is_empty() {
        builder.position_at(merge);
        builder.terminate_unreachable();
        return pre.clone();
    }

    let mut joined = SsaEnv::default();
    let mut merged = Vec::new();
    for (symbol, pre_value) in pre.iter() {
        let first = incoming[0].env.lookup(symbol).unwrap_or(pre_value);
        let same = incoming
            .iter()
            .all(|edge| edge.env.lookup(symbol).unwrap_or(pre_value) == first);
        if same {
            joined.bind(symbol, first);
        } else {
            let ty = builder.var_type(pre_value);
            let param = builder.add_block_param(merge, ty);
            joined.bind(symbol, param);
            merged.push((symbol, pre_value));
        }
    }

    for edge in incoming {
        let mut args = edge.args.clone();
        args.extend(
            merged
                .iter()
                .map(|&(symbol, pre_value)| edge.env.lookup(symbol).unwrap_or(pre_value)),
        );
        builder.position_at(edge.block);
        builder.terminate_branch(merge, args);
    }
    builder.position_at(merge);
    joined
}
