//! Register and frame moves, including parallel moves for block arguments
//! and incoming parameters.

use crate::abi::{Gpr, Xmm};

use super::{AsmWriter, Slot, RAX};

/// Copy all 64 bits of `src` to `dst`. Frame-to-frame copies go through
/// `rax`.
pub(crate) fn mov(w: &mut AsmWriter, src: Slot, dst: Slot) {
    match (src, dst) {
        _ if src == dst => {}
        (Slot::Xmm(_), Slot::Xmm(_)) => emit!(w, "movaps {src}, {dst}"),
        (Slot::Frame(_), Slot::Frame(_)) => {
            emit!(w, "movq {src}, {RAX}");
            emit!(w, "movq {RAX}, {dst}");
        }
        _ => emit!(w, "movq {src}, {dst}"),
    }
}

/// Perform every `(src, dst)` move as if simultaneously.
///
/// Moves whose destination no pending move still reads are emitted first.
/// When only cycles remain, one destination is saved into `r11` (or
/// `xmm15`) and its readers redirected there, which breaks the cycle.
/// Destinations must be distinct; sources may repeat.
pub(crate) fn parallel_move(w: &mut AsmWriter, moves: impl IntoIterator<Item = (Slot, Slot)>) {
    let mut pending: Vec<(Slot, Slot)> = moves.into_iter().filter(|(s, d)| s != d).collect();

    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|&(_, dst)| !pending.iter().any(|&(src, _)| src == dst));
        if let Some(index) = ready {
            let (src, dst) = pending.remove(index);
            mov(w, src, dst);
            continue;
        }

        let blocked = pending[0].1;
        let temp = match blocked {
            Slot::Xmm(_) => Slot::Xmm(Xmm(15)),
            Slot::Gpr(_) | Slot::Frame(_) => Slot::Gpr(Gpr::R11),
        };
        mov(w, blocked, temp);
        for (src, _) in &mut pending {
            if *src == blocked {
                *src = temp;
            }
        }
    }
}
