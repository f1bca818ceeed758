//! Linear-scan register allocation over [`Layout`] intervals.
//!
//! Intervals are visited in order of increasing start. Active intervals
//! whose end precedes the current start are expired, freeing their
//! registers; two intervals never share a register at the same position.
//!
//! Constraints:
//! - float variables take XMM registers, everything else GPRs
//! - an interval with a call strictly inside it may only use callee-saved
//!   GPRs, and floats across calls always spill (no XMM survives a call)
//! - when no register is free, whichever of the current interval and the
//!   conflicting active intervals ends furthest is spilled

use quark_mir::IrFunction;
use smallvec::SmallVec;

use crate::abi::{Gpr, Xmm, ALLOCATABLE_GPRS, ALLOCATABLE_XMMS, CALLEE_SAVED};
use crate::liveness::{Interval, Layout};

/// Where a variable lives for its whole interval.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Location {
    Gpr(Gpr),
    Xmm(Xmm),
    /// Index of an 8-byte spill slot in the frame.
    Spill(u32),
}

impl Location {
    fn is_register(self) -> bool {
        !matches!(self, Location::Spill(_))
    }
}

/// Result of allocating one function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Indexed by `VarId::index()`; `None` for variables with no interval.
    pub locations: Vec<Option<Location>>,
    pub spill_slots: u32,
    /// Callee-saved registers the prologue must preserve, in `CALLEE_SAVED`
    /// order.
    pub used_callee_saved: Vec<Gpr>,
}

struct Active {
    interval: Interval,
    location: Location,
}

struct LinearScan<'a> {
    func: &'a IrFunction,
    layout: &'a Layout,
    locations: Vec<Option<Location>>,
    active: Vec<Active>,
    spill_slots: u32,
}

pub fn allocate(func: &IrFunction, layout: &Layout) -> Assignment {
    let mut scan = LinearScan {
        func,
        layout,
        locations: vec![None; func.var_count()],
        active: Vec::new(),
        spill_slots: 0,
    };
    for interval in &layout.intervals {
        scan.expire(interval.start);
        scan.assign(*interval);
    }

    let used_callee_saved: Vec<Gpr> = CALLEE_SAVED
        .into_iter()
        .filter(|reg| scan.locations.contains(&Some(Location::Gpr(*reg))))
        .collect();
    tracing::debug!(
        vars = scan.locations.len(),
        spill_slots = scan.spill_slots,
        callee_saved = used_callee_saved.len(),
        "registers allocated"
    );
    Assignment {
        locations: scan.locations,
        spill_slots: scan.spill_slots,
        used_callee_saved,
    }
}

impl LinearScan<'_> {
    fn expire(&mut self, start: u32) {
        self.active.retain(|a| a.interval.end >= start);
    }

    fn candidates(&self, interval: &Interval) -> SmallVec<[Location; 10]> {
        let is_float = self.func.var_type(interval.var).is_float();
        let crosses_call = self.layout.crosses_call(interval);
        match (is_float, crosses_call) {
            (true, true) => SmallVec::new(),
            (true, false) => ALLOCATABLE_XMMS.into_iter().map(Location::Xmm).collect(),
            (false, true) => CALLEE_SAVED.into_iter().map(Location::Gpr).collect(),
            (false, false) => ALLOCATABLE_GPRS.into_iter().map(Location::Gpr).collect(),
        }
    }

    fn assign(&mut self, interval: Interval) {
        let candidates = self.candidates(&interval);
        let free = candidates
            .iter()
            .copied()
            .find(|loc| !self.active.iter().any(|a| a.location == *loc));

        let location = match free {
            Some(location) => location,
            None => self.steal_or_spill(&interval, &candidates),
        };
        self.locations[interval.var.index()] = Some(location);
        if location.is_register() {
            self.active.push(Active { interval, location });
        }
    }

    /// Spill whichever interval ends last: the current one, or the active
    /// interval holding one of `candidates`.
    fn steal_or_spill(&mut self, interval: &Interval, candidates: &[Location]) -> Location {
        let victim = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, a)| candidates.contains(&a.location))
            .max_by_key(|(_, a)| (a.interval.end, a.interval.var))
            .map(|(i, a)| (i, a.interval.end));

        match victim {
            Some((index, end)) if end > interval.end => {
                let stolen = self.active.swap_remove(index);
                let slot = self.new_spill_slot();
                tracing::trace!(var = stolen.interval.var.raw(), slot, "spilled active interval");
                self.locations[stolen.interval.var.index()] = Some(Location::Spill(slot));
                stolen.location
            }
            _ => {
                let slot = self.new_spill_slot();
                tracing::trace!(var = interval.var.raw(), slot, "spilled interval");
                Location::Spill(slot)
            }
        }
    }

    fn new_spill_slot(&mut self) -> u32 {
        self.spill_slots += 1;
        self.spill_slots - 1
    }
}
