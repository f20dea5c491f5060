use compemu_core::mask::MAX_TEMP_SLOTS;
use compemu_core::{MacroblockBuffer, RegMask};

use crate::ppc::regs::{RESERVED_REGS, TEMP_REGS};

/// Abstract temporary register slot. Masks name slots, macroblocks
/// name the host register the slot is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempReg(pub u8);

impl TempReg {
    pub const fn mask(self) -> RegMask {
        RegMask::tmp(self.0)
    }
}

/// Placement hint for [`RegisterAllocator::acquire_temp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TempHint {
    #[default]
    Any,
    /// Prefer this host register when it is free.
    Prefer(u8),
}

/// Physical register allocator the compiler consults before building
/// macroblocks.
///
/// Methods taking the buffer may append the macroblocks needed to set up
/// or write back a binding.
pub trait RegisterAllocator {
    fn acquire_temp(&mut self, mbs: &mut MacroblockBuffer, hint: TempHint) -> TempReg;

    fn release_temp(&mut self, reg: TempReg);

    /// Slot holding the pointer to the guest CPU state, bound and loaded
    /// on first use.
    fn base_register(&mut self, mbs: &mut MacroblockBuffer) -> TempReg;

    /// Drop the base register binding, if any.
    fn release_base_register(&mut self);

    /// Write back every dirty guest-register binding, then release every
    /// temporary except the base register.
    fn flush_temps(&mut self, mbs: &mut MacroblockBuffer);

    /// Host register number the slot is mapped to.
    fn gpr_for(&self, reg: TempReg) -> u8;

    /// Forget every binding before a new translation unit.
    fn reset(&mut self) {}
}

#[derive(Debug, Clone, Copy)]
struct GuestBinding {
    offset: i16,
    dirty: bool,
}

/// Fixed pool of host registers handed out lowest slot first.
pub struct TempPool {
    gprs: &'static [u8],
    free: u64,
    bindings: Vec<Option<GuestBinding>>,
    base: Option<TempReg>,
    state_address: u32,
}

impl TempPool {
    /// Pool over the default PowerPC temporaries. `state_address` is the
    /// host address loaded into the base register.
    pub fn new(state_address: u32) -> Self {
        Self::with_regs(TEMP_REGS, state_address)
    }

    pub fn with_regs(gprs: &'static [u8], state_address: u32) -> Self {
        assert!(gprs.len() <= MAX_TEMP_SLOTS as usize, "too many temporaries");
        assert!(
            !gprs.iter().any(|r| RESERVED_REGS.contains(r)),
            "reserved register in temporary pool"
        );
        Self {
            gprs,
            free: all_slots(gprs.len()),
            bindings: vec![None; gprs.len()],
            base: None,
            state_address,
        }
    }

    /// Number of slots currently handed out.
    pub fn in_use(&self) -> usize {
        self.gprs.len() - self.free.count_ones() as usize
    }

    pub fn is_free(&self, reg: TempReg) -> bool {
        self.free & (1u64 << reg.0) != 0
    }

    /// Bind a fresh slot to the guest-state long-word at `offset` and
    /// load its current value.
    pub fn bind_guest(&mut self, mbs: &mut MacroblockBuffer, offset: i16) -> TempReg {
        let base = self.base_register(mbs);
        let t = self.acquire_temp(mbs, TempHint::Any);
        mbs.push_load_memory_long(
            base.mask(),
            t.mask(),
            self.gpr_for(t),
            self.gpr_for(base),
            offset,
        );
        self.bindings[t.0 as usize] = Some(GuestBinding {
            offset,
            dirty: false,
        });
        t
    }

    /// Record that a guest-bound slot was modified.
    pub fn mark_dirty(&mut self, reg: TempReg) {
        if let Some(b) = &mut self.bindings[reg.0 as usize] {
            b.dirty = true;
        }
    }

    fn take_slot(&mut self, slot: u8) -> TempReg {
        self.free &= !(1u64 << slot);
        TempReg(slot)
    }
}

impl RegisterAllocator for TempPool {
    fn acquire_temp(&mut self, _mbs: &mut MacroblockBuffer, hint: TempHint) -> TempReg {
        if let TempHint::Prefer(gpr) = hint {
            if let Some(slot) = self.gprs.iter().position(|&r| r == gpr) {
                if self.free & (1u64 << slot) != 0 {
                    return self.take_slot(slot as u8);
                }
            }
        }
        assert!(self.free != 0, "out of temporary registers");
        self.take_slot(self.free.trailing_zeros() as u8)
    }

    fn release_temp(&mut self, reg: TempReg) {
        self.bindings[reg.0 as usize] = None;
        self.free |= 1u64 << reg.0;
        if self.base == Some(reg) {
            self.base = None;
        }
    }

    fn base_register(&mut self, mbs: &mut MacroblockBuffer) -> TempReg {
        if let Some(base) = self.base {
            return base;
        }
        let base = self.acquire_temp(mbs, TempHint::Any);
        mbs.push_load_register_long(base.mask(), self.gpr_for(base), self.state_address);
        self.base = Some(base);
        base
    }

    fn release_base_register(&mut self) {
        if let Some(base) = self.base.take() {
            self.release_temp(base);
        }
    }

    fn flush_temps(&mut self, mbs: &mut MacroblockBuffer) {
        let dirty: Vec<(TempReg, i16)> = self
            .bindings
            .iter()
            .enumerate()
            .filter_map(|(slot, b)| {
                b.filter(|b| b.dirty).map(|b| (TempReg(slot as u8), b.offset))
            })
            .collect();
        if !dirty.is_empty() {
            let base = self.base_register(mbs);
            for (t, offset) in dirty {
                // The store is only visible through memory.
                mbs.push_store_memory_long(
                    t.mask() | base.mask(),
                    RegMask::NO_OPTIM,
                    self.gpr_for(t),
                    self.gpr_for(base),
                    offset,
                );
            }
        }

        // Every temporary dies here, bound or not. The base register is
        // dropped separately by `release_base_register`.
        let keep = self.base.map_or(0, |b| 1u64 << b.0);
        let live = all_slots(self.gprs.len()) & !self.free & !keep;
        for slot in 0..self.gprs.len() {
            if live & (1u64 << slot) != 0 {
                self.bindings[slot] = None;
            }
        }
        self.free |= live;
    }

    fn gpr_for(&self, reg: TempReg) -> u8 {
        self.gprs[reg.0 as usize]
    }

    fn reset(&mut self) {
        self.free = all_slots(self.gprs.len());
        self.bindings.iter_mut().for_each(|b| *b = None);
        self.base = None;
    }
}

fn all_slots(n: usize) -> u64 {
    (1u64 << n) - 1
}
