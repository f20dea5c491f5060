/// Dependency mask of a macroblock: which registers and condition
/// flags it reads or writes.
///
/// The low bits hold guest flags, host-internal flags and one bit per
/// abstract temporary register slot. The two sentinels live outside the
/// bit space so they can never collide with a register bit:
///
/// - `all`: the owner may touch any register or flag (interpreter calls).
/// - `no_optim`: not a register at all, pins the owner so the optimizer
///   never removes or reorders it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegMask {
    bits: u64,
    all: bool,
    no_optim: bool,
}

/// First bit used for temporary register slots.
const TMP_BASE: u32 = 16;

/// Number of temporary register slots a mask can describe.
pub const MAX_TEMP_SLOTS: u8 = (64 - TMP_BASE) as u8;

impl RegMask {
    pub const EMPTY: RegMask = RegMask::from_raw(0);

    // -- Guest flags, as stored in guest-visible flag state --
    pub const FLAG_N: RegMask = RegMask::from_raw(1 << 0);
    pub const FLAG_Z: RegMask = RegMask::from_raw(1 << 1);
    pub const FLAG_C: RegMask = RegMask::from_raw(1 << 2);
    pub const FLAG_V: RegMask = RegMask::from_raw(1 << 3);
    pub const FLAG_X: RegMask = RegMask::from_raw(1 << 4);

    // -- Host-internal flags, as produced by host arithmetic --
    pub const INTERNAL_N: RegMask = RegMask::from_raw(1 << 5);
    pub const INTERNAL_Z: RegMask = RegMask::from_raw(1 << 6);
    pub const INTERNAL_C: RegMask = RegMask::from_raw(1 << 7);
    pub const INTERNAL_V: RegMask = RegMask::from_raw(1 << 8);

    pub const FLAGS_NZCV: RegMask = RegMask::from_raw(0b0_1111);
    pub const FLAGS_NZCVX: RegMask = RegMask::from_raw(0b1_1111);
    pub const INTERNAL_NZ: RegMask = RegMask::from_raw(0b11 << 5);
    pub const INTERNAL_CV: RegMask = RegMask::from_raw(0b11 << 7);
    pub const INTERNAL_NZCV: RegMask = RegMask::from_raw(0b1111 << 5);

    /// Touches every register and flag.
    pub const ALL: RegMask = RegMask {
        bits: 0,
        all: true,
        no_optim: false,
    };

    /// Pin marker: never eliminate or reorder the owning macroblock.
    pub const NO_OPTIM: RegMask = RegMask {
        bits: 0,
        all: false,
        no_optim: true,
    };

    pub const fn empty() -> Self {
        Self::EMPTY
    }

    pub const fn from_raw(bits: u64) -> Self {
        Self {
            bits,
            all: false,
            no_optim: false,
        }
    }

    /// Raw register/flag bits, without the sentinels.
    pub const fn raw(self) -> u64 {
        self.bits
    }

    /// Mask for an abstract temporary register slot.
    pub const fn tmp(slot: u8) -> Self {
        assert!(slot < MAX_TEMP_SLOTS, "temp slot out of mask range");
        Self::from_raw(1u64 << (TMP_BASE + slot as u32))
    }

    pub const fn union(self, other: RegMask) -> Self {
        Self {
            bits: self.bits | other.bits,
            all: self.all || other.all,
            no_optim: self.no_optim || other.no_optim,
        }
    }

    /// Bitwise intersection of the register bits. Sentinels are kept
    /// only when both sides carry them.
    pub const fn intersect(self, other: RegMask) -> Self {
        Self {
            bits: self.bits & other.bits,
            all: self.all && other.all,
            no_optim: self.no_optim && other.no_optim,
        }
    }

    /// Whether the two masks may name a common register or flag.
    ///
    /// `ALL` overlaps anything that touches at least one register.
    /// `NO_OPTIM` names no register and never causes an overlap.
    pub const fn intersects(self, other: RegMask) -> bool {
        if self.bits & other.bits != 0 {
            return true;
        }
        (self.all && (other.all || other.bits != 0))
            || (other.all && self.bits != 0)
    }

    pub const fn has_all(self) -> bool {
        self.all
    }

    pub const fn is_pinned(self) -> bool {
        self.no_optim
    }

    pub const fn contains(self, other: RegMask) -> bool {
        self.all || self.bits & other.bits == other.bits
    }

    /// No register bits and no sentinels.
    pub const fn is_empty(self) -> bool {
        self.bits == 0 && !self.all && !self.no_optim
    }
}

impl std::ops::BitOr for RegMask {
    type Output = RegMask;

    fn bitor(self, rhs: RegMask) -> RegMask {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for RegMask {
    fn bitor_assign(&mut self, rhs: RegMask) {
        *self = self.union(rhs);
    }
}

impl std::fmt::Debug for RegMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegMask(0x{:016x}", self.bits)?;
        if self.all {
            f.write_str(" ALL")?;
        }
        if self.no_optim {
            f.write_str(" NO_OPTIM")?;
        }
        f.write_str(")")
    }
}
