//! Guest CPU state layout and the guest flag image.
//!
//! The interpreter keeps the guest condition codes in two 32-bit fields
//! laid out for a PowerPC host:
//!
//! ```text
//! cznv:  N=bit 31  Z=bit 29  V=bit 22  C=bit 21  X shadow=bit 5
//! x:     X=bit 21
//! ```
//!
//! The host flags register holds the `cznv` image. Loading moves X from
//! bit 21 of `x` to bit 5 with a 16-bit rotate; saving stores the low
//! half-word of the flags register into the first (big-endian high) half
//! of `x`, which lands bit 5 back on bit 21 without any shift.

use std::mem::offset_of;

use serde::{Deserialize, Serialize};

pub const FLAGBIT_N: u32 = 31;
pub const FLAGBIT_Z: u32 = 29;
pub const FLAGBIT_V: u32 = 22;
pub const FLAGBIT_C: u32 = 21;
/// Position of X inside the `x` field.
pub const FLAGBIT_X: u32 = 21;
/// Position of X inside the host flags register.
pub const HOST_FLAGBIT_X: u32 = 5;

/// Rotate-insert parameters moving X from the `x` field into the host
/// flags register: rotate left 16, single-bit window at IBM bit 26.
pub const X_INSERT_SHIFT: u8 = 16;
pub const X_INSERT_MASK_BEGIN: u8 = 26;
pub const X_INSERT_MASK_END: u8 = 26;

/// Flag fields of the guest state.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagStruct {
    pub cznv: u32,
    pub x: u32,
}

/// Reference layout of the interpreter's guest register block, as seen
/// by a 32-bit big-endian host.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestRegs {
    /// D0-D7, A0-A7.
    pub regs: [u32; 16],
    pub usp: u32,
    pub isp: u32,
    pub msp: u32,
    pub sr: u16,
    pub t1: u8,
    pub t0: u8,
    pub s: u8,
    pub m: u8,
    pub stopped: u8,
    pub intmask: u8,
    pub pc: u32,
    /// Host pointer to the current guest instruction.
    pub pc_p: u32,
    pub pc_oldp: u32,
    pub vbr: u32,
    pub sfc: u32,
    pub dfc: u32,
    pub ccrflags: FlagStruct,
}

/// Byte offsets of the fields the compiler touches, relative to the
/// guest-state base register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateLayout {
    pub flags_cznv: i16,
    pub flags_x: i16,
    pub pc: i16,
}

impl StateLayout {
    /// Offsets of [`GuestRegs`].
    pub const fn guest_regs() -> Self {
        let flags = offset_of!(GuestRegs, ccrflags);
        Self {
            flags_cznv: (flags + offset_of!(FlagStruct, cznv)) as i16,
            flags_x: (flags + offset_of!(FlagStruct, x)) as i16,
            pc: offset_of!(GuestRegs, pc_p) as i16,
        }
    }
}

impl Default for StateLayout {
    fn default() -> Self {
        Self::guest_regs()
    }
}

/// The five guest condition flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuestFlags {
    pub n: bool,
    pub z: bool,
    pub c: bool,
    pub v: bool,
    pub x: bool,
}

impl GuestFlags {
    /// Build from a 5-bit pattern: bit 0 = N, 1 = Z, 2 = C, 3 = V, 4 = X.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            n: bits & 0x01 != 0,
            z: bits & 0x02 != 0,
            c: bits & 0x04 != 0,
            v: bits & 0x08 != 0,
            x: bits & 0x10 != 0,
        }
    }

    pub const fn bits(self) -> u8 {
        (self.n as u8)
            | (self.z as u8) << 1
            | (self.c as u8) << 2
            | (self.v as u8) << 3
            | (self.x as u8) << 4
    }

    /// Canonical `(cznv, x)` field values for these flags.
    pub const fn encode(self) -> (u32, u32) {
        let cznv = (self.n as u32) << FLAGBIT_N
            | (self.z as u32) << FLAGBIT_Z
            | (self.v as u32) << FLAGBIT_V
            | (self.c as u32) << FLAGBIT_C
            | (self.x as u32) << HOST_FLAGBIT_X;
        let x = (self.x as u32) << FLAGBIT_X;
        (cznv, x)
    }

    /// Read the flags back from the two fields. X is taken from the
    /// `x` field, the shadow bit in `cznv` is ignored.
    pub const fn decode(cznv: u32, x: u32) -> Self {
        Self {
            n: cznv & (1 << FLAGBIT_N) != 0,
            z: cznv & (1 << FLAGBIT_Z) != 0,
            c: cznv & (1 << FLAGBIT_C) != 0,
            v: cznv & (1 << FLAGBIT_V) != 0,
            x: x & (1 << FLAGBIT_X) != 0,
        }
    }
}
