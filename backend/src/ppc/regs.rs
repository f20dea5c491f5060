//! PowerPC 32-bit register conventions used by the generated code.

/// Scratch register for call targets (r0 reads as zero in D-form
/// address computations, so it never serves as a base).
pub const SPECTMP: u8 = 0;
/// Stack pointer. Never handed out, see [`RESERVED_REGS`].
pub const SP: u8 = 1;
/// First and second call parameter.
pub const PARAM1: u8 = 3;
pub const PARAM2: u8 = 4;
/// Register holding the guest flags in the `cznv` image.
pub const FLAGS: u8 = 14;

/// CR field used as a temporary by the NZCV extraction.
pub const CR_TMP2: u8 = 2;

/// Registers handed out for temporary slots, in slot order. r5-r12 are
/// volatile across calls, r15-r31 are callee-saved.
pub const TEMP_REGS: &[u8] = &[
    5, 6, 7, 8, 9, 10, 11, 12, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26,
    27, 28, 29, 30, 31,
];

/// Registers with a fixed role in generated code. A temporary pool may
/// not contain any of them.
pub const RESERVED_REGS: &[u8] = &[SPECTMP, SP, PARAM1, PARAM2, FLAGS];
