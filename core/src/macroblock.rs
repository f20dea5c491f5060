use crate::mask::RegMask;

/// Macroblock kinds, the discriminant of [`MbOp`].
///
/// Indexes [`MB_DEFS`], the static table the dump and the code
/// generator consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MacroblockKind {
    // -- Data movement --
    LoadRegisterLong = 0,
    LoadMemoryWord,
    LoadMemoryLong,
    StoreMemoryWord,
    StoreMemoryLong,

    // -- Arithmetic / logic --
    AddWithFlags,
    OrLowImm,
    OrHighImm,
    AndImm,
    AndRegisters,

    // -- Flag extraction --
    CopyNzcvFlags,
    CopyNzFlags,
    CopyCvFlags,

    // -- Rotate --
    RotateAndCopyBits,
    RotateAndMaskBits,

    // -- Control --
    Stop,
    Nop,
    OpcodeUnsupported,
    /// Placeholder without a lowering routine.
    Marker,

    // Sentinel, must be last
    Count,
}

/// Static properties of a macroblock kind.
#[derive(Debug, Clone, Copy)]
pub struct MbDef {
    pub name: &'static str,
    /// Whether a lowering routine is bound to this kind. Entries
    /// without one are skipped by code generation.
    pub lowers: bool,
}

const fn def(name: &'static str) -> MbDef {
    MbDef { name, lowers: true }
}

pub static MB_DEFS: [MbDef; MacroblockKind::Count as usize] = [
    def("load_register_long"),
    def("load_memory_word"),
    def("load_memory_long"),
    def("store_memory_word"),
    def("store_memory_long"),
    def("add_with_flags"),
    def("or_low_imm"),
    def("or_high_imm"),
    def("and_imm"),
    def("and_registers"),
    def("copy_nzcv_flags"),
    def("copy_nz_flags"),
    def("copy_cv_flags"),
    def("rotate_and_copy_bits"),
    def("rotate_and_mask_bits"),
    def("stop"),
    def("nop"),
    def("opcode_unsupported"),
    MbDef {
        name: "marker",
        lowers: false,
    },
];

impl MacroblockKind {
    pub fn def(self) -> &'static MbDef {
        &MB_DEFS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }
}

/// Register-relative memory access: `reg <-> [base + offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemAccess {
    /// Destination for loads, source for stores.
    pub reg: u8,
    pub base: u8,
    pub offset: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreeRegs {
    pub output: u8,
    pub input1: u8,
    pub input2: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoRegsImm {
    pub output: u8,
    pub input: u8,
    pub imm: u16,
}

/// Operands of the rotate-left-then-mask family. Mask bits use IBM
/// numbering (bit 0 is the most significant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotateMask {
    pub output: u8,
    pub input: u8,
    pub shift: u8,
    pub mask_begin: u8,
    pub mask_end: u8,
    pub update_flags: bool,
}

/// Operation-specific payload of a macroblock. Register operands are
/// host register encoding numbers, already resolved by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbOp {
    LoadRegisterLong { output: u8, imm: u32 },
    LoadMemoryWord(MemAccess),
    LoadMemoryLong(MemAccess),
    StoreMemoryWord(MemAccess),
    StoreMemoryLong(MemAccess),
    AddWithFlags(ThreeRegs),
    OrLowImm(TwoRegsImm),
    OrHighImm(TwoRegsImm),
    AndImm(TwoRegsImm),
    AndRegisters(ThreeRegs),
    CopyNzcvFlags { output: u8 },
    CopyNzFlags { output: u8 },
    CopyCvFlags { output: u8 },
    RotateAndCopyBits(RotateMask),
    RotateAndMaskBits(RotateMask),
    Stop,
    Nop,
    OpcodeUnsupported { opcode: u16 },
    Marker,
}

impl MbOp {
    pub const fn kind(&self) -> MacroblockKind {
        match self {
            MbOp::LoadRegisterLong { .. } => MacroblockKind::LoadRegisterLong,
            MbOp::LoadMemoryWord(_) => MacroblockKind::LoadMemoryWord,
            MbOp::LoadMemoryLong(_) => MacroblockKind::LoadMemoryLong,
            MbOp::StoreMemoryWord(_) => MacroblockKind::StoreMemoryWord,
            MbOp::StoreMemoryLong(_) => MacroblockKind::StoreMemoryLong,
            MbOp::AddWithFlags(_) => MacroblockKind::AddWithFlags,
            MbOp::OrLowImm(_) => MacroblockKind::OrLowImm,
            MbOp::OrHighImm(_) => MacroblockKind::OrHighImm,
            MbOp::AndImm(_) => MacroblockKind::AndImm,
            MbOp::AndRegisters(_) => MacroblockKind::AndRegisters,
            MbOp::CopyNzcvFlags { .. } => MacroblockKind::CopyNzcvFlags,
            MbOp::CopyNzFlags { .. } => MacroblockKind::CopyNzFlags,
            MbOp::CopyCvFlags { .. } => MacroblockKind::CopyCvFlags,
            MbOp::RotateAndCopyBits(_) => MacroblockKind::RotateAndCopyBits,
            MbOp::RotateAndMaskBits(_) => MacroblockKind::RotateAndMaskBits,
            MbOp::Stop => MacroblockKind::Stop,
            MbOp::Nop => MacroblockKind::Nop,
            MbOp::OpcodeUnsupported { .. } => MacroblockKind::OpcodeUnsupported,
            MbOp::Marker => MacroblockKind::Marker,
        }
    }
}

/// One IR operation of a translation unit.
///
/// `input`/`output` must over-approximate the registers and flags the
/// operation really reads and writes; the optimizer may only rely on
/// independence that disjoint masks prove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macroblock {
    pub op: MbOp,
    pub input: RegMask,
    pub output: RegMask,
}

impl Macroblock {
    pub const fn new(op: MbOp, input: RegMask, output: RegMask) -> Self {
        Self { op, input, output }
    }

    pub const fn kind(&self) -> MacroblockKind {
        self.op.kind()
    }

    /// Whether a lowering routine is bound to this macroblock.
    pub fn lowers(&self) -> bool {
        self.kind().def().lowers
    }

    /// Pinned macroblocks are never removed or reordered.
    pub const fn is_pinned(&self) -> bool {
        self.input.is_pinned() || self.output.is_pinned()
    }
}
