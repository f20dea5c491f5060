//! Primitive macroblock constructors.
//!
//! Callers pass already-resolved host register numbers together with the
//! dependency masks in terms of abstract registers and flags. Where the
//! host instruction has effects the caller cannot see (flag updates, the
//! merge of a rotate-insert), the constructor widens the masks itself.

use crate::buffer::{MacroblockBuffer, MbIdx};
use crate::macroblock::{
    Macroblock, MbOp, MemAccess, RotateMask, ThreeRegs, TwoRegsImm,
};
use crate::mask::RegMask;

impl MacroblockBuffer {
    // -- Internal helpers --

    fn push_op(&mut self, op: MbOp, input: RegMask, output: RegMask) -> MbIdx {
        self.push(Macroblock::new(op, input, output))
    }

    fn mem(reg: u8, base: u8, offset: i16) -> MemAccess {
        MemAccess { reg, base, offset }
    }

    // -- Data movement --

    /// Load a 32-bit immediate into a register.
    pub fn push_load_register_long(
        &mut self,
        regs_out: RegMask,
        output: u8,
        imm: u32,
    ) -> MbIdx {
        self.push_op(
            MbOp::LoadRegisterLong { output, imm },
            RegMask::EMPTY,
            regs_out,
        )
    }

    /// Load a half-word from `[base + offset]`, zero-extended.
    pub fn push_load_memory_word(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        output: u8,
        base: u8,
        offset: i16,
    ) -> MbIdx {
        self.push_op(
            MbOp::LoadMemoryWord(Self::mem(output, base, offset)),
            regs_in,
            regs_out,
        )
    }

    /// Load a long-word from `[base + offset]`.
    pub fn push_load_memory_long(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        output: u8,
        base: u8,
        offset: i16,
    ) -> MbIdx {
        self.push_op(
            MbOp::LoadMemoryLong(Self::mem(output, base, offset)),
            regs_in,
            regs_out,
        )
    }

    /// Store the low half-word of `source` to `[base + offset]`.
    pub fn push_store_memory_word(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        source: u8,
        base: u8,
        offset: i16,
    ) -> MbIdx {
        self.push_op(
            MbOp::StoreMemoryWord(Self::mem(source, base, offset)),
            regs_in,
            regs_out,
        )
    }

    pub fn push_store_memory_long(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        source: u8,
        base: u8,
        offset: i16,
    ) -> MbIdx {
        self.push_op(
            MbOp::StoreMemoryLong(Self::mem(source, base, offset)),
            regs_in,
            regs_out,
        )
    }

    // -- Arithmetic / logic --

    /// `output = input1 + input2`, updating every host flag.
    pub fn push_add_with_flags(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        output: u8,
        input1: u8,
        input2: u8,
    ) -> MbIdx {
        self.push_op(
            MbOp::AddWithFlags(ThreeRegs {
                output,
                input1,
                input2,
            }),
            regs_in,
            regs_out | RegMask::INTERNAL_NZCV,
        )
    }

    /// OR a 16-bit immediate into the low half-word.
    pub fn push_or_low_imm(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        output: u8,
        input: u8,
        imm: u16,
    ) -> MbIdx {
        self.push_op(
            MbOp::OrLowImm(TwoRegsImm { output, input, imm }),
            regs_in,
            regs_out,
        )
    }

    /// OR a 16-bit immediate into the high half-word.
    pub fn push_or_high_imm(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        output: u8,
        input: u8,
        imm: u16,
    ) -> MbIdx {
        self.push_op(
            MbOp::OrHighImm(TwoRegsImm { output, input, imm }),
            regs_in,
            regs_out,
        )
    }

    /// AND with a 16-bit immediate. The high half-word of the result is
    /// cleared and N/Z are always updated.
    pub fn push_and_imm(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        output: u8,
        input: u8,
        imm: u16,
    ) -> MbIdx {
        self.push_op(
            MbOp::AndImm(TwoRegsImm { output, input, imm }),
            regs_in,
            regs_out | RegMask::INTERNAL_NZ,
        )
    }

    pub fn push_and_registers(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        output: u8,
        input1: u8,
        input2: u8,
    ) -> MbIdx {
        self.push_op(
            MbOp::AndRegisters(ThreeRegs {
                output,
                input1,
                input2,
            }),
            regs_in,
            regs_out,
        )
    }

    // -- Flag extraction --

    /// Copy the internal N, Z, C and V flags into a register.
    pub fn push_copy_nzcv_flags_to_register(
        &mut self,
        regs_out: RegMask,
        output: u8,
    ) -> MbIdx {
        // Moving XER into the condition register also clears C and V.
        self.push_op(
            MbOp::CopyNzcvFlags { output },
            RegMask::INTERNAL_NZCV,
            regs_out | RegMask::INTERNAL_CV,
        )
    }

    pub fn push_copy_nz_flags_to_register(
        &mut self,
        regs_out: RegMask,
        output: u8,
    ) -> MbIdx {
        self.push_op(
            MbOp::CopyNzFlags { output },
            RegMask::INTERNAL_NZ,
            regs_out,
        )
    }

    pub fn push_copy_cv_flags_to_register(
        &mut self,
        regs_out: RegMask,
        output: u8,
    ) -> MbIdx {
        self.push_op(
            MbOp::CopyCvFlags { output },
            RegMask::INTERNAL_CV,
            regs_out,
        )
    }

    // -- Rotate --

    /// Rotate `input` left by `shift` and insert the bits selected by
    /// `mask_begin..=mask_end` into `output`, keeping its other bits.
    pub fn push_rotate_and_copy_bits(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        rot: RotateMask,
    ) -> MbIdx {
        // The insert reads the bits of the destination it preserves.
        let regs_out = Self::rotate_flags(regs_out, rot.update_flags);
        self.push_op(MbOp::RotateAndCopyBits(rot), regs_in | regs_out, regs_out)
    }

    /// Rotate `input` left by `shift` and keep only the bits selected
    /// by `mask_begin..=mask_end`.
    pub fn push_rotate_and_mask_bits(
        &mut self,
        regs_in: RegMask,
        regs_out: RegMask,
        rot: RotateMask,
    ) -> MbIdx {
        let regs_out = Self::rotate_flags(regs_out, rot.update_flags);
        self.push_op(MbOp::RotateAndMaskBits(rot), regs_in, regs_out)
    }

    fn rotate_flags(regs_out: RegMask, update_flags: bool) -> RegMask {
        if update_flags {
            regs_out | RegMask::INTERNAL_NZ
        } else {
            regs_out
        }
    }

    // -- Control --

    /// Trap instruction. Reads nothing so it never constrains the
    /// optimizer, but is pinned in place.
    pub fn push_stop(&mut self) -> MbIdx {
        self.push_op(MbOp::Stop, RegMask::EMPTY, RegMask::NO_OPTIM)
    }

    /// No-op marking a location in the output. Pinned in place.
    pub fn push_nop(&mut self) -> MbIdx {
        self.push_op(MbOp::Nop, RegMask::EMPTY, RegMask::NO_OPTIM)
    }

    /// Placeholder entry that emits nothing.
    pub fn push_marker(&mut self) -> MbIdx {
        self.push_op(MbOp::Marker, RegMask::EMPTY, RegMask::EMPTY)
    }

    /// Call into the interpreter for `opcode`. The call may read and
    /// write arbitrary state, hence `ALL` on both sides.
    pub fn push_opcode_unsupported_call(&mut self, opcode: u16) -> MbIdx {
        self.push_op(
            MbOp::OpcodeUnsupported { opcode },
            RegMask::ALL,
            RegMask::ALL,
        )
    }
}
