use compemu_core::layout::{X_INSERT_MASK_BEGIN, X_INSERT_MASK_END, X_INSERT_SHIFT};
use compemu_core::{
    CompilerConfig, CompilerError, MacroblockBuffer, MbIdx, RegMask, RotateMask, StateLayout,
};

use crate::code_buffer::CodeBuffer;
use crate::optimize::optimize;
use crate::ppc::regs::FLAGS;
use crate::regalloc::{RegisterAllocator, TempHint};
use crate::translate::{generate, GenStats};
use crate::{HostCodeGen, InterpreterLink};

/// One translation unit under construction.
///
/// Owns the macroblock buffer and drives the pipeline
/// `reset → push* → optimize → generate`. Primitive macroblocks are
/// pushed through [`Compiler::mbs_mut`]; the composite builders here
/// frame their primitives with the register allocator calls they need.
pub struct Compiler<A: RegisterAllocator> {
    mbs: MacroblockBuffer,
    alloc: A,
    layout: StateLayout,
}

impl<A: RegisterAllocator> Compiler<A> {
    pub fn new(config: &CompilerConfig, alloc: A) -> Result<Self, CompilerError> {
        Ok(Self {
            mbs: MacroblockBuffer::with_config(config)?,
            alloc,
            layout: config.layout,
        })
    }

    /// Start a new translation unit, discarding the previous one.
    pub fn reset_translation_unit(&mut self) {
        self.mbs.reset();
        self.alloc.reset();
    }

    pub fn mbs(&self) -> &MacroblockBuffer {
        &self.mbs
    }

    pub fn mbs_mut(&mut self) -> &mut MacroblockBuffer {
        &mut self.mbs
    }

    pub fn alloc(&self) -> &A {
        &self.alloc
    }

    pub fn alloc_mut(&mut self) -> &mut A {
        &mut self.alloc
    }

    /// Buffer and allocator together, for allocator calls that append
    /// macroblocks (e.g. [`crate::TempPool::bind_guest`]).
    pub fn split_mut(&mut self) -> (&mut MacroblockBuffer, &mut A) {
        (&mut self.mbs, &mut self.alloc)
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    // -- Composite builders --

    /// Load the guest flags into the host flags register.
    ///
    /// The combined field is loaded as is; X comes from its own field and
    /// is rotated from bit 21 to bit 5 and inserted, leaving the other
    /// flag bits alone.
    pub fn push_load_flag_state(&mut self) {
        let base = self.alloc.base_register(&mut self.mbs);
        let tmp = self.alloc.acquire_temp(&mut self.mbs, TempHint::Any);
        let base_gpr = self.alloc.gpr_for(base);
        let tmp_gpr = self.alloc.gpr_for(tmp);

        // The load replaces every bit of the flags register, X included.
        self.mbs.push_load_memory_long(
            base.mask(),
            RegMask::FLAGS_NZCVX,
            FLAGS,
            base_gpr,
            self.layout.flags_cznv,
        );
        self.mbs.push_load_memory_long(
            base.mask(),
            tmp.mask(),
            tmp_gpr,
            base_gpr,
            self.layout.flags_x,
        );
        self.mbs.push_rotate_and_copy_bits(
            tmp.mask(),
            RegMask::FLAG_X,
            RotateMask {
                output: FLAGS,
                input: tmp_gpr,
                shift: X_INSERT_SHIFT,
                mask_begin: X_INSERT_MASK_BEGIN,
                mask_end: X_INSERT_MASK_END,
                update_flags: false,
            },
        );

        self.alloc.release_temp(tmp);
    }

    /// Write the host flags register back to the guest flag fields.
    ///
    /// The low half-word store into the X field needs no shift: X sits
    /// at bit 5 of the flags register, and the big-endian half-word store
    /// moves it to bit 21 of the field, where C sits in the combined
    /// field. Both stores are only observable through memory and are
    /// pinned.
    pub fn push_save_flag_state(&mut self) {
        let base = self.alloc.base_register(&mut self.mbs);
        let base_gpr = self.alloc.gpr_for(base);

        self.mbs.push_store_memory_long(
            RegMask::FLAGS_NZCVX | base.mask(),
            RegMask::NO_OPTIM,
            FLAGS,
            base_gpr,
            self.layout.flags_cznv,
        );
        self.mbs.push_store_memory_word(
            RegMask::FLAG_X | base.mask(),
            RegMask::NO_OPTIM,
            FLAGS,
            base_gpr,
            self.layout.flags_x,
        );
    }

    /// Store `location`, the host address of the current guest
    /// instruction, into the guest program counter field.
    pub fn push_load_program_counter(&mut self, location: u32) {
        let tmp = self.alloc.acquire_temp(&mut self.mbs, TempHint::Any);
        let base = self.alloc.base_register(&mut self.mbs);
        let tmp_gpr = self.alloc.gpr_for(tmp);
        let base_gpr = self.alloc.gpr_for(base);

        self.mbs.push_load_register_long(
            tmp.mask() | RegMask::NO_OPTIM,
            tmp_gpr,
            location,
        );
        self.mbs.push_store_memory_long(
            tmp.mask() | base.mask(),
            RegMask::NO_OPTIM,
            tmp_gpr,
            base_gpr,
            self.layout.pc,
        );

        self.alloc.release_temp(tmp);
    }

    /// Hand `opcode` at `location` to the interpreter.
    ///
    /// Guest-visible state is brought up to date first (register
    /// write-backs, flags, program counter), the interpreter handler is
    /// called, and the flags are reloaded afterwards. Returns the index
    /// of the call entry.
    pub fn push_unsupported_opcode_fallback(&mut self, location: u32, opcode: u16) -> MbIdx {
        self.alloc.flush_temps(&mut self.mbs);
        self.push_save_flag_state();
        self.push_load_program_counter(location);

        // The call clobbers the volatile registers.
        self.alloc.release_base_register();
        let call = self.mbs.push_opcode_unsupported_call(opcode);

        self.push_load_flag_state();
        call
    }

    // -- Pipeline stages --

    pub fn optimize(&mut self) {
        optimize(&mut self.mbs);
    }

    pub fn generate(
        &self,
        backend: &impl HostCodeGen,
        link: &impl InterpreterLink,
        buf: &mut CodeBuffer,
    ) -> GenStats {
        generate(&self.mbs, backend, link, buf)
    }
}
