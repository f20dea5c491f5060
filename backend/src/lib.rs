pub mod code_buffer;
pub mod compiler;
pub mod lower;
pub mod optimize;
pub mod ppc;
pub mod regalloc;
pub mod translate;

pub use code_buffer::CodeBuffer;
pub use compiler::Compiler;
pub use ppc::PpcCodeGen;
pub use regalloc::{RegisterAllocator, TempHint, TempPool, TempReg};

/// Primitive native-instruction encoder for a host architecture.
///
/// Each method appends the encoding of one host instruction (or, for
/// `out_liw` and `out_call`, the short fixed sequence the host needs for
/// it) to `buf`. Register arguments are host encoding numbers. Encoding
/// is total over the operand ranges the lowering routines produce.
pub trait HostCodeGen {
    /// Load a 32-bit immediate.
    fn out_liw(&self, buf: &mut CodeBuffer, rd: u8, imm: u32);

    /// Load a zero-extended long-word from `[base + offset]`.
    fn out_lwz(&self, buf: &mut CodeBuffer, rd: u8, base: u8, offset: i16);

    /// Load a zero-extended half-word from `[base + offset]`.
    fn out_lhz(&self, buf: &mut CodeBuffer, rd: u8, base: u8, offset: i16);

    /// Store a long-word to `[base + offset]`.
    fn out_stw(&self, buf: &mut CodeBuffer, rs: u8, base: u8, offset: i16);

    /// Store the low half-word to `[base + offset]`.
    fn out_sth(&self, buf: &mut CodeBuffer, rs: u8, base: u8, offset: i16);

    /// Add, recording carry and overflow; `rc` also records N/Z.
    fn out_addco(&self, buf: &mut CodeBuffer, rd: u8, ra: u8, rb: u8, rc: bool);

    fn out_ori(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16);
    fn out_oris(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16);

    /// AND with an immediate; always records N/Z.
    fn out_andi(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16);

    fn out_and(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, rb: u8, rc: bool);

    /// Rotate left then insert under mask.
    #[allow(clippy::too_many_arguments)]
    fn out_rlwimi(
        &self,
        buf: &mut CodeBuffer,
        ra: u8,
        rs: u8,
        sh: u8,
        mb: u8,
        me: u8,
        rc: bool,
    );

    /// Rotate left then AND with mask.
    #[allow(clippy::too_many_arguments)]
    fn out_rlwinm(
        &self,
        buf: &mut CodeBuffer,
        ra: u8,
        rs: u8,
        sh: u8,
        mb: u8,
        me: u8,
        rc: bool,
    );

    /// Move the condition register into a GPR.
    fn out_mfcr(&self, buf: &mut CodeBuffer, rd: u8);

    /// Move the overflow register's summary bits into a CR field.
    fn out_mcrxr(&self, buf: &mut CodeBuffer, crf: u8);

    /// Move the overflow register into a GPR.
    fn out_mfxer(&self, buf: &mut CodeBuffer, rd: u8);

    /// Call `target` through the scratch register `via`.
    fn out_call(&self, buf: &mut CodeBuffer, via: u8, target: u32);

    fn out_trap(&self, buf: &mut CodeBuffer);
    fn out_nop(&self, buf: &mut CodeBuffer);
}

/// Link to the interpretive emulator, used when lowering the
/// unsupported-opcode fallback call.
pub trait InterpreterLink {
    /// Host address of the guest CPU state block.
    fn state_address(&self) -> u32;

    /// Host address of the interpreter's handler for `opcode`.
    fn opcode_handler(&self, opcode: u16) -> u32;
}
