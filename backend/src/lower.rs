//! Per-kind lowering routines: one macroblock in, one or more host
//! instructions out.

use compemu_core::{Macroblock, MbOp};

use crate::code_buffer::CodeBuffer;
use crate::ppc::regs::{CR_TMP2, PARAM1, PARAM2, SPECTMP};
use crate::{HostCodeGen, InterpreterLink};

/// Lower a single macroblock. Returns `false` for kinds without a
/// lowering routine, which emit nothing.
pub fn lower_macroblock(
    mb: &Macroblock,
    backend: &impl HostCodeGen,
    link: &impl InterpreterLink,
    buf: &mut CodeBuffer,
) -> bool {
    match mb.op {
        MbOp::LoadRegisterLong { output, imm } => backend.out_liw(buf, output, imm),
        MbOp::LoadMemoryWord(m) => backend.out_lhz(buf, m.reg, m.base, m.offset),
        MbOp::LoadMemoryLong(m) => backend.out_lwz(buf, m.reg, m.base, m.offset),
        MbOp::StoreMemoryWord(m) => backend.out_sth(buf, m.reg, m.base, m.offset),
        MbOp::StoreMemoryLong(m) => backend.out_stw(buf, m.reg, m.base, m.offset),
        MbOp::AddWithFlags(t) => {
            backend.out_addco(buf, t.output, t.input1, t.input2, true)
        }
        MbOp::OrLowImm(t) => backend.out_ori(buf, t.output, t.input, t.imm),
        MbOp::OrHighImm(t) => backend.out_oris(buf, t.output, t.input, t.imm),
        MbOp::AndImm(t) => backend.out_andi(buf, t.output, t.input, t.imm),
        MbOp::AndRegisters(t) => {
            backend.out_and(buf, t.output, t.input1, t.input2, false)
        }
        MbOp::CopyNzcvFlags { output } => {
            // XER summary bits to CR2, then the whole CR to the output.
            backend.out_mcrxr(buf, CR_TMP2);
            backend.out_mfcr(buf, output);
        }
        MbOp::CopyNzFlags { output } => backend.out_mfcr(buf, output),
        MbOp::CopyCvFlags { output } => backend.out_mfxer(buf, output),
        MbOp::RotateAndCopyBits(r) => backend.out_rlwimi(
            buf,
            r.output,
            r.input,
            r.shift,
            r.mask_begin,
            r.mask_end,
            r.update_flags,
        ),
        MbOp::RotateAndMaskBits(r) => backend.out_rlwinm(
            buf,
            r.output,
            r.input,
            r.shift,
            r.mask_begin,
            r.mask_end,
            r.update_flags,
        ),
        MbOp::Stop => backend.out_trap(buf),
        MbOp::Nop => backend.out_nop(buf),
        MbOp::OpcodeUnsupported { opcode } => {
            // handler(opcode, &state)
            backend.out_liw(buf, PARAM1, opcode as u32);
            backend.out_liw(buf, PARAM2, link.state_address());
            backend.out_call(buf, SPECTMP, link.opcode_handler(opcode));
        }
        MbOp::Marker => return false,
    }
    true
}
