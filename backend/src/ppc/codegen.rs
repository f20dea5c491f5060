use crate::code_buffer::CodeBuffer;
use crate::ppc::emitter::*;
use crate::HostCodeGen;

/// PowerPC 32-bit host code generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct PpcCodeGen;

impl PpcCodeGen {
    pub fn new() -> Self {
        Self
    }
}

impl HostCodeGen for PpcCodeGen {
    fn out_liw(&self, buf: &mut CodeBuffer, rd: u8, imm: u32) {
        emit_liw(buf, rd, imm);
    }

    fn out_lwz(&self, buf: &mut CodeBuffer, rd: u8, base: u8, offset: i16) {
        emit_lwz(buf, rd, base, offset);
    }

    fn out_lhz(&self, buf: &mut CodeBuffer, rd: u8, base: u8, offset: i16) {
        emit_lhz(buf, rd, base, offset);
    }

    fn out_stw(&self, buf: &mut CodeBuffer, rs: u8, base: u8, offset: i16) {
        emit_stw(buf, rs, base, offset);
    }

    fn out_sth(&self, buf: &mut CodeBuffer, rs: u8, base: u8, offset: i16) {
        emit_sth(buf, rs, base, offset);
    }

    fn out_addco(&self, buf: &mut CodeBuffer, rd: u8, ra: u8, rb: u8, rc: bool) {
        emit_addco(buf, rd, ra, rb, rc);
    }

    fn out_ori(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16) {
        emit_ori(buf, ra, rs, imm);
    }

    fn out_oris(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16) {
        emit_oris(buf, ra, rs, imm);
    }

    fn out_andi(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16) {
        emit_andi(buf, ra, rs, imm);
    }

    fn out_and(&self, buf: &mut CodeBuffer, ra: u8, rs: u8, rb: u8, rc: bool) {
        emit_and(buf, ra, rs, rb, rc);
    }

    fn out_rlwimi(
        &self,
        buf: &mut CodeBuffer,
        ra: u8,
        rs: u8,
        sh: u8,
        mb: u8,
        me: u8,
        rc: bool,
    ) {
        emit_rlwimi(buf, ra, rs, sh, mb, me, rc);
    }

    fn out_rlwinm(
        &self,
        buf: &mut CodeBuffer,
        ra: u8,
        rs: u8,
        sh: u8,
        mb: u8,
        me: u8,
        rc: bool,
    ) {
        emit_rlwinm(buf, ra, rs, sh, mb, me, rc);
    }

    fn out_mfcr(&self, buf: &mut CodeBuffer, rd: u8) {
        emit_mfcr(buf, rd);
    }

    fn out_mcrxr(&self, buf: &mut CodeBuffer, crf: u8) {
        emit_mcrxr(buf, crf);
    }

    fn out_mfxer(&self, buf: &mut CodeBuffer, rd: u8) {
        emit_mfspr(buf, rd, SPR_XER);
    }

    fn out_call(&self, buf: &mut CodeBuffer, via: u8, target: u32) {
        emit_call(buf, via, target);
    }

    fn out_trap(&self, buf: &mut CodeBuffer) {
        emit_trap(buf);
    }

    fn out_nop(&self, buf: &mut CodeBuffer) {
        emit_nop(buf);
    }
}
