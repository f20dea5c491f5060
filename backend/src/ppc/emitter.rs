//! PowerPC 32-bit instruction encoding.
//!
//! Field layout follows the Power ISA: the primary opcode sits in the top
//! six bits, register fields are five bits wide, and XO-form extended
//! opcodes are shifted left by one to leave room for the Rc bit.

use crate::code_buffer::CodeBuffer;

// -- Primary opcodes (OPCD_*) --

pub const OPCD_ADDI: u32 = 14;
pub const OPCD_ADDIS: u32 = 15;
pub const OPCD_BCLR: u32 = 19;
pub const OPCD_RLWIMI: u32 = 20;
pub const OPCD_RLWINM: u32 = 21;
pub const OPCD_ORI: u32 = 24;
pub const OPCD_ORIS: u32 = 25;
pub const OPCD_ANDI: u32 = 28;
pub const OPCD_X: u32 = 31;
pub const OPCD_LWZ: u32 = 32;
pub const OPCD_STW: u32 = 36;
pub const OPCD_LHZ: u32 = 40;
pub const OPCD_STH: u32 = 44;

// -- Extended opcodes under OPCD_X (XO_*) --

pub const XO_TW: u32 = 4;
pub const XO_ADDC: u32 = 10;
pub const XO_MFCR: u32 = 19;
pub const XO_AND: u32 = 28;
pub const XO_MFSPR: u32 = 339;
pub const XO_MTSPR: u32 = 467;
pub const XO_MCRXR: u32 = 512;

/// Extended opcode of `bclr` under OPCD_BCLR.
pub const XO_BCLR: u32 = 16;

/// OE bit of XO-form arithmetic.
pub const OE_BIT: u32 = 1 << 10;

// -- Special purpose registers --

pub const SPR_XER: u32 = 1;
pub const SPR_LR: u32 = 8;

/// `blrl`: branch unconditionally to LR, saving the return address.
pub const INSN_BLRL: u32 = (OPCD_BCLR << 26) | (20 << 21) | (XO_BCLR << 1) | 1;
/// `tw 31, r0, r0`: unconditional trap.
pub const INSN_TRAP: u32 = (OPCD_X << 26) | (31 << 21) | (XO_TW << 1);
/// `ori r0, r0, 0`: the preferred no-op.
pub const INSN_NOP: u32 = OPCD_ORI << 26;

// -- Field encoders --

#[inline]
fn reg(r: u8) -> u32 {
    debug_assert!(r < 32, "PowerPC has 32 GPRs");
    (r & 31) as u32
}

/// D-form: `opcd | rt | ra | d16`.
#[inline]
pub fn d_form(opcd: u32, rt: u8, ra: u8, d: u16) -> u32 {
    (opcd << 26) | (reg(rt) << 21) | (reg(ra) << 16) | d as u32
}

/// X-form under OPCD_X: `rt | ra | rb | xo | rc`.
#[inline]
pub fn x_form(rt: u8, ra: u8, rb: u8, xo: u32, rc: bool) -> u32 {
    (OPCD_X << 26)
        | (reg(rt) << 21)
        | (reg(ra) << 16)
        | (reg(rb) << 11)
        | (xo << 1)
        | rc as u32
}

/// M-form rotate: `opcd | rs | ra | sh | mb | me | rc`.
#[inline]
pub fn m_form(opcd: u32, rs: u8, ra: u8, sh: u8, mb: u8, me: u8, rc: bool) -> u32 {
    (opcd << 26)
        | (reg(rs) << 21)
        | (reg(ra) << 16)
        | (((sh & 31) as u32) << 11)
        | (((mb & 31) as u32) << 6)
        | (((me & 31) as u32) << 1)
        | rc as u32
}

/// SPR numbers are encoded with their two 5-bit halves swapped.
#[inline]
pub fn spr_field(spr: u32) -> u32 {
    ((spr & 31) << 5) | ((spr >> 5) & 31)
}

// -- Instruction emitters --

pub fn emit_addi(buf: &mut CodeBuffer, rd: u8, ra: u8, simm: i16) {
    buf.emit_insn(d_form(OPCD_ADDI, rd, ra, simm as u16));
}

pub fn emit_addis(buf: &mut CodeBuffer, rd: u8, ra: u8, simm: u16) {
    buf.emit_insn(d_form(OPCD_ADDIS, rd, ra, simm));
}

/// Load a 32-bit constant: `li` when it fits a signed 16-bit
/// immediate, otherwise `lis` followed by `ori` for a non-zero low half.
pub fn emit_liw(buf: &mut CodeBuffer, rd: u8, imm: u32) {
    let simm = imm as i32;
    if (i16::MIN as i32..=i16::MAX as i32).contains(&simm) {
        emit_addi(buf, rd, 0, simm as i16);
        return;
    }
    emit_addis(buf, rd, 0, (imm >> 16) as u16);
    if imm & 0xffff != 0 {
        emit_ori(buf, rd, rd, imm as u16);
    }
}

pub fn emit_lwz(buf: &mut CodeBuffer, rd: u8, base: u8, offset: i16) {
    buf.emit_insn(d_form(OPCD_LWZ, rd, base, offset as u16));
}

pub fn emit_lhz(buf: &mut CodeBuffer, rd: u8, base: u8, offset: i16) {
    buf.emit_insn(d_form(OPCD_LHZ, rd, base, offset as u16));
}

pub fn emit_stw(buf: &mut CodeBuffer, rs: u8, base: u8, offset: i16) {
    buf.emit_insn(d_form(OPCD_STW, rs, base, offset as u16));
}

pub fn emit_sth(buf: &mut CodeBuffer, rs: u8, base: u8, offset: i16) {
    buf.emit_insn(d_form(OPCD_STH, rs, base, offset as u16));
}

pub fn emit_addco(buf: &mut CodeBuffer, rd: u8, ra: u8, rb: u8, rc: bool) {
    buf.emit_insn(x_form(rd, ra, rb, XO_ADDC, rc) | OE_BIT);
}

// Logical D-forms place the source in the rt slot and the
// destination in the ra slot.

pub fn emit_ori(buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16) {
    buf.emit_insn(d_form(OPCD_ORI, rs, ra, imm));
}

pub fn emit_oris(buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16) {
    buf.emit_insn(d_form(OPCD_ORIS, rs, ra, imm));
}

pub fn emit_andi(buf: &mut CodeBuffer, ra: u8, rs: u8, imm: u16) {
    buf.emit_insn(d_form(OPCD_ANDI, rs, ra, imm));
}

pub fn emit_and(buf: &mut CodeBuffer, ra: u8, rs: u8, rb: u8, rc: bool) {
    buf.emit_insn(x_form(rs, ra, rb, XO_AND, rc));
}

pub fn emit_rlwimi(buf: &mut CodeBuffer, ra: u8, rs: u8, sh: u8, mb: u8, me: u8, rc: bool) {
    buf.emit_insn(m_form(OPCD_RLWIMI, rs, ra, sh, mb, me, rc));
}

pub fn emit_rlwinm(buf: &mut CodeBuffer, ra: u8, rs: u8, sh: u8, mb: u8, me: u8, rc: bool) {
    buf.emit_insn(m_form(OPCD_RLWINM, rs, ra, sh, mb, me, rc));
}

pub fn emit_mfcr(buf: &mut CodeBuffer, rd: u8) {
    buf.emit_insn(x_form(rd, 0, 0, XO_MFCR, false));
}

pub fn emit_mcrxr(buf: &mut CodeBuffer, crf: u8) {
    buf.emit_insn((OPCD_X << 26) | (((crf & 7) as u32) << 23) | (XO_MCRXR << 1));
}

pub fn emit_mfspr(buf: &mut CodeBuffer, rd: u8, spr: u32) {
    buf.emit_insn((OPCD_X << 26) | (reg(rd) << 21) | (spr_field(spr) << 11) | (XO_MFSPR << 1));
}

pub fn emit_mtspr(buf: &mut CodeBuffer, spr: u32, rs: u8) {
    buf.emit_insn((OPCD_X << 26) | (reg(rs) << 21) | (spr_field(spr) << 11) | (XO_MTSPR << 1));
}

/// `liw via, target; mtlr via; blrl`.
pub fn emit_call(buf: &mut CodeBuffer, via: u8, target: u32) {
    emit_liw(buf, via, target);
    emit_mtspr(buf, SPR_LR, via);
    buf.emit_insn(INSN_BLRL);
}

pub fn emit_trap(buf: &mut CodeBuffer) {
    buf.emit_insn(INSN_TRAP);
}

pub fn emit_nop(buf: &mut CodeBuffer) {
    buf.emit_insn(INSN_NOP);
}
