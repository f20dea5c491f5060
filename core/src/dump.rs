//! Macroblock dump: human-readable text output for a translation unit.

use std::fmt;
use std::io::Write;

use crate::buffer::MacroblockBuffer;
use crate::macroblock::{Macroblock, MbOp, MemAccess, RotateMask};
use crate::mask::{RegMask, MAX_TEMP_SLOTS};

const FLAG_NAMES: [(RegMask, &str); 9] = [
    (RegMask::FLAG_N, "N"),
    (RegMask::FLAG_Z, "Z"),
    (RegMask::FLAG_C, "C"),
    (RegMask::FLAG_V, "V"),
    (RegMask::FLAG_X, "X"),
    (RegMask::INTERNAL_N, "iN"),
    (RegMask::INTERNAL_Z, "iZ"),
    (RegMask::INTERNAL_C, "iC"),
    (RegMask::INTERNAL_V, "iV"),
];

/// Mask as a comma separated list, e.g. `N,Z,t2,!pin`.
struct MaskList(RegMask);

impl fmt::Display for MaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        let mut names: Vec<String> = Vec::new();
        if m.has_all() {
            names.push("*".into());
        }
        for (flag, name) in FLAG_NAMES {
            if m.contains(flag) && !m.has_all() {
                names.push(name.into());
            }
        }
        for slot in 0..MAX_TEMP_SLOTS {
            if m.raw() & RegMask::tmp(slot).raw() != 0 {
                names.push(format!("t{slot}"));
            }
        }
        if m.is_pinned() {
            names.push("!pin".into());
        }
        if names.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&names.join(","))
        }
    }
}

fn fmt_mem(f: &mut fmt::Formatter<'_>, m: &MemAccess) -> fmt::Result {
    write!(f, "r{}, {}(r{})", m.reg, m.offset, m.base)
}

fn fmt_rot(f: &mut fmt::Formatter<'_>, r: &RotateMask) -> fmt::Result {
    write!(
        f,
        "r{}, r{}, {}, {}, {}",
        r.output, r.input, r.shift, r.mask_begin, r.mask_end
    )?;
    if r.update_flags {
        f.write_str(", rc")?;
    }
    Ok(())
}

impl fmt::Display for Macroblock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<22}", self.kind().name())?;
        match &self.op {
            MbOp::LoadRegisterLong { output, imm } => {
                write!(f, "r{output}, $0x{imm:x}")?
            }
            MbOp::LoadMemoryWord(m)
            | MbOp::LoadMemoryLong(m)
            | MbOp::StoreMemoryWord(m)
            | MbOp::StoreMemoryLong(m) => fmt_mem(f, m)?,
            MbOp::AddWithFlags(t) | MbOp::AndRegisters(t) => {
                write!(f, "r{}, r{}, r{}", t.output, t.input1, t.input2)?
            }
            MbOp::OrLowImm(t) | MbOp::OrHighImm(t) | MbOp::AndImm(t) => {
                write!(f, "r{}, r{}, $0x{:x}", t.output, t.input, t.imm)?
            }
            MbOp::CopyNzcvFlags { output }
            | MbOp::CopyNzFlags { output }
            | MbOp::CopyCvFlags { output } => write!(f, "r{output}")?,
            MbOp::RotateAndCopyBits(r) | MbOp::RotateAndMaskBits(r) => {
                fmt_rot(f, r)?
            }
            MbOp::OpcodeUnsupported { opcode } => write!(f, "$0x{opcode:04x}")?,
            MbOp::Stop | MbOp::Nop | MbOp::Marker => {}
        }
        write!(
            f,
            " [in={} out={}]",
            MaskList(self.input),
            MaskList(self.output)
        )
    }
}

/// Write every macroblock of the unit, one per line.
pub fn dump_buffer(
    mbs: &MacroblockBuffer,
    w: &mut impl Write,
) -> std::io::Result<()> {
    for (i, mb) in mbs.iter().enumerate() {
        writeln!(w, "{i:4}: {mb}")?;
    }
    Ok(())
}

/// Dump the unit into a String.
pub fn dump_to_string(mbs: &MacroblockBuffer) -> String {
    let mut out = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = dump_buffer(mbs, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
