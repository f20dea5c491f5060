//! Interpreter for the PowerPC instruction subset the backend emits.
//!
//! Memory is a single big-endian window starting at `mem_base`, normally
//! holding a guest state block. Calls through LR are not followed: they
//! are handed to a callback standing in for the interpreter handler, and
//! the volatile registers are clobbered afterwards.

use compemu_backend::ppc::emitter::INSN_BLRL;
use compemu_backend::ppc::regs::{PARAM1, PARAM2};
use compemu_backend::InterpreterLink;

pub const CR0_LT: u32 = 0x8000_0000;
pub const CR0_GT: u32 = 0x4000_0000;
pub const CR0_EQ: u32 = 0x2000_0000;
pub const CR0_SO: u32 = 0x1000_0000;

pub const XER_SO: u32 = 0x8000_0000;
pub const XER_OV: u32 = 0x4000_0000;
pub const XER_CA: u32 = 0x2000_0000;

/// Value left in volatile registers after a call.
pub const CLOBBER: u32 = 0xdead_beef;

/// Host address the guest state image is mapped at.
pub const STATE_ADDR: u32 = 0x1000_0000;
/// Base of the fake interpreter handler table.
pub const HANDLER_BASE: u32 = 0x2000_0000;

/// One call through LR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallRecord {
    pub target: u32,
    pub param1: u32,
    pub param2: u32,
}

/// Interpreter link with handlers at `HANDLER_BASE + opcode * 4`.
pub struct TestLink;

impl InterpreterLink for TestLink {
    fn state_address(&self) -> u32 {
        STATE_ADDR
    }

    fn opcode_handler(&self, opcode: u16) -> u32 {
        HANDLER_BASE + opcode as u32 * 4
    }
}

pub struct PpcSim {
    pub gpr: [u32; 32],
    pub cr: u32,
    pub xer: u32,
    pub lr: u32,
    pub mem: Vec<u8>,
    pub mem_base: u32,
    pub calls: Vec<CallRecord>,
    pub trapped: bool,
}

/// Mask with IBM bits `mb..=me` set, wrapping when `mb > me`.
pub fn ppc_mask(mb: u32, me: u32) -> u32 {
    let from = u32::MAX >> mb;
    let to = u32::MAX << (31 - me);
    if mb <= me {
        from & to
    } else {
        from | to
    }
}

fn sext16(v: u32) -> u32 {
    v as u16 as i16 as i32 as u32
}

impl PpcSim {
    pub fn new(mem_base: u32, size: usize) -> Self {
        Self {
            gpr: [0; 32],
            cr: 0,
            xer: 0,
            lr: 0,
            mem: vec![0; size],
            mem_base,
            calls: Vec::new(),
            trapped: false,
        }
    }

    fn index(&self, addr: u32, len: usize) -> usize {
        let off = addr.wrapping_sub(self.mem_base) as usize;
        assert!(
            off + len <= self.mem.len(),
            "access of {len} bytes at {addr:#010x} outside simulated memory"
        );
        off
    }

    pub fn read_u32(&self, addr: u32) -> u32 {
        let i = self.index(addr, 4);
        u32::from_be_bytes([self.mem[i], self.mem[i + 1], self.mem[i + 2], self.mem[i + 3]])
    }

    pub fn read_u16(&self, addr: u32) -> u16 {
        let i = self.index(addr, 2);
        u16::from_be_bytes([self.mem[i], self.mem[i + 1]])
    }

    pub fn write_u32(&mut self, addr: u32, val: u32) {
        let i = self.index(addr, 4);
        self.mem[i..i + 4].copy_from_slice(&val.to_be_bytes());
    }

    pub fn write_u16(&mut self, addr: u32, val: u16) {
        let i = self.index(addr, 2);
        self.mem[i..i + 2].copy_from_slice(&val.to_be_bytes());
    }

    fn ra_or_zero(&self, ra: usize) -> u32 {
        if ra == 0 {
            0
        } else {
            self.gpr[ra]
        }
    }

    fn set_cr0(&mut self, val: u32) {
        let mut f = if (val as i32) < 0 {
            CR0_LT
        } else if val == 0 {
            CR0_EQ
        } else {
            CR0_GT
        };
        if self.xer & XER_SO != 0 {
            f |= CR0_SO;
        }
        self.cr = (self.cr & 0x0fff_ffff) | f;
    }

    /// Run `code` to the end or to the first trap. Calls go to `on_call`.
    pub fn run(
        &mut self,
        code: impl IntoIterator<Item = u32>,
        mut on_call: impl FnMut(&mut PpcSim, CallRecord),
    ) {
        for insn in code {
            if self.trapped {
                break;
            }
            self.step(insn, &mut on_call);
        }
    }

    /// Run `code`, ignoring calls.
    pub fn run_plain(&mut self, code: impl IntoIterator<Item = u32>) {
        self.run(code, |_, _| {});
    }

    fn step(&mut self, insn: u32, on_call: &mut impl FnMut(&mut PpcSim, CallRecord)) {
        let opcd = insn >> 26;
        let rt = ((insn >> 21) & 31) as usize;
        let ra = ((insn >> 16) & 31) as usize;
        let rb = ((insn >> 11) & 31) as usize;
        let d = insn & 0xffff;
        let rc = insn & 1 != 0;

        match opcd {
            14 => self.gpr[rt] = self.ra_or_zero(ra).wrapping_add(sext16(d)),
            15 => self.gpr[rt] = self.ra_or_zero(ra).wrapping_add(d << 16),
            19 if insn == INSN_BLRL => {
                let rec = CallRecord {
                    target: self.lr,
                    param1: self.gpr[PARAM1 as usize],
                    param2: self.gpr[PARAM2 as usize],
                };
                self.calls.push(rec);
                on_call(self, rec);
                self.gpr[0] = CLOBBER;
                for r in 3..=12 {
                    self.gpr[r] = CLOBBER;
                }
            }
            20 | 21 => {
                let mb = (insn >> 6) & 31;
                let me = (insn >> 1) & 31;
                let m = ppc_mask(mb, me);
                let r = self.gpr[rt].rotate_left(rb as u32);
                self.gpr[ra] = if opcd == 20 {
                    (r & m) | (self.gpr[ra] & !m)
                } else {
                    r & m
                };
                if rc {
                    self.set_cr0(self.gpr[ra]);
                }
            }
            24 => self.gpr[ra] = self.gpr[rt] | d,
            25 => self.gpr[ra] = self.gpr[rt] | (d << 16),
            28 => {
                self.gpr[ra] = self.gpr[rt] & d;
                self.set_cr0(self.gpr[ra]);
            }
            31 => self.step_x(insn, rt, ra, rb, rc),
            32 => {
                let ea = self.ra_or_zero(ra).wrapping_add(sext16(d));
                self.gpr[rt] = self.read_u32(ea);
            }
            36 => {
                let ea = self.ra_or_zero(ra).wrapping_add(sext16(d));
                self.write_u32(ea, self.gpr[rt]);
            }
            40 => {
                let ea = self.ra_or_zero(ra).wrapping_add(sext16(d));
                self.gpr[rt] = self.read_u16(ea) as u32;
            }
            44 => {
                let ea = self.ra_or_zero(ra).wrapping_add(sext16(d));
                self.write_u16(ea, self.gpr[rt] as u16);
            }
            _ => panic!("unsupported instruction {insn:#010x}"),
        }
    }

    fn step_x(&mut self, insn: u32, rt: usize, ra: usize, rb: usize, rc: bool) {
        let xo = (insn >> 1) & 0x3ff;
        // The SPR number is encoded with its halves swapped.
        let spr = (rb as u32) << 5 | ra as u32;
        match xo {
            4 => self.trapped = true,
            // addc / addco
            10 | 522 => {
                let (a, b) = (self.gpr[ra], self.gpr[rb]);
                let (sum, carry) = a.overflowing_add(b);
                self.gpr[rt] = sum;
                self.xer = if carry { self.xer | XER_CA } else { self.xer & !XER_CA };
                if xo == 522 {
                    let ov = (a as i32).checked_add(b as i32).is_none();
                    if ov {
                        self.xer |= XER_OV | XER_SO;
                    } else {
                        self.xer &= !XER_OV;
                    }
                }
                if rc {
                    self.set_cr0(sum);
                }
            }
            19 => self.gpr[rt] = self.cr,
            28 => {
                self.gpr[ra] = self.gpr[rt] & self.gpr[rb];
                if rc {
                    self.set_cr0(self.gpr[ra]);
                }
            }
            339 => {
                self.gpr[rt] = match spr {
                    1 => self.xer,
                    8 => self.lr,
                    _ => panic!("unsupported mfspr {spr}"),
                }
            }
            467 => match spr {
                1 => self.xer = self.gpr[rt],
                8 => self.lr = self.gpr[rt],
                _ => panic!("unsupported mtspr {spr}"),
            },
            512 => {
                let crf = (insn >> 23) & 7;
                let shift = 28 - 4 * crf;
                self.cr = (self.cr & !(0xf << shift)) | ((self.xer >> 28) << shift);
                self.xer &= 0x0fff_ffff;
            }
            _ => panic!("unsupported X-form instruction {insn:#010x}"),
        }
    }
}
