use compemu_core::MacroblockBuffer;

use crate::code_buffer::CodeBuffer;
use crate::lower::lower_macroblock;
use crate::{HostCodeGen, InterpreterLink};

/// Result of one code generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenStats {
    /// Byte offset in the code buffer where the unit's code starts.
    pub start: usize,
    /// Macroblocks whose lowering routine ran.
    pub lowered: usize,
    /// Host instructions appended.
    pub insns: usize,
}

/// Lower every macroblock of the unit, in order, into `buf`.
///
/// An empty unit is not an error: a warning is logged and nothing is
/// emitted.
pub fn generate(
    mbs: &MacroblockBuffer,
    backend: &impl HostCodeGen,
    link: &impl InterpreterLink,
    buf: &mut CodeBuffer,
) -> GenStats {
    let start = buf.offset();
    let first_insn = buf.insn_count();
    if mbs.is_empty() {
        tracing::warn!("macroblock buffer is empty at code generation");
        return GenStats {
            start,
            ..GenStats::default()
        };
    }

    let mut lowered = 0;
    mbs.for_each_in_order(|mb| {
        tracing::trace!("lower {mb}");
        if lower_macroblock(mb, backend, link, buf) {
            lowered += 1;
        }
    });

    let stats = GenStats {
        start,
        lowered,
        insns: buf.insn_count() - first_insn,
    };
    tracing::debug!(
        macroblocks = mbs.len(),
        lowered = stats.lowered,
        insns = stats.insns,
        "code generation done"
    );
    stats
}
