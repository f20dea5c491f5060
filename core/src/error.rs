use thiserror::Error;

/// Errors raised while configuring or collecting a translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilerError {
    /// The macroblock buffer is full. Not recoverable: the capacity
    /// constant in the compiler configuration has to be raised.
    #[error(
        "macroblock buffer ran out of space ({capacity} entries), \
         raise the translation unit capacity"
    )]
    CapacityExceeded { capacity: usize },

    /// The configured capacity is out of range. Reported when the
    /// configuration is loaded.
    #[error(
        "invalid translation unit capacity: {max_guest_insns} instructions \
         x {macroblocks_per_insn} macroblocks must give 1..={max} entries",
        max = crate::config::MAX_CAPACITY
    )]
    InvalidCapacity {
        max_guest_insns: usize,
        macroblocks_per_insn: usize,
    },
}
