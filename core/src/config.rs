use serde::{Deserialize, Serialize};

use crate::error::CompilerError;
use crate::layout::StateLayout;

/// Default number of guest instructions in one translation unit.
pub const DEFAULT_MAX_GUEST_INSNS: usize = 1024;
/// Average number of macroblocks one guest instruction expands to.
pub const DEFAULT_MACROBLOCKS_PER_INSN: usize = 4;
/// Largest macroblock buffer a configuration may ask for.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Compiler settings, normally read from the emulator's configuration
/// file. Missing keys fall back to the defaults; a capacity that is zero
/// or above [`MAX_CAPACITY`] is rejected while deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCompilerConfig")]
pub struct CompilerConfig {
    pub max_guest_insns: usize,
    pub macroblocks_per_insn: usize,
    pub layout: StateLayout,
}

impl CompilerConfig {
    /// Number of macroblocks the buffer must hold.
    pub fn capacity(&self) -> Result<usize, CompilerError> {
        self.max_guest_insns
            .checked_mul(self.macroblocks_per_insn)
            .filter(|&n| (1..=MAX_CAPACITY).contains(&n))
            .ok_or(CompilerError::InvalidCapacity {
                max_guest_insns: self.max_guest_insns,
                macroblocks_per_insn: self.macroblocks_per_insn,
            })
    }

    pub fn validate(&self) -> Result<(), CompilerError> {
        self.capacity().map(|_| ())
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_guest_insns: DEFAULT_MAX_GUEST_INSNS,
            macroblocks_per_insn: DEFAULT_MACROBLOCKS_PER_INSN,
            layout: StateLayout::default(),
        }
    }
}

/// On-disk form, checked before it becomes a [`CompilerConfig`].
#[derive(Deserialize)]
#[serde(default)]
struct RawCompilerConfig {
    max_guest_insns: usize,
    macroblocks_per_insn: usize,
    layout: StateLayout,
}

impl Default for RawCompilerConfig {
    fn default() -> Self {
        let CompilerConfig {
            max_guest_insns,
            macroblocks_per_insn,
            layout,
        } = CompilerConfig::default();
        Self {
            max_guest_insns,
            macroblocks_per_insn,
            layout,
        }
    }
}

impl TryFrom<RawCompilerConfig> for CompilerConfig {
    type Error = CompilerError;

    fn try_from(raw: RawCompilerConfig) -> Result<Self, CompilerError> {
        let config = Self {
            max_guest_insns: raw.max_guest_insns,
            macroblocks_per_insn: raw.macroblocks_per_insn,
            layout: raw.layout,
        };
        config.validate()?;
        Ok(config)
    }
}
