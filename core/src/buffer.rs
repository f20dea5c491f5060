use crate::config::{
    CompilerConfig, DEFAULT_MACROBLOCKS_PER_INSN, DEFAULT_MAX_GUEST_INSNS,
};
use crate::error::CompilerError;
use crate::macroblock::Macroblock;

/// Index into a [`MacroblockBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MbIdx(pub u32);

/// Fixed-capacity, append-only sequence of macroblocks for one
/// translation unit.
///
/// Lifecycle: `reset` → `push`* → optimize → generate. Exactly one unit
/// is under construction at a time; abandoning a unit is just another
/// `reset`.
pub struct MacroblockBuffer {
    mbs: Vec<Macroblock>,
    capacity: usize,
}

impl MacroblockBuffer {
    /// Allocate a buffer holding at most `capacity` macroblocks.
    pub fn new(capacity: usize) -> Self {
        Self {
            mbs: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn with_config(config: &CompilerConfig) -> Result<Self, CompilerError> {
        Ok(Self::new(config.capacity()?))
    }

    /// Start a new translation unit. Whatever the previous unit
    /// collected is discarded.
    pub fn reset(&mut self) {
        tracing::debug!(discarded = self.mbs.len(), "macroblock buffer reset");
        self.mbs.clear();
    }

    /// Append a macroblock, failing when the buffer is full.
    pub fn try_push(&mut self, mb: Macroblock) -> Result<MbIdx, CompilerError> {
        if self.mbs.len() == self.capacity {
            return Err(CompilerError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let idx = MbIdx(self.mbs.len() as u32);
        self.mbs.push(mb);
        Ok(idx)
    }

    /// Append a macroblock. Running out of space is fatal: dropping a
    /// macroblock would corrupt the emitted code, so the capacity has to
    /// be raised instead.
    pub fn push(&mut self, mb: Macroblock) -> MbIdx {
        match self.try_push(mb) {
            Ok(idx) => idx,
            Err(err) => {
                tracing::error!(capacity = self.capacity, "{err}");
                panic!("{err}");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.mbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mbs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, idx: MbIdx) -> Option<&Macroblock> {
        self.mbs.get(idx.0 as usize)
    }

    pub fn as_slice(&self) -> &[Macroblock] {
        &self.mbs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Macroblock> {
        self.mbs.iter()
    }

    /// Visit entries in index order. Entries without a lowering routine
    /// are skipped.
    pub fn for_each_in_order(&self, mut visitor: impl FnMut(&Macroblock)) {
        for mb in self.mbs.iter().filter(|mb| mb.lowers()) {
            visitor(mb);
        }
    }

    // -- Rewriting, for optimizer passes --

    /// Remove the entry at `idx`, shifting later entries down.
    pub fn remove(&mut self, idx: MbIdx) -> Macroblock {
        self.mbs.remove(idx.0 as usize)
    }

    pub fn swap(&mut self, a: MbIdx, b: MbIdx) {
        self.mbs.swap(a.0 as usize, b.0 as usize);
    }
}

impl<'a> IntoIterator for &'a MacroblockBuffer {
    type Item = &'a Macroblock;
    type IntoIter = std::slice::Iter<'a, Macroblock>;

    fn into_iter(self) -> Self::IntoIter {
        self.mbs.iter()
    }
}

impl Default for MacroblockBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GUEST_INSNS * DEFAULT_MACROBLOCKS_PER_INSN)
    }
}
