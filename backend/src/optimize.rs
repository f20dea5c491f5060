// Macroblock optimizer. Works on the dependency masks only: an entry
// may be dropped or moved when the masks prove nothing observes the
// difference. Pinned entries keep their place and their relative order.
//
// The pass is currently the identity transform; `removable` and
// `can_swap` are the conditions any rewrite has to satisfy.

use compemu_core::{Macroblock, MacroblockBuffer, MbIdx};

/// Optimize the unit in place.
pub fn optimize(mbs: &mut MacroblockBuffer) {
    tracing::debug!(macroblocks = mbs.len(), "optimize: identity pass");
}

/// Whether the entry at `idx` may be eliminated.
///
/// Pinned entries and entries that may touch arbitrary state are never
/// removable. Otherwise no later entry may read anything it writes.
pub fn removable(mbs: &MacroblockBuffer, idx: MbIdx) -> bool {
    let entries = mbs.as_slice();
    let Some(mb) = entries.get(idx.0 as usize) else {
        return false;
    };
    if mb.is_pinned() || mb.output.has_all() {
        return false;
    }
    entries[idx.0 as usize + 1..]
        .iter()
        .all(|later| !later.input.intersects(mb.output))
}

/// Whether two adjacent entries may trade places.
///
/// Neither may be pinned, neither may read what the other writes, and
/// they may not write a common register.
pub fn can_swap(a: &Macroblock, b: &Macroblock) -> bool {
    !a.is_pinned()
        && !b.is_pinned()
        && !a.input.intersects(b.output)
        && !b.input.intersects(a.output)
        && !a.output.intersects(b.output)
}
