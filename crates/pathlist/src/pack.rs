//! Order-preserving compaction of sparse slot arrays.
//!
//! Lexed lines and the four category arrays are all filled by line index,
//! leaving holes. `pack` moves every kept slot forward to the next free
//! position and truncates the rest, so the survivors stay in their original
//! relative order.

/// Compacts the first `count` slots of `slots` in place, keeping those for
/// which `keep` returns true. Returns the new length.
///
/// Slots past `count` are discarded.
pub fn pack<T, F>(slots: &mut Vec<T>, count: usize, mut keep: F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let count = count.min(slots.len());
    let mut idx = 0;

    for ptr in 0..count {
        if !keep(&slots[ptr]) {
            continue;
        }
        // Everything in idx..ptr has been evicted, so swapping never loses a
        // kept slot.
        slots.swap(idx, ptr);
        idx += 1;
    }

    slots.truncate(idx);
    idx
}

/// Compacts sparse `Option` slots, dropping the `None` holes.
pub fn pack_sparse<T>(slots: &mut Vec<Option<T>>, count: usize) -> usize {
    pack(slots, count, Option::is_some)
}
