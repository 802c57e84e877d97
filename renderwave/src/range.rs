use alloc::vec::Vec;

use crate::{OffsetIndex, ViewportState, VirtualRange};

/// Returns the overscanned index range to render for `viewport`.
///
/// `start` is the first item whose end lies past the scroll position and `end` is the first
/// item whose end lies past the bottom edge of the viewport, each widened by `overscan` and
/// clamped to `[0, len]`. An item straddling the bottom edge is therefore covered by the
/// overscan rather than by the base range. Both bounds are `O(log n)` lookups, so the cost
/// of a recalculation does not depend on the list length.
pub fn visible_range(
    offsets: &OffsetIndex,
    viewport: ViewportState,
    overscan: usize,
) -> VirtualRange {
    let count = offsets.len();
    if count == 0 {
        return VirtualRange::EMPTY;
    }
    let first = offsets.lower_bound(viewport.scroll_offset);
    let last = offsets.lower_bound(viewport.end());
    widen(first, last, count, overscan)
}

/// Closed form of [`visible_range`] for a list where every item is `item_height` tall.
///
/// For uniform heights both functions return identical ranges.
pub fn visible_range_uniform(
    scroll_offset: u64,
    viewport_size: u32,
    item_height: u32,
    count: usize,
    overscan: usize,
) -> VirtualRange {
    if count == 0 {
        return VirtualRange::EMPTY;
    }
    if item_height == 0 {
        // Every item ends at offset 0, so all of them are "before" any scroll position.
        return widen(count, count, count, overscan);
    }
    let h = item_height as u64;
    let items_within = |offset: u64| (offset / h).min(count as u64) as usize;
    let first = items_within(scroll_offset);
    let last = items_within(scroll_offset.saturating_add(viewport_size as u64));
    widen(first, last, count, overscan)
}

fn widen(first: usize, last: usize, count: usize, overscan: usize) -> VirtualRange {
    let start = first.min(count).saturating_sub(overscan);
    let end = last.saturating_add(overscan).min(count);
    debug_assert!(start <= end, "visible range inverted ({start}..{end})");
    VirtualRange::new(start, end)
}

/// Collects the indexes of `range` that fall inside `revealed`, in ascending order.
///
/// `out` is cleared first.
pub fn revealed_in_range(range: VirtualRange, revealed: VirtualRange, out: &mut Vec<usize>) {
    out.clear();
    for index in range.start_index..range.end_index {
        if revealed.contains(index) {
            out.push(index);
        }
    }
}
