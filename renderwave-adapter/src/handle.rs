use alloc::vec::Vec;

use renderwave::RenderWave;

/// The imperative surface a list exposes to its owner.
///
/// Scroll calls return the target offset, or `None` while no viewport is attached. Indexes
/// past the end clamp to the last item.
pub trait ScrollHandle {
    fn scroll_to_index(&mut self, index: usize) -> Option<u64>;

    fn scroll_to_offset(&mut self, offset: u64) -> Option<u64>;

    /// Revealed indexes of the rendered range, ascending. Empty while detached.
    fn visible_indexes(&self) -> Vec<usize>;
}

impl ScrollHandle for RenderWave {
    fn scroll_to_index(&mut self, index: usize) -> Option<u64> {
        RenderWave::scroll_to_index(self, index)
    }

    fn scroll_to_offset(&mut self, offset: u64) -> Option<u64> {
        RenderWave::scroll_to_offset(self, offset)
    }

    fn visible_indexes(&self) -> Vec<usize> {
        RenderWave::visible_indexes(self)
    }
}
