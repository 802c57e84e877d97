/// A half-open index range `[start_index, end_index)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl VirtualRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Overlap of two ranges; empty ranges collapse to `[start, start)`.
    pub fn intersect(&self, other: VirtualRange) -> VirtualRange {
        let start = self.start_index.max(other.start_index);
        let end = self.end_index.min(other.end_index).max(start);
        VirtualRange::new(start, end)
    }
}

/// One item of the rendered window, positioned on the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveItem {
    pub index: usize,
    /// Pixel offset of the item's leading edge.
    pub start: u64,
    pub height: u32,
    /// `false` means the host should render a placeholder.
    pub revealed: bool,
}

impl WaveItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.height as u64)
    }
}
