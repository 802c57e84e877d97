use crate::VirtualRange;

/// The host-owned viewport geometry, read once per scroll/resize event.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub scroll_offset: u64,
    pub viewport_size: u32,
}

impl ViewportState {
    pub fn new(scroll_offset: u64, viewport_size: u32) -> Self {
        Self {
            scroll_offset,
            viewport_size,
        }
    }

    pub fn end(&self) -> u64 {
        self.scroll_offset
            .saturating_add(self.viewport_size as u64)
    }
}

/// Everything derived from a single [`ViewportState`] snapshot.
///
/// Hosts should render a frame from one `FrameState` rather than re-querying the engine
/// between reads, so range and offsets always agree with the same scroll position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    /// Rendered range including overscan.
    pub range: VirtualRange,
    pub total_height: u64,
    pub max_scroll: u64,
}
