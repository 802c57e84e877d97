//! Scroll target computations.
//!
//! Every function here is pure and clamps its result to `[0, max_scroll]`, where
//! `max_scroll = total_height - viewport_size` (saturating).

use crate::OffsetIndex;

/// A discrete keyboard navigation intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavKey {
    LineDown,
    LineUp,
    PageDown,
    PageUp,
    Home,
    End,
}

impl NavKey {
    pub const ALL: [NavKey; 6] = [
        NavKey::LineDown,
        NavKey::LineUp,
        NavKey::PageDown,
        NavKey::PageUp,
        NavKey::Home,
        NavKey::End,
    ];

    /// Maps a host key name (`KeyboardEvent.key` style) to an intent.
    pub fn from_key_name(name: &str) -> Option<NavKey> {
        match name {
            "ArrowDown" => Some(NavKey::LineDown),
            "ArrowUp" => Some(NavKey::LineUp),
            "PageDown" => Some(NavKey::PageDown),
            "PageUp" => Some(NavKey::PageUp),
            "Home" => Some(NavKey::Home),
            "End" => Some(NavKey::End),
            _ => None,
        }
    }
}

pub fn max_scroll(total_height: u64, viewport_size: u32) -> u64 {
    total_height.saturating_sub(viewport_size as u64)
}

/// Offset that puts `index` at the top of the viewport. Out-of-range indexes clamp to the
/// last item.
pub fn target_for_index(offsets: &OffsetIndex, index: usize, max_scroll: u64) -> u64 {
    if offsets.is_empty() {
        return 0;
    }
    let index = index.min(offsets.len() - 1);
    offsets.offset_of(index).min(max_scroll)
}

pub fn target_for_offset(offset: u64, max_scroll: u64) -> u64 {
    offset.min(max_scroll)
}

/// Rounds `current` to the nearest batch boundary (`item_height * batch_size` pixels),
/// ties rounding up.
///
/// The input is clamped before rounding, which makes the function idempotent even when the
/// last boundary lies beyond `max_scroll`.
pub fn target_for_snap(current: u64, item_height: u32, batch_size: usize, max_scroll: u64) -> u64 {
    let batch_px = item_height.max(1) as u128 * batch_size.max(1) as u128;
    let current = current.min(max_scroll) as u128;
    let snapped = (current + batch_px / 2) / batch_px * batch_px;
    snapped.min(max_scroll as u128) as u64
}

/// Applies a navigation intent: one item for line steps, one viewport for page steps.
pub fn target_for_key(
    key: NavKey,
    current: u64,
    viewport_size: u32,
    item_height: u32,
    max_scroll: u64,
) -> u64 {
    let line = item_height as u64;
    let page = viewport_size as u64;
    let target = match key {
        NavKey::LineDown => current.saturating_add(line),
        NavKey::LineUp => current.saturating_sub(line),
        NavKey::PageDown => current.saturating_add(page),
        NavKey::PageUp => current.saturating_sub(page),
        NavKey::Home => 0,
        NavKey::End => max_scroll,
    };
    target.min(max_scroll)
}

/// Like [`target_for_key`] for raw key names. Unknown keys leave the offset where it is.
pub fn target_for_key_name(
    name: &str,
    current: u64,
    viewport_size: u32,
    item_height: u32,
    max_scroll: u64,
) -> u64 {
    match NavKey::from_key_name(name) {
        Some(key) => target_for_key(key, current, viewport_size, item_height, max_scroll),
        None => current.min(max_scroll),
    }
}
