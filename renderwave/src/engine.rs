use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::offsets::clamp_px;
use crate::target::{self, NavKey};
use crate::task::{TaskSlot, Trigger};
use crate::{
    AcceleratedPath, ConfigWarning, FrameState, OffsetIndex, RenderWaveOptions, RevealPhase,
    RevealScheduler, ViewportState, VirtualRange, WaveItem,
};

/// A headless windowing and progressive reveal engine.
///
/// The engine holds no UI objects. The host drives it with viewport geometry, scroll offsets,
/// measured item heights, and the clock (`now_ms`), and reads back which items to render,
/// where to place them, and whether each one is revealed yet.
///
/// Reveal progress is driven by [`Self::on_timer`] and [`Self::on_frame`]; the deadlines the
/// host should wake up for are exposed through [`Self::next_deadline`] and
/// [`Self::wants_frame`]. For smooth scrolling and key handling, see the
/// `renderwave-adapter` crate.
#[derive(Clone, Debug)]
pub struct RenderWave {
    options: RenderWaveOptions,
    offsets: OffsetIndex,
    viewport: Option<ViewportState>,
    reveal: RevealScheduler,
    snap: TaskSlot,
    mounted: bool,
    warnings: Vec<ConfigWarning>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl RenderWave {
    /// Creates an engine from options. Invalid options are clamped; see [`Self::warnings`].
    ///
    /// Nothing is revealed or scheduled until [`Self::mount`].
    pub fn new(mut options: RenderWaveOptions) -> Self {
        let warnings = options.sanitize();
        log_warnings(&warnings);
        wdebug!(
            count = options.count,
            item_height = options.default_item_height,
            batch_size = options.batch_size,
            overscan = options.overscan,
            "RenderWave::new"
        );
        Self {
            offsets: OffsetIndex::new(options.count, options.default_item_height),
            reveal: RevealScheduler::new(options.reveal_config()),
            viewport: None,
            snap: TaskSlot::new(),
            mounted: false,
            warnings,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &RenderWaveOptions {
        &self.options
    }

    /// Warnings produced by the most recent options sanitization.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    pub fn accelerator(&self) -> &AcceleratedPath {
        &self.options.accelerator
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    // Lifecycle

    /// Starts the reveal schedule. Mounting twice is a no-op.
    pub fn mount(&mut self, now_ms: u64) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.reveal.start(now_ms);
        wdebug!(now_ms, "RenderWave::mount");
        self.notify();
    }

    /// Cancels every pending task. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        let reveal = self.reveal.stop();
        let snap = self.snap.cancel();
        let was_mounted = core::mem::replace(&mut self.mounted, false);
        wdebug!(reveal, snap, "RenderWave::unmount");
        if was_mounted || reveal || snap {
            self.notify();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Attaches a viewport of `viewport_size` pixels, scrolled to the top.
    ///
    /// Attaching again only updates the size.
    pub fn attach(&mut self, viewport_size: u32) -> FrameState {
        self.viewport
            .get_or_insert_with(ViewportState::default)
            .viewport_size = viewport_size;
        self.notify();
        self.frame()
    }

    /// Detaches the viewport. Imperative scroll calls become no-ops until reattached.
    pub fn detach(&mut self) {
        self.snap.cancel();
        if self.viewport.take().is_some() {
            self.notify();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.viewport.is_some()
    }

    /// The attached viewport, if any.
    pub fn viewport(&self) -> Option<ViewportState> {
        self.viewport
    }

    /// The attached viewport, or a nominal one at offset 0 with the configured container size.
    pub fn current_viewport(&self) -> ViewportState {
        self.viewport
            .unwrap_or_else(|| ViewportState::new(0, self.options.container_size))
    }

    // Options

    /// Replaces the options.
    ///
    /// A count change discards measurements, a default height change keeps them, and any
    /// change to the reveal inputs restarts the reveal schedule.
    pub fn set_options(&mut self, mut options: RenderWaveOptions, now_ms: u64) {
        let warnings = options.sanitize();
        log_warnings(&warnings);
        self.warnings = warnings;

        let prev_count = self.options.count;
        let prev_height = self.options.default_item_height;
        let prev_snap = self.options.snap_to_batch;
        self.options = options;
        wtrace!(
            count = self.options.count,
            batch_size = self.options.batch_size,
            overscan = self.options.overscan,
            "RenderWave::set_options"
        );

        if self.options.count != prev_count {
            self.offsets = OffsetIndex::new(self.options.count, self.options.default_item_height);
        } else if self.options.default_item_height != prev_height {
            self.offsets
                .set_default_height(self.options.default_item_height);
        }
        if prev_snap && !self.options.snap_to_batch {
            self.snap.cancel();
        }
        self.reveal.reconfigure(self.options.reveal_config(), now_ms);

        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to [`Self::set_options`].
    pub fn update_options(&mut self, f: impl FnOnce(&mut RenderWaveOptions), now_ms: u64) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next, now_ms);
    }

    pub fn set_count(&mut self, count: usize, now_ms: u64) {
        if self.options.count == count {
            return;
        }
        self.update_options(|o| o.count = count, now_ms);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&RenderWave) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    fn advise(&self, warning: ConfigWarning) {
        wwarn!(%warning, "clamped runtime input");
        if let Some(cb) = &self.options.on_warning {
            cb(warning);
        }
    }

    // Events

    /// Records a scroll position reported by the host and returns the frame derived from it.
    ///
    /// With `snap_to_batch`, every scroll event (re)arms the snap debounce. Returns `None`
    /// when no viewport is attached.
    pub fn apply_scroll_event(&mut self, offset: u64, now_ms: u64) -> Option<FrameState> {
        let viewport = self.viewport.as_mut()?;
        wtrace!(offset, now_ms, "apply_scroll_event");
        viewport.scroll_offset = offset;
        if self.options.snap_to_batch {
            self.snap
                .schedule_at(now_ms.saturating_add(self.options.snap_delay_ms));
        }
        self.notify();
        Some(self.frame())
    }

    /// Records a new viewport size. Returns `None` when no viewport is attached.
    pub fn apply_resize(&mut self, viewport_size: u32) -> Option<FrameState> {
        let viewport = self.viewport.as_mut()?;
        wtrace!(viewport_size, "apply_resize");
        if viewport.viewport_size != viewport_size {
            viewport.viewport_size = viewport_size;
            self.notify();
        }
        Some(self.frame())
    }

    /// Records the measured height of `index` and returns the applied delta.
    pub fn measure(&mut self, index: usize, height: u32) -> i64 {
        if index >= self.options.count {
            self.advise(ConfigWarning::IndexOutOfBounds {
                index,
                count: self.options.count,
            });
            return 0;
        }
        let delta = self.offsets.set_measured_height(index, height);
        if delta != 0 {
            self.notify();
        }
        delta
    }

    /// Like [`Self::measure`] for float layout values. Negative and NaN heights become `0`.
    pub fn measure_px(&mut self, index: usize, px: f64) -> i64 {
        let height = match clamp_px(px) {
            Some(height) => height,
            None => {
                if index < self.options.count {
                    self.advise(ConfigWarning::InvalidMeasuredHeight { index });
                }
                0
            }
        };
        self.measure(index, height)
    }

    /// Applies many measurements with a single notification. Returns the summed delta.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) -> i64 {
        let mut applied = 0i64;
        self.batch_update(|rw| {
            for (index, height) in measurements {
                applied += rw.measure(index, height);
            }
        });
        applied
    }

    /// Forgets every measured height.
    pub fn reset_measurements(&mut self) {
        self.offsets.reset_measurements();
        self.notify();
    }

    /// Timer poll for the reveal schedule.
    pub fn on_timer(&mut self, now_ms: u64) {
        self.reveal.on_timer(now_ms);
    }

    /// Paint opportunity. Returns whether a batch was revealed.
    pub fn on_frame(&mut self, now_ms: u64) -> bool {
        let advanced = self.reveal.on_frame(now_ms);
        if advanced {
            self.notify();
        }
        advanced
    }

    /// Fires the snap debounce once it is due, returning the offset to scroll to.
    ///
    /// `None` when nothing is due, snapping is off, or the offset is already aligned.
    pub fn poll_snap(&mut self, now_ms: u64) -> Option<u64> {
        self.snap.fire_timer(now_ms)?;
        if !self.options.snap_to_batch {
            return None;
        }
        let current = self.viewport?.scroll_offset;
        let target = self.target_for_snap(current);
        wtrace!(current, target, "poll_snap");
        (target != current).then_some(target)
    }

    /// Earliest timer deadline among the reveal and snap tasks.
    pub fn next_deadline(&self) -> Option<u64> {
        let reveal = match self.reveal.pending_task() {
            Some((_, Trigger::At(deadline))) => Some(deadline),
            _ => None,
        };
        let snap = match self.snap.pending() {
            Some((_, Trigger::At(deadline))) => Some(deadline),
            _ => None,
        };
        match (reveal, snap) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether the reveal schedule is waiting for a paint opportunity.
    pub fn wants_frame(&self) -> bool {
        matches!(self.reveal.pending_task(), Some((_, Trigger::NextFrame)))
    }

    // Queries

    pub fn offsets(&self) -> &OffsetIndex {
        &self.offsets
    }

    pub fn offset_of(&self, index: usize) -> u64 {
        self.offsets.offset_of(index)
    }

    pub fn height_of(&self, index: usize) -> Option<u32> {
        self.offsets.height_of(index)
    }

    pub fn total_height(&self) -> u64 {
        self.offsets.total_height()
    }

    pub fn index_near(&self, offset: u64) -> usize {
        self.offsets.index_near(offset)
    }

    pub fn max_scroll(&self) -> u64 {
        target::max_scroll(self.total_height(), self.current_viewport().viewport_size)
    }

    /// Rendered range (including overscan) for the current viewport.
    pub fn visible_range(&self) -> VirtualRange {
        self.visible_range_for(self.current_viewport())
    }

    pub fn visible_range_for(&self, viewport: ViewportState) -> VirtualRange {
        self.options
            .accelerator
            .visible_range(&self.offsets, viewport, self.options.overscan)
    }

    pub fn frame(&self) -> FrameState {
        self.frame_for(self.current_viewport())
    }

    fn frame_for(&self, viewport: ViewportState) -> FrameState {
        let total_height = self.total_height();
        FrameState {
            viewport,
            range: self.visible_range_for(viewport),
            total_height,
            max_scroll: target::max_scroll(total_height, viewport.viewport_size),
        }
    }

    /// Calls `f` for every item of the rendered range, in index order.
    pub fn for_each_item(&self, mut f: impl FnMut(WaveItem)) {
        let range = self.visible_range();
        for index in range.start_index..range.end_index {
            f(self.item(index));
        }
    }

    /// Clears `out` and fills it with the rendered items.
    pub fn collect_items(&self, out: &mut Vec<WaveItem>) {
        out.clear();
        self.for_each_item(|item| out.push(item));
    }

    fn item(&self, index: usize) -> WaveItem {
        WaveItem {
            index,
            start: self.offsets.offset_of(index),
            height: self.offsets.height_of(index).unwrap_or(0),
            revealed: self.reveal.is_revealed(index),
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.reveal.is_revealed(index)
    }

    pub fn revealed_count(&self) -> usize {
        self.reveal.revealed_count()
    }

    pub fn revealed_range(&self) -> VirtualRange {
        let range = self.reveal.revealed_range();
        VirtualRange::new(range.start, range.end)
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase()
    }

    pub fn reveal(&self) -> &RevealScheduler {
        &self.reveal
    }

    /// Whether the bottom of the attached viewport is within `end_reached_threshold` of the
    /// end of the content.
    pub fn is_end_reached(&self) -> bool {
        let Some(viewport) = self.viewport else {
            return false;
        };
        let threshold = self.options.end_reached_threshold as u64;
        viewport.end() >= self.total_height().saturating_sub(threshold)
    }

    // Targets

    /// Offset that brings `index` to the top of the viewport, clamped to the scroll range.
    pub fn target_for_index(&self, index: usize) -> u64 {
        if self.options.count > 0 && index >= self.options.count {
            self.advise(ConfigWarning::IndexOutOfBounds {
                index,
                count: self.options.count,
            });
        }
        target::target_for_index(&self.offsets, index, self.max_scroll())
    }

    pub fn target_for_offset(&self, offset: u64) -> u64 {
        target::target_for_offset(offset, self.max_scroll())
    }

    /// Nearest batch boundary to `current`.
    pub fn target_for_snap(&self, current: u64) -> u64 {
        self.options.accelerator.target_for_snap(
            current,
            self.options.default_item_height,
            self.options.batch_size,
            self.max_scroll(),
        )
    }

    pub fn target_for_key(&self, key: NavKey, current: u64) -> u64 {
        self.options.accelerator.target_for_key(
            key,
            current,
            self.current_viewport().viewport_size,
            self.options.default_item_height,
            self.max_scroll(),
        )
    }

    /// Like [`Self::target_for_key`] for raw key names; unknown keys keep `current`.
    pub fn target_for_key_name(&self, name: &str, current: u64) -> u64 {
        match NavKey::from_key_name(name) {
            Some(key) => self.target_for_key(key, current),
            None => current.min(self.max_scroll()),
        }
    }

    // Imperative handle

    /// Jumps to `index` and returns the new offset. `None` when detached.
    pub fn scroll_to_index(&mut self, index: usize) -> Option<u64> {
        self.viewport?;
        let offset = self.target_for_index(index);
        self.set_scroll_offset(offset);
        Some(offset)
    }

    /// Jumps to `offset` (clamped) and returns the applied offset. `None` when detached.
    pub fn scroll_to_offset(&mut self, offset: u64) -> Option<u64> {
        self.viewport?;
        let offset = self.target_for_offset(offset);
        self.set_scroll_offset(offset);
        Some(offset)
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        if let Some(viewport) = &mut self.viewport {
            if viewport.scroll_offset != offset {
                viewport.scroll_offset = offset;
                self.notify();
            }
        }
    }

    /// Revealed indexes of the rendered range. Empty when detached.
    pub fn visible_indexes(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_visible_indexes(&mut out);
        out
    }

    /// Clears `out` and fills it with the revealed indexes of the rendered range.
    pub fn collect_visible_indexes(&self, out: &mut Vec<usize>) {
        out.clear();
        let Some(viewport) = self.viewport else {
            return;
        };
        self.options.accelerator.visible_indexes(
            self.visible_range_for(viewport),
            self.revealed_range(),
            out,
        );
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_warnings(warnings: &[ConfigWarning]) {
    for warning in warnings {
        wwarn!(%warning, "sanitized options");
    }
}
