use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::engine::RenderWave;
use crate::{AcceleratedPath, ConfigWarning, RevealConfig, RevealStart};

/// A callback fired when the engine state changes.
pub type OnChangeCallback = Arc<dyn Fn(&RenderWave) + Send + Sync>;

/// A callback receiving advisories for clamped runtime inputs (e.g. out-of-range indexes).
pub type OnWarningCallback = Arc<dyn Fn(ConfigWarning) + Send + Sync>;

pub const DEFAULT_CONTAINER_SIZE: u32 = 400;
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 60;
pub const DEFAULT_OVERSCAN: usize = 5;
pub const DEFAULT_SNAP_DELAY_MS: u64 = 150;
pub const DEFAULT_END_REACHED_THRESHOLD: u32 = 10;

/// Configuration for [`RenderWave`].
///
/// Cheap to clone: callbacks and the accelerator handle live behind `Arc`s, so adapters can
/// tweak a field and call [`RenderWave::set_options`] without reallocating closures.
pub struct RenderWaveOptions {
    pub count: usize,
    /// Height used for every item until it is measured.
    pub default_item_height: u32,
    /// Nominal viewport size, used until the host attaches a real one.
    pub container_size: u32,

    /// Items revealed per tick.
    pub batch_size: usize,
    pub reveal_interval_ms: u64,
    /// First index of the reveal schedule; earlier items are never revealed.
    pub start_index: usize,
    pub reveal_start: RevealStart,

    pub overscan: usize,

    /// Align the scroll offset to a batch boundary once scrolling settles.
    pub snap_to_batch: bool,
    /// Quiet period before a snap is evaluated.
    pub snap_delay_ms: u64,

    pub keyboard_navigation: bool,

    /// Distance from the end at which [`RenderWave::is_end_reached`] turns true.
    pub end_reached_threshold: u32,

    pub accelerator: AcceleratedPath,

    pub on_change: Option<OnChangeCallback>,
    pub on_warning: Option<OnWarningCallback>,
}

impl Clone for RenderWaveOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            default_item_height: self.default_item_height,
            container_size: self.container_size,
            batch_size: self.batch_size,
            reveal_interval_ms: self.reveal_interval_ms,
            start_index: self.start_index,
            reveal_start: self.reveal_start,
            overscan: self.overscan,
            snap_to_batch: self.snap_to_batch,
            snap_delay_ms: self.snap_delay_ms,
            keyboard_navigation: self.keyboard_navigation,
            end_reached_threshold: self.end_reached_threshold,
            accelerator: self.accelerator.clone(),
            on_change: self.on_change.clone(),
            on_warning: self.on_warning.clone(),
        }
    }
}

impl RenderWaveOptions {
    /// Creates options for `count` items that are `item_height` pixels tall until measured.
    pub fn new(count: usize, item_height: u32) -> Self {
        Self {
            count,
            default_item_height: item_height,
            container_size: DEFAULT_CONTAINER_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            reveal_interval_ms: DEFAULT_REVEAL_INTERVAL_MS,
            start_index: 0,
            reveal_start: RevealStart::default(),
            overscan: DEFAULT_OVERSCAN,
            snap_to_batch: false,
            snap_delay_ms: DEFAULT_SNAP_DELAY_MS,
            keyboard_navigation: false,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            accelerator: AcceleratedPath::reference(),
            on_change: None,
            on_warning: None,
        }
    }

    pub fn with_container_size(mut self, container_size: u32) -> Self {
        self.container_size = container_size;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_reveal_interval_ms(mut self, interval_ms: u64) -> Self {
        self.reveal_interval_ms = interval_ms;
        self
    }

    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_reveal_start(mut self, reveal_start: RevealStart) -> Self {
        self.reveal_start = reveal_start;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_snap_to_batch(mut self, snap_to_batch: bool) -> Self {
        self.snap_to_batch = snap_to_batch;
        self
    }

    pub fn with_snap_delay_ms(mut self, delay_ms: u64) -> Self {
        self.snap_delay_ms = delay_ms;
        self
    }

    pub fn with_keyboard_navigation(mut self, enabled: bool) -> Self {
        self.keyboard_navigation = enabled;
        self
    }

    pub fn with_end_reached_threshold(mut self, threshold: u32) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    pub fn with_accelerator(mut self, accelerator: AcceleratedPath) -> Self {
        self.accelerator = accelerator;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&RenderWave) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_warning(
        mut self,
        on_warning: Option<impl Fn(ConfigWarning) + Send + Sync + 'static>,
    ) -> Self {
        self.on_warning = on_warning.map(|f| Arc::new(f) as _);
        self
    }

    /// Clamps invalid fields to the nearest valid value and returns what was changed.
    ///
    /// An empty item set is reported but left as is.
    pub fn sanitize(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.default_item_height == 0 {
            self.default_item_height = 1;
            warnings.push(ConfigWarning::NonPositiveItemHeight);
        }
        if self.container_size == 0 {
            self.container_size = 1;
            warnings.push(ConfigWarning::NonPositiveContainerSize);
        }
        if self.batch_size == 0 {
            self.batch_size = 1;
            warnings.push(ConfigWarning::ZeroBatchSize);
        }
        if self.count == 0 {
            warnings.push(ConfigWarning::EmptyItemSet);
        }
        if self.start_index > self.count {
            warnings.push(ConfigWarning::StartIndexOutOfBounds {
                start_index: self.start_index,
                count: self.count,
            });
            self.start_index = self.count;
        }
        warnings
    }

    pub(crate) fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            count: self.count,
            batch_size: self.batch_size,
            interval_ms: self.reveal_interval_ms,
            start_index: self.start_index,
            start: self.reveal_start,
        }
    }
}

impl core::fmt::Debug for RenderWaveOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderWaveOptions")
            .field("count", &self.count)
            .field("default_item_height", &self.default_item_height)
            .field("container_size", &self.container_size)
            .field("batch_size", &self.batch_size)
            .field("reveal_interval_ms", &self.reveal_interval_ms)
            .field("start_index", &self.start_index)
            .field("reveal_start", &self.reveal_start)
            .field("overscan", &self.overscan)
            .field("snap_to_batch", &self.snap_to_batch)
            .field("snap_delay_ms", &self.snap_delay_ms)
            .field("keyboard_navigation", &self.keyboard_navigation)
            .field("end_reached_threshold", &self.end_reached_threshold)
            .field("accelerator", &self.accelerator)
            .finish_non_exhaustive()
    }
}
