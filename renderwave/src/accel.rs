//! Optional accelerated implementations of the hot numeric routines.
//!
//! An [`Accelerator`] is a drop-in replacement for the reference functions in
//! [`crate::visible_range`] and [`crate::target`]: for every valid input it must return exactly
//! what the reference returns. [`AcceleratedPath`] owns the load state and guarantees that
//! callers never observe a backend failure; a failing call is answered by the reference
//! implementation and disables the backend for good.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::target::{self, NavKey};
use crate::{AccelError, OffsetIndex, ViewportState, VirtualRange, range};

/// Numeric-only hot paths that can be swapped in for the reference implementation.
pub trait Accelerator: Send + Sync {
    /// Prepares the backend. Called at most once per [`AcceleratedPath`].
    fn load(&self) -> Result<(), AccelError>;

    /// Visible range of a list where every item is `item_height` tall.
    fn visible_range(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        item_height: u32,
        count: usize,
        overscan: usize,
    ) -> Result<VirtualRange, AccelError>;

    /// Indexes of `range` inside `revealed`, ascending, appended to `out`.
    fn visible_indexes(
        &self,
        range: VirtualRange,
        revealed: VirtualRange,
        out: &mut Vec<usize>,
    ) -> Result<(), AccelError>;

    fn target_for_snap(
        &self,
        current: u64,
        item_height: u32,
        batch_size: usize,
        max_scroll: u64,
    ) -> Result<u64, AccelError>;

    fn target_for_key(
        &self,
        key: NavKey,
        current: u64,
        viewport_size: u32,
        item_height: u32,
        max_scroll: u64,
    ) -> Result<u64, AccelError>;
}

/// Closed-form `O(1)` arithmetic for uniform item heights.
///
/// `load` cross-checks a fixed set of probes against the reference implementation and
/// refuses to load on any disagreement.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeAccelerator;

impl NativeAccelerator {
    fn self_check(&self) -> Result<(), AccelError> {
        const HEIGHT: u32 = 7;
        const COUNT: usize = 64;
        let offsets = OffsetIndex::new(COUNT, HEIGHT);
        let max = target::max_scroll(offsets.total_height(), 50);
        for scroll in [0u64, 1, 6, 7, 8, 100, 447, 448, 1_000] {
            for (viewport, overscan) in [(0u32, 0usize), (50, 0), (50, 3), (1, 70)] {
                let expected = range::visible_range(
                    &offsets,
                    ViewportState::new(scroll, viewport),
                    overscan,
                );
                let got = self.visible_range(scroll, viewport, HEIGHT, COUNT, overscan)?;
                if got != expected {
                    return Err(AccelError::SelfCheck);
                }
            }
            for key in NavKey::ALL {
                let expected = target::target_for_key(key, scroll, 50, HEIGHT, max);
                if self.target_for_key(key, scroll, 50, HEIGHT, max)? != expected {
                    return Err(AccelError::SelfCheck);
                }
            }
            let expected = target::target_for_snap(scroll, HEIGHT, 4, max);
            if self.target_for_snap(scroll, HEIGHT, 4, max)? != expected {
                return Err(AccelError::SelfCheck);
            }
        }
        Ok(())
    }
}

impl Accelerator for NativeAccelerator {
    fn load(&self) -> Result<(), AccelError> {
        self.self_check()
    }

    fn visible_range(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        item_height: u32,
        count: usize,
        overscan: usize,
    ) -> Result<VirtualRange, AccelError> {
        Ok(range::visible_range_uniform(
            scroll_offset,
            viewport_size,
            item_height,
            count,
            overscan,
        ))
    }

    fn visible_indexes(
        &self,
        range: VirtualRange,
        revealed: VirtualRange,
        out: &mut Vec<usize>,
    ) -> Result<(), AccelError> {
        let both = range.intersect(revealed);
        out.extend(both.start_index..both.end_index);
        Ok(())
    }

    fn target_for_snap(
        &self,
        current: u64,
        item_height: u32,
        batch_size: usize,
        max_scroll: u64,
    ) -> Result<u64, AccelError> {
        let batch_px = item_height.max(1) as u128 * batch_size.max(1) as u128;
        let current = current.min(max_scroll) as u128;
        let rem = current % batch_px;
        let down = current - rem;
        let snapped = if rem * 2 >= batch_px {
            down + batch_px
        } else {
            down
        };
        Ok(snapped.min(max_scroll as u128) as u64)
    }

    fn target_for_key(
        &self,
        key: NavKey,
        current: u64,
        viewport_size: u32,
        item_height: u32,
        max_scroll: u64,
    ) -> Result<u64, AccelError> {
        let delta = match key {
            NavKey::Home => return Ok(0),
            NavKey::End => return Ok(max_scroll),
            NavKey::LineDown => item_height as i128,
            NavKey::LineUp => -(item_height as i128),
            NavKey::PageDown => viewport_size as i128,
            NavKey::PageUp => -(viewport_size as i128),
        };
        Ok((current as i128 + delta).clamp(0, max_scroll as i128) as u64)
    }
}

/// Load state of an [`AcceleratedPath`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccelStatus {
    Unloaded,
    Loading,
    Available,
    /// Load failed or a call failed; the reference path is used from now on.
    Failed,
}

const UNLOADED: u8 = 0;
const LOADING: u8 = 1;
const AVAILABLE: u8 = 2;
const FAILED: u8 = 3;

/// An injectable, shareable handle to an optional [`Accelerator`].
///
/// Clones share one load state, so a host can call [`Self::load`] from a background thread
/// while the engine keeps answering from the reference path until the load completes. The
/// state moves `Unloaded -> Loading -> Available | Failed` and `Available -> Failed` on the
/// first runtime error; it never moves back.
#[derive(Clone)]
pub struct AcceleratedPath {
    backend: Option<Arc<dyn Accelerator>>,
    state: Arc<AtomicU8>,
}

impl AcceleratedPath {
    /// A path without a backend: every call uses the reference implementation.
    pub fn reference() -> Self {
        Self {
            backend: None,
            state: Arc::new(AtomicU8::new(UNLOADED)),
        }
    }

    pub fn new(backend: Arc<dyn Accelerator>) -> Self {
        Self {
            backend: Some(backend),
            state: Arc::new(AtomicU8::new(UNLOADED)),
        }
    }

    pub fn native() -> Self {
        Self::new(Arc::new(NativeAccelerator))
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn status(&self) -> AccelStatus {
        match self.state.load(Ordering::Acquire) {
            UNLOADED => AccelStatus::Unloaded,
            LOADING => AccelStatus::Loading,
            AVAILABLE => AccelStatus::Available,
            _ => AccelStatus::Failed,
        }
    }

    pub fn is_available(&self) -> bool {
        self.state.load(Ordering::Acquire) == AVAILABLE
    }

    /// Attempts to load the backend once. Returns whether it is available.
    ///
    /// Later calls return the cached outcome; a call racing an in-flight load returns `false`.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn load(&self) -> bool {
        let Some(backend) = &self.backend else {
            return false;
        };
        if self
            .state
            .compare_exchange(UNLOADED, LOADING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return self.is_available();
        }
        match backend.load() {
            Ok(()) => {
                self.state.store(AVAILABLE, Ordering::Release);
                wdebug!("accelerator loaded");
                true
            }
            Err(err) => {
                self.state.store(FAILED, Ordering::Release);
                wwarn!(%err, "accelerator load failed; using reference path");
                false
            }
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn run<T>(
        &self,
        op: &'static str,
        accelerated: impl FnOnce(&dyn Accelerator) -> Result<T, AccelError>,
        reference: impl FnOnce() -> T,
    ) -> T {
        let backend = match &self.backend {
            Some(backend) if self.is_available() => backend,
            _ => return reference(),
        };
        match accelerated(backend.as_ref()) {
            Ok(v) => v,
            Err(err) => {
                if self.state.swap(FAILED, Ordering::AcqRel) == AVAILABLE {
                    wwarn!(op, %err, "accelerator call failed; disabling accelerated path");
                }
                reference()
            }
        }
    }

    /// Visible range; the backend is only consulted when all heights are uniform.
    pub fn visible_range(
        &self,
        offsets: &OffsetIndex,
        viewport: ViewportState,
        overscan: usize,
    ) -> VirtualRange {
        if !offsets.is_uniform() {
            return range::visible_range(offsets, viewport, overscan);
        }
        self.run(
            "visible_range",
            |b| {
                b.visible_range(
                    viewport.scroll_offset,
                    viewport.viewport_size,
                    offsets.default_height(),
                    offsets.len(),
                    overscan,
                )
            },
            || range::visible_range(offsets, viewport, overscan),
        )
    }

    /// Clears `out`, then fills it with the revealed indexes of `range`.
    pub fn visible_indexes(
        &self,
        range: VirtualRange,
        revealed: VirtualRange,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        let ok = self.run(
            "visible_indexes",
            |b| b.visible_indexes(range, revealed, &mut *out).map(|()| true),
            || false,
        );
        if !ok {
            range::revealed_in_range(range, revealed, out);
        }
    }

    pub fn target_for_snap(
        &self,
        current: u64,
        item_height: u32,
        batch_size: usize,
        max_scroll: u64,
    ) -> u64 {
        self.run(
            "target_for_snap",
            |b| b.target_for_snap(current, item_height, batch_size, max_scroll),
            || target::target_for_snap(current, item_height, batch_size, max_scroll),
        )
    }

    pub fn target_for_key(
        &self,
        key: NavKey,
        current: u64,
        viewport_size: u32,
        item_height: u32,
        max_scroll: u64,
    ) -> u64 {
        self.run(
            "target_for_key",
            |b| b.target_for_key(key, current, viewport_size, item_height, max_scroll),
            || target::target_for_key(key, current, viewport_size, item_height, max_scroll),
        )
    }
}

impl Default for AcceleratedPath {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Debug for AcceleratedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceleratedPath")
            .field("has_backend", &self.has_backend())
            .field("status", &self.status())
            .finish()
    }
}
