//! A headless windowing and progressive reveal engine for very large lists.
//!
//! For adapter-level utilities (host event wiring, smooth scrolling, containers), see the
//! `renderwave-adapter` crate.
//!
//! The crate covers the computations needed to render only the visible slice of a long list
//! on every scroll frame: prefix sums over item heights, `O(log n)` offset to index lookup,
//! overscanned visible ranges, a batched reveal schedule for newly mounted items, and scroll
//! targets for programmatic scrolling, batch snapping, and keyboard navigation.
//!
//! It is UI-agnostic. The host is expected to provide:
//! - the viewport size and scroll offset
//! - measured item heights (optional; a default height is used until then)
//! - timer polls and paint opportunities, with a millisecond clock
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod accel;
mod engine;
mod error;
mod fenwick;
mod offsets;
mod options;
mod range;
mod reveal;
mod state;
pub mod target;
mod task;
mod types;

#[cfg(test)]
mod tests;

pub use accel::{AccelStatus, AcceleratedPath, Accelerator, NativeAccelerator};
pub use engine::RenderWave;
pub use error::{AccelError, ConfigWarning};
pub use offsets::OffsetIndex;
pub use options::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONTAINER_SIZE, DEFAULT_END_REACHED_THRESHOLD, DEFAULT_OVERSCAN,
    DEFAULT_REVEAL_INTERVAL_MS, DEFAULT_SNAP_DELAY_MS, OnChangeCallback, OnWarningCallback,
    RenderWaveOptions,
};
pub use range::{revealed_in_range, visible_range, visible_range_uniform};
pub use reveal::{RevealConfig, RevealPhase, RevealScheduler, RevealStart};
pub use state::{FrameState, ViewportState};
pub use target::NavKey;
pub use task::{TaskId, TaskSlot, Trigger};
pub use types::{VirtualRange, WaveItem};
