//! Adapter utilities for the `renderwave` crate.
//!
//! The `renderwave` crate is UI-agnostic and focuses on the core math and state. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A [`Controller`] that wires host events (scroll, resize, keys, frame ticks) to the engine
//! - Tween-based smooth scrolling with a distance-based duration
//! - The imperative [`ScrollHandle`] surface
//! - Native or custom scroll [`Container`]s
//!
//! This crate is intentionally framework-agnostic (no DOM or widget toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("renderwave-adapter requires either the `std` or the `libm` feature");

extern crate alloc;

#[cfg(test)]
extern crate std;

mod container;
mod controller;
mod handle;
mod tween;


pub use container::{Container, ContainerFactory, ContainerSlot, ContainerSpec, WrapperProps};
pub use controller::{Controller, OnEndReachedCallback, ScrollBehavior, TickOutcome};
pub use handle::ScrollHandle;
pub use tween::{
    Easing, MAX_SCROLL_DURATION_MS, MIN_SCROLL_DURATION_MS, Tween, scroll_duration_ms,
};
