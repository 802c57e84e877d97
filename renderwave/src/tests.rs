use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_key(&mut self) -> NavKey {
        NavKey::ALL[self.gen_range_usize(0, NavKey::ALL.len())]
    }
}

fn expected_offset(heights: &[u32], index: usize) -> u64 {
    heights[..index].iter().map(|&h| h as u64).sum()
}

/// Largest `k` with `offset(k) <= offset`, by linear scan.
fn expected_lower_bound(heights: &[u32], offset: u64) -> usize {
    let mut sum = 0u64;
    let mut k = 0;
    for &h in heights {
        sum += h as u64;
        if sum > offset {
            break;
        }
        k += 1;
    }
    k
}

fn measured_index(heights: &[u32], default_height: u32) -> OffsetIndex {
    let mut offsets = OffsetIndex::new(heights.len(), default_height);
    for (i, &h) in heights.iter().enumerate() {
        offsets.set_measured_height(i, h);
    }
    offsets
}

fn drive_reveal(s: &mut RevealScheduler, mut now: u64) -> u64 {
    for _ in 0..100_000 {
        match s.pending_task() {
            Some((_, Trigger::At(deadline))) => {
                now = now.max(deadline);
                s.on_timer(now);
            }
            Some((_, Trigger::NextFrame)) => {
                s.on_frame(now);
            }
            None => return now,
        }
    }
    panic!("reveal schedule did not settle");
}

fn drive_engine(rw: &mut RenderWave, mut now: u64) -> u64 {
    for _ in 0..100_000 {
        if rw.wants_frame() {
            rw.on_frame(now);
        } else if let Some(deadline) = rw.next_deadline() {
            now = now.max(deadline);
            rw.on_timer(now);
        } else {
            return now;
        }
    }
    panic!("engine did not settle");
}

fn scenario_engine() -> RenderWave {
    let mut rw = RenderWave::new(RenderWaveOptions::new(1_000, 40));
    rw.attach(400);
    rw
}

// Offset index

#[test]
fn fixed_heights_match_closed_form() {
    let mut rng = Lcg::new(1);
    for _ in 0..200 {
        let n = rng.gen_range_usize(0, 300);
        let h = rng.gen_range_u32(1, 100);
        let offsets = OffsetIndex::new(n, h);
        for i in 0..=n {
            assert_eq!(offsets.offset_of(i), i as u64 * h as u64);
        }
        assert_eq!(offsets.total_height(), n as u64 * h as u64);
        assert!(offsets.is_uniform());
    }
}

#[test]
fn empty_index_is_well_defined() {
    let offsets = OffsetIndex::new(0, 40);
    assert_eq!(offsets.total_height(), 0);
    assert_eq!(offsets.offset_of(0), 0);
    assert_eq!(offsets.offset_of(10), 0);
    assert_eq!(offsets.index_near(0), 0);
    assert_eq!(offsets.index_near(1_000), 0);
    assert_eq!(offsets.lower_bound(1_000), 0);
    assert_eq!(offsets.height_of(0), None);
}

#[test]
fn measured_offsets_are_monotonic_and_round_trip() {
    let mut rng = Lcg::new(2);
    for _ in 0..100 {
        let n = rng.gen_range_usize(1, 400);
        let heights: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(1, 200)).collect();
        let offsets = measured_index(&heights, 40);

        let mut prev = 0;
        for i in 0..=n {
            let off = offsets.offset_of(i);
            assert!(off >= prev);
            assert_eq!(off, expected_offset(&heights, i));
            prev = off;
        }
        for i in 0..n {
            assert_eq!(offsets.index_near(offsets.offset_of(i)), i);
        }
        assert_eq!(offsets.index_near(offsets.total_height()), n - 1);
        assert_eq!(offsets.index_near(u64::MAX), n - 1);
    }
}

#[test]
fn lower_bound_matches_linear_scan() {
    let mut rng = Lcg::new(3);
    for _ in 0..300 {
        let n = rng.gen_range_usize(0, 200);
        // Zero heights included: several items can share one boundary.
        let heights: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(0, 50)).collect();
        let offsets = measured_index(&heights, 25);
        let total = offsets.total_height();
        for _ in 0..20 {
            let offset = rng.gen_range_u64(0, total + 100);
            assert_eq!(
                offsets.lower_bound(offset),
                expected_lower_bound(&heights, offset)
            );
        }
    }
}

#[test]
fn index_near_picks_lower_neighbour_between_boundaries() {
    let offsets = measured_index(&[10, 20, 30], 10);
    assert_eq!(offsets.index_near(0), 0);
    assert_eq!(offsets.index_near(9), 0);
    assert_eq!(offsets.index_near(10), 1);
    assert_eq!(offsets.index_near(29), 1);
    assert_eq!(offsets.index_near(30), 2);
    assert_eq!(offsets.index_near(59), 2);
    assert_eq!(offsets.index_near(60), 2);
}

#[test]
fn measuring_returns_delta_and_skips_unchanged_heights() {
    let mut offsets = OffsetIndex::new(10, 40);
    assert_eq!(offsets.set_measured_height(3, 100), 60);
    assert_eq!(offsets.total_height(), 460);
    assert_eq!(offsets.offset_of(4), 220);
    assert!(offsets.is_measured(3));
    assert!(!offsets.is_uniform());

    assert_eq!(offsets.set_measured_height(3, 100), 0);
    assert_eq!(offsets.set_measured_height(3, 40), -60);
    assert!(offsets.is_uniform());
    assert!(offsets.is_measured(3));

    assert_eq!(offsets.set_measured_height(10, 5), 0);
    assert_eq!(offsets.total_height(), 400);
}

#[test]
fn float_heights_are_clamped_at_the_boundary() {
    let mut offsets = OffsetIndex::new(4, 40);
    assert_eq!(offsets.set_measured_height_px(0, 40.4), 0);
    assert_eq!(offsets.set_measured_height_px(1, 40.5), 1);
    assert_eq!(offsets.set_measured_height_px(2, -3.0), -40);
    assert_eq!(offsets.set_measured_height_px(3, f64::NAN), -40);
    assert_eq!(offsets.height_of(2), Some(0));
    assert_eq!(offsets.height_of(3), Some(0));
    assert_eq!(offsets.total_height(), 81);
}

#[test]
fn default_height_change_keeps_measurements() {
    let mut offsets = OffsetIndex::new(5, 40);
    offsets.set_measured_height(1, 100);
    offsets.set_default_height(50);
    assert_eq!(offsets.height_of(0), Some(50));
    assert_eq!(offsets.height_of(1), Some(100));
    assert_eq!(offsets.total_height(), 300);

    offsets.reset_measurements();
    assert_eq!(offsets.total_height(), 250);
    assert!(offsets.is_uniform());
    assert!(!offsets.is_measured(1));
}

#[test]
fn measure_many_sums_deltas() {
    let mut offsets = OffsetIndex::new(5, 10);
    let delta = offsets.measure_many([(0, 20), (1, 5), (9, 100), (0, 20)]);
    assert_eq!(delta, 5);
    assert_eq!(offsets.total_height(), 55);
}

// Visible range

#[test]
fn scenario_top_of_list_range() {
    let offsets = OffsetIndex::new(1_000, 40);
    let range = visible_range(&offsets, ViewportState::new(0, 400), 5);
    assert_eq!(range, VirtualRange::new(0, 15));
}

#[test]
fn range_in_the_middle_and_past_the_end() {
    let offsets = OffsetIndex::new(1_000, 40);
    let range = visible_range(&offsets, ViewportState::new(4_000, 400), 5);
    assert_eq!(range, VirtualRange::new(95, 115));

    let range = visible_range(&offsets, ViewportState::new(1_000_000, 400), 5);
    assert_eq!(range, VirtualRange::new(995, 1_000));

    let range = visible_range(&OffsetIndex::new(0, 40), ViewportState::new(0, 400), 5);
    assert!(range.is_empty());
}

#[test]
fn zero_viewport_without_overscan_is_empty() {
    let offsets = OffsetIndex::new(100, 10);
    let range = visible_range(&offsets, ViewportState::new(55, 0), 0);
    assert!(range.is_empty());
}

#[test]
fn range_is_always_within_bounds() {
    let mut rng = Lcg::new(4);
    for _ in 0..2_000 {
        let n = rng.gen_range_usize(0, 300);
        let heights: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(0, 80)).collect();
        let offsets = measured_index(&heights, 30);
        let scroll = rng.gen_range_u64(0, offsets.total_height() + 500);
        let viewport = rng.gen_range_u32(0, 1_000);
        let overscan = rng.gen_range_usize(0, 20);
        let range = visible_range(&offsets, ViewportState::new(scroll, viewport), overscan);
        assert!(range.start_index <= range.end_index);
        assert!(range.end_index <= n);
    }
}

#[test]
fn range_width_is_stable_under_small_scroll_deltas() {
    let mut rng = Lcg::new(5);
    for _ in 0..1_000 {
        let n = rng.gen_range_usize(1, 300);
        let heights: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(10, 80)).collect();
        let offsets = measured_index(&heights, 30);
        let scroll = rng.gen_range_u64(0, offsets.total_height() + 100);
        let delta = rng.gen_range_u64(0, 10);
        let viewport = rng.gen_range_u32(0, 600);
        let overscan = rng.gen_range_usize(1, 10);

        let a = visible_range(&offsets, ViewportState::new(scroll, viewport), overscan);
        let b = visible_range(&offsets, ViewportState::new(scroll + delta, viewport), overscan);
        let diff = (a.len() as i64 - b.len() as i64).unsigned_abs() as usize;
        assert!(diff <= 2 * overscan, "{a:?} vs {b:?}");
    }
}

#[test]
fn uniform_closed_form_matches_reference() {
    let mut rng = Lcg::new(6);
    for _ in 0..2_000 {
        let n = rng.gen_range_usize(0, 300);
        let h = rng.gen_range_u32(0, 60);
        let offsets = OffsetIndex::new(n, h);
        let scroll = rng.gen_range_u64(0, offsets.total_height() + 300);
        let viewport = rng.gen_range_u32(0, 800);
        let overscan = rng.gen_range_usize(0, 12);
        assert_eq!(
            visible_range_uniform(scroll, viewport, h, n, overscan),
            visible_range(&offsets, ViewportState::new(scroll, viewport), overscan)
        );
    }
}

#[test]
fn revealed_in_range_filters_and_clears() {
    let mut out = alloc::vec![99, 98];
    revealed_in_range(VirtualRange::new(5, 15), VirtualRange::new(0, 8), &mut out);
    assert_eq!(out, [5, 6, 7]);
    revealed_in_range(VirtualRange::new(5, 15), VirtualRange::new(20, 30), &mut out);
    assert!(out.is_empty());
}

// Tasks

#[test]
fn task_cancel_is_one_shot() {
    let mut slot = TaskSlot::new();
    assert!(!slot.cancel());
    let first = slot.schedule_at(10);
    assert!(slot.is_pending());
    assert!(slot.cancel());
    assert!(!slot.cancel());
    assert!(!slot.cancel_task(first));

    let stale = slot.schedule_at(10);
    let current = slot.schedule_next_frame();
    assert_ne!(stale, current);
    assert!(!slot.cancel_task(stale));
    assert!(slot.cancel_task(current));
    assert!(!slot.cancel_task(current));
}

#[test]
fn task_fires_only_when_due() {
    let mut slot = TaskSlot::new();
    let id = slot.schedule_at(100);
    assert_eq!(slot.fire_timer(99), None);
    assert_eq!(slot.fire_frame(99), None);
    assert_eq!(slot.fire_frame(100), Some(id));
    assert!(!slot.is_pending());

    let id = slot.schedule_next_frame();
    assert_eq!(slot.fire_timer(1_000), None);
    assert_eq!(slot.fire_frame(0), Some(id));
    assert_eq!(slot.fire_frame(0), None);
}

// Reveal

fn reveal_config(count: usize, batch_size: usize, start_index: usize) -> RevealConfig {
    RevealConfig {
        count,
        batch_size,
        interval_ms: 60,
        start_index,
        start: RevealStart::Empty,
    }
}

#[test]
fn scenario_fifty_ticks_reveal_a_thousand_items() {
    let mut s = RevealScheduler::new(reveal_config(1_000, 20, 0));
    assert_eq!(s.phase(), RevealPhase::Idle);
    s.start(0);
    assert_eq!(s.revealed_count(), 0);
    assert_eq!(s.phase(), RevealPhase::Advancing);

    let end = drive_reveal(&mut s, 0);
    assert_eq!(s.revealed_count(), 1_000);
    assert_eq!(s.ticks(), 50);
    assert_eq!(s.phase(), RevealPhase::Complete);
    assert_eq!(end, 50 * 60);
    assert_eq!(s.pending_task(), None);
}

#[test]
fn reveal_tick_count_is_ceil_of_remaining_over_batch() {
    let mut rng = Lcg::new(7);
    for _ in 0..300 {
        let count = rng.gen_range_usize(0, 500);
        let batch = rng.gen_range_usize(1, 40);
        let start = rng.gen_range_usize(0, count + 1);
        let mut s = RevealScheduler::new(reveal_config(count, batch, start));
        s.start(0);

        let mut prev = s.revealed_count();
        let mut now = 0;
        while let Some((_, trigger)) = s.pending_task() {
            match trigger {
                Trigger::At(deadline) => {
                    now = deadline;
                    s.on_timer(now);
                }
                Trigger::NextFrame => {
                    s.on_frame(now);
                    assert!(s.revealed_count() >= prev);
                    prev = s.revealed_count();
                }
            }
        }
        assert_eq!(s.revealed_count(), count);
        assert_eq!(s.ticks(), (count - start).div_ceil(batch));
        assert_eq!(s.revealed_range(), start..count);
        assert_eq!(s.phase(), RevealPhase::Complete);
    }
}

#[test]
fn tick_waits_for_timer_then_frame() {
    let mut s = RevealScheduler::new(reveal_config(100, 10, 0));
    s.start(1_000);
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::At(1_060)));

    s.on_timer(1_059);
    assert!(!s.on_frame(1_059));
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::At(1_060)));
    s.on_timer(1_060);
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::NextFrame));
    assert_eq!(s.revealed_count(), 0);

    assert!(s.on_frame(1_075));
    assert_eq!(s.revealed_count(), 10);
    assert!(s.is_revealed(9));
    assert!(!s.is_revealed(10));
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::At(1_135)));
}

#[test]
fn late_frame_stands_in_for_the_timer() {
    let mut s = RevealScheduler::new(reveal_config(100, 10, 0));
    s.start(0);
    assert!(!s.on_frame(59));
    assert!(!s.on_frame(64));
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::NextFrame));
    assert_eq!(s.revealed_count(), 0);
    assert!(s.on_frame(80));
    assert_eq!(s.revealed_count(), 10);
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::At(140)));
}

#[test]
fn start_index_is_never_revealed_before() {
    let mut s = RevealScheduler::new(reveal_config(50, 10, 20));
    s.start(0);
    drive_reveal(&mut s, 0);
    assert_eq!(s.ticks(), 3);
    assert!(!s.is_revealed(19));
    assert!(s.is_revealed(20));
    assert!(s.is_revealed(49));
}

#[test]
fn first_batch_start_reveals_immediately() {
    let mut config = reveal_config(100, 30, 0);
    config.start = RevealStart::FirstBatch;
    let mut s = RevealScheduler::new(config);
    s.start(0);
    assert_eq!(s.revealed_count(), 30);
    drive_reveal(&mut s, 0);
    assert_eq!(s.ticks(), 3);
    assert_eq!(s.revealed_count(), 100);
}

#[test]
fn nothing_to_reveal_completes_on_start() {
    let mut s = RevealScheduler::new(reveal_config(0, 20, 0));
    s.start(0);
    assert_eq!(s.phase(), RevealPhase::Complete);
    assert_eq!(s.pending_task(), None);
}

#[test]
fn identity_change_restarts_from_start_index() {
    let mut s = RevealScheduler::new(reveal_config(100, 10, 0));
    s.start(0);
    for now in [60, 120] {
        s.on_timer(now);
        s.on_frame(now);
    }
    assert_eq!(s.revealed_count(), 20);

    assert!(!s.reconfigure(reveal_config(100, 10, 0), 130));
    assert_eq!(s.revealed_count(), 20);

    assert!(s.reconfigure(reveal_config(100, 25, 5), 130));
    assert_eq!(s.revealed_count(), 5);
    assert_eq!(s.ticks(), 0);
    assert_eq!(s.phase(), RevealPhase::Advancing);
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::At(190)));

    let mut interval = reveal_config(100, 25, 5);
    interval.interval_ms = 10;
    assert!(s.reconfigure(interval, 150));
    assert_eq!(s.pending_task().map(|(_, t)| t), Some(Trigger::At(160)));
}

#[test]
fn stop_cancels_every_pending_task_and_is_repeatable() {
    let mut s = RevealScheduler::new(reveal_config(100, 10, 0));
    s.start(0);
    assert!(s.stop());
    assert!(!s.stop());
    assert_eq!(s.phase(), RevealPhase::Idle);
    assert_eq!(s.pending_task(), None);

    s.start(0);
    s.on_timer(60);
    assert!(s.stop());
    assert!(!s.on_frame(60));
    assert_eq!(s.revealed_count(), 0);
}

#[test]
fn reconfigure_while_stopped_stays_stopped() {
    let mut s = RevealScheduler::new(reveal_config(100, 10, 0));
    assert!(s.reconfigure(reveal_config(200, 10, 0), 0));
    assert_eq!(s.phase(), RevealPhase::Idle);
    assert_eq!(s.pending_task(), None);
}

// Targets

#[test]
fn scenario_snap_and_end_key() {
    let offsets = OffsetIndex::new(1_000, 40);
    let max = target::max_scroll(offsets.total_height(), 400);
    assert_eq!(max, 39_600);
    assert_eq!(target::target_for_snap(900, 40, 20, max), 800);
    assert_eq!(target::target_for_snap(1_200, 40, 20, max), 1_600);
    assert_eq!(target::target_for_snap(1_199, 40, 20, max), 800);
    assert_eq!(target::target_for_key(NavKey::End, 0, 400, 40, max), 39_600);
    assert_eq!(target::target_for_key(NavKey::Home, 5_000, 400, 40, max), 0);
    assert_eq!(target::target_for_key(NavKey::PageDown, 0, 400, 40, max), 400);
    assert_eq!(target::target_for_key(NavKey::LineUp, 10, 400, 40, max), 0);
}

#[test]
fn target_for_index_clamps_index_and_offset() {
    let offsets = OffsetIndex::new(1_000, 40);
    let max = target::max_scroll(offsets.total_height(), 400);
    assert_eq!(target::target_for_index(&offsets, 10, max), 400);
    assert_eq!(target::target_for_index(&offsets, 999, max), 39_600);
    assert_eq!(target::target_for_index(&offsets, 5_000, max), 39_600);
    assert_eq!(target::target_for_index(&OffsetIndex::new(0, 40), 3, 0), 0);
    assert_eq!(target::target_for_offset(50_000, max), 39_600);
}

#[test]
fn snap_is_idempotent() {
    let mut rng = Lcg::new(8);
    for _ in 0..5_000 {
        let h = rng.gen_range_u32(0, 100);
        let batch = rng.gen_range_usize(0, 50);
        let max = rng.gen_range_u64(0, 200_000);
        let current = rng.gen_range_u64(0, max + 10_000);
        let once = target::target_for_snap(current, h, batch, max);
        assert!(once <= max);
        assert_eq!(target::target_for_snap(once, h, batch, max), once);
    }
}

#[test]
fn key_targets_stay_in_bounds() {
    let mut rng = Lcg::new(9);
    for _ in 0..5_000 {
        let max = rng.gen_range_u64(0, 100_000);
        let current = rng.gen_range_u64(0, max + 5_000);
        let viewport = rng.gen_range_u32(0, 2_000);
        let h = rng.gen_range_u32(0, 200);
        let target = target::target_for_key(rng.gen_key(), current, viewport, h, max);
        assert!(target <= max);
    }
}

#[test]
fn unknown_key_names_leave_the_offset_alone() {
    assert_eq!(NavKey::from_key_name("ArrowDown"), Some(NavKey::LineDown));
    assert_eq!(NavKey::from_key_name("Tab"), None);
    assert_eq!(target::target_for_key_name("Tab", 123, 400, 40, 1_000), 123);
    assert_eq!(target::target_for_key_name("Tab", 5_000, 400, 40, 1_000), 1_000);
    assert_eq!(target::target_for_key_name("ArrowDown", 0, 400, 40, 1_000), 40);
}

// Accelerated path

#[test]
fn native_accelerator_agrees_with_reference() {
    let mut rng = Lcg::new(10);
    let native = NativeAccelerator;
    assert_eq!(native.load(), Ok(()));
    for _ in 0..10_000 {
        let n = rng.gen_range_usize(0, 200);
        let h = rng.gen_range_u32(0, 60);
        let offsets = OffsetIndex::new(n, h);
        let total = offsets.total_height();
        let scroll = rng.gen_range_u64(0, total + 300);
        let viewport = rng.gen_range_u32(0, 800);
        let overscan = rng.gen_range_usize(0, 12);
        let max = target::max_scroll(total, viewport);

        let expected = visible_range(&offsets, ViewportState::new(scroll, viewport), overscan);
        let got = native.visible_range(scroll, viewport, h, n, overscan);
        assert_eq!(got, Ok(expected));

        let key = rng.gen_key();
        assert_eq!(
            native.target_for_key(key, scroll, viewport, h, max),
            Ok(target::target_for_key(key, scroll, viewport, h, max))
        );

        let batch = rng.gen_range_usize(0, 40);
        assert_eq!(
            native.target_for_snap(scroll, h, batch, max),
            Ok(target::target_for_snap(scroll, h, batch, max))
        );

        let revealed = VirtualRange::new(0, rng.gen_range_usize(0, n + 1));
        let mut a = Vec::new();
        let mut b = Vec::new();
        native
            .visible_indexes(expected, revealed, &mut a)
            .unwrap();
        revealed_in_range(expected, revealed, &mut b);
        assert_eq!(a, b);
    }
}

#[test]
fn accelerated_path_loads_once_and_matches_reference() {
    let path = AcceleratedPath::native();
    assert_eq!(path.status(), AccelStatus::Unloaded);
    assert!(path.load());
    assert!(path.load());
    assert_eq!(path.status(), AccelStatus::Available);

    let shared = path.clone();
    assert!(shared.is_available());

    let offsets = OffsetIndex::new(1_000, 40);
    let viewport = ViewportState::new(4_000, 400);
    assert_eq!(
        path.visible_range(&offsets, viewport, 5),
        visible_range(&offsets, viewport, 5)
    );
}

#[test]
fn reference_path_never_loads() {
    let path = AcceleratedPath::reference();
    assert!(!path.has_backend());
    assert!(!path.load());
    assert_eq!(path.status(), AccelStatus::Unloaded);
    assert_eq!(path.target_for_snap(900, 40, 20, 39_600), 800);
}

struct FlakyAccelerator {
    calls: Arc<AtomicUsize>,
    fail_load: bool,
}

impl Accelerator for FlakyAccelerator {
    fn load(&self) -> Result<(), AccelError> {
        if self.fail_load {
            Err(AccelError::LoadFailed("no backend"))
        } else {
            Ok(())
        }
    }

    fn visible_range(
        &self,
        _scroll_offset: u64,
        _viewport_size: u32,
        _item_height: u32,
        _count: usize,
        _overscan: usize,
    ) -> Result<VirtualRange, AccelError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(AccelError::Backend("boom"))
    }

    fn visible_indexes(
        &self,
        _range: VirtualRange,
        _revealed: VirtualRange,
        out: &mut Vec<usize>,
    ) -> Result<(), AccelError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        // Partial output before failing must not leak to the caller.
        out.push(usize::MAX);
        Err(AccelError::Unsupported)
    }

    fn target_for_snap(
        &self,
        _current: u64,
        _item_height: u32,
        _batch_size: usize,
        _max_scroll: u64,
    ) -> Result<u64, AccelError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(1)
    }

    fn target_for_key(
        &self,
        _key: NavKey,
        _current: u64,
        _viewport_size: u32,
        _item_height: u32,
        _max_scroll: u64,
    ) -> Result<u64, AccelError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(AccelError::NotLoaded)
    }
}

fn flaky_path(fail_load: bool) -> (AcceleratedPath, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = FlakyAccelerator {
        calls: Arc::clone(&calls),
        fail_load,
    };
    (AcceleratedPath::new(Arc::new(backend)), calls)
}

#[test]
fn runtime_failure_falls_back_and_disables_backend() {
    let (path, calls) = flaky_path(false);
    assert!(path.load());

    let offsets = OffsetIndex::new(1_000, 40);
    let viewport = ViewportState::new(0, 400);
    assert_eq!(path.visible_range(&offsets, viewport, 5), VirtualRange::new(0, 15));
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    assert_eq!(path.status(), AccelStatus::Failed);

    // Every later call stays on the reference path.
    assert_eq!(path.target_for_snap(900, 40, 20, 39_600), 800);
    assert_eq!(path.target_for_key(NavKey::End, 0, 400, 40, 39_600), 39_600);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    assert!(!path.load());
}

#[test]
fn failed_visible_indexes_discards_partial_output() {
    let (path, calls) = flaky_path(false);
    assert!(path.load());
    let mut out = alloc::vec![7];
    path.visible_indexes(VirtualRange::new(0, 5), VirtualRange::new(2, 10), &mut out);
    assert_eq!(out, [2, 3, 4]);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    assert_eq!(path.status(), AccelStatus::Failed);
}

#[test]
fn failed_load_is_cached() {
    let (path, calls) = flaky_path(true);
    assert!(!path.load());
    assert_eq!(path.status(), AccelStatus::Failed);
    assert!(!path.load());
    assert_eq!(path.target_for_snap(900, 40, 20, 39_600), 800);
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn non_uniform_heights_bypass_the_backend() {
    let (path, calls) = flaky_path(false);
    assert!(path.load());
    let mut offsets = OffsetIndex::new(100, 40);
    offsets.set_measured_height(3, 10);
    let viewport = ViewportState::new(0, 400);
    assert_eq!(
        path.visible_range(&offsets, viewport, 2),
        visible_range(&offsets, viewport, 2)
    );
    assert_eq!(calls.load(Ordering::Relaxed), 0);
    assert_eq!(path.status(), AccelStatus::Available);
}

// Options

#[test]
fn sanitize_clamps_and_reports() {
    let mut options = RenderWaveOptions::new(0, 0)
        .with_batch_size(0)
        .with_container_size(0);
    let warnings = options.sanitize();
    assert_eq!(
        warnings,
        [
            ConfigWarning::NonPositiveItemHeight,
            ConfigWarning::NonPositiveContainerSize,
            ConfigWarning::ZeroBatchSize,
            ConfigWarning::EmptyItemSet,
        ]
    );
    assert_eq!(options.default_item_height, 1);
    assert_eq!(options.container_size, 1);
    assert_eq!(options.batch_size, 1);

    let mut options = RenderWaveOptions::new(10, 40).with_start_index(20);
    assert_eq!(
        options.sanitize(),
        [ConfigWarning::StartIndexOutOfBounds {
            start_index: 20,
            count: 10
        }]
    );
    assert_eq!(options.start_index, 10);
    assert!(options.sanitize().is_empty());
}

#[test]
fn options_defaults() {
    let options = RenderWaveOptions::new(5, 30);
    assert_eq!(options.container_size, 400);
    assert_eq!(options.batch_size, 20);
    assert_eq!(options.reveal_interval_ms, 60);
    assert_eq!(options.overscan, 5);
    assert_eq!(options.start_index, 0);
    assert_eq!(options.reveal_start, RevealStart::Empty);
    assert!(!options.snap_to_batch);
    assert_eq!(options.snap_delay_ms, 150);
    assert!(!options.keyboard_navigation);
    assert_eq!(options.end_reached_threshold, 10);
}

// Engine

#[test]
fn engine_scenario_frame_and_reveal() {
    let mut rw = scenario_engine();
    let frame = rw.frame();
    assert_eq!(frame.range, VirtualRange::new(0, 15));
    assert_eq!(frame.total_height, 40_000);
    assert_eq!(frame.max_scroll, 39_600);
    assert!(rw.visible_indexes().is_empty());

    rw.mount(0);
    assert_eq!(rw.next_deadline(), Some(60));
    rw.on_timer(60);
    assert!(rw.wants_frame());
    assert!(rw.on_frame(60));
    assert_eq!(rw.visible_indexes(), (0..15).collect::<Vec<_>>());

    drive_engine(&mut rw, 60);
    assert_eq!(rw.revealed_count(), 1_000);
    assert_eq!(rw.reveal().ticks(), 50);
    assert_eq!(rw.reveal_phase(), RevealPhase::Complete);
}

#[test]
fn engine_partial_reveal_masks_items() {
    let mut rw = RenderWave::new(RenderWaveOptions::new(100, 10).with_batch_size(3));
    rw.attach(100);
    rw.mount(0);
    rw.on_timer(60);
    rw.on_frame(60);

    let mut items = Vec::new();
    rw.collect_items(&mut items);
    assert_eq!(items.len(), 15);
    assert!(items[..3].iter().all(|item| item.revealed));
    assert!(items[3..].iter().all(|item| !item.revealed));
    assert_eq!(items[4].start, 40);
    assert_eq!(items[4].end(), 50);
    assert_eq!(rw.visible_indexes(), [0, 1, 2]);
}

#[test]
fn detached_handle_is_a_no_op() {
    let mut rw = RenderWave::new(RenderWaveOptions::new(1_000, 40));
    rw.mount(0);
    drive_engine(&mut rw, 0);
    assert!(!rw.is_attached());
    assert_eq!(rw.scroll_to_index(10), None);
    assert_eq!(rw.scroll_to_offset(100), None);
    assert_eq!(rw.apply_scroll_event(100, 0), None);
    assert_eq!(rw.apply_resize(300), None);
    assert!(rw.visible_indexes().is_empty());
    assert!(!rw.is_end_reached());

    // Queries still answer with the nominal container size.
    assert_eq!(rw.visible_range(), VirtualRange::new(0, 15));

    rw.attach(400);
    assert_eq!(rw.scroll_to_index(10), Some(400));
    rw.detach();
    assert_eq!(rw.scroll_to_index(10), None);
}

#[test]
fn scroll_to_index_clamps_and_reports_out_of_range() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&warnings);
    let options = RenderWaveOptions::new(1_000, 40).with_on_warning(Some(move |w: ConfigWarning| {
        assert!(matches!(w, ConfigWarning::IndexOutOfBounds { index: 5_000, .. }));
        seen.fetch_add(1, Ordering::Relaxed);
    }));
    let mut rw = RenderWave::new(options);
    rw.attach(400);

    assert_eq!(rw.scroll_to_index(5_000), Some(39_600));
    assert_eq!(rw.viewport().map(|v| v.scroll_offset), Some(39_600));
    assert_eq!(warnings.load(Ordering::Relaxed), 1);

    assert_eq!(rw.scroll_to_offset(u64::MAX), Some(39_600));
    assert_eq!(rw.scroll_to_offset(123), Some(123));
    assert_eq!(warnings.load(Ordering::Relaxed), 1);
}

#[test]
fn batch_update_coalesces_notifications() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let mut rw = scenario_engine();
    rw.set_on_change(Some(move |_: &RenderWave| {
        seen.fetch_add(1, Ordering::Relaxed);
    }));
    calls.store(0, Ordering::Relaxed);

    rw.batch_update(|rw| {
        rw.apply_scroll_event(100, 0);
        rw.apply_resize(300);
        rw.measure(0, 80);
    });
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    rw.apply_scroll_event(200, 0);
    assert_eq!(calls.load(Ordering::Relaxed), 2);

    // No-op updates do not notify.
    rw.measure(0, 80);
    rw.apply_resize(300);
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn engine_measurements_update_frames() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&warnings);
    let options = RenderWaveOptions::new(1_000, 40).with_on_warning(Some(move |_: ConfigWarning| {
        seen.fetch_add(1, Ordering::Relaxed);
    }));
    let mut rw = RenderWave::new(options);
    rw.attach(400);

    assert_eq!(rw.measure(3, 100), 60);
    assert_eq!(rw.total_height(), 40_060);
    assert_eq!(rw.offset_of(4), 220);
    assert_eq!(rw.index_near(219), 3);
    assert_eq!(rw.measure(2_000, 10), 0);
    assert_eq!(warnings.load(Ordering::Relaxed), 1);

    assert_eq!(rw.measure_px(5, -1.0), -40);
    assert_eq!(rw.measure_px(6, f64::NAN), -40);
    assert_eq!(warnings.load(Ordering::Relaxed), 3);
    assert_eq!(rw.measure_many([(7, 50), (8, 50)]), 20);
    assert_eq!(rw.total_height(), 40_000);

    let frame = rw.apply_scroll_event(0, 0).unwrap();
    assert_eq!(frame.range, visible_range(rw.offsets(), frame.viewport, 5));
}

#[test]
fn count_change_resets_measurements_and_height_change_keeps_them() {
    let mut rw = scenario_engine();
    rw.measure(1, 100);
    rw.update_options(|o| o.default_item_height = 50, 0);
    assert_eq!(rw.height_of(0), Some(50));
    assert_eq!(rw.height_of(1), Some(100));

    rw.set_count(500, 0);
    assert_eq!(rw.total_height(), 500 * 50);
    assert_eq!(rw.height_of(1), Some(50));
}

#[test]
fn engine_restarts_reveal_on_identity_change() {
    let mut rw = scenario_engine();
    rw.mount(0);
    for now in [60, 120] {
        rw.on_timer(now);
        rw.on_frame(now);
    }
    assert_eq!(rw.revealed_count(), 40);

    rw.update_options(|o| o.overscan = 2, 130);
    assert_eq!(rw.revealed_count(), 40);

    rw.update_options(|o| o.batch_size = 10, 130);
    assert_eq!(rw.revealed_count(), 0);
    assert_eq!(rw.reveal_phase(), RevealPhase::Advancing);
    assert_eq!(rw.next_deadline(), Some(190));

    rw.set_count(2_000, 200);
    assert_eq!(rw.revealed_count(), 0);
    assert_eq!(rw.next_deadline(), Some(260));
}

#[test]
fn frames_alone_drive_the_reveal() {
    let mut rw = RenderWave::new(RenderWaveOptions::new(100, 40));
    rw.attach(400);
    rw.mount(0);

    let mut first_reveal = None;
    let mut now = 0;
    while now <= 10_000 {
        if rw.on_frame(now) && first_reveal.is_none() {
            first_reveal = Some(now);
        }
        now += 16;
    }
    // 64 is the first frame past the interval; the batch lands on the frame after it.
    assert_eq!(first_reveal, Some(80));
    assert_eq!(rw.revealed_count(), 100);
    assert_eq!(rw.reveal().ticks(), 5);
    assert_eq!(rw.reveal_phase(), RevealPhase::Complete);
}

#[test]
fn mount_twice_and_unmount_twice_are_no_ops() {
    let mut rw = scenario_engine();
    rw.mount(0);
    rw.on_timer(60);
    rw.on_frame(60);
    rw.mount(100);
    assert_eq!(rw.revealed_count(), 20);

    rw.unmount();
    assert_eq!(rw.next_deadline(), None);
    assert!(!rw.wants_frame());
    rw.unmount();
    assert_eq!(rw.reveal_phase(), RevealPhase::Idle);
    assert!(!rw.on_frame(200));
}

#[test]
fn snap_waits_for_quiet_period() {
    let mut rw = RenderWave::new(RenderWaveOptions::new(1_000, 40).with_snap_to_batch(true));
    rw.attach(400);

    rw.apply_scroll_event(900, 0);
    assert_eq!(rw.next_deadline(), Some(150));
    assert_eq!(rw.poll_snap(100), None);

    rw.apply_scroll_event(900, 100);
    assert_eq!(rw.poll_snap(200), None);
    assert_eq!(rw.poll_snap(250), Some(800));
    assert_eq!(rw.poll_snap(400), None);

    rw.apply_scroll_event(800, 500);
    assert_eq!(rw.poll_snap(650), None);
    assert_eq!(rw.next_deadline(), None);

    rw.apply_scroll_event(900, 700);
    rw.unmount();
    assert_eq!(rw.poll_snap(10_000), None);
}

#[test]
fn snap_is_disarmed_without_snap_to_batch() {
    let mut rw = scenario_engine();
    rw.apply_scroll_event(900, 0);
    assert_eq!(rw.next_deadline(), None);
    assert_eq!(rw.poll_snap(1_000), None);
    assert_eq!(rw.target_for_snap(900), 800);
}

#[test]
fn end_reached_uses_threshold() {
    let mut rw = scenario_engine();
    assert!(!rw.is_end_reached());
    rw.apply_scroll_event(39_000, 0);
    assert!(!rw.is_end_reached());
    rw.apply_scroll_event(39_590, 0);
    assert!(rw.is_end_reached());
    rw.apply_scroll_event(39_600, 0);
    assert!(rw.is_end_reached());
}

#[test]
fn engine_key_targets() {
    let mut rw = scenario_engine();
    assert_eq!(rw.target_for_key(NavKey::End, 0), 39_600);
    assert_eq!(rw.target_for_key_name("End", 0), 39_600);
    assert_eq!(rw.target_for_key_name("PageDown", 0), 400);
    assert_eq!(rw.target_for_key_name("ArrowUp", 0), 0);
    assert_eq!(rw.target_for_key_name("Enter", 700), 700);
    rw.apply_resize(200);
    assert_eq!(rw.target_for_key(NavKey::PageDown, 0), 200);
    assert_eq!(rw.max_scroll(), 39_800);
}

#[test]
fn accelerated_engine_matches_reference_engine() {
    let accelerator = AcceleratedPath::native();
    assert!(accelerator.load());
    let mut fast = RenderWave::new(RenderWaveOptions::new(5_000, 24).with_accelerator(accelerator));
    let mut slow = RenderWave::new(RenderWaveOptions::new(5_000, 24));
    fast.attach(600);
    slow.attach(600);
    fast.mount(0);
    slow.mount(0);
    for now in [60, 120, 180] {
        for rw in [&mut fast, &mut slow] {
            rw.on_timer(now);
            rw.on_frame(now);
        }
    }

    let mut rng = Lcg::new(11);
    for _ in 0..1_000 {
        let offset = rng.gen_range_u64(0, 130_000);
        assert_eq!(fast.apply_scroll_event(offset, 0), slow.apply_scroll_event(offset, 0));
        assert_eq!(fast.visible_indexes(), slow.visible_indexes());
        let key = rng.gen_key();
        assert_eq!(fast.target_for_key(key, offset), slow.target_for_key(key, offset));
        assert_eq!(fast.target_for_snap(offset), slow.target_for_snap(offset));
    }
    assert_eq!(fast.accelerator().status(), AccelStatus::Available);
}

#[test]
fn engine_construction_keeps_warnings() {
    let rw = RenderWave::new(RenderWaveOptions::new(0, 40));
    assert_eq!(rw.warnings(), [ConfigWarning::EmptyItemSet]);
    assert_eq!(rw.frame().range, VirtualRange::EMPTY);
    assert_eq!(rw.target_for_index(3), 0);
}
