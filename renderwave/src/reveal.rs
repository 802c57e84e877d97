use core::ops::Range;

use crate::task::{TaskId, TaskSlot, Trigger};

/// Where the revealed count starts after a (re)start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevealStart {
    /// Nothing is revealed until the first tick.
    #[default]
    Empty,
    /// The first batch is revealed immediately (legacy behavior).
    FirstBatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevealPhase {
    Idle,
    Advancing,
    Complete,
}

/// Inputs of the reveal schedule. Any change restarts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealConfig {
    pub count: usize,
    pub batch_size: usize,
    pub interval_ms: u64,
    pub start_index: usize,
    pub start: RevealStart,
}

impl RevealConfig {
    /// Clamps `batch_size` to at least 1 and `start_index` to `count`.
    pub fn sanitized(mut self) -> Self {
        self.batch_size = self.batch_size.max(1);
        self.start_index = self.start_index.min(self.count);
        self
    }
}

/// Reveals `[start_index, count)` in batches, one batch per tick.
///
/// A tick runs at the first paint opportunity after `interval_ms` has elapsed: the scheduler
/// arms a timer, and when the timer fires it requests a frame. The host reports both through
/// [`Self::on_timer`] and [`Self::on_frame`], so pacing follows actual rendering rather
/// than wall-clock time alone.
#[derive(Clone, Debug)]
pub struct RevealScheduler {
    config: RevealConfig,
    revealed: usize,
    phase: RevealPhase,
    ticks: usize,
    task: TaskSlot,
}

impl RevealScheduler {
    pub fn new(config: RevealConfig) -> Self {
        let config = config.sanitized();
        Self {
            revealed: initial_count(&config),
            config,
            phase: RevealPhase::Idle,
            ticks: 0,
            task: TaskSlot::new(),
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Ticks applied since the last restart.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn revealed_range(&self) -> Range<usize> {
        self.config.start_index..self.revealed
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed_range().contains(&index)
    }

    /// The task the host should drive next, if any.
    pub fn pending_task(&self) -> Option<(TaskId, Trigger)> {
        self.task.pending()
    }

    /// (Re)starts the schedule from the configured start.
    pub fn start(&mut self, now_ms: u64) {
        self.task.cancel();
        self.revealed = initial_count(&self.config);
        self.ticks = 0;
        if self.revealed < self.config.count {
            self.phase = RevealPhase::Advancing;
            self.task
                .schedule_at(now_ms.saturating_add(self.config.interval_ms));
        } else {
            self.phase = RevealPhase::Complete;
        }
        wdebug!(
            count = self.config.count,
            batch_size = self.config.batch_size,
            revealed = self.revealed,
            "RevealScheduler::start"
        );
    }

    /// Applies a new configuration, restarting when it differs from the current one.
    ///
    /// Returns whether the schedule was restarted. A stopped scheduler stays stopped.
    pub fn reconfigure(&mut self, config: RevealConfig, now_ms: u64) -> bool {
        let config = config.sanitized();
        if config == self.config {
            return false;
        }
        self.config = config;
        if self.phase == RevealPhase::Idle {
            self.revealed = initial_count(&self.config);
            self.ticks = 0;
        } else {
            self.start(now_ms);
        }
        true
    }

    /// Cancels pending work. Safe to call any number of times.
    pub fn stop(&mut self) -> bool {
        let cancelled = self.task.cancel();
        self.phase = RevealPhase::Idle;
        cancelled
    }

    /// Timer poll. Once the interval has elapsed, a frame is requested.
    pub fn on_timer(&mut self, now_ms: u64) {
        if self.task.fire_timer(now_ms).is_some() {
            self.task.schedule_next_frame();
        }
    }

    /// Paint opportunity. Returns whether a batch was revealed.
    ///
    /// A frame that arrives after the interval elapsed stands in for the timer poll, so the
    /// batch lands on the following frame even if the host never calls [`Self::on_timer`].
    pub fn on_frame(&mut self, now_ms: u64) -> bool {
        match self.task.pending() {
            Some((_, Trigger::NextFrame)) => {
                self.task.fire_frame(now_ms);
                self.advance(now_ms);
                true
            }
            Some((_, Trigger::At(_))) => {
                if self.task.fire_frame(now_ms).is_some() {
                    self.task.schedule_next_frame();
                }
                false
            }
            None => false,
        }
    }

    fn advance(&mut self, now_ms: u64) {
        let count = self.config.count;
        self.revealed = self
            .revealed
            .saturating_add(self.config.batch_size)
            .min(count);
        self.ticks += 1;
        wtrace!(revealed = self.revealed, ticks = self.ticks, "reveal tick");
        if self.revealed >= count {
            self.phase = RevealPhase::Complete;
        } else {
            self.task
                .schedule_at(now_ms.saturating_add(self.config.interval_ms));
        }
    }
}

fn initial_count(config: &RevealConfig) -> usize {
    match config.start {
        RevealStart::Empty => config.start_index,
        RevealStart::FirstBatch => config
            .start_index
            .saturating_add(config.batch_size)
            .min(config.count),
    }
}
