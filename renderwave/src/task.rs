/// Identifies one scheduled action of a [`TaskSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// When a pending task becomes runnable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Runnable once the host clock reaches the deadline.
    At(u64),
    /// Runnable at the host's next paint opportunity.
    NextFrame,
}

/// A slot holding at most one pending, cancellable action.
///
/// The host owns the event loop and reports timer polls and frames; the slot only decides
/// whether its task fires. Scheduling supersedes whatever was pending. Each task can be
/// cancelled once: cancelling a task that already fired, was superseded, or was cancelled is
/// a no-op.
#[derive(Clone, Debug, Default)]
pub struct TaskSlot {
    next_id: u64,
    pending: Option<(TaskId, Trigger)>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, trigger: Trigger) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some((id, trigger));
        id
    }

    pub fn schedule_at(&mut self, deadline_ms: u64) -> TaskId {
        self.schedule(Trigger::At(deadline_ms))
    }

    pub fn schedule_next_frame(&mut self) -> TaskId {
        self.schedule(Trigger::NextFrame)
    }

    pub fn pending(&self) -> Option<(TaskId, Trigger)> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancels the pending task, if any. Returns whether something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Cancels `id` only if it is still the pending task.
    pub fn cancel_task(&mut self, id: TaskId) -> bool {
        match self.pending {
            Some((pending, _)) if pending == id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Timer poll: fires a due `At` task.
    pub fn fire_timer(&mut self, now_ms: u64) -> Option<TaskId> {
        match self.pending {
            Some((id, Trigger::At(deadline))) if now_ms >= deadline => {
                self.pending = None;
                Some(id)
            }
            _ => None,
        }
    }

    /// Paint opportunity: fires a `NextFrame` task, or an `At` task whose deadline passed.
    pub fn fire_frame(&mut self, now_ms: u64) -> Option<TaskId> {
        match self.pending {
            Some((id, Trigger::NextFrame)) => {
                self.pending = None;
                Some(id)
            }
            Some((_, Trigger::At(_))) => self.fire_timer(now_ms),
            None => None,
        }
    }
}
