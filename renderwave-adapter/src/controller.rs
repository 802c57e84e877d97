use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use renderwave::{FrameState, NavKey, RenderWave, RenderWaveOptions};

use crate::{Container, ContainerSlot, ContainerSpec, Easing, ScrollHandle, Tween, WrapperProps};

/// A callback fired when the viewport bottom enters the end-reached zone.
pub type OnEndReachedCallback = Arc<dyn Fn(&RenderWave) + Send + Sync>;

/// How programmatic scrolls move the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump to the target in one step.
    Instant,
    /// Tween toward the target over [`crate::scroll_duration_ms`].
    #[default]
    Smooth,
}

/// What a [`Controller::tick`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Scroll offset the host should apply to its container, when the controller moved it.
    pub scroll_offset: Option<u64>,
    /// Whether a reveal batch was applied.
    pub revealed: bool,
}

impl TickOutcome {
    pub fn is_idle(&self) -> bool {
        self.scroll_offset.is_none() && !self.revealed
    }
}

/// A framework-neutral controller that wraps a [`RenderWave`] and wires host events to it.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `mount` / `unmount` with the component lifecycle
/// - `on_viewport_size` / `on_scroll` / `on_key` when UI events occur
/// - `tick(now_ms)` once per animation frame
///
/// Offsets returned by `tick()` (and by the scroll methods with [`ScrollBehavior::Instant`])
/// are meant to be written to the real scroll container. Scroll events caused by those writes
/// should not be fed back through `on_scroll`, which cancels any running tween.
#[derive(Clone)]
pub struct Controller {
    rw: RenderWave,
    behavior: ScrollBehavior,
    easing: Easing,
    tween: Option<Tween>,
    pending_index: Option<usize>,
    outer: Container,
    inner: Container,
    now_ms: u64,
    end_reached: bool,
    on_end_reached: Option<OnEndReachedCallback>,
}

impl Controller {
    pub fn new(options: RenderWaveOptions) -> Self {
        Self::from_engine(RenderWave::new(options))
    }

    pub fn from_engine(rw: RenderWave) -> Self {
        Self {
            rw,
            behavior: ScrollBehavior::default(),
            easing: Easing::default(),
            tween: None,
            pending_index: None,
            outer: Container::default(),
            inner: Container::default(),
            now_ms: 0,
            end_reached: false,
            on_end_reached: None,
        }
    }

    pub fn with_scroll_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_containers(mut self, outer: Container, inner: Container) -> Self {
        self.outer = outer;
        self.inner = inner;
        self
    }

    pub fn engine(&self) -> &RenderWave {
        &self.rw
    }

    pub fn engine_mut(&mut self) -> &mut RenderWave {
        &mut self.rw
    }

    pub fn into_engine(self) -> RenderWave {
        self.rw
    }

    pub fn set_on_end_reached(
        &mut self,
        on_end_reached: Option<impl Fn(&RenderWave) + Send + Sync + 'static>,
    ) {
        self.on_end_reached = on_end_reached.map(|f| Arc::new(f) as _);
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn tween(&self) -> Option<Tween> {
        self.tween
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// Index waiting to be revealed before it is scrolled to.
    pub fn pending_scroll_index(&self) -> Option<usize> {
        self.pending_index
    }

    // Lifecycle

    pub fn mount(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.rw.mount(now_ms);
    }

    /// Cancels the reveal schedule, the snap debounce, any tween, and a deferred scroll.
    pub fn unmount(&mut self) {
        self.rw.unmount();
        self.tween = None;
        self.pending_index = None;
        self.end_reached = false;
    }

    // Host events

    /// Call this when the UI reports a viewport size; the first call attaches the viewport.
    pub fn on_viewport_size(&mut self, viewport_size: u32) -> FrameState {
        let frame = match self.rw.apply_resize(viewport_size) {
            Some(frame) => frame,
            None => self.rw.attach(viewport_size),
        };
        self.check_end_reached();
        frame
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    ///
    /// This cancels any active tween.
    pub fn on_scroll(&mut self, scroll_offset: u64, now_ms: u64) -> Option<FrameState> {
        self.now_ms = now_ms;
        self.cancel_animation();
        let frame = self.rw.apply_scroll_event(scroll_offset, now_ms)?;
        self.check_end_reached();
        Some(frame)
    }

    /// Handles a key press by name (`ArrowDown`, `PageUp`, `Home`, ...).
    ///
    /// Returns the target offset when the key was handled, in which case the host should
    /// suppress its default action. Keys are ignored unless keyboard navigation is enabled.
    pub fn on_key(&mut self, key_name: &str, now_ms: u64) -> Option<u64> {
        self.now_ms = now_ms;
        if !self.rw.options().keyboard_navigation || !self.rw.is_attached() {
            return None;
        }
        let key = NavKey::from_key_name(key_name)?;
        // Repeated presses during a tween step from where the tween is heading.
        let from = match self.tween {
            Some(tween) => tween.to,
            None => self.current_offset(),
        };
        let target = self.rw.target_for_key(key, from);
        self.start_scroll(target, now_ms)
    }

    /// Advances reveal, snapping, deferred scrolls, and the active tween.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        self.now_ms = now_ms;
        let mut outcome = TickOutcome::default();

        // A frame requested by an earlier timer runs before new timers fire.
        if self.rw.wants_frame() {
            outcome.revealed = self.rw.on_frame(now_ms);
        }
        self.rw.on_timer(now_ms);

        if let Some(index) = self.pending_index {
            // Stays armed until the index is revealed and a viewport is attached.
            if self.index_ready(index) {
                if let Some(target) = self.start_scroll_to_index(index, now_ms) {
                    self.pending_index = None;
                    outcome.scroll_offset = Some(target);
                }
            }
        }

        if let Some(target) = self.rw.poll_snap(now_ms) {
            outcome.scroll_offset = self.start_scroll(target, now_ms);
        }

        if let Some(tween) = self.tween {
            let off = tween.sample(now_ms);
            self.rw.apply_scroll_event(off, now_ms);
            if tween.is_done(now_ms) {
                self.tween = None;
            }
            outcome.scroll_offset = Some(off);
            self.check_end_reached();
        }

        outcome
    }

    /// Scrolls to `index` once it is revealed.
    ///
    /// Returns the target offset when the scroll starts right away, `None` when it is
    /// deferred until the index is revealed and a viewport is attached. A later request
    /// replaces a deferred one.
    pub fn request_scroll_to_index(&mut self, index: usize, now_ms: u64) -> Option<u64> {
        self.now_ms = now_ms;
        if self.index_ready(index) {
            if let Some(target) = self.start_scroll_to_index(index, now_ms) {
                self.pending_index = None;
                return Some(target);
            }
        }
        self.pending_index = Some(index);
        None
    }

    /// Starts a scroll to `index` using the configured behavior. Returns the target offset.
    pub fn start_scroll_to_index(&mut self, index: usize, now_ms: u64) -> Option<u64> {
        if !self.rw.is_attached() {
            return None;
        }
        let target = self.rw.target_for_index(index);
        self.start_scroll(target, now_ms)
    }

    /// Starts a scroll to `offset` (clamped) using the configured behavior. Returns the
    /// target offset.
    pub fn start_scroll_to_offset(&mut self, offset: u64, now_ms: u64) -> Option<u64> {
        if !self.rw.is_attached() {
            return None;
        }
        let target = self.rw.target_for_offset(offset);
        self.start_scroll(target, now_ms)
    }

    /// Describes the outer (scrolling) or inner (content) container for the host.
    pub fn describe_container(&self, slot: ContainerSlot) -> ContainerSpec {
        let (container, main_size) = match slot {
            ContainerSlot::Outer => (
                &self.outer,
                self.rw.current_viewport().viewport_size as u64,
            ),
            ContainerSlot::Inner => (&self.inner, self.rw.total_height()),
        };
        container.describe(
            WrapperProps { slot, main_size },
            self.rw.options().keyboard_navigation,
        )
    }

    fn current_offset(&self) -> u64 {
        self.rw.current_viewport().scroll_offset
    }

    fn index_ready(&self, index: usize) -> bool {
        let count = self.rw.count();
        count == 0 || self.rw.is_revealed(index.min(count - 1))
    }

    fn start_scroll(&mut self, target: u64, now_ms: u64) -> Option<u64> {
        self.rw.viewport()?;
        let from = self.current_offset();
        match self.behavior {
            ScrollBehavior::Smooth if from != target => {
                let duration = crate::scroll_duration_ms(from.abs_diff(target));
                let tween = match self.tween {
                    Some(mut tween) => {
                        tween.retarget(now_ms, target, duration);
                        tween
                    }
                    None => Tween::new(from, target, now_ms, duration, self.easing),
                };
                self.tween = Some(tween);
            }
            _ => {
                self.tween = None;
                self.rw.scroll_to_offset(target);
                self.check_end_reached();
            }
        }
        Some(target)
    }

    fn check_end_reached(&mut self) {
        let reached = self.rw.is_end_reached();
        let entered = reached && !self.end_reached;
        self.end_reached = reached;
        if entered {
            if let Some(cb) = &self.on_end_reached {
                cb(&self.rw);
            }
        }
    }
}

impl ScrollHandle for Controller {
    fn scroll_to_index(&mut self, index: usize) -> Option<u64> {
        self.start_scroll_to_index(index, self.now_ms)
    }

    fn scroll_to_offset(&mut self, offset: u64) -> Option<u64> {
        self.start_scroll_to_offset(offset, self.now_ms)
    }

    fn visible_indexes(&self) -> Vec<usize> {
        self.rw.visible_indexes()
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("rw", &self.rw)
            .field("behavior", &self.behavior)
            .field("easing", &self.easing)
            .field("tween", &self.tween)
            .field("pending_index", &self.pending_index)
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .field("end_reached", &self.end_reached)
            .finish_non_exhaustive()
    }
}
