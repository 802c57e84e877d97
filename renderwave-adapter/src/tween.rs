/// Shortest smooth scroll, in milliseconds.
pub const MIN_SCROLL_DURATION_MS: u64 = 100;
/// Longest smooth scroll, in milliseconds.
pub const MAX_SCROLL_DURATION_MS: u64 = 500;

/// Duration of a smooth scroll over `distance` pixels: about 0.083ms per pixel, clamped to
/// `MIN_SCROLL_DURATION_MS..=MAX_SCROLL_DURATION_MS`.
pub fn scroll_duration_ms(distance: u64) -> u64 {
    // 0.083 ms/px as an exact ratio.
    let ms = distance.saturating_mul(83) / 1_000;
    ms.clamp(MIN_SCROLL_DURATION_MS, MAX_SCROLL_DURATION_MS)
}

/// A small tween helper for adapter-driven smooth scrolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: u64,
    pub to: u64,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: u64, to: u64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    /// A tween from `from` to `to` whose duration follows [`scroll_duration_ms`].
    pub fn for_distance(from: u64, to: u64, start_ms: u64, easing: Easing) -> Self {
        Self::new(from, to, start_ms, scroll_duration_ms(from.abs_diff(to)), easing)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Offset at `now_ms`. Exactly `to` once the tween is done.
    pub fn sample(&self, now_ms: u64) -> u64 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = (elapsed as f64 / self.duration_ms as f64).clamp(0.0, 1.0);
        let eased = self.easing.sample(t);

        let from = self.from as f64;
        let to = self.to as f64;
        let v = from + (to - from) * eased;
        v.max(0.0) as u64
    }

    /// Restarts from the current sample toward `new_to`.
    pub fn retarget(&mut self, now_ms: u64, new_to: u64, duration_ms: u64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, new_to, now_ms, duration_ms, self.easing);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    SmoothStep,
    EaseInOutCubic,
    /// Half a cosine wave: `-(cos(pi * t) - 1) / 2`.
    #[default]
    EaseInOutSine,
}

impl Easing {
    pub fn sample(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
            Self::EaseInOutSine => {
                if t >= 1.0 {
                    1.0
                } else {
                    -(cos(core::f64::consts::PI * t) - 1.0) / 2.0
                }
            }
        }
    }
}

#[cfg(feature = "std")]
fn cos(x: f64) -> f64 {
    x.cos()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
fn cos(x: f64) -> f64 {
    libm::cos(x)
}
