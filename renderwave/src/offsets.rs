use alloc::vec::Vec;

use crate::fenwick::Fenwick;

/// Per-item heights and their cumulative offsets.
///
/// Unmeasured items use the default height. Measured heights stay authoritative until they
/// are re-measured or [`OffsetIndex::reset_measurements`] is called. Offsets are exact
/// integer sums, so a list where every item has the default height `h` satisfies
/// `offset_of(i) == i * h`.
#[derive(Clone, Debug)]
pub struct OffsetIndex {
    default_height: u32,
    heights: Vec<u32>,
    measured: Vec<bool>,
    /// Number of items whose height differs from `default_height`.
    deviating: usize,
    sums: Fenwick,
}

impl OffsetIndex {
    pub fn new(count: usize, default_height: u32) -> Self {
        let heights = alloc::vec![default_height; count];
        let sums = Fenwick::from_heights(&heights);
        Self {
            default_height,
            heights,
            measured: alloc::vec![false; count],
            deviating: 0,
            sums,
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    /// Changes the fallback height and rebuilds prefix sums. Measured heights are kept.
    pub fn set_default_height(&mut self, default_height: u32) {
        if self.default_height == default_height {
            return;
        }
        self.default_height = default_height;
        for (h, &m) in self.heights.iter_mut().zip(self.measured.iter()) {
            if !m {
                *h = default_height;
            }
        }
        self.rebuild();
    }

    /// True when every item has the default height.
    pub fn is_uniform(&self) -> bool {
        self.deviating == 0
    }

    pub fn total_height(&self) -> u64 {
        self.sums.total()
    }

    /// Pixel offset of the leading edge of `index`; `index` is clamped to `len()`.
    pub fn offset_of(&self, index: usize) -> u64 {
        self.sums.prefix(index)
    }

    pub fn height_of(&self, index: usize) -> Option<u32> {
        self.heights.get(index).copied()
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Records a measured height and returns the applied delta in pixels.
    ///
    /// Prefix sums are only touched when the height actually changes.
    pub fn set_measured_height(&mut self, index: usize, height: u32) -> i64 {
        let Some(&cur) = self.heights.get(index) else {
            wwarn!(index, count = self.len(), "set_measured_height: index out of bounds");
            return 0;
        };
        self.measured[index] = true;
        if cur == height {
            return 0;
        }
        let was_default = cur == self.default_height;
        let is_default = height == self.default_height;
        match (was_default, is_default) {
            (true, false) => self.deviating += 1,
            (false, true) => self.deviating -= 1,
            _ => {}
        }
        self.heights[index] = height;
        let delta = height as i64 - cur as i64;
        self.sums.add(index, delta);
        delta
    }

    /// Same as [`Self::set_measured_height`] for layout values reported as floats.
    ///
    /// Negative and NaN heights are clamped to `0`; other values round half-up.
    pub fn set_measured_height_px(&mut self, index: usize, px: f64) -> i64 {
        let height = clamp_px(px).unwrap_or_else(|| {
            wwarn!(index, px, "set_measured_height_px: clamping invalid height to 0");
            0
        });
        self.set_measured_height(index, height)
    }

    /// Applies many measurements and returns the summed delta.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) -> i64 {
        let mut applied = 0i64;
        for (index, height) in measurements {
            applied += self.set_measured_height(index, height);
        }
        applied
    }

    /// Forgets all measurements.
    pub fn reset_measurements(&mut self) {
        self.heights.fill(self.default_height);
        self.measured.fill(false);
        self.rebuild();
    }

    /// Number of leading items that end at or before `offset`.
    ///
    /// Equivalently, the index of the first item whose end offset exceeds `offset`
    /// (`len()` when none does).
    pub fn lower_bound(&self, offset: u64) -> usize {
        self.sums.count_within(offset)
    }

    /// Index of the item containing `offset`.
    ///
    /// On a boundary this is the item starting there; between boundaries it is the lower
    /// neighbour. Any offset at or past the end maps to the last item, so the result is
    /// always a valid index for a non-empty list (`0` for an empty one).
    pub fn index_near(&self, offset: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        self.lower_bound(offset).min(n - 1)
    }

    fn rebuild(&mut self) {
        let default = self.default_height;
        self.deviating = self.heights.iter().filter(|&&h| h != default).count();
        self.sums = Fenwick::from_heights(&self.heights);
        debug_assert_eq!(self.sums.len(), self.heights.len());
        wdebug!(
            count = self.heights.len(),
            deviating = self.deviating,
            "OffsetIndex::rebuild"
        );
    }
}

/// Rounds a float pixel height half-up; `None` for negative or NaN input.
pub(crate) fn clamp_px(px: f64) -> Option<u32> {
    if px.is_nan() || px < 0.0 {
        return None;
    }
    Some((px + 0.5) as u32)
}
