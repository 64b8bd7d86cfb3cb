use arcade_core::rng;
use rand::Rng;

/// Horizontal margin kept clear on each side of a gap (px).
pub const GAP_MARGIN: f32 = 40.0;

/// Spawn scheduling: an initial quiet period, then one wall per interval.
#[derive(Debug, Clone, Default)]
pub struct SpawnTimer {
    elapsed_ms: f32,
    initial_delay_passed: bool,
}

impl SpawnTimer {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn initial_delay_passed(&self) -> bool {
        self.initial_delay_passed
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    /// Advance the timer; returns `true` when a wall should spawn this frame.
    ///
    /// Once the initial delay has elapsed the timer is primed to a full
    /// interval, so the first wall appears on that same frame.
    pub fn tick(&mut self, delta_ms: f32, initial_delay_ms: f32, interval_ms: f32) -> bool {
        self.elapsed_ms += delta_ms;
        if !self.initial_delay_passed {
            if self.elapsed_ms < initial_delay_ms {
                return false;
            }
            self.initial_delay_passed = true;
            self.elapsed_ms = interval_ms;
        }
        if self.elapsed_ms >= interval_ms {
            self.elapsed_ms = 0.0;
            return true;
        }
        false
    }
}

/// Block widths `(left, right)` for a gap of `gap_width`, placed uniformly
/// between the side margins.
pub fn roll_gap(rng: &mut impl Rng, canvas_width: f32, gap_width: f32) -> (f32, f32) {
    let gap_start = rng::uniform(rng, GAP_MARGIN, canvas_width - GAP_MARGIN - gap_width);
    let gap_end = gap_start + gap_width;
    (gap_start, canvas_width - gap_end)
}
