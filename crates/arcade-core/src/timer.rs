/// Remaining time at which the one-shot warning fires.
pub const TIME_WARNING_THRESHOLD_MS: f32 = 10_000.0;

/// What happened to a countdown during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Untimed, or time remains and no threshold was crossed.
    Running,
    /// Remaining time crossed the warning threshold from above on this tick.
    Warning,
    /// Remaining time reached zero on this tick.
    Expired,
}

/// Countdown in milliseconds. A limit of 0 means untimed.
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    limit_ms: f32,
    remaining_ms: f32,
    warned: bool,
}

impl Countdown {
    pub fn new(limit_ms: f32) -> Self {
        let limit_ms = limit_ms.max(0.0);
        Self {
            limit_ms,
            remaining_ms: limit_ms,
            warned: false,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.limit_ms > 0.0
    }

    pub fn limit_ms(&self) -> f32 {
        self.limit_ms
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    /// Advance by `delta_ms`. The warning and expiry are reported at most once
    /// each; expiry wins if both happen on the same tick.
    pub fn tick(&mut self, delta_ms: f32) -> CountdownTick {
        if !self.is_timed() {
            return CountdownTick::Running;
        }
        let before = self.remaining_ms;
        self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);

        if self.remaining_ms <= 0.0 {
            return CountdownTick::Expired;
        }
        if !self.warned
            && before > TIME_WARNING_THRESHOLD_MS
            && self.remaining_ms <= TIME_WARNING_THRESHOLD_MS
        {
            self.warned = true;
            return CountdownTick::Warning;
        }
        CountdownTick::Running
    }
}
