//! Feed-the-hungry meter
//!
//! Taps push the meter up while a steady decay drags it down, so the
//! player has to keep tapping. Reaching full freezes the meter and
//! advances after a short hold.

pub const METER_FULL: i32 = 100;
pub const FEED_PER_TAP: i32 = 5;
const DECAY_STEP_MS: f32 = 150.0;
const DECAY_PER_STEP: i32 = 1;
const ADVANCE_DELAY_MS: f32 = 1200.0;

#[derive(Debug, Clone, Default)]
pub struct FeedScene {
    meter: i32,
    decay_timer_ms: f32,
    advance_timer_ms: f32,
    advanced: bool,
}

impl FeedScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meter(&self) -> i32 {
        self.meter
    }

    pub fn complete(&self) -> bool {
        self.meter >= METER_FULL
    }

    /// Feed once. Taps after the meter is full are ignored.
    pub fn tap(&mut self) {
        if self.complete() {
            return;
        }
        self.meter = (self.meter + FEED_PER_TAP).min(METER_FULL);
    }

    /// Advance decay and the completion hold. Returns true once, when the
    /// hold expires.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        if self.complete() {
            if self.advanced {
                return false;
            }
            self.advance_timer_ms += dt_ms;
            if self.advance_timer_ms >= ADVANCE_DELAY_MS {
                self.advanced = true;
                return true;
            }
            return false;
        }

        self.decay_timer_ms += dt_ms;
        while self.decay_timer_ms >= DECAY_STEP_MS {
            self.decay_timer_ms -= DECAY_STEP_MS;
            self.meter = (self.meter - DECAY_PER_STEP).max(0);
        }
        false
    }
}
