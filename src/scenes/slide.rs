//! Slide-to-travel track
//!
//! The player drags the vehicle across a track; releasing past 90% of the
//! way completes the level, anything short snaps back. Tapping the map pin
//! five times in quick succession swaps the bus for a plane.

/// Fraction of the track the handle must pass before release
pub const COMPLETE_THRESHOLD: f32 = 0.9;

/// Taps further apart than this do not chain toward the upgrade
const PIN_TAP_CHAIN_MS: f64 = 700.0;
const PIN_TAPS_FOR_FLIGHT: u32 = 5;

/// Exit animation runs ~2s, then a short beat before the next scene
const ADVANCE_DELAY_MS: f32 = 2200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideOutcome {
    Completed,
    SnappedBack,
}

#[derive(Debug, Clone, Default)]
pub struct SlideScene {
    /// Handle position as a fraction of the track, 0..=1
    position: f32,
    completed: bool,
    flight_mode: bool,
    pin_tap_count: u32,
    last_pin_tap_ms: Option<f64>,
    advance_timer_ms: f32,
    advanced: bool,
}

impl SlideScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn flight_mode(&self) -> bool {
        self.flight_mode
    }

    pub fn drag_to(&mut self, fraction: f32) {
        if self.completed {
            return;
        }
        self.position = fraction.clamp(0.0, 1.0);
    }

    /// End the drag; past the threshold completes, otherwise snap back
    pub fn release(&mut self) -> SlideOutcome {
        if self.completed {
            return SlideOutcome::Completed;
        }
        if self.position >= COMPLETE_THRESHOLD {
            self.completed = true;
            self.position = 1.0;
            SlideOutcome::Completed
        } else {
            self.position = 0.0;
            SlideOutcome::SnappedBack
        }
    }

    /// Tap the map pin. Five chained taps unlock flight mode; returns true
    /// on the unlocking tap.
    pub fn pin_tap(&mut self, now_ms: f64) -> bool {
        let chained = self
            .last_pin_tap_ms
            .is_some_and(|t| now_ms - t < PIN_TAP_CHAIN_MS);
        self.pin_tap_count = if chained { self.pin_tap_count + 1 } else { 1 };
        self.last_pin_tap_ms = Some(now_ms);

        if self.pin_tap_count >= PIN_TAPS_FOR_FLIGHT && !self.flight_mode {
            self.flight_mode = true;
            self.pin_tap_count = 0;
            return true;
        }
        false
    }

    /// Returns true once, when the exit animation hold has run out
    pub fn update(&mut self, dt_ms: f32) -> bool {
        if !self.completed || self.advanced {
            return false;
        }
        self.advance_timer_ms += dt_ms;
        if self.advance_timer_ms >= ADVANCE_DELAY_MS {
            self.advanced = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_past_threshold_completes() {
        let mut scene = SlideScene::new();
        scene.drag_to(0.92);
        assert_eq!(scene.release(), SlideOutcome::Completed);
        assert!(scene.completed());
        assert_eq!(scene.position(), 1.0);
    }

    #[test]
    fn test_release_short_snaps_back() {
        let mut scene = SlideScene::new();
        scene.drag_to(0.85);
        assert_eq!(scene.release(), SlideOutcome::SnappedBack);
        assert!(!scene.completed());
        assert_eq!(scene.position(), 0.0);
    }

    #[test]
    fn test_drag_after_completion_is_ignored() {
        let mut scene = SlideScene::new();
        scene.drag_to(1.0);
        scene.release();
        scene.drag_to(0.2);
        assert_eq!(scene.position(), 1.0);
    }

    #[test]
    fn test_five_quick_pin_taps_unlock_flight() {
        let mut scene = SlideScene::new();
        let mut now = 0.0;
        for i in 0..5 {
            let unlocked = scene.pin_tap(now);
            assert_eq!(unlocked, i == 4);
            now += 300.0;
        }
        assert!(scene.flight_mode());
    }

    #[test]
    fn test_slow_pin_taps_reset_the_chain() {
        let mut scene = SlideScene::new();
        for _ in 0..4 {
            scene.pin_tap(0.0);
        }
        // 700ms+ gap drops back to a fresh chain
        assert!(!scene.pin_tap(800.0));
        assert!(!scene.flight_mode());
    }

    #[test]
    fn test_advance_after_exit_hold() {
        let mut scene = SlideScene::new();
        scene.drag_to(1.0);
        scene.release();
        assert!(!scene.update(2199.0));
        assert!(scene.update(1.0));
        assert!(!scene.update(5000.0));
    }
}
