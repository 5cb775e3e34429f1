//! Connect-the-stars puzzle
//!
//! Five stars light in order; the finished constellation draws a heart and
//! advances after a short hold. Tilting the device far enough fades in a
//! hidden second constellation.

pub const STAR_COUNT: usize = 5;
const ADVANCE_DELAY_MS: f32 = 1500.0;

/// Tilt angle where the hidden constellation starts to bleed through
const TILT_THRESHOLD_DEG: f32 = 35.0;
/// Degrees past the threshold for full visibility
const TILT_RANGE_DEG: f32 = 25.0;
const SECRET_VISIBLE_AT: f32 = 0.6;

/// Plotted positions for the visible constellation, percent coordinates
pub const STAR_COORDS: [(f32, f32); STAR_COUNT] = [
    (20.0, 30.0),
    (35.0, 60.0),
    (50.0, 40.0),
    (65.0, 65.0),
    (80.0, 30.0),
];

/// The hidden constellation revealed by tilting
pub const SECRET_COORDS: [(f32, f32); 6] = [
    (18.0, 18.0),
    (52.0, 20.0),
    (72.0, 28.0),
    (62.0, 48.0),
    (32.0, 62.0),
    (22.0, 44.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarTap {
    /// Star lit; carries the star index for the ascending chime
    Lit(usize),
    /// Last star lit, constellation complete
    Completed,
    /// Out of order or already lit, nothing happens
    Rejected,
}

#[derive(Debug, Clone, Default)]
pub struct ConstellationScene {
    lit: [bool; STAR_COUNT],
    tilt_progress: f32,
    advance_timer_ms: f32,
    advanced: bool,
}

impl ConstellationScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lit(&self) -> &[bool; STAR_COUNT] {
        &self.lit
    }

    pub fn complete(&self) -> bool {
        self.lit.iter().all(|&p| p)
    }

    /// Tap star `index`. Stars only light in sequence; re-taps and skips
    /// are rejected.
    pub fn tap_star(&mut self, index: usize) -> StarTap {
        if index >= STAR_COUNT || self.lit[index] {
            return StarTap::Rejected;
        }
        if index > 0 && !self.lit[index - 1] {
            return StarTap::Rejected;
        }
        self.lit[index] = true;
        if self.complete() {
            StarTap::Completed
        } else {
            StarTap::Lit(index)
        }
    }

    /// Feed a device orientation sample (beta/gamma in degrees). The larger
    /// excess over the tilt threshold drives the secret reveal.
    pub fn set_tilt(&mut self, beta_deg: f32, gamma_deg: f32) {
        let intensity = (beta_deg.abs() - TILT_THRESHOLD_DEG)
            .max(gamma_deg.abs() - TILT_THRESHOLD_DEG);
        self.tilt_progress = (intensity / TILT_RANGE_DEG).clamp(0.0, 1.0);
    }

    /// 0..=1 fade for the hidden constellation overlay
    pub fn tilt_progress(&self) -> f32 {
        self.tilt_progress
    }

    pub fn secret_visible(&self) -> bool {
        self.tilt_progress > SECRET_VISIBLE_AT
    }

    /// Returns true once, after the post-completion hold
    pub fn update(&mut self, dt_ms: f32) -> bool {
        if !self.complete() || self.advanced {
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
    fn test_stars_light_only_in_order() {
        let mut scene = ConstellationScene::new();
        assert_eq!(scene.tap_star(2), StarTap::Rejected);
        assert_eq!(scene.tap_star(0), StarTap::Lit(0));
        assert_eq!(scene.tap_star(0), StarTap::Rejected);
        assert_eq!(scene.tap_star(1), StarTap::Lit(1));
        assert_eq!(scene.tap_star(3), StarTap::Rejected);
    }

    #[test]
    fn test_last_star_completes() {
        let mut scene = ConstellationScene::new();
        for i in 0..STAR_COUNT - 1 {
            assert_eq!(scene.tap_star(i), StarTap::Lit(i));
        }
        assert_eq!(scene.tap_star(STAR_COUNT - 1), StarTap::Completed);
        assert!(scene.complete());
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut scene = ConstellationScene::new();
        assert_eq!(scene.tap_star(99), StarTap::Rejected);
    }

    #[test]
    fn test_tilt_reveal_curve() {
        let mut scene = ConstellationScene::new();
        scene.set_tilt(10.0, 10.0);
        assert_eq!(scene.tilt_progress(), 0.0);
        assert!(!scene.secret_visible());

        // 35 + 25 degrees saturates the reveal
        scene.set_tilt(60.0, 0.0);
        assert_eq!(scene.tilt_progress(), 1.0);
        assert!(scene.secret_visible());

        // the larger axis wins; sign is ignored
        scene.set_tilt(0.0, -50.0);
        assert!((scene.tilt_progress() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_advance_after_hold() {
        let mut scene = ConstellationScene::new();
        for i in 0..STAR_COUNT {
            scene.tap_star(i);
        }
        assert!(!scene.update(1499.0));
        assert!(scene.update(1.0));
        assert!(!scene.update(1500.0));
    }
}
