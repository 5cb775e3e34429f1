//! Scene sequencer state machine
//!
//! Owns the step cursor into the fixed scene order and debounces transition
//! requests. The debounce compares a monotonic "last transition" timestamp
//! against a minimum interval rather than holding a cooldown flag, so it can
//! be unit-tested without fake timers.

use serde::{Deserialize, Serialize};

use crate::consts::TRANSITION_COOLDOWN_MS;
use crate::scenes::lore::LoreKey;

/// One full-screen scene in the fixed story order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneStep {
    /// Falling-heart catch minigame
    Intro,
    /// Story screen keyed by chapter
    Lore(LoreKey),
    /// Timed memory reveal
    Reveal,
    /// Tap-to-party counter
    Tap,
    /// Slide-to-connect track
    Slide,
    /// Connect-the-stars puzzle
    Constellation,
    /// Feed-the-hungry meter
    Feed,
    /// Photo gallery finale
    Final,
}

/// The fixed scene order; lore chapters interleave with the minigames
pub const SCENE_ORDER: [SceneStep; 12] = [
    SceneStep::Intro,
    SceneStep::Lore(LoreKey::Intro),
    SceneStep::Reveal,
    SceneStep::Lore(LoreKey::Celebration),
    SceneStep::Tap,
    SceneStep::Lore(LoreKey::Distance),
    SceneStep::Slide,
    SceneStep::Lore(LoreKey::Stars),
    SceneStep::Constellation,
    SceneStep::Lore(LoreKey::Care),
    SceneStep::Feed,
    SceneStep::Final,
];

/// Index of the terminal scene
pub const FINAL_STEP: usize = SCENE_ORDER.len() - 1;

/// Sequences scenes; exactly one is live at a time.
///
/// `advance`/`restart` take the caller's notion of "now" in milliseconds
/// (performance.now() on the web) so the debounce stays testable.
#[derive(Debug, Clone)]
pub struct Sequencer {
    step: usize,
    /// Timestamp of the last accepted transition; None before the first
    last_transition_ms: Option<f64>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            step: 0,
            last_transition_ms: None,
        }
    }

    /// Index of the live scene, always in `[0, FINAL_STEP]`
    pub fn step(&self) -> usize {
        self.step
    }

    /// The live scene
    pub fn current(&self) -> SceneStep {
        SCENE_ORDER[self.step]
    }

    pub fn is_final(&self) -> bool {
        self.step == FINAL_STEP
    }

    fn in_cooldown(&self, now_ms: f64) -> bool {
        self.last_transition_ms
            .is_some_and(|t| now_ms - t < TRANSITION_COOLDOWN_MS)
    }

    /// Move to the next scene. Requests inside the cooldown window collapse
    /// to at most one step change; the step clamps at the final scene.
    /// Returns true if a transition was accepted.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        if self.in_cooldown(now_ms) {
            return false;
        }
        self.last_transition_ms = Some(now_ms);
        self.step = (self.step + 1).min(FINAL_STEP);
        true
    }

    /// Return to the first scene, same debounce discipline as `advance`
    pub fn restart(&mut self, now_ms: f64) -> bool {
        if self.in_cooldown(now_ms) {
            return false;
        }
        self.last_transition_ms = Some(now_ms);
        self.step = 0;
        true
    }

    /// Debug/easter-egg jump. Out-of-range targets clamp; no error surface.
    pub fn jump_to(&mut self, target: usize, now_ms: f64) -> bool {
        if self.in_cooldown(now_ms) {
            return false;
        }
        if target > FINAL_STEP {
            log::warn!("jump_to({target}) out of range, clamping to {FINAL_STEP}");
        }
        self.last_transition_ms = Some(now_ms);
        self.step = target.min(FINAL_STEP);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_walks_the_scene_order() {
        let mut seq = Sequencer::new();
        assert_eq!(seq.current(), SceneStep::Intro);
        assert!(seq.advance(0.0));
        assert_eq!(seq.current(), SceneStep::Lore(LoreKey::Intro));
        assert!(seq.advance(1000.0));
        assert_eq!(seq.current(), SceneStep::Reveal);
    }

    #[test]
    fn test_rapid_advances_collapse_to_one() {
        let mut seq = Sequencer::new();
        assert!(seq.advance(0.0));
        // Duplicate completion signals inside the cooldown are dropped
        assert!(!seq.advance(100.0));
        assert!(!seq.advance(799.0));
        assert_eq!(seq.step(), 1);
        assert!(seq.advance(800.0));
        assert_eq!(seq.step(), 2);
    }

    #[test]
    fn test_step_clamps_at_final() {
        let mut seq = Sequencer::new();
        let mut now = 0.0;
        for _ in 0..30 {
            seq.advance(now);
            now += 1000.0;
        }
        assert_eq!(seq.step(), FINAL_STEP);
        assert!(seq.is_final());
        assert_eq!(seq.current(), SceneStep::Final);
    }

    // restart mid-cooldown is a no-op, after the cooldown it resets
    #[test]
    fn test_restart_respects_cooldown() {
        let mut seq = Sequencer::new();
        seq.advance(0.0);
        seq.advance(1000.0);
        assert_eq!(seq.step(), 2);
        assert!(!seq.restart(1400.0));
        assert_eq!(seq.step(), 2);
        assert!(seq.restart(1800.0));
        assert_eq!(seq.step(), 0);
    }

    #[test]
    fn test_jump_to_clamps_out_of_range() {
        let mut seq = Sequencer::new();
        assert!(seq.jump_to(99, 0.0));
        assert_eq!(seq.step(), FINAL_STEP);
        assert!(seq.jump_to(3, 1000.0));
        assert_eq!(seq.current(), SceneStep::Lore(LoreKey::Celebration));
    }

    #[test]
    fn test_first_transition_needs_no_warmup() {
        // No prior transition: the very first request is always accepted
        let mut seq = Sequencer::new();
        assert!(seq.advance(5.0));
    }
}
