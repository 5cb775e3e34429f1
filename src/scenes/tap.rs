//! Tap-to-celebrate counter
//!
//! Each tap lights one pip and throws a firework burst; hitting the
//! target holds the victory screen briefly before advancing.

use glam::Vec2;

use crate::sim::{EffectKind, EffectRequest};

pub const TAP_TARGET: u32 = 8;
const ADVANCE_DELAY_MS: f32 = 1500.0;

#[derive(Debug, Clone, Default)]
pub struct TapScene {
    score: u32,
    advance_timer_ms: f32,
    advanced: bool,
}

impl TapScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn complete(&self) -> bool {
        self.score >= TAP_TARGET
    }

    /// Register a tap at `at` (viewport coordinates, for the burst).
    /// Taps after completion are ignored.
    pub fn tap(&mut self, at: Vec2) -> Option<EffectRequest> {
        if self.complete() {
            return None;
        }
        self.score += 1;
        Some(EffectRequest {
            kind: EffectKind::FireworkBurst,
            origin: at,
        })
    }

    /// Returns true once, after the post-completion hold expires
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
