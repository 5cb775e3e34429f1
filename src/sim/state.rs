//! Minigame state and core simulation types
//!
//! Everything the falling-item loop mutates lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a minigame instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Intro popup is up, simulation does not advance
    Idle,
    /// Active gameplay, frame loop runs
    Running,
    /// Score threshold reached; spawning and movement stop
    Won,
}

/// Kind of a falling collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Heart,
    Bomb,
}

/// One in-flight falling item
///
/// Position is in percent of the play field: `x` in `[0, 100]` left to
/// right, `y` increasing downward and starting above the field (negative).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    pub pos: Vec2,
    pub kind: ItemKind,
}

/// Tuning parameters for the falling-item loop
///
/// Defaults match the shipped balance; the difficulty ramp interpolates each
/// `base` toward `base + ramp` as score approaches `win_threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub win_threshold: u32,
    /// Spawn interval at progress 0, in ms
    pub base_spawn_interval_ms: f32,
    /// How much the spawn interval shrinks at full progress, in ms
    pub spawn_interval_ramp_ms: f32,
    /// Fall speed at progress 0, percent of field height per ms
    pub base_fall_speed: f32,
    /// Extra fall speed at full progress
    pub fall_speed_ramp: f32,
    /// Bomb probability at progress 0
    pub base_bomb_chance: f32,
    /// Extra bomb probability at full progress
    pub bomb_chance_ramp: f32,
    /// Points per heart caught
    pub heart_points: i32,
    /// Points lost per bomb hit (positive number)
    pub bomb_penalty: i32,
    /// Live item cap; the oldest excess items are dropped
    pub max_items: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            win_threshold: POINTS_TO_WIN,
            base_spawn_interval_ms: 500.0,
            spawn_interval_ramp_ms: 150.0,
            base_fall_speed: 0.06,
            fall_speed_ramp: 0.02,
            base_bomb_chance: 0.2,
            bomb_chance_ramp: 0.08,
            heart_points: 1,
            bomb_penalty: 5,
            max_items: MAX_ITEMS,
        }
    }
}

/// Complete minigame state (deterministic given seed + input trace)
#[derive(Debug, Clone)]
pub struct MinigameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG for spawn position and kind
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Current score, always in `[0, tuning.win_threshold]`
    pub score: u32,
    /// Live items, oldest first
    pub items: Vec<FallingItem>,
    /// Player horizontal position, percent of field width
    pub player_x: f32,
    /// Elapsed ms since the last spawn
    pub spawn_timer_ms: f32,
    /// Balance parameters
    pub tuning: Tuning,
    /// Next item ID
    next_id: u32,
}

impl MinigameState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            items: Vec::new(),
            player_x: 50.0,
            spawn_timer_ms: 0.0,
            tuning,
            next_id: 1,
        }
    }

    /// Allocate a new item ID
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Difficulty progress in `[0, 1]`, derived from score - never stored
    pub fn progress(&self) -> f32 {
        crate::clamp01(self.score as f32 / self.tuning.win_threshold as f32)
    }

    /// Dismiss the intro popup and start the frame loop
    pub fn start(&mut self) {
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::Running;
        }
    }

    /// Return to `Idle` with score and items cleared ("play again")
    pub fn restart(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.items.clear();
        self.spawn_timer_ms = 0.0;
        self.player_x = 50.0;
    }

    /// Event-driven player position update from pointer/touch movement.
    ///
    /// `raw_x` is percent of field width computed from the event coordinates.
    /// Normally clamped to `[PLAYER_MIN_X, PLAYER_MAX_X]`; with the boundary
    /// breaker unlocked the clamp is lifted at the edges.
    pub fn set_player_x(&mut self, raw_x: f32, boundary_unlocked: bool) {
        self.player_x = if boundary_unlocked && !(0.0..=FIELD_MAX).contains(&raw_x) {
            raw_x
        } else {
            raw_x.clamp(PLAYER_MIN_X, PLAYER_MAX_X)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_derived_from_score() {
        let mut state = MinigameState::new(7);
        assert_eq!(state.progress(), 0.0);
        state.score = 10;
        assert!((state.progress() - 0.5).abs() < 1e-6);
        state.score = 40; // above threshold: clamped
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_player_clamped_to_bounds() {
        let mut state = MinigameState::new(7);
        state.set_player_x(120.0, false);
        assert_eq!(state.player_x, PLAYER_MAX_X);
        state.set_player_x(-3.0, false);
        assert_eq!(state.player_x, PLAYER_MIN_X);
        state.set_player_x(42.0, false);
        assert_eq!(state.player_x, 42.0);
    }

    #[test]
    fn test_boundary_breaker_lifts_clamp() {
        let mut state = MinigameState::new(7);
        state.set_player_x(112.0, true);
        assert_eq!(state.player_x, 112.0);
        // In-bounds movement still clamps to the play margins
        state.set_player_x(2.0, true);
        assert_eq!(state.player_x, PLAYER_MIN_X);
        state.set_player_x(50.0, true);
        assert_eq!(state.player_x, 50.0);
    }

    #[test]
    fn test_restart_clears_round_state() {
        let mut state = MinigameState::new(7);
        state.start();
        state.score = 12;
        let id = state.next_item_id();
        state.items.push(FallingItem {
            id,
            pos: Vec2::new(50.0, 30.0),
            kind: ItemKind::Heart,
        });
        state.restart();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert!(state.items.is_empty());
    }
}
