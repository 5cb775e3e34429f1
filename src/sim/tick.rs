//! Per-frame minigame update
//!
//! Advances the falling-item simulation by the wall-clock time elapsed since
//! the previous animation frame. Behavior must not depend on display refresh
//! rate: everything scales by `dt_ms`.

use glam::Vec2;
use rand::Rng;

use super::state::{FallingItem, GamePhase, ItemKind, MinigameState};
use crate::consts::*;

/// An opaque visual effect request for the presentation layer.
///
/// The sim emits these instead of touching any rendering API so the loop
/// stays testable headlessly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub kind: EffectKind,
    /// Origin in field percent coordinates
    pub origin: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Floating heart burst on a catch
    HeartBurst,
    /// Particle explosion + flash on a bomb hit
    Explosion,
    /// Multicolor firework burst, used by the tap scene
    FireworkBurst,
}

/// Feedback channel selection for haptics/audio this frame.
///
/// A bomb hit takes priority over heart catches so negative feedback is
/// never masked by a simultaneous catch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    BombHit,
    HeartCatch,
}

/// What happened during one frame, for the shell to react to
#[derive(Debug, Clone, Default)]
pub struct FrameEvents {
    pub hearts_caught: u32,
    pub bombs_hit: u32,
    /// True on exactly the frame the win threshold was crossed
    pub won: bool,
    pub effects: Vec<EffectRequest>,
}

impl FrameEvents {
    /// Haptic/sound channel for this frame, bomb-priority
    pub fn feedback(&self) -> Option<Feedback> {
        if self.bombs_hit > 0 {
            Some(Feedback::BombHit)
        } else if self.hearts_caught > 0 {
            Some(Feedback::HeartCatch)
        } else {
            None
        }
    }
}

/// Advance the minigame by one animation frame of `dt_ms` wall-clock time.
///
/// Order matters within a frame: spawn, cap, move/collide, score, win check,
/// then side-effect selection. Later steps read results of earlier ones.
pub fn frame_update(state: &mut MinigameState, dt_ms: f32) -> FrameEvents {
    let mut events = FrameEvents::default();
    if state.phase != GamePhase::Running {
        return events;
    }

    let progress = state.progress();
    let spawn_interval_ms =
        state.tuning.base_spawn_interval_ms - progress * state.tuning.spawn_interval_ramp_ms;
    let fall_speed = state.tuning.base_fall_speed + progress * state.tuning.fall_speed_ramp;
    let bomb_chance = state.tuning.base_bomb_chance + progress * state.tuning.bomb_chance_ramp;

    // Spawn: one item per interval crossing, remainder dropped. Intervals are
    // much larger than a frame, so the lost remainder is not noticeable.
    state.spawn_timer_ms += dt_ms;
    if state.spawn_timer_ms > spawn_interval_ms {
        spawn_item(state, bomb_chance);
        state.spawn_timer_ms = 0.0;
    }

    // Backpressure: bound the live set before movement, dropping oldest first
    let max_items = state.tuning.max_items;
    if state.items.len() > max_items {
        let excess = state.items.len() - max_items;
        state.items.drain(..excess);
    }

    // Move and collide. Every overlapping item resolves independently in the
    // same frame; collided and off-screen items do not survive to the next.
    let player_x = state.player_x;
    let mut score_delta: i32 = 0;
    let mut kept = Vec::with_capacity(state.items.len());
    for item in state.items.drain(..) {
        let new_y = item.pos.y + fall_speed * dt_ms;
        let in_band = new_y > CATCH_BAND_TOP && new_y < CATCH_BAND_BOTTOM;
        let in_reach = (item.pos.x - player_x).abs() < HITBOX_HALF_WIDTH;
        if in_band && in_reach {
            match item.kind {
                ItemKind::Heart => {
                    score_delta += state.tuning.heart_points;
                    events.hearts_caught += 1;
                    events.effects.push(EffectRequest {
                        kind: EffectKind::HeartBurst,
                        origin: Vec2::new(item.pos.x, new_y),
                    });
                }
                ItemKind::Bomb => {
                    score_delta -= state.tuning.bomb_penalty;
                    events.bombs_hit += 1;
                    events.effects.push(EffectRequest {
                        kind: EffectKind::Explosion,
                        origin: Vec2::new(item.pos.x, new_y),
                    });
                }
            }
        } else if new_y <= FIELD_MAX {
            kept.push(FallingItem {
                pos: Vec2::new(item.pos.x, new_y),
                ..item
            });
        }
        // else: off the bottom with no collision - culled
    }
    state.items = kept;

    // Score with floor clamp, then the win edge. Comparing pre- and post-
    // threshold keeps the win one-shot even if deltas keep arriving.
    if score_delta != 0 {
        let old_score = state.score;
        let new_score = (old_score as i32 + score_delta).max(0) as u32;
        if new_score >= state.tuning.win_threshold && old_score < state.tuning.win_threshold {
            state.score = state.tuning.win_threshold;
            state.phase = GamePhase::Won;
            events.won = true;
        } else {
            state.score = new_score.min(state.tuning.win_threshold);
        }
    }

    events
}

fn spawn_item(state: &mut MinigameState, bomb_chance: f32) {
    let x = state.rng.random_range(PLAYER_MIN_X..PLAYER_MAX_X);
    let kind = if state.rng.random::<f32>() < bomb_chance {
        ItemKind::Bomb
    } else {
        ItemKind::Heart
    };
    let id = state.next_item_id();
    state.items.push(FallingItem {
        id,
        pos: Vec2::new(x, SPAWN_Y),
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Tuning;
    use proptest::prelude::*;

    /// Tuning that never spawns, for movement/collision-only tests
    fn quiet_tuning() -> Tuning {
        Tuning {
            base_spawn_interval_ms: 1e9,
            spawn_interval_ramp_ms: 0.0,
            ..Tuning::default()
        }
    }

    fn running_state() -> MinigameState {
        let mut state = MinigameState::with_tuning(42, quiet_tuning());
        state.start();
        state
    }

    fn place_item(state: &mut MinigameState, x: f32, y: f32, kind: ItemKind) {
        let id = state.next_item_id();
        state.items.push(FallingItem {
            id,
            pos: Vec2::new(x, y),
            kind,
        });
    }

    #[test]
    fn test_idle_does_not_advance() {
        let mut state = MinigameState::new(1);
        place_item(&mut state, 50.0, 10.0, ItemKind::Heart);
        let events = frame_update(&mut state, 16.0);
        assert_eq!(state.items[0].pos.y, 10.0);
        assert!(events.effects.is_empty());
    }

    #[test]
    fn test_heart_catch_scores_and_emits_effect() {
        let mut state = running_state();
        state.set_player_x(50.0, false);
        place_item(&mut state, 52.0, 79.0, ItemKind::Heart);
        let events = frame_update(&mut state, 16.0);
        assert_eq!(state.score, 1);
        assert_eq!(events.hearts_caught, 1);
        assert_eq!(events.effects.len(), 1);
        assert_eq!(events.effects[0].kind, EffectKind::HeartBurst);
        assert!(state.items.is_empty(), "caught item must be removed");
    }

    // distance 5 hits, distance 7 misses
    #[test]
    fn test_hitbox_half_width_boundary() {
        let mut state = running_state();
        state.set_player_x(50.0, false);
        place_item(&mut state, 55.0, 80.0, ItemKind::Heart);
        place_item(&mut state, 57.0, 80.0, ItemKind::Heart);
        let events = frame_update(&mut state, 1.0);
        assert_eq!(events.hearts_caught, 1);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].pos.x, 57.0);
    }

    // a bomb at score 3 clamps to 0, not -2
    #[test]
    fn test_bomb_clamps_score_at_zero() {
        let mut state = running_state();
        state.score = 3;
        state.set_player_x(50.0, false);
        place_item(&mut state, 50.0, 80.0, ItemKind::Bomb);
        let events = frame_update(&mut state, 1.0);
        assert_eq!(state.score, 0);
        assert_eq!(events.bombs_hit, 1);
        assert_eq!(events.feedback(), Some(Feedback::BombHit));
    }

    // two simultaneous hearts at 18 land on exactly 20 and Won fires once
    #[test]
    fn test_simultaneous_hearts_cross_threshold_once() {
        let mut state = running_state();
        state.score = 18;
        state.set_player_x(50.0, false);
        place_item(&mut state, 48.0, 80.0, ItemKind::Heart);
        place_item(&mut state, 52.0, 80.0, ItemKind::Heart);
        let events = frame_update(&mut state, 1.0);
        assert_eq!(state.score, 20);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(events.won);

        // Once won, further frames are inert and never re-report the win
        place_item(&mut state, 50.0, 80.0, ItemKind::Heart);
        let events = frame_update(&mut state, 1.0);
        assert!(!events.won);
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_bomb_priority_over_heart_in_same_frame() {
        let mut state = running_state();
        state.score = 10;
        state.set_player_x(50.0, false);
        place_item(&mut state, 48.0, 80.0, ItemKind::Heart);
        place_item(&mut state, 52.0, 80.0, ItemKind::Bomb);
        let events = frame_update(&mut state, 1.0);
        // Net delta applies (+1 - 5 = -4), feedback is the bomb's
        assert_eq!(state.score, 6);
        assert_eq!(events.feedback(), Some(Feedback::BombHit));
        assert_eq!(events.effects.len(), 2);
    }

    #[test]
    fn test_offscreen_items_culled() {
        let mut state = running_state();
        state.set_player_x(5.0, false);
        place_item(&mut state, 95.0, 99.9, ItemKind::Heart);
        frame_update(&mut state, 16.0);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_item_cap_drops_oldest() {
        let mut state = running_state();
        state.set_player_x(5.0, false);
        for i in 0..9 {
            place_item(&mut state, 90.0, i as f32, ItemKind::Heart);
        }
        frame_update(&mut state, 1.0);
        assert_eq!(state.items.len(), MAX_ITEMS);
        // The three oldest (y = 0, 1, 2) were dropped before movement
        let min_y = state
            .items
            .iter()
            .map(|i| i.pos.y)
            .fold(f32::INFINITY, f32::min);
        assert!(min_y > 2.0);
    }

    #[test]
    fn test_spawn_interval_and_determinism() {
        let mut a = MinigameState::new(1234);
        let mut b = MinigameState::new(1234);
        a.start();
        b.start();
        // 600 ms at 60 Hz crosses the 500 ms base interval exactly once
        for _ in 0..36 {
            frame_update(&mut a, 16.6667);
            frame_update(&mut b, 16.6667);
        }
        assert_eq!(a.items.len(), 1);
        assert_eq!(a.items[0].pos.x, b.items[0].pos.x);
        assert_eq!(a.items[0].kind, b.items[0].kind);
    }

    #[test]
    fn test_difficulty_ramps_with_progress() {
        let mut state = MinigameState::new(9);
        state.start();
        state.score = state.tuning.win_threshold / 2;
        // At progress 0.5 the spawn interval is 500 - 75 = 425 ms
        state.spawn_timer_ms = 430.0;
        frame_update(&mut state, 1.0);
        assert_eq!(state.items.len(), 1);
    }

    proptest! {
        /// Same total elapsed time, different frame splits: identical final
        /// item positions and score (with spawning disabled so the item set
        /// is fixed).
        #[test]
        fn prop_frame_rate_independence(splits in 1usize..50, total_ms in 10.0f32..400.0) {
            let mut coarse = running_state();
            let mut fine = running_state();
            for s in [&mut coarse, &mut fine] {
                s.set_player_x(5.0, false);
                place_item(s, 95.0, -10.0, ItemKind::Heart);
                place_item(s, 80.0, 20.0, ItemKind::Bomb);
            }

            frame_update(&mut coarse, total_ms);
            let step = total_ms / splits as f32;
            for _ in 0..splits {
                frame_update(&mut fine, step);
            }

            prop_assert_eq!(coarse.score, fine.score);
            prop_assert_eq!(coarse.items.len(), fine.items.len());
            for (a, b) in coarse.items.iter().zip(fine.items.iter()) {
                prop_assert!((a.pos.y - b.pos.y).abs() < 1e-3);
            }
        }

        /// Score stays in [0, win_threshold] under arbitrary collision orders
        #[test]
        fn prop_score_bounds(hits in proptest::collection::vec(any::<bool>(), 0..120)) {
            let mut state = running_state();
            for is_bomb in hits {
                let kind = if is_bomb { ItemKind::Bomb } else { ItemKind::Heart };
                state.set_player_x(50.0, false);
                place_item(&mut state, 50.0, 80.0, kind);
                frame_update(&mut state, 1.0);
                prop_assert!(state.score <= state.tuning.win_threshold);
            }
        }
    }
}
