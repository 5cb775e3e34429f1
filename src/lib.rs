//! Starfall Story - a multi-level interactive story experience
//!
//! Core modules:
//! - `sim`: Deterministic falling-item minigame simulation
//! - `sequencer`: Scene step state machine driving which scene is live
//! - `scenes`: Headless per-scene logic (lore, tap, slide, constellation, feed)
//! - `secrets`: Hidden interactions (boundary breaker, terminal, long press)
//! - `audio`/`haptics`: Fire-and-forget feedback services
//! - `flags`: Best-effort persisted flags (LocalStorage on web)

pub mod audio;
pub mod flags;
pub mod haptics;
pub mod scenes;
pub mod secrets;
pub mod sequencer;
pub mod sim;

pub use flags::SavedFlags;
pub use sequencer::{SceneStep, Sequencer};

/// Game configuration constants
pub mod consts {
    /// Points needed to win the intro minigame
    pub const POINTS_TO_WIN: u32 = 20;

    /// Play field is addressed in percent of its own size on both axes
    pub const FIELD_MAX: f32 = 100.0;

    /// Player movement bounds (percent of field width)
    pub const PLAYER_MIN_X: f32 = 5.0;
    pub const PLAYER_MAX_X: f32 = 95.0;

    /// Vertical band where the player sits (catch window, percent of height)
    pub const CATCH_BAND_TOP: f32 = 75.0;
    pub const CATCH_BAND_BOTTOM: f32 = 90.0;

    /// Horizontal catch tolerance around the player center
    pub const HITBOX_HALF_WIDTH: f32 = 6.0;

    /// Items spawn just above the visible field
    pub const SPAWN_Y: f32 = -10.0;

    /// At most this many items are live at once; oldest are dropped first
    pub const MAX_ITEMS: usize = 6;

    /// Scene transition cooldown - a second advance inside this window is dropped
    pub const TRANSITION_COOLDOWN_MS: f64 = 800.0;

    /// Celebratory pause between winning the minigame and requesting advance
    pub const WIN_ADVANCE_DELAY_MS: f64 = 1500.0;
}

/// Clamp a value to `[0, 1]`
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
