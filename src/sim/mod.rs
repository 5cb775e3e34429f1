//! Deterministic minigame simulation
//!
//! All falling-item gameplay logic lives here. This module must stay pure
//! and deterministic:
//! - Wall-clock delta time only (never a fixed-step assumption)
//! - Seeded RNG only
//! - No rendering or platform dependencies; side effects are emitted as
//!   requests for the shell to carry out

pub mod state;
pub mod tick;

pub use state::{FallingItem, GamePhase, ItemKind, MinigameState, Tuning};
pub use tick::{EffectKind, EffectRequest, Feedback, FrameEvents, frame_update};
