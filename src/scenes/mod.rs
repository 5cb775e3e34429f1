//! Headless logic for each interactive scene
//!
//! Every scene is a plain state machine advanced by `update(dt_ms)` and
//! poked by input methods. None of them touch the DOM; the shell reads
//! their state each frame and renders/fires haptics and audio from the
//! events they return.

pub mod constellation;
pub mod feed;
pub mod lore;
pub mod reveal;
pub mod slide;
pub mod tap;

pub use constellation::ConstellationScene;
pub use feed::FeedScene;
pub use lore::{LoreEntry, LoreKey, LoreScene};
pub use reveal::RevealScene;
pub use slide::SlideScene;
pub use tap::TapScene;
