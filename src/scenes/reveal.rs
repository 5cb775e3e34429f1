//! Memory reveal screen
//!
//! Shows a loading cover for one second, then reveals the photo with a
//! haptic pulse and starts the typewriter text. The continue control
//! fades in a few seconds later.

const REVEAL_MS: f32 = 1000.0;
const CONTINUE_MS: f32 = 4000.0;

#[derive(Debug, Clone, Default)]
pub struct RevealScene {
    elapsed_ms: f32,
    reveal_fired: bool,
}

impl RevealScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revealed(&self) -> bool {
        self.elapsed_ms >= REVEAL_MS
    }

    pub fn can_continue(&self) -> bool {
        self.elapsed_ms >= CONTINUE_MS
    }

    /// Returns true on the single frame the reveal happens, so the shell
    /// can fire the haptic pulse exactly once.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        self.elapsed_ms += dt_ms;
        if self.revealed() && !self.reveal_fired {
            self.reveal_fired = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_fires_once() {
        let mut scene = RevealScene::new();
        assert!(!scene.update(999.0));
        assert!(!scene.revealed());
        assert!(scene.update(1.0));
        assert!(scene.revealed());
        assert!(!scene.update(16.0));
    }

    #[test]
    fn test_continue_unlocks_later() {
        let mut scene = RevealScene::new();
        scene.update(3999.0);
        assert!(!scene.can_continue());
        scene.update(1.0);
        assert!(scene.can_continue());
    }
}
