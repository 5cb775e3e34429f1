//! Vibration feedback
//!
//! Named patterns map to `navigator.vibrate` sequences. Vibration is
//! strictly best-effort: unsupported browsers and the native build are
//! silent no-ops, never errors.

/// Named vibration patterns used across the scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    Light,
    Medium,
    Heavy,
    Success,
    Error,
    Heartbeat,
    Explosion,
    Click,
    LongPress,
    Notification,
    Celebration,
    /// First thump of the long-press heartbeat
    HeartbeatStrong,
    /// Follow-up thumps of the long-press heartbeat
    HeartbeatSoft,
    /// Title corruption kicking in
    GlitchActivate,
    /// Long-press crossing the arm threshold
    PressArmed,
}

impl HapticPattern {
    /// Vibrate/pause milliseconds, `navigator.vibrate` convention
    pub fn sequence(self) -> &'static [u32] {
        match self {
            Self::Light => &[10],
            Self::Medium => &[20],
            Self::Heavy => &[50],
            Self::Success => &[50, 30, 50],
            Self::Error => &[100, 50, 100, 50, 100],
            Self::Heartbeat => &[25, 25],
            Self::Explosion => &[200, 100, 200],
            Self::Click => &[5],
            Self::LongPress => &[30, 50, 30],
            Self::Notification => &[10, 10, 10],
            Self::Celebration => &[50, 50, 50, 50, 50],
            Self::HeartbeatStrong => &[40, 80, 60],
            Self::HeartbeatSoft => &[35, 70, 55],
            Self::GlitchActivate => &[50, 100, 50, 100],
            Self::PressArmed => &[40, 80, 40, 120],
        }
    }
}

/// Fire a named pattern
pub fn vibrate(pattern: HapticPattern) {
    vibrate_sequence(pattern.sequence());
}

#[cfg(target_arch = "wasm32")]
pub fn vibrate_sequence(sequence: &[u32]) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let array = js_sys::Array::new();
    for &ms in sequence {
        array.push(&wasm_bindgen::JsValue::from_f64(ms as f64));
    }
    // returns false when unsupported or blocked; nothing to do either way
    let _ = window.navigator().vibrate_with_pattern(&array);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn vibrate_sequence(sequence: &[u32]) {
    log::trace!("vibrate {sequence:?} (no-op off-web)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_nonempty_and_start_with_a_buzz() {
        let all = [
            HapticPattern::Light,
            HapticPattern::Medium,
            HapticPattern::Heavy,
            HapticPattern::Success,
            HapticPattern::Error,
            HapticPattern::Heartbeat,
            HapticPattern::Explosion,
            HapticPattern::Click,
            HapticPattern::LongPress,
            HapticPattern::Notification,
            HapticPattern::Celebration,
            HapticPattern::HeartbeatStrong,
            HapticPattern::HeartbeatSoft,
            HapticPattern::GlitchActivate,
            HapticPattern::PressArmed,
        ];
        for pattern in all {
            let seq = pattern.sequence();
            assert!(!seq.is_empty());
            assert!(seq[0] > 0);
        }
    }

    #[test]
    fn test_native_vibrate_is_a_no_op() {
        vibrate(HapticPattern::Success);
        vibrate_sequence(&[1, 2, 3]);
    }
}
