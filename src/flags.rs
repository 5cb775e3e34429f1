//! Persisted progress flags
//!
//! A handful of flags survive reloads in LocalStorage under the same keys
//! and value encodings the page has always used, so existing visitors keep
//! their unlocks. Storage failures fall back to defaults; persistence is
//! never required for play.

use serde::{Deserialize, Serialize};

/// Vehicle skin for the minigame player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VehicleSkin {
    #[default]
    Rocket,
    Plane,
}

impl VehicleSkin {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleSkin::Rocket => "rocket",
            VehicleSkin::Plane => "plane",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rocket" => Some(VehicleSkin::Rocket),
            "plane" => Some(VehicleSkin::Plane),
            _ => None,
        }
    }
}

/// Flags persisted across visits
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedFlags {
    /// Instructions popup already dismissed once
    pub intro_protocol_seen: bool,
    /// Edge clamp permanently lifted by the boundary breaker
    pub boundary_breaker_unlocked: bool,
    /// Selected player skin
    pub skin: VehicleSkin,
}

// Legacy keys and encodings, kept verbatim
const KEY_INTRO_SEEN: &str = "intro_protocol_seen";
const KEY_BOUNDARY: &str = "boundary_breaker_unlocked";
const KEY_SKIN: &str = "rocket_skin";

impl SavedFlags {
    /// Load flags from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::info!("LocalStorage unavailable, using default flags");
            return Self::default();
        };

        let get = |key: &str| storage.get_item(key).ok().flatten();
        Self {
            intro_protocol_seen: get(KEY_INTRO_SEEN).as_deref() == Some("1"),
            boundary_breaker_unlocked: get(KEY_BOUNDARY).as_deref() == Some("true"),
            skin: get(KEY_SKIN)
                .and_then(|s| VehicleSkin::from_str(&s))
                .unwrap_or_default(),
        }
    }

    /// Save flags to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if self.intro_protocol_seen {
                let _ = storage.set_item(KEY_INTRO_SEEN, "1");
            }
            if self.boundary_breaker_unlocked {
                let _ = storage.set_item(KEY_BOUNDARY, "true");
            }
            let _ = storage.set_item(KEY_SKIN, self.skin.as_str());
            log::info!("Flags saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skin_round_trips_through_its_encoding() {
        assert_eq!(VehicleSkin::from_str("rocket"), Some(VehicleSkin::Rocket));
        assert_eq!(VehicleSkin::from_str("plane"), Some(VehicleSkin::Plane));
        assert_eq!(VehicleSkin::from_str("submarine"), None);
        assert_eq!(VehicleSkin::Plane.as_str(), "plane");
    }

    #[test]
    fn test_defaults_are_all_locked() {
        let flags = SavedFlags::default();
        assert!(!flags.intro_protocol_seen);
        assert!(!flags.boundary_breaker_unlocked);
        assert_eq!(flags.skin, VehicleSkin::Rocket);
    }
}
