//! Player settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::tuning::{DEFAULT_THRESHOLD, GameConfig, MotionLaw};

/// Slider values and audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Volume above which the actor reacts
    pub threshold: f32,
    /// Gravity for games with ballistic motion
    pub gravity: f32,
    /// Obstacle speed multiplier (1.0 = stock)
    pub scroll_speed: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            gravity: 0.5,
            scroll_speed: 1.0,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Slider ranges
    pub const THRESHOLD_RANGE: (f32, f32) = (0.0, 255.0);
    pub const GRAVITY_RANGE: (f32, f32) = (0.1, 2.0);
    pub const SCROLL_SPEED_RANGE: (f32, f32) = (0.25, 3.0);

    /// Pull every value back into its slider range
    pub fn clamped(mut self) -> Self {
        let clamp = |v: f32, (lo, hi): (f32, f32)| if v.is_finite() { v.clamp(lo, hi) } else { lo };
        self.threshold = clamp(self.threshold, Self::THRESHOLD_RANGE);
        self.gravity = clamp(self.gravity, Self::GRAVITY_RANGE);
        self.scroll_speed = clamp(self.scroll_speed, Self::SCROLL_SPEED_RANGE);
        self.master_volume = clamp(self.master_volume, (0.0, 1.0));
        self.sfx_volume = clamp(self.sfx_volume, (0.0, 1.0));
        self
    }

    /// Override the tunables this player controls
    pub fn apply(&self, config: &mut GameConfig) {
        config.threshold = self.threshold;
        if let MotionLaw::Ballistic { gravity, .. } = &mut config.motion {
            *gravity = self.gravity;
        }
        config.obstacle.velocity *= self.scroll_speed;
    }

    /// Effective sound effect gain (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "voice_arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Some(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    None => log::warn!("Ignoring unreadable settings"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
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

    /// Parse stored JSON, clamping out-of-range values
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str::<Self>(json).ok().map(Self::clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_defaults_leave_config_unchanged() {
        for variant in crate::tuning::GameVariant::ALL {
            let stock = GameConfig::for_variant(variant);
            let mut config = stock.clone();
            Settings::default().apply(&mut config);
            assert_eq!(config, stock);
        }
    }

    #[test]
    fn test_apply_overrides_tunables() {
        let settings = Settings {
            threshold: 55.0,
            gravity: 1.0,
            scroll_speed: 2.0,
            ..Default::default()
        };

        let mut bird = GameConfig::bird();
        settings.apply(&mut bird);
        assert_eq!(bird.threshold, 55.0);
        assert_eq!(
            bird.motion,
            MotionLaw::Ballistic {
                gravity: 1.0,
                jump_velocity: -5.0
            }
        );
        assert_eq!(bird.obstacle.velocity, Vec2::new(-4.0, 0.0));

        // Gravity has nothing to act on in the car game
        let mut car = GameConfig::car();
        settings.apply(&mut car);
        assert_eq!(car.motion, GameConfig::car().motion);
        assert_eq!(car.obstacle.velocity, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"threshold": 12.0, "muted": true}"#).unwrap();
        assert_eq!(settings.threshold, 12.0);
        assert!(settings.muted);
        assert_eq!(settings.gravity, 0.5);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let settings = Settings::from_json(r#"{"gravity": 50.0, "scroll_speed": -1.0}"#).unwrap();
        assert_eq!(settings.gravity, 2.0);
        assert_eq!(settings.scroll_speed, 0.25);
        assert!(Settings::from_json("not json").is_none());
    }

    #[test]
    fn test_sfx_volume_scales_with_master() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.25);
    }
}
