//! Game settings and preferences
//!
//! Persisted separately from the profile.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_or_default, save_json};
use crate::sim::Stroke;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Difficulty number level 1 starts at
    pub fn base_difficulty(&self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 2,
            Difficulty::Hard => 5,
        }
    }

    /// Difficulty number for a given level (1-based)
    pub fn difficulty_for_level(&self, level: u32) -> u32 {
        self.base_difficulty() + level.saturating_sub(1)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Feedback ===
    /// Vibrate on pickups and crashes
    pub haptics: bool,
    /// Draw fading trails for active currents
    pub current_trails: bool,

    // === Controls ===
    /// Multiplier on drawn stroke length (0.5 - 2.0)
    pub stroke_sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,

            haptics: true,
            current_trails: true,

            stroke_sensitivity: 1.0,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "current_dive_settings";

    /// Clamp values that may have been edited out of range
    pub fn sanitize(&mut self) {
        self.master_volume = sanitize_unit(self.master_volume, 0.8);
        self.sfx_volume = sanitize_unit(self.sfx_volume, 1.0);
        self.music_volume = sanitize_unit(self.music_volume, 0.7);
        self.stroke_sensitivity = if self.stroke_sensitivity.is_finite() {
            self.stroke_sensitivity.clamp(0.5, 2.0)
        } else {
            1.0
        };
    }

    /// Difficulty for one session: a recognized override wins, otherwise the
    /// stored preference. The stored preference is never changed.
    pub fn session_difficulty(&self, requested: Option<&str>) -> Difficulty {
        match requested {
            Some(name) => Difficulty::from_str(name).unwrap_or_else(|| {
                log::warn!("Unknown difficulty {:?}, keeping {}", name, self.difficulty.as_str());
                self.difficulty
            }),
            None => self.difficulty,
        }
    }

    /// Stretch a drawn stroke about its start point by the sensitivity
    pub fn scale_stroke(&self, stroke: Stroke) -> Stroke {
        Stroke {
            from: stroke.from,
            to: stroke.from + (stroke.to - stroke.from) * self.stroke_sensitivity,
        }
    }

    /// Effective sound effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    /// Load settings, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut settings: Self = load_or_default(store, Self::STORAGE_KEY);
        settings.sanitize();
        settings
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)
    }
}

fn sanitize_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("brutal"), None);
        assert_eq!(Difficulty::Easy.as_str(), "Easy");
    }

    #[test]
    fn test_difficulty_grows_with_level() {
        assert_eq!(Difficulty::Easy.difficulty_for_level(1), 0);
        assert_eq!(Difficulty::Normal.difficulty_for_level(4), 5);
        assert_eq!(Difficulty::Hard.difficulty_for_level(0), 5);
    }

    #[test]
    fn test_load_clamps_out_of_range() {
        let mut store = MemoryStore::new();
        store
            .set(
                Settings::STORAGE_KEY,
                r#"{ "master_volume": 3.0, "stroke_sensitivity": 0.1, "difficulty": "Hard" }"#,
            )
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.stroke_sensitivity, 0.5);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(settings.haptics);
    }

    #[test]
    fn test_session_difficulty_leaves_saved_preference() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Easy,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded.session_difficulty(Some("hard")), Difficulty::Hard);
        assert_eq!(loaded.session_difficulty(Some("brutal")), Difficulty::Easy);
        assert_eq!(loaded.session_difficulty(None), Difficulty::Easy);

        loaded.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store).difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_scale_stroke() {
        let settings = Settings {
            stroke_sensitivity: 2.0,
            ..Settings::default()
        };
        let stroke = Stroke {
            from: glam::Vec2::new(10.0, 10.0),
            to: glam::Vec2::new(10.0, 40.0),
        };
        assert_eq!(settings.scale_stroke(stroke).to, glam::Vec2::new(10.0, 70.0));
        assert_eq!(Settings::default().scale_stroke(stroke), stroke);
    }

    #[test]
    fn test_effective_volumes() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            music_volume: 1.0,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.25);
        assert_eq!(settings.effective_music_volume(), 0.5);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Easy,
            haptics: false,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }
}
