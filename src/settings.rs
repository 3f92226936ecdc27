//! Game settings and preferences
//!
//! Persisted separately from progress under its own key.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, keys, load_json, store_json};
use crate::sim::{EntityLimits, OverflowPolicy};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Background music during rounds
    pub music: bool,

    // === Economy ===
    /// Fee tokens charged per shop purchase; 0 turns the fee off
    pub purchase_fee: u64,

    // === Entity caps ===
    pub max_creatures: usize,
    pub max_particles: usize,
    pub overflow: OverflowPolicy,

    /// Fixed RNG seed (otherwise seeded from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music: true,

            purchase_fee: DEFAULT_PURCHASE_FEE,

            max_creatures: DEFAULT_MAX_CREATURES,
            max_particles: DEFAULT_MAX_PARTICLES,
            overflow: OverflowPolicy::DropOldest,

            seed: None,
        }
    }
}

impl Settings {
    /// Caps handed to the entity store
    pub fn limits(&self) -> EntityLimits {
        EntityLimits {
            max_creatures: self.max_creatures,
            max_particles: self.max_particles,
            overflow: self.overflow,
        }
    }

    /// Clamp volumes into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Effective sound effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted || !self.music {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        let settings: Settings = load_json(store, keys::SETTINGS);
        log::info!(
            "Settings loaded (fee {}, caps {}/{})",
            settings.purchase_fee,
            settings.max_creatures,
            settings.max_particles
        );
        settings.sanitized()
    }

    /// Save settings
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match store_json(store, keys::SETTINGS, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            purchase_fee: 0,
            overflow: OverflowPolicy::SkipSpawn,
            seed: Some(9),
            ..Settings::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut store = MemoryStore::new();
        store.set(keys::SETTINGS, r#"{"muted":true,"master_volume":4.0}"#).unwrap();
        let settings = Settings::load(&store);
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.purchase_fee, DEFAULT_PURCHASE_FEE);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_limits() {
        let limits = Settings::default().limits();
        assert_eq!(limits, EntityLimits::default());
    }
}
