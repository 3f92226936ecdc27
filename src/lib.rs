//! Shrimp Catch - a timed clicker round with a cosmetic shop and a mock token economy
//!
//! Core modules:
//! - `sim`: Round simulation (entities, spawning, tick, scoring)
//! - `economy`: Shop catalogs and the purchase gate
//! - `round`: Round lifecycle, clock ownership, persistence and audio dispatch
//! - `wallet`: Mock crypto wallet and NFT marketplace
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `platform`: Browser interval driver

pub mod audio;
pub mod economy;
pub mod highscores;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod round;
pub mod settings;
pub mod sim;
pub mod wallet;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use round::RoundController;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const GAME_AREA_WIDTH: f32 = 800.0;
    pub const GAME_AREA_HEIGHT: f32 = 600.0;
    /// Sprite box every creature is clamped with, regardless of drawn size
    pub const CREATURE_BOX: f32 = 50.0;

    /// Clock period of the round driver
    pub const TICK_PERIOD_MS: u32 = 1000;
    /// Round length in ticks (seconds)
    pub const ROUND_LENGTH_SECS: u32 = 60;

    /// Creature lifetime from spawn
    pub const CREATURE_LIFETIME_MS: u32 = 3000;
    /// Chance a spawn rolls one of the rare kinds (split evenly between them)
    pub const RARE_CHANCE: f64 = 0.1;
    /// Chance of a second spawn on each tick (the first is guaranteed)
    pub const SECOND_SPAWN_CHANCE: f64 = 0.75;

    /// Particles emitted per catch
    pub const PARTICLE_BURST: usize = 5;
    pub const PARTICLE_LIFETIME_MS: u32 = 1000;
    /// Particle velocity spread per axis (pixels/tick)
    pub const PARTICLE_SPREAD: f32 = 4.0;
    /// Upward bias applied to particle vertical velocity
    pub const PARTICLE_LIFT: f32 = 2.0;

    /// Combo window refreshed by every catch
    pub const COMBO_WINDOW_MS: u32 = 3000;
    /// Multiplier gained per combo step
    pub const COMBO_STEP: f64 = 0.1;
    pub const COMBO_MULTIPLIER_CAP: f64 = 3.0;
    /// Combo count (before the catch) above which the combo cue plays
    pub const COMBO_CUE_THRESHOLD: u32 = 2;

    /// Score spent per fee token on conversion
    pub const SCORE_PER_TOKEN: u64 = 5;
    /// Fee tokens charged per shop purchase (0 disables the fee)
    pub const DEFAULT_PURCHASE_FEE: u64 = 1;

    /// Default caps on live entities
    pub const DEFAULT_MAX_CREATURES: usize = 64;
    pub const DEFAULT_MAX_PARTICLES: usize = 256;
}
