//! Round simulation module
//!
//! All gameplay state transitions live here:
//! - Seeded RNG only
//! - Fixed clock period
//! - Stable iteration order (by entity ID)
//! - No platform, storage or audio dependencies

pub mod entities;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use entities::{
    ActivePowerUp, Creature, CreatureKind, EntityLimits, EntityStore, KindInfo, OverflowPolicy,
    Particle, PowerUpEffect, kind_table,
};
pub use scoring::{CatchOutcome, catch_creature, catch_points, combo_multiplier};
pub use spawner::{roll_kind, spawn_creature};
pub use state::{Balances, GameEvent, GameSession, RoundState};
pub use tick::{TickOutcome, begin_round, finish_round, tick};
