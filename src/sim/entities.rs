//! Live entity collections for the current round
//!
//! Creatures, particles and active power-ups. Everything here is plain data
//! plus the per-tick aging rule; no randomness and no scoring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Creature categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Common,
    Golden,
    Rainbow,
}

impl CreatureKind {
    pub const ALL: [CreatureKind; 3] = [Self::Common, Self::Golden, Self::Rainbow];

    /// Base points awarded for a catch
    pub fn points(self) -> u64 {
        match self {
            CreatureKind::Common => 1,
            CreatureKind::Golden => 5,
            CreatureKind::Rainbow => 10,
        }
    }

    /// Drawn size in pixels
    pub fn size(self) -> f32 {
        match self {
            CreatureKind::Common => 30.0,
            CreatureKind::Golden => 35.0,
            CreatureKind::Rainbow => 40.0,
        }
    }

    /// Speed scale; velocity components are drawn from [-speed/2, speed/2]
    pub fn speed(self) -> f32 {
        match self {
            CreatureKind::Common => 2.0,
            CreatureKind::Golden => 1.5,
            CreatureKind::Rainbow => 1.0,
        }
    }

    pub fn is_rare(self) -> bool {
        !matches!(self, CreatureKind::Common)
    }

    pub fn color(self) -> &'static str {
        match self {
            CreatureKind::Common => "#FF8A65",
            CreatureKind::Golden => "#FFD54F",
            CreatureKind::Rainbow => "#CE93D8",
        }
    }

    pub fn info(self) -> KindInfo {
        KindInfo {
            kind: self,
            points: self.points(),
            size: self.size(),
            speed: self.speed(),
            rare: self.is_rare(),
            color: self.color(),
        }
    }
}

/// Per-category table row for presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KindInfo {
    pub kind: CreatureKind,
    pub points: u64,
    pub size: f32,
    pub speed: f32,
    pub rare: bool,
    pub color: &'static str,
}

/// Rows for every category, in `CreatureKind::ALL` order
pub fn kind_table() -> Vec<KindInfo> {
    CreatureKind::ALL.iter().map(|k| k.info()).collect()
}

/// Upper-left bound of the area a creature box may occupy
#[inline]
pub fn creature_area_max() -> Vec2 {
    Vec2::new(GAME_AREA_WIDTH - CREATURE_BOX, GAME_AREA_HEIGHT - CREATURE_BOX)
}

/// A catchable creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub kind: CreatureKind,
    /// Top-left of the sprite box
    pub pos: Vec2,
    /// Displacement per tick (constant for the creature's lifetime)
    pub vel: Vec2,
    pub life_ms: u32,
}

impl Creature {
    pub fn new(id: u32, kind: CreatureKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos: pos.clamp(Vec2::ZERO, creature_area_max()),
            vel,
            life_ms: CREATURE_LIFETIME_MS,
        }
    }

    /// Move one tick and age by `dt_ms`, staying inside the playfield
    pub fn advance(&mut self, dt_ms: u32) {
        self.pos = (self.pos + self.vel).clamp(Vec2::ZERO, creature_area_max());
        self.life_ms = self.life_ms.saturating_sub(dt_ms);
    }

    /// Center of the sprite box
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(CREATURE_BOX / 2.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life_ms > 0
    }
}

/// Floating score feedback spawned by a catch (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub life_ms: u32,
    /// Points shown by the particle
    pub points: u64,
}

impl Particle {
    pub fn advance(&mut self, dt_ms: u32) {
        self.pos += self.vel;
        self.life_ms = self.life_ms.saturating_sub(dt_ms);
    }

    /// Fade factor in [0, 1]
    pub fn opacity(&self) -> f32 {
        (self.life_ms as f32 / PARTICLE_LIFETIME_MS as f32).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life_ms > 0
    }
}

/// Power-up effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpEffect {
    DoublePoints,
    SpeedBoost,
    Magnet,
}

/// A purchased power-up that is currently running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub name: String,
    pub effect: PowerUpEffect,
    pub remaining_ms: u32,
}

impl ActivePowerUp {
    pub fn is_alive(&self) -> bool {
        self.remaining_ms > 0
    }
}

/// What to do when a collection is at its cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Evict the oldest entries to make room
    #[default]
    DropOldest,
    /// Refuse the new entries
    SkipSpawn,
}

/// Caps on concurrently live entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLimits {
    pub max_creatures: usize,
    pub max_particles: usize,
    pub overflow: OverflowPolicy,
}

impl Default for EntityLimits {
    fn default() -> Self {
        Self {
            max_creatures: DEFAULT_MAX_CREATURES,
            max_particles: DEFAULT_MAX_PARTICLES,
            overflow: OverflowPolicy::DropOldest,
        }
    }
}

/// Authoritative entity collections (each sorted by id, oldest first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub creatures: Vec<Creature>,
    pub particles: Vec<Particle>,
    pub power_ups: Vec<ActivePowerUp>,
    pub limits: EntityLimits,
    /// Never reset, so ids from an earlier round cannot alias new entities
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(EntityLimits::default())
    }
}

impl EntityStore {
    pub fn new(limits: EntityLimits) -> Self {
        Self {
            creatures: Vec::new(),
            particles: Vec::new(),
            power_ups: Vec::new(),
            limits,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a creature. Returns false if the cap refused it.
    pub fn add_creature(&mut self, creature: Creature) -> bool {
        let cap = self.limits.max_creatures;
        if self.creatures.len() >= cap {
            match self.limits.overflow {
                OverflowPolicy::SkipSpawn => {
                    log::debug!("Creature cap ({}) reached, spawn skipped", cap);
                    return false;
                }
                OverflowPolicy::DropOldest => {
                    if cap == 0 {
                        return false;
                    }
                    let excess = self.creatures.len() + 1 - cap;
                    self.creatures.drain(..excess);
                }
            }
        }
        self.creatures.push(creature);
        true
    }

    /// Add a batch of particles. Returns how many were kept.
    pub fn add_particles(&mut self, particles: impl IntoIterator<Item = Particle>) -> usize {
        let cap = self.limits.max_particles;
        let mut added = 0;
        for particle in particles {
            if self.particles.len() >= cap {
                match self.limits.overflow {
                    OverflowPolicy::SkipSpawn => break,
                    OverflowPolicy::DropOldest => {
                        if cap == 0 {
                            break;
                        }
                        self.particles.remove(0);
                    }
                }
            }
            self.particles.push(particle);
            added += 1;
        }
        added
    }

    pub fn add_power_up(&mut self, power_up: ActivePowerUp) {
        self.power_ups.push(power_up);
    }

    /// Advance every collection by `dt_ms` and drop whatever has run out.
    ///
    /// Returns the ids of creatures that expired.
    pub fn age_and_prune(&mut self, dt_ms: u32) -> Vec<u32> {
        let mut expired = Vec::new();
        self.creatures.retain_mut(|c| {
            c.advance(dt_ms);
            if !c.is_alive() {
                expired.push(c.id);
            }
            c.is_alive()
        });

        self.particles.retain_mut(|p| {
            p.advance(dt_ms);
            p.is_alive()
        });

        self.power_ups.retain_mut(|p| {
            p.remaining_ms = p.remaining_ms.saturating_sub(dt_ms);
            p.is_alive()
        });

        expired
    }

    pub fn creature(&self, id: u32) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    /// Remove a creature; absent ids are not an error
    pub fn remove_creature(&mut self, id: u32) -> Option<Creature> {
        let idx = self.creatures.iter().position(|c| c.id == id)?;
        Some(self.creatures.remove(idx))
    }

    /// Whether any active power-up has the given effect
    pub fn has_effect(&self, effect: PowerUpEffect) -> bool {
        self.power_ups.iter().any(|p| p.effect == effect)
    }

    /// Drop every live entity (the id counter keeps running)
    pub fn clear(&mut self) {
        self.creatures.clear();
        self.particles.clear();
        self.power_ups.clear();
    }
}
