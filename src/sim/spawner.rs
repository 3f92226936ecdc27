//! Creature spawning
//!
//! Answers "produce one creature" on request. How often to ask is the tick's call.

use glam::Vec2;
use rand::Rng;

use super::entities::{Creature, CreatureKind, creature_area_max};
use super::state::{GameEvent, GameSession};
use crate::consts::RARE_CHANCE;

/// Draw a creature category: mostly common, rare kinds split evenly
pub fn roll_kind<R: Rng + ?Sized>(rng: &mut R) -> CreatureKind {
    if rng.random_bool(RARE_CHANCE) {
        if rng.random_bool(0.5) {
            CreatureKind::Golden
        } else {
            CreatureKind::Rainbow
        }
    } else {
        CreatureKind::Common
    }
}

/// Build a creature of `kind` at a random position with a random drift
pub fn random_creature<R: Rng + ?Sized>(rng: &mut R, id: u32, kind: CreatureKind) -> Creature {
    let max = creature_area_max();
    let pos = Vec2::new(rng.random_range(0.0..=max.x), rng.random_range(0.0..=max.y));
    let half = kind.speed() / 2.0;
    let vel = Vec2::new(
        rng.random_range(-half..=half),
        rng.random_range(-half..=half),
    );
    Creature::new(id, kind, pos, vel)
}

/// Spawn one creature into the session. No-op unless a round is running.
///
/// Returns the new creature's id if it was added.
pub fn spawn_creature(session: &mut GameSession) -> Option<u32> {
    if !session.round.running {
        return None;
    }

    let kind = roll_kind(&mut session.rng);
    let id = session.entities.next_entity_id();
    let creature = random_creature(&mut session.rng, id, kind);

    if session.entities.add_creature(creature) {
        session.emit(GameEvent::Spawned { id, kind });
        Some(id)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entities::EntityLimits;
    use crate::sim::state::RoundState;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_requires_running_round() {
        let mut session = GameSession::new(1, EntityLimits::default(), DEFAULT_PURCHASE_FEE);
        assert_eq!(spawn_creature(&mut session), None);
        assert!(session.entities.creatures.is_empty());

        session.round = RoundState::begin();
        let id = spawn_creature(&mut session).unwrap();
        assert!(session.entities.creature(id).is_some());
    }

    #[test]
    fn test_spawned_creature_within_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let max = creature_area_max();
        for id in 0..500 {
            let kind = roll_kind(&mut rng);
            let c = random_creature(&mut rng, id, kind);
            assert!(c.pos.x >= 0.0 && c.pos.x <= max.x);
            assert!(c.pos.y >= 0.0 && c.pos.y <= max.y);
            let half = kind.speed() / 2.0;
            assert!(c.vel.x.abs() <= half && c.vel.y.abs() <= half);
            assert_eq!(c.life_ms, CREATURE_LIFETIME_MS);
        }
    }

    #[test]
    fn test_kind_distribution() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let draws = 20_000;
        let mut counts = [0u32; 3];
        for _ in 0..draws {
            match roll_kind(&mut rng) {
                CreatureKind::Common => counts[0] += 1,
                CreatureKind::Golden => counts[1] += 1,
                CreatureKind::Rainbow => counts[2] += 1,
            }
        }
        let common = counts[0] as f64 / draws as f64;
        assert!((common - 0.9).abs() < 0.02, "common share {}", common);
        let golden = counts[1] as f64 / draws as f64;
        let rainbow = counts[2] as f64 / draws as f64;
        assert!((golden - 0.05).abs() < 0.015);
        assert!((rainbow - 0.05).abs() < 0.015);
    }
}
