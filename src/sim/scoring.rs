//! Catch resolution and score multipliers

use glam::Vec2;
use rand::Rng;

use super::entities::{CreatureKind, Particle, PowerUpEffect};
use super::state::{GameEvent, GameSession};
use crate::consts::*;

/// Streak multiplier for a combo count (the count before the current catch)
pub fn combo_multiplier(combo: u32) -> f64 {
    (1.0 + combo as f64 * COMBO_STEP).min(COMBO_MULTIPLIER_CAP)
}

/// Points for one catch. Multipliers apply left to right, then floor.
pub fn catch_points(
    kind: CreatureKind,
    skin_multiplier: f64,
    combo: u32,
    double_points: bool,
) -> u64 {
    let power_up = if double_points { 2.0 } else { 1.0 };
    let total = kind.points() as f64 * skin_multiplier * combo_multiplier(combo) * power_up;
    total.floor() as u64
}

/// Result of a successful catch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchOutcome {
    pub points: u64,
    /// Combo count after this catch
    pub combo: u32,
}

/// Resolve a catch on creature `id`.
///
/// Missing ids (already expired or caught) are ignored and return `None`.
/// Creatures left frozen on the field after a round ends can still be caught.
pub fn catch_creature(session: &mut GameSession, id: u32) -> Option<CatchOutcome> {
    let creature = session.entities.remove_creature(id)?;

    let prior_combo = session.round.combo;
    let points = catch_points(
        creature.kind,
        session.skin_multiplier(),
        prior_combo,
        session.entities.has_effect(PowerUpEffect::DoublePoints),
    );

    session.balances.credit(points);
    let round = &mut session.round;
    round.round_score += points;
    round.caught += 1;
    round.combo += 1;
    round.combo_timer_ms = COMBO_WINDOW_MS;
    let combo = round.combo;

    spawn_score_burst(session, creature.center(), points);

    session.emit(GameEvent::Caught { id, points, combo });
    if prior_combo > COMBO_CUE_THRESHOLD {
        session.emit(GameEvent::ComboStreak { combo });
    }
    log::debug!("Caught #{} ({:?}) for {} points, combo {}", id, creature.kind, points, combo);

    Some(CatchOutcome { points, combo })
}

/// Emit the fixed-size particle burst showing `points` at `origin`
fn spawn_score_burst(session: &mut GameSession, origin: Vec2, points: u64) {
    let half = PARTICLE_SPREAD / 2.0;
    let mut burst = Vec::with_capacity(PARTICLE_BURST);
    for _ in 0..PARTICLE_BURST {
        let id = session.entities.next_entity_id();
        let vel = Vec2::new(
            session.rng.random_range(-half..=half),
            session.rng.random_range(-half..=half) - PARTICLE_LIFT,
        );
        burst.push(Particle {
            id,
            pos: origin,
            vel,
            life_ms: PARTICLE_LIFETIME_MS,
            points,
        });
    }
    session.entities.add_particles(burst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{ActivePowerUp, Creature, EntityLimits};
    use crate::sim::tick::begin_round;
    use proptest::prelude::*;

    fn session_with(kind: CreatureKind) -> (GameSession, u32) {
        let mut session = GameSession::new(11, EntityLimits::default(), DEFAULT_PURCHASE_FEE);
        begin_round(&mut session);
        let id = session.entities.next_entity_id();
        session
            .entities
            .add_creature(Creature::new(id, kind, Vec2::new(100.0, 200.0), Vec2::ZERO));
        (session, id)
    }

    #[test]
    fn test_points_example() {
        // Gold skin (1.5x), combo 5 before the catch (1.5x), no power-up
        assert_eq!(catch_points(CreatureKind::Common, 1.5, 5, false), 2);
    }

    #[test]
    fn test_points_with_double_points() {
        assert_eq!(catch_points(CreatureKind::Rainbow, 1.0, 0, true), 20);
        assert_eq!(catch_points(CreatureKind::Golden, 1.2, 2, true), 14);
    }

    #[test]
    fn test_combo_multiplier_clamped() {
        assert_eq!(combo_multiplier(0), 1.0);
        assert_eq!(combo_multiplier(20), 3.0);
        assert_eq!(combo_multiplier(50), 3.0);
        assert_eq!(combo_multiplier(u32::MAX), 3.0);
    }

    #[test]
    fn test_catch_updates_score_and_combo() {
        let (mut session, id) = session_with(CreatureKind::Golden);
        let outcome = catch_creature(&mut session, id).unwrap();

        assert_eq!(outcome, CatchOutcome { points: 5, combo: 1 });
        assert_eq!(session.balances.score, 5);
        assert_eq!(session.balances.high_score, 5);
        assert_eq!(session.round.round_score, 5);
        assert_eq!(session.round.caught, 1);
        assert_eq!(session.round.combo_timer_ms, COMBO_WINDOW_MS);
        assert!(session.entities.creature(id).is_none());

        assert_eq!(session.entities.particles.len(), PARTICLE_BURST);
        for p in &session.entities.particles {
            assert_eq!(p.points, 5);
            assert_eq!(p.pos, Vec2::new(125.0, 225.0));
        }
    }

    #[test]
    fn test_double_catch_is_noop() {
        let (mut session, id) = session_with(CreatureKind::Common);
        assert!(catch_creature(&mut session, id).is_some());
        let balances = session.balances.clone();
        let round = session.round.clone();

        assert_eq!(catch_creature(&mut session, id), None);
        assert_eq!(session.balances, balances);
        assert_eq!(session.round, round);
    }

    #[test]
    fn test_leftover_creature_catchable_after_round_end() {
        let (mut session, id) = session_with(CreatureKind::Rainbow);
        crate::sim::tick::finish_round(&mut session);
        assert!(session.entities.creature(id).is_some());

        let outcome = catch_creature(&mut session, id);
        assert_eq!(outcome, Some(CatchOutcome { points: 10, combo: 1 }));
        assert_eq!(session.balances.score, 10);
        assert!(session.entities.creature(id).is_none());
        assert!(!session.round.running);
    }

    #[test]
    fn test_power_up_doubles_points() {
        let (mut session, id) = session_with(CreatureKind::Common);
        session.entities.add_power_up(ActivePowerUp {
            name: "Double Points".into(),
            effect: PowerUpEffect::DoublePoints,
            remaining_ms: 10_000,
        });
        // A second instance does not stack
        session.entities.add_power_up(ActivePowerUp {
            name: "Double Points".into(),
            effect: PowerUpEffect::DoublePoints,
            remaining_ms: 10_000,
        });
        assert_eq!(catch_creature(&mut session, id).unwrap().points, 2);
    }

    #[test]
    fn test_combo_cue_after_streak() {
        let (mut session, _) = session_with(CreatureKind::Common);
        session.round.combo = 3;
        let id = session.entities.next_entity_id();
        session
            .entities
            .add_creature(Creature::new(id, CreatureKind::Common, Vec2::ZERO, Vec2::ZERO));
        catch_creature(&mut session, id);
        assert!(session.events.contains(&GameEvent::ComboStreak { combo: 4 }));
    }

    proptest! {
        #[test]
        fn prop_combo_multiplier_monotonic(a in 0u32..1000, b in 0u32..1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(combo_multiplier(lo) <= combo_multiplier(hi));
            prop_assert!(combo_multiplier(hi) <= COMBO_MULTIPLIER_CAP);
        }
    }
}
