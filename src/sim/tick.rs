//! Fixed-period round tick
//!
//! One call per clock period while a round runs. The clock itself is owned by
//! the round controller; this module only defines what a tick does.

use rand::Rng;

use super::spawner::spawn_creature;
use super::state::{GameEvent, GameSession, RoundState};
use crate::consts::*;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No round running; nothing happened
    Idle,
    /// Round advanced one period
    Advanced { spawned: u32 },
    /// Time ran out; the round has been finished
    TimeUp,
    /// Tick came from a clock that is no longer armed
    Stale,
}

/// Reset round-scoped state and start running
pub fn begin_round(session: &mut GameSession) {
    session.round = RoundState::begin();
    session.entities.clear();
    session.emit(GameEvent::RoundStarted);
    log::info!("Round started ({}s)", ROUND_LENGTH_SECS);
}

/// Stop the round. Returns false if it was not running.
///
/// Persistent balances, the equipped skin and the entities on the field are left as-is.
pub fn finish_round(session: &mut GameSession) -> bool {
    if !session.round.running {
        return false;
    }
    session.round.running = false;
    session.emit(GameEvent::RoundEnded {
        round_score: session.round.round_score,
        caught: session.round.caught,
    });
    log::info!(
        "Round over: {} points, {} caught",
        session.round.round_score,
        session.round.caught
    );
    true
}

/// Advance the session by one clock period
pub fn tick(session: &mut GameSession) -> TickOutcome {
    if !session.round.running {
        return TickOutcome::Idle;
    }

    // 1. Round clock
    session.round.time_remaining = session.round.time_remaining.saturating_sub(1);
    if session.round.time_remaining == 0 {
        finish_round(session);
        return TickOutcome::TimeUp;
    }

    // 2. Age everything on the field
    for id in session.entities.age_and_prune(TICK_PERIOD_MS) {
        session.emit(GameEvent::Expired { id });
    }

    // 3. Combo window
    session.round.combo_timer_ms = session.round.combo_timer_ms.saturating_sub(TICK_PERIOD_MS);
    if session.round.combo_timer_ms == 0 {
        session.round.combo = 0;
    }

    // 4. One guaranteed spawn, maybe a second
    let mut spawned = 0;
    if spawn_creature(session).is_some() {
        spawned += 1;
    }
    if session.rng.random_bool(SECOND_SPAWN_CHANCE) && spawn_creature(session).is_some() {
        spawned += 1;
    }

    TickOutcome::Advanced { spawned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{
        ActivePowerUp, Creature, CreatureKind, EntityLimits, OverflowPolicy, PowerUpEffect,
        creature_area_max,
    };
    use glam::Vec2;
    use proptest::prelude::*;

    fn running_session(seed: u64) -> GameSession {
        let mut session = GameSession::new(seed, EntityLimits::default(), DEFAULT_PURCHASE_FEE);
        begin_round(&mut session);
        session
    }

    #[test]
    fn test_tick_idle_without_round() {
        let mut session = GameSession::new(1, EntityLimits::default(), DEFAULT_PURCHASE_FEE);
        assert_eq!(tick(&mut session), TickOutcome::Idle);
        assert_eq!(session.round.time_remaining, ROUND_LENGTH_SECS);
        assert!(session.entities.creatures.is_empty());
    }

    #[test]
    fn test_tick_spawns_one_or_two() {
        let mut session = running_session(12345);
        for _ in 0..20 {
            let before = session.entities.creatures.len();
            match tick(&mut session) {
                TickOutcome::Advanced { spawned } => {
                    assert!((1..=2).contains(&spawned));
                    assert!(session.entities.creatures.len() <= before + 2);
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[test]
    fn test_round_ends_after_sixty_ticks() {
        let mut session = running_session(99);
        for _ in 0..ROUND_LENGTH_SECS - 1 {
            assert!(matches!(tick(&mut session), TickOutcome::Advanced { .. }));
        }
        let creatures_before = session.entities.creatures.clone();

        assert_eq!(tick(&mut session), TickOutcome::TimeUp);
        assert!(!session.round.running);
        assert_eq!(session.round.time_remaining, 0);
        // Remaining steps are skipped on the final tick
        assert_eq!(session.entities.creatures, creatures_before);
        assert!(session.events.iter().any(|e| matches!(e, GameEvent::RoundEnded { .. })));

        assert_eq!(tick(&mut session), TickOutcome::Idle);
    }

    #[test]
    fn test_combo_resets_when_window_closes() {
        let mut session = running_session(3);
        session.round.combo = 4;
        session.round.combo_timer_ms = COMBO_WINDOW_MS;

        tick(&mut session);
        tick(&mut session);
        assert_eq!(session.round.combo, 4);
        tick(&mut session);
        assert_eq!(session.round.combo, 0);
        assert_eq!(session.round.combo_timer_ms, 0);
    }

    #[test]
    fn test_begin_round_clears_leftovers() {
        let mut session = running_session(5);
        for _ in 0..5 {
            tick(&mut session);
        }
        session.round.round_score = 40;
        session.round.caught = 7;
        session.round.combo = 3;
        session.entities.add_power_up(ActivePowerUp {
            name: "Magnet".into(),
            effect: PowerUpEffect::Magnet,
            remaining_ms: 15_000,
        });
        finish_round(&mut session);
        assert!(!session.entities.creatures.is_empty());

        begin_round(&mut session);
        assert!(session.round.running);
        assert_eq!(session.round.round_score, 0);
        assert_eq!(session.round.caught, 0);
        assert_eq!(session.round.combo, 0);
        assert_eq!(session.round.time_remaining, ROUND_LENGTH_SECS);
        assert!(session.entities.creatures.is_empty());
        assert!(session.entities.particles.is_empty());
        assert!(session.entities.power_ups.is_empty());
    }

    #[test]
    fn test_finish_round_is_idempotent() {
        let mut session = running_session(8);
        assert!(finish_round(&mut session));
        let events = session.drain_events().len();
        assert!(events > 0);
        assert!(!finish_round(&mut session));
        assert!(session.events.is_empty());
    }

    #[test]
    fn test_tick_respects_skip_spawn_cap() {
        let limits = EntityLimits {
            max_creatures: 3,
            max_particles: 8,
            overflow: OverflowPolicy::SkipSpawn,
        };
        let mut session = GameSession::new(77, limits, DEFAULT_PURCHASE_FEE);
        begin_round(&mut session);
        for _ in 0..10 {
            tick(&mut session);
            assert!(session.entities.creatures.len() <= 3);
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = running_session(4242);
        let mut b = running_session(4242);
        for _ in 0..30 {
            assert_eq!(tick(&mut a), tick(&mut b));
        }
        assert_eq!(a.entities.creatures, b.entities.creatures);
    }

    proptest! {
        #[test]
        fn prop_creatures_stay_in_bounds(
            seed in any::<u64>(),
            x in -100.0f32..900.0,
            y in -100.0f32..700.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            ticks in 1usize..40,
        ) {
            let mut session = running_session(seed);
            let id = session.entities.next_entity_id();
            session.entities.add_creature(
                Creature::new(id, CreatureKind::Common, Vec2::new(x, y), Vec2::new(vx, vy)),
            );
            let max = creature_area_max();
            for _ in 0..ticks {
                tick(&mut session);
                for c in &session.entities.creatures {
                    prop_assert!(c.pos.x >= 0.0 && c.pos.x <= max.x);
                    prop_assert!(c.pos.y >= 0.0 && c.pos.y <= max.y);
                }
            }
        }

        #[test]
        fn prop_life_strictly_decreases_until_removed(seed in any::<u64>(), ticks in 1usize..20) {
            let mut session = running_session(seed);
            for _ in 0..ticks {
                let before: Vec<(u32, u32)> =
                    session.entities.creatures.iter().map(|c| (c.id, c.life_ms)).collect();
                if tick(&mut session) == TickOutcome::TimeUp {
                    break;
                }
                for (id, life) in before {
                    match session.entities.creature(id) {
                        Some(c) => prop_assert!(c.life_ms < life && c.life_ms > 0),
                        None => prop_assert!(life <= TICK_PERIOD_MS),
                    }
                }
            }
        }
    }
}
