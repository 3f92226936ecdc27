//! Session state and round-scoped bookkeeping
//!
//! `GameSession` is the single aggregate every system mutates. It carries no
//! platform handles, so the whole game can be driven from tests.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::entities::{CreatureKind, EntityLimits, EntityStore};
use crate::consts::*;
use crate::economy::{PurchaseError, SKINS};

/// Per-round state, reset at every round start
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundState {
    pub running: bool,
    pub time_remaining: u32,
    pub round_score: u64,
    pub caught: u32,
    pub combo: u32,
    pub combo_timer_ms: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            running: false,
            time_remaining: ROUND_LENGTH_SECS,
            round_score: 0,
            caught: 0,
            combo: 0,
            combo_timer_ms: 0,
        }
    }
}

impl RoundState {
    /// Fresh, running round
    pub fn begin() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }
}

/// Balances that outlive a round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Balances {
    /// Cumulative score, spendable in the shop
    pub score: u64,
    /// Highest cumulative score ever held
    pub high_score: u64,
    /// Fee tokens (XAN)
    pub tokens: u64,
}

impl Balances {
    /// Add score, raising the high score with it
    pub fn credit(&mut self, points: u64) {
        self.score += points;
        self.high_score = self.high_score.max(self.score);
    }
}

/// Things that happened during a state transition, drained by the round controller
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted,
    RoundEnded { round_score: u64, caught: u32 },
    Spawned { id: u32, kind: CreatureKind },
    Expired { id: u32 },
    Caught { id: u32, points: u64, combo: u32 },
    /// Catch made while the streak was already above the cue threshold
    ComboStreak { combo: u32 },
    Purchased { item: String },
    Rejected(PurchaseError),
}

/// Complete game session (everything the systems read or write)
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    pub seed: u64,
    pub balances: Balances,
    /// Index into `SKINS`
    pub equipped_skin: usize,
    /// Fee tokens charged per shop purchase (0 = fee-less shop)
    pub purchase_fee: u64,
    pub round: RoundState,
    pub entities: EntityStore,
    #[serde(skip)]
    pub rng: Pcg32,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a new session with the given seed
    pub fn new(seed: u64, limits: EntityLimits, purchase_fee: u64) -> Self {
        Self {
            seed,
            balances: Balances::default(),
            equipped_skin: 0,
            purchase_fee,
            round: RoundState::default(),
            entities: EntityStore::new(limits),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Score multiplier of the equipped skin
    pub fn skin_multiplier(&self) -> f64 {
        SKINS
            .get(self.equipped_skin)
            .map(|s| s.multiplier)
            .unwrap_or(1.0)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_raises_high_score() {
        let mut balances = Balances {
            score: 10,
            high_score: 12,
            tokens: 0,
        };
        balances.credit(1);
        assert_eq!(balances.high_score, 12);
        balances.credit(5);
        assert_eq!(balances.score, 16);
        assert_eq!(balances.high_score, 16);
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new(7, EntityLimits::default(), DEFAULT_PURCHASE_FEE);
        assert!(!session.round.running);
        assert_eq!(session.round.time_remaining, ROUND_LENGTH_SECS);
        assert_eq!(session.skin_multiplier(), 1.0);
    }
}
