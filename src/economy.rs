//! Shop catalogs and the purchase gate
//!
//! Every spend of score or fee tokens goes through [`purchase`]. The same
//! [`quote`] check backs both enforcement and the shop's enabled/disabled state.

use serde::Serialize;
use thiserror::Error;

use crate::consts::SCORE_PER_TOKEN;
use crate::sim::{ActivePowerUp, GameEvent, GameSession, PowerUpEffect};

/// A cosmetic skin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Skin {
    pub name: &'static str,
    pub cost: u64,
    pub multiplier: f64,
    pub color: &'static str,
}

/// Skin catalog; index 0 is the free starter skin
pub const SKINS: [Skin; 5] = [
    Skin { name: "Default", cost: 0, multiplier: 1.0, color: "#FF6B6B" },
    Skin { name: "Galaxy", cost: 50, multiplier: 1.2, color: "#4ECDC4" },
    Skin { name: "Gold", cost: 100, multiplier: 1.5, color: "#FFD93D" },
    Skin { name: "Pirate", cost: 150, multiplier: 2.0, color: "#6BCF7F" },
    Skin { name: "Diamond", cost: 300, multiplier: 2.5, color: "#A8E6CF" },
];

/// Look up a skin index by name
pub fn skin_index(name: &str) -> Option<usize> {
    SKINS.iter().position(|s| s.name == name)
}

/// A power-up on sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerUpOffer {
    pub name: &'static str,
    pub cost: u64,
    pub duration_ms: u32,
    pub effect: PowerUpEffect,
}

pub const POWER_UPS: [PowerUpOffer; 3] = [
    PowerUpOffer {
        name: "Double Points",
        cost: 20,
        duration_ms: 10_000,
        effect: PowerUpEffect::DoublePoints,
    },
    PowerUpOffer {
        name: "Speed Boost",
        cost: 30,
        duration_ms: 8_000,
        effect: PowerUpEffect::SpeedBoost,
    },
    PowerUpOffer {
        name: "Magnet",
        cost: 40,
        duration_ms: 15_000,
        effect: PowerUpEffect::Magnet,
    },
];

/// Something the player can spend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    /// Buy and equip `SKINS[i]`
    Skin(usize),
    /// Buy and activate `POWER_UPS[i]`
    PowerUp(usize),
    /// Convert score into this many fee tokens
    Convert(u64),
}

/// Why a purchase was refused. The message is shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("That skin is already equipped")]
    AlreadyEquipped,
    #[error("Not enough points! ({available} of {needed})")]
    InsufficientScore { needed: u64, available: u64 },
    #[error("Not enough XAN tokens for transaction fee! ({available} of {needed})")]
    InsufficientFee { needed: u64, available: u64 },
    #[error("No such item in the shop")]
    UnknownItem,
    #[error("Amount must be at least 1")]
    InvalidAmount,
}

/// Balance changes a purchase would make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub score_cost: u64,
    pub fee: u64,
    /// Fee tokens credited (conversions only)
    pub tokens_out: u64,
}

/// Validate `item` against the session without mutating anything
pub fn quote(session: &GameSession, item: Purchase) -> Result<Quote, PurchaseError> {
    let quote = match item {
        Purchase::Skin(i) => {
            let skin = SKINS.get(i).ok_or(PurchaseError::UnknownItem)?;
            if session.equipped_skin == i {
                return Err(PurchaseError::AlreadyEquipped);
            }
            Quote { score_cost: skin.cost, fee: session.purchase_fee, tokens_out: 0 }
        }
        Purchase::PowerUp(i) => {
            let offer = POWER_UPS.get(i).ok_or(PurchaseError::UnknownItem)?;
            Quote { score_cost: offer.cost, fee: session.purchase_fee, tokens_out: 0 }
        }
        Purchase::Convert(amount) => {
            if amount == 0 {
                return Err(PurchaseError::InvalidAmount);
            }
            let score_cost = amount
                .checked_mul(SCORE_PER_TOKEN)
                .ok_or(PurchaseError::InvalidAmount)?;
            Quote { score_cost, fee: 0, tokens_out: amount }
        }
    };

    let balances = &session.balances;
    if balances.score < quote.score_cost {
        return Err(PurchaseError::InsufficientScore {
            needed: quote.score_cost,
            available: balances.score,
        });
    }
    if balances.tokens < quote.fee {
        return Err(PurchaseError::InsufficientFee {
            needed: quote.fee,
            available: balances.tokens,
        });
    }
    Ok(quote)
}

/// Affordability predicate for the shop UI
pub fn can_afford(session: &GameSession, item: Purchase) -> bool {
    quote(session, item).is_ok()
}

/// Validate then apply a purchase. Nothing changes on error.
pub fn purchase(session: &mut GameSession, item: Purchase) -> Result<Quote, PurchaseError> {
    let quote = match quote(session, item) {
        Ok(q) => q,
        Err(e) => {
            log::debug!("Purchase {:?} rejected: {}", item, e);
            session.emit(GameEvent::Rejected(e.clone()));
            return Err(e);
        }
    };

    session.balances.score -= quote.score_cost;
    session.balances.tokens -= quote.fee;
    session.balances.tokens += quote.tokens_out;

    let label = match item {
        Purchase::Skin(i) => {
            session.equipped_skin = i;
            SKINS[i].name.to_string()
        }
        Purchase::PowerUp(i) => {
            let offer = POWER_UPS[i];
            session.entities.add_power_up(ActivePowerUp {
                name: offer.name.to_string(),
                effect: offer.effect,
                remaining_ms: offer.duration_ms,
            });
            offer.name.to_string()
        }
        Purchase::Convert(amount) => format!("{} XAN", amount),
    };

    log::info!("Purchased {} (-{} score, -{} XAN)", label, quote.score_cost, quote.fee);
    session.emit(GameEvent::Purchased { item: label });
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_PURCHASE_FEE;
    use crate::sim::EntityLimits;

    fn session(score: u64, tokens: u64) -> GameSession {
        let mut s = GameSession::new(1, EntityLimits::default(), DEFAULT_PURCHASE_FEE);
        s.balances.score = score;
        s.balances.tokens = tokens;
        s
    }

    #[test]
    fn test_skin_purchase_equips() {
        let mut s = session(120, 2);
        let gold = skin_index("Gold").unwrap();
        purchase(&mut s, Purchase::Skin(gold)).unwrap();

        assert_eq!(s.equipped_skin, gold);
        assert_eq!(s.balances.score, 20);
        assert_eq!(s.balances.tokens, 1);
        assert_eq!(s.skin_multiplier(), 1.5);
    }

    #[test]
    fn test_skin_rejected_when_short() {
        let mut s = session(40, 5);
        let err = purchase(&mut s, Purchase::Skin(1)).unwrap_err();
        assert_eq!(err, PurchaseError::InsufficientScore { needed: 50, available: 40 });
        assert_eq!(s.balances.score, 40);
        assert_eq!(s.balances.tokens, 5);
        assert_eq!(s.equipped_skin, 0);
    }

    #[test]
    fn test_score_shortfall_reported_before_fee() {
        let mut s = session(10, 0);
        let err = purchase(&mut s, Purchase::PowerUp(0)).unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientScore { .. }));

        let mut s = session(100, 0);
        let err = purchase(&mut s, Purchase::PowerUp(0)).unwrap_err();
        assert_eq!(err, PurchaseError::InsufficientFee { needed: 1, available: 0 });
        assert_eq!(s.balances.score, 100);
        assert!(s.entities.power_ups.is_empty());
    }

    #[test]
    fn test_equipped_skin_rejected() {
        let mut s = session(1000, 10);
        assert_eq!(purchase(&mut s, Purchase::Skin(0)), Err(PurchaseError::AlreadyEquipped));
        assert_eq!(s.balances.score, 1000);
        assert_eq!(s.balances.tokens, 10);
    }

    #[test]
    fn test_power_up_activates_with_full_duration() {
        let mut s = session(30, 1);
        purchase(&mut s, Purchase::PowerUp(0)).unwrap();
        assert_eq!(s.balances.score, 10);
        assert_eq!(s.balances.tokens, 0);
        assert_eq!(s.entities.power_ups.len(), 1);
        assert_eq!(s.entities.power_ups[0].remaining_ms, 10_000);
        assert!(s.entities.has_effect(PowerUpEffect::DoublePoints));
    }

    #[test]
    fn test_convert_exact_balance() {
        let mut s = session(25, 0);
        purchase(&mut s, Purchase::Convert(5)).unwrap();
        assert_eq!(s.balances.score, 0);
        assert_eq!(s.balances.tokens, 5);

        let mut s = session(24, 0);
        assert!(purchase(&mut s, Purchase::Convert(5)).is_err());
        assert_eq!(s.balances.score, 24);
        assert_eq!(s.balances.tokens, 0);
    }

    #[test]
    fn test_convert_rejects_zero_and_overflow() {
        let s = session(100, 0);
        assert_eq!(quote(&s, Purchase::Convert(0)), Err(PurchaseError::InvalidAmount));
        assert_eq!(quote(&s, Purchase::Convert(u64::MAX)), Err(PurchaseError::InvalidAmount));
    }

    #[test]
    fn test_fee_less_shop() {
        let mut s = GameSession::new(1, EntityLimits::default(), 0);
        s.balances.score = 50;
        purchase(&mut s, Purchase::Skin(1)).unwrap();
        assert_eq!(s.balances.tokens, 0);
        assert_eq!(s.balances.score, 0);
    }

    #[test]
    fn test_unknown_item() {
        let s = session(1000, 10);
        assert!(!can_afford(&s, Purchase::Skin(SKINS.len())));
        assert!(!can_afford(&s, Purchase::PowerUp(99)));
        assert!(can_afford(&s, Purchase::PowerUp(2)));
    }
}
