//! Round leaderboard
//!
//! Tracks the top 10 finished rounds by round score.

use serde::{Deserialize, Serialize};

/// Maximum number of rounds to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Points earned during the round
    pub score: u64,
    /// Creatures caught
    pub caught: u32,
    /// Unix timestamp (ms) when the round ended
    pub timestamp: f64,
}

/// Leaderboard, sorted by score descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<RoundRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a round score makes the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a round. Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_round(&mut self, score: u64, caught: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let record = RoundRecord {
            score,
            caught,
            timestamp,
        };

        // Ties rank below earlier rounds
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best round score (if any)
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
