//! Key/value persistence
//!
//! Features:
//! - One primitive or JSON value per stable key
//! - Documented default for every absent or unreadable key
//! - Change detection so only modified keys are rewritten
//! - Write failures are logged and swallowed

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::economy::{SKINS, skin_index};
use crate::highscores::HighScores;
use crate::sim::Balances;
use crate::wallet::CryptoWallet;

/// Storage keys
pub mod keys {
    pub const SCORE: &str = "shrimp-score";
    pub const HIGH_SCORE: &str = "shrimp-high";
    pub const TOKENS: &str = "xan-tokens";
    pub const SKIN: &str = "shrimp-skin";
    pub const ETH: &str = "eth-balance";
    pub const SOL: &str = "sol-balance";
    pub const BTC: &str = "btc-balance";
    pub const USDC: &str = "usdc-balance";
    pub const NFTS: &str = "player-nfts";
    pub const LISTINGS: &str = "nft-listings";
    pub const HISTORY: &str = "nft-trading-history";
    pub const ROUNDS: &str = "shrimp-rounds";
    pub const SETTINGS: &str = "shrimp-settings";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("write to `{key}` failed: {reason}")]
    Write { key: String, reason: String },
    #[error("could not encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Minimal string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }
}

/// Read a primitive, falling back to `default` when absent or unparsable
pub fn load_value<T: std::str::FromStr>(store: &impl KeyValueStore, key: &str, default: T) -> T {
    store
        .get(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a JSON value, falling back to `T::default()`
pub fn load_json<T: DeserializeOwned + Default>(store: &impl KeyValueStore, key: &str) -> T {
    match store.get(key) {
        Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable `{}`: {}", key, e);
            T::default()
        }),
        None => T::default(),
    }
}

/// Write a JSON value
pub fn store_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// Fire-and-forget write: failures are logged, never propagated
fn write_or_warn(result: Result<(), StorageError>) {
    if let Err(e) = result {
        log::warn!("Save failed: {}", e);
    }
}

/// Everything that survives a page reload
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub balances: Balances,
    /// Index into `SKINS`
    pub equipped_skin: usize,
    pub wallet: CryptoWallet,
    pub rounds: HighScores,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            balances: Balances::default(),
            equipped_skin: 0,
            wallet: CryptoWallet::default(),
            rounds: HighScores::new(),
        }
    }
}

impl Profile {
    /// Load every key, substituting defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        let score = load_value(store, keys::SCORE, 0u64);
        let balances = Balances {
            score,
            high_score: load_value(store, keys::HIGH_SCORE, 0u64).max(score),
            tokens: load_value(store, keys::TOKENS, 0u64),
        };
        let equipped_skin = store
            .get(keys::SKIN)
            .and_then(|name| skin_index(&name))
            .unwrap_or(0);
        let mut wallet = CryptoWallet::default();
        wallet.eth = load_value(store, keys::ETH, wallet.eth);
        wallet.sol = load_value(store, keys::SOL, wallet.sol);
        wallet.btc = load_value(store, keys::BTC, wallet.btc);
        wallet.usdc = load_value(store, keys::USDC, wallet.usdc);
        wallet.nfts = load_json(store, keys::NFTS);
        wallet.listings = load_json(store, keys::LISTINGS);
        wallet.history = load_json(store, keys::HISTORY);
        let rounds: HighScores = load_json(store, keys::ROUNDS);

        log::info!(
            "Loaded profile: score {}, high {}, {} XAN, {} NFTs, {} rounds on the board",
            balances.score,
            balances.high_score,
            balances.tokens,
            wallet.nfts.len(),
            rounds.entries.len()
        );

        Self {
            balances,
            equipped_skin,
            wallet,
            rounds,
        }
    }

    /// Write the keys whose values differ from `previous`. Returns how many were written.
    pub fn save_changes(&self, previous: &Profile, store: &mut impl KeyValueStore) -> usize {
        let mut written = 0;
        let mut put = |result: Result<(), StorageError>| {
            write_or_warn(result);
            written += 1;
        };

        let (b, old) = (&self.balances, &previous.balances);
        if b.score != old.score {
            put(store.set(keys::SCORE, &b.score.to_string()));
        }
        if b.high_score != old.high_score {
            put(store.set(keys::HIGH_SCORE, &b.high_score.to_string()));
        }
        if b.tokens != old.tokens {
            put(store.set(keys::TOKENS, &b.tokens.to_string()));
        }
        if self.equipped_skin != previous.equipped_skin {
            let name = SKINS.get(self.equipped_skin).map(|s| s.name).unwrap_or("Default");
            put(store.set(keys::SKIN, name));
        }

        let (w, old) = (&self.wallet, &previous.wallet);
        if w.eth != old.eth {
            put(store.set(keys::ETH, &w.eth.to_string()));
        }
        if w.sol != old.sol {
            put(store.set(keys::SOL, &w.sol.to_string()));
        }
        if w.btc != old.btc {
            put(store.set(keys::BTC, &w.btc.to_string()));
        }
        if w.usdc != old.usdc {
            put(store.set(keys::USDC, &w.usdc.to_string()));
        }
        if w.nfts != old.nfts {
            put(store_json(store, keys::NFTS, &w.nfts));
        }
        if w.listings != old.listings {
            put(store_json(store, keys::LISTINGS, &w.listings));
        }
        if w.history != old.history {
            put(store_json(store, keys::HISTORY, &w.history));
        }
        if self.rounds != previous.rounds {
            put(store_json(store, keys::ROUNDS, &self.rounds));
        }

        if written > 0 {
            log::debug!("Saved {} changed keys", written);
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store whose writes always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }    }

    #[test]
    fn test_defaults_when_empty() {
        let profile = Profile::load(&MemoryStore::new());
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.wallet.eth, 2.5);
        assert_eq!(profile.wallet.usdc, 1000.0);
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set(keys::SCORE, "lots").unwrap();
        store.set(keys::NFTS, "{not json").unwrap();
        store.set(keys::SKIN, "Plaid").unwrap();
        let profile = Profile::load(&store);
        assert_eq!(profile.balances.score, 0);
        assert!(profile.wallet.nfts.is_empty());
        assert_eq!(profile.equipped_skin, 0);
    }

    #[test]
    fn test_wallet_keys_override_defaults() {
        let mut store = MemoryStore::new();
        store.set(keys::ETH, "1.25").unwrap();
        store.set(keys::USDC, "oops").unwrap();
        let wallet = Profile::load(&store).wallet;
        assert_eq!(wallet.eth, 1.25);
        assert_eq!(wallet.sol, 15.8);
        assert_eq!(wallet.usdc, 1000.0);
        assert!(wallet.listings.is_empty());
    }

    #[test]
    fn test_only_changed_keys_written() {
        let before = Profile::default();
        let mut after = before.clone();
        after.balances.score = 12;
        after.balances.high_score = 12;

        let mut store = MemoryStore::new();
        assert_eq!(after.save_changes(&before, &mut store), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(keys::SCORE).as_deref(), Some("12"));
        assert_eq!(after.save_changes(&after, &mut store), 0);
    }

    #[test]
    fn test_round_trip() {
        let mut profile = Profile::default();
        profile.balances = Balances { score: 40, high_score: 90, tokens: 3 };
        profile.equipped_skin = 3;
        profile.wallet.buy_from_market(4, 1234.0).unwrap();
        profile.rounds.add_round(17, 9, 55.0);

        let mut store = MemoryStore::new();
        profile.save_changes(&Profile::default(), &mut store);
        let loaded = Profile::load(&store);

        assert_eq!(loaded.balances, profile.balances);
        assert_eq!(loaded.equipped_skin, 3);
        assert_eq!(loaded.wallet.eth, profile.wallet.eth);
        assert_eq!(loaded.wallet.nfts, profile.wallet.nfts);
        assert_eq!(loaded.wallet.history, profile.wallet.history);
        assert_eq!(loaded.rounds, profile.rounds);
    }

    #[test]
    fn test_failed_writes_are_swallowed() {
        let mut profile = Profile::default();
        profile.balances.tokens = 4;
        assert_eq!(profile.save_changes(&Profile::default(), &mut BrokenStore), 1);
    }
}
