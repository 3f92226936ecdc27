//! Round lifecycle
//!
//! [`RoundController`] owns the session, the single armed clock, and the
//! boundary collaborators (storage and audio). Every public operation runs to
//! completion, then flushes queued cues and rewrites changed storage keys.
//!
//! Clock ownership: `start_round` asks the caller to arm a periodic driver and
//! keeps the returned handle. Dropping that handle must stop the driver. Ticks
//! are tagged with the [`Lease`] they were armed with; ticks from any other
//! lease are ignored, so a tick already queued when a round stops is inert.

use std::any::Any;

use serde::Serialize;

use crate::audio::{AudioSink, SoundCue};
use crate::economy::{self, POWER_UPS, Purchase, PurchaseError, Quote, SKINS};
use crate::highscores::HighScores;
use crate::persistence::{KeyValueStore, Profile};
use crate::settings::Settings;
use crate::sim::{self, CatchOutcome, GameSession, TickOutcome};
use crate::wallet::{CryptoWallet, Token, WalletError};

/// Identifies one arming of the round clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Lease(u64);

/// Opaque timer handle; dropping it stops the driver
pub type TimerHandle = Box<dyn Any>;

struct ArmedClock {
    lease: Lease,
    _timer: TimerHandle,
}

/// Read-only view for presentation
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub session: &'a GameSession,
    pub wallet: &'a CryptoWallet,
    pub rounds: &'a HighScores,
    /// Whether each `SKINS` entry can be bought right now
    pub skins_affordable: Vec<bool>,
    /// Whether each `POWER_UPS` entry can be bought right now
    pub power_ups_affordable: Vec<bool>,
}

pub struct RoundController<S: KeyValueStore, A: AudioSink> {
    session: GameSession,
    wallet: CryptoWallet,
    rounds: HighScores,
    store: S,
    audio: A,
    /// Last profile written to (or read from) storage
    saved: Profile,
    clock: Option<ArmedClock>,
    next_lease: u64,
    now_ms: fn() -> f64,
}

impl<S: KeyValueStore, A: AudioSink> RoundController<S, A> {
    /// Load the persisted profile and build an idle session
    pub fn new(settings: &Settings, store: S, audio: A, now_ms: fn() -> f64) -> Self {
        let saved = Profile::load(&store);
        let now = now_ms();
        let seed = settings.seed.unwrap_or(now as u64);

        let mut session = GameSession::new(seed, settings.limits(), settings.purchase_fee);
        session.balances = saved.balances.clone();
        session.equipped_skin = saved.equipped_skin;
        log::info!("Session ready (seed {}, skin {})", seed, SKINS[saved.equipped_skin].name);

        Self {
            session,
            wallet: saved.wallet.clone().with_id_seed(now as u64),
            rounds: saved.rounds.clone(),
            store,
            audio,
            saved,
            clock: None,
            next_lease: 1,
            now_ms,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn wallet(&self) -> &CryptoWallet {
        &self.wallet
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.rounds
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn is_running(&self) -> bool {
        self.session.round.running
    }

    /// Lease of the currently armed clock
    pub fn active_lease(&self) -> Option<Lease> {
        self.clock.as_ref().map(|c| c.lease)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            session: &self.session,
            wallet: &self.wallet,
            rounds: &self.rounds,
            skins_affordable: (0..SKINS.len())
                .map(|i| self.can_afford(Purchase::Skin(i)))
                .collect(),
            power_ups_affordable: (0..POWER_UPS.len())
                .map(|i| self.can_afford(Purchase::PowerUp(i)))
                .collect(),
        }
    }

    // === Round lifecycle ===

    /// Start a round, arming the clock through `arm`.
    ///
    /// No-op (and `arm` is not called) if a round is already running. If `arm`
    /// cannot produce a driver the round does not start.
    pub fn start_round(&mut self, arm: impl FnOnce(Lease) -> Option<TimerHandle>) -> bool {
        if self.session.round.running {
            log::debug!("Start ignored: round already running");
            return false;
        }

        // Release any leftover driver before arming a new one
        self.clock = None;

        let lease = Lease(self.next_lease);
        self.next_lease += 1;
        let Some(timer) = arm(lease) else {
            log::warn!("Round not started: clock could not be armed");
            return false;
        };

        sim::begin_round(&mut self.session);
        self.clock = Some(ArmedClock {
            lease,
            _timer: timer,
        });
        self.audio.start_music();
        self.flush();
        true
    }

    /// Stop the round. Safe to call any number of times.
    pub fn end_round(&mut self) -> bool {
        let stopped = sim::finish_round(&mut self.session);
        if stopped {
            self.close_round();
        } else {
            self.clock = None;
        }
        self.flush();
        stopped
    }

    /// Handle one clock firing
    pub fn on_tick(&mut self, lease: Lease) -> TickOutcome {
        if self.active_lease() != Some(lease) {
            log::debug!("Dropped tick from stale lease {}", lease.0);
            return TickOutcome::Stale;
        }

        let outcome = sim::tick(&mut self.session);
        if outcome == TickOutcome::TimeUp {
            self.close_round();
        }
        self.flush();
        outcome
    }

    /// Terminal cleanup shared by explicit stops and time-outs
    fn close_round(&mut self) {
        self.clock = None;
        self.audio.stop_music();
        let round = &self.session.round;
        let ended_at = (self.now_ms)();
        if let Some(rank) = self.rounds.add_round(round.round_score, round.caught, ended_at) {
            log::info!("Round placed #{} on the leaderboard", rank);
        }
    }

    // === Player input ===

    /// Catch creature `id`; missing ids are ignored
    pub fn catch(&mut self, id: u32) -> Option<CatchOutcome> {
        let outcome = sim::catch_creature(&mut self.session, id);
        self.flush();
        outcome
    }

    pub fn can_afford(&self, item: Purchase) -> bool {
        economy::can_afford(&self.session, item)
    }

    pub fn purchase(&mut self, item: Purchase) -> Result<Quote, PurchaseError> {
        let result = economy::purchase(&mut self.session, item);
        self.flush();
        result
    }

    pub fn buy_skin(&mut self, index: usize) -> Result<Quote, PurchaseError> {
        self.purchase(Purchase::Skin(index))
    }

    pub fn buy_power_up(&mut self, index: usize) -> Result<Quote, PurchaseError> {
        self.purchase(Purchase::PowerUp(index))
    }

    /// Convert score into `amount` fee tokens
    pub fn convert(&mut self, amount: u64) -> Result<Quote, PurchaseError> {
        self.purchase(Purchase::Convert(amount))
    }

    // === Wallet ===

    fn wallet_op<T>(
        &mut self,
        op: impl FnOnce(&mut CryptoWallet, f64) -> Result<T, WalletError>,
    ) -> Result<T, WalletError> {
        let now = (self.now_ms)();
        let result = op(&mut self.wallet, now);
        match &result {
            Ok(_) => self.audio.play(SoundCue::Purchase),
            Err(e) => {
                log::debug!("Wallet action rejected: {}", e);
                self.audio.play(SoundCue::Error);
            }
        }
        self.flush();
        result
    }

    pub fn swap(&mut self, from: Token, to: Token, amount: f64) -> Result<f64, WalletError> {
        self.wallet_op(|w, _| w.swap(from, to, amount))
    }

    pub fn send(&mut self, token: Token, amount: f64, address: &str) -> Result<(), WalletError> {
        self.wallet_op(|w, _| w.send(token, amount, address))
    }

    pub fn buy_nft(&mut self, type_id: u32) -> Result<u64, WalletError> {
        self.wallet_op(|w, now| w.buy_from_market(type_id, now))
    }

    pub fn list_nft(&mut self, nft_id: u64, price: f64) -> Result<u64, WalletError> {
        self.wallet_op(|w, now| w.list_for_sale(nft_id, price, now))
    }

    pub fn buy_listing(&mut self, listing_id: u64) -> Result<u64, WalletError> {
        self.wallet_op(|w, now| w.buy_listing(listing_id, now))
    }

    pub fn cancel_listing(&mut self, listing_id: u64) -> Result<u64, WalletError> {
        self.wallet_op(|w, now| w.cancel_listing(listing_id, now))
    }

    // === Boundary ===

    fn profile(&self) -> Profile {
        Profile {
            balances: self.session.balances.clone(),
            equipped_skin: self.session.equipped_skin,
            wallet: self.wallet.clone(),
            rounds: self.rounds.clone(),
        }
    }

    /// Play queued cues and persist whatever changed
    fn flush(&mut self) {
        for event in self.session.drain_events() {
            if let Some(cue) = SoundCue::for_event(&event) {
                self.audio.play(cue);
            }
        }

        let profile = self.profile();
        profile.save_changes(&self.saved, &mut self.store);
        self.saved = profile;
    }
}
