//! Browser bindings
//!
//! `ShrimpGame` is the handle the page script holds. All state lives in a
//! shared [`RoundController`]; the interval callback only keeps a weak
//! reference so dropping the game releases everything.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, AudioSink};
use crate::consts::TICK_PERIOD_MS;
use crate::economy::{POWER_UPS, PowerUpOffer, SKINS, Skin};
use crate::persistence::LocalStore;
use crate::platform::{self, Interval};
use crate::round::{RoundController, TimerHandle};
use crate::settings::Settings;
use crate::sim::{KindInfo, kind_table};
use crate::wallet::{NFT_TYPES, NftType, Token};

type Controller = RoundController<LocalStore, AudioManager>;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Shrimp Catch loaded");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn token(symbol: &str) -> Result<Token, JsValue> {
    Token::from_symbol(symbol).ok_or_else(|| js_err(format!("unknown token `{}`", symbol)))
}

#[derive(Serialize)]
struct Catalog {
    kinds: Vec<KindInfo>,
    skins: &'static [Skin],
    power_ups: &'static [PowerUpOffer],
    nfts: &'static [NftType],
}

#[wasm_bindgen]
pub struct ShrimpGame {
    inner: Rc<RefCell<Controller>>,
    settings: Settings,
}

#[wasm_bindgen]
impl ShrimpGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ShrimpGame {
        let store = LocalStore::new();
        let settings = Settings::load(&store);
        let audio = AudioManager::new(&settings);
        let controller = RoundController::new(&settings, store, audio, platform::now_ms);
        ShrimpGame {
            inner: Rc::new(RefCell::new(controller)),
            settings,
        }
    }

    /// Start a round; ignored while one is running or if the clock cannot be armed
    pub fn start_round(&self) -> bool {
        let weak = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().start_round(move |lease| {
            let interval = Interval::new(TICK_PERIOD_MS, move || {
                let Some(game) = weak.upgrade() else { return };
                // Skip the beat if a handler is mid-flight
                let Ok(mut controller) = game.try_borrow_mut() else {
                    return;
                };
                controller.on_tick(lease);
            });
            interval.map(|i| Box::new(i) as TimerHandle)
        })
    }

    pub fn end_round(&self) -> bool {
        self.inner.borrow_mut().end_round()
    }

    /// Catch creature `id`. Returns the points earned, if any.
    pub fn catch_shrimp(&self, id: u32) -> Option<f64> {
        self.inner.borrow_mut().catch(id).map(|o| o.points as f64)
    }

    pub fn buy_skin(&self, index: usize) -> Result<(), JsValue> {
        self.inner.borrow_mut().buy_skin(index).map(|_| ()).map_err(js_err)
    }

    pub fn buy_power_up(&self, index: usize) -> Result<(), JsValue> {
        self.inner.borrow_mut().buy_power_up(index).map(|_| ()).map_err(js_err)
    }

    pub fn convert(&self, amount: u32) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .convert(amount as u64)
            .map(|_| ())
            .map_err(js_err)
    }

    pub fn swap(&self, from: &str, to: &str, amount: f64) -> Result<f64, JsValue> {
        let (from, to) = (token(from)?, token(to)?);
        self.inner.borrow_mut().swap(from, to, amount).map_err(js_err)
    }

    pub fn send(&self, symbol: &str, amount: f64, address: &str) -> Result<(), JsValue> {
        let token = token(symbol)?;
        self.inner.borrow_mut().send(token, amount, address).map_err(js_err)
    }

    pub fn buy_nft(&self, type_id: u32) -> Result<f64, JsValue> {
        self.inner
            .borrow_mut()
            .buy_nft(type_id)
            .map(|id| id as f64)
            .map_err(js_err)
    }

    pub fn list_nft(&self, nft_id: f64, price: f64) -> Result<f64, JsValue> {
        self.inner
            .borrow_mut()
            .list_nft(nft_id as u64, price)
            .map(|id| id as f64)
            .map_err(js_err)
    }

    pub fn buy_listing(&self, listing_id: f64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .buy_listing(listing_id as u64)
            .map(|_| ())
            .map_err(js_err)
    }

    pub fn cancel_listing(&self, listing_id: f64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .cancel_listing(listing_id as u64)
            .map(|_| ())
            .map_err(js_err)
    }

    /// Mute or unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        let mut controller = self.inner.borrow_mut();
        controller.audio_mut().apply_settings(&self.settings);
        if muted {
            controller.audio_mut().stop_music();
        }
        drop(controller);
        self.settings.save(&mut LocalStore::new());
    }

    /// Current session, wallet and leaderboard as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.borrow().snapshot()).map_err(js_err)
    }

    /// Creature, shop and market catalogs as JSON
    pub fn catalog_json(&self) -> Result<String, JsValue> {
        let catalog = Catalog {
            kinds: kind_table(),
            skins: &SKINS,
            power_ups: &POWER_UPS,
            nfts: &NFT_TYPES,
        };
        serde_json::to_string(&catalog).map_err(js_err)
    }
}

impl Default for ShrimpGame {
    fn default() -> Self {
        Self::new()
    }
}
