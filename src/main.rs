//! Shrimp Catch entry point
//!
//! The browser build is driven from the page via `ShrimpGame`. Natively this
//! plays one headless round with an auto-catcher and prints a summary.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use rand::Rng;
    use shrimp_catch::audio::LogAudio;
    use shrimp_catch::economy::{POWER_UPS, Purchase, SKINS};
    use shrimp_catch::persistence::MemoryStore;
    use shrimp_catch::sim::TickOutcome;
    use shrimp_catch::{RoundController, Settings};

    /// Chance the bot reacts to a creature on a given tick
    const BOT_REACTION: f64 = 0.6;

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }

    pub fn run(seed: Option<u64>) {
        let settings = Settings {
            seed,
            ..Settings::default()
        };
        let mut game = RoundController::new(&settings, MemoryStore::new(), LogAudio, now_ms);
        let mut bot = rand::rng();

        let mut lease = None;
        game.start_round(|l| {
            lease = Some(l);
            Some(Box::new(()))
        });
        let Some(lease) = lease else {
            log::error!("Round did not start");
            return;
        };

        loop {
            // Bot: grab the most valuable creatures it notices
            let mut targets: Vec<(u64, u32)> = game
                .session()
                .entities
                .creatures
                .iter()
                .map(|c| (c.kind.points(), c.id))
                .collect();
            targets.sort_unstable_by(|a, b| b.cmp(a));
            for (_, id) in targets {
                if bot.random_bool(BOT_REACTION) {
                    game.catch(id);
                }
            }

            match game.on_tick(lease) {
                TickOutcome::TimeUp | TickOutcome::Stale | TickOutcome::Idle => break,
                TickOutcome::Advanced { .. } => {}
            }
        }

        let session = game.session();
        println!("\n=== Round over ===");
        println!("Round score: {}", session.round.round_score);
        println!("Caught:      {}", session.round.caught);
        println!("Score:       {}", session.balances.score);

        // Spend winnings: fee tokens first, then the best skin, then power-ups
        game.convert(3).ok();
        for index in (1..SKINS.len()).rev() {
            if game.can_afford(Purchase::Skin(index)) {
                game.buy_skin(index).ok();
                break;
            }
        }
        for index in 0..POWER_UPS.len() {
            if game.can_afford(Purchase::PowerUp(index)) {
                game.buy_power_up(index).ok();
            }
        }

        let session = game.session();
        println!("Skin:        {}", SKINS[session.equipped_skin].name);
        println!("Power-ups:   {}", session.entities.power_ups.len());
        println!("Left over:   {} score, {} XAN", session.balances.score, session.balances.tokens);
        println!("Keys saved:  {}", game.store().len());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shrimp Catch (native) starting...");
    log::info!("Playing a headless round; the browser build is the wasm32 `ShrimpGame` export");

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok());
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `shrimp_catch::web::init`
}
