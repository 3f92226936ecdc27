//! Sound cues
//!
//! The game only names cues; sinks decide how (or whether) to play them.
//! On the web, cues are synthesized with the Web Audio API - no sound files needed.

use crate::sim::GameEvent;

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Creature caught
    Catch,
    /// Shop or wallet purchase went through
    Purchase,
    /// Purchase or wallet action rejected
    Error,
    /// Catch while on a streak
    Combo,
    RoundStart,
    RoundEnd,
}

impl SoundCue {
    /// Playback volume relative to the sfx channel
    pub fn volume(self) -> f32 {
        match self {
            SoundCue::Catch => 0.3,
            SoundCue::Purchase => 0.3,
            SoundCue::Error => 0.2,
            SoundCue::Combo => 0.4,
            SoundCue::RoundStart => 0.5,
            SoundCue::RoundEnd => 0.6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SoundCue::Catch => "catch",
            SoundCue::Purchase => "purchase",
            SoundCue::Error => "error",
            SoundCue::Combo => "combo",
            SoundCue::RoundStart => "gamestart",
            SoundCue::RoundEnd => "gameover",
        }
    }

    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::RoundStarted => Some(SoundCue::RoundStart),
            GameEvent::RoundEnded { .. } => Some(SoundCue::RoundEnd),
            GameEvent::Caught { .. } => Some(SoundCue::Catch),
            GameEvent::ComboStreak { .. } => Some(SoundCue::Combo),
            GameEvent::Purchased { .. } => Some(SoundCue::Purchase),
            GameEvent::Rejected(crate::economy::PurchaseError::AlreadyEquipped) => None,
            GameEvent::Rejected(_) => Some(SoundCue::Error),
            GameEvent::Spawned { .. } | GameEvent::Expired { .. } => None,
        }
    }
}

/// Fire-and-forget audio output. Implementations must never fail loudly.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    fn start_music(&mut self) {}

    fn stop_music(&mut self) {}
}

/// Sink that only logs cues (native builds, headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("cue: {} ({:.1})", cue.name(), cue.volume());
    }

    fn start_music(&mut self) {
        log::debug!("music on");
    }

    fn stop_music(&mut self) {
        log::debug!("music off");
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
        music_volume: f32,
        /// Running background drone (oscillators + their gain)
        music: Option<(Vec<OscillatorNode>, GainNode)>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: settings.effective_sfx_volume(),
                music_volume: settings.effective_music_volume(),
                music: None,
            }
        }

        /// Pick up changed volume settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.music_volume = settings.effective_music_volume();
            if let Some((_, gain)) = &self.music {
                gain.gain().set_value(self.music_volume * 0.05);
            }
        }

        /// Resume audio context (required after user gesture)
        fn wake(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short enveloped note starting `delay` seconds from now
        fn blip(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            vol: f32,
            delay: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Catch - quick rising chirp
        fn play_catch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(500.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Error - low double buzz
        fn play_error(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, 140.0, OscillatorType::Square, vol * 0.5, 0.0, 0.08);
            self.blip(ctx, 110.0, OscillatorType::Square, vol * 0.5, 0.12, 0.12);
        }

        fn play_arpeggio(
            &self,
            ctx: &AudioContext,
            vol: f32,
            notes: &[f32],
            step: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in notes.iter().enumerate() {
                self.blip(ctx, *freq, osc_type, vol, i as f64 * step, step * 2.5);
            }
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, cue: SoundCue) {
            let vol = self.sfx_volume * cue.volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.wake() else { return };

            let (notes, step, wave): (&[f32], f64, OscillatorType) = match cue {
                SoundCue::Catch => return self.play_catch(ctx, vol),
                SoundCue::Error => return self.play_error(ctx, vol),
                SoundCue::Purchase => (&[660.0, 880.0], 0.07, OscillatorType::Triangle),
                SoundCue::Combo => (&[600.0, 750.0, 900.0], 0.05, OscillatorType::Triangle),
                SoundCue::RoundStart => {
                    (&[400.0, 500.0, 600.0, 800.0], 0.1, OscillatorType::Triangle)
                }
                SoundCue::RoundEnd => (&[400.0, 350.0, 300.0, 200.0], 0.2, OscillatorType::Sine),
            };
            self.play_arpeggio(ctx, vol, notes, step, wave);
        }

        fn start_music(&mut self) {
            if self.music.is_some() || self.music_volume <= 0.0 {
                return;
            }
            let Some(ctx) = self.wake() else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            gain.gain().set_value(self.music_volume * 0.05);
            if gain.connect_with_audio_node(&ctx.destination()).is_err() {
                return;
            }

            // Low open fifth
            let mut oscs = Vec::new();
            for freq in [110.0, 165.0] {
                let Ok(osc) = ctx.create_oscillator() else { continue };
                osc.set_type(OscillatorType::Sine);
                osc.frequency().set_value(freq);
                if osc.connect_with_audio_node(&gain).is_ok() {
                    osc.start().ok();
                    oscs.push(osc);
                }
            }
            self.music = Some((oscs, gain));
        }

        fn stop_music(&mut self) {
            if let Some((oscs, gain)) = self.music.take() {
                for osc in oscs {
                    osc.stop().ok();
                }
                gain.disconnect().ok();
            }
        }
    }
}
