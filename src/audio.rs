//! Sound effects
//!
//! Game events map to short cues. In the browser they are generated
//! procedurally with Web Audio oscillators, so no sound files are needed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Bird flapped
    Jump,
    /// Laser fired
    Shot,
    /// Laser destroyed an obstacle
    Explosion,
    /// Flew past a pipe
    Pass,
    /// Ship took a hit
    LifeLost,
    /// Engine note for the car's new speed (0.0 - 1.0)
    Engine { level: f32 },
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Shot => Some(SoundEffect::Shot),
            GameEvent::ObstacleDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::ObstaclePassed { .. } => Some(SoundEffect::Pass),
            GameEvent::LifeLost { remaining } if remaining > 0 => Some(SoundEffect::LifeLost),
            // The last life goes out with the game-over cue
            GameEvent::LifeLost { .. } => None,
            GameEvent::ThrottleChanged { level, .. } => Some(SoundEffect::Engine {
                level: level.clamp(0.0, 1.0),
            }),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
        }
    }
}

/// Something that can play sound effects
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect);

    /// Overall gain, 0 to mute (default: ignored)
    fn set_volume(&mut self, _volume: f32) {}

    /// Play the cue for each event of a frame
    fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

/// Plays nothing (headless runs)
#[derive(Debug, Default)]
pub struct NoSound;

impl SoundPlayer for NoSound {
    fn play(&mut self, _effect: SoundEffect) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundPlayer};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Master times effects volume, 0 when muted
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: Settings::default().effective_sfx_volume(),
            }
        }

        /// Take volume and mute from the player's settings
        pub fn from_settings(settings: &Settings) -> Self {
            let mut audio = Self::new();
            audio.set_volume(settings.effective_sfx_volume());
            audio
        }

        // === Sound generators ===

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

        /// One oscillator sweeping from `from` to `to` Hz
        fn sweep(
            &self,
            ctx: &AudioContext,
            vol: f32,
            osc_type: OscillatorType,
            (from, to): (f32, f32),
            duration: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + duration + 0.05).ok();
        }

        /// Short notes one after another
        fn arpeggio(
            &self,
            ctx: &AudioContext,
            vol: f32,
            osc_type: OscillatorType,
            notes: &[f32],
            step: f64,
            length: f64,
        ) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + length)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + length + 0.1).ok();
                }
            }
        }

        /// Explosion - low rumble with a crack on top
        fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
            self.sweep(ctx, vol * 0.5, OscillatorType::Sawtooth, (100.0, 30.0), 0.4);

            if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                let t = ctx.current_time();
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }
    }

    impl SoundPlayer for AudioManager {
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn play(&mut self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => {
                    self.sweep(ctx, vol * 0.3, OscillatorType::Triangle, (300.0, 600.0), 0.12)
                }
                SoundEffect::Shot => {
                    self.sweep(ctx, vol * 0.2, OscillatorType::Square, (1200.0, 300.0), 0.1)
                }
                SoundEffect::Explosion => self.play_explosion(ctx, vol),
                SoundEffect::Pass => {
                    self.arpeggio(ctx, vol * 0.2, OscillatorType::Sine, &[800.0, 1000.0], 0.05, 0.08)
                }
                SoundEffect::LifeLost => {
                    self.sweep(ctx, vol * 0.4, OscillatorType::Sine, (300.0, 40.0), 0.5)
                }
                SoundEffect::Engine { level } => {
                    let pitch = 60.0 + 140.0 * level;
                    self.sweep(ctx, vol * 0.15, OscillatorType::Sawtooth, (pitch, pitch * 1.1), 0.2)
                }
                SoundEffect::GameOver => self.arpeggio(
                    ctx,
                    vol * 0.3,
                    OscillatorType::Sine,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    0.3,
                ),
                SoundEffect::HighScore => self.arpeggio(
                    ctx,
                    vol * 0.25,
                    OscillatorType::Triangle,
                    &[500.0, 600.0, 700.0, 800.0, 1000.0],
                    0.08,
                    0.25,
                ),
            }
        }
    }
}
