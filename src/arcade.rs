//! Frame driver
//!
//! [`Arcade`] owns everything one game needs between frames: the input
//! sampler, the session, the renderer and the sound player. The platform
//! layer shares it as `Rc<RefCell<Arcade<..>>>` between the frame loop and
//! the DOM event handlers.

use crate::audio::{NoSound, SoundEffect, SoundPlayer};
use crate::highscores::HighScoreStore;
use crate::input::{InputSampler, VolumeSource};
use crate::platform::FrameDriver;
use crate::renderer::Renderer;
use crate::session::{FrameStatus, Session, SessionSummary};
use crate::settings::Settings;
use crate::tuning::{ConfigError, GameConfig};

pub struct Arcade<V, S, R> {
    input: InputSampler<V>,
    session: Session<S>,
    renderer: R,
    sound: Box<dyn SoundPlayer>,
    /// A frame callback is scheduled
    looping: bool,
}

impl<V, S, R> Arcade<V, S, R>
where
    V: VolumeSource,
    S: HighScoreStore,
    R: Renderer,
{
    pub fn new(config: GameConfig, volume: V, store: S, renderer: R) -> Result<Self, ConfigError> {
        Ok(Self {
            input: InputSampler::new(volume),
            session: Session::new(config, store)?,
            renderer,
            sound: Box::new(NoSound),
            looping: false,
        })
    }

    pub fn with_sound(mut self, sound: impl SoundPlayer + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    /// Start (or restart) a session.
    ///
    /// Returns true if the caller must start the frame loop; false if a
    /// loop is already scheduled and will pick up the new session.
    pub fn start(&mut self, seed: u64, now_ms: f64) -> bool {
        self.input.keys_mut().reset();
        self.session.start(seed, now_ms);
        !std::mem::replace(&mut self.looping, true)
    }

    /// Play again after a game over
    pub fn retry(&mut self, seed: u64, now_ms: f64) -> bool {
        self.start(seed, now_ms)
    }

    /// Stop the running session; the loop winds down on its next frame
    pub fn end(&mut self) -> Option<SessionSummary> {
        let summary = self.session.end()?;
        self.game_over(&summary);
        Some(summary)
    }

    /// Apply the player's settings: tunables from the next start, volume now
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        let mut config = GameConfig::for_variant(self.session.config().variant);
        settings.apply(&mut config);
        self.session.reconfigure(config)?;
        self.sound.set_volume(settings.effective_sfx_volume());
        Ok(())
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.keys_mut().key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.keys_mut().key_up(key)
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn volume_source_mut(&mut self) -> &mut V {
        self.input.volume_source_mut()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    fn game_over(&mut self, summary: &SessionSummary) {
        if summary.new_record {
            self.sound.play(SoundEffect::HighScore);
        }
        self.renderer.game_over(summary);
    }
}

impl<V, S, R> FrameDriver for Arcade<V, S, R>
where
    V: VolumeSource,
    S: HighScoreStore,
    R: Renderer,
{
    fn on_frame(&mut self, time_ms: f64) -> bool {
        if !self.session.is_running() {
            self.looping = false;
            return false;
        }

        let input = self.input.sample(time_ms);
        let status = self.session.frame(&input);
        self.sound.play_events(&self.session.state().events);

        match status {
            FrameStatus::Running => self.renderer.draw(&self.session.view()),
            // Fatal frame: nothing more is drawn, straight to the result
            FrameStatus::Ended => {
                if let Some(summary) = self.session.last_summary() {
                    self.game_over(&summary);
                }
            }
            FrameStatus::Stopped => {}
        }

        self.looping = self.session.is_running();
        self.looping
    }
}
