//! Session controller
//!
//! Owns the `Idle -> Running -> Ended` state machine around a [`GameState`].
//! Retry goes back through `start`, which rebuilds all per-session state.
//! The high score is compared and written at most once per session end.

use glam::Vec2;
use serde::Serialize;

use crate::highscores::HighScoreStore;
use crate::input::FrameInput;
use crate::sim::{GamePhase, GameState, LaneMarking, Obstacle, Projectile, StepOutcome, tick};
use crate::tuning::{CollisionResponse, ConfigError, GameConfig, GameVariant};

/// What the frame loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Session still running, schedule the next frame
    Running,
    /// Session ended during this frame
    Ended,
    /// Nothing to do (idle or already ended)
    Stopped,
}

/// Final numbers for a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub variant: GameVariant,
    pub score: u64,
    pub high_score: u64,
    pub frames: u64,
    /// True if this session raised the high score
    pub new_record: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub variant: GameVariant,
    pub field: Vec2,
    pub phase: GamePhase,
    pub actor_pos: Vec2,
    pub actor_size: Vec2,
    pub obstacles: &'a [Obstacle],
    pub projectiles: &'a [Projectile],
    pub lanes: &'a [LaneMarking],
    /// Size of one lane dash
    pub lane_size: Vec2,
    pub score: u64,
    pub high_score: u64,
    /// Only meaningful for games with more than one life
    pub lives: Option<u8>,
}

/// One player's run of games against a high score store
pub struct Session<S> {
    config: GameConfig,
    state: GameState,
    store: S,
    high_score: u64,
    /// Set once the current session's result has been recorded
    finalized: bool,
    last_summary: Option<SessionSummary>,
}

impl<S: HighScoreStore> Session<S> {
    /// Validate the config and read the stored high score
    pub fn new(config: GameConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let high_score = store.high_score();
        let state = GameState::new(&config, 0, 0.0);
        Ok(Self {
            config,
            state,
            store,
            high_score,
            finalized: false,
            last_summary: None,
        })
    }

    /// Begin a fresh session. A running session is ended (and its score
    /// recorded) first.
    pub fn start(&mut self, seed: u64, now_ms: f64) {
        if self.state.phase == GamePhase::Running {
            log::warn!("restarting a running {} session", self.config.variant.as_str());
            self.end();
        }
        self.state = GameState::new(&self.config, seed, now_ms);
        self.state.phase = GamePhase::Running;
        self.finalized = false;
        log::info!(
            "{} session started (seed {}, high score {})",
            self.config.variant.as_str(),
            seed,
            self.high_score
        );
    }

    /// Play again after a game over
    pub fn retry(&mut self, seed: u64, now_ms: f64) {
        self.start(seed, now_ms);
    }

    /// Simulate one frame if running
    pub fn frame(&mut self, input: &FrameInput) -> FrameStatus {
        if self.state.phase != GamePhase::Running {
            return FrameStatus::Stopped;
        }
        match tick(&mut self.state, &self.config, input) {
            StepOutcome::Continue => FrameStatus::Running,
            StepOutcome::Ended => {
                self.finalize();
                FrameStatus::Ended
            }
        }
    }

    /// Stop the session and record the result.
    /// Returns `None` if there was nothing left to end.
    pub fn end(&mut self) -> Option<SessionSummary> {
        match self.state.phase {
            GamePhase::Running => {
                self.state.phase = GamePhase::Ended;
                self.finalize()
            }
            GamePhase::Ended if !self.finalized => self.finalize(),
            _ => None,
        }
    }

    /// Record the high score once per session
    fn finalize(&mut self) -> Option<SessionSummary> {
        if self.finalized {
            return None;
        }
        self.finalized = true;

        let score = self.state.score;
        let new_record = score > self.high_score;
        if new_record {
            self.high_score = score;
            self.store.set_high_score(score);
            log::info!("New {} high score: {}", self.config.variant.as_str(), score);
        }
        log::info!(
            "{} session over: score {} after {} frames",
            self.config.variant.as_str(),
            score,
            self.state.frame
        );

        let summary = SessionSummary {
            variant: self.config.variant,
            score,
            high_score: self.high_score,
            frames: self.state.frame,
            new_record,
        };
        self.last_summary = Some(summary);
        Some(summary)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Result of the most recently finished session
    pub fn last_summary(&self) -> Option<SessionSummary> {
        self.last_summary
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace tunables between sessions; takes effect on the next start
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn view(&self) -> FrameView<'_> {
        let has_lives = matches!(self.config.response, CollisionResponse::LoseLife { .. });
        FrameView {
            variant: self.config.variant,
            field: self.config.field,
            phase: self.state.phase,
            actor_pos: self.state.actor.pos,
            actor_size: self.state.actor.size,
            obstacles: &self.state.obstacles,
            projectiles: &self.state.projectiles,
            lanes: &self.state.lanes,
            lane_size: self
                .config
                .lanes
                .map_or(Vec2::ZERO, |l| Vec2::new(l.line_width, l.line_height)),
            score: self.state.score,
            high_score: self.high_score,
            lives: has_lives.then_some(self.state.lives),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryHighScores;

    fn bird_session(best: u64) -> Session<MemoryHighScores> {
        Session::new(GameConfig::bird(), MemoryHighScores::with_score(best)).unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let mut session = bird_session(0);
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(session.frame(&FrameInput::default()), FrameStatus::Stopped);
        assert_eq!(session.end(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::car();
        config.obstacle.variants = 0;
        assert!(Session::new(config, MemoryHighScores::new()).is_err());
    }

    #[test]
    fn test_end_records_high_score_once() {
        let mut session = bird_session(2);
        session.start(1, 0.0);
        for frame in 0..5 {
            assert_eq!(
                session.frame(&FrameInput::volume(0.0, frame as f64)),
                FrameStatus::Running
            );
        }

        let summary = session.end().expect("first end records");
        assert_eq!(summary.score, 5);
        assert!(summary.new_record);
        assert_eq!(session.high_score(), 5);
        assert_eq!(session.store().writes(), 1);

        assert_eq!(session.end(), None);
        assert_eq!(session.store().writes(), 1);
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.frame(&FrameInput::default()), FrameStatus::Stopped);
    }

    #[test]
    fn test_lower_score_keeps_record() {
        let mut session = bird_session(100);
        session.start(1, 0.0);
        session.frame(&FrameInput::volume(0.0, 0.0));
        let summary = session.end().unwrap();
        assert!(!summary.new_record);
        assert_eq!(summary.high_score, 100);
        assert_eq!(session.store().writes(), 0);
    }

    #[test]
    fn test_fatal_frame_finalizes() {
        let mut session =
            Session::new(GameConfig::spaceship(), MemoryHighScores::new()).unwrap();
        session.start(3, 0.0);
        // Park the ship under a falling obstacle until all lives are gone
        let mut status = FrameStatus::Running;
        let mut now = 0.0;
        while status == FrameStatus::Running && now < 600_000.0 {
            status = session.frame(&FrameInput::volume(0.0, now));
            now += 16.0;
        }
        assert_eq!(status, FrameStatus::Ended);
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.state().lives, 0);
        assert!(session.last_summary().is_some());
        // Already recorded by the fatal frame
        assert_eq!(session.end(), None);
        assert_eq!(session.store().writes(), 1);
    }

    #[test]
    fn test_retry_resets_state() {
        let mut session =
            Session::new(GameConfig::spaceship(), MemoryHighScores::new()).unwrap();
        session.start(3, 0.0);
        for frame in 0..120 {
            session.frame(&FrameInput::volume(80.0, frame as f64 * 16.0));
        }
        session.end();
        assert!(session.state().score > 0);

        session.retry(4, 10_000.0);
        let state = session.state();
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.obstacles.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.actor.pos, session.config().actor_start);
        assert_eq!(state.last_spawn_ms, 10_000.0);
    }

    #[test]
    fn test_view_exposes_lives_only_when_relevant() {
        let bird = bird_session(0);
        assert_eq!(bird.view().lives, None);

        let ship = Session::new(GameConfig::spaceship(), MemoryHighScores::new()).unwrap();
        assert_eq!(ship.view().lives, Some(3));

        let mut config = GameConfig::spaceship();
        config.response = CollisionResponse::LoseLife { lives: 1 };
        let last_life = Session::new(config, MemoryHighScores::new()).unwrap();
        assert_eq!(last_life.view().lives, Some(1));
    }

    #[test]
    fn test_restart_records_running_score() {
        let mut session = bird_session(0);
        session.start(1, 0.0);
        for frame in 0..7 {
            session.frame(&FrameInput::volume(0.0, frame as f64));
        }

        session.start(2, 100.0);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.high_score(), 7);
        assert_eq!(session.store().writes(), 1);
        assert_eq!(session.last_summary().map(|s| s.score), Some(7));
        assert_eq!(session.state().score, 0);
    }
}
