//! Voice Arcade - three voice-controlled arcade games on one simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, obstacles, collisions, scoring)
//! - `session`: Idle/Running/Ended state machine and high score bookkeeping
//! - `input`: Volume signal and keyboard direction sampling
//! - `tuning`: Per-game parameters (motion law, spawn policy, collision response)
//! - `platform`: Frame scheduling and browser collaborators
//! - `renderer`: Per-frame drawing
//! - `audio`: Sound cues for game events
//! - `arcade`: Frame driver tying the pieces together

pub mod arcade;
pub mod audio;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use arcade::Arcade;
pub use highscores::{HighScoreStore, MemoryHighScores};
pub use input::{Axis, Direction, DirectionState, FrameInput, InputSampler, VolumeSource};
pub use session::{FrameStatus, Session, SessionSummary};
pub use settings::Settings;
pub use tuning::{ConfigError, GameConfig, GameVariant};
