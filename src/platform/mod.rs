//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web, manual elsewhere)
//! - Microphone volume (Web Audio analyser on web)

pub mod microphone;
pub mod scheduler;

pub use microphone::MicrophoneStatus;
#[cfg(target_arch = "wasm32")]
pub use microphone::MicrophoneVolume;
#[cfg(target_arch = "wasm32")]
pub use scheduler::AnimationFrameScheduler;
pub use scheduler::{FrameDriver, FrameScheduler, ManualScheduler, run_loop};
