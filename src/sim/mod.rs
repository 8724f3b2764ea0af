//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per animation frame, wall-clock time passed in, never read
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, clamp_to_field};
pub use state::{
    Actor, GameEvent, GamePhase, GameState, Gap, LaneMarking, Obstacle, Projectile, exited,
};
pub use tick::{StepOutcome, throttle_for, tick};
