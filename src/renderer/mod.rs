//! Rendering module
//!
//! The core never waits on drawing: a [`Renderer`] receives the finished
//! frame and the game-over result. The browser build draws flat-coloured
//! boxes on a Canvas 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::session::{FrameView, SessionSummary};
use crate::tuning::GameVariant;

/// Draws frames produced by the simulation
pub trait Renderer {
    fn draw(&mut self, frame: &FrameView<'_>);

    /// Present the final result (default: nothing)
    fn game_over(&mut self, _summary: &SessionSummary) {}
}

/// Sprite stand-in colours for obstacle variants
const OBSTACLE_COLORS: [&str; 6] = [
    "#e74c3c", // red
    "#3498db", // blue
    "#f1c40f", // yellow
    "#9b59b6", // purple
    "#e67e22", // orange
    "#1abc9c", // teal
];

/// CSS colour for an obstacle variant (pipes are always green)
pub fn obstacle_color(variant: GameVariant, index: u8) -> &'static str {
    match variant {
        GameVariant::Bird => "green",
        _ => OBSTACLE_COLORS[index as usize % OBSTACLE_COLORS.len()],
    }
}

/// CSS colour for the player
pub fn actor_color(variant: GameVariant) -> &'static str {
    match variant {
        GameVariant::Bird => "#f5c842",
        GameVariant::Car => "#2ecc71",
        GameVariant::Spaceship => "#ecf0f1",
    }
}

/// Background fill per game
pub fn background_color(variant: GameVariant) -> &'static str {
    match variant {
        GameVariant::Bird => "#4ab4c8",
        GameVariant::Car => "#333333",
        GameVariant::Spaceship => "#0b0b2b",
    }
}

/// HUD lines shown in the corner
pub fn hud_lines(frame: &FrameView<'_>) -> Vec<String> {
    let mut lines = vec![
        format!("Score: {}", frame.score),
        format!("High Score: {}", frame.high_score),
    ];
    if let Some(lives) = frame.lives {
        lines.push(format!("Lives: {}", lives));
    }
    lines
}

/// Headless renderer that traces each frame to the log
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    results: Vec<SessionSummary>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn results(&self) -> &[SessionSummary] {
        &self.results
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &FrameView<'_>) {
        self.frames += 1;
        log::trace!(
            "{} frame: actor {:?}, {} obstacles, {} projectiles, {}",
            frame.variant.as_str(),
            frame.actor_pos,
            frame.obstacles.len(),
            frame.projectiles.len(),
            hud_lines(frame).join(" | ")
        );
    }

    fn game_over(&mut self, summary: &SessionSummary) {
        log::info!(
            "Game over! Score: {} High Score: {}",
            summary.score,
            summary.high_score
        );
        self.results.push(*summary);
    }
}
