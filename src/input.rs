//! Input sampling
//!
//! Each frame the simulation consumes one [`FrameInput`]: the current voice
//! volume, a snapshot of the keyboard direction and the wall-clock time.
//! Key handlers never touch game state directly; they post intents into a
//! [`DirectionState`] which is read once per frame.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Something that can report the current microphone volume
///
/// Must return 0 (not fail) while the underlying analyser is not ready.
pub trait VolumeSource {
    fn current_volume(&mut self) -> f32;
}

/// Mean magnitude of a frequency-bin buffer (0 for an empty buffer)
pub fn mean_magnitude(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32
}

/// A volume source that never hears anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl VolumeSource for Silence {
    fn current_volume(&mut self) -> f32 {
        0.0
    }
}

/// Pre-recorded volume readings, one per frame; silent once exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedVolume {
    readings: VecDeque<f32>,
}

impl ScriptedVolume {
    pub fn new(readings: impl IntoIterator<Item = f32>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl VolumeSource for ScriptedVolume {
    fn current_volume(&mut self) -> f32 {
        self.readings.pop_front().unwrap_or(0.0).max(0.0)
    }
}

/// Keyboard axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Discrete steering intent, each component in {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Direction {
    pub x: i8,
    pub y: i8,
}

impl Direction {
    pub const NONE: Direction = Direction { x: 0, y: 0 };

    pub fn new(x: i8, y: i8) -> Self {
        Self {
            x: x.signum(),
            y: y.signum(),
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Latest keyboard intent; last event wins per axis
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionState {
    current: Direction,
}

impl DirectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one axis to -1, 0 or 1 (other values are reduced to their sign)
    pub fn set_direction(&mut self, axis: Axis, value: i8) {
        match axis {
            Axis::Horizontal => self.current.x = value.signum(),
            Axis::Vertical => self.current.y = value.signum(),
        }
    }

    pub fn clear_direction(&mut self, axis: Axis) {
        self.set_direction(axis, 0);
    }

    /// Handle a key press; returns true if the key is a steering key
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" => self.set_direction(Axis::Horizontal, -1),
            "ArrowRight" => self.set_direction(Axis::Horizontal, 1),
            "ArrowUp" => self.set_direction(Axis::Vertical, -1),
            "ArrowDown" => self.set_direction(Axis::Vertical, 1),
            _ => return false,
        }
        true
    }

    /// Handle a key release; releasing either key of an axis stops that axis
    pub fn key_up(&mut self, key: &str) -> bool {
        match key {
            "ArrowLeft" | "ArrowRight" => self.clear_direction(Axis::Horizontal),
            "ArrowUp" | "ArrowDown" => self.clear_direction(Axis::Vertical),
            _ => return false,
        }
        true
    }

    pub fn reset(&mut self) {
        self.current = Direction::NONE;
    }

    pub fn current(&self) -> Direction {
        self.current
    }
}

/// Everything the simulation reads for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Voice volume (>= 0)
    pub volume: f32,
    /// Keyboard steering
    pub steer: Direction,
    /// Wall-clock time in milliseconds
    pub now_ms: f64,
}

impl FrameInput {
    pub fn volume(volume: f32, now_ms: f64) -> Self {
        Self {
            volume,
            steer: Direction::NONE,
            now_ms,
        }
    }
}

/// Combines a volume source with keyboard state into per-frame input
pub struct InputSampler<V> {
    volume: V,
    keys: DirectionState,
}

impl<V: VolumeSource> InputSampler<V> {
    pub fn new(volume: V) -> Self {
        Self {
            volume,
            keys: DirectionState::new(),
        }
    }

    /// Read the volume once and snapshot the keys
    pub fn sample(&mut self, now_ms: f64) -> FrameInput {
        FrameInput {
            volume: self.volume.current_volume().max(0.0),
            steer: self.keys.current(),
            now_ms,
        }
    }

    pub fn keys_mut(&mut self) -> &mut DirectionState {
        &mut self.keys
    }

    pub fn volume_source_mut(&mut self) -> &mut V {
        &mut self.volume
    }
}
