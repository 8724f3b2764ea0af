//! Data-driven game balance
//!
//! Every difference between the three games lives in a [`GameConfig`]:
//! how the actor moves, when obstacles spawn, what they look like and what
//! happens when the actor hits one.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which of the three games is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameVariant {
    #[default]
    Bird,
    Car,
    Spaceship,
}

impl GameVariant {
    pub const ALL: [GameVariant; 3] = [GameVariant::Bird, GameVariant::Car, GameVariant::Spaceship];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Bird => "bird",
            GameVariant::Car => "car",
            GameVariant::Spaceship => "spaceship",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bird" | "flappy" => Some(GameVariant::Bird),
            "car" | "racer" => Some(GameVariant::Car),
            "spaceship" | "ship" | "space" => Some(GameVariant::Spaceship),
            _ => None,
        }
    }

    /// Game picked by a `?game=` URL query, bird if absent or unknown
    pub fn from_query(query: &str) -> Self {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "game")
            .and_then(|(_, value)| Self::from_str(value))
            .unwrap_or_default()
    }
}

/// How the input signal drives the actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionLaw {
    /// Loud input sets a jump impulse, silence accumulates gravity (vertical only)
    Ballistic { gravity: f32, jump_velocity: f32 },
    /// Volume picks a forward speed tier, keyboard steers horizontally
    Throttle { max_speed: f32, steer_speed: f32 },
    /// Keyboard moves on both axes at constant speed
    Free { speed: f32 },
}

/// When new obstacles appear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// Spawn once the newest obstacle has travelled `spacing` from the spawn edge
    Distance { spacing: f32 },
    /// Spawn every `interval_ms` of wall-clock time
    Interval { interval_ms: f64 },
}

/// What an actor-vs-obstacle hit does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionResponse {
    /// Any hit ends the session
    Fatal,
    /// A hit costs one life and removes the obstacle
    LoseLife { lives: u8 },
}

impl CollisionResponse {
    /// Lives a fresh session starts with (fatal games still track one)
    pub fn starting_lives(&self) -> u8 {
        match self {
            CollisionResponse::Fatal => 1,
            CollisionResponse::LoseLife { lives } => *lives,
        }
    }
}

/// Obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Solid rectangle entering from the top edge
    Block { size: Vec2 },
    /// Full-height column entering from the right edge with a gap to fly through
    Pipe { width: f32, gap_height: f32, min_gap: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub shape: ObstacleShape,
    /// Per-frame displacement
    pub velocity: Vec2,
    /// Number of visual variants to pick from
    pub variants: u8,
    /// Hitbox shrink on every side, for actor collisions only
    pub hitbox_inset: f32,
}

/// Voice-triggered projectile launcher
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Minimum wall-clock time between shots
    pub cooldown_ms: f64,
    pub size: Vec2,
    /// Per-frame displacement
    pub velocity: Vec2,
    /// Score for destroying an obstacle
    pub hit_bonus: u64,
}

/// Dashed centre line that scrolls with the car's speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneConfig {
    pub line_width: f32,
    pub line_height: f32,
    pub line_spacing: f32,
}

/// Complete parameter set for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub variant: GameVariant,
    /// Play field size in pixels
    pub field: Vec2,
    pub actor_size: Vec2,
    /// Actor top-left corner at session start
    pub actor_start: Vec2,
    /// Volume above which the actor jumps / accelerates / fires
    pub threshold: f32,
    pub motion: MotionLaw,
    pub spawn: SpawnPolicy,
    pub obstacle: ObstacleConfig,
    pub response: CollisionResponse,
    /// Score for flying past an obstacle
    pub pass_bonus: u64,
    pub weapon: Option<WeaponConfig>,
    pub lanes: Option<LaneConfig>,
}

/// Default voice threshold shared by all games
pub const DEFAULT_THRESHOLD: f32 = 30.0;

impl GameConfig {
    pub fn for_variant(variant: GameVariant) -> Self {
        match variant {
            GameVariant::Bird => Self::bird(),
            GameVariant::Car => Self::car(),
            GameVariant::Spaceship => Self::spaceship(),
        }
    }

    /// Pipes scroll left, the bird flaps on loud input
    pub fn bird() -> Self {
        let field = Vec2::new(800.0, 600.0);
        Self {
            variant: GameVariant::Bird,
            field,
            actor_size: Vec2::new(50.0, 50.0),
            actor_start: Vec2::new(50.0, field.y / 2.0),
            threshold: DEFAULT_THRESHOLD,
            motion: MotionLaw::Ballistic {
                gravity: 0.5,
                jump_velocity: -5.0,
            },
            spawn: SpawnPolicy::Distance { spacing: 300.0 },
            obstacle: ObstacleConfig {
                shape: ObstacleShape::Pipe {
                    width: 50.0,
                    gap_height: 300.0,
                    min_gap: 50.0,
                },
                velocity: Vec2::new(-2.0, 0.0),
                variants: 1,
                hitbox_inset: 0.0,
            },
            response: CollisionResponse::Fatal,
            pass_bonus: 1,
            weapon: None,
            lanes: None,
        }
    }

    /// Cars fall from the top, voice is the gas pedal
    pub fn car() -> Self {
        let field = Vec2::new(480.0, 640.0);
        Self {
            variant: GameVariant::Car,
            field,
            actor_size: Vec2::new(50.0, 100.0),
            actor_start: Vec2::new(field.x / 2.0 - 25.0, field.y - 150.0),
            threshold: DEFAULT_THRESHOLD,
            motion: MotionLaw::Throttle {
                max_speed: 10.0,
                steer_speed: 5.0,
            },
            spawn: SpawnPolicy::Interval { interval_ms: 1000.0 },
            obstacle: ObstacleConfig {
                shape: ObstacleShape::Block {
                    size: Vec2::new(80.0, 80.0),
                },
                velocity: Vec2::new(0.0, 10.0),
                variants: 6,
                hitbox_inset: 20.0,
            },
            response: CollisionResponse::Fatal,
            pass_bonus: 0,
            weapon: None,
            lanes: Some(LaneConfig {
                line_width: 5.0,
                line_height: 30.0,
                line_spacing: 40.0,
            }),
        }
    }

    /// Steer with the arrows, shout to fire
    pub fn spaceship() -> Self {
        let field = Vec2::new(480.0, 640.0);
        Self {
            variant: GameVariant::Spaceship,
            field,
            actor_size: Vec2::new(50.0, 100.0),
            actor_start: Vec2::new(field.x / 2.0 - 25.0, field.y - 150.0),
            threshold: DEFAULT_THRESHOLD,
            motion: MotionLaw::Free { speed: 7.0 },
            spawn: SpawnPolicy::Interval { interval_ms: 1000.0 },
            obstacle: ObstacleConfig {
                shape: ObstacleShape::Block {
                    size: Vec2::new(75.0, 75.0),
                },
                velocity: Vec2::new(0.0, 8.0),
                variants: 6,
                hitbox_inset: 0.0,
            },
            response: CollisionResponse::LoseLife { lives: 3 },
            pass_bonus: 0,
            weapon: Some(WeaponConfig {
                cooldown_ms: 200.0,
                size: Vec2::new(6.0, 20.0),
                velocity: Vec2::new(0.0, -10.0),
                hit_bonus: 10,
            }),
            lanes: None,
        }
    }

    /// Obstacle size as spawned (pipes span the full field height)
    pub fn obstacle_size(&self) -> Vec2 {
        match self.obstacle.shape {
            ObstacleShape::Block { size } => size,
            ObstacleShape::Pipe { width, .. } => Vec2::new(width, self.field.y),
        }
    }

    /// Check that the simulation can honour these parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field.x <= 0.0 || self.field.y <= 0.0 {
            return Err(ConfigError::EmptyField { field: self.field });
        }
        if self.actor_size.x <= 0.0
            || self.actor_size.y <= 0.0
            || self.actor_size.x > self.field.x
            || self.actor_size.y > self.field.y
        {
            return Err(ConfigError::ActorDoesNotFit {
                actor: self.actor_size,
                field: self.field,
            });
        }
        if self.threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold(self.threshold));
        }
        match self.obstacle.shape {
            ObstacleShape::Block { size } => {
                if size.x <= 0.0 || size.y <= 0.0 || size.x > self.field.x {
                    return Err(ConfigError::ObstacleDoesNotFit {
                        obstacle: size,
                        field: self.field,
                    });
                }
            }
            ObstacleShape::Pipe {
                width,
                gap_height,
                min_gap,
            } => {
                if width <= 0.0 {
                    return Err(ConfigError::ObstacleDoesNotFit {
                        obstacle: Vec2::new(width, self.field.y),
                        field: self.field,
                    });
                }
                if gap_height <= 0.0 || min_gap < 0.0 || gap_height + 2.0 * min_gap > self.field.y {
                    return Err(ConfigError::GapDoesNotFit {
                        gap_height,
                        min_gap,
                        field_height: self.field.y,
                    });
                }
            }
        }
        if self.obstacle.variants == 0 {
            return Err(ConfigError::NoVariants);
        }
        if self.obstacle.hitbox_inset < 0.0 {
            return Err(ConfigError::NegativeInset(self.obstacle.hitbox_inset));
        }
        match self.spawn {
            SpawnPolicy::Distance { spacing } if spacing <= 0.0 => {
                return Err(ConfigError::NonPositiveSpawn);
            }
            SpawnPolicy::Interval { interval_ms } if interval_ms <= 0.0 => {
                return Err(ConfigError::NonPositiveSpawn);
            }
            _ => {}
        }
        if let CollisionResponse::LoseLife { lives: 0 } = self.response {
            return Err(ConfigError::NoLives);
        }
        if let Some(weapon) = &self.weapon {
            if weapon.cooldown_ms < 0.0 || weapon.size.x <= 0.0 || weapon.size.y <= 0.0 {
                return Err(ConfigError::InvalidWeapon);
            }
        }
        Ok(())
    }
}

/// A configuration the simulation cannot run with
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyField { field: Vec2 },
    ActorDoesNotFit { actor: Vec2, field: Vec2 },
    ObstacleDoesNotFit { obstacle: Vec2, field: Vec2 },
    GapDoesNotFit { gap_height: f32, min_gap: f32, field_height: f32 },
    NegativeThreshold(f32),
    NegativeInset(f32),
    NoVariants,
    NonPositiveSpawn,
    NoLives,
    InvalidWeapon,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "field {}x{} has no area", field.x, field.y),
            Self::ActorDoesNotFit { actor, field } => write!(
                f,
                "actor {}x{} does not fit field {}x{}",
                actor.x, actor.y, field.x, field.y
            ),
            Self::ObstacleDoesNotFit { obstacle, field } => write!(
                f,
                "obstacle {}x{} does not fit field {}x{}",
                obstacle.x, obstacle.y, field.x, field.y
            ),
            Self::GapDoesNotFit {
                gap_height,
                min_gap,
                field_height,
            } => write!(
                f,
                "gap {gap_height} with margin {min_gap} does not fit field height {field_height}"
            ),
            Self::NegativeThreshold(t) => write!(f, "threshold {t} is negative"),
            Self::NegativeInset(i) => write!(f, "hitbox inset {i} is negative"),
            Self::NoVariants => write!(f, "obstacles need at least one visual variant"),
            Self::NonPositiveSpawn => write!(f, "spawn spacing/interval must be positive"),
            Self::NoLives => write!(f, "session would start with zero lives"),
            Self::InvalidWeapon => write!(f, "weapon cooldown or projectile size is invalid"),
        }
    }
}

impl std::error::Error for ConfigError {}
