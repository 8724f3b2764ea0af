//! Game state and core simulation types
//!
//! One [`GameState`] holds everything a session mutates. It is rebuilt from
//! scratch on every start/retry, so nothing leaks between sessions.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::{GameConfig, LaneConfig, SpawnPolicy};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command
    #[default]
    Idle,
    /// Frames are being simulated
    Running,
    /// Session over, waiting for retry
    Ended,
}

/// Things that happened during a frame (for sound and presentation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Bird flapped
    Jumped,
    /// Ship fired a laser
    Shot,
    /// Laser destroyed an obstacle
    ObstacleDestroyed { id: u32 },
    /// Actor got past an obstacle
    ObstaclePassed { id: u32 },
    /// Ship was hit but survived (or not)
    LifeLost { remaining: u8 },
    /// Car changed speed tier; `level` is the new speed as a fraction of max
    ThrottleChanged { from: f32, to: f32, level: f32 },
    /// Session ended this frame
    GameOver,
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Per-frame velocity (bird: vertical fall speed, others: last steering move)
    pub vel: Vec2,
    /// Forward speed picked from the voice volume (car only)
    pub throttle: f32,
}

impl Actor {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            throttle: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Opening in a pipe the bird flies through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Distance from the obstacle top to the opening
    pub top: f32,
    pub height: f32,
}

/// Something to dodge (or shoot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Set once the actor has got past it
    pub passed: bool,
    /// Visual variant (sprite index)
    pub variant: u8,
    /// Pipes are solid except for this opening
    pub gap: Option<Gap>,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Solid parts of the obstacle: one box, or the two pipe halves around the gap
    pub fn hitboxes(&self) -> impl Iterator<Item = Rect> {
        let boxes = match self.gap {
            None => [Some(self.bounds()), None],
            Some(gap) => {
                let gap_bottom = gap.top + gap.height;
                [
                    Some(Rect::new(self.pos, Vec2::new(self.size.x, gap.top))),
                    Some(Rect::new(
                        Vec2::new(self.pos.x, self.pos.y + gap_bottom),
                        Vec2::new(self.size.x, self.size.y - gap_bottom),
                    )),
                ]
            }
        };
        boxes.into_iter().flatten()
    }

    /// True if any solid part overlaps `other`, after shrinking by `inset`
    pub fn hits(&self, other: &Rect, inset: f32) -> bool {
        self.hitboxes().any(|hitbox| hitbox.inset(inset).overlaps(other))
    }

    /// True once the obstacle has fully left the field in its direction of travel
    pub fn has_exited(&self, vel: Vec2, field: Vec2) -> bool {
        exited(self.bounds(), vel, field)
    }
}

/// A laser bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// One dash of the car's centre line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneMarking {
    pub y: f32,
}

/// One-sided exit check: only the edge the entity is travelling toward matters
pub fn exited(rect: Rect, vel: Vec2, field: Vec2) -> bool {
    (vel.x < 0.0 && rect.right() <= 0.0)
        || (vel.x > 0.0 && rect.left() >= field.x)
        || (vel.y < 0.0 && rect.bottom() <= 0.0)
        || (vel.y > 0.0 && rect.top() >= field.y)
}

/// Complete session state (deterministic given inputs and seed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Completed frames this session
    pub frame: u64,
    pub actor: Actor,
    /// Spawn order (oldest first)
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub lanes: Vec<LaneMarking>,
    /// Wall-clock time of the last interval spawn (session start before the first)
    pub last_spawn_ms: f64,
    /// Wall-clock time of the last shot
    pub last_shot_ms: Option<f64>,
    /// Events raised by the most recent frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh state for a new session, not yet running
    pub fn new(config: &GameConfig, seed: u64, now_ms: f64) -> Self {
        let mut state = Self {
            seed,
            phase: GamePhase::Idle,
            score: 0,
            lives: config.response.starting_lives(),
            frame: 0,
            actor: Actor::new(config.actor_start, config.actor_size),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            lanes: config
                .lanes
                .map(|lanes| lay_out_lanes(&lanes, config.field))
                .unwrap_or_default(),
            last_spawn_ms: now_ms,
            last_shot_ms: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        // Distance spawning starts with an obstacle already on its way in
        if matches!(config.spawn, SpawnPolicy::Distance { .. }) {
            state.spawn_obstacle(config);
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one obstacle at the spawn edge with randomized placement
    pub fn spawn_obstacle(&mut self, config: &GameConfig) {
        let id = self.next_entity_id();
        let obstacle = super::spawn::obstacle(config, id, &mut self.rng);
        log::trace!("spawned obstacle {} at {:?}", obstacle.id, obstacle.pos);
        self.obstacles.push(obstacle);
    }

    /// Fire a projectile from the middle of the actor's top edge
    pub fn spawn_projectile(&mut self, size: Vec2) {
        let id = self.next_entity_id();
        let pos = Vec2::new(
            self.actor.pos.x + self.actor.size.x / 2.0 - size.x / 2.0,
            self.actor.pos.y,
        );
        self.projectiles.push(Projectile { id, pos, size });
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

/// Evenly spaced dashes covering the field height
fn lay_out_lanes(lanes: &LaneConfig, field: Vec2) -> Vec<LaneMarking> {
    let step = lanes.line_height + lanes.line_spacing;
    let count = (field.y / step).ceil() as usize;
    (0..count)
        .map(|i| LaneMarking { y: i as f32 * step })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_resets_everything() {
        let config = GameConfig::spaceship();
        let state = GameState::new(&config, 7, 1000.0);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.actor.pos, config.actor_start);
        assert!(state.obstacles.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.last_spawn_ms, 1000.0);
        assert_eq!(state.last_shot_ms, None);
    }

    #[test]
    fn test_bird_starts_with_a_pipe() {
        let config = GameConfig::bird();
        let state = GameState::new(&config, 7, 0.0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].pos.x, config.field.x);
        assert!(state.obstacles[0].gap.is_some());
    }

    #[test]
    fn test_car_lays_out_lanes() {
        let config = GameConfig::car();
        let state = GameState::new(&config, 7, 0.0);
        // 640 / (30 + 40) rounded up
        assert_eq!(state.lanes.len(), 10);
        assert_eq!(state.lanes[1].y, 70.0);
    }

    #[test]
    fn test_pipe_hitboxes_leave_gap_open() {
        let pipe = Obstacle {
            id: 1,
            pos: Vec2::new(100.0, 0.0),
            size: Vec2::new(50.0, 600.0),
            passed: false,
            variant: 0,
            gap: Some(Gap {
                top: 100.0,
                height: 300.0,
            }),
        };
        let boxes: Vec<Rect> = pipe.hitboxes().collect();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0], Rect::new(Vec2::new(100.0, 0.0), Vec2::new(50.0, 100.0)));
        assert_eq!(boxes[1], Rect::new(Vec2::new(100.0, 400.0), Vec2::new(50.0, 200.0)));

        let in_gap = Rect::new(Vec2::new(110.0, 150.0), Vec2::new(50.0, 50.0));
        assert!(!pipe.hits(&in_gap, 0.0));
        let grazing_top = Rect::new(Vec2::new(110.0, 99.0), Vec2::new(50.0, 50.0));
        assert!(pipe.hits(&grazing_top, 0.0));
        let touching_bottom = Rect::new(Vec2::new(110.0, 350.0), Vec2::new(50.0, 50.0));
        assert!(!pipe.hits(&touching_bottom, 0.0));
    }

    #[test]
    fn test_exit_is_one_sided() {
        let field = Vec2::new(100.0, 100.0);
        // Just spawned above the field, falling: not exited
        let spawning = Rect::new(Vec2::new(10.0, -20.0), Vec2::new(20.0, 20.0));
        assert!(!exited(spawning, Vec2::new(0.0, 8.0), field));
        // Same box moving up has exited
        assert!(exited(spawning, Vec2::new(0.0, -8.0), field));

        let left = Rect::new(Vec2::new(-50.0, 0.0), Vec2::new(50.0, 100.0));
        assert!(exited(left, Vec2::new(-2.0, 0.0), field));
        let partly = Rect::new(Vec2::new(-49.0, 0.0), Vec2::new(50.0, 100.0));
        assert!(!exited(partly, Vec2::new(-2.0, 0.0), field));

        let below = Rect::new(Vec2::new(0.0, 100.0), Vec2::new(10.0, 10.0));
        assert!(exited(below, Vec2::new(0.0, 10.0), field));
    }

    #[test]
    fn test_projectile_centred_on_actor() {
        let config = GameConfig::spaceship();
        let mut state = GameState::new(&config, 7, 0.0);
        state.spawn_projectile(Vec2::new(6.0, 20.0));
        let p = &state.projectiles[0];
        assert_eq!(p.pos.x, config.actor_start.x + 25.0 - 3.0);
        assert_eq!(p.pos.y, config.actor_start.y);
    }
}
