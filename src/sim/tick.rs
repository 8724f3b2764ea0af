//! Per-frame simulation step
//!
//! One call advances a running session by exactly one animation frame.

use glam::Vec2;

use super::collision::clamp_to_field;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::input::FrameInput;
use crate::tuning::{CollisionResponse, GameConfig, MotionLaw};

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Session still running, schedule another frame
    Continue,
    /// Session ended this frame (or was not running)
    Ended,
}

/// Forward speed tier for a volume reading: 0, half, three quarters or full
pub fn throttle_for(volume: f32, threshold: f32, max_speed: f32) -> f32 {
    if volume < threshold {
        0.0
    } else if volume < threshold * 1.5 {
        max_speed * 0.5
    } else if volume < threshold * 2.0 {
        max_speed * 0.75
    } else {
        max_speed
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, config: &GameConfig, input: &FrameInput) -> StepOutcome {
    state.events.clear();
    if state.phase != GamePhase::Running {
        return StepOutcome::Ended;
    }

    steer_actor(state, config, input);
    fire_weapon(state, config, input);

    state.actor.pos = clamp_to_field(state.actor.pos, state.actor.size, config.field);

    scroll_lanes(state, config);
    advance_projectiles(state, config);

    if advance_obstacles(state, config) {
        state.phase = GamePhase::Ended;
        state.events.push(GameEvent::GameOver);
        log::debug!("session ended at frame {} with score {}", state.frame, state.score);
        return StepOutcome::Ended;
    }

    let newest = state.obstacles.last();
    if spawn::due(config, newest, state.last_spawn_ms, input.now_ms) {
        state.spawn_obstacle(config);
        state.last_spawn_ms = input.now_ms;
    }

    // Passive score for surviving the frame
    state.score += 1;
    state.frame += 1;
    StepOutcome::Continue
}

/// Turn the input signal into actor motion
fn steer_actor(state: &mut GameState, config: &GameConfig, input: &FrameInput) {
    let actor = &mut state.actor;
    match config.motion {
        MotionLaw::Ballistic {
            gravity,
            jump_velocity,
        } => {
            if input.volume > config.threshold {
                actor.vel.y = jump_velocity;
                state.events.push(GameEvent::Jumped);
            } else {
                actor.vel.y += gravity;
            }
            actor.pos.y += actor.vel.y;
        }
        MotionLaw::Throttle {
            max_speed,
            steer_speed,
        } => {
            let throttle = throttle_for(input.volume, config.threshold, max_speed);
            if throttle != actor.throttle {
                state.events.push(GameEvent::ThrottleChanged {
                    from: actor.throttle,
                    to: throttle,
                    level: throttle / max_speed,
                });
                actor.throttle = throttle;
            }
            actor.vel = Vec2::new(input.steer.x as f32 * steer_speed, 0.0);
            actor.pos += actor.vel;
        }
        MotionLaw::Free { speed } => {
            actor.vel = input.steer.as_vec2() * speed;
            actor.pos += actor.vel;
        }
    }
}

/// Voice-triggered shot, rate limited by wall-clock cooldown
fn fire_weapon(state: &mut GameState, config: &GameConfig, input: &FrameInput) {
    let Some(weapon) = &config.weapon else { return };
    if input.volume <= config.threshold {
        return;
    }
    let cooled = state
        .last_shot_ms
        .is_none_or(|last| input.now_ms - last > weapon.cooldown_ms);
    if cooled {
        state.spawn_projectile(weapon.size);
        state.last_shot_ms = Some(input.now_ms);
        state.events.push(GameEvent::Shot);
    }
}

/// Centre line dashes move with the car and wrap back to the top
fn scroll_lanes(state: &mut GameState, config: &GameConfig) {
    let Some(lanes) = &config.lanes else { return };
    let speed = state.actor.throttle;
    for lane in &mut state.lanes {
        lane.y += speed;
        if lane.y > config.field.y {
            lane.y = -lanes.line_height;
        }
    }
}

/// Move lasers, resolve laser hits (first obstacle in spawn order wins), drop strays
fn advance_projectiles(state: &mut GameState, config: &GameConfig) {
    let Some(weapon) = &config.weapon else { return };

    let mut i = 0;
    while i < state.projectiles.len() {
        state.projectiles[i].pos += weapon.velocity;
        let bolt = state.projectiles[i].rect();

        let hit = state.obstacles.iter().position(|o| o.hits(&bolt, 0.0));
        match hit {
            Some(j) => {
                state.projectiles.remove(i);
                let destroyed = state.obstacles.remove(j);
                state.score += weapon.hit_bonus;
                state.events.push(GameEvent::ObstacleDestroyed { id: destroyed.id });
            }
            None => i += 1,
        }
    }

    let field = config.field;
    state
        .projectiles
        .retain(|p| !super::state::exited(p.rect(), weapon.velocity, field));
}

/// Move obstacles, resolve actor hits and passes, drop exited obstacles.
/// Returns true if the session must end.
fn advance_obstacles(state: &mut GameState, config: &GameConfig) -> bool {
    let velocity = config.obstacle.velocity;
    let inset = config.obstacle.hitbox_inset;
    let actor = state.actor.rect();

    let mut i = 0;
    while i < state.obstacles.len() {
        state.obstacles[i].pos += velocity;

        if state.obstacles[i].hits(&actor, inset) {
            match config.response {
                CollisionResponse::Fatal => return true,
                CollisionResponse::LoseLife { .. } => {
                    state.obstacles.remove(i);
                    state.lives = state.lives.saturating_sub(1);
                    state.events.push(GameEvent::LifeLost {
                        remaining: state.lives,
                    });
                    if state.lives == 0 {
                        return true;
                    }
                    continue;
                }
            }
        }

        let obstacle = &mut state.obstacles[i];
        if config.pass_bonus > 0 && !obstacle.passed && obstacle.bounds().right() < actor.left() {
            obstacle.passed = true;
            state.score += config.pass_bonus;
            state.events.push(GameEvent::ObstaclePassed { id: obstacle.id });
        }
        i += 1;
    }

    let field = config.field;
    state.obstacles.retain(|o| !o.has_exited(velocity, field));
    false
}
