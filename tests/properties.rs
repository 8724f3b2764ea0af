//! Invariants that must hold for any input sequence

use glam::Vec2;
use proptest::prelude::*;

use voice_arcade::highscores::MemoryHighScores;
use voice_arcade::input::{Direction, FrameInput};
use voice_arcade::session::Session;
use voice_arcade::sim::{GamePhase, GameState, Obstacle, Rect, StepOutcome, tick};
use voice_arcade::{GameConfig, GameVariant};

fn variant() -> impl Strategy<Value = GameVariant> {
    prop_oneof![
        Just(GameVariant::Bird),
        Just(GameVariant::Car),
        Just(GameVariant::Spaceship),
    ]
}

/// Volume plus steering for one frame
fn frame_input() -> impl Strategy<Value = (f32, i8, i8)> {
    (0.0f32..128.0, -1i8..=1, -1i8..=1)
}

fn rect() -> impl Strategy<Value = Rect> {
    (-100.0f32..100.0, -100.0f32..100.0, 1.0f32..50.0, 1.0f32..50.0)
        .prop_map(|(x, y, w, h)| Rect::new(Vec2::new(x, y), Vec2::new(w, h)))
}

fn running(config: &GameConfig, seed: u64) -> GameState {
    let mut state = GameState::new(config, seed, 0.0);
    state.phase = GamePhase::Running;
    state
}

proptest! {
    #[test]
    fn actor_stays_on_field(
        variant in variant(),
        seed in any::<u64>(),
        inputs in prop::collection::vec(frame_input(), 1..300),
    ) {
        let config = GameConfig::for_variant(variant);
        let mut state = running(&config, seed);
        let limit = config.field - config.actor_size;

        for (i, (volume, x, y)) in inputs.into_iter().enumerate() {
            let input = FrameInput {
                volume,
                steer: Direction::new(x, y),
                now_ms: i as f64 * 16.0,
            };
            let outcome = tick(&mut state, &config, &input);

            let pos = state.actor.pos;
            prop_assert!(pos.x >= 0.0 && pos.x <= limit.x, "x out of field: {}", pos.x);
            prop_assert!(pos.y >= 0.0 && pos.y <= limit.y, "y out of field: {}", pos.y);
            if outcome == StepOutcome::Ended {
                break;
            }
        }
    }

    #[test]
    fn exited_obstacles_never_linger(
        variant in variant(),
        seed in any::<u64>(),
        frames in 1usize..400,
    ) {
        let config = GameConfig::for_variant(variant);
        let mut state = running(&config, seed);
        let mut removed: Vec<u32> = Vec::new();

        for i in 0..frames {
            let before: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();
            let outcome = tick(&mut state, &config, &FrameInput::volume(0.0, i as f64 * 16.0));
            // A fatal frame stops before cleanup
            if outcome == StepOutcome::Ended {
                break;
            }

            for obstacle in &state.obstacles {
                prop_assert!(!obstacle.has_exited(config.obstacle.velocity, config.field));
                prop_assert!(!removed.contains(&obstacle.id), "obstacle {} came back", obstacle.id);
            }
            removed.extend(before.into_iter().filter(|id| !state.obstacles.iter().any(|o| o.id == *id)));
        }
    }

    #[test]
    fn overlap_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap(a in rect(), h in 1.0f32..50.0, w in 1.0f32..50.0) {
        let right = Rect::new(Vec2::new(a.right(), a.top()), Vec2::new(w, h));
        let below = Rect::new(Vec2::new(a.left(), a.bottom()), Vec2::new(w, h));
        prop_assert!(!a.overlaps(&right));
        prop_assert!(!a.overlaps(&below));
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn high_score_never_decreases(
        seeds in prop::collection::vec(any::<u64>(), 1..6),
        lengths in prop::collection::vec(0usize..120, 6),
    ) {
        let mut session = Session::new(GameConfig::car(), MemoryHighScores::with_score(50)).unwrap();
        let mut best = session.high_score();

        for (seed, frames) in seeds.into_iter().zip(lengths) {
            session.start(seed, 0.0);
            for i in 0..frames {
                session.frame(&FrameInput::volume(0.0, i as f64 * 16.0));
            }
            let writes_before = session.store().writes();
            let summary = session.end();
            prop_assert!(session.store().writes() - writes_before <= 1);
            prop_assert!(session.end().is_none());
            prop_assert!(session.high_score() >= best);
            if let Some(summary) = summary {
                prop_assert_eq!(summary.high_score, best.max(summary.score));
            }
            best = session.high_score();
        }
    }

    /// Score is one point per surviving frame plus 10 per laser hit
    #[test]
    fn spaceship_score_accounts_for_every_point(
        seed in any::<u64>(),
        inputs in prop::collection::vec(frame_input(), 1..400),
    ) {
        let config = GameConfig::spaceship();
        let mut state = running(&config, seed);
        let mut hits = 0u64;

        for (i, (volume, x, y)) in inputs.into_iter().enumerate() {
            let input = FrameInput {
                volume,
                steer: Direction::new(x, y),
                now_ms: i as f64 * 16.0,
            };
            let outcome = tick(&mut state, &config, &input);
            hits += state
                .events
                .iter()
                .filter(|e| matches!(e, voice_arcade::sim::GameEvent::ObstacleDestroyed { .. }))
                .count() as u64;
            if outcome == StepOutcome::Ended {
                break;
            }
        }

        prop_assert_eq!(state.score, state.frame + 10 * hits);
    }

    #[test]
    fn pipe_hitboxes_leave_the_gap_open(seed in any::<u64>()) {
        let config = GameConfig::bird();
        let state = GameState::new(&config, seed, 0.0);
        let pipe: &Obstacle = &state.obstacles[0];
        let gap = pipe.gap.expect("pipes have a gap");

        prop_assert!(gap.top >= 50.0);
        prop_assert!(gap.top + gap.height <= config.field.y - 50.0);
        let hole = Rect::new(Vec2::new(pipe.pos.x, gap.top), Vec2::new(pipe.size.x, gap.height));
        for hitbox in pipe.hitboxes() {
            prop_assert!(!hitbox.overlaps(&hole));
        }
    }
}
