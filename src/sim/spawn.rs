//! Obstacle spawn placement
//!
//! Placement is uniformly random on the cross axis, drawn from the session's
//! seeded RNG so a replay with the same seed spawns the same layout.

use glam::Vec2;
use rand::Rng;

use super::state::{Gap, Obstacle};
use crate::tuning::{GameConfig, ObstacleShape, SpawnPolicy};

/// Uniform float in `[lo, hi)`; collapses to `lo` for an empty range
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo).max(0.0)
}

/// Build a new obstacle at the spawn edge
pub fn obstacle(config: &GameConfig, id: u32, rng: &mut impl Rng) -> Obstacle {
    let field = config.field;
    let variant = if config.obstacle.variants > 1 {
        rng.random_range(0..config.obstacle.variants)
    } else {
        0
    };

    let size = config.obstacle_size();
    let (pos, gap) = match config.obstacle.shape {
        // Just above the top edge, anywhere across
        ObstacleShape::Block { .. } => (Vec2::new(uniform(rng, 0.0, field.x - size.x), -size.y), None),
        // Just past the right edge, full height
        ObstacleShape::Pipe {
            gap_height,
            min_gap,
            ..
        } => (
            Vec2::new(field.x, 0.0),
            Some(Gap {
                top: uniform(rng, min_gap, field.y - gap_height - min_gap),
                height: gap_height,
            }),
        ),
    };

    Obstacle {
        id,
        pos,
        size,
        passed: false,
        variant,
        gap,
    }
}

/// Whether the spawn policy calls for a new obstacle this frame
pub fn due(config: &GameConfig, newest: Option<&Obstacle>, last_spawn_ms: f64, now_ms: f64) -> bool {
    match config.spawn {
        SpawnPolicy::Distance { spacing } => match newest {
            None => true,
            Some(obstacle) => config.field.x - obstacle.pos.x >= spacing,
        },
        SpawnPolicy::Interval { interval_ms } => now_ms - last_spawn_ms >= interval_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_block_spawns_above_field() {
        let config = GameConfig::car();
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 0..200 {
            let o = obstacle(&config, id, &mut rng);
            assert_eq!(o.pos.y, -80.0);
            assert!(o.pos.x >= 0.0 && o.pos.x <= config.field.x - 80.0);
            assert!(o.variant < 6);
            assert!(o.gap.is_none());
        }
    }

    #[test]
    fn test_pipe_gap_within_margins() {
        let config = GameConfig::bird();
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 0..200 {
            let o = obstacle(&config, id, &mut rng);
            let gap = o.gap.expect("pipes have a gap");
            assert!(gap.top >= 50.0);
            assert!(gap.top <= 600.0 - 300.0 - 50.0);
            assert_eq!(gap.height, 300.0);
            assert_eq!(o.pos, Vec2::new(800.0, 0.0));
            assert_eq!(o.size, config.obstacle_size());
        }
    }

    #[test]
    fn test_distance_policy() {
        let config = GameConfig::bird();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pipe = obstacle(&config, 1, &mut rng);
        assert!(due(&config, None, 0.0, 0.0));

        pipe.pos.x = 501.0;
        assert!(!due(&config, Some(&pipe), 0.0, 0.0));
        pipe.pos.x = 500.0;
        assert!(due(&config, Some(&pipe), 0.0, 0.0));
    }

    #[test]
    fn test_interval_policy() {
        let config = GameConfig::spaceship();
        assert!(!due(&config, None, 1000.0, 1999.0));
        assert!(due(&config, None, 1000.0, 2000.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = GameConfig::spaceship();
        let mut a = Pcg32::seed_from_u64(9);
        let mut b = Pcg32::seed_from_u64(9);
        for id in 0..10 {
            assert_eq!(obstacle(&config, id, &mut a).pos, obstacle(&config, id, &mut b).pos);
        }
    }
}
