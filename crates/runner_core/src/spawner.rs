//! Entity lifecycle: spawning at the right edge, scrolling left, pruning off-screen.
//!
//! Each tick runs spawn-check, then prune, then advance. The spawn check looks at
//! the most recently inserted entity, which may be pruned right after.

use strum::IntoEnumIterator;
use tracing::debug;

use crate::config::RunnerConfig;
use crate::entity::{Fruit, FruitKind, Obstacle, ObstacleKind};

/// Anything that scrolls with the world.
pub trait Scrolling {
    fn scroll(&mut self, dx: f32);
    /// Right-most x coordinate, used to decide when the entity left the screen.
    fn trailing_edge(&self) -> f32;
}

impl Scrolling for Obstacle {
    fn scroll(&mut self, dx: f32) {
        self.x += dx;
    }

    fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }
}

impl Scrolling for Fruit {
    fn scroll(&mut self, dx: f32) {
        self.x += dx;
    }

    fn trailing_edge(&self) -> f32 {
        self.x + self.size
    }
}

/// Decides when new obstacles and fruit enter the world.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: fastrand::Rng,
}

impl Spawner {
    /// Deterministic spawner, for replays and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Appends an obstacle at the right edge once the previous one has moved
    /// at least `min_gap` plus a freshly rolled random gap away from it.
    pub fn spawn_obstacle_if_due(
        &mut self,
        obstacles: &mut Vec<Obstacle>,
        config: &RunnerConfig,
    ) -> bool {
        let random_gap = self.rng.f32() * config.obstacle_random_gap;
        let threshold = config.viewport_width - (config.obstacle_min_gap + random_gap);

        let due = obstacles.last().is_none_or(|last| last.x < threshold);
        if !due {
            return false;
        }

        let catalog = ObstacleKind::catalog(config.variant);
        let Some(&kind) = self.rng.choice(catalog) else {
            return false;
        };

        obstacles.push(Obstacle::new(kind, config.viewport_width, config.ground_y()));
        debug!(%kind, "obstacle spawned");
        true
    }

    /// Appends a fruit at the right edge, floating above the tallest active obstacle.
    pub fn spawn_fruit_if_due(
        &mut self,
        fruits: &mut Vec<Fruit>,
        obstacles: &[Obstacle],
        config: &RunnerConfig,
    ) -> bool {
        let Some(rules) = config.fruit else {
            return false;
        };

        let threshold = config.viewport_width - rules.gap;
        let due = fruits.last().is_none_or(|last| last.x < threshold);
        if !due {
            return false;
        }

        let Some(kind) = self.rng.choice(FruitKind::iter()) else {
            return false;
        };

        let ground_y = config.ground_y();
        let tallest = obstacles
            .iter()
            .map(|obstacle| obstacle.height)
            .reduce(f32::max)
            .unwrap_or(rules.fallback_obstacle_height);

        let lowest = tallest + rules.clearance_above_obstacles;
        let highest = ground_y - rules.ceiling_margin;
        let elevation = if highest > lowest {
            self.rng.f32().mul_add(highest - lowest, lowest)
        } else {
            lowest
        };

        fruits.push(Fruit::new(kind, config.viewport_width, ground_y - elevation));
        debug!(%kind, elevation, "fruit spawned");
        true
    }
}

/// Drops every entity whose trailing edge went past the left border.
pub fn prune_offscreen<T: Scrolling>(entities: &mut Vec<T>) {
    entities.retain(|entity| entity.trailing_edge() >= 0.0);
}

/// Moves every entity `speed` pixels to the left.
pub fn advance<T: Scrolling>(entities: &mut [T], speed: f32) {
    for entity in entities {
        entity.scroll(-speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunnerConfig {
        RunnerConfig::strawberry()
    }

    #[test]
    fn spawns_at_the_right_edge_when_empty() {
        let config = config();
        let mut spawner = Spawner::with_seed(1);
        let mut obstacles = Vec::new();

        assert!(
            spawner.spawn_obstacle_if_due(&mut obstacles, &config),
            "empty world always spawns"
        );
        let obstacle = obstacles.first().expect("one obstacle");
        assert!((obstacle.x - config.viewport_width).abs() < f32::EPSILON, "at right edge");
        assert!((obstacle.y - config.ground_y()).abs() < f32::EPSILON, "on the ground");
        assert!(
            ObstacleKind::catalog(config.variant).contains(&obstacle.kind),
            "kind comes from the variant catalog"
        );
    }

    #[test]
    fn never_spawns_inside_the_minimum_gap() {
        let config = config();
        for seed in 0..200 {
            let mut spawner = Spawner::with_seed(seed);
            let mut obstacles = vec![Obstacle::new(
                ObstacleKind::Bomb,
                config.viewport_width - config.obstacle_min_gap + 1.0,
                config.ground_y(),
            )];
            assert!(
                !spawner.spawn_obstacle_if_due(&mut obstacles, &config),
                "seed {seed}: too close to spawn"
            );
            assert_eq!(obstacles.len(), 1, "seed {seed}: nothing appended");
        }
    }

    #[test]
    fn always_spawns_past_the_maximum_gap() {
        let config = config();
        let far = config.viewport_width
            - (config.obstacle_min_gap + config.obstacle_random_gap)
            - 1.0;
        for seed in 0..200 {
            let mut spawner = Spawner::with_seed(seed);
            let mut obstacles = vec![Obstacle::new(ObstacleKind::Sword, far, config.ground_y())];
            assert!(
                spawner.spawn_obstacle_if_due(&mut obstacles, &config),
                "seed {seed}: gap exhausted"
            );
        }
    }

    #[test]
    fn consecutive_obstacles_keep_the_minimum_gap() {
        let config = config();
        let mut spawner = Spawner::with_seed(42);
        let mut obstacles = Vec::new();

        for tick in 0..3_000 {
            spawner.spawn_obstacle_if_due(&mut obstacles, &config);
            prune_offscreen(&mut obstacles);
            advance(&mut obstacles, 11.0);

            for pair in obstacles.windows(2) {
                if let [older, newer] = pair {
                    assert!(
                        newer.x - older.x >= config.obstacle_min_gap,
                        "tick {tick}: gap {} below minimum",
                        newer.x - older.x
                    );
                }
            }
        }
    }

    #[test]
    fn prune_removes_only_fully_offscreen_entities() {
        let mut obstacles = vec![
            Obstacle::new(ObstacleKind::Bomb, -45.0, 370.0),
            Obstacle::new(ObstacleKind::Bomb, -45.5, 370.0),
            Obstacle::new(ObstacleKind::Sword, 10.0, 370.0),
        ];
        prune_offscreen(&mut obstacles);

        let xs: Vec<f32> = obstacles.iter().map(|obstacle| obstacle.x).collect();
        assert_eq!(xs, vec![-45.0, 10.0], "trailing edge at exactly 0 stays");
    }

    #[test]
    fn advance_moves_everything_by_speed() {
        let mut fruits = vec![
            Fruit::new(FruitKind::Grape, 100.0, 200.0),
            Fruit::new(FruitKind::Banana, 300.0, 150.0),
        ];
        advance(&mut fruits, 8.5);
        let xs: Vec<f32> = fruits.iter().map(|fruit| fruit.x).collect();
        assert_eq!(xs, vec![91.5, 291.5], "each fruit moved left by speed");
    }

    #[test]
    fn fruit_floats_above_the_tallest_obstacle() {
        let config = config();
        let rules = config.fruit.expect("strawberry has fruit");
        let ground_y = config.ground_y();
        let obstacles = vec![
            Obstacle::new(ObstacleKind::Bomb, 500.0, ground_y),
            Obstacle::new(ObstacleKind::Sword, 700.0, ground_y),
        ];

        for seed in 0..100 {
            let mut spawner = Spawner::with_seed(seed);
            let mut fruits = Vec::new();
            assert!(
                spawner.spawn_fruit_if_due(&mut fruits, &obstacles, &config),
                "seed {seed}: empty fruit list spawns"
            );
            let fruit = fruits.first().expect("spawned fruit");
            let elevation = ground_y - fruit.y;
            assert!(
                elevation >= 70.0 + rules.clearance_above_obstacles - 1e-3,
                "seed {seed}: fruit at {elevation} is within reach of the sword"
            );
            assert!(
                elevation <= ground_y - rules.ceiling_margin + 1e-3,
                "seed {seed}: fruit at {elevation} is above the ceiling margin"
            );
        }
    }

    #[test]
    fn fruit_waits_for_its_gap() {
        let config = config();
        let mut spawner = Spawner::with_seed(3);
        let mut fruits = vec![Fruit::new(FruitKind::Orange, config.viewport_width - 150.0, 200.0)];

        assert!(
            !spawner.spawn_fruit_if_due(&mut fruits, &[], &config),
            "only 150px travelled"
        );
        if let Some(last) = fruits.last_mut() {
            last.x = config.viewport_width - 201.0;
        }
        assert!(
            spawner.spawn_fruit_if_due(&mut fruits, &[], &config),
            "gap of 200 exceeded"
        );
    }

    #[test]
    fn degenerate_fruit_window_is_clamped() {
        let config = RunnerConfig {
            viewport_height: 250.0,
            ..RunnerConfig::strawberry()
        };
        let ground_y = config.ground_y();
        let mut spawner = Spawner::with_seed(9);
        let mut fruits = Vec::new();

        assert!(
            spawner.spawn_fruit_if_due(&mut fruits, &[], &config),
            "clamped window still spawns"
        );
        let fruit = fruits.first().expect("spawned fruit");
        assert!(
            (ground_y - fruit.y - 90.0).abs() < 1e-3,
            "elevation pinned to the lower bound"
        );
    }

    #[test]
    fn dino_never_spawns_fruit() {
        let config = RunnerConfig::dino();
        let mut spawner = Spawner::with_seed(0);
        let mut fruits = Vec::new();
        assert!(
            !spawner.spawn_fruit_if_due(&mut fruits, &[], &config),
            "no fruit rules"
        );
        assert!(fruits.is_empty(), "no fruit appended");
    }

    #[test]
    fn same_seed_same_world() {
        let config = config();
        let mut first = Spawner::with_seed(7);
        let mut second = Spawner::with_seed(7);
        let mut a = Vec::new();
        let mut b = Vec::new();

        for _ in 0..500 {
            first.spawn_obstacle_if_due(&mut a, &config);
            second.spawn_obstacle_if_due(&mut b, &config);
            advance(&mut a, 9.0);
            advance(&mut b, 9.0);
        }
        assert_eq!(a, b, "seeded spawners are deterministic");
    }
}
