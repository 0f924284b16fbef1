//! Tunables for both game variants.
//!
//! Values are expressed per tick (one tick per display refresh, ~60 Hz) and in
//! canvas pixels, where y grows downward.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Which flavour of the runner is played.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Variant {
    /// Single jump, fixed speed, no fruit.
    Dino,
    /// Double jump, running, fruit and speed growth.
    #[default]
    Strawberry,
}

/// Horizontal running ramp, only present in the strawberry variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub acceleration: f32,
    pub max_speed: f32,
}

/// Fruit spawning rules, only present in the strawberry variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FruitConfig {
    /// Distance the last fruit must travel from the right edge before the next one.
    pub gap: f32,
    /// Minimum height of a fruit above the tallest active obstacle.
    pub clearance_above_obstacles: f32,
    /// Fruit never spawn closer than this to the top of the viewport.
    pub ceiling_margin: f32,
    /// Obstacle height assumed when no obstacle is active.
    pub fallback_obstacle_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub variant: Variant,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub ground_height: f32,
    pub character_x: f32,
    pub character_size: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub double_jump: bool,
    pub base_speed: f32,
    pub running: Option<RunConfig>,
    /// Applied to the scroll speed once per tick. `1.0` disables growth.
    pub speed_multiplier: f32,
    pub obstacle_min_gap: f32,
    pub obstacle_random_gap: f32,
    pub fruit: Option<FruitConfig>,
    /// Fraction of the scroll speed the clouds move at.
    pub cloud_parallax: f32,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("speed multiplier must be at least 1.0, got {0}")]
    ShrinkingSpeed(f32),

    #[error("random obstacle gap must not be negative, got {0}")]
    NegativeGap(f32),

    #[error("character of size {size} does not fit above the ground line at {ground_y}")]
    CharacterTooLarge { size: f32, ground_y: f32 },
}

const VIEWPORT_WIDTH: f32 = 800.0;
const VIEWPORT_HEIGHT: f32 = 400.0;
const GROUND_HEIGHT: f32 = 30.0;
const CHARACTER_X: f32 = 50.0;
const CHARACTER_SIZE: f32 = 50.0;
const OBSTACLE_MIN_GAP: f32 = 300.0;
const OBSTACLE_RANDOM_GAP: f32 = 400.0;
const CLOUD_PARALLAX: f32 = 0.2;

impl RunnerConfig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Dino => Self::dino(),
            Variant::Strawberry => Self::strawberry(),
        }
    }

    pub fn strawberry() -> Self {
        Self {
            variant: Variant::Strawberry,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            ground_height: GROUND_HEIGHT,
            character_x: CHARACTER_X,
            character_size: CHARACTER_SIZE,
            gravity: 0.8,
            jump_force: 15.0,
            double_jump: true,
            base_speed: 8.0,
            running: Some(RunConfig {
                acceleration: 0.5,
                max_speed: 12.0,
            }),
            speed_multiplier: 1.0005,
            obstacle_min_gap: OBSTACLE_MIN_GAP,
            obstacle_random_gap: OBSTACLE_RANDOM_GAP,
            fruit: Some(FruitConfig {
                gap: 200.0,
                clearance_above_obstacles: 20.0,
                ceiling_margin: 150.0,
                fallback_obstacle_height: 70.0,
            }),
            cloud_parallax: CLOUD_PARALLAX,
        }
    }

    pub fn dino() -> Self {
        Self {
            variant: Variant::Dino,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            ground_height: GROUND_HEIGHT,
            character_x: CHARACTER_X,
            character_size: CHARACTER_SIZE,
            gravity: 0.6,
            jump_force: 12.0,
            double_jump: false,
            base_speed: 6.0,
            running: None,
            speed_multiplier: 1.0,
            obstacle_min_gap: OBSTACLE_MIN_GAP,
            obstacle_random_gap: OBSTACLE_RANDOM_GAP,
            fruit: None,
            cloud_parallax: CLOUD_PARALLAX,
        }
    }

    /// The walkable surface, in canvas coordinates.
    pub fn ground_y(&self) -> f32 {
        self.viewport_height - self.ground_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("viewport_width", self.viewport_width)?;
        positive("viewport_height", self.viewport_height)?;
        positive("ground_height", self.ground_height)?;
        positive("character_size", self.character_size)?;
        positive("gravity", self.gravity)?;
        positive("jump_force", self.jump_force)?;
        positive("base_speed", self.base_speed)?;
        positive("obstacle_min_gap", self.obstacle_min_gap)?;

        if let Some(run) = self.running {
            positive("running.acceleration", run.acceleration)?;
            positive("running.max_speed", run.max_speed)?;
        }
        if let Some(fruit) = self.fruit {
            positive("fruit.gap", fruit.gap)?;
        }

        if self.speed_multiplier < 1.0 || self.speed_multiplier.is_nan() {
            return Err(ConfigError::ShrinkingSpeed(self.speed_multiplier));
        }
        if self.obstacle_random_gap < 0.0 || self.obstacle_random_gap.is_nan() {
            return Err(ConfigError::NegativeGap(self.obstacle_random_gap));
        }

        let ground_y = self.ground_y();
        if self.character_size >= ground_y {
            return Err(ConfigError::CharacterTooLarge {
                size: self.character_size,
                ground_y,
            });
        }

        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::strawberry()
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn presets_are_valid() {
        for variant in Variant::iter() {
            let config = RunnerConfig::for_variant(variant);
            assert_eq!(config.variant, variant, "preset carries its variant");
            assert_eq!(config.validate(), Ok(()), "{variant} preset must validate");
        }
    }

    #[test]
    fn only_strawberry_runs_and_collects_fruit() {
        let dino = RunnerConfig::dino();
        assert!(dino.running.is_none(), "dino has no running");
        assert!(dino.fruit.is_none(), "dino has no fruit");
        assert!(!dino.double_jump, "dino has a single jump");

        let strawberry = RunnerConfig::strawberry();
        assert!(strawberry.running.is_some(), "strawberry can run");
        assert!(strawberry.fruit.is_some(), "strawberry spawns fruit");
        assert!(strawberry.double_jump, "strawberry double jumps");
    }

    #[test]
    fn ground_line_sits_above_the_ground_strip() {
        let config = RunnerConfig::default();
        assert!(
            (config.ground_y() - 370.0).abs() < f32::EPSILON,
            "800x400 viewport with a 30px ground"
        );
    }

    #[test]
    fn rejects_non_positive_speed() {
        let config = RunnerConfig {
            base_speed: 0.0,
            ..RunnerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "base_speed",
                value: 0.0
            }),
            "a stalled world is not a valid run"
        );
    }

    #[test]
    fn rejects_shrinking_speed_and_negative_gap() {
        let shrinking = RunnerConfig {
            speed_multiplier: 0.99,
            ..RunnerConfig::default()
        };
        assert_eq!(
            shrinking.validate(),
            Err(ConfigError::ShrinkingSpeed(0.99)),
            "speed must never decay"
        );

        let negative_gap = RunnerConfig {
            obstacle_random_gap: -1.0,
            ..RunnerConfig::default()
        };
        assert_eq!(
            negative_gap.validate(),
            Err(ConfigError::NegativeGap(-1.0)),
            "random gap only widens spacing"
        );
    }

    #[test]
    fn rejects_character_taller_than_the_sky() {
        let config = RunnerConfig {
            character_size: 500.0,
            ..RunnerConfig::default()
        };
        assert!(
            matches!(
                config.validate(),
                Err(ConfigError::CharacterTooLarge { .. })
            ),
            "character must fit above the ground"
        );
    }

    #[test]
    fn variant_parses_from_cli_names() {
        assert_eq!(Variant::from_str("dino"), Ok(Variant::Dino), "lowercase");
        assert_eq!(
            Variant::from_str("Strawberry"),
            Ok(Variant::Strawberry),
            "case insensitive"
        );
        assert!(Variant::from_str("pacman").is_err(), "unknown variant");
        assert_eq!(Variant::Dino.to_string(), "dino", "displays snake case");
    }
}
