//! Passive game data: the run state, the character, obstacles and fruit.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::{RunnerConfig, Variant};

/// An sRGB color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self::hex(0xFFFFFF);
    pub const BLACK: Self = Self::hex(0x000000);

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        )
    }
}

/// Axis-aligned box in canvas coordinates (`min_y` is the top edge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    /// Strict overlap: boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.max_x > other.min_x
            && self.min_x < other.max_x
            && self.max_y > other.min_y
            && self.min_y < other.max_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Start,
    Playing,
    Paused,
    GameOver,
}

/// Run-wide state. One per session, rebuilt on every start.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    /// Scroll velocity in px/tick.
    pub speed: f32,
    /// Accumulated growth factor applied on top of the base speed.
    pub speed_scale: f32,
    pub raw_score: u32,
    pub ground_height: f32,
    pub state: GameState,
}

impl World {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            speed: config.base_speed,
            speed_scale: 1.0,
            raw_score: 0,
            ground_height: config.ground_height,
            state: GameState::Start,
        }
    }

    /// The score shown to the player: one point per ten raw points.
    pub const fn display_score(&self) -> u32 {
        self.raw_score / 10
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub x: f32,
    /// Bottom edge. Equals the ground line while grounded.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity_y: f32,
    pub jumping: bool,
    pub double_jumped: bool,
    pub velocity_x: f32,
    /// Run intent, set by the input layer.
    pub running: bool,
    /// `1.0` faces right, `-1.0` faces left.
    pub facing: f32,
    pub frame: u8,
    pub frame_counter: u8,
}

impl Character {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            x: config.character_x,
            y: config.ground_y(),
            width: config.character_size,
            height: config.character_size,
            velocity_y: 0.0,
            jumping: false,
            double_jumped: false,
            velocity_x: 0.0,
            running: false,
            facing: 1.0,
            frame: 0,
            frame_counter: 0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.width / 2.0
    }

    pub fn center(&self) -> (f32, f32) {
        let radius = self.radius();
        (self.x + radius, self.y - radius)
    }

    /// Box around the character's collision circle.
    pub fn bounding_box(&self) -> Aabb {
        let radius = self.radius();
        let (cx, cy) = self.center();
        Aabb {
            min_x: cx - radius,
            min_y: cy - radius,
            max_x: cx + radius,
            max_y: cy + radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum ObstacleKind {
    Sword,
    Bomb,
    Cactus,
    CactusCluster,
}

const STRAWBERRY_OBSTACLES: [ObstacleKind; 2] = [ObstacleKind::Sword, ObstacleKind::Bomb];
const DINO_OBSTACLES: [ObstacleKind; 2] = [ObstacleKind::Cactus, ObstacleKind::CactusCluster];

impl ObstacleKind {
    pub const fn catalog(variant: Variant) -> &'static [Self] {
        match variant {
            Variant::Strawberry => &STRAWBERRY_OBSTACLES,
            Variant::Dino => &DINO_OBSTACLES,
        }
    }

    /// `(width, height)` in pixels.
    pub const fn size(self) -> (f32, f32) {
        match self {
            Self::Sword => (35.0, 70.0),
            Self::Bomb => (45.0, 45.0),
            Self::Cactus => (25.0, 50.0),
            Self::CactusCluster => (50.0, 40.0),
        }
    }

    pub const fn color(self) -> Rgb {
        match self {
            Self::Sword => Rgb::hex(0x808080),
            Self::Bomb => Rgb::BLACK,
            Self::Cactus | Self::CactusCluster => Rgb::hex(0x2E8B57),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    /// Bottom edge, always the ground line.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, ground_y: f32) -> Self {
        let (width, height) = kind.size();
        Self {
            x,
            y: ground_y,
            width,
            height,
            kind,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb {
            min_x: self.x,
            min_y: self.y - self.height,
            max_x: self.x + self.width,
            max_y: self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum FruitKind {
    Watermelon,
    Grape,
    Banana,
    Orange,
    Avocado,
}

impl FruitKind {
    pub const fn score_value(self) -> u32 {
        match self {
            Self::Watermelon => 50,
            Self::Grape => 30,
            Self::Banana => 20,
            Self::Orange => 40,
            Self::Avocado => 60,
        }
    }

    /// Radius in pixels.
    pub const fn size(self) -> f32 {
        match self {
            Self::Watermelon => 25.0,
            Self::Grape => 15.0,
            Self::Banana | Self::Orange => 20.0,
            Self::Avocado => 22.0,
        }
    }

    pub const fn color(self) -> Rgb {
        match self {
            Self::Watermelon => Rgb::hex(0x228B22),
            Self::Grape => Rgb::hex(0x6B2C91),
            Self::Banana => Rgb::hex(0xFFE135),
            Self::Orange => Rgb::hex(0xFFA500),
            Self::Avocado => Rgb::hex(0x568203),
        }
    }

    /// Color of the seeds, stripes or pit drawn on top of the body.
    pub const fn detail_color(self) -> Rgb {
        match self {
            Self::Watermelon => Rgb::BLACK,
            Self::Grape => Rgb::WHITE,
            Self::Banana | Self::Avocado => Rgb::hex(0x8B4513),
            Self::Orange => Rgb::hex(0xFF7F00),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    /// Center of the fruit.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub kind: FruitKind,
    pub score_value: u32,
    /// Once set, the fruit is neither drawn nor collectable again.
    pub collected: bool,
}

impl Fruit {
    pub const fn new(kind: FruitKind, x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            size: kind.size(),
            kind,
            score_value: kind.score_value(),
            collected: false,
        }
    }
}

/// Purely visual state advanced by the tick so that drawing stays side-effect free.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenery {
    pub cloud_offset: f32,
}
