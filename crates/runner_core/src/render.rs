//! Turns the current session into a list of canvas-style draw instructions.
//!
//! Coordinates are canvas pixels (y down). Shapes inside a
//! `PushTransform`/`PopTransform` pair are relative to that transform, which
//! translates first, then rotates, then scales x.

use core::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use crate::config::Variant;
use crate::entity::{Character, Fruit, FruitKind, Obstacle, ObstacleKind, Rgb};
use crate::session::GameSession;

/// Sky color, also what a host should clear to.
pub const SKY: Rgb = Rgb::hex(0x87CEEB);
const GRASS: Rgb = Rgb::hex(0x228B22);
const GRASS_EDGE: Rgb = Rgb::hex(0x1E6B1E);
const STRAWBERRY: Rgb = Rgb::hex(0xFF0000);
const STRAWBERRY_SEED: Rgb = Rgb::hex(0xFFD700);
const STRAWBERRY_LEAF: Rgb = Rgb::hex(0x228B22);
const DINO: Rgb = Rgb::hex(0x535353);
const SWORD_HANDLE: Rgb = Rgb::hex(0x4A4A4A);
const BOMB_FUSE: Rgb = Rgb::hex(0xFF4500);

const CLOUD_COUNT: u8 = 3;
const CLOUD_SPACING: f32 = 300.0;
const CLOUD_ALTITUDE: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipes the whole viewport.
    Clear,
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgb,
    },
    FillEllipse {
        x: f32,
        y: f32,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        color: Rgb,
    },
    /// Arc from `start` to `end` radians, clockwise on screen.
    StrokeArc {
        x: f32,
        y: f32,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Rgb,
    },
    StrokeLine {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    },
    FillPolygon {
        points: Vec<(f32, f32)>,
        color: Rgb,
    },
    PushTransform {
        translate: (f32, f32),
        rotate: f32,
        scale_x: f32,
    },
    PopTransform,
}

/// Draws one frame. Reads the session only.
pub fn render(session: &GameSession) -> Vec<DrawCommand> {
    let config = session.config();
    let mut commands = vec![DrawCommand::Clear];

    background(
        &mut commands,
        config.viewport_width,
        config.ground_y(),
        session.scenery().cloud_offset,
    );
    ground(
        &mut commands,
        config.viewport_width,
        config.ground_y(),
        config.ground_height,
    );

    match config.variant {
        Variant::Strawberry => strawberry(&mut commands, session.character()),
        Variant::Dino => dino(&mut commands, session.character()),
    }

    for obstacle in session.obstacles() {
        self::obstacle(&mut commands, obstacle);
    }
    for fruit in session.fruits().iter().filter(|fruit| !fruit.collected) {
        self::fruit(&mut commands, fruit);
    }

    commands
}

fn background(commands: &mut Vec<DrawCommand>, width: f32, ground_y: f32, cloud_offset: f32) {
    commands.push(DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        width,
        height: ground_y,
        color: SKY,
    });

    for i in 0..CLOUD_COUNT {
        let cloud_x = f32::from(i).mul_add(CLOUD_SPACING, cloud_offset) % width;
        for (dx, radius) in [(0.0, 20.0), (20.0, 25.0), (40.0, 20.0)] {
            commands.push(DrawCommand::FillCircle {
                x: cloud_x + dx,
                y: CLOUD_ALTITUDE,
                radius,
                color: Rgb::WHITE,
            });
        }
    }
}

fn ground(commands: &mut Vec<DrawCommand>, width: f32, ground_y: f32, ground_height: f32) {
    commands.push(DrawCommand::FillRect {
        x: 0.0,
        y: ground_y,
        width,
        height: ground_height,
        color: GRASS,
    });
    commands.push(DrawCommand::StrokeLine {
        from: (0.0, ground_y),
        to: (width, ground_y),
        width: 1.0,
        color: GRASS_EDGE,
    });
}

/// Tilt applied to the character: a wobble while running, a lean while airborne.
fn character_tilt(character: &Character) -> f32 {
    let mut tilt = 0.0;
    if character.running {
        tilt += (f32::from(character.frame) * FRAC_PI_2).sin() * 0.1;
    }
    if character.jumping {
        tilt += character.velocity_y * 0.05;
    }
    tilt
}

fn push_character_transform(commands: &mut Vec<DrawCommand>, character: &Character) {
    commands.push(DrawCommand::PushTransform {
        translate: (
            character.x + character.width / 2.0,
            character.y - character.height / 2.0,
        ),
        rotate: character_tilt(character),
        scale_x: character.facing,
    });
}

fn strawberry(commands: &mut Vec<DrawCommand>, character: &Character) {
    let w = character.width;
    let body_x = -w / 4.0;

    push_character_transform(commands, character);

    commands.push(DrawCommand::FillCircle {
        x: body_x,
        y: 0.0,
        radius: w / 3.0,
        color: STRAWBERRY,
    });

    for i in 0..8_u8 {
        let angle = f32::from(i) / 8.0 * TAU;
        commands.push(DrawCommand::FillCircle {
            x: angle.cos().mul_add(w / 5.0, body_x),
            y: angle.sin() * (w / 5.0),
            radius: 2.0,
            color: STRAWBERRY_SEED,
        });
    }

    let stem_y = -w / 3.0;
    commands.push(DrawCommand::FillPolygon {
        points: vec![
            (body_x - 10.0, stem_y),
            (body_x + 10.0, stem_y),
            (body_x, stem_y - 10.0),
        ],
        color: STRAWBERRY_LEAF,
    });

    commands.push(DrawCommand::PopTransform);
}

fn dino(commands: &mut Vec<DrawCommand>, character: &Character) {
    let w = character.width;
    let h = character.height;

    push_character_transform(commands, character);

    // body, head, eye, then two legs
    commands.push(DrawCommand::FillRect {
        x: -w / 2.0,
        y: -h / 6.0,
        width: w * 0.7,
        height: h * 0.45,
        color: DINO,
    });
    commands.push(DrawCommand::FillRect {
        x: 0.0,
        y: -h / 2.0,
        width: w / 2.0,
        height: h * 0.35,
        color: DINO,
    });
    commands.push(DrawCommand::FillCircle {
        x: w / 3.0,
        y: -h / 3.0,
        radius: 2.5,
        color: Rgb::WHITE,
    });
    for leg_x in [-w / 3.0, 0.0] {
        commands.push(DrawCommand::FillRect {
            x: leg_x,
            y: h * 0.28,
            width: w / 8.0,
            height: h * 0.22,
            color: DINO,
        });
    }

    commands.push(DrawCommand::PopTransform);
}

fn obstacle(commands: &mut Vec<DrawCommand>, obstacle: &Obstacle) {
    let Obstacle {
        x,
        y,
        width: w,
        height: h,
        kind,
    } = *obstacle;
    let color = kind.color();

    match kind {
        ObstacleKind::Sword => {
            commands.push(DrawCommand::PushTransform {
                translate: (x + w / 2.0, y - h / 2.0),
                rotate: FRAC_PI_4,
                scale_x: 1.0,
            });
            commands.push(DrawCommand::FillRect {
                x: -w / 4.0,
                y: -h / 2.0,
                width: w / 2.0,
                height: h,
                color,
            });
            commands.push(DrawCommand::FillRect {
                x: -w / 4.0,
                y: h / 3.0,
                width: w / 2.0,
                height: h / 4.0,
                color: SWORD_HANDLE,
            });
            commands.push(DrawCommand::PopTransform);
        }
        ObstacleKind::Bomb => {
            commands.push(DrawCommand::FillCircle {
                x: x + w / 2.0,
                y: y - h / 2.0,
                radius: w / 2.0,
                color,
            });
            commands.push(DrawCommand::StrokeLine {
                from: (x + w / 2.0, y - h),
                to: (x + w / 2.0 + 10.0, y - h - 10.0),
                width: 3.0,
                color: BOMB_FUSE,
            });
        }
        ObstacleKind::Cactus => {
            commands.push(DrawCommand::FillRect {
                x: x + w / 3.0,
                y: y - h,
                width: w / 3.0,
                height: h,
                color,
            });
            commands.push(DrawCommand::FillRect {
                x,
                y: y - h * 0.6,
                width: w,
                height: w / 4.0,
                color,
            });
        }
        ObstacleKind::CactusCluster => {
            for (offset, scale) in [(0.0, 0.8), (w / 3.0, 1.0), (w * 2.0 / 3.0, 0.7)] {
                commands.push(DrawCommand::FillRect {
                    x: x + offset,
                    y: y - h * scale,
                    width: w / 3.0,
                    height: h * scale,
                    color,
                });
            }
        }
    }
}

fn fruit(commands: &mut Vec<DrawCommand>, fruit: &Fruit) {
    let size = fruit.size;
    let detail = fruit.kind.detail_color();

    commands.push(DrawCommand::PushTransform {
        translate: (fruit.x, fruit.y),
        rotate: 0.0,
        scale_x: 1.0,
    });
    commands.push(DrawCommand::FillCircle {
        x: 0.0,
        y: 0.0,
        radius: size,
        color: fruit.kind.color(),
    });

    match fruit.kind {
        FruitKind::Watermelon => {
            for i in 0..5_u8 {
                let angle = f32::from(i) / 5.0 * TAU;
                commands.push(DrawCommand::FillEllipse {
                    x: angle.cos() * (size / 2.0),
                    y: angle.sin() * (size / 2.0),
                    radius_x: 3.0,
                    radius_y: 1.5,
                    rotation: angle,
                    color: detail,
                });
            }
        }
        FruitKind::Grape => commands.push(DrawCommand::FillCircle {
            x: 0.0,
            y: -size / 3.0,
            radius: 2.0,
            color: detail,
        }),
        FruitKind::Banana => commands.push(DrawCommand::StrokeArc {
            x: 0.0,
            y: 0.0,
            radius: size / 2.0,
            start: 0.2,
            end: core::f32::consts::PI - 0.2,
            width: 1.0,
            color: detail,
        }),
        FruitKind::Orange => commands.push(DrawCommand::StrokeArc {
            x: 0.0,
            y: 0.0,
            radius: size / 1.5,
            start: 0.0,
            end: TAU,
            width: 1.0,
            color: detail,
        }),
        FruitKind::Avocado => commands.push(DrawCommand::FillCircle {
            x: 0.0,
            y: 0.0,
            radius: size / 2.0,
            color: detail,
        }),
    }

    commands.push(DrawCommand::PopTransform);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::entity::Fruit;

    fn transforms_balanced(commands: &[DrawCommand]) -> bool {
        let mut depth = 0_i32;
        for command in commands {
            match command {
                DrawCommand::PushTransform { .. } => depth += 1,
                DrawCommand::PopTransform => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    fn fruit_bodies(commands: &[DrawCommand], color: Rgb) -> usize {
        commands
            .iter()
            .filter(|command| {
                matches!(command, DrawCommand::FillCircle { color: c, radius, .. }
                    if *c == color && *radius > 10.0)
            })
            .count()
    }

    #[test]
    fn frame_starts_with_clear_then_sky() {
        let session = GameSession::with_seed(RunnerConfig::strawberry(), 1).expect("valid config");
        let commands = render(&session);
        assert_eq!(commands.first(), Some(&DrawCommand::Clear), "clear first");
        assert!(
            matches!(commands.get(1), Some(DrawCommand::FillRect { color, .. }) if *color == SKY),
            "sky second"
        );
        assert!(transforms_balanced(&commands), "every push has a pop");
    }

    #[test]
    fn collected_fruit_is_not_drawn() {
        let mut session =
            GameSession::with_seed(RunnerConfig::strawberry(), 1).expect("valid config");
        let mut picked = Fruit::new(FruitKind::Grape, 400.0, 200.0);
        picked.collected = true;
        session.fruits = vec![Fruit::new(FruitKind::Grape, 300.0, 200.0), picked];

        let commands = render(&session);
        assert_eq!(
            fruit_bodies(&commands, FruitKind::Grape.color()),
            1,
            "only the uncollected grape"
        );
        assert!(transforms_balanced(&commands), "every push has a pop");
    }

    #[test]
    fn every_obstacle_kind_renders_balanced() {
        let mut session = GameSession::with_seed(RunnerConfig::dino(), 1).expect("valid config");
        session.obstacles = vec![
            Obstacle::new(ObstacleKind::Sword, 100.0, 370.0),
            Obstacle::new(ObstacleKind::Bomb, 200.0, 370.0),
            Obstacle::new(ObstacleKind::Cactus, 300.0, 370.0),
            Obstacle::new(ObstacleKind::CactusCluster, 400.0, 370.0),
        ];
        let commands = render(&session);
        assert!(transforms_balanced(&commands), "every push has a pop");
        assert!(
            commands.iter().any(|command| matches!(
                command,
                DrawCommand::StrokeLine { color, .. } if *color == BOMB_FUSE
            )),
            "bomb fuse drawn"
        );
    }

    #[test]
    fn rendering_leaves_the_session_untouched() {
        let mut session =
            GameSession::with_seed(RunnerConfig::strawberry(), 4).expect("valid config");
        session.start();
        for _ in 0..30 {
            session.tick();
        }
        let before = session.clone();
        let first = render(&session);
        let second = render(&session);
        assert_eq!(first, second, "same state, same frame");
        assert_eq!(session.world(), before.world(), "world untouched");
        assert_eq!(session.scenery(), before.scenery(), "scenery untouched");
    }

    #[test]
    fn airborne_character_leans() {
        let config = RunnerConfig::strawberry();
        let mut character = Character::new(&config);
        assert!(character_tilt(&character).abs() < f32::EPSILON, "upright at rest");

        character.jumping = true;
        character.velocity_y = -10.0;
        assert!(
            (character_tilt(&character) + 0.5).abs() < 1e-5,
            "leans back while rising"
        );
    }
}
